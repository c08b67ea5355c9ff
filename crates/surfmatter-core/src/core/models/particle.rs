use nalgebra::{Point3, Vector3};

/// A self-propelled particle living on (or near) a constraint surface.
///
/// Particles are owned by [`ParticleSystem`](super::system::ParticleSystem) and are only
/// ever mutated in place by the integrator and the force field. All vector fields use
/// lab-frame Cartesian components.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Identifier carried through from the input configuration.
    pub id: usize,
    /// Particle type (1-based, as in the configuration file).
    pub particle_type: usize,
    /// Interaction radius used by radius-aware potentials.
    pub radius: f64,
    /// Position of the particle.
    pub position: Point3<f64>,
    /// Unit director in the local tangent plane; sets the self-propulsion axis.
    pub director: Vector3<f64>,
    /// Velocity from the most recent step; tangent to the surface.
    pub velocity: Vector3<f64>,
    /// Force accumulator, reset at the start of every step.
    pub force: Vector3<f64>,
    /// Torque accumulator, reset at the start of every step.
    pub torque: Vector3<f64>,
    /// Angular velocity about the local surface normal.
    pub omega: f64,
    /// Time the particle has been integrated for.
    pub age: f64,
}

impl Particle {
    /// Creates a particle at `position` with the given director.
    ///
    /// The director is normalized; a zero director is kept as zero and will be replaced
    /// by a tangent vector the first time a constraint enforces the particle.
    pub fn new(id: usize, position: Point3<f64>, director: Vector3<f64>) -> Self {
        let director = director.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::zeros);
        Self {
            id,
            particle_type: 1,
            radius: 1.0,
            position,
            director,
            velocity: Vector3::zeros(),
            force: Vector3::zeros(),
            torque: Vector3::zeros(),
            omega: 0.0,
            age: 0.0,
        }
    }

    pub fn with_type(mut self, particle_type: usize) -> Self {
        self.particle_type = particle_type;
        self
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_velocity(mut self, velocity: Vector3<f64>) -> Self {
        self.velocity = velocity;
        self
    }

    /// Negates the director and, when `include_velocity` is set, the velocity.
    pub fn flip(&mut self, include_velocity: bool) {
        self.director = -self.director;
        if include_velocity {
            self.velocity = -self.velocity;
        }
    }

    #[inline]
    pub fn reset_force(&mut self) {
        self.force = Vector3::zeros();
    }

    #[inline]
    pub fn reset_torque(&mut self) {
        self.torque = Vector3::zeros();
    }
}
