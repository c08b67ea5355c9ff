use super::group::{ALL_GROUP, Group};
use super::mesh::VertexMesh;
use super::particle::Particle;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("Group '{0}' already exists")]
    DuplicateGroup(String),
    #[error("Group '{group}' references particle index {index}, but the system holds {size} particles")]
    IndexOutOfRange {
        group: String,
        index: usize,
        size: usize,
    },
    #[error("Group '{group}' lists particle index {index} more than once")]
    DuplicateIndex { group: String, index: usize },
}

/// Owned arena of particles plus the named groups that select subsets of them.
///
/// The system is the single owner of particle state. Integrators borrow it mutably for
/// the duration of one step and never keep references across calls.
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    /// Contiguous particle storage, addressed by index.
    particles: Vec<Particle>,
    /// Named groups; the `"all"` group is always present.
    groups: HashMap<String, Group>,
    /// Global step counter, advanced by the run loop.
    run_step: u64,
    /// Optional vertex mesh refreshed by [`ParticleSystem::update_mesh`].
    mesh: Option<VertexMesh>,
}

impl Default for ParticleSystem {
    fn default() -> Self {
        let mut groups = HashMap::new();
        groups.insert(ALL_GROUP.to_string(), Group::new(ALL_GROUP, Vec::new()));
        Self {
            particles: Vec::new(),
            groups,
            run_step: 0,
            mesh: None,
        }
    }
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a system from a list of particles; every particle joins the `"all"` group.
    pub fn from_particles(particles: Vec<Particle>) -> Self {
        let mut system = Self::new();
        for p in particles {
            system.add_particle(p);
        }
        system
    }

    /// Appends a particle and returns its arena index.
    pub fn add_particle(&mut self, particle: Particle) -> usize {
        let index = self.particles.len();
        self.particles.push(particle);
        if let Some(all) = self.groups.get_mut(ALL_GROUP) {
            all.push(index);
        }
        index
    }

    /// Registers a named group after validating its indices.
    ///
    /// # Errors
    ///
    /// Fails if the name is taken, an index is out of range, or an index repeats.
    pub fn add_group(&mut self, name: &str, indices: Vec<usize>) -> Result<(), ModelError> {
        if self.groups.contains_key(name) {
            return Err(ModelError::DuplicateGroup(name.to_string()));
        }
        let mut seen = HashSet::with_capacity(indices.len());
        for &index in &indices {
            if index >= self.particles.len() {
                return Err(ModelError::IndexOutOfRange {
                    group: name.to_string(),
                    index,
                    size: self.particles.len(),
                });
            }
            if !seen.insert(index) {
                return Err(ModelError::DuplicateIndex {
                    group: name.to_string(),
                    index,
                });
            }
        }
        self.groups
            .insert(name.to_string(), Group::new(name, indices));
        Ok(())
    }

    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.get(name)
    }

    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn particle(&self, index: usize) -> Option<&Particle> {
        self.particles.get(index)
    }

    pub fn particle_mut(&mut self, index: usize) -> Option<&mut Particle> {
        self.particles.get_mut(index)
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn reset_forces(&mut self) {
        self.particles.iter_mut().for_each(Particle::reset_force);
    }

    pub fn reset_torques(&mut self) {
        self.particles.iter_mut().for_each(Particle::reset_torque);
    }

    pub fn run_step(&self) -> u64 {
        self.run_step
    }

    pub fn advance_step(&mut self) {
        self.run_step += 1;
    }

    /// Attaches a vertex mesh built from the current particle positions.
    pub fn enable_mesh(&mut self) {
        self.mesh = Some(VertexMesh::from_particles(&self.particles));
    }

    pub fn mesh(&self) -> Option<&VertexMesh> {
        self.mesh.as_ref()
    }

    /// Notifies the vertex mesh that particle positions changed.
    ///
    /// A system without a mesh treats this as a no-op.
    pub fn update_mesh(&mut self) {
        if let Some(mesh) = self.mesh.as_mut() {
            mesh.update(&self.particles);
        }
    }
}
