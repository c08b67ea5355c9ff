use super::particle::Particle;
use nalgebra::Point3;

/// A visualization vertex mirroring one particle.
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    pub id: usize,
    pub position: Point3<f64>,
    pub particle_type: usize,
}

/// Vertex store kept in sync with particle positions after each integration step.
///
/// The mesh does not own topology; it only holds the latest vertex coordinates so that
/// downstream consumers (snapshot writers, renderers) can read a consistent copy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VertexMesh {
    vertices: Vec<Vertex>,
    revision: u64,
}

impl VertexMesh {
    pub fn from_particles(particles: &[Particle]) -> Self {
        let vertices = particles
            .iter()
            .map(|p| Vertex {
                id: p.id,
                position: p.position,
                particle_type: p.particle_type,
            })
            .collect();
        Self {
            vertices,
            revision: 0,
        }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Number of updates applied since construction.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Refreshes vertex positions and types from the particle arena.
    ///
    /// Vertices are matched to particles by arena index; particles added after the mesh
    /// was built get new vertices appended.
    pub fn update(&mut self, particles: &[Particle]) {
        self.vertices.truncate(particles.len());
        for (i, p) in particles.iter().enumerate() {
            match self.vertices.get_mut(i) {
                Some(v) => {
                    v.position = p.position;
                    v.particle_type = p.particle_type;
                }
                None => self.vertices.push(Vertex {
                    id: p.id,
                    position: p.position,
                    particle_type: p.particle_type,
                }),
            }
        }
        self.revision += 1;
    }
}
