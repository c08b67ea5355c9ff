use super::neighbours::NeighbourList;
use super::potentials::{MIN_SEPARATION, soft_energy, soft_force_magnitude};
use crate::core::models::particle::Particle;
use nalgebra::{Point3, Vector3};
use std::collections::HashMap;
use std::fmt::Debug;
use tracing::trace;

/// A pairwise potential that adds forces into the particles' accumulators.
pub trait PairPotential: Send + Sync + Debug {
    fn name(&self) -> &'static str;

    /// Accumulates pair forces into `particle.force` and returns the total pair energy.
    fn compute(&self, particles: &mut [Particle], dt: f64) -> f64;
}

/// Strength and range of the soft potential for one pair of particle types.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoftParameters {
    pub k: f64,
    pub a: f64,
}

/// Soft harmonic repulsion between overlapping particles.
///
/// The global `k` and `a` apply to every type pair unless overridden with
/// [`SoftPotential::set_pair_parameters`]. With `use_particle_radii` the range of each
/// pair becomes the sum of the two radii and `a` is ignored.
#[derive(Debug, Clone)]
pub struct SoftPotential {
    k: f64,
    a: f64,
    use_particle_radii: bool,
    pair_params: HashMap<(usize, usize), SoftParameters>,
}

impl Default for SoftPotential {
    fn default() -> Self {
        Self::new(1.0, 2.0)
    }
}

impl SoftPotential {
    pub fn new(k: f64, a: f64) -> Self {
        Self {
            k,
            a,
            use_particle_radii: false,
            pair_params: HashMap::new(),
        }
    }

    pub fn with_particle_radii(mut self, enabled: bool) -> Self {
        self.use_particle_radii = enabled;
        self
    }

    /// Overrides `k` and `a` for the (symmetric) type pair.
    pub fn set_pair_parameters(&mut self, type_1: usize, type_2: usize, params: SoftParameters) {
        self.pair_params.insert((type_1, type_2), params);
        self.pair_params.insert((type_2, type_1), params);
    }

    fn parameters(&self, pi: &Particle, pj: &Particle) -> SoftParameters {
        let base = self
            .pair_params
            .get(&(pi.particle_type, pj.particle_type))
            .copied()
            .unwrap_or(SoftParameters {
                k: self.k,
                a: self.a,
            });
        if self.use_particle_radii {
            SoftParameters {
                k: base.k,
                a: pi.radius + pj.radius,
            }
        } else {
            base
        }
    }

    fn cutoff(&self, particles: &[Particle]) -> f64 {
        if self.use_particle_radii {
            2.0 * particles.iter().map(|p| p.radius).fold(0.0, f64::max)
        } else {
            self.pair_params
                .values()
                .map(|p| p.a)
                .fold(self.a, f64::max)
        }
    }
}

impl PairPotential for SoftPotential {
    fn name(&self) -> &'static str {
        "soft"
    }

    fn compute(&self, particles: &mut [Particle], _dt: f64) -> f64 {
        let positions: Vec<Point3<f64>> = particles.iter().map(|p| p.position).collect();
        let neighbours = NeighbourList::build(&positions, self.cutoff(particles));
        trace!(pairs = neighbours.len(), "Soft potential neighbour list built");

        let mut forces = vec![Vector3::zeros(); particles.len()];
        let mut energy = 0.0;
        for &(i, j) in neighbours.pairs() {
            let params = self.parameters(&particles[i], &particles[j]);
            let rij = positions[i] - positions[j];
            let dist = rij.norm();
            if dist < MIN_SEPARATION || dist >= params.a {
                continue;
            }
            let f = rij * (soft_force_magnitude(dist, params.k, params.a) / dist);
            forces[i] += f;
            forces[j] -= f;
            energy += soft_energy(dist, params.k, params.a);
        }

        for (p, f) in particles.iter_mut().zip(forces) {
            p.force += f;
        }
        energy
    }
}
