use super::neighbours::NeighbourList;
use super::potentials::{nematic_energy, nematic_torque, polar_energy, polar_torque};
use crate::core::models::particle::Particle;
use nalgebra::{Point3, Vector3};
use std::fmt::Debug;

/// An interaction that adds alignment torques between neighbouring directors.
pub trait Alignment: Send + Sync + Debug {
    fn name(&self) -> &'static str;

    /// Accumulates torques into `particle.torque` and returns the alignment energy.
    fn compute(&self, particles: &mut [Particle]) -> f64;
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Symmetry {
    Polar,
    Nematic,
}

fn accumulate(particles: &mut [Particle], j: f64, cutoff: f64, symmetry: Symmetry) -> f64 {
    let positions: Vec<Point3<f64>> = particles.iter().map(|p| p.position).collect();
    let neighbours = NeighbourList::build(&positions, cutoff);

    let mut torques = vec![Vector3::zeros(); particles.len()];
    let mut energy = 0.0;
    for &(a, b) in neighbours.pairs() {
        let (n_a, n_b) = (particles[a].director, particles[b].director);
        let (t_a, t_b, e) = match symmetry {
            Symmetry::Polar => (
                polar_torque(&n_a, &n_b, j),
                polar_torque(&n_b, &n_a, j),
                polar_energy(&n_a, &n_b, j),
            ),
            Symmetry::Nematic => (
                nematic_torque(&n_a, &n_b, j),
                nematic_torque(&n_b, &n_a, j),
                nematic_energy(&n_a, &n_b, j),
            ),
        };
        torques[a] += t_a;
        torques[b] += t_b;
        energy += e;
    }

    for (p, t) in particles.iter_mut().zip(torques) {
        p.torque += t;
    }
    energy
}

/// Ferromagnetic alignment: neighbouring directors rotate towards each other.
#[derive(Debug, Clone, PartialEq)]
pub struct PolarAlignment {
    pub j: f64,
    pub cutoff: f64,
}

impl PolarAlignment {
    pub fn new(j: f64, cutoff: f64) -> Self {
        Self { j, cutoff }
    }
}

impl Alignment for PolarAlignment {
    fn name(&self) -> &'static str {
        "polar"
    }

    fn compute(&self, particles: &mut [Particle]) -> f64 {
        accumulate(particles, self.j, self.cutoff, Symmetry::Polar)
    }
}

/// Head-tail symmetric alignment: directors align up to sign.
#[derive(Debug, Clone, PartialEq)]
pub struct NematicAlignment {
    pub j: f64,
    pub cutoff: f64,
}

impl NematicAlignment {
    pub fn new(j: f64, cutoff: f64) -> Self {
        Self { j, cutoff }
    }
}

impl Alignment for NematicAlignment {
    fn name(&self) -> &'static str {
        "nematic"
    }

    fn compute(&self, particles: &mut [Particle]) -> f64 {
        accumulate(particles, self.j, self.cutoff, Symmetry::Nematic)
    }
}
