//! # Force Field Module
//!
//! Deterministic interactions evaluated once per integration step, before any particle is
//! advanced.
//!
//! ## Overview
//!
//! A [`ForceField`] bundles an optional pair potential and an optional alignment
//! interaction. Either may be absent; the integrator checks each capability once per step
//! and never inspects concrete types.
//!
//! ## Key Components
//!
//! - [`pair`] - Pair potentials (soft harmonic repulsion)
//! - [`alignment`] - Polar and nematic alignment torques
//! - [`neighbours`] - k-d tree neighbour search shared by both
//! - [`potentials`] - Pure energy, force, and torque kernels
//! - [`term`] - Energy bookkeeping

pub mod alignment;
pub mod neighbours;
pub mod pair;
pub mod potentials;
pub mod term;

use crate::core::constraints::{Constraint, ConstraintError};
use crate::core::models::group::Group;
use crate::core::models::system::ParticleSystem;
use alignment::Alignment;
use pair::PairPotential;
use term::EnergyTerm;
use tracing::{debug, instrument};

#[derive(Debug, Default)]
pub struct ForceField {
    potential: Option<Box<dyn PairPotential>>,
    alignment: Option<Box<dyn Alignment>>,
}

impl ForceField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_potential(mut self, potential: Box<dyn PairPotential>) -> Self {
        self.potential = Some(potential);
        self
    }

    pub fn with_alignment(mut self, alignment: Box<dyn Alignment>) -> Self {
        self.alignment = Some(alignment);
        self
    }

    pub fn has_potential(&self) -> bool {
        self.potential.is_some()
    }

    pub fn has_alignment(&self) -> bool {
        self.alignment.is_some()
    }

    /// Zeroes every particle's force and torque accumulators.
    pub fn reset(&self, system: &mut ParticleSystem) {
        system.reset_forces();
        system.reset_torques();
    }

    /// Evaluates the pair potential and then the alignment, each at most once.
    ///
    /// Forces on the particles of `group` are projected into their tangent planes once
    /// both interactions have been accumulated.
    #[instrument(level = "trace", skip_all, fields(dt))]
    pub fn compute(
        &self,
        system: &mut ParticleSystem,
        group: &Group,
        constraint: &dyn Constraint,
        dt: f64,
    ) -> Result<EnergyTerm, ConstraintError> {
        let mut energy = EnergyTerm::default();
        if let Some(potential) = &self.potential {
            energy.pair = potential.compute(system.particles_mut(), dt);
        }
        if let Some(alignment) = &self.alignment {
            energy.alignment = alignment.compute(system.particles_mut());
        }

        for &i in group.indices() {
            if let Some(p) = system.particle_mut(i) {
                constraint.project_force(p)?;
            }
        }

        debug!(
            pair = energy.pair,
            alignment = energy.alignment,
            "Force field evaluated"
        );
        Ok(energy)
    }
}
