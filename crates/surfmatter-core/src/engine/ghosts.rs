use super::config::ConfigError;
use super::error::EngineError;
use crate::core::models::particle::Particle;
use nalgebra::Vector3;
use std::ops::Range;

/// A block of particles that mirrors another block under a fixed translation.
///
/// After each step, particle `target.start + k` is overwritten with the state of particle
/// `source.start + k`, shifted by `shift`. The layout is fixed when the region is created.
#[derive(Debug, Clone, PartialEq)]
pub struct GhostRegion {
    role: String,
    source: Range<usize>,
    target: Range<usize>,
    shift: Vector3<f64>,
}

impl GhostRegion {
    pub fn new(
        role: &str,
        source: Range<usize>,
        target: Range<usize>,
        shift: Vector3<f64>,
    ) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidParameter {
            name: "ghost_region",
            reason: format!("'{role}': {reason}"),
        };

        if source.is_empty() {
            return Err(invalid("source range is empty".to_string()));
        }
        if source.len() != target.len() {
            return Err(invalid(format!(
                "source has {} particles but target has {}",
                source.len(),
                target.len()
            )));
        }
        if source.start < target.end && target.start < source.end {
            return Err(invalid(format!(
                "source {source:?} overlaps target {target:?}"
            )));
        }
        if !shift.iter().all(|c| c.is_finite()) {
            return Err(invalid("shift must be finite".to_string()));
        }

        Ok(Self {
            role: role.to_string(),
            source,
            target,
            shift,
        })
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn source(&self) -> &Range<usize> {
        &self.source
    }

    pub fn target(&self) -> &Range<usize> {
        &self.target
    }

    pub fn shift(&self) -> &Vector3<f64> {
        &self.shift
    }

    pub fn len(&self) -> usize {
        self.source.len()
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    /// Checks that both ranges address particles of a system with `size` particles.
    pub fn check_bounds(&self, size: usize) -> Result<(), EngineError> {
        let end = self.source.end.max(self.target.end);
        if end > size {
            return Err(EngineError::GhostRegion {
                role: self.role.clone(),
                size,
                reason: format!("index {} is out of range", end - 1),
            });
        }
        Ok(())
    }

    /// Copies position, director, and velocity from the source block into the target block.
    ///
    /// Callers must have checked the bounds against `particles.len()`.
    pub fn apply(&self, particles: &mut [Particle]) {
        for (s, t) in self.source.clone().zip(self.target.clone()) {
            let (position, director, velocity) = {
                let src = &particles[s];
                (src.position + self.shift, src.director, src.velocity)
            };
            let ghost = &mut particles[t];
            ghost.position = position;
            ghost.director = director;
            ghost.velocity = velocity;
        }
    }
}
