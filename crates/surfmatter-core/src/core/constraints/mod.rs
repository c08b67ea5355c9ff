//! # Constraints Module
//!
//! Manifold constraints that keep particles on a surface. A constraint knows the surface
//! geometry and exposes the operations the integrator needs after every step: projecting a
//! drifted position back onto the surface, projecting the torque onto the local normal, and
//! rotating tangent vectors about that normal.
//!
//! ## Key Components
//!
//! - [`Constraint`] - The operator interface used by the integrator
//! - [`plane`] - Flat plane (identity projection for in-plane particles)
//! - [`sphere`] - Sphere of fixed radius
//! - [`cylinder`] - Infinite circular cylinder

pub mod cylinder;
pub mod plane;
pub mod sphere;

use crate::core::models::particle::Particle;
use crate::core::utils::geometry::{any_tangent, project_onto_tangent, rotate_about_axis};
use nalgebra::{Point3, Vector3};
use std::fmt::Debug;
use thiserror::Error;

pub use cylinder::Cylinder;
pub use plane::Plane;
pub use sphere::Sphere;

/// Lengths below this are treated as zero when normalizing geometric vectors.
pub(crate) const GEOMETRY_EPSILON: f64 = 1e-12;

#[derive(Debug, Error, PartialEq)]
pub enum ConstraintError {
    #[error("Invalid {surface} geometry: {reason}")]
    InvalidGeometry {
        surface: &'static str,
        reason: String,
    },
    #[error("Surface normal is undefined for {surface} at ({x}, {y}, {z})")]
    Degenerate {
        surface: &'static str,
        x: f64,
        y: f64,
        z: f64,
    },
}

impl ConstraintError {
    pub(crate) fn degenerate(surface: &'static str, position: &Point3<f64>) -> Self {
        Self::Degenerate {
            surface,
            x: position.x,
            y: position.y,
            z: position.z,
        }
    }
}

/// Geometry-aware projection and tangent-rotation operator.
///
/// Implementors supply the closest-point map and the unit normal; the remaining
/// operations are derived from those two. All operations are stateless with respect to
/// individual particles, so one constraint can be shared across worker threads.
pub trait Constraint: Send + Sync + Debug {
    /// Short surface name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Closest point on the surface to `position`.
    fn closest_point(&self, position: &Point3<f64>) -> Result<Point3<f64>, ConstraintError>;

    /// Outward unit normal at a point on (or near) the surface.
    fn normal_at(&self, position: &Point3<f64>) -> Result<Vector3<f64>, ConstraintError>;

    /// Unit normal at the particle's current position.
    fn normal(&self, particle: &Particle) -> Result<Vector3<f64>, ConstraintError> {
        self.normal_at(&particle.position)
    }

    /// Moves the particle onto the surface and re-projects its director and velocity into
    /// the tangent plane at the new position.
    ///
    /// The director is renormalized; if it was parallel to the normal an arbitrary tangent
    /// direction is chosen. Applying `enforce` to an already enforced particle leaves it
    /// unchanged up to rounding.
    fn enforce(&self, particle: &mut Particle) -> Result<(), ConstraintError> {
        let position = self.closest_point(&particle.position)?;
        let normal = self.normal_at(&position)?;
        particle.position = position;
        particle.velocity = project_onto_tangent(&particle.velocity, &normal);
        particle.director = project_onto_tangent(&particle.director, &normal)
            .try_normalize(GEOMETRY_EPSILON)
            .unwrap_or_else(|| any_tangent(&normal));
        Ok(())
    }

    /// Component of the accumulated torque along the local surface normal.
    fn project_torque(&self, particle: &Particle) -> Result<f64, ConstraintError> {
        Ok(self.normal(particle)?.dot(&particle.torque))
    }

    /// Removes the normal component of the accumulated force.
    fn project_force(&self, particle: &mut Particle) -> Result<(), ConstraintError> {
        let normal = self.normal(particle)?;
        particle.force = project_onto_tangent(&particle.force, &normal);
        Ok(())
    }

    /// Rotates the director by `angle` radians about the local normal.
    fn rotate_director(&self, particle: &mut Particle, angle: f64) -> Result<(), ConstraintError> {
        let normal = self.normal(particle)?;
        let rotated = rotate_about_axis(&particle.director, &normal, angle);
        particle.director = rotated
            .try_normalize(GEOMETRY_EPSILON)
            .unwrap_or_else(|| any_tangent(&normal));
        Ok(())
    }

    /// Rotates the velocity by `angle` radians about the local normal, keeping its magnitude.
    fn rotate_velocity(&self, particle: &mut Particle, angle: f64) -> Result<(), ConstraintError> {
        let normal = self.normal(particle)?;
        particle.velocity = rotate_about_axis(&particle.velocity, &normal, angle);
        Ok(())
    }
}
