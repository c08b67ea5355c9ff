use super::{Constraint, ConstraintError, GEOMETRY_EPSILON};
use nalgebra::{Point3, Vector3};

/// The plane `normal · r = offset`.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    normal: Vector3<f64>,
    offset: f64,
}

impl Plane {
    pub fn new(normal: Vector3<f64>, offset: f64) -> Result<Self, ConstraintError> {
        let normal = normal
            .try_normalize(GEOMETRY_EPSILON)
            .ok_or_else(|| ConstraintError::InvalidGeometry {
                surface: "plane",
                reason: "normal vector must be non-zero".to_string(),
            })?;
        if !offset.is_finite() {
            return Err(ConstraintError::InvalidGeometry {
                surface: "plane",
                reason: format!("offset must be finite, got {}", offset),
            });
        }
        Ok(Self { normal, offset })
    }

    /// The `z = 0` plane.
    pub fn xy() -> Self {
        Self {
            normal: Vector3::z(),
            offset: 0.0,
        }
    }
}

impl Default for Plane {
    fn default() -> Self {
        Self::xy()
    }
}

impl Constraint for Plane {
    fn name(&self) -> &'static str {
        "plane"
    }

    fn closest_point(&self, position: &Point3<f64>) -> Result<Point3<f64>, ConstraintError> {
        let height = self.normal.dot(&position.coords) - self.offset;
        if height == 0.0 {
            return Ok(*position);
        }
        Ok(position - self.normal * height)
    }

    fn normal_at(&self, _position: &Point3<f64>) -> Result<Vector3<f64>, ConstraintError> {
        Ok(self.normal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::particle::Particle;

    #[test]
    fn in_plane_particle_is_left_untouched() {
        let plane = Plane::xy();
        let mut p = Particle::new(0, Point3::new(0.1, -3.0, 0.0), Vector3::x());
        p.velocity = Vector3::new(1.0, 0.0, 0.0);
        let before = p.clone();

        plane.enforce(&mut p).unwrap();

        assert_eq!(p, before);
    }

    #[test]
    fn tilted_plane_projects_along_its_normal() {
        let plane = Plane::new(Vector3::new(0.0, 1.0, 1.0), 0.0).unwrap();
        let projected = plane.closest_point(&Point3::new(0.0, 1.0, 1.0)).unwrap();
        assert!((projected - Point3::origin()).norm() < 1e-12);
    }

    #[test]
    fn zero_normal_is_rejected() {
        assert!(matches!(
            Plane::new(Vector3::zeros(), 1.0),
            Err(ConstraintError::InvalidGeometry { surface: "plane", .. })
        ));
    }
}
