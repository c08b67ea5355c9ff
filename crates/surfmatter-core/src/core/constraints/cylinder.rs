use super::{Constraint, ConstraintError, GEOMETRY_EPSILON};
use nalgebra::{Point3, Vector3};

/// Infinite circular cylinder through `origin` along `axis`.
#[derive(Debug, Clone, PartialEq)]
pub struct Cylinder {
    origin: Point3<f64>,
    axis: Vector3<f64>,
    radius: f64,
}

impl Cylinder {
    pub fn new(
        origin: Point3<f64>,
        axis: Vector3<f64>,
        radius: f64,
    ) -> Result<Self, ConstraintError> {
        let axis = axis
            .try_normalize(GEOMETRY_EPSILON)
            .ok_or_else(|| ConstraintError::InvalidGeometry {
                surface: "cylinder",
                reason: "axis must be non-zero".to_string(),
            })?;
        if !(radius.is_finite() && radius > 0.0) {
            return Err(ConstraintError::InvalidGeometry {
                surface: "cylinder",
                reason: format!("radius must be positive, got {}", radius),
            });
        }
        Ok(Self {
            origin,
            axis,
            radius,
        })
    }

    /// Foot of the perpendicular from `position` onto the axis.
    fn axis_point(&self, position: &Point3<f64>) -> Point3<f64> {
        self.origin + self.axis * self.axis.dot(&(position - self.origin))
    }
}

impl Constraint for Cylinder {
    fn name(&self) -> &'static str {
        "cylinder"
    }

    fn closest_point(&self, position: &Point3<f64>) -> Result<Point3<f64>, ConstraintError> {
        let normal = self.normal_at(position)?;
        Ok(self.axis_point(position) + normal * self.radius)
    }

    fn normal_at(&self, position: &Point3<f64>) -> Result<Vector3<f64>, ConstraintError> {
        (position - self.axis_point(position))
            .try_normalize(GEOMETRY_EPSILON)
            .ok_or_else(|| ConstraintError::degenerate(self.name(), position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::particle::Particle;

    #[test]
    fn enforce_keeps_axial_coordinate_and_fixes_radius() {
        let cylinder = Cylinder::new(Point3::origin(), Vector3::z(), 2.0).unwrap();
        let mut p = Particle::new(0, Point3::new(3.0, 4.0, 7.5), Vector3::z());

        cylinder.enforce(&mut p).unwrap();

        assert!((p.position - Point3::new(1.2, 1.6, 7.5)).norm() < 1e-12);
        assert!((p.director - Vector3::z()).norm() < 1e-12);
    }

    #[test]
    fn normal_is_radial() {
        let cylinder = Cylinder::new(Point3::origin(), Vector3::x(), 1.0).unwrap();
        let n = cylinder.normal_at(&Point3::new(5.0, 0.0, -1.0)).unwrap();
        assert!((n - Vector3::new(0.0, 0.0, -1.0)).norm() < 1e-12);
    }

    #[test]
    fn particle_on_axis_is_degenerate() {
        let cylinder = Cylinder::new(Point3::origin(), Vector3::z(), 1.0).unwrap();
        assert!(matches!(
            cylinder.normal_at(&Point3::new(0.0, 0.0, 3.0)),
            Err(ConstraintError::Degenerate { .. })
        ));
    }
}
