use super::{Constraint, ConstraintError, GEOMETRY_EPSILON};
use nalgebra::{Point3, Vector3};

/// Sphere of fixed radius around `centre`.
#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    centre: Point3<f64>,
    radius: f64,
}

impl Sphere {
    pub fn new(centre: Point3<f64>, radius: f64) -> Result<Self, ConstraintError> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(ConstraintError::InvalidGeometry {
                surface: "sphere",
                reason: format!("radius must be positive, got {}", radius),
            });
        }
        Ok(Self { centre, radius })
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl Constraint for Sphere {
    fn name(&self) -> &'static str {
        "sphere"
    }

    fn closest_point(&self, position: &Point3<f64>) -> Result<Point3<f64>, ConstraintError> {
        let normal = self.normal_at(position)?;
        Ok(self.centre + normal * self.radius)
    }

    fn normal_at(&self, position: &Point3<f64>) -> Result<Vector3<f64>, ConstraintError> {
        (position - self.centre)
            .try_normalize(GEOMETRY_EPSILON)
            .ok_or_else(|| ConstraintError::degenerate(self.name(), position))
    }
}
