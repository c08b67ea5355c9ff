use nalgebra::{Rotation3, Unit, Vector3};

/// Removes the component of `v` along the unit vector `normal`.
#[inline]
pub fn project_onto_tangent(v: &Vector3<f64>, normal: &Vector3<f64>) -> Vector3<f64> {
    v - normal * normal.dot(v)
}

/// Rotation by `angle` radians about `axis` (right-hand rule).
pub fn rotation_from_axis_angle(axis: &Vector3<f64>, angle: f64) -> Rotation3<f64> {
    Rotation3::from_axis_angle(&Unit::new_normalize(*axis), angle)
}

/// Rotates `v` by `angle` radians about the unit `axis`, preserving its length.
#[inline]
pub fn rotate_about_axis(v: &Vector3<f64>, axis: &Vector3<f64>, angle: f64) -> Vector3<f64> {
    if angle == 0.0 {
        return *v;
    }
    rotation_from_axis_angle(axis, angle) * v
}

/// Any unit vector perpendicular to `normal`.
pub fn any_tangent(normal: &Vector3<f64>) -> Vector3<f64> {
    let helper = if normal.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    project_onto_tangent(&helper, normal).normalize()
}
