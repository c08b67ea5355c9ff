use nalgebra::Vector3;

/// Pair separations below this are skipped: the pair direction is undefined.
pub(crate) const MIN_SEPARATION: f64 = 1e-10;

/// Soft harmonic repulsion `U = ½ k (a - r)²` for `r < a`, zero otherwise.
#[inline]
pub fn soft_energy(dist: f64, k: f64, a: f64) -> f64 {
    if dist >= a {
        return 0.0;
    }
    let overlap = a - dist;
    0.5 * k * overlap * overlap
}

/// Magnitude of the soft repulsive force, `k (a - r)` inside the range.
#[inline]
pub fn soft_force_magnitude(dist: f64, k: f64, a: f64) -> f64 {
    if dist >= a { 0.0 } else { k * (a - dist) }
}

/// Polar (ferromagnetic) alignment torque on `n_i` from `n_j`: `J n_i × n_j`.
#[inline]
pub fn polar_torque(n_i: &Vector3<f64>, n_j: &Vector3<f64>, j: f64) -> Vector3<f64> {
    n_i.cross(n_j) * j
}

/// Polar alignment energy `-J n_i · n_j`.
#[inline]
pub fn polar_energy(n_i: &Vector3<f64>, n_j: &Vector3<f64>, j: f64) -> f64 {
    -j * n_i.dot(n_j)
}

/// Nematic alignment torque on `n_i` from `n_j`: `2J (n_i · n_j) n_i × n_j`.
#[inline]
pub fn nematic_torque(n_i: &Vector3<f64>, n_j: &Vector3<f64>, j: f64) -> Vector3<f64> {
    n_i.cross(n_j) * (2.0 * j * n_i.dot(n_j))
}

/// Nematic alignment energy `-J (n_i · n_j)²`.
#[inline]
pub fn nematic_energy(n_i: &Vector3<f64>, n_j: &Vector3<f64>, j: f64) -> f64 {
    let c = n_i.dot(n_j);
    -j * c * c
}
