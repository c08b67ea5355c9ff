use nalgebra::Vector3;
use rand::distributions::Standard;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

/// Independent random draws consumed by one particle within one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoiseChannel {
    Flip,
    Translation,
    Rotation,
}

impl NoiseChannel {
    fn tag(self) -> u64 {
        match self {
            Self::Flip => 0x01,
            Self::Translation => 0x02,
            Self::Rotation => 0x03,
        }
    }
}

/// Seeded source of per-particle random streams.
///
/// Every `(step, particle, channel)` key maps to its own generator, so the draws a particle
/// sees do not depend on how many other particles were processed before it or on which
/// thread processed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoiseModel {
    seed: u64,
}

impl NoiseModel {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn stream(&self, step: u64, index: usize, channel: NoiseChannel) -> NoiseStream {
        let key = splitmix64(splitmix64(splitmix64(self.seed) ^ step) ^ index as u64);
        NoiseStream::from_rng(StdRng::seed_from_u64(splitmix64(key ^ channel.tag())))
    }
}

#[inline]
fn splitmix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[derive(Debug, Clone)]
pub struct NoiseStream<R: Rng = StdRng> {
    rng: R,
}

impl<R: Rng> NoiseStream<R> {
    pub fn from_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Uniform draw in `[0, 1)`.
    pub fn uniform(&mut self) -> f64 {
        self.rng.sample(Standard)
    }

    /// Standard normal draw.
    pub fn gaussian(&mut self) -> f64 {
        self.rng.sample(StandardNormal)
    }

    /// Three independent standard normals.
    pub fn gaussian_vector(&mut self) -> Vector3<f64> {
        let x = self.gaussian();
        let y = self.gaussian();
        let z = self.gaussian();
        Vector3::new(x, y, z)
    }
}
