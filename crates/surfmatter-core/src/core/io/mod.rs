//! Reading and writing particle configurations.
//!
//! The [`traits::ParticleFile`] trait gives every format the same read/write API;
//! [`dat`] implements the whitespace-separated particle table used for initial
//! configurations and trajectory snapshots.

pub mod dat;
pub mod traits;
