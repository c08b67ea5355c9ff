//! # Core Module
//!
//! Fundamental data structures and geometry for particles living on a surface.
//!
//! ## Architecture
//!
//! - **Particle Representation** ([`models`]) - Particles, named groups, the particle system, and its vertex mesh
//! - **Surface Constraints** ([`constraints`]) - Projection onto a manifold and rotation about its normal
//! - **Interactions** ([`forcefield`]) - Soft repulsion and alignment torques with k-d tree neighbour search
//! - **File I/O** ([`io`]) - Plain-text particle snapshots
//! - **Utilities** ([`utils`]) - Small vector-geometry helpers
//!
//! Everything in this layer is deterministic; randomness is confined to the
//! [`engine`](crate::engine).

pub mod constraints;
pub mod forcefield;
pub mod io;
pub mod models;
pub mod utils;
