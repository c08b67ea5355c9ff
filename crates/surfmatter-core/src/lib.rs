//! # surfmatter Core Library
//!
//! Brownian dynamics of self-propelled particles constrained to curved surfaces.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture that keeps the numerics testable in
//! isolation from the code that drives them.
//!
//! - **[`core`]: The Foundation.** Particle data model (`ParticleSystem`), surface
//!   constraints (`Plane`, `Sphere`, `Cylinder`), the pairwise force field, and snapshot I/O.
//!
//! - **[`engine`]: The Logic Core.** The Brownian integrator with its validated
//!   configuration, reproducible per-particle noise, temperature schedules, and ghost
//!   regions for periodic images.
//!
//! - **[`workflows`]: The Public API.** Multi-step simulation runs with progress reporting
//!   and periodic snapshots.

pub mod core;
pub mod engine;
pub mod workflows;
