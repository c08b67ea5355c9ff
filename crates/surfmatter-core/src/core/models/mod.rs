//! # Core Models Module
//!
//! Data structures describing the particle population that the integrator advances.
//!
//! ## Key Components
//!
//! - [`particle`] - A single self-propelled particle: position, director, velocity, accumulators
//! - [`group`] - Named, ordered index sets selecting particles for integration
//! - [`system`] - The owned particle arena with its groups and global step counter
//! - [`mesh`] - Vertex store refreshed from particle positions after each step
//!
//! ## Usage
//!
//! ```ignore
//! use surfmatter::core::models::{particle::Particle, system::ParticleSystem};
//!
//! let mut system = ParticleSystem::new();
//! let i = system.add_particle(Particle::new(0, Point3::origin(), Vector3::x()));
//! system.add_group("active", vec![i])?;
//! ```

pub mod group;
pub mod mesh;
pub mod particle;
pub mod system;
