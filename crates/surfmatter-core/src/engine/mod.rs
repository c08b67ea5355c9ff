//! # Engine Module
//!
//! Time integration of active particles constrained to a surface.
//!
//! ## Overview
//!
//! The engine advances a [`ParticleSystem`](crate::core::models::system::ParticleSystem)
//! one step at a time. A step evaluates the force field once, then moves every particle of
//! the selected group independently: self-propulsion and force drift, thermal noise scaled
//! by the fluctuation-dissipation relation, projection back onto the surface, and a
//! rotation of the director about the local normal.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Validated integrator parameters and run length
//! - **Integrator** ([`integrator`]) - The Brownian step itself
//! - **Noise** ([`noise`]) - Reproducible per-particle random streams
//! - **Temperature** ([`temperature`]) - Step-dependent temperature schedules
//! - **Ghost Regions** ([`ghosts`]) - Periodic images refreshed after each step
//! - **Progress Monitoring** ([`progress`]) - Progress events for front ends
//! - **Error Handling** ([`error`]) - Engine-specific error types
//!
//! ## Determinism
//!
//! Every random draw is keyed by seed, step, particle index, and purpose, so a run is
//! reproducible for a given seed whether or not the `parallel` feature is enabled.

pub mod config;
pub mod error;
pub mod ghosts;
pub mod integrator;
pub mod noise;
pub mod progress;
pub mod temperature;
