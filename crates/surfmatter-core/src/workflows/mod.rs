//! # Workflows Module
//!
//! High-level entry points that tie the [`engine`](crate::engine) and [`core`](crate::core)
//! layers together into complete procedures.
//!
//! - **Simulation Workflow** ([`simulate`]) - Runs the integrator for a fixed number of
//!   steps, emitting progress events and periodic snapshots, and summarizes the final state.

pub mod simulate;
