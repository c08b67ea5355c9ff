//! Geometric helpers shared by constraints and force evaluation.

pub mod geometry;
