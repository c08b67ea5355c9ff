use serde::Serialize;
use std::ops::{Add, AddAssign};

/// Energies accumulated by one force-field evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct EnergyTerm {
    pub pair: f64,
    pub alignment: f64,
}

impl EnergyTerm {
    pub fn new(pair: f64, alignment: f64) -> Self {
        Self { pair, alignment }
    }

    #[inline]
    pub fn total(&self) -> f64 {
        self.pair + self.alignment
    }
}

impl Add for EnergyTerm {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            pair: self.pair + rhs.pair,
            alignment: self.alignment + rhs.alignment,
        }
    }
}

impl AddAssign for EnergyTerm {
    fn add_assign(&mut self, rhs: Self) {
        self.pair += rhs.pair;
        self.alignment += rhs.alignment;
    }
}
