use super::config::ConfigError;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

pub type TemperatureFn = Arc<dyn Fn(u64) -> f64 + Send + Sync>;

/// Temperature as a function of the integration step.
#[derive(Clone)]
pub enum TemperatureSchedule {
    Constant(f64),
    /// Linear ramp from `from` at step 0 to `to` at `steps`; holds `to` afterwards.
    Linear { from: f64, to: f64, steps: u64 },
    Custom(TemperatureFn),
}

impl TemperatureSchedule {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(u64) -> f64 + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    /// Temperature at `step`, never negative.
    ///
    /// Schedules that evaluate below zero are clamped to zero so the thermal amplitude is
    /// always real.
    pub fn value(&self, step: u64) -> f64 {
        let raw = match self {
            Self::Constant(t) => *t,
            Self::Linear { from, to, steps } => {
                if *steps == 0 || step >= *steps {
                    *to
                } else {
                    from + (to - from) * (step as f64 / *steps as f64)
                }
            }
            Self::Custom(f) => f(step),
        };

        if raw < 0.0 {
            warn!(step, temperature = raw, "Negative temperature clamped to zero");
            0.0
        } else {
            raw
        }
    }

    /// Rejects schedules whose fixed parameters are negative or not finite.
    ///
    /// Custom schedules are only checked when evaluated.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let check = |name: &'static str, value: f64| {
            if !value.is_finite() || value < 0.0 {
                Err(ConfigError::InvalidParameter {
                    name,
                    reason: format!("must be a finite non-negative temperature, got {value}"),
                })
            } else {
                Ok(())
            }
        };
        match self {
            Self::Constant(t) => check("temperature", *t),
            Self::Linear { from, to, .. } => {
                check("temperature.from", *from)?;
                check("temperature.to", *to)
            }
            Self::Custom(_) => Ok(()),
        }
    }
}

impl Default for TemperatureSchedule {
    fn default() -> Self {
        Self::Constant(0.0)
    }
}

impl fmt::Debug for TemperatureSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(t) => f.debug_tuple("Constant").field(t).finish(),
            Self::Linear { from, to, steps } => f
                .debug_struct("Linear")
                .field("from", from)
                .field("to", to)
                .field("steps", steps)
                .finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
