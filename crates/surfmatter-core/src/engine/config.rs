use super::temperature::TemperatureSchedule;
use crate::core::models::group::ALL_GROUP;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Immutable parameters of the Brownian integrator.
#[derive(Debug, Clone)]
pub struct IntegratorConfig {
    /// Name of the particle group the integrator advances.
    pub group: String,
    /// Time step.
    pub dt: f64,
    /// Translational mobility.
    pub mu: f64,
    /// Rotational mobility.
    pub mu_r: f64,
    /// Self-propulsion speed.
    pub v0: f64,
    /// Rotational diffusion constant.
    pub nu_r: f64,
    /// Enables random director reversal.
    pub nematic: bool,
    /// Mean time between director reversals; only meaningful when `nematic` is set.
    pub flip_tau: Option<f64>,
    /// Rotates the velocity together with the director.
    pub track_velocity: bool,
    /// Seed of the noise model.
    pub seed: u64,
    pub temperature: TemperatureSchedule,
}

impl IntegratorConfig {
    /// Amplitude of the rotational noise, `sqrt(2 nu_r dt)`.
    pub fn stochastic_coefficient(&self) -> f64 {
        (2.0 * self.nu_r * self.dt).sqrt()
    }

    /// Per-step probability of reversing a director, `dt / tau`, or zero when nematic
    /// flipping is off.
    pub fn flip_probability(&self) -> f64 {
        match (self.nematic, self.flip_tau) {
            (true, Some(tau)) => self.dt / tau,
            _ => 0.0,
        }
    }
}

#[derive(Default)]
pub struct IntegratorConfigBuilder {
    group: Option<String>,
    dt: Option<f64>,
    mu: Option<f64>,
    mu_r: Option<f64>,
    v0: Option<f64>,
    nu_r: Option<f64>,
    nematic: bool,
    flip_tau: Option<f64>,
    track_velocity: bool,
    seed: u64,
    temperature: Option<TemperatureSchedule>,
}

impl IntegratorConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn group(mut self, name: &str) -> Self {
        self.group = Some(name.to_string());
        self
    }
    pub fn dt(mut self, dt: f64) -> Self {
        self.dt = Some(dt);
        self
    }
    pub fn mu(mut self, mu: f64) -> Self {
        self.mu = Some(mu);
        self
    }
    pub fn mu_r(mut self, mu_r: f64) -> Self {
        self.mu_r = Some(mu_r);
        self
    }
    pub fn v0(mut self, v0: f64) -> Self {
        self.v0 = Some(v0);
        self
    }
    pub fn nu_r(mut self, nu_r: f64) -> Self {
        self.nu_r = Some(nu_r);
        self
    }
    pub fn nematic(mut self, enabled: bool) -> Self {
        self.nematic = enabled;
        self
    }
    pub fn flip_tau(mut self, tau: f64) -> Self {
        self.flip_tau = Some(tau);
        self
    }
    pub fn track_velocity(mut self, enabled: bool) -> Self {
        self.track_velocity = enabled;
        self
    }
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
    pub fn temperature(mut self, schedule: TemperatureSchedule) -> Self {
        self.temperature = Some(schedule);
        self
    }

    pub fn build(self) -> Result<IntegratorConfig, ConfigError> {
        let dt = self.dt.ok_or(ConfigError::MissingParameter("dt"))?;
        let mu = self.mu.ok_or(ConfigError::MissingParameter("mu"))?;
        let mu_r = self.mu_r.ok_or(ConfigError::MissingParameter("mu_r"))?;
        let v0 = self.v0.ok_or(ConfigError::MissingParameter("v0"))?;
        let nu_r = self.nu_r.ok_or(ConfigError::MissingParameter("nu_r"))?;
        let temperature = self
            .temperature
            .ok_or(ConfigError::MissingParameter("temperature"))?;

        positive("dt", dt)?;
        non_negative("mu", mu)?;
        non_negative("mu_r", mu_r)?;
        finite("v0", v0)?;
        non_negative("nu_r", nu_r)?;
        temperature.validate()?;

        let flip_tau = if self.nematic {
            let tau = self
                .flip_tau
                .ok_or(ConfigError::MissingParameter("flip_tau"))?;
            positive("flip_tau", tau)?;
            if dt > tau {
                warn!(dt, tau, "flip_tau is shorter than dt; every director flips each step");
            }
            Some(tau)
        } else {
            if self.flip_tau.is_some() {
                warn!("flip_tau is ignored because nematic flipping is disabled");
            }
            None
        };

        Ok(IntegratorConfig {
            group: self.group.unwrap_or_else(|| ALL_GROUP.to_string()),
            dt,
            mu,
            mu_r,
            v0,
            nu_r,
            nematic: self.nematic,
            flip_tau,
            track_velocity: self.track_velocity,
            seed: self.seed,
            temperature,
        })
    }
}

fn finite(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter {
            name,
            reason: format!("must be finite, got {value}"),
        })
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    finite(name, value)?;
    if value < 0.0 {
        return Err(ConfigError::InvalidParameter {
            name,
            reason: format!("must not be negative, got {value}"),
        });
    }
    Ok(())
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    finite(name, value)?;
    if value <= 0.0 {
        return Err(ConfigError::InvalidParameter {
            name,
            reason: format!("must be positive, got {value}"),
        });
    }
    Ok(())
}

/// Length and output cadence of a multi-step run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationConfig {
    pub steps: u64,
    /// Steps between snapshots; `None` writes only the initial configuration.
    pub snapshot_interval: Option<u64>,
}

impl SimulationConfig {
    pub fn new(steps: u64) -> Self {
        Self {
            steps,
            snapshot_interval: None,
        }
    }

    pub fn with_snapshot_interval(mut self, interval: u64) -> Self {
        self.snapshot_interval = (interval > 0).then_some(interval);
        self
    }
}
