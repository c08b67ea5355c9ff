use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::Path;
use surfmatter::engine::temperature::TemperatureSchedule;
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileIntegratorConfig {
    pub dt: Option<f64>,
    pub mu: Option<f64>,
    pub mu_r: Option<f64>,
    pub v0: Option<f64>,
    pub nu_r: Option<f64>,
    pub nematic: Option<bool>,
    pub flip_tau: Option<f64>,
    pub track_velocity: Option<bool>,
    pub group: Option<String>,
    pub seed: Option<u64>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case", deny_unknown_fields)]
pub enum FileTemperatureConfig {
    Constant { value: f64 },
    Linear { from: f64, to: f64, steps: u64 },
}

impl From<FileTemperatureConfig> for TemperatureSchedule {
    fn from(p: FileTemperatureConfig) -> Self {
        match p {
            FileTemperatureConfig::Constant { value } => TemperatureSchedule::Constant(value),
            FileTemperatureConfig::Linear { from, to, steps } => {
                TemperatureSchedule::Linear { from, to, steps }
            }
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case", deny_unknown_fields)]
pub enum FileConstraintConfig {
    Plane {
        normal: Option<[f64; 3]>,
        offset: Option<f64>,
    },
    Sphere {
        centre: Option<[f64; 3]>,
        radius: f64,
    },
    Cylinder {
        origin: Option<[f64; 3]>,
        axis: Option<[f64; 3]>,
        radius: f64,
    },
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileSoftPairConfig {
    pub type_1: usize,
    pub type_2: usize,
    pub k: f64,
    pub a: f64,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileSoftPotentialConfig {
    pub k: Option<f64>,
    pub a: Option<f64>,
    pub use_particle_radii: Option<bool>,
    #[serde(default)]
    pub pair: Vec<FileSoftPairConfig>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FilePotentialConfig {
    pub soft: Option<FileSoftPotentialConfig>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case", deny_unknown_fields)]
pub enum FileAlignmentConfig {
    Polar { j: f64, cutoff: f64 },
    Nematic { j: f64, cutoff: f64 },
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileGroupConfig {
    pub name: String,
    pub types: Vec<usize>,
}

/// A ghost block; `source` and `target` are half-open `[start, end)` index ranges.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileGhostRegionConfig {
    pub role: String,
    pub source: [usize; 2],
    pub target: [usize; 2],
    pub shift: [f64; 3],
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileRunConfig {
    pub steps: Option<u64>,
    pub snapshot_interval: Option<u64>,
    pub output_prefix: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileConfig {
    pub integrator: Option<FileIntegratorConfig>,
    pub temperature: Option<FileTemperatureConfig>,
    pub constraint: Option<FileConstraintConfig>,
    pub potential: Option<FilePotentialConfig>,
    pub alignment: Option<FileAlignmentConfig>,
    #[serde(default)]
    pub group: Vec<FileGroupConfig>,
    #[serde(default)]
    pub ghost_region: Vec<FileGhostRegionConfig>,
    pub run: Option<FileRunConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn integrator_mut(&mut self) -> &mut FileIntegratorConfig {
        self.integrator.get_or_insert_with(Default::default)
    }

    pub fn soft_potential_mut(&mut self) -> &mut FileSoftPotentialConfig {
        self.potential
            .get_or_insert_with(Default::default)
            .soft
            .get_or_insert_with(Default::default)
    }
}
