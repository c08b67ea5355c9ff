use std::path::PathBuf;
use std::sync::Arc;
use surfmatter::core::constraints::Constraint;
use surfmatter::core::forcefield::ForceField;
use surfmatter::engine::config::{IntegratorConfig, SimulationConfig};
use surfmatter::engine::ghosts::GhostRegion;

/// A named group selected by particle type once the input has been read.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSpec {
    pub name: String,
    pub types: Vec<usize>,
}

#[derive(Debug)]
pub struct AppConfig {
    pub input_path: PathBuf,
    pub output_dir: PathBuf,
    pub output_prefix: String,
    pub integrator: IntegratorConfig,
    pub constraint: Arc<dyn Constraint>,
    pub force_field: ForceField,
    pub groups: Vec<GroupSpec>,
    pub ghost_regions: Vec<GhostRegion>,
    pub simulation: SimulationConfig,
}
