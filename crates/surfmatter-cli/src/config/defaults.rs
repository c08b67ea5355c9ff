/// Fallback values for settings that have a natural default.
///
/// Physical parameters of the integrator (`dt`, mobilities, speed, rotational diffusion,
/// temperature) and the constraint have no defaults and must be configured.
pub struct DefaultsConfig {
    pub steps: u64,
    pub snapshot_interval: u64,
    pub seed: u64,
    pub group: String,
    pub nematic: bool,
    pub track_velocity: bool,
    pub soft_k: f64,
    pub soft_a: f64,
    pub use_particle_radii: bool,
    pub output_dir: String,
    pub output_prefix: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            steps: 1000,
            snapshot_interval: 100,
            seed: 0,
            group: "all".to_string(),
            nematic: false,
            track_velocity: false,
            soft_k: 1.0,
            soft_a: 2.0,
            use_particle_radii: false,
            output_dir: "surfmatter-output".to_string(),
            output_prefix: "snapshot".to_string(),
        }
    }
}
