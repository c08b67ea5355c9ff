use crate::cli::RunArgs;
use crate::config::builder::build_config;
use crate::config::models::GroupSpec;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use std::path::{Path, PathBuf};
use surfmatter::{
    core::io::{
        dat::{DatFile, DatMetadata},
        traits::ParticleFile,
    },
    core::models::system::ParticleSystem,
    engine::{error::EngineError, integrator::BrownianIntegrator, progress::ProgressReporter},
    workflows,
};
use tracing::{info, warn};

pub const SUMMARY_FILE_NAME: &str = "summary.toml";
const STEP_HEADER_PREFIX: &str = "step ";

pub fn run(args: RunArgs) -> Result<()> {
    info!("Building configuration from file and CLI arguments...");
    let app = build_config(&args)?;

    info!("Loading initial configuration from {:?}", &app.input_path);
    let (mut system, metadata) =
        DatFile::read_from_path(&app.input_path).map_err(|e| CliError::FileParsing {
            path: app.input_path.clone(),
            source: e.into(),
        })?;
    info!(particles = system.len(), "Initial configuration loaded.");

    register_groups(&mut system, &app.groups)?;

    std::fs::create_dir_all(&app.output_dir)?;

    let mut builder = BrownianIntegrator::builder()
        .config(app.integrator)
        .constraint(app.constraint)
        .force_field(app.force_field);
    for region in app.ghost_regions {
        builder = builder.ghost_region(region);
    }
    let mut integrator = builder.build().map_err(EngineError::from)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Integrating {} particles for {} steps...",
        system.len(),
        app.simulation.steps
    );

    let output_dir = app.output_dir.as_path();
    let prefix = app.output_prefix.as_str();
    let summary = workflows::simulate::run(
        &mut system,
        &mut integrator,
        &app.simulation,
        &reporter,
        |snapshot| {
            let step = snapshot.run_step();
            let path = snapshot_path(output_dir, prefix, step);
            write_snapshot(snapshot, &metadata, step, &path).map_err(|e| {
                EngineError::Snapshot {
                    step,
                    message: e.to_string(),
                }
            })
        },
    )?;

    let final_path = output_dir.join(format!("{}_final.dat", prefix));
    write_snapshot(&system, &metadata, summary.final_step, &final_path)?;

    let summary_path = output_dir.join(SUMMARY_FILE_NAME);
    let summary_toml =
        toml::to_string_pretty(&summary).map_err(|e| CliError::FileWriting {
            path: summary_path.clone(),
            source: e.into(),
        })?;
    std::fs::write(&summary_path, summary_toml)?;

    if summary.max_director_deviation > 1e-6 {
        warn!(
            deviation = summary.max_director_deviation,
            "Directors drifted away from unit length."
        );
    }

    println!(
        "✓ {} steps completed ({} snapshots, {} director flips).",
        summary.steps_run, summary.snapshots_written, summary.total_flips
    );
    println!("  Final configuration written to: {}", final_path.display());
    println!("  Run summary written to: {}", summary_path.display());

    Ok(())
}

fn register_groups(system: &mut ParticleSystem, groups: &[GroupSpec]) -> Result<()> {
    for selection in groups {
        let indices: Vec<usize> = system
            .particles()
            .iter()
            .enumerate()
            .filter(|(_, p)| selection.types.contains(&p.particle_type))
            .map(|(i, _)| i)
            .collect();
        if indices.is_empty() {
            warn!(group = selection.name.as_str(), types = ?selection.types, "Group matches no particles.");
        }
        info!(group = selection.name.as_str(), size = indices.len(), "Registering group.");
        system
            .add_group(&selection.name, indices)
            .map_err(EngineError::from)?;
    }
    Ok(())
}

fn snapshot_path(output_dir: &Path, prefix: &str, step: u64) -> PathBuf {
    output_dir.join(format!("{}_{:010}.dat", prefix, step))
}

fn write_snapshot(
    system: &ParticleSystem,
    metadata: &DatMetadata,
    step: u64,
    path: &Path,
) -> Result<()> {
    let mut header = metadata.clone();
    header
        .header_lines
        .retain(|line| !line.starts_with(STEP_HEADER_PREFIX));
    header
        .header_lines
        .push(format!("{}{}", STEP_HEADER_PREFIX, step));
    DatFile::write_to_path(system, &header, path).map_err(|e| CliError::FileWriting {
        path: path.to_path_buf(),
        source: e.into(),
    })
}
