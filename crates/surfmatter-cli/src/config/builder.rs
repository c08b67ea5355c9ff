use super::defaults::DefaultsConfig;
use super::file::{
    FileAlignmentConfig, FileConfig, FileConstraintConfig, FileGhostRegionConfig,
    FilePotentialConfig, FileTemperatureConfig,
};
use super::models::{AppConfig, GroupSpec};
use crate::cli::RunArgs;
use crate::error::{CliError, Result};
use nalgebra::{Point3, Vector3};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use surfmatter::core::constraints::{Constraint, Cylinder, Plane, Sphere};
use surfmatter::core::forcefield::ForceField;
use surfmatter::core::forcefield::alignment::{NematicAlignment, PolarAlignment};
use surfmatter::core::forcefield::pair::{SoftParameters, SoftPotential};
use surfmatter::engine::config as core_config;
use surfmatter::engine::ghosts::GhostRegion;

pub fn build_config(args: &RunArgs) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = FileConfig::from_file(&args.config)?;
    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let integrator_file = file_config.integrator.take().unwrap_or_default();
    let run_file = file_config.run.take().unwrap_or_default();

    let seed = args
        .seed
        .or(integrator_file.seed)
        .unwrap_or(defaults.seed);

    let mut builder = core_config::IntegratorConfigBuilder::new()
        .group(integrator_file.group.as_deref().unwrap_or(&defaults.group))
        .nematic(integrator_file.nematic.unwrap_or(defaults.nematic))
        .track_velocity(
            integrator_file
                .track_velocity
                .unwrap_or(defaults.track_velocity),
        )
        .seed(seed);
    if let Some(dt) = integrator_file.dt {
        builder = builder.dt(dt);
    }
    if let Some(mu) = integrator_file.mu {
        builder = builder.mu(mu);
    }
    if let Some(mu_r) = integrator_file.mu_r {
        builder = builder.mu_r(mu_r);
    }
    if let Some(v0) = integrator_file.v0 {
        builder = builder.v0(v0);
    }
    if let Some(nu_r) = integrator_file.nu_r {
        builder = builder.nu_r(nu_r);
    }
    if let Some(tau) = integrator_file.flip_tau {
        builder = builder.flip_tau(tau);
    }
    if let Some(temperature) = file_config.temperature.take() {
        builder = builder.temperature(temperature.into());
    }
    let integrator = builder
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    let constraint = build_constraint(file_config.constraint.take())?;
    let force_field = build_force_field(
        file_config.potential.take(),
        file_config.alignment.take(),
        &defaults,
    );
    let ghost_regions = file_config
        .ghost_region
        .iter()
        .map(build_ghost_region)
        .collect::<Result<Vec<_>>>()?;
    let groups = file_config
        .group
        .into_iter()
        .map(|g| GroupSpec {
            name: g.name,
            types: g.types,
        })
        .collect();

    let steps = args
        .steps
        .or(run_file.steps)
        .unwrap_or(defaults.steps);
    let snapshot_interval = args
        .snapshot_interval
        .or(run_file.snapshot_interval)
        .unwrap_or(defaults.snapshot_interval);
    let simulation =
        core_config::SimulationConfig::new(steps).with_snapshot_interval(snapshot_interval);

    Ok(AppConfig {
        input_path: args.input.clone(),
        output_dir: args
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from(&defaults.output_dir)),
        output_prefix: run_file.output_prefix.unwrap_or(defaults.output_prefix),
        integrator,
        constraint,
        force_field,
        groups,
        ghost_regions,
        simulation,
    })
}

fn build_constraint(file_val: Option<FileConstraintConfig>) -> Result<Arc<dyn Constraint>> {
    let file_val = file_val.ok_or_else(|| {
        CliError::Config(core_config::ConfigError::MissingParameter("constraint").to_string())
    })?;
    let constraint: Arc<dyn Constraint> = match file_val {
        FileConstraintConfig::Plane { normal, offset } => Arc::new(
            Plane::new(
                normal.map(Vector3::from).unwrap_or_else(Vector3::z),
                offset.unwrap_or(0.0),
            )
            .map_err(|e| CliError::Config(e.to_string()))?,
        ),
        FileConstraintConfig::Sphere { centre, radius } => Arc::new(
            Sphere::new(
                centre.map(Point3::from).unwrap_or_else(Point3::origin),
                radius,
            )
            .map_err(|e| CliError::Config(e.to_string()))?,
        ),
        FileConstraintConfig::Cylinder {
            origin,
            axis,
            radius,
        } => Arc::new(
            Cylinder::new(
                origin.map(Point3::from).unwrap_or_else(Point3::origin),
                axis.map(Vector3::from).unwrap_or_else(Vector3::z),
                radius,
            )
            .map_err(|e| CliError::Config(e.to_string()))?,
        ),
    };
    Ok(constraint)
}

fn build_force_field(
    potential: Option<FilePotentialConfig>,
    alignment: Option<FileAlignmentConfig>,
    defaults: &DefaultsConfig,
) -> ForceField {
    let mut force_field = ForceField::new();

    if let Some(soft) = potential.and_then(|p| p.soft) {
        let mut potential = SoftPotential::new(
            soft.k.unwrap_or(defaults.soft_k),
            soft.a.unwrap_or(defaults.soft_a),
        )
        .with_particle_radii(
            soft.use_particle_radii
                .unwrap_or(defaults.use_particle_radii),
        );
        for pair in soft.pair {
            potential.set_pair_parameters(
                pair.type_1,
                pair.type_2,
                SoftParameters {
                    k: pair.k,
                    a: pair.a,
                },
            );
        }
        force_field = force_field.with_potential(Box::new(potential));
    }

    match alignment {
        Some(FileAlignmentConfig::Polar { j, cutoff }) => {
            force_field = force_field.with_alignment(Box::new(PolarAlignment::new(j, cutoff)));
        }
        Some(FileAlignmentConfig::Nematic { j, cutoff }) => {
            force_field = force_field.with_alignment(Box::new(NematicAlignment::new(j, cutoff)));
        }
        None => {}
    }

    force_field
}

fn build_ghost_region(file_val: &FileGhostRegionConfig) -> Result<GhostRegion> {
    let [source_start, source_end] = file_val.source;
    let [target_start, target_end] = file_val.target;
    GhostRegion::new(
        &file_val.role,
        source_start..source_end,
        target_start..target_end,
        Vector3::from(file_val.shift),
    )
    .map_err(|e| CliError::Config(e.to_string()))
}

fn parse_value<T: FromStr>(key: &str, value_str: &str, kind: &str) -> Result<T> {
    value_str.parse().map_err(|_| {
        CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value_str))
    })
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    if set_values.is_empty() {
        return Ok(config);
    }
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };
        let (key, value_str) = (key.trim(), value_str.trim());

        match key {
            "integrator.dt" => {
                config.integrator_mut().dt = Some(parse_value(key, value_str, "float")?);
            }
            "integrator.mu" => {
                config.integrator_mut().mu = Some(parse_value(key, value_str, "float")?);
            }
            "integrator.mu-r" => {
                config.integrator_mut().mu_r = Some(parse_value(key, value_str, "float")?);
            }
            "integrator.v0" => {
                config.integrator_mut().v0 = Some(parse_value(key, value_str, "float")?);
            }
            "integrator.nu-r" => {
                config.integrator_mut().nu_r = Some(parse_value(key, value_str, "float")?);
            }
            "integrator.flip-tau" => {
                config.integrator_mut().flip_tau = Some(parse_value(key, value_str, "float")?);
            }
            "integrator.nematic" => {
                config.integrator_mut().nematic = Some(parse_value(key, value_str, "boolean")?);
            }
            "integrator.track-velocity" => {
                config.integrator_mut().track_velocity =
                    Some(parse_value(key, value_str, "boolean")?);
            }
            "integrator.seed" => {
                config.integrator_mut().seed = Some(parse_value(key, value_str, "integer")?);
            }
            "integrator.group" => {
                config.integrator_mut().group = Some(value_str.to_string());
            }
            "temperature.value" => {
                config.temperature = Some(FileTemperatureConfig::Constant {
                    value: parse_value(key, value_str, "float")?,
                });
            }
            "potential.soft.k" => {
                config.soft_potential_mut().k = Some(parse_value(key, value_str, "float")?);
            }
            "potential.soft.a" => {
                config.soft_potential_mut().a = Some(parse_value(key, value_str, "float")?);
            }
            "run.steps" => {
                config.run.get_or_insert_with(Default::default).steps =
                    Some(parse_value(key, value_str, "integer")?);
            }
            "run.snapshot-interval" => {
                config
                    .run
                    .get_or_insert_with(Default::default)
                    .snapshot_interval = Some(parse_value(key, value_str, "integer")?);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}
