use crate::core::forcefield::term::EnergyTerm;
use crate::core::models::particle::Particle;
use crate::core::models::system::ParticleSystem;
use crate::engine::config::SimulationConfig;
use crate::engine::error::EngineError;
use crate::engine::integrator::BrownianIntegrator;
use crate::engine::progress::{Progress, ProgressReporter};
use serde::Serialize;
use tracing::{info, instrument};

/// Aggregate description of a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SimulationSummary {
    pub steps_run: u64,
    pub final_step: u64,
    pub total_flips: u64,
    pub snapshots_written: u64,
    pub final_temperature: f64,
    /// Mean of `| |n| - 1 |` over the integrated group.
    pub mean_director_deviation: f64,
    pub max_director_deviation: f64,
    pub mean_speed: f64,
    pub final_energy: EnergyTerm,
}

/// Runs `config.steps` integration steps on `system`.
///
/// `on_snapshot` is called once with the initial configuration and then after every step
/// whose index is a multiple of the snapshot interval. The first error from either the
/// integrator or the callback stops the run.
#[instrument(skip_all, name = "simulation_workflow", fields(steps = config.steps))]
pub fn run<F>(
    system: &mut ParticleSystem,
    integrator: &mut BrownianIntegrator,
    config: &SimulationConfig,
    reporter: &ProgressReporter,
    mut on_snapshot: F,
) -> Result<SimulationSummary, EngineError>
where
    F: FnMut(&ParticleSystem) -> Result<(), EngineError>,
{
    info!(
        particles = system.len(),
        group = integrator.config().group.as_str(),
        start_step = system.run_step(),
        "Starting simulation."
    );
    reporter.report(Progress::RunStart {
        total_steps: config.steps,
    });

    let mut summary = SimulationSummary::default();

    on_snapshot(system)?;
    summary.snapshots_written += 1;
    reporter.report(Progress::SnapshotWritten {
        step: system.run_step(),
    });

    let flips_before = integrator.total_flips();
    for _ in 0..config.steps {
        let report = integrator.integrate(system)?;
        system.advance_step();
        summary.steps_run += 1;
        summary.final_temperature = report.temperature;
        summary.final_energy = report.energy;

        let step = system.run_step();
        reporter.report(Progress::StepFinished { step });

        if config
            .snapshot_interval
            .is_some_and(|interval| step % interval == 0)
        {
            on_snapshot(system)?;
            summary.snapshots_written += 1;
            reporter.report(Progress::SnapshotWritten { step });
        }
    }

    summary.final_step = system.run_step();
    summary.total_flips = integrator.total_flips() - flips_before;

    let group_particles: Vec<&Particle> = match system.group(&integrator.config().group) {
        Some(group) => group
            .indices()
            .iter()
            .filter_map(|&i| system.particle(i))
            .collect(),
        None => system.particles().iter().collect(),
    };
    let (mean_dev, max_dev, mean_speed) = director_and_speed_statistics(&group_particles);
    summary.mean_director_deviation = mean_dev;
    summary.max_director_deviation = max_dev;
    summary.mean_speed = mean_speed;

    reporter.report(Progress::RunFinish);
    info!(
        steps = summary.steps_run,
        final_step = summary.final_step,
        flips = summary.total_flips,
        mean_speed = summary.mean_speed,
        "Simulation finished."
    );
    Ok(summary)
}

fn director_and_speed_statistics(particles: &[&Particle]) -> (f64, f64, f64) {
    if particles.is_empty() {
        return (0.0, 0.0, 0.0);
    }
    let n = particles.len() as f64;
    let deviations = particles.iter().map(|p| (p.director.norm() - 1.0).abs());
    let mean_dev = deviations.clone().sum::<f64>() / n;
    let max_dev = deviations.fold(0.0, f64::max);
    let mean_speed = particles.iter().map(|p| p.velocity.norm()).sum::<f64>() / n;
    (mean_dev, max_dev, mean_speed)
}
