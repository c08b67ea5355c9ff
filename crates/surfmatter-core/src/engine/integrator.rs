use super::config::{ConfigError, IntegratorConfig};
use super::error::EngineError;
use super::ghosts::GhostRegion;
use super::noise::{NoiseChannel, NoiseModel};
use crate::core::constraints::{Constraint, ConstraintError};
use crate::core::forcefield::ForceField;
use crate::core::forcefield::term::EnergyTerm;
use crate::core::models::group::Group;
use crate::core::models::particle::Particle;
use crate::core::models::system::ParticleSystem;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, instrument, trace};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Outcome of a single integration step.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct StepReport {
    pub step: u64,
    /// Temperature actually used, after clamping.
    pub temperature: f64,
    pub flips: usize,
    pub energy: EnergyTerm,
}

/// Per-step constants shared by every particle update.
#[derive(Debug, Clone, Copy)]
struct StepParameters {
    noise_key: u64,
    dt: f64,
    sqrt_dt: f64,
    mu: f64,
    mu_r: f64,
    v0: f64,
    temperature: f64,
    thermal_amplitude: f64,
    rotational_noise: f64,
    track_velocity: bool,
}

/// Overdamped Langevin integrator for self-propelled particles on a constraint surface.
///
/// Each call to [`integrate`](Self::integrate) advances the configured group by one time
/// step: optional director flips, force and torque evaluation, Euler-Maruyama translation
/// with thermal noise, projection back onto the surface, and a rotation of the director
/// about the local normal driven by the projected torque and rotational noise.
#[derive(Debug)]
pub struct BrownianIntegrator {
    config: IntegratorConfig,
    constraint: Arc<dyn Constraint>,
    force_field: ForceField,
    noise: NoiseModel,
    ghost_regions: Vec<GhostRegion>,
    total_flips: u64,
    steps_taken: u64,
}

impl BrownianIntegrator {
    pub fn builder() -> BrownianIntegratorBuilder {
        BrownianIntegratorBuilder::new()
    }

    pub fn config(&self) -> &IntegratorConfig {
        &self.config
    }

    pub fn constraint(&self) -> &dyn Constraint {
        self.constraint.as_ref()
    }

    pub fn force_field(&self) -> &ForceField {
        &self.force_field
    }

    pub fn ghost_regions(&self) -> &[GhostRegion] {
        &self.ghost_regions
    }

    /// Number of director reversals performed since construction.
    pub fn total_flips(&self) -> u64 {
        self.total_flips
    }

    /// Number of `integrate` calls that passed validation; keys the noise streams.
    pub fn steps_taken(&self) -> u64 {
        self.steps_taken
    }

    /// Advances every particle of the configured group by one time step.
    ///
    /// The temperature schedule is evaluated at the system's current `run_step`, and
    /// advancing it is left to the caller. Noise streams are keyed on this integrator's
    /// own step count instead, so repeated calls at the same `run_step` still draw fresh
    /// noise. Lookup failures are reported before any particle is touched.
    #[instrument(level = "debug", skip_all, fields(step = system.run_step()))]
    pub fn integrate(&mut self, system: &mut ParticleSystem) -> Result<StepReport, EngineError> {
        let group = system
            .group(&self.config.group)
            .ok_or_else(|| EngineError::GroupNotFound(self.config.group.clone()))?
            .clone();
        if group.is_empty() {
            return Err(EngineError::EmptyGroup(group.name));
        }
        for region in &self.ghost_regions {
            region.check_bounds(system.len())?;
        }

        let step = system.run_step();
        let noise_key = self.steps_taken;
        self.steps_taken += 1;
        let temperature = self.config.temperature.value(step);
        let params = StepParameters {
            noise_key,
            dt: self.config.dt,
            sqrt_dt: self.config.dt.sqrt(),
            mu: self.config.mu,
            mu_r: self.config.mu_r,
            v0: self.config.v0,
            temperature,
            thermal_amplitude: (2.0 * self.config.mu * temperature).sqrt(),
            rotational_noise: self.config.stochastic_coefficient(),
            track_velocity: self.config.track_velocity,
        };

        let flips = if self.config.nematic {
            self.flip_directors(system, &group, noise_key)
        } else {
            0
        };
        self.total_flips += flips as u64;

        self.force_field.reset(system);
        let energy = self
            .force_field
            .compute(system, &group, self.constraint.as_ref(), params.dt)
            .map_err(|source| EngineError::ForceField { source })?;

        self.advance_group(system, &group, &params)?;

        for region in &self.ghost_regions {
            region.apply(system.particles_mut());
            trace!(role = region.role(), count = region.len(), "Ghost region refreshed");
        }
        system.update_mesh();

        debug!(
            temperature,
            flips,
            energy = energy.total(),
            "Integration step complete"
        );

        Ok(StepReport {
            step,
            temperature,
            flips,
            energy,
        })
    }

    fn flip_directors(&self, system: &mut ParticleSystem, group: &Group, noise_key: u64) -> usize {
        let probability = self.config.flip_probability();
        let mut flips = 0;
        for &index in group.indices() {
            let draw = self.noise.stream(noise_key, index, NoiseChannel::Flip).uniform();
            if draw < probability {
                if let Some(particle) = system.particle_mut(index) {
                    particle.flip(self.config.track_velocity);
                    flips += 1;
                }
            }
        }
        flips
    }

    fn advance_group(
        &self,
        system: &mut ParticleSystem,
        group: &Group,
        params: &StepParameters,
    ) -> Result<(), EngineError> {
        let mask = group.mask(system.len());
        let constraint = self.constraint.as_ref();
        let noise = &self.noise;

        #[cfg(not(feature = "parallel"))]
        let iterator = system.particles_mut().iter_mut();

        #[cfg(feature = "parallel")]
        let iterator = system.particles_mut().par_iter_mut();

        iterator
            .enumerate()
            .filter(|(index, _)| mask[*index])
            .try_for_each(|(index, particle)| {
                advance_particle(particle, index, params, constraint, noise)
                    .map_err(|source| EngineError::Constraint { index, source })
            })
    }
}

/// Translates, projects, and rotates one particle. Reads and writes only that particle.
fn advance_particle(
    particle: &mut Particle,
    index: usize,
    params: &StepParameters,
    constraint: &dyn Constraint,
    noise: &NoiseModel,
) -> Result<(), ConstraintError> {
    let drift = particle.director * params.v0 + particle.force * params.mu;
    particle.velocity = drift;
    particle.position += drift * params.dt;

    if params.temperature > 0.0 {
        let kick = noise
            .stream(params.noise_key, index, NoiseChannel::Translation)
            .gaussian_vector()
            * params.thermal_amplitude;
        particle.velocity += kick;
        particle.position += kick * params.sqrt_dt;
    }

    constraint.enforce(particle)?;

    particle.omega = params.mu_r * constraint.project_torque(particle)?;
    let xi = noise
        .stream(params.noise_key, index, NoiseChannel::Rotation)
        .gaussian();
    let dtheta = params.dt * particle.omega + params.rotational_noise * xi;

    constraint.rotate_director(particle, dtheta)?;
    if params.track_velocity {
        constraint.rotate_velocity(particle, dtheta)?;
    }

    particle.age += params.dt;
    Ok(())
}

#[derive(Debug, Default)]
pub struct BrownianIntegratorBuilder {
    config: Option<IntegratorConfig>,
    constraint: Option<Arc<dyn Constraint>>,
    force_field: Option<ForceField>,
    ghost_regions: Vec<GhostRegion>,
}

impl BrownianIntegratorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: IntegratorConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn constraint(mut self, constraint: Arc<dyn Constraint>) -> Self {
        self.constraint = Some(constraint);
        self
    }

    pub fn force_field(mut self, force_field: ForceField) -> Self {
        self.force_field = Some(force_field);
        self
    }

    pub fn ghost_region(mut self, region: GhostRegion) -> Self {
        self.ghost_regions.push(region);
        self
    }

    pub fn build(self) -> Result<BrownianIntegrator, ConfigError> {
        let config = self.config.ok_or(ConfigError::MissingParameter("config"))?;
        let constraint = self
            .constraint
            .ok_or(ConfigError::MissingParameter("constraint"))?;
        let noise = NoiseModel::new(config.seed);

        Ok(BrownianIntegrator {
            config,
            constraint,
            force_field: self.force_field.unwrap_or_default(),
            noise,
            ghost_regions: self.ghost_regions,
            total_flips: 0,
            steps_taken: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constraints::{Plane, Sphere};
    use crate::core::forcefield::alignment::PolarAlignment;
    use crate::core::forcefield::pair::SoftPotential;
    use crate::core::models::group::ALL_GROUP;
    use crate::engine::config::IntegratorConfigBuilder;
    use crate::engine::temperature::TemperatureSchedule;
    use nalgebra::{Point3, Vector3};

    fn base_config() -> IntegratorConfigBuilder {
        IntegratorConfigBuilder::new()
            .dt(0.1)
            .mu(1.0)
            .mu_r(1.0)
            .v0(1.0)
            .nu_r(0.0)
            .temperature(TemperatureSchedule::Constant(0.0))
    }

    fn integrator(config: IntegratorConfig, constraint: Arc<dyn Constraint>) -> BrownianIntegrator {
        BrownianIntegrator::builder()
            .config(config)
            .constraint(constraint)
            .build()
            .unwrap()
    }

    fn plane_lattice(n: usize) -> ParticleSystem {
        let mut system = ParticleSystem::new();
        for i in 0..n {
            let angle = i as f64 * 0.37;
            system.add_particle(Particle::new(
                i,
                Point3::new((i % 50) as f64 * 3.0, (i / 50) as f64 * 3.0, 0.0),
                Vector3::new(angle.cos(), angle.sin(), 0.0),
            ));
        }
        system
    }

    fn sphere_system(n: usize, radius: f64) -> ParticleSystem {
        let mut system = ParticleSystem::new();
        for i in 0..n {
            let theta = 0.3 + 2.5 * (i as f64 / n as f64);
            let phi = i as f64 * 2.399_963;
            let position = Point3::new(
                radius * theta.sin() * phi.cos(),
                radius * theta.sin() * phi.sin(),
                radius * theta.cos(),
            );
            let tangent = Vector3::new(-phi.sin(), phi.cos(), 0.0);
            system.add_particle(Particle::new(i, position, tangent));
        }
        system
    }

    #[test]
    fn build_fails_without_constraint() {
        let err = BrownianIntegrator::builder()
            .config(base_config().build().unwrap())
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::MissingParameter("constraint"));
    }

    #[test]
    fn single_particle_on_flat_plane_moves_by_drift() {
        let mut system = ParticleSystem::from_particles(vec![Particle::new(
            0,
            Point3::origin(),
            Vector3::x(),
        )]);
        let mut integrator = integrator(base_config().build().unwrap(), Arc::new(Plane::xy()));

        let report = integrator.integrate(&mut system).unwrap();

        let p = system.particle(0).unwrap();
        assert_eq!(p.position, Point3::new(0.1, 0.0, 0.0));
        assert_eq!(p.velocity, Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(p.director, Vector3::x());
        assert_eq!(p.omega, 0.0);
        assert!((p.age - 0.1).abs() < 1e-15);
        assert_eq!(report.temperature, 0.0);
        assert_eq!(report.flips, 0);
    }

    #[test]
    fn symmetric_pair_moves_symmetrically() {
        let mut system = ParticleSystem::from_particles(vec![
            Particle::new(0, Point3::new(-1.0, 0.0, 0.0), -Vector3::x()),
            Particle::new(1, Point3::new(1.0, 0.0, 0.0), Vector3::x()),
        ]);
        let force_field = ForceField::new().with_potential(Box::new(SoftPotential::new(1.0, 2.0)));
        let mut integrator = BrownianIntegrator::builder()
            .config(base_config().build().unwrap())
            .constraint(Arc::new(Plane::xy()))
            .force_field(force_field)
            .build()
            .unwrap();

        integrator.integrate(&mut system).unwrap();

        let a = system.particle(0).unwrap();
        let b = system.particle(1).unwrap();
        assert!((a.position.x + 1.1).abs() < 1e-12);
        assert!((b.position.x - 1.1).abs() < 1e-12);
        assert_eq!(a.position.x, -b.position.x);
        assert_eq!(a.position.y, 0.0);
        assert_eq!(b.position.y, 0.0);
    }

    #[test]
    fn director_stays_unit_and_tangent_on_sphere_with_noise() {
        let radius = 5.0;
        let mut system = sphere_system(200, radius);
        let config = base_config()
            .nu_r(0.8)
            .temperature(TemperatureSchedule::Constant(0.3))
            .seed(11)
            .build()
            .unwrap();
        let force_field = ForceField::new()
            .with_potential(Box::new(SoftPotential::new(10.0, 1.0)))
            .with_alignment(Box::new(PolarAlignment::new(0.5, 1.5)));
        let mut integrator = BrownianIntegrator::builder()
            .config(config)
            .constraint(Arc::new(Sphere::new(Point3::origin(), radius).unwrap()))
            .force_field(force_field)
            .build()
            .unwrap();

        for _ in 0..20 {
            integrator.integrate(&mut system).unwrap();
            system.advance_step();
        }

        for p in system.particles() {
            let normal = p.position.coords / p.position.coords.norm();
            assert!((p.director.norm() - 1.0).abs() < 1e-9);
            assert!(p.director.dot(&normal).abs() < 1e-9);
            assert!((p.position.coords.norm() - radius).abs() < 1e-9);
        }
    }

    #[test]
    fn zero_temperature_runs_are_bit_identical() {
        let config = base_config().nu_r(0.5).seed(3).build().unwrap();
        let run = || {
            let mut system = plane_lattice(100);
            let mut integrator = integrator(config.clone(), Arc::new(Plane::xy()));
            for _ in 0..10 {
                integrator.integrate(&mut system).unwrap();
                system.advance_step();
            }
            system.particles().to_vec()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn zero_temperature_skips_translational_noise() {
        let mut system = plane_lattice(50);
        let before = system.particles().to_vec();
        let config = base_config().v0(0.0).nu_r(1.0).build().unwrap();
        let mut integrator = integrator(config, Arc::new(Plane::xy()));

        integrator.integrate(&mut system).unwrap();

        for (old, new) in before.iter().zip(system.particles()) {
            assert_eq!(old.position, new.position);
            assert_eq!(new.velocity, Vector3::zeros());
        }
    }

    #[test]
    fn displacement_variance_matches_fluctuation_dissipation() {
        let (mu, temperature, dt) = (0.5, 2.0, 0.01);
        let n = 20_000;
        let mut system = ParticleSystem::from_particles(
            (0..n)
                .map(|i| Particle::new(i, Point3::origin(), Vector3::x()))
                .collect(),
        );
        let config = base_config()
            .dt(dt)
            .mu(mu)
            .v0(0.0)
            .temperature(TemperatureSchedule::Constant(temperature))
            .seed(99)
            .build()
            .unwrap();
        let mut integrator = integrator(config, Arc::new(Plane::xy()));

        integrator.integrate(&mut system).unwrap();

        let expected = 2.0 * mu * temperature * dt;
        for component in [0, 1] {
            let samples: Vec<f64> = system
                .particles()
                .iter()
                .map(|p| p.position.coords[component])
                .collect();
            let mean = samples.iter().sum::<f64>() / n as f64;
            let var = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
            assert!(
                (var / expected - 1.0).abs() < 0.05,
                "component {component}: variance {var}, expected {expected}"
            );
        }
    }

    #[test]
    fn velocity_noise_is_not_scaled_by_timestep() {
        let (mu, temperature, dt) = (0.5, 2.0, 0.01);
        let n = 20_000;
        let mut system = ParticleSystem::from_particles(
            (0..n)
                .map(|i| Particle::new(i, Point3::origin(), Vector3::x()))
                .collect(),
        );
        let config = base_config()
            .dt(dt)
            .mu(mu)
            .v0(0.0)
            .temperature(TemperatureSchedule::Constant(temperature))
            .seed(5)
            .build()
            .unwrap();
        let mut integrator = integrator(config, Arc::new(Plane::xy()));

        integrator.integrate(&mut system).unwrap();

        let expected = 2.0 * mu * temperature;
        for component in [0, 1] {
            let samples: Vec<f64> = system
                .particles()
                .iter()
                .map(|p| p.velocity[component])
                .collect();
            let mean = samples.iter().sum::<f64>() / n as f64;
            let var = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
            assert!(
                (var / expected - 1.0).abs() < 0.05,
                "component {component}: variance {var}, expected {expected}"
            );
        }
    }

    #[test]
    fn repeated_calls_at_same_step_draw_fresh_noise() {
        let mut system = ParticleSystem::from_particles(vec![Particle::new(
            0,
            Point3::origin(),
            Vector3::x(),
        )]);
        let config = base_config()
            .v0(0.0)
            .nu_r(1.0)
            .temperature(TemperatureSchedule::Constant(1.0))
            .seed(2)
            .build()
            .unwrap();
        let mut integrator = integrator(config, Arc::new(Plane::xy()));

        let start = system.particle(0).unwrap().clone();
        integrator.integrate(&mut system).unwrap();
        let middle = system.particle(0).unwrap().clone();
        integrator.integrate(&mut system).unwrap();
        let end = system.particle(0).unwrap().clone();

        assert_eq!(system.run_step(), 0);
        assert_eq!(integrator.steps_taken(), 2);
        let first = middle.position - start.position;
        let second = end.position - middle.position;
        assert_ne!(first, second);
        assert_ne!(middle.velocity, end.velocity);
    }

    #[test]
    fn directors_never_flip_when_nematic_is_off() {
        let mut system = plane_lattice(20);
        let before = system.particles().to_vec();
        let config = base_config().v0(0.0).flip_tau(0.01).build().unwrap();
        let mut integrator = integrator(config, Arc::new(Plane::xy()));

        for _ in 0..50 {
            let report = integrator.integrate(&mut system).unwrap();
            assert_eq!(report.flips, 0);
            system.advance_step();
        }

        for (old, new) in before.iter().zip(system.particles()) {
            assert_eq!(old.director, new.director);
        }
        assert_eq!(integrator.total_flips(), 0);
    }

    #[test]
    fn flip_frequency_matches_probability() {
        let mut system = ParticleSystem::from_particles(vec![Particle::new(
            0,
            Point3::origin(),
            Vector3::x(),
        )]);
        // p = dt / tau = 0.3
        let config = base_config()
            .v0(0.0)
            .nematic(true)
            .flip_tau(0.1 / 0.3)
            .seed(17)
            .build()
            .unwrap();
        let mut integrator = integrator(config, Arc::new(Plane::xy()));

        let trials = 20_000;
        let mut flips = 0;
        for _ in 0..trials {
            flips += integrator.integrate(&mut system).unwrap().flips;
            system.advance_step();
        }

        let frequency = flips as f64 / trials as f64;
        assert!((frequency - 0.3).abs() < 0.02, "frequency = {frequency}");
        assert_eq!(integrator.total_flips(), flips as u64);
    }

    #[test]
    fn flip_reverses_velocity_only_when_tracked() {
        let make = |track: bool| {
            let mut system = ParticleSystem::from_particles(vec![
                Particle::new(0, Point3::origin(), Vector3::x())
                    .with_velocity(Vector3::new(0.0, 2.0, 0.0)),
            ]);
            let config = base_config()
                .v0(0.0)
                .nematic(true)
                .flip_tau(0.05)
                .track_velocity(track)
                .build()
                .unwrap();
            let integrator = integrator(config, Arc::new(Plane::xy()));
            integrator.flip_directors(&mut system, &Group::new(ALL_GROUP, vec![0]), 0);
            system.particle(0).unwrap().clone()
        };

        let tracked = make(true);
        assert_eq!(tracked.director, -Vector3::x());
        assert_eq!(tracked.velocity, Vector3::new(0.0, -2.0, 0.0));

        let untracked = make(false);
        assert_eq!(untracked.director, -Vector3::x());
        assert_eq!(untracked.velocity, Vector3::new(0.0, 2.0, 0.0));
    }

    #[test]
    fn tracked_velocity_rotates_with_director() {
        let mut system = plane_lattice(30);
        let config = base_config()
            .nu_r(2.0)
            .track_velocity(true)
            .seed(8)
            .build()
            .unwrap();
        let mut integrator = integrator(config, Arc::new(Plane::xy()));

        integrator.integrate(&mut system).unwrap();

        for p in system.particles() {
            assert!((p.velocity - p.director).norm() < 1e-12);
        }
    }

    #[test]
    fn untracked_velocity_keeps_drift_direction() {
        let mut system = plane_lattice(30);
        let before = system.particles().to_vec();
        let config = base_config().nu_r(2.0).seed(8).build().unwrap();
        let mut integrator = integrator(config, Arc::new(Plane::xy()));

        integrator.integrate(&mut system).unwrap();

        for (old, new) in before.iter().zip(system.particles()) {
            assert!((new.velocity - old.director).norm() < 1e-12);
            assert!((new.director.norm() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn torque_drives_rotation_through_rotational_mobility() {
        let mut system = ParticleSystem::from_particles(vec![Particle::new(
            0,
            Point3::origin(),
            Vector3::x(),
        )]);
        let config = base_config().v0(0.0).mu_r(2.0).build().unwrap();
        let mut integrator = integrator(config, Arc::new(Plane::xy()));
        let plane = Plane::xy();

        // No force field: the torque accumulator is reset, so omega must be zero.
        integrator.integrate(&mut system).unwrap();
        assert_eq!(system.particle(0).unwrap().omega, 0.0);

        let p = system.particle_mut(0).unwrap();
        p.torque = Vector3::new(0.0, 0.0, 0.5);
        let params = StepParameters {
            noise_key: 0,
            dt: 0.1,
            sqrt_dt: 0.1f64.sqrt(),
            mu: 1.0,
            mu_r: 2.0,
            v0: 0.0,
            temperature: 0.0,
            thermal_amplitude: 0.0,
            rotational_noise: 0.0,
            track_velocity: false,
        };
        advance_particle(p, 0, &params, &plane, &NoiseModel::new(0)).unwrap();

        assert!((p.omega - 1.0).abs() < 1e-15);
        let expected = Vector3::new(0.1f64.cos(), 0.1f64.sin(), 0.0);
        assert!((p.director - expected).norm() < 1e-12);
    }

    #[test]
    fn result_does_not_depend_on_group_order() {
        let config = base_config()
            .nu_r(1.0)
            .temperature(TemperatureSchedule::Constant(0.5))
            .group("movers")
            .seed(21)
            .build()
            .unwrap();
        let run = |indices: Vec<usize>| {
            let mut system = plane_lattice(10);
            system.add_group("movers", indices).unwrap();
            let mut integrator = integrator(config.clone(), Arc::new(Plane::xy()));
            integrator.integrate(&mut system).unwrap();
            system.particles().to_vec()
        };

        assert_eq!(run(vec![1, 4, 7]), run(vec![7, 1, 4]));
    }

    #[test]
    fn particles_outside_group_are_untouched() {
        let mut system = plane_lattice(6);
        system.add_group("half", vec![0, 1, 2]).unwrap();
        let before = system.particles().to_vec();
        let config = base_config().group("half").build().unwrap();
        let mut integrator = integrator(config, Arc::new(Plane::xy()));

        integrator.integrate(&mut system).unwrap();

        for i in 0..3 {
            assert_ne!(system.particle(i).unwrap().position, before[i].position);
        }
        for i in 3..6 {
            assert_eq!(system.particle(i).unwrap(), &before[i]);
        }
    }

    #[test]
    fn missing_group_fails_before_mutation() {
        let mut system = plane_lattice(4);
        let before = system.particles().to_vec();
        let config = base_config().group("ghosts").build().unwrap();
        let mut integrator = integrator(config, Arc::new(Plane::xy()));

        let err = integrator.integrate(&mut system).unwrap_err();

        assert!(matches!(err, EngineError::GroupNotFound(name) if name == "ghosts"));
        assert_eq!(system.particles(), before.as_slice());
    }

    #[test]
    fn negative_temperature_is_treated_as_zero() {
        let run = |schedule: TemperatureSchedule| {
            let mut system = plane_lattice(10);
            let config = base_config().temperature(schedule).seed(4).build().unwrap();
            let mut integrator = integrator(config, Arc::new(Plane::xy()));
            let report = integrator.integrate(&mut system).unwrap();
            (report.temperature, system.particles().to_vec())
        };

        let (t_negative, clamped) = run(TemperatureSchedule::custom(|_| -2.0));
        let (t_zero, zero) = run(TemperatureSchedule::Constant(0.0));
        assert_eq!(t_negative, 0.0);
        assert_eq!(t_zero, 0.0);
        assert_eq!(clamped, zero);
    }

    #[test]
    fn degenerate_geometry_is_reported_with_particle_index() {
        // Particle 1 starts on the sphere but is driven straight through the centre.
        let mut system = ParticleSystem::from_particles(vec![
            Particle::new(0, Point3::new(0.0, 0.0, 2.0), Vector3::x()),
            Particle::new(1, Point3::new(2.0, 0.0, 0.0), -Vector3::x()),
        ]);
        let config = base_config().v0(20.0).build().unwrap();
        let mut integrator = integrator(
            config,
            Arc::new(Sphere::new(Point3::origin(), 2.0).unwrap()),
        );

        let err = integrator.integrate(&mut system).unwrap_err();

        assert!(
            matches!(err, EngineError::Constraint { index: 1, .. }),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn ghost_regions_follow_their_sources() {
        let mut system = plane_lattice(4);
        let region = GhostRegion::new("image", 0..2, 2..4, Vector3::new(0.0, 100.0, 0.0)).unwrap();
        let mut integrator = BrownianIntegrator::builder()
            .config(base_config().build().unwrap())
            .constraint(Arc::new(Plane::xy()))
            .ghost_region(region)
            .build()
            .unwrap();

        integrator.integrate(&mut system).unwrap();

        for (s, t) in [(0, 2), (1, 3)] {
            let src = system.particle(s).unwrap().clone();
            let ghost = system.particle(t).unwrap();
            assert_eq!(ghost.position, src.position + Vector3::new(0.0, 100.0, 0.0));
            assert_eq!(ghost.director, src.director);
        }
    }

    #[test]
    fn ghost_region_out_of_range_fails_before_mutation() {
        let mut system = plane_lattice(3);
        let before = system.particles().to_vec();
        let region = GhostRegion::new("image", 0..2, 2..4, Vector3::x()).unwrap();
        let mut integrator = BrownianIntegrator::builder()
            .config(base_config().build().unwrap())
            .constraint(Arc::new(Plane::xy()))
            .ghost_region(region)
            .build()
            .unwrap();

        let err = integrator.integrate(&mut system).unwrap_err();

        assert!(matches!(err, EngineError::GhostRegion { .. }));
        assert_eq!(system.particles(), before.as_slice());
    }

    #[test]
    fn mesh_is_refreshed_after_each_step() {
        let mut system = plane_lattice(5);
        system.enable_mesh();
        let revision = system.mesh().unwrap().revision();
        let mut integrator = integrator(base_config().build().unwrap(), Arc::new(Plane::xy()));

        integrator.integrate(&mut system).unwrap();

        let mesh = system.mesh().unwrap();
        assert_eq!(mesh.revision(), revision + 1);
        assert_eq!(mesh.vertices()[0].position, system.particle(0).unwrap().position);
    }
}
