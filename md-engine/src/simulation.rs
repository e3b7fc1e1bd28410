// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! The tick loop
//!
//! [`Simulation`] owns the particle state and its collaborators. One tick is:
//!
//! 1. evaluate the force on every particle from the committed snapshot,
//! 2. convert forces to accelerations (a = F / m),
//! 3. propose every new position from that same snapshot,
//! 4. commit and wrap.
//!
//! A tick is atomic with respect to visible state. Readers get a
//! [`Snapshot`] between ticks and never see a half-advanced system. When the
//! fault policy aborts a tick, it does so before step 4, so the last committed
//! snapshot is left intact.

use crate::boundary::PeriodicCell;
use crate::config::SimulationConfig;
use crate::error::{Result, SimulationError};
use crate::forces::{
    compute_forces, find_coincident_pair, forces_to_accelerations, ForceField, LennardJones,
};
use crate::initialization::{seeded_rng, VelocityInitializer};
use crate::integration::{
    calculate_kinetic_energy, instantaneous_temperature, reconstruct_velocities, Integrator,
    PositionVerletIntegrator,
};
use crate::state::{SimulationState, Snapshot};
use crate::vector::Vec2;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Reaction to physically invalid configurations during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum FaultPolicy {
    /// Coincident pairs contribute zero force and non-finite values
    /// propagate, without any report
    Ignore,
    /// Same numerical behavior as `Ignore`, but the first occurrence of each
    /// kind of fault is logged as a warning
    #[default]
    Warn,
    /// The tick fails with an error before anything is committed
    Abort,
}

/// Energy bookkeeping for one committed snapshot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyReport {
    /// Kinetic energy from reconstructed velocities (joules)
    pub kinetic: f64,
    /// Lennard-Jones potential energy (joules)
    pub potential: f64,
    /// Instantaneous temperature (kelvin)
    pub temperature: f64,
}

impl EnergyReport {
    /// Kinetic plus potential energy (joules)
    pub fn total(&self) -> f64 {
        self.kinetic + self.potential
    }
}

/// A running particle system
pub struct Simulation {
    state: SimulationState,
    cell: PeriodicCell,
    force_field: Box<dyn ForceField>,
    integrator: Box<dyn Integrator>,
    mass: f64,
    boltzmann: f64,
    fault_policy: FaultPolicy,
    progress_interval: u64,
    tick: u64,
    reported_coincident: bool,
    reported_non_finite: bool,
}

impl Simulation {
    /// Assemble a simulation from an already-initialized state
    ///
    /// # Panics
    ///
    /// Panics if `mass` is non-positive, NaN, or infinite
    pub fn new(
        state: SimulationState,
        cell: PeriodicCell,
        force_field: Box<dyn ForceField>,
        integrator: Box<dyn Integrator>,
        mass: f64,
    ) -> Self {
        assert!(mass > 0.0 && mass.is_finite(), "Mass must be positive and finite");

        Simulation {
            state,
            cell,
            force_field,
            integrator,
            mass,
            boltzmann: crate::config::BOLTZMANN_CONSTANT,
            fault_policy: FaultPolicy::default(),
            progress_interval: 100_000,
            tick: 0,
            reported_coincident: false,
            reported_non_finite: false,
        }
    }

    /// Build the lattice system described by `config` and draw its initial
    /// velocities
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the velocity draw
    /// is degenerate.
    pub fn from_config(config: &SimulationConfig) -> Result<Self> {
        config.validate()?;

        let cell = config.cell();
        let mut state = config.lattice().build_state();

        let initializer = VelocityInitializer::new(
            config.thermal.temperature,
            config.particles.mass,
            config.thermal.boltzmann_constant,
            config.integration.timestep,
        )
        .with_velocity_bound(config.thermal.velocity_bound);
        initializer.initialize(&mut state, &mut seeded_rng(config.thermal.seed))?;

        let force_field = LennardJones::new(config.potential.epsilon, config.potential.sigma);
        let integrator = PositionVerletIntegrator::new(config.integration.timestep)
            .with_history_wrap(config.integration.history_wrap);

        if let Err(warning) = integrator.validate_timestep(config.characteristic_time()) {
            log::warn!("{}", warning);
        }

        log::info!(
            "Built {} particles in a {:.3e} x {:.3e} m cell, dt = {:e} s",
            state.len(),
            cell.width(),
            cell.height(),
            config.integration.timestep
        );

        Ok(Simulation::new(
            state,
            cell,
            Box::new(force_field),
            Box::new(integrator),
            config.particles.mass,
        )
        .with_boltzmann(config.thermal.boltzmann_constant)
        .with_fault_policy(config.run.fault_policy)
        .with_progress_interval(config.run.progress_interval))
    }

    /// Set the fault policy
    pub fn with_fault_policy(mut self, policy: FaultPolicy) -> Self {
        self.fault_policy = policy;
        self
    }

    /// Set the number of ticks between progress log lines
    ///
    /// # Panics
    ///
    /// Panics if `interval` is zero
    pub fn with_progress_interval(mut self, interval: u64) -> Self {
        assert!(interval > 0, "Progress interval must be at least one tick");
        self.progress_interval = interval;
        self
    }

    /// Set the Boltzmann constant used for temperature diagnostics
    ///
    /// # Panics
    ///
    /// Panics if `boltzmann` is non-positive, NaN, or infinite
    pub fn with_boltzmann(mut self, boltzmann: f64) -> Self {
        assert!(
            boltzmann > 0.0 && boltzmann.is_finite(),
            "Boltzmann constant must be positive and finite"
        );
        self.boltzmann = boltzmann;
        self
    }

    /// Latest committed state
    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Read-only view of the latest committed positions
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot::new(&self.state, self.tick, self.elapsed_time())
    }

    /// Periodic cell
    pub fn cell(&self) -> &PeriodicCell {
        &self.cell
    }

    /// Number of completed ticks
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Simulated time elapsed (seconds)
    pub fn elapsed_time(&self) -> f64 {
        self.tick as f64 * self.integrator.timestep()
    }

    /// Fault policy in effect
    pub fn fault_policy(&self) -> FaultPolicy {
        self.fault_policy
    }

    /// Advance the system one time step
    ///
    /// # Errors
    ///
    /// Only with [`FaultPolicy::Abort`]: returns
    /// [`SimulationError::CoincidentParticles`] or
    /// [`SimulationError::NonFiniteState`] and leaves the state untouched.
    pub fn tick(&mut self) -> Result<()> {
        let positions = self.state.positions();

        if self.fault_policy != FaultPolicy::Ignore {
            if let Some((first, second)) = find_coincident_pair(&positions, &self.cell) {
                self.report(SimulationError::CoincidentParticles { first, second })?;
            }
        }

        let forces = compute_forces(self.force_field.as_ref(), &positions, &self.cell);
        let accelerations = forces_to_accelerations(&forces, self.mass);
        let proposed = self.integrator.propose(&self.state, &accelerations);

        if self.fault_policy != FaultPolicy::Ignore {
            if let Some(index) = proposed.iter().position(|p| !p.is_valid()) {
                self.report(SimulationError::NonFiniteState {
                    index,
                    tick: self.tick + 1,
                })?;
            }
        }

        self.integrator.commit(&mut self.state, &proposed, &self.cell);
        self.tick += 1;

        if self.tick % self.progress_interval == 0 {
            log::info!("Time: {:.3} picoseconds", self.elapsed_time() * 1e12);
        }

        Ok(())
    }

    /// Run `ticks` steps
    ///
    /// # Errors
    ///
    /// Stops at the first failed tick and returns its error.
    pub fn run(&mut self, ticks: u64) -> Result<()> {
        self.run_with(ticks, |_| {})
    }

    /// Run `ticks` steps, handing the committed snapshot to `observer` after
    /// each one
    ///
    /// # Errors
    ///
    /// Stops at the first failed tick and returns its error.
    pub fn run_with<F>(&mut self, ticks: u64, mut observer: F) -> Result<()>
    where
        F: FnMut(Snapshot<'_>),
    {
        for _ in 0..ticks {
            self.tick()?;
            observer(self.snapshot());
        }
        Ok(())
    }

    /// Velocities reconstructed from the position history (m/s)
    pub fn velocities(&self) -> Vec<Vec2> {
        reconstruct_velocities(&self.state, self.integrator.timestep(), &self.cell)
    }

    /// Kinetic energy, potential energy and temperature of the committed
    /// snapshot
    pub fn energy(&self) -> EnergyReport {
        let kinetic = calculate_kinetic_energy(&self.velocities(), self.mass);
        let potential = self
            .force_field
            .potential_energy(&self.state.positions(), &self.cell);
        EnergyReport {
            kinetic,
            potential,
            temperature: instantaneous_temperature(kinetic, self.state.len(), self.boltzmann),
        }
    }

    fn report(&mut self, fault: SimulationError) -> Result<()> {
        match self.fault_policy {
            FaultPolicy::Ignore => Ok(()),
            FaultPolicy::Abort => Err(fault),
            FaultPolicy::Warn => {
                let reported = match fault {
                    SimulationError::CoincidentParticles { .. } => &mut self.reported_coincident,
                    _ => &mut self.reported_non_finite,
                };
                if *reported {
                    log::debug!("{}", fault);
                } else {
                    log::warn!("{}", fault);
                    *reported = true;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_particles(separation: f64) -> Simulation {
        let cell = PeriodicCell::new(1e-8, 1e-8);
        let state = SimulationState::from_positions(vec![
            Vec2::new(-0.5 * separation, 0.0),
            Vec2::new(0.5 * separation, 0.0),
        ]);
        Simulation::new(
            state,
            cell,
            Box::new(LennardJones::new(4.58e-22, 0.35e-9)),
            Box::new(PositionVerletIntegrator::new(1e-15)),
            1.9944733e-26,
        )
    }

    #[test]
    fn test_from_config_defaults() {
        let mut config = SimulationConfig::default();
        config.thermal.seed = Some(11);
        let sim = Simulation::from_config(&config).unwrap();
        assert_eq!(sim.state().len(), 9);
        assert_eq!(sim.tick_count(), 0);
        assert_eq!(sim.fault_policy(), FaultPolicy::Warn);
        // history is seeded, so particles are moving
        assert!(sim.velocities().iter().any(|v| v.norm() > 0.0));
    }

    #[test]
    fn test_from_config_rejects_invalid() {
        let mut config = SimulationConfig::default();
        config.particles.mass = 0.0;
        assert!(matches!(
            Simulation::from_config(&config),
            Err(SimulationError::Config(_))
        ));
    }

    #[test]
    fn test_tick_advances_time() {
        let mut sim = two_particles(0.4e-9);
        sim.run(3).unwrap();
        assert_eq!(sim.tick_count(), 3);
        assert!((sim.elapsed_time() - 3e-15).abs() < 1e-27);
        assert_eq!(sim.snapshot().tick(), 3);
    }

    #[test]
    fn test_run_with_observes_every_tick() {
        let mut sim = two_particles(0.4e-9);
        let mut seen = Vec::new();
        sim.run_with(4, |snapshot| seen.push(snapshot.tick())).unwrap();
        assert_eq!(seen, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_abort_on_coincident_leaves_state() {
        let mut sim = two_particles(0.0).with_fault_policy(FaultPolicy::Abort);
        let before = sim.state().clone();
        let err = sim.tick().unwrap_err();
        assert_eq!(err, SimulationError::CoincidentParticles { first: 0, second: 1 });
        assert_eq!(sim.state(), &before);
        assert_eq!(sim.tick_count(), 0);
    }

    #[test]
    fn test_warn_on_coincident_keeps_running() {
        let mut sim = two_particles(0.0);
        sim.run(2).unwrap();
        assert_eq!(sim.tick_count(), 2);
        assert!(sim.state().is_valid());
    }

    #[test]
    #[should_panic(expected = "Boltzmann constant must be positive and finite")]
    fn test_invalid_boltzmann_panics() {
        two_particles(0.4e-9).with_boltzmann(0.0);
    }

    #[test]
    #[should_panic(expected = "Boltzmann constant must be positive and finite")]
    fn test_nan_boltzmann_panics() {
        two_particles(0.4e-9).with_boltzmann(f64::NAN);
    }

    #[test]
    fn test_fault_policy_value_names() {
        assert_eq!(FaultPolicy::from_str("ignore", false), Ok(FaultPolicy::Ignore));
        assert_eq!(FaultPolicy::from_str("warn", false), Ok(FaultPolicy::Warn));
        assert_eq!(FaultPolicy::from_str("abort", false), Ok(FaultPolicy::Abort));
        assert!(FaultPolicy::from_str("panic", false).is_err());
    }

    #[test]
    fn test_abort_on_non_finite() {
        let cell = PeriodicCell::new(1e-8, 1e-8);
        let state = SimulationState::from_positions(vec![Vec2::new(f64::NAN, 0.0), Vec2::zero()]);
        let mut sim = Simulation::new(
            state,
            cell,
            Box::new(LennardJones::new(4.58e-22, 0.35e-9)),
            Box::new(PositionVerletIntegrator::new(1e-15)),
            1.9944733e-26,
        )
        .with_fault_policy(FaultPolicy::Abort);

        let err = sim.tick().unwrap_err();
        assert_eq!(err, SimulationError::NonFiniteState { index: 0, tick: 1 });
    }

    #[test]
    fn test_energy_at_rest() {
        let sim = two_particles(0.4e-9);
        let energy = sim.energy();
        assert_eq!(energy.kinetic, 0.0);
        assert_eq!(energy.temperature, 0.0);
        assert!(energy.potential < 0.0);
        assert_eq!(energy.total(), energy.potential);
    }
}
