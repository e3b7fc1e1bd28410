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
//! Numerical integration for the particle system
//!
//! The integrator advances every particle one time step from a consistent
//! snapshot. Stepping is split in two phases so a caller can inspect the
//! result before it becomes visible:
//!
//! 1. [`Integrator::propose`] computes every new position from the pre-step
//!    state without touching it.
//! 2. [`Integrator::commit`] shifts current into previous, stores the new
//!    positions and wraps them into the periodic cell.
//!
//! # Timestep Guidelines
//!
//! The natural time unit of a Lennard-Jones system is `τ = σ·sqrt(m/ε)`.
//! Stable runs use a step of a few thousandths of τ; with the default
//! carbon-12 mass and ε = 0.00286 eV, τ ≈ 2.3 ps and dt = 1 fs.
//!
//! # Diagnostics
//!
//! No velocity is stored. The helpers here reconstruct it from the two
//! position snapshots and derive kinetic energy and temperature from it.

use crate::boundary::PeriodicCell;
use crate::state::SimulationState;
use crate::vector::Vec2;

mod verlet;

pub use verlet::PositionVerletIntegrator;

/// Reconstruct per-particle velocities from the position history
///
/// v ≈ (current − previous) / dt, with the difference reduced to its
/// minimum image so a boundary crossing never shows up as a jump.
///
/// This is a one-sided difference, not the central `(next − previous) / 2dt`
/// form: the history is seeded as `previous = position − dt·v`, so dividing
/// by `dt` recovers the seeded velocities exactly before the first tick.
pub fn reconstruct_velocities(state: &SimulationState, dt: f64, cell: &PeriodicCell) -> Vec<Vec2> {
    state
        .particles()
        .iter()
        .map(|p| cell.displacement(p.previous_position(), p.position()) / dt)
        .collect()
}

/// Arithmetic mean of a set of velocities (center-of-mass velocity for
/// particles of equal mass)
pub fn center_of_mass_velocity(velocities: &[Vec2]) -> Vec2 {
    if velocities.is_empty() {
        return Vec2::zero();
    }
    let mut sum = Vec2::zero();
    for v in velocities {
        sum += *v;
    }
    sum / velocities.len() as f64
}

/// Total kinetic energy of particles of equal mass
///
/// KE = Σ ½ m v²
pub fn calculate_kinetic_energy(velocities: &[Vec2], mass: f64) -> f64 {
    velocities.iter().map(|v| 0.5 * mass * v.norm_squared()).sum()
}

/// Instantaneous temperature of a two-dimensional system
///
/// Two degrees of freedom per particle, so KE = N·kB·T.
pub fn instantaneous_temperature(kinetic_energy: f64, particle_count: usize, boltzmann: f64) -> f64 {
    if particle_count == 0 {
        return 0.0;
    }
    kinetic_energy / (particle_count as f64 * boltzmann)
}

/// Trait for time-stepping schemes
pub trait Integrator: Send + Sync {
    /// Get the name of this integrator
    fn name(&self) -> &str;

    /// Get the timestep used by this integrator (seconds)
    fn timestep(&self) -> f64;

    /// Set the timestep for this integrator
    ///
    /// # Panics
    ///
    /// Panics if timestep is non-positive, NaN, or infinite
    fn set_timestep(&mut self, dt: f64);

    /// Validate the timestep against the system's characteristic time
    ///
    /// Returns warnings if the timestep might cause numerical issues. A step
    /// that is a large fraction of `characteristic_time` will not resolve the
    /// repulsive wall, one that is a tiny fraction wastes precision on
    /// `2x - x_prev` cancellation.
    fn validate_timestep(&self, characteristic_time: f64) -> Result<(), String> {
        let dt = self.timestep();

        if dt <= 0.0 || !dt.is_finite() {
            return Err(format!("Invalid timestep: {}. Must be positive and finite.", dt));
        }

        let ratio = dt / characteristic_time;

        if ratio < 1e-7 {
            return Err(format!(
                "Warning: Timestep {} is extremely small relative to the characteristic time {} \
                and may lose precision in the position recurrence.",
                dt, characteristic_time
            ));
        }

        if ratio > 0.01 {
            return Err(format!(
                "Warning: Timestep {} is large relative to the characteristic time {} \
                and may cause instability.",
                dt, characteristic_time
            ));
        }

        Ok(())
    }

    /// Compute the next position of every particle without mutating the state
    ///
    /// `accelerations` must hold one entry per particle, all derived from the
    /// state's current positions.
    fn propose(&self, state: &SimulationState, accelerations: &[Vec2]) -> Vec<Vec2>;

    /// Commit proposed positions: previous ← current, current ← proposed,
    /// then wrap into the cell
    ///
    /// Returns the number of particles whose committed position is finite.
    fn commit(&self, state: &mut SimulationState, proposed: &[Vec2], cell: &PeriodicCell) -> usize;

    /// Advance the state one step
    fn integrate(
        &self,
        state: &mut SimulationState,
        accelerations: &[Vec2],
        cell: &PeriodicCell,
    ) -> usize {
        let proposed = self.propose(state, accelerations);
        self.commit(state, &proposed, cell)
    }
}
