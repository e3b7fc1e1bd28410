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
//! Position (Störmer) Verlet integrator
//!
//! The position Verlet algorithm advances positions from the current and
//! previous positions plus the current acceleration:
//!
//! ```text
//! x(t + dt) = 2·x(t) − x(t − dt) + a(t)·dt²
//! ```
//!
//! No velocity is stored. Seeding `x(−dt) = x(0) − v(0)·dt` before the first
//! step sets the initial velocity.
//!
//! # Properties
//!
//! - **Symplectic**: Preserves phase space volume
//! - **Time-reversible**: Swapping current and previous runs the trajectory backwards
//! - **Second-order accurate**: Local error O(dt⁴) in position, global error O(dt²)
//!
//! # Periodic boundaries
//!
//! After a step the new current position is wrapped into the cell. What
//! happens to the previous position is controlled by [`HistoryWrap`]; see
//! its documentation for the two options.
//!
//! # References
//!
//! - Verlet, L. (1967). Computer "Experiments" on Classical Fluids. I. Thermodynamical
//!   Properties of Lennard-Jones Molecules. Physical Review, 159(1), 98-103.
//! - Hairer, E., Lubich, C., & Wanner, G. (2003). Geometric numerical integration
//!   illustrated by the Störmer-Verlet method. Acta Numerica, 12, 399-450.

use super::Integrator;
use crate::boundary::{HistoryWrap, PeriodicCell};
use crate::state::SimulationState;
use crate::vector::Vec2;

/// Position Verlet integrator
///
/// # Example
///
/// ```
/// use md_engine::integration::{Integrator, PositionVerletIntegrator};
///
/// let integrator = PositionVerletIntegrator::new(1e-15);
/// assert_eq!(integrator.timestep(), 1e-15);
/// ```
#[derive(Debug, Clone)]
pub struct PositionVerletIntegrator {
    timestep: f64,
    history_wrap: HistoryWrap,
}

impl PositionVerletIntegrator {
    /// Create a new position Verlet integrator with the given timestep
    ///
    /// # Panics
    ///
    /// Panics if timestep is non-positive, NaN, or infinite
    pub fn new(timestep: f64) -> Self {
        assert!(
            timestep > 0.0 && timestep.is_finite(),
            "Timestep must be positive and finite"
        );
        PositionVerletIntegrator {
            timestep,
            history_wrap: HistoryWrap::default(),
        }
    }

    /// Choose how the previous position follows a wrapped current position
    pub fn with_history_wrap(mut self, history_wrap: HistoryWrap) -> Self {
        self.history_wrap = history_wrap;
        self
    }

    /// Current previous-position wrapping policy
    pub fn history_wrap(&self) -> HistoryWrap {
        self.history_wrap
    }

    /// Single-particle recurrence: 2·current − previous + a·dt²
    pub fn advance(&self, current: Vec2, previous: Vec2, acceleration: Vec2) -> Vec2 {
        let dt_sq = self.timestep * self.timestep;
        Vec2::new(
            2.0 * current.x - previous.x + acceleration.x * dt_sq,
            2.0 * current.y - previous.y + acceleration.y * dt_sq,
        )
    }
}

impl Integrator for PositionVerletIntegrator {
    fn name(&self) -> &str {
        "Position Verlet"
    }

    fn timestep(&self) -> f64 {
        self.timestep
    }

    fn set_timestep(&mut self, dt: f64) {
        assert!(
            dt > 0.0 && dt.is_finite(),
            "Timestep must be positive and finite"
        );
        self.timestep = dt;
    }

    fn propose(&self, state: &SimulationState, accelerations: &[Vec2]) -> Vec<Vec2> {
        assert_eq!(
            state.len(),
            accelerations.len(),
            "One acceleration per particle is required"
        );

        state
            .particles()
            .iter()
            .zip(accelerations)
            .map(|(p, a)| self.advance(p.position(), p.previous_position(), *a))
            .collect()
    }

    fn commit(&self, state: &mut SimulationState, proposed: &[Vec2], cell: &PeriodicCell) -> usize {
        assert_eq!(
            state.len(),
            proposed.len(),
            "One proposed position per particle is required"
        );

        let mut valid = 0;
        for (index, next) in proposed.iter().enumerate() {
            let current = state.particles()[index].position();
            let (wrapped, offset) = cell.wrap_with_offset(*next);

            let previous = match self.history_wrap {
                HistoryWrap::Shifted => current - offset,
                HistoryWrap::CurrentOnly => current,
            };

            state.commit(index, wrapped, previous);

            if wrapped.is_valid() {
                valid += 1;
            }
        }

        valid
    }
}
