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
//! Randomized, temperature-scaled start-up velocities
//!
//! Runs once before the first tick:
//!
//! 1. Draw two independent samples per particle from `U[0, bound)`. This is
//!    a uniform draw, not a Maxwell-Boltzmann one; the rescaling below only
//!    fixes the overall energy scale.
//! 2. Compute the center-of-mass velocity and, per axis, the mean of `m·v²`.
//! 3. Compute one scale factor
//!    `s = sqrt(2·kB·T / sqrt(kEx² + kEy²))`.
//! 4. Final velocity `v = (v_raw − v_com)·s`, so the net momentum is zero.
//! 5. Seed the Verlet history with `previous = position − dt·v`.
//!
//! Step 3 folds both axes into one scalar through a Euclidean norm instead
//! of plain equipartition. The resulting temperature is therefore only
//! approximately the target; the combination is kept as is.

use crate::error::{Result, SimulationError};
use crate::integration::center_of_mass_velocity;
use crate::state::SimulationState;
use crate::vector::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Default upper bound of the raw uniform velocity draw
pub const DEFAULT_VELOCITY_BOUND: f64 = std::f64::consts::FRAC_1_SQRT_2;

/// Build the random source for initialization
///
/// A fixed seed gives a reproducible run, `None` seeds from the thread-local
/// generator and differs on every run.
pub fn seeded_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_rng(&mut rand::rng()),
    }
}

/// Statistics of a raw velocity draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawStatistics {
    /// Mean raw velocity
    pub center_of_mass: Vec2,
    /// Per-axis mean of `m·v²` over the raw draw
    pub mean_kinetic: Vec2,
    /// Factor applied to the drift-free velocities
    pub scale_factor: f64,
}

/// One-shot velocity initializer
///
/// # Example
///
/// ```
/// use md_engine::initialization::{seeded_rng, VelocityInitializer};
/// use md_engine::state::SimulationState;
/// use md_engine::vector::Vec2;
///
/// let mut state = SimulationState::from_positions(vec![Vec2::zero(), Vec2::new(1e-9, 0.0)]);
/// let init = VelocityInitializer::new(297.0, 1.9944733e-26, 1.380649e-23, 1e-15);
/// let velocities = init.initialize(&mut state, &mut seeded_rng(Some(7))).unwrap();
/// assert_eq!(velocities.len(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VelocityInitializer {
    temperature: f64,
    mass: f64,
    boltzmann: f64,
    timestep: f64,
    velocity_bound: f64,
}

impl VelocityInitializer {
    /// Create an initializer for a target temperature (kelvin), particle
    /// mass (kg), Boltzmann constant (J/K) and integration timestep (s)
    ///
    /// # Panics
    ///
    /// Panics if the temperature is negative or any other argument is
    /// non-positive, NaN, or infinite
    pub fn new(temperature: f64, mass: f64, boltzmann: f64, timestep: f64) -> Self {
        assert!(
            temperature >= 0.0 && temperature.is_finite(),
            "Temperature must be non-negative and finite"
        );
        assert!(mass > 0.0 && mass.is_finite(), "Mass must be positive and finite");
        assert!(
            boltzmann > 0.0 && boltzmann.is_finite(),
            "Boltzmann constant must be positive and finite"
        );
        assert!(
            timestep > 0.0 && timestep.is_finite(),
            "Timestep must be positive and finite"
        );

        VelocityInitializer {
            temperature,
            mass,
            boltzmann,
            timestep,
            velocity_bound: DEFAULT_VELOCITY_BOUND,
        }
    }

    /// Set the upper bound of the raw uniform draw
    ///
    /// # Panics
    ///
    /// Panics if the bound is non-positive, NaN, or infinite
    pub fn with_velocity_bound(mut self, bound: f64) -> Self {
        assert!(
            bound > 0.0 && bound.is_finite(),
            "Velocity bound must be positive and finite"
        );
        self.velocity_bound = bound;
        self
    }

    /// Target temperature (kelvin)
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Draw raw velocities, two uniform samples per particle
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R, count: usize) -> Vec<Vec2> {
        (0..count)
            .map(|_| {
                let x = rng.random_range(0.0..self.velocity_bound);
                let y = rng.random_range(0.0..self.velocity_bound);
                Vec2::new(x, y)
            })
            .collect()
    }

    /// Center-of-mass velocity, per-axis kinetic terms and scale factor of a
    /// raw draw
    pub fn statistics(&self, raw: &[Vec2]) -> DrawStatistics {
        let center_of_mass = center_of_mass_velocity(raw);

        let mut mean_kinetic = Vec2::zero();
        for v in raw {
            mean_kinetic += Vec2::new(self.mass * v.x * v.x, self.mass * v.y * v.y);
        }
        if !raw.is_empty() {
            mean_kinetic = mean_kinetic / raw.len() as f64;
        }

        let scale_factor = (2.0 * self.boltzmann * self.temperature / mean_kinetic.norm()).sqrt();

        DrawStatistics {
            center_of_mass,
            mean_kinetic,
            scale_factor,
        }
    }

    /// Remove center-of-mass drift and rescale a raw draw to the target
    /// temperature
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::DegenerateVelocities`] if the draw carries
    /// no kinetic energy, which would make the scale factor infinite.
    pub fn thermalize(&self, raw: &[Vec2]) -> Result<Vec<Vec2>> {
        if raw.is_empty() {
            return Ok(Vec::new());
        }

        let stats = self.statistics(raw);
        if !stats.scale_factor.is_finite() {
            return Err(SimulationError::DegenerateVelocities {
                temperature: self.temperature,
            });
        }

        log::debug!(
            "Velocity draw: center of mass ({:.3e}, {:.3e}), scale factor {:.6e}",
            stats.center_of_mass.x,
            stats.center_of_mass.y,
            stats.scale_factor
        );

        Ok(raw
            .iter()
            .map(|v| (*v - stats.center_of_mass) * stats.scale_factor)
            .collect())
    }

    /// Seed `previous = position − dt·v` for every particle
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::ParticleCountMismatch`] if the velocity
    /// count differs from the particle count.
    pub fn seed_history(&self, state: &mut SimulationState, velocities: &[Vec2]) -> Result<()> {
        if velocities.len() != state.len() {
            return Err(SimulationError::ParticleCountMismatch {
                expected: state.len(),
                actual: velocities.len(),
            });
        }

        for (index, v) in velocities.iter().enumerate() {
            let position = state.particles()[index].position();
            state.set_previous_position(index, position - *v * self.timestep);
        }

        Ok(())
    }

    /// Draw, thermalize and seed the history in one go
    ///
    /// Returns the velocities that were seeded.
    pub fn initialize<R: Rng + ?Sized>(
        &self,
        state: &mut SimulationState,
        rng: &mut R,
    ) -> Result<Vec<Vec2>> {
        let raw = self.draw(rng, state.len());
        let velocities = self.thermalize(&raw)?;
        self.seed_history(state, &velocities)?;

        log::info!(
            "Initialized {} particle velocities at target temperature {} K",
            velocities.len(),
            self.temperature
        );

        Ok(velocities)
    }
}
