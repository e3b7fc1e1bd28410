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
//! Force evaluation
//!
//! A [`ForceField`] computes the net force on one particle from the full
//! position snapshot. [`compute_forces`] runs it for every particle against
//! the same snapshot, which is what the integrator requires: all forces for a
//! tick are known before any position moves.
//!
//! With the `parallel` feature the per-particle evaluations are spread over
//! the Rayon thread pool. Each evaluation only reads the snapshot, so the
//! result is identical to the sequential pass.

use crate::boundary::PeriodicCell;
use crate::vector::Vec2;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

pub mod lennard_jones;

pub use lennard_jones::LennardJones;

/// Trait for pairwise interaction models
///
/// Implementations must be pure: they read the snapshot and the cell and
/// never mutate anything.
pub trait ForceField: Send + Sync {
    /// Net force on particle `index` from every other particle (newtons)
    fn compute_force(&self, index: usize, positions: &[Vec2], cell: &PeriodicCell) -> Vec2;

    /// Total potential energy of the configuration (joules)
    fn potential_energy(&self, positions: &[Vec2], cell: &PeriodicCell) -> f64;

    /// Get a descriptive name for this force field
    fn name(&self) -> &str;
}

/// Evaluate the force on every particle from one consistent snapshot
pub fn compute_forces<F>(field: &F, positions: &[Vec2], cell: &PeriodicCell) -> Vec<Vec2>
where
    F: ForceField + ?Sized,
{
    #[cfg(feature = "parallel")]
    {
        (0..positions.len())
            .into_par_iter()
            .map(|index| field.compute_force(index, positions, cell))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        (0..positions.len())
            .map(|index| field.compute_force(index, positions, cell))
            .collect()
    }
}

/// Convert forces to accelerations for particles of equal mass
///
/// a = F / m
pub fn forces_to_accelerations(forces: &[Vec2], mass: f64) -> Vec<Vec2> {
    forces.iter().map(|force| *force / mass).collect()
}

/// Find the first pair of particles with zero minimum-image separation
///
/// Pairs are scanned in `(i, j)` order with `i < j`.
pub fn find_coincident_pair(positions: &[Vec2], cell: &PeriodicCell) -> Option<(usize, usize)> {
    for (i, a) in positions.iter().enumerate() {
        for (j, b) in positions.iter().enumerate().skip(i + 1) {
            if cell.displacement(*a, *b).norm_squared() == 0.0 {
                return Some((i, j));
            }
        }
    }
    None
}
