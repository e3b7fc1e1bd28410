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
//! Lennard-Jones 12-6 pair interaction
//!
//! # Physics Background
//!
//! **V(r) = 4ε [ (σ/r)¹² − (σ/r)⁶ ]**
//!
//! Where:
//! - ε is the depth of the potential well (joules)
//! - σ is the separation at which the potential crosses zero (meters)
//!
//! The radial force `F(r) = −dV/dr = 48ε σ¹²/r¹³ − 24ε σ⁶/r⁷` vanishes at
//! `r = 2^(1/6) σ`. Closer pairs repel, farther pairs attract.
//!
//! For a displacement `d = r_j − r_i` the force on particle `i` is
//!
//! ```text
//! F_i = −48ε (σ¹² r⁻¹² − ½ σ⁶ r⁻⁶) r⁻² · d
//! ```
//!
//! computed from inverse powers of `r²` without a square root.
//!
//! # Implementation Details
//!
//! - Displacements use the minimum-image convention of the periodic cell.
//! - There is no cutoff: every other particle contributes (all pairs, O(N²)).
//! - A pair with exactly zero separation contributes zero force instead of
//!   dividing by zero. Detecting that configuration is left to the caller,
//!   see [`crate::simulation::FaultPolicy`].
//!
//! # References
//!
//! - Lennard-Jones, J. E. (1924). On the Determination of Molecular Fields.
//!   Proc. R. Soc. Lond. A, 106(738), 463-477.
//! - Allen, M. P., & Tildesley, D. J. (2017). Computer Simulation of Liquids
//!   (2nd ed.). Oxford University Press. Section 1.4.

use super::ForceField;
use crate::boundary::PeriodicCell;
use crate::vector::Vec2;

/// Electron-volt to joule conversion factor
pub const ELECTRON_VOLT: f64 = 1.60218e-19;

/// Lennard-Jones 12-6 force field
///
/// # Example
///
/// ```
/// use md_engine::forces::LennardJones;
///
/// let lj = LennardJones::new(1.0, 1.0);
/// let r_min = lj.force_zero_crossing();
/// assert!(lj.force_magnitude(r_min).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LennardJones {
    epsilon: f64,
    sigma: f64,
    sigma6: f64,
    sigma12: f64,
}

impl LennardJones {
    /// Create a force field with well depth `epsilon` (joules) and
    /// zero-crossing distance `sigma` (meters)
    ///
    /// # Panics
    ///
    /// Panics if either parameter is non-positive, NaN, or infinite
    pub fn new(epsilon: f64, sigma: f64) -> Self {
        assert!(
            epsilon > 0.0 && epsilon.is_finite(),
            "Well depth must be positive and finite"
        );
        assert!(
            sigma > 0.0 && sigma.is_finite(),
            "Sigma must be positive and finite"
        );

        let sigma6 = sigma.powi(6);
        LennardJones {
            epsilon,
            sigma,
            sigma6,
            sigma12: sigma6 * sigma6,
        }
    }

    /// Well depth ε (joules)
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Zero-crossing distance σ of the potential (meters)
    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Separation where the force vanishes and the potential is minimal
    pub fn force_zero_crossing(&self) -> f64 {
        self.sigma * 2f64.powf(1.0 / 6.0)
    }

    /// Pair potential at separation `r`
    pub fn pair_potential(&self, r: f64) -> f64 {
        let inv2 = 1.0 / (r * r);
        let inv6 = inv2 * inv2 * inv2;
        4.0 * self.epsilon * (self.sigma12 * inv6 * inv6 - self.sigma6 * inv6)
    }

    /// Radial force at separation `r`; positive is repulsive
    pub fn force_magnitude(&self, r: f64) -> f64 {
        let inv2 = 1.0 / (r * r);
        let inv6 = inv2 * inv2 * inv2;
        48.0 * self.epsilon * (self.sigma12 * inv6 * inv6 - 0.5 * self.sigma6 * inv6) / r
    }

    /// Force on a particle from a neighbour at minimum-image displacement
    /// `displacement` (neighbour minus particle)
    ///
    /// Returns zero for a coincident pair.
    pub fn pair_force(&self, displacement: Vec2) -> Vec2 {
        let r_squared = displacement.norm_squared();
        if r_squared == 0.0 {
            return Vec2::zero();
        }

        let inv2 = 1.0 / r_squared;
        let inv6 = inv2 * inv2 * inv2;
        let inv12 = inv6 * inv6;
        let scale = -48.0 * self.epsilon * (self.sigma12 * inv12 - 0.5 * self.sigma6 * inv6) * inv2;

        displacement * scale
    }
}

impl ForceField for LennardJones {
    fn compute_force(&self, index: usize, positions: &[Vec2], cell: &PeriodicCell) -> Vec2 {
        let origin = positions[index];
        let mut total = Vec2::zero();

        for (other, position) in positions.iter().enumerate() {
            if other == index {
                continue;
            }
            total += self.pair_force(cell.displacement(origin, *position));
        }

        total
    }

    fn potential_energy(&self, positions: &[Vec2], cell: &PeriodicCell) -> f64 {
        let mut energy = 0.0;

        for (i, a) in positions.iter().enumerate() {
            for b in positions.iter().skip(i + 1) {
                let r_squared = cell.displacement(*a, *b).norm_squared();
                if r_squared == 0.0 {
                    continue;
                }
                energy += self.pair_potential(r_squared.sqrt());
            }
        }

        energy
    }

    fn name(&self) -> &str {
        "lennard_jones"
    }
}
