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
//! Periodic boundary conditions for a rectangular cell
//!
//! The simulation cell is centered on the origin. Every committed position
//! is kept in the canonical image `[-width/2, width/2) × [-height/2, height/2)`
//! and pair displacements use the minimum-image convention, so each particle
//! interacts with the nearest periodic replica of every other particle.
//!
//! # Wrapping
//!
//! ```text
//! x -= width * floor(x / width + 0.5)
//! y -= height * floor(y / height + 0.5)
//! ```
//!
//! Positions already inside the canonical cell are returned untouched, which
//! makes wrapping exactly idempotent even when the division above would round
//! a coordinate sitting just below the upper edge onto it. A coordinate on an
//! edge of a far image, where the subtraction itself rounds across the edge,
//! lands exactly on the lower edge `-width/2`.
//!
//! # Minimum image
//!
//! ```text
//! dx -= width * round(dx / width)
//! dy -= height * round(dy / height)
//! ```
//!
//! The cell is rectangular, so each axis is reduced with its own period.

use crate::vector::Vec2;
use serde::{Deserialize, Serialize};

/// How the previous-position snapshot follows a wrapped current position
///
/// The position Verlet recurrence reads `current - previous`, so when the
/// current position jumps by one cell period the previous position can either
/// jump with it or stay where it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryWrap {
    /// Shift the previous position by the same lattice vector as the current
    /// position, keeping `current - previous` equal to the true displacement
    #[default]
    Shifted,
    /// Wrap only the current position and keep the previous one in the frame
    /// it was committed in. The recurrence stays correct modulo the cell
    /// period, but `current - previous` jumps by one period on the tick a
    /// particle crosses a boundary.
    CurrentOnly,
}

/// Rectangular periodic cell centered on the origin
///
/// # Examples
///
/// ```
/// use md_engine::boundary::PeriodicCell;
/// use md_engine::vector::Vec2;
///
/// let cell = PeriodicCell::new(2.0, 1.0);
/// let wrapped = cell.wrap(Vec2::new(1.5, -0.75));
/// assert!((wrapped.x - (-0.5)).abs() < 1e-12);
/// assert!((wrapped.y - 0.25).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodicCell {
    width: f64,
    height: f64,
}

impl PeriodicCell {
    /// Create a cell with the given width and height (meters)
    ///
    /// # Panics
    ///
    /// Panics if either dimension is non-positive, NaN, or infinite
    pub fn new(width: f64, height: f64) -> Self {
        assert!(
            width > 0.0 && width.is_finite() && height > 0.0 && height.is_finite(),
            "Cell dimensions must be positive and finite"
        );
        PeriodicCell { width, height }
    }

    /// Cell width (x period)
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Cell height (y period)
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Cell area
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Map a position into the canonical cell image
    pub fn wrap(&self, position: Vec2) -> Vec2 {
        self.wrap_with_offset(position).0
    }

    /// Map a position into the canonical cell image and also return the
    /// lattice vector that was subtracted to get there
    ///
    /// `wrapped == position - offset` up to rounding, and the offset is always
    /// an integer multiple of the cell period on each axis.
    pub fn wrap_with_offset(&self, position: Vec2) -> (Vec2, Vec2) {
        let (x, shift_x) = wrap_axis(position.x, self.width);
        let (y, shift_y) = wrap_axis(position.y, self.height);
        (Vec2::new(x, y), Vec2::new(shift_x, shift_y))
    }

    /// Reduce a displacement to its nearest periodic image
    pub fn minimum_image(&self, displacement: Vec2) -> Vec2 {
        Vec2::new(
            displacement.x - self.width * (displacement.x / self.width).round(),
            displacement.y - self.height * (displacement.y / self.height).round(),
        )
    }

    /// Minimum-image displacement pointing from `from` to `to`
    pub fn displacement(&self, from: Vec2, to: Vec2) -> Vec2 {
        self.minimum_image(to - from)
    }

    /// Check whether a position lies in the canonical cell image
    pub fn contains(&self, position: Vec2) -> bool {
        in_canonical_range(position.x, self.width) && in_canonical_range(position.y, self.height)
    }
}

fn in_canonical_range(value: f64, period: f64) -> bool {
    let half = 0.5 * period;
    value >= -half && value < half
}

fn wrap_axis(value: f64, period: f64) -> (f64, f64) {
    if in_canonical_range(value, period) {
        return (value, 0.0);
    }

    let half = 0.5 * period;
    let mut images = (value / period + 0.5).floor();
    let mut wrapped = value - period * images;

    // floor() can land one image off when the quotient rounds onto an edge
    if wrapped >= half {
        images += 1.0;
        wrapped = value - period * images;
    } else if wrapped < -half {
        images -= 1.0;
        wrapped = value - period * images;
    }

    // Still outside only when the value sits on a cell edge and the
    // subtraction rounds across it; that point is the lower edge of some image.
    if wrapped >= half {
        images += 1.0;
        wrapped = -half;
    } else if wrapped < -half {
        wrapped = -half;
    }

    (wrapped, period * images)
}
