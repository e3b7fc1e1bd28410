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
//! Simulation state: the owned collection of particle snapshots
//!
//! Each particle carries its current and previous position. Together they
//! encode velocity implicitly, which is all the position Verlet recurrence
//! needs. The particle count is fixed when the state is built.
//!
//! Only the integrator and the velocity initializer mutate a state. Everyone
//! else reads it through [`Snapshot`].

use crate::boundary::PeriodicCell;
use crate::error::{Result, SimulationError};
use crate::vector::Vec2;

/// A single particle record
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    index: usize,
    position: Vec2,
    previous_position: Vec2,
}

impl Particle {
    /// Stable identity of the particle (0..N-1)
    pub fn index(&self) -> usize {
        self.index
    }

    /// Current position (meters)
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Position one time step earlier (meters)
    pub fn previous_position(&self) -> Vec2 {
        self.previous_position
    }

    /// Check if both snapshots are finite
    pub fn is_valid(&self) -> bool {
        self.position.is_valid() && self.previous_position.is_valid()
    }
}

/// Owned current/previous positions of every particle
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationState {
    particles: Vec<Particle>,
}

impl SimulationState {
    /// Create a state at rest: every previous position equals the current one
    pub fn from_positions(positions: Vec<Vec2>) -> Self {
        let particles = positions
            .into_iter()
            .enumerate()
            .map(|(index, position)| Particle {
                index,
                position,
                previous_position: position,
            })
            .collect();
        SimulationState { particles }
    }

    /// Create a state with an explicit previous-position history
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::ParticleCountMismatch`] if the two slices
    /// differ in length.
    pub fn with_history(positions: Vec<Vec2>, previous_positions: Vec<Vec2>) -> Result<Self> {
        if positions.len() != previous_positions.len() {
            return Err(SimulationError::ParticleCountMismatch {
                expected: positions.len(),
                actual: previous_positions.len(),
            });
        }

        let particles = positions
            .into_iter()
            .zip(previous_positions)
            .enumerate()
            .map(|(index, (position, previous_position))| Particle {
                index,
                position,
                previous_position,
            })
            .collect();
        Ok(SimulationState { particles })
    }

    /// Number of particles
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Whether the state holds no particles
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// All particle records in index order
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// A single particle record
    pub fn particle(&self, index: usize) -> Option<&Particle> {
        self.particles.get(index)
    }

    /// Current positions in index order
    pub fn positions(&self) -> Vec<Vec2> {
        self.particles.iter().map(|p| p.position).collect()
    }

    /// Previous positions in index order
    pub fn previous_positions(&self) -> Vec<Vec2> {
        self.particles.iter().map(|p| p.previous_position).collect()
    }

    /// Check that every snapshot of every particle is finite
    pub fn is_valid(&self) -> bool {
        self.particles.iter().all(Particle::is_valid)
    }

    /// Seed the previous position of one particle
    pub(crate) fn set_previous_position(&mut self, index: usize, previous: Vec2) {
        self.particles[index].previous_position = previous;
    }

    /// Commit one Verlet step for one particle
    pub(crate) fn commit(&mut self, index: usize, position: Vec2, previous: Vec2) {
        let particle = &mut self.particles[index];
        particle.previous_position = previous;
        particle.position = position;
    }
}

/// Read-only view of the latest committed state
///
/// Handed to the presentation side once per tick. It borrows the state, so
/// the borrow checker guarantees no tick runs while a snapshot is alive.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    particles: &'a [Particle],
    tick: u64,
    time: f64,
}

impl<'a> Snapshot<'a> {
    pub(crate) fn new(state: &'a SimulationState, tick: u64, time: f64) -> Self {
        Snapshot {
            particles: &state.particles,
            tick,
            time,
        }
    }

    /// Number of completed ticks when the snapshot was taken
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Elapsed simulated time (seconds)
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Number of particles
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Whether the snapshot holds no particles
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Position of one particle
    pub fn position(&self, index: usize) -> Option<Vec2> {
        self.particles.get(index).map(Particle::position)
    }

    /// Positions in index order
    pub fn positions(&self) -> impl ExactSizeIterator<Item = Vec2> + 'a {
        self.particles.iter().map(Particle::position)
    }

    /// Copy the positions out of the snapshot
    pub fn to_vec(&self) -> Vec<Vec2> {
        self.positions().collect()
    }
}

/// Triangular starting lattice and the periodic cell it tiles
///
/// Rows alternate between two horizontal offsets half a spacing apart and
/// are `sqrt(0.75) * spacing` apart vertically. Particles are numbered
/// row-major starting from the top row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lattice {
    /// Equilibrium inter-particle spacing (meters)
    pub spacing: f64,
    /// Particles per row
    pub columns: usize,
    /// Number of rows
    pub rows: usize,
}

impl Lattice {
    /// Create a lattice description
    pub fn new(spacing: f64, columns: usize, rows: usize) -> Self {
        Lattice {
            spacing,
            columns,
            rows,
        }
    }

    /// Number of particles on the lattice
    pub fn particle_count(&self) -> usize {
        self.columns * self.rows
    }

    /// Vertical distance between neighbouring rows
    pub fn row_spacing(&self) -> f64 {
        (0.75 * self.spacing * self.spacing).sqrt()
    }

    /// Periodic cell derived from the lattice geometry
    pub fn cell(&self) -> PeriodicCell {
        let width = self.columns as f64 * self.spacing;
        let height = self.spacing + (self.rows.saturating_sub(1)) as f64 * self.row_spacing();
        PeriodicCell::new(width, height)
    }

    /// Initial particle positions in index order
    pub fn positions(&self) -> Vec<Vec2> {
        let mid_column = (self.columns as f64 - 1.0) / 2.0;
        let mid_row = (self.rows as f64 - 1.0) / 2.0;
        let row_spacing = self.row_spacing();

        let mut positions = Vec::with_capacity(self.particle_count());
        for row in 0..self.rows {
            let stagger = if row % 2 == 1 { 0.5 } else { 0.0 };
            let y = (mid_row - row as f64) * row_spacing;
            for column in 0..self.columns {
                let x = (column as f64 - mid_column - 0.25 + stagger) * self.spacing;
                positions.push(Vec2::new(x, y));
            }
        }
        positions
    }

    /// A state at rest on the lattice
    pub fn build_state(&self) -> SimulationState {
        SimulationState::from_positions(self.positions())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPACING: f64 = 3.6e-10;

    #[test]
    fn test_default_lattice_matches_reference_layout() {
        let lattice = Lattice::new(SPACING, 3, 3);
        let h = (0.75 * SPACING * SPACING).sqrt();
        let expected = [
            (-1.25, h),
            (-0.25, h),
            (0.75, h),
            (-0.75, 0.0),
            (0.25, 0.0),
            (1.25, 0.0),
            (-1.25, -h),
            (-0.25, -h),
            (0.75, -h),
        ];

        let positions = lattice.positions();
        assert_eq!(positions.len(), 9);
        for (p, (fx, y)) in positions.iter().zip(expected) {
            assert!((p.x - fx * SPACING).abs() < 1e-22);
            assert!((p.y - y).abs() < 1e-22);
        }
    }

    #[test]
    fn test_lattice_cell_dimensions() {
        let lattice = Lattice::new(SPACING, 3, 3);
        let cell = lattice.cell();
        let h = (0.75 * SPACING * SPACING).sqrt();
        assert!((cell.width() - 3.0 * SPACING).abs() < 1e-22);
        assert!((cell.height() - (SPACING + 2.0 * h)).abs() < 1e-22);
    }

    #[test]
    fn test_lattice_positions_inside_cell() {
        let lattice = Lattice::new(SPACING, 3, 3);
        let cell = lattice.cell();
        assert!(lattice.positions().iter().all(|p| cell.contains(*p)));
    }

    #[test]
    fn test_state_at_rest() {
        let state = SimulationState::from_positions(vec![Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0)]);
        assert_eq!(state.len(), 2);
        for (i, p) in state.particles().iter().enumerate() {
            assert_eq!(p.index(), i);
            assert_eq!(p.position(), p.previous_position());
        }
    }

    #[test]
    fn test_with_history_mismatch() {
        let result = SimulationState::with_history(vec![Vec2::zero(); 2], vec![Vec2::zero(); 3]);
        assert!(matches!(
            result,
            Err(SimulationError::ParticleCountMismatch { expected: 2, actual: 3 })
        ));
    }

    #[test]
    fn test_snapshot_reads_committed_positions() {
        let mut state = SimulationState::from_positions(vec![Vec2::zero()]);
        state.commit(0, Vec2::new(1.0, 1.0), Vec2::zero());
        let snapshot = Snapshot::new(&state, 1, 1e-15);
        assert_eq!(snapshot.to_vec(), vec![Vec2::new(1.0, 1.0)]);
        assert_eq!(snapshot.tick(), 1);
        assert_eq!(state.particle(0).map(|p| p.previous_position()), Some(Vec2::zero()));
    }
}
