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
//! # MD Engine
//!
//! A two-dimensional molecular dynamics core: a small fixed set of particles
//! in a periodic rectangular cell, interacting through the Lennard-Jones
//! 12-6 potential and advanced with the position Verlet recurrence.
//!
//! ## Features
//!
//! - **Force evaluation**: all-pairs Lennard-Jones forces under the
//!   minimum-image convention
//! - **Integration**: position Verlet with explicit previous-position history
//! - **Periodic boundaries**: canonical wrapping with a configurable policy
//!   for the history snapshot
//! - **Initialization**: uniform velocity draw, drift removal and rescaling
//!   to a target temperature
//! - **Presentation**: read-only snapshots and headless polygon geometry
//! - **Parallelization**: optional Rayon force pass (`parallel` feature)
//!
//! ## Example
//!
//! ```rust
//! use md_engine::config::SimulationConfig;
//! use md_engine::simulation::Simulation;
//!
//! let mut config = SimulationConfig::default();
//! config.thermal.seed = Some(42);
//!
//! let mut sim = Simulation::from_config(&config).unwrap();
//! sim.run(10).unwrap();
//! assert_eq!(sim.snapshot().len(), 9);
//! ```

#![warn(missing_docs)]

/// Two-dimensional vector type
pub mod vector;

/// Periodic boundary conditions
pub mod boundary;

/// Particle state and starting lattice
pub mod state;

/// Pairwise force fields
pub mod forces;

/// Numerical integration
pub mod integration;

/// Start-up velocity initialization
pub mod initialization;

/// Tick loop and diagnostics
pub mod simulation;

/// Headless presentation geometry
pub mod display;

/// Configuration loading and validation
pub mod config;

/// Error types
pub mod error;

pub use error::{ConfigError, Result, SimulationError};
pub use simulation::Simulation;
