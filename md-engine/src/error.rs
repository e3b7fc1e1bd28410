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
//! Error types

use thiserror::Error;

/// Faults raised while building or advancing a simulation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulationError {
    /// Two particles share the same position (zero minimum-image separation)
    #[error("particles {first} and {second} are coincident")]
    CoincidentParticles {
        /// Lower particle index
        first: usize,
        /// Higher particle index
        second: usize,
    },

    /// A step produced a NaN or infinite coordinate
    #[error("non-finite position for particle {index} at tick {tick}")]
    NonFiniteState {
        /// Offending particle
        index: usize,
        /// Tick that produced the value
        tick: u64,
    },

    /// The random velocity draw carried no kinetic energy to rescale
    #[error("velocity draw has zero kinetic energy; cannot rescale to {temperature} K")]
    DegenerateVelocities {
        /// Requested temperature (kelvin)
        temperature: f64,
    },

    /// Two per-particle collections disagree in length
    #[error("expected {expected} particles, got {actual}")]
    ParticleCountMismatch {
        /// Length of the reference collection
        expected: usize,
        /// Length of the mismatched collection
        actual: usize,
    },

    /// A parameter was rejected at construction time
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Faults raised while loading or validating configuration
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// The configuration file could not be read or written
    #[error("I/O error on {path}: {message}")]
    Io {
        /// File path
        path: String,
        /// Underlying error message
        message: String,
    },

    /// The TOML text could not be parsed
    #[error("TOML parse error: {0}")]
    Parse(String),

    /// The configuration could not be serialized
    #[error("TOML serialize error: {0}")]
    Serialize(String),

    /// A parameter is out of range
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter {
        /// Dotted parameter name, e.g. `potential.sigma`
        name: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(err: toml::ser::Error) -> Self {
        ConfigError::Serialize(err.to_string())
    }
}

/// Result alias for simulation operations
pub type Result<T> = std::result::Result<T, SimulationError>;
