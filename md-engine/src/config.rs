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
//! Simulation configuration
//!
//! Every physical constant is fixed when a [`crate::simulation::Simulation`]
//! is built; there is no runtime reconfiguration. Configuration can come from
//! the defaults (the reference 9-particle system), a TOML file, or both: a
//! file only needs the sections and keys it wants to override.
//!
//! ```toml
//! [potential]
//! epsilon = 4.58e-22
//! sigma = 3.5e-10
//!
//! [thermal]
//! temperature = 150.0
//! seed = 42
//! ```

use crate::boundary::{HistoryWrap, PeriodicCell};
use crate::error::ConfigError;
use crate::forces::lennard_jones::ELECTRON_VOLT;
use crate::initialization::DEFAULT_VELOCITY_BOUND;
use crate::simulation::FaultPolicy;
use crate::state::Lattice;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Equilibrium inter-particle spacing of the reference system (meters)
pub const DEFAULT_SPACING: f64 = 3.6e-10;

/// Boltzmann constant (J/K), exact SI value
pub const BOLTZMANN_CONSTANT: f64 = 1.380649e-23;

/// Top-level configuration
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(default)]
pub struct SimulationConfig {
    /// Pair potential parameters
    pub potential: PotentialConfig,
    /// Particle properties
    pub particles: ParticleConfig,
    /// Starting lattice and derived cell
    pub lattice: LatticeConfig,
    /// Time stepping
    pub integration: IntegrationConfig,
    /// Initial velocity draw
    pub thermal: ThermalConfig,
    /// Run loop behavior
    pub run: RunConfig,
    /// Presentation geometry
    pub display: DisplayConfig,
}

/// Lennard-Jones parameters
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct PotentialConfig {
    /// Well depth (joules)
    pub epsilon: f64,
    /// Zero-crossing distance (meters)
    pub sigma: f64,
}

impl Default for PotentialConfig {
    fn default() -> Self {
        Self {
            epsilon: 0.00286 * ELECTRON_VOLT,
            sigma: 0.35e-9,
        }
    }
}

/// Particle properties
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ParticleConfig {
    /// Mass of every particle (kg); defaults to one carbon-12 atom
    pub mass: f64,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self { mass: 1.9944733e-26 }
    }
}

/// Triangular starting lattice
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct LatticeConfig {
    /// Equilibrium spacing (meters)
    pub spacing: f64,
    /// Particles per row
    pub columns: usize,
    /// Number of rows
    pub rows: usize,
}

impl Default for LatticeConfig {
    fn default() -> Self {
        Self {
            spacing: DEFAULT_SPACING,
            columns: 3,
            rows: 3,
        }
    }
}

/// Time stepping
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct IntegrationConfig {
    /// Time step (seconds)
    pub timestep: f64,
    /// How the previous position follows a wrapped current position
    pub history_wrap: HistoryWrap,
}

impl Default for IntegrationConfig {
    fn default() -> Self {
        Self {
            timestep: 1e-15,
            history_wrap: HistoryWrap::default(),
        }
    }
}

/// Initial velocity draw
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ThermalConfig {
    /// Target temperature (kelvin)
    pub temperature: f64,
    /// Boltzmann constant (J/K)
    pub boltzmann_constant: f64,
    /// Upper bound of the raw uniform draw
    pub velocity_bound: f64,
    /// Seed for a reproducible draw; `None` draws a fresh seed each run
    pub seed: Option<u64>,
}

impl Default for ThermalConfig {
    fn default() -> Self {
        Self {
            temperature: 297.0,
            boltzmann_constant: BOLTZMANN_CONSTANT,
            velocity_bound: DEFAULT_VELOCITY_BOUND,
            seed: None,
        }
    }
}

/// Run loop behavior
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct RunConfig {
    /// Ticks between progress log lines
    pub progress_interval: u64,
    /// Reaction to coincident particles and non-finite results
    pub fault_policy: FaultPolicy,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            progress_interval: 100_000,
            fault_policy: FaultPolicy::default(),
        }
    }
}

/// Presentation geometry
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    /// Distance from the view center to the view edge (meters)
    pub view_half_extent: f64,
    /// Drawn particle diameter (meters)
    pub particle_diameter: f64,
    /// Rim segments per particle polygon
    pub segments: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            view_half_extent: 2.5 * DEFAULT_SPACING,
            particle_diameter: 3.5e-10,
            segments: 12,
        }
    }
}

fn require_positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter {
            name,
            reason: format!("{value} must be positive and finite"),
        })
    }
}

impl SimulationConfig {
    /// Parse a configuration from TOML text and validate it
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: SimulationConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&text)
    }

    /// Load configuration from a file, falling back to defaults if the file
    /// is missing or invalid
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("Config file {} not found. Using defaults.", path.display());
            return Self::default();
        }

        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Failed to load config file {}: {}. Using defaults.", path.display(), e);
                Self::default()
            }
        }
    }

    /// Serialize the configuration as TOML
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Save configuration to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = self.to_toml_string()?;
        std::fs::write(path, content).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Check every parameter for range errors
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("potential.epsilon", self.potential.epsilon)?;
        require_positive("potential.sigma", self.potential.sigma)?;
        require_positive("particles.mass", self.particles.mass)?;
        require_positive("lattice.spacing", self.lattice.spacing)?;
        require_positive("integration.timestep", self.integration.timestep)?;
        require_positive("thermal.boltzmann_constant", self.thermal.boltzmann_constant)?;
        require_positive("thermal.velocity_bound", self.thermal.velocity_bound)?;
        require_positive("display.view_half_extent", self.display.view_half_extent)?;
        require_positive("display.particle_diameter", self.display.particle_diameter)?;

        if !(self.thermal.temperature >= 0.0 && self.thermal.temperature.is_finite()) {
            return Err(ConfigError::InvalidParameter {
                name: "thermal.temperature",
                reason: format!("{} must be non-negative and finite", self.thermal.temperature),
            });
        }
        if self.lattice.columns == 0 || self.lattice.rows == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "lattice",
                reason: "columns and rows must be at least 1".to_string(),
            });
        }
        if self.run.progress_interval == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "run.progress_interval",
                reason: "must be at least 1 tick".to_string(),
            });
        }
        if self.display.segments < 3 {
            return Err(ConfigError::InvalidParameter {
                name: "display.segments",
                reason: format!("{} segments cannot form a polygon", self.display.segments),
            });
        }

        Ok(())
    }

    /// Starting lattice described by this configuration
    pub fn lattice(&self) -> Lattice {
        Lattice::new(self.lattice.spacing, self.lattice.columns, self.lattice.rows)
    }

    /// Periodic cell derived from the lattice
    pub fn cell(&self) -> PeriodicCell {
        self.lattice().cell()
    }

    /// Number of particles
    pub fn particle_count(&self) -> usize {
        self.lattice().particle_count()
    }

    /// Lennard-Jones time unit `σ·sqrt(m/ε)` (seconds)
    pub fn characteristic_time(&self) -> f64 {
        self.potential.sigma * (self.particles.mass / self.potential.epsilon).sqrt()
    }
}
