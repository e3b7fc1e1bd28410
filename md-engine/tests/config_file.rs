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
//! Configuration files on disk

use md_engine::boundary::HistoryWrap;
use md_engine::config::SimulationConfig;
use md_engine::simulation::{FaultPolicy, Simulation};
use md_engine::ConfigError;
use std::path::PathBuf;

fn scratch_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("md-engine-{}-{name}", std::process::id()))
}

#[test]
fn test_save_then_load() {
    let path = scratch_path("round_trip.toml");
    let mut config = SimulationConfig::default();
    config.lattice.columns = 4;
    config.thermal.seed = Some(123);
    config.integration.history_wrap = HistoryWrap::CurrentOnly;
    config.run.fault_policy = FaultPolicy::Abort;

    config.save(&path).unwrap();
    let loaded = SimulationConfig::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded, config);
    let sim = Simulation::from_config(&loaded).unwrap();
    assert_eq!(sim.state().len(), 12);
    assert_eq!(sim.fault_policy(), FaultPolicy::Abort);
}

#[test]
fn test_load_missing_file_is_io_error() {
    let path = scratch_path("does_not_exist.toml");
    let err = SimulationConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn test_load_or_default_falls_back_on_bad_file() {
    let path = scratch_path("broken.toml");
    std::fs::write(&path, "[lattice\ncolumns = ").unwrap();
    let config = SimulationConfig::load_or_default(&path);
    std::fs::remove_file(&path).ok();

    assert_eq!(config, SimulationConfig::default());
}

#[test]
fn test_load_rejects_invalid_values() {
    let path = scratch_path("invalid.toml");
    std::fs::write(&path, "[integration]\ntimestep = -1.0\n").unwrap();
    let result = SimulationConfig::load(&path);
    std::fs::remove_file(&path).ok();

    assert!(matches!(result, Err(ConfigError::InvalidParameter { .. })));
}
