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
//! Headless runner for the molecular dynamics core

use clap::Parser;
use md_engine::config::SimulationConfig;
use md_engine::display::DisplayProjector;
use md_engine::simulation::{FaultPolicy, Simulation};
use std::process::ExitCode;

/// Two-dimensional Lennard-Jones simulation
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file (TOML format)
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,

    /// Number of ticks to run
    #[arg(short = 'n', long, value_name = "TICKS", default_value_t = 1_000)]
    steps: u64,

    /// Random seed for the velocity draw (overrides config file)
    #[arg(short, long, value_name = "SEED")]
    seed: Option<u64>,

    /// Target temperature in kelvin (overrides config file)
    #[arg(short, long, value_name = "KELVIN")]
    temperature: Option<f64>,

    /// Reaction to coincident particles and non-finite results (overrides config file)
    #[arg(long, value_name = "POLICY", value_enum)]
    fault_policy: Option<FaultPolicy>,

    /// Rebuild display geometry every tick and report its size
    #[arg(long)]
    print_geometry: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn load_config(args: &Args) -> Result<SimulationConfig, md_engine::ConfigError> {
    let mut config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {path}");
            SimulationConfig::load(path)?
        }
        None => SimulationConfig::default(),
    };

    if let Some(seed) = args.seed {
        log::info!("Using random seed: {seed}");
        config.thermal.seed = Some(seed);
    }
    if let Some(temperature) = args.temperature {
        log::info!("Overriding temperature to: {temperature} K");
        config.thermal.temperature = temperature;
    }
    if let Some(policy) = args.fault_policy {
        config.run.fault_policy = policy;
    }

    config.validate()?;
    Ok(config)
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let mut sim = match Simulation::from_config(&config) {
        Ok(sim) => sim,
        Err(e) => {
            log::error!("Failed to build simulation: {e}");
            return ExitCode::FAILURE;
        }
    };

    let projector = DisplayProjector::from_config(&config.display);
    let indices = projector.indices(sim.state().len());
    let mut vertices = Vec::new();

    let result = if args.print_geometry {
        sim.run_with(args.steps, |snapshot| projector.fill_vertices(&snapshot, &mut vertices))
    } else {
        sim.run(args.steps)
    };

    if let Err(e) = result {
        log::error!("Stopped after {} ticks: {e}", sim.tick_count());
        return ExitCode::FAILURE;
    }

    if args.print_geometry {
        println!(
            "geometry: {} vertices, {} indices",
            vertices.len() / 3,
            indices.len()
        );
    }

    let energy = sim.energy();
    println!(
        "t = {:.3} ps, T = {:.2} K, E = {:.6e} J",
        sim.elapsed_time() * 1e12,
        energy.temperature,
        energy.total()
    );
    for (index, position) in sim.snapshot().positions().enumerate() {
        println!("{index} {:.6e} {:.6e}", position.x, position.y);
    }

    ExitCode::SUCCESS
}
