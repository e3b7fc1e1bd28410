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
//! Basic example running the default nine-particle system
//!
//! Builds the reference triangular lattice, thermalizes it from a fixed seed
//! and prints energy and positions every few hundred femtoseconds.

use md_engine::config::SimulationConfig;
use md_engine::simulation::Simulation;

fn main() {
    println!("MD Engine - Basic Example");
    println!("=========================\n");

    let mut config = SimulationConfig::default();
    config.thermal.seed = Some(42);

    let mut sim = match Simulation::from_config(&config) {
        Ok(sim) => sim,
        Err(e) => {
            eprintln!("Failed to build simulation: {e}");
            return;
        }
    };

    let cell = sim.cell();
    println!(
        "{} particles in a {:.3e} x {:.3e} m cell, dt = {:e} s\n",
        sim.state().len(),
        cell.width(),
        cell.height(),
        config.integration.timestep
    );

    for _ in 0..5 {
        if let Err(e) = sim.run(500) {
            eprintln!("Run stopped: {e}");
            return;
        }

        let energy = sim.energy();
        println!(
            "t = {:.3} ps  KE = {:.4e} J  PE = {:.4e} J  T = {:.1} K",
            sim.elapsed_time() * 1e12,
            energy.kinetic,
            energy.potential,
            energy.temperature
        );
    }

    println!("\nFinal positions:");
    for (index, position) in sim.snapshot().positions().enumerate() {
        println!("  {index}: ({:.4e}, {:.4e})", position.x, position.y);
    }
}
