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
//! Benchmarks for a full simulation tick
//!
//! Lattices of growing size, each thermalized from a fixed seed so every
//! run measures the same trajectory.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use md_engine::config::SimulationConfig;
use md_engine::display::DisplayProjector;
use md_engine::simulation::Simulation;

fn lattice_config(side: usize) -> SimulationConfig {
    let mut config = SimulationConfig::default();
    config.lattice.columns = side;
    config.lattice.rows = side;
    config.thermal.seed = Some(42);
    config
}

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");

    for side in [3usize, 6, 12, 24] {
        let config = lattice_config(side);
        let mut sim = Simulation::from_config(&config).unwrap();

        group.throughput(Throughput::Elements(config.particle_count() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(side * side), &side, |b, _| {
            b.iter(|| black_box(sim.tick()))
        });
    }

    group.finish();
}

fn bench_tick_with_geometry(c: &mut Criterion) {
    let config = lattice_config(3);
    let projector = DisplayProjector::from_config(&config.display);
    let mut sim = Simulation::from_config(&config).unwrap();
    let mut vertices = Vec::new();

    c.bench_function("tick_with_geometry", |b| {
        b.iter(|| {
            sim.tick().ok();
            projector.fill_vertices(&sim.snapshot(), &mut vertices);
            black_box(vertices.len())
        })
    });
}

fn bench_energy(c: &mut Criterion) {
    let sim = Simulation::from_config(&lattice_config(12)).unwrap();

    c.bench_function("energy_144", |b| b.iter(|| black_box(sim.energy())));
}

criterion_group!(benches, bench_tick, bench_tick_with_geometry, bench_energy);
criterion_main!(benches);
