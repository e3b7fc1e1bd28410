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
//! Headless presentation geometry
//!
//! The drawing side of the program only ever reads snapshots. Each tick it
//! projects particle positions into normalized display coordinates
//! (`[-1, 1]` spans `±view_half_extent` meters) and rebuilds one filled
//! polygon per particle: a center vertex followed by `segments` rim
//! vertices, drawn as a triangle fan. Vertices are `x, y, z` triples of
//! `f32` with `z = 0`, ready to upload to a vertex buffer.
//!
//! The index buffer depends only on the particle count and is built once.

use crate::config::DisplayConfig;
use crate::state::Snapshot;
use crate::vector::Vec2;
use std::f64::consts::TAU;

/// Projects snapshots into display geometry
#[derive(Debug, Clone)]
pub struct DisplayProjector {
    view_half_extent: f64,
    radius: f64,
    segments: usize,
}

impl DisplayProjector {
    /// Create a projector
    ///
    /// # Panics
    ///
    /// Panics if the extent or diameter is non-positive or non-finite, or if
    /// fewer than three segments are requested
    pub fn new(view_half_extent: f64, particle_diameter: f64, segments: usize) -> Self {
        assert!(
            view_half_extent > 0.0 && view_half_extent.is_finite(),
            "View extent must be positive and finite"
        );
        assert!(
            particle_diameter > 0.0 && particle_diameter.is_finite(),
            "Particle diameter must be positive and finite"
        );
        assert!(segments >= 3, "A polygon needs at least three segments");

        DisplayProjector {
            view_half_extent,
            radius: 0.5 * particle_diameter / view_half_extent,
            segments,
        }
    }

    /// Create a projector from the display section of the configuration
    pub fn from_config(config: &DisplayConfig) -> Self {
        Self::new(config.view_half_extent, config.particle_diameter, config.segments)
    }

    /// Vertices per particle polygon (center plus rim)
    pub fn vertices_per_particle(&self) -> usize {
        self.segments + 1
    }

    /// Polygon radius in normalized coordinates
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Map a position (meters) to normalized display coordinates
    pub fn project(&self, position: Vec2) -> Vec2 {
        position / self.view_half_extent
    }

    /// Append the polygon for one particle to `out`
    pub fn push_polygon(&self, position: Vec2, out: &mut Vec<f32>) {
        let center = self.project(position);
        out.extend_from_slice(&[center.x as f32, center.y as f32, 0.0]);

        for i in 0..self.segments {
            let angle = TAU * i as f64 / self.segments as f64;
            let x = center.x + self.radius * angle.cos();
            let y = center.y + self.radius * angle.sin();
            out.extend_from_slice(&[x as f32, y as f32, 0.0]);
        }
    }

    /// Rebuild the vertex buffer for a snapshot, reusing `out`'s allocation
    pub fn fill_vertices(&self, snapshot: &Snapshot<'_>, out: &mut Vec<f32>) {
        out.clear();
        out.reserve(snapshot.len() * self.vertices_per_particle() * 3);
        for position in snapshot.positions() {
            self.push_polygon(position, out);
        }
    }

    /// Vertex buffer for a snapshot
    pub fn vertices(&self, snapshot: &Snapshot<'_>) -> Vec<f32> {
        let mut out = Vec::new();
        self.fill_vertices(snapshot, &mut out);
        out
    }

    /// Triangle-fan index buffer for `particle_count` polygons
    ///
    /// Each polygon contributes `segments` triangles; the last one closes
    /// back on the first rim vertex.
    pub fn indices(&self, particle_count: usize) -> Vec<u32> {
        let stride = self.vertices_per_particle();
        let mut indices = Vec::with_capacity(particle_count * self.segments * 3);

        for particle in 0..particle_count {
            let base = (particle * stride) as u32;
            for k in 0..self.segments as u32 {
                let next = if k + 1 == self.segments as u32 { 1 } else { k + 2 };
                indices.extend_from_slice(&[base, base + k + 1, base + next]);
            }
        }

        indices
    }
}
