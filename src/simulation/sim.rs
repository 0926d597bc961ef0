//! FallingSandSim - the tick driver
//!
//! Each tick clears the update flags, flips the horizontal scan direction,
//! and sweeps every chunk bottom row first. Every occupied cell whose
//! material has not been stepped yet this tick is lifted out, stepped once,
//! and the result is written back at its new position.

use std::path::Path;

use glam::IVec2;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;

use crate::config::SimConfig;
use crate::world::{LevelIo, MaterialContext, NoopStats, SimStats, TickStats, World};

use super::{ExplosionReport, MaterialFactory, MaterialType};

/// An explosion requested between ticks, enacted before the next sweep
#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingExplosion {
    center: IVec2,
    radius: i32,
    force: f32,
}

pub struct FallingSandSim {
    world: World,
    rng: Xoshiro256StarStar,
    frame: u64,
    time_accumulator: f32,
    fixed_timestep: f32,
    max_steps_per_frame: u32,
    prune_empty_chunks: bool,
    prune_idle_ticks: u32,
    pending_explosions: Vec<PendingExplosion>,
}

impl FallingSandSim {
    pub fn new(config: &SimConfig) -> Self {
        let rng = match config.simulation.seed {
            Some(seed) => Xoshiro256StarStar::seed_from_u64(seed),
            None => Xoshiro256StarStar::from_entropy(),
        };
        log::info!(
            "[SIM] Created simulation: chunk_size={}, timestep={:.4}s, seed={:?}",
            config.world.chunk_size,
            config.simulation.fixed_timestep,
            config.simulation.seed
        );

        Self {
            world: World::from_config(&config.world),
            rng,
            frame: 0,
            time_accumulator: 0.0,
            fixed_timestep: config.simulation.fixed_timestep,
            max_steps_per_frame: config.simulation.max_steps_per_frame,
            prune_empty_chunks: config.world.prune_empty_chunks,
            prune_idle_ticks: config.world.prune_idle_ticks,
            pending_explosions: Vec::new(),
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Ticks run so far
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn fixed_timestep(&self) -> f32 {
        self.fixed_timestep
    }

    /// Horizontal direction of the current frame's sweep
    pub fn scan_left_to_right(&self) -> bool {
        self.frame % 2 == 0
    }

    /// Advance by frame time, running whole fixed ticks. Returns the number
    /// of ticks run.
    pub fn update(&mut self, frame_dt: f32) -> u32 {
        self.time_accumulator += frame_dt.max(0.0);

        // Cap simulation steps to prevent "spiral of death"
        let mut steps = 0;
        while self.time_accumulator >= self.fixed_timestep && steps < self.max_steps_per_frame {
            self.tick();
            self.time_accumulator -= self.fixed_timestep;
            steps += 1;
        }

        // Clamp accumulator to prevent runaway
        if self.time_accumulator > self.fixed_timestep * 2.0 {
            log::warn!(
                "[SIM] Falling behind by {:.3}s, dropping the backlog",
                self.time_accumulator
            );
            self.time_accumulator = self.fixed_timestep;
        }
        steps
    }

    /// Run exactly one tick
    pub fn tick(&mut self) -> TickStats {
        let mut stats = TickStats::default();
        self.tick_with_stats(&mut stats);
        stats
    }

    pub fn tick_with_stats(&mut self, stats: &mut dyn SimStats) {
        // 1. Clear update flags
        self.world.reset_flags();

        // 2. Advance the frame; parity picks the scan direction
        self.frame += 1;
        let left_to_right = self.scan_left_to_right();

        // 3. Queued explosions
        for explosion in std::mem::take(&mut self.pending_explosions) {
            let center = explosion.center;
            if self
                .world
                .explode(center.x, center.y, explosion.radius, explosion.force, &mut self.rng)
                .is_some()
            {
                stats.record_explosion();
            }
        }

        // 4. Sweep
        self.sweep(left_to_right, stats);

        // 5. Housekeeping
        if self.prune_empty_chunks {
            let pruned = self.world.prune_idle_chunks(self.prune_idle_ticks);
            if pruned > 0 {
                stats.record_chunks_pruned(pruned);
            }
        }
        self.world.decay_inactive_flags();

        log::trace!(
            "[SIM] Frame {} done ({}), {} chunks",
            self.frame,
            if left_to_right { "L→R" } else { "R→L" },
            self.world.chunk_count()
        );
    }

    /// Rows bottom to top across the whole world; within a row, chunk
    /// columns and cells both follow the frame's direction. Chunks created
    /// during the sweep wait for the next tick.
    fn sweep(&mut self, left_to_right: bool, stats: &mut dyn SimStats) {
        let size = self.world.chunk_size() as i32;
        let positions = self.world.chunk_positions();

        let mut chunk_rows: Vec<i32> = positions.iter().map(|pos| pos.y).collect();
        chunk_rows.sort_unstable();
        chunk_rows.dedup();

        for &chunk_y in chunk_rows.iter().rev() {
            let mut chunk_columns: Vec<i32> = positions
                .iter()
                .filter(|pos| pos.y == chunk_y)
                .map(|pos| pos.x)
                .collect();
            chunk_columns.sort_unstable();
            if !left_to_right {
                chunk_columns.reverse();
            }

            for local_y in (0..size).rev() {
                let y = chunk_y * size + local_y;
                for &chunk_x in &chunk_columns {
                    let occupied = self
                        .world
                        .chunk(IVec2::new(chunk_x, chunk_y))
                        .is_some_and(|chunk| !chunk.is_empty());
                    if !occupied {
                        continue;
                    }

                    for i in 0..size {
                        let local_x = if left_to_right { i } else { size - 1 - i };
                        self.step_cell(chunk_x * size + local_x, y, stats);
                    }
                }
            }
        }
    }

    fn step_cell(&mut self, x: i32, y: i32, stats: &mut dyn SimStats) {
        let ready = self
            .world
            .peek(x, y)
            .is_some_and(|material| !material.updated_this_frame);
        if !ready {
            return;
        }
        let Some(material) = self.world.take(x, y) else {
            return;
        };

        stats.record_material_stepped();
        if let Some(next) = material.step(&mut self.world, &mut self.rng, self.fixed_timestep) {
            let pos = next.grid_pos;
            self.world.set(pos.x, pos.y, Some(next));
        }
    }

    /// Put a single material at a cell, replacing whatever is there.
    /// Returns false outside the world.
    pub fn place(&mut self, x: i32, y: i32, material_type: MaterialType) -> bool {
        if !self.world.is_valid_cell(x, y) {
            return false;
        }
        let material = MaterialFactory::create_at(material_type, IVec2::new(x, y), &mut self.rng);
        self.world.set(x, y, Some(material));
        true
    }

    /// Fill the empty cells of a disc. Returns how many were filled.
    pub fn add_material(&mut self, center: IVec2, material_type: MaterialType, radius: i32) -> usize {
        let mut added = 0;
        for pos in disc(center, radius) {
            if !self.world.is_empty(pos.x, pos.y) {
                continue;
            }
            let material = MaterialFactory::create_at(material_type, pos, &mut self.rng);
            self.world.set(pos.x, pos.y, Some(material));
            added += 1;
        }
        log::debug!(
            "[SIM] Added {} {} around ({}, {})",
            added,
            material_type,
            center.x,
            center.y
        );
        added
    }

    /// Empty every cell of a disc. Returns how many materials were removed.
    pub fn clear_materials(&mut self, center: IVec2, radius: i32) -> usize {
        let removed = disc(center, radius)
            .filter(|pos| self.world.take(pos.x, pos.y).is_some())
            .count();
        log::debug!(
            "[SIM] Cleared {} materials around ({}, {})",
            removed,
            center.x,
            center.y
        );
        removed
    }

    pub fn count_materials(&self) -> usize {
        self.world.count()
    }

    /// Detonate immediately
    pub fn explode(&mut self, x: i32, y: i32, radius: i32, force: f32) -> Option<ExplosionReport> {
        let report = self.world.explode(x, y, radius, force, &mut self.rng);
        if let Some(report) = report {
            log::info!(
                "[EXPLODE] Blast at ({}, {}): {} launched, {} destroyed",
                x,
                y,
                report.launched,
                report.destroyed
            );
        }
        report
    }

    /// Detonate at the start of the next tick, counted in its stats
    pub fn queue_explosion(&mut self, x: i32, y: i32, radius: i32, force: f32) {
        self.pending_explosions.push(PendingExplosion {
            center: IVec2::new(x, y),
            radius,
            force,
        });
    }

    /// Drop every material and chunk
    pub fn reset(&mut self) {
        self.world.clear_all();
        self.pending_explosions.clear();
        self.time_accumulator = 0.0;
        log::info!("[SIM] World cleared");
    }

    /// Load a saved level on top of the current world
    pub fn load_level(&mut self, path: &Path) -> anyhow::Result<usize> {
        LevelIo::load(path, &mut self.world, &mut self.rng)
    }

    pub fn save_level(&self, path: &Path) -> anyhow::Result<usize> {
        LevelIo::save(path, &self.world)
    }

    /// Run `ticks` ticks without collecting stats
    pub fn run(&mut self, ticks: u32) {
        let mut stats = NoopStats;
        for _ in 0..ticks {
            self.tick_with_stats(&mut stats);
        }
    }
}

/// Cells with `dx² + dy² <= radius²` around `center`
fn disc(center: IVec2, radius: i32) -> impl Iterator<Item = IVec2> {
    let radius = radius.max(0);
    (-radius..=radius).flat_map(move |dy| {
        (-radius..=radius)
            .filter(move |dx| dx * dx + dy * dy <= radius * radius)
            .map(move |dx| center + IVec2::new(dx, dy))
    })
}
