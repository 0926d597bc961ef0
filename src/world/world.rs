//! World - an unbounded-looking grid stitched from lazily created chunks

use glam::IVec2;

use crate::config::WorldConfig;
use crate::simulation::{Explosion, ExplosionReport, Material, MaterialClass};

use super::{Chunk, ChunkManager, ChunkedMaterialContext, MaterialContext, WorldRng};

/// The simulated world, composed of chunks within a bounded envelope
pub struct World {
    chunk_manager: ChunkManager,
}

impl World {
    pub fn new(chunk_size: usize, max_world_size: i32) -> Self {
        log::debug!(
            "[CHUNK] New world: chunk_size={}, envelope=±{} chunks",
            chunk_size,
            max_world_size
        );
        Self {
            chunk_manager: ChunkManager::new(chunk_size, max_world_size),
        }
    }

    pub fn from_config(config: &WorldConfig) -> Self {
        Self::new(config.chunk_size, config.max_world_size)
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_manager.chunk_size()
    }

    pub fn chunk_count(&self) -> usize {
        self.chunk_manager.chunk_count()
    }

    pub fn chunk_manager(&self) -> &ChunkManager {
        &self.chunk_manager
    }

    pub fn chunk(&self, chunk_pos: IVec2) -> Option<&Chunk> {
        self.chunk_manager.chunk(chunk_pos)
    }

    pub fn chunk_positions(&self) -> Vec<IVec2> {
        self.chunk_manager.chunk_positions()
    }

    /// Read a cell without allocating its chunk
    pub fn peek(&self, x: i32, y: i32) -> Option<&Material> {
        let (chunk, local_x, local_y) = self.chunk_manager.resolve(x, y)?;
        chunk.grid().get(local_x, local_y)
    }

    /// Only movable solids block movement for external collision queries
    pub fn is_collidable_at(&self, x: i32, y: i32) -> bool {
        self.peek(x, y)
            .is_some_and(|m| m.class() == MaterialClass::MovableSolid)
    }

    /// Every stored material; each carries its global `grid_pos`
    pub fn materials(&self) -> impl Iterator<Item = &Material> + '_ {
        self.chunk_manager
            .chunks()
            .flat_map(|chunk| chunk.grid().iter().map(|(_, _, m)| m))
    }

    pub fn remove_empty_chunks(&mut self) -> usize {
        self.chunk_manager.remove_empty_chunks()
    }

    /// Per-tick pruning: only chunks empty and unread for `min_idle_ticks` passes go
    pub fn prune_idle_chunks(&mut self, min_idle_ticks: u32) -> usize {
        self.chunk_manager.prune_idle_chunks(min_idle_ticks)
    }

    pub fn decay_inactive_flags(&mut self) {
        for chunk in self.chunk_manager.chunks_mut() {
            chunk.grid_mut().decay_inactive_flags();
        }
    }

    /// Drop every chunk and material
    pub fn clear_all(&mut self) {
        self.chunk_manager.clear();
    }

    /// Detonate at a global cell. The blast works on the center chunk's local
    /// grid, so it is clipped at that chunk's edges.
    pub fn explode<R: WorldRng + ?Sized>(
        &mut self,
        x: i32,
        y: i32,
        radius: i32,
        force: f32,
        rng: &mut R,
    ) -> Option<ExplosionReport> {
        if radius <= 0 {
            log::warn!("[EXPLODE] Ignoring explosion with radius {}", radius);
            return None;
        }

        let Some((chunk, local_x, local_y)) = self.chunk_manager.resolve_mut(x, y) else {
            log::debug!("[EXPLODE] ({}, {}) is outside the world", x, y);
            return None;
        };

        log::debug!(
            "[EXPLODE] At ({}, {}) in chunk ({}, {}), radius={}, force={}",
            x,
            y,
            chunk.x(),
            chunk.y(),
            radius,
            force
        );
        Some(Explosion::new(chunk.grid_mut(), local_x, local_y, radius, force).enact(rng))
    }
}

impl MaterialContext for World {
    fn get(&mut self, x: i32, y: i32) -> Option<&Material> {
        let (chunk, local_x, local_y) = self.chunk_manager.resolve_mut(x, y)?;
        chunk.grid().get(local_x, local_y)
    }

    fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut Material> {
        let (chunk, local_x, local_y) = self.chunk_manager.resolve_mut(x, y)?;
        chunk.grid_mut().get_mut(local_x, local_y)
    }

    fn set(&mut self, x: i32, y: i32, material: Option<Material>) {
        match self.chunk_manager.resolve_mut(x, y) {
            Some((chunk, local_x, local_y)) => chunk.grid_mut().set(local_x, local_y, material),
            None => {
                if let Some(material) = material {
                    log::trace!(
                        "[CHUNK] Dropped {} written outside the world at ({}, {})",
                        material.material_type,
                        x,
                        y
                    );
                }
            }
        }
    }

    fn take(&mut self, x: i32, y: i32) -> Option<Material> {
        let (chunk_pos, local_x, local_y) = self.chunk_manager.world_to_chunk_coords(x, y);
        self.chunk_manager
            .chunk_mut(chunk_pos)?
            .grid_mut()
            .take(local_x, local_y)
    }

    fn swap(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        if !self.is_valid_cell(x1, y1) || !self.is_valid_cell(x2, y2) {
            return;
        }
        let a = self.take(x1, y1);
        let b = self.take(x2, y2);
        self.set(x1, y1, b);
        self.set(x2, y2, a);
    }

    fn is_valid_cell(&self, x: i32, y: i32) -> bool {
        self.chunk_manager.contains_cell(x, y)
    }

    fn count(&self) -> usize {
        self.chunk_manager.chunks().map(Chunk::count).sum()
    }

    fn reset_flags(&mut self) {
        for chunk in self.chunk_manager.chunks_mut() {
            chunk.grid_mut().reset_flags();
        }
    }
}

impl ChunkedMaterialContext for World {
    fn all_chunks(&self) -> Box<dyn Iterator<Item = &Chunk> + '_> {
        Box::new(self.chunk_manager.chunks())
    }
}
