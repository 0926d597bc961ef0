//! Chunk lifecycle management - lazy creation, lookup, and pruning

use ahash::AHashMap;
use glam::IVec2;

use super::Chunk;

/// Owns the chunk map and the bounded envelope it may grow within
pub struct ChunkManager {
    chunks: AHashMap<IVec2, Chunk>,
    chunk_size: usize,
    /// Chunk coordinates are confined to `[-max_world_size, max_world_size]` on both axes
    max_world_size: i32,
}

impl ChunkManager {
    pub fn new(chunk_size: usize, max_world_size: i32) -> Self {
        Self {
            chunks: AHashMap::new(),
            chunk_size: chunk_size.max(1),
            max_world_size: max_world_size.max(0),
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn max_world_size(&self) -> i32 {
        self.max_world_size
    }

    /// Convert world coordinates to chunk coordinates + local offset
    pub fn world_to_chunk_coords(&self, world_x: i32, world_y: i32) -> (IVec2, i32, i32) {
        let size = self.chunk_size as i32;
        let chunk_x = world_x.div_euclid(size);
        let chunk_y = world_y.div_euclid(size);
        let local_x = world_x.rem_euclid(size);
        let local_y = world_y.rem_euclid(size);
        (IVec2::new(chunk_x, chunk_y), local_x, local_y)
    }

    pub fn in_envelope(&self, chunk_pos: IVec2) -> bool {
        chunk_pos.x.abs() <= self.max_world_size && chunk_pos.y.abs() <= self.max_world_size
    }

    /// True if the world coordinate lies inside the envelope
    pub fn contains_cell(&self, world_x: i32, world_y: i32) -> bool {
        let (chunk_pos, _, _) = self.world_to_chunk_coords(world_x, world_y);
        self.in_envelope(chunk_pos)
    }

    /// Resolve a world coordinate to its chunk, creating the chunk on first touch.
    /// Returns `None` outside the envelope.
    pub fn resolve_mut(&mut self, world_x: i32, world_y: i32) -> Option<(&mut Chunk, i32, i32)> {
        let (chunk_pos, local_x, local_y) = self.world_to_chunk_coords(world_x, world_y);
        if !self.in_envelope(chunk_pos) {
            return None;
        }

        let size = self.chunk_size;
        let chunk = self.chunks.entry(chunk_pos).or_insert_with(|| {
            log::trace!("[CHUNK] Created chunk ({}, {})", chunk_pos.x, chunk_pos.y);
            Chunk::new(chunk_pos.x, chunk_pos.y, size)
        });
        chunk.touch();
        Some((chunk, local_x, local_y))
    }

    /// Resolve without creating
    pub fn resolve(&self, world_x: i32, world_y: i32) -> Option<(&Chunk, i32, i32)> {
        let (chunk_pos, local_x, local_y) = self.world_to_chunk_coords(world_x, world_y);
        self.chunks
            .get(&chunk_pos)
            .map(|chunk| (chunk, local_x, local_y))
    }

    pub fn chunk(&self, chunk_pos: IVec2) -> Option<&Chunk> {
        self.chunks.get(&chunk_pos)
    }

    pub fn chunk_mut(&mut self, chunk_pos: IVec2) -> Option<&mut Chunk> {
        self.chunks.get_mut(&chunk_pos)
    }

    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> + '_ {
        self.chunks.values()
    }

    pub fn chunks_mut(&mut self) -> impl Iterator<Item = &mut Chunk> + '_ {
        self.chunks.values_mut()
    }

    /// Snapshot of allocated chunk coordinates
    pub fn chunk_positions(&self) -> Vec<IVec2> {
        self.chunks.keys().copied().collect()
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Drop every chunk with no occupied cells, returning how many were dropped
    pub fn remove_empty_chunks(&mut self) -> usize {
        let before = self.chunks.len();
        self.chunks.retain(|_, chunk| !chunk.is_empty());
        let removed = before - self.chunks.len();
        if removed > 0 {
            log::debug!("[CHUNK] Pruned {} empty chunks", removed);
        }
        removed
    }

    /// Drop chunks that have stayed empty and untouched for `min_idle_ticks`
    /// consecutive passes. Resolving a chunk restarts its count.
    pub fn prune_idle_chunks(&mut self, min_idle_ticks: u32) -> usize {
        let min_idle_ticks = min_idle_ticks.max(1);
        let before = self.chunks.len();
        self.chunks
            .retain(|_, chunk| chunk.age_if_empty() < min_idle_ticks);
        let removed = before - self.chunks.len();
        if removed > 0 {
            log::debug!("[CHUNK] Pruned {} idle chunks", removed);
        }
        removed
    }

    pub fn clear(&mut self) {
        self.chunks.clear();
    }
}
