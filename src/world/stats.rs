//! Simulation statistics collection trait

/// Trait for collecting per-tick simulation statistics
///
/// The driver reports into this so callers can instrument a tick without
/// the core depending on any particular stats sink.
pub trait SimStats {
    /// Record that one material's step was invoked
    fn record_material_stepped(&mut self);

    /// Record chunks reclaimed after the sweep
    fn record_chunks_pruned(&mut self, count: usize);

    /// Record that an explosion was enacted
    fn record_explosion(&mut self);
}

/// A no-op implementation for when stats collection is not needed
#[derive(Default)]
pub struct NoopStats;

impl SimStats for NoopStats {
    fn record_material_stepped(&mut self) {}
    fn record_chunks_pruned(&mut self, _count: usize) {}
    fn record_explosion(&mut self) {}
}

/// Counters for a single tick, returned by `FallingSandSim::tick`
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickStats {
    pub materials_stepped: usize,
    pub chunks_pruned: usize,
    pub explosions: usize,
}

impl SimStats for TickStats {
    fn record_material_stepped(&mut self) {
        self.materials_stepped += 1;
    }

    fn record_chunks_pruned(&mut self, count: usize) {
        self.chunks_pruned += count;
    }

    fn record_explosion(&mut self) {
        self.explosions += 1;
    }
}
