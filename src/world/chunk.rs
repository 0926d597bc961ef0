//! Chunk - a square region of the world

use glam::IVec2;

use super::CellGrid;

/// A chunk of the world at a fixed chunk coordinate
#[derive(Clone, Debug)]
pub struct Chunk {
    x: i32,
    y: i32,
    grid: CellGrid,
    /// Consecutive prune passes this chunk has been found empty and untouched
    idle_ticks: u32,
}

impl Chunk {
    pub fn new(x: i32, y: i32, size: usize) -> Self {
        let origin = IVec2::new(x, y) * size as i32;
        Self {
            x,
            y,
            grid: CellGrid::with_origin(size, origin),
            idle_ticks: 0,
        }
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn pos(&self) -> IVec2 {
        IVec2::new(self.x, self.y)
    }

    pub fn grid(&self) -> &CellGrid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut CellGrid {
        &mut self.grid
    }

    /// Count occupied cells
    pub fn count(&self) -> usize {
        self.grid.count()
    }

    pub fn is_empty(&self) -> bool {
        self.grid.count() == 0
    }

    pub fn idle_ticks(&self) -> u32 {
        self.idle_ticks
    }

    /// Resolved through the world; restarts the idle count
    pub(crate) fn touch(&mut self) {
        self.idle_ticks = 0;
    }

    /// Advance the idle count if empty, reset it otherwise. Returns the count.
    pub(crate) fn age_if_empty(&mut self) -> u32 {
        if self.is_empty() {
            self.idle_ticks += 1;
        } else {
            self.idle_ticks = 0;
        }
        self.idle_ticks
    }
}
