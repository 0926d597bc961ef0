//! The grid interface materials step against

use crate::simulation::{Material, MaterialClass, MaterialType};

use super::Chunk;

/// Cell storage a material can read and mutate while stepping.
///
/// Implemented by a single fixed-size [`CellGrid`](super::CellGrid) (local
/// coordinates) and by the chunked [`World`](super::World) (global
/// coordinates). Out-of-range coordinates never fail: reads return `None`,
/// writes are dropped, `is_empty` is false.
pub trait MaterialContext {
    fn get(&mut self, x: i32, y: i32) -> Option<&Material>;

    fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut Material>;

    /// Store (or clear) a cell, updating the material's position to match
    fn set(&mut self, x: i32, y: i32, material: Option<Material>);

    /// Remove and return a cell's material
    fn take(&mut self, x: i32, y: i32) -> Option<Material>;

    fn clear(&mut self, x: i32, y: i32) {
        self.take(x, y);
    }

    /// Exchange two cells, updating both materials' positions
    fn swap(&mut self, x1: i32, y1: i32, x2: i32, y2: i32);

    fn is_valid_cell(&self, x: i32, y: i32) -> bool;

    fn is_empty(&mut self, x: i32, y: i32) -> bool {
        self.is_valid_cell(x, y) && self.get(x, y).is_none()
    }

    /// Number of occupied cells
    fn count(&self) -> usize;

    /// Clear every material's `updated_this_frame` flag
    fn reset_flags(&mut self);

    fn class_at(&mut self, x: i32, y: i32) -> Option<MaterialClass> {
        self.get(x, y).map(Material::class)
    }

    fn type_at(&mut self, x: i32, y: i32) -> Option<MaterialType> {
        self.get(x, y).map(|m| m.material_type)
    }
}

/// Contexts backed by chunks expose them for sweeps and rendering
pub trait ChunkedMaterialContext: MaterialContext {
    fn all_chunks(&self) -> Box<dyn Iterator<Item = &Chunk> + '_>;
}
