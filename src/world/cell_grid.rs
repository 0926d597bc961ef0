//! Fixed-size square grid of material cells

use glam::IVec2;

use crate::simulation::Material;

use super::MaterialContext;

/// Square N×N cell storage with local coordinates in `[0, N)`.
///
/// `origin` is the global coordinate of local (0, 0); materials stored here
/// get `grid_pos = origin + local`.
#[derive(Clone, Debug)]
pub struct CellGrid {
    size: usize,
    origin: IVec2,
    cells: Vec<Option<Material>>,
    occupied: usize,
}

impl CellGrid {
    pub fn new(size: usize) -> Self {
        Self::with_origin(size, IVec2::ZERO)
    }

    pub fn with_origin(size: usize, origin: IVec2) -> Self {
        Self {
            size,
            origin,
            cells: vec![None; size * size],
            occupied: 0,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn origin(&self) -> IVec2 {
        self.origin
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if self.is_valid_cell(x, y) {
            Some(y as usize * self.size + x as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn is_valid_cell(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.size && (y as usize) < self.size
    }

    pub fn get(&self, x: i32, y: i32) -> Option<&Material> {
        self.index(x, y).and_then(|idx| self.cells[idx].as_ref())
    }

    pub fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut Material> {
        let idx = self.index(x, y)?;
        self.cells[idx].as_mut()
    }

    pub fn set(&mut self, x: i32, y: i32, material: Option<Material>) {
        let Some(idx) = self.index(x, y) else {
            return;
        };
        let material = material.map(|mut m| {
            m.set_grid_pos(self.origin + IVec2::new(x, y));
            m
        });

        let was_occupied = self.cells[idx].is_some();
        let now_occupied = material.is_some();
        self.cells[idx] = material;

        match (was_occupied, now_occupied) {
            (false, true) => self.occupied += 1,
            (true, false) => self.occupied -= 1,
            _ => {}
        }
    }

    pub fn take(&mut self, x: i32, y: i32) -> Option<Material> {
        let idx = self.index(x, y)?;
        let material = self.cells[idx].take();
        if material.is_some() {
            self.occupied -= 1;
        }
        material
    }

    pub fn clear(&mut self, x: i32, y: i32) {
        self.take(x, y);
    }

    /// Exchange two cells; a no-op if either is out of range
    pub fn swap(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        if !self.is_valid_cell(x1, y1) || !self.is_valid_cell(x2, y2) {
            return;
        }
        let a = self.take(x1, y1);
        let b = self.take(x2, y2);
        self.set(x1, y1, b);
        self.set(x2, y2, a);
    }

    pub fn is_empty(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_some_and(|idx| self.cells[idx].is_none())
    }

    /// Number of occupied cells
    pub fn count(&self) -> usize {
        self.occupied
    }

    pub fn reset_flags(&mut self) {
        for material in self.cells.iter_mut().flatten() {
            material.updated_this_frame = false;
        }
    }

    /// Clear `is_active` on materials that were not stepped this frame.
    /// Stepped materials keep whatever their step left behind.
    pub fn decay_inactive_flags(&mut self) {
        for material in self.cells.iter_mut().flatten() {
            if !material.updated_this_frame {
                material.is_active = false;
            }
        }
    }

    /// Occupied cells as `(local_x, local_y, material)`
    pub fn iter(&self) -> impl Iterator<Item = (i32, i32, &Material)> + '_ {
        let size = self.size;
        self.cells.iter().enumerate().filter_map(move |(idx, cell)| {
            cell.as_ref()
                .map(|m| ((idx % size) as i32, (idx / size) as i32, m))
        })
    }
}

impl MaterialContext for CellGrid {
    fn get(&mut self, x: i32, y: i32) -> Option<&Material> {
        CellGrid::get(self, x, y)
    }

    fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut Material> {
        CellGrid::get_mut(self, x, y)
    }

    fn set(&mut self, x: i32, y: i32, material: Option<Material>) {
        CellGrid::set(self, x, y, material)
    }

    fn take(&mut self, x: i32, y: i32) -> Option<Material> {
        CellGrid::take(self, x, y)
    }

    fn swap(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        CellGrid::swap(self, x1, y1, x2, y2)
    }

    fn is_valid_cell(&self, x: i32, y: i32) -> bool {
        CellGrid::is_valid_cell(self, x, y)
    }

    fn is_empty(&mut self, x: i32, y: i32) -> bool {
        CellGrid::is_empty(self, x, y)
    }

    fn count(&self) -> usize {
        CellGrid::count(self)
    }

    fn reset_flags(&mut self) {
        CellGrid::reset_flags(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::MaterialType;

    fn sand() -> Option<Material> {
        Some(Material::from_def(MaterialType::Sand, IVec2::ZERO))
    }

    #[test]
    fn test_new_grid_is_empty() {
        let grid = CellGrid::new(8);
        assert_eq!(grid.count(), 0);
        assert!(grid.is_empty(0, 0));
        assert!(grid.is_empty(7, 7));
    }

    #[test]
    fn test_set_updates_position_and_count() {
        let mut grid = CellGrid::new(8);
        grid.set(3, 4, sand());

        let material = grid.get(3, 4).unwrap();
        assert_eq!(material.grid_pos, IVec2::new(3, 4));
        assert_eq!(material.world_pos, glam::Vec2::new(12.0, 16.0));
        assert_eq!(grid.count(), 1);

        // Overwriting an occupied cell keeps the count
        grid.set(3, 4, sand());
        assert_eq!(grid.count(), 1);

        grid.set(3, 4, None);
        assert_eq!(grid.count(), 0);
    }

    #[test]
    fn test_origin_offsets_grid_pos() {
        let mut grid = CellGrid::with_origin(8, IVec2::new(-8, 16));
        grid.set(1, 2, sand());

        assert_eq!(grid.get(1, 2).unwrap().grid_pos, IVec2::new(-7, 18));
    }

    #[test]
    fn test_out_of_range_is_noop() {
        let mut grid = CellGrid::new(4);

        grid.set(-1, 0, sand());
        grid.set(4, 0, sand());
        grid.set(0, 4, sand());

        assert_eq!(grid.count(), 0);
        assert!(grid.get(-1, 0).is_none());
        assert!(grid.take(10, 10).is_none());
        assert!(!grid.is_empty(-1, 0));
        assert!(!grid.is_valid_cell(4, 0));
    }

    #[test]
    fn test_swap_updates_both_positions() {
        let mut grid = CellGrid::new(4);
        grid.set(0, 0, sand());
        grid.set(
            1,
            0,
            Some(Material::from_def(MaterialType::Water, IVec2::ZERO)),
        );

        grid.swap(0, 0, 1, 0);

        let water = grid.get(0, 0).unwrap();
        assert_eq!(water.material_type, MaterialType::Water);
        assert_eq!(water.grid_pos, IVec2::new(0, 0));

        let sand = grid.get(1, 0).unwrap();
        assert_eq!(sand.material_type, MaterialType::Sand);
        assert_eq!(sand.grid_pos, IVec2::new(1, 0));
        assert_eq!(grid.count(), 2);
    }

    #[test]
    fn test_swap_with_empty_moves() {
        let mut grid = CellGrid::new(4);
        grid.set(0, 0, sand());

        grid.swap(0, 0, 0, 1);

        assert!(grid.is_empty(0, 0));
        assert_eq!(grid.get(0, 1).unwrap().grid_pos, IVec2::new(0, 1));
        assert_eq!(grid.count(), 1);
    }

    #[test]
    fn test_swap_out_of_range_is_noop() {
        let mut grid = CellGrid::new(4);
        grid.set(0, 0, sand());

        grid.swap(0, 0, -1, 0);

        assert!(grid.get(0, 0).is_some());
        assert_eq!(grid.count(), 1);
    }

    #[test]
    fn test_reset_flags() {
        let mut grid = CellGrid::new(4);
        grid.set(0, 0, sand());
        grid.set(1, 1, sand());
        for (x, y) in [(0, 0), (1, 1)] {
            grid.get_mut(x, y).unwrap().updated_this_frame = true;
        }

        grid.reset_flags();

        assert!(grid.iter().all(|(_, _, m)| !m.updated_this_frame));
    }

    #[test]
    fn test_decay_keeps_stepped_materials_active() {
        let mut grid = CellGrid::new(4);
        grid.set(0, 0, sand());
        grid.set(1, 1, sand());
        let moved = grid.get_mut(0, 0).unwrap();
        moved.updated_this_frame = true;
        moved.is_active = true;

        grid.decay_inactive_flags();

        assert!(grid.get(0, 0).unwrap().is_active);
        assert!(!grid.get(1, 1).unwrap().is_active);
    }

    #[test]
    fn test_iter_yields_local_coords() {
        let mut grid = CellGrid::with_origin(4, IVec2::new(4, 4));
        grid.set(2, 3, sand());

        let cells: Vec<_> = grid.iter().map(|(x, y, _)| (x, y)).collect();
        assert_eq!(cells, vec![(2, 3)]);
    }
}
