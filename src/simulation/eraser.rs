//! Eraser - clears its 3×3 neighborhood (and itself) on its first step

use crate::world::MaterialContext;

use super::Material;

pub(crate) fn step(eraser: Material, ctx: &mut dyn MaterialContext) -> Option<Material> {
    let pos = eraser.grid_pos;
    for dy in -1..=1 {
        for dx in -1..=1 {
            ctx.clear(pos.x + dx, pos.y + dy);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::MaterialType;
    use crate::world::CellGrid;
    use glam::IVec2;

    #[test]
    fn test_eraser_clears_neighborhood() {
        let mut grid = CellGrid::new(8);
        for y in 0..8 {
            for x in 0..8 {
                grid.set(x, y, Some(Material::from_def(MaterialType::Stone, IVec2::ZERO)));
            }
        }
        grid.set(3, 3, Some(Material::from_def(MaterialType::Eraser, IVec2::ZERO)));
        let eraser = grid.take(3, 3).unwrap();

        assert!(step(eraser, &mut grid).is_none());

        assert_eq!(grid.count(), 64 - 9);
        for y in 2..=4 {
            for x in 2..=4 {
                assert!(grid.is_empty(x, y));
            }
        }
        assert!(grid.get(1, 3).is_some());
    }

    #[test]
    fn test_eraser_at_grid_corner() {
        let mut grid = CellGrid::new(4);
        grid.set(1, 0, Some(Material::from_def(MaterialType::Sand, IVec2::ZERO)));
        grid.set(0, 0, Some(Material::from_def(MaterialType::Eraser, IVec2::ZERO)));
        let eraser = grid.take(0, 0).unwrap();

        assert!(step(eraser, &mut grid).is_none());
        assert_eq!(grid.count(), 0);
    }
}
