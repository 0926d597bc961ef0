//! Movable solids - fall, pile up, slide off slopes, sink through liquids

use glam::IVec2;

use crate::world::{MaterialContext, WorldRng};

use super::physics::{accumulate_vertical, block, displace_into, GRAVITY};
use super::{Material, MaterialClass};

pub(crate) fn step<R: WorldRng + ?Sized>(
    mut material: Material,
    ctx: &mut dyn MaterialContext,
    rng: &mut R,
    dt: f32,
) -> Option<Material> {
    apply_submersion(&mut material, ctx, rng);

    let steps = accumulate_vertical(&mut material, GRAVITY, dt);
    let dir = steps.signum();

    // No whole cell to travel this tick; a supported grain still settles
    if steps == 0 && is_resting(&material, ctx) {
        let friction = material.def().friction;
        block(&mut material, friction);
    }

    for _ in 0..steps.abs() {
        let pos = material.grid_pos;
        let below = pos + IVec2::new(0, dir);

        if !ctx.is_valid_cell(below.x, below.y) {
            let friction = material.def().friction;
            block(&mut material, friction);
            break;
        }

        match ctx.class_at(below.x, below.y) {
            None | Some(MaterialClass::Gas) => {
                displace_into(&mut material, ctx, below);
                continue;
            }
            Some(MaterialClass::Liquid) => {
                sink_into_liquid(&mut material, ctx, rng, below);
                continue;
            }
            _ => {}
        }

        // Slide off whatever we landed on
        let side = if rng.gen_bool() { -1 } else { 1 };
        let slide = [side, -side]
            .into_iter()
            .map(|dx| pos + IVec2::new(dx, dir))
            .find(|&target| {
                ctx.is_empty(target.x, target.y)
                    || ctx.class_at(target.x, target.y) == Some(MaterialClass::Liquid)
            });
        if let Some(target) = slide {
            displace_into(&mut material, ctx, target);
            continue;
        }

        let friction = material.def().friction;
        block(&mut material, friction);
        break;
    }

    material.clamp_velocity();
    Some(material)
}

/// Nothing below or diagonally below can be entered
fn is_resting(material: &Material, ctx: &mut dyn MaterialContext) -> bool {
    let below = material.grid_pos + IVec2::Y;
    if !ctx.is_valid_cell(below.x, below.y) {
        return true;
    }
    if matches!(
        ctx.class_at(below.x, below.y),
        None | Some(MaterialClass::Gas) | Some(MaterialClass::Liquid)
    ) {
        return false;
    }

    [-1, 1].into_iter().all(|dx| {
        let target = below + IVec2::new(dx, 0);
        !ctx.is_empty(target.x, target.y)
            && ctx.class_at(target.x, target.y) != Some(MaterialClass::Liquid)
    })
}

/// A liquid directly below slows the fall and adds sideways jitter
fn apply_submersion<R: WorldRng + ?Sized>(
    material: &mut Material,
    ctx: &mut dyn MaterialContext,
    rng: &mut R,
) {
    let below = material.grid_pos + IVec2::Y;
    let surface = ctx
        .get(below.x, below.y)
        .filter(|m| m.is_liquid())
        .map(|m| (m.def().vertical_damping, m.def().turbulence_strength));

    if let Some((damping, turbulence)) = surface {
        material.velocity.y *= 1.0 - damping;
        if turbulence > 0.0 {
            material.velocity.x += rng.gen_range_f32(-turbulence, turbulence);
        }
    }
}

/// Push the liquid at `target` aside if it has room, otherwise trade places
fn sink_into_liquid<R: WorldRng + ?Sized>(
    material: &mut Material,
    ctx: &mut dyn MaterialContext,
    rng: &mut R,
    target: IVec2,
) {
    // Our own cell (above the liquid) is the fallback, via displace_into
    let (left, right) = if rng.gen_bool() {
        (IVec2::NEG_X, IVec2::X)
    } else {
        (IVec2::X, IVec2::NEG_X)
    };
    let pushed = [left, right, IVec2::Y]
        .into_iter()
        .map(|offset| target + offset)
        .find(|&cell| ctx.is_empty(cell.x, cell.y));

    if let Some(cell) = pushed {
        ctx.swap(target.x, target.y, cell.x, cell.y);
        if let Some(liquid) = ctx.get_mut(cell.x, cell.y) {
            liquid.set_active();
        }
    }
    displace_into(material, ctx, target);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::MaterialType;
    use crate::world::CellGrid;

    struct TestRng {
        bool_value: bool,
    }

    impl WorldRng for TestRng {
        fn gen_bool(&mut self) -> bool {
            self.bool_value
        }

        fn gen_f32(&mut self) -> f32 {
            0.5
        }
    }

    const DT: f32 = 1.0 / 60.0;

    fn place(grid: &mut CellGrid, x: i32, y: i32, material_type: MaterialType) {
        grid.set(x, y, Some(Material::from_def(material_type, IVec2::ZERO)));
    }

    /// Sand at terminal speed, fast enough for one cell per tick
    fn falling_sand(grid: &mut CellGrid, x: i32, y: i32) -> Material {
        place(grid, x, y, MaterialType::Sand);
        let mut sand = grid.take(x, y).unwrap();
        sand.velocity.y = 100.0;
        sand
    }

    #[test]
    fn test_sand_falls_into_empty() {
        let mut grid = CellGrid::new(8);
        let sand = falling_sand(&mut grid, 3, 0);
        let mut rng = TestRng { bool_value: true };

        let sand = step(sand, &mut grid, &mut rng, DT).unwrap();

        assert_eq!(sand.grid_pos, IVec2::new(3, 1));
        assert!(sand.is_active);
    }

    #[test]
    fn test_sand_accumulates_before_first_move() {
        let mut grid = CellGrid::new(8);
        place(&mut grid, 3, 0, MaterialType::Sand);
        let sand = grid.take(3, 0).unwrap();
        let mut rng = TestRng { bool_value: true };

        let sand = step(sand, &mut grid, &mut rng, DT).unwrap();

        assert_eq!(sand.grid_pos, IVec2::new(3, 0));
        assert!(sand.movement_remainder.y > 0.0);
    }

    #[test]
    fn test_sand_slides_diagonally() {
        let mut grid = CellGrid::new(8);
        place(&mut grid, 3, 4, MaterialType::Stone);
        let sand = falling_sand(&mut grid, 3, 3);
        let mut rng = TestRng { bool_value: false };

        let sand = step(sand, &mut grid, &mut rng, DT).unwrap();

        // false => slide right first
        assert_eq!(sand.grid_pos, IVec2::new(4, 4));
    }

    #[test]
    fn test_sand_rests_when_blocked() {
        let mut grid = CellGrid::new(8);
        for x in 2..=4 {
            place(&mut grid, x, 4, MaterialType::Stone);
        }
        let sand = falling_sand(&mut grid, 3, 3);
        let mut rng = TestRng { bool_value: true };

        let sand = step(sand, &mut grid, &mut rng, DT).unwrap();

        assert_eq!(sand.grid_pos, IVec2::new(3, 3));
        assert_eq!(sand.velocity.y, 0.0);
        assert_eq!(sand.movement_remainder.y, 0.0);
    }

    #[test]
    fn test_sand_stops_at_grid_edge() {
        let mut grid = CellGrid::new(4);
        let sand = falling_sand(&mut grid, 1, 3);
        let mut rng = TestRng { bool_value: true };

        let sand = step(sand, &mut grid, &mut rng, DT).unwrap();

        assert_eq!(sand.grid_pos, IVec2::new(1, 3));
    }

    #[test]
    fn test_sand_sinks_and_pushes_water_aside() {
        let mut grid = CellGrid::new(8);
        place(&mut grid, 3, 4, MaterialType::Water);
        let sand = falling_sand(&mut grid, 3, 3);
        // true => water pushed left first
        let mut rng = TestRng { bool_value: true };

        let sand = step(sand, &mut grid, &mut rng, DT).unwrap();

        assert_eq!(sand.grid_pos, IVec2::new(3, 4));
        let water = grid.get(2, 4).unwrap();
        assert_eq!(water.material_type, MaterialType::Water);
        assert!(water.is_active);
        assert!(grid.is_empty(3, 3));
        assert_eq!(grid.count(), 1);
    }

    #[test]
    fn test_sand_swaps_with_enclosed_water() {
        let mut grid = CellGrid::new(8);
        place(&mut grid, 2, 4, MaterialType::Stone);
        place(&mut grid, 4, 4, MaterialType::Stone);
        place(&mut grid, 3, 5, MaterialType::Stone);
        place(&mut grid, 3, 4, MaterialType::Water);
        let sand = falling_sand(&mut grid, 3, 3);
        let mut rng = TestRng { bool_value: true };

        let sand = step(sand, &mut grid, &mut rng, DT).unwrap();

        assert_eq!(sand.grid_pos, IVec2::new(3, 4));
        assert_eq!(grid.get(3, 3).unwrap().material_type, MaterialType::Water);
    }

    #[test]
    fn test_supported_sand_keeps_zero_vertical_velocity() {
        let mut grid = CellGrid::new(8);
        for x in 2..=4 {
            place(&mut grid, x, 5, MaterialType::Stone);
        }
        place(&mut grid, 3, 4, MaterialType::Sand);
        let mut rng = TestRng { bool_value: true };

        for _ in 0..6 {
            let sand = grid.take(3, 4).unwrap();
            let sand = step(sand, &mut grid, &mut rng, DT).unwrap();
            assert_eq!(sand.grid_pos, IVec2::new(3, 4));
            assert_eq!(sand.velocity.y, 0.0);
            assert_eq!(sand.movement_remainder.y, 0.0);
            grid.set(3, 4, Some(sand));
        }
    }

    #[test]
    fn test_unsupported_slow_sand_keeps_accelerating() {
        let mut grid = CellGrid::new(8);
        place(&mut grid, 3, 2, MaterialType::Sand);
        let sand = grid.take(3, 2).unwrap();
        let mut rng = TestRng { bool_value: true };

        let sand = step(sand, &mut grid, &mut rng, DT).unwrap();

        // Less than a cell banked, but nothing underneath
        assert_eq!(sand.grid_pos, IVec2::new(3, 2));
        assert!(sand.velocity.y > 0.0);
    }

    #[test]
    fn test_submersion_damps_fall() {
        let mut grid = CellGrid::new(8);
        place(&mut grid, 3, 4, MaterialType::Water);
        place(&mut grid, 3, 3, MaterialType::Sand);
        let mut sand = grid.take(3, 3).unwrap();
        sand.velocity.y = 40.0;
        let mut rng = TestRng { bool_value: true };

        apply_submersion(&mut sand, &mut grid, &mut rng);

        // Water damping is 0.5; gen_f32 = 0.5 gives zero jitter
        assert_eq!(sand.velocity.y, 20.0);
        assert_eq!(sand.velocity.x, 0.0);
    }
}
