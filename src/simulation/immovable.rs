//! Immovable solids - only wood does anything: it burns

use glam::IVec2;

use crate::world::{MaterialContext, WorldRng, CARDINALS};

use super::factory::MaterialFactory;
use super::physics::{spawn, touches};
use super::{Material, MaterialClass, MaterialType};

/// Health lost per second while burning without a flame alongside
const WOOD_BURN_RATE: f32 = 25.0;
const WOOD_SMOKE_CHANCE: f32 = 0.1;
const WOOD_FLAME_CHANCE: f32 = 0.7;
const WOOD_SMOKE_LIFETIME: (f32, f32) = (0.5, 1.5);
/// Smoke left behind once the wood has burned through
const WOOD_REMAINS_LIFETIME: (f32, f32) = (0.6, 2.0);

pub(crate) fn step_wood<R: WorldRng + ?Sized>(
    mut wood: Material,
    ctx: &mut dyn MaterialContext,
    rng: &mut R,
    dt: f32,
) -> Option<Material> {
    let pos = wood.grid_pos;

    if touches(ctx, pos, MaterialType::Water) {
        extinguish(&mut wood, ctx);
        return Some(wood);
    }
    if !wood.is_on_fire {
        return Some(wood);
    }
    let Some(health) = wood.health else {
        return Some(wood);
    };

    let burn_rate = adjacent_flame_damage(ctx, pos).unwrap_or(WOOD_BURN_RATE);
    let health = health - burn_rate * dt;
    wood.health = Some(health);
    wood.set_active();

    if health <= 0.0 {
        log::trace!("[SIM] Wood at ({}, {}) burned out", pos.x, pos.y);
        return Some(MaterialFactory::with_lifetime(
            MaterialType::Smoke,
            pos,
            WOOD_REMAINS_LIFETIME,
            rng,
        ));
    }
    char_color(&mut wood, health);

    let above = pos - IVec2::Y;
    if rng.check_probability(WOOD_SMOKE_CHANCE) {
        let smoke =
            MaterialFactory::with_lifetime(MaterialType::Smoke, above, WOOD_SMOKE_LIFETIME, rng);
        spawn(ctx, above, smoke);
    }
    if rng.check_probability(WOOD_FLAME_CHANCE) {
        let flame = MaterialFactory::create_at(MaterialType::Fire, above, rng);
        spawn(ctx, above, flame);
    }
    if rng.check_probability(wood.flammability) {
        spread_fire(ctx, rng, pos);
    }

    Some(wood)
}

/// Water puts out this cell and any burning cardinal neighbor
fn extinguish(wood: &mut Material, ctx: &mut dyn MaterialContext) {
    if wood.is_on_fire {
        log::trace!(
            "[SIM] Wood at ({}, {}) extinguished",
            wood.grid_pos.x,
            wood.grid_pos.y
        );
        wood.set_active();
    }
    wood.is_on_fire = false;

    let pos = wood.grid_pos;
    for dir in CARDINALS {
        if let Some(neighbor) = ctx.get_mut(pos.x + dir.x, pos.y + dir.y) {
            if neighbor.is_on_fire {
                neighbor.is_on_fire = false;
                neighbor.set_active();
            }
        }
    }
}

/// Strongest flame touching `pos`, if any
fn adjacent_flame_damage(ctx: &mut dyn MaterialContext, pos: IVec2) -> Option<f32> {
    CARDINALS
        .iter()
        .filter_map(|dir| {
            ctx.get(pos.x + dir.x, pos.y + dir.y)
                .filter(|m| m.class() == MaterialClass::Fire)
                .map(|m| m.damage)
        })
        .reduce(f32::max)
}

/// Darken toward black as health drops
fn char_color(wood: &mut Material, health: f32) {
    let Some(max_health) = wood.def().health else {
        return;
    };
    let fraction = (health / max_health).clamp(0.0, 1.0);
    let [r, g, b, _] = wood.def().color;
    wood.color[0] = (r as f32 * fraction) as u8;
    wood.color[1] = (g as f32 * fraction) as u8;
    wood.color[2] = (b as f32 * fraction) as u8;
}

/// Try to ignite one flammable neighbor, weighted by its flammability
fn spread_fire<R: WorldRng + ?Sized>(ctx: &mut dyn MaterialContext, rng: &mut R, pos: IVec2) {
    for dir in rng.shuffled_cardinals() {
        let target = pos + dir;
        let flammability = match ctx.get(target.x, target.y) {
            Some(m) if m.is_immovable_solid() && m.flammability > 0.0 && !m.is_on_fire => {
                m.flammability
            }
            _ => continue,
        };

        if rng.check_probability(flammability) {
            if let Some(neighbor) = ctx.get_mut(target.x, target.y) {
                neighbor.is_on_fire = true;
                neighbor.set_active();
            }
        }
        return;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::CellGrid;

    struct TestRng {
        f32_value: f32,
    }

    impl WorldRng for TestRng {
        fn gen_bool(&mut self) -> bool {
            true
        }

        fn gen_f32(&mut self) -> f32 {
            self.f32_value
        }
    }

    const DT: f32 = 1.0 / 60.0;

    fn place(grid: &mut CellGrid, x: i32, y: i32, material_type: MaterialType) {
        grid.set(x, y, Some(Material::from_def(material_type, IVec2::ZERO)));
    }

    fn burning_wood(grid: &mut CellGrid, x: i32, y: i32) -> Material {
        place(grid, x, y, MaterialType::Wood);
        let mut wood = grid.take(x, y).unwrap();
        wood.is_on_fire = true;
        wood
    }

    #[test]
    fn test_unlit_wood_is_inert() {
        let mut grid = CellGrid::new(8);
        place(&mut grid, 3, 3, MaterialType::Wood);
        let wood = grid.take(3, 3).unwrap();
        let mut rng = TestRng { f32_value: 0.0 };

        let wood = step_wood(wood, &mut grid, &mut rng, DT).unwrap();

        assert_eq!(wood.health, Some(350.0));
        assert_eq!(grid.count(), 0);
    }

    #[test]
    fn test_burning_wood_loses_health_and_spawns_flame() {
        let mut grid = CellGrid::new(8);
        let wood = burning_wood(&mut grid, 3, 3);
        // 0.05 passes smoke (0.1) first, so the flame finds the cell taken
        let mut rng = TestRng { f32_value: 0.05 };

        let wood = step_wood(wood, &mut grid, &mut rng, DT).unwrap();

        let health = wood.health.unwrap();
        assert!((health - (350.0 - WOOD_BURN_RATE * DT)).abs() < 1e-3);
        assert_eq!(grid.get(3, 2).unwrap().material_type, MaterialType::Smoke);
        assert!(wood.color[0] < 139);
    }

    #[test]
    fn test_adjacent_flame_burns_faster() {
        let mut grid = CellGrid::new(8);
        place(&mut grid, 4, 3, MaterialType::Fire);
        let wood = burning_wood(&mut grid, 3, 3);
        let mut rng = TestRng { f32_value: 0.99 };

        let wood = step_wood(wood, &mut grid, &mut rng, DT).unwrap();

        let health = wood.health.unwrap();
        assert!((health - (350.0 - 300.0 * DT)).abs() < 1e-3);
    }

    #[test]
    fn test_wood_burns_out_to_smoke() {
        let mut grid = CellGrid::new(8);
        let mut wood = burning_wood(&mut grid, 3, 3);
        wood.health = Some(0.1);
        let mut rng = TestRng { f32_value: 0.99 };

        let smoke = step_wood(wood, &mut grid, &mut rng, DT).unwrap();

        assert_eq!(smoke.material_type, MaterialType::Smoke);
        assert_eq!(smoke.grid_pos, IVec2::new(3, 3));
        let lifetime = smoke.lifetime.unwrap();
        assert!((0.6..2.0).contains(&lifetime));
    }

    #[test]
    fn test_water_extinguishes_wood_and_neighbors() {
        let mut grid = CellGrid::new(8);
        place(&mut grid, 3, 4, MaterialType::Water);
        place(&mut grid, 2, 3, MaterialType::Wood);
        grid.get_mut(2, 3).unwrap().is_on_fire = true;
        let wood = burning_wood(&mut grid, 3, 3);
        let mut rng = TestRng { f32_value: 0.0 };

        let wood = step_wood(wood, &mut grid, &mut rng, DT).unwrap();

        assert!(!wood.is_on_fire);
        assert_eq!(wood.health, Some(350.0));
        assert!(!grid.get(2, 3).unwrap().is_on_fire);
    }

    #[test]
    fn test_fire_spreads_to_wood_neighbor() {
        let mut grid = CellGrid::new(8);
        place(&mut grid, 4, 3, MaterialType::Wood);
        let wood = burning_wood(&mut grid, 3, 3);
        let mut rng = TestRng { f32_value: 0.0 };

        step_wood(wood, &mut grid, &mut rng, DT);

        assert!(grid.get(4, 3).unwrap().is_on_fire);
    }

    #[test]
    fn test_fire_does_not_spread_to_stone() {
        let mut grid = CellGrid::new(8);
        for (x, y) in [(2, 3), (4, 3), (3, 4)] {
            place(&mut grid, x, y, MaterialType::Stone);
        }
        let wood = burning_wood(&mut grid, 3, 3);
        let mut rng = TestRng { f32_value: 0.0 };

        step_wood(wood, &mut grid, &mut rng, DT);

        assert!(grid.iter().all(|(_, _, m)| !m.is_on_fire));
    }
}
