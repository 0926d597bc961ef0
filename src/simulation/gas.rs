//! Gases - rise, disperse, and vanish when their lifetime runs out

use crate::world::{MaterialContext, WorldRng};

use super::flow::{flow, GAS_FLOW};
use super::physics::{accumulate_vertical, GRAVITY};
use super::Material;

/// Fraction of gravity pushing gases upward
const GAS_BUOYANCY: f32 = -0.2;

pub(crate) fn step<R: WorldRng + ?Sized>(
    mut gas: Material,
    ctx: &mut dyn MaterialContext,
    rng: &mut R,
    dt: f32,
) -> Option<Material> {
    if gas.age(dt) {
        return None;
    }

    let steps = accumulate_vertical(&mut gas, GRAVITY * GAS_BUOYANCY, dt);
    flow(&mut gas, ctx, rng, steps, &GAS_FLOW);
    Some(gas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::MaterialType;
    use crate::world::CellGrid;
    use glam::IVec2;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    const DT: f32 = 1.0 / 60.0;

    fn lifted(grid: &mut CellGrid, x: i32, y: i32, material_type: MaterialType) -> Material {
        grid.set(x, y, Some(Material::from_def(material_type, IVec2::ZERO)));
        grid.take(x, y).unwrap()
    }

    #[test]
    fn test_gas_expires() {
        let mut grid = CellGrid::new(8);
        let mut smoke = lifted(&mut grid, 3, 3, MaterialType::Smoke);
        smoke.lifetime = Some(DT / 2.0);
        let mut rng = Xoshiro256StarStar::seed_from_u64(1);

        assert!(step(smoke, &mut grid, &mut rng, DT).is_none());
    }

    #[test]
    fn test_gas_rises() {
        let mut grid = CellGrid::new(8);
        let mut steam = lifted(&mut grid, 3, 5, MaterialType::Steam);
        steam.lifetime = Some(10.0);
        let mut rng = Xoshiro256StarStar::seed_from_u64(2);

        let steam = step(steam, &mut grid, &mut rng, DT).unwrap();

        assert_eq!(steam.grid_pos, IVec2::new(3, 4));
        assert!(steam.lifetime.unwrap() < 10.0);
    }

    #[test]
    fn test_gas_spreads_under_ceiling() {
        let mut grid = CellGrid::new(8);
        for x in 0..8 {
            grid.set(
                x,
                0,
                Some(Material::from_def(MaterialType::Wall, IVec2::ZERO)),
            );
        }
        let mut smoke = lifted(&mut grid, 3, 1, MaterialType::Smoke);
        smoke.lifetime = Some(10.0);
        let mut rng = Xoshiro256StarStar::seed_from_u64(3);

        let smoke = step(smoke, &mut grid, &mut rng, DT).unwrap();

        assert_eq!(smoke.grid_pos.y, 1);
        assert_ne!(smoke.grid_pos.x, 3);
    }
}
