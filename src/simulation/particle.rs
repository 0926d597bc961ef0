//! Particles - materials in ballistic flight after an explosion
//!
//! Particles move in world units and trace the cells they cross. They pass
//! through empty cells, gases, and other particles, and land (redepositing
//! their payload) on anything else, at the envelope edge, or when their
//! lifetime runs out.

use std::iter;

use bresenham::Bresenham;
use glam::{IVec2, Vec2};

use crate::world::{MaterialContext, WorldRng};

use super::factory::MaterialFactory;
use super::material::world_to_grid;
use super::physics::{displace_into, GRAVITY};
use super::{Material, MaterialClass};

/// Horizontal velocity jitter per tick (world units/s)
const PARTICLE_JITTER: f32 = 5.0;

pub(crate) fn step<R: WorldRng + ?Sized>(
    mut particle: Material,
    ctx: &mut dyn MaterialContext,
    rng: &mut R,
    dt: f32,
) -> Option<Material> {
    particle.velocity += GRAVITY * dt;
    particle.velocity.x += rng.gen_range_f32(-PARTICLE_JITTER, PARTICLE_JITTER);
    particle.clamp_velocity();

    if particle.age(dt) {
        return land(particle);
    }

    let next_world = particle.world_pos + particle.velocity * dt;
    let start = particle.grid_pos;
    let end = world_to_grid(next_world);

    if start != end {
        // Bresenham yields the start but not the end
        let path = Bresenham::new(
            (start.x as isize, start.y as isize),
            (end.x as isize, end.y as isize),
        )
        .skip(1)
        .map(|(x, y)| IVec2::new(x as i32, y as i32))
        .chain(iter::once(end));

        for cell in path {
            if !ctx.is_valid_cell(cell.x, cell.y) {
                return land(particle);
            }
            match ctx.class_at(cell.x, cell.y) {
                None | Some(MaterialClass::Gas) | Some(MaterialClass::Particle) => {
                    displace_into(&mut particle, ctx, cell);
                }
                Some(_) => return land(particle),
            }
        }
    }

    particle.world_pos = next_world;
    particle.set_active();
    Some(particle)
}

/// Redeposit the payload where the particle stands. Immovable solids come
/// back down as loose debris.
fn land(mut particle: Material) -> Option<Material> {
    let pos = particle.grid_pos;
    let payload = particle.carried.take()?;

    let mut landed = if payload.is_immovable_solid() {
        MaterialFactory::falling_debris(&payload, pos)
    } else {
        *payload
    };
    landed.set_grid_pos(pos);
    landed.velocity = Vec2::ZERO;
    landed.net_force = Vec2::ZERO;
    landed.movement_remainder = Vec2::ZERO;
    landed.set_active();
    Some(landed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::MaterialType;
    use crate::world::CellGrid;

    /// Zero jitter: gen_range_f32(-j, j) with 0.5 is 0
    struct TestRng;

    impl WorldRng for TestRng {
        fn gen_bool(&mut self) -> bool {
            true
        }

        fn gen_f32(&mut self) -> f32 {
            0.5
        }
    }

    const DT: f32 = 1.0 / 60.0;

    fn launched(payload: MaterialType, pos: IVec2, velocity: Vec2) -> Material {
        MaterialFactory::particle(Material::from_def(payload, pos), velocity)
    }

    #[test]
    fn test_particle_flies_through_empty_cells() {
        let mut grid = CellGrid::new(64);
        // 600 units/s right, ~10 units (2.5 cells) per tick
        let particle = launched(MaterialType::Sand, IVec2::new(10, 10), Vec2::new(600.0, 0.0));

        let particle = step(particle, &mut grid, &mut TestRng, DT).unwrap();

        assert_eq!(particle.material_type, MaterialType::Particle);
        assert_eq!(particle.grid_pos.x, 12);
        assert!(particle.world_pos.x > 48.0);
    }

    #[test]
    fn test_particle_lands_before_obstacle() {
        let mut grid = CellGrid::new(64);
        grid.set(
            12,
            10,
            Some(Material::from_def(MaterialType::Stone, IVec2::ZERO)),
        );
        let particle = launched(MaterialType::Sand, IVec2::new(10, 10), Vec2::new(600.0, 0.0));

        let sand = step(particle, &mut grid, &mut TestRng, DT).unwrap();

        assert_eq!(sand.material_type, MaterialType::Sand);
        assert_eq!(sand.grid_pos, IVec2::new(11, 10));
        assert_eq!(sand.velocity, Vec2::ZERO);
    }

    #[test]
    fn test_particle_passes_through_gas() {
        let mut grid = CellGrid::new(64);
        grid.set(
            11,
            10,
            Some(Material::from_def(MaterialType::Smoke, IVec2::ZERO)),
        );
        let particle = launched(MaterialType::Sand, IVec2::new(10, 10), Vec2::new(600.0, 0.0));

        let particle = step(particle, &mut grid, &mut TestRng, DT).unwrap();

        assert_eq!(particle.material_type, MaterialType::Particle);
        assert_eq!(particle.grid_pos.x, 12);
        // Smoke shuffled back into the cell the particle left
        assert_eq!(grid.get(10, 10).unwrap().material_type, MaterialType::Smoke);
        assert!(grid.is_empty(11, 10));
    }

    #[test]
    fn test_immovable_payload_lands_as_debris() {
        let mut grid = CellGrid::new(16);
        let mut particle = launched(MaterialType::Stone, IVec2::new(5, 5), Vec2::ZERO);
        particle.lifetime = Some(DT / 2.0);

        let debris = step(particle, &mut grid, &mut TestRng, DT).unwrap();

        assert_eq!(debris.material_type, MaterialType::FallingImmovable);
        assert_eq!(debris.grid_pos, IVec2::new(5, 5));
        assert_eq!(debris.health, Some(800.0));
    }

    #[test]
    fn test_particle_lands_at_grid_edge() {
        let mut grid = CellGrid::new(16);
        let particle = launched(MaterialType::Water, IVec2::new(15, 5), Vec2::new(600.0, 0.0));

        let water = step(particle, &mut grid, &mut TestRng, DT).unwrap();

        assert_eq!(water.material_type, MaterialType::Water);
        assert_eq!(water.grid_pos, IVec2::new(15, 5));
    }

    #[test]
    fn test_empty_particle_vanishes() {
        let mut grid = CellGrid::new(16);
        let mut particle = Material::from_def(MaterialType::Particle, IVec2::new(2, 2));
        particle.lifetime = Some(0.0);

        assert!(step(particle, &mut grid, &mut TestRng, DT).is_none());
    }
}
