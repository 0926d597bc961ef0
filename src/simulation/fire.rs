//! Fire - a brief rising flame that ignites what it touches before dying out

use crate::world::{MaterialContext, WorldRng};

use super::factory::MaterialFactory;
use super::flow::{flow, FIRE_FLOW};
use super::physics::{accumulate_vertical, touches, GRAVITY};
use super::{Material, MaterialType};

/// Fraction of gravity pushing flames upward
const FIRE_BUOYANCY: f32 = -0.1;
/// Remaining lifetime below which a flame tries to ignite a neighbor
const FIRE_SPREAD_WINDOW: f32 = 0.01;
/// Smoke left when water snuffs a flame
const FIRE_SMOKE_LIFETIME: (f32, f32) = (0.3, 1.0);

pub(crate) fn step<R: WorldRng + ?Sized>(
    mut fire: Material,
    ctx: &mut dyn MaterialContext,
    rng: &mut R,
    dt: f32,
) -> Option<Material> {
    let pos = fire.grid_pos;

    if touches(ctx, pos, MaterialType::Water) {
        return Some(MaterialFactory::with_lifetime(
            MaterialType::Smoke,
            pos,
            FIRE_SMOKE_LIFETIME,
            rng,
        ));
    }

    if fire.age(dt) {
        return None;
    }
    if fire.lifetime.is_some_and(|lifetime| lifetime <= FIRE_SPREAD_WINDOW) {
        ignite_neighbor(&fire, ctx, rng);
    }

    let steps = accumulate_vertical(&mut fire, GRAVITY * FIRE_BUOYANCY, dt);
    flow(&mut fire, ctx, rng, steps, &FIRE_FLOW);
    Some(fire)
}

/// Set the first flammable immovable neighbor (random order) alight
fn ignite_neighbor<R: WorldRng + ?Sized>(
    fire: &Material,
    ctx: &mut dyn MaterialContext,
    rng: &mut R,
) {
    let pos = fire.grid_pos;
    for dir in rng.shuffled_cardinals() {
        let target = pos + dir;
        let Some(neighbor) = ctx.get_mut(target.x, target.y) else {
            continue;
        };
        if neighbor.is_immovable_solid() && neighbor.flammability > 0.0 && !neighbor.is_on_fire {
            log::trace!(
                "[SIM] Fire ignited {} at ({}, {})",
                neighbor.material_type,
                target.x,
                target.y
            );
            neighbor.is_on_fire = true;
            neighbor.set_active();
            return;
        }
    }
}
