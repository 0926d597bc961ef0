//! Liquids - water, plus lava and acid reactions layered on the shared flow

use glam::IVec2;

use crate::world::{MaterialContext, WorldRng, CARDINALS};

use super::factory::MaterialFactory;
use super::flow::{flow, LIQUID_FLOW};
use super::physics::{accumulate_vertical, spawn, touches, GRAVITY};
use super::{Material, MaterialType};

/// Lava ages this much faster while touching water
const LAVA_WATER_COOLING: f32 = 3.0;
const LAVA_IGNITE_CHANCE: f32 = 0.4;
const LAVA_STEAM_CHANCE: f32 = 0.9;
const LAVA_STEAM_LIFETIME: (f32, f32) = (0.3, 1.0);

/// Per neighbor, per tick
const ACID_CORROSION_CHANCE: f32 = 0.05;
/// Chance a corroded cell is replaced by vapor rather than emptied
const ACID_VAPOR_CHANCE: f32 = 0.3;

pub(crate) fn step<R: WorldRng + ?Sized>(
    mut liquid: Material,
    ctx: &mut dyn MaterialContext,
    rng: &mut R,
    dt: f32,
) -> Option<Material> {
    let steps = accumulate_vertical(&mut liquid, GRAVITY, dt);
    flow(&mut liquid, ctx, rng, steps, &LIQUID_FLOW);
    Some(liquid)
}

/// Lava cools into stone (faster next to water) and ignites flammable neighbors
pub(crate) fn step_lava<R: WorldRng + ?Sized>(
    mut lava: Material,
    ctx: &mut dyn MaterialContext,
    rng: &mut R,
    dt: f32,
) -> Option<Material> {
    let pos = lava.grid_pos;

    let cooling = if touches(ctx, pos, MaterialType::Water) {
        dt * LAVA_WATER_COOLING
    } else {
        dt
    };
    if lava.age(cooling) {
        log::trace!("[SIM] Lava at ({}, {}) solidified", pos.x, pos.y);
        let above = pos - IVec2::Y;
        if rng.check_probability(LAVA_STEAM_CHANCE) {
            let steam = MaterialFactory::with_lifetime(
                MaterialType::Steam,
                above,
                LAVA_STEAM_LIFETIME,
                rng,
            );
            spawn(ctx, above, steam);
        }
        return Some(MaterialFactory::create_at(MaterialType::Stone, pos, rng));
    }

    for dir in CARDINALS {
        let neighbor = pos + dir;
        let flammable = ctx
            .get(neighbor.x, neighbor.y)
            .is_some_and(|m| m.flammability > 0.0 && !m.is_on_fire);
        if flammable && rng.check_probability(LAVA_IGNITE_CHANCE) {
            if let Some(target) = ctx.get_mut(neighbor.x, neighbor.y) {
                target.is_on_fire = true;
                target.set_active();
            }
        }
    }

    step(lava, ctx, rng, dt)
}

/// Acid eats wood, sand, and water, wearing itself down in the process
pub(crate) fn step_acid<R: WorldRng + ?Sized>(
    mut acid: Material,
    ctx: &mut dyn MaterialContext,
    rng: &mut R,
    dt: f32,
) -> Option<Material> {
    let pos = acid.grid_pos;

    for dir in CARDINALS {
        let neighbor = pos + dir;
        let corrodible = matches!(
            ctx.type_at(neighbor.x, neighbor.y),
            Some(MaterialType::Wood | MaterialType::Sand | MaterialType::Water)
        );
        if !corrodible || !rng.check_probability(ACID_CORROSION_CHANCE) {
            continue;
        }

        ctx.clear(neighbor.x, neighbor.y);
        if rng.check_probability(ACID_VAPOR_CHANCE) {
            let vapor = MaterialFactory::create_at(MaterialType::AcidVapor, neighbor, rng);
            spawn(ctx, neighbor, vapor);
        }

        let health = acid.health.unwrap_or(0.0) - acid.damage;
        acid.health = Some(health);
        acid.set_active();
        if health <= 0.0 {
            return Some(MaterialFactory::create_at(MaterialType::AcidVapor, pos, rng));
        }
    }

    step(acid, ctx, rng, dt)
}
