//! Shared flow algorithm for liquids, gases, and fire
//!
//! Per movement attempt: straight ahead (down for liquids, up for gases),
//! then the two diagonals in a random order, then a sideways scan up to the
//! material's dispersion distance. If all of that fails the material rests.

use glam::IVec2;

use crate::world::{MaterialContext, WorldRng};

use super::physics::{block, displace_into};
use super::{Material, MaterialClass, MaterialType};

/// Direction and entry rules for one family of flowing materials
pub(crate) struct FlowRules {
    /// +1 sinks (liquids), -1 rises (gases, fire)
    pub direction: i32,
    /// Cells this material may move into by displacing the occupant
    pub can_enter: fn(&mut dyn MaterialContext, IVec2) -> bool,
    /// Sideways destinations must sit on something (liquids)
    pub needs_support: bool,
}

pub(crate) const LIQUID_FLOW: FlowRules = FlowRules {
    direction: 1,
    can_enter: liquid_can_enter,
    needs_support: true,
};

pub(crate) const GAS_FLOW: FlowRules = FlowRules {
    direction: -1,
    can_enter: gas_can_enter,
    needs_support: false,
};

pub(crate) const FIRE_FLOW: FlowRules = FlowRules {
    direction: -1,
    can_enter: empty_only,
    needs_support: false,
};

fn empty_only(ctx: &mut dyn MaterialContext, pos: IVec2) -> bool {
    ctx.is_empty(pos.x, pos.y)
}

fn liquid_can_enter(ctx: &mut dyn MaterialContext, pos: IVec2) -> bool {
    ctx.is_empty(pos.x, pos.y) || ctx.class_at(pos.x, pos.y) == Some(MaterialClass::Gas)
}

fn gas_can_enter(ctx: &mut dyn MaterialContext, pos: IVec2) -> bool {
    ctx.is_empty(pos.x, pos.y) || ctx.type_at(pos.x, pos.y) == Some(MaterialType::Water)
}

/// Run up to `steps` movement attempts (at least one) following `rules`
pub(crate) fn flow<R: WorldRng + ?Sized>(
    material: &mut Material,
    ctx: &mut dyn MaterialContext,
    rng: &mut R,
    steps: i32,
    rules: &FlowRules,
) {
    let attempts = (steps * rules.direction).max(1);
    let prefer = if rng.gen_bool() { -1 } else { 1 };
    let dir = rules.direction;

    for _ in 0..attempts {
        let pos = material.grid_pos;

        let ahead = pos + IVec2::new(0, dir);
        if (rules.can_enter)(ctx, ahead) {
            displace_into(material, ctx, ahead);
            continue;
        }

        let diagonal = [prefer, -prefer]
            .into_iter()
            .map(|side| pos + IVec2::new(side, dir))
            .find(|&target| (rules.can_enter)(ctx, target));
        if let Some(target) = diagonal {
            displace_into(material, ctx, target);
            continue;
        }

        if let Some(target) = scan_sideways(material, ctx, prefer, rules) {
            displace_into(material, ctx, target);
            continue;
        }

        let friction = material.def().friction;
        block(material, friction);
        break;
    }

    material.clamp_velocity();
}

/// Nearest legal sideways destination, preferred side first
fn scan_sideways(
    material: &Material,
    ctx: &mut dyn MaterialContext,
    prefer: i32,
    rules: &FlowRules,
) -> Option<IVec2> {
    let pos = material.grid_pos;
    let max_dispersion = material.def().max_dispersion;

    for side in [prefer, -prefer] {
        for distance in 1..=max_dispersion {
            let cell = pos + IVec2::new(side * distance, 0);
            if !ctx.is_valid_cell(cell.x, cell.y) {
                break;
            }
            match ctx.type_at(cell.x, cell.y) {
                None => {
                    if !rules.needs_support || is_supported(ctx, pos, cell, side) {
                        return Some(cell);
                    }
                    break;
                }
                // Pass over our own kind
                Some(t) if t == material.material_type => {}
                Some(_) => break,
            }
        }
    }
    None
}

/// A sideways liquid move must land on something, and must not climb onto
/// the top corner of an immovable solid unless already resting on one
fn is_supported(ctx: &mut dyn MaterialContext, from: IVec2, to: IVec2, side: i32) -> bool {
    let below = to + IVec2::Y;
    let landed = !ctx.is_valid_cell(below.x, below.y) || ctx.get(below.x, below.y).is_some();
    if !landed {
        return false;
    }

    let corner = ctx.class_at(from.x + side, from.y + 1) == Some(MaterialClass::ImmovableSolid);
    let resting = ctx.class_at(from.x, from.y + 1) == Some(MaterialClass::ImmovableSolid);
    !(corner && !resting)
}
