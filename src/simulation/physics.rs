//! Shared movement helpers for material steps

use glam::{IVec2, Vec2};

use crate::world::{MaterialContext, CARDINALS};

use super::{Material, MaterialType};

/// Downward pull (y grows downward)
pub const GRAVITY: Vec2 = Vec2::new(0.0, 1000.0);

/// Apply `force`, integrate over `dt`, and bank the vertical travel.
/// Returns whole cells to move along y (sign is direction).
pub(crate) fn accumulate_vertical(material: &mut Material, force: Vec2, dt: f32) -> i32 {
    material.apply_force(force);
    material.integrate(dt);
    material.movement_remainder += material.velocity * dt;

    let steps = material.movement_remainder.y.floor();
    material.movement_remainder.y -= steps;
    // Horizontal velocity only ever jitters; keep the fraction bounded
    material.movement_remainder.x = material.movement_remainder.x.fract();
    steps as i32
}

/// Stop vertical motion after hitting something
pub(crate) fn block(material: &mut Material, friction: f32) {
    material.velocity *= friction;
    material.velocity.y = 0.0;
    material.movement_remainder.y = 0.0;
}

/// Move the lifted-out `material` into `target`. Whatever occupied `target`
/// drops into the vacated cell.
pub(crate) fn displace_into(material: &mut Material, ctx: &mut dyn MaterialContext, target: IVec2) {
    let origin = material.grid_pos;
    if let Some(mut displaced) = ctx.take(target.x, target.y) {
        displaced.set_active();
        ctx.set(origin.x, origin.y, Some(displaced));
    }
    material.set_grid_pos(target);
    material.set_active();
}

/// Place a freshly created material into an empty cell. It sits out the
/// rest of the current tick.
pub(crate) fn spawn(ctx: &mut dyn MaterialContext, pos: IVec2, mut material: Material) -> bool {
    if !ctx.is_empty(pos.x, pos.y) {
        return false;
    }
    material.updated_this_frame = true;
    material.set_active();
    ctx.set(pos.x, pos.y, Some(material));
    true
}

/// True if any cardinal neighbor of `pos` is `material_type`
pub(crate) fn touches(ctx: &mut dyn MaterialContext, pos: IVec2, material_type: MaterialType) -> bool {
    CARDINALS
        .iter()
        .any(|dir| ctx.type_at(pos.x + dir.x, pos.y + dir.y) == Some(material_type))
}
