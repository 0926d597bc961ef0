//! Explosions - a one-shot radial blast over a material context

use glam::{IVec2, Vec2};

use crate::world::{MaterialContext, WorldRng};

use super::factory::MaterialFactory;
use super::{MaterialClass, MaterialType};

/// Upward kick added to every launched particle, as a fraction of force
const UPWARD_KICK: f32 = 1.2;
/// Blast direction is measured from this many cells below the center, so
/// debris level with the center still sprays upward
const CENTER_DROP: f32 = 2.0;
/// Chance an affected cell without a solid or liquid fills with smoke
const SMOKE_CHANCE: f32 = 0.4;

/// What a blast did, for logging and stats
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExplosionReport {
    pub launched: usize,
    pub destroyed: usize,
    pub smoke: usize,
}

/// A blast centered on a cell of `ctx`. Consumed by [`Explosion::enact`].
pub struct Explosion<'a> {
    ctx: &'a mut dyn MaterialContext,
    center: IVec2,
    radius: i32,
    force: f32,
}

impl<'a> Explosion<'a> {
    pub fn new(ctx: &'a mut dyn MaterialContext, x: i32, y: i32, radius: i32, force: f32) -> Self {
        Self {
            ctx,
            center: IVec2::new(x, y),
            radius,
            force,
        }
    }

    /// Apply the blast to every cell strictly inside the radius.
    ///
    /// Solids and liquids take `force * falloff * (1 - resistance)` damage;
    /// survivors are launched as particles, the rest turn to smoke.
    /// Indestructible materials are left alone.
    pub fn enact<R: WorldRng + ?Sized>(self, rng: &mut R) -> ExplosionReport {
        let Explosion {
            ctx,
            center,
            radius,
            force,
        } = self;
        let mut report = ExplosionReport::default();
        if radius <= 0 {
            return report;
        }

        let radius_sq = radius * radius;
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                let dist_sq = dx * dx + dy * dy;
                if dist_sq >= radius_sq {
                    continue;
                }
                let cell = center + IVec2::new(dx, dy);
                if !ctx.is_valid_cell(cell.x, cell.y) {
                    continue;
                }

                let falloff = 1.0 - (dist_sq as f32).sqrt() / radius as f32;
                let dir = Vec2::new(dx as f32, dy as f32 - CENTER_DROP).normalize_or_zero();
                let impulse = dir * force * falloff + Vec2::new(0.0, -force * UPWARD_KICK);

                blast_cell(ctx, rng, cell, force * falloff, impulse, &mut report);
            }
        }

        log::debug!(
            "[EXPLODE] ({}, {}) r={}: launched {}, destroyed {}, smoke {}",
            center.x,
            center.y,
            radius,
            report.launched,
            report.destroyed,
            report.smoke
        );
        report
    }
}

fn blast_cell<R: WorldRng + ?Sized>(
    ctx: &mut dyn MaterialContext,
    rng: &mut R,
    cell: IVec2,
    damage: f32,
    impulse: Vec2,
    report: &mut ExplosionReport,
) {
    let occupant = ctx
        .get(cell.x, cell.y)
        .map(|m| (m.is_solid_or_liquid(), m.is_indestructible(), m.class()));

    match occupant {
        // Flying debris and indestructible materials ride out the blast
        Some((_, _, MaterialClass::Particle)) | Some((true, true, _)) => {}
        Some((true, false, _)) => {
            let Some(mut material) = ctx.take(cell.x, cell.y) else {
                return;
            };
            if let Some(health) = material.health.as_mut() {
                *health -= damage * (1.0 - material.explosion_resistance);
            }

            if material.health.is_some_and(|health| health <= 0.0) {
                let smoke = MaterialFactory::create_at(MaterialType::Smoke, cell, rng);
                ctx.set(cell.x, cell.y, Some(smoke));
                report.destroyed += 1;
            } else {
                material.set_active();
                let particle = MaterialFactory::particle(material, impulse);
                ctx.set(cell.x, cell.y, Some(particle));
                report.launched += 1;
            }
        }
        _ => {
            if rng.check_probability(SMOKE_CHANCE) {
                let smoke = MaterialFactory::create_at(MaterialType::Smoke, cell, rng);
                ctx.set(cell.x, cell.y, Some(smoke));
                report.smoke += 1;
            }
        }
    }
}
