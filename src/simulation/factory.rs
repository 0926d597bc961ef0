//! Material construction from a type (or type name) and a position

use glam::{IVec2, Vec2};

use crate::error::SimError;
use crate::world::WorldRng;

use super::material::{world_to_grid, Material, MaterialType};

/// Color multiplier for debris left by launched immovable solids
const DEBRIS_DARKEN: f32 = 0.6;

/// Builds fully initialized materials
pub struct MaterialFactory;

impl MaterialFactory {
    /// Create a material of `material_type` at a world position
    pub fn create<R: WorldRng + ?Sized>(
        material_type: MaterialType,
        world_pos: Vec2,
        rng: &mut R,
    ) -> Material {
        Self::create_at(material_type, world_to_grid(world_pos), rng)
    }

    /// Create a material at a grid cell, rolling its lifetime if it has one
    pub fn create_at<R: WorldRng + ?Sized>(
        material_type: MaterialType,
        grid_pos: IVec2,
        rng: &mut R,
    ) -> Material {
        let mut material = Material::from_def(material_type, grid_pos);
        if let Some((min, max)) = material_type.def().lifetime {
            material.lifetime = Some(rng.gen_range_f32(min, max));
        }
        material
    }

    /// Create by case-insensitive type name
    pub fn create_by_name<R: WorldRng + ?Sized>(
        name: &str,
        world_pos: Vec2,
        rng: &mut R,
    ) -> Result<Material, SimError> {
        let material_type: MaterialType = name.parse()?;
        Ok(Self::create(material_type, world_pos, rng))
    }

    /// A short-lived material with a lifetime drawn from `[min, max)`
    pub fn with_lifetime<R: WorldRng + ?Sized>(
        material_type: MaterialType,
        grid_pos: IVec2,
        (min, max): (f32, f32),
        rng: &mut R,
    ) -> Material {
        let mut material = Material::from_def(material_type, grid_pos);
        material.lifetime = Some(rng.gen_range_f32(min, max));
        material
    }

    /// Loose debris standing in for an immovable solid that was launched
    pub fn falling_debris(source: &Material, grid_pos: IVec2) -> Material {
        let mut debris = Material::from_def(MaterialType::FallingImmovable, grid_pos);
        let [r, g, b, a] = source.color;
        debris.color = [
            (r as f32 * DEBRIS_DARKEN) as u8,
            (g as f32 * DEBRIS_DARKEN) as u8,
            (b as f32 * DEBRIS_DARKEN) as u8,
            a,
        ];
        debris.health = source.health;
        debris.flammability = source.flammability;
        debris.explosion_resistance = source.explosion_resistance;
        debris
    }

    /// Launch `payload` as a flying particle with an initial velocity (world units/s)
    pub fn particle(payload: Material, velocity: Vec2) -> Material {
        let mut particle = Material::from_def(MaterialType::Particle, payload.grid_pos);
        particle.color = payload.color;
        particle.velocity = velocity;
        particle.carried = Some(Box::new(payload));
        particle
    }
}
