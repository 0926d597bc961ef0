//! Level persistence - a flat list of `{x, y, material}` records in RON
//!
//! No chunk metadata is stored. Loading writes each record at its global
//! cell and the chunks reappear lazily.

use std::path::Path;

use anyhow::{Context, Result};
use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::simulation::{grid_to_world, MaterialFactory, MaterialType};

use super::{MaterialContext, World, WorldRng};

/// One saved cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedMaterial {
    pub x: i32,
    pub y: i32,
    pub material: String,
}

/// Converts between a [`World`] and saved level records
pub struct LevelIo;

impl LevelIo {
    /// Every material in the world, ordered top row first.
    /// Flying particles are saved as what they carry.
    pub fn snapshot(world: &World) -> Vec<SavedMaterial> {
        let mut records: Vec<SavedMaterial> = world
            .materials()
            .filter_map(|material| {
                let material_type = match material.material_type {
                    MaterialType::Particle => material.carried.as_ref()?.material_type,
                    other => other,
                };
                Some(SavedMaterial {
                    x: material.grid_pos.x,
                    y: material.grid_pos.y,
                    material: material_type.name().to_string(),
                })
            })
            .collect();
        records.sort_by_key(|record| (record.y, record.x));
        records
    }

    /// Write records into the world. Every name is checked before anything
    /// is written, so an unknown material leaves the world untouched.
    /// Returns how many records landed inside the world.
    pub fn restore<R: WorldRng + ?Sized>(
        world: &mut World,
        records: &[SavedMaterial],
        rng: &mut R,
    ) -> Result<usize, SimError> {
        for record in records {
            record.material.parse::<MaterialType>()?;
        }

        let mut written = 0;
        for record in records {
            if !world.is_valid_cell(record.x, record.y) {
                log::trace!(
                    "[LEVEL] Skipping {} at ({}, {}) outside the world",
                    record.material,
                    record.x,
                    record.y
                );
                continue;
            }
            let world_pos = grid_to_world(IVec2::new(record.x, record.y));
            let material = MaterialFactory::create_by_name(&record.material, world_pos, rng)?;
            world.set(record.x, record.y, Some(material));
            written += 1;
        }
        Ok(written)
    }

    pub fn to_ron(records: &[SavedMaterial]) -> Result<String, SimError> {
        Ok(ron::ser::to_string_pretty(records, ron::ser::PrettyConfig::new())?)
    }

    pub fn from_ron(text: &str) -> Result<Vec<SavedMaterial>, SimError> {
        Ok(ron::from_str(text)?)
    }

    /// Save the world to `path`. Returns the number of records written.
    pub fn save(path: &Path, world: &World) -> Result<usize> {
        let records = Self::snapshot(world);
        let text = Self::to_ron(&records).context("Failed to serialize level")?;

        // Atomic write: write to temp file, then rename
        let temp_path = path.with_extension("tmp");
        std::fs::write(&temp_path, text)
            .map_err(SimError::LevelIo)
            .context("Failed to write level temp file")?;
        std::fs::rename(&temp_path, path)
            .map_err(SimError::LevelIo)
            .context("Failed to rename level file")?;

        log::info!("[LEVEL] Saved {} materials to {:?}", records.len(), path);
        Ok(records.len())
    }

    /// Load a level from `path` into `world`. A missing file loads nothing.
    pub fn load<R: WorldRng + ?Sized>(path: &Path, world: &mut World, rng: &mut R) -> Result<usize> {
        if !path.exists() {
            log::warn!("[LEVEL] {:?} doesn't exist, nothing loaded", path);
            return Ok(0);
        }

        let text = std::fs::read_to_string(path)
            .map_err(SimError::LevelIo)
            .with_context(|| format!("Failed to read level {:?}", path))?;
        let records = Self::from_ron(&text).context("Failed to parse level")?;
        let written = Self::restore(world, &records, rng)
            .with_context(|| format!("Failed to restore level {:?}", path))?;

        log::info!(
            "[LEVEL] Loaded {} of {} materials from {:?}",
            written,
            records.len(),
            path
        );
        Ok(written)
    }
}
