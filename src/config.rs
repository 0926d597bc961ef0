//! Simulation configuration with layered loading
//!
//! Configuration is loaded from multiple sources (lowest to highest priority):
//! 1. Compiled defaults
//! 2. `sandfall.ron` file (if exists)
//! 3. Environment variables prefixed with `SANDFALL_`
//!
//! Example environment variable: `SANDFALL_WORLD__CHUNK_SIZE=32`

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

/// Main simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SimConfig {
    #[serde(default)]
    pub world: WorldConfig,

    #[serde(default)]
    pub simulation: SimulationConfig,
}

/// World layout settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Cells per chunk side
    pub chunk_size: usize,
    /// Chunk envelope in each direction from the origin (inclusive)
    pub max_world_size: i32,
    /// Drop chunks that end a tick with no materials
    pub prune_empty_chunks: bool,
    /// Consecutive ticks a chunk must stay empty and unread before it is dropped
    pub prune_idle_ticks: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            chunk_size: 64,
            max_world_size: 10,
            prune_empty_chunks: true,
            prune_idle_ticks: 2,
        }
    }
}

/// Driver timing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seconds simulated per tick
    pub fixed_timestep: f32,
    /// Cap on ticks run by one `update` call
    pub max_steps_per_frame: u32,
    /// RNG seed; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            fixed_timestep: 1.0 / 60.0,
            max_steps_per_frame: 2,
            seed: None,
        }
    }
}

impl SimConfig {
    /// Load configuration with layered priority:
    /// 1. Compiled defaults (lowest priority)
    /// 2. `sandfall.ron` file (if exists)
    /// 3. Environment variables prefixed with `SANDFALL_` (highest priority)
    pub fn load() -> Result<Self> {
        Self::load_from("sandfall")
    }

    /// Same as [`SimConfig::load`] with a custom file stem
    pub fn load_from(file_stem: &str) -> Result<Self> {
        let builder = Config::builder()
            // Layer 1: Compiled defaults
            .set_default("world.chunk_size", 64_i64)?
            .set_default("world.max_world_size", 10_i64)?
            .set_default("world.prune_empty_chunks", true)?
            .set_default("world.prune_idle_ticks", 2_i64)?
            .set_default("simulation.fixed_timestep", 1.0 / 60.0)?
            .set_default("simulation.max_steps_per_frame", 2_i64)?
            // Layer 2: Config file (optional, won't error if missing)
            .add_source(
                File::with_name(file_stem)
                    .format(config::FileFormat::Ron)
                    .required(false),
            )
            // Layer 3: Environment variables (SANDFALL_WORLD__CHUNK_SIZE, etc.)
            .add_source(Environment::with_prefix("SANDFALL").separator("__"));

        let config = builder.build().context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}
