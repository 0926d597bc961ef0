//! # Sandfall - chunked 2D falling-sand material simulation
//!
//! Every cell of a sparse, lazily allocated grid holds at most one material.
//! Each tick the [`simulation::FallingSandSim`] driver sweeps the grid bottom
//! to top and steps every material once: sand piles up, liquids level out,
//! gases rise, wood burns, and explosions fling debris.

pub mod config;
pub mod error;
pub mod levels;
pub mod render;
pub mod simulation;
pub mod world;

pub use error::SimError;

/// Common imports for internal use
pub mod prelude {
    pub use crate::config::SimConfig;
    pub use crate::simulation::{FallingSandSim, Material, MaterialClass, MaterialType};
    pub use crate::world::{MaterialContext, World, WorldRng};
    pub use glam::{IVec2, Vec2};
}
