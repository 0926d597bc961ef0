//! World storage - cell grids, chunks, and the chunked world context

mod cell_grid;
mod chunk;
mod chunk_manager;
mod context;
pub mod level_io;
pub mod rng_trait;
pub mod stats;
#[allow(clippy::module_inception)]
mod world;

pub use cell_grid::CellGrid;
pub use chunk::Chunk;
pub use chunk_manager::ChunkManager;
pub use context::{ChunkedMaterialContext, MaterialContext};
pub use level_io::{LevelIo, SavedMaterial};
pub use rng_trait::{WorldRng, CARDINALS};
pub use stats::{NoopStats, SimStats, TickStats};
pub use world::World;
