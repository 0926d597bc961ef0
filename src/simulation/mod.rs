//! Simulation systems - materials, per-class step rules, explosions, tick driver

mod eraser;
mod explosion;
mod factory;
mod fire;
mod flow;
mod gas;
mod immovable;
mod liquid;
mod material;
mod movable_solid;
mod particle;
mod physics;
mod sim;

pub use explosion::{Explosion, ExplosionReport};
pub use factory::MaterialFactory;
pub use material::{
    grid_to_world, world_to_grid, Material, MaterialClass, MaterialDef, MaterialType, CELL_SIZE,
};
pub use physics::GRAVITY;
pub use sim::FallingSandSim;
