//! Demo scenes for the headless binary and benchmarks
//!
//! Coordinates are cells with y growing downward; every scene sits on a
//! wall floor at row [`FLOOR_Y`].

use glam::IVec2;

use crate::simulation::{FallingSandSim, MaterialType};
use crate::world::MaterialContext;

/// Top row of every scene's floor
pub const FLOOR_Y: i32 = 60;
/// Scenes span x in `-HALF_WIDTH..HALF_WIDTH`
pub const HALF_WIDTH: i32 = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoScene {
    /// Sand pile, water pool, stone ledges
    Playground,
    /// Wood columns with a fire at their feet
    Inferno,
    /// Lava poured next to a water basin
    LavaWater,
    /// Mixed rubble around a blast crater
    Demolition,
}

impl DemoScene {
    pub const ALL: [DemoScene; 4] = [
        DemoScene::Playground,
        DemoScene::Inferno,
        DemoScene::LavaWater,
        DemoScene::Demolition,
    ];

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|scene| scene.name().eq_ignore_ascii_case(s.trim()))
    }

    pub fn name(&self) -> &'static str {
        match self {
            DemoScene::Playground => "playground",
            DemoScene::Inferno => "inferno",
            DemoScene::LavaWater => "lava-water",
            DemoScene::Demolition => "demolition",
        }
    }

    /// Clear the simulation and build this scene
    pub fn build(&self, sim: &mut FallingSandSim) {
        sim.reset();
        floor(sim);

        match self {
            DemoScene::Playground => build_playground(sim),
            DemoScene::Inferno => build_inferno(sim),
            DemoScene::LavaWater => build_lava_water(sim),
            DemoScene::Demolition => build_demolition(sim),
        }

        log::info!(
            "Built demo scene '{}' with {} materials",
            self.name(),
            sim.count_materials()
        );
    }
}

fn floor(sim: &mut FallingSandSim) {
    fill_rect(
        sim,
        IVec2::new(-HALF_WIDTH, FLOOR_Y),
        IVec2::new(HALF_WIDTH, FLOOR_Y + 4),
        MaterialType::Wall,
    );
    // Side walls keep fluids on the floor
    for x in [-HALF_WIDTH - 1, HALF_WIDTH] {
        fill_rect(
            sim,
            IVec2::new(x, 0),
            IVec2::new(x + 1, FLOOR_Y),
            MaterialType::Wall,
        );
    }
}

/// Fill `min..max` (exclusive) with one material
fn fill_rect(sim: &mut FallingSandSim, min: IVec2, max: IVec2, material_type: MaterialType) {
    for y in min.y..max.y {
        for x in min.x..max.x {
            sim.place(x, y, material_type);
        }
    }
}

fn build_playground(sim: &mut FallingSandSim) {
    // Sand pile (left side, pyramid shape)
    for row in 0..20 {
        let half = row / 2;
        let y = FLOOR_Y - 20 + row;
        fill_rect(
            sim,
            IVec2::new(-40 - half, y),
            IVec2::new(-40 + half + 1, y + 1),
            MaterialType::Sand,
        );
    }

    // Water pool (right side) held by a stone lip
    fill_rect(
        sim,
        IVec2::new(10, FLOOR_Y - 6),
        IVec2::new(12, FLOOR_Y),
        MaterialType::Stone,
    );
    fill_rect(
        sim,
        IVec2::new(20, FLOOR_Y - 30),
        IVec2::new(50, FLOOR_Y - 18),
        MaterialType::Water,
    );

    // Stone ledge with sand poured on top
    fill_rect(
        sim,
        IVec2::new(-10, FLOOR_Y - 25),
        IVec2::new(5, FLOOR_Y - 23),
        MaterialType::Stone,
    );
    sim.add_material(IVec2::new(-3, FLOOR_Y - 32), MaterialType::Sand, 4);
}

fn build_inferno(sim: &mut FallingSandSim) {
    // Wood columns (every 12 cells)
    for x in (-HALF_WIDTH + 4..HALF_WIDTH).step_by(12) {
        fill_rect(
            sim,
            IVec2::new(x, FLOOR_Y - 40),
            IVec2::new(x + 2, FLOOR_Y),
            MaterialType::Wood,
        );
    }
    for x in [-3, -2, 3, 4] {
        sim.place(x, FLOOR_Y - 1, MaterialType::Fire);
    }
    // The foot of the middle column is already alight
    for y in FLOOR_Y - 10..FLOOR_Y {
        if let Some(wood) = sim.world_mut().get_mut(0, y) {
            wood.is_on_fire = true;
        }
    }
}

fn build_lava_water(sim: &mut FallingSandSim) {
    // Water basin
    fill_rect(
        sim,
        IVec2::new(0, FLOOR_Y - 12),
        IVec2::new(2, FLOOR_Y),
        MaterialType::Stone,
    );
    fill_rect(
        sim,
        IVec2::new(2, FLOOR_Y - 10),
        IVec2::new(40, FLOOR_Y),
        MaterialType::Water,
    );

    // Lava blob poured from the left
    sim.add_material(IVec2::new(-20, FLOOR_Y - 30), MaterialType::Lava, 8);

    // Acid dripping onto a stone shelf
    fill_rect(
        sim,
        IVec2::new(-60, FLOOR_Y - 20),
        IVec2::new(-40, FLOOR_Y - 18),
        MaterialType::Stone,
    );
    sim.add_material(IVec2::new(-50, FLOOR_Y - 26), MaterialType::Acid, 3);
}

fn build_demolition(sim: &mut FallingSandSim) {
    // Stone tower with a wooden roof
    fill_rect(
        sim,
        IVec2::new(-8, FLOOR_Y - 30),
        IVec2::new(8, FLOOR_Y),
        MaterialType::Stone,
    );
    fill_rect(
        sim,
        IVec2::new(-10, FLOOR_Y - 33),
        IVec2::new(10, FLOOR_Y - 30),
        MaterialType::Wood,
    );
    sim.add_material(IVec2::new(-30, FLOOR_Y - 5), MaterialType::Sand, 5);
    sim.add_material(IVec2::new(30, FLOOR_Y - 5), MaterialType::Water, 5);

    sim.queue_explosion(0, FLOOR_Y - 15, 12, 400.0);
}
