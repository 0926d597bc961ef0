//! Material definitions and per-cell material state

use std::fmt;
use std::str::FromStr;

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::world::{MaterialContext, WorldRng};

use super::{eraser, fire, gas, immovable, liquid, movable_solid, particle};

/// World units per grid cell
pub const CELL_SIZE: f32 = 4.0;

/// World position of a cell's top-left corner
pub fn grid_to_world(grid_pos: IVec2) -> Vec2 {
    grid_pos.as_vec2() * CELL_SIZE
}

/// Cell containing a world position (floor division)
pub fn world_to_grid(world_pos: Vec2) -> IVec2 {
    (world_pos / CELL_SIZE).floor().as_ivec2()
}

/// Concrete substance of a cell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaterialType {
    Sand,
    Water,
    Lava,
    Acid,
    Stone,
    Wood,
    Wall,
    Steam,
    Smoke,
    AcidVapor,
    Fire,
    Particle,
    /// Loose debris left behind when a launched immovable solid lands
    FallingImmovable,
    Eraser,
}

/// How a material behaves physically
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaterialClass {
    /// Falls, piles up, sinks through liquids (sand, debris)
    MovableSolid,
    /// Never moves on its own (stone, wood, wall)
    ImmovableSolid,
    /// Flows down and disperses sideways
    Liquid,
    /// Rises, disperses, expires
    Gas,
    /// Short-lived rising flame that ignites what it touches
    Fire,
    /// Material in flight after an explosion
    Particle,
    /// Clears its surroundings on its first step
    Eraser,
}

/// Static properties of a material type
#[derive(Clone, Debug)]
pub struct MaterialDef {
    pub name: &'static str,
    pub class: MaterialClass,

    /// Base color (RGBA)
    pub color: [u8; 4],
    pub mass: f32,

    /// Structural health (None = indestructible)
    pub health: Option<f32>,
    /// Lifetime range in seconds (None = permanent)
    pub lifetime: Option<(f32, f32)>,

    /// Chance to catch fire from a burning neighbor (0.0 - 1.0)
    pub flammability: f32,
    /// Fraction of explosion damage ignored (0.0 - 1.0)
    pub explosion_resistance: f32,
    /// Damage dealt to what this touches (fire burn rate)
    pub damage: f32,

    /// Velocity multiplier applied when blocked
    pub friction: f32,
    /// Symmetric per-axis velocity bound
    pub speed_clamp: f32,
    /// Cells scanned sideways when blocked (liquids, gases, fire)
    pub max_dispersion: i32,

    // Liquid surface properties, read by solids sinking through them
    pub vertical_damping: f32,
    pub turbulence_strength: f32,
}

const fn def(name: &'static str, class: MaterialClass, color: [u8; 4]) -> MaterialDef {
    MaterialDef {
        name,
        class,
        color,
        mass: 1.0,
        health: None,
        lifetime: None,
        flammability: 0.0,
        explosion_resistance: 0.0,
        damage: 0.0,
        friction: 0.9,
        speed_clamp: 100.0,
        max_dispersion: 0,
        vertical_damping: 0.0,
        turbulence_strength: 0.0,
    }
}

static SAND: MaterialDef = MaterialDef {
    health: Some(150.0),
    explosion_resistance: 0.5,
    ..def("Sand", MaterialClass::MovableSolid, [253, 249, 0, 255])
};

static WATER: MaterialDef = MaterialDef {
    friction: 0.1,
    speed_clamp: 200.0,
    max_dispersion: 8,
    vertical_damping: 0.5,
    turbulence_strength: 0.01,
    ..def("Water", MaterialClass::Liquid, [0, 121, 241, 255])
};

static LAVA: MaterialDef = MaterialDef {
    mass: 3.0,
    health: Some(1000.0),
    lifetime: Some((5.0, 8.0)),
    explosion_resistance: 1.0,
    friction: 0.1,
    speed_clamp: 200.0,
    max_dispersion: 2,
    vertical_damping: 0.2,
    ..def("Lava", MaterialClass::Liquid, [207, 57, 10, 255])
};

static ACID: MaterialDef = MaterialDef {
    health: Some(100.0),
    explosion_resistance: 0.2,
    damage: 25.0,
    friction: 0.1,
    speed_clamp: 200.0,
    max_dispersion: 6,
    vertical_damping: 0.4,
    turbulence_strength: 0.02,
    ..def("Acid", MaterialClass::Liquid, [0, 228, 48, 255])
};

static STONE: MaterialDef = MaterialDef {
    mass: f32::INFINITY,
    health: Some(800.0),
    explosion_resistance: 0.9,
    ..def("Stone", MaterialClass::ImmovableSolid, [80, 80, 80, 255])
};

static WOOD: MaterialDef = MaterialDef {
    mass: f32::INFINITY,
    health: Some(350.0),
    flammability: 0.7,
    explosion_resistance: 0.4,
    ..def("Wood", MaterialClass::ImmovableSolid, [139, 69, 19, 255])
};

static WALL: MaterialDef = MaterialDef {
    mass: f32::INFINITY,
    explosion_resistance: 1.0,
    ..def("Wall", MaterialClass::ImmovableSolid, [130, 130, 130, 255])
};

const GAS_BASE: MaterialDef = MaterialDef {
    mass: 0.2,
    lifetime: Some((0.1, 0.6)),
    friction: 0.95,
    max_dispersion: 25,
    ..def("Gas", MaterialClass::Gas, [0, 0, 0, 255])
};

static STEAM: MaterialDef = MaterialDef {
    name: "Steam",
    color: [160, 160, 160, 255],
    ..GAS_BASE
};

static SMOKE: MaterialDef = MaterialDef {
    name: "Smoke",
    color: [0, 0, 0, 255],
    ..GAS_BASE
};

static ACID_VAPOR: MaterialDef = MaterialDef {
    name: "AcidVapor",
    color: [150, 255, 150, 200],
    ..GAS_BASE
};

static FIRE: MaterialDef = MaterialDef {
    mass: 0.1,
    lifetime: Some((0.03, 0.08)),
    damage: 300.0,
    friction: 0.85,
    speed_clamp: 90.0,
    max_dispersion: 10,
    ..def("Fire", MaterialClass::Fire, [255, 161, 0, 255])
};

static PARTICLE: MaterialDef = MaterialDef {
    lifetime: Some((2.0, 2.0)),
    speed_clamp: 800.0,
    ..def("Particle", MaterialClass::Particle, [255, 255, 255, 255])
};

static FALLING_IMMOVABLE: MaterialDef = MaterialDef {
    mass: 2.0,
    ..def("FallingImmovable", MaterialClass::MovableSolid, [80, 80, 80, 255])
};

static ERASER: MaterialDef = def("Eraser", MaterialClass::Eraser, [255, 109, 194, 255]);

impl MaterialType {
    pub const ALL: [MaterialType; 14] = [
        MaterialType::Sand,
        MaterialType::Water,
        MaterialType::Lava,
        MaterialType::Acid,
        MaterialType::Stone,
        MaterialType::Wood,
        MaterialType::Wall,
        MaterialType::Steam,
        MaterialType::Smoke,
        MaterialType::AcidVapor,
        MaterialType::Fire,
        MaterialType::Particle,
        MaterialType::FallingImmovable,
        MaterialType::Eraser,
    ];

    pub fn def(self) -> &'static MaterialDef {
        match self {
            MaterialType::Sand => &SAND,
            MaterialType::Water => &WATER,
            MaterialType::Lava => &LAVA,
            MaterialType::Acid => &ACID,
            MaterialType::Stone => &STONE,
            MaterialType::Wood => &WOOD,
            MaterialType::Wall => &WALL,
            MaterialType::Steam => &STEAM,
            MaterialType::Smoke => &SMOKE,
            MaterialType::AcidVapor => &ACID_VAPOR,
            MaterialType::Fire => &FIRE,
            MaterialType::Particle => &PARTICLE,
            MaterialType::FallingImmovable => &FALLING_IMMOVABLE,
            MaterialType::Eraser => &ERASER,
        }
    }

    pub fn name(self) -> &'static str {
        self.def().name
    }

    pub fn class(self) -> MaterialClass {
        self.def().class
    }
}

impl fmt::Display for MaterialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MaterialType {
    type Err = SimError;

    /// Case-insensitive lookup by type name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        MaterialType::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| SimError::UnknownMaterial(s.to_string()))
    }
}

/// A single occupied cell's substance and its dynamic state
///
/// Materials always carry global grid coordinates, even while stored in a
/// chunk-local grid.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub material_type: MaterialType,
    pub color: [u8; 4],
    pub mass: f32,

    pub velocity: Vec2,
    pub net_force: Vec2,
    /// Sub-cell movement carried between ticks (in cells)
    pub movement_remainder: Vec2,

    pub grid_pos: IVec2,
    pub world_pos: Vec2,

    pub health: Option<f32>,
    pub lifetime: Option<f32>,
    pub flammability: f32,
    pub is_on_fire: bool,
    pub explosion_resistance: f32,
    pub damage: f32,

    pub updated_this_frame: bool,
    pub is_active: bool,

    /// Payload of a flying particle, redeposited when it lands
    pub carried: Option<Box<Material>>,
}

impl Material {
    /// Material with the type's default properties and no lifetime rolled yet
    pub fn from_def(material_type: MaterialType, grid_pos: IVec2) -> Self {
        let def = material_type.def();
        Self {
            material_type,
            color: def.color,
            mass: def.mass,
            velocity: Vec2::ZERO,
            net_force: Vec2::ZERO,
            movement_remainder: Vec2::ZERO,
            grid_pos,
            world_pos: grid_to_world(grid_pos),
            health: def.health,
            lifetime: def.lifetime.map(|(min, _)| min),
            flammability: def.flammability,
            is_on_fire: false,
            explosion_resistance: def.explosion_resistance,
            damage: def.damage,
            updated_this_frame: false,
            is_active: true,
            carried: None,
        }
    }

    #[inline]
    pub fn def(&self) -> &'static MaterialDef {
        self.material_type.def()
    }

    #[inline]
    pub fn class(&self) -> MaterialClass {
        self.material_type.class()
    }

    #[inline]
    pub fn is_liquid(&self) -> bool {
        self.class() == MaterialClass::Liquid
    }

    #[inline]
    pub fn is_gas(&self) -> bool {
        self.class() == MaterialClass::Gas
    }

    #[inline]
    pub fn is_immovable_solid(&self) -> bool {
        self.class() == MaterialClass::ImmovableSolid
    }

    /// Solids and liquids take explosion damage and can be launched
    pub fn is_solid_or_liquid(&self) -> bool {
        matches!(
            self.class(),
            MaterialClass::MovableSolid | MaterialClass::ImmovableSolid | MaterialClass::Liquid
        )
    }

    /// Indestructible materials are neither damaged nor launched by explosions
    pub fn is_indestructible(&self) -> bool {
        self.health.is_none() && self.explosion_resistance >= 1.0
    }

    pub fn apply_force(&mut self, force: Vec2) {
        self.net_force += force;
    }

    /// Fold accumulated force into velocity and reset it
    pub fn integrate(&mut self, dt: f32) {
        if self.mass.is_finite() && self.mass > 0.0 {
            self.velocity += self.net_force / self.mass * dt;
        }
        self.net_force = Vec2::ZERO;
    }

    pub fn clamp_velocity(&mut self) {
        let limit = self.def().speed_clamp;
        self.velocity = self.velocity.clamp(Vec2::splat(-limit), Vec2::splat(limit));
    }

    /// Move to a cell. The world position is snapped to the cell unless it
    /// already lies inside it (flying particles keep sub-cell precision).
    pub fn set_grid_pos(&mut self, grid_pos: IVec2) {
        self.grid_pos = grid_pos;
        if world_to_grid(self.world_pos) != grid_pos {
            self.world_pos = grid_to_world(grid_pos);
        }
    }

    pub fn set_active(&mut self) {
        self.is_active = true;
    }

    /// Ticks the lifetime down, returning true once it has run out
    pub fn age(&mut self, dt: f32) -> bool {
        match self.lifetime.as_mut() {
            Some(lifetime) => {
                *lifetime -= dt;
                *lifetime <= 0.0
            }
            None => false,
        }
    }

    /// Advance this material by one tick.
    ///
    /// The material has already been lifted out of its cell. The returned
    /// material (possibly a different type) is placed at its `grid_pos`;
    /// `None` leaves the cell empty.
    pub fn step<R: WorldRng + ?Sized>(
        mut self,
        ctx: &mut dyn MaterialContext,
        rng: &mut R,
        dt: f32,
    ) -> Option<Material> {
        self.updated_this_frame = true;
        self.is_active = false;

        let next = match self.material_type {
            MaterialType::Wood => immovable::step_wood(self, ctx, rng, dt),
            MaterialType::Lava => liquid::step_lava(self, ctx, rng, dt),
            MaterialType::Acid => liquid::step_acid(self, ctx, rng, dt),
            _ => match self.class() {
                MaterialClass::MovableSolid => movable_solid::step(self, ctx, rng, dt),
                MaterialClass::ImmovableSolid => Some(self),
                MaterialClass::Liquid => liquid::step(self, ctx, rng, dt),
                MaterialClass::Gas => gas::step(self, ctx, rng, dt),
                MaterialClass::Fire => fire::step(self, ctx, rng, dt),
                MaterialClass::Particle => particle::step(self, ctx, rng, dt),
                MaterialClass::Eraser => eraser::step(self, ctx),
            },
        };

        // A replacement must not be stepped again this tick
        next.map(|mut material| {
            material.updated_this_frame = true;
            material
        })
    }
}
