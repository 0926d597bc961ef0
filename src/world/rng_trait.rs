//! RNG trait abstraction for the material simulation
//!
//! Materials only need a handful of random decisions (slide preference,
//! ignition rolls, lifetime jitter), so they depend on this small trait
//! rather than on a concrete generator. Any `rand::Rng` qualifies.

use glam::IVec2;

/// The four cardinal neighbor offsets (down, up, left, right in grid space)
pub const CARDINALS: [IVec2; 4] = [
    IVec2::new(0, 1),
    IVec2::new(0, -1),
    IVec2::new(-1, 0),
    IVec2::new(1, 0),
];

/// Random number generator trait for the simulation
pub trait WorldRng {
    /// Generate random boolean with 50% probability
    fn gen_bool(&mut self) -> bool;

    /// Generate random f32 in [0.0, 1.0)
    fn gen_f32(&mut self) -> f32;

    /// Check if random value is less than probability threshold
    fn check_probability(&mut self, probability: f32) -> bool {
        self.gen_f32() < probability
    }

    /// Uniform f32 in [min, max)
    fn gen_range_f32(&mut self, min: f32, max: f32) -> f32 {
        min + self.gen_f32() * (max - min)
    }

    /// Uniform index in [0, len)
    fn gen_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        ((self.gen_f32() * len as f32) as usize).min(len - 1)
    }

    /// Cardinal offsets in random order (Fisher-Yates)
    fn shuffled_cardinals(&mut self) -> [IVec2; 4] {
        let mut dirs = CARDINALS;
        for i in (1..dirs.len()).rev() {
            let j = self.gen_index(i + 1);
            dirs.swap(i, j);
        }
        dirs
    }
}

// Blanket implementation for any type implementing rand::Rng
impl<T: ?Sized + rand::Rng> WorldRng for T {
    fn gen_bool(&mut self) -> bool {
        rand::Rng::r#gen(self)
    }

    fn gen_f32(&mut self) -> f32 {
        rand::Rng::r#gen(self)
    }
}
