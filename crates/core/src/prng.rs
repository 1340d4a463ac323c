//! Deterministic PRNG for splat colors and ambient impulses.
//!
//! Xorshift64 with the standard (13, 7, 17) shift parameters. The solver
//! itself is deterministic; all randomness in the system (pointer colors,
//! ambient splat positions and directions) flows through this generator so
//! a fixed seed reproduces an identical run on every platform.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Seedable xorshift64 generator. Same seed, same sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    /// Replacement for seed 0, which is a fixed point of xorshift.
    const FALLBACK_SEED: u64 = 0x5EED_DEAD_BEEF_CAFE;

    /// Creates a generator from the given seed (0 is remapped to a
    /// non-zero fallback).
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { Self::FALLBACK_SEED } else { seed },
        }
    }

    /// Advances the state and returns the next 64-bit value.
    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }

    /// Uniform `f32` in [0, 1), using the top 24 bits for a full
    /// single-precision mantissa.
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32
    }

    /// Uniform `f32` in [min, max).
    pub fn next_range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }

    /// A splat color with each channel in [0.2, 1.2).
    ///
    /// The 0.2 floor keeps interaction colors visibly bright; pure-dark
    /// splats read as dead spots on the canvas.
    pub fn next_pointer_color(&mut self) -> Vec3 {
        Vec3::new(
            self.next_f32() + 0.2,
            self.next_f32() + 0.2,
            self.next_f32() + 0.2,
        )
    }

    /// An ambient splat color with each channel in [0, 1).
    pub fn next_color(&mut self) -> Vec3 {
        Vec3::new(self.next_f32(), self.next_f32(), self.next_f32())
    }
}
