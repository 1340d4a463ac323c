#![deny(unsafe_code)]
//! Core types for the fluid-engine interactive fluid simulation.
//!
//! Provides the `Field`/`DoubleField` grid data model, `FluidConfig`
//! parameters, `Pointer`/`PointerSet` contact tracking, the `Xorshift64`
//! PRNG, and `FluidError`. With the `render` feature enabled, the
//! [`render`] module adds the WebGL2/OpenGL infrastructure the GPU pipeline
//! is built from.

pub mod config;
pub mod double;
pub mod error;
pub mod field;
pub mod pointer;
pub mod prng;

#[cfg(feature = "render")]
pub mod render;

pub use config::FluidConfig;
pub use double::DoubleField;
pub use error::FluidError;
pub use field::{Field, Sampling, MIN_FIELD_DIM};
pub use pointer::{Pointer, PointerSet, MAX_TOUCH_POINTERS, PRIMARY_POINTER_ID};
pub use prng::Xorshift64;
