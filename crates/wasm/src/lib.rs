#![deny(unsafe_code)]
//! WASM canvas bindings for the fluid-engine.
//!
//! Exports [`FluidApp`], which owns the GPU pipeline over a canvas's
//! WebGL2 context. The JavaScript host drives it: forward pointer/touch
//! events, report size changes, and call `frame` from
//! `requestAnimationFrame`. Everything compiles to an empty crate off
//! wasm32 so native workspace builds are unaffected.

#[cfg(target_arch = "wasm32")]
mod app;

#[cfg(target_arch = "wasm32")]
pub use app::FluidApp;
