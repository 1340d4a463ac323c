#![deny(unsafe_code)]
//! Runtime orchestration for the fluid-engine: interaction injection,
//! the surface lifecycle, and presentation.
//!
//! Hosts (the CLI, the WASM canvas binding) wire their event sources and
//! frame callbacks into [`Lifecycle`] and [`Injector`]; everything else —
//! when fields exist, how resizes reallocate them, what a tick does —
//! lives here and is host-agnostic.

pub mod injector;
pub mod lifecycle;
pub mod presenter;

#[cfg(feature = "png")]
pub mod snapshot;

pub use injector::{Injector, Splat, MOUSE_MOTION_SCALE, STARTUP_SPLAT_BURST, TOUCH_MOTION_SCALE};
pub use lifecycle::{Lifecycle, Phase, MAX_FRAME_DT, MIN_SURFACE_EXTENT};
pub use presenter::density_to_rgba;
