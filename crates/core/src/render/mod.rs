//! WebGL2/OpenGL rendering infrastructure for the GPU solver.
//!
//! Only available with the `render` feature. Provides capability-aware
//! context wrapping, texture formats with integer fallback, FBO render
//! targets, shader compilation, the GLSL kernel set, the field store, and
//! the pass pipeline that executes the solver tick on the GPU.
//!
//! # Module overview
//!
//! - [`context`] -- Context wrapper with capability detection and format
//!   selection.
//! - [`texture`] -- Texture formats, filters, and allocation.
//! - [`target`] -- FBO + texture targets, single and double-buffered.
//! - [`store`] -- The per-simulation field store (allocate / dispose).
//! - [`shader`] -- Shader compilation, linking, error formatting.
//! - [`fullscreen`] -- Shared fullscreen-triangle vertex shader.
//! - [`kernels`] -- The nine kernel fragment sources.
//! - [`program`] -- Linked kernel programs with cached uniforms.
//! - [`pipeline`] -- The fixed-order pass executor, splat, and present.

pub mod context;
pub mod fullscreen;
pub mod kernels;
pub mod pipeline;
pub mod program;
pub mod shader;
pub mod store;
pub mod target;
pub mod texture;

pub use context::GpuContext;
pub use fullscreen::FULLSCREEN_VERTEX_SHADER;
pub use pipeline::PassPipeline;
pub use program::{KernelProgram, KernelSet};
pub use shader::{compile_program, compile_shader, format_shader_error, link_program, ShaderError};
pub use store::FieldTargets;
pub use target::{DoubleTarget, RenderTarget};
pub use texture::{create_texture, FilterMode, TextureConfig, TextureFormat};
