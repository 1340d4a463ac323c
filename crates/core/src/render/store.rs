//! The GPU field store: every simulation texture, allocated and disposed
//! as one unit.
//!
//! Velocity, density, and pressure are double-buffered; divergence and
//! curl are single targets. All five share the same downsampled grid
//! dimensions. On resize the whole store is disposed and a new one
//! allocated — reattaching or resizing targets in place is exactly how
//! stale-texture bugs happen, so it is not offered.

use super::context::GpuContext;
use super::target::{DoubleTarget, RenderTarget};
use super::texture::{FilterMode, TextureConfig};

/// All field textures for one simulation instance.
pub struct FieldTargets {
    velocity: DoubleTarget,
    density: DoubleTarget,
    pressure: DoubleTarget,
    divergence: RenderTarget,
    curl: RenderTarget,
    width: u32,
    height: u32,
    disposed: bool,
}

impl FieldTargets {
    /// Allocates every field at the given grid dimensions, using the
    /// formats and filters the context supports. All targets start
    /// zero-cleared.
    ///
    /// # Errors
    ///
    /// Returns an error if any target cannot be created; targets already
    /// created are released before returning.
    pub fn allocate(ctx: &GpuContext, width: u32, height: u32) -> Result<Self, String> {
        let gl = ctx.gl();
        let advect_filter = ctx.advection_filter();

        let density = DoubleTarget::new(
            gl,
            TextureConfig {
                width,
                height,
                format: ctx.density_format(),
                filter: advect_filter,
            },
        )?;

        let velocity = match DoubleTarget::new(
            gl,
            TextureConfig {
                width,
                height,
                format: ctx.velocity_format(),
                filter: advect_filter,
            },
        ) {
            Ok(t) => t,
            Err(e) => {
                density.destroy(gl);
                return Err(e);
            }
        };

        // The solve fields are only ever read at texel centers.
        let scalar = TextureConfig {
            width,
            height,
            format: ctx.scalar_format(),
            filter: FilterMode::Nearest,
        };

        let pressure = match DoubleTarget::new(gl, scalar) {
            Ok(t) => t,
            Err(e) => {
                density.destroy(gl);
                velocity.destroy(gl);
                return Err(e);
            }
        };

        let divergence = match RenderTarget::new(gl, scalar) {
            Ok(t) => t,
            Err(e) => {
                density.destroy(gl);
                velocity.destroy(gl);
                pressure.destroy(gl);
                return Err(e);
            }
        };

        let curl = match RenderTarget::new(gl, scalar) {
            Ok(t) => t,
            Err(e) => {
                density.destroy(gl);
                velocity.destroy(gl);
                pressure.destroy(gl);
                divergence.destroy(gl);
                return Err(e);
            }
        };

        Ok(Self {
            velocity,
            density,
            pressure,
            divergence,
            curl,
            width,
            height,
            disposed: false,
        })
    }

    /// Grid width in texels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in texels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Texel size of the grid: `(1/width, 1/height)`.
    pub fn texel_size(&self) -> (f32, f32) {
        (1.0 / self.width as f32, 1.0 / self.height as f32)
    }

    /// The velocity double buffer.
    pub fn velocity(&self) -> &DoubleTarget {
        &self.velocity
    }

    /// Mutable velocity double buffer (for swapping).
    pub fn velocity_mut(&mut self) -> &mut DoubleTarget {
        &mut self.velocity
    }

    /// The density double buffer.
    pub fn density(&self) -> &DoubleTarget {
        &self.density
    }

    /// Mutable density double buffer (for swapping).
    pub fn density_mut(&mut self) -> &mut DoubleTarget {
        &mut self.density
    }

    /// The pressure double buffer.
    pub fn pressure(&self) -> &DoubleTarget {
        &self.pressure
    }

    /// Mutable pressure double buffer (for swapping).
    pub fn pressure_mut(&mut self) -> &mut DoubleTarget {
        &mut self.pressure
    }

    /// The divergence target.
    pub fn divergence(&self) -> &RenderTarget {
        &self.divergence
    }

    /// The curl target.
    pub fn curl(&self) -> &RenderTarget {
        &self.curl
    }

    /// Whether `dispose` has already run.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Releases every texture and framebuffer exactly once; redundant
    /// calls are no-ops, and a lost context is tolerated (deletion of
    /// dead handles is a GL no-op).
    pub fn dispose(&mut self, gl: &glow::Context) {
        if self.disposed {
            return;
        }
        self.velocity.destroy(gl);
        self.density.destroy(gl);
        self.pressure.destroy(gl);
        self.divergence.destroy(gl);
        self.curl.destroy(gl);
        self.disposed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_targets_struct_has_expected_api() {
        fn _assert_api(ft: &mut FieldTargets) {
            let _: u32 = ft.width();
            let _: u32 = ft.height();
            let _: (f32, f32) = ft.texel_size();
            let _ = ft.velocity().read();
            let _ = ft.density().write();
            let _ = ft.pressure().read();
            let _ = ft.divergence().texture();
            let _ = ft.curl().texture();
            let _: bool = ft.is_disposed();
        }
    }

    #[test]
    #[ignore = "requires GL context"]
    fn allocate_creates_five_fields_at_shared_dimensions() {
        // Would test: all targets report the requested width/height.
    }

    #[test]
    #[ignore = "requires GL context"]
    fn dispose_is_idempotent() {
        // Would test: dispose(); dispose(); raises no GL error and
        // is_disposed() stays true.
    }

    #[test]
    #[ignore = "requires GL context"]
    fn allocate_after_dispose_reuses_no_old_handles() {
        // Would test: a fresh allocation after dispose yields distinct
        // texture handles from the disposed generation.
    }
}
