//! Off-screen render targets: FBO + texture, single and double-buffered.
//!
//! Every kernel pass draws into a `RenderTarget`. A `DoubleTarget` pairs
//! two of them with an O(1) read/write swap for the ping-pong fields.
//! Targets are never resized in place: the field store disposes the whole
//! set and reallocates at the new dimensions, which is what keeps stale
//! textures from surviving a surface resize.

use super::texture::{create_texture, TextureConfig};

/// A framebuffer with one color attachment, zero-cleared at creation.
pub struct RenderTarget {
    fbo: glow::Framebuffer,
    texture: glow::Texture,
    config: TextureConfig,
}

impl RenderTarget {
    /// Creates a target for the given texture configuration, verifies
    /// framebuffer completeness, and clears the attachment to zero.
    ///
    /// # Errors
    ///
    /// Returns an error if texture or framebuffer creation fails, or the
    /// framebuffer is incomplete for this format.
    #[allow(unsafe_code)]
    pub fn new(gl: &glow::Context, config: TextureConfig) -> Result<Self, String> {
        use glow::HasContext;

        let texture = create_texture(gl, &config)?;

        // SAFETY: glow wraps raw GL calls as unsafe. Handles created here
        // are deleted on every error path.
        let fbo = match unsafe { gl.create_framebuffer() } {
            Ok(fbo) => fbo,
            Err(e) => {
                unsafe { gl.delete_texture(texture) };
                return Err(e);
            }
        };

        unsafe {
            gl.bind_framebuffer(glow::FRAMEBUFFER, Some(fbo));
            gl.framebuffer_texture_2d(
                glow::FRAMEBUFFER,
                glow::COLOR_ATTACHMENT0,
                glow::TEXTURE_2D,
                Some(texture),
                0,
            );

            let status = gl.check_framebuffer_status(glow::FRAMEBUFFER);
            if status != glow::FRAMEBUFFER_COMPLETE {
                gl.bind_framebuffer(glow::FRAMEBUFFER, None);
                gl.delete_framebuffer(fbo);
                gl.delete_texture(texture);
                return Err(format!("framebuffer incomplete: status 0x{status:04X}"));
            }

            // Fields start from rest: clear the fresh attachment to zero.
            gl.viewport(0, 0, config.width as i32, config.height as i32);
            gl.clear_color(0.0, 0.0, 0.0, 0.0);
            gl.clear(glow::COLOR_BUFFER_BIT);
            gl.bind_framebuffer(glow::FRAMEBUFFER, None);
        }

        Ok(Self {
            fbo,
            texture,
            config,
        })
    }

    /// Binds this target as the draw framebuffer and sets the viewport to
    /// its texel dimensions.
    #[allow(unsafe_code)]
    pub fn bind(&self, gl: &glow::Context) {
        use glow::HasContext;

        // SAFETY: self.fbo is a valid framebuffer from new().
        unsafe {
            gl.bind_framebuffer(glow::FRAMEBUFFER, Some(self.fbo));
            gl.viewport(0, 0, self.config.width as i32, self.config.height as i32);
        }
    }

    /// The color attachment, for sampling in a later pass.
    pub fn texture(&self) -> glow::Texture {
        self.texture
    }

    /// Target width in texels.
    pub fn width(&self) -> u32 {
        self.config.width
    }

    /// Target height in texels.
    pub fn height(&self) -> u32 {
        self.config.height
    }

    /// Releases the framebuffer and texture.
    ///
    /// GL object deletion is specified to silently ignore dead handles, so
    /// calling this during teardown of a lost context is harmless.
    #[allow(unsafe_code)]
    pub fn destroy(&self, gl: &glow::Context) {
        use glow::HasContext;

        // SAFETY: handles originate from new(); deleting them twice or on
        // a lost context is a GL no-op.
        unsafe {
            gl.delete_framebuffer(self.fbo);
            gl.delete_texture(self.texture);
        }
    }
}

/// Two same-shape render targets with a flag selecting the read half.
pub struct DoubleTarget {
    targets: [RenderTarget; 2],
    front: usize,
}

impl DoubleTarget {
    /// Creates a pair of targets from the same configuration.
    ///
    /// # Errors
    ///
    /// Propagates target creation failure; a half already created is
    /// released before returning.
    pub fn new(gl: &glow::Context, config: TextureConfig) -> Result<Self, String> {
        let first = RenderTarget::new(gl, config)?;
        let second = match RenderTarget::new(gl, config) {
            Ok(t) => t,
            Err(e) => {
                first.destroy(gl);
                return Err(e);
            }
        };
        Ok(Self {
            targets: [first, second],
            front: 0,
        })
    }

    /// The current read half.
    pub fn read(&self) -> &RenderTarget {
        &self.targets[self.front]
    }

    /// The current write half.
    pub fn write(&self) -> &RenderTarget {
        &self.targets[1 - self.front]
    }

    /// Exchanges the read and write halves. O(1) flag flip.
    pub fn swap(&mut self) {
        self.front = 1 - self.front;
    }

    /// Releases both halves.
    pub fn destroy(&self, gl: &glow::Context) {
        self.targets[0].destroy(gl);
        self.targets[1].destroy(gl);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_target_struct_has_expected_fields() {
        // Compile-time shape check; passes if the module compiles.
        fn _assert_fields(rt: &RenderTarget) {
            let _fbo = rt.fbo;
            let _tex = rt.texture;
            let _cfg = rt.config;
        }
    }

    #[test]
    fn double_target_flag_logic_matches_double_field() {
        // The front-flag arithmetic is shared with core::double; verify
        // the involution on the index math alone.
        let mut front = 0_usize;
        front = 1 - front;
        front = 1 - front;
        assert_eq!(front, 0);
    }

    #[test]
    #[ignore = "requires GL context"]
    fn new_creates_complete_zeroed_target() {
        // Would test: creation succeeds, readback is all zeros.
    }

    #[test]
    #[ignore = "requires GL context"]
    fn double_target_swap_exchanges_attachments() {
        // Would test: read().texture() != write().texture() and swap
        // exchanges them.
    }

    #[test]
    #[ignore = "requires GL context"]
    fn destroy_is_safe_to_call_twice() {
        // Would test: duplicate destroy() raises no GL error.
    }
}
