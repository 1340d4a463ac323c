//! The GPU pass pipeline: the fixed solver tick, splat injection, and
//! presentation, executed as framebuffer blits.
//!
//! Pass order is load-bearing: confinement needs the freshly computed
//! curl, divergence must see the confinement-updated velocity, pressure
//! must be solved before its gradient is subtracted, and advection must
//! transport with the divergence-free velocity. Each pass completes
//! (including its buffer swap) before the next begins; nothing here runs
//! concurrently with anything else.

use glam::{Vec2, Vec3};

use crate::config::FluidConfig;

use super::program::KernelSet;
use super::store::FieldTargets;
use super::target::RenderTarget;

/// Executes kernel passes with a shared empty VAO and fullscreen-triangle
/// draws. Reads field textures, writes field targets; never touches field
/// allocation.
pub struct PassPipeline {
    vao: glow::VertexArray,
}

impl PassPipeline {
    /// Creates the pipeline's empty vertex array (the fullscreen vertex
    /// stage generates positions from `gl_VertexID`, so no buffers).
    ///
    /// # Errors
    ///
    /// Returns an error string if the vertex array cannot be created.
    #[allow(unsafe_code)]
    pub fn new(gl: &glow::Context) -> Result<Self, String> {
        use glow::HasContext;
        // SAFETY: creating a vertex array has no preconditions.
        let vao = unsafe { gl.create_vertex_array()? };
        Ok(Self { vao })
    }

    /// Issues one fullscreen-triangle draw into whatever framebuffer and
    /// program are currently bound.
    #[allow(unsafe_code)]
    fn draw(&self, gl: &glow::Context) {
        use glow::HasContext;
        // SAFETY: self.vao is valid; the bound program was linked against
        // the fullscreen vertex shader which needs no attributes.
        unsafe {
            gl.bind_vertex_array(Some(self.vao));
            gl.draw_arrays(glow::TRIANGLES, 0, 3);
        }
    }

    /// Draws into an off-screen target.
    fn blit(&self, gl: &glow::Context, target: &RenderTarget) {
        target.bind(gl);
        self.draw(gl);
    }

    /// Runs the fixed eight-pass solver tick.
    ///
    /// `dt` is the (already clamped) timestep in seconds.
    #[allow(unsafe_code)]
    pub fn step(
        &self,
        gl: &glow::Context,
        kernels: &KernelSet,
        fields: &mut FieldTargets,
        config: &FluidConfig,
        dt: f32,
    ) {
        use glow::HasContext;

        let (tx, ty) = fields.texel_size();

        // SAFETY: state-setting call with no preconditions.
        unsafe { gl.disable(glow::BLEND) };

        // 1) Curl of the current velocity.
        kernels.curl.bind(gl);
        kernels.curl.set_vec2(gl, "u_texel_size", tx, ty);
        kernels
            .curl
            .bind_sampler(gl, "u_velocity", 0, fields.velocity().read().texture());
        self.blit(gl, fields.curl());

        // 2) Vorticity confinement force into velocity.
        kernels.vorticity.bind(gl);
        kernels.vorticity.set_vec2(gl, "u_texel_size", tx, ty);
        kernels
            .vorticity
            .set_f32(gl, "u_curl_strength", config.curl_strength);
        kernels.vorticity.set_f32(gl, "u_dt", dt);
        kernels
            .vorticity
            .bind_sampler(gl, "u_velocity", 0, fields.velocity().read().texture());
        kernels
            .vorticity
            .bind_sampler(gl, "u_curl", 1, fields.curl().texture());
        self.blit(gl, fields.velocity().write());
        fields.velocity_mut().swap();

        // 3) Divergence of the confinement-updated velocity.
        kernels.divergence.bind(gl);
        kernels.divergence.set_vec2(gl, "u_texel_size", tx, ty);
        kernels
            .divergence
            .bind_sampler(gl, "u_velocity", 0, fields.velocity().read().texture());
        self.blit(gl, fields.divergence());

        // 4) Dissipate the previous tick's pressure as the solve's seed.
        kernels.decay.bind(gl);
        kernels
            .decay
            .set_f32(gl, "u_value", config.pressure_dissipation);
        kernels
            .decay
            .bind_sampler(gl, "u_texture", 0, fields.pressure().read().texture());
        self.blit(gl, fields.pressure().write());
        fields.pressure_mut().swap();

        // 5) Jacobi pressure solve, ping-ponging each iteration.
        kernels.pressure.bind(gl);
        kernels.pressure.set_vec2(gl, "u_texel_size", tx, ty);
        kernels
            .pressure
            .bind_sampler(gl, "u_divergence", 0, fields.divergence().texture());
        for _ in 0..config.pressure_iterations {
            kernels
                .pressure
                .bind_sampler(gl, "u_pressure", 1, fields.pressure().read().texture());
            self.blit(gl, fields.pressure().write());
            fields.pressure_mut().swap();
        }

        // 6) Subtract the pressure gradient from velocity.
        kernels.gradient_subtract.bind(gl);
        kernels.gradient_subtract.set_vec2(gl, "u_texel_size", tx, ty);
        kernels
            .gradient_subtract
            .bind_sampler(gl, "u_pressure", 0, fields.pressure().read().texture());
        kernels
            .gradient_subtract
            .bind_sampler(gl, "u_velocity", 1, fields.velocity().read().texture());
        self.blit(gl, fields.velocity().write());
        fields.velocity_mut().swap();

        // 7) Advect velocity through itself.
        kernels.advection.bind(gl);
        kernels.advection.set_f32(gl, "u_dt", dt);
        kernels
            .advection
            .set_f32(gl, "u_dissipation", config.velocity_dissipation);
        kernels
            .advection
            .bind_sampler(gl, "u_velocity", 0, fields.velocity().read().texture());
        kernels
            .advection
            .bind_sampler(gl, "u_source", 1, fields.velocity().read().texture());
        self.blit(gl, fields.velocity().write());
        fields.velocity_mut().swap();

        // 8) Advect density along the final velocity.
        kernels
            .advection
            .set_f32(gl, "u_dissipation", config.density_dissipation);
        kernels
            .advection
            .bind_sampler(gl, "u_velocity", 0, fields.velocity().read().texture());
        kernels
            .advection
            .bind_sampler(gl, "u_source", 1, fields.density().read().texture());
        self.blit(gl, fields.density().write());
        fields.density_mut().swap();
    }

    /// Injects one splat: a velocity impulse and a density color at the
    /// same point, sharing the aspect-corrected radius.
    pub fn splat(
        &self,
        gl: &glow::Context,
        kernels: &KernelSet,
        fields: &mut FieldTargets,
        point: Vec2,
        velocity_impulse: Vec2,
        color: Vec3,
        radius: f32,
        aspect_ratio: f32,
    ) {
        kernels.splat.bind(gl);
        kernels.splat.set_f32(gl, "u_aspect_ratio", aspect_ratio);
        kernels.splat.set_vec2(gl, "u_point", point.x, point.y);
        kernels.splat.set_f32(gl, "u_radius", radius);

        kernels
            .splat
            .bind_sampler(gl, "u_target", 0, fields.velocity().read().texture());
        kernels.splat.set_vec3(
            gl,
            "u_color",
            velocity_impulse.x,
            velocity_impulse.y,
            0.0,
        );
        self.blit(gl, fields.velocity().write());
        fields.velocity_mut().swap();

        kernels
            .splat
            .bind_sampler(gl, "u_target", 0, fields.density().read().texture());
        kernels
            .splat
            .set_vec3(gl, "u_color", color.x, color.y, color.z);
        self.blit(gl, fields.density().write());
        fields.density_mut().swap();
    }

    /// Draws the density read half to the default framebuffer at the full
    /// surface size. Runs every frame, paused or not, so the displayed
    /// image stays live.
    #[allow(unsafe_code)]
    pub fn present(
        &self,
        gl: &glow::Context,
        kernels: &KernelSet,
        fields: &FieldTargets,
        surface_width: u32,
        surface_height: u32,
    ) {
        use glow::HasContext;

        // SAFETY: binding the default framebuffer and setting the
        // viewport have no preconditions.
        unsafe {
            gl.bind_framebuffer(glow::FRAMEBUFFER, None);
            gl.viewport(0, 0, surface_width as i32, surface_height as i32);
        }
        kernels.present.bind(gl);
        kernels
            .present
            .bind_sampler(gl, "u_texture", 0, fields.density().read().texture());
        self.draw(gl);
    }

    /// Deletes the vertex array.
    #[allow(unsafe_code)]
    pub fn destroy(&self, gl: &glow::Context) {
        use glow::HasContext;
        // SAFETY: deleting a dead handle is a GL no-op.
        unsafe { gl.delete_vertex_array(self.vao) };
    }
}
