//! Linked kernel programs with cached uniform locations.
//!
//! A `KernelProgram` is one fragment kernel linked against the shared
//! fullscreen vertex stage, with every active uniform's location resolved
//! at link time. `KernelSet` holds the nine programs as named fields —
//! the kernel set is closed, so there is no lookup table or dynamic
//! dispatch, just one struct field per pass.

use std::collections::HashMap;

use super::fullscreen::FULLSCREEN_VERTEX_SHADER;
use super::kernels;
use super::shader::{compile_program, ShaderError};

/// One compiled kernel: program handle plus uniform location cache.
pub struct KernelProgram {
    program: glow::Program,
    uniforms: HashMap<String, glow::UniformLocation>,
}

impl KernelProgram {
    /// Compiles `fragment_src` against the fullscreen vertex shader and
    /// caches the location of every active uniform.
    ///
    /// # Errors
    ///
    /// Returns a `ShaderError` if compilation or linking fails.
    #[allow(unsafe_code)]
    pub fn new(gl: &glow::Context, fragment_src: &str) -> Result<Self, ShaderError> {
        use glow::HasContext;

        let program = compile_program(gl, FULLSCREEN_VERTEX_SHADER, fragment_src)?;

        // SAFETY: program is a freshly linked valid handle; uniform
        // enumeration only reads program metadata.
        let mut uniforms = HashMap::new();
        unsafe {
            let count = gl.get_active_uniforms(program);
            for i in 0..count {
                if let Some(info) = gl.get_active_uniform(program, i) {
                    if let Some(location) = gl.get_uniform_location(program, &info.name) {
                        uniforms.insert(info.name, location);
                    }
                }
            }
        }

        Ok(Self { program, uniforms })
    }

    /// Makes this program current.
    #[allow(unsafe_code)]
    pub fn bind(&self, gl: &glow::Context) {
        use glow::HasContext;
        // SAFETY: self.program is a valid linked program.
        unsafe { gl.use_program(Some(self.program)) };
    }

    /// Sets a float uniform; unknown names are ignored (the driver may
    /// have optimized the uniform out).
    #[allow(unsafe_code)]
    pub fn set_f32(&self, gl: &glow::Context, name: &str, value: f32) {
        use glow::HasContext;
        if let Some(loc) = self.uniforms.get(name) {
            // SAFETY: the location was resolved against self.program,
            // which bind() made current.
            unsafe { gl.uniform_1_f32(Some(loc), value) };
        }
    }

    /// Sets a vec2 uniform.
    #[allow(unsafe_code)]
    pub fn set_vec2(&self, gl: &glow::Context, name: &str, x: f32, y: f32) {
        use glow::HasContext;
        if let Some(loc) = self.uniforms.get(name) {
            // SAFETY: as in set_f32.
            unsafe { gl.uniform_2_f32(Some(loc), x, y) };
        }
    }

    /// Sets a vec3 uniform.
    #[allow(unsafe_code)]
    pub fn set_vec3(&self, gl: &glow::Context, name: &str, x: f32, y: f32, z: f32) {
        use glow::HasContext;
        if let Some(loc) = self.uniforms.get(name) {
            // SAFETY: as in set_f32.
            unsafe { gl.uniform_3_f32(Some(loc), x, y, z) };
        }
    }

    /// Binds `texture` to texture unit `unit` and points the sampler
    /// uniform `name` at it. Samplers are re-bound per pass to avoid
    /// feedback loops between a pass's source and destination.
    #[allow(unsafe_code)]
    pub fn bind_sampler(&self, gl: &glow::Context, name: &str, unit: u32, texture: glow::Texture) {
        use glow::HasContext;
        // SAFETY: texture is a live handle owned by the field store;
        // unit is a small index well under the GL minimum of 16.
        unsafe {
            gl.active_texture(glow::TEXTURE0 + unit);
            gl.bind_texture(glow::TEXTURE_2D, Some(texture));
        }
        if let Some(loc) = self.uniforms.get(name) {
            // SAFETY: as in set_f32.
            unsafe { gl.uniform_1_i32(Some(loc), unit as i32) };
        }
    }

    /// Whether the linker kept a uniform with this name.
    pub fn has_uniform(&self, name: &str) -> bool {
        self.uniforms.contains_key(name)
    }

    /// Deletes the program.
    #[allow(unsafe_code)]
    pub fn destroy(&self, gl: &glow::Context) {
        use glow::HasContext;
        // SAFETY: deleting a program handle is a GL no-op if already gone.
        unsafe { gl.delete_program(self.program) };
    }
}

/// The full kernel program set, one field per pass.
pub struct KernelSet {
    pub curl: KernelProgram,
    pub vorticity: KernelProgram,
    pub divergence: KernelProgram,
    pub decay: KernelProgram,
    pub pressure: KernelProgram,
    pub gradient_subtract: KernelProgram,
    pub advection: KernelProgram,
    pub splat: KernelProgram,
    pub present: KernelProgram,
}

impl KernelSet {
    /// Compiles all nine kernels. Any failure is an initialization
    /// failure for the whole component; programs already built are
    /// released before the error propagates.
    pub fn compile(gl: &glow::Context) -> Result<Self, ShaderError> {
        let mut built: Vec<KernelProgram> = Vec::with_capacity(9);
        for (_, src) in kernels::ALL_FRAGMENT_SHADERS {
            match KernelProgram::new(gl, src) {
                Ok(p) => built.push(p),
                Err(e) => {
                    for p in &built {
                        p.destroy(gl);
                    }
                    return Err(e);
                }
            }
        }
        // Order matches kernels::ALL_FRAGMENT_SHADERS.
        let mut built = built.into_iter();
        let mut take = move || built.next();
        match (
            take(),
            take(),
            take(),
            take(),
            take(),
            take(),
            take(),
            take(),
            take(),
        ) {
            (
                Some(curl),
                Some(vorticity),
                Some(divergence),
                Some(decay),
                Some(pressure),
                Some(gradient_subtract),
                Some(advection),
                Some(splat),
                Some(present),
            ) => Ok(Self {
                curl,
                vorticity,
                divergence,
                decay,
                pressure,
                gradient_subtract,
                advection,
                splat,
                present,
            }),
            _ => Err(ShaderError::LinkError(
                "kernel source table does not match program set".into(),
            )),
        }
    }

    /// Deletes every program.
    pub fn destroy(&self, gl: &glow::Context) {
        for program in [
            &self.curl,
            &self.vorticity,
            &self.divergence,
            &self.decay,
            &self.pressure,
            &self.gradient_subtract,
            &self.advection,
            &self.splat,
            &self.present,
        ] {
            program.destroy(gl);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kernel_set_has_one_program_per_fragment_source() {
        // The named fields and the source table must stay in sync.
        fn _assert_fields(set: &KernelSet) -> [&KernelProgram; 9] {
            [
                &set.curl,
                &set.vorticity,
                &set.divergence,
                &set.decay,
                &set.pressure,
                &set.gradient_subtract,
                &set.advection,
                &set.splat,
                &set.present,
            ]
        }
        assert_eq!(kernels::ALL_FRAGMENT_SHADERS.len(), 9);
    }

    #[test]
    #[ignore = "requires GL context"]
    fn compile_builds_all_nine_kernels() {
        // Would test: KernelSet::compile succeeds and each program has
        // the uniforms its source declares.
    }

    #[test]
    #[ignore = "requires GL context"]
    fn set_uniform_on_unknown_name_is_ignored() {
        // Would test: setting a name the driver optimized out is a no-op
        // rather than an error.
    }
}
