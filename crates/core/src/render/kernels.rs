//! Fragment sources for the nine solver kernels.
//!
//! Each kernel is a per-texel program over one or more source fields,
//! parameterized by the destination texel size. The set is closed: these
//! nine are the whole numerical method, so they live as named constants
//! rather than any runtime-extensible registry. The GLSL math mirrors the
//! CPU kernels in `fluid-engine-sim` texel for texel.

/// Curl of the velocity field: `(R.y - L.y) - (T.x - B.x)`.
pub const CURL_FRAGMENT_SHADER: &str = r#"#version 300 es
precision highp float;
in vec2 v_uv;
out vec4 frag;
uniform sampler2D u_velocity;
uniform vec2 u_texel_size;
void main() {
    float l = texture(u_velocity, v_uv - vec2(u_texel_size.x, 0.0)).y;
    float r = texture(u_velocity, v_uv + vec2(u_texel_size.x, 0.0)).y;
    float b = texture(u_velocity, v_uv - vec2(0.0, u_texel_size.y)).x;
    float t = texture(u_velocity, v_uv + vec2(0.0, u_texel_size.y)).x;
    frag = vec4((r - l) - (t - b), 0.0, 0.0, 1.0);
}
"#;

/// Vorticity confinement: the normalized gradient of |curl|, scaled by the
/// local signed curl and the confinement strength, added to velocity.
pub const VORTICITY_FRAGMENT_SHADER: &str = r#"#version 300 es
precision highp float;
in vec2 v_uv;
out vec4 frag;
uniform sampler2D u_velocity;
uniform sampler2D u_curl;
uniform float u_curl_strength;
uniform float u_dt;
uniform vec2 u_texel_size;
void main() {
    float l = texture(u_curl, v_uv - vec2(u_texel_size.x, 0.0)).x;
    float r = texture(u_curl, v_uv + vec2(u_texel_size.x, 0.0)).x;
    float b = texture(u_curl, v_uv - vec2(0.0, u_texel_size.y)).x;
    float t = texture(u_curl, v_uv + vec2(0.0, u_texel_size.y)).x;
    float c = texture(u_curl, v_uv).x;
    vec2 force = vec2(abs(t) - abs(b), abs(r) - abs(l));
    force /= length(force) + 0.0001;
    force *= u_curl_strength * c;
    vec2 vel = texture(u_velocity, v_uv).xy;
    frag = vec4(vel + force * u_dt, 0.0, 1.0);
}
"#;

/// Velocity divergence: `(R.x - L.x) + (T.y - B.y)`.
pub const DIVERGENCE_FRAGMENT_SHADER: &str = r#"#version 300 es
precision highp float;
in vec2 v_uv;
out vec4 frag;
uniform sampler2D u_velocity;
uniform vec2 u_texel_size;
void main() {
    float l = texture(u_velocity, v_uv - vec2(u_texel_size.x, 0.0)).x;
    float r = texture(u_velocity, v_uv + vec2(u_texel_size.x, 0.0)).x;
    float b = texture(u_velocity, v_uv - vec2(0.0, u_texel_size.y)).y;
    float t = texture(u_velocity, v_uv + vec2(0.0, u_texel_size.y)).y;
    frag = vec4((r - l) + (t - b), 0.0, 0.0, 1.0);
}
"#;

/// Scalar decay: destination = `u_value` * source. Dissipates pressure
/// before each solve.
pub const DECAY_FRAGMENT_SHADER: &str = r#"#version 300 es
precision highp float;
in vec2 v_uv;
out vec4 frag;
uniform sampler2D u_texture;
uniform float u_value;
void main() {
    frag = u_value * texture(u_texture, v_uv);
}
"#;

/// One Jacobi iteration of the pressure Poisson solve:
/// `p' = (L + R + B + T - divergence) / 4`.
pub const PRESSURE_FRAGMENT_SHADER: &str = r#"#version 300 es
precision highp float;
in vec2 v_uv;
out vec4 frag;
uniform sampler2D u_pressure;
uniform sampler2D u_divergence;
uniform vec2 u_texel_size;
void main() {
    float l = texture(u_pressure, v_uv - vec2(u_texel_size.x, 0.0)).x;
    float r = texture(u_pressure, v_uv + vec2(u_texel_size.x, 0.0)).x;
    float b = texture(u_pressure, v_uv - vec2(0.0, u_texel_size.y)).x;
    float t = texture(u_pressure, v_uv + vec2(0.0, u_texel_size.y)).x;
    float divergence = texture(u_divergence, v_uv).x;
    frag = vec4((l + r + b + t - divergence) * 0.25, 0.0, 0.0, 1.0);
}
"#;

/// Pressure gradient subtraction, enforcing approximate incompressibility:
/// `vel -= (R - L, T - B)`.
pub const GRADIENT_SUBTRACT_FRAGMENT_SHADER: &str = r#"#version 300 es
precision highp float;
in vec2 v_uv;
out vec4 frag;
uniform sampler2D u_pressure;
uniform sampler2D u_velocity;
uniform vec2 u_texel_size;
void main() {
    float l = texture(u_pressure, v_uv - vec2(u_texel_size.x, 0.0)).x;
    float r = texture(u_pressure, v_uv + vec2(u_texel_size.x, 0.0)).x;
    float b = texture(u_pressure, v_uv - vec2(0.0, u_texel_size.y)).x;
    float t = texture(u_pressure, v_uv + vec2(0.0, u_texel_size.y)).x;
    vec2 vel = texture(u_velocity, v_uv).xy;
    frag = vec4(vel - vec2(r - l, t - b), 0.0, 1.0);
}
"#;

/// Semi-Lagrangian advection: trace backward along the local velocity,
/// sample the source there (hardware filtering), apply dissipation.
/// Alpha is forced to 1.
pub const ADVECTION_FRAGMENT_SHADER: &str = r#"#version 300 es
precision highp float;
in vec2 v_uv;
out vec4 frag;
uniform sampler2D u_velocity;
uniform sampler2D u_source;
uniform float u_dt;
uniform float u_dissipation;
void main() {
    vec2 coord = v_uv - u_dt * texture(u_velocity, v_uv).xy;
    frag = u_dissipation * texture(u_source, coord);
    frag.a = 1.0;
}
"#;

/// Additive Gaussian splat at `u_point`, aspect-corrected, on top of the
/// existing target value.
pub const SPLAT_FRAGMENT_SHADER: &str = r#"#version 300 es
precision highp float;
in vec2 v_uv;
out vec4 frag;
uniform sampler2D u_target;
uniform float u_aspect_ratio;
uniform vec3 u_color;
uniform vec2 u_point;
uniform float u_radius;
void main() {
    vec2 p = v_uv - u_point;
    p.x *= u_aspect_ratio;
    vec3 splat = exp(-dot(p, p) / u_radius) * u_color;
    vec3 base = texture(u_target, v_uv).xyz;
    frag = vec4(base + splat, 1.0);
}
"#;

/// Straight copy of the density color to the visible surface, alpha 1,
/// no blending.
pub const PRESENT_FRAGMENT_SHADER: &str = r#"#version 300 es
precision highp float;
in vec2 v_uv;
out vec4 frag;
uniform sampler2D u_texture;
void main() {
    frag = vec4(texture(u_texture, v_uv).rgb, 1.0);
}
"#;

/// Every kernel fragment source, for bulk compilation checks.
pub const ALL_FRAGMENT_SHADERS: [(&str, &str); 9] = [
    ("curl", CURL_FRAGMENT_SHADER),
    ("vorticity", VORTICITY_FRAGMENT_SHADER),
    ("divergence", DIVERGENCE_FRAGMENT_SHADER),
    ("decay", DECAY_FRAGMENT_SHADER),
    ("pressure", PRESSURE_FRAGMENT_SHADER),
    ("gradient_subtract", GRADIENT_SUBTRACT_FRAGMENT_SHADER),
    ("advection", ADVECTION_FRAGMENT_SHADER),
    ("splat", SPLAT_FRAGMENT_SHADER),
    ("present", PRESENT_FRAGMENT_SHADER),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kernel_targets_glsl_es_300() {
        for (name, src) in ALL_FRAGMENT_SHADERS {
            assert!(
                src.starts_with("#version 300 es"),
                "{name} missing version directive"
            );
            assert!(src.contains("out vec4 frag"), "{name} missing output");
            assert!(src.contains("void main()"), "{name} missing main");
        }
    }

    #[test]
    fn every_sampling_kernel_reads_the_uv_varying() {
        for (name, src) in ALL_FRAGMENT_SHADERS {
            assert!(src.contains("v_uv"), "{name} must sample via v_uv");
        }
    }

    #[test]
    fn stencil_kernels_use_both_texel_axes() {
        for (name, src) in [
            ("curl", CURL_FRAGMENT_SHADER),
            ("vorticity", VORTICITY_FRAGMENT_SHADER),
            ("divergence", DIVERGENCE_FRAGMENT_SHADER),
            ("pressure", PRESSURE_FRAGMENT_SHADER),
            ("gradient_subtract", GRADIENT_SUBTRACT_FRAGMENT_SHADER),
        ] {
            assert!(src.contains("u_texel_size.x"), "{name} missing x stencil");
            assert!(src.contains("u_texel_size.y"), "{name} missing y stencil");
        }
    }

    #[test]
    fn divergence_sums_both_axis_terms() {
        // The scalar written must combine the x and y central differences.
        assert!(DIVERGENCE_FRAGMENT_SHADER.contains("(r - l) + (t - b)"));
    }

    #[test]
    fn advection_traces_backward_and_forces_alpha() {
        assert!(ADVECTION_FRAGMENT_SHADER.contains("v_uv - u_dt"));
        assert!(ADVECTION_FRAGMENT_SHADER.contains("frag.a = 1.0"));
        assert!(ADVECTION_FRAGMENT_SHADER.contains("u_dissipation"));
    }

    #[test]
    fn vorticity_normalizes_with_epsilon() {
        assert!(VORTICITY_FRAGMENT_SHADER.contains("length(force) + 0.0001"));
    }

    #[test]
    fn splat_is_additive_and_aspect_corrected() {
        assert!(SPLAT_FRAGMENT_SHADER.contains("base + splat"));
        assert!(SPLAT_FRAGMENT_SHADER.contains("p.x *= u_aspect_ratio"));
        assert!(SPLAT_FRAGMENT_SHADER.contains("exp(-dot(p, p) / u_radius)"));
    }

    #[test]
    fn pressure_averages_four_neighbors_minus_divergence() {
        assert!(PRESSURE_FRAGMENT_SHADER.contains("(l + r + b + t - divergence) * 0.25"));
    }

    #[test]
    fn present_forces_opaque_alpha() {
        assert!(PRESENT_FRAGMENT_SHADER.contains(".rgb, 1.0"));
    }

    #[test]
    fn kernel_names_are_unique() {
        for (i, (a, _)) in ALL_FRAGMENT_SHADERS.iter().enumerate() {
            for (b, _) in &ALL_FRAGMENT_SHADERS[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
