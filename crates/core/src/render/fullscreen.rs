//! Fullscreen triangle vertex stage shared by every kernel program.
//!
//! Each kernel pass covers the whole destination target. A single
//! oversized triangle (clipped for free by the GPU) avoids the diagonal
//! seam of a two-triangle quad, and generating positions from
//! `gl_VertexID` means no vertex buffer at all — an empty VAO and
//! `draw_arrays(TRIANGLES, 0, 3)` is the entire draw.

/// GLSL ES 3.0 vertex shader producing a fullscreen triangle and the
/// `v_uv` varying every kernel samples with.
pub const FULLSCREEN_VERTEX_SHADER: &str = r#"#version 300 es
out vec2 v_uv;
void main() {
    v_uv = vec2((gl_VertexID << 1) & 2, gl_VertexID & 2);
    gl_Position = vec4(v_uv * 2.0 - 1.0, 0.0, 1.0);
}
"#;
