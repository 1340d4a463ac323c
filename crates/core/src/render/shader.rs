//! Shader compilation and program linking.
//!
//! Kernel programs are tiny fragment shaders; when one fails to compile
//! the driver log references line numbers, so the error formatter prepends
//! numbered source lines to make those references readable. Compilation
//! and linking need a live GL context; the formatting is pure.

use thiserror::Error;

/// Errors raised while building a kernel program.
#[derive(Debug, Clone, Error)]
pub enum ShaderError {
    /// A shader stage failed to compile.
    #[error("shader compile error ({stage}):\n{log}")]
    CompileError {
        /// The stage that failed ("vertex" or "fragment").
        stage: String,
        /// Driver info log, with numbered source prepended.
        log: String,
    },
    /// The program failed to link.
    #[error("shader link error:\n{0}")]
    LinkError(String),
}

/// Prepends right-aligned line numbers to `source` and appends the driver
/// `log`, so log lines like `ERROR: 0:12` can be matched to the GLSL.
pub fn format_shader_error(source: &str, log: &str) -> String {
    let lines: Vec<&str> = source.lines().collect();
    let width = lines.len().to_string().len().max(1);
    let numbered = lines
        .iter()
        .enumerate()
        .map(|(i, line)| format!("{:>width$}: {line}", i + 1))
        .collect::<Vec<_>>()
        .join("\n");

    match (numbered.is_empty(), log.is_empty()) {
        (true, true) => String::new(),
        (true, false) => log.to_string(),
        (false, true) => numbered,
        (false, false) => format!("{numbered}\n\n{log}"),
    }
}

/// Compiles a single shader stage.
///
/// # Errors
///
/// Returns `ShaderError::CompileError` with a formatted log on failure.
#[allow(unsafe_code)]
pub fn compile_shader(
    gl: &glow::Context,
    shader_type: u32,
    source: &str,
) -> Result<glow::Shader, ShaderError> {
    use glow::HasContext;

    let stage = match shader_type {
        glow::VERTEX_SHADER => "vertex",
        glow::FRAGMENT_SHADER => "fragment",
        _ => "unknown",
    };

    // SAFETY: glow wraps raw GL calls as unsafe. Handles are valid for
    // the duration of this function and deleted on the error path.
    let shader = unsafe {
        gl.create_shader(shader_type)
            .map_err(|e| ShaderError::CompileError {
                stage: stage.to_string(),
                log: e,
            })?
    };

    unsafe {
        gl.shader_source(shader, source);
        gl.compile_shader(shader);
    }

    if unsafe { gl.get_shader_compile_status(shader) } {
        Ok(shader)
    } else {
        let info_log = unsafe { gl.get_shader_info_log(shader) };
        unsafe { gl.delete_shader(shader) };
        Err(ShaderError::CompileError {
            stage: stage.to_string(),
            log: format_shader_error(source, &info_log),
        })
    }
}

/// Links a vertex and fragment shader into a program, detaching the
/// shaders afterward (the program keeps its own copies).
///
/// # Errors
///
/// Returns `ShaderError::LinkError` if linking fails.
#[allow(unsafe_code)]
pub fn link_program(
    gl: &glow::Context,
    vertex: glow::Shader,
    fragment: glow::Shader,
) -> Result<glow::Program, ShaderError> {
    use glow::HasContext;

    // SAFETY: glow wraps raw GL calls as unsafe. Shader handles come from
    // prior successful compile_shader calls.
    let program = unsafe { gl.create_program().map_err(ShaderError::LinkError)? };

    unsafe {
        gl.attach_shader(program, vertex);
        gl.attach_shader(program, fragment);
        gl.link_program(program);
        gl.detach_shader(program, vertex);
        gl.detach_shader(program, fragment);
    }

    if unsafe { gl.get_program_link_status(program) } {
        Ok(program)
    } else {
        let info_log = unsafe { gl.get_program_info_log(program) };
        unsafe { gl.delete_program(program) };
        Err(ShaderError::LinkError(info_log))
    }
}

/// Compiles both stages and links them, cleaning up the intermediate
/// shader handles on every path.
///
/// # Errors
///
/// Propagates compile errors from either stage, or a link error.
#[allow(unsafe_code)]
pub fn compile_program(
    gl: &glow::Context,
    vertex_src: &str,
    fragment_src: &str,
) -> Result<glow::Program, ShaderError> {
    use glow::HasContext;

    let vert = compile_shader(gl, glow::VERTEX_SHADER, vertex_src)?;
    let frag = match compile_shader(gl, glow::FRAGMENT_SHADER, fragment_src) {
        Ok(f) => f,
        Err(e) => {
            // SAFETY: vert is a valid handle from compile_shader.
            unsafe { gl.delete_shader(vert) };
            return Err(e);
        }
    };

    let result = link_program(gl, vert, frag);

    // SAFETY: both handles are valid; the linked program owns copies.
    unsafe {
        gl.delete_shader(vert);
        gl.delete_shader(frag);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_prepends_line_numbers_and_keeps_log() {
        let source = "#version 300 es\nvoid main() {\n}\n";
        let log = "ERROR: 0:2: syntax error";
        let formatted = format_shader_error(source, log);
        assert!(formatted.contains("1: #version 300 es"), "{formatted}");
        assert!(formatted.contains("2: void main() {"), "{formatted}");
        assert!(formatted.contains(log), "{formatted}");
    }

    #[test]
    fn format_handles_empty_source() {
        let formatted = format_shader_error("", "some error");
        assert_eq!(formatted, "some error");
    }

    #[test]
    fn format_handles_empty_log() {
        let formatted = format_shader_error("void main() {}", "");
        assert_eq!(formatted, "1: void main() {}");
    }

    #[test]
    fn format_handles_both_empty() {
        assert!(format_shader_error("", "").is_empty());
    }

    #[test]
    fn format_right_aligns_numbers_past_ten_lines() {
        let source = (1..=12)
            .map(|i| format!("line {i}"))
            .collect::<Vec<_>>()
            .join("\n");
        let formatted = format_shader_error(&source, "err");
        let lines: Vec<&str> = formatted.lines().collect();
        assert!(lines[0].starts_with(" 1: "), "got: '{}'", lines[0]);
        assert!(lines[9].starts_with("10: "), "got: '{}'", lines[9]);
    }

    #[test]
    fn compile_error_display_includes_stage_and_log() {
        let err = ShaderError::CompileError {
            stage: "fragment".into(),
            log: "undeclared identifier".into(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("fragment"), "{msg}");
        assert!(msg.contains("undeclared identifier"), "{msg}");
    }

    #[test]
    fn link_error_display_includes_log() {
        let err = ShaderError::LinkError("varying mismatch".into());
        assert!(format!("{err}").contains("varying mismatch"));
    }

    #[test]
    fn shader_error_implements_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<ShaderError>();
    }

    #[test]
    #[ignore = "requires GL context"]
    fn compile_program_links_kernel_sources() {
        // Would test: compile_program succeeds for every kernel fragment
        // source against the fullscreen vertex shader.
    }
}
