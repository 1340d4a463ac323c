//! Texture formats and allocation for the GPU field store.
//!
//! Field textures prefer 16-bit float formats (RGBA16F for density, RG16F
//! for velocity, R16F for the scalar fields). When the context cannot
//! render to float targets, every field falls back to RGBA8 — the widest
//! integer format — while keeping the caller-visible channel contract.

/// Internal storage format of a field texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureFormat {
    /// Four half-float channels (density / color fields).
    Rgba16F,
    /// Two half-float channels (velocity).
    Rg16F,
    /// One half-float channel (pressure, divergence, curl).
    R16F,
    /// Integer fallback when float render targets are unsupported.
    Rgba8,
}

impl TextureFormat {
    /// GL internal format constant.
    pub fn internal_format(self) -> u32 {
        match self {
            TextureFormat::Rgba16F => glow::RGBA16F,
            TextureFormat::Rg16F => glow::RG16F,
            TextureFormat::R16F => glow::R16F,
            TextureFormat::Rgba8 => glow::RGBA8,
        }
    }

    /// GL pixel layout matching the internal format.
    pub fn layout(self) -> u32 {
        match self {
            TextureFormat::Rgba16F | TextureFormat::Rgba8 => glow::RGBA,
            TextureFormat::Rg16F => glow::RG,
            TextureFormat::R16F => glow::RED,
        }
    }

    /// GL pixel type for storage allocation.
    pub fn pixel_type(self) -> u32 {
        match self {
            TextureFormat::Rgba8 => glow::UNSIGNED_BYTE,
            _ => glow::HALF_FLOAT,
        }
    }

    /// Whether this is a floating-point format.
    pub fn is_float(self) -> bool {
        !matches!(self, TextureFormat::Rgba8)
    }
}

/// Texture sampling filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    /// Hardware bilinear filtering; requires float-linear support for
    /// float formats.
    Linear,
    /// Nearest-texel sampling; always available.
    Nearest,
}

impl FilterMode {
    /// GL filter constant.
    pub fn gl_filter(self) -> u32 {
        match self {
            FilterMode::Linear => glow::LINEAR,
            FilterMode::Nearest => glow::NEAREST,
        }
    }
}

/// Parameters for allocating one field texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureConfig {
    /// Texture width in texels.
    pub width: u32,
    /// Texture height in texels.
    pub height: u32,
    /// Storage format.
    pub format: TextureFormat,
    /// Min/mag filter.
    pub filter: FilterMode,
}

/// Allocates a GPU texture for the given configuration.
///
/// Wrap mode is `CLAMP_TO_EDGE` on both axes (the difference stencils and
/// the advection trace rely on edge clamping), the filter applies to both
/// min and mag, and storage is allocated without initial data.
///
/// # Errors
///
/// Returns an error string if the GL context fails to create the texture.
#[allow(unsafe_code)]
pub fn create_texture(gl: &glow::Context, config: &TextureConfig) -> Result<glow::Texture, String> {
    use glow::HasContext;

    // SAFETY: glow wraps raw GL calls as unsafe. All parameters derive
    // from the TextureConfig constants above.
    let texture = unsafe { gl.create_texture()? };

    unsafe {
        gl.bind_texture(glow::TEXTURE_2D, Some(texture));

        gl.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_WRAP_S,
            glow::CLAMP_TO_EDGE as i32,
        );
        gl.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_WRAP_T,
            glow::CLAMP_TO_EDGE as i32,
        );
        gl.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_MIN_FILTER,
            config.filter.gl_filter() as i32,
        );
        gl.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_MAG_FILTER,
            config.filter.gl_filter() as i32,
        );

        gl.tex_image_2d(
            glow::TEXTURE_2D,
            0,
            config.format.internal_format() as i32,
            config.width as i32,
            config.height as i32,
            0,
            config.format.layout(),
            config.format.pixel_type(),
            glow::PixelUnpackData::Slice(None),
        );

        gl.bind_texture(glow::TEXTURE_2D, None);
    }

    Ok(texture)
}
