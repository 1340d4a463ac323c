//! Multi-channel 2D numeric field with clamp-to-edge addressing.
//!
//! A `Field` is the CPU analogue of a floating-point GPU texture: `width *
//! height` texels of 1 to 4 `f32` channels in row-major, channel-interleaved
//! layout. Neighbor access clamps to the edge (the equivalent of
//! `CLAMP_TO_EDGE`), and normalized-coordinate sampling offers texel-center
//! bilinear filtering (the equivalent of `LINEAR`) plus a nearest-neighbor
//! fallback for contexts without linear filtering.

use crate::error::FluidError;

/// Smallest legal field dimension. Every texel must have axis neighbors for
/// the difference stencils to be meaningful.
pub const MIN_FIELD_DIM: usize = 2;

/// How normalized-coordinate sampling interpolates between texels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sampling {
    /// Texel-center bilinear interpolation (hardware `LINEAR` equivalent).
    Bilinear,
    /// Nearest texel. Quality-reduced fallback for targets without linear
    /// filtering support.
    Nearest,
}

/// A 2D numeric texture of `width * height` texels with `channels` f32
/// components each, addressed with clamp-to-edge semantics.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    width: usize,
    height: usize,
    channels: usize,
    data: Vec<f32>,
}

impl Field {
    /// Creates a zero-filled field.
    ///
    /// Returns `FluidError::InvalidDimensions` if either dimension is below
    /// [`MIN_FIELD_DIM`] or `width * height * channels` overflows `usize`,
    /// and `FluidError::InvalidChannels` for a channel count outside 1..=4.
    pub fn new(width: usize, height: usize, channels: usize) -> Result<Self, FluidError> {
        if width < MIN_FIELD_DIM || height < MIN_FIELD_DIM {
            return Err(FluidError::InvalidDimensions);
        }
        if channels == 0 || channels > 4 {
            return Err(FluidError::InvalidChannels(channels));
        }
        let len = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(channels))
            .ok_or(FluidError::InvalidDimensions)?;
        Ok(Self {
            width,
            height,
            channels,
            data: vec![0.0; len],
        })
    }

    /// Field width in texels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Field height in texels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of channels per texel.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Size of one texel in normalized coordinates: `(1/width, 1/height)`.
    pub fn texel_size(&self) -> (f32, f32) {
        (1.0 / self.width as f32, 1.0 / self.height as f32)
    }

    /// Returns true if `other` has the same width and height.
    pub fn same_dims(&self, other: &Field) -> bool {
        self.width == other.width && self.height == other.height
    }

    /// Read-only access to the underlying row-major, channel-interleaved data.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Mutable access to the underlying data. Hot paths that manage their
    /// own indexing use this to bypass per-access bounds math.
    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Converts signed texel coordinates to a flat index, clamping each
    /// axis to the field edge.
    #[inline]
    fn index(&self, x: isize, y: isize, c: usize) -> usize {
        let xi = x.clamp(0, self.width as isize - 1) as usize;
        let yi = y.clamp(0, self.height as isize - 1) as usize;
        (yi * self.width + xi) * self.channels + c
    }

    /// Gets channel `c` at `(x, y)` with clamp-to-edge addressing.
    ///
    /// # Panics
    ///
    /// Panics if `c >= channels`.
    #[inline]
    pub fn get(&self, x: isize, y: isize, c: usize) -> f32 {
        assert!(c < self.channels);
        self.data[self.index(x, y, c)]
    }

    /// Sets channel `c` at in-bounds texel `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `x`, `y`, or `c` is out of bounds.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, c: usize, value: f32) {
        assert!(x < self.width && y < self.height && c < self.channels);
        let idx = (y * self.width + x) * self.channels + c;
        self.data[idx] = value;
    }

    /// Resets every texel of every channel to zero.
    pub fn clear(&mut self) {
        self.data.fill(0.0);
    }

    /// Samples channel `c` at normalized coordinates `(u, v)` in [0, 1].
    ///
    /// Bilinear mode interpolates between the four surrounding texel
    /// centers exactly as `LINEAR` texture filtering does; nearest mode
    /// picks the containing texel. Coordinates outside [0, 1] clamp to the
    /// edge texels.
    pub fn sample(&self, u: f32, v: f32, c: usize, mode: Sampling) -> f32 {
        match mode {
            Sampling::Bilinear => self.sample_bilinear(u, v, c),
            Sampling::Nearest => self.sample_nearest(u, v, c),
        }
    }

    /// Texel-center bilinear sample of channel `c` at `(u, v)`.
    pub fn sample_bilinear(&self, u: f32, v: f32, c: usize) -> f32 {
        // Shift so texel centers land on integer lattice points.
        let sx = u * self.width as f32 - 0.5;
        let sy = v * self.height as f32 - 0.5;
        let x0 = sx.floor();
        let y0 = sy.floor();
        let fx = sx - x0;
        let fy = sy - y0;
        let x0 = x0 as isize;
        let y0 = y0 as isize;

        let a = self.get(x0, y0, c);
        let b = self.get(x0 + 1, y0, c);
        let d = self.get(x0, y0 + 1, c);
        let e = self.get(x0 + 1, y0 + 1, c);

        let top = a + (b - a) * fx;
        let bottom = d + (e - d) * fx;
        top + (bottom - top) * fy
    }

    /// Nearest-texel sample of channel `c` at `(u, v)`.
    pub fn sample_nearest(&self, u: f32, v: f32, c: usize) -> f32 {
        let x = (u * self.width as f32).floor() as isize;
        let y = (v * self.height as f32).floor() as isize;
        self.get(x, y, c)
    }
}
