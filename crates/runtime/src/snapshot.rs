//! PNG snapshots of the density field.
//!
//! Feature-gated behind `png` (default on) so WASM builds can use the
//! runtime without pulling in the `image` crate. The pixel conversion
//! itself lives in [`crate::presenter`], which is always available.

use std::path::Path;

use fluid_engine_core::{Field, FluidError};

use crate::presenter::density_to_rgba;

/// Writes the density field as a PNG image.
///
/// Returns `FluidError::InvalidDimensions` if the field dimensions
/// overflow `u32`, or `FluidError::Io` on encoding/write failure.
pub fn write_png(density: &Field, path: &Path) -> Result<(), FluidError> {
    let rgba = density_to_rgba(density);
    let width = u32::try_from(density.width()).map_err(|_| FluidError::InvalidDimensions)?;
    let height = u32::try_from(density.height()).map_err(|_| FluidError::InvalidDimensions)?;
    let img = image::RgbaImage::from_raw(width, height, rgba)
        .ok_or_else(|| FluidError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| FluidError::Io(e.to_string()))
}
