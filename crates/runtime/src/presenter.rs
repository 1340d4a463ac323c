//! CPU presenter: the density field as an RGBA8 pixel buffer.
//!
//! The GPU path presents with a straight-copy fragment pass; this is the
//! same contract for CPU hosts and snapshots — RGB taken from the density
//! channels clamped to [0, 1], alpha forced to opaque, no blending.

use fluid_engine_core::Field;

/// Converts a density field to RGBA8 bytes, row-major, alpha 255.
///
/// Channels beyond what the field carries read as zero, so 1- and
/// 2-channel fields render as red/red-green imagery rather than
/// panicking.
pub fn density_to_rgba(density: &Field) -> Vec<u8> {
    let (width, height) = (density.width(), density.height());
    let channels = density.channels();
    let mut out = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        for x in 0..width {
            for c in 0..3 {
                let value = if c < channels {
                    density.get(x as isize, y as isize, c)
                } else {
                    0.0
                };
                out.push((value.clamp(0.0, 1.0) * 255.0).round() as u8);
            }
            out.push(255);
        }
    }
    out
}
