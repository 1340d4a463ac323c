//! Error types for the fluid-engine core.

use thiserror::Error;

/// Errors produced by field and solver operations.
#[derive(Debug, Error)]
pub enum FluidError {
    /// Width or height was too small when creating a field. Simulation
    /// grids must be at least 2x2 so every texel has axis neighbors.
    #[error("invalid dimensions: width and height must be at least 2")]
    InvalidDimensions,

    /// A field was requested with zero channels or more than four.
    #[error("invalid channel count: {0} (expected 1..=4)")]
    InvalidChannels(usize),

    /// Two fields had incompatible dimensions for a kernel pass.
    #[error("dimension mismatch: ({lhs_w}, {lhs_h}) vs ({rhs_w}, {rhs_h})")]
    DimensionMismatch {
        lhs_w: usize,
        lhs_h: usize,
        rhs_w: usize,
        rhs_h: usize,
    },

    /// Two fields had incompatible channel counts for a kernel pass.
    #[error("channel mismatch: {lhs} vs {rhs}")]
    ChannelMismatch { lhs: usize, rhs: usize },

    /// A configuration value was outside its documented range.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// An I/O error (snapshot write).
    #[error("i/o error: {0}")]
    Io(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_dimensions_displays_readable_message() {
        let err = FluidError::InvalidDimensions;
        let msg = format!("{err}");
        assert!(
            msg.contains("width") && msg.contains("height"),
            "expected message mentioning width and height, got: {msg}"
        );
    }

    #[test]
    fn invalid_channels_includes_count() {
        let err = FluidError::InvalidChannels(7);
        let msg = format!("{err}");
        assert!(msg.contains('7'), "missing channel count in: {msg}");
    }

    #[test]
    fn dimension_mismatch_includes_all_dimensions() {
        let err = FluidError::DimensionMismatch {
            lhs_w: 10,
            lhs_h: 20,
            rhs_w: 30,
            rhs_h: 40,
        };
        let msg = format!("{err}");
        assert!(msg.contains("10"), "missing lhs_w in: {msg}");
        assert!(msg.contains("20"), "missing lhs_h in: {msg}");
        assert!(msg.contains("30"), "missing rhs_w in: {msg}");
        assert!(msg.contains("40"), "missing rhs_h in: {msg}");
    }

    #[test]
    fn channel_mismatch_includes_both_counts() {
        let err = FluidError::ChannelMismatch { lhs: 2, rhs: 3 };
        let msg = format!("{err}");
        assert!(msg.contains('2') && msg.contains('3'), "got: {msg}");
    }

    #[test]
    fn invalid_config_includes_message() {
        let err = FluidError::InvalidConfig("pressure_iterations must be >= 1".into());
        let msg = format!("{err}");
        assert!(msg.contains("pressure_iterations"), "got: {msg}");
    }

    #[test]
    fn io_error_includes_message() {
        let err = FluidError::Io("disk full".into());
        let msg = format!("{err}");
        assert!(msg.contains("disk full"), "got: {msg}");
    }

    #[test]
    fn fluid_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FluidError>();
    }

    #[test]
    fn fluid_error_implements_std_error() {
        fn assert_std_error<T: std::error::Error>() {}
        assert_std_error::<FluidError>();
    }
}
