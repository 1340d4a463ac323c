//! Simulation configuration: immutable-per-run numeric parameters.
//!
//! `FluidConfig` bundles the solver constants (dissipation rates, pressure
//! iteration count, vorticity strength, splat shape) together with the
//! texture downsample factor and the pause flag. Values are fixed for the
//! lifetime of a simulation instance; only pausing is toggled at runtime,
//! and that lives with the frame loop rather than here.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::FluidError;
use crate::field::MIN_FIELD_DIM;

/// Default right-shift applied to surface pixel dimensions.
const DEFAULT_DOWNSAMPLE: u32 = 1;
/// Default per-tick retention factor for the density field.
const DEFAULT_DENSITY_DISSIPATION: f32 = 0.98;
/// Default per-tick retention factor for the velocity field.
const DEFAULT_VELOCITY_DISSIPATION: f32 = 0.99;
/// Default retention factor applied to pressure before each solve.
const DEFAULT_PRESSURE_DISSIPATION: f32 = 0.8;
/// Default Jacobi iteration count per tick.
const DEFAULT_PRESSURE_ITERATIONS: u32 = 25;
/// Default vorticity confinement strength.
const DEFAULT_CURL_STRENGTH: f32 = 28.0;
/// Default splat Gaussian radius in normalized coordinates.
const DEFAULT_SPLAT_RADIUS: f32 = 0.004;
/// Default multiplier from pointer delta to velocity impulse.
const DEFAULT_SPLAT_FORCE: f32 = 6000.0;

/// Immutable solver parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FluidConfig {
    /// Right-shift applied to the surface's pixel dimensions to obtain the
    /// simulation grid size (each axis floored at [`MIN_FIELD_DIM`]).
    pub downsample: u32,
    /// Fraction of density surviving one advection tick, in [0, 1].
    pub density_dissipation: f32,
    /// Fraction of velocity surviving one advection tick, in [0, 1].
    pub velocity_dissipation: f32,
    /// Fraction of pressure carried into the next solve, in [0, 1].
    pub pressure_dissipation: f32,
    /// Number of Jacobi iterations per tick, at least 1.
    pub pressure_iterations: u32,
    /// Vorticity confinement strength, non-negative.
    pub curl_strength: f32,
    /// Splat Gaussian radius in normalized coordinates, positive.
    pub splat_radius: f32,
    /// Multiplier from pointer delta to velocity impulse, positive.
    pub splat_force: f32,
    /// Whether the simulation starts paused.
    pub paused: bool,
}

impl Default for FluidConfig {
    fn default() -> Self {
        Self {
            downsample: DEFAULT_DOWNSAMPLE,
            density_dissipation: DEFAULT_DENSITY_DISSIPATION,
            velocity_dissipation: DEFAULT_VELOCITY_DISSIPATION,
            pressure_dissipation: DEFAULT_PRESSURE_DISSIPATION,
            pressure_iterations: DEFAULT_PRESSURE_ITERATIONS,
            curl_strength: DEFAULT_CURL_STRENGTH,
            splat_radius: DEFAULT_SPLAT_RADIUS,
            splat_force: DEFAULT_SPLAT_FORCE,
            paused: false,
        }
    }
}

impl FluidConfig {
    /// Extracts a configuration from a JSON object, falling back to the
    /// default for any missing or mistyped key. The result is not yet
    /// validated; call [`FluidConfig::validate`] before use.
    pub fn from_json(params: &Value) -> Self {
        let d = Self::default();
        Self {
            downsample: param_u32(params, "downsample", d.downsample),
            density_dissipation: param_f32(params, "density_dissipation", d.density_dissipation),
            velocity_dissipation: param_f32(params, "velocity_dissipation", d.velocity_dissipation),
            pressure_dissipation: param_f32(params, "pressure_dissipation", d.pressure_dissipation),
            pressure_iterations: param_u32(params, "pressure_iterations", d.pressure_iterations),
            curl_strength: param_f32(params, "curl_strength", d.curl_strength),
            splat_radius: param_f32(params, "splat_radius", d.splat_radius),
            splat_force: param_f32(params, "splat_force", d.splat_force),
            paused: param_bool(params, "paused", d.paused),
        }
    }

    /// Checks every parameter against its documented range.
    pub fn validate(&self) -> Result<(), FluidError> {
        fn fail(msg: &str) -> Result<(), FluidError> {
            Err(FluidError::InvalidConfig(msg.to_string()))
        }
        if !(0.0..=1.0).contains(&self.density_dissipation) {
            return fail("density_dissipation must be in [0, 1]");
        }
        if !(0.0..=1.0).contains(&self.velocity_dissipation) {
            return fail("velocity_dissipation must be in [0, 1]");
        }
        if !(0.0..=1.0).contains(&self.pressure_dissipation) {
            return fail("pressure_dissipation must be in [0, 1]");
        }
        if self.pressure_iterations < 1 {
            return fail("pressure_iterations must be >= 1");
        }
        if !self.curl_strength.is_finite() || self.curl_strength < 0.0 {
            return fail("curl_strength must be finite and >= 0");
        }
        if !self.splat_radius.is_finite() || self.splat_radius <= 0.0 {
            return fail("splat_radius must be finite and > 0");
        }
        if !self.splat_force.is_finite() || self.splat_force <= 0.0 {
            return fail("splat_force must be finite and > 0");
        }
        Ok(())
    }

    /// Applies the downsample shift to a surface dimension, flooring at
    /// [`MIN_FIELD_DIM`]. A shift wider than the value's bit width yields
    /// the floor rather than a panic.
    pub fn grid_extent(&self, surface_px: u32) -> usize {
        let shifted = surface_px.checked_shr(self.downsample).unwrap_or(0);
        (shifted as usize).max(MIN_FIELD_DIM)
    }

    /// Current parameter values as a JSON object.
    pub fn params(&self) -> Value {
        json!({
            "downsample": self.downsample,
            "density_dissipation": self.density_dissipation,
            "velocity_dissipation": self.velocity_dissipation,
            "pressure_dissipation": self.pressure_dissipation,
            "pressure_iterations": self.pressure_iterations,
            "curl_strength": self.curl_strength,
            "splat_radius": self.splat_radius,
            "splat_force": self.splat_force,
            "paused": self.paused,
        })
    }

    /// Schema describing every parameter, its type, range, and default.
    pub fn param_schema() -> Value {
        json!({
            "downsample": {
                "type": "integer",
                "default": DEFAULT_DOWNSAMPLE,
                "min": 0,
                "description": "Right-shift from surface pixels to grid texels"
            },
            "density_dissipation": {
                "type": "number",
                "default": DEFAULT_DENSITY_DISSIPATION,
                "min": 0.0,
                "max": 1.0,
                "description": "Fraction of density surviving one tick"
            },
            "velocity_dissipation": {
                "type": "number",
                "default": DEFAULT_VELOCITY_DISSIPATION,
                "min": 0.0,
                "max": 1.0,
                "description": "Fraction of velocity surviving one tick"
            },
            "pressure_dissipation": {
                "type": "number",
                "default": DEFAULT_PRESSURE_DISSIPATION,
                "min": 0.0,
                "max": 1.0,
                "description": "Fraction of pressure carried into the next solve"
            },
            "pressure_iterations": {
                "type": "integer",
                "default": DEFAULT_PRESSURE_ITERATIONS,
                "min": 1,
                "description": "Jacobi iterations per tick"
            },
            "curl_strength": {
                "type": "number",
                "default": DEFAULT_CURL_STRENGTH,
                "min": 0.0,
                "description": "Vorticity confinement strength"
            },
            "splat_radius": {
                "type": "number",
                "default": DEFAULT_SPLAT_RADIUS,
                "min": 0.0,
                "description": "Splat Gaussian radius in normalized coordinates"
            },
            "splat_force": {
                "type": "number",
                "default": DEFAULT_SPLAT_FORCE,
                "min": 0.0,
                "description": "Multiplier from pointer delta to velocity impulse"
            },
            "paused": {
                "type": "boolean",
                "default": false,
                "description": "Start the simulation paused"
            }
        })
    }
}

/// Extracts an `f32` from `params[name]`, returning `default` if missing
/// or not a number.
fn param_f32(params: &Value, name: &str, default: f32) -> f32 {
    params
        .get(name)
        .and_then(Value::as_f64)
        .map(|v| v as f32)
        .unwrap_or(default)
}

/// Extracts a `u32` from `params[name]`, returning `default` if missing,
/// negative, fractional, or too large.
fn param_u32(params: &Value, name: &str, default: u32) -> u32 {
    params
        .get(name)
        .and_then(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or(default)
}

/// Extracts a `bool` from `params[name]`, returning `default` if missing
/// or not a boolean.
fn param_bool(params: &Value, name: &str, default: bool) -> bool {
    params.get(name).and_then(Value::as_bool).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_documented_constants() {
        let c = FluidConfig::default();
        assert_eq!(c.downsample, 1);
        assert!((c.density_dissipation - 0.98).abs() < f32::EPSILON);
        assert!((c.velocity_dissipation - 0.99).abs() < f32::EPSILON);
        assert!((c.pressure_dissipation - 0.8).abs() < f32::EPSILON);
        assert_eq!(c.pressure_iterations, 25);
        assert!((c.curl_strength - 28.0).abs() < f32::EPSILON);
        assert!((c.splat_radius - 0.004).abs() < f32::EPSILON);
        assert!((c.splat_force - 6000.0).abs() < f32::EPSILON);
        assert!(!c.paused);
    }

    #[test]
    fn default_config_validates() {
        assert!(FluidConfig::default().validate().is_ok());
    }

    #[test]
    fn from_json_uses_defaults_for_empty_object() {
        let c = FluidConfig::from_json(&json!({}));
        assert_eq!(c, FluidConfig::default());
    }

    #[test]
    fn from_json_extracts_custom_values() {
        let c = FluidConfig::from_json(&json!({
            "downsample": 2,
            "density_dissipation": 0.9,
            "pressure_iterations": 40,
            "paused": true,
        }));
        assert_eq!(c.downsample, 2);
        assert!((c.density_dissipation - 0.9).abs() < f32::EPSILON);
        assert_eq!(c.pressure_iterations, 40);
        assert!(c.paused);
        // Untouched keys keep their defaults.
        assert!((c.splat_force - 6000.0).abs() < f32::EPSILON);
    }

    #[test]
    fn from_json_falls_back_on_wrong_types() {
        let c = FluidConfig::from_json(&json!({
            "downsample": "two",
            "curl_strength": true,
            "paused": 1,
        }));
        assert_eq!(c, FluidConfig::default());
    }

    #[test]
    fn from_json_rejects_negative_integers_via_default() {
        let c = FluidConfig::from_json(&json!({"pressure_iterations": -5}));
        assert_eq!(c.pressure_iterations, 25);
    }

    #[test]
    fn validate_rejects_dissipation_above_one() {
        let c = FluidConfig {
            density_dissipation: 1.5,
            ..FluidConfig::default()
        };
        assert!(matches!(c.validate(), Err(FluidError::InvalidConfig(_))));
    }

    #[test]
    fn validate_rejects_zero_iterations() {
        let c = FluidConfig {
            pressure_iterations: 0,
            ..FluidConfig::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn validate_rejects_negative_curl() {
        let c = FluidConfig {
            curl_strength: -1.0,
            ..FluidConfig::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_splat_radius() {
        let c = FluidConfig {
            splat_radius: 0.0,
            ..FluidConfig::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn validate_rejects_nan() {
        let c = FluidConfig {
            splat_force: f32::NAN,
            ..FluidConfig::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn grid_extent_shifts_and_floors() {
        let c = FluidConfig {
            downsample: 1,
            ..FluidConfig::default()
        };
        assert_eq!(c.grid_extent(256), 128);
        assert_eq!(c.grid_extent(5), 2);
        assert_eq!(c.grid_extent(0), 2);
    }

    #[test]
    fn grid_extent_survives_oversized_shift() {
        let c = FluidConfig {
            downsample: 40,
            ..FluidConfig::default()
        };
        assert_eq!(c.grid_extent(4096), 2);
    }

    #[test]
    fn grid_extent_with_zero_downsample_is_identity_above_floor() {
        let c = FluidConfig {
            downsample: 0,
            ..FluidConfig::default()
        };
        assert_eq!(c.grid_extent(300), 300);
    }

    #[test]
    fn params_round_trips_through_from_json() {
        let c = FluidConfig {
            downsample: 3,
            pressure_iterations: 12,
            splat_radius: 0.01,
            ..FluidConfig::default()
        };
        let restored = FluidConfig::from_json(&c.params());
        assert_eq!(restored, c);
    }

    #[test]
    fn param_schema_covers_every_field() {
        let schema = FluidConfig::param_schema();
        for key in [
            "downsample",
            "density_dissipation",
            "velocity_dissipation",
            "pressure_dissipation",
            "pressure_iterations",
            "curl_strength",
            "splat_radius",
            "splat_force",
            "paused",
        ] {
            assert!(schema.get(key).is_some(), "schema missing {key}");
            assert!(schema[key].get("type").is_some(), "{key} missing type");
            assert!(
                schema[key].get("default").is_some(),
                "{key} missing default"
            );
            assert!(
                schema[key].get("description").is_some(),
                "{key} missing description"
            );
        }
    }

    #[test]
    fn serde_round_trip_preserves_config() {
        let c = FluidConfig {
            downsample: 2,
            paused: true,
            ..FluidConfig::default()
        };
        let text = serde_json::to_string(&c).unwrap();
        let back: FluidConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(back, c);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn grid_extent_never_below_minimum(
                px in 0_u32..100_000,
                shift in 0_u32..64,
            ) {
                let c = FluidConfig { downsample: shift, ..FluidConfig::default() };
                prop_assert!(c.grid_extent(px) >= MIN_FIELD_DIM);
            }

            #[test]
            fn from_json_total_for_arbitrary_numbers(
                diss in -10.0_f64..10.0,
                iters in -100_i64..100,
            ) {
                // Extraction itself must never panic regardless of values;
                // range enforcement is validate()'s job.
                let _ = FluidConfig::from_json(&json!({
                    "density_dissipation": diss,
                    "pressure_iterations": iters,
                }));
            }
        }
    }
}
