//! Temperature unit conversion
//!
//! Weather sources report temperatures in Kelvin (the phone bridge) or in a
//! mix of Kelvin and already-converted degrees (the stored payload file).
//! Everything displayed on the face is a whole number of degrees in the
//! configured [`UnitSystem`].

use alloc::string::String;
use core::fmt::Write;

use serde::{Deserialize, Serialize};

/// Offset between Kelvin and Celsius.
pub const KELVIN_OFFSET: f64 = 273.15;

/// Readings strictly above this magnitude are assumed to be Kelvin.
///
/// This is a heuristic: a real Fahrenheit reading above 200 °F cannot occur
/// on Earth, but a Kelvin value below 200 K (−73 °C) would be misread as
/// Celsius. Sources that are known to be Kelvin should go through
/// [`UnitSystem::from_kelvin`] instead.
pub const KELVIN_THRESHOLD: f64 = 200.0;

/// Placeholder shown in place of an unknown temperature.
pub const PLACEHOLDER: &str = "--";

/// Degree sign appended to every temperature label.
pub const DEGREE: char = '°';

/// Display unit system.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    /// Degrees Fahrenheit
    #[default]
    Imperial,
    /// Degrees Celsius
    Metric,
}

impl UnitSystem {
    /// Convert a Kelvin reading to whole degrees in this unit system.
    ///
    /// Returns `None` for NaN or infinite input.
    pub fn from_kelvin(self, kelvin: f64) -> Option<i32> {
        if !kelvin.is_finite() {
            return None;
        }
        Some(match self {
            UnitSystem::Imperial => kelvin_to_fahrenheit(kelvin),
            UnitSystem::Metric => kelvin_to_celsius(kelvin),
        })
    }

    /// Convert a reading whose unit is not known up front.
    ///
    /// Values above [`KELVIN_THRESHOLD`] are treated as Kelvin, anything at
    /// or below it as Celsius. The Celsius branch is still converted to
    /// Fahrenheit for the imperial system.
    pub fn from_ambiguous(self, value: f64) -> Option<i32> {
        if !value.is_finite() {
            return None;
        }
        if value > KELVIN_THRESHOLD {
            return self.from_kelvin(value);
        }
        Some(match self {
            UnitSystem::Imperial => round_half_up(value * 9.0 / 5.0 + 32.0),
            UnitSystem::Metric => round_half_up(value),
        })
    }
}

/// Kelvin to whole degrees Fahrenheit.
pub fn kelvin_to_fahrenheit(kelvin: f64) -> i32 {
    round_half_up((kelvin - KELVIN_OFFSET) * 9.0 / 5.0 + 32.0)
}

/// Kelvin to whole degrees Celsius.
pub fn kelvin_to_celsius(kelvin: f64) -> i32 {
    round_half_up(kelvin - KELVIN_OFFSET)
}

/// Round to the nearest integer with halves going towards positive infinity.
fn round_half_up(value: f64) -> i32 {
    libm::floor(value + 0.5) as i32
}

/// Render a temperature as `"72°"`, or `"--°"` when unknown.
pub fn temperature_label(value: Option<i32>) -> String {
    let mut label = String::new();
    match value {
        Some(v) => {
            let _ = write!(label, "{}{}", v, DEGREE);
        }
        None => {
            label.push_str(PLACEHOLDER);
            label.push(DEGREE);
        }
    }
    label
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kelvin_conversion_matches_formula() {
        for k in [200.5_f64, 255.37, 273.15, 288.71, 295.0, 310.928, 330.0] {
            let f = libm::floor((k - 273.15) * 9.0 / 5.0 + 32.0 + 0.5) as i32;
            let c = libm::floor(k - 273.15 + 0.5) as i32;
            assert_eq!(UnitSystem::Imperial.from_kelvin(k), Some(f));
            assert_eq!(UnitSystem::Metric.from_kelvin(k), Some(c));
        }
    }

    #[test]
    fn known_kelvin_values() {
        assert_eq!(kelvin_to_fahrenheit(273.15), 32);
        assert_eq!(kelvin_to_celsius(273.15), 0);
        assert_eq!(kelvin_to_fahrenheit(295.37), 72);
        assert_eq!(kelvin_to_celsius(300.15), 27);
    }

    #[test]
    fn non_finite_is_unknown() {
        assert_eq!(UnitSystem::Imperial.from_kelvin(f64::NAN), None);
        assert_eq!(UnitSystem::Metric.from_kelvin(f64::INFINITY), None);
        assert_eq!(UnitSystem::Imperial.from_ambiguous(f64::NEG_INFINITY), None);
    }

    #[test]
    fn ambiguous_threshold() {
        // Kelvin above the threshold
        assert_eq!(UnitSystem::Metric.from_ambiguous(293.15), Some(20));
        // Celsius at or below it
        assert_eq!(UnitSystem::Metric.from_ambiguous(20.4), Some(20));
        assert_eq!(UnitSystem::Imperial.from_ambiguous(20.0), Some(68));
        assert_eq!(UnitSystem::Metric.from_ambiguous(200.0), Some(200));
    }

    #[test]
    fn negative_halves_round_up() {
        assert_eq!(UnitSystem::Metric.from_ambiguous(-2.5), Some(-2));
        assert_eq!(UnitSystem::Metric.from_ambiguous(2.5), Some(3));
    }

    #[test]
    fn labels() {
        assert_eq!(temperature_label(Some(72)), "72°");
        assert_eq!(temperature_label(Some(-4)), "-4°");
        assert_eq!(temperature_label(None), "--°");
    }

    #[test]
    fn unit_system_serde_names() {
        let units: UnitSystem = serde_json::from_str("\"metric\"").unwrap();
        assert_eq!(units, UnitSystem::Metric);
        assert_eq!(serde_json::to_string(&UnitSystem::Imperial).unwrap(), "\"imperial\"");
    }
}
