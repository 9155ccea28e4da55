//! Face configuration
//!
//! Settings are read once at startup (from JSON when the host has a file,
//! otherwise [`Settings::default`]) and never written afterwards.

use alloc::string::{String, ToString};
use core::fmt;

use embassy_time::Duration;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::RgbColor;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror_no_std::Error;

use crate::units::UnitSystem;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("malformed settings: {0}")]
    Json(serde_json::Error),
    #[error("{0} must be greater than zero")]
    ZeroPeriod(&'static str),
    #[error("latitude/longitude out of range")]
    InvalidLocation,
}

impl From<serde_json::Error> for ConfigError {
    fn from(error: serde_json::Error) -> Self {
        ConfigError::Json(error)
    }
}

/// An RGB565 color written as `#rrggbb` in settings files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HexColor(pub Rgb565);

impl HexColor {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self(Rgb565::new(r >> 3, g >> 2, b >> 3))
    }

    /// Parse `#rrggbb` or `#rgb`.
    pub fn parse(text: &str) -> Option<Self> {
        let hex = text.strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            6 => Some(Self::rgb(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            3 => {
                let r = channel(&hex[0..1])?;
                let g = channel(&hex[1..2])?;
                let b = channel(&hex[2..3])?;
                Some(Self::rgb(r * 17, g * 17, b * 17))
            }
            _ => None,
        }
    }
}

impl From<HexColor> for Rgb565 {
    fn from(color: HexColor) -> Self {
        color.0
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Expand 5/6-bit channels back to 8 bits.
        let c = self.0;
        let r = (c.r() << 3) | (c.r() >> 2);
        let g = (c.g() << 2) | (c.g() >> 4);
        let b = (c.b() << 3) | (c.b() >> 2);
        write!(f, "#{:02x}{:02x}{:02x}", r, g, b)
    }
}

impl Serialize for HexColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HexColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct HexVisitor;

        impl Visitor<'_> for HexVisitor {
            type Value = HexColor;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a color like \"#ff0000\"")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<HexColor, E> {
                HexColor::parse(v).ok_or_else(|| E::invalid_value(de::Unexpected::Str(v), &self))
            }
        }

        deserializer.deserialize_str(HexVisitor)
    }
}

/// Colors used by the face.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct FaceColors {
    /// Daily high readout
    pub high: HexColor,
    /// Daily low readout
    pub low: HexColor,
    /// Everything else drawn in the foreground
    pub text: HexColor,
    pub background: HexColor,
}

impl Default for FaceColors {
    fn default() -> Self {
        Self {
            high: HexColor::rgb(0xff, 0x00, 0x00),
            low: HexColor::rgb(0x00, 0xff, 0xff),
            text: HexColor::rgb(0xff, 0xff, 0xff),
            background: HexColor::rgb(0x00, 0x00, 0x00),
        }
    }
}

/// Runtime configuration for the face.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub units: UnitSystem,
    pub latitude: f64,
    pub longitude: f64,
    pub colors: FaceColors,
    /// Horizontal padding applied to every row
    pub side_padding_px: u32,
    pub tick_period_ms: u64,
    pub refresh_period_ms: u64,
    /// Delay before the first weather/sun refresh after startup
    pub initial_refresh_delay_ms: u64,
    pub button_debounce_ms: u64,
    /// Storage key of the face's own cache snapshot
    pub cache_key: String,
    /// Storage key of the payload file written by the weather companion app
    pub weather_key: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            units: UnitSystem::Imperial,
            latitude: 45.5152,
            longitude: -122.6784,
            colors: FaceColors::default(),
            side_padding_px: 6,
            tick_period_ms: 1_000,
            refresh_period_ms: 5 * 60 * 1_000,
            initial_refresh_delay_ms: 1_500,
            button_debounce_ms: 50,
            cache_key: "wf_cache.json".to_string(),
            weather_key: "weather.json".to_string(),
        }
    }
}

impl Settings {
    /// Parse and validate settings. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_period_ms == 0 {
            return Err(ConfigError::ZeroPeriod("tick_period_ms"));
        }
        if self.refresh_period_ms == 0 {
            return Err(ConfigError::ZeroPeriod("refresh_period_ms"));
        }
        if !(-90.0..=90.0).contains(&self.latitude) || !(-180.0..=180.0).contains(&self.longitude)
        {
            return Err(ConfigError::InvalidLocation);
        }
        Ok(())
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }

    pub fn refresh_period(&self) -> Duration {
        Duration::from_millis(self.refresh_period_ms)
    }

    pub fn initial_refresh_delay(&self) -> Duration {
        Duration::from_millis(self.initial_refresh_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_portland_imperial_face() {
        let s = Settings::default();
        assert_eq!(s.units, UnitSystem::Imperial);
        assert_eq!(s.refresh_period(), Duration::from_secs(300));
        assert_eq!(s.colors.high.0, Rgb565::RED);
        assert_eq!(s.colors.low.0, Rgb565::CYAN);
        assert_eq!(s.colors.background.0, Rgb565::BLACK);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let s = Settings::from_json(r##"{"units":"metric","colors":{"high":"#f80"}}"##).unwrap();
        assert_eq!(s.units, UnitSystem::Metric);
        assert_eq!(s.colors.high, HexColor::rgb(0xff, 0x88, 0x00));
        assert_eq!(s.colors.low, FaceColors::default().low);
        assert_eq!(s.tick_period_ms, 1_000);
        assert_eq!(s.cache_key, "wf_cache.json");
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            Settings::from_json(r##"{"colors":{"text":"white"}}"##),
            Err(ConfigError::Json(_))
        ));
        assert!(matches!(
            Settings::from_json(r#"{"tick_period_ms":0}"#),
            Err(ConfigError::ZeroPeriod("tick_period_ms"))
        ));
        assert!(matches!(
            Settings::from_json(r#"{"latitude":123.0}"#),
            Err(ConfigError::InvalidLocation)
        ));
    }

    #[test]
    fn multibyte_color_is_an_error_not_a_panic() {
        assert_eq!(HexColor::parse("#a€bc"), None);
        assert_eq!(HexColor::parse("#€"), None);
        assert!(matches!(
            Settings::from_json(r##"{"colors":{"text":"#a€bc"}}"##),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn hex_color_round_trips_through_text() {
        let color = HexColor::parse("#00ffff").unwrap();
        assert_eq!(color.to_string(), "#00ffff");
    }
}
