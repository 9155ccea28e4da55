//! Incoming weather payload shapes
//!
//! Two producers feed weather into the face:
//!
//! - the phone bridge pushes `{"t":"weather", ...}` messages whose record is
//!   either inline or nested under `weather`, with temperatures in Kelvin;
//! - a companion app persists its last payload to `weather.json`, either
//!   wrapped as `{"t":"weather","weather":{...}}` or as a bare record, with
//!   temperatures that may be Kelvin or Celsius.
//!
//! Both producers use `hi`/`tmax`, `lo`/`tmin` and `txt`/`desc` for the same
//! fields. Parsing folds all of that into a [`WeatherPayload`], and
//! [`WeatherPayload::normalize`] turns it into one canonical
//! [`WeatherReading`].

use alloc::string::{String, ToString};

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror_no_std::Error;

use super::WeatherReading;
use crate::units::UnitSystem;

/// Message type tag used by the phone bridge for weather records.
pub const WEATHER_TAG: &str = "weather";

#[derive(Error, Debug)]
pub enum PayloadError {
    #[error("malformed JSON: {0}")]
    Json(serde_json::Error),
    #[error("payload is not a JSON object")]
    NotAnObject,
}

impl From<serde_json::Error> for PayloadError {
    fn from(error: serde_json::Error) -> Self {
        PayloadError::Json(error)
    }
}

/// A weather record with every field optional and every known alias kept.
///
/// Numbers are accepted as JSON numbers or numeric strings. Anything else
/// (objects, booleans, garbage strings) reads as absent rather than failing
/// the whole record.
#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct RawWeatherRecord {
    #[serde(deserialize_with = "lenient_number")]
    pub temp: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub hi: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub tmax: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub lo: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub tmin: Option<f64>,
    #[serde(deserialize_with = "lenient_text")]
    pub txt: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub desc: Option<String>,
}

impl RawWeatherRecord {
    fn high(&self) -> Option<f64> {
        self.hi.or(self.tmax)
    }

    fn low(&self) -> Option<f64> {
        self.lo.or(self.tmin)
    }

    /// `txt`, or `desc` when `txt` is absent or blank.
    fn condition(&self) -> Option<&str> {
        non_blank(self.txt.as_deref()).or_else(|| non_blank(self.desc.as_deref()))
    }
}

fn non_blank(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|s| !s.is_empty())
}

/// Weather payload tagged by where it came from.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherPayload {
    /// Pushed by the phone bridge. Temperatures are Kelvin.
    Bridge(RawWeatherRecord),
    /// Read back from the payload file. Temperature units are guessed.
    Stored(RawWeatherRecord),
}

impl WeatherPayload {
    /// Fold aliases and convert temperatures into `units`.
    pub fn normalize(&self, units: UnitSystem) -> WeatherReading {
        let (record, convert): (&RawWeatherRecord, fn(UnitSystem, f64) -> Option<i32>) =
            match self {
                WeatherPayload::Bridge(r) => (r, UnitSystem::from_kelvin),
                WeatherPayload::Stored(r) => (r, UnitSystem::from_ambiguous),
            };

        WeatherReading {
            temp: record.temp.and_then(|v| convert(units, v)),
            high: record.high().and_then(|v| convert(units, v)),
            low: record.low().and_then(|v| convert(units, v)),
            condition: record.condition().map(ToString::to_string),
        }
    }
}

/// Parse a phone-bridge message.
///
/// Returns `Ok(None)` for messages that are not weather records.
pub fn parse_bridge_message(json: &str) -> Result<Option<WeatherPayload>, PayloadError> {
    let Value::Object(mut message) = serde_json::from_str::<Value>(json)? else {
        return Err(PayloadError::NotAnObject);
    };

    if message.get("t").and_then(Value::as_str) != Some(WEATHER_TAG) {
        return Ok(None);
    }

    let record = match message.remove("weather") {
        Some(nested @ Value::Object(_)) => nested,
        _ => Value::Object(message),
    };
    Ok(Some(WeatherPayload::Bridge(serde_json::from_value(record)?)))
}

/// Parse the stored payload file, wrapped or bare.
pub fn parse_stored_payload(json: &str) -> Result<WeatherPayload, PayloadError> {
    let Value::Object(mut document) = serde_json::from_str::<Value>(json)? else {
        return Err(PayloadError::NotAnObject);
    };

    let record = match document.remove("weather") {
        Some(nested @ Value::Object(_)) => nested,
        _ => Value::Object(document),
    };
    Ok(WeatherPayload::Stored(serde_json::from_value(record)?))
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite()))
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => Some(s),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bridge_inline_record() {
        let payload =
            parse_bridge_message(r#"{"t":"weather","temp":295.37,"hi":300.15,"lo":288.71,"txt":"Sunny","hum":40}"#)
                .unwrap()
                .unwrap();
        let reading = payload.normalize(UnitSystem::Imperial);
        assert_eq!(reading.temp, Some(72));
        assert_eq!(reading.high, Some(81));
        assert_eq!(reading.low, Some(60));
        assert_eq!(reading.condition.as_deref(), Some("Sunny"));
    }

    #[test]
    fn bridge_nested_record() {
        let payload = parse_bridge_message(
            r#"{"t":"weather","weather":{"temp":273.15,"tmax":283.15,"tmin":263.15,"desc":"Light snow"}}"#,
        )
        .unwrap()
        .unwrap();
        let reading = payload.normalize(UnitSystem::Metric);
        assert_eq!(reading.temp, Some(0));
        assert_eq!(reading.high, Some(10));
        assert_eq!(reading.low, Some(-10));
        assert_eq!(reading.condition.as_deref(), Some("Light snow"));
    }

    #[test]
    fn bridge_ignores_other_messages() {
        assert_eq!(parse_bridge_message(r#"{"t":"notify","id":3}"#).unwrap(), None);
        assert_eq!(parse_bridge_message(r#"{"temp":290}"#).unwrap(), None);
    }

    #[test]
    fn bridge_rejects_non_objects() {
        assert!(matches!(
            parse_bridge_message("[1,2]"),
            Err(PayloadError::NotAnObject)
        ));
        assert!(matches!(
            parse_bridge_message("{not json"),
            Err(PayloadError::Json(_))
        ));
    }

    #[test]
    fn stored_wrapper_and_bare() {
        let wrapped =
            parse_stored_payload(r#"{"t":"weather","weather":{"temp":291.15,"hi":21,"lo":"12.2"}}"#)
                .unwrap();
        let reading = wrapped.normalize(UnitSystem::Metric);
        assert_eq!(reading.temp, Some(18));
        assert_eq!(reading.high, Some(21));
        assert_eq!(reading.low, Some(12));
        assert_eq!(reading.condition, None);

        let bare = parse_stored_payload(r#"{"temp":20,"txt":"  "}"#).unwrap();
        let reading = bare.normalize(UnitSystem::Imperial);
        assert_eq!(reading.temp, Some(68));
        assert_eq!(reading.condition, None);
    }

    #[test]
    fn primary_alias_wins() {
        let payload = parse_stored_payload(r#"{"hi":300,"tmax":280,"txt":"Rain","desc":"Fog"}"#).unwrap();
        let reading = payload.normalize(UnitSystem::Metric);
        assert_eq!(reading.high, Some(27));
        assert_eq!(reading.condition.as_deref(), Some("Rain"));
    }

    #[test]
    fn blank_primary_alias_falls_back() {
        let payload = parse_stored_payload(r#"{"temp":290,"txt":"","desc":"Rain"}"#).unwrap();
        let reading = payload.normalize(UnitSystem::Metric);
        assert_eq!(reading.condition.as_deref(), Some("Rain"));

        let payload = parse_stored_payload(r#"{"txt":"   ","desc":" Fog "}"#).unwrap();
        let reading = payload.normalize(UnitSystem::Metric);
        assert_eq!(reading.condition.as_deref(), Some("Fog"));
    }

    #[test]
    fn junk_fields_read_as_missing() {
        let payload =
            parse_stored_payload(r#"{"temp":"warm","hi":null,"lo":{"v":1},"txt":5}"#).unwrap();
        let reading = payload.normalize(UnitSystem::Imperial);
        assert_eq!(reading, WeatherReading::default());
    }
}
