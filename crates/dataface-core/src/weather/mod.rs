//! Weather state and ingestion

pub mod payload;

use alloc::string::String;

use log::debug;
use serde::{Deserialize, Serialize};

pub use payload::{
    PayloadError, RawWeatherRecord, WeatherPayload, parse_bridge_message, parse_stored_payload,
};

/// Canonical weather record produced by normalizing any payload shape.
///
/// Temperatures are already whole degrees in the configured units.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WeatherReading {
    pub temp: Option<i32>,
    pub high: Option<i32>,
    pub low: Option<i32>,
    pub condition: Option<String>,
}

/// Which fields of a reading were written into the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AppliedFields {
    pub temp: bool,
    pub high: bool,
    pub low: bool,
    pub condition: bool,
}

impl AppliedFields {
    pub fn any(&self) -> bool {
        self.temp || self.high || self.low || self.condition
    }
}

/// Result of feeding a reading into [`WeatherState::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// At least one field changed and the update time was stamped.
    Updated(AppliedFields),
    /// The reading carried nothing usable; the state is untouched.
    Empty,
}

/// Last known weather shown on the face.
///
/// Field names on the wire match the cache file written by earlier
/// versions of the face.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct WeatherState {
    #[serde(rename = "tHi")]
    pub t_hi: Option<i32>,
    pub t: Option<i32>,
    #[serde(rename = "tLo")]
    pub t_lo: Option<i32>,
    pub cond: String,
    /// Unix time of the last successful update, in milliseconds.
    pub updated: u64,
}

impl WeatherState {
    /// Merge a reading into the state.
    ///
    /// Present fields overwrite, missing fields keep their previous value.
    pub fn apply(&mut self, reading: WeatherReading, now_ms: u64) -> IngestOutcome {
        let mut applied = AppliedFields::default();

        if let Some(t) = reading.temp {
            self.t = Some(t);
            applied.temp = true;
        }
        if let Some(hi) = reading.high {
            self.t_hi = Some(hi);
            applied.high = true;
        }
        if let Some(lo) = reading.low {
            self.t_lo = Some(lo);
            applied.low = true;
        }
        if let Some(cond) = reading.condition {
            self.cond = cond;
            applied.condition = true;
        }

        if !applied.any() {
            return IngestOutcome::Empty;
        }

        self.updated = now_ms;
        debug!("Weather updated: {:?} -> {:?}", applied, self);
        IngestOutcome::Updated(applied)
    }
}
