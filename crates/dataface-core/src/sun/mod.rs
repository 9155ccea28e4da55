//! Local sunrise and sunset labels

mod solar;

pub use solar::SolarCalculator;

use heapless::String;
use log::debug;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::format::{TIME_PLACEHOLDER, time_hm};
use crate::host::{Astronomy, AstronomyError};

/// Sunrise/sunset as `HH:MM` in local time.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SunState {
    #[serde(rename = "sr")]
    pub sunrise: String<5>,
    #[serde(rename = "ss")]
    pub sunset: String<5>,
}

impl Default for SunState {
    fn default() -> Self {
        let mut placeholder = String::new();
        placeholder.push_str(TIME_PLACEHOLDER).ok();
        Self {
            sunrise: placeholder.clone(),
            sunset: placeholder,
        }
    }
}

impl SunState {
    /// Recompute from `now` and the configured location.
    ///
    /// Times are shown in the UTC offset carried by `now`. On failure the
    /// previous labels are kept and the error is returned for logging.
    pub fn refresh<A: Astronomy + ?Sized>(
        &mut self,
        astronomy: &A,
        now: OffsetDateTime,
        latitude: f64,
        longitude: f64,
    ) -> Result<(), AstronomyError> {
        let times = astronomy
            .sun_times(now, latitude, longitude)
            .inspect_err(|e| debug!("Keeping previous sun times: {}", e))?;

        let offset = now.offset();
        self.sunrise = time_hm(times.sunrise.to_offset(offset).time());
        self.sunset = time_hm(times.sunset.to_offset(offset).time());
        debug!("Sun times: rise {} set {}", self.sunrise, self.sunset);
        Ok(())
    }
}
