//! Sunrise/sunset from the standard sunrise equation.
//!
//! Works in Julian days relative to J2000: mean solar anomaly, equation of
//! centre, ecliptic longitude and declination give solar transit, and the
//! hour angle for the sun's upper limb at −0.833° gives rise and set around
//! it. Accurate to a minute or two at non-polar latitudes, which is all a
//! watch face needs.

use core::f64::consts::PI;

use libm::{acos, asin, cos, round, sin};
use time::OffsetDateTime;

use crate::host::{Astronomy, AstronomyError, SunTimes};

const RAD: f64 = PI / 180.0;
const DAY_MS: f64 = 86_400_000.0;
const J1970: f64 = 2_440_588.0;
const J2000: f64 = 2_451_545.0;
const J0: f64 = 0.0009;

/// Obliquity of the ecliptic.
const OBLIQUITY: f64 = 23.4397 * RAD;
/// Perihelion of the Earth.
const PERIHELION: f64 = 102.9372 * RAD;
/// Apparent altitude of the sun's upper limb at sunrise/sunset.
const HORIZON: f64 = -0.833 * RAD;

/// Built-in [`Astronomy`] implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct SolarCalculator;

impl Astronomy for SolarCalculator {
    fn sun_times(
        &self,
        at: OffsetDateTime,
        latitude: f64,
        longitude: f64,
    ) -> Result<SunTimes, AstronomyError> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(AstronomyError::InvalidCoordinates);
        }

        let lw = -longitude * RAD;
        let phi = latitude * RAD;
        let d = to_days(at);

        let n = round(d - J0 - lw / (2.0 * PI));
        let ds = J0 + lw / (2.0 * PI) + n;

        let m = solar_mean_anomaly(ds);
        let l = ecliptic_longitude(m);
        let dec = asin(sin(OBLIQUITY) * sin(l));
        let j_noon = solar_transit(ds, m, l);

        let cos_w = (sin(HORIZON) - sin(phi) * sin(dec)) / (cos(phi) * cos(dec));
        if !(-1.0..=1.0).contains(&cos_w) {
            return Err(AstronomyError::NoTransit);
        }
        let w = acos(cos_w);

        let a = J0 + (w + lw) / (2.0 * PI) + n;
        let j_set = solar_transit(a, m, l);
        let j_rise = j_noon - (j_set - j_noon);

        Ok(SunTimes {
            sunrise: from_julian(j_rise)?,
            sunset: from_julian(j_set)?,
        })
    }
}

fn to_days(at: OffsetDateTime) -> f64 {
    let ms = (at.unix_timestamp_nanos() / 1_000_000) as f64;
    ms / DAY_MS - 0.5 + J1970 - J2000
}

fn from_julian(j: f64) -> Result<OffsetDateTime, AstronomyError> {
    let ms = (j + 0.5 - J1970) * DAY_MS;
    if !ms.is_finite() {
        return Err(AstronomyError::OutOfRange);
    }
    OffsetDateTime::from_unix_timestamp_nanos(ms as i128 * 1_000_000)
        .map_err(|_| AstronomyError::OutOfRange)
}

fn solar_mean_anomaly(d: f64) -> f64 {
    RAD * (357.5291 + 0.985_600_28 * d)
}

fn ecliptic_longitude(m: f64) -> f64 {
    let c = RAD * (1.9148 * sin(m) + 0.02 * sin(2.0 * m) + 0.0003 * sin(3.0 * m));
    m + c + PERIHELION + PI
}

fn solar_transit(ds: f64, m: f64, l: f64) -> f64 {
    J2000 + ds + 0.0053 * sin(m) - 0.0069 * sin(2.0 * l)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn minutes_of_day(t: OffsetDateTime) -> i32 {
        t.hour() as i32 * 60 + t.minute() as i32
    }

    #[test]
    fn portland_summer_solstice() {
        // Local noon in Portland, expressed in UTC.
        let at = datetime!(2024-06-20 19:00 UTC);
        let times = SolarCalculator.sun_times(at, 45.5152, -122.6784).unwrap();

        // Sunrise ~05:21 PDT (12:21 UTC), sunset ~21:03 PDT (04:03 UTC next day).
        let rise = minutes_of_day(times.sunrise);
        let set = minutes_of_day(times.sunset);
        assert!((rise - (12 * 60 + 21)).abs() <= 5, "sunrise at {rise}");
        assert!((set - (4 * 60 + 3)).abs() <= 5, "sunset at {set}");
        assert!(times.sunrise < times.sunset);
    }

    #[test]
    fn equator_day_is_about_twelve_hours() {
        let at = datetime!(2025-03-20 12:00 UTC);
        let times = SolarCalculator.sun_times(at, 0.0, 0.0).unwrap();
        let length = (times.sunset - times.sunrise).whole_minutes();
        assert!((720..=735).contains(&length), "day length {length}");
    }

    #[test]
    fn polar_night_has_no_sunrise() {
        let at = datetime!(2025-12-21 12:00 UTC);
        assert_eq!(
            SolarCalculator.sun_times(at, 80.0, 15.0),
            Err(AstronomyError::NoTransit)
        );
    }

    #[test]
    fn rejects_bad_coordinates() {
        let at = datetime!(2025-01-01 0:00 UTC);
        assert_eq!(
            SolarCalculator.sun_times(at, 95.0, 0.0),
            Err(AstronomyError::InvalidCoordinates)
        );
    }
}
