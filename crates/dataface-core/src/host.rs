//! Services provided by the watch runtime
//!
//! The face never touches storage, sensors or astronomy code directly. The
//! runtime (or the desktop simulator, or a test) hands in implementations of
//! these traits. Every call returns a `Result` so that "no data yet"
//! (`Ok(None)`) stays distinguishable from "the call failed" (`Err`).

use alloc::string::String;

use thiserror_no_std::Error;
use time::OffsetDateTime;

/// Errors reported by the persistent key-value store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("storage unavailable")]
    Unavailable,
    #[error("storage full")]
    Full,
    #[error("storage I/O error: {0}")]
    Io(String),
}

/// Persistent key-value storage holding JSON documents.
pub trait KeyValueStore {
    /// Read a document. `Ok(None)` means the key does not exist.
    fn read(&self, name: &str) -> Result<Option<String>, StoreError>;

    /// Replace a document.
    fn write(&mut self, name: &str, contents: &str) -> Result<(), StoreError>;
}

/// Errors reported by the health/pedometer service.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthError {
    #[error("health service not available")]
    Unavailable,
    #[error("health query failed")]
    QueryFailed,
}

/// Steps tallied under a nested `today` record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DailyTally {
    pub steps: Option<u32>,
}

/// Daily health status as reported by the runtime.
///
/// Firmware revisions disagree on where the step count lives, so both the
/// flat and the nested shape are optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HealthStatus {
    pub steps: Option<u32>,
    pub today: Option<DailyTally>,
}

/// Health and pedometer queries.
pub trait HealthSource {
    /// Today's health status, if the runtime keeps one.
    fn health_status(&self) -> Result<Option<HealthStatus>, HealthError>;

    /// Step counter maintained by older firmwares or widgets.
    fn legacy_step_count(&self) -> Option<u32> {
        None
    }
}

/// Errors from sunrise/sunset computation.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AstronomyError {
    /// The sun does not cross the horizon on this date (polar day or night).
    #[error("sun does not rise or set on this date")]
    NoTransit,
    #[error("coordinates out of range")]
    InvalidCoordinates,
    #[error("computed time out of range")]
    OutOfRange,
}

/// Sunrise and sunset instants in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SunTimes {
    pub sunrise: OffsetDateTime,
    pub sunset: OffsetDateTime,
}

/// Astronomy helper computing sun times for a location.
pub trait Astronomy {
    fn sun_times(
        &self,
        at: OffsetDateTime,
        latitude: f64,
        longitude: f64,
    ) -> Result<SunTimes, AstronomyError>;
}
