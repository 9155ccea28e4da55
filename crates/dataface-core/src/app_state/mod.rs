//! Mutable face state owned by the controller

use crate::storage::CacheSnapshot;
use crate::sun::SunState;
use crate::weather::WeatherState;

/// Lifecycle of a [`ClockFace`](crate::ClockFace).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceRunState {
    /// Constructed, `start` not called yet
    Idle,
    Running,
    /// Torn down. Events and timers are ignored from here on.
    Stopped,
}

/// Everything the face displays besides the clock itself.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FaceState {
    pub weather: WeatherState,
    pub sun: SunState,
    pub steps: u32,
}

impl FaceState {
    /// Seed from a cached snapshot.
    pub fn from_cache(cache: CacheSnapshot) -> Self {
        Self {
            weather: cache.weather,
            sun: cache.sun,
            steps: 0,
        }
    }

    /// The part of the state that survives restarts.
    pub fn snapshot(&self) -> CacheSnapshot {
        CacheSnapshot {
            weather: self.weather.clone(),
            sun: self.sun.clone(),
        }
    }
}
