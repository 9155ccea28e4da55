//! Persistent cache and the stored weather payload
//!
//! Both documents live in the runtime's key-value store as JSON. The cache
//! is owned by the face; the payload file is written by a companion app and
//! only ever read here.

use alloc::string::String;

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror_no_std::Error;

use crate::host::{KeyValueStore, StoreError};
use crate::sun::SunState;
use crate::weather::{PayloadError, WeatherPayload, WeatherState, parse_stored_payload};

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("store: {0}")]
    Store(StoreError),
    #[error("cache encoding: {0}")]
    Json(serde_json::Error),
    #[error("weather payload: {0}")]
    Payload(PayloadError),
}

impl From<StoreError> for StorageError {
    fn from(error: StoreError) -> Self {
        StorageError::Store(error)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(error: serde_json::Error) -> Self {
        StorageError::Json(error)
    }
}

impl From<PayloadError> for StorageError {
    fn from(error: PayloadError) -> Self {
        StorageError::Payload(error)
    }
}

/// Last known weather and sun times, persisted across restarts.
///
/// Layout: `{"weather":{"tHi":..,"t":..,"tLo":..,"cond":..,"updated":..},"sun":{"sr":..,"ss":..}}`.
/// Missing sections fall back to their defaults.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct CacheSnapshot {
    pub weather: WeatherState,
    pub sun: SunState,
}

/// Read the cache. `Ok(None)` when it has never been written.
pub fn load_cache<S: KeyValueStore + ?Sized>(
    store: &S,
    key: &str,
) -> Result<Option<CacheSnapshot>, StorageError> {
    let Some(contents) = store.read(key)? else {
        debug!("No cache at {}", key);
        return Ok(None);
    };
    let snapshot = serde_json::from_str(&contents)?;
    debug!("Loaded cache from {}", key);
    Ok(Some(snapshot))
}

/// Replace the cache.
pub fn save_cache<S: KeyValueStore + ?Sized>(
    store: &mut S,
    key: &str,
    snapshot: &CacheSnapshot,
) -> Result<(), StorageError> {
    let contents: String = serde_json::to_string(snapshot)?;
    store.write(key, &contents)?;
    debug!("Saved cache to {} ({} bytes)", key, contents.len());
    Ok(())
}

/// Read the companion app's payload file. `Ok(None)` when absent or empty.
pub fn read_weather_payload<S: KeyValueStore + ?Sized>(
    store: &S,
    key: &str,
) -> Result<Option<WeatherPayload>, StorageError> {
    match store.read(key)? {
        Some(contents) if !contents.trim().is_empty() => {
            Ok(Some(parse_stored_payload(&contents)?))
        }
        _ => Ok(None),
    }
}

/// [`load_cache`] that logs failures and falls back to an empty snapshot.
pub fn load_cache_or_default<S: KeyValueStore + ?Sized>(store: &S, key: &str) -> CacheSnapshot {
    match load_cache(store, key) {
        Ok(snapshot) => snapshot.unwrap_or_default(),
        Err(e) => {
            warn!("Ignoring unreadable cache {}: {}", key, e);
            CacheSnapshot::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::collections::BTreeMap;
    use alloc::string::ToString;

    #[derive(Default)]
    struct MemoryStore {
        files: BTreeMap<String, String>,
        fail_writes: bool,
    }

    impl KeyValueStore for MemoryStore {
        fn read(&self, name: &str) -> Result<Option<String>, StoreError> {
            Ok(self.files.get(name).cloned())
        }

        fn write(&mut self, name: &str, contents: &str) -> Result<(), StoreError> {
            if self.fail_writes {
                return Err(StoreError::Full);
            }
            self.files.insert(name.to_string(), contents.to_string());
            Ok(())
        }
    }

    #[test]
    fn missing_cache_is_none() {
        let store = MemoryStore::default();
        assert!(load_cache(&store, "wf_cache.json").unwrap().is_none());
        assert_eq!(
            load_cache_or_default(&store, "wf_cache.json"),
            CacheSnapshot::default()
        );
    }

    #[test]
    fn save_then_load() {
        let mut store = MemoryStore::default();
        let mut snapshot = CacheSnapshot::default();
        snapshot.weather.t = Some(61);
        snapshot.weather.cond = "Fog".to_string();
        snapshot.sun.sunrise.clear();
        snapshot.sun.sunrise.push_str("06:12").unwrap();

        save_cache(&mut store, "wf_cache.json", &snapshot).unwrap();
        let text = &store.files["wf_cache.json"];
        assert!(text.starts_with(r#"{"weather":{"#));
        assert!(text.contains(r#""sr":"06:12""#));

        assert_eq!(load_cache(&store, "wf_cache.json").unwrap(), Some(snapshot));
    }

    #[test]
    fn reads_cache_written_by_older_face() {
        let mut store = MemoryStore::default();
        store.files.insert(
            "wf_cache.json".to_string(),
            r#"{"weather":{"tHi":70,"t":null,"tLo":50,"cond":"Rain","updated":1700000000000}}"#
                .to_string(),
        );
        let snapshot = load_cache(&store, "wf_cache.json").unwrap().unwrap();
        assert_eq!(snapshot.weather.t_hi, Some(70));
        assert_eq!(snapshot.weather.t, None);
        assert_eq!(snapshot.sun, SunState::default());
    }

    #[test]
    fn corrupt_cache_falls_back() {
        let mut store = MemoryStore::default();
        store
            .files
            .insert("wf_cache.json".to_string(), "{oops".to_string());
        assert!(matches!(
            load_cache(&store, "wf_cache.json"),
            Err(StorageError::Json(_))
        ));
        assert_eq!(
            load_cache_or_default(&store, "wf_cache.json"),
            CacheSnapshot::default()
        );
    }

    #[test]
    fn write_failure_is_reported() {
        let mut store = MemoryStore {
            fail_writes: true,
            ..Default::default()
        };
        assert!(matches!(
            save_cache(&mut store, "wf_cache.json", &CacheSnapshot::default()),
            Err(StorageError::Store(StoreError::Full))
        ));
    }

    #[test]
    fn weather_payload_file() {
        let mut store = MemoryStore::default();
        assert!(read_weather_payload(&store, "weather.json").unwrap().is_none());

        store.files.insert(
            "weather.json".to_string(),
            r#"{"t":"weather","weather":{"temp":290.0}}"#.to_string(),
        );
        assert!(matches!(
            read_weather_payload(&store, "weather.json").unwrap(),
            Some(WeatherPayload::Stored(_))
        ));
    }
}
