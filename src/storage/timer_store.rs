use thiserror::Error;
use tracing::{debug, info, warn};

use crate::timer::TimerRecord;

use super::key_value::KeyValueStore;

/// Key the record lives under inside the shared namespace.
pub const TIMER_KEY: &str = "lifeTimerData";

/// Result of [TimerStore::save]. Callers are free to ignore it: the record the user just entered
/// stays valid for the running session whether or not it reached the disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Persisted,
    NotPersisted,
}

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("No timer is configured")]
    NotConfigured,

    #[error("Stored timer is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("Stored timer couldn't be read: {0}")]
    Unreadable(anyhow::Error),
}

/// Gateway between surfaces and the shared key-value namespace. Build one per process and hand
/// it to whatever needs it.
pub struct TimerStore<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> TimerStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Writes `record` under [TIMER_KEY], replacing any previous record. Storage failures are
    /// logged and reported as [SaveOutcome::NotPersisted], never returned as errors.
    pub fn save(&self, record: &TimerRecord) -> SaveOutcome {
        let encoded = match serde_json::to_vec(record) {
            Ok(v) => v,
            Err(e) => {
                warn!("Failed to encode timer record {record:?}: {e}");
                return SaveOutcome::NotPersisted;
            }
        };

        match self.store.set(TIMER_KEY, &encoded) {
            Ok(()) => {
                info!("Saved timer record {record:?}");
                SaveOutcome::Persisted
            }
            Err(e) => {
                warn!("Timer record wasn't persisted: {e:?}");
                SaveOutcome::NotPersisted
            }
        }
    }

    /// The stored record, or `None` when nothing usable is stored. A corrupt record looks exactly
    /// like a missing one, which sends the user back to setup.
    pub fn load(&self) -> Option<TimerRecord> {
        match self.try_load() {
            Ok(v) => Some(v),
            Err(LoadError::NotConfigured) => {
                debug!("No timer record stored");
                None
            }
            Err(e) => {
                warn!("Ignoring stored timer record: {e}");
                None
            }
        }
    }

    /// Same lookup as [Self::load] but keeps the reason a record is missing.
    pub fn try_load(&self) -> Result<TimerRecord, LoadError> {
        let raw = self
            .store
            .get(TIMER_KEY)
            .map_err(LoadError::Unreadable)?
            .ok_or(LoadError::NotConfigured)?;
        Ok(serde_json::from_slice(&raw)?)
    }

    /// Removes the stored record. Clearing an empty store is a no-op, and storage failures are
    /// logged and swallowed.
    pub fn clear(&self) {
        match self.store.delete(TIMER_KEY) {
            Ok(()) => info!("Cleared timer record"),
            Err(e) => warn!("Failed to clear timer record: {e:?}"),
        }
    }
}
