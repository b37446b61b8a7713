//! Engagement store: load/mutate/persist over an abstract backend.
//!
//! Five independent keyed records are read once at startup and each one
//! is overwritten wholesale, synchronously, after every mutation that
//! touches it. An absent or corrupt record is replaced by its empty
//! default at load time; corruption is logged at debug level only.

use chrono::{DateTime, NaiveDate, Utc};
use log::debug;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::cell::RefCell;
use std::collections::HashMap;
use std::convert::Infallible;
use std::rc::Rc;

use crate::constants::{
    KEY_CARD_HISTORY, KEY_CARD_OF_THE_DAY, KEY_COMMITMENTS, KEY_FAVORITES, KEY_STATS,
};
use crate::error::EngineError;
use crate::state::{Commitment, DailyPick, EngagementState, Stats};

/// Keyed persistence backend for the engagement records.
/// Platform-specific implementations should provide this.
pub trait StateStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read the raw record stored under `key`, `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend itself fails; absence is not an
    /// error.
    fn read(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Overwrite the record stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be written.
    fn write(&self, key: &str, value: &str) -> Result<(), Self::Error>;
}

/// In-memory backend for tests and ephemeral sessions. Clones share the
/// same underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    records: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStorage for MemoryStorage {
    type Error = Infallible;

    fn read(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.records.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.records
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// The process-wide engagement store. Constructed unloaded; every
/// mutating operation requires [`EngagementStore::load`] to have
/// completed first and fails with [`EngineError::StoreNotLoaded`]
/// otherwise.
#[derive(Debug)]
pub struct EngagementStore<S: StateStorage> {
    storage: S,
    state: EngagementState,
    loaded: bool,
}

impl<S: StateStorage> EngagementStore<S> {
    #[must_use]
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            state: EngagementState::default(),
            loaded: false,
        }
    }

    /// Read all records from the backend, substituting empty defaults
    /// for anything absent or corrupt.
    ///
    /// # Errors
    ///
    /// Returns an error only when the backend itself fails; record
    /// corruption is recovered locally.
    pub fn load(&mut self) -> Result<(), EngineError> {
        self.state = EngagementState {
            favorites: self.read_record(KEY_FAVORITES)?,
            stats: self.read_record::<Stats>(KEY_STATS)?,
            commitments: self.read_record(KEY_COMMITMENTS)?,
            card_history: self.read_record(KEY_CARD_HISTORY)?,
            card_of_the_day: self.read_record::<Option<DailyPick>>(KEY_CARD_OF_THE_DAY)?,
        };
        self.loaded = true;
        Ok(())
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Flip favorite membership and persist. Returns the new membership.
    ///
    /// # Errors
    ///
    /// Fails before [`EngagementStore::load`] or on a backend write error.
    pub fn toggle_favorite(&mut self, concept: &str) -> Result<bool, EngineError> {
        self.ensure_loaded()?;
        let favorited = self.state.toggle_favorite(concept);
        self.persist(KEY_FAVORITES, &self.state.favorites)?;
        Ok(favorited)
    }

    /// Append a commitment for `date` and persist. Never deduplicates.
    ///
    /// # Errors
    ///
    /// Fails before [`EngagementStore::load`] or on a backend write error.
    pub fn record_commitment(
        &mut self,
        date: NaiveDate,
        concept: &str,
        action_index: usize,
        now: DateTime<Utc>,
    ) -> Result<(), EngineError> {
        self.ensure_loaded()?;
        self.state.record_commitment(
            date,
            Commitment {
                concept: concept.to_string(),
                action_index,
                timestamp: now,
            },
        );
        self.persist(KEY_COMMITMENTS, &self.state.commitments)
    }

    /// Record a visit on `date`. Idempotent: the record is only written
    /// back when the visit set actually changed.
    ///
    /// # Errors
    ///
    /// Fails before [`EngagementStore::load`] or on a backend write error.
    pub fn record_visit(&mut self, date: NaiveDate) -> Result<bool, EngineError> {
        self.ensure_loaded()?;
        let changed = self.state.record_visit(date);
        if changed {
            self.persist(KEY_STATS, &self.state.stats)?;
        }
        Ok(changed)
    }

    /// Apply the newly-shown side effects for `concept`, persisting
    /// history and stats when the concept is genuinely new. Returns
    /// whether it was.
    ///
    /// # Errors
    ///
    /// Fails before [`EngagementStore::load`] or on a backend write error.
    pub fn note_card_shown(
        &mut self,
        concept: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, EngineError> {
        self.ensure_loaded()?;
        let newly_shown = self.state.note_card_shown(concept, now);
        if newly_shown {
            self.persist(KEY_CARD_HISTORY, &self.state.card_history)?;
            self.persist(KEY_STATS, &self.state.stats)?;
        }
        Ok(newly_shown)
    }

    /// Pin `concept` as the card of the day for `date`, overwriting any
    /// existing pin, and persist the pin.
    ///
    /// # Errors
    ///
    /// Fails before [`EngagementStore::load`] or on a backend write error.
    pub fn set_card_of_the_day(
        &mut self,
        concept: &str,
        date: NaiveDate,
    ) -> Result<(), EngineError> {
        self.ensure_loaded()?;
        self.state.card_of_the_day = Some(DailyPick {
            concept: concept.to_string(),
            date,
        });
        self.persist(KEY_CARD_OF_THE_DAY, &self.state.card_of_the_day)
    }

    #[must_use]
    pub fn card_of_the_day(&self) -> Option<&DailyPick> {
        self.state.card_of_the_day.as_ref()
    }

    #[must_use]
    pub fn favorites(&self) -> &[String] {
        &self.state.favorites
    }

    #[must_use]
    pub fn is_favorite(&self, concept: &str) -> bool {
        self.state.is_favorite(concept)
    }

    #[must_use]
    pub fn stats(&self) -> &Stats {
        &self.state.stats
    }

    #[must_use]
    pub fn card_history(&self) -> &[String] {
        &self.state.card_history
    }

    #[must_use]
    pub fn commitments_on(&self, date: NaiveDate) -> &[Commitment] {
        self.state.commitments_on(date)
    }

    /// Streak of consecutive visited days ending at `today`.
    #[must_use]
    pub fn streak_on(&self, today: NaiveDate) -> u32 {
        self.state.streak_on(today)
    }

    /// Snapshot of the full in-memory state.
    #[must_use]
    pub fn state(&self) -> &EngagementState {
        &self.state
    }

    fn ensure_loaded(&self) -> Result<(), EngineError> {
        if self.loaded {
            Ok(())
        } else {
            Err(EngineError::StoreNotLoaded)
        }
    }

    fn read_record<T>(&self, key: &str) -> Result<T, EngineError>
    where
        T: DeserializeOwned + Default,
    {
        let Some(text) = self.storage.read(key).map_err(EngineError::storage)? else {
            return Ok(T::default());
        };
        match serde_json::from_str(&text) {
            Ok(value) => Ok(value),
            Err(err) => {
                debug!("record '{key}' is corrupt, resetting to default: {err}");
                Ok(T::default())
            }
        }
    }

    fn persist<T: Serialize>(&self, key: &str, value: &T) -> Result<(), EngineError> {
        let text = serde_json::to_string(value).map_err(EngineError::Encode)?;
        self.storage.write(key, &text).map_err(EngineError::storage)
    }
}
