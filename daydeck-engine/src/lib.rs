//! Daydeck Engine
//!
//! Platform-agnostic core logic for the Daydeck daily prompt-card app.
//! This crate provides card selection, theme indexing, and engagement
//! tracking without UI or platform-specific dependencies.

pub mod assets;
pub mod clock;
pub mod constants;
pub mod data;
pub mod error;
pub mod select;
pub mod state;
pub mod store;
pub mod streak;
pub mod themes;

// Re-export commonly used types
pub use assets::asset_key;
pub use clock::{Clock, FixedClock, SystemClock};
pub use data::{ActionKind, Card, CardAction, CardData};
pub use error::EngineError;
pub use select::{SelectionConfig, pick_card};
pub use state::{Commitment, DailyPick, EngagementState, Stats};
pub use store::{EngagementStore, MemoryStorage, StateStorage};
pub use streak::streak;
pub use themes::{Journey, JourneyConfig, ThemeIndex};

use chrono::NaiveDate;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

/// Trait for abstracting the one-time dataset fetch.
/// Platform-specific implementations should provide this.
pub trait DataLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load and parse the card dataset.
    ///
    /// # Errors
    ///
    /// Returns an error if the dataset cannot be retrieved or parsed.
    fn load_card_data(&self) -> Result<CardData, Self::Error>;
}

/// Main engine facade binding the card corpus, the engagement store,
/// an injected clock, and a seedable selection RNG.
pub struct CardsEngine<S, C>
where
    S: StateStorage,
    C: Clock,
{
    cards: CardData,
    store: EngagementStore<S>,
    clock: C,
    rng: ChaCha20Rng,
    selection: SelectionConfig,
    journeys: JourneyConfig,
}

impl<S, C> CardsEngine<S, C>
where
    S: StateStorage,
    C: Clock,
{
    /// Construct the engine: fetch the corpus once and load the store.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::DataLoad`] when the dataset cannot be
    /// fetched or parsed (fatal, not retried), or a storage error when
    /// the backend fails during the store's load phase.
    pub fn new<L: DataLoader>(
        loader: &L,
        storage: S,
        clock: C,
        seed: u64,
    ) -> Result<Self, EngineError> {
        let cards = loader
            .load_card_data()
            .map_err(EngineError::data_load)?;
        let mut store = EngagementStore::new(storage);
        store.load()?;
        Ok(Self {
            cards,
            store,
            clock,
            rng: ChaCha20Rng::seed_from_u64(seed),
            selection: SelectionConfig::default(),
            journeys: JourneyConfig::default(),
        })
    }

    /// Override the default selection and journey tuning.
    #[must_use]
    pub fn with_configs(mut self, selection: SelectionConfig, journeys: JourneyConfig) -> Self {
        self.selection = selection;
        self.journeys = journeys;
        self
    }

    #[must_use]
    pub fn cards(&self) -> &CardData {
        &self.cards
    }

    #[must_use]
    pub fn store(&self) -> &EngagementStore<S> {
        &self.store
    }

    /// The card pinned for today, selecting and pinning one when the
    /// pin is absent, stale, or points at a concept no longer in the
    /// corpus. Idempotent within a calendar day: repeated calls return
    /// the identical concept with no further stat changes.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::EmptyCorpus`] on a corpus with zero
    /// active cards, or a storage error when persisting the pin.
    pub fn card_of_the_day(&mut self) -> Result<Card, EngineError> {
        let today = self.clock.today();
        if let Some(pick) = self.store.card_of_the_day()
            && pick.date == today
            && let Some(card) = self.cards.find(&pick.concept)
        {
            return Ok(card.clone());
        }
        self.select_and_pin(today)
    }

    /// Draw a fresh card, overwrite today's pin with it, and record it
    /// as newly shown (first showing only).
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::EmptyCorpus`] on a corpus with zero
    /// active cards, or a storage error when persisting.
    pub fn draw_new_card(&mut self) -> Result<Card, EngineError> {
        let today = self.clock.today();
        self.select_and_pin(today)
    }

    fn select_and_pin(&mut self, today: NaiveDate) -> Result<Card, EngineError> {
        let card = pick_card(
            &self.cards,
            self.store.card_history(),
            &self.selection,
            &mut self.rng,
        )?
        .clone();
        self.store.set_card_of_the_day(&card.concept, today)?;
        self.store.note_card_shown(&card.concept, self.clock.now())?;
        Ok(card)
    }

    /// Record today's visit in the stats record. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns a storage error when persisting.
    pub fn record_visit_today(&mut self) -> Result<bool, EngineError> {
        let today = self.clock.today();
        self.store.record_visit(today)
    }

    /// Flip favorite membership for `concept` and persist.
    ///
    /// # Errors
    ///
    /// Returns a storage error when persisting.
    pub fn toggle_favorite(&mut self, concept: &str) -> Result<bool, EngineError> {
        self.store.toggle_favorite(concept)
    }

    /// Record a commitment to `action_index` of `concept` for today.
    ///
    /// # Errors
    ///
    /// Returns a storage error when persisting.
    pub fn record_commitment_today(
        &mut self,
        concept: &str,
        action_index: usize,
    ) -> Result<(), EngineError> {
        let today = self.clock.today();
        let now = self.clock.now();
        self.store.record_commitment(today, concept, action_index, now)
    }

    /// Streak of consecutive visited days ending today.
    #[must_use]
    pub fn streak_today(&self) -> u32 {
        self.store.streak_on(self.clock.today())
    }

    /// Rebuild the theme index over the current corpus.
    #[must_use]
    pub fn theme_index(&self) -> ThemeIndex<'_> {
        ThemeIndex::build(&self.cards)
    }

    /// Themes large enough to present, sorted by name.
    #[must_use]
    pub fn eligible_journeys(&self) -> Vec<Journey<'_>> {
        self.theme_index().eligible_journeys(&self.journeys)
    }

    /// A random preview card for the named theme, if it exists.
    pub fn journey_preview(&mut self, name: &str) -> Option<Card> {
        let index = ThemeIndex::build(&self.cards);
        index.preview_card(name, &mut self.rng).cloned()
    }

    /// The named theme's cards in a fresh random order.
    pub fn journey_cards_shuffled(&mut self, name: &str) -> Vec<Card> {
        let index = ThemeIndex::build(&self.cards);
        index
            .shuffled_cards(name, &mut self.rng)
            .into_iter()
            .cloned()
            .collect()
    }
}
