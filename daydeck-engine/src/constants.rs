//! Centralized tuning constants for Daydeck engine logic.
//!
//! The anti-repeat window and journey threshold were inherited from the
//! original product tuning and are deliberately kept as named values
//! rather than re-derived; adjust them only via reviewed code changes.

// Logging keys -------------------------------------------------------------
pub(crate) const DEBUG_ENV_VAR: &str = "DAYDECK_DEBUG_LOGS";

// Selection tuning ---------------------------------------------------------
/// Number of most-recent history entries a fresh draw must avoid.
pub const HISTORY_WINDOW: usize = 14;

// Theme tuning -------------------------------------------------------------
/// A theme needs strictly more cards than this to surface as a journey.
pub const JOURNEY_MIN_CARDS: usize = 5;

// Streak tuning ------------------------------------------------------------
/// Upper bound on the backward walk when counting consecutive visits.
pub const STREAK_SCAN_CAP_DAYS: u32 = 365;

// Corpus filtering ---------------------------------------------------------
/// Concepts carrying this marker are editorial placeholders, not cards.
pub(crate) const PLACEHOLDER_MARKER: &str = "SUGGESTED";

// Persisted record keys ----------------------------------------------------
pub(crate) const KEY_FAVORITES: &str = "favorites";
pub(crate) const KEY_STATS: &str = "stats";
pub(crate) const KEY_COMMITMENTS: &str = "commitments";
pub(crate) const KEY_CARD_HISTORY: &str = "cardHistory";
pub(crate) const KEY_CARD_OF_THE_DAY: &str = "cardOfTheDay";
