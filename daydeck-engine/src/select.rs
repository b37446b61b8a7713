//! Anti-repeat card selection logic.
#[cfg(debug_assertions)]
use crate::constants::DEBUG_ENV_VAR;
use crate::constants::HISTORY_WINDOW;
use crate::data::{Card, CardData};
use crate::error::EngineError;
use rand::Rng;

#[cfg(debug_assertions)]
fn debug_log_enabled() -> bool {
    matches!(std::env::var(DEBUG_ENV_VAR), Ok(val) if val != "0")
}

#[cfg(not(debug_assertions))]
const fn debug_log_enabled() -> bool {
    false
}

/// Tuning for the anti-repeat window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionConfig {
    /// How many of the most recently added history entries a fresh
    /// selection must avoid.
    pub history_window: usize,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            history_window: HISTORY_WINDOW,
        }
    }
}

/// Select the next card to show, uniformly at random from the active
/// cards outside the recent-history window.
///
/// With a corpus larger than the window this guarantees no concept
/// repeats within `history_window` consecutive new selections. When
/// every active card sits inside the window (small corpus, or all
/// recently seen) the pool falls back to the full corpus and repeats
/// are tolerated.
///
/// # Errors
///
/// Returns [`EngineError::EmptyCorpus`] when there are no active cards;
/// no selection is attempted.
pub fn pick_card<'a, R: Rng>(
    cards: &'a CardData,
    history: &[String],
    cfg: &SelectionConfig,
    rng: &mut R,
) -> Result<&'a Card, EngineError> {
    if cards.is_empty() {
        return Err(EngineError::EmptyCorpus);
    }

    let window_start = history.len().saturating_sub(cfg.history_window);
    let recent = &history[window_start..];
    let mut pool: Vec<&Card> = cards
        .iter()
        .filter(|card| !recent.iter().any(|seen| seen == &card.concept))
        .collect();
    if pool.is_empty() {
        pool = cards.iter().collect();
    }

    if debug_log_enabled() {
        println!(
            "Card selection | corpus:{} recent:{} pool:{}",
            cards.len(),
            recent.len(),
            pool.len()
        );
    }

    Ok(pool[rng.gen_range(0..pool.len())])
}
