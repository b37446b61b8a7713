//! Durable per-user engagement state.
//!
//! Field names serialize in camelCase so persisted records stay
//! wire-compatible with the original storage format.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::streak::streak;

/// Aggregate engagement counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    #[serde(default)]
    pub total_cards_drawn: u32,
    #[serde(default)]
    pub last_visit: Option<DateTime<Utc>>,
    #[serde(default)]
    pub visit_dates: BTreeSet<NaiveDate>,
}

/// One recorded acknowledgment of taking a card action on a given day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commitment {
    pub concept: String,
    pub action_index: usize,
    pub timestamp: DateTime<Utc>,
}

/// The card pinned for one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPick {
    pub concept: String,
    pub date: NaiveDate,
}

/// The full user-scoped engagement record. Pure data plus the mutation
/// rules; persistence lives in [`crate::store::EngagementStore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct EngagementState {
    #[serde(default)]
    pub favorites: Vec<String>,
    #[serde(default)]
    pub stats: Stats,
    #[serde(default)]
    pub commitments: BTreeMap<NaiveDate, Vec<Commitment>>,
    #[serde(default)]
    pub card_history: Vec<String>,
    #[serde(default)]
    pub card_of_the_day: Option<DailyPick>,
}

impl EngagementState {
    /// Flip favorite membership for `concept`. Returns the new state of
    /// membership. Catalog-agnostic: unknown concepts are accepted.
    pub fn toggle_favorite(&mut self, concept: &str) -> bool {
        if let Some(position) = self.favorites.iter().position(|entry| entry == concept) {
            self.favorites.remove(position);
            false
        } else {
            self.favorites.push(concept.to_string());
            true
        }
    }

    #[must_use]
    pub fn is_favorite(&self, concept: &str) -> bool {
        self.favorites.iter().any(|entry| entry == concept)
    }

    /// Record a visit on `date`. Idempotent; returns whether the set
    /// actually changed.
    pub fn record_visit(&mut self, date: NaiveDate) -> bool {
        self.stats.visit_dates.insert(date)
    }

    /// Append a commitment to the day's list. Never deduplicates:
    /// repeated commitments to the same action are all retained.
    pub fn record_commitment(&mut self, date: NaiveDate, commitment: Commitment) {
        self.commitments.entry(date).or_default().push(commitment);
    }

    #[must_use]
    pub fn commitments_on(&self, date: NaiveDate) -> &[Commitment] {
        self.commitments.get(&date).map_or(&[], Vec::as_slice)
    }

    /// Apply the newly-shown side effects for `concept`: first showing
    /// appends to history, bumps the draw counter, and stamps the visit
    /// time. Re-showing an already-seen concept changes nothing.
    pub fn note_card_shown(&mut self, concept: &str, now: DateTime<Utc>) -> bool {
        if self.card_history.iter().any(|entry| entry == concept) {
            return false;
        }
        self.card_history.push(concept.to_string());
        self.stats.total_cards_drawn += 1;
        self.stats.last_visit = Some(now);
        true
    }

    /// Streak of consecutive visited days ending at `today`.
    #[must_use]
    pub fn streak_on(&self, today: NaiveDate) -> u32 {
        streak(&self.stats.visit_dates, today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, day).unwrap()
    }

    fn instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 10, 9, 30, 0).unwrap()
    }

    #[test]
    fn toggle_favorite_is_its_own_inverse() {
        let mut state = EngagementState::default();
        assert!(state.toggle_favorite("Presence"));
        assert!(state.is_favorite("Presence"));
        assert!(!state.toggle_favorite("Presence"));
        assert!(!state.is_favorite("Presence"));
        assert!(state.favorites.is_empty());
    }

    #[test]
    fn record_visit_is_idempotent() {
        let mut state = EngagementState::default();
        assert!(state.record_visit(date(10)));
        assert!(!state.record_visit(date(10)));
        assert_eq!(state.stats.visit_dates.len(), 1);
    }

    #[test]
    fn commitments_are_append_only_without_dedup() {
        let mut state = EngagementState::default();
        for _ in 0..2 {
            state.record_commitment(
                date(10),
                Commitment {
                    concept: "Presence".to_string(),
                    action_index: 0,
                    timestamp: instant(),
                },
            );
        }
        assert_eq!(state.commitments_on(date(10)).len(), 2);
        assert!(state.commitments_on(date(11)).is_empty());
    }

    #[test]
    fn note_card_shown_counts_each_concept_once() {
        let mut state = EngagementState::default();
        assert!(state.note_card_shown("Presence", instant()));
        assert!(!state.note_card_shown("Presence", instant()));
        assert_eq!(state.card_history, vec!["Presence"]);
        assert_eq!(state.stats.total_cards_drawn, 1);
        assert_eq!(state.stats.last_visit, Some(instant()));
    }

    #[test]
    fn state_round_trips_through_json() {
        let mut state = EngagementState::default();
        state.toggle_favorite("Presence");
        state.record_visit(date(9));
        state.record_visit(date(10));
        state.note_card_shown("Presence", instant());
        state.record_commitment(
            date(10),
            Commitment {
                concept: "Presence".to_string(),
                action_index: 1,
                timestamp: instant(),
            },
        );
        state.card_of_the_day = Some(DailyPick {
            concept: "Presence".to_string(),
            date: date(10),
        });

        let json = serde_json::to_string(&state).unwrap();
        let restored: EngagementState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, restored);
    }

    #[test]
    fn persisted_fields_use_camel_case_names() {
        let state = EngagementState::default();
        let value = serde_json::to_value(&state).unwrap();
        assert!(value.get("cardHistory").is_some());
        let stats = value.get("stats").unwrap();
        assert!(stats.get("totalCardsDrawn").is_some());
        assert!(stats.get("visitDates").is_some());
    }
}
