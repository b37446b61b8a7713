//! Card dataset types and loading.
//!
//! The dataset is an externally produced JSON sequence whose field names
//! come straight from the authoring spreadsheet. Optional fields are
//! deserialized leniently: a malformed value is treated as absent rather
//! than failing the record, and unknown imagery metadata is ignored.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::constants::PLACEHOLDER_MARKER;

/// Whether an action points inward (reflective) or outward (relational).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Internal,
    External,
}

/// One suggested action on a card, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardAction {
    pub text: String,
    pub kind: ActionKind,
}

/// A single prompt card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    #[serde(rename = "Concept", default, deserialize_with = "lenient_string")]
    pub concept: String,
    #[serde(
        rename = "Journal Prompt",
        default,
        deserialize_with = "lenient_string"
    )]
    pub journal_prompt: String,
    #[serde(rename = "Theme_Tags", default, deserialize_with = "lenient_tags")]
    pub theme_tags: Vec<String>,
    #[serde(
        rename = "Action 1 (Internal/Reflective)",
        default,
        deserialize_with = "lenient_opt_string"
    )]
    pub action_internal: Option<String>,
    #[serde(
        rename = "Action 2 (External/Relational)",
        default,
        deserialize_with = "lenient_opt_string"
    )]
    pub action_external: Option<String>,
}

impl Card {
    /// A card participates in selection, theming, and display only when
    /// its concept is non-blank and not an editorial placeholder.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.concept.trim().is_empty() && !self.concept.contains(PLACEHOLDER_MARKER)
    }

    /// The ordered action pair, skipping absent entries.
    #[must_use]
    pub fn actions(&self) -> Vec<CardAction> {
        let mut actions = Vec::with_capacity(2);
        if let Some(text) = &self.action_internal {
            actions.push(CardAction {
                text: text.clone(),
                kind: ActionKind::Internal,
            });
        }
        if let Some(text) = &self.action_external {
            actions.push(CardAction {
                text: text.clone(),
                kind: ActionKind::External,
            });
        }
        actions
    }
}

/// The active card corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CardData {
    cards: Vec<Card>,
}

impl CardData {
    /// Create an empty corpus (useful for tests).
    #[must_use]
    pub fn empty() -> Self {
        Self { cards: Vec::new() }
    }

    /// Load the corpus from a JSON sequence of card records, dropping
    /// inactive entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not a JSON sequence of records.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let cards: Vec<Card> = serde_json::from_str(json)?;
        Ok(Self::from_cards(cards))
    }

    /// Build a corpus from pre-parsed cards, applying the active filter.
    #[must_use]
    pub fn from_cards(cards: Vec<Card>) -> Self {
        let cards = cards.into_iter().filter(Card::is_active).collect();
        Self { cards }
    }

    /// Active cards in dataset order.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Card> {
        self.cards.iter()
    }

    /// Case-insensitive lookup by concept.
    #[must_use]
    pub fn find(&self, concept: &str) -> Option<&Card> {
        self.cards
            .iter()
            .find(|card| card.concept.eq_ignore_ascii_case(concept))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl<'a> IntoIterator for &'a CardData {
    type Item = &'a Card;
    type IntoIter = std::slice::Iter<'a, Card>;

    fn into_iter(self) -> Self::IntoIter {
        self.cards.iter()
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_str().map(str::to_owned).unwrap_or_default())
}

fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value
        .as_str()
        .filter(|text| !text.trim().is_empty())
        .map(str::to_owned))
}

fn lenient_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let tags = value
        .as_array()
        .map(|entries| {
            entries
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default();
    Ok(tags)
}
