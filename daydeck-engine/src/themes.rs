//! Theme indexing: grouping cards into named clusters ("journeys").

use rand::Rng;
use std::collections::HashMap;

use crate::constants::JOURNEY_MIN_CARDS;
use crate::data::{Card, CardData};

/// Eligibility tuning for user-facing journeys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JourneyConfig {
    /// A theme must hold strictly more cards than this to be a journey.
    pub min_cards: usize,
}

impl Default for JourneyConfig {
    fn default() -> Self {
        Self {
            min_cards: JOURNEY_MIN_CARDS,
        }
    }
}

/// A theme large enough to present as a journey.
#[derive(Debug, Clone)]
pub struct Journey<'a> {
    pub name: String,
    pub cards: Vec<&'a Card>,
    pub count: usize,
}

/// Mapping from trimmed theme tag to the cards carrying it, rebuilt
/// whenever the corpus changes. Buckets keep first-seen card order.
#[derive(Debug, Clone, Default)]
pub struct ThemeIndex<'a> {
    buckets: HashMap<String, Vec<&'a Card>>,
}

impl<'a> ThemeIndex<'a> {
    /// Index every non-blank trimmed tag in the corpus. Tags differing
    /// only in surrounding whitespace collapse into one bucket.
    #[must_use]
    pub fn build(data: &'a CardData) -> Self {
        let mut buckets: HashMap<String, Vec<&'a Card>> = HashMap::new();
        for card in data {
            for tag in &card.theme_tags {
                let normalized = tag.trim();
                if normalized.is_empty() {
                    continue;
                }
                buckets.entry(normalized.to_string()).or_default().push(card);
            }
        }
        Self { buckets }
    }

    /// Number of distinct themes, eligible or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// All theme names, sorted lexicographically.
    #[must_use]
    pub fn theme_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.buckets.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Cards tagged with `name`, in first-seen order.
    #[must_use]
    pub fn cards_in(&self, name: &str) -> &[&'a Card] {
        self.buckets.get(name).map_or(&[], Vec::as_slice)
    }

    /// Themes eligible for display, sorted lexicographically by name.
    #[must_use]
    pub fn eligible_journeys(&self, cfg: &JourneyConfig) -> Vec<Journey<'a>> {
        let mut journeys: Vec<Journey<'a>> = self
            .buckets
            .iter()
            .filter(|(_, cards)| cards.len() > cfg.min_cards)
            .map(|(name, cards)| Journey {
                name: name.clone(),
                cards: cards.clone(),
                count: cards.len(),
            })
            .collect();
        journeys.sort_unstable_by(|a, b| a.name.cmp(&b.name));
        journeys
    }

    /// One card from the bucket, uniformly at random. Presentation-layer
    /// nondeterminism: not persisted, may differ between calls.
    pub fn preview_card<R: Rng>(&self, name: &str, rng: &mut R) -> Option<&'a Card> {
        let bucket = self.buckets.get(name)?;
        if bucket.is_empty() {
            return None;
        }
        Some(bucket[rng.gen_range(0..bucket.len())])
    }

    /// The bucket's cards in a fresh random order for a journey detail
    /// view. Fisher-Yates over a copy; the index itself is untouched.
    pub fn shuffled_cards<R: Rng>(&self, name: &str, rng: &mut R) -> Vec<&'a Card> {
        let mut cards = self.cards_in(name).to_vec();
        for i in (1..cards.len()).rev() {
            let j = rng.gen_range(0..=i);
            cards.swap(i, j);
        }
        cards
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn make_card(concept: &str, tags: &[&str]) -> Card {
        Card {
            concept: concept.to_string(),
            journal_prompt: format!("Prompt for {concept}"),
            theme_tags: tags.iter().map(|t| (*t).to_string()).collect(),
            action_internal: None,
            action_external: None,
        }
    }

    fn corpus_with_theme_sizes(growth: usize, calm: usize) -> CardData {
        let mut cards = Vec::new();
        for i in 0..growth {
            cards.push(make_card(&format!("G{i}"), &["Growth"]));
        }
        for i in 0..calm {
            cards.push(make_card(&format!("C{i}"), &["Calm"]));
        }
        CardData::from_cards(cards)
    }

    #[test]
    fn whitespace_variants_collapse_into_one_bucket() {
        let data = CardData::from_cards(vec![
            make_card("A", &[" Growth"]),
            make_card("B", &["Growth"]),
            make_card("C", &["Growth "]),
        ]);
        let index = ThemeIndex::build(&data);
        assert_eq!(index.len(), 1);
        assert_eq!(index.cards_in("Growth").len(), 3);
    }

    #[test]
    fn blank_tags_are_skipped() {
        let data = CardData::from_cards(vec![make_card("A", &["", "   ", "Calm"])]);
        let index = ThemeIndex::build(&data);
        assert_eq!(index.theme_names(), vec!["Calm"]);
    }

    #[test]
    fn buckets_preserve_first_seen_order() {
        let data = corpus_with_theme_sizes(3, 0);
        let index = ThemeIndex::build(&data);
        let concepts: Vec<&str> = index
            .cards_in("Growth")
            .iter()
            .map(|card| card.concept.as_str())
            .collect();
        assert_eq!(concepts, vec!["G0", "G1", "G2"]);
    }

    #[test]
    fn journey_threshold_is_strictly_greater_than_minimum() {
        let data = corpus_with_theme_sizes(5, 6);
        let index = ThemeIndex::build(&data);
        let journeys = index.eligible_journeys(&JourneyConfig::default());
        assert_eq!(journeys.len(), 1);
        assert_eq!(journeys[0].name, "Calm");
        assert_eq!(journeys[0].count, 6);
    }

    #[test]
    fn journeys_are_sorted_by_name() {
        let data = corpus_with_theme_sizes(7, 6);
        let index = ThemeIndex::build(&data);
        let names: Vec<String> = index
            .eligible_journeys(&JourneyConfig::default())
            .into_iter()
            .map(|journey| journey.name)
            .collect();
        assert_eq!(names, vec!["Calm", "Growth"]);
    }

    #[test]
    fn preview_card_comes_from_the_requested_bucket() {
        let data = corpus_with_theme_sizes(7, 6);
        let index = ThemeIndex::build(&data);
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        for _ in 0..20 {
            let card = index.preview_card("Growth", &mut rng).unwrap();
            assert!(card.concept.starts_with('G'));
        }
        assert!(index.preview_card("Unknown", &mut rng).is_none());
    }

    #[test]
    fn shuffled_cards_is_a_permutation_of_the_bucket() {
        let data = corpus_with_theme_sizes(7, 0);
        let index = ThemeIndex::build(&data);
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let mut shuffled: Vec<&str> = index
            .shuffled_cards("Growth", &mut rng)
            .iter()
            .map(|card| card.concept.as_str())
            .collect();
        shuffled.sort_unstable();
        assert_eq!(shuffled, vec!["G0", "G1", "G2", "G3", "G4", "G5", "G6"]);
    }
}
