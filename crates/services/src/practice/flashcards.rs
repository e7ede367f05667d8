use prep_core::model::Question;

use crate::random::{RandomSource, shuffle};

/// Which face of the current card is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CardSide {
    #[default]
    Question,
    Answer,
}

/// Shuffled deck over a question list. Moving to another card always shows
/// its question side first.
#[derive(Debug, Clone, Default)]
pub struct FlashcardDeck {
    cards: Vec<Question>,
    current: usize,
    side: CardSide,
}

impl FlashcardDeck {
    #[must_use]
    pub fn new(questions: Vec<Question>, rng: &mut dyn RandomSource) -> Self {
        let mut cards = questions;
        shuffle(&mut cards, rng);
        Self {
            cards,
            current: 0,
            side: CardSide::Question,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn side(&self) -> CardSide {
        self.side
    }

    #[must_use]
    pub fn current(&self) -> Option<&Question> {
        self.cards.get(self.current)
    }

    pub fn flip(&mut self) -> CardSide {
        if !self.is_empty() {
            self.side = match self.side {
                CardSide::Question => CardSide::Answer,
                CardSide::Answer => CardSide::Question,
            };
        }
        self.side
    }

    pub fn next(&mut self) -> Option<&Question> {
        if self.is_empty() {
            return None;
        }
        self.current = (self.current + 1) % self.cards.len();
        self.side = CardSide::Question;
        self.current()
    }

    pub fn prev(&mut self) -> Option<&Question> {
        if self.is_empty() {
            return None;
        }
        let n = self.cards.len();
        self.current = (self.current + n - 1) % n;
        self.side = CardSide::Question;
        self.current()
    }

    /// Shuffle again and go back to the first card, question side up.
    pub fn reshuffle(&mut self, rng: &mut dyn RandomSource) {
        shuffle(&mut self.cards, rng);
        self.current = 0;
        self.side = CardSide::Question;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use prep_core::model::{QuestionDraft, QuestionId};
    use prep_core::time::fixed_now;

    use crate::random::ScriptedRandom;

    fn cards(n: usize) -> Vec<Question> {
        (0..n)
            .map(|i| {
                QuestionDraft::freestyle(format!("Q{i}"), "Fit", format!("A{i}"))
                    .validate()
                    .unwrap()
                    .assign_id(QuestionId::generate(), fixed_now())
            })
            .collect()
    }

    #[test]
    fn empty_deck_has_no_card() {
        let mut deck = FlashcardDeck::new(Vec::new(), &mut ScriptedRandom::identity());
        assert!(deck.current().is_none());
        assert!(deck.next().is_none());
        assert!(deck.prev().is_none());
        assert_eq!(deck.flip(), CardSide::Question);
    }

    #[test]
    fn navigation_wraps_and_resets_side() {
        let mut deck = FlashcardDeck::new(cards(3), &mut ScriptedRandom::identity());
        assert_eq!(deck.current().map(Question::text), Some("Q0"));

        assert_eq!(deck.flip(), CardSide::Answer);
        assert_eq!(deck.prev().map(Question::text), Some("Q2"));
        assert_eq!(deck.side(), CardSide::Question);

        deck.flip();
        assert_eq!(deck.next().map(Question::text), Some("Q0"));
        assert_eq!(deck.side(), CardSide::Question);
    }

    #[test]
    fn reshuffle_returns_to_first_card() {
        let mut deck = FlashcardDeck::new(cards(3), &mut ScriptedRandom::identity());
        deck.next();
        deck.flip();

        // i=2 swaps with 0, i=1 swaps with 1
        deck.reshuffle(&mut ScriptedRandom::new([0, 1]));
        assert_eq!(deck.position(), 0);
        assert_eq!(deck.side(), CardSide::Question);
        assert_eq!(deck.current().map(Question::text), Some("Q2"));
    }
}
