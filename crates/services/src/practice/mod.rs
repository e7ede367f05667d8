//! Study modes outside the timed panel.

pub mod flashcards;
pub mod interview;

pub use flashcards::{CardSide, FlashcardDeck};
pub use interview::{InterviewPractice, Notes};
