use std::collections::HashMap;

use prep_core::model::{Question, QuestionId};

/// Scratch notes keyed by question. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notes {
    by_question: HashMap<QuestionId, String>,
}

impl Notes {
    #[must_use]
    pub fn get(&self, id: QuestionId) -> Option<&str> {
        self.by_question.get(&id).map(String::as_str)
    }

    /// Blank text removes the note.
    pub fn set(&mut self, id: QuestionId, text: impl Into<String>) {
        let text = text.into();
        if text.trim().is_empty() {
            self.by_question.remove(&id);
        } else {
            self.by_question.insert(id, text);
        }
    }

    pub fn clear(&mut self) {
        self.by_question.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_question.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_question.is_empty()
    }
}

/// Walks through the questions flagged for practice.
///
/// The flagged list is owned by the question bank and can shrink between
/// calls, so every accessor takes the current list and clamps the index.
#[derive(Debug, Clone, Default)]
pub struct InterviewPractice {
    index: usize,
    notes: Notes,
}

impl InterviewPractice {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current<'a>(&mut self, flagged: &'a [Question]) -> Option<&'a Question> {
        self.clamp(flagged.len());
        flagged.get(self.index)
    }

    pub fn next<'a>(&mut self, flagged: &'a [Question]) -> Option<&'a Question> {
        self.clamp(flagged.len());
        if flagged.is_empty() {
            return None;
        }
        self.index = (self.index + 1) % flagged.len();
        flagged.get(self.index)
    }

    pub fn prev<'a>(&mut self, flagged: &'a [Question]) -> Option<&'a Question> {
        self.clamp(flagged.len());
        if flagged.is_empty() {
            return None;
        }
        let n = flagged.len();
        self.index = (self.index + n - 1) % n;
        flagged.get(self.index)
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn notes(&self) -> &Notes {
        &self.notes
    }

    pub fn notes_mut(&mut self) -> &mut Notes {
        &mut self.notes
    }

    fn clamp(&mut self, len: usize) {
        if self.index >= len {
            self.index = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use prep_core::model::QuestionDraft;
    use prep_core::time::fixed_now;

    fn flagged(n: usize) -> Vec<Question> {
        (0..n)
            .map(|i| {
                QuestionDraft::freestyle(format!("Q{i}"), "Fit", "")
                    .flagged(true)
                    .validate()
                    .unwrap()
                    .assign_id(QuestionId::generate(), fixed_now())
            })
            .collect()
    }

    #[test]
    fn cycles_through_flagged_questions() {
        let list = flagged(3);
        let mut practice = InterviewPractice::new();
        assert_eq!(practice.current(&list).map(Question::text), Some("Q0"));
        assert_eq!(practice.prev(&list).map(Question::text), Some("Q2"));
        assert_eq!(practice.next(&list).map(Question::text), Some("Q0"));
    }

    #[test]
    fn index_clamps_when_list_shrinks() {
        let list = flagged(3);
        let mut practice = InterviewPractice::new();
        practice.prev(&list);
        assert_eq!(practice.index(), 2);

        let shorter = &list[..2];
        assert_eq!(practice.current(shorter).map(Question::text), Some("Q0"));
        assert!(practice.next(&[]).is_none());
    }

    #[test]
    fn blank_note_removes_entry() {
        let list = flagged(1);
        let mut notes = Notes::default();
        notes.set(list[0].id(), "numbers first");
        assert_eq!(notes.get(list[0].id()), Some("numbers first"));
        notes.set(list[0].id(), "  ");
        assert!(notes.is_empty());
    }
}
