use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use prep_core::model::{
    Confidence, Question, QuestionDraft, QuestionId, QuestionQuery,
};
use storage::keys;
use storage::repository::{KeyValueStore, load, save};

use crate::Clock;
use crate::confirmation::Confirmation;
use crate::error::QuestionBankError;
use crate::seed::starter_questions;

/// In-memory question list with write-through to the store.
///
/// Every mutation persists the whole list under `interview-questions` before
/// the in-memory copy is replaced, so a failed write leaves both unchanged.
pub struct QuestionBank {
    clock: Clock,
    store: Arc<dyn KeyValueStore>,
    questions: Mutex<Vec<Question>>,
}

impl QuestionBank {
    /// Load the stored questions, falling back to the starter set when the key
    /// has never been written.
    ///
    /// # Errors
    ///
    /// Returns `QuestionBankError::Storage` if the store cannot be read or holds
    /// malformed data.
    pub async fn load(
        clock: Clock,
        store: Arc<dyn KeyValueStore>,
    ) -> Result<Self, QuestionBankError> {
        let stored: Option<Vec<Question>> = load(store.as_ref(), keys::QUESTIONS).await?;
        let questions = match stored {
            Some(questions) => questions,
            None => {
                tracing::info!("no stored questions, using starter set");
                starter_questions(clock.now())
            }
        };
        Ok(Self {
            clock,
            store,
            questions: Mutex::new(questions),
        })
    }

    /// Current questions in display order (newest first).
    pub async fn list(&self) -> Vec<Question> {
        self.questions.lock().await.clone()
    }

    pub async fn get(&self, id: QuestionId) -> Option<Question> {
        self.questions
            .lock()
            .await
            .iter()
            .find(|q| q.id() == id)
            .cloned()
    }

    /// Questions matching the type filter and search term, in display order.
    pub async fn query(&self, query: &QuestionQuery) -> Vec<Question> {
        let questions = self.questions.lock().await;
        query.apply(&questions).cloned().collect()
    }

    /// Questions flagged for interview practice.
    pub async fn flagged(&self) -> Vec<Question> {
        self.questions
            .lock()
            .await
            .iter()
            .filter(|q| q.is_flagged())
            .cloned()
            .collect()
    }

    /// Validate and add a new question at the top of the list.
    ///
    /// # Errors
    ///
    /// Returns `QuestionBankError::Question` for validation failures and
    /// `QuestionBankError::Storage` if the write fails.
    pub async fn create(&self, draft: QuestionDraft) -> Result<Question, QuestionBankError> {
        let question = draft
            .validate()?
            .assign_id(QuestionId::generate(), self.clock.now());

        let mut questions = self.questions.lock().await;
        let mut next = Vec::with_capacity(questions.len() + 1);
        next.push(question.clone());
        next.extend(questions.iter().cloned());
        self.persist(&next).await?;
        *questions = next;

        tracing::debug!(id = %question.id(), "created question");
        Ok(question)
    }

    /// Replace a question wholesale, keeping its id, creation time, and position.
    ///
    /// # Errors
    ///
    /// Returns `QuestionBankError::NotFound` for unknown ids,
    /// `QuestionBankError::Question` for validation failures, and
    /// `QuestionBankError::Storage` if the write fails.
    pub async fn update(
        &self,
        id: QuestionId,
        draft: QuestionDraft,
    ) -> Result<Question, QuestionBankError> {
        let validated = draft.validate()?;
        self.modify(id, |current, now| current.revise(validated, now))
            .await
    }

    /// Remove a question. Declined confirmations leave the list untouched.
    ///
    /// Returns whether a question was removed.
    ///
    /// # Errors
    ///
    /// Returns `QuestionBankError::NotFound` for unknown ids and
    /// `QuestionBankError::Storage` if the write fails.
    pub async fn delete(
        &self,
        id: QuestionId,
        confirmation: Confirmation,
    ) -> Result<bool, QuestionBankError> {
        let mut questions = self.questions.lock().await;
        if !questions.iter().any(|q| q.id() == id) {
            return Err(QuestionBankError::NotFound(id));
        }
        if !confirmation.is_confirmed() {
            return Ok(false);
        }

        let next: Vec<Question> = questions.iter().filter(|q| q.id() != id).cloned().collect();
        self.persist(&next).await?;
        *questions = next;

        tracing::debug!(%id, "deleted question");
        Ok(true)
    }

    /// # Errors
    ///
    /// Returns `QuestionBankError` if the question is missing or the write fails.
    pub async fn toggle_mastered(&self, id: QuestionId) -> Result<Question, QuestionBankError> {
        self.modify(id, |q, now| q.with_mastered_toggled(now)).await
    }

    /// # Errors
    ///
    /// Returns `QuestionBankError` if the question is missing or the write fails.
    pub async fn toggle_flagged(&self, id: QuestionId) -> Result<Question, QuestionBankError> {
        self.modify(id, |q, now| q.with_flag_toggled(now)).await
    }

    /// Set or clear the self-assessed confidence.
    ///
    /// # Errors
    ///
    /// Returns `QuestionBankError` if the question is missing or the write fails.
    pub async fn set_confidence(
        &self,
        id: QuestionId,
        confidence: Option<Confidence>,
    ) -> Result<Question, QuestionBankError> {
        self.modify(id, |q, now| q.with_confidence(confidence, now))
            .await
    }

    /// Swap one question for `change(current, now)` and write through.
    pub(crate) async fn modify(
        &self,
        id: QuestionId,
        change: impl FnOnce(&Question, DateTime<Utc>) -> Question,
    ) -> Result<Question, QuestionBankError> {
        let mut questions = self.questions.lock().await;
        let index = questions
            .iter()
            .position(|q| q.id() == id)
            .ok_or(QuestionBankError::NotFound(id))?;

        let updated = change(&questions[index], self.clock.now());
        let mut next = questions.clone();
        next[index] = updated.clone();
        self.persist(&next).await?;
        *questions = next;

        tracing::debug!(%id, "updated question");
        Ok(updated)
    }

    async fn persist(&self, questions: &[Question]) -> Result<(), QuestionBankError> {
        save(self.store.as_ref(), keys::QUESTIONS, questions).await?;
        Ok(())
    }
}
