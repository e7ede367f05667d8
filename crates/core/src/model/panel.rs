use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{PanelRecordId, QuestionId};
use crate::model::question::QuestionKind;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PanelRecordError {
    #[error("a panel record needs at least one question")]
    NoQuestions,

    #[error("panel duration must be > 0 minutes")]
    InvalidDuration,
}

/// Copy of the question data shown during a panel. Later edits or deletions of
/// the source question do not touch it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRef {
    pub id: QuestionId,
    pub question_text: String,
    pub kind: QuestionKind,
    pub category: String,
}

/// One finished (timed out or ended early) panel simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelSessionRecord {
    id: PanelRecordId,
    completed_at: DateTime<Utc>,
    questions: Vec<QuestionRef>,
    duration_minutes: u32,
}

impl PanelSessionRecord {
    /// Build a record for a session that just ended.
    ///
    /// # Errors
    ///
    /// Returns `PanelRecordError::NoQuestions` for an empty question list and
    /// `PanelRecordError::InvalidDuration` for a zero duration.
    pub fn new(
        id: PanelRecordId,
        completed_at: DateTime<Utc>,
        questions: Vec<QuestionRef>,
        duration_minutes: u32,
    ) -> Result<Self, PanelRecordError> {
        if questions.is_empty() {
            return Err(PanelRecordError::NoQuestions);
        }
        if duration_minutes == 0 {
            return Err(PanelRecordError::InvalidDuration);
        }
        Ok(Self {
            id,
            completed_at,
            questions,
            duration_minutes,
        })
    }

    #[must_use]
    pub fn id(&self) -> PanelRecordId {
        self.id
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    #[must_use]
    pub fn questions(&self) -> &[QuestionRef] {
        &self.questions
    }

    #[must_use]
    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn sample_ref() -> QuestionRef {
        QuestionRef {
            id: QuestionId::generate(),
            question_text: "Why this role?".into(),
            kind: QuestionKind::Freestyle,
            category: "Motivation".into(),
        }
    }

    #[test]
    fn record_requires_questions() {
        let err =
            PanelSessionRecord::new(PanelRecordId::generate(), fixed_now(), vec![], 30).unwrap_err();
        assert_eq!(err, PanelRecordError::NoQuestions);
    }

    #[test]
    fn record_requires_positive_duration() {
        let err = PanelSessionRecord::new(PanelRecordId::generate(), fixed_now(), vec![sample_ref()], 0)
            .unwrap_err();
        assert_eq!(err, PanelRecordError::InvalidDuration);
    }

    #[test]
    fn record_serializes_with_camel_case_keys() {
        let record =
            PanelSessionRecord::new(PanelRecordId::generate(), fixed_now(), vec![sample_ref()], 30)
                .unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["durationMinutes"], 30);
        assert_eq!(json["questions"][0]["questionText"], "Why this role?");
        assert_eq!(json["questions"][0]["kind"], "freestyle");
    }
}
