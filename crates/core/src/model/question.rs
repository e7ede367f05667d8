use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::QuestionId;
use crate::model::panel::QuestionRef;
use crate::model::principle::LeadershipPrinciple;
use crate::model::starl::Starl;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,

    #[error("freestyle category cannot be empty")]
    EmptyCategory,
}

//
// ─── CONFIDENCE ────────────────────────────────────────────────────────────────
//

/// Self-assessed preparedness for a single question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    /// Score of the highest level; used to scale averages to a percentage.
    pub const MAX_SCORE: u32 = 2;

    #[must_use]
    pub fn score(self) -> u32 {
        match self {
            Confidence::Low => 0,
            Confidence::Medium => 1,
            Confidence::High => 2,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("confidence must be low, medium, or high (got {0:?})")]
pub struct ParseConfidenceError(pub String);

impl FromStr for Confidence {
    type Err = ParseConfidenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Confidence::Low),
            "medium" => Ok(Confidence::Medium),
            "high" => Ok(Confidence::High),
            _ => Err(ParseConfidenceError(s.to_string())),
        }
    }
}

//
// ─── KIND / BODY ───────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QuestionKind {
    StructuredPrinciple,
    Freestyle,
}

impl QuestionKind {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            QuestionKind::StructuredPrinciple => "Leadership Principle",
            QuestionKind::Freestyle => "Freestyle",
        }
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Category plus answer. The variant decides which answer shape exists, so a
/// question can never carry both a STARL and a freestyle answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum QuestionBody {
    StructuredPrinciple {
        principle: LeadershipPrinciple,
        answer: Starl,
    },
    Freestyle {
        category: String,
        answer: String,
    },
}

impl QuestionBody {
    #[must_use]
    pub fn kind(&self) -> QuestionKind {
        match self {
            QuestionBody::StructuredPrinciple { .. } => QuestionKind::StructuredPrinciple,
            QuestionBody::Freestyle { .. } => QuestionKind::Freestyle,
        }
    }

    #[must_use]
    pub fn category(&self) -> &str {
        match self {
            QuestionBody::StructuredPrinciple { principle, .. } => principle.as_str(),
            QuestionBody::Freestyle { category, .. } => category,
        }
    }

    /// True when there is nothing to refine or review.
    #[must_use]
    pub fn answer_is_blank(&self) -> bool {
        match self {
            QuestionBody::StructuredPrinciple { answer, .. } => answer.is_blank(),
            QuestionBody::Freestyle { answer, .. } => answer.trim().is_empty(),
        }
    }
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

/// Editable form of a question. Saved wholesale: an edit replaces every field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionDraft {
    pub text: String,
    pub body: QuestionBody,
    pub tags: Vec<String>,
    pub mastered: bool,
    pub flagged: bool,
    pub confidence: Option<Confidence>,
}

impl QuestionDraft {
    #[must_use]
    pub fn principle(
        text: impl Into<String>,
        principle: LeadershipPrinciple,
        answer: Starl,
    ) -> Self {
        Self::with_body(text, QuestionBody::StructuredPrinciple { principle, answer })
    }

    #[must_use]
    pub fn freestyle(
        text: impl Into<String>,
        category: impl Into<String>,
        answer: impl Into<String>,
    ) -> Self {
        Self::with_body(
            text,
            QuestionBody::Freestyle {
                category: category.into(),
                answer: answer.into(),
            },
        )
    }

    fn with_body(text: impl Into<String>, body: QuestionBody) -> Self {
        Self {
            text: text.into(),
            body,
            tags: Vec::new(),
            mastered: false,
            flagged: false,
            confidence: None,
        }
    }

    /// Starts an edit from the current state of a question.
    #[must_use]
    pub fn from_question(question: &Question) -> Self {
        Self {
            text: question.text.clone(),
            body: question.body.clone(),
            tags: question.tags.clone(),
            mastered: question.mastered,
            flagged: question.flagged,
            confidence: question.confidence,
        }
    }

    #[must_use]
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn mastered(mut self, mastered: bool) -> Self {
        self.mastered = mastered;
        self
    }

    #[must_use]
    pub fn flagged(mut self, flagged: bool) -> Self {
        self.flagged = flagged;
        self
    }

    #[must_use]
    pub fn confidence(mut self, confidence: Option<Confidence>) -> Self {
        self.confidence = confidence;
        self
    }

    /// Normalize and check the draft.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyText` if the question text is blank, or
    /// `QuestionError::EmptyCategory` if a freestyle category is blank.
    pub fn validate(self) -> Result<ValidatedQuestion, QuestionError> {
        let text = self.text.trim().to_string();
        if text.is_empty() {
            return Err(QuestionError::EmptyText);
        }

        let body = match self.body {
            QuestionBody::Freestyle { category, answer } => {
                let category = category.trim().to_string();
                if category.is_empty() {
                    return Err(QuestionError::EmptyCategory);
                }
                QuestionBody::Freestyle { category, answer }
            }
            principle @ QuestionBody::StructuredPrinciple { .. } => principle,
        };

        Ok(ValidatedQuestion {
            text,
            body,
            tags: normalize_tags(self.tags),
            mastered: self.mastered,
            flagged: self.flagged,
            confidence: self.confidence,
        })
    }
}

fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    tags.into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedQuestion {
    text: String,
    body: QuestionBody,
    tags: Vec<String>,
    mastered: bool,
    flagged: bool,
    confidence: Option<Confidence>,
}

impl ValidatedQuestion {
    #[must_use]
    pub fn assign_id(self, id: QuestionId, now: DateTime<Utc>) -> Question {
        Question {
            id,
            text: self.text,
            body: self.body,
            mastered: self.mastered,
            flagged: self.flagged,
            confidence: self.confidence,
            tags: self.tags,
            created_at: now,
            updated_at: now,
        }
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// One prepared answer to a potential interview question.
///
/// Values are immutable; every change produces a new `Question` with a
/// refreshed `updated_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    id: QuestionId,
    #[serde(rename = "questionText")]
    text: String,
    body: QuestionBody,
    #[serde(default)]
    mastered: bool,
    #[serde(default)]
    flagged: bool,
    #[serde(default)]
    confidence: Option<Confidence>,
    #[serde(default)]
    tags: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Question {
    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn body(&self) -> &QuestionBody {
        &self.body
    }

    #[must_use]
    pub fn kind(&self) -> QuestionKind {
        self.body.kind()
    }

    #[must_use]
    pub fn category(&self) -> &str {
        self.body.category()
    }

    #[must_use]
    pub fn principle(&self) -> Option<LeadershipPrinciple> {
        match &self.body {
            QuestionBody::StructuredPrinciple { principle, .. } => Some(*principle),
            QuestionBody::Freestyle { .. } => None,
        }
    }

    #[must_use]
    pub fn starl(&self) -> Option<&Starl> {
        match &self.body {
            QuestionBody::StructuredPrinciple { answer, .. } => Some(answer),
            QuestionBody::Freestyle { .. } => None,
        }
    }

    #[must_use]
    pub fn freestyle_answer(&self) -> Option<&str> {
        match &self.body {
            QuestionBody::Freestyle { answer, .. } => Some(answer),
            QuestionBody::StructuredPrinciple { .. } => None,
        }
    }

    #[must_use]
    pub fn is_mastered(&self) -> bool {
        self.mastered
    }

    #[must_use]
    pub fn is_flagged(&self) -> bool {
        self.flagged
    }

    #[must_use]
    pub fn confidence(&self) -> Option<Confidence> {
        self.confidence
    }

    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replace every editable field, keeping identity and creation time.
    #[must_use]
    pub fn revise(&self, validated: ValidatedQuestion, now: DateTime<Utc>) -> Question {
        let mut next = validated.assign_id(self.id, self.created_at);
        next.updated_at = now;
        next
    }

    #[must_use]
    pub fn with_mastered_toggled(&self, now: DateTime<Utc>) -> Question {
        Question {
            mastered: !self.mastered,
            updated_at: now,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_flag_toggled(&self, now: DateTime<Utc>) -> Question {
        Question {
            flagged: !self.flagged,
            updated_at: now,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_confidence(&self, confidence: Option<Confidence>, now: DateTime<Utc>) -> Question {
        Question {
            confidence,
            updated_at: now,
            ..self.clone()
        }
    }

    /// Swap the answer while keeping the category.
    #[must_use]
    pub fn with_starl_answer(&self, starl: Starl, now: DateTime<Utc>) -> Option<Question> {
        let QuestionBody::StructuredPrinciple { principle, .. } = &self.body else {
            return None;
        };
        Some(Question {
            body: QuestionBody::StructuredPrinciple {
                principle: *principle,
                answer: starl,
            },
            updated_at: now,
            ..self.clone()
        })
    }

    #[must_use]
    pub fn with_freestyle_answer(
        &self,
        answer: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Option<Question> {
        let QuestionBody::Freestyle { category, .. } = &self.body else {
            return None;
        };
        Some(Question {
            body: QuestionBody::Freestyle {
                category: category.clone(),
                answer: answer.into(),
            },
            updated_at: now,
            ..self.clone()
        })
    }

    /// Lightweight snapshot used by panel history.
    #[must_use]
    pub fn to_ref(&self) -> QuestionRef {
        QuestionRef {
            id: self.id,
            question_text: self.text.clone(),
            kind: self.kind(),
            category: self.category().to_string(),
        }
    }

    /// Case-insensitive substring match over text, category, answer and tags.
    /// An empty (or whitespace) term matches everything.
    #[must_use]
    pub fn matches_search(&self, term: &str) -> bool {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        let hit = |s: &str| s.to_lowercase().contains(&needle);

        if hit(self.text.as_str()) || hit(self.category()) {
            return true;
        }
        let in_answer = match &self.body {
            QuestionBody::StructuredPrinciple { answer, .. } => answer.fields().any(|(_, v)| hit(v)),
            QuestionBody::Freestyle { answer, .. } => hit(answer.as_str()),
        };
        in_answer || self.tags.iter().any(|t| hit(t.as_str()))
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
