//! Mastery, confidence, and panel-history statistics.
//!
//! Everything here is a pure function of the current questions and panel
//! history; nothing is cached, so callers recompute on every view.

use chrono::{DateTime, Utc};

use crate::model::{
    Confidence, LeadershipPrinciple, PanelSessionRecord, Question, QuestionKind,
};

/// `round(100 * part / whole)`, or 0 when `whole` is 0.
///
/// Halves round away from zero (62.5 → 63).
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    (100.0 * part as f64 / whole as f64).round() as u32
}

/// Share of mastered questions, as a percentage.
pub fn mastery_percent<'a>(questions: impl IntoIterator<Item = &'a Question>) -> u32 {
    let (mastered, total) = questions
        .into_iter()
        .fold((0, 0), |(m, t), q| (m + usize::from(q.is_mastered()), t + 1));
    percent(mastered, total)
}

/// Average confidence scaled to 0-100. Questions without a confidence level
/// are left out entirely; 0 when none has one.
pub fn confidence_percent<'a>(questions: impl IntoIterator<Item = &'a Question>) -> u32 {
    let (score, rated) = questions
        .into_iter()
        .filter_map(Question::confidence)
        .fold((0_usize, 0_usize), |(s, n), c| {
            (s + c.score() as usize, n + 1)
        });
    percent(score, rated * Confidence::MAX_SCORE as usize)
}

//
// ─── QUESTION PROGRESS ─────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipleProgress {
    pub principle: LeadershipPrinciple,
    pub total: usize,
    pub mastered: usize,
    pub mastery_percent: u32,
    pub confidence_percent: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressReport {
    pub total: usize,
    pub mastered: usize,
    pub mastery_percent: u32,
    pub confidence_percent: u32,
    pub freestyle_total: usize,
    pub freestyle_mastered: usize,
    pub freestyle_mastery_percent: u32,
    /// One row per principle, in canonical order, including empty ones.
    pub principles: Vec<PrincipleProgress>,
}

impl ProgressReport {
    /// Principle rows that have at least one story.
    pub fn practiced_principles(&self) -> impl Iterator<Item = &PrincipleProgress> {
        self.principles.iter().filter(|p| p.total > 0)
    }
}

#[must_use]
pub fn principle_progress(
    questions: &[Question],
    principle: LeadershipPrinciple,
) -> PrincipleProgress {
    let scoped: Vec<&Question> = questions
        .iter()
        .filter(|q| q.principle() == Some(principle))
        .collect();
    let mastered = scoped.iter().filter(|q| q.is_mastered()).count();

    PrincipleProgress {
        principle,
        total: scoped.len(),
        mastered,
        mastery_percent: percent(mastered, scoped.len()),
        confidence_percent: confidence_percent(scoped.iter().copied()),
    }
}

#[must_use]
pub fn progress_report(questions: &[Question]) -> ProgressReport {
    let mastered = questions.iter().filter(|q| q.is_mastered()).count();
    let freestyle: Vec<&Question> = questions
        .iter()
        .filter(|q| q.kind() == QuestionKind::Freestyle)
        .collect();
    let freestyle_mastered = freestyle.iter().filter(|q| q.is_mastered()).count();

    ProgressReport {
        total: questions.len(),
        mastered,
        mastery_percent: percent(mastered, questions.len()),
        confidence_percent: confidence_percent(questions),
        freestyle_total: freestyle.len(),
        freestyle_mastered,
        freestyle_mastery_percent: percent(freestyle_mastered, freestyle.len()),
        principles: LeadershipPrinciple::ALL
            .into_iter()
            .map(|p| principle_progress(questions, p))
            .collect(),
    }
}

//
// ─── PANEL HISTORY KPIS ────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelKpis {
    pub total_sessions: usize,
    pub total_questions: usize,
    pub average_questions_per_session: f64,
    pub principle_questions: usize,
    pub principle_percent: u32,
    pub freestyle_questions: usize,
    pub freestyle_percent: u32,
    pub last_session_at: DateTime<Utc>,
    /// Principle appearances, most frequent first; ties keep first-seen order.
    pub category_frequency: Vec<CategoryCount>,
}

/// KPIs across all recorded panels, or `None` when there is no history.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn panel_kpis(history: &[PanelSessionRecord]) -> Option<PanelKpis> {
    let last_session_at = history.iter().map(PanelSessionRecord::completed_at).max()?;

    let mut total_questions = 0;
    let mut principle_questions = 0;
    let mut frequency: Vec<CategoryCount> = Vec::new();

    for question in history.iter().flat_map(PanelSessionRecord::questions) {
        total_questions += 1;
        if question.kind != QuestionKind::StructuredPrinciple {
            continue;
        }
        principle_questions += 1;
        match frequency.iter_mut().find(|c| c.category == question.category) {
            Some(entry) => entry.count += 1,
            None => frequency.push(CategoryCount {
                category: question.category.clone(),
                count: 1,
            }),
        }
    }

    // stable: equal counts stay in first-seen order
    frequency.sort_by(|a, b| b.count.cmp(&a.count));

    let freestyle_questions = total_questions - principle_questions;
    Some(PanelKpis {
        total_sessions: history.len(),
        total_questions,
        average_questions_per_session: total_questions as f64 / history.len() as f64,
        principle_questions,
        principle_percent: percent(principle_questions, total_questions),
        freestyle_questions,
        freestyle_percent: percent(freestyle_questions, total_questions),
        last_session_at,
        category_frequency: frequency,
    })
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
