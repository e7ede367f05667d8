//! Plain-text views for the terminal.

use std::fmt::Write as _;

use prep_core::model::{PanelSessionRecord, Preferences, Question, QuestionBody, Starl};
use prep_core::progress::{PanelKpis, ProgressReport};
use prep_core::time::format_mm_ss;
use services::panel::ActivePanel;
use services::practice::{CardSide, FlashcardDeck};
use services::RefinedAnswer;

const TIMESTAMP: &str = "%Y-%m-%d %H:%M UTC";

fn marks(question: &Question) -> String {
    let mut marks = Vec::new();
    if question.is_mastered() {
        marks.push("mastered".to_string());
    }
    if question.is_flagged() {
        marks.push("flagged".to_string());
    }
    if let Some(confidence) = question.confidence() {
        marks.push(format!("confidence: {}", confidence.as_str()));
    }
    if marks.is_empty() {
        String::new()
    } else {
        format!(" ({})", marks.join(", "))
    }
}

/// Two-line summary used by `list`.
pub fn question_line(question: &Question) -> String {
    format!(
        "{}  [{}] {}{}\n    {}",
        question.id(),
        question.kind(),
        question.category(),
        marks(question),
        question.text()
    )
}

fn answer_text(body: &QuestionBody) -> String {
    match body {
        QuestionBody::StructuredPrinciple { answer, .. } => starl_text(answer),
        QuestionBody::Freestyle { answer, .. } if answer.trim().is_empty() => {
            "(no answer yet)".to_string()
        }
        QuestionBody::Freestyle { answer, .. } => answer.clone(),
    }
}

fn starl_text(starl: &Starl) -> String {
    starl
        .fields()
        .map(|(field, value)| {
            let value = if value.trim().is_empty() { "-" } else { value };
            format!("{}:\n  {}", field.label(), value.replace('\n', "\n  "))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn question_detail(question: &Question) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", question.text());
    let _ = writeln!(
        out,
        "[{}] {}{}",
        question.kind(),
        question.category(),
        marks(question)
    );
    if !question.tags().is_empty() {
        let _ = writeln!(out, "tags: {}", question.tags().join(", "));
    }
    let _ = writeln!(out, "id: {}", question.id());
    let _ = writeln!(
        out,
        "updated: {}",
        question.updated_at().format(TIMESTAMP)
    );
    out.push('\n');
    out.push_str(&answer_text(question.body()));
    out
}

pub fn progress(report: &ProgressReport, kpis: Option<&PanelKpis>) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Questions: {} ({} mastered, {}%)",
        report.total, report.mastered, report.mastery_percent
    );
    let _ = writeln!(out, "Confidence: {}%", report.confidence_percent);
    let _ = writeln!(
        out,
        "Freestyle: {} ({} mastered, {}%)",
        report.freestyle_total, report.freestyle_mastered, report.freestyle_mastery_percent
    );

    let mut rows = report.practiced_principles().peekable();
    if rows.peek().is_some() {
        let _ = writeln!(out, "\nLeadership principles:");
        for row in rows {
            let _ = writeln!(
                out,
                "  {:<46} {:>2} stories  {:>3}% mastered  {:>3}% confidence",
                row.principle.as_str(),
                row.total,
                row.mastery_percent,
                row.confidence_percent
            );
        }
    }

    out.push('\n');
    match kpis {
        None => {
            let _ = writeln!(out, "No panel simulations yet.");
        }
        Some(kpis) => {
            let _ = writeln!(
                out,
                "Panels: {} sessions, {} questions ({:.1} per session)",
                kpis.total_sessions, kpis.total_questions, kpis.average_questions_per_session
            );
            let _ = writeln!(
                out,
                "  LP {} ({}%), Freestyle {} ({}%)",
                kpis.principle_questions,
                kpis.principle_percent,
                kpis.freestyle_questions,
                kpis.freestyle_percent
            );
            let _ = writeln!(
                out,
                "  last session: {}",
                kpis.last_session_at.format(TIMESTAMP)
            );
            for entry in &kpis.category_frequency {
                let _ = writeln!(out, "  {:<46} {:>3}x", entry.category, entry.count);
            }
        }
    }
    out
}

pub fn history_entry(record: &PanelSessionRecord) -> String {
    let mut out = format!(
        "{}  {} min, {} questions",
        record.completed_at().format(TIMESTAMP),
        record.duration_minutes(),
        record.questions().len()
    );
    for question in record.questions() {
        let _ = write!(
            out,
            "\n    [{}] {}: {}",
            question.kind, question.category, question.question_text
        );
    }
    out
}

pub fn panel_question(panel: &ActivePanel, remaining_secs: u64) -> String {
    let Some(question) = panel.current() else {
        return format!("[{}] no questions", format_mm_ss(remaining_secs));
    };
    let mut out = format!(
        "[{}] Question {}/{}  ({}: {})\n{}",
        format_mm_ss(remaining_secs),
        panel.current_index() + 1,
        panel.questions().len(),
        question.kind(),
        question.category(),
        question.text()
    );
    if let Some(note) = panel.notes().get(question.id()) {
        let _ = write!(out, "\nnotes: {note}");
    }
    out
}

pub fn flashcard(deck: &FlashcardDeck) -> String {
    let Some(question) = deck.current() else {
        return "No cards to show.".to_string();
    };
    let header = format!(
        "Card {}/{}  [{}] {}",
        deck.position() + 1,
        deck.len(),
        question.kind(),
        question.category()
    );
    match deck.side() {
        CardSide::Question => format!("{header}\n{}", question.text()),
        CardSide::Answer => format!("{header}\n{}", answer_text(question.body())),
    }
}

pub fn suggestion(answer: &RefinedAnswer) -> String {
    match answer {
        RefinedAnswer::Structured(starl) => starl_text(starl),
        RefinedAnswer::Raw(text) => text.clone(),
    }
}

pub fn preferences(prefs: &Preferences) -> String {
    format!(
        "theme: {}\nview: {}\ntype filter: {}",
        prefs.theme, prefs.view, prefs.type_filter
    )
}
