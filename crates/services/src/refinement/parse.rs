//! Best-effort recovery of STARL sections from refined text.
//!
//! The reply is free text, so this is a heuristic: any line starting with a
//! section name and a colon opens that section, following lines are appended
//! to it, and lines before the first section are dropped. It does not
//! round-trip arbitrary prose.

use prep_core::model::{QuestionKind, Starl, StarlField};

/// A refinement reply, ready to be shown or applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefinedAnswer {
    Structured(Starl),
    Raw(String),
}

impl RefinedAnswer {
    /// Interpret `text` for a question of `kind`. Freestyle replies are always
    /// raw; STARL replies fall back to raw when parsing fails.
    #[must_use]
    pub fn interpret(kind: QuestionKind, text: &str) -> Self {
        match kind {
            QuestionKind::Freestyle => Self::Raw(text.to_string()),
            QuestionKind::StructuredPrinciple => match parse_starl(text) {
                Some(starl) => Self::Structured(starl),
                None => Self::Raw(text.to_string()),
            },
        }
    }
}

/// Parse labelled STARL sections. Returns `None` unless situation, action and
/// result are all present and non-empty.
#[must_use]
pub fn parse_starl(text: &str) -> Option<Starl> {
    // replies sometimes carry escaped newlines
    let normalized = text
        .replace("\\r\\n", "\n")
        .replace("\\n", "\n")
        .replace("\\r", "\n");

    let mut starl = Starl::default();
    let mut seen = [false; StarlField::ALL.len()];
    let mut current: Option<StarlField> = None;

    for line in normalized.split(['\r', '\n']) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some((field, rest)) = match_section(line) {
            starl.set(field, rest);
            seen[field_index(field)] = true;
            current = Some(field);
        } else if let Some(field) = current {
            let joined = format!("{}\n{line}", starl.get(field));
            starl.set(field, joined);
        }
    }

    let required = [StarlField::Situation, StarlField::Action, StarlField::Result];
    required
        .iter()
        .all(|f| seen[field_index(*f)] && !starl.get(*f).is_empty())
        .then_some(starl)
}

fn match_section(line: &str) -> Option<(StarlField, &str)> {
    StarlField::ALL.into_iter().find_map(|field| {
        let key = field.key();
        let prefix = line.get(..key.len())?;
        if !prefix.eq_ignore_ascii_case(key) {
            return None;
        }
        let rest = line[key.len()..].trim_start().strip_prefix(':')?;
        Some((field, rest.trim()))
    })
}

fn field_index(field: StarlField) -> usize {
    StarlField::ALL
        .iter()
        .position(|f| *f == field)
        .unwrap_or_default()
}
