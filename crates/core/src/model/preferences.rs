use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::question::QuestionKind;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Top-level screen the user last had open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum View {
    AllQuestions,
    Flashcards,
    #[default]
    Progress,
    InterviewMode,
}

/// Which question kinds a listing shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TypeFilter {
    #[default]
    All,
    StructuredPrinciple,
    Freestyle,
}

impl TypeFilter {
    #[must_use]
    pub fn matches(self, kind: QuestionKind) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::StructuredPrinciple => kind == QuestionKind::StructuredPrinciple,
            TypeFilter::Freestyle => kind == QuestionKind::Freestyle,
        }
    }
}

/// User preferences. Each field is persisted under its own key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Preferences {
    pub theme: Theme,
    pub view: View,
    pub type_filter: TypeFilter,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid {what}: {raw}")]
pub struct ParsePreferenceError {
    what: &'static str,
    raw: String,
}

impl FromStr for Theme {
    type Err = ParsePreferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(ParsePreferenceError {
                what: "theme",
                raw: s.to_string(),
            }),
        }
    }
}

impl FromStr for View {
    type Err = ParsePreferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" | "questions" | "all-questions" => Ok(View::AllQuestions),
            "flashcards" => Ok(View::Flashcards),
            "progress" => Ok(View::Progress),
            "interview" | "interview-mode" => Ok(View::InterviewMode),
            _ => Err(ParsePreferenceError {
                what: "view",
                raw: s.to_string(),
            }),
        }
    }
}

impl FromStr for TypeFilter {
    type Err = ParsePreferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(TypeFilter::All),
            "lp" | "principle" | "starl" => Ok(TypeFilter::StructuredPrinciple),
            "freestyle" => Ok(TypeFilter::Freestyle),
            _ => Err(ParsePreferenceError {
                what: "type filter",
                raw: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        })
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            View::AllQuestions => "All Questions",
            View::Flashcards => "Flashcards",
            View::Progress => "Progress",
            View::InterviewMode => "Interview Mode",
        })
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TypeFilter::All => "All Types",
            TypeFilter::StructuredPrinciple => "LPs",
            TypeFilter::Freestyle => "Freestyle",
        })
    }
}
