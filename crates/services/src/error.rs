//! Shared error types for the services crate.

use thiserror::Error;

use prep_core::model::{AppSettingsError, PanelRecordError, QuestionError, QuestionId};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `QuestionBank`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuestionBankError {
    #[error("question {0} not found")]
    NotFound(QuestionId),
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Reasons a panel could not be composed. The message is shown to the user as-is.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ComposeError {
    #[error(
        "Not enough Freestyle questions. Please add at least 2 Freestyle questions to start a panel simulation."
    )]
    NotEnoughFreestyle { found: usize },
    #[error(
        "Not enough Leadership Principle questions. Please add at least 3 LP questions to start a panel simulation."
    )]
    NotEnoughPrinciple { found: usize },
    #[error(
        "Not enough variety in Leadership Principles. Please ensure your LP questions cover at least 2 different LPs."
    )]
    NotEnoughPrincipleVariety { found: usize },
    #[error(
        "Could not gather 3 LP questions from 2 distinct LPs with current data. Please add more questions or diversify LPs."
    )]
    InsufficientCoverage,
}

/// Errors emitted by the panel session state machine.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("a panel session is already running")]
    AlreadyActive,
    #[error("no panel session is running")]
    NotActive,
    #[error("invalid panel config: {0}")]
    InvalidConfig(&'static str),
    #[error(transparent)]
    Compose(#[from] ComposeError),
    #[error(transparent)]
    Record(#[from] PanelRecordError),
    #[error(transparent)]
    History(#[from] HistoryError),
}

/// Errors emitted by `PanelHistory`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HistoryError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by answer refinement.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RefinementError {
    #[error("API key not configured. AI refinement is unavailable.")]
    Disabled,
    #[error("cannot refine: answer is not provided")]
    MissingAnswer,
    #[error("refinement returned an empty response")]
    EmptyResponse,
    #[error("refinement request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("failed to get suggestion: {0}")]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Questions(#[from] QuestionBankError),
    #[error(transparent)]
    Settings(#[from] PreferencesError),
}

/// Errors emitted while loading or saving preferences and AI settings.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PreferencesError {
    #[error(transparent)]
    Settings(#[from] AppSettingsError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Questions(#[from] QuestionBankError),
    #[error(transparent)]
    History(#[from] HistoryError),
    #[error(transparent)]
    Preferences(#[from] PreferencesError),
}
