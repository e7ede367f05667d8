mod app_settings;
mod filter;
mod ids;
mod panel;
mod preferences;
mod principle;
mod question;
mod starl;

pub use app_settings::{AppSettings, AppSettingsDraft, AppSettingsError};
pub use filter::QuestionQuery;
pub use ids::{PanelRecordId, ParseIdError, QuestionId};
pub use panel::{PanelRecordError, PanelSessionRecord, QuestionRef};
pub use preferences::{ParsePreferenceError, Preferences, Theme, TypeFilter, View};
pub use principle::{LeadershipPrinciple, UnknownPrincipleError};
pub use question::{
    Confidence, ParseConfidenceError, Question, QuestionBody, QuestionDraft, QuestionError,
    QuestionKind, ValidatedQuestion,
};
pub use starl::{Starl, StarlField};
