#![forbid(unsafe_code)]

pub mod app_services;
pub mod confirmation;
pub mod error;
pub mod panel;
pub mod practice;
pub mod preferences;
pub mod question_bank;
pub mod random;
pub mod refinement;
pub mod seed;

pub use prep_core::Clock;

pub use app_services::AppServices;
pub use confirmation::Confirmation;
pub use error::{
    AppServicesError, ComposeError, HistoryError, PreferencesError, QuestionBankError,
    RefinementError, SessionError,
};
pub use panel::{EndReason, PanelConfig, PanelHistory, PanelProgress, PanelService};
pub use preferences::PreferencesService;
pub use question_bank::QuestionBank;
pub use random::{RandomSource, ScriptedRandom, SystemRandom};
pub use refinement::{RefinedAnswer, RefinementService};
