//! Store keys. Each key is read and written independently.

pub const QUESTIONS: &str = "interview-questions";
pub const PANEL_HISTORY: &str = "panel-simulation-history";
pub const THEME: &str = "app-theme";
pub const ACTIVE_VIEW: &str = "active-view";
pub const TYPE_FILTER: &str = "question-type-filter";
pub const APP_SETTINGS: &str = "app-settings";
