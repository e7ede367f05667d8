//! Timed mock-panel simulation.

pub mod compose;
pub mod history;
pub mod service;
pub mod session;
pub mod timer;

pub use compose::compose_panel;
pub use history::PanelHistory;
pub use service::{PanelProgress, PanelService};
pub use session::{ActivePanel, EndReason, PanelConfig, PanelSession, PanelState, Tick};
pub use timer::SessionTimer;
