//! AI-assisted answer refinement.

pub mod client;
pub mod parse;
pub mod prompt;
pub mod service;
pub mod tracker;

pub use client::{HttpRefinementClient, RefinementClient, RefinementConfig};
pub use parse::{RefinedAnswer, parse_starl};
pub use prompt::{DEFAULT_PERSONA, build_prompt};
pub use service::{RAW_SUGGESTION_MARKER, RefinementService, apply_suggestion};
pub use tracker::{RefinementState, RefinementTracker, Ticket};
