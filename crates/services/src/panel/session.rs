use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};

use prep_core::model::{PanelRecordId, PanelSessionRecord, Question, QuestionRef};
use prep_core::time::{format_mm_ss, remaining_until};

use crate::error::SessionError;
use crate::practice::Notes;

/// Knobs for a panel run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelConfig {
    pub duration_minutes: u32,
    pub tick_interval: StdDuration,
}

impl PanelConfig {
    /// A panel needs a positive length and a positive tick interval.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidConfig` naming the offending field.
    pub fn validate(&self) -> Result<(), SessionError> {
        if self.duration_minutes == 0 {
            return Err(SessionError::InvalidConfig("duration must be at least one minute"));
        }
        if self.tick_interval.is_zero() {
            return Err(SessionError::InvalidConfig("tick interval must be positive"));
        }
        Ok(())
    }
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            duration_minutes: 30,
            tick_interval: StdDuration::from_secs(1),
        }
    }
}

/// Why an active panel stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    Timeout,
    EndedEarly,
}

/// Result of one timer tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Idle,
    Running { remaining_secs: u64 },
    Expired,
}

/// A panel in progress.
#[derive(Debug, Clone)]
pub struct ActivePanel {
    questions: Vec<Question>,
    current: usize,
    started_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
    notes: Notes,
}

impl ActivePanel {
    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn ends_at(&self) -> DateTime<Utc> {
        self.ends_at
    }

    #[must_use]
    pub fn notes(&self) -> &Notes {
        &self.notes
    }

    /// Whole seconds left, rounded down and clamped at zero.
    #[must_use]
    pub fn remaining_secs(&self, now: DateTime<Utc>) -> u64 {
        u64::try_from(remaining_until(self.ends_at, now).num_seconds()).unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default)]
pub enum PanelState {
    #[default]
    Idle,
    Active(ActivePanel),
}

/// State machine for one mock panel: `Idle → Active → (record) → Idle`.
///
/// Navigation never touches the deadline. Ending, by timeout or early, is the
/// only way out of `Active` and yields the history record.
#[derive(Debug, Clone, Default)]
pub struct PanelSession {
    config: PanelConfig,
    state: PanelState,
}

impl PanelSession {
    #[must_use]
    pub fn new(config: PanelConfig) -> Self {
        Self {
            config,
            state: PanelState::Idle,
        }
    }

    #[must_use]
    pub fn config(&self) -> PanelConfig {
        self.config
    }

    #[must_use]
    pub fn state(&self) -> &PanelState {
        &self.state
    }

    #[must_use]
    pub fn active(&self) -> Option<&ActivePanel> {
        match &self.state {
            PanelState::Active(panel) => Some(panel),
            PanelState::Idle => None,
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active().is_some()
    }

    /// Begin a panel with already-composed questions. Notes start empty.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadyActive` if a panel is running, or
    /// `SessionError::InvalidConfig` if the panel could never be recorded.
    pub fn start(
        &mut self,
        questions: Vec<Question>,
        now: DateTime<Utc>,
    ) -> Result<&ActivePanel, SessionError> {
        if self.is_active() {
            return Err(SessionError::AlreadyActive);
        }
        self.config.validate()?;
        let ends_at = now + Duration::minutes(i64::from(self.config.duration_minutes));
        tracing::info!(questions = questions.len(), %ends_at, "panel started");
        self.state = PanelState::Active(ActivePanel {
            questions,
            current: 0,
            started_at: now,
            ends_at,
            notes: Notes::default(),
        });
        match &self.state {
            PanelState::Active(panel) => Ok(panel),
            PanelState::Idle => Err(SessionError::NotActive),
        }
    }

    /// Recompute remaining time.
    #[must_use]
    pub fn tick(&self, now: DateTime<Utc>) -> Tick {
        match self.active() {
            None => Tick::Idle,
            Some(panel) => match panel.remaining_secs(now) {
                0 => Tick::Expired,
                remaining_secs => Tick::Running { remaining_secs },
            },
        }
    }

    /// Remaining time as `MM:SS`, if a panel is running.
    #[must_use]
    pub fn remaining_display(&self, now: DateTime<Utc>) -> Option<String> {
        self.active()
            .map(|panel| format_mm_ss(panel.remaining_secs(now)))
    }

    /// Move to the next question, wrapping at the end.
    pub fn next(&mut self) -> Option<&Question> {
        self.step(|i, n| (i + 1) % n)
    }

    /// Move to the previous question, wrapping at the start.
    pub fn prev(&mut self) -> Option<&Question> {
        self.step(|i, n| (i + n - 1) % n)
    }

    fn step(&mut self, advance: impl FnOnce(usize, usize) -> usize) -> Option<&Question> {
        let PanelState::Active(panel) = &mut self.state else {
            return None;
        };
        if panel.questions.is_empty() {
            return None;
        }
        panel.current = advance(panel.current, panel.questions.len());
        panel.questions.get(panel.current)
    }

    /// Attach a note to the current question. Empty text removes it.
    pub fn set_note(&mut self, text: impl Into<String>) {
        if let PanelState::Active(panel) = &mut self.state {
            if let Some(id) = panel.questions.get(panel.current).map(Question::id) {
                panel.notes.set(id, text);
            }
        }
    }

    /// Stop the panel and return its history record.
    ///
    /// Returns `Ok(None)` when nothing was running or no question was selected.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Record` if the configured duration is invalid.
    pub fn end(
        &mut self,
        reason: EndReason,
        now: DateTime<Utc>,
    ) -> Result<Option<PanelSessionRecord>, SessionError> {
        let PanelState::Active(panel) = std::mem::take(&mut self.state) else {
            return Ok(None);
        };
        tracing::info!(?reason, questions = panel.questions.len(), "panel ended");

        if panel.questions.is_empty() {
            return Ok(None);
        }
        let refs: Vec<QuestionRef> = panel.questions.iter().map(Question::to_ref).collect();
        let record = PanelSessionRecord::new(
            PanelRecordId::generate(),
            now,
            refs,
            self.config.duration_minutes,
        )?;
        Ok(Some(record))
    }
}
