use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, mpsc};
use tokio::time::Instant;

use prep_core::model::{PanelSessionRecord, Question};

use super::compose::compose_panel;
use super::history::PanelHistory;
use super::session::{ActivePanel, EndReason, PanelConfig, PanelSession, Tick};
use super::timer::SessionTimer;
use crate::Clock;
use crate::error::SessionError;
use crate::question_bank::QuestionBank;
use crate::random::{RandomSource, SystemRandom};

/// Outcome of a timer tick as seen by callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelProgress {
    Idle,
    Running { remaining_secs: u64 },
    /// Time ran out; the panel has been recorded and the session is idle again.
    TimedOut(Option<PanelSessionRecord>),
}

/// Runs mock panels: compose, count down, record.
pub struct PanelService {
    clock: Clock,
    questions: Arc<QuestionBank>,
    history: Arc<PanelHistory>,
    rng: Mutex<Box<dyn RandomSource>>,
    session: Mutex<PanelSession>,
}

impl PanelService {
    #[must_use]
    pub fn new(
        clock: Clock,
        config: PanelConfig,
        questions: Arc<QuestionBank>,
        history: Arc<PanelHistory>,
    ) -> Self {
        Self {
            clock,
            questions,
            history,
            rng: Mutex::new(Box::new(SystemRandom::new())),
            session: Mutex::new(PanelSession::new(config)),
        }
    }

    #[must_use]
    pub fn with_random(mut self, rng: Box<dyn RandomSource>) -> Self {
        self.rng = Mutex::new(rng);
        self
    }

    #[must_use]
    pub fn history(&self) -> Arc<PanelHistory> {
        Arc::clone(&self.history)
    }

    pub async fn config(&self) -> PanelConfig {
        self.session.lock().await.config()
    }

    /// Compose a panel from the current questions and start the countdown.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Compose` with a user-facing reason when the
    /// question pool is too thin, `SessionError::AlreadyActive`, or
    /// `SessionError::InvalidConfig`.
    pub async fn start(&self) -> Result<ActivePanel, SessionError> {
        let mut session = self.session.lock().await;
        if session.is_active() {
            return Err(SessionError::AlreadyActive);
        }
        session.config().validate()?;
        let pool = self.questions.list().await;
        let selected = {
            let mut rng = self.rng.lock().await;
            compose_panel(&pool, &mut **rng)?
        };
        let panel = session.start(selected, self.clock.now())?;
        Ok(panel.clone())
    }

    /// Spawn the tick source for the running panel.
    pub async fn timer(&self) -> (SessionTimer, mpsc::Receiver<Instant>) {
        SessionTimer::start(self.config().await.tick_interval)
    }

    pub async fn active(&self) -> Option<ActivePanel> {
        self.session.lock().await.active().cloned()
    }

    /// Whole seconds left in the running panel.
    pub async fn remaining_secs(&self) -> Option<u64> {
        self.session
            .lock()
            .await
            .active()
            .map(|panel| panel.remaining_secs(self.clock.now()))
    }

    pub async fn remaining_display(&self) -> Option<String> {
        self.session
            .lock()
            .await
            .remaining_display(self.clock.now())
    }

    /// # Errors
    ///
    /// Returns `SessionError` if recording a timed-out panel fails.
    pub async fn tick(&self) -> Result<PanelProgress, SessionError> {
        self.tick_at(self.clock.now()).await
    }

    /// Recompute remaining time at `now`; finalizes the panel on expiry.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if recording a timed-out panel fails.
    pub async fn tick_at(&self, now: DateTime<Utc>) -> Result<PanelProgress, SessionError> {
        let mut session = self.session.lock().await;
        match session.tick(now) {
            Tick::Idle => Ok(PanelProgress::Idle),
            Tick::Running { remaining_secs } => Ok(PanelProgress::Running { remaining_secs }),
            Tick::Expired => {
                let record = self
                    .finish(&mut session, EndReason::Timeout, now)
                    .await?;
                Ok(PanelProgress::TimedOut(record))
            }
        }
    }

    pub async fn next(&self) -> Option<Question> {
        self.session.lock().await.next().cloned()
    }

    pub async fn prev(&self) -> Option<Question> {
        self.session.lock().await.prev().cloned()
    }

    pub async fn set_note(&self, text: impl Into<String>) {
        self.session.lock().await.set_note(text);
    }

    /// Stop the running panel now and record it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the record cannot be built or stored.
    pub async fn end_early(&self) -> Result<Option<PanelSessionRecord>, SessionError> {
        let mut session = self.session.lock().await;
        self.finish(&mut session, EndReason::EndedEarly, self.clock.now())
            .await
    }

    async fn finish(
        &self,
        session: &mut PanelSession,
        reason: EndReason,
        now: DateTime<Utc>,
    ) -> Result<Option<PanelSessionRecord>, SessionError> {
        let record = session.end(reason, now)?;
        if let Some(record) = &record {
            self.history.append(record.clone()).await?;
        }
        Ok(record)
    }
}
