use prep_core::model::QuestionId;

/// Handle for one refinement request. Only the latest ticket is tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RefinementState {
    #[default]
    Idle,
    Pending {
        question: QuestionId,
    },
    Succeeded {
        question: QuestionId,
        suggestion: String,
    },
    Failed {
        question: QuestionId,
        reason: String,
    },
}

/// Tracks at most one refinement request.
///
/// Starting a new request supersedes the previous one. The superseded request
/// is not aborted; its result is simply ignored when it arrives.
#[derive(Debug, Default)]
pub struct RefinementTracker {
    issued: u64,
    current: Option<(Ticket, QuestionId)>,
    state: RefinementState,
}

impl RefinementTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, question: QuestionId) -> Ticket {
        self.issued += 1;
        let ticket = Ticket(self.issued);
        if matches!(self.state, RefinementState::Pending { .. }) {
            tracing::debug!(?ticket, "superseding pending refinement");
        }
        self.current = Some((ticket, question));
        self.state = RefinementState::Pending { question };
        ticket
    }

    /// Record the outcome for `ticket`. Returns `false` if the ticket was superseded.
    pub fn finish(&mut self, ticket: Ticket, outcome: Result<String, String>) -> bool {
        let Some((current, question)) = self.current else {
            return false;
        };
        if current != ticket {
            tracing::debug!(?ticket, "dropping superseded refinement result");
            return false;
        }
        self.current = None;
        self.state = match outcome {
            Ok(suggestion) => RefinementState::Succeeded {
                question,
                suggestion,
            },
            Err(reason) => RefinementState::Failed { question, reason },
        };
        true
    }

    /// Fail without a request ever being sent (for example, missing configuration).
    pub fn fail_now(&mut self, question: QuestionId, reason: impl Into<String>) {
        self.current = None;
        self.state = RefinementState::Failed {
            question,
            reason: reason.into(),
        };
    }

    pub fn reset(&mut self) {
        self.current = None;
        self.state = RefinementState::Idle;
    }

    #[must_use]
    pub fn state(&self) -> &RefinementState {
        &self.state
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self.state, RefinementState::Pending { .. })
    }
}
