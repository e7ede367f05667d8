use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use prep_core::model::{Question, QuestionBody, QuestionId};

use super::client::RefinementClient;
use super::parse::RefinedAnswer;
use super::prompt::build_prompt;
use super::tracker::{RefinementState, RefinementTracker};
use crate::error::{QuestionBankError, RefinementError};
use crate::preferences::PreferencesService;
use crate::question_bank::QuestionBank;

/// Separator placed before an unparsed suggestion appended to `learning`.
pub const RAW_SUGGESTION_MARKER: &str = "\n\nAI Suggestion (raw):\n";

/// Requests suggestions for a question's answer and applies them.
pub struct RefinementService {
    questions: Arc<QuestionBank>,
    preferences: PreferencesService,
    client: Arc<dyn RefinementClient>,
    tracker: Mutex<RefinementTracker>,
}

impl RefinementService {
    #[must_use]
    pub fn new(
        questions: Arc<QuestionBank>,
        preferences: PreferencesService,
        client: Arc<dyn RefinementClient>,
    ) -> Self {
        Self {
            questions,
            preferences,
            client,
            tracker: Mutex::new(RefinementTracker::new()),
        }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.client.enabled()
    }

    pub async fn state(&self) -> RefinementState {
        self.tracker.lock().await.state().clone()
    }

    /// Ask for a refined version of the question's answer.
    ///
    /// The tracker is left in `Succeeded` or `Failed`; a newer request started
    /// meanwhile keeps its own state.
    ///
    /// # Errors
    ///
    /// Returns `RefinementError::Disabled` when no API key is configured,
    /// `RefinementError::MissingAnswer` for blank answers, and request errors
    /// from the client.
    pub async fn request(&self, id: QuestionId) -> Result<RefinedAnswer, RefinementError> {
        let question = self
            .questions
            .get(id)
            .await
            .ok_or(QuestionBankError::NotFound(id))?;

        if !self.client.enabled() {
            return Err(self.fail_early(id, RefinementError::Disabled).await);
        }
        let settings = self.preferences.app_settings().await?;
        let prompt = match build_prompt(&question, settings.ai_system_prompt()) {
            Ok(prompt) => prompt,
            Err(err) => return Err(self.fail_early(id, err).await),
        };

        let ticket = self.tracker.lock().await.begin(id);
        tracing::info!(%id, "refinement requested");
        let outcome = self.client.refine(&prompt).await;

        let mut tracker = self.tracker.lock().await;
        match outcome {
            Ok(text) => {
                tracker.finish(ticket, Ok(text.clone()));
                Ok(RefinedAnswer::interpret(question.kind(), &text))
            }
            Err(err) => {
                tracing::warn!(%id, %err, "refinement failed");
                tracker.finish(ticket, Err(err.to_string()));
                Err(err)
            }
        }
    }

    /// Write a suggestion into the question and persist it.
    ///
    /// # Errors
    ///
    /// Returns `RefinementError::Questions` if the question is gone or the
    /// write fails.
    pub async fn apply(
        &self,
        id: QuestionId,
        suggestion: &RefinedAnswer,
    ) -> Result<Question, RefinementError> {
        let updated = self
            .questions
            .modify(id, |current, now| apply_suggestion(current, suggestion, now))
            .await?;
        self.tracker.lock().await.reset();
        Ok(updated)
    }

    async fn fail_early(&self, id: QuestionId, err: RefinementError) -> RefinementError {
        self.tracker.lock().await.fail_now(id, err.to_string());
        err
    }
}

/// Merge a suggestion into a question.
///
/// Freestyle answers are replaced. STARL answers are replaced when the
/// suggestion parsed; otherwise the raw text is appended to `learning`.
#[must_use]
pub fn apply_suggestion(
    question: &Question,
    suggestion: &RefinedAnswer,
    now: DateTime<Utc>,
) -> Question {
    let updated = match (question.body(), suggestion) {
        (QuestionBody::Freestyle { .. }, RefinedAnswer::Raw(text)) => {
            question.with_freestyle_answer(text.clone(), now)
        }
        (QuestionBody::Freestyle { .. }, RefinedAnswer::Structured(starl)) => {
            question.with_freestyle_answer(starl.to_labeled_text(), now)
        }
        (QuestionBody::StructuredPrinciple { .. }, RefinedAnswer::Structured(starl)) => {
            question.with_starl_answer(starl.clone(), now)
        }
        (QuestionBody::StructuredPrinciple { answer, .. }, RefinedAnswer::Raw(text)) => {
            let mut starl = answer.clone();
            starl.learning = format!("{}{RAW_SUGGESTION_MARKER}{text}", starl.learning);
            question.with_starl_answer(starl, now)
        }
    };
    updated.unwrap_or_else(|| question.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use prep_core::model::{LeadershipPrinciple, QuestionDraft, Starl};
    use prep_core::time::fixed_now;
    use prep_core::Clock;
    use storage::keys;
    use storage::repository::{InMemoryStore, KeyValueStore, save};

    struct FakeClient {
        reply: Result<String, String>,
    }

    #[async_trait]
    impl RefinementClient for FakeClient {
        fn enabled(&self) -> bool {
            true
        }

        async fn refine(&self, _prompt: &str) -> Result<String, RefinementError> {
            self.reply.clone().map_err(|_| RefinementError::EmptyResponse)
        }
    }

    struct DisabledClient;

    #[async_trait]
    impl RefinementClient for DisabledClient {
        fn enabled(&self) -> bool {
            false
        }

        async fn refine(&self, _prompt: &str) -> Result<String, RefinementError> {
            Err(RefinementError::Disabled)
        }
    }

    async fn setup(client: Arc<dyn RefinementClient>) -> (RefinementService, Arc<QuestionBank>) {
        let store: Arc<dyn KeyValueStore> = Arc::new(InMemoryStore::new());
        save(store.as_ref(), keys::QUESTIONS, &Vec::<Question>::new())
            .await
            .unwrap();
        let bank = Arc::new(
            QuestionBank::load(Clock::fixed(fixed_now()), Arc::clone(&store))
                .await
                .unwrap(),
        );
        let service = RefinementService::new(
            Arc::clone(&bank),
            PreferencesService::new(store),
            client,
        );
        (service, bank)
    }

    fn starl_draft() -> QuestionDraft {
        QuestionDraft::principle(
            "Q",
            LeadershipPrinciple::DiveDeep,
            Starl::new("s", "t", "a", "r", "learned"),
        )
    }

    #[tokio::test]
    async fn structured_reply_replaces_all_fields() {
        let client = Arc::new(FakeClient {
            reply: Ok("Situation: S2\nTask: T2\nAction: A2\nResult: R2\nLearning: L2".into()),
        });
        let (service, bank) = setup(client).await;
        let q = bank.create(starl_draft()).await.unwrap();

        let suggestion = service.request(q.id()).await.unwrap();
        assert!(matches!(suggestion, RefinedAnswer::Structured(_)));
        assert!(matches!(
            service.state().await,
            RefinementState::Succeeded { .. }
        ));

        let updated = service.apply(q.id(), &suggestion).await.unwrap();
        assert_eq!(updated.starl(), Some(&Starl::new("S2", "T2", "A2", "R2", "L2")));
        assert_eq!(bank.get(q.id()).await, Some(updated));
        assert_eq!(service.state().await, RefinementState::Idle);
    }

    #[tokio::test]
    async fn unparsed_reply_is_appended_to_learning() {
        let client = Arc::new(FakeClient {
            reply: Ok("Lead with the metric.".into()),
        });
        let (service, bank) = setup(client).await;
        let q = bank.create(starl_draft()).await.unwrap();

        let suggestion = service.request(q.id()).await.unwrap();
        let updated = service.apply(q.id(), &suggestion).await.unwrap();
        assert_eq!(
            updated.starl().map(|s| s.learning.as_str()),
            Some("learned\n\nAI Suggestion (raw):\nLead with the metric.")
        );
        assert_eq!(updated.starl().map(|s| s.situation.as_str()), Some("s"));
    }

    #[tokio::test]
    async fn freestyle_reply_replaces_text() {
        let client = Arc::new(FakeClient {
            reply: Ok("Sharper answer.".into()),
        });
        let (service, bank) = setup(client).await;
        let q = bank
            .create(QuestionDraft::freestyle("Why us?", "Fit", "Because."))
            .await
            .unwrap();

        let suggestion = service.request(q.id()).await.unwrap();
        let updated = service.apply(q.id(), &suggestion).await.unwrap();
        assert_eq!(updated.freestyle_answer(), Some("Sharper answer."));
        assert_eq!(updated.category(), "Fit");
    }

    #[tokio::test]
    async fn failures_are_reported_in_state() {
        let client = Arc::new(FakeClient {
            reply: Err("boom".into()),
        });
        let (service, bank) = setup(client).await;
        let q = bank.create(starl_draft()).await.unwrap();

        assert!(service.request(q.id()).await.is_err());
        assert!(matches!(
            service.state().await,
            RefinementState::Failed { .. }
        ));
        assert_eq!(bank.get(q.id()).await, Some(q));
    }

    #[tokio::test]
    async fn disabled_client_and_blank_answer_fail_before_sending() {
        let (service, bank) = setup(Arc::new(DisabledClient)).await;
        let q = bank.create(starl_draft()).await.unwrap();
        assert!(matches!(
            service.request(q.id()).await,
            Err(RefinementError::Disabled)
        ));
        assert!(!service.enabled());

        let client = Arc::new(FakeClient {
            reply: Ok("unused".into()),
        });
        let (service, bank) = setup(client).await;
        let blank = bank
            .create(QuestionDraft::freestyle("Why us?", "Fit", ""))
            .await
            .unwrap();
        assert!(matches!(
            service.request(blank.id()).await,
            Err(RefinementError::MissingAnswer)
        ));
        let RefinementState::Failed { reason, .. } = service.state().await else {
            panic!("expected failure state");
        };
        assert_eq!(reason, "cannot refine: answer is not provided");
    }

    #[test]
    fn structured_suggestion_for_freestyle_uses_labelled_text() {
        let q = QuestionDraft::freestyle("Why us?", "Fit", "old")
            .validate()
            .unwrap()
            .assign_id(QuestionId::generate(), fixed_now());
        let updated = apply_suggestion(
            &q,
            &RefinedAnswer::Structured(Starl::new("s", "", "a", "r", "")),
            fixed_now(),
        );
        assert_eq!(
            updated.freestyle_answer(),
            Some("Situation: s\nTask: \nAction: a\nResult: r\nLearning: ")
        );
    }
}
