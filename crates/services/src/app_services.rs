use std::sync::Arc;

use storage::repository::Storage;

use crate::Clock;
use crate::error::AppServicesError;
use crate::panel::{PanelConfig, PanelHistory, PanelService};
use crate::preferences::PreferencesService;
use crate::question_bank::QuestionBank;
use crate::random::{RandomSource, SystemRandom};
use crate::refinement::{HttpRefinementClient, RefinementClient, RefinementConfig, RefinementService};

/// Assembles app-facing services over one store.
#[derive(Clone)]
pub struct AppServices {
    questions: Arc<QuestionBank>,
    history: Arc<PanelHistory>,
    panels: Arc<PanelService>,
    preferences: PreferencesService,
    refinement: Arc<RefinementService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// The refinement client is configured from stored AI settings with
    /// `PREP_AI_*` environment variables taking precedence.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization or the initial
    /// loads fail.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        config: PanelConfig,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        let settings = PreferencesService::new(Arc::clone(&storage.kv))
            .app_settings()
            .await?;
        let client = Arc::new(HttpRefinementClient::new(RefinementConfig::resolve(
            &settings,
        )));
        Self::with_storage(storage, clock, config, client, Box::new(SystemRandom::new())).await
    }

    /// Build services over any store with explicit collaborators.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the stored questions or history cannot be loaded.
    pub async fn with_storage(
        storage: Storage,
        clock: Clock,
        config: PanelConfig,
        client: Arc<dyn RefinementClient>,
        rng: Box<dyn RandomSource>,
    ) -> Result<Self, AppServicesError> {
        let questions = Arc::new(QuestionBank::load(clock, Arc::clone(&storage.kv)).await?);
        let history = Arc::new(PanelHistory::load(Arc::clone(&storage.kv)).await?);
        let preferences = PreferencesService::new(Arc::clone(&storage.kv));
        let panels = Arc::new(
            PanelService::new(clock, config, Arc::clone(&questions), Arc::clone(&history))
                .with_random(rng),
        );
        let refinement = Arc::new(RefinementService::new(
            Arc::clone(&questions),
            preferences.clone(),
            client,
        ));

        Ok(Self {
            questions,
            history,
            panels,
            preferences,
            refinement,
        })
    }

    #[must_use]
    pub fn questions(&self) -> Arc<QuestionBank> {
        Arc::clone(&self.questions)
    }

    #[must_use]
    pub fn history(&self) -> Arc<PanelHistory> {
        Arc::clone(&self.history)
    }

    #[must_use]
    pub fn panels(&self) -> Arc<PanelService> {
        Arc::clone(&self.panels)
    }

    #[must_use]
    pub fn preferences(&self) -> PreferencesService {
        self.preferences.clone()
    }

    #[must_use]
    pub fn refinement(&self) -> Arc<RefinementService> {
        Arc::clone(&self.refinement)
    }
}
