use std::sync::Arc;

use serde::de::DeserializeOwned;

use prep_core::model::{AppSettings, AppSettingsDraft, Preferences, Theme, TypeFilter, View};
use storage::keys;
use storage::repository::{KeyValueStore, StorageError, load, save};

use crate::error::PreferencesError;

/// Loads and saves user preferences and AI settings, each under its own key.
#[derive(Clone)]
pub struct PreferencesService {
    store: Arc<dyn KeyValueStore>,
}

impl PreferencesService {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Read all preferences. Missing or unreadable values fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns `PreferencesError::Storage` if the store itself cannot be reached.
    pub async fn load(&self) -> Result<Preferences, PreferencesError> {
        Ok(Preferences {
            theme: self.load_or_default(keys::THEME).await?,
            view: self.load_or_default(keys::ACTIVE_VIEW).await?,
            type_filter: self.load_or_default(keys::TYPE_FILTER).await?,
        })
    }

    /// # Errors
    ///
    /// Returns `PreferencesError::Storage` if the write fails.
    pub async fn save_theme(&self, theme: Theme) -> Result<(), PreferencesError> {
        save(self.store.as_ref(), keys::THEME, &theme).await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `PreferencesError::Storage` if the write fails.
    pub async fn save_view(&self, view: View) -> Result<(), PreferencesError> {
        save(self.store.as_ref(), keys::ACTIVE_VIEW, &view).await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `PreferencesError::Storage` if the write fails.
    pub async fn save_type_filter(&self, filter: TypeFilter) -> Result<(), PreferencesError> {
        save(self.store.as_ref(), keys::TYPE_FILTER, &filter).await?;
        Ok(())
    }

    /// Load persisted AI settings (or defaults if missing).
    ///
    /// # Errors
    ///
    /// Returns `PreferencesError::Storage` on storage failures.
    pub async fn app_settings(&self) -> Result<AppSettings, PreferencesError> {
        let settings = load(self.store.as_ref(), keys::APP_SETTINGS).await?;
        Ok(settings.unwrap_or_default())
    }

    /// Validate and persist new AI settings.
    ///
    /// # Errors
    ///
    /// Returns `PreferencesError` if validation fails or persistence fails.
    pub async fn save_app_settings(
        &self,
        draft: AppSettingsDraft,
    ) -> Result<AppSettings, PreferencesError> {
        let settings = draft.validate()?;
        save(self.store.as_ref(), keys::APP_SETTINGS, &settings).await?;
        Ok(settings)
    }

    async fn load_or_default<T>(&self, key: &str) -> Result<T, PreferencesError>
    where
        T: DeserializeOwned + Default,
    {
        match load(self.store.as_ref(), key).await {
            Ok(value) => Ok(value.unwrap_or_default()),
            Err(StorageError::Serialization(reason)) => {
                tracing::warn!(key, %reason, "unreadable preference, using default");
                Ok(T::default())
            }
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;
    use storage::repository::InMemoryStore;

    fn service() -> (Arc<InMemoryStore>, PreferencesService) {
        let store = Arc::new(InMemoryStore::new());
        let service = PreferencesService::new(store.clone());
        (store, service)
    }

    #[tokio::test]
    async fn defaults_when_nothing_stored() {
        let (_, prefs) = service();
        assert_eq!(prefs.load().await.unwrap(), Preferences::default());
        assert_eq!(prefs.app_settings().await.unwrap(), AppSettings::default());
    }

    #[tokio::test]
    async fn each_preference_has_its_own_key() {
        let (store, prefs) = service();
        prefs.save_theme(Theme::Dark).await.unwrap();
        prefs.save_type_filter(TypeFilter::Freestyle).await.unwrap();

        assert_eq!(store.get(keys::THEME).await.unwrap(), Some(json!("dark")));
        assert_eq!(
            store.get(keys::TYPE_FILTER).await.unwrap(),
            Some(json!("freestyle"))
        );
        assert!(store.get(keys::ACTIVE_VIEW).await.unwrap().is_none());

        let loaded = prefs.load().await.unwrap();
        assert_eq!(loaded.theme, Theme::Dark);
        assert_eq!(loaded.type_filter, TypeFilter::Freestyle);
        assert_eq!(loaded.view, View::default());
    }

    #[tokio::test]
    async fn malformed_preference_falls_back_to_default() {
        let (store, prefs) = service();
        store.set(keys::THEME, json!("purple")).await.unwrap();
        store.set(keys::ACTIVE_VIEW, json!("flashcards")).await.unwrap();

        let loaded = prefs.load().await.unwrap();
        assert_eq!(loaded.theme, Theme::Light);
        assert_eq!(loaded.view, View::Flashcards);
    }

    #[tokio::test]
    async fn app_settings_round_trip_through_validation() {
        let (_, prefs) = service();
        let saved = prefs
            .save_app_settings(AppSettingsDraft {
                api_key: Some(" key ".into()),
                api_model: None,
                api_base_url: Some("http://localhost:1234/v1".into()),
                ai_system_prompt: None,
            })
            .await
            .unwrap();
        assert_eq!(saved.api_key(), Some("key"));
        assert_eq!(prefs.app_settings().await.unwrap(), saved);

        let err = prefs
            .save_app_settings(AppSettingsDraft {
                api_base_url: Some("not a url".into()),
                ..AppSettingsDraft::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, PreferencesError::Settings(_)));
    }
}
