use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Settings for the answer-refinement service.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    api_key: Option<String>,
    api_model: Option<String>,
    api_base_url: Option<String>,
    ai_system_prompt: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct AppSettingsDraft {
    pub api_key: Option<String>,
    pub api_model: Option<String>,
    pub api_base_url: Option<String>,
    pub ai_system_prompt: Option<String>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AppSettingsError {
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

impl AppSettingsDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and normalize the draft into persisted settings.
    ///
    /// # Errors
    ///
    /// Returns `AppSettingsError` if the base URL is present but invalid.
    pub fn validate(self) -> Result<AppSettings, AppSettingsError> {
        let api_base_url = normalize_optional(self.api_base_url);
        if let Some(url) = api_base_url.as_deref() {
            if Url::parse(url).is_err() {
                return Err(AppSettingsError::InvalidBaseUrl(url.to_string()));
            }
        }

        Ok(AppSettings {
            api_key: normalize_optional(self.api_key),
            api_model: normalize_optional(self.api_model),
            api_base_url,
            ai_system_prompt: normalize_optional(self.ai_system_prompt),
        })
    }
}

impl AppSettings {
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    #[must_use]
    pub fn api_model(&self) -> Option<&str> {
        self.api_model.as_deref()
    }

    #[must_use]
    pub fn api_base_url(&self) -> Option<&str> {
        self.api_base_url.as_deref()
    }

    #[must_use]
    pub fn ai_system_prompt(&self) -> Option<&str> {
        self.ai_system_prompt.as_deref()
    }

    /// Fields set in `overrides` win; unset ones fall back to `self`.
    #[must_use]
    pub fn overlaid_with(&self, overrides: &AppSettings) -> AppSettings {
        AppSettings {
            api_key: overrides.api_key.clone().or_else(|| self.api_key.clone()),
            api_model: overrides.api_model.clone().or_else(|| self.api_model.clone()),
            api_base_url: overrides
                .api_base_url
                .clone()
                .or_else(|| self.api_base_url.clone()),
            ai_system_prompt: overrides
                .ai_system_prompt
                .clone()
                .or_else(|| self.ai_system_prompt.clone()),
        }
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_fields_become_none() {
        let settings = AppSettingsDraft {
            api_key: Some("  ".into()),
            api_model: Some(" gpt-4o-mini ".into()),
            ..AppSettingsDraft::default()
        }
        .validate()
        .unwrap();
        assert_eq!(settings.api_key(), None);
        assert_eq!(settings.api_model(), Some("gpt-4o-mini"));
    }

    #[test]
    fn rejects_malformed_base_url() {
        let err = AppSettingsDraft {
            api_base_url: Some("not a url".into()),
            ..AppSettingsDraft::default()
        }
        .validate()
        .unwrap_err();
        assert!(matches!(err, AppSettingsError::InvalidBaseUrl(_)));
    }

    #[test]
    fn overlay_prefers_override_values() {
        let stored = AppSettingsDraft {
            api_key: Some("stored".into()),
            api_model: Some("stored-model".into()),
            ..AppSettingsDraft::default()
        }
        .validate()
        .unwrap();
        let env = AppSettingsDraft {
            api_key: Some("env".into()),
            ..AppSettingsDraft::default()
        }
        .validate()
        .unwrap();

        let merged = stored.overlaid_with(&env);
        assert_eq!(merged.api_key(), Some("env"));
        assert_eq!(merged.api_model(), Some("stored-model"));
    }
}
