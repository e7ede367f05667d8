use std::env;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use prep_core::model::{AppSettings, AppSettingsDraft};

use crate::error::RefinementError;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Text-in, text-out suggestion generator.
#[async_trait]
pub trait RefinementClient: Send + Sync {
    fn enabled(&self) -> bool;

    /// Send `prompt` and return the suggestion text.
    ///
    /// # Errors
    ///
    /// Returns `RefinementError` when the client is not configured or the
    /// request fails.
    async fn refine(&self, prompt: &str) -> Result<String, RefinementError>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RefinementConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl RefinementConfig {
    /// Build a config from settings. `None` when no API key is set.
    #[must_use]
    pub fn from_settings(settings: &AppSettings) -> Option<Self> {
        let api_key = settings.api_key()?.to_string();
        Some(Self {
            base_url: settings
                .api_base_url()
                .unwrap_or(DEFAULT_BASE_URL)
                .to_string(),
            api_key,
            model: settings.api_model().unwrap_or(DEFAULT_MODEL).to_string(),
        })
    }

    /// Stored settings with `PREP_AI_*` environment variables on top.
    #[must_use]
    pub fn resolve(stored: &AppSettings) -> Option<Self> {
        Self::from_settings(&stored.overlaid_with(&env_overrides()))
    }
}

/// Settings taken from `PREP_AI_API_KEY`, `PREP_AI_MODEL` and `PREP_AI_BASE_URL`.
#[must_use]
pub fn env_overrides() -> AppSettings {
    let draft = AppSettingsDraft {
        api_key: env::var("PREP_AI_API_KEY").ok(),
        api_model: env::var("PREP_AI_MODEL").ok(),
        api_base_url: env::var("PREP_AI_BASE_URL").ok(),
        ai_system_prompt: None,
    };
    match draft.validate() {
        Ok(settings) => settings,
        Err(err) => {
            tracing::warn!(%err, "ignoring AI settings from environment");
            AppSettings::default()
        }
    }
}

/// OpenAI-compatible chat completions client.
#[derive(Clone)]
pub struct HttpRefinementClient {
    client: Client,
    config: Option<RefinementConfig>,
}

impl HttpRefinementClient {
    #[must_use]
    pub fn new(config: Option<RefinementConfig>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> Option<&RefinementConfig> {
        self.config.as_ref()
    }
}

#[async_trait]
impl RefinementClient for HttpRefinementClient {
    fn enabled(&self) -> bool {
        self.config.is_some()
    }

    async fn refine(&self, prompt: &str) -> Result<String, RefinementError> {
        let config = self.config.as_ref().ok_or(RefinementError::Disabled)?;

        let url = format!("{}/chat/completions", config.base_url.trim_end_matches('/'));
        let payload = ChatRequest {
            model: config.model.clone(),
            messages: vec![ChatMessage {
                role: "user",
                content: prompt.to_string(),
            }],
            temperature: 0.2,
        };

        tracing::debug!(model = %config.model, "sending refinement request");
        let response = self
            .client
            .post(url)
            .bearer_auth(&config.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RefinementError::HttpStatus(response.status()));
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or(RefinementError::EmptyResponse)?;

        Ok(content)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(key: Option<&str>, model: Option<&str>, base: Option<&str>) -> AppSettings {
        AppSettingsDraft {
            api_key: key.map(String::from),
            api_model: model.map(String::from),
            api_base_url: base.map(String::from),
            ai_system_prompt: None,
        }
        .validate()
        .unwrap()
    }

    #[test]
    fn missing_key_disables_refinement() {
        assert!(RefinementConfig::from_settings(&AppSettings::default()).is_none());
        assert!(!HttpRefinementClient::new(None).enabled());
    }

    #[test]
    fn defaults_fill_model_and_base_url() {
        let config = RefinementConfig::from_settings(&settings(Some("k"), None, None)).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.api_key, "k");
    }

    #[test]
    fn stored_values_are_used() {
        let config = RefinementConfig::from_settings(&settings(
            Some("k"),
            Some("local-model"),
            Some("http://localhost:8080/v1"),
        ))
        .unwrap();
        assert_eq!(config.model, "local-model");
        assert_eq!(config.base_url, "http://localhost:8080/v1");
    }

    #[tokio::test]
    async fn disabled_client_refuses_to_send() {
        let client = HttpRefinementClient::new(None);
        assert!(matches!(
            client.refine("hi").await,
            Err(RefinementError::Disabled)
        ));
    }

    #[test]
    fn chat_response_shape_decodes() {
        let body: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"  better  "}}]}"#,
        )
        .unwrap();
        assert_eq!(body.choices[0].message.content.as_deref(), Some("  better  "));
    }
}
