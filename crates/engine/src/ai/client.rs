// Codepad - Terminal Code Editor
// Copyright (C) 2024 Zhuo Zhang and Wuqi Zhang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! HTTP client for the text generation endpoint.
//!
//! Two backends are supported: a local Ollama server and Google's Gemini
//! API. Each call sends one prompt and returns the raw reply text. There are
//! no retries; a failure is returned to the caller, which must show it.

use super::prompt::{build_prompt, AiRequest};
use codepad_common::{env::GEMINI_API_KEY, Language, ValidationMarker};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::{fmt, str::FromStr, time::Duration};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Default Ollama base URL.
pub const DEFAULT_OLLAMA_ENDPOINT: &str = "http://localhost:11434";
/// Default Ollama model.
pub const DEFAULT_OLLAMA_MODEL: &str = "deepseek-coder";
/// Default Gemini base URL.
pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
/// Default Gemini model.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
/// Header carrying the Gemini API key.
pub const GEMINI_KEY_HEADER: &str = "x-goog-api-key";

/// Which backend serves the requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    /// Local Ollama server (`/api/generate`)
    #[default]
    Ollama,
    /// Google Gemini (`generateContent`)
    Gemini,
}

impl fmt::Display for AiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ollama => f.write_str("ollama"),
            Self::Gemini => f.write_str("gemini"),
        }
    }
}

impl FromStr for AiProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "gemini" => Ok(Self::Gemini),
            other => Err(format!("unknown AI provider '{other}' (expected ollama or gemini)")),
        }
    }
}

/// Connection settings for the AI endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Backend kind
    pub provider: AiProvider,
    /// Base URL; the provider default when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Model name; the provider default when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Environment variable holding the API key (Gemini only)
    pub api_key_env: String,
    /// API key given directly; takes precedence over `api_key_env`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Request timeout in seconds; `None` waits for as long as it takes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self::for_provider(AiProvider::Ollama)
    }
}

impl AiConfig {
    /// Defaults for `provider`.
    pub fn for_provider(provider: AiProvider) -> Self {
        Self {
            provider,
            endpoint: None,
            model: None,
            api_key_env: GEMINI_API_KEY.to_string(),
            api_key: None,
            timeout_secs: None,
        }
    }

    /// Base URL in effect.
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(match self.provider {
            AiProvider::Ollama => DEFAULT_OLLAMA_ENDPOINT,
            AiProvider::Gemini => DEFAULT_GEMINI_ENDPOINT,
        })
    }

    /// Model name in effect.
    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(match self.provider {
            AiProvider::Ollama => DEFAULT_OLLAMA_MODEL,
            AiProvider::Gemini => DEFAULT_GEMINI_MODEL,
        })
    }

    /// The API key, read from the config or from `api_key_env`.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|key| !key.trim().is_empty())
    }

    fn base_url(&self) -> &str {
        self.endpoint().trim_end_matches('/')
    }
}

/// Failures surfaced by [`AiClient`].
#[derive(Debug, Error)]
pub enum AiError {
    /// The request never produced a response
    #[error("request to AI endpoint failed: {0}")]
    Transport(reqwest::Error),

    /// The endpoint answered with a non-success status
    #[error("AI endpoint returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, possibly empty
        body: String,
    },

    /// The body did not have the expected shape
    #[error("could not decode AI response: {0}")]
    Decode(String),

    /// Gemini needs a key and none was configured
    #[error("no API key configured for {provider}; set {env_var}")]
    MissingApiKey {
        /// Provider that needs the key
        provider: AiProvider,
        /// Variable that was checked
        env_var: String,
    },
}

// Request URLs may carry credentials, so they never reach the message
impl From<reqwest::Error> for AiError {
    fn from(e: reqwest::Error) -> Self {
        AiError::Transport(e.without_url())
    }
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

/// Stateless client for the configured AI endpoint.
#[derive(Debug, Clone)]
pub struct AiClient {
    http: reqwest::Client,
    config: AiConfig,
}

impl AiClient {
    /// Build a client for `config`.
    pub fn new(config: AiConfig) -> Result<Self, AiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build()?;

        info!(
            provider = %config.provider,
            endpoint = config.endpoint(),
            model = config.model(),
            "AI client ready"
        );
        Ok(Self { http, config })
    }

    /// The configuration in use.
    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    /// Ask for a corrected version of `code` that resolves `marker`.
    pub async fn request_fix(
        &self,
        marker: &ValidationMarker,
        code: &str,
        language: Language,
    ) -> Result<String, AiError> {
        self.send(&AiRequest::Fix { marker: marker.clone(), code: code.to_string(), language })
            .await
    }

    /// Ask for new code in `language` from a description.
    pub async fn request_generate(
        &self,
        prompt: &str,
        language: Language,
    ) -> Result<String, AiError> {
        self.send(&AiRequest::Generate { prompt: prompt.to_string(), language }).await
    }

    /// Send `prompt` verbatim.
    pub async fn chat(&self, prompt: &str) -> Result<String, AiError> {
        self.send(&AiRequest::Raw { prompt: prompt.to_string() }).await
    }

    /// Ask a question about `code`.
    pub async fn ask(
        &self,
        question: &str,
        code: &str,
        language: Language,
    ) -> Result<String, AiError> {
        self.send(&AiRequest::Ask {
            question: question.to_string(),
            code: code.to_string(),
            language,
        })
        .await
    }

    /// Ask for a short explanation of `code`.
    pub async fn explain(&self, code: &str, language: Language) -> Result<String, AiError> {
        self.send(&AiRequest::Explain { code: code.to_string(), language }).await
    }

    /// Build the prompt for `request` and send it.
    pub async fn send(&self, request: &AiRequest) -> Result<String, AiError> {
        let prompt = build_prompt(request);
        debug!(kind = request.kind(), prompt_len = prompt.len(), "Sending AI request");

        let result = match self.config.provider {
            AiProvider::Ollama => self.complete_ollama(&prompt).await,
            AiProvider::Gemini => self.complete_gemini(&prompt).await,
        };

        match &result {
            Ok(text) => debug!(kind = request.kind(), reply_len = text.len(), "AI reply received"),
            Err(e) => warn!(kind = request.kind(), error = %e, "AI request failed"),
        }
        result
    }

    async fn complete_ollama(&self, prompt: &str) -> Result<String, AiError> {
        let url = format!("{}/api/generate", self.config.base_url());
        let body = json!({
            "model": self.config.model(),
            "prompt": prompt,
            "stream": false,
        });

        let text = self.post_json(&url, &body, None).await?;
        let parsed: OllamaResponse =
            serde_json::from_str(&text).map_err(|e| AiError::Decode(e.to_string()))?;
        Ok(parsed.response)
    }

    async fn complete_gemini(&self, prompt: &str) -> Result<String, AiError> {
        let key = self.config.resolve_api_key().ok_or_else(|| AiError::MissingApiKey {
            provider: AiProvider::Gemini,
            env_var: self.config.api_key_env.clone(),
        })?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url(),
            self.config.model()
        );
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
        });

        let text = self.post_json(&url, &body, Some(&key)).await?;
        let parsed: GeminiResponse =
            serde_json::from_str(&text).map_err(|e| AiError::Decode(e.to_string()))?;

        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| AiError::Decode("response contained no candidates".to_string()))
    }

    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
        api_key: Option<&str>,
    ) -> Result<String, AiError> {
        let mut request = self.http.post(url).json(body);
        if let Some(key) = api_key {
            request = request.header(GEMINI_KEY_HEADER, key);
        }
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(AiError::Status { status: status.as_u16(), body: text });
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_defaults() {
        let ollama = AiConfig::default();
        assert_eq!(ollama.provider, AiProvider::Ollama);
        assert_eq!(ollama.endpoint(), DEFAULT_OLLAMA_ENDPOINT);
        assert_eq!(ollama.model(), DEFAULT_OLLAMA_MODEL);

        let gemini = AiConfig::for_provider(AiProvider::Gemini);
        assert_eq!(gemini.endpoint(), DEFAULT_GEMINI_ENDPOINT);
        assert_eq!(gemini.model(), DEFAULT_GEMINI_MODEL);
        assert_eq!(gemini.api_key_env, GEMINI_API_KEY);
    }

    #[test]
    fn test_provider_parse() {
        assert_eq!("Gemini".parse::<AiProvider>().unwrap(), AiProvider::Gemini);
        assert_eq!("ollama".parse::<AiProvider>().unwrap(), AiProvider::Ollama);
        assert!("openai".parse::<AiProvider>().is_err());
    }

    #[test]
    fn test_base_url_trims_slash() {
        let config = AiConfig { endpoint: Some("http://host:1/".to_string()), ..Default::default() };
        assert_eq!(config.base_url(), "http://host:1");
    }

    #[test]
    fn test_explicit_key_wins() {
        let config = AiConfig {
            api_key: Some("inline".to_string()),
            api_key_env: "CODEPAD_TEST_UNSET_KEY_VAR".to_string(),
            ..AiConfig::for_provider(AiProvider::Gemini)
        };
        assert_eq!(config.resolve_api_key().as_deref(), Some("inline"));

        let blank = AiConfig { api_key: Some("  ".to_string()), ..config };
        assert_eq!(blank.resolve_api_key(), None);
    }

    #[test]
    fn test_partial_config_uses_provider_defaults() {
        let config: AiConfig = serde_json::from_value(serde_json::json!({
            "provider": "gemini",
            "model": "gemini-pro"
        }))
        .unwrap();
        assert_eq!(config.provider, AiProvider::Gemini);
        assert_eq!(config.model(), "gemini-pro");
        assert_eq!(config.endpoint(), DEFAULT_GEMINI_ENDPOINT);
        assert_eq!(config.timeout_secs, None);
    }
}
