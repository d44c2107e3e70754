//! REST client for the generative model API.
//!
//! Wraps a `generateContent`-style endpoint (Google AI Studio wire format)
//! using [`reqwest`]. The client sends a plain-text prompt and returns the
//! concatenated text of the first candidate.

use std::time::Duration;

use serde::Deserialize;

/// Default API base URL when `GENAI_API_URL` is unset.
const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model when `GENAI_MODEL` is unset.
const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// HTTP request timeout for a single generation call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Connection settings for the model API.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Base URL, e.g. `https://generativelanguage.googleapis.com/v1beta`.
    pub api_url: String,
    /// API key, passed as the `key` query parameter.
    pub api_key: String,
    /// Model identifier, e.g. `gemini-1.5-flash`.
    pub model: String,
}

impl ModelConfig {
    /// Read the configuration from the environment.
    ///
    /// Returns `None` when `GENAI_API_KEY` is unset or empty, which disables
    /// the AI endpoints. `GENAI_API_URL` and `GENAI_MODEL` have defaults.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("GENAI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())?;
        let api_url =
            std::env::var("GENAI_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let model = std::env::var("GENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Some(Self {
            api_url,
            api_key,
            model,
        })
    }
}

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Errors from the model API layer.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The model API returned a non-2xx status code.
    #[error("Model API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The response parsed but contained no usable text.
    #[error("Model returned an empty response")]
    Empty,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// HTTP client for the generative model API.
pub struct ModelClient {
    client: reqwest::Client,
    config: ModelConfig,
}

impl ModelClient {
    /// Create a new client with a pre-configured HTTP client.
    pub fn new(config: ModelConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self { client, config }
    }

    /// The configured model identifier.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Send a prompt and return the generated text.
    ///
    /// Sends `POST /models/{model}:generateContent` with the prompt as a
    /// single user part and returns the first candidate's text.
    pub async fn generate_text(&self, prompt: &str) -> Result<String, ModelError> {
        let body = serde_json::json!({
            "contents": [{
                "parts": [{ "text": prompt }],
            }],
        });
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.config.api_url, self.config.model, self.config.api_key
        );

        let response = self.client.post(url).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ModelError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response.json().await?;
        extract_text(&parsed).ok_or(ModelError::Empty)
    }
}

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// Concatenated text of the first candidate, or `None` when there is none.
fn extract_text(response: &GenerateResponse) -> Option<String> {
    let content = response.candidates.first()?.content.as_ref()?;
    let text: String = content
        .parts
        .iter()
        .filter_map(|part| part.text.as_deref())
        .collect();
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(value: serde_json::Value) -> GenerateResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn extracts_first_candidate_text() {
        let response = parse(serde_json::json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{ "text": "Hello from the model" }],
                },
                "finishReason": "STOP",
            }],
        }));
        assert_eq!(
            extract_text(&response).as_deref(),
            Some("Hello from the model")
        );
    }

    #[test]
    fn concatenates_multiple_parts() {
        let response = parse(serde_json::json!({
            "candidates": [{
                "content": {
                    "parts": [{ "text": "one " }, { "text": "two" }],
                },
            }],
        }));
        assert_eq!(extract_text(&response).as_deref(), Some("one two"));
    }

    #[test]
    fn no_candidates_yields_none() {
        let response = parse(serde_json::json!({ "candidates": [] }));
        assert!(extract_text(&response).is_none());

        let response = parse(serde_json::json!({}));
        assert!(extract_text(&response).is_none());
    }

    #[test]
    fn whitespace_only_text_yields_none() {
        let response = parse(serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": "  \n" }] } }],
        }));
        assert!(extract_text(&response).is_none());
    }

    #[test]
    fn model_error_display() {
        let err = ModelError::Api {
            status: 429,
            body: "quota exceeded".to_string(),
        };
        assert_eq!(err.to_string(), "Model API error (429): quota exceeded");
        assert_eq!(
            ModelError::Empty.to_string(),
            "Model returned an empty response"
        );
    }
}
