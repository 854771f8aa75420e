//! Gemini provider (Google Generative Language API), non-streaming.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{GenerateFuture, GenerationError, TextGenerator};
use crate::engine::config::GenerationConfig;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const BLOCKED_CATEGORIES: [&str; 2] = ["HARM_CATEGORY_HATE_SPEECH", "HARM_CATEGORY_HARASSMENT"];
const BLOCK_THRESHOLD: &str = "BLOCK_LOW_AND_ABOVE";

/// Gemini API configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl GeminiConfig {
    /// Creates a config from the environment.
    ///
    /// Environment variables:
    /// - `GEMINI_API_KEY` (required)
    /// - `GEMINI_BASE_URL` (optional, overrides config.toml)
    pub fn from_env(config: &GenerationConfig) -> Result<Self, GenerationError> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or(GenerationError::MissingApiKey)?;
        let env_url = std::env::var("GEMINI_BASE_URL").ok();
        let base_url = resolve_base_url(env_url.as_deref(), config.base_url.as_deref())?;

        Ok(Self {
            api_key,
            base_url,
            model: config.model.clone(),
            timeout: config.request_timeout,
        })
    }
}

/// Gemini client.
pub struct GeminiClient {
    config: GeminiConfig,
    headers: HeaderMap,
    http: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, GenerationError> {
        let headers = build_headers(&config.api_key)?;
        let mut builder = reqwest::Client::builder();
        if !config.timeout.is_zero() {
            builder = builder.timeout(config.timeout);
        }
        let http = builder
            .build()
            .map_err(|e| GenerationError::Http(e.to_string()))?;
        Ok(Self {
            config,
            headers,
            http,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

impl TextGenerator for GeminiClient {
    fn generate(&self, prompt: String) -> GenerateFuture {
        let http = self.http.clone();
        let url = self.endpoint();
        let headers = self.headers.clone();
        let body = build_request(&prompt);

        Box::pin(async move {
            tracing::debug!(%url, "sending generateContent request");
            let response = http
                .post(&url)
                .headers(headers)
                .json(&body)
                .send()
                .await
                .map_err(classify_reqwest_error)?;

            let status = response.status();
            let text = response.text().await.map_err(classify_reqwest_error)?;
            if !status.is_success() {
                return Err(GenerationError::Status {
                    status: status.as_u16(),
                    body: text,
                });
            }
            extract_text(&text)
        })
    }
}

fn resolve_base_url(
    env_url: Option<&str>,
    config_url: Option<&str>,
) -> Result<String, GenerationError> {
    let chosen = [env_url, config_url]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|url| !url.is_empty());

    match chosen {
        Some(url) => {
            reqwest::Url::parse(url).map_err(|_| GenerationError::InvalidBaseUrl(url.to_string()))?;
            Ok(url.to_string())
        }
        None => Ok(DEFAULT_BASE_URL.to_string()),
    }
}

fn build_headers(api_key: &str) -> Result<HeaderMap, GenerationError> {
    let mut key = HeaderValue::from_str(api_key).map_err(|_| GenerationError::InvalidApiKey)?;
    key.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert("x-goog-api-key", key);
    headers.insert("content-type", HeaderValue::from_static("application/json"));
    Ok(headers)
}

fn build_request(prompt: &str) -> Value {
    let safety_settings: Vec<Value> = BLOCKED_CATEGORIES
        .iter()
        .map(|category| json!({ "category": category, "threshold": BLOCK_THRESHOLD }))
        .collect();

    json!({
        "contents": [{
            "role": "user",
            "parts": [{ "text": prompt }]
        }],
        "safetySettings": safety_settings
    })
}

fn classify_reqwest_error(e: reqwest::Error) -> GenerationError {
    if e.is_timeout() {
        GenerationError::Http(format!("Request timed out: {}", e))
    } else if e.is_connect() {
        GenerationError::Http(format!("Connection failed: {}", e))
    } else {
        GenerationError::Http(format!("Network error: {}", e))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
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

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

/// Pulls the story out of a `generateContent` response body: the text parts
/// of the first candidate, concatenated.
pub fn extract_text(body: &str) -> Result<String, GenerationError> {
    let response: GenerateContentResponse =
        serde_json::from_str(body).map_err(|e| GenerationError::Decode(e.to_string()))?;

    let text: String = response
        .candidates
        .first()
        .and_then(|candidate| candidate.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .filter_map(|part| part.text.as_deref())
                .collect()
        })
        .unwrap_or_default();

    if !text.trim().is_empty() {
        return Ok(text);
    }

    match response.prompt_feedback.and_then(|f| f.block_reason) {
        Some(reason) => Err(GenerationError::Blocked(reason)),
        None => Err(GenerationError::NoText),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_text_joins_parts() {
        let body = r#"{
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{"text": "Once upon "}, {"text": "a time."}]
                },
                "finishReason": "STOP"
            }]
        }"#;
        assert_eq!(extract_text(body).unwrap(), "Once upon a time.");
    }

    #[test]
    fn test_extract_text_uses_first_candidate() {
        let body = r#"{"candidates": [
            {"content": {"parts": [{"text": "first"}]}},
            {"content": {"parts": [{"text": "second"}]}}
        ]}"#;
        assert_eq!(extract_text(body).unwrap(), "first");
    }

    #[test]
    fn test_extract_text_no_candidates() {
        assert_eq!(extract_text("{}"), Err(GenerationError::NoText));
    }

    #[test]
    fn test_extract_text_candidate_without_content() {
        let body = r#"{"candidates": [{"finishReason": "SAFETY"}]}"#;
        assert_eq!(extract_text(body), Err(GenerationError::NoText));
    }

    #[test]
    fn test_extract_text_blocked_prompt() {
        let body = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
        assert_eq!(
            extract_text(body),
            Err(GenerationError::Blocked("SAFETY".to_string()))
        );
    }

    #[test]
    fn test_extract_text_invalid_json() {
        assert!(matches!(
            extract_text("not json"),
            Err(GenerationError::Decode(_))
        ));
    }

    #[test]
    fn test_build_request_shape() {
        let request = build_request("tell me a story");
        assert_eq!(request["contents"][0]["role"], "user");
        assert_eq!(request["contents"][0]["parts"][0]["text"], "tell me a story");

        let settings = request["safetySettings"].as_array().unwrap();
        assert_eq!(settings.len(), 2);
        assert_eq!(settings[0]["category"], "HARM_CATEGORY_HATE_SPEECH");
        assert_eq!(settings[1]["category"], "HARM_CATEGORY_HARASSMENT");
        assert!(settings.iter().all(|s| s["threshold"] == BLOCK_THRESHOLD));
    }

    #[test]
    fn test_resolve_base_url_precedence() {
        assert_eq!(resolve_base_url(None, None).unwrap(), DEFAULT_BASE_URL);
        assert_eq!(
            resolve_base_url(None, Some("http://localhost:8080")).unwrap(),
            "http://localhost:8080"
        );
        assert_eq!(
            resolve_base_url(Some("http://proxy"), Some("http://localhost:8080")).unwrap(),
            "http://proxy"
        );
        assert_eq!(
            resolve_base_url(Some("  "), Some("http://localhost:8080")).unwrap(),
            "http://localhost:8080"
        );
    }

    #[test]
    fn test_resolve_base_url_rejects_garbage() {
        assert_eq!(
            resolve_base_url(None, Some("not a url")),
            Err(GenerationError::InvalidBaseUrl("not a url".to_string()))
        );
    }

    #[test]
    fn test_build_headers_marks_key_sensitive() {
        let headers = build_headers("secret").unwrap();
        assert_eq!(headers["x-goog-api-key"], "secret");
        assert!(headers["x-goog-api-key"].is_sensitive());
    }

    #[test]
    fn test_client_rejects_unusable_api_key() {
        let result = GeminiClient::new(GeminiConfig {
            api_key: "bad\nkey".to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: "gemini-pro".to_string(),
            timeout: Duration::from_secs(5),
        });
        assert!(matches!(result, Err(GenerationError::InvalidApiKey)));
    }

    #[test]
    fn test_endpoint() {
        let client = GeminiClient::new(GeminiConfig {
            api_key: "key".to_string(),
            base_url: "http://localhost:9000/v1beta/".to_string(),
            model: "gemini-pro".to_string(),
            timeout: Duration::from_secs(5),
        })
        .unwrap();
        assert_eq!(
            client.endpoint(),
            "http://localhost:9000/v1beta/models/gemini-pro:generateContent"
        );
    }
}
