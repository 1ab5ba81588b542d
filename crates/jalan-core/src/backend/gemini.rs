//! Gemini REST backend.
//!
//! Talks directly to the `generateContent` endpoint. Only the failure
//! taxonomy in [`ModelError`] is a hard contract; the request/response
//! shapes here are provider-specific.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use super::trait_def::{GenerationOptions, ModelBackend, ModelError, PromptMessage, PromptRole};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Backend implementation over the Gemini HTTP API.
#[derive(Clone)]
pub struct GeminiBackend {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiBackend {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: BASE_URL.to_owned(),
        }
    }

    /// Override the endpoint base, for tests and proxies.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/{model}:generateContent?key={key}",
            self.base_url,
            key = self.api_key
        )
    }
}

#[async_trait]
impl ModelBackend for GeminiBackend {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(
        &self,
        messages: &[PromptMessage],
        options: &GenerationOptions,
    ) -> Result<String, ModelError> {
        let request = GenerateContentRequest::from_prompt(messages, options);

        let response = self
            .client
            .post(self.endpoint(&options.model))
            .json(&request)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status_error(status, &body));
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|err| {
            ModelError::Backend {
                status: None,
                message: format!("malformed response body: {err}"),
            }
        })?;

        extract_text(parsed)
    }
}

/// Transport-level failures come first in the classification order: a
/// connect or timeout failure means no network path to the backend.
fn classify_transport_error(err: reqwest::Error) -> ModelError {
    if err.is_connect() || err.is_timeout() {
        ModelError::NoConnectivity {
            message: err.to_string(),
        }
    } else {
        ModelError::Backend {
            status: None,
            message: err.to_string(),
        }
    }
}

fn classify_status_error(status: StatusCode, body: &str) -> ModelError {
    let message = error_message(body);
    if status == StatusCode::TOO_MANY_REQUESTS {
        ModelError::RateLimited { message }
    } else {
        ModelError::Backend {
            status: Some(status.as_u16()),
            message,
        }
    }
}

/// Pull the human-readable message out of a Gemini error body, falling back
/// to the raw body text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorWrapper>(body)
        .ok()
        .and_then(|wrapper| wrapper.error.message)
        .unwrap_or_else(|| body.to_owned())
}

fn extract_text(response: GenerateContentResponse) -> Result<String, ModelError> {
    response
        .candidates
        .and_then(|mut candidates| {
            if candidates.is_empty() {
                None
            } else {
                Some(candidates.remove(0))
            }
        })
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().find_map(|part| part.text))
        .ok_or_else(|| ModelError::Backend {
            status: None,
            message: "response contained no candidate text".to_owned(),
        })
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

impl GenerateContentRequest {
    fn from_prompt(messages: &[PromptMessage], options: &GenerationOptions) -> Self {
        Self {
            contents: messages
                .iter()
                .map(|m| Content {
                    role: match m.role {
                        PromptRole::User => "user",
                        PromptRole::Model => "model",
                    },
                    parts: vec![Part {
                        text: m.text.clone(),
                    }],
                })
                .collect(),
            generation_config: GenerationConfig {
                temperature: options.temperature,
                max_output_tokens: options.max_output_tokens,
            },
        }
    }
}

#[derive(Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_uses_gemini_field_names() {
        let messages = vec![PromptMessage::user("halo")];
        let options = GenerationOptions {
            model: "gemini-pro-1.5".to_owned(),
            temperature: 0.7,
            max_output_tokens: 1024,
        };
        let request = GenerateContentRequest::from_prompt(&messages, &options);
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["contents"][0]["role"], "user");
        assert_eq!(value["contents"][0]["parts"][0]["text"], "halo");
        assert_eq!(value["generationConfig"]["temperature"], 0.7);
        assert_eq!(value["generationConfig"]["maxOutputTokens"], 1024);
    }

    #[test]
    fn endpoint_embeds_model_and_key() {
        let backend = GeminiBackend::new("secret").with_base_url("http://localhost:9999/models");
        assert_eq!(
            backend.endpoint("gemini-pro-1.5"),
            "http://localhost:9999/models/gemini-pro-1.5:generateContent?key=secret"
        );
    }

    #[test]
    fn rate_limit_status_classifies_as_rate_limited() {
        let err = classify_status_error(StatusCode::TOO_MANY_REQUESTS, "{}");
        assert!(matches!(err, ModelError::RateLimited { .. }));
    }

    #[test]
    fn other_statuses_classify_as_backend() {
        let err = classify_status_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"error":{"message":"boom"}}"#,
        );
        assert!(
            matches!(err, ModelError::Backend { status: Some(500), ref message } if message == "boom")
        );
    }

    #[test]
    fn error_message_falls_back_to_raw_body() {
        assert_eq!(error_message("not json"), "not json");
        assert_eq!(error_message(r#"{"error":{"message":"quota"}}"#), "quota");
    }

    #[test]
    fn extract_text_reads_first_candidate() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"jawaban"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_text(response).unwrap(), "jawaban");
    }

    #[test]
    fn extract_text_rejects_empty_candidates() {
        let response: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        let err = extract_text(response).unwrap_err();
        assert!(matches!(err, ModelError::Backend { status: None, .. }));
    }

    #[test]
    fn extract_text_rejects_missing_candidates() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(extract_text(response).is_err());
    }
}
