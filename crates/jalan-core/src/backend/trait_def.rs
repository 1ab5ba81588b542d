//! The `ModelBackend` trait -- the adapter interface for generative model
//! providers.
//!
//! Each concrete backend (Gemini HTTP, offline synthesis) implements this
//! trait. The trait is intentionally object-safe so it can be stored as
//! `Arc<dyn ModelBackend>` in [`super::ModelClient`].

use async_trait::async_trait;
use thiserror::Error;

use crate::config::ModelConfig;

/// Role tag on a prompt message, using the backend's vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptRole {
    User,
    Model,
}

/// One role-tagged part of a prompt.
#[derive(Debug, Clone)]
pub struct PromptMessage {
    pub role: PromptRole,
    pub text: String,
}

impl PromptMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: PromptRole::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: PromptRole::Model,
            text: text.into(),
        }
    }
}

/// Options applied to a single completion call.
#[derive(Debug, Clone)]
pub struct GenerationOptions {
    pub model: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl GenerationOptions {
    /// Derive options from the process-wide model configuration.
    pub fn from_config(config: &ModelConfig) -> Self {
        Self {
            model: config.model.clone(),
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
        }
    }
}

/// Completion failures, classified in the order the client checks them:
/// connectivity first, then rate limiting, then everything else.
///
/// Variants carry rendered messages (not source errors) so results can be
/// cloned through the generation service's shared in-flight futures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ModelError {
    /// No network path to the backend (connect or timeout failure).
    #[error("no connectivity to model backend: {message}")]
    NoConnectivity { message: String },

    /// The backend rejected the request with a rate-limit status.
    #[error("model backend rate limit exceeded: {message}")]
    RateLimited { message: String },

    /// Any other non-success status or malformed response.
    #[error("model backend error: {message}")]
    Backend {
        status: Option<u16>,
        message: String,
    },
}

/// Adapter interface for generative model providers.
///
/// # Object Safety
///
/// This trait is object-safe: it can be stored and shared as
/// `Arc<dyn ModelBackend>`.
#[async_trait]
pub trait ModelBackend: Send + Sync {
    /// Human-readable name for this backend (e.g. "gemini").
    fn name(&self) -> &str;

    /// Send a prompt and return the raw completion text.
    ///
    /// Implementations must not mutate shared state and must not retry on
    /// their own; retries are the caller's decision.
    async fn complete(
        &self,
        messages: &[PromptMessage],
        options: &GenerationOptions,
    ) -> Result<String, ModelError>;
}

// Compile-time assertion: ModelBackend must be object-safe.
const _: () = {
    fn _assert_object_safe(_: &dyn ModelBackend) {}
};
