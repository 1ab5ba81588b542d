//! The model client: one backend plus a fallback policy.
//!
//! Connectivity and rate-limit failures are recovered locally by offline
//! synthesis (unless fallback is disabled); other backend errors always
//! propagate. No retries happen here.

use std::sync::Arc;

use super::offline::OfflineLibrary;
use super::trait_def::{GenerationOptions, ModelBackend, ModelError, PromptMessage, PromptRole};
use crate::config::ModelConfig;

/// When offline synthesis substitutes for the live backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackPolicy {
    /// Synthesize on connectivity or rate-limit failures.
    Auto,
    /// Never touch the backend; always synthesize. Offline/development mode.
    Always,
    /// Every failure propagates. Production builds that must not serve
    /// canned content.
    Disabled,
}

/// Client handle over a model backend.
#[derive(Clone)]
pub struct ModelClient {
    backend: Arc<dyn ModelBackend>,
    fallback: FallbackPolicy,
    library: Arc<OfflineLibrary>,
}

impl ModelClient {
    pub fn new(backend: Arc<dyn ModelBackend>, fallback: FallbackPolicy) -> Self {
        Self {
            backend,
            fallback,
            library: Arc::new(OfflineLibrary::embedded()),
        }
    }

    /// Build a client from configuration: a Gemini backend when an API key
    /// is present, and `Always` fallback when offline.
    pub fn from_config(config: &ModelConfig) -> Self {
        let backend: Arc<dyn ModelBackend> = Arc::new(super::gemini::GeminiBackend::new(
            config.api_key.clone().unwrap_or_default(),
        ));
        let fallback = if config.is_offline() {
            FallbackPolicy::Always
        } else {
            FallbackPolicy::Auto
        };
        Self::new(backend, fallback)
    }

    pub fn fallback_policy(&self) -> FallbackPolicy {
        self.fallback
    }

    /// Send a prompt and return the completion text.
    ///
    /// Under `Auto`, `NoConnectivity` and `RateLimited` are absorbed by
    /// offline synthesis keyed on the last user message; `Backend` errors
    /// propagate. Under `Always` the backend is never called.
    pub async fn complete(
        &self,
        messages: &[PromptMessage],
        options: &GenerationOptions,
    ) -> Result<String, ModelError> {
        if self.fallback == FallbackPolicy::Always {
            tracing::debug!(backend = self.backend.name(), "offline mode, synthesizing");
            return Ok(self.synthesize(messages));
        }

        match self.backend.complete(messages, options).await {
            Ok(text) => Ok(text),
            Err(err @ (ModelError::NoConnectivity { .. } | ModelError::RateLimited { .. }))
                if self.fallback == FallbackPolicy::Auto =>
            {
                tracing::warn!(
                    backend = self.backend.name(),
                    error = %err,
                    "backend unavailable, falling back to offline synthesis"
                );
                Ok(self.synthesize(messages))
            }
            Err(err) => Err(err),
        }
    }

    fn synthesize(&self, messages: &[PromptMessage]) -> String {
        let prompt = messages
            .iter()
            .rev()
            .find(|m| m.role == PromptRole::User)
            .map(|m| m.text.as_str())
            .unwrap_or_default();
        self.library.synthesize(prompt)
    }
}
