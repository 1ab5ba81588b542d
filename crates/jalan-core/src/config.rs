use std::env;

/// Generation configuration for the model backend.
///
/// Reads from `JALAN_*` environment variables, falling back to compile-time
/// defaults. A missing API key puts the client into offline mode rather than
/// failing construction, so the rest of the system stays usable without
/// live backend access.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Model identifier sent to the backend.
    pub model: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
    /// Response language tag, `id` or `en`.
    pub language: String,
    /// Playful tone for generated prompts.
    pub playful: bool,
    /// Backend API key. `None` means offline mode.
    pub api_key: Option<String>,
    /// Force offline synthesis even when an API key is present.
    pub offline: bool,
}

impl ModelConfig {
    pub const DEFAULT_MODEL: &str = "gemini-pro-1.5";
    pub const DEFAULT_TEMPERATURE: f32 = 0.7;
    pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 1024;
    pub const DEFAULT_LANGUAGE: &str = "id";

    /// Build a config from the environment.
    ///
    /// Recognized variables: `JALAN_GEMINI_API_KEY`, `JALAN_MODEL`,
    /// `JALAN_OFFLINE` (`1`/`true`), `JALAN_PLAYFUL` (`1`/`true`).
    pub fn from_env() -> Self {
        Self {
            model: env::var("JALAN_MODEL").unwrap_or_else(|_| Self::DEFAULT_MODEL.to_owned()),
            temperature: Self::DEFAULT_TEMPERATURE,
            max_output_tokens: Self::DEFAULT_MAX_OUTPUT_TOKENS,
            language: Self::DEFAULT_LANGUAGE.to_owned(),
            playful: flag_set(env::var("JALAN_PLAYFUL").ok().as_deref()),
            api_key: env::var("JALAN_GEMINI_API_KEY").ok().filter(|k| !k.is_empty()),
            offline: flag_set(env::var("JALAN_OFFLINE").ok().as_deref()),
        }
    }

    /// Whether completions should come from offline synthesis only.
    pub fn is_offline(&self) -> bool {
        self.offline || self.api_key.is_none()
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model: Self::DEFAULT_MODEL.to_owned(),
            temperature: Self::DEFAULT_TEMPERATURE,
            max_output_tokens: Self::DEFAULT_MAX_OUTPUT_TOKENS,
            language: Self::DEFAULT_LANGUAGE.to_owned(),
            playful: false,
            api_key: None,
            offline: false,
        }
    }
}

fn flag_set(value: Option<&str>) -> bool {
    matches!(value, Some("1") | Some("true"))
}
