//! Conversational and motivational generation.
//!
//! The freeform side of the model surface: chat replies grounded in the
//! user's active roadmap, and short motivational one-liners. Errors
//! propagate; the canned degradation strings are exposed for the UI layer
//! to substitute when it chooses to.

use crate::backend::{GenerationOptions, ModelClient, ModelError, PromptMessage};
use crate::config::ModelConfig;
use crate::roadmap::prompt;

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

/// One message of the mentoring conversation.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Freeform generation over the model client.
pub struct ChatService {
    client: ModelClient,
    options: GenerationOptions,
    playful: bool,
}

impl ChatService {
    pub fn new(client: ModelClient, config: &ModelConfig) -> Self {
        Self {
            client,
            options: GenerationOptions::from_config(config),
            playful: config.playful,
        }
    }

    /// Generate a conversational reply.
    ///
    /// When a roadmap goal is supplied, a hidden context message is
    /// prepended so the model can give relevant advice without revealing
    /// the context.
    pub async fn reply(
        &self,
        messages: &[ChatMessage],
        roadmap_goal: Option<&str>,
    ) -> Result<String, ModelError> {
        let prompt_messages = to_prompt_messages(messages, roadmap_goal);
        self.client.complete(&prompt_messages, &self.options).await
    }

    /// Generate a short motivational line for the goal, quotes stripped.
    pub async fn motivation(
        &self,
        roadmap_goal: Option<&str>,
        progress_percent: Option<u8>,
    ) -> Result<String, ModelError> {
        let request = prompt::build_motivation_prompt(roadmap_goal, progress_percent, self.playful);
        let text = self
            .client
            .complete(&[PromptMessage::user(request)], &self.options)
            .await?;
        Ok(text.replace('"', "").trim().to_owned())
    }
}

/// Map the conversation to the backend vocabulary, prepending the hidden
/// roadmap context when present.
fn to_prompt_messages(
    messages: &[ChatMessage],
    roadmap_goal: Option<&str>,
) -> Vec<PromptMessage> {
    let mut prompt_messages = Vec::with_capacity(messages.len() + 1);
    if let Some(goal) = roadmap_goal {
        prompt_messages.push(PromptMessage::user(prompt::build_context_message(goal)));
    }
    prompt_messages.extend(messages.iter().map(|m| match m.role {
        ChatRole::User => PromptMessage::user(m.content.clone()),
        ChatRole::Assistant => PromptMessage::model(m.content.clone()),
    }));
    prompt_messages
}

/// Canned reply when conversation generation is unavailable.
pub fn fallback_reply() -> &'static str {
    "Maaf, saya tidak dapat memproses pesan Anda saat ini. Silakan coba lagi nanti."
}

/// Canned motivational line when generation is unavailable.
pub fn fallback_quote() -> &'static str {
    "Setiap langkah kecil membawamu lebih dekat ke tujuan!"
}
