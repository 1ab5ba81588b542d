//! Model backend abstraction: the provider trait, the Gemini HTTP
//! implementation, offline fallback synthesis, and the client that ties a
//! backend to a fallback policy.

pub mod client;
pub mod gemini;
pub mod offline;
pub mod trait_def;

pub use client::{FallbackPolicy, ModelClient};
pub use gemini::GeminiBackend;
pub use offline::OfflineLibrary;
pub use trait_def::{GenerationOptions, ModelBackend, ModelError, PromptMessage, PromptRole};
