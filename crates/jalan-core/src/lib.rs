//! Core of the jalan guided-mentorship engine.
//!
//! Turns a stated goal and learner profile into a structured roadmap via a
//! generative model backend, degrades gracefully when that backend is
//! unavailable, and advances milestone state as the user progresses. The
//! durable collection lives in the companion `jalan-store` crate; this
//! crate owns everything between the model wire and the store.

pub mod backend;
pub mod chat;
pub mod config;
pub mod identity;
pub mod notify;
pub mod roadmap;

pub use backend::{
    FallbackPolicy, GenerationOptions, ModelBackend, ModelClient, ModelError, PromptMessage,
    PromptRole,
};
pub use chat::{ChatMessage, ChatRole, ChatService};
pub use config::ModelConfig;
pub use identity::{IdentityProvider, StoredIdentity, UserIdentity};
pub use notify::{NoopSink, Notification, NotificationSink, Severity, TracingSink};
pub use roadmap::{
    GenerateError, LearnerProfile, RoadmapGenerator, RoadmapService, ServiceError,
    ValidationError,
};
