//! Roadmap generation service.
//!
//! Builds the prompt, calls the model client, validates the response, and
//! materializes the typed roadmap. Results are memoized by request
//! fingerprint for the process lifetime, and concurrent requests with the
//! same fingerprint share a single in-flight call: at most one model call
//! ever happens per key.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::Utc;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use sha2::{Digest, Sha256};
use thiserror::Error;

use jalan_store::models::{Milestone, MilestoneStatus, Resource, Roadmap};

use super::LearnerProfile;
use super::json_format::RoadmapJson;
use super::parser::{self, ValidationError};
use super::prompt;
use crate::backend::{GenerationOptions, ModelClient, ModelError, PromptMessage};
use crate::config::ModelConfig;

/// Errors from the generation service. Clonable so one in-flight result can
/// be delivered to every waiting caller.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GenerateError {
    #[error("model request failed: {0}")]
    Model(#[from] ModelError),

    #[error("model response rejected: {0}")]
    Validation(#[from] ValidationError),
}

type SharedGeneration = Shared<BoxFuture<'static, Result<RoadmapJson, GenerateError>>>;

#[derive(Default)]
struct GeneratorState {
    /// Validated drafts by fingerprint, kept for the process lifetime.
    cache: HashMap<String, RoadmapJson>,
    /// Calls currently on the wire, joined by concurrent duplicates.
    inflight: HashMap<String, SharedGeneration>,
}

/// The roadmap generation service.
pub struct RoadmapGenerator {
    client: ModelClient,
    options: GenerationOptions,
    playful: bool,
    state: Mutex<GeneratorState>,
}

impl RoadmapGenerator {
    pub fn new(client: ModelClient, config: &ModelConfig) -> Self {
        Self {
            client,
            options: GenerationOptions::from_config(config),
            playful: config.playful,
            state: Mutex::new(GeneratorState::default()),
        }
    }

    /// Generate a roadmap for the goal and profile.
    ///
    /// Identical requests within the same run reuse the cached validated
    /// draft without another model call; each call still materializes a
    /// fresh roadmap with its own id and timestamps.
    pub async fn generate(
        &self,
        goal: &str,
        profile: &LearnerProfile,
    ) -> Result<Roadmap, GenerateError> {
        let draft = self.generate_draft(goal, profile).await?;
        Ok(materialize(&draft))
    }

    /// Produce the validated draft for the goal and profile, consulting the
    /// cache and joining any identical in-flight request.
    pub async fn generate_draft(
        &self,
        goal: &str,
        profile: &LearnerProfile,
    ) -> Result<RoadmapJson, GenerateError> {
        let key = fingerprint(goal, profile);

        let shared = {
            let mut state = self.state.lock().expect("generator state poisoned");

            if let Some(cached) = state.cache.get(&key) {
                tracing::debug!(fingerprint = %key, "generation cache hit");
                return Ok(cached.clone());
            }

            match state.inflight.get(&key).cloned() {
                Some(inflight) => {
                    tracing::debug!(fingerprint = %key, "joining in-flight generation");
                    inflight
                }
                None => {
                    let client = self.client.clone();
                    let options = self.options.clone();
                    let request = prompt::build_roadmap_prompt(goal, profile, self.playful);
                    let future: SharedGeneration = async move {
                        let messages = vec![PromptMessage::user(request)];
                        let raw = client.complete(&messages, &options).await?;
                        Ok(parser::parse_roadmap_json(&raw)?)
                    }
                    .boxed()
                    .shared();
                    state.inflight.insert(key.clone(), future.clone());
                    future
                }
            }
        };

        // The lock is released while the call is on the wire.
        let result = shared.await;

        let mut state = self.state.lock().expect("generator state poisoned");
        state.inflight.remove(&key);
        if let Ok(draft) = &result {
            state.cache.insert(key, draft.clone());
        }
        result
    }
}

/// Canonical fingerprint of a generation request, stable regardless of how
/// the profile was originally keyed.
pub fn fingerprint(goal: &str, profile: &LearnerProfile) -> String {
    let canonical = format!(
        "goal={goal}\x1feducation_level={}\x1ffocus_area={}",
        profile.education_level.as_deref().unwrap_or(""),
        profile.focus_area.as_deref().unwrap_or(""),
    );
    hex::encode(Sha256::digest(canonical.as_bytes()))
}

/// Turn a validated draft into a stored roadmap: fresh global id, ordinal
/// milestone ids, first milestone in progress, the rest upcoming.
pub fn materialize(draft: &RoadmapJson) -> Roadmap {
    let now = Utc::now();
    Roadmap {
        id: Roadmap::new_id(),
        title: draft.title.clone(),
        goal: draft.goal.clone(),
        milestones: draft
            .milestones
            .iter()
            .enumerate()
            .map(|(index, m)| Milestone {
                id: Milestone::id_for_index(index),
                title: m.title.clone(),
                description: m.description.clone(),
                timeframe: m.timeframe.clone(),
                status: if index == 0 {
                    MilestoneStatus::InProgress
                } else {
                    MilestoneStatus::Upcoming
                },
                resources: m
                    .resources
                    .iter()
                    .map(|r| Resource {
                        title: r.title.clone(),
                        url: r.url.clone(),
                        kind: r.kind.parse().expect("resource kind was validated"),
                    })
                    .collect(),
            })
            .collect(),
        created_at: now,
        updated_at: now,
    }
}
