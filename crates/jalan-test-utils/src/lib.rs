//! Shared test utilities for jalan integration tests.
//!
//! Provides a scripted model backend with call counting and an optional
//! gate for concurrency tests, key-value doubles for persistence-failure
//! scenarios, a recording notification sink, and sample data builders.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{Result, bail};
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Semaphore;

use jalan_core::backend::{GenerationOptions, ModelBackend, ModelError, PromptMessage};
use jalan_core::notify::{Notification, NotificationSink};
use jalan_store::kv::KeyValueStore;
use jalan_store::models::{Milestone, MilestoneStatus, Resource, ResourceKind, Roadmap};

// ---------------------------------------------------------------------------
// Model backend doubles
// ---------------------------------------------------------------------------

/// Backend that replays a queue of canned results and counts calls.
///
/// An optional gate (a zero-permit semaphore) holds every call until the
/// test releases permits, which lets concurrency tests guarantee that
/// requests overlap.
pub struct ScriptedBackend {
    responses: Mutex<VecDeque<Result<String, ModelError>>>,
    calls: AtomicUsize,
    gate: Option<Arc<Semaphore>>,
}

impl ScriptedBackend {
    pub fn new(responses: Vec<Result<String, ModelError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: AtomicUsize::new(0),
            gate: None,
        }
    }

    /// A backend whose single canned reply serves the first call; later
    /// calls report exhaustion, which makes unexpected extra calls loud.
    pub fn replying_once(text: &str) -> Self {
        Self::new(vec![Ok(text.to_owned())])
    }

    /// Hold every call until `gate` receives permits.
    pub fn gated(mut self, gate: Arc<Semaphore>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// How many times `complete` was invoked.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ModelBackend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(
        &self,
        _messages: &[PromptMessage],
        _options: &GenerationOptions,
    ) -> Result<String, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            let permit = gate.acquire().await.expect("gate semaphore closed");
            permit.forget();
        }

        let response = self
            .responses
            .lock()
            .expect("scripted responses poisoned")
            .pop_front();
        response.unwrap_or_else(|| {
            Err(ModelError::Backend {
                status: None,
                message: "scripted backend exhausted".to_owned(),
            })
        })
    }
}

// ---------------------------------------------------------------------------
// Key-value doubles
// ---------------------------------------------------------------------------

/// Key-value store whose writes always fail, for persistence-degradation
/// scenarios. Reads behave as an empty store.
#[derive(Debug, Default)]
pub struct FailingKv;

impl KeyValueStore for FailingKv {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<()> {
        bail!("storage quota exceeded")
    }

    fn remove(&self, _key: &str) -> Result<()> {
        bail!("storage quota exceeded")
    }
}

// ---------------------------------------------------------------------------
// Notification double
// ---------------------------------------------------------------------------

/// Sink that records every notification it receives.
#[derive(Debug, Default)]
pub struct RecordingSink {
    received: Mutex<Vec<Notification>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.received.lock().expect("sink poisoned").clone()
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, notification: Notification) {
        self.received.lock().expect("sink poisoned").push(notification);
    }
}

// ---------------------------------------------------------------------------
// Sample data
// ---------------------------------------------------------------------------

/// A roadmap with `milestones` sequential milestones, the first in
/// progress, with one resource each.
pub fn sample_roadmap(id: &str, milestones: usize) -> Roadmap {
    let now = Utc::now();
    Roadmap {
        id: id.to_owned(),
        title: format!("Roadmap {id}"),
        goal: "Menjadi dokter".to_owned(),
        milestones: (0..milestones)
            .map(|i| Milestone {
                id: Milestone::id_for_index(i),
                title: format!("Milestone {}", i + 1),
                description: "Deskripsi langkah".to_owned(),
                timeframe: "6 Bulan".to_owned(),
                status: if i == 0 {
                    MilestoneStatus::InProgress
                } else {
                    MilestoneStatus::Upcoming
                },
                resources: vec![Resource {
                    title: "Panduan".to_owned(),
                    url: "https://example.com/panduan".to_owned(),
                    kind: ResourceKind::Link,
                }],
            })
            .collect(),
        created_at: now,
        updated_at: now,
    }
}

/// A valid roadmap-draft JSON document for the given goal, in the shape the
/// model is asked to produce.
pub fn sample_draft_json(goal: &str) -> String {
    serde_json::json!({
        "title": format!("Roadmap untuk: {goal}"),
        "goal": goal,
        "milestones": [
            {
                "title": "Langkah Pertama",
                "description": "Mulai dari dasar",
                "timeframe": "3 Bulan",
                "resources": [
                    {"title": "Panduan", "url": "https://example.com", "type": "link"}
                ]
            },
            {
                "title": "Langkah Kedua",
                "description": "Perdalam keterampilan",
                "timeframe": "6 Bulan",
                "resources": []
            },
            {
                "title": "Langkah Ketiga",
                "description": "Terapkan dalam praktik",
                "timeframe": "1 Tahun",
                "resources": []
            }
        ]
    })
    .to_string()
}

// ---------------------------------------------------------------------------
// Invariant checks
// ---------------------------------------------------------------------------

/// Whether the roadmap satisfies the progression invariant: at most one
/// milestone in progress, preceded only by completed milestones and
/// followed only by upcoming ones.
pub fn holds_progression_invariant(roadmap: &Roadmap) -> bool {
    let statuses: Vec<MilestoneStatus> = roadmap.milestones.iter().map(|m| m.status).collect();

    let in_progress = statuses
        .iter()
        .filter(|s| **s == MilestoneStatus::InProgress)
        .count();
    if in_progress > 1 {
        return false;
    }

    match statuses.iter().position(|s| *s == MilestoneStatus::InProgress) {
        Some(active) => {
            statuses[..active]
                .iter()
                .all(|s| *s == MilestoneStatus::Completed)
                && statuses[active + 1..]
                    .iter()
                    .all(|s| *s != MilestoneStatus::InProgress)
        }
        // Fully completed (or not started) is valid as long as nothing is
        // stranded between completed milestones.
        None => true,
    }
}
