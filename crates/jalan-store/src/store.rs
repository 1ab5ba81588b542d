//! The roadmap store: insertion-ordered collection, active-roadmap selection,
//! and durability.
//!
//! Two invariants live here:
//! - the store never drops back to zero roadmaps once one exists (deleting
//!   the sole remaining roadmap is rejected);
//! - whenever the store is non-empty, exactly one roadmap is active, and
//!   deleting the active one reassigns to the first in store order.
//!
//! Every mutation persists the full collection and the active-id pointer
//! before returning. Persistence failure does not roll the mutation back:
//! the in-memory state keeps the change and the caller receives a
//! [`PersistenceWarning`] alongside the result.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;

use crate::config::{ACTIVE_ROADMAP_KEY, ROADMAPS_KEY};
use crate::kv::KeyValueStore;
use crate::models::Roadmap;

/// Errors from store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("roadmap {0:?} not found")]
    NotFound(String),

    #[error("the last remaining roadmap cannot be deleted")]
    LastRoadmap,
}

/// Advisory raised when durable persistence failed but the in-memory state
/// already reflects the change.
#[derive(Debug, Clone, Error)]
#[error("persistence degraded: {message}")]
pub struct PersistenceWarning {
    pub message: String,
}

impl PersistenceWarning {
    fn new(context: &str, err: &anyhow::Error) -> Self {
        Self {
            message: format!("{context}: {err:#}"),
        }
    }
}

/// Result of a store mutation: the primary value plus an optional
/// persistence advisory.
#[must_use]
#[derive(Debug)]
pub struct Mutation<T> {
    pub value: T,
    pub warning: Option<PersistenceWarning>,
}

impl<T> Mutation<T> {
    fn clean(value: T) -> Self {
        Self {
            value,
            warning: None,
        }
    }
}

/// Owner of the durable roadmap collection.
pub struct RoadmapStore {
    kv: Arc<dyn KeyValueStore>,
    roadmaps: Vec<Roadmap>,
    active_id: Option<String>,
}

impl RoadmapStore {
    /// Load the store from persistence.
    ///
    /// A first run (no prior keys) yields an empty store. Malformed prior
    /// content or an unreadable backend also yields an empty store, with a
    /// [`PersistenceWarning`] instead of a failure.
    pub fn open(kv: Arc<dyn KeyValueStore>) -> Mutation<Self> {
        let mut warning = None;

        let roadmaps: Vec<Roadmap> = match kv.get(ROADMAPS_KEY) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(parsed) => parsed,
                Err(err) => {
                    tracing::warn!(error = %err, "stored roadmap collection is malformed, starting empty");
                    warning = Some(PersistenceWarning {
                        message: format!("stored roadmap collection is malformed: {err}"),
                    });
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(err) => {
                tracing::warn!(error = %err, "failed to read stored roadmaps, starting empty");
                warning = Some(PersistenceWarning::new("failed to read stored roadmaps", &err));
                Vec::new()
            }
        };

        let stored_active = match kv.get(ACTIVE_ROADMAP_KEY) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(error = %err, "failed to read active roadmap id");
                warning = warning
                    .or_else(|| Some(PersistenceWarning::new("failed to read active roadmap id", &err)));
                None
            }
        };

        // A stored id that no longer resolves falls back to the first
        // roadmap, keeping the one-active invariant.
        let active_id = stored_active
            .filter(|id| roadmaps.iter().any(|r| &r.id == id))
            .or_else(|| roadmaps.first().map(|r| r.id.clone()));

        Mutation {
            value: Self {
                kv,
                roadmaps,
                active_id,
            },
            warning,
        }
    }

    /// All roadmaps in insertion order.
    pub fn list(&self) -> &[Roadmap] {
        &self.roadmaps
    }

    pub fn len(&self) -> usize {
        self.roadmaps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roadmaps.is_empty()
    }

    /// Look up a roadmap by id.
    pub fn get(&self, id: &str) -> Option<&Roadmap> {
        self.roadmaps.iter().find(|r| r.id == id)
    }

    /// The currently active roadmap, if the store is non-empty.
    pub fn active(&self) -> Option<&Roadmap> {
        self.active_id.as_deref().and_then(|id| self.get(id))
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    /// Select the active roadmap. Unknown ids are a silent no-op; callers
    /// are expected to have validated existence via [`Self::list`].
    pub fn set_active(&mut self, id: &str) -> Mutation<()> {
        if !self.roadmaps.iter().any(|r| r.id == id) {
            tracing::debug!(roadmap_id = %id, "ignoring set_active for unknown roadmap");
            return Mutation::clean(());
        }
        self.active_id = Some(id.to_owned());
        Mutation {
            value: (),
            warning: self.persist(),
        }
    }

    /// Append a roadmap, make it active, and persist.
    pub fn insert(&mut self, roadmap: Roadmap) -> Mutation<Roadmap> {
        tracing::info!(roadmap_id = %roadmap.id, title = %roadmap.title, "inserting roadmap");
        self.active_id = Some(roadmap.id.clone());
        self.roadmaps.push(roadmap.clone());
        Mutation {
            value: roadmap,
            warning: self.persist(),
        }
    }

    /// Replace a roadmap by id, refreshing `updated_at`, and persist.
    pub fn update(&mut self, mut roadmap: Roadmap) -> Result<Mutation<Roadmap>, StoreError> {
        let slot = self
            .roadmaps
            .iter_mut()
            .find(|r| r.id == roadmap.id)
            .ok_or_else(|| StoreError::NotFound(roadmap.id.clone()))?;
        roadmap.updated_at = Utc::now();
        *slot = roadmap.clone();
        Ok(Mutation {
            value: roadmap,
            warning: self.persist(),
        })
    }

    /// Remove a roadmap.
    ///
    /// The sole remaining roadmap cannot be removed. Deleting the active
    /// roadmap reassigns active to the first remaining one.
    pub fn delete(&mut self, id: &str) -> Result<Mutation<()>, StoreError> {
        let index = self
            .roadmaps
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_owned()))?;

        if self.roadmaps.len() == 1 {
            return Err(StoreError::LastRoadmap);
        }

        self.roadmaps.remove(index);
        if self.active_id.as_deref() == Some(id) {
            self.active_id = self.roadmaps.first().map(|r| r.id.clone());
            tracing::info!(
                roadmap_id = %id,
                new_active = ?self.active_id,
                "deleted active roadmap, reassigned"
            );
        } else {
            tracing::info!(roadmap_id = %id, "deleted roadmap");
        }

        Ok(Mutation {
            value: (),
            warning: self.persist(),
        })
    }

    /// Serialize the collection and active pointer to the backend.
    ///
    /// Returns an advisory on failure; never rolls back memory.
    fn persist(&self) -> Option<PersistenceWarning> {
        let payload = match serde_json::to_string(&self.roadmaps) {
            Ok(payload) => payload,
            Err(err) => {
                // Roadmaps are plain data; serialization cannot realistically
                // fail, but the contract is advisory either way.
                tracing::warn!(error = %err, "failed to serialize roadmap collection");
                return Some(PersistenceWarning {
                    message: format!("failed to serialize roadmap collection: {err}"),
                });
            }
        };

        if let Err(err) = self.kv.set(ROADMAPS_KEY, &payload) {
            tracing::warn!(error = %err, "failed to persist roadmap collection");
            return Some(PersistenceWarning::new(
                "failed to persist roadmap collection",
                &err,
            ));
        }

        let result = match &self.active_id {
            Some(id) => self.kv.set(ACTIVE_ROADMAP_KEY, id),
            None => self.kv.remove(ACTIVE_ROADMAP_KEY),
        };
        if let Err(err) = result {
            tracing::warn!(error = %err, "failed to persist active roadmap id");
            return Some(PersistenceWarning::new(
                "failed to persist active roadmap id",
                &err,
            ));
        }

        None
    }
}
