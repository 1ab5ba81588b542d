//! Roadmap service layer.
//!
//! Orchestrates generation, progression, and storage: `create` delegates to
//! the generation service and stores the result as the active roadmap;
//! `complete_milestone` runs the progression engine against the active
//! roadmap and persists the outcome. User-facing advisories go through the
//! notification sink; results and errors are returned to the caller either
//! way.

use std::sync::Arc;

use thiserror::Error;

use jalan_store::models::Roadmap;
use jalan_store::store::{PersistenceWarning, RoadmapStore, StoreError};

use super::LearnerProfile;
use super::generator::{GenerateError, RoadmapGenerator};
use super::progress;
use crate::notify::{Notification, NotificationSink, Severity};

/// Errors from roadmap service operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Generate(#[from] GenerateError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("no active roadmap")]
    NoActiveRoadmap,
}

/// Orchestrator over the generator, the store, and the notification sink.
pub struct RoadmapService {
    generator: RoadmapGenerator,
    store: RoadmapStore,
    notifier: Arc<dyn NotificationSink>,
}

impl RoadmapService {
    pub fn new(
        generator: RoadmapGenerator,
        store: RoadmapStore,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            generator,
            store,
            notifier,
        }
    }

    /// All roadmaps in insertion order.
    pub fn list(&self) -> &[Roadmap] {
        self.store.list()
    }

    /// The currently active roadmap.
    pub fn active(&self) -> Option<&Roadmap> {
        self.store.active()
    }

    /// Generate a roadmap for the goal and store it as the new active one.
    ///
    /// Generation failures leave the store untouched: no partial roadmap is
    /// ever stored.
    pub async fn create(
        &mut self,
        goal: &str,
        profile: &LearnerProfile,
    ) -> Result<Roadmap, ServiceError> {
        let roadmap = match self.generator.generate(goal, profile).await {
            Ok(roadmap) => roadmap,
            Err(err) => {
                tracing::warn!(goal = %goal, error = %err, "roadmap generation failed");
                self.notifier.notify(Notification::new(
                    "Gagal membuat roadmap",
                    "Terjadi kesalahan saat menghubungi AI. Silakan coba lagi.",
                    Severity::Error,
                ));
                return Err(err.into());
            }
        };

        let mutation = self.store.insert(roadmap);
        self.report_warning(mutation.warning.as_ref());
        self.notifier.notify(Notification::new(
            "Roadmap siap",
            format!("Roadmap \"{}\" berhasil dibuat.", mutation.value.title),
            Severity::Success,
        ));
        Ok(mutation.value)
    }

    /// Mark a milestone of the active roadmap completed and persist.
    ///
    /// Unknown milestone ids and already-completed milestones are no-ops
    /// that skip the store entirely, so `updated_at` stays put.
    pub fn complete_milestone(&mut self, milestone_id: &str) -> Result<Roadmap, ServiceError> {
        let active = self.store.active().ok_or(ServiceError::NoActiveRoadmap)?;
        let updated = progress::complete(active, milestone_id);
        if updated == *active {
            return Ok(updated);
        }

        let mutation = self.store.update(updated)?;
        self.report_warning(mutation.warning.as_ref());
        Ok(mutation.value)
    }

    /// Replace a roadmap wholesale and persist.
    pub fn update(&mut self, roadmap: Roadmap) -> Result<Roadmap, ServiceError> {
        let mutation = self.store.update(roadmap)?;
        self.report_warning(mutation.warning.as_ref());
        Ok(mutation.value)
    }

    /// Select the active roadmap. Unknown ids are a silent no-op.
    pub fn set_active(&mut self, id: &str) {
        let mutation = self.store.set_active(id);
        self.report_warning(mutation.warning.as_ref());
    }

    /// Delete a roadmap.
    ///
    /// The sole remaining roadmap is protected: the rejection is reported
    /// as an explanatory notification and returned as an error the caller
    /// can match on.
    pub fn delete(&mut self, id: &str) -> Result<(), ServiceError> {
        match self.store.delete(id) {
            Ok(mutation) => {
                self.report_warning(mutation.warning.as_ref());
                self.notifier.notify(Notification::new(
                    "Roadmap dihapus",
                    "Roadmap berhasil dihapus.",
                    Severity::Info,
                ));
                Ok(())
            }
            Err(StoreError::LastRoadmap) => {
                self.notifier.notify(Notification::new(
                    "Tidak dapat menghapus",
                    "Roadmap terakhir tidak dapat dihapus.",
                    Severity::Warning,
                ));
                Err(StoreError::LastRoadmap.into())
            }
            Err(err) => Err(err.into()),
        }
    }

    fn report_warning(&self, warning: Option<&PersistenceWarning>) {
        if let Some(warning) = warning {
            self.notifier.notify(Notification::new(
                "Penyimpanan bermasalah",
                format!("Perubahan tersimpan sementara di memori. ({warning})"),
                Severity::Warning,
            ));
        }
    }
}
