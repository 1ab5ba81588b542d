//! Integration tests for the roadmap service: creation, deletion rules,
//! milestone progression over the active roadmap, and notifications.

use std::sync::Arc;

use jalan_core::backend::ModelClient;
use jalan_core::config::ModelConfig;
use jalan_core::notify::Severity;
use jalan_core::roadmap::{LearnerProfile, RoadmapGenerator, RoadmapService, ServiceError};
use jalan_store::kv::{KeyValueStore, MemoryKv};
use jalan_store::models::MilestoneStatus;
use jalan_store::store::{RoadmapStore, StoreError};
use jalan_test_utils::{FailingKv, RecordingSink, holds_progression_invariant};

fn sma_profile() -> LearnerProfile {
    LearnerProfile {
        education_level: Some("sma".to_owned()),
        focus_area: Some("pendidikan".to_owned()),
    }
}

/// Offline service over the given backend, with a recording sink.
fn offline_service(kv: Arc<dyn KeyValueStore>) -> (RoadmapService, Arc<RecordingSink>) {
    let config = ModelConfig::default();
    let client = ModelClient::from_config(&config);
    let generator = RoadmapGenerator::new(client, &config);
    let store = RoadmapStore::open(kv).value;
    let sink = Arc::new(RecordingSink::new());
    (RoadmapService::new(generator, store, sink.clone()), sink)
}

#[tokio::test]
async fn create_stores_and_activates_the_roadmap() {
    let (mut service, sink) = offline_service(Arc::new(MemoryKv::new()));

    let roadmap = service.create("Menjadi dokter", &sma_profile()).await.unwrap();
    assert_eq!(service.list().len(), 1);
    assert_eq!(service.active().map(|r| r.id.as_str()), Some(roadmap.id.as_str()));

    let severities: Vec<Severity> = sink.notifications().iter().map(|n| n.severity).collect();
    assert_eq!(severities, vec![Severity::Success]);
}

#[tokio::test]
async fn create_then_delete_sole_roadmap_is_rejected() {
    let (mut service, sink) = offline_service(Arc::new(MemoryKv::new()));

    let roadmap = service.create("Menjadi dokter", &sma_profile()).await.unwrap();
    let err = service.delete(&roadmap.id).unwrap_err();

    assert!(matches!(err, ServiceError::Store(StoreError::LastRoadmap)));
    assert_eq!(service.list().len(), 1, "the roadmap must remain listed");
    assert!(
        sink.notifications()
            .iter()
            .any(|n| n.severity == Severity::Warning),
        "the rejection must be explained to the user"
    );
}

#[tokio::test]
async fn deleting_the_active_of_two_reassigns_to_first() {
    let (mut service, _sink) = offline_service(Arc::new(MemoryKv::new()));

    let first = service.create("Menjadi dokter", &sma_profile()).await.unwrap();
    let second = service.create("Menjadi penulis", &sma_profile()).await.unwrap();
    assert_eq!(service.active().map(|r| r.id.clone()), Some(second.id.clone()));

    service.delete(&second.id).unwrap();
    assert_eq!(service.active().map(|r| r.id.clone()), Some(first.id));
}

#[tokio::test]
async fn three_milestone_progression_scenario() {
    let (mut service, _sink) = offline_service(Arc::new(MemoryKv::new()));

    // The offline medical preset carries exactly three milestones.
    let roadmap = service.create("Menjadi dokter", &sma_profile()).await.unwrap();
    assert_eq!(roadmap.milestones.len(), 3);

    service.complete_milestone("milestone_1").unwrap();
    let after = service.complete_milestone("milestone_2").unwrap();

    let statuses: Vec<MilestoneStatus> = after.milestones.iter().map(|m| m.status).collect();
    assert_eq!(
        statuses,
        vec![
            MilestoneStatus::Completed,
            MilestoneStatus::Completed,
            MilestoneStatus::InProgress
        ]
    );
}

#[tokio::test]
async fn progression_invariant_holds_across_arbitrary_sequences() {
    let sequences: &[&[&str]] = &[
        &["milestone_1", "milestone_2", "milestone_3"],
        &["milestone_3", "milestone_1"],
        &["milestone_2", "milestone_2", "milestone_1"],
        &["milestone_99", "milestone_1"],
        &["milestone_3", "milestone_2", "milestone_1", "milestone_3"],
    ];

    for sequence in sequences {
        let (mut service, _sink) = offline_service(Arc::new(MemoryKv::new()));
        let _ = service.create("Menjadi dokter", &sma_profile()).await.unwrap();

        for milestone_id in *sequence {
            let after = service.complete_milestone(milestone_id).unwrap();
            assert!(
                holds_progression_invariant(&after),
                "invariant violated after {milestone_id} in {sequence:?}"
            );
        }
    }
}

#[tokio::test]
async fn completing_a_completed_milestone_leaves_updated_at_alone() {
    let (mut service, _sink) = offline_service(Arc::new(MemoryKv::new()));
    let _ = service.create("Menjadi dokter", &sma_profile()).await.unwrap();

    let first = service.complete_milestone("milestone_1").unwrap();
    let again = service.complete_milestone("milestone_1").unwrap();

    assert_eq!(again, first, "repeat completion must be a pure no-op");
    assert_eq!(again.updated_at, first.updated_at);
}

#[tokio::test]
async fn update_replaces_by_id_and_rejects_unknown_ids() {
    let (mut service, _sink) = offline_service(Arc::new(MemoryKv::new()));
    let roadmap = service.create("Menjadi dokter", &sma_profile()).await.unwrap();

    let mut renamed = roadmap.clone();
    renamed.title = "Jalan Menuju Kedokteran".to_owned();
    let updated = service.update(renamed).unwrap();
    assert_eq!(updated.title, "Jalan Menuju Kedokteran");
    assert!(updated.updated_at >= roadmap.updated_at);

    let mut ghost = roadmap;
    ghost.id = "roadmap_ghost".to_owned();
    let err = service.update(ghost).unwrap_err();
    assert!(matches!(err, ServiceError::Store(StoreError::NotFound(_))));
}

#[tokio::test]
async fn complete_milestone_without_roadmaps_is_an_error() {
    let (mut service, _sink) = offline_service(Arc::new(MemoryKv::new()));
    let err = service.complete_milestone("milestone_1").unwrap_err();
    assert!(matches!(err, ServiceError::NoActiveRoadmap));
}

#[tokio::test]
async fn set_active_switches_progression_target() {
    let (mut service, _sink) = offline_service(Arc::new(MemoryKv::new()));

    let first = service.create("Menjadi dokter", &sma_profile()).await.unwrap();
    let _second = service.create("Menjadi penulis", &sma_profile()).await.unwrap();

    service.set_active(&first.id);
    let after = service.complete_milestone("milestone_1").unwrap();
    assert_eq!(after.id, first.id);

    // Unknown ids are a silent no-op.
    service.set_active("roadmap_ghost");
    assert_eq!(service.active().map(|r| r.id.clone()), Some(first.id));
}

#[tokio::test]
async fn persistence_failure_warns_but_the_operation_succeeds() {
    let (mut service, sink) = offline_service(Arc::new(FailingKv));

    let roadmap = service.create("Menjadi dokter", &sma_profile()).await.unwrap();
    assert_eq!(service.list().len(), 1);
    assert_eq!(roadmap.goal, "Menjadi dokter yang kompeten dan berlisensi di Indonesia");

    let notifications = sink.notifications();
    assert!(
        notifications
            .iter()
            .any(|n| n.severity == Severity::Warning && n.title.contains("Penyimpanan")),
        "persistence degradation must be surfaced"
    );
    assert!(
        notifications.iter().any(|n| n.severity == Severity::Success),
        "the primary effect still succeeded"
    );
}

#[tokio::test]
async fn state_survives_service_restart() {
    let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryKv::new());

    let (roadmap_id, completed) = {
        let (mut service, _sink) = offline_service(kv.clone());
        let roadmap = service.create("Menjadi dokter", &sma_profile()).await.unwrap();
        let after = service.complete_milestone("milestone_1").unwrap();
        (roadmap.id, after)
    };

    let (service, _sink) = offline_service(kv);
    let active = service.active().expect("active roadmap must survive restart");
    assert_eq!(active.id, roadmap_id);
    assert_eq!(active, &completed);
}
