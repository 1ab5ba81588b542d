//! Persistence round-trip: a stored collection read back is deep-equal to
//! the original, including across a real file-backed store.

use std::sync::Arc;

use jalan_store::config::{ACTIVE_ROADMAP_KEY, ROADMAPS_KEY};
use jalan_store::kv::{FileKv, KeyValueStore, MemoryKv};
use jalan_store::models::Roadmap;
use jalan_store::store::RoadmapStore;
use jalan_test_utils::sample_roadmap;
use tempfile::TempDir;

#[test]
fn collection_round_trips_deep_equal() {
    let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryKv::new());

    let originals = {
        let mut store = RoadmapStore::open(kv.clone()).value;
        let _ = store.insert(sample_roadmap("roadmap_a", 3));
        let _ = store.insert(sample_roadmap("roadmap_b", 1));
        store.list().to_vec()
    };

    let reopened = RoadmapStore::open(kv).value;
    assert_eq!(reopened.list(), originals.as_slice());
}

#[test]
fn file_backed_round_trip_across_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("storage.json");

    let originals = {
        let kv: Arc<dyn KeyValueStore> = Arc::new(FileKv::new(&path));
        let mut store = RoadmapStore::open(kv).value;
        let first = store.insert(sample_roadmap("roadmap_a", 3));
        assert!(first.warning.is_none());
        let _ = store.insert(sample_roadmap("roadmap_b", 2));
        let _ = store.set_active("roadmap_a");
        store.list().to_vec()
    };

    // A fresh handle over the same file sees identical state.
    let kv: Arc<dyn KeyValueStore> = Arc::new(FileKv::new(&path));
    let store = RoadmapStore::open(kv).value;
    assert_eq!(store.list(), originals.as_slice());
    assert_eq!(store.active_id(), Some("roadmap_a"));
}

#[test]
fn raw_payload_round_trips_through_serde() {
    let kv = MemoryKv::new();
    let original = sample_roadmap("roadmap_a", 4);

    let payload = serde_json::to_string(&vec![original.clone()]).unwrap();
    kv.set(ROADMAPS_KEY, &payload).unwrap();
    kv.set(ACTIVE_ROADMAP_KEY, &original.id).unwrap();

    let raw = kv.get(ROADMAPS_KEY).unwrap().unwrap();
    let decoded: Vec<Roadmap> = serde_json::from_str(&raw).unwrap();
    assert_eq!(decoded, vec![original]);
}

#[test]
fn malformed_prior_content_reads_as_empty_store() {
    let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryKv::new());
    kv.set(ROADMAPS_KEY, "{ definitely not a roadmap list").unwrap();
    kv.set(ACTIVE_ROADMAP_KEY, "roadmap_ghost").unwrap();

    let opened = RoadmapStore::open(kv);
    assert!(opened.warning.is_some());
    assert!(opened.value.is_empty());
    assert!(opened.value.active().is_none());
}
