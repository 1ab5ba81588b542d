//! Durable roadmap storage for the jalan mentorship engine.
//!
//! This crate owns the data model (roadmaps, milestones, resources), the
//! key-value persistence interface with its in-memory and file-backed
//! implementations, and the [`store::RoadmapStore`] that keeps the roadmap
//! collection and active selection consistent across restarts.

pub mod config;
pub mod kv;
pub mod models;
pub mod store;

pub use config::StorageConfig;
pub use kv::{FileKv, KeyValueStore, MemoryKv};
pub use models::{Milestone, MilestoneStatus, Resource, ResourceKind, Roadmap};
pub use store::{Mutation, PersistenceWarning, RoadmapStore, StoreError};
