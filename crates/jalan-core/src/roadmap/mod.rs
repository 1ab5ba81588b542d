//! Roadmap generation and progression.
//!
//! Prompt construction, response validation, the cached/deduplicated
//! generation service, the pure progression engine, and the service layer
//! that ties them to the store.

pub mod generator;
pub mod json_format;
pub mod parser;
pub mod progress;
pub mod prompt;
pub mod service;

use serde::{Deserialize, Serialize};

pub use generator::{GenerateError, RoadmapGenerator, fingerprint, materialize};
pub use json_format::{MilestoneJson, ResourceJson, RoadmapJson};
pub use parser::{ValidationError, parse_roadmap_json};
pub use service::{RoadmapService, ServiceError};

/// What the onboarding flow knows about the learner.
///
/// Both fields are optional; absent values fall back to the general
/// (university / practical-skills) prompt context.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearnerProfile {
    pub education_level: Option<String>,
    pub focus_area: Option<String>,
}

impl LearnerProfile {
    /// Build a profile from loosely-typed key-value pairs, as collected by
    /// the onboarding UI. Unknown keys are ignored for forward
    /// compatibility.
    pub fn from_map<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut profile = Self::default();
        for (key, value) in entries {
            match key {
                "educationLevel" => profile.education_level = Some(value.to_owned()),
                "focusArea" => profile.focus_area = Some(value.to_owned()),
                _ => {}
            }
        }
        profile
    }
}
