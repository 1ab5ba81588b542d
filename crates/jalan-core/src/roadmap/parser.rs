//! Model response parser with validation.
//!
//! Parses raw model output into a [`RoadmapJson`] and validates:
//! - syntactically valid JSON after stripping optional code fences;
//! - non-empty title and goal;
//! - at least one milestone, each with non-empty title, description, and
//!   timeframe;
//! - every resource has a title, a url, and a known kind.

use std::str::FromStr;

use jalan_store::models::ResourceKind;
use thiserror::Error;

use super::json_format::RoadmapJson;

/// Errors that can occur while validating a model response.
///
/// Variants are `Clone` (syntax failures carry the rendered message) so a
/// result can be shared across concurrent callers of the generation service.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("response is not valid JSON: {message}")]
    Syntax { message: String },

    #[error("missing or empty field {field:?}")]
    EmptyField { field: &'static str },

    #[error("roadmap must contain at least one milestone")]
    NoMilestones,

    #[error("milestone {index}: missing or empty field {field:?}")]
    EmptyMilestoneField { index: usize, field: &'static str },

    #[error("milestone {index}, resource {resource}: missing or empty field {field:?}")]
    EmptyResourceField {
        index: usize,
        resource: usize,
        field: &'static str,
    },

    #[error(
        "milestone {index}, resource {resource}: invalid kind {value:?} (expected link, video, or document)"
    )]
    InvalidResourceKind {
        index: usize,
        resource: usize,
        value: String,
    },
}

/// Parse and validate raw model output.
///
/// Returns the validated [`RoadmapJson`] or a descriptive error. Pure: the
/// input is never mutated and no partial value escapes.
pub fn parse_roadmap_json(raw: &str) -> Result<RoadmapJson, ValidationError> {
    let cleaned = strip_code_fences(raw);
    let parsed: RoadmapJson =
        serde_json::from_str(&cleaned).map_err(|err| ValidationError::Syntax {
            message: err.to_string(),
        })?;
    validate(&parsed)?;
    Ok(parsed)
}

/// Remove markdown code-fence markers the model may wrap JSON in.
fn strip_code_fences(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "").trim().to_owned()
}

fn validate(roadmap: &RoadmapJson) -> Result<(), ValidationError> {
    if roadmap.title.trim().is_empty() {
        return Err(ValidationError::EmptyField { field: "title" });
    }
    if roadmap.goal.trim().is_empty() {
        return Err(ValidationError::EmptyField { field: "goal" });
    }
    if roadmap.milestones.is_empty() {
        return Err(ValidationError::NoMilestones);
    }

    for (index, milestone) in roadmap.milestones.iter().enumerate() {
        if milestone.title.trim().is_empty() {
            return Err(ValidationError::EmptyMilestoneField {
                index,
                field: "title",
            });
        }
        if milestone.description.trim().is_empty() {
            return Err(ValidationError::EmptyMilestoneField {
                index,
                field: "description",
            });
        }
        if milestone.timeframe.trim().is_empty() {
            return Err(ValidationError::EmptyMilestoneField {
                index,
                field: "timeframe",
            });
        }

        for (r_index, resource) in milestone.resources.iter().enumerate() {
            if resource.title.trim().is_empty() {
                return Err(ValidationError::EmptyResourceField {
                    index,
                    resource: r_index,
                    field: "title",
                });
            }
            if resource.url.trim().is_empty() {
                return Err(ValidationError::EmptyResourceField {
                    index,
                    resource: r_index,
                    field: "url",
                });
            }
            if ResourceKind::from_str(&resource.kind).is_err() {
                return Err(ValidationError::InvalidResourceKind {
                    index,
                    resource: r_index,
                    value: resource.kind.clone(),
                });
            }
        }
    }

    Ok(())
}
