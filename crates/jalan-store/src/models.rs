use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Lifecycle status of a milestone.
///
/// Within a roadmap, at most one milestone is `InProgress`; everything before
/// it in sequence is `Completed` and everything after it is `Upcoming`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MilestoneStatus {
    Upcoming,
    InProgress,
    Completed,
}

impl fmt::Display for MilestoneStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Upcoming => "upcoming",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
        };
        f.write_str(s)
    }
}

impl FromStr for MilestoneStatus {
    type Err = MilestoneStatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upcoming" => Ok(Self::Upcoming),
            "in-progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            other => Err(MilestoneStatusParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`MilestoneStatus`] string.
#[derive(Debug, Clone)]
pub struct MilestoneStatusParseError(pub String);

impl fmt::Display for MilestoneStatusParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid milestone status: {:?}", self.0)
    }
}

impl std::error::Error for MilestoneStatusParseError {}

// ---------------------------------------------------------------------------

/// Kind of a learning resource attached to a milestone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Link,
    Video,
    Document,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Link => "link",
            Self::Video => "video",
            Self::Document => "document",
        };
        f.write_str(s)
    }
}

impl FromStr for ResourceKind {
    type Err = ResourceKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "link" => Ok(Self::Link),
            "video" => Ok(Self::Video),
            "document" => Ok(Self::Document),
            other => Err(ResourceKindParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`ResourceKind`] string.
#[derive(Debug, Clone)]
pub struct ResourceKindParseError(pub String);

impl fmt::Display for ResourceKindParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid resource kind: {:?} (expected link, video, or document)", self.0)
    }
}

impl std::error::Error for ResourceKindParseError {}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A learning resource referenced by a milestone. Immutable once created.
///
/// The wire field for the kind is `type`, matching the persisted format the
/// UI layer has always consumed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub title: String,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: ResourceKind,
}

/// One step of a roadmap.
///
/// Order within the containing `milestones` sequence is the intended
/// chronological order. Only `status` ever mutates, and only through the
/// progression engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    /// Unique within the roadmap, `milestone_<1-based-index>`.
    pub id: String,
    pub title: String,
    pub description: String,
    /// Free-form expected duration, e.g. "6 Bulan".
    pub timeframe: String,
    pub status: MilestoneStatus,
    pub resources: Vec<Resource>,
}

impl Milestone {
    /// Canonical milestone id for a zero-based position in the sequence.
    pub fn id_for_index(index: usize) -> String {
        format!("milestone_{}", index + 1)
    }
}

/// A titled, goal-linked ordered sequence of milestones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Roadmap {
    /// Globally unique, `roadmap_<uuid>`.
    pub id: String,
    pub title: String,
    pub goal: String,
    pub milestones: Vec<Milestone>,
    pub created_at: DateTime<Utc>,
    /// Refreshed on every mutation.
    pub updated_at: DateTime<Utc>,
}

impl Roadmap {
    /// Mint a fresh globally-unique roadmap id.
    pub fn new_id() -> String {
        format!("roadmap_{}", Uuid::new_v4().simple())
    }

    /// Look up a milestone by id.
    pub fn milestone(&self, milestone_id: &str) -> Option<&Milestone> {
        self.milestones.iter().find(|m| m.id == milestone_id)
    }

    /// Share of completed milestones, as a whole percentage.
    ///
    /// An empty roadmap reports 0.
    pub fn progress_percent(&self) -> u8 {
        if self.milestones.is_empty() {
            return 0;
        }
        let completed = self
            .milestones
            .iter()
            .filter(|m| m.status == MilestoneStatus::Completed)
            .count();
        ((completed * 100) / self.milestones.len()) as u8
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
