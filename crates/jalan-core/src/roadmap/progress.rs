//! Milestone progression engine.
//!
//! Pure state-transition logic over a roadmap's milestone sequence,
//! enforcing the single-active invariant: among milestones not yet
//! completed, at most one is in progress, preceded only by completed
//! milestones and followed only by upcoming ones.

use chrono::Utc;

use jalan_store::models::{Milestone, MilestoneStatus, Roadmap};

/// Mark a milestone completed and re-derive the remaining statuses.
///
/// Returns a new roadmap value; the input is never mutated, so callers can
/// keep reading the old value while this one is applied. Replaying the same
/// call sequence on the same starting state always yields the same result.
///
/// No-ops (unknown id, already-completed id) return the input unchanged,
/// including `updated_at`. Completing the final milestone leaves no
/// milestone in progress, which is the fully-completed terminal state.
pub fn complete(roadmap: &Roadmap, milestone_id: &str) -> Roadmap {
    let Some(index) = roadmap
        .milestones
        .iter()
        .position(|m| m.id == milestone_id)
    else {
        tracing::debug!(roadmap_id = %roadmap.id, milestone_id = %milestone_id, "unknown milestone, no-op");
        return roadmap.clone();
    };

    if roadmap.milestones[index].status == MilestoneStatus::Completed {
        return roadmap.clone();
    }

    let mut updated = roadmap.clone();
    updated.milestones[index].status = MilestoneStatus::Completed;
    reassign_statuses(&mut updated.milestones);
    updated.updated_at = Utc::now();

    tracing::info!(
        roadmap_id = %updated.id,
        milestone_id = %milestone_id,
        progress = updated.progress_percent(),
        "milestone completed"
    );
    updated
}

/// Re-derive non-completed statuses in sequence order: the first milestone
/// whose predecessors are all completed becomes in-progress, every later
/// non-completed one becomes upcoming.
fn reassign_statuses(milestones: &mut [Milestone]) {
    let mut predecessors_completed = true;
    let mut active_assigned = false;

    for milestone in milestones.iter_mut() {
        if milestone.status == MilestoneStatus::Completed {
            continue;
        }
        if predecessors_completed && !active_assigned {
            milestone.status = MilestoneStatus::InProgress;
            active_assigned = true;
        } else {
            milestone.status = MilestoneStatus::Upcoming;
        }
        predecessors_completed = false;
    }
}
