//! Opaque user identity.
//!
//! The core gates nothing on identity; it only needs to know who the
//! session belongs to when the hosting layer asks. A key-value-backed
//! provider is included so identity survives restarts the same way the
//! roadmap collection does.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use jalan_store::config::USER_KEY;
use jalan_store::kv::KeyValueStore;

/// The signed-in (or guest) user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentity {
    pub id: String,
    pub is_guest: bool,
}

/// Source of the current user identity.
pub trait IdentityProvider: Send + Sync {
    /// The current user, or `None` when signed out.
    fn current_user(&self) -> Option<UserIdentity>;
}

/// Identity persisted in the key-value store under a fixed key.
///
/// Malformed or unreadable stored content reads as signed-out rather than
/// failing.
pub struct StoredIdentity {
    kv: Arc<dyn KeyValueStore>,
}

impl StoredIdentity {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Persist a signed-in user.
    pub fn sign_in(&self, user: &UserIdentity) {
        match serde_json::to_string(user) {
            Ok(payload) => {
                if let Err(err) = self.kv.set(USER_KEY, &payload) {
                    tracing::warn!(error = %err, "failed to persist user identity");
                }
            }
            Err(err) => tracing::warn!(error = %err, "failed to serialize user identity"),
        }
    }

    /// Create and persist a fresh guest identity.
    pub fn sign_in_guest(&self) -> UserIdentity {
        let guest = UserIdentity {
            id: format!("guest_{}", Uuid::new_v4().simple()),
            is_guest: true,
        };
        self.sign_in(&guest);
        guest
    }

    /// Remove the stored identity.
    pub fn sign_out(&self) {
        if let Err(err) = self.kv.remove(USER_KEY) {
            tracing::warn!(error = %err, "failed to remove user identity");
        }
    }
}

impl IdentityProvider for StoredIdentity {
    fn current_user(&self) -> Option<UserIdentity> {
        match self.kv.get(USER_KEY) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(user) => Some(user),
                Err(err) => {
                    tracing::warn!(error = %err, "stored user identity is malformed");
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                tracing::warn!(error = %err, "failed to read user identity");
                None
            }
        }
    }
}
