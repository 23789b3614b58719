use crate::config::SecurityConfig;
use crate::middleware::AuthUser;

use super::{Resource, ServiceError};

/// How single-record operations treat records owned by someone else.
///
/// Listings are always scoped to the acting user. `Legacy` keeps the
/// historical behaviour of letting any signed-in user open, edit, feed or
/// delete any cat by id, and logs every such access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnershipPolicy {
    Enforce,
    Legacy,
}

impl OwnershipPolicy {
    pub fn from_config(security: &SecurityConfig) -> Self {
        if security.enforce_cat_ownership {
            OwnershipPolicy::Enforce
        } else {
            OwnershipPolicy::Legacy
        }
    }

    /// Records owned by another user read as missing under `Enforce`
    pub fn check<E: Resource>(&self, actor: &AuthUser, record: &E) -> Result<(), ServiceError> {
        match record.owner_id() {
            Some(owner_id) if owner_id != actor.id => match self {
                OwnershipPolicy::Enforce => {
                    tracing::debug!(
                        "{} {} belongs to user {}, hidden from {}",
                        E::NAME,
                        record.id(),
                        owner_id,
                        actor.id
                    );
                    Err(ServiceError::NotFound(format!("{} with ID {} not found", E::NAME, record.id())))
                }
                OwnershipPolicy::Legacy => {
                    tracing::warn!(
                        "User {} accessing {} {} owned by user {}",
                        actor.id,
                        E::NAME,
                        record.id(),
                        owner_id
                    );
                    Ok(())
                }
            },
            _ => Ok(()),
        }
    }
}
