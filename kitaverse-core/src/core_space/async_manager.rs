//! Shared, async access to the membership registry
//!
//! Request handlers run concurrently, so the registry lives behind a single
//! `RwLock`. Mutations hold the write guard for the whole check-then-update
//! sequence, which makes a capacity check and the seat it grants atomic with
//! respect to every other mutation. Reads share the read guard and return
//! cloned snapshots.

use super::manager::{MembershipChange, MembershipError, MembershipManager, RegistryStats};
use super::manager_impl::SpaceRegistry;
use super::space::Space;
use super::types::{EntryPolicy, SpaceId, UserId};
use super::user::{User, UserProfile};
use crate::metrics;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Cloneable handle to the registry
#[derive(Debug, Clone)]
pub struct SpaceService {
    registry: Arc<RwLock<SpaceRegistry>>,
}

impl SpaceService {
    /// Wrap an existing registry
    pub fn new(registry: SpaceRegistry) -> Self {
        Self {
            registry: Arc::new(RwLock::new(registry)),
        }
    }

    /// Create a service over the default seed Spaces
    pub fn seeded(policy: EntryPolicy) -> Self {
        Self::new(SpaceRegistry::seeded(policy))
    }

    /// Publish the current occupancy of every Space as gauges
    pub async fn publish_occupancy(&self) {
        let registry = self.registry.read().await;
        for space in registry.list_spaces() {
            metrics::record_occupancy(space.id, space.occupant_count);
        }
    }

    pub async fn policy(&self) -> EntryPolicy {
        self.registry.read().await.policy()
    }

    /// List all Spaces, ordered by id
    pub async fn list_spaces(&self) -> Vec<Space> {
        let registry = self.registry.read().await;
        registry.list_spaces()
    }

    /// Get a Space by ID
    pub async fn get_space(&self, space_id: SpaceId) -> Result<Space, MembershipError> {
        let registry = self.registry.read().await;
        registry.get_space(space_id)
    }

    /// Enter a Space
    pub async fn enter_space(
        &self,
        space_id: SpaceId,
        profile: UserProfile,
    ) -> Result<MembershipChange, MembershipError> {
        let user_id = profile.id;
        let started = Instant::now();
        let mut registry = self.registry.write().await;
        metrics::record_lock_wait(started.elapsed());

        let previous = registry.get_user(user_id).and_then(|user| user.space_id);
        match registry.enter_space(space_id, profile) {
            Ok(change) => {
                metrics::record_enter(&change.space);
                if registry.policy() == EntryPolicy::Transfer {
                    if let Some(previous) = previous.filter(|id| *id != space_id) {
                        if let Ok(left) = registry.get_space(previous) {
                            metrics::record_occupancy(left.id, left.occupant_count);
                        }
                    }
                }
                info!(
                    space_id = %space_id,
                    user_id = %user_id,
                    occupants = change.space.occupant_count,
                    capacity = change.space.capacity,
                    "User {} entered {}",
                    change.user.name,
                    change.space.name
                );
                Ok(change)
            }
            Err(err) => {
                metrics::record_enter_rejected(err.kind());
                warn!(space_id = %space_id, user_id = %user_id, error = %err, "enter rejected");
                Err(err)
            }
        }
    }

    /// Leave a Space
    pub async fn leave_space(
        &self,
        space_id: SpaceId,
        user_id: UserId,
    ) -> Result<MembershipChange, MembershipError> {
        let started = Instant::now();
        let mut registry = self.registry.write().await;
        metrics::record_lock_wait(started.elapsed());

        match registry.leave_space(space_id, user_id) {
            Ok(change) => {
                metrics::record_leave(&change.space);
                info!(
                    space_id = %space_id,
                    user_id = %user_id,
                    occupants = change.space.occupant_count,
                    "User {} left {}",
                    change.user.name,
                    change.space.name
                );
                Ok(change)
            }
            Err(err) => {
                metrics::record_leave_rejected(err.kind());
                warn!(space_id = %space_id, user_id = %user_id, error = %err, "leave rejected");
                Err(err)
            }
        }
    }

    /// List the users currently in a Space
    pub async fn list_occupants(&self, space_id: SpaceId) -> Result<Vec<User>, MembershipError> {
        let registry = self.registry.read().await;
        registry.list_occupants(space_id)
    }

    /// Registry-wide totals
    pub async fn stats(&self) -> RegistryStats {
        let registry = self.registry.read().await;
        registry.stats()
    }
}

impl Default for SpaceService {
    fn default() -> Self {
        Self::new(SpaceRegistry::default())
    }
}
