//! In-memory membership registry

use super::manager::{MembershipChange, MembershipError, MembershipManager, RegistryStats};
use super::seed::default_spaces;
use super::space::{Space, SpaceError};
use super::types::{EntryPolicy, SpaceId, UserId};
use super::user::{User, UserProfile};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Authoritative registry of Spaces and the users occupying them
///
/// Not synchronised; see [`super::async_manager::SpaceService`] for the
/// shared, lock-guarded wrapper.
#[derive(Debug, Clone, PartialEq)]
pub struct SpaceRegistry {
    spaces: BTreeMap<SpaceId, Space>,
    users: HashMap<UserId, User>,
    policy: EntryPolicy,
}

impl SpaceRegistry {
    /// Create a registry from a provisioning list
    pub fn with_spaces(
        spaces: impl IntoIterator<Item = Space>,
        policy: EntryPolicy,
    ) -> Result<Self, SpaceError> {
        let mut by_id = BTreeMap::new();
        for space in spaces {
            space.validate()?;
            let id = space.id;
            if by_id.insert(id, space).is_some() {
                return Err(SpaceError::DuplicateSpace(id));
            }
        }

        Ok(Self {
            spaces: by_id,
            users: HashMap::new(),
            policy,
        })
    }

    /// Create a registry holding the default seed Spaces
    pub fn seeded(policy: EntryPolicy) -> Self {
        let spaces = default_spaces()
            .into_iter()
            .map(|space| (space.id, space))
            .collect();

        Self {
            spaces,
            users: HashMap::new(),
            policy,
        }
    }

    pub fn policy(&self) -> EntryPolicy {
        self.policy
    }

    /// Look up a user by id
    pub fn get_user(&self, user_id: UserId) -> Option<&User> {
        self.users.get(&user_id)
    }

    fn space(&self, space_id: SpaceId) -> Result<&Space, MembershipError> {
        self.spaces
            .get(&space_id)
            .ok_or(MembershipError::SpaceNotFound(space_id))
    }

    /// Seats the user already holds in `space_id` that entering would give back
    fn seats_released_by_entry(&self, space_id: SpaceId, user_id: UserId) -> u32 {
        match self.policy {
            EntryPolicy::Cumulative => 0,
            EntryPolicy::Transfer => self
                .users
                .get(&user_id)
                .map_or(0, |user| u32::from(user.is_in(space_id))),
        }
    }
}

impl Default for SpaceRegistry {
    fn default() -> Self {
        Self::seeded(EntryPolicy::default())
    }
}

impl MembershipManager for SpaceRegistry {
    fn list_spaces(&self) -> Vec<Space> {
        self.spaces.values().cloned().collect()
    }

    fn get_space(&self, space_id: SpaceId) -> Result<Space, MembershipError> {
        self.space(space_id).cloned()
    }

    fn enter_space(
        &mut self,
        space_id: SpaceId,
        profile: UserProfile,
    ) -> Result<MembershipChange, MembershipError> {
        let target = self.space(space_id)?;
        let released = self.seats_released_by_entry(space_id, profile.id);
        if target.occupant_count.saturating_sub(released) >= target.capacity {
            return Err(MembershipError::SpaceFull {
                space_id,
                capacity: target.capacity,
            });
        }

        // Checks are done; nothing below can fail.
        let previous = self.users.get(&profile.id).and_then(|user| user.space_id);
        if self.policy == EntryPolicy::Transfer {
            if let Some(previous_space) = previous.and_then(|id| self.spaces.get_mut(&id)) {
                previous_space.release();
            }
        }

        let user = profile.into_user(space_id);
        self.users.insert(user.id, user.clone());

        let space = self
            .spaces
            .get_mut(&space_id)
            .ok_or(MembershipError::SpaceNotFound(space_id))?;
        space.admit();

        debug!(
            space_id = %space_id,
            user_id = %user.id,
            previous_space = ?previous,
            occupants = space.occupant_count,
            "user entered space"
        );

        Ok(MembershipChange {
            space: space.clone(),
            user,
        })
    }

    fn leave_space(
        &mut self,
        space_id: SpaceId,
        user_id: UserId,
    ) -> Result<MembershipChange, MembershipError> {
        self.space(space_id)?;
        let user = self
            .users
            .get_mut(&user_id)
            .ok_or(MembershipError::UserNotFound(user_id))?;
        if !user.is_in(space_id) {
            return Err(MembershipError::NotMember { user_id, space_id });
        }

        user.space_id = None;
        let user = user.clone();

        let space = self
            .spaces
            .get_mut(&space_id)
            .ok_or(MembershipError::SpaceNotFound(space_id))?;
        space.release();

        debug!(
            space_id = %space_id,
            user_id = %user_id,
            occupants = space.occupant_count,
            "user left space"
        );

        Ok(MembershipChange {
            space: space.clone(),
            user,
        })
    }

    fn list_occupants(&self, space_id: SpaceId) -> Result<Vec<User>, MembershipError> {
        self.space(space_id)?;

        let mut occupants: Vec<User> = self
            .users
            .values()
            .filter(|user| user.is_in(space_id))
            .cloned()
            .collect();
        occupants.sort_by_key(|user| user.id);

        Ok(occupants)
    }

    fn stats(&self) -> RegistryStats {
        self.spaces.values().fold(
            RegistryStats {
                registered_users: self.users.len(),
                ..RegistryStats::default()
            },
            |mut stats, space| {
                stats.spaces += 1;
                stats.full_spaces += usize::from(space.is_full());
                stats.total_capacity += u64::from(space.capacity);
                stats.total_occupants += u64::from(space.occupant_count);
                stats
            },
        )
    }
}
