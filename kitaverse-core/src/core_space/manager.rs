//! Manager trait for Space membership operations

use super::space::Space;
use super::types::{SpaceId, UserId};
use super::user::{User, UserProfile};
use serde::Serialize;
use std::fmt;

/// Manager for Space membership
///
/// Every operation either applies all of its effects or none of them.
pub trait MembershipManager {
    /// List all Spaces, ordered by id
    fn list_spaces(&self) -> Vec<Space>;

    /// Get a Space by ID
    fn get_space(&self, space_id: SpaceId) -> Result<Space, MembershipError>;

    /// Move a user into a Space, taking one seat
    fn enter_space(
        &mut self,
        space_id: SpaceId,
        profile: UserProfile,
    ) -> Result<MembershipChange, MembershipError>;

    /// Remove a user from the Space they occupy
    fn leave_space(
        &mut self,
        space_id: SpaceId,
        user_id: UserId,
    ) -> Result<MembershipChange, MembershipError>;

    /// List users whose current Space is `space_id`
    fn list_occupants(&self, space_id: SpaceId) -> Result<Vec<User>, MembershipError>;

    /// Aggregate counters across the registry
    fn stats(&self) -> RegistryStats;
}

/// Result of a successful enter or leave
#[derive(Debug, Clone, PartialEq)]
pub struct MembershipChange {
    /// Snapshot of the Space after the change
    pub space: Space,
    /// Snapshot of the user after the change
    pub user: User,
}

/// Registry-wide totals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RegistryStats {
    pub spaces: usize,
    pub full_spaces: usize,
    pub total_capacity: u64,
    pub total_occupants: u64,
    pub registered_users: usize,
}

/// Category of a membership failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    Full,
    NotMember,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::Full => "space_full",
            ErrorKind::NotMember => "not_member",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Membership operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MembershipError {
    #[error("Space not found")]
    SpaceNotFound(SpaceId),

    #[error("User not found")]
    UserNotFound(UserId),

    #[error("Space is full")]
    SpaceFull { space_id: SpaceId, capacity: u32 },

    #[error("User is not in this space")]
    NotMember { user_id: UserId, space_id: SpaceId },
}

impl MembershipError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MembershipError::SpaceNotFound(_) | MembershipError::UserNotFound(_) => {
                ErrorKind::NotFound
            }
            MembershipError::SpaceFull { .. } => ErrorKind::Full,
            MembershipError::NotMember { .. } => ErrorKind::NotMember,
        }
    }
}
