//! Request/Response types for the HTTP API

use crate::core_space::{Position, Space, User, UserId, UserProfile};
use serde::{Deserialize, Serialize};

/// Longest accepted user name, in characters
pub const MAX_USER_NAME_LEN: usize = 100;

// ============================================================================
// Service Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WelcomeResponse {
    pub message: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
}

// ============================================================================
// Space Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpaceListResponse {
    pub spaces: Vec<Space>,
}

/// Body of `POST /spaces/{id}/enter`
///
/// Unknown fields are ignored, so clients that echo a `space_id` still work.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnterSpaceRequest {
    pub id: UserId,
    pub name: String,
    #[serde(default)]
    pub position: Position,
}

impl EnterSpaceRequest {
    /// Check the request before it reaches the registry
    ///
    /// Surrounding whitespace does not count towards the name rules, but the
    /// name is stored as sent.
    pub fn validate(&self) -> Result<(), String> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err("name must not be empty".to_string());
        }
        if name.chars().count() > MAX_USER_NAME_LEN {
            return Err(format!(
                "name must be at most {} characters",
                MAX_USER_NAME_LEN
            ));
        }
        if !self.position.is_finite() {
            return Err("position components must be finite numbers".to_string());
        }
        Ok(())
    }

    pub fn into_profile(self) -> UserProfile {
        UserProfile {
            id: self.id,
            name: self.name,
            position: self.position,
        }
    }
}

/// Query of `POST /spaces/{id}/leave`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveSpaceQuery {
    pub user_id: UserId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembershipResponse {
    pub message: String,
    pub space: Space,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OccupantListResponse {
    pub users: Vec<User>,
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub details: Option<String>,
}
