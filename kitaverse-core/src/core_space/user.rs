//! User records tracked by the registry

use super::types::{Position, SpaceId, UserId};
use serde::{Deserialize, Serialize};

/// A user known to the registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    #[serde(default)]
    pub position: Position,
    /// Space the user currently occupies. Back-reference only; the Space's
    /// counter is the source of truth for occupancy.
    #[serde(default)]
    pub space_id: Option<SpaceId>,
}

impl User {
    /// Check whether the user currently occupies `space_id`
    pub fn is_in(&self, space_id: SpaceId) -> bool {
        self.space_id == Some(space_id)
    }
}

/// What a caller supplies when entering a Space
#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub position: Position,
}

impl UserProfile {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id: UserId(id),
            name: name.into(),
            position: Position::ORIGIN,
        }
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    /// Materialise the profile as a user occupying `space_id`
    pub(crate) fn into_user(self, space_id: SpaceId) -> User {
        User {
            id: self.id,
            name: self.name,
            position: self.position,
            space_id: Some(space_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_into_user() {
        let user = UserProfile::new(7, "Ann")
            .at(Position::new(1.0, 2.0, 0.5))
            .into_user(SpaceId(1));

        assert_eq!(user.id, UserId(7));
        assert_eq!(user.position, Position::new(1.0, 2.0, 0.5));
        assert!(user.is_in(SpaceId(1)));
        assert!(!user.is_in(SpaceId(2)));
    }

    #[test]
    fn test_user_json_shape() {
        let user = UserProfile::new(7, "Ann").into_user(SpaceId(3));
        let json = serde_json::to_value(&user).unwrap();

        assert_eq!(json["id"], 7);
        assert_eq!(json["name"], "Ann");
        assert_eq!(json["position"]["x"], 0.0);
        assert_eq!(json["space_id"], 3);
    }
}
