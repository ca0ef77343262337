//! Space data structures and operations

use super::types::{SpaceCategory, SpaceId};
use serde::{Deserialize, Serialize};

/// A Space is a virtual room that users can enter, up to its capacity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Space {
    /// Unique identifier
    pub id: SpaceId,

    /// Human-readable name
    pub name: String,

    /// What the Space is used for
    #[serde(rename = "type")]
    pub category: SpaceCategory,

    /// Short description shown to visitors
    pub description: String,

    /// Maximum number of occupants
    pub capacity: u32,

    /// Number of seats currently taken
    #[serde(rename = "current_users")]
    pub occupant_count: u32,
}

impl Space {
    /// Create a new, empty Space
    pub fn new(
        id: i64,
        name: impl Into<String>,
        category: SpaceCategory,
        description: impl Into<String>,
        capacity: u32,
    ) -> Self {
        Space {
            id: SpaceId(id),
            name: name.into(),
            category,
            description: description.into(),
            capacity,
            occupant_count: 0,
        }
    }

    /// Check whether another occupant can be admitted
    pub fn has_vacancy(&self) -> bool {
        self.occupant_count < self.capacity
    }

    /// Check whether the Space is at capacity
    pub fn is_full(&self) -> bool {
        !self.has_vacancy()
    }

    /// Number of seats still available
    pub fn vacancies(&self) -> u32 {
        self.capacity.saturating_sub(self.occupant_count)
    }

    /// Take one seat. Callers check `has_vacancy` first.
    pub(crate) fn admit(&mut self) {
        debug_assert!(self.has_vacancy(), "admit called on a full space");
        self.occupant_count = (self.occupant_count + 1).min(self.capacity);
    }

    /// Give back one seat
    pub(crate) fn release(&mut self) {
        self.occupant_count = self.occupant_count.saturating_sub(1);
    }

    /// Check that the Space can be provisioned
    pub fn validate(&self) -> Result<(), SpaceError> {
        if self.capacity == 0 {
            return Err(SpaceError::ZeroCapacity(self.id));
        }
        if self.occupant_count > self.capacity {
            return Err(SpaceError::OverCapacity(self.id));
        }
        Ok(())
    }
}

/// Space provisioning errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpaceError {
    #[error("Space {0} must have a positive capacity")]
    ZeroCapacity(SpaceId),

    #[error("Space {0} starts with more occupants than its capacity")]
    OverCapacity(SpaceId),

    #[error("Space {0} is provisioned more than once")]
    DuplicateSpace(SpaceId),
}
