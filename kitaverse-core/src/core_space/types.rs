//! Type definitions for Spaces and Users

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier for a Space, assigned when the Space is provisioned
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpaceId(pub i64);

impl SpaceId {
    /// Get the raw integer value
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for SpaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for SpaceId {
    fn from(id: i64) -> Self {
        SpaceId(id)
    }
}

/// Unique identifier for a User
///
/// Chosen by the caller; the registry never allocates user ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl UserId {
    /// Get the raw integer value
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        UserId(id)
    }
}

/// What a Space is used for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpaceCategory {
    /// Village meetings and discussions
    Meeting,
    /// Trading goods
    Market,
    /// Festivals and cultural events
    Festival,
}

impl SpaceCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpaceCategory::Meeting => "meeting",
            SpaceCategory::Market => "market",
            SpaceCategory::Festival => "festival",
        }
    }
}

impl fmt::Display for SpaceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A point in the client's 3D world
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0.0, y: 0.0, z: 0.0 };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// True when every component is a finite number
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// How `enter_space` treats a user who already holds a membership
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryPolicy {
    /// Every successful entry takes a seat in the target Space. A seat held
    /// in a previous Space is not given back, and re-entering the same
    /// Space takes another seat.
    #[default]
    Cumulative,
    /// Entering releases the seat the user currently holds, so a user never
    /// counts against more than one Space.
    Transfer,
}

impl EntryPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryPolicy::Cumulative => "cumulative",
            EntryPolicy::Transfer => "transfer",
        }
    }
}

impl fmt::Display for EntryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cumulative" => Ok(EntryPolicy::Cumulative),
            "transfer" => Ok(EntryPolicy::Transfer),
            other => Err(format!("unknown entry policy: {}", other)),
        }
    }
}
