//! Space Membership
//!
//! The authoritative in-memory registry of Spaces and the users inside them.
//!
//! ## Architecture
//!
//! - **Space**: a virtual room with a fixed capacity and an occupant counter
//! - **User**: a caller-identified visitor holding at most one Space reference
//! - **SpaceRegistry**: owns both collections and enforces the entry/exit rules
//! - **SpaceService**: lock-guarded handle shared by concurrent requests
//!
//! ## Invariants
//!
//! 1. `0 <= occupant_count <= capacity` for every Space, after every operation
//! 2. Failed operations leave the registry untouched
//! 3. The Space counter is authoritative; a user's `space_id` is a back-reference

pub mod async_manager;
pub mod manager;
pub mod manager_impl;
pub mod seed;
pub mod space;
pub mod types;
pub mod user;

#[cfg(test)]
mod tests;

pub use async_manager::SpaceService;
pub use manager::{ErrorKind, MembershipChange, MembershipError, MembershipManager, RegistryStats};
pub use manager_impl::SpaceRegistry;
pub use seed::default_spaces;
pub use space::{Space, SpaceError};
pub use types::{EntryPolicy, Position, SpaceCategory, SpaceId, UserId};
pub use user::{User, UserProfile};
