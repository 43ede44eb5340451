//! Match ownership and the boundary to external collaborators.
//!
//! This module contains:
//! - `MatchSession` - explicit owner of one match with change notifications
//! - `MatchInput` - normalized caller operations
//! - `StateListener`, `StateChange`, `SnapshotBroadcaster` - change notifications
//! - `MatchResult`, `Player` - the finished-match contract

mod input;
mod listener;
mod manager;
mod result;

pub use input::*;
pub use listener::*;
pub use manager::*;
pub use result::*;
