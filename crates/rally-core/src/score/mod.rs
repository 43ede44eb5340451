//! Scoring types and the match state machine.
//!
//! This module contains:
//! - `SetResult` - points per side in one set, with the legal-set predicate
//! - `MatchScoreState` - point-by-point state machine for a match
//! - `MatchSnapshot` - serializable whole-state snapshot
//! - `Combo`, `ComboDetector` - notable scoring patterns

mod combo;
mod set_result;
mod snapshot;
mod state;

pub use combo::*;
pub use set_result::*;
pub use snapshot::*;
pub use state::*;

pub(crate) use state::{deciding_set, sets_won};
