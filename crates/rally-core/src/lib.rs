//! Table-tennis match scoring.
//!
//! Tracks a match point by point, enforces serve rotation, deuce and
//! set/match completion, supports undo/redo, detects scoring combos and
//! computes Elo rating updates for the finished match.

pub mod config;
pub mod error;
pub mod export;
pub mod rating;
pub mod score;
pub mod session;
pub mod slot;

pub use config::{InitialScoreRule, MatchConfiguration, WinCondition};
pub use error::{Error, Result};
pub use export::{
    export_result_json, format_result_console, format_result_json, format_results_tsv,
    format_scoreboard, format_state_summary,
};
pub use rating::{RatingChange, RatingEngine};
pub use score::{
    Combo, ComboDetector, MatchPhase, MatchScoreState, MatchSnapshot, SNAPSHOT_VERSION, SetResult,
};
pub use session::{
    MatchInput, MatchResult, MatchSession, Player, SnapshotBroadcaster, StateChange,
    StateListener, parse_inputs,
};
pub use slot::PlayerSlot;
