//! Match configuration and scoring constants.
//!
//! This module contains:
//! - `MatchConfiguration` - win condition, initial-score rule and rating K-factor
//! - `WinCondition` - single set or best-of-N
//! - `InitialScoreRule` - starting score applied to every set
//! - Rule, rating and combo constants

mod match_config;

pub use match_config::*;

/// Table-tennis scoring rules.
pub mod rules {
    /// Points needed to take a set (win by two).
    pub const GAME_POINTS: u32 = 11;

    /// Minimum lead required to close a set.
    pub const WIN_MARGIN: u32 = 2;

    /// Points played in a set after which the serve alternates every point.
    pub const DEUCE_SERVE_THRESHOLD: usize = 20;

    /// Consecutive serves per player below the deuce threshold.
    pub const SERVES_PER_TURN: usize = 2;
}

/// Elo rating constants.
pub mod rating {
    /// K-factor for matches played from 0-0.
    pub const DEFAULT_K_FACTOR: f64 = 32.0;

    /// K-factor for handicapped matches, where the result says less about skill.
    pub const HANDICAP_K_FACTOR: f64 = 24.0;

    /// Rating assigned to a player without history.
    pub const DEFAULT_RATING: i32 = 1500;

    /// Rating difference at which the stronger player is expected to win ten times as often.
    pub const ELO_SCALE: f64 = 400.0;
}

/// Combo detection thresholds.
pub mod combo {
    /// Shortest run of consecutive points reported as a streak.
    pub const MIN_STREAK: usize = 3;

    /// Unanswered points after which a perfect set is in sight.
    pub const ROAD_TO_PERFECT: usize = 8;

    /// Unanswered points one short of a perfect set.
    pub const PERFECT_MATCH_POINT: usize = 10;
}
