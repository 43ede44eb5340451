use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString, IntoStaticStr};

use crate::config::{rating, rules};
use crate::score::SetResult;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Default,
    IntoStaticStr,
    EnumString,
    EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum WinCondition {
    #[serde(rename = "single")]
    #[strum(to_string = "single", serialize = "bo1")]
    Single,
    #[default]
    #[serde(rename = "bo3")]
    #[strum(serialize = "bo3")]
    BestOf3,
    #[serde(rename = "bo5")]
    #[strum(serialize = "bo5")]
    BestOf5,
    #[serde(rename = "bo7")]
    #[strum(serialize = "bo7")]
    BestOf7,
}

impl WinCondition {
    /// Sets a player must win to take the match.
    pub fn sets_to_win(self) -> u32 {
        match self {
            Self::Single => 1,
            Self::BestOf3 => 2,
            Self::BestOf5 => 3,
            Self::BestOf7 => 4,
        }
    }

    /// Maximum number of sets the match can last.
    pub fn total_sets(self) -> u32 {
        2 * self.sets_to_win() - 1
    }

    /// Rough duration for display purposes.
    pub fn estimated_minutes(self) -> u32 {
        match self {
            Self::Single => 10,
            Self::BestOf3 => 25,
            Self::BestOf5 => 40,
            Self::BestOf7 => 55,
        }
    }

    pub fn short_name(&self) -> &'static str {
        self.into()
    }
}

impl std::fmt::Display for WinCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.short_name())
    }
}

/// Score every set starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InitialScoreRule {
    /// Both players start at 0.
    #[default]
    Standard,
    /// Players start at the given points, e.g. to offset a skill gap.
    ///
    /// Starting points are capped one short of [`rules::GAME_POINTS`] so a set
    /// can never begin already decided.
    Handicap { a: u32, b: u32 },
}

impl InitialScoreRule {
    pub fn starting_set(&self) -> SetResult {
        match *self {
            Self::Standard => SetResult::default(),
            Self::Handicap { a, b } => {
                let cap = rules::GAME_POINTS - 1;
                SetResult::new(a.min(cap), b.min(cap))
            }
        }
    }

    pub fn default_k_factor(&self) -> f64 {
        match self {
            Self::Standard => rating::DEFAULT_K_FACTOR,
            Self::Handicap { .. } => rating::HANDICAP_K_FACTOR,
        }
    }

    pub fn is_standard(&self) -> bool {
        matches!(self, Self::Standard)
    }
}

/// Immutable description of how a match is played and rated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchConfiguration {
    pub win_condition: WinCondition,
    pub initial_score_rule: InitialScoreRule,
    pub k_factor: f64,
}

impl MatchConfiguration {
    pub fn new(win_condition: WinCondition, initial_score_rule: InitialScoreRule) -> Self {
        Self {
            win_condition,
            initial_score_rule,
            k_factor: initial_score_rule.default_k_factor(),
        }
    }

    pub fn with_k_factor(mut self, k_factor: f64) -> Self {
        self.k_factor = k_factor;
        self
    }

    /// Points needed to take a set. Fixed for every configuration.
    pub fn game_points(&self) -> u32 {
        rules::GAME_POINTS
    }

    pub fn sets_to_win(&self) -> u32 {
        self.win_condition.sets_to_win()
    }

    pub fn total_sets(&self) -> u32 {
        self.win_condition.total_sets()
    }

    pub fn estimated_minutes(&self) -> u32 {
        self.win_condition.estimated_minutes()
    }

    pub fn starting_set(&self) -> SetResult {
        self.initial_score_rule.starting_set()
    }
}

impl Default for MatchConfiguration {
    fn default() -> Self {
        Self::new(WinCondition::default(), InitialScoreRule::default())
    }
}
