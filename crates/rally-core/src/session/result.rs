use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{MatchConfiguration, rating};
use crate::error::{Error, Result};
use crate::rating::{RatingChange, RatingEngine};
use crate::score::{MatchScoreState, SetResult, deciding_set, sets_won};
use crate::slot::PlayerSlot;

/// A player taking part in a match, as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub rating: i32,
}

impl Player {
    pub fn new(name: impl Into<String>, rating: i32) -> Self {
        Self {
            name: name.into(),
            rating,
        }
    }

    pub fn unrated(name: impl Into<String>) -> Self {
        Self::new(name, rating::DEFAULT_RATING)
    }
}

/// A finished match, ready to hand to storage or upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub player_a: Player,
    pub player_b: Player,
    pub config: MatchConfiguration,
    /// Per-set `[points_a, points_b]`.
    pub results: Vec<[u32; 2]>,
    pub winner: PlayerSlot,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl MatchResult {
    /// Build the result of a live match. `None` until the match is decided.
    pub fn from_state(player_a: Player, player_b: Player, state: &MatchScoreState) -> Option<Self> {
        let winner = state.match_winner()?;
        Some(Self {
            player_a,
            player_b,
            config: *state.config(),
            results: state.results(),
            winner,
            started_at: Some(state.started_at()),
            ended_at: state.ended_at(),
        })
    }

    /// Build a result from manually entered set scores.
    ///
    /// Every set must be a legal finished set, and the sets must decide the
    /// match exactly at the last one.
    pub fn from_manual(
        player_a: Player,
        player_b: Player,
        config: MatchConfiguration,
        results: Vec<[u32; 2]>,
    ) -> Result<Self> {
        let sets: Vec<SetResult> = results.iter().copied().map(SetResult::from_pair).collect();
        for (index, set) in sets.iter().enumerate() {
            set.validate(index, config.game_points())?;
        }

        let winner = match deciding_set(&sets, config.sets_to_win()) {
            Some((index, _)) if index + 1 != sets.len() => {
                return Err(Error::TrailingSets {
                    decided_at: index + 1,
                });
            }
            Some((_, winner)) => winner,
            None => {
                return Err(Error::UndecidedResults {
                    sets_a: sets_won(&sets, PlayerSlot::A),
                    sets_b: sets_won(&sets, PlayerSlot::B),
                    sets_to_win: config.sets_to_win(),
                });
            }
        };

        Ok(Self {
            player_a,
            player_b,
            config,
            results,
            winner,
            started_at: None,
            ended_at: None,
        })
    }

    pub fn player(&self, slot: PlayerSlot) -> &Player {
        match slot {
            PlayerSlot::A => &self.player_a,
            PlayerSlot::B => &self.player_b,
        }
    }

    pub fn sets_won_by(&self, slot: PlayerSlot) -> u32 {
        self.results
            .iter()
            .filter(|pair| SetResult::from_pair(**pair).leader() == Some(slot))
            .count() as u32
    }

    /// Rating update for both players using the configured K-factor.
    pub fn rating_change(&self) -> RatingChange {
        RatingEngine::for_config(&self.config).rate(
            self.player_a.rating,
            self.player_b.rating,
            self.winner,
        )
    }
}
