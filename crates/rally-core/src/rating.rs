//! Elo rating updates.

use serde::{Deserialize, Serialize};

use crate::config::{MatchConfiguration, rating};
use crate::slot::PlayerSlot;

/// Ratings of both players before and after a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingChange {
    pub before: [i32; 2],
    pub after: [i32; 2],
}

impl RatingChange {
    pub fn before(&self, slot: PlayerSlot) -> i32 {
        self.before[slot.index()]
    }

    pub fn after(&self, slot: PlayerSlot) -> i32 {
        self.after[slot.index()]
    }

    pub fn delta(&self, slot: PlayerSlot) -> i32 {
        self.after(slot).saturating_sub(self.before(slot))
    }
}

/// Elo rating calculator with a fixed K-factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingEngine {
    k_factor: f64,
}

impl RatingEngine {
    pub fn new(k_factor: f64) -> Self {
        Self { k_factor }
    }

    pub fn for_config(config: &MatchConfiguration) -> Self {
        Self::new(config.k_factor)
    }

    pub fn k_factor(&self) -> f64 {
        self.k_factor
    }

    /// Probability that a player rated `rating_a` beats one rated `rating_b`.
    pub fn expected_score(rating_a: i32, rating_b: i32) -> f64 {
        let diff = f64::from(rating_b) - f64::from(rating_a);
        1.0 / (1.0 + 10_f64.powf(diff / rating::ELO_SCALE))
    }

    /// New ratings for A and B after a match A either won or lost.
    ///
    /// Each rating is rounded half away from zero on its own, so the two
    /// deltas do not always cancel out exactly.
    pub fn calculate(&self, rating_a: i32, rating_b: i32, did_a_win: bool) -> (i32, i32) {
        let expected_a = Self::expected_score(rating_a, rating_b);
        let expected_b = 1.0 - expected_a;
        let score_a = if did_a_win { 1.0 } else { 0.0 };

        let new_a = f64::from(rating_a) + self.k_factor * (score_a - expected_a);
        let new_b = f64::from(rating_b) + self.k_factor * ((1.0 - score_a) - expected_b);

        (new_a.round() as i32, new_b.round() as i32)
    }

    /// Whether `k_factor` can drive a rating update: finite and positive.
    pub fn is_valid_k_factor(k_factor: f64) -> bool {
        k_factor.is_finite() && k_factor > 0.0
    }

    pub fn rate(&self, rating_a: i32, rating_b: i32, winner: PlayerSlot) -> RatingChange {
        let (new_a, new_b) = self.calculate(rating_a, rating_b, winner == PlayerSlot::A);
        RatingChange {
            before: [rating_a, rating_b],
            after: [new_a, new_b],
        }
    }
}

impl Default for RatingEngine {
    fn default() -> Self {
        Self::new(rating::DEFAULT_K_FACTOR)
    }
}
