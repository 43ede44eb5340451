use serde::{Deserialize, Serialize};

use crate::config::combo;
use crate::score::MatchScoreState;
use crate::slot::PlayerSlot;

/// Notable scoring pattern for one player in the active set.
///
/// Purely informational; combos never affect scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Combo {
    /// Set won without conceding a point.
    Perfect,
    /// Ten unanswered points: one away from a perfect set.
    PerfectMatchPoint,
    /// At least eight unanswered points.
    RoadToPerfect,
    /// One point from winning the set (a set point, despite the name).
    MatchPoint,
    /// The last `n` points of the set, `n >= 3`, all went to this player.
    PointsStreak(usize),
}

impl Combo {
    pub fn label(&self) -> String {
        match self {
            Self::Perfect => "PERFECT".to_string(),
            Self::PerfectMatchPoint => "PERFECT MATCH POINT".to_string(),
            Self::RoadToPerfect => "ROAD TO PERFECT".to_string(),
            Self::MatchPoint => "MATCH POINT".to_string(),
            Self::PointsStreak(n) => format!("{} POINTS STREAK", n),
        }
    }
}

impl std::fmt::Display for Combo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Combo classification.
///
/// Rules are checked in precedence order and the first hit wins:
/// 1. `Perfect`
/// 2. `PerfectMatchPoint`
/// 3. `RoadToPerfect`
/// 4. `MatchPoint`
/// 5. `PointsStreak`
pub struct ComboDetector;

impl ComboDetector {
    pub fn detect(state: &MatchScoreState, slot: PlayerSlot) -> Option<Combo> {
        let set = state.current_set();
        let history = state.point_history();
        let all_own = history.iter().all(|&point| point == slot);

        if set.value_for(slot) == state.config().game_points() && set.value_for(slot.other()) == 0
        {
            return Some(Combo::Perfect);
        }

        if history.len() == combo::PERFECT_MATCH_POINT && all_own {
            return Some(Combo::PerfectMatchPoint);
        }

        if history.len() >= combo::ROAD_TO_PERFECT && all_own {
            return Some(Combo::RoadToPerfect);
        }

        if state.is_match_point_for(slot) {
            return Some(Combo::MatchPoint);
        }

        let streak = trailing_streak(history, slot);
        (streak >= combo::MIN_STREAK).then_some(Combo::PointsStreak(streak))
    }
}

/// Length of the longest suffix of `history` made only of `slot`'s points.
fn trailing_streak(history: &[PlayerSlot], slot: PlayerSlot) -> usize {
    history
        .iter()
        .rev()
        .take_while(|&&point| point == slot)
        .count()
}
