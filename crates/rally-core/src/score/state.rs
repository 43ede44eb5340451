use chrono::{DateTime, Utc};
use strum::IntoEnumIterator;
use tracing::{debug, info};

use crate::config::{MatchConfiguration, rules};
use crate::score::{Combo, ComboDetector, SetResult};
use crate::slot::PlayerSlot;

/// Where a match currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPhase {
    /// Points are being played in the given (1-based) set.
    InProgress { set_number: u32 },
    /// The active set has a winner; `start_next` moves on.
    SetComplete { winner: PlayerSlot },
    /// A player has won the required number of sets. Terminal.
    MatchComplete { winner: PlayerSlot },
}

/// Point-by-point state of a single match.
///
/// ## Transitions
///
/// - `InProgress(n)` -> `SetComplete` when a side reaches 11 with a two-point lead
/// - `SetComplete` -> `InProgress(n + 1)` on `start_next` while nobody has enough sets
/// - `SetComplete` -> `MatchComplete` on `start_next` once a side has enough sets
///
/// Every operation is total: calls that make no sense in the current state
/// (undo without history, points after the set is decided) leave the state
/// untouched and return `false`, so the machine can be fed replayed or
/// duplicated input.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchScoreState {
    pub(crate) config: MatchConfiguration,
    pub(crate) current_set: SetResult,
    pub(crate) completed_sets: Vec<SetResult>,
    pub(crate) point_history: Vec<PlayerSlot>,
    pub(crate) redo_stack: Vec<PlayerSlot>,
    pub(crate) first_server_of_set: PlayerSlot,
    pub(crate) started_at: DateTime<Utc>,
    pub(crate) ended_at: Option<DateTime<Utc>>,
}

impl MatchScoreState {
    /// Start a match with a randomly chosen first server.
    pub fn new(config: MatchConfiguration) -> Self {
        Self::with_first_server(config, random_server())
    }

    pub fn with_first_server(config: MatchConfiguration, first_server: PlayerSlot) -> Self {
        Self {
            config,
            current_set: config.starting_set(),
            completed_sets: Vec::new(),
            point_history: Vec::new(),
            redo_stack: Vec::new(),
            first_server_of_set: first_server,
            started_at: Utc::now(),
            ended_at: None,
        }
    }

    pub fn config(&self) -> &MatchConfiguration {
        &self.config
    }

    pub fn current_set(&self) -> SetResult {
        self.current_set
    }

    pub fn completed_sets(&self) -> &[SetResult] {
        &self.completed_sets
    }

    pub fn point_history(&self) -> &[PlayerSlot] {
        &self.point_history
    }

    pub fn redo_stack(&self) -> &[PlayerSlot] {
        &self.redo_stack
    }

    pub fn first_server_of_set(&self) -> PlayerSlot {
        self.first_server_of_set
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    /// Points played in the active set (excluding any handicap start).
    pub fn points_played(&self) -> usize {
        self.point_history.len()
    }

    /// Award a point to `slot`.
    ///
    /// Ignored once the active set has a winner, which also covers a
    /// finished match. Clears the redo stack.
    pub fn add_point(&mut self, slot: PlayerSlot) -> bool {
        if let Some(winner) = self.winner() {
            debug!(%slot, %winner, "ignoring point: set already decided");
            return false;
        }

        self.redo_stack.clear();
        self.push_point(slot);
        true
    }

    /// Take back the most recent point of the active set.
    pub fn undo(&mut self) -> bool {
        if self.is_complete() {
            debug!("ignoring undo: match complete");
            return false;
        }

        let Some(slot) = self.point_history.pop() else {
            return false;
        };

        self.redo_stack.push(slot);
        self.current_set.decrement(slot);
        debug!(%slot, score = %self.current_set, "point undone");
        true
    }

    /// Replay the most recently undone point without clearing the redo stack.
    pub fn redo(&mut self) -> bool {
        if self.winner().is_some() {
            return false;
        }

        let Some(slot) = self.redo_stack.pop() else {
            return false;
        };

        self.push_point(slot);
        true
    }

    /// Close the active set and either start the next one or finish the match.
    ///
    /// Only acts while the active set has a winner and the match is not yet
    /// decided. The redo stack is carried over into the next set.
    pub fn start_next(&mut self) -> bool {
        if self.is_complete() {
            return false;
        }
        let Some(set_winner) = self.winner() else {
            debug!(score = %self.current_set, "ignoring start_next: set not decided");
            return false;
        };

        self.completed_sets.push(self.current_set);
        info!(
            set = self.completed_sets.len(),
            score = %self.current_set,
            winner = %set_winner,
            "set complete"
        );

        if let Some(match_winner) = self.match_winner() {
            let ended_at = Utc::now();
            self.ended_at = Some(ended_at);
            info!(
                winner = %match_winner,
                sets_a = self.sets_won_by(PlayerSlot::A),
                sets_b = self.sets_won_by(PlayerSlot::B),
                "match complete"
            );
            return true;
        }

        self.current_set = self.config.starting_set();
        self.first_server_of_set = self.first_server_of_set.other();
        self.point_history.clear();
        debug!(
            set = self.set_number(),
            first_server = %self.first_server_of_set,
            "next set started"
        );
        true
    }

    /// Discard everything and start the match over with a new random first server.
    pub fn reset(&mut self) {
        self.reset_with_first_server(random_server());
    }

    /// Like [`Self::reset`], with a fixed first server for reproducible replays.
    pub fn reset_with_first_server(&mut self, first_server: PlayerSlot) {
        self.completed_sets.clear();
        self.current_set = self.config.starting_set();
        self.point_history.clear();
        self.redo_stack.clear();
        self.first_server_of_set = first_server;
        self.started_at = Utc::now();
        self.ended_at = None;
        debug!(first_server = %self.first_server_of_set, "match reset");
    }

    /// Winner of the active set, if it is decided.
    pub fn winner(&self) -> Option<PlayerSlot> {
        self.current_set.winner_at(self.config.game_points())
    }

    /// Winner of the match.
    ///
    /// The active set only counts once it has been moved to the completed
    /// sets by `start_next`.
    pub fn match_winner(&self) -> Option<PlayerSlot> {
        self.winner()?;
        let sets_to_win = self.config.sets_to_win();
        PlayerSlot::iter().find(|&slot| self.sets_won_by(slot) == sets_to_win)
    }

    pub fn is_complete(&self) -> bool {
        self.match_winner().is_some()
    }

    pub fn sets_won_by(&self, slot: PlayerSlot) -> u32 {
        sets_won(&self.completed_sets, slot)
    }

    pub fn phase(&self) -> MatchPhase {
        if let Some(winner) = self.match_winner() {
            MatchPhase::MatchComplete { winner }
        } else if let Some(winner) = self.winner() {
            MatchPhase::SetComplete { winner }
        } else {
            MatchPhase::InProgress {
                set_number: self.set_number(),
            }
        }
    }

    /// 1-based number of the active set (the last set once the match is over).
    pub fn set_number(&self) -> u32 {
        let completed = self.completed_sets.len() as u32;
        if self.is_complete() {
            completed
        } else {
            completed + 1
        }
    }

    /// Side serving the next point.
    ///
    /// Service changes every two points, and every point once 20 points
    /// have been played in the set.
    pub fn server(&self) -> PlayerSlot {
        let played = self.point_history.len();
        let turn = if played >= rules::DEUCE_SERVE_THRESHOLD {
            played
        } else {
            played / rules::SERVES_PER_TURN
        };

        if (turn + self.first_server_of_set.index()) % 2 == 0 {
            PlayerSlot::A
        } else {
            PlayerSlot::B
        }
    }

    /// Whether the next serve is the second of the server's turn.
    ///
    /// Always true past the deuce threshold, where each player serves once.
    pub fn is_second_serve(&self) -> bool {
        let played = self.point_history.len();
        played >= rules::DEUCE_SERVE_THRESHOLD || played % 2 == 1
    }

    /// Whether one more point for `slot` would win the active set.
    ///
    /// Despite the name this is a set point; see [`Self::is_deciding_point_for`]
    /// for a point that would also win the match.
    pub fn is_match_point_for(&self, slot: PlayerSlot) -> bool {
        if self.winner().is_some() {
            return false;
        }

        let own = self.current_set.value_for(slot);
        let other = self.current_set.value_for(slot.other());
        own + 1 >= self.config.game_points() && own > other
    }

    /// Set point that would also hand `slot` the match.
    pub fn is_deciding_point_for(&self, slot: PlayerSlot) -> bool {
        self.is_match_point_for(slot) && self.sets_won_by(slot) + 1 == self.config.sets_to_win()
    }

    pub fn combo_for(&self, slot: PlayerSlot) -> Option<Combo> {
        ComboDetector::detect(self, slot)
    }

    /// Completed sets as `[points_a, points_b]` pairs.
    pub fn results(&self) -> Vec<[u32; 2]> {
        self.completed_sets.iter().map(SetResult::as_pair).collect()
    }

    fn push_point(&mut self, slot: PlayerSlot) {
        self.point_history.push(slot);
        self.current_set.increment(slot);
        debug!(%slot, score = %self.current_set, "point added");

        if let Some(winner) = self.winner() {
            info!(%winner, score = %self.current_set, "set decided");
        }
    }
}

pub(crate) fn sets_won(sets: &[SetResult], slot: PlayerSlot) -> u32 {
    sets.iter().filter(|set| set.leader() == Some(slot)).count() as u32
}

/// Index of the set that decided the match and its winner, if any.
pub(crate) fn deciding_set(sets: &[SetResult], sets_to_win: u32) -> Option<(usize, PlayerSlot)> {
    let mut won = [0u32; 2];
    for (index, set) in sets.iter().enumerate() {
        let Some(leader) = set.leader() else {
            continue;
        };
        won[leader.index()] += 1;
        if won[leader.index()] == sets_to_win {
            return Some((index, leader));
        }
    }
    None
}

fn random_server() -> PlayerSlot {
    if rand::random::<bool>() {
        PlayerSlot::A
    } else {
        PlayerSlot::B
    }
}
