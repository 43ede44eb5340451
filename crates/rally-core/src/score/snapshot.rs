//! Whole-state snapshots of a match.
//!
//! A snapshot is the unit the sync and upload layers exchange: remote copies
//! are replaced wholesale by the latest snapshot rather than replaying
//! operations.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::MatchConfiguration;
use crate::error::{Error, Result};
use crate::score::state::deciding_set;
use crate::score::{MatchScoreState, SetResult};
use crate::slot::PlayerSlot;

/// Current snapshot layout version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Serializable value form of a [`MatchScoreState`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSnapshot {
    pub version: u32,
    pub config: MatchConfiguration,
    pub current_set: SetResult,
    pub completed_sets: Vec<SetResult>,
    pub point_history: Vec<PlayerSlot>,
    pub redo_stack: Vec<PlayerSlot>,
    pub first_server_of_set: PlayerSlot,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl MatchScoreState {
    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot {
            version: SNAPSHOT_VERSION,
            config: self.config,
            current_set: self.current_set,
            completed_sets: self.completed_sets.clone(),
            point_history: self.point_history.clone(),
            redo_stack: self.redo_stack.clone(),
            first_server_of_set: self.first_server_of_set,
            started_at: self.started_at,
            ended_at: self.ended_at,
        }
    }

    /// Rebuild a state from a snapshot, rejecting snapshots that break the
    /// state machine's invariants.
    pub fn restore(snapshot: MatchSnapshot) -> Result<Self> {
        if let Err(e) = check_snapshot(&snapshot) {
            warn!("Rejected match snapshot: {}", e);
            return Err(e);
        }

        Ok(Self {
            config: snapshot.config,
            current_set: snapshot.current_set,
            completed_sets: snapshot.completed_sets,
            point_history: snapshot.point_history,
            redo_stack: snapshot.redo_stack,
            first_server_of_set: snapshot.first_server_of_set,
            started_at: snapshot.started_at,
            ended_at: snapshot.ended_at,
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.snapshot())?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: MatchSnapshot = serde_json::from_str(json)?;
        Self::restore(snapshot)
    }

    /// Write the snapshot as JSON to `path`.
    pub fn save_snapshot<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(&path, self.to_json()?)?;
        info!("Saved match snapshot to {:?}", path.as_ref());
        Ok(())
    }

    pub fn load_snapshot<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)?;
        let state = Self::from_json(&content)?;
        info!("Loaded match snapshot from {:?}", path.as_ref());
        Ok(state)
    }
}

fn check_snapshot(snapshot: &MatchSnapshot) -> Result<()> {
    if snapshot.version != SNAPSHOT_VERSION {
        return Err(corrupt(format!(
            "unsupported version {} (expected {})",
            snapshot.version, SNAPSHOT_VERSION
        )));
    }

    let config = &snapshot.config;
    let start = config.starting_set();
    for slot in [PlayerSlot::A, PlayerSlot::B] {
        let scored = snapshot
            .point_history
            .iter()
            .filter(|&&point| point == slot)
            .count() as u32;
        if start.value_for(slot) + scored != snapshot.current_set.value_for(slot) {
            return Err(corrupt(format!(
                "history does not match score {} for {}",
                snapshot.current_set, slot
            )));
        }
    }

    // A point can only follow an undecided score
    let mut replayed = start;
    for (index, &slot) in snapshot.point_history.iter().enumerate() {
        if replayed.winner_at(config.game_points()).is_some() {
            return Err(corrupt(format!(
                "point #{} played after the set was decided at {}",
                index + 1,
                replayed
            )));
        }
        replayed.increment(slot);
    }

    for (index, set) in snapshot.completed_sets.iter().enumerate() {
        if !set.is_valid(config.game_points()) {
            return Err(corrupt(format!("completed set #{} is invalid: {}", index + 1, set)));
        }
    }

    match deciding_set(&snapshot.completed_sets, config.sets_to_win()) {
        Some((index, _)) if index + 1 != snapshot.completed_sets.len() => Err(corrupt(format!(
            "sets recorded after the match was decided at set #{}",
            index + 1
        ))),
        Some(_) if snapshot.completed_sets.last() != Some(&snapshot.current_set) => Err(corrupt(
            "finished match does not end on its last set".to_string(),
        )),
        _ => Ok(()),
    }
}

fn corrupt(message: String) -> Error {
    Error::CorruptSnapshot(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{InitialScoreRule, WinCondition};

    fn sample_state() -> MatchScoreState {
        let mut state = MatchScoreState::with_first_server(
            MatchConfiguration::new(WinCondition::BestOf5, InitialScoreRule::Standard),
            PlayerSlot::B,
        );
        for _ in 0..11 {
            state.add_point(PlayerSlot::B);
        }
        state.start_next();
        for slot in [PlayerSlot::A, PlayerSlot::A, PlayerSlot::B] {
            state.add_point(slot);
        }
        state.undo();
        state
    }

    #[test]
    fn test_json_round_trip() {
        let state = sample_state();
        let json = state.to_json().unwrap();
        let restored = MatchScoreState::from_json(&json).unwrap();
        assert_eq!(restored, state);
        assert_eq!(restored.redo_stack(), &[PlayerSlot::B]);
    }

    #[test]
    fn test_snapshot_field_names() {
        let value = serde_json::to_value(sample_state().snapshot()).unwrap();
        assert!(value.get("pointHistory").is_some());
        assert!(value.get("firstServerOfSet").is_some());
        assert_eq!(value["completedSets"][0]["b"], 11);
    }

    #[test]
    fn test_rejects_history_mismatch() {
        let mut snapshot = sample_state().snapshot();
        snapshot.point_history.push(PlayerSlot::A);
        assert!(matches!(
            MatchScoreState::restore(snapshot),
            Err(Error::CorruptSnapshot(_))
        ));
    }

    #[test]
    fn test_rejects_invalid_completed_set() {
        let mut snapshot = sample_state().snapshot();
        snapshot.completed_sets.push(SetResult::new(12, 9));
        assert!(matches!(
            MatchScoreState::restore(snapshot),
            Err(Error::CorruptSnapshot(_))
        ));
    }

    #[test]
    fn test_rejects_unreachable_current_set() {
        let mut snapshot = MatchScoreState::with_first_server(
            MatchConfiguration::new(WinCondition::BestOf3, InitialScoreRule::Standard),
            PlayerSlot::A,
        )
        .snapshot();
        snapshot.current_set = SetResult::new(15, 3);
        snapshot.point_history = [vec![PlayerSlot::A; 15], vec![PlayerSlot::B; 3]].concat();
        assert!(matches!(
            MatchScoreState::restore(snapshot.clone()),
            Err(Error::CorruptSnapshot(_))
        ));

        // Same final score reached in the other order is still past the decision.
        snapshot.point_history = [vec![PlayerSlot::B; 3], vec![PlayerSlot::A; 15]].concat();
        assert!(MatchScoreState::restore(snapshot).is_err());
    }

    #[test]
    fn test_accepts_decided_set_awaiting_next() {
        let mut state = MatchScoreState::with_first_server(
            MatchConfiguration::new(WinCondition::BestOf3, InitialScoreRule::Standard),
            PlayerSlot::A,
        );
        for _ in 0..10 {
            state.add_point(PlayerSlot::A);
            state.add_point(PlayerSlot::B);
        }
        state.add_point(PlayerSlot::A);
        state.add_point(PlayerSlot::A);
        assert_eq!(state.winner(), Some(PlayerSlot::A));

        let mut restored = MatchScoreState::restore(state.snapshot()).unwrap();
        assert!(restored.start_next());
        assert_eq!(restored.completed_sets(), &[SetResult::new(12, 10)]);
        assert!(MatchScoreState::from_json(&restored.to_json().unwrap()).is_ok());
    }

    #[test]
    fn test_rejects_unknown_version() {
        let mut snapshot = sample_state().snapshot();
        snapshot.version = 99;
        assert!(MatchScoreState::restore(snapshot).is_err());
    }

    #[test]
    fn test_rejects_sets_after_decision() {
        let mut snapshot = MatchScoreState::with_first_server(
            MatchConfiguration::new(WinCondition::Single, InitialScoreRule::Standard),
            PlayerSlot::A,
        )
        .snapshot();
        snapshot.completed_sets = vec![SetResult::new(11, 2), SetResult::new(11, 3)];
        assert!(MatchScoreState::restore(snapshot).is_err());
    }

    #[test]
    fn test_finished_match_round_trips() {
        let mut state = MatchScoreState::with_first_server(
            MatchConfiguration::new(WinCondition::Single, InitialScoreRule::Standard),
            PlayerSlot::A,
        );
        for _ in 0..11 {
            state.add_point(PlayerSlot::A);
        }
        state.start_next();
        assert!(state.is_complete());

        let restored = MatchScoreState::from_json(&state.to_json().unwrap()).unwrap();
        assert_eq!(restored.match_winner(), Some(PlayerSlot::A));
        assert_eq!(restored, state);
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("match.json");
        let state = sample_state();

        state.save_snapshot(&path).unwrap();
        let loaded = MatchScoreState::load_snapshot(&path).unwrap();
        assert_eq!(loaded, state);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = MatchScoreState::load_snapshot(dir.path().join("missing.json"));
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
