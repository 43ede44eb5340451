use tracing::{debug, info};

use crate::config::MatchConfiguration;
use crate::error::Result;
use crate::rating::RatingChange;
use crate::score::{MatchScoreState, MatchSnapshot};
use crate::session::{MatchInput, MatchResult, Player, StateChange, StateListener};
use crate::slot::PlayerSlot;

type BoxedListener = Box<dyn StateListener + Send>;

/// Owner of one in-flight match.
///
/// Holds the only writable [`MatchScoreState`] together with the two
/// players, and notifies registered listeners after every operation that
/// actually changed the state. Hosts that share a session between tasks
/// wrap it in a single mutex.
pub struct MatchSession {
    player_a: Player,
    player_b: Player,
    state: MatchScoreState,
    listeners: Vec<BoxedListener>,
}

impl MatchSession {
    pub fn new(player_a: Player, player_b: Player, config: MatchConfiguration) -> Self {
        Self::from_state(player_a, player_b, MatchScoreState::new(config))
    }

    /// Resume a session around an existing state, e.g. one restored from a snapshot.
    pub fn from_state(player_a: Player, player_b: Player, state: MatchScoreState) -> Self {
        Self {
            player_a,
            player_b,
            state,
            listeners: Vec::new(),
        }
    }

    pub fn state(&self) -> &MatchScoreState {
        &self.state
    }

    pub fn player(&self, slot: PlayerSlot) -> &Player {
        match slot {
            PlayerSlot::A => &self.player_a,
            PlayerSlot::B => &self.player_b,
        }
    }

    pub fn subscribe<L>(&mut self, listener: L)
    where
        L: StateListener + Send + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Dispatch a normalized input. Returns whether the state changed.
    pub fn apply(&mut self, input: MatchInput) -> bool {
        debug!(%input, "applying input");
        match input {
            MatchInput::Point(slot) => self.add_point(slot),
            MatchInput::Undo => self.undo(),
            MatchInput::Redo => self.redo(),
            MatchInput::StartNext => self.start_next(),
            MatchInput::Reset => {
                self.reset();
                true
            }
        }
    }

    pub fn add_point(&mut self, slot: PlayerSlot) -> bool {
        let changed = self.state.add_point(slot);
        if changed {
            self.notify(StateChange::PointAdded(slot));
        }
        changed
    }

    pub fn undo(&mut self) -> bool {
        let Some(&slot) = self.state.point_history().last() else {
            return false;
        };
        let changed = self.state.undo();
        if changed {
            self.notify(StateChange::PointUndone(slot));
        }
        changed
    }

    pub fn redo(&mut self) -> bool {
        let Some(&slot) = self.state.redo_stack().last() else {
            return false;
        };
        let changed = self.state.redo();
        if changed {
            self.notify(StateChange::PointRedone(slot));
        }
        changed
    }

    pub fn start_next(&mut self) -> bool {
        if !self.state.start_next() {
            return false;
        }

        let change = match self.state.match_winner() {
            Some(winner) => {
                info!(
                    winner = %self.player(winner).name,
                    results = ?self.state.results(),
                    "match finished"
                );
                StateChange::MatchFinished { winner }
            }
            None => StateChange::SetStarted {
                set_number: self.state.set_number(),
            },
        };
        self.notify(change);
        true
    }

    pub fn reset(&mut self) {
        self.state.reset();
        self.notify(StateChange::Reset);
    }

    pub fn reset_with_first_server(&mut self, first_server: PlayerSlot) {
        self.state.reset_with_first_server(first_server);
        self.notify(StateChange::Reset);
    }

    /// Swap in a snapshot received from another copy of this match.
    ///
    /// The incoming snapshot wins outright; nothing is merged.
    pub fn replace_state(&mut self, snapshot: MatchSnapshot) -> Result<()> {
        self.state = MatchScoreState::restore(snapshot)?;
        self.notify(StateChange::Replaced);
        Ok(())
    }

    /// The finished match for storage or upload, once it is decided.
    pub fn finish(&self) -> Option<MatchResult> {
        MatchResult::from_state(self.player_a.clone(), self.player_b.clone(), &self.state)
    }

    pub fn rating_change(&self) -> Option<RatingChange> {
        self.finish().map(|result| result.rating_change())
    }

    fn notify(&mut self, change: StateChange) {
        for listener in &mut self.listeners {
            listener.on_change(&change, &self.state);
        }
    }
}

impl std::fmt::Debug for MatchSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchSession")
            .field("player_a", &self.player_a)
            .field("player_b", &self.player_b)
            .field("state", &self.state)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{InitialScoreRule, WinCondition};
    use std::sync::{Arc, Mutex};

    fn session() -> MatchSession {
        let config = MatchConfiguration::new(WinCondition::Single, InitialScoreRule::Standard);
        MatchSession::from_state(
            Player::new("Alice", 1500),
            Player::new("Bob", 1500),
            MatchScoreState::with_first_server(config, PlayerSlot::A),
        )
    }

    fn recorded(session: &mut MatchSession) -> Arc<Mutex<Vec<StateChange>>> {
        let changes = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&changes);
        session.subscribe(move |change: &StateChange, _: &MatchScoreState| {
            sink.lock().unwrap().push(*change);
        });
        changes
    }

    #[test]
    fn test_listener_sees_each_change() {
        let mut session = session();
        let changes = recorded(&mut session);

        session.apply(MatchInput::Point(PlayerSlot::A));
        session.apply(MatchInput::Point(PlayerSlot::B));
        session.apply(MatchInput::Undo);
        session.apply(MatchInput::Redo);

        assert_eq!(
            *changes.lock().unwrap(),
            vec![
                StateChange::PointAdded(PlayerSlot::A),
                StateChange::PointAdded(PlayerSlot::B),
                StateChange::PointUndone(PlayerSlot::B),
                StateChange::PointRedone(PlayerSlot::B),
            ]
        );
    }

    #[test]
    fn test_no_op_inputs_do_not_notify() {
        let mut session = session();
        let changes = recorded(&mut session);

        assert!(!session.apply(MatchInput::Undo));
        assert!(!session.apply(MatchInput::Redo));
        assert!(!session.apply(MatchInput::StartNext));
        assert!(changes.lock().unwrap().is_empty());
    }

    #[test]
    fn test_finish_after_match_decided() {
        let mut session = session();
        let changes = recorded(&mut session);
        for _ in 0..11 {
            session.add_point(PlayerSlot::A);
        }
        assert!(session.finish().is_none());

        assert!(session.start_next());
        assert_eq!(
            changes.lock().unwrap().last(),
            Some(&StateChange::MatchFinished {
                winner: PlayerSlot::A
            })
        );

        let result = session.finish().unwrap();
        assert_eq!(result.player_a.name, "Alice");
        assert_eq!(result.results, vec![[11, 0]]);
        assert_eq!(session.rating_change().unwrap().after, [1516, 1484]);
    }

    #[test]
    fn test_snapshot_broadcast() {
        let mut session = session();
        let (tx, rx) = std::sync::mpsc::channel();
        session.subscribe(crate::session::SnapshotBroadcaster::new(tx));

        session.add_point(PlayerSlot::B);
        let snapshot = rx.try_recv().unwrap();
        assert_eq!(snapshot.current_set.b, 1);

        let mut remote = MatchSession::from_state(
            Player::unrated("Alice"),
            Player::unrated("Bob"),
            MatchScoreState::new(*session.state().config()),
        );
        remote.replace_state(snapshot).unwrap();
        assert_eq!(remote.state(), session.state());
    }

    #[test]
    fn test_reset_always_notifies() {
        let mut session = session();
        let changes = recorded(&mut session);
        assert!(session.apply(MatchInput::Reset));
        assert_eq!(*changes.lock().unwrap(), vec![StateChange::Reset]);
    }
}
