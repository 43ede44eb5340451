use std::sync::mpsc::Sender;

use tracing::debug;

use crate::score::{MatchScoreState, MatchSnapshot};
use crate::slot::PlayerSlot;

/// What an effective mutation did to the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateChange {
    PointAdded(PlayerSlot),
    PointUndone(PlayerSlot),
    PointRedone(PlayerSlot),
    /// A set was closed and the given (1-based) set started.
    SetStarted { set_number: u32 },
    MatchFinished { winner: PlayerSlot },
    Reset,
    /// The whole state was swapped for a snapshot received from elsewhere.
    Replaced,
}

/// Receives a notification after every mutation that changed the state.
pub trait StateListener {
    fn on_change(&mut self, change: &StateChange, state: &MatchScoreState);
}

impl<F> StateListener for F
where
    F: FnMut(&StateChange, &MatchScoreState),
{
    fn on_change(&mut self, change: &StateChange, state: &MatchScoreState) {
        self(change, state)
    }
}

/// Forwards a full snapshot over a channel after each change.
///
/// This is the hand-off point for a sync transport, which replaces remote
/// copies with whatever snapshot arrives last.
pub struct SnapshotBroadcaster {
    tx: Sender<MatchSnapshot>,
}

impl SnapshotBroadcaster {
    pub fn new(tx: Sender<MatchSnapshot>) -> Self {
        Self { tx }
    }
}

impl StateListener for SnapshotBroadcaster {
    fn on_change(&mut self, change: &StateChange, state: &MatchScoreState) {
        if self.tx.send(state.snapshot()).is_err() {
            debug!(?change, "snapshot receiver dropped");
        }
    }
}
