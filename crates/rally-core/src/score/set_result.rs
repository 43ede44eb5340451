use serde::{Deserialize, Serialize};

use crate::config::rules;
use crate::error::{Error, Result};
use crate::slot::PlayerSlot;

/// Points scored by each side in one set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SetResult {
    pub a: u32,
    pub b: u32,
}

impl SetResult {
    pub fn new(a: u32, b: u32) -> Self {
        Self { a, b }
    }

    pub fn from_pair([a, b]: [u32; 2]) -> Self {
        Self { a, b }
    }

    pub fn as_pair(&self) -> [u32; 2] {
        [self.a, self.b]
    }

    pub fn value_for(&self, slot: PlayerSlot) -> u32 {
        match slot {
            PlayerSlot::A => self.a,
            PlayerSlot::B => self.b,
        }
    }

    pub fn total(&self) -> u32 {
        self.a + self.b
    }

    /// Side with more points, `None` on a tie.
    pub fn leader(&self) -> Option<PlayerSlot> {
        match self.a.cmp(&self.b) {
            std::cmp::Ordering::Greater => Some(PlayerSlot::A),
            std::cmp::Ordering::Less => Some(PlayerSlot::B),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Side that has closed the set: at least `target` points and a two-point lead.
    pub fn winner_at(&self, target: u32) -> Option<PlayerSlot> {
        let leader = self.leader()?;
        let lead = self.value_for(leader);
        let trail = self.value_for(leader.other());
        (lead >= target && lead - trail >= rules::WIN_MARGIN).then_some(leader)
    }

    /// Check whether this is a legally finished set played to `target`.
    ///
    /// A set won at exactly `target` allows any losing score up to
    /// `target - 2`. Past `target` the set went through deuce and must have
    /// ended on the first two-point lead, so the loser has exactly
    /// `winner - 2` (12-10, 13-11, never 12-9).
    pub fn is_valid(&self, target: u32) -> bool {
        let winner = self.a.max(self.b);
        let loser = self.a.min(self.b);

        if winner < target || winner - loser < rules::WIN_MARGIN {
            return false;
        }

        if winner == target {
            loser <= target - rules::WIN_MARGIN
        } else {
            loser == winner - rules::WIN_MARGIN
        }
    }

    /// Validate a manually entered set, reporting its position on failure.
    pub fn validate(&self, index: usize, target: u32) -> Result<()> {
        if self.is_valid(target) {
            Ok(())
        } else {
            Err(Error::InvalidSet {
                index,
                a: self.a,
                b: self.b,
            })
        }
    }

    pub(crate) fn increment(&mut self, slot: PlayerSlot) {
        match slot {
            PlayerSlot::A => self.a += 1,
            PlayerSlot::B => self.b += 1,
        }
    }

    pub(crate) fn decrement(&mut self, slot: PlayerSlot) {
        match slot {
            PlayerSlot::A => self.a = self.a.saturating_sub(1),
            PlayerSlot::B => self.b = self.b.saturating_sub(1),
        }
    }
}

impl std::fmt::Display for SetResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.a, self.b)
    }
}
