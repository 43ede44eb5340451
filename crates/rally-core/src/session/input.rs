use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::slot::PlayerSlot;

/// The operations a caller can trigger on a match.
///
/// Taps, remote buttons and keyboard shortcuts are all normalized into one
/// of these before reaching the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchInput {
    Point(PlayerSlot),
    Undo,
    Redo,
    StartNext,
    Reset,
}

impl FromStr for MatchInput {
    type Err = Error;

    /// Parse a short token: `a`, `b`, `undo`/`u`, `redo`/`r`, `next`/`n`, `reset`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_ascii_lowercase();
        let input = match token.as_str() {
            "a" => Self::Point(PlayerSlot::A),
            "b" => Self::Point(PlayerSlot::B),
            "u" | "undo" => Self::Undo,
            "r" | "redo" => Self::Redo,
            "n" | "next" => Self::StartNext,
            "reset" => Self::Reset,
            _ => return Err(Error::UnknownInput(s.trim().to_string())),
        };
        Ok(input)
    }
}

impl std::fmt::Display for MatchInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Point(slot) => write!(f, "point {}", slot),
            Self::Undo => write!(f, "undo"),
            Self::Redo => write!(f, "redo"),
            Self::StartNext => write!(f, "next"),
            Self::Reset => write!(f, "reset"),
        }
    }
}

/// Parse whitespace-separated input tokens, ignoring `#` comments.
pub fn parse_inputs(script: &str) -> Result<Vec<MatchInput>, Error> {
    script
        .lines()
        .map(|line| line.split('#').next().unwrap_or_default())
        .flat_map(str::split_whitespace)
        .map(MatchInput::from_str)
        .collect()
}
