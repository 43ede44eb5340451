use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid set result #{index}: {a}-{b}")]
    InvalidSet { index: usize, a: u32, b: u32 },

    #[error("Results do not decide the match: {sets_a}-{sets_b} in sets, {sets_to_win} needed")]
    UndecidedResults {
        sets_a: u32,
        sets_b: u32,
        sets_to_win: u32,
    },

    #[error("Results continue after the match was decided at set #{decided_at}")]
    TrailingSets { decided_at: usize },

    #[error("Unknown input: {0}")]
    UnknownInput(String),

    #[error("Corrupt snapshot: {0}")]
    CorruptSnapshot(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
