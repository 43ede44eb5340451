//! Display a saved match snapshot.

use std::path::PathBuf;

use anyhow::{Context, Result};
use rally_core::{MatchScoreState, MatchSession, format_scoreboard};

use crate::settings::Settings;

/// Print the snapshot at `snapshot` (or the configured path)
pub fn run(settings: &Settings, snapshot: Option<PathBuf>, json: bool) -> Result<()> {
    let path = snapshot.unwrap_or_else(|| settings.snapshot_path());
    let state = MatchScoreState::load_snapshot(&path)
        .with_context(|| format!("Failed to load snapshot from {:?}", path))?;

    if json {
        println!("{}", state.to_json()?);
        return Ok(());
    }

    let (player_a, player_b) = settings.players();
    let config = *state.config();
    let session = MatchSession::from_state(player_a, player_b, state);
    println!("{}", format_scoreboard(&session));
    println!(
        "Started {} | ~{} min for {}",
        session.state().started_at().format("%Y-%m-%d %H:%M"),
        config.estimated_minutes(),
        config.win_condition
    );
    Ok(())
}
