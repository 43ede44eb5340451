//! Export formats for finished matches.

mod console;

pub use console::*;

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use serde_json::{Value as JsonValue, json};
use tracing::info;

use crate::error::Result;
use crate::session::MatchResult;
use crate::slot::PlayerSlot;

pub fn format_results_tsv_header() -> String {
    ["Set", "PlayerA", "PlayerB", "Winner"].join("\t")
}

/// One row per set, followed by a totals row with sets won.
pub fn format_results_tsv(result: &MatchResult) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "{}", format_results_tsv_header());

    for (index, [a, b]) in result.results.iter().enumerate() {
        let winner = if a > b {
            &result.player_a.name
        } else {
            &result.player_b.name
        };
        let _ = writeln!(output, "{}\t{}\t{}\t{}", index + 1, a, b, winner);
    }

    let _ = write!(
        output,
        "Sets\t{}\t{}\t{}",
        result.sets_won_by(PlayerSlot::A),
        result.sets_won_by(PlayerSlot::B),
        result.player(result.winner).name
    );
    output
}

/// JSON body handed to the upload/storage collaborator.
pub fn format_result_json(result: &MatchResult) -> JsonValue {
    let mut entry = json!({
        "players": [
            { "name": result.player_a.name, "rating": result.player_a.rating },
            { "name": result.player_b.name, "rating": result.player_b.rating }
        ],
        "winCondition": result.config.win_condition.short_name(),
        "initialScoreRule": result.config.initial_score_rule,
        "results": result.results,
        "winner": result.winner.short_name(),
    });

    if let Some(started_at) = result.started_at {
        entry["startedAt"] = json!(started_at.timestamp_millis());
    }
    if let Some(ended_at) = result.ended_at {
        entry["endedAt"] = json!(ended_at.timestamp_millis());
    }

    entry
}

pub fn export_result_json<P: AsRef<Path>>(path: P, result: &MatchResult) -> Result<()> {
    let json = serde_json::to_string_pretty(&format_result_json(result))?;
    fs::write(&path, json)?;
    info!("Exported match result to {:?}", path.as_ref());
    Ok(())
}
