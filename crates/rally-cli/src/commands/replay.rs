//! Replay a script of inputs through a fresh match.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use rally_core::{
    MatchInput, MatchScoreState, MatchSession, PlayerSlot, WinCondition, format_result_json,
    format_results_tsv, format_state_summary, parse_inputs,
};
use tracing::debug;

use crate::cli::ExportFormat;
use crate::settings::Settings;

/// Replay `script` and export the finished match
pub fn run(
    settings: &Settings,
    script: &Path,
    win: Option<WinCondition>,
    first_server: PlayerSlot,
    output: Option<&Path>,
    format: ExportFormat,
) -> Result<()> {
    let content = fs::read_to_string(script)
        .with_context(|| format!("Failed to read script {:?}", script))?;
    let inputs =
        parse_inputs(&content).with_context(|| format!("Failed to parse script {:?}", script))?;

    let (player_a, player_b) = settings.players();
    let state = MatchScoreState::with_first_server(settings.match_config(win), first_server);
    let mut session = MatchSession::from_state(player_a, player_b, state);

    let ignored = apply_inputs(&mut session, &inputs, first_server);
    eprintln!(
        "Replayed {} inputs ({} without effect): {}",
        inputs.len(),
        ignored,
        format_state_summary(session.state())
    );

    let Some(result) = session.finish() else {
        bail!("Match is not finished after replaying {:?}", script);
    };

    let content = match format {
        ExportFormat::Tsv => format_results_tsv(&result),
        ExportFormat::Json => serde_json::to_string_pretty(&format_result_json(&result))?,
    };

    if let Some(output_path) = output {
        fs::write(output_path, &content)
            .with_context(|| format!("Failed to write {:?}", output_path))?;
        eprintln!("Exported to: {}", output_path.display());
    } else {
        println!("{}", content);
    }

    Ok(())
}

/// Apply `inputs` in order and return how many had no effect.
///
/// A `reset` starts over with `first_server` serving so the replay stays
/// reproducible.
fn apply_inputs(
    session: &mut MatchSession,
    inputs: &[MatchInput],
    first_server: PlayerSlot,
) -> usize {
    let mut ignored = 0;
    for &input in inputs {
        let changed = match input {
            MatchInput::Reset => {
                session.reset_with_first_server(first_server);
                true
            }
            _ => session.apply(input),
        };
        if !changed {
            debug!(%input, "input had no effect");
            ignored += 1;
        }
    }
    ignored
}
