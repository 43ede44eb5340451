//! Validation of manually entered set scores.

use anyhow::{Context, Result, anyhow, bail};
use rally_core::{MatchResult, SetResult, WinCondition};

use crate::settings::Settings;

/// Check each set and whether together they decide the match
pub fn run(settings: &Settings, sets: &[String], win: Option<WinCondition>) -> Result<()> {
    let config = settings.match_config(win);
    let results = sets
        .iter()
        .map(|set| parse_set(set))
        .collect::<Result<Vec<_>>>()?;

    let mut invalid = 0;
    for (index, pair) in results.iter().enumerate() {
        let set = SetResult::from_pair(*pair);
        if set.is_valid(config.game_points()) {
            println!("Set {}: {} ok", index + 1, set);
        } else {
            println!("Set {}: {} is not a finished set", index + 1, set);
            invalid += 1;
        }
    }
    if invalid > 0 {
        bail!("{} of {} sets are invalid", invalid, results.len());
    }

    let (player_a, player_b) = settings.players();
    let result = MatchResult::from_manual(player_a, player_b, config, results)
        .with_context(|| format!("Sets do not decide a {} match", config.win_condition))?;
    println!(
        "{} wins {}-{}",
        result.player(result.winner).name,
        result.sets_won_by(result.winner),
        result.sets_won_by(result.winner.other())
    );
    Ok(())
}

/// Parse `A-B` (also accepts `A:B`).
fn parse_set(text: &str) -> Result<[u32; 2]> {
    let (a, b) = text
        .split_once(['-', ':'])
        .ok_or_else(|| anyhow!("Expected a set score like 11-9, got {:?}", text))?;
    let a = a
        .trim()
        .parse()
        .with_context(|| format!("Invalid points in {:?}", text))?;
    let b = b
        .trim()
        .parse()
        .with_context(|| format!("Invalid points in {:?}", text))?;
    Ok([a, b])
}
