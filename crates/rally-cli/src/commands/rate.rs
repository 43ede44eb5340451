//! Rating update for a finished match.

use anyhow::{Result, ensure};
use rally_core::{PlayerSlot, RatingChange, RatingEngine};

use crate::settings::Settings;

/// Print the rating change when `winner` beats the other player
pub fn run(
    settings: &Settings,
    rating_a: i32,
    rating_b: i32,
    winner: PlayerSlot,
    k_factor: Option<f64>,
) -> Result<()> {
    let k_factor = k_factor.unwrap_or(settings.match_config(None).k_factor);
    ensure!(
        RatingEngine::is_valid_k_factor(k_factor),
        "K-factor must be a positive number, got {}",
        k_factor
    );

    let engine = RatingEngine::new(k_factor);
    let change = engine.rate(rating_a, rating_b, winner);
    println!("{}", format_change(&change, k_factor));
    Ok(())
}

fn format_change(change: &RatingChange, k_factor: f64) -> String {
    let lines: Vec<String> = [PlayerSlot::A, PlayerSlot::B]
        .into_iter()
        .map(|slot| {
            format!(
                "{}: {} -> {} ({:+})",
                slot,
                change.before(slot),
                change.after(slot),
                change.delta(slot)
            )
        })
        .collect();
    format!("K = {}\n{}", k_factor, lines.join("\n"))
}
