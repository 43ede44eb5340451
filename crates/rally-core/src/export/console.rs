//! Console output formatting with colored display

use std::fmt::Write as _;

use owo_colors::OwoColorize;

use crate::rating::RatingChange;
use crate::score::{Combo, MatchPhase, MatchScoreState};
use crate::session::{MatchResult, MatchSession};
use crate::slot::PlayerSlot;

const BORDER_WIDTH: usize = 40;

/// Format the live scoreboard of a session with colored output.
///
/// The serving player gets two dots before their first serve and one dot
/// before their second (always one past the deuce threshold).
pub fn format_scoreboard(session: &MatchSession) -> String {
    let state = session.state();
    let mut output = String::new();
    let border = "━".repeat(BORDER_WIDTH);

    let header = match state.phase() {
        MatchPhase::InProgress { set_number } => format!(
            "Set {} of up to {} ({})",
            set_number,
            state.config().total_sets(),
            state.config().win_condition
        ),
        MatchPhase::SetComplete { winner } => format!(
            "Set {} to {} - press next",
            state.set_number(),
            session.player(winner).name
        ),
        MatchPhase::MatchComplete { winner } => {
            format!("{} wins the match", session.player(winner).name)
        }
    };

    let _ = writeln!(output, "{}", border.dimmed());
    let _ = writeln!(output, "  {}", header.bold());
    let _ = writeln!(output, "{}", border.dimmed());

    for slot in [PlayerSlot::A, PlayerSlot::B] {
        let serve = if state.is_complete() || state.server() != slot {
            "  "
        } else if state.is_second_serve() {
            "● "
        } else {
            "●●"
        };
        let points = state.current_set().value_for(slot);
        let points = if state.winner() == Some(slot) {
            points.green().bold().to_string()
        } else {
            points.to_string()
        };
        let _ = write!(
            output,
            "  {} {:<16} {:>2}  {:>3}",
            serve.yellow(),
            session.player(slot).name,
            state.sets_won_by(slot),
            points
        );
        if let Some(combo) = state.combo_for(slot) {
            let _ = write!(output, "  {}", format_colored_combo(&combo));
        }
        let _ = writeln!(output);
    }

    if !state.completed_sets().is_empty() {
        let sets: Vec<String> = state
            .completed_sets()
            .iter()
            .map(ToString::to_string)
            .collect();
        let _ = writeln!(output, "  SETS   : {}", sets.join("  "));
    }
    let _ = write!(output, "{}", border.dimmed());

    output
}

/// Format a finished match and the resulting rating update.
pub fn format_result_console(result: &MatchResult, change: Option<&RatingChange>) -> String {
    let mut output = String::new();
    let border = "━".repeat(BORDER_WIDTH);
    let winner = result.player(result.winner);

    let _ = writeln!(output, "{}", border.dimmed());
    let _ = writeln!(
        output,
        "  {} {} {}-{}",
        winner.name.bold(),
        "wins".green(),
        result.sets_won_by(result.winner),
        result.sets_won_by(result.winner.other())
    );
    let _ = writeln!(output, "{}", border.dimmed());

    let sets: Vec<String> = result
        .results
        .iter()
        .map(|[a, b]| format!("{}-{}", a, b))
        .collect();
    let _ = writeln!(output, "  SETS   : {}", sets.join("  "));

    if let Some(change) = change {
        for slot in [PlayerSlot::A, PlayerSlot::B] {
            let delta = change.delta(slot);
            let delta = if delta >= 0 {
                format!("+{}", delta).green().to_string()
            } else {
                delta.red().to_string()
            };
            let _ = writeln!(
                output,
                "  RATING : {:<16} {} -> {} ({})",
                result.player(slot).name,
                change.before(slot),
                change.after(slot),
                delta
            );
        }
    }
    let _ = write!(output, "{}", border.dimmed());

    output
}

/// Format combo with color
fn format_colored_combo(combo: &Combo) -> String {
    let label = combo.label();
    match combo {
        Combo::Perfect => label.truecolor(255, 200, 0).bold().to_string(),
        Combo::PerfectMatchPoint | Combo::RoadToPerfect => {
            label.truecolor(255, 165, 0).to_string()
        }
        Combo::MatchPoint => label.red().bold().to_string(),
        Combo::PointsStreak(_) => label.cyan().to_string(),
    }
}

/// Plain one-line state summary for logging
pub fn format_state_summary(state: &MatchScoreState) -> String {
    let sets: Vec<String> = state
        .completed_sets()
        .iter()
        .map(ToString::to_string)
        .collect();
    format!(
        "set {} {} [{}] sets {}-{} server {}",
        state.set_number(),
        state.current_set(),
        sets.join(" "),
        state.sets_won_by(PlayerSlot::A),
        state.sets_won_by(PlayerSlot::B),
        state.server()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{InitialScoreRule, MatchConfiguration, WinCondition};
    use crate::session::Player;

    fn session() -> MatchSession {
        MatchSession::from_state(
            Player::new("Alice", 1500),
            Player::new("Bob", 1500),
            MatchScoreState::with_first_server(
                MatchConfiguration::new(WinCondition::BestOf3, InitialScoreRule::Standard),
                PlayerSlot::A,
            ),
        )
    }

    #[test]
    fn test_format_state_summary() {
        let mut session = session();
        for _ in 0..11 {
            session.add_point(PlayerSlot::A);
        }
        session.start_next();
        session.add_point(PlayerSlot::B);

        assert_eq!(
            format_state_summary(session.state()),
            "set 2 0-1 [11-0] sets 1-0 server B"
        );
    }

    #[test]
    fn test_scoreboard_mentions_players_and_combo() {
        let mut session = session();
        for _ in 0..3 {
            session.add_point(PlayerSlot::B);
        }
        let board = format_scoreboard(&session);
        assert!(board.contains("Alice"));
        assert!(board.contains("Bob"));
        assert!(board.contains("3 POINTS STREAK"));
    }

    #[test]
    fn test_result_console_shows_rating_change() {
        let result = MatchResult::from_manual(
            Player::new("Alice", 1500),
            Player::new("Bob", 1500),
            MatchConfiguration::new(WinCondition::Single, InitialScoreRule::Standard),
            vec![[11, 6]],
        )
        .unwrap();
        let change = result.rating_change();
        let text = format_result_console(&result, Some(&change));
        assert!(text.contains("1500 -> 1516"));
        assert!(text.contains("1500 -> 1484"));
    }
}
