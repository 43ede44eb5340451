//! Interactive scoring from the keyboard.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{self, ClearType};
use crossterm::{cursor, execute};
use rally_core::{
    MatchInput, MatchScoreState, MatchSession, PlayerSlot, StateChange, WinCondition,
    format_result_console, format_scoreboard,
};
use tracing::{debug, info, warn};

use crate::settings::Settings;

const KEY_HELP: &str =
    "a/← point A  b/→ point B  u undo  r redo  n/enter next set  x reset  q/esc quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyAction {
    Input(MatchInput),
    Quit,
}

/// Run an interactive match, autosaving a snapshot after every change
pub fn run(
    settings: &Settings,
    win: Option<WinCondition>,
    resume: bool,
    snapshot: Option<PathBuf>,
) -> Result<()> {
    let snapshot_path = snapshot.unwrap_or_else(|| settings.snapshot_path());
    let (player_a, player_b) = settings.players();

    let state = if resume {
        if win.is_some() {
            warn!("Ignoring --win, the resumed match keeps its own configuration");
        }
        MatchScoreState::load_snapshot(&snapshot_path)
            .with_context(|| format!("Failed to resume match from {:?}", snapshot_path))?
    } else {
        MatchScoreState::new(settings.match_config(win))
    };
    info!(
        config = ?state.config(),
        first_server = %state.first_server_of_set(),
        "starting match"
    );

    if let Some(parent) = snapshot_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create snapshot directory {:?}", parent))?;
    }

    let mut session = MatchSession::from_state(player_a, player_b, state);
    let autosave_path = snapshot_path.clone();
    session.subscribe(move |_: &StateChange, state: &MatchScoreState| {
        if let Err(e) = state.save_snapshot(&autosave_path) {
            warn!("Failed to autosave match: {}", e);
        }
    });

    terminal::enable_raw_mode().context("Failed to enable raw terminal mode")?;
    let outcome = event_loop(&mut session);
    terminal::disable_raw_mode().context("Failed to restore terminal mode")?;
    outcome?;

    match session.finish() {
        Some(result) => {
            let change = result.rating_change();
            println!("{}", format_result_console(&result, Some(&change)));
        }
        None => println!(
            "Match saved to {}, continue with `rally play --resume`",
            snapshot_path.display()
        ),
    }
    Ok(())
}

fn event_loop(session: &mut MatchSession) -> Result<()> {
    let mut stdout = io::stdout();
    loop {
        render(&mut stdout, session)?;
        if session.state().is_complete() {
            return Ok(());
        }

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match map_key(key) {
            Some(KeyAction::Quit) => return Ok(()),
            Some(KeyAction::Input(input)) => {
                if !session.apply(input) {
                    debug!(%input, "input had no effect");
                }
            }
            None => {}
        }
    }
}

fn render(stdout: &mut impl Write, session: &MatchSession) -> Result<()> {
    execute!(stdout, terminal::Clear(ClearType::All), cursor::MoveTo(0, 0))?;
    // Raw mode needs explicit carriage returns
    let board = format_scoreboard(session).replace('\n', "\r\n");
    write!(stdout, "{}\r\n{}\r\n", board, KEY_HELP)?;
    stdout.flush()?;
    Ok(())
}

fn map_key(key: KeyEvent) -> Option<KeyAction> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return (key.code == KeyCode::Char('c')).then_some(KeyAction::Quit);
    }

    let action = match key.code {
        KeyCode::Char('a') | KeyCode::Left => KeyAction::Input(MatchInput::Point(PlayerSlot::A)),
        KeyCode::Char('b') | KeyCode::Right => KeyAction::Input(MatchInput::Point(PlayerSlot::B)),
        KeyCode::Char('u') | KeyCode::Backspace => KeyAction::Input(MatchInput::Undo),
        KeyCode::Char('r') => KeyAction::Input(MatchInput::Redo),
        KeyCode::Char('n') | KeyCode::Enter => KeyAction::Input(MatchInput::StartNext),
        KeyCode::Char('x') => KeyAction::Input(MatchInput::Reset),
        KeyCode::Char('q') | KeyCode::Esc => KeyAction::Quit,
        _ => return None,
    };
    Some(action)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_map_point_keys() {
        assert_eq!(
            map_key(key(KeyCode::Char('a'))),
            Some(KeyAction::Input(MatchInput::Point(PlayerSlot::A)))
        );
        assert_eq!(
            map_key(key(KeyCode::Right)),
            Some(KeyAction::Input(MatchInput::Point(PlayerSlot::B)))
        );
    }

    #[test]
    fn test_map_control_keys() {
        assert_eq!(
            map_key(key(KeyCode::Backspace)),
            Some(KeyAction::Input(MatchInput::Undo))
        );
        assert_eq!(
            map_key(key(KeyCode::Enter)),
            Some(KeyAction::Input(MatchInput::StartNext))
        );
        assert_eq!(map_key(key(KeyCode::Esc)), Some(KeyAction::Quit));
        assert_eq!(
            map_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(KeyAction::Quit)
        );
        assert_eq!(
            map_key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL)),
            None
        );
        assert_eq!(map_key(key(KeyCode::Char('z'))), None);
    }
}
