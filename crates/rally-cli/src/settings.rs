//! User settings loaded from `config.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, ensure};
use rally_core::{InitialScoreRule, MatchConfiguration, Player, RatingEngine, WinCondition};
use serde::{Deserialize, Serialize};
use tracing::info;

const APP_DIR: &str = "rally";
const SETTINGS_FILE: &str = "config.toml";
const SNAPSHOT_FILE: &str = "match.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    pub name: String,
    pub rating: i32,
}

impl PlayerSettings {
    fn named(name: &str) -> Self {
        let player = Player::unrated(name);
        Self {
            name: player.name,
            rating: player.rating,
        }
    }
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self::named("Player")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub player_a: PlayerSettings,
    pub player_b: PlayerSettings,
    pub win_condition: WinCondition,
    pub initial_score_rule: InitialScoreRule,
    /// Overrides the rule's default K-factor.
    pub k_factor: Option<f64>,
    pub snapshot_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            player_a: PlayerSettings::named("Player A"),
            player_b: PlayerSettings::named("Player B"),
            win_condition: WinCondition::default(),
            initial_score_rule: InitialScoreRule::default(),
            k_factor: None,
            snapshot_path: None,
        }
    }
}

impl Settings {
    /// Load settings from `path`, or from the user config dir when no path is given.
    ///
    /// A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path.map(Path::to_path_buf).or_else(default_settings_path) else {
            info!("No config directory found, using default settings");
            return Ok(Self::default());
        };

        if !path.exists() {
            info!("Settings file {:?} not found, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read settings from {:?}", path))?;
        let settings: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings in {:?}", path))?;
        if let Some(k_factor) = settings.k_factor {
            ensure!(
                RatingEngine::is_valid_k_factor(k_factor),
                "Invalid k_factor {} in {:?}: must be a positive number",
                k_factor,
                path
            );
        }
        info!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    pub fn match_config(&self, win_condition: Option<WinCondition>) -> MatchConfiguration {
        let config = MatchConfiguration::new(
            win_condition.unwrap_or(self.win_condition),
            self.initial_score_rule,
        );
        match self.k_factor {
            Some(k_factor) => config.with_k_factor(k_factor),
            None => config,
        }
    }

    pub fn players(&self) -> (Player, Player) {
        (
            Player::new(&self.player_a.name, self.player_a.rating),
            Player::new(&self.player_b.name, self.player_b.rating),
        )
    }

    /// Snapshot file for autosave and `show`, falling back to the data dir.
    pub fn snapshot_path(&self) -> PathBuf {
        self.snapshot_path.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|dir| dir.join(APP_DIR))
                .unwrap_or_default()
                .join(SNAPSHOT_FILE)
        })
    }
}

fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(SETTINGS_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.player_a.rating, 1500);
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
win_condition = "bo5"
k_factor = 20.0

[player_a]
name = "Alice"
rating = 1620

[initial_score_rule]
kind = "handicap"
a = 0
b = 3
"#,
        )
        .unwrap();

        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.player_a.name, "Alice");
        assert_eq!(settings.player_b, PlayerSettings::named("Player B"));

        let config = settings.match_config(None);
        assert_eq!(config.win_condition, WinCondition::BestOf5);
        assert_eq!(config.initial_score_rule, InitialScoreRule::Handicap { a: 0, b: 3 });
        assert_eq!(config.k_factor, 20.0);

        let single = settings.match_config(Some(WinCondition::Single));
        assert_eq!(single.sets_to_win(), 1);
    }

    #[test]
    fn test_rejects_unusable_k_factor() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        for k_factor in ["0.0", "-16.0", "nan", "inf"] {
            fs::write(&path, format!("k_factor = {}", k_factor)).unwrap();
            assert!(Settings::load(Some(&path)).is_err(), "accepted k_factor {}", k_factor);
        }
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "win_condition = \"bo4\"").unwrap();
        assert!(Settings::load(Some(&path)).is_err());
    }
}
