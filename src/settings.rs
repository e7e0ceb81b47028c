//! Settings persistence using TOML
//!
//! Stores settings in ~/.config/blockfall/settings.toml (or platform equivalent)

use crate::board::{DEFAULT_COLS, DEFAULT_ROWS, MIN_COLS, MIN_ROWS};
use crate::clear::BlinkSettings;
use crate::error::SettingsError;
use crate::game::GameConfig;
use crate::score::Rules;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Largest board accepted from the settings file
pub const MAX_DIMENSION: usize = 64;

/// Game settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Keybindings
    pub keys: KeyBindings,
    /// Board dimensions
    pub board: BoardSettings,
    /// Scoring and leveling rules
    pub rules: Rules,
    /// Line-clear blink timing
    pub blink: BlinkSettings,
    /// Visual settings
    pub visual: VisualSettings,
    /// Audio settings
    pub audio: AudioSettings,
    /// Best finished game
    pub high_score: HighScore,
    /// Set when the file on disk could not be parsed; saving leaves it alone
    #[serde(skip)]
    preserve_file: bool,
}

/// Key bindings (stored as strings for easy editing)
/// Each action can have one or more keys bound to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub move_left: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub move_right: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub soft_drop: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub rotate: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub start: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub quit: Vec<String>,
}

/// Deserialize keys as either a single string or array of strings
fn deserialize_keys<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};

    struct KeysVisitor;

    impl<'de> Visitor<'de> for KeysVisitor {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a string or array of strings")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![v.to_string()])
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: de::SeqAccess<'de>,
        {
            let mut keys = Vec::new();
            while let Some(key) = seq.next_element::<String>()? {
                keys.push(key);
            }
            Ok(keys)
        }
    }

    deserializer.deserialize_any(KeysVisitor)
}

/// Serialize keys: single key as string, multiple as array
fn serialize_keys<S>(keys: &[String], serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    use serde::ser::SerializeSeq;

    if let [only] = keys {
        serializer.serialize_str(only)
    } else {
        let mut seq = serializer.serialize_seq(Some(keys.len()))?;
        for key in keys {
            seq.serialize_element(key)?;
        }
        seq.end()
    }
}

/// Board dimensions, fixed for the lifetime of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardSettings {
    pub rows: usize,
    pub cols: usize,
}

/// Visual settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualSettings {
    /// Ghost piece visibility
    pub show_ghost: bool,
    /// Block style: "solid", "bracket", "round"
    pub block_style: String,
}

/// Audio settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    pub enabled: bool,
    /// Volume (0-100)
    pub volume: u32,
}

/// Best finished game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HighScore {
    pub score: u64,
    pub lines: u32,
    pub level: u32,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            move_left: vec!["Left".to_string()],
            move_right: vec!["Right".to_string()],
            soft_drop: vec!["Down".to_string()],
            rotate: vec!["Up".to_string()],
            start: vec!["Enter".to_string(), "Space".to_string()],
            quit: vec!["q".to_string(), "Esc".to_string()],
        }
    }
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
        }
    }
}

impl Default for VisualSettings {
    fn default() -> Self {
        Self {
            show_ghost: true,
            block_style: "solid".to_string(),
        }
    }
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            volume: 50,
        }
    }
}

impl Settings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("com", "blockfall", "blockfall")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the settings file path
    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("settings.toml"))
    }

    /// Load settings from the platform config file, or fall back to defaults
    pub fn load() -> Self {
        match Self::settings_path() {
            Some(path) => Self::load_or_default(&path),
            None => Self::default(),
        }
    }

    /// Load settings from `path`. A missing file gives defaults; an
    /// unreadable one gives defaults that will not be written back over it.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match Self::load_from(path) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Ignoring settings at {}: {}", path.display(), e);
                Self {
                    preserve_file: true,
                    ..Self::default()
                }
            }
        }
    }

    /// Load and sanitize settings from a specific file
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse settings from TOML text
    pub fn from_toml(contents: &str) -> Result<Self, SettingsError> {
        let mut settings: Settings = toml::from_str(contents)?;
        settings.sanitize();
        Ok(settings)
    }

    /// Save settings to the platform config file
    pub fn save(&self) -> Result<(), SettingsError> {
        let path = Self::settings_path().ok_or(SettingsError::NoConfigDir)?;
        self.save_to(&path)
    }

    /// Save settings to a specific file, creating its directory if needed.
    /// Does nothing if these settings replaced a file that failed to load.
    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if self.preserve_file {
            warn!("Not overwriting unreadable settings at {}", path.display());
            return Ok(());
        }
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Clamp values that would make an unplayable game
    fn sanitize(&mut self) {
        let board = &mut self.board;
        let clamped_rows = board.rows.clamp(MIN_ROWS, MAX_DIMENSION);
        let clamped_cols = board.cols.clamp(MIN_COLS, MAX_DIMENSION);
        if (clamped_rows, clamped_cols) != (board.rows, board.cols) {
            warn!(
                "Board {}x{} out of range, using {}x{}",
                board.rows, board.cols, clamped_rows, clamped_cols
            );
            board.rows = clamped_rows;
            board.cols = clamped_cols;
        }
        self.audio.volume = self.audio.volume.min(100);
        if self.rules.min_drop_interval_ms == 0 {
            warn!("min_drop_interval_ms must be positive, using 1");
            self.rules.min_drop_interval_ms = 1;
        }
    }

    /// Game configuration derived from these settings
    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            rows: self.board.rows,
            cols: self.board.cols,
            rules: self.rules,
            blink: self.blink,
        }
    }

    /// Record a finished game. Returns true if it beat the stored best.
    pub fn record_score(&mut self, score: u64, lines: u32, level: u32) -> bool {
        if score <= self.high_score.score {
            return false;
        }
        self.high_score = HighScore {
            score,
            lines,
            level,
        };
        true
    }
}

impl AudioSettings {
    /// Volume as a 0.0 to 1.0 gain, or zero when disabled
    pub fn gain(&self) -> f32 {
        if self.enabled {
            self.volume.min(100) as f32 / 100.0
        } else {
            0.0
        }
    }
}

impl VisualSettings {
    /// Get the block characters based on style
    pub fn block_chars(&self) -> (&'static str, &'static str) {
        match self.block_style.as_str() {
            "bracket" => ("[]", ".."),
            "round" => ("()", ".."),
            _ => ("██", "░░"), // "solid" or default
        }
    }
}
