/// Error types for settings persistence
use thiserror::Error;

/// Errors from loading or saving the settings file
#[derive(Debug, Error)]
pub enum SettingsError {
    /// No platform config directory could be determined
    #[error("Could not determine config directory")]
    NoConfigDir,

    /// The settings file is not valid TOML for `Settings`
    #[error("Failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),

    /// The settings could not be serialized
    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
