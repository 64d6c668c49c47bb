/*!
 * Error types for the pinyin-toolkit library.
 *
 * This module contains custom error types for the configuration, dictionary
 * and media layers, using the thiserror crate for ergonomic error definitions.
 *
 * Lookup misses (no dictionary entry, no audio clip) are deliberately absent
 * from this taxonomy: generators degrade to empty output instead.
 */

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building or validating a configuration snapshot
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A tone color is not a `#rgb` or `#rrggbb` value
    #[error("Invalid color for tone {tone}: {value}")]
    InvalidColor {
        /// Tone number (1-5) whose color is malformed
        tone: usize,
        /// The rejected value
        value: String,
    },

    /// The tone palette does not have exactly one color per tone
    #[error("Expected 5 tone colors, found {0}")]
    InvalidToneColorCount(usize),

    /// The meaning numbering color is malformed
    #[error("Invalid meaning numbering color: {0}")]
    InvalidNumberingColor(String),

    /// The dictionary language code is not a known ISO code
    #[error("Invalid dictionary language: {0}")]
    InvalidLanguage(String),

    /// Custom meaning separator selected but left empty
    #[error("Custom meaning separator selected but none given")]
    EmptyCustomSeparator,

    /// No audio extensions configured
    #[error("At least one audio extension is required")]
    EmptyAudioExtensions,

    /// An audio extension does not start with a dot
    #[error("Invalid audio extension: {0}")]
    InvalidAudioExtension(String),

    /// A web dictionary template lacks the search placeholder
    #[error("Web dictionary '{0}' has no {{searchTerms}} placeholder")]
    InvalidWebDictionary(String),

    /// A selector value is not among the expected choices
    #[error("Unknown value '{value}' for option '{option}'")]
    UnknownChoice {
        /// Option name
        option: &'static str,
        /// The rejected value
        value: String,
    },

    /// The configuration could not be parsed
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configuration file could not be read
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur while loading dictionary tables
#[derive(Error, Debug)]
pub enum DictionaryError {
    /// The dictionary file does not exist
    #[error("Dictionary file not found: {}", .0.display())]
    Missing(PathBuf),

    /// Reading the dictionary file failed
    #[error("Failed to read dictionary: {0}")]
    Io(#[from] std::io::Error),

    /// A registry was asked for an engine without any fallback table
    #[error("No character table available in {}", .0.display())]
    NoSources(PathBuf),
}

/// Errors that can occur while discovering media packs
#[derive(Error, Debug)]
pub enum MediaError {
    /// The media pack root is not a directory
    #[error("Media pack location is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// Walking the media directory failed
    #[error("Failed to scan media directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from configuration handling
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error from dictionary loading
    #[error("Dictionary error: {0}")]
    Dictionary(#[from] DictionaryError),

    /// Error from media pack discovery
    #[error("Media error: {0}")]
    Media(#[from] MediaError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
