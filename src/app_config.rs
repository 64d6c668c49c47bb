use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::default::Default;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::dictionary::Script;
use crate::errors::ConfigError;
use crate::fields::FieldKind;
use crate::language_utils::is_valid_language_code;

/// Application configuration module
/// This module holds the option snapshot read by the field generators:
/// loading, defaults and eager validation. Invalid values are rejected here
/// so they can never surface halfway through an update.
static COLOR_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("Invalid color regex"));

/// Placeholder replaced by the expression in web dictionary URLs
pub const SEARCH_TERMS_PLACEHOLDER: &str = "{searchTerms}";

/// Implements Display/FromStr for a unit-variant option enum
macro_rules! option_choices {
    ($ty:ident, $option:literal, { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            // @returns: Configuration spelling of the choice
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ConfigError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($name => Ok(Self::$variant),)+
                    _ => Err(ConfigError::UnknownChoice {
                        option: $option,
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

/// How syllables are written
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ToneDisplay {
    // @display: hao3
    Numeric,
    // @display: hǎo
    #[default]
    Tonified,
}

option_choices!(ToneDisplay, "tone_display", {
    Numeric => "numeric",
    Tonified => "tonified",
});

/// Markers placed in front of each meaning
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MeaningNumbering {
    // @marker: (1) (2) (3)
    ArabicParens,
    // @marker: ① ② ③
    #[default]
    CircledArabic,
    // @marker: ㊀ ㊁ ㊂
    CircledChinese,
    // @marker: none, a single leading space remains
    #[serde(rename = "none")]
    Unnumbered,
}

option_choices!(MeaningNumbering, "meaning_numbering", {
    ArabicParens => "arabic_parens",
    CircledArabic => "circled_arabic",
    CircledChinese => "circled_chinese",
    Unnumbered => "none",
});

/// Separator placed between meanings
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MeaningSeparator {
    #[default]
    Lines,
    Commas,
    Custom,
}

option_choices!(MeaningSeparator, "meaning_separator", {
    Lines => "lines",
    Commas => "commas",
    Custom => "custom",
});

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

option_choices!(LogLevel, "log_level", {
    Error => "error",
    Warn => "warn",
    Info => "info",
    Debug => "debug",
    Trace => "trace",
});

/// An online dictionary linked from the weblinks field
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct WebDictionary {
    /// Link text and title
    pub name: String,

    /// URL template containing `{searchTerms}`
    pub url: String,
}

impl WebDictionary {
    pub fn new(name: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
        }
    }
}

/// Represents the option snapshot for one update run
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Meaning language code (ISO)
    #[serde(default = "default_dict_language")]
    pub dict_language: String,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    // @field: Numeric or tone-marked pinyin
    #[serde(default)]
    pub tone_display: ToneDisplay,

    /// Colors for tones 1-5, the fifth being the neutral tone
    #[serde(default = "default_tone_colors")]
    pub tone_colors: Vec<String>,

    // @field: Color syllables and characters in reading, meaning and mw fields
    #[serde(default = "default_true")]
    pub colorized_pinyin_generation: bool,

    // @field: Fill the color field
    #[serde(default = "default_true")]
    pub colorized_character_generation: bool,

    #[serde(default)]
    pub meaning_numbering: MeaningNumbering,

    #[serde(default = "default_true")]
    pub color_meaning_numbers: bool,

    #[serde(default = "default_meaning_numbering_color")]
    pub meaning_numbering_color: String,

    #[serde(default)]
    pub meaning_separator: MeaningSeparator,

    /// Used when `meaning_separator` is `custom`
    #[serde(default = "default_custom_meaning_separator")]
    pub custom_meaning_separator: String,

    // @field: Bold the first meaning
    #[serde(default)]
    pub emphasise_main_meaning: bool,

    // @field: Hide the expression's characters inside its meanings
    #[serde(default)]
    pub hanzi_masking: bool,

    #[serde(default = "default_hanzi_masking_character")]
    pub hanzi_masking_character: String,

    #[serde(default)]
    pub prefer_simp_trad: Script,

    #[serde(default = "default_true")]
    pub reading_generation: bool,

    #[serde(default = "default_true")]
    pub meaning_generation: bool,

    /// Put measure words in their own field rather than the meanings
    #[serde(default = "default_true")]
    pub detect_measure_words: bool,

    #[serde(default = "default_true")]
    pub audio_generation: bool,

    #[serde(default = "default_true")]
    pub mw_audio_generation: bool,

    #[serde(default = "default_true")]
    pub trad_generation: bool,

    #[serde(default = "default_true")]
    pub simp_generation: bool,

    #[serde(default = "default_true")]
    pub weblink_generation: bool,

    /// Audio file extensions, most preferred first
    #[serde(default = "default_audio_extensions")]
    pub audio_extensions: Vec<String>,

    #[serde(default = "default_true")]
    pub force_reading_to_be_formatted: bool,

    #[serde(default = "default_true")]
    pub force_meaning_numbers_to_be_formatted: bool,

    #[serde(default = "default_true")]
    pub force_pinyin_in_audio_to_sound_tags: bool,

    #[serde(default)]
    pub force_expression_to_be_simp_trad: bool,

    #[serde(default = "default_web_dictionaries")]
    pub web_dictionaries: Vec<WebDictionary>,

    /// Fact keys that may hold each logical field, in priority order
    #[serde(default = "default_candidate_field_names")]
    pub candidate_field_names: BTreeMap<FieldKind, Vec<String>>,
}

fn default_true() -> bool {
    true
}

fn default_dict_language() -> String {
    "en".to_string()
}

fn default_tone_colors() -> Vec<String> {
    ["#ff0000", "#ffaa00", "#00aa00", "#0000ff", "#545454"]
        .iter()
        .map(|c| c.to_string())
        .collect()
}

fn default_meaning_numbering_color() -> String {
    "#aaaaaa".to_string()
}

fn default_custom_meaning_separator() -> String {
    " | ".to_string()
}

fn default_hanzi_masking_character() -> String {
    "\u{301c}".to_string()
}

fn default_audio_extensions() -> Vec<String> {
    vec![".mp3".to_string(), ".ogg".to_string()]
}

fn default_web_dictionaries() -> Vec<WebDictionary> {
    vec![
        WebDictionary::new(
            "MDBG",
            "http://www.mdbg.net/chindict/chindict.php?page=worddict&wdrst=0&wdqb={searchTerms}",
        ),
        WebDictionary::new("Nciku", "http://www.nciku.com/search/all/{searchTerms}"),
    ]
}

fn default_candidate_field_names() -> BTreeMap<FieldKind, Vec<String>> {
    let names: [(FieldKind, &[&str]); 10] = [
        (FieldKind::Expression, &["expression", "hanzi", "chinese", "character", "characters"]),
        (FieldKind::Reading, &["reading", "pinyin", "pronunciation"]),
        (FieldKind::Meaning, &["meaning", "definition", "english", "german", "french"]),
        (FieldKind::Mw, &["mw", "measure word", "measure words", "classifier"]),
        (FieldKind::Audio, &["audio", "sound", "spoken"]),
        (FieldKind::MwAudio, &["mwaudio", "mw audio", "measure word audio"]),
        (FieldKind::Color, &["color", "colour", "colored hanzi", "coloured hanzi"]),
        (FieldKind::Trad, &["trad", "traditional"]),
        (FieldKind::Simp, &["simp", "simplified"]),
        (FieldKind::Weblinks, &["weblinks", "links", "web links"]),
    ];
    names
        .into_iter()
        .map(|(kind, candidates)| (kind, candidates.iter().map(|c| c.to_string()).collect()))
        .collect()
}

/// Whether a string is a `#rgb` or `#rrggbb` color
pub fn is_valid_color(color: &str) -> bool {
    COLOR_REGEX.is_match(color)
}

impl Config {
    /// Parse and validate a JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_valid_language_code(&self.dict_language) {
            return Err(ConfigError::InvalidLanguage(self.dict_language.clone()));
        }

        if self.tone_colors.len() != 5 {
            return Err(ConfigError::InvalidToneColorCount(self.tone_colors.len()));
        }
        if let Some((index, color)) = self.tone_colors.iter().enumerate().find(|(_, c)| !is_valid_color(c)) {
            return Err(ConfigError::InvalidColor {
                tone: index + 1,
                value: color.clone(),
            });
        }
        if !is_valid_color(&self.meaning_numbering_color) {
            return Err(ConfigError::InvalidNumberingColor(self.meaning_numbering_color.clone()));
        }

        if self.meaning_separator == MeaningSeparator::Custom && self.custom_meaning_separator.is_empty() {
            return Err(ConfigError::EmptyCustomSeparator);
        }

        if self.audio_extensions.is_empty() {
            return Err(ConfigError::EmptyAudioExtensions);
        }
        if let Some(bad) = self
            .audio_extensions
            .iter()
            .find(|ext| !ext.starts_with('.') || ext.len() < 2)
        {
            return Err(ConfigError::InvalidAudioExtension(bad.clone()));
        }

        if let Some(bad) = self
            .web_dictionaries
            .iter()
            .find(|d| !d.url.contains(SEARCH_TERMS_PLACEHOLDER))
        {
            return Err(ConfigError::InvalidWebDictionary(bad.name.clone()));
        }

        Ok(())
    }

    /// The toggle gating generation of a field; the expression has none
    pub fn update_control_flag(&self, kind: FieldKind) -> Option<bool> {
        match kind {
            FieldKind::Expression => None,
            FieldKind::Reading => Some(self.reading_generation),
            FieldKind::Meaning => Some(self.meaning_generation),
            FieldKind::Mw => Some(self.detect_measure_words),
            FieldKind::Audio => Some(self.audio_generation),
            FieldKind::MwAudio => Some(self.mw_audio_generation),
            FieldKind::Color => Some(self.colorized_character_generation),
            FieldKind::Trad => Some(self.trad_generation),
            FieldKind::Simp => Some(self.simp_generation),
            FieldKind::Weblinks => Some(self.weblink_generation),
        }
    }

    /// Mutable access to the toggle gating a field, for hosts flipping options by field
    pub fn update_control_flag_mut(&mut self, kind: FieldKind) -> Option<&mut bool> {
        match kind {
            FieldKind::Expression => None,
            FieldKind::Reading => Some(&mut self.reading_generation),
            FieldKind::Meaning => Some(&mut self.meaning_generation),
            FieldKind::Mw => Some(&mut self.detect_measure_words),
            FieldKind::Audio => Some(&mut self.audio_generation),
            FieldKind::MwAudio => Some(&mut self.mw_audio_generation),
            FieldKind::Color => Some(&mut self.colorized_character_generation),
            FieldKind::Trad => Some(&mut self.trad_generation),
            FieldKind::Simp => Some(&mut self.simp_generation),
            FieldKind::Weblinks => Some(&mut self.weblink_generation),
        }
    }

    /// Candidate fact keys for a field; the canonical name when none are configured
    pub fn candidate_names(&self, kind: FieldKind) -> Vec<&str> {
        match self.candidate_field_names.get(&kind) {
            Some(names) if !names.is_empty() => names.iter().map(String::as_str).collect(),
            _ => vec![kind.name()],
        }
    }

    /// Color for a tone number (1-5)
    pub fn tone_color(&self, tone: usize) -> Option<&str> {
        tone.checked_sub(1)
            .and_then(|i| self.tone_colors.get(i))
            .map(String::as_str)
    }

    /// Separator placed between rendered meanings
    pub fn meaning_separator_text(&self) -> &str {
        match self.meaning_separator {
            MeaningSeparator::Lines => "<br />",
            MeaningSeparator::Commas => ", ",
            MeaningSeparator::Custom => &self.custom_meaning_separator,
        }
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            dict_language: default_dict_language(),
            log_level: LogLevel::default(),
            tone_display: ToneDisplay::default(),
            tone_colors: default_tone_colors(),
            colorized_pinyin_generation: true,
            colorized_character_generation: true,
            meaning_numbering: MeaningNumbering::default(),
            color_meaning_numbers: true,
            meaning_numbering_color: default_meaning_numbering_color(),
            meaning_separator: MeaningSeparator::default(),
            custom_meaning_separator: default_custom_meaning_separator(),
            emphasise_main_meaning: false,
            hanzi_masking: false,
            hanzi_masking_character: default_hanzi_masking_character(),
            prefer_simp_trad: Script::default(),
            reading_generation: true,
            meaning_generation: true,
            detect_measure_words: true,
            audio_generation: true,
            mw_audio_generation: true,
            trad_generation: true,
            simp_generation: true,
            weblink_generation: true,
            audio_extensions: default_audio_extensions(),
            force_reading_to_be_formatted: true,
            force_meaning_numbers_to_be_formatted: true,
            force_pinyin_in_audio_to_sound_tags: true,
            force_expression_to_be_simp_trad: false,
            web_dictionaries: default_web_dictionaries(),
            candidate_field_names: default_candidate_field_names(),
        }
    }
}
