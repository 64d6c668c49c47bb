/*!
 * Fact fields and their provenance.
 *
 * A `Fact` maps field names to `FieldValue`s. Each value records whether it
 * was produced by a generator, so the updater can tell a stale generated
 * value from a user's own edit. For hosts that can only store plain strings,
 * `mark_generated` / `is_generated` encode the flag as an invisible HTML
 * comment prefix.
 */

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::app_config::Config;
use crate::errors::ConfigError;

pub mod formatting;
pub mod generators;

/// Prefix marking a stored string as generated
pub const GENERATED_MARKER: &str = "<!-- generated -->";

/// Encode a generated value for plain-string storage
pub fn mark_generated(text: &str) -> String {
    format!("{}{}", GENERATED_MARKER, text)
}

/// Whether a stored string carries the generated marker
pub fn is_generated(stored: &str) -> bool {
    stored.starts_with(GENERATED_MARKER)
}

/// Stored string without its marker
pub fn unmark(stored: &str) -> &str {
    stored.strip_prefix(GENERATED_MARKER).unwrap_or(stored)
}

/// Logical fields the pipeline knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Expression,
    Reading,
    Meaning,
    Mw,
    Audio,
    MwAudio,
    Color,
    Trad,
    Simp,
    Weblinks,
}

impl FieldKind {
    /// Every field, in generation order
    pub const ALL: [FieldKind; 10] = [
        FieldKind::Expression,
        FieldKind::Reading,
        FieldKind::Meaning,
        FieldKind::Mw,
        FieldKind::Color,
        FieldKind::Trad,
        FieldKind::Simp,
        FieldKind::Audio,
        FieldKind::MwAudio,
        FieldKind::Weblinks,
    ];

    /// Canonical field name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Expression => "expression",
            Self::Reading => "reading",
            Self::Meaning => "meaning",
            Self::Mw => "mw",
            Self::Audio => "audio",
            Self::MwAudio => "mwaudio",
            Self::Color => "color",
            Self::Trad => "trad",
            Self::Simp => "simp",
            Self::Weblinks => "weblinks",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for FieldKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| ConfigError::UnknownChoice {
                option: "field",
                value: s.to_string(),
            })
    }
}

/// A field's text and whether a generator wrote it
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FieldValue {
    pub text: String,
    pub generated: bool,
}

impl FieldValue {
    /// A value supplied by the user
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            generated: false,
        }
    }

    /// A value produced by a generator
    pub fn generated(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            generated: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Decode a plain stored string
    pub fn decode(stored: &str) -> Self {
        if is_generated(stored) {
            Self::generated(unmark(stored))
        } else {
            Self::user(stored)
        }
    }

    /// Encode as a plain string
    pub fn encode(&self) -> String {
        if self.generated {
            mark_generated(&self.text)
        } else {
            self.text.clone()
        }
    }
}

/// A note's fields, keyed by the host's field names
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fact {
    fields: BTreeMap<String, FieldValue>,
}

impl Fact {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from plain strings, decoding generated markers
    pub fn from_strings<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        Self {
            fields: fields
                .into_iter()
                .map(|(k, v)| (k.into(), FieldValue::decode(v.as_ref())))
                .collect(),
        }
    }

    /// Plain-string form with generated markers
    pub fn to_strings(&self) -> BTreeMap<String, String> {
        self.fields.iter().map(|(k, v)| (k.clone(), v.encode())).collect()
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Text of a field, empty when absent
    pub fn text(&self, name: &str) -> &str {
        self.fields.get(name).map_or("", |v| v.text.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        self.fields.insert(name.into(), value);
    }

    /// Overwrite an existing field; absent fields are never introduced
    pub fn replace(&mut self, name: &str, value: FieldValue) -> bool {
        match self.fields.get_mut(name) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// The fact key holding a logical field: the first configured candidate
    /// name present, compared case-insensitively
    pub fn resolve(&self, kind: FieldKind, config: &Config) -> Option<String> {
        config.candidate_names(kind).iter().find_map(|candidate| {
            self.fields
                .keys()
                .find(|key| key.eq_ignore_ascii_case(candidate))
                .cloned()
        })
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.fields.iter()
    }
}
