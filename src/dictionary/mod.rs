/*!
 * Dictionary engine: tokenization, readings and meanings.
 *
 * A `PinyinDictionary` composes:
 * - an optional primary, language-specific word table (the only source of meanings)
 * - further word tables consulted for readings only (e.g. CC-CEDICT behind a
 *   French dictionary)
 * - the universal single-character table
 *
 * Tokenization is greedy longest-match over the word tables at every position
 * where some key begins, falling back one character at a time to the character
 * table. Characters no table knows (digits, Latin letters, punctuation) pass
 * through as raw text.
 *
 * Submodules:
 * - `source`: CEDICT-style word tables
 * - `characters`: the single-character fallback table
 * - `meanings`: gloss parsing and meaning/measure-word combination
 * - `registry`: load-once cache of engines per language
 */

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::model::token::push_other;
use crate::model::{Character, Token, Word, flatten, is_han};

pub mod characters;
pub mod meanings;
pub mod registry;
pub mod source;

pub use self::characters::{CharacterEntry, CharacterSource};
pub use self::meanings::{Meaning, MeasureWord, combine_meanings_mws};
pub use self::registry::DictionaryRegistry;
pub use self::source::{DictionaryEntry, DictionarySource};

/// Chinese script variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Script {
    #[default]
    #[serde(rename = "simp")]
    Simplified,
    #[serde(rename = "trad")]
    Traditional,
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simplified => write!(f, "simp"),
            Self::Traditional => write!(f, "trad"),
        }
    }
}

impl FromStr for Script {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "simp" | "simplified" => Ok(Self::Simplified),
            "trad" | "traditional" => Ok(Self::Traditional),
            _ => Err(ConfigError::UnknownChoice {
                option: "prefer_simp_trad",
                value: s.to_string(),
            }),
        }
    }
}

/// Result of a meaning lookup: glosses and measure words
pub type MeaningsLookup = (Vec<Meaning>, Vec<MeasureWord>);

/// A stretch of input after segmentation
enum Segment<'a> {
    Entry(&'a DictionaryEntry, String),
    Char(char, Option<&'a CharacterEntry>),
    Text(String),
}

/// The dictionary engine for one meaning language
#[derive(Debug)]
pub struct PinyinDictionary {
    language: String,
    primary: Option<Arc<DictionarySource>>,
    reading_sources: Vec<Arc<DictionarySource>>,
    characters: Arc<CharacterSource>,
}

impl PinyinDictionary {
    /// Compose an engine. `reading_sources` are consulted after `primary` for
    /// tokenization and readings, never for meanings.
    pub fn new(
        language: &str,
        primary: Option<Arc<DictionarySource>>,
        reading_sources: Vec<Arc<DictionarySource>>,
        characters: Arc<CharacterSource>,
    ) -> Self {
        Self {
            language: language.to_string(),
            primary,
            reading_sources,
            characters,
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn has_primary(&self) -> bool {
        self.primary.is_some()
    }

    fn word_sources(&self) -> impl Iterator<Item = &DictionarySource> {
        self.primary
            .iter()
            .chain(self.reading_sources.iter())
            .map(|s| s.as_ref())
    }

    /// Longest entry starting at `start`; earlier sources win ties
    fn longest_match(&self, chars: &[char], start: usize) -> Option<(&DictionaryEntry, usize)> {
        let mut best: Option<(&DictionaryEntry, usize)> = None;
        for source in self.word_sources() {
            let longest = source.max_key_chars().min(chars.len() - start);
            let shortest = best.map_or(1, |(_, len)| len + 1);
            for len in (shortest..=longest).rev() {
                let key: String = chars[start..start + len].iter().collect();
                if let Some(entry) = source.lookup(&key).into_iter().next() {
                    best = Some((entry, len));
                    break;
                }
            }
        }
        best
    }

    fn segment(&self, text: &str) -> Vec<Segment<'_>> {
        let chars: Vec<char> = text.chars().collect();
        let mut segments = Vec::new();
        let mut pending = String::new();
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];
            // Keys such as "T恤" or "ＡＡ制" start outside the Han block
            let found = if is_han(c) || self.word_sources().any(|s| s.starts_key(c)) {
                self.longest_match(&chars, i)
            } else {
                None
            };

            match found {
                Some((entry, len)) => {
                    if !pending.is_empty() {
                        segments.push(Segment::Text(std::mem::take(&mut pending)));
                    }
                    segments.push(Segment::Entry(entry, chars[i..i + len].iter().collect()));
                    i += len;
                }
                None if is_han(c) => {
                    if !pending.is_empty() {
                        segments.push(Segment::Text(std::mem::take(&mut pending)));
                    }
                    segments.push(Segment::Char(c, self.characters.lookup(c)));
                    i += 1;
                }
                None => {
                    pending.push(c);
                    i += 1;
                }
            }
        }
        if !pending.is_empty() {
            segments.push(Segment::Text(pending));
        }
        segments
    }

    /// Tokenize into characters carrying tones; flattening gives back `text`
    pub fn tonedchars(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        for segment in self.segment(text) {
            match segment {
                Segment::Entry(entry, key) => tokens.push(Token::Word(Word::with_forms(
                    meanings::tone_characters(&key, &entry.reading),
                    entry.forms(),
                ))),
                Segment::Char(c, Some(found)) => {
                    let tone = found.reading().map(|p| p.toneinfo());
                    tokens.push(Token::Character(Character::new(c, tone)));
                }
                Segment::Char(c, None) => push_other(&mut tokens, c.encode_utf8(&mut [0u8; 4])),
                Segment::Text(raw) => push_other(&mut tokens, &raw),
            }
        }

        debug_assert_eq!(flatten(&tokens), text, "tokenization must reconstruct its input");
        tokens
    }

    /// Reading of `text`: one word of syllables per matched entry, single
    /// syllables for fallback characters, raw text for everything else
    pub fn reading(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        for segment in self.segment(text) {
            match segment {
                Segment::Entry(entry, _) => tokens.push(Token::Word(Word::new(entry.reading.clone()))),
                Segment::Char(c, found) => match found.and_then(|e| e.reading()) {
                    Some(pinyin) => tokens.push(Token::Pinyin(pinyin.clone())),
                    None => push_other(&mut tokens, c.encode_utf8(&mut [0u8; 4])),
                },
                Segment::Text(raw) => push_other(&mut tokens, &raw),
            }
        }
        tokens
    }

    /// Meanings and measure words for the whole of `text`, from the primary
    /// table only. `None` means "leave the field blank", never an error.
    pub fn meanings(&self, text: &str, script: Script) -> Option<MeaningsLookup> {
        let key = text.trim_matches(|c: char| !c.is_alphanumeric());
        if key.is_empty() || key.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }

        let primary = self.primary.as_ref()?;
        let entries = primary.lookup(key);
        if entries.is_empty() {
            debug!("No meanings for '{}' in {} dictionary", key, self.language);
            return None;
        }

        // A key that is a simplified form of one word and a traditional form
        // of another resolves to the entries spelled that way in the preferred script
        let preferred: Vec<&DictionaryEntry> = entries.iter().copied().filter(|e| e.form(script) == key).collect();
        let chosen = if preferred.is_empty() { entries } else { preferred };

        let mut glosses = Vec::new();
        let mut measure_words = Vec::new();
        for entry in chosen {
            for gloss in &entry.glosses {
                if meanings::is_measure_word_gloss(gloss) {
                    measure_words.extend(meanings::parse_measure_words(gloss, script));
                } else {
                    glosses.push(meanings::parse_gloss(gloss, script));
                }
            }
        }

        if glosses.is_empty() && measure_words.is_empty() {
            return None;
        }
        Some((glosses, measure_words))
    }

    /// Rewrite `text` into the given script. Matched words use their entry's
    /// spelling, other characters the per-character variant tables.
    pub fn convert_script(&self, text: &str, script: Script) -> String {
        let mut out = String::with_capacity(text.len());
        for segment in self.segment(text) {
            match segment {
                Segment::Entry(entry, _) => out.push_str(entry.form(script)),
                Segment::Char(c, found) => out.push(self.char_variant(c, found, script)),
                Segment::Text(raw) => out.push_str(&raw),
            }
        }
        out
    }

    fn char_variant(&self, c: char, found: Option<&CharacterEntry>, script: Script) -> char {
        found
            .and_then(|e| e.variant(script))
            .or_else(|| self.word_sources().find_map(|s| s.char_variant(c, script)))
            .unwrap_or(c)
    }
}
