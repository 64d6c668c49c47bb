/*!
 * Universal single-character table.
 *
 * Supplies a reading for any character the word tables do not know, plus the
 * character's script counterparts. Lines are tab separated:
 *
 * `CHAR<TAB>READINGS[<TAB>SIMPLIFIED[<TAB>TRADITIONAL]]`
 *
 * READINGS is a space-separated list of numeric or tone-marked syllables,
 * most common first. The table never carries meanings.
 */

use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;

use log::{info, warn};

use crate::errors::DictionaryError;
use crate::file_utils::FileManager;
use crate::model::Pinyin;

use super::Script;

/// Readings and script variants of one character
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CharacterEntry {
    pub readings: Vec<Pinyin>,
    pub simplified: Option<char>,
    pub traditional: Option<char>,
}

impl CharacterEntry {
    /// Most common reading
    pub fn reading(&self) -> Option<&Pinyin> {
        self.readings.first()
    }

    pub fn variant(&self, script: Script) -> Option<char> {
        match script {
            Script::Simplified => self.simplified,
            Script::Traditional => self.traditional,
        }
    }
}

/// Character table keyed by a single character
#[derive(Debug, Default)]
pub struct CharacterSource {
    entries: HashMap<char, CharacterEntry>,
}

impl CharacterSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse_str(text: &str) -> Self {
        let mut source = Self::new();
        for (number, line) in text.lines().enumerate() {
            source.load_line(number + 1, line);
        }
        source
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, DictionaryError> {
        let mut source = Self::new();
        for (number, line) in reader.lines().enumerate() {
            source.load_line(number + 1, &line?);
        }
        Ok(source)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, DictionaryError> {
        let path = path.as_ref();
        let source = Self::from_reader(FileManager::open_dictionary(path)?)?;
        info!("Loaded {} characters from {}", source.len(), path.display());
        Ok(source)
    }

    fn load_line(&mut self, number: usize, line: &str) {
        let line = line.trim_end();
        if line.trim().is_empty() || line.starts_with('#') {
            return;
        }

        let mut columns = line.split('\t');
        let mut glyph = columns.next().unwrap_or_default().chars();
        let (Some(c), None) = (glyph.next(), glyph.next()) else {
            warn!("Skipping character table line {}: key is not one character", number);
            return;
        };

        let readings: Vec<Pinyin> = columns
            .next()
            .unwrap_or_default()
            .split_whitespace()
            .filter_map(Pinyin::parse)
            .collect();
        let single = |column: Option<&str>| column.and_then(|s| s.trim().chars().next());
        let simplified = single(columns.next());
        let traditional = single(columns.next());

        self.insert(
            c,
            CharacterEntry {
                readings,
                simplified,
                traditional,
            },
        );
    }

    pub fn insert(&mut self, c: char, entry: CharacterEntry) {
        self.entries.insert(c, entry);
    }

    pub fn lookup(&self, c: char) -> Option<&CharacterEntry> {
        self.entries.get(&c)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
