/*!
 * Word-level dictionary tables in CEDICT line format.
 *
 * `TRAD SIMP [pin1 yin1] /gloss one/gloss two/CL:個|个[ge4]/`
 *
 * Each entry is indexed under both its traditional and simplified key so
 * lookups succeed whichever script the input is written in.
 */

use std::collections::{HashMap, HashSet};
use std::io::BufRead;
use std::path::Path;

use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::DictionaryError;
use crate::file_utils::FileManager;
use crate::model::{ScriptForms, Token};

use super::Script;
use super::meanings::parse_reading;

/// A CEDICT record
static ENTRY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\S+)\s+(\S+)\s+\[([^\]]*)\]\s+/(.*)/\s*$").expect("Invalid dictionary line regex")
});

/// One dictionary record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryEntry {
    pub traditional: String,
    pub simplified: String,
    /// Unspaced reading tokens, one per written syllable
    pub reading: Vec<Token>,
    /// Raw glosses, including any `CL:` measure-word gloss
    pub glosses: Vec<String>,
}

impl DictionaryEntry {
    /// Parse a single CEDICT line. Comments and malformed lines yield `None`.
    pub fn parse_line(line: &str) -> Option<Self> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.is_empty() || line.starts_with('#') {
            return None;
        }

        let caps = ENTRY_REGEX.captures(line)?;
        Some(Self {
            traditional: caps[1].to_string(),
            simplified: caps[2].to_string(),
            reading: parse_reading(&caps[3]),
            glosses: caps[4]
                .split('/')
                .map(str::trim)
                .filter(|g| !g.is_empty())
                .map(str::to_string)
                .collect(),
        })
    }

    pub fn form(&self, script: Script) -> &str {
        match script {
            Script::Simplified => &self.simplified,
            Script::Traditional => &self.traditional,
        }
    }

    pub fn forms(&self) -> ScriptForms {
        ScriptForms {
            traditional: self.traditional.clone(),
            simplified: self.simplified.clone(),
        }
    }
}

/// An in-memory word table, read-only once loaded
#[derive(Debug, Default)]
pub struct DictionarySource {
    name: String,
    entries: Vec<DictionaryEntry>,
    by_key: HashMap<String, Vec<usize>>,
    max_key_chars: usize,
    first_chars: HashSet<char>,
    traditional_to_simplified: HashMap<char, char>,
    simplified_to_traditional: HashMap<char, char>,
}

impl DictionarySource {
    /// Create an empty source
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Build a source from dictionary text
    pub fn parse_str(name: &str, text: &str) -> Self {
        let mut source = Self::new(name);
        for (number, line) in text.lines().enumerate() {
            source.load_line(number + 1, line);
        }
        source
    }

    /// Build a source from any buffered reader
    pub fn from_reader<R: BufRead>(name: &str, reader: R) -> Result<Self, DictionaryError> {
        let mut source = Self::new(name);
        for (number, line) in reader.lines().enumerate() {
            source.load_line(number + 1, &line?);
        }
        Ok(source)
    }

    /// Load a dictionary file; a missing file is reported as `Missing`
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, DictionaryError> {
        let path = path.as_ref();
        let reader = FileManager::open_dictionary(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let source = Self::from_reader(&name, reader)?;
        info!("Loaded {} entries from {}", source.len(), path.display());
        Ok(source)
    }

    fn load_line(&mut self, number: usize, line: &str) {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return;
        }
        match DictionaryEntry::parse_line(trimmed) {
            Some(entry) => self.insert(entry),
            None => warn!("Skipping malformed line {} in {}: {}", number, self.name, trimmed),
        }
    }

    /// Add an entry, indexing both of its script forms
    pub fn insert(&mut self, entry: DictionaryEntry) {
        let index = self.entries.len();

        let trad_chars: Vec<char> = entry.traditional.chars().collect();
        let simp_chars: Vec<char> = entry.simplified.chars().collect();
        if trad_chars.len() == simp_chars.len() {
            for (t, s) in trad_chars.iter().zip(&simp_chars) {
                self.traditional_to_simplified.entry(*t).or_insert(*s);
                self.simplified_to_traditional.entry(*s).or_insert(*t);
            }
        }
        self.max_key_chars = self.max_key_chars.max(trad_chars.len()).max(simp_chars.len());
        self.first_chars.extend(trad_chars.first().into_iter().chain(simp_chars.first()));

        self.by_key.entry(entry.traditional.clone()).or_default().push(index);
        if entry.simplified != entry.traditional {
            self.by_key.entry(entry.simplified.clone()).or_default().push(index);
        }
        self.entries.push(entry);
    }

    /// All entries whose traditional or simplified form is `key`, in file order
    pub fn lookup(&self, key: &str) -> Vec<&DictionaryEntry> {
        match self.by_key.get(key) {
            Some(indices) => indices.iter().map(|i| &self.entries[*i]).collect(),
            None => {
                debug!("No entry for '{}' in {}", key, self.name);
                Vec::new()
            }
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.by_key.contains_key(key)
    }

    /// Whether any key begins with `c`
    pub fn starts_key(&self, c: char) -> bool {
        self.first_chars.contains(&c)
    }

    /// Counterpart of a single character in the other script, as seen in entries
    pub fn char_variant(&self, c: char, script: Script) -> Option<char> {
        match script {
            Script::Simplified => self.traditional_to_simplified.get(&c).copied(),
            Script::Traditional => self.simplified_to_traditional.get(&c).copied(),
        }
    }

    /// Longest key length in characters
    pub fn max_key_chars(&self) -> usize {
        self.max_key_chars
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
