/*!
 * Load-once cache of dictionary tables and engines.
 *
 * Tables are read from a single dictionary directory the first time any
 * engine needs them and are shared read-only afterwards. Engines are cached
 * per normalised language code.
 */

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info, warn};
use parking_lot::RwLock;

use crate::errors::DictionaryError;
use crate::language_utils::normalize_language_code;

use super::{CharacterSource, DictionarySource, PinyinDictionary};

/// Universal character table file name
pub const CHARACTER_TABLE_FILE: &str = "unihan_readings.txt";

/// Language whose dictionary also backs every other language's readings
pub const READING_FALLBACK_LANGUAGE: &str = "en";

/// Word table file for a meaning language
pub fn dictionary_file_name(language: &str) -> Option<&'static str> {
    match language {
        "en" => Some("cedict_ts.u8"),
        "de" => Some("handedict_nb.u8"),
        "fr" => Some("cfdict.u8"),
        _ => None,
    }
}

/// Cache of loaded tables and composed engines
pub struct DictionaryRegistry {
    /// Directory holding every table file
    directory: PathBuf,

    /// Word tables by file name; `None` records a known-missing file
    sources: RwLock<HashMap<&'static str, Option<Arc<DictionarySource>>>>,

    /// The character table, once loaded
    characters: RwLock<Option<Arc<CharacterSource>>>,

    /// Engines by normalised language code
    engines: RwLock<HashMap<String, Arc<PinyinDictionary>>>,
}

impl DictionaryRegistry {
    /// Create a registry reading from `directory`. Nothing is loaded yet.
    pub fn new<P: AsRef<Path>>(directory: P) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
            sources: RwLock::new(HashMap::new()),
            characters: RwLock::new(None),
            engines: RwLock::new(HashMap::new()),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// The engine for a meaning language, building it on first use.
    /// Unknown languages get an engine without meanings.
    pub fn dictionary_for(&self, language: &str) -> Result<Arc<PinyinDictionary>, DictionaryError> {
        let code = normalize_language_code(language).unwrap_or_else(|_| language.trim().to_lowercase());

        if let Some(engine) = self.engines.read().get(&code) {
            debug!("Dictionary cache hit for '{}'", code);
            return Ok(Arc::clone(engine));
        }

        let engine = Arc::new(self.build(&code)?);
        let mut engines = self.engines.write();
        let engine = engines.entry(code).or_insert(engine);
        Ok(Arc::clone(engine))
    }

    fn build(&self, code: &str) -> Result<PinyinDictionary, DictionaryError> {
        let characters = self.characters()?;
        let primary = match dictionary_file_name(code) {
            Some(file) => self.source(file)?,
            None => {
                warn!("No dictionary for language '{}'; meanings will be unavailable", code);
                None
            }
        };

        let mut reading_sources = Vec::new();
        if code != READING_FALLBACK_LANGUAGE {
            if let Some(file) = dictionary_file_name(READING_FALLBACK_LANGUAGE) {
                reading_sources.extend(self.source(file)?);
            }
        }

        info!(
            "Built dictionary for '{}' ({} reading fallbacks)",
            code,
            reading_sources.len()
        );
        Ok(PinyinDictionary::new(code, primary, reading_sources, characters))
    }

    /// A word table by file name; a missing file is remembered as absent
    fn source(&self, file: &'static str) -> Result<Option<Arc<DictionarySource>>, DictionaryError> {
        if let Some(cached) = self.sources.read().get(file) {
            return Ok(cached.clone());
        }

        let loaded = match DictionarySource::from_path(self.directory.join(file)) {
            Ok(source) => Some(Arc::new(source)),
            Err(DictionaryError::Missing(path)) => {
                warn!("Dictionary file missing: {}", path.display());
                None
            }
            Err(e) => return Err(e),
        };

        let mut sources = self.sources.write();
        Ok(sources.entry(file).or_insert(loaded).clone())
    }

    fn characters(&self) -> Result<Arc<CharacterSource>, DictionaryError> {
        if let Some(loaded) = self.characters.read().as_ref() {
            return Ok(Arc::clone(loaded));
        }

        let source = match CharacterSource::from_path(self.directory.join(CHARACTER_TABLE_FILE)) {
            Ok(source) => Arc::new(source),
            Err(DictionaryError::Missing(_)) => return Err(DictionaryError::NoSources(self.directory.clone())),
            Err(e) => return Err(e),
        };

        let mut characters = self.characters.write();
        Ok(Arc::clone(characters.get_or_insert(source)))
    }

    /// Number of engines built so far
    pub fn len(&self) -> usize {
        self.engines.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.engines.read().is_empty()
    }

    /// Drop every cached table and engine
    pub fn clear(&self) {
        self.engines.write().clear();
        self.sources.write().clear();
        *self.characters.write() = None;
        debug!("Dictionary registry cleared");
    }
}
