/*!
 * Audio media packs and clip resolution.
 *
 * A `MediaPack` is a named set of audio clips keyed by lowercase file name
 * ("hao3.mp3"). The `MediaResolver` asks packs in priority order for a
 * syllable's clip: first the tone-exact key for every configured extension,
 * then the toneless key. A syllable with no clip anywhere is dropped.
 */

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::errors::MediaError;
use crate::file_utils::FileManager;
use crate::model::Pinyin;

/// A named collection of audio clips
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaPack {
    name: String,
    files: HashMap<String, String>,
}

impl MediaPack {
    /// Build a pack from clip keys to storage paths (relative to the pack)
    pub fn new<I, K, V>(name: &str, files: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        Self {
            name: name.to_string(),
            files: files
                .into_iter()
                .map(|(k, v)| (k.as_ref().to_lowercase(), v.into()))
                .collect(),
        }
    }

    /// Register every file below `dir` under its lowercase file name
    pub fn discover<P: AsRef<Path>>(name: &str, dir: P) -> Result<Self, MediaError> {
        let dir = dir.as_ref();
        let mut files = HashMap::new();
        for path in FileManager::list_files(dir)? {
            let Some(file_name) = path.file_name().map(|n| n.to_string_lossy().to_lowercase()) else {
                continue;
            };
            let relative = path.strip_prefix(dir).unwrap_or(path.as_path());
            files
                .entry(file_name)
                .or_insert_with(|| relative.to_string_lossy().to_string());
        }

        info!("Discovered {} clips in media pack '{}'", files.len(), name);
        Ok(Self {
            name: name.to_string(),
            files,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Storage path for a clip key, case-insensitively
    pub fn lookup(&self, clip_key: &str) -> Option<&str> {
        self.files.get(&clip_key.to_lowercase()).map(String::as_str)
    }

    /// Reference to a clip as embedded in sound tags: pack name joined with its path
    pub fn reference(&self, path: &str) -> String {
        PathBuf::from(&self.name).join(path).to_string_lossy().to_string()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Resolves syllables to clip references across ranked packs
#[derive(Debug, Clone, Default)]
pub struct MediaResolver {
    packs: Vec<MediaPack>,
    extensions: Vec<String>,
}

impl MediaResolver {
    /// Packs in priority order; extensions most preferred first
    pub fn new(packs: Vec<MediaPack>, extensions: &[String]) -> Self {
        Self {
            packs,
            extensions: extensions.to_vec(),
        }
    }

    pub fn packs(&self) -> &[MediaPack] {
        &self.packs
    }

    /// First clip matching `stem` with any extension, extensions taking
    /// priority over pack order
    fn find(&self, stem: &str) -> Option<String> {
        self.extensions.iter().find_map(|ext| {
            let key = format!("{}{}", stem, ext);
            self.packs
                .iter()
                .find_map(|pack| pack.lookup(&key).map(|path| pack.reference(path)))
        })
    }

    /// Clip reference for a syllable: tone-exact, else toneless
    pub fn clip_for(&self, syllable: &Pinyin) -> Option<String> {
        let found = self
            .find(&syllable.clip_stem())
            .or_else(|| self.find(&syllable.toneless_clip_stem()));
        if found.is_none() {
            debug!("No audio clip for '{}'", syllable.numeric());
        }
        found
    }

    /// Clip references for a run of syllables; misses are omitted
    pub fn clips_for<'a, I>(&self, syllables: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a Pinyin>,
    {
        syllables.into_iter().filter_map(|s| self.clip_for(s)).collect()
    }
}
