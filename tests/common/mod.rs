/*!
 * Common test utilities for the pinyin-toolkit test suite
 */

use std::path::{Path, PathBuf};
use std::sync::{Arc, Once};
use std::fs;

use anyhow::Result;
use tempfile::TempDir;

use pinyin_toolkit::{Config, DictionaryRegistry, Fact, FieldUpdater, MediaPack, PinyinDictionary};

static LOGGING: Once = Once::new();

/// Route library logs through env_logger; safe to call from every test
pub fn init_logging() {
    LOGGING.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Helper to get the absolute path to a test resource
pub fn test_resource_path(relative_path: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("resources");
    path.push(relative_path);
    path
}

/// Registry over the fixture dictionaries
pub fn fixture_registry() -> DictionaryRegistry {
    DictionaryRegistry::new(test_resource_path("dictionaries"))
}

/// English engine over the fixture dictionaries
pub fn english_dictionary() -> Arc<PinyinDictionary> {
    fixture_registry()
        .dictionary_for("en")
        .expect("fixture dictionaries should load")
}

/// The "Test" media pack from the resource directory
pub fn fixture_media_pack() -> MediaPack {
    MediaPack::discover("Test", test_resource_path("media/Test")).expect("fixture media pack should load")
}

/// Uncolored, numeric-tone configuration that keeps expected strings short
pub fn plain_config() -> Config {
    Config {
        colorized_pinyin_generation: false,
        color_meaning_numbers: false,
        tone_display: pinyin_toolkit::app_config::ToneDisplay::Numeric,
        ..Config::default()
    }
}

/// Updater over the fixture dictionaries and media
pub fn fixture_updater(config: Config) -> FieldUpdater {
    init_logging();
    FieldUpdater::new(config, english_dictionary(), vec![fixture_media_pack()])
}

/// A fact with every canonical field present and empty
pub fn empty_fact() -> Fact {
    Fact::from_strings(
        pinyin_toolkit::FieldKind::ALL
            .iter()
            .map(|kind| (kind.name(), "")),
    )
}

/// Path of a clip in the fixture pack as embedded in sound tags
pub fn clip_reference(path: &str) -> String {
    PathBuf::from("Test").join(path).to_string_lossy().to_string()
}

/// Sound tag for a fixture clip
pub fn sound(path: &str) -> String {
    format!("[sound:{}]", clip_reference(path))
}
