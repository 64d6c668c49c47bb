/*!
 * # Pinyin Toolkit
 *
 * A Rust library that fills the derived fields of Chinese vocabulary notes.
 *
 * ## Features
 *
 * - Tokenize Chinese text against CEDICT-style dictionaries with a
 *   per-character fallback table
 * - Generate readings, numbered meanings, measure words, colored characters,
 *   traditional/simplified forms, audio sound tags and web dictionary links
 * - Track which field values were generated so user edits are never overwritten
 * - Reformat values typed by the user (pinyin, meaning numbers, audio)
 * - ISO 639-1 and ISO 639-2 language code support for meaning dictionaries
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration snapshot and validation
 * - `model`: Pinyin syllables and the token tree
 * - `dictionary`: Dictionary tables and the lookup engine:
 *   - `dictionary::source`: CEDICT-format word tables
 *   - `dictionary::characters`: Single-character fallback table
 *   - `dictionary::meanings`: Gloss and measure word parsing
 *   - `dictionary::registry`: Shared per-language engines
 * - `fields`: Field values, facts and the generated marker:
 *   - `fields::formatting`: HTML rendering and reformatting
 *   - `fields::generators`: One generator per derived field
 * - `media`: Audio media packs and clip resolution
 * - `updater`: The field update pipeline
 * - `file_utils`: File system operations
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod dictionary;
pub mod errors;
pub mod fields;
pub mod file_utils;
pub mod language_utils;
pub mod media;
pub mod model;
pub mod updater;

// Re-export main types for easier usage
pub use app_config::Config;
pub use dictionary::{DictionaryRegistry, PinyinDictionary, Script};
pub use errors::{AppError, ConfigError, DictionaryError, MediaError};
pub use fields::{Fact, FieldKind, FieldValue};
pub use language_utils::{get_language_name, language_codes_match, normalize_language_code};
pub use media::{MediaPack, MediaResolver};
pub use model::{Pinyin, Token, ToneInfo};
pub use updater::FieldUpdater;
