/*!
 * Registry loading from the resource directory
 */

use std::sync::Arc;

use anyhow::Result;
use pinyin_toolkit::dictionary::registry::{CHARACTER_TABLE_FILE, dictionary_file_name};
use pinyin_toolkit::model::flatten;
use pinyin_toolkit::{DictionaryError, DictionaryRegistry, Script};

use crate::common;

/// Each language gets its own engine, shared between lookups
#[test]
fn test_dictionary_for_withSeveralLanguages_shouldShareEngines() -> Result<()> {
    common::init_logging();
    let registry = common::fixture_registry();

    let english = registry.dictionary_for("en")?;
    let german = registry.dictionary_for("de")?;
    let french = registry.dictionary_for("fra")?;
    assert!(Arc::ptr_eq(&english, &registry.dictionary_for("eng")?));
    assert_eq!(registry.len(), 3);

    let (german_meanings, _) = german.meanings("书", Script::Simplified).unwrap();
    assert_eq!(flatten(&german_meanings[0]), "Buch (S)");
    let (french_meanings, _) = french.meanings("书", Script::Simplified).unwrap();
    assert_eq!(flatten(&french_meanings[0]), "livre");
    Ok(())
}

/// Foreign dictionaries borrow readings from the English table
#[test]
fn test_dictionary_for_withForeignLanguage_shouldBorrowEnglishReadings() -> Result<()> {
    let french = common::fixture_registry().dictionary_for("fr")?;
    assert_eq!(flatten(&french.reading("数量积")), "shu4liang4ji1");
    assert!(french.meanings("数量积", Script::Simplified).is_none());
    assert!(french.meanings("评论", Script::Simplified).is_some());
    Ok(())
}

/// Unknown languages still read, but have no meanings
#[test]
fn test_dictionary_for_withUnknownLanguage_shouldHaveNoMeanings() -> Result<()> {
    let engine = common::fixture_registry().dictionary_for("ja")?;
    assert!(!engine.has_primary());
    assert_eq!(flatten(&engine.reading("你好")), "ni3hao3");
    assert!(engine.meanings("你好", Script::Simplified).is_none());
    Ok(())
}

/// Without a character table no engine can be built
#[test]
fn test_dictionary_for_withoutCharacterTable_shouldFail() -> Result<()> {
    let dir = common::create_temp_dir()?;
    common::create_test_file(dir.path(), "cedict_ts.u8", "書 书 [shu1] /book/\n")?;
    let registry = DictionaryRegistry::new(dir.path());
    assert!(matches!(registry.dictionary_for("en"), Err(DictionaryError::NoSources(_))));
    Ok(())
}

/// A missing word table degrades to readings from the character table
#[test]
fn test_dictionary_for_withMissingWordTable_shouldFallBackToCharacters() -> Result<()> {
    let dir = common::create_temp_dir()?;
    common::create_test_file(dir.path(), CHARACTER_TABLE_FILE, "很\then3\n")?;
    let registry = DictionaryRegistry::new(dir.path());
    let engine = registry.dictionary_for("en")?;
    assert!(!engine.has_primary());
    assert_eq!(flatten(&engine.reading("很")), "hen3");

    registry.clear();
    assert!(registry.is_empty());
    Ok(())
}

/// Dictionary file names per language
#[test]
fn test_dictionary_file_name_shouldMapKnownLanguages() {
    assert_eq!(dictionary_file_name("en"), Some("cedict_ts.u8"));
    assert_eq!(dictionary_file_name("de"), Some("handedict_nb.u8"));
    assert_eq!(dictionary_file_name("fr"), Some("cfdict.u8"));
    assert_eq!(dictionary_file_name("ja"), None);
}
