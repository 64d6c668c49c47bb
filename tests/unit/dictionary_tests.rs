/*!
 * Tests for the dictionary engine over the fixture tables
 */

use pinyin_toolkit::dictionary::{DictionarySource, combine_meanings_mws};
use pinyin_toolkit::model::{flatten, leaves, syllables};
use pinyin_toolkit::{DictionaryError, Script, Token};

use crate::common;

fn meanings_of(text: &str, script: Script) -> Option<Vec<String>> {
    common::english_dictionary()
        .meanings(text, script)
        .map(|(meanings, mws)| combine_meanings_mws(meanings, &mws).iter().map(|m| flatten(m)).collect())
}

/// Tokenization must give back its input for any text
#[test]
fn test_tonedchars_withMixedText_shouldReconstructInput() {
    let dictionary = common::english_dictionary();
    for text in ["你好!", "一个很好的书", "1994年", "Ｕ盤", "  ", "hello 你好 world"] {
        assert_eq!(flatten(&dictionary.tonedchars(text)), text);
    }
}

/// Digits never receive a tone
#[test]
fn test_tonedchars_withDigits_shouldCarryNoTone() {
    let toned = common::english_dictionary().tonedchars("1994");
    assert!(leaves(&toned).iter().all(|t| t.toneinfo().is_none()));
}

/// The longest dictionary word wins over single characters
#[test]
fn test_reading_withKnownWords_shouldUseLongestMatch() {
    let dictionary = common::english_dictionary();
    let reading = dictionary.reading("一个");
    assert_eq!(reading.len(), 1);
    assert!(matches!(&reading[0], Token::Word(_)));
    assert_eq!(flatten(&reading), "yi1ge4");
    assert_eq!(flatten(&dictionary.reading("很好")), "hen3hao3");
}

/// Characters only in the fallback table still get a reading
#[test]
fn test_reading_withFallbackCharacters_shouldResolve() {
    let dictionary = common::english_dictionary();
    assert_eq!(flatten(&dictionary.reading("土豆条儿")), "tu3dou4tiao2er2");
    assert_eq!(syllables(&dictionary.reading("諓")).len(), 1);
}

/// Meaning lookup ignores surrounding whitespace and punctuation
#[test]
fn test_meanings_withPunctuation_shouldFindWord() {
    assert_eq!(
        meanings_of("  你好!!! ", Script::Simplified),
        Some(vec!["hello".to_string(), "hi".to_string()])
    );
}

/// Measure words go last, in entry order
#[test]
fn test_meanings_withMeasureWords_shouldAppendThemLast() {
    let meanings = meanings_of("啤酒", Script::Simplified).unwrap();
    assert_eq!(meanings[0], "beer");
    assert_eq!(
        meanings.last().map(String::as_str),
        Some("MW: 杯 - bei1, 瓶 - ping2, 罐 - guan4, 桶 - tong3, 缸 - gang1")
    );
}

/// A trailing embedded reference carries its reading
#[test]
fn test_meanings_withTrailingReference_shouldShowReading() {
    assert_eq!(
        meanings_of("股指", Script::Simplified),
        Some(vec!["abbr. for 股票指数 - gu3 piao4 zhi3 shu4".to_string()])
    );
    assert_eq!(
        meanings_of("股指", Script::Traditional),
        Some(vec!["abbr. for 股票指數 - gu3 piao4 zhi3 shu4".to_string()])
    );
}

/// Phrases, digits and unknown text have no meanings
#[test]
fn test_meanings_withUnknownText_shouldReturnNone() {
    assert_eq!(meanings_of("一杯啤酒", Script::Simplified), None);
    assert_eq!(meanings_of("1000000000", Script::Simplified), None);
    assert_eq!(meanings_of("English", Script::Simplified), None);
    assert_eq!(meanings_of("", Script::Simplified), None);
}

/// Script conversion uses word entries, then the character table
#[test]
fn test_convert_script_shouldRewriteBothWays() {
    let dictionary = common::english_dictionary();
    assert_eq!(dictionary.convert_script("一个书", Script::Traditional), "一個書");
    assert_eq!(dictionary.convert_script("鼓聲", Script::Simplified), "鼓声");
    assert_eq!(dictionary.convert_script("盤子", Script::Simplified), "盘子");
    assert_eq!(dictionary.convert_script("abc", Script::Traditional), "abc");
}

/// Malformed lines are skipped, the rest still loads
#[test]
fn test_from_path_withMalformedLine_shouldSkipIt() {
    let source = DictionarySource::from_path(common::test_resource_path("dictionaries/cedict_ts.u8")).unwrap();
    assert_eq!(source.len(), 13);
    assert!(source.contains("书"));
    assert!(source.contains("書"));
}

/// A missing file is reported as such
#[test]
fn test_from_path_withMissingFile_shouldReportMissing() {
    let result = DictionarySource::from_path(common::test_resource_path("dictionaries/nope.u8"));
    assert!(matches!(result, Err(DictionaryError::Missing(_))));
}
