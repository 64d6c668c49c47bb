/*!
 * Tests for facts, field values and the generated marker
 */

use pinyin_toolkit::app_config::Config;
use pinyin_toolkit::fields::{GENERATED_MARKER, is_generated, mark_generated, unmark};
use pinyin_toolkit::{Fact, FieldKind, FieldValue};

/// Plain strings decode into values with their generated flag
#[test]
fn test_from_strings_withMarkedValues_shouldDecodeFlag() {
    let fact = Fact::from_strings([
        ("expression", "书".to_string()),
        ("reading", mark_generated("shū")),
    ]);
    assert_eq!(fact.get("expression"), Some(&FieldValue::user("书")));
    assert_eq!(fact.get("reading"), Some(&FieldValue::generated("shū")));
    assert_eq!(fact.to_strings()["reading"], format!("{}shū", GENERATED_MARKER));
}

/// The marker is a prefix and nothing else
#[test]
fn test_marker_shouldOnlyMatchPrefix() {
    assert!(is_generated(&mark_generated("")));
    assert!(!is_generated(&format!("text {}", GENERATED_MARKER)));
    assert_eq!(unmark("plain"), "plain");
}

/// Candidate names resolve case-insensitively, first candidate wins
#[test]
fn test_resolve_withCandidates_shouldPickFirstPresent() {
    let config = Config::default();
    let fact = Fact::from_strings([("Hanzi", "书"), ("Pinyin", ""), ("Reading", "")]);
    assert_eq!(fact.resolve(FieldKind::Expression, &config).as_deref(), Some("Hanzi"));
    assert_eq!(fact.resolve(FieldKind::Reading, &config).as_deref(), Some("Reading"));
    assert_eq!(fact.resolve(FieldKind::Audio, &config), None);
}

/// Replacing never adds a field
#[test]
fn test_replace_withAbsentField_shouldNotIntroduceIt() {
    let mut fact = Fact::from_strings([("expression", "书")]);
    assert!(!fact.replace("weblinks", FieldValue::generated("x")));
    assert!(!fact.contains("weblinks"));
    assert!(fact.replace("expression", FieldValue::user("書")));
    assert_eq!(fact.text("expression"), "書");
    assert_eq!(fact.len(), 1);
}

/// The JSON form is a plain map of field values
#[test]
fn test_serde_shouldUseTransparentMap() {
    let mut fact = Fact::new();
    fact.insert("meaning", FieldValue::generated("book"));
    let json = serde_json::to_string(&fact).unwrap();
    assert_eq!(json, r#"{"meaning":{"text":"book","generated":true}}"#);
    let back: Fact = serde_json::from_str(&json).unwrap();
    assert_eq!(back, fact);
}
