/*!
 * Expression and single-field update pipeline over the fixture dictionaries
 */

use pinyin_toolkit::app_config::{Config, MeaningNumbering, ToneDisplay};
use pinyin_toolkit::fields::mark_generated;
use pinyin_toolkit::{
    AppError, ConfigError, DictionaryError, DictionaryRegistry, Fact, FieldKind, FieldUpdater, FieldValue, MediaError, Script,
};

use crate::common::{self, empty_fact, fixture_updater, plain_config, sound};

fn generated(fact: &Fact, field: &str) -> bool {
    fact.get(field).is_some_and(|v| v.generated)
}

/// Every field is filled from a known expression
#[test]
fn test_update_expression_withEmptyFact_shouldFillEveryField() {
    let updater = fixture_updater(plain_config());
    let mut fact = empty_fact();
    updater.update(&mut fact, FieldKind::Expression, Some("书"));

    assert_eq!(fact.get("expression"), Some(&FieldValue::user("书")));
    assert_eq!(fact.text("reading"), "shu1");
    assert_eq!(
        fact.text("meaning"),
        "① book<br />② letter<br />③ see also 书经 Book of History"
    );
    assert_eq!(fact.text("mw"), "本 - ben3, 册 - ce4, 部 - bu4");
    assert_eq!(fact.text("color"), "<span style=\"color:#ff0000\">书</span>");
    assert_eq!(fact.text("trad"), "書");
    assert_eq!(fact.text("simp"), "书");
    assert_eq!(fact.text("audio"), sound("shu1.mp3"));
    assert_eq!(
        fact.text("mwaudio"),
        [
            "liang3.mp3", "ben3.mp3", "shu1.mp3",
            "san1.mp3", "ce4.mp3", "shu1.mp3",
            "si4.mp3", "bu4.mp3", "shu1.mp3",
        ]
        .iter()
        .map(|clip| sound(clip))
        .collect::<String>()
    );
    assert!(fact.text("weblinks").contains("title=\"MDBG\""));

    for field in ["reading", "meaning", "mw", "color", "trad", "simp", "audio", "mwaudio", "weblinks"] {
        assert!(generated(&fact, field), "{} should be marked generated", field);
    }
}

/// Values typed by the user survive expression changes
#[test]
fn test_update_expression_withUserValues_shouldNotOverwrite() {
    let updater = fixture_updater(plain_config());
    let mut fact = Fact::from_strings([("expression", ""), ("reading", "my reading"), ("meaning", "")]);
    updater.update(&mut fact, FieldKind::Expression, Some("书"));

    assert_eq!(fact.get("reading"), Some(&FieldValue::user("my reading")));
    assert!(generated(&fact, "meaning"));
}

/// Generated values follow the expression, and are blanked when it is unknown
#[test]
fn test_update_expression_withChangedExpression_shouldReplaceGeneratedValues() {
    let updater = fixture_updater(plain_config());
    let mut fact = empty_fact();
    updater.update(&mut fact, FieldKind::Expression, Some("书"));
    updater.update(&mut fact, FieldKind::Expression, Some("你好"));
    assert_eq!(fact.text("reading"), "ni3 hao3");
    assert_eq!(fact.text("meaning"), "① hello<br />② hi");
    // No measure words for the new expression: the old ones are gone
    assert_eq!(fact.get("mw"), Some(&FieldValue::default()));

    updater.update(&mut fact, FieldKind::Expression, Some("English"));
    for field in ["reading", "meaning", "color", "audio"] {
        assert_eq!(fact.get(field), Some(&FieldValue::default()), "{} should be blank", field);
    }
}

/// Clearing the expression clears everything generated
#[test]
fn test_update_expression_withBlankExpression_shouldBlankGeneratedFields() {
    let updater = fixture_updater(plain_config());
    let mut fact = empty_fact();
    updater.update(&mut fact, FieldKind::Expression, Some("书"));
    updater.update(&mut fact, FieldKind::Expression, Some(""));
    assert!(fact.iter().all(|(_, value)| value.text.is_empty()));
}

/// Toggled-off fields stay empty
#[test]
fn test_update_expression_withTogglesOff_shouldSkipFields() {
    let updater = fixture_updater(Config {
        reading_generation: false,
        audio_generation: false,
        weblink_generation: false,
        ..plain_config()
    });
    let mut fact = empty_fact();
    updater.update(&mut fact, FieldKind::Expression, Some("书"));
    assert_eq!(fact.text("reading"), "");
    assert_eq!(fact.text("audio"), "");
    assert_eq!(fact.text("weblinks"), "");
    assert!(!fact.text("meaning").is_empty());
}

/// Fields missing from the fact are never introduced
#[test]
fn test_update_expression_withMissingFields_shouldNotAddThem() {
    let updater = fixture_updater(plain_config());
    let mut fact = Fact::from_strings([("expression", ""), ("reading", "")]);
    updater.update(&mut fact, FieldKind::Expression, Some("书"));
    assert_eq!(fact.len(), 2);
    assert!(!fact.contains("weblinks"));
}

/// Measure words fold into the meaning when they have no field of their own
#[test]
fn test_update_expression_withoutMeasureWordDetection_shouldFoldIntoMeaning() {
    let updater = fixture_updater(Config {
        detect_measure_words: false,
        ..plain_config()
    });
    let mut fact = empty_fact();
    updater.update(&mut fact, FieldKind::Expression, Some("书"));
    assert!(fact.text("meaning").ends_with("④ MW: 本 - ben3, 册 - ce4, 部 - bu4"));
    assert_eq!(fact.text("mw"), "");
}

/// Field names are matched through the configured candidates
#[test]
fn test_update_expression_withAlternativeFieldNames_shouldResolveThem() {
    let updater = fixture_updater(plain_config());
    let mut fact = Fact::from_strings([("Hanzi", ""), ("Pinyin", ""), ("Definition", "")]);
    updater.update(&mut fact, FieldKind::Expression, Some("你好"));
    assert_eq!(fact.text("Hanzi"), "你好");
    assert_eq!(fact.text("Pinyin"), "ni3 hao3");
    assert_eq!(fact.text("Definition"), "① hello<br />② hi");
}

/// The expression can be forced into the preferred script
#[test]
fn test_update_expression_withForcedScript_shouldRewriteExpression() {
    let updater = fixture_updater(Config {
        force_expression_to_be_simp_trad: true,
        prefer_simp_trad: Script::Traditional,
        ..plain_config()
    });
    let mut fact = empty_fact();
    updater.update(&mut fact, FieldKind::Expression, Some("书"));
    assert_eq!(fact.get("expression"), Some(&FieldValue::user("書")));
    assert_eq!(fact.text("meaning"), "① book<br />② letter<br />③ see also 書經 Book of History");
}

/// Without a delta the current expression is used and nothing is blanked
#[test]
fn test_update_expression_withoutDelta_shouldFillFromCurrentValue() {
    let updater = fixture_updater(plain_config());
    let mut fact = Fact::from_strings([
        ("expression", "你好".to_string()),
        ("reading", String::new()),
        ("meaning", mark_generated("stale")),
    ]);
    updater.update(&mut fact, FieldKind::Expression, None);
    assert_eq!(fact.text("reading"), "ni3 hao3");
    assert_eq!(fact.text("meaning"), "① hello<br />② hi");
}

/// A typed reading is reformatted and recolors the characters
#[test]
fn test_update_reading_withDelta_shouldReformatAndRecolor() {
    let updater = fixture_updater(Config {
        tone_display: ToneDisplay::Tonified,
        ..plain_config()
    });
    let mut fact = Fact::from_strings([("expression", "很"), ("reading", ""), ("color", "")]);
    updater.update(&mut fact, FieldKind::Reading, Some("hen2"));

    assert_eq!(fact.get("reading"), Some(&FieldValue::user("hén")));
    assert_eq!(fact.get("color"), Some(&FieldValue::generated("<span style=\"color:#ffaa00\">很</span>")));
}

/// Reformatting can be disabled, and forced back on per call
#[test]
fn test_update_reading_withReformatDisabled_shouldStoreVerbatim() {
    let updater = fixture_updater(Config {
        force_reading_to_be_formatted: false,
        tone_display: ToneDisplay::Tonified,
        ..plain_config()
    });
    let mut fact = Fact::from_strings([("expression", "很"), ("reading", "")]);
    updater.update(&mut fact, FieldKind::Reading, Some("hen3"));
    assert_eq!(fact.text("reading"), "hen3");

    updater.update_with(&mut fact, FieldKind::Reading, Some("hen3"), true);
    assert_eq!(fact.text("reading"), "hěn");
}

/// A user-colored color field is left alone
#[test]
fn test_update_reading_withUserColor_shouldKeepIt() {
    let updater = fixture_updater(plain_config());
    let mut fact = Fact::from_strings([("expression", "很"), ("reading", ""), ("color", "mine")]);
    updater.update(&mut fact, FieldKind::Reading, Some("hen2"));
    assert_eq!(fact.text("color"), "mine");
}

/// Meaning numbers typed by the user are rewritten
#[test]
fn test_update_meaning_withDelta_shouldReformatNumbers() {
    let updater = fixture_updater(Config {
        meaning_numbering: MeaningNumbering::CircledChinese,
        ..plain_config()
    });
    let mut fact = Fact::from_strings([("meaning", "")]);
    updater.update(&mut fact, FieldKind::Meaning, Some("(1) yes (2) no"));
    assert_eq!(fact.get("meaning"), Some(&FieldValue::user("㊀ yes ㊁ no")));
}

/// Pinyin typed into the audio field becomes sound tags
#[test]
fn test_update_audio_withPinyin_shouldProduceSoundTags() {
    let updater = fixture_updater(plain_config());
    let mut fact = Fact::from_strings([("audio", "")]);

    updater.update(&mut fact, FieldKind::Audio, Some("ni3 hǎo"));
    assert_eq!(fact.text("audio"), format!("{}{}", sound("ni3.mp3"), sound("hao3.mp3")));

    updater.update(&mut fact, FieldKind::Audio, Some("[sound:custom.mp3]"));
    assert_eq!(fact.text("audio"), "[sound:custom.mp3]");

    updater.update(&mut fact, FieldKind::Audio, Some("junk"));
    assert_eq!(fact.text("audio"), "junk");
}

/// Without a delta, generated values are kept and user values reformatted
#[test]
fn test_update_withoutDelta_shouldOnlyReformatUserValues() {
    let updater = fixture_updater(Config {
        tone_display: ToneDisplay::Tonified,
        ..plain_config()
    });

    let mut user = Fact::from_strings([("reading", "ni3 hao3")]);
    updater.update(&mut user, FieldKind::Reading, None);
    assert_eq!(user.get("reading"), Some(&FieldValue::user("nǐ hǎo")));

    let mut machine = Fact::from_strings([("reading", mark_generated("ni3 hao3"))]);
    updater.update(&mut machine, FieldKind::Reading, None);
    assert_eq!(machine.get("reading"), Some(&FieldValue::generated("ni3 hao3")));
}

/// Other fields simply take the typed value
#[test]
fn test_update_otherField_withDelta_shouldStoreUserValue() {
    let updater = fixture_updater(plain_config());
    let mut fact = Fact::from_strings([("trad", mark_generated("書"))]);
    updater.update(&mut fact, FieldKind::Trad, Some("书本"));
    assert_eq!(fact.get("trad"), Some(&FieldValue::user("书本")));

    updater.update(&mut fact, FieldKind::Trad, None);
    assert_eq!(fact.text("trad"), "书本");
}

/// Colored output uses the configured palette
#[test]
fn test_update_expression_withColors_shouldWrapSyllables() {
    common::init_logging();
    let updater = fixture_updater(Config::default());
    let mut fact = Fact::from_strings([("expression", ""), ("reading", "")]);
    updater.update(&mut fact, FieldKind::Expression, Some("你好"));
    assert_eq!(
        fact.text("reading"),
        "<span style=\"color:#00aa00\">nǐ</span> <span style=\"color:#00aa00\">hǎo</span>"
    );
}

/// Forced reformatting turns even unparseable text into rendered syllables
#[test]
fn test_update_reading_withAlwaysReformatOnJunk_shouldStillReformat() {
    let updater = fixture_updater(Config {
        force_reading_to_be_formatted: false,
        ..Config::default()
    });
    let mut fact = Fact::from_strings([("expression", "junk"), ("reading", "")]);
    updater.update_with(&mut fact, FieldKind::Reading, Some("also junk"), true);

    let reading = fact.text("reading");
    assert!(!reading.is_empty());
    assert_ne!(reading, "also junk");
    assert!(reading.contains(">also</span>"));
}

/// Each generation toggle fills its own field and nothing else
#[test]
fn test_update_expression_withSingleToggleOn_shouldFillOnlyThatField() {
    let derived: Vec<FieldKind> = FieldKind::ALL
        .into_iter()
        .filter(|kind| *kind != FieldKind::Expression)
        .collect();

    for enabled in &derived {
        let mut config = plain_config();
        for kind in &derived {
            if let Some(flag) = config.update_control_flag_mut(*kind) {
                *flag = kind == enabled;
            }
        }

        let updater = fixture_updater(config);
        let mut fact = empty_fact();
        updater.update(&mut fact, FieldKind::Expression, Some("书"));

        for kind in &derived {
            let value = fact.get(kind.name()).cloned().unwrap_or_default();
            if kind == enabled {
                assert!(!value.text.is_empty(), "{} should be filled", kind);
                assert!(value.generated, "{} should be marked generated", kind);
            } else {
                assert_eq!(value, FieldValue::default(), "{} should stay empty with only {} on", kind, enabled);
            }
        }
    }
}

/// Clearing the expression never blanks values the user typed
#[test]
fn test_update_expression_withBlankExpression_shouldKeepUserValues() {
    let updater = fixture_updater(plain_config());
    let mut fact = Fact::from_strings(FieldKind::ALL.iter().map(|kind| {
        let text = if *kind == FieldKind::Expression { "书".to_string() } else { format!("my {}", kind.name()) };
        (kind.name(), text)
    }));
    let before = fact.clone();

    updater.update(&mut fact, FieldKind::Expression, Some(""));

    assert_eq!(fact.text("expression"), "");
    for kind in FieldKind::ALL.into_iter().filter(|k| *k != FieldKind::Expression) {
        assert_eq!(fact.get(kind.name()), before.get(kind.name()), "{} should be unchanged", kind);
        assert!(!fact.get(kind.name()).is_some_and(|v| v.generated));
    }
}

/// Words starting with a Latin letter are read as whole dictionary entries
#[test]
fn test_update_expression_withLatinLedWord_shouldFillReadingAndColor() {
    let updater = fixture_updater(plain_config());
    let mut fact = empty_fact();
    updater.update(&mut fact, FieldKind::Expression, Some("T恤"));

    assert_eq!(fact.text("meaning"), "① T-shirt");
    assert!(fact.text("reading").contains("xu4"));
    assert!(fact.text("color").contains("恤</span>"));
}

/// Loading wires the configured language and the media directories together
#[test]
fn test_load_withFixtureResources_shouldFillAudio() -> anyhow::Result<()> {
    common::init_logging();
    let registry = common::fixture_registry();
    let media = vec![common::test_resource_path("media/Test")];
    let updater = FieldUpdater::load(plain_config(), &registry, &media)?;

    let mut fact = Fact::from_strings([("expression", ""), ("audio", "")]);
    updater.update(&mut fact, FieldKind::Expression, Some("书"));
    assert_eq!(fact.text("audio"), sound("shu1.mp3"));
    Ok(())
}

/// Each loading failure surfaces as its own error kind
#[test]
fn test_load_withBadInputs_shouldReportErrorKind() {
    let registry = common::fixture_registry();

    let bad_config = Config {
        dict_language: "klingon".to_string(),
        ..plain_config()
    };
    assert!(matches!(
        FieldUpdater::load(bad_config, &registry, &[]),
        Err(AppError::Config(ConfigError::InvalidLanguage(_)))
    ));

    let missing = vec![common::test_resource_path("media/idontexist")];
    assert!(matches!(
        FieldUpdater::load(plain_config(), &registry, &missing),
        Err(AppError::Media(MediaError::NotADirectory(_)))
    ));

    let empty = DictionaryRegistry::new(common::test_resource_path("media"));
    assert!(matches!(
        FieldUpdater::load(plain_config(), &empty, &[]),
        Err(AppError::Dictionary(DictionaryError::NoSources(_)))
    ));
}
