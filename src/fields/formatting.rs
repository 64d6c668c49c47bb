/*!
 * HTML rendering of tokens and field text.
 *
 * Renders tone colour spans, syllables in the configured tone display,
 * numbered meaning lists, sound tags and web links, and the reformatters
 * applied to user-entered reading, meaning and audio text.
 */

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::app_config::{Config, MeaningNumbering, SEARCH_TERMS_PLACEHOLDER, ToneDisplay, WebDictionary};
use crate::dictionary::MeasureWord;
use crate::model::token::{tokenize_loose_pinyin_text, tokenize_pinyin_text};
use crate::model::{Pinyin, ToneInfo, Token, leaves};

/// Any existing meaning number marker
static MEANING_MARKER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\s?)(\(\d+\)|[\u{2460}-\u{2473}]|[\u{3280}-\u{3289}])").expect("Invalid meaning marker regex")
});

/// An HTML span and its contents
static SPAN_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<span[^>]*>.*?</span>").expect("Invalid span regex"));

/// Any HTML tag
static TAG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("Invalid tag regex"));

/// Text with every HTML tag removed
pub fn strip_html(text: &str) -> String {
    TAG_REGEX.replace_all(text, "").into_owned()
}

/// Wrap text in a colour span
pub fn color_span(text: &str, color: &str) -> String {
    format!("<span style=\"color:{}\">{}</span>", color, text)
}

fn tone_colored(text: &str, tone: Option<ToneInfo>, config: &Config, colorize: bool) -> String {
    match tone.and_then(|t| config.tone_color(usize::from(t.written()))) {
        Some(color) if colorize => color_span(text, color),
        _ => text.to_string(),
    }
}

/// A syllable in the configured tone display
pub fn render_syllable(syllable: &Pinyin, config: &Config) -> String {
    match config.tone_display {
        ToneDisplay::Numeric => syllable.numeric(),
        ToneDisplay::Tonified => syllable.tonified(),
    }
}

/// Render tokens as HTML. Adjacent syllables are separated by one space, the
/// erhua suffix joins the syllable before it, and raw text is copied.
pub fn render_tokens(tokens: &[Token], config: &Config, colorize: bool) -> String {
    let mut out = String::new();
    let mut after_syllable = false;

    for token in leaves(tokens) {
        match token {
            Token::Pinyin(p) if p.is_erhua() && after_syllable => out.push_str(p.word()),
            Token::Pinyin(p) => {
                if after_syllable {
                    out.push(' ');
                }
                out.push_str(&tone_colored(&render_syllable(p, config), Some(p.toneinfo()), config, colorize));
                after_syllable = true;
            }
            Token::Character(c) => {
                out.push_str(&tone_colored(c.glyph.encode_utf8(&mut [0u8; 4]), c.toneinfo, config, colorize));
                after_syllable = false;
            }
            Token::Other(text) => {
                out.push_str(text);
                after_syllable = false;
            }
            Token::Word(_) => {}
        }
    }
    out
}

/// Marker in front of meaning `n` (1-based), before colouring
fn meaning_marker(numbering: MeaningNumbering, n: usize) -> String {
    let circled = |base: u32, max: usize| {
        (1..=max)
            .contains(&n)
            .then(|| char::from_u32(base + n as u32 - 1))
            .flatten()
            .map(String::from)
    };
    match numbering {
        MeaningNumbering::ArabicParens => None,
        MeaningNumbering::CircledArabic => circled(0x2460, 20),
        MeaningNumbering::CircledChinese => circled(0x3280, 10),
        MeaningNumbering::Unnumbered => Some(String::new()),
    }
    .unwrap_or_else(|| format!("({})", n))
}

fn colored_marker(n: usize, config: &Config) -> String {
    let marker = meaning_marker(config.meaning_numbering, n);
    if config.color_meaning_numbers && !marker.is_empty() {
        color_span(&marker, &config.meaning_numbering_color)
    } else {
        marker
    }
}

/// Join rendered meanings with numbering, emphasis and the configured separator.
/// Numbering only applies when there is more than one meaning.
pub fn format_meanings(meanings: &[String], config: &Config) -> String {
    let numbered = meanings.len() > 1;
    meanings
        .iter()
        .enumerate()
        .map(|(i, meaning)| {
            let body = if i == 0 && config.emphasise_main_meaning {
                format!("<b>{}</b>", meaning)
            } else {
                meaning.clone()
            };
            if numbered {
                format!("{} {}", colored_marker(i + 1, config), body)
            } else {
                body
            }
        })
        .collect::<Vec<_>>()
        .join(config.meaning_separator_text())
}

/// Render measure words as `CHARS - READING` pairs joined by ", "
pub fn format_measure_words(measure_words: &[MeasureWord], config: &Config) -> String {
    let colorize = config.colorized_pinyin_generation;
    measure_words
        .iter()
        .map(|mw| {
            format!(
                "{} - {}",
                render_tokens(&mw.characters, config, colorize),
                render_tokens(&mw.reading, config, colorize)
            )
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Embedded audio reference
pub fn sound_tag(reference: &str) -> String {
    format!("[sound:{}]", reference)
}

pub fn contains_sound_tags(text: &str) -> bool {
    text.contains("[sound:")
}

/// Web links for an expression, one per configured dictionary
pub fn format_web_links(expression: &str, dictionaries: &[WebDictionary]) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(expression.as_bytes()).collect();
    dictionaries
        .iter()
        .map(|d| {
            format!(
                "[<a href=\"{}\" title=\"{}\">{}</a>]",
                d.url.replace(SEARCH_TERMS_PLACEHOLDER, &encoded),
                d.name,
                d.name
            )
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Rewrite existing `(n)`, circled and circled-Chinese markers to the
/// configured numbering. With no numbering a marker is dropped along with
/// one preceding space, so "(1) yes (2) no" becomes " yes no".
pub fn reformat_meaning_numbers(text: &str, config: &Config) -> String {
    let mut n = 0;
    MEANING_MARKER_REGEX
        .replace_all(text, |caps: &Captures| {
            n += 1;
            let marker = colored_marker(n, config);
            if marker.is_empty() {
                String::new()
            } else {
                format!("{}{}", &caps[1], marker)
            }
        })
        .into_owned()
}

/// Re-render the syllables of user-entered pinyin. Existing `<span>`
/// segments are kept untouched.
pub fn reformat_reading(text: &str, config: &Config) -> String {
    reformat_reading_with(text, config, tokenize_pinyin_text)
}

/// As `reformat_reading`, also rendering bare words as neutral-tone syllables
pub fn reformat_loose_reading(text: &str, config: &Config) -> String {
    reformat_reading_with(text, config, tokenize_loose_pinyin_text)
}

fn reformat_reading_with(text: &str, config: &Config, tokenize: fn(&str) -> Vec<Token>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;
    for span in SPAN_REGEX.find_iter(text) {
        out.push_str(&render_tokens(
            &tokenize(&text[pos..span.start()]),
            config,
            config.colorized_pinyin_generation,
        ));
        out.push_str(span.as_str());
        pos = span.end();
    }
    out.push_str(&render_tokens(&tokenize(&text[pos..]), config, config.colorized_pinyin_generation));
    out
}
