/*!
 * Gloss parsing and meaning/measure-word combination.
 *
 * Glosses may embed references to other words in the form
 * `TRAD|SIMP[pin1 yin1]` (or `HANZI[pin1 yin1]` when both scripts agree).
 * A gloss starting with `CL:` lists measure words rather than a meaning.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::model::token::{push_other, tokenize_pinyin_text};
use crate::model::{Character, ScriptForms, Token, Word, is_han};

use super::Script;

/// Embedded word reference inside a gloss
static REFERENCE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([\p{Han}・·]+)(?:\|([\p{Han}・·]+))?\[([^\]]*)\]")
        .expect("Invalid gloss reference regex")
});

const MEASURE_WORD_PREFIX: &str = "CL:";

/// A measure word and its reading
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeasureWord {
    pub characters: Vec<Token>,
    pub reading: Vec<Token>,
}

/// One gloss, tokenized so embedded Chinese can be colored
pub type Meaning = Vec<Token>;

/// Parse a dictionary reading ("gu3 piao4 zhi3 shu4") into unspaced tokens.
/// Pieces that are not syllables (e.g. "·") stay as raw text.
pub fn parse_reading(reading: &str) -> Vec<Token> {
    // Pieces are never merged: one token per written syllable keeps
    // character alignment for entries like "AA制 [A A zhi4]"
    reading
        .split_whitespace()
        .flat_map(tokenize_pinyin_text)
        .collect()
}

/// Reading tokens with single spaces between them, for display inside glosses
pub fn spaced_reading(reading: &[Token]) -> Vec<Token> {
    let mut tokens = Vec::with_capacity(reading.len() * 2);
    for (i, token) in reading.iter().enumerate() {
        if i > 0 {
            tokens.push(Token::other(" "));
        }
        tokens.push(token.clone());
    }
    tokens
}

/// Pair each character of `text` with the tone of the matching reading token.
/// Tones are only assigned when the character and reading counts agree.
pub fn tone_characters(text: &str, reading: &[Token]) -> Vec<Token> {
    let chars: Vec<char> = text.chars().collect();
    let aligned = chars.len() == reading.len();

    let mut tokens = Vec::with_capacity(chars.len());
    for (i, c) in chars.iter().enumerate() {
        if is_han(*c) {
            let tone = if aligned { reading[i].toneinfo() } else { None };
            tokens.push(Token::Character(Character::new(*c, tone)));
        } else {
            push_other(&mut tokens, c.encode_utf8(&mut [0u8; 4]));
        }
    }
    tokens
}

fn reference_word(traditional: &str, simplified: &str, reading: &[Token], script: Script) -> Token {
    let chosen = match script {
        Script::Simplified => simplified,
        Script::Traditional => traditional,
    };
    Token::Word(Word::with_forms(
        tone_characters(chosen, reading),
        ScriptForms {
            traditional: traditional.to_string(),
            simplified: simplified.to_string(),
        },
    ))
}

/// Whether a raw gloss is a measure-word list
pub fn is_measure_word_gloss(gloss: &str) -> bool {
    gloss.starts_with(MEASURE_WORD_PREFIX)
}

/// Tokenize one gloss, rendering embedded references in the preferred script.
/// A reference that ends the gloss is followed by " - " and its reading.
pub fn parse_gloss(gloss: &str, script: Script) -> Meaning {
    let mut tokens = Vec::new();
    let mut pos = 0;

    for caps in REFERENCE_REGEX.captures_iter(gloss) {
        let Some(whole) = caps.get(0) else { continue };
        push_other(&mut tokens, &gloss[pos..whole.start()]);

        let traditional = &caps[1];
        let simplified = caps.get(2).map_or(traditional, |m| m.as_str());
        let reading = parse_reading(&caps[3]);
        tokens.push(reference_word(traditional, simplified, &reading, script));

        if gloss[whole.end()..].trim().is_empty() && !reading.is_empty() {
            tokens.push(Token::other(" - "));
            tokens.extend(spaced_reading(&reading));
        }
        pos = whole.end();
    }
    push_other(&mut tokens, &gloss[pos..]);
    tokens
}

/// Parse a `CL:` gloss into measure words
pub fn parse_measure_words(gloss: &str, script: Script) -> Vec<MeasureWord> {
    let body = gloss.strip_prefix(MEASURE_WORD_PREFIX).unwrap_or(gloss);
    REFERENCE_REGEX
        .captures_iter(body)
        .map(|caps| {
            let traditional = &caps[1];
            let simplified = caps.get(2).map_or(traditional, |m| m.as_str());
            let chosen = match script {
                Script::Simplified => simplified,
                Script::Traditional => traditional,
            };
            let reading = parse_reading(&caps[3]);
            MeasureWord {
                characters: tone_characters(chosen, &reading),
                reading: spaced_reading(&reading),
            }
        })
        .collect()
}

/// Fold measure words into the meaning list as a trailing
/// "MW: 本 - ben3, 册 - ce4" line. Meanings keep their order and come first;
/// measure words follow in entry order.
pub fn combine_meanings_mws(meanings: Vec<Meaning>, measure_words: &[MeasureWord]) -> Vec<Meaning> {
    let mut combined = meanings;
    if measure_words.is_empty() {
        return combined;
    }

    let mut line = vec![Token::other("MW: ")];
    for (i, mw) in measure_words.iter().enumerate() {
        if i > 0 {
            push_other(&mut line, ", ");
        }
        line.extend(mw.characters.iter().cloned());
        push_other(&mut line, " - ");
        line.extend(mw.reading.iter().cloned());
    }
    combined.push(line);
    combined
}
