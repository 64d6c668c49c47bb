/*!
 * Token model shared by the dictionary and the field generators.
 *
 * Every tokenization keeps the surface text of its input: flattening the
 * tokens (concatenating each token's text in order) gives back the original
 * string, whitespace and punctuation included.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::pinyin::{Pinyin, ToneInfo};

/// Runs of concatenated numeric syllables such as "hen3hao3"
static NUMERIC_RUN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-zÜü:]+[1-5]").expect("Invalid numeric run regex")
});

/// A Chinese character, with a tone when the dictionary knows one
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Character {
    pub glyph: char,
    pub toneinfo: Option<ToneInfo>,
}

impl Character {
    pub fn new(glyph: char, toneinfo: Option<ToneInfo>) -> Self {
        Self { glyph, toneinfo }
    }
}

/// Simplified and traditional spellings of a dictionary key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptForms {
    pub traditional: String,
    pub simplified: String,
}

/// A group of tokens matched as one dictionary entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Word {
    pub tokens: Vec<Token>,
    /// Script forms of the entry this word was matched against, if any
    pub forms: Option<ScriptForms>,
}

impl Word {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, forms: None }
    }

    pub fn with_forms(tokens: Vec<Token>, forms: ScriptForms) -> Self {
        Self {
            tokens,
            forms: Some(forms),
        }
    }
}

/// One unit of tokenized text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Token {
    Character(Character),
    Word(Word),
    Pinyin(Pinyin),
    /// Raw passthrough text: digits, Latin letters, whitespace, punctuation
    Other(String),
}

impl Token {
    pub fn other(text: impl Into<String>) -> Self {
        Token::Other(text.into())
    }

    /// Append this token's surface text
    pub fn write_surface(&self, out: &mut String) {
        match self {
            Token::Character(c) => out.push(c.glyph),
            Token::Word(w) => w.tokens.iter().for_each(|t| t.write_surface(out)),
            Token::Pinyin(p) => out.push_str(&p.numeric()),
            Token::Other(text) => out.push_str(text),
        }
    }

    /// Tone carried directly by this token
    pub fn toneinfo(&self) -> Option<ToneInfo> {
        match self {
            Token::Character(c) => c.toneinfo,
            Token::Pinyin(p) => Some(p.toneinfo()),
            Token::Word(_) | Token::Other(_) => None,
        }
    }
}

/// Concatenate the surface text of every token
pub fn flatten(tokens: &[Token]) -> String {
    let mut out = String::new();
    tokens.iter().for_each(|t| t.write_surface(&mut out));
    out
}

/// Every non-word token, descending into words, in order
pub fn leaves(tokens: &[Token]) -> Vec<&Token> {
    let mut out = Vec::new();
    collect_leaves(tokens, &mut out);
    out
}

fn collect_leaves<'a>(tokens: &'a [Token], out: &mut Vec<&'a Token>) {
    for token in tokens {
        match token {
            Token::Word(w) => collect_leaves(&w.tokens, out),
            other => out.push(other),
        }
    }
}

/// Every syllable in a token sequence, in order
pub fn syllables(tokens: &[Token]) -> Vec<&Pinyin> {
    leaves(tokens)
        .into_iter()
        .filter_map(|t| match t {
            Token::Pinyin(p) => Some(p),
            _ => None,
        })
        .collect()
}

/// Push raw text, merging it into a preceding `Other` token
pub fn push_other(tokens: &mut Vec<Token>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Token::Other(existing)) = tokens.last_mut() {
        existing.push_str(text);
    } else {
        tokens.push(Token::other(text));
    }
}

/// Whether a character is a CJK ideograph
pub fn is_han(c: char) -> bool {
    matches!(c as u32,
        0x3007
        | 0x3400..=0x4DBF
        | 0x4E00..=0x9FFF
        | 0xF900..=0xFAFF
        | 0x20000..=0x2A6DF
        | 0x2A700..=0x2EBEF
        | 0x2F800..=0x2FA1F)
}

/// Tokenize free-form pinyin text ("hen3 hǎo", "hen3,hao3", "hen3hao3").
/// Anything that is not a syllable is kept as `Other` text.
pub fn tokenize_pinyin_text(text: &str) -> Vec<Token> {
    tokenize_runs(text, false)
}

/// As `tokenize_pinyin_text`, but every purely alphabetic run that is not a
/// toned syllable is taken as a neutral-tone syllable ("ma", "also").
pub fn tokenize_loose_pinyin_text(text: &str) -> Vec<Token> {
    tokenize_runs(text, true)
}

fn tokenize_runs(text: &str, toneless: bool) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut run = String::new();

    for c in text.chars() {
        if c.is_alphanumeric() || c == ':' {
            run.push(c);
        } else {
            flush_pinyin_run(&mut tokens, &run, toneless);
            run.clear();
            push_other(&mut tokens, c.encode_utf8(&mut [0u8; 4]));
        }
    }
    flush_pinyin_run(&mut tokens, &run, toneless);
    tokens
}

fn flush_pinyin_run(tokens: &mut Vec<Token>, run: &str, toneless: bool) {
    if run.is_empty() {
        return;
    }
    if let Some(syllable) = Pinyin::parse(run) {
        tokens.push(Token::Pinyin(syllable));
        return;
    }

    // Several numeric syllables written without separators
    let pieces: Vec<&str> = NUMERIC_RUN_REGEX.find_iter(run).map(|m| m.as_str()).collect();
    let covered: usize = pieces.iter().map(|p| p.len()).sum();
    if covered == run.len() {
        let parsed: Option<Vec<Pinyin>> = pieces.iter().map(|p| Pinyin::parse(p)).collect();
        if let Some(parsed) = parsed {
            tokens.extend(parsed.into_iter().map(Token::Pinyin));
            return;
        }
    }

    if toneless && run.chars().all(char::is_alphabetic) {
        tokens.push(Token::Pinyin(Pinyin::new(run, ToneInfo::neutral())));
        return;
    }
    push_other(tokens, run);
}
