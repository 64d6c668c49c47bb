/*!
 * Tone-bearing pinyin syllables.
 *
 * A `Pinyin` is a toneless syllable body ("hao", "Zhen", "lü") plus a
 * `ToneInfo`. Syllables parse from both numeric ("hao3") and tone-marked
 * ("hǎo") spellings and render back to either.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Numeric spelling: syllable body followed by a tone digit
static NUMERIC_SYLLABLE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-zÜü:]+)([1-5])$").expect("Invalid numeric syllable regex")
});

/// Shape of a syllable body, without tone
static SYLLABLE_BODY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:(?:zh|ch|sh|[bpmfdtnlgkhjqxrzcsyw])?[aeiouü]+(?:ng|n|r)?|r|m|n|ng|hm|hng)$")
        .expect("Invalid syllable body regex")
});

/// Tone-marked vowels, indexed by tone 1-4
const TONE_MARKS: [(char, [char; 4]); 12] = [
    ('a', ['\u{0101}', '\u{00E1}', '\u{01CE}', '\u{00E0}']),
    ('e', ['\u{0113}', '\u{00E9}', '\u{011B}', '\u{00E8}']),
    ('i', ['\u{012B}', '\u{00ED}', '\u{01D0}', '\u{00EC}']),
    ('o', ['\u{014D}', '\u{00F3}', '\u{01D2}', '\u{00F2}']),
    ('u', ['\u{016B}', '\u{00FA}', '\u{01D4}', '\u{00F9}']),
    ('\u{00FC}', ['\u{01D6}', '\u{01D8}', '\u{01DA}', '\u{01DC}']),
    ('A', ['\u{0100}', '\u{00C1}', '\u{01CD}', '\u{00C0}']),
    ('E', ['\u{0112}', '\u{00C9}', '\u{011A}', '\u{00C8}']),
    ('I', ['\u{012A}', '\u{00CD}', '\u{01CF}', '\u{00CC}']),
    ('O', ['\u{014C}', '\u{00D3}', '\u{01D1}', '\u{00D2}']),
    ('U', ['\u{016A}', '\u{00DA}', '\u{01D3}', '\u{00D9}']),
    ('\u{00DC}', ['\u{01D5}', '\u{01D7}', '\u{01D9}', '\u{01DB}']),
];

/// The tone written for a syllable: 1-4, or 5 for the neutral tone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct ToneInfo {
    written: u8,
}

impl ToneInfo {
    /// Create a tone, rejecting anything outside 1-5
    pub fn new(written: u8) -> Option<Self> {
        (1..=5).contains(&written).then_some(Self { written })
    }

    /// The neutral tone (5)
    pub fn neutral() -> Self {
        Self { written: 5 }
    }

    /// Written tone number, 1-5
    pub fn written(&self) -> u8 {
        self.written
    }
}

impl TryFrom<u8> for ToneInfo {
    type Error = String;

    fn try_from(written: u8) -> Result<Self, Self::Error> {
        Self::new(written).ok_or_else(|| format!("tone {} is outside 1-5", written))
    }
}

impl From<ToneInfo> for u8 {
    fn from(tone: ToneInfo) -> Self {
        tone.written
    }
}

/// A single pinyin syllable
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pinyin {
    word: String,
    toneinfo: ToneInfo,
}

impl Pinyin {
    pub fn new(word: impl Into<String>, toneinfo: ToneInfo) -> Self {
        Self {
            word: word.into(),
            toneinfo,
        }
    }

    /// Parse a numeric ("hao3", "lu:4", "lv4") or tone-marked ("hǎo") syllable.
    /// Tone-marked parsing cannot recover the neutral tone, so bare bodies
    /// like "ma" are not syllables here.
    pub fn parse(text: &str) -> Option<Self> {
        Self::parse_numeric(text).or_else(|| Self::parse_tonified(text))
    }

    fn parse_numeric(text: &str) -> Option<Self> {
        let caps = NUMERIC_SYLLABLE_REGEX.captures(text)?;
        let body = normalize_umlaut(&caps[1]);
        let tone: u8 = caps[2].parse().ok()?;
        if !SYLLABLE_BODY_REGEX.is_match(&body) {
            return None;
        }
        Some(Self::new(body, ToneInfo::new(tone)?))
    }

    fn parse_tonified(text: &str) -> Option<Self> {
        let mut body = String::with_capacity(text.len());
        let mut tone = None;
        for c in text.chars() {
            match unmark(c) {
                Some((base, marked)) => {
                    if tone.is_some() {
                        return None;
                    }
                    tone = Some(marked);
                    body.push(base);
                }
                None => body.push(c),
            }
        }

        let tone = tone?;
        if !SYLLABLE_BODY_REGEX.is_match(&body) {
            return None;
        }
        Some(Self::new(body, ToneInfo::new(tone)?))
    }

    /// Syllable body without any tone
    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn toneinfo(&self) -> ToneInfo {
        self.toneinfo
    }

    /// The erhua suffix syllable ("r5"), written onto the preceding syllable
    pub fn is_erhua(&self) -> bool {
        self.word.eq_ignore_ascii_case("r") && self.toneinfo.written == 5
    }

    /// Numeric spelling ("hao3"); the erhua suffix is written bare
    pub fn numeric(&self) -> String {
        if self.is_erhua() {
            return self.word.clone();
        }
        format!("{}{}", self.word, self.toneinfo.written)
    }

    /// Tone-marked spelling ("hǎo")
    pub fn tonified(&self) -> String {
        if self.toneinfo.written == 5 {
            return self.word.clone();
        }

        let chars: Vec<char> = self.word.chars().collect();
        let Some(target) = mark_position(&chars) else {
            return self.word.clone();
        };

        let mark = TONE_MARKS
            .iter()
            .find(|(base, _)| *base == chars[target])
            .map(|(_, marks)| marks[usize::from(self.toneinfo.written - 1)]);

        chars
            .iter()
            .enumerate()
            .map(|(i, c)| if i == target { mark.unwrap_or(*c) } else { *c })
            .collect()
    }

    /// Key used to find audio clips: body plus tone digit, lowercased
    pub fn clip_stem(&self) -> String {
        format!("{}{}", self.word.to_lowercase(), self.toneinfo.written)
    }

    /// Key used when no tone-exact clip exists
    pub fn toneless_clip_stem(&self) -> String {
        self.word.to_lowercase()
    }
}

fn normalize_umlaut(body: &str) -> String {
    body.replace("u:", "\u{00FC}")
        .replace("U:", "\u{00DC}")
        .replace('v', "\u{00FC}")
        .replace('V', "\u{00DC}")
}

fn unmark(c: char) -> Option<(char, u8)> {
    TONE_MARKS.iter().find_map(|(base, marks)| {
        marks
            .iter()
            .position(|m| *m == c)
            .map(|i| (*base, (i + 1) as u8))
    })
}

/// Standard placement: a or e take the mark, then the o of "ou", else the last vowel
fn mark_position(chars: &[char]) -> Option<usize> {
    let lower: Vec<char> = chars.iter().map(|c| lowercase(*c)).collect();
    if let Some(i) = lower.iter().position(|c| *c == 'a' || *c == 'e') {
        return Some(i);
    }
    if let Some(i) = lower.windows(2).position(|w| w == ['o', 'u']) {
        return Some(i);
    }
    lower
        .iter()
        .rposition(|c| matches!(c, 'i' | 'o' | 'u' | '\u{00FC}'))
}

fn lowercase(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}
