/*!
 * One generator per derived field.
 *
 * Each generator is a pure function of the expression, the configuration,
 * the dictionary engine and the media resolver. `None` means "nothing to
 * write": the updater leaves the field as it is.
 */

use crate::app_config::Config;
use crate::dictionary::{PinyinDictionary, Script, combine_meanings_mws};
use crate::media::MediaResolver;
use crate::model::token::tokenize_pinyin_text;
use crate::model::{Character, Pinyin, Token, ToneInfo, Word, leaves, syllables};

use super::formatting::{format_measure_words, format_meanings, format_web_links, render_tokens, sound_tag};

/// Quantity words voiced before each measure word: 两 三 四 五 六 七 八 九
const QUANTITY_DIGITS: [(&str, u8); 8] = [
    ("liang", 3),
    ("san", 1),
    ("si", 4),
    ("wu", 3),
    ("liu", 4),
    ("qi", 1),
    ("ba", 1),
    ("jiu", 3),
];

/// Everything a generator reads
#[derive(Clone, Copy)]
pub struct GeneratorContext<'a> {
    pub config: &'a Config,
    pub dictionary: &'a PinyinDictionary,
    pub media: &'a MediaResolver,
}

impl<'a> GeneratorContext<'a> {
    pub fn new(config: &'a Config, dictionary: &'a PinyinDictionary, media: &'a MediaResolver) -> Self {
        Self {
            config,
            dictionary,
            media,
        }
    }
}

fn non_empty(text: String) -> Option<String> {
    (!text.trim().is_empty()).then_some(text)
}

/// Pinyin reading of the expression
pub fn reading(ctx: &GeneratorContext<'_>, expression: &str) -> Option<String> {
    let tokens = ctx.dictionary.reading(expression);
    if syllables(&tokens).is_empty() {
        return None;
    }
    non_empty(render_tokens(&tokens, ctx.config, ctx.config.colorized_pinyin_generation))
}

/// Replace the expression's characters inside a meaning by the masking character
fn mask_hanzi(tokens: &[Token], expression: &str, mask: &str) -> Vec<Token> {
    tokens
        .iter()
        .map(|token| match token {
            Token::Character(c) if expression.contains(c.glyph) => Token::other(mask),
            Token::Word(w) => Token::Word(Word {
                tokens: mask_hanzi(&w.tokens, expression, mask),
                forms: w.forms.clone(),
            }),
            other => other.clone(),
        })
        .collect()
}

/// Numbered meanings. Measure words join the list when they have no field of their own.
pub fn meaning(ctx: &GeneratorContext<'_>, expression: &str) -> Option<String> {
    let config = ctx.config;
    let (meanings, measure_words) = ctx.dictionary.meanings(expression, config.prefer_simp_trad)?;
    let meanings = if config.detect_measure_words {
        meanings
    } else {
        combine_meanings_mws(meanings, &measure_words)
    };

    let rendered: Vec<String> = meanings
        .iter()
        .map(|m| {
            let tokens = if config.hanzi_masking {
                mask_hanzi(m, expression, &config.hanzi_masking_character)
            } else {
                m.clone()
            };
            render_tokens(&tokens, config, config.colorized_pinyin_generation)
        })
        .collect();
    if rendered.is_empty() {
        return None;
    }
    non_empty(format_meanings(&rendered, config))
}

/// Measure words with their readings
pub fn measure_words(ctx: &GeneratorContext<'_>, expression: &str) -> Option<String> {
    let (_, measure_words) = ctx.dictionary.meanings(expression, ctx.config.prefer_simp_trad)?;
    if measure_words.is_empty() {
        return None;
    }
    non_empty(format_measure_words(&measure_words, ctx.config))
}

fn sound_tags(clips: &[String]) -> String {
    clips.iter().map(|c| sound_tag(c)).collect()
}

/// Sound tags for the syllables of the expression's reading
pub fn audio(ctx: &GeneratorContext<'_>, expression: &str) -> Option<String> {
    let reading = ctx.dictionary.reading(expression);
    non_empty(sound_tags(&ctx.media.clips_for(syllables(&reading))))
}

/// Sound tags for pinyin text typed by the user
pub fn audio_from_pinyin(media: &MediaResolver, pinyin_text: &str) -> Option<String> {
    let tokens = tokenize_pinyin_text(pinyin_text);
    let found = syllables(&tokens);
    if found.is_empty() {
        return None;
    }
    Some(sound_tags(&media.clips_for(found)))
}

/// For each measure word: a quantity, the measure word and the expression
pub fn measure_word_audio(ctx: &GeneratorContext<'_>, expression: &str) -> Option<String> {
    let (_, measure_words) = ctx.dictionary.meanings(expression, ctx.config.prefer_simp_trad)?;
    let reading = ctx.dictionary.reading(expression);
    let expression_clips = ctx.media.clips_for(syllables(&reading));

    let mut clips = Vec::new();
    for (i, mw) in measure_words.iter().enumerate() {
        let (word, tone) = QUANTITY_DIGITS[i % QUANTITY_DIGITS.len()];
        let quantity = Pinyin::new(word, ToneInfo::new(tone).unwrap_or_else(ToneInfo::neutral));
        clips.extend(ctx.media.clip_for(&quantity));
        clips.extend(ctx.media.clips_for(syllables(&mw.reading)));
        clips.extend(expression_clips.iter().cloned());
    }
    non_empty(sound_tags(&clips))
}

fn retone_walk<'t>(tokens: &[Token], tones: &mut impl Iterator<Item = &'t ToneInfo>) -> Vec<Token> {
    tokens
        .iter()
        .map(|token| match token {
            Token::Character(c) => Token::Character(Character::new(c.glyph, tones.next().copied())),
            Token::Word(w) => Token::Word(Word {
                tokens: retone_walk(&w.tokens, tones),
                forms: w.forms.clone(),
            }),
            other => other.clone(),
        })
        .collect()
}

/// Replace character tones by the tones of a reading, when the counts agree
fn retone(tokens: &[Token], tones: &[ToneInfo]) -> Option<Vec<Token>> {
    let characters = leaves(tokens)
        .iter()
        .filter(|t| matches!(t, Token::Character(_)))
        .count();
    (characters == tones.len()).then(|| retone_walk(tokens, &mut tones.iter()))
}

/// The expression with each character in its tone colour. Tones come from
/// `reading` when given and aligned with the characters, else the dictionary.
pub fn color(ctx: &GeneratorContext<'_>, expression: &str, reading: Option<&[Token]>) -> Option<String> {
    let tokens = ctx.dictionary.tonedchars(expression);
    let tokens = reading
        .map(|r| syllables(r).iter().map(|p| p.toneinfo()).collect::<Vec<_>>())
        .and_then(|tones| retone(&tokens, &tones))
        .unwrap_or(tokens);

    if !leaves(&tokens).iter().any(|t| t.toneinfo().is_some()) {
        return None;
    }
    non_empty(render_tokens(&tokens, ctx.config, true))
}

/// The expression in one script
pub fn script_variant(ctx: &GeneratorContext<'_>, expression: &str, script: Script) -> Option<String> {
    non_empty(ctx.dictionary.convert_script(expression, script))
}

/// Links to the configured web dictionaries
pub fn web_links(ctx: &GeneratorContext<'_>, expression: &str) -> Option<String> {
    if ctx.config.web_dictionaries.is_empty() {
        return None;
    }
    non_empty(format_web_links(expression.trim(), &ctx.config.web_dictionaries))
}
