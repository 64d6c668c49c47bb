/*!
 * Field updater: decides which fields of a fact to (re)compute.
 *
 * Two entry points share one overwrite policy:
 * - a single field was edited (`reading`, `meaning`, `audio`, ...): store the
 *   new value as the user's own, optionally reformatted
 * - the expression was edited: blank every generated field, then fill each
 *   eligible field from the new expression
 *
 * A field is eligible for generation when its toggle is on and it is either
 * empty or holds a generated value. A non-empty value the user wrote is
 * never overwritten.
 */

use std::path::PathBuf;
use std::sync::Arc;

use log::{debug, info};

use crate::app_config::Config;
use crate::dictionary::{DictionaryRegistry, PinyinDictionary, Script};
use crate::errors::AppError;
use crate::fields::formatting::{
    contains_sound_tags, reformat_loose_reading, reformat_meaning_numbers, reformat_reading, strip_html,
};
use crate::fields::generators::{self, GeneratorContext};
use crate::fields::{Fact, FieldKind, FieldValue};
use crate::media::{MediaPack, MediaResolver};
use crate::model::token::tokenize_pinyin_text;
use crate::model::{Token, syllables};

/// Applies generators to facts under one configuration snapshot
pub struct FieldUpdater {
    config: Config,
    dictionary: Arc<PinyinDictionary>,
    media: MediaResolver,
}

impl FieldUpdater {
    /// Create an updater. Media packs are consulted in the given order.
    pub fn new(config: Config, dictionary: Arc<PinyinDictionary>, packs: Vec<MediaPack>) -> Self {
        let media = MediaResolver::new(packs, &config.audio_extensions);
        Self {
            config,
            dictionary,
            media,
        }
    }

    /// Validate `config`, fetch the engine for its meaning language from
    /// `registry` and discover one media pack per directory, named after it
    pub fn load(config: Config, registry: &DictionaryRegistry, media_dirs: &[PathBuf]) -> Result<Self, AppError> {
        config.validate()?;
        let dictionary = registry.dictionary_for(&config.dict_language)?;

        let mut packs = Vec::with_capacity(media_dirs.len());
        for dir in media_dirs {
            let name = dir
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .ok_or_else(|| AppError::File(format!("Media directory has no name: {}", dir.display())))?;
            packs.push(MediaPack::discover(&name, dir)?);
        }
        info!("Loaded {} media pack(s) for {} meanings", packs.len(), config.dict_language);

        Ok(Self::new(config, dictionary, packs))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn dictionary(&self) -> &PinyinDictionary {
        &self.dictionary
    }

    fn context(&self) -> GeneratorContext<'_> {
        GeneratorContext::new(&self.config, &self.dictionary, &self.media)
    }

    /// Update a fact after `field` changed. `delta` is the field's new raw
    /// value, or `None` when nothing was typed and the current value should
    /// be reused.
    pub fn update(&self, fact: &mut Fact, field: FieldKind, delta: Option<&str>) {
        self.update_with(fact, field, delta, false);
    }

    /// As `update`; `always_reformat` reformats a reading even when
    /// `force_reading_to_be_formatted` is off, reading bare words as
    /// neutral-tone syllables
    pub fn update_with(&self, fact: &mut Fact, field: FieldKind, delta: Option<&str>, always_reformat: bool) {
        debug!("Updating fact from {} (delta: {:?})", field, delta);
        match field {
            FieldKind::Expression => self.update_from_expression(fact, delta),
            FieldKind::Reading => self.update_from_reading(fact, delta, always_reformat),
            FieldKind::Meaning => {
                let force = self.config.force_meaning_numbers_to_be_formatted;
                self.update_single(fact, field, delta, force, |text| {
                    reformat_meaning_numbers(text, &self.config)
                });
            }
            FieldKind::Audio => {
                let force = self.config.force_pinyin_in_audio_to_sound_tags;
                self.update_single(fact, field, delta, force, |text| self.reformat_audio(text));
            }
            _ => self.update_single(fact, field, delta, false, str::to_string),
        }
    }

    /// Store a single field's delta as user text. Without a delta an existing
    /// user value is reformatted when forced; generated values are kept.
    fn update_single<F>(&self, fact: &mut Fact, field: FieldKind, delta: Option<&str>, force: bool, reformat: F)
    where
        F: Fn(&str) -> String,
    {
        let Some(key) = fact.resolve(field, &self.config) else {
            debug!("Fact has no {} field", field);
            return;
        };

        let updated = match delta {
            Some(text) if force => FieldValue::user(reformat(text)),
            Some(text) => FieldValue::user(text),
            None => match fact.get(&key) {
                Some(current) if force && !current.generated && !current.is_empty() => {
                    FieldValue::user(reformat(&current.text))
                }
                _ => return,
            },
        };
        fact.replace(&key, updated);
    }

    fn reformat_audio(&self, text: &str) -> String {
        if contains_sound_tags(text) {
            return text.to_string();
        }
        generators::audio_from_pinyin(&self.media, text).unwrap_or_else(|| text.to_string())
    }

    fn update_from_reading(&self, fact: &mut Fact, delta: Option<&str>, always_reformat: bool) {
        let force = self.config.force_reading_to_be_formatted || always_reformat;
        self.update_single(fact, FieldKind::Reading, delta, force, |text| {
            if always_reformat {
                reformat_loose_reading(text, &self.config)
            } else {
                reformat_reading(text, &self.config)
            }
        });

        // The color field follows the tones of the new reading
        let Some(color_key) = self.eligible_key(fact, FieldKind::Color) else {
            return;
        };
        let expression = self.expression_text(fact);
        if expression.trim().is_empty() {
            return;
        }
        let reading = self.reading_tokens(fact);
        if let Some(colored) = generators::color(&self.context(), &expression, reading.as_deref()) {
            fact.replace(&color_key, FieldValue::generated(colored));
        }
    }

    fn update_from_expression(&self, fact: &mut Fact, delta: Option<&str>) {
        let expression_key = fact.resolve(FieldKind::Expression, &self.config);

        let expression = match delta {
            Some(text) => {
                let text = if self.config.force_expression_to_be_simp_trad {
                    self.dictionary.convert_script(text, self.config.prefer_simp_trad)
                } else {
                    text.to_string()
                };
                if let Some(key) = &expression_key {
                    fact.replace(key, FieldValue::user(text.clone()));
                }
                self.blank_generated(fact);
                text
            }
            None => self.expression_text(fact),
        };

        if expression.trim().is_empty() {
            return;
        }
        self.generate_all(fact, &expression);
    }

    /// Empty every generated field except the expression
    fn blank_generated(&self, fact: &mut Fact) {
        for kind in FieldKind::ALL.into_iter().filter(|k| *k != FieldKind::Expression) {
            let Some(key) = fact.resolve(kind, &self.config) else {
                continue;
            };
            if fact.get(&key).is_some_and(|v| v.generated) {
                fact.replace(&key, FieldValue::default());
            }
        }
    }

    fn generate_all(&self, fact: &mut Fact, expression: &str) {
        let ctx = self.context();
        for kind in FieldKind::ALL {
            let Some(key) = self.eligible_key(fact, kind) else {
                continue;
            };

            let value = match kind {
                FieldKind::Expression => None,
                FieldKind::Reading => generators::reading(&ctx, expression),
                FieldKind::Meaning => generators::meaning(&ctx, expression),
                FieldKind::Mw => generators::measure_words(&ctx, expression),
                FieldKind::Color => {
                    let reading = self.reading_tokens(fact);
                    generators::color(&ctx, expression, reading.as_deref())
                }
                FieldKind::Trad => generators::script_variant(&ctx, expression, Script::Traditional),
                FieldKind::Simp => generators::script_variant(&ctx, expression, Script::Simplified),
                FieldKind::Audio => generators::audio(&ctx, expression),
                FieldKind::MwAudio => generators::measure_word_audio(&ctx, expression),
                FieldKind::Weblinks => generators::web_links(&ctx, expression),
            };

            match value {
                Some(text) => {
                    fact.replace(&key, FieldValue::generated(text));
                }
                None => debug!("Nothing generated for {}", kind),
            }
        }
    }

    /// Key of a field that may be (re)generated: present in the fact, toggle
    /// on, and empty or generated
    fn eligible_key(&self, fact: &Fact, kind: FieldKind) -> Option<String> {
        if self.config.update_control_flag(kind) != Some(true) {
            return None;
        }
        let key = fact.resolve(kind, &self.config)?;
        let value = fact.get(&key)?;
        (value.is_empty() || value.generated).then_some(key)
    }

    fn expression_text(&self, fact: &Fact) -> String {
        fact.resolve(FieldKind::Expression, &self.config)
            .map(|key| fact.text(&key).to_string())
            .unwrap_or_default()
    }

    /// Syllables currently in the reading field, if any
    fn reading_tokens(&self, fact: &Fact) -> Option<Vec<Token>> {
        let key = fact.resolve(FieldKind::Reading, &self.config)?;
        let tokens = tokenize_pinyin_text(&strip_html(fact.text(&key)));
        (!syllables(&tokens).is_empty()).then_some(tokens)
    }
}
