/*!
 * Value types produced by tokenization.
 *
 * - `pinyin`: `ToneInfo` and the `Pinyin` syllable
 * - `token`: the `Token` tagged union and flattening helpers
 */

pub mod pinyin;
pub mod token;

pub use self::pinyin::{Pinyin, ToneInfo};
pub use self::token::{Character, ScriptForms, Token, Word, flatten, is_han, leaves, syllables};
