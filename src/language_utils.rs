use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for dictionary meaning languages
///
/// Meaning languages are configured as ISO 639-1 (2-letter) or ISO 639-2
/// (3-letter) codes. Dictionary files are registered under the 2-letter form.
/// Map an ISO 639-2/B code to its ISO 639-2/T counterpart where they differ
fn bibliographic_to_terminology(code: &str) -> &str {
    match code {
        "fre" => "fra",
        "ger" => "deu",
        "dut" => "nld",
        "chi" => "zho",
        "cze" => "ces",
        "slo" => "slk",
        "rum" => "ron",
        _ => code,
    }
}

/// Normalize a language code to ISO 639-1 when one exists, else ISO 639-2/T
pub fn normalize_language_code(code: &str) -> Result<String> {
    let normalized_code = code.trim().to_lowercase();

    match normalized_code.len() {
        2 => {
            if Language::from_639_1(&normalized_code).is_some() {
                return Ok(normalized_code);
            }
        }
        3 => {
            let part2t = bibliographic_to_terminology(&normalized_code);
            if let Some(lang) = Language::from_639_3(part2t) {
                return Ok(lang
                    .to_639_1()
                    .map(str::to_string)
                    .unwrap_or_else(|| part2t.to_string()));
            }
        }
        _ => {}
    }

    Err(anyhow!("Invalid language code: {}", code))
}

/// Whether a code is a valid ISO 639 language code
pub fn is_valid_language_code(code: &str) -> bool {
    normalize_language_code(code).is_ok()
}

/// Check if two language codes represent the same language
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    match (normalize_language_code(code1), normalize_language_code(code2)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// English name of a language, for log messages
pub fn get_language_name(code: &str) -> Result<String> {
    let normalized = normalize_language_code(code)?;
    let lang = if normalized.len() == 2 {
        Language::from_639_1(&normalized)
    } else {
        Language::from_639_3(&normalized)
    }
    .ok_or_else(|| anyhow!("Failed to get language from code: {}", normalized))?;

    Ok(lang.to_name().to_string())
}
