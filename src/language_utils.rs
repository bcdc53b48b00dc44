use anyhow::{anyhow, Result};
use isolang::Language;

/// Language utilities for segment language tags
///
/// Tags are an ISO 639-1 base optionally followed by a region or variant,
/// e.g. `en`, `pt-BR`, `en-uk`. DeepL names languages slightly differently,
/// so the mapping to its codes lives here as well.

/// Lower-cased base language of a tag (`"pt-BR"` -> `"pt"`)
pub fn base_language(tag: &str) -> String {
    tag.trim()
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

/// Validate a tag whose base is an ISO 639-1 code
pub fn validate_language_code(tag: &str) -> Result<Language> {
    let normalized = tag.trim().to_lowercase();
    let mut parts = normalized.split(['-', '_']);
    let base = parts.next().unwrap_or_default();

    if base.len() != 2 {
        return Err(anyhow!("Invalid language code: {}", tag));
    }
    if parts.any(|p| p.is_empty()) {
        return Err(anyhow!("Invalid language code: {}", tag));
    }

    Language::from_639_1(base).ok_or_else(|| anyhow!("Invalid language code: {}", tag))
}

/// Source language code as DeepL expects it (`"en-us"` -> `"EN"`)
pub fn deepl_source_language(tag: &str) -> String {
    base_language(tag).to_uppercase()
}

/// Target language code as DeepL expects it.
///
/// English and Portuguese need a regional variant on the target side.
pub fn deepl_target_language(tag: &str) -> String {
    let normalized = tag.trim().to_lowercase().replace('_', "-");
    match normalized.as_str() {
        "pt" | "pt-pt" => "PT-PT".to_string(),
        "pt-br" => "PT-BR".to_string(),
        "en" | "en-us" => "EN-US".to_string(),
        "en-uk" | "en-gb" => "EN-GB".to_string(),
        _ => deepl_source_language(&normalized),
    }
}

/// Get the language name from a tag
pub fn get_language_name(tag: &str) -> Result<String> {
    let lang = validate_language_code(tag)?;
    Ok(lang.to_name().to_string())
}
