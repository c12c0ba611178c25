use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for the `lang` cell attribute
///
/// This module holds the set of languages a build produces variants for,
/// parses the comma-separated `lang` attribute of cells and validates
/// configured codes against ISO 639-1.
/// Languages produced when no configuration overrides them
pub const DEFAULT_LANGUAGES: &[&str] = &["en", "fr"];

/// Separator between codes in a `lang` attribute
pub const LANG_SEPARATOR: char = ',';

/// Ordered, duplicate-free set of supported language codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportedLanguages {
    codes: Vec<String>,
}

impl SupportedLanguages {
    /// Build the set from a list of codes, keeping the first occurrence of duplicates
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for code in codes {
            let code = code.into();
            if !unique.contains(&code) {
                unique.push(code);
            }
        }
        Self { codes: unique }
    }

    /// Check whether a code belongs to the set
    pub fn contains(&self, code: &str) -> bool {
        self.codes.iter().any(|c| c == code)
    }

    /// Iterate over the codes in configuration order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.codes.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl Default for SupportedLanguages {
    fn default() -> Self {
        Self::new(DEFAULT_LANGUAGES.iter().copied())
    }
}

/// Split a `lang` attribute into its codes
///
/// Codes are matched exactly as authored, so no trimming or case folding
/// happens here: `"en, fr"` yields `"en"` and `" fr"`.
pub fn parse_lang_list(raw: &str) -> Vec<&str> {
    raw.split(LANG_SEPARATOR).collect()
}

/// Validate that a code is a lowercase ISO 639-1 (2-letter) code
pub fn validate_language_code(code: &str) -> Result<()> {
    if code.len() != 2 || code != code.to_lowercase() {
        return Err(anyhow!("Invalid language code: {:?} (expected a lowercase ISO 639-1 code)", code));
    }

    if Language::from_639_1(code).is_none() {
        return Err(anyhow!("Invalid language code: {:?}", code));
    }

    Ok(())
}

/// Get the English language name from an ISO 639-1 code
pub fn get_language_name(code: &str) -> Result<String> {
    let lang = Language::from_639_1(code)
        .ok_or_else(|| anyhow!("Failed to get language from code: {}", code))?;

    Ok(lang.to_name().to_string())
}
