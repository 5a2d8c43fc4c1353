//! Static language table for the transcription language selector
//!
//! The set of offered languages is fixed configuration. Each language maps
//! to the code sent to the backend, a display name, and the flag glyph shown
//! next to it. `Auto` uses the empty code and lets the backend detect the
//! language itself.

use serde::{Deserialize, Serialize};

/// A language offered by the selector
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    /// Let the backend detect the language
    #[default]
    Auto,
    Swedish,
    English,
    Finnish,
    Norwegian,
    Danish,
    Spanish,
    French,
    German,
    Italian,
    Japanese,
    Korean,
    Chinese,
    Russian,
}

impl Language {
    /// Every selectable language, in display order
    pub const ALL: [Language; 14] = [
        Language::Auto,
        Language::Swedish,
        Language::English,
        Language::Finnish,
        Language::Norwegian,
        Language::Danish,
        Language::Spanish,
        Language::French,
        Language::German,
        Language::Italian,
        Language::Japanese,
        Language::Korean,
        Language::Chinese,
        Language::Russian,
    ];

    /// The code sent to the backend (empty for auto-detect)
    pub fn code(&self) -> &'static str {
        match self {
            Language::Auto => "",
            Language::Swedish => "sv",
            Language::English => "en",
            Language::Finnish => "fi",
            Language::Norwegian => "no",
            Language::Danish => "da",
            Language::Spanish => "es",
            Language::French => "fr",
            Language::German => "de",
            Language::Italian => "it",
            Language::Japanese => "ja",
            Language::Korean => "ko",
            Language::Chinese => "zh",
            Language::Russian => "ru",
        }
    }

    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::Auto => "Auto Detect",
            Language::Swedish => "Swedish",
            Language::English => "English",
            Language::Finnish => "Finnish",
            Language::Norwegian => "Norwegian",
            Language::Danish => "Danish",
            Language::Spanish => "Spanish",
            Language::French => "French",
            Language::German => "German",
            Language::Italian => "Italian",
            Language::Japanese => "Japanese",
            Language::Korean => "Korean",
            Language::Chinese => "Chinese",
            Language::Russian => "Russian",
        }
    }

    /// Flag glyph identifier, if the language has one
    pub fn flag(&self) -> Option<&'static str> {
        match self {
            Language::Auto => None,
            Language::Swedish => Some("se"),
            Language::English => Some("gb"),
            Language::Finnish => Some("fi"),
            Language::Norwegian => Some("no"),
            Language::Danish => Some("dk"),
            Language::Spanish => Some("es"),
            Language::French => Some("fr"),
            Language::German => Some("de"),
            Language::Italian => Some("it"),
            Language::Japanese => Some("jp"),
            Language::Korean => Some("kr"),
            Language::Chinese => Some("cn"),
            Language::Russian => Some("ru"),
        }
    }

    /// Look up a language by its backend code
    pub fn from_code(code: &str) -> Option<Language> {
        Language::ALL.iter().copied().find(|lang| lang.code() == code)
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_auto_detect() {
        let lang = Language::default();
        assert_eq!(lang, Language::Auto);
        assert_eq!(lang.code(), "");
        assert_eq!(lang.flag(), None);
        assert_eq!(lang.to_string(), "Auto Detect");
    }

    #[test]
    fn test_codes_round_trip() {
        for lang in Language::ALL {
            assert_eq!(Language::from_code(lang.code()), Some(lang));
        }
    }

    #[test]
    fn test_unknown_code_is_rejected() {
        assert_eq!(Language::from_code("xx"), None);
        assert_eq!(Language::from_code("swedish"), None);
    }

    #[test]
    fn test_flag_differs_from_code_where_needed() {
        assert_eq!(Language::Swedish.code(), "sv");
        assert_eq!(Language::Swedish.flag(), Some("se"));
        assert_eq!(Language::English.flag(), Some("gb"));
        assert_eq!(Language::Japanese.flag(), Some("jp"));
        assert_eq!(Language::Korean.flag(), Some("kr"));
        assert_eq!(Language::Chinese.flag(), Some("cn"));
    }

    #[test]
    fn test_every_language_but_auto_has_a_flag() {
        for lang in Language::ALL {
            if lang == Language::Auto {
                continue;
            }
            assert!(lang.flag().is_some(), "{} should have a flag", lang);
            assert!(!lang.code().is_empty());
        }
    }
}
