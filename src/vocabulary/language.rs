//! Supported label languages.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, VocabError};

/// Closed set of locales a label can be written in.
///
/// [`Language::English`] is the fallback used to break label ambiguities
/// when the caller's context language does not settle them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Language {
    Arabic,
    Basque,
    Catalan,
    ChineseSimplified,
    ChineseTraditional,
    Czech,
    Danish,
    Dutch,
    #[default]
    English,
    Estonian,
    Finnish,
    French,
    Galician,
    German,
    Greek,
    Hebrew,
    Hungarian,
    Indonesian,
    Italian,
    Japanese,
    Korean,
    Norwegian,
    Polish,
    Portuguese,
    Russian,
    Spanish,
    Swedish,
    Turkish,
    Ukrainian,
    Vietnamese,
}

impl Language {
    /// Every supported language, in declaration order.
    pub const ALL: [Language; 30] = [
        Language::Arabic,
        Language::Basque,
        Language::Catalan,
        Language::ChineseSimplified,
        Language::ChineseTraditional,
        Language::Czech,
        Language::Danish,
        Language::Dutch,
        Language::English,
        Language::Estonian,
        Language::Finnish,
        Language::French,
        Language::Galician,
        Language::German,
        Language::Greek,
        Language::Hebrew,
        Language::Hungarian,
        Language::Indonesian,
        Language::Italian,
        Language::Japanese,
        Language::Korean,
        Language::Norwegian,
        Language::Polish,
        Language::Portuguese,
        Language::Russian,
        Language::Spanish,
        Language::Swedish,
        Language::Turkish,
        Language::Ukrainian,
        Language::Vietnamese,
    ];

    /// The canonical locale code written to and read from export documents.
    pub fn locale(self) -> &'static str {
        match self {
            Language::Arabic => "ar",
            Language::Basque => "eu",
            Language::Catalan => "ca",
            Language::ChineseSimplified => "zh",
            Language::ChineseTraditional => "zh-TW",
            Language::Czech => "cs",
            Language::Danish => "da",
            Language::Dutch => "nl",
            Language::English => "en",
            Language::Estonian => "et",
            Language::Finnish => "fi",
            Language::French => "fr",
            Language::Galician => "gl",
            Language::German => "de",
            Language::Greek => "el",
            Language::Hebrew => "he",
            Language::Hungarian => "hu",
            Language::Indonesian => "id",
            Language::Italian => "it",
            Language::Japanese => "ja",
            Language::Korean => "ko",
            Language::Norwegian => "no",
            Language::Polish => "pl",
            Language::Portuguese => "pt",
            Language::Russian => "ru",
            Language::Spanish => "es",
            Language::Swedish => "sv",
            Language::Turkish => "tr",
            Language::Ukrainian => "uk",
            Language::Vietnamese => "vi",
        }
    }

    /// Parse a locale code such as `en`, `es-ES`, `pt_BR` or `zh-Hant`.
    ///
    /// Matching is case-insensitive. A region-qualified code falls back to its
    /// base language unless the region selects a distinct variant.
    pub fn from_locale(code: &str) -> Option<Language> {
        let code = code.trim().replace('_', "-").to_ascii_lowercase();
        let (base, region) = match code.split_once('-') {
            Some((base, region)) => (base, Some(region)),
            None => (code.as_str(), None),
        };

        if base == "zh" {
            return Some(match region {
                Some("tw" | "hk" | "mo" | "hant") => Language::ChineseTraditional,
                _ => Language::ChineseSimplified,
            });
        }

        let language = match base {
            "ar" => Language::Arabic,
            "eu" => Language::Basque,
            "ca" => Language::Catalan,
            "cs" => Language::Czech,
            "da" => Language::Danish,
            "nl" => Language::Dutch,
            "en" => Language::English,
            "et" => Language::Estonian,
            "fi" => Language::Finnish,
            "fr" => Language::French,
            "gl" => Language::Galician,
            "de" => Language::German,
            "el" => Language::Greek,
            "he" | "iw" => Language::Hebrew,
            "hu" => Language::Hungarian,
            "id" => Language::Indonesian,
            "it" => Language::Italian,
            "ja" => Language::Japanese,
            "ko" => Language::Korean,
            "no" | "nb" | "nn" => Language::Norwegian,
            "pl" => Language::Polish,
            "pt" => Language::Portuguese,
            "ru" => Language::Russian,
            "es" => Language::Spanish,
            "sv" => Language::Swedish,
            "tr" => Language::Turkish,
            "uk" => Language::Ukrainian,
            "vi" => Language::Vietnamese,
            _ => return None,
        };
        Some(language)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.locale())
    }
}

impl FromStr for Language {
    type Err = VocabError;

    fn from_str(s: &str) -> Result<Self> {
        Language::from_locale(s)
            .ok_or_else(|| VocabError::language(format!("unsupported language code '{s}'")))
    }
}

impl Serialize for Language {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.locale())
    }
}

impl<'de> Deserialize<'de> for Language {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Language::from_locale(&code).ok_or_else(|| {
            serde::de::Error::custom(format!("unsupported language code '{code}'"))
        })
    }
}
