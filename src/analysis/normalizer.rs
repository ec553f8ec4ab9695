//! Value normalization.
//!
//! A [`Normalizer`] canonicalizes a string so that trivially different
//! spellings of the same value compare equal: case is folded, diacritics are
//! stripped, separator characters are removed and sentence punctuation around
//! the value is trimmed. Punctuation inside a value (`adult(s)`, `C.elegans`)
//! is kept; the prefilters handle those. It runs on every value
//! after the prefilter, both when the index is built and when it is queried.
//!
//! # Examples
//!
//! ```
//! use vocab_lookup::analysis::normalizer::{DefaultNormalizer, Normalizer};
//!
//! let normalizer = DefaultNormalizer::new();
//! assert_eq!(normalizer.normalize("  Sub-Adulto "), "subadulto");
//! assert_eq!(normalizer.normalize("Émergé"), "emerge");
//! assert_eq!(normalizer.normalize("corridor And_dispersal"), "corridoranddispersal");
//! assert_eq!(normalizer.normalize("¿Adulto?"), "adulto");
//! ```

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Trait for normalizers that canonicalize values before indexing and matching.
///
/// Implementations must be pure: the same input always yields the same
/// output, since the result is used as a hash key on both sides of a lookup.
pub trait Normalizer: Send + Sync + std::fmt::Debug {
    /// Normalize the input value.
    fn normalize(&self, input: &str) -> String;

    /// Get the name of this normalizer.
    fn name(&self) -> &'static str;
}

/// The default normalizer.
///
/// # Behavior
///
/// - Decomposes the text (NFD) and drops combining marks, so `é` becomes `e`
/// - Lowercases every remaining character
/// - Removes whitespace, `-` and `_`, so `natural dispersal`, `natural-dispersal`
///   and `naturalDispersal` share one key
/// - Trims `.` `,` `;` `:` `!` `?` `¡` `¿` `…` from both ends, so `Adult.`
///   matches `Adult`
#[derive(Clone, Debug, Default)]
pub struct DefaultNormalizer;

impl DefaultNormalizer {
    /// Create a new default normalizer.
    pub fn new() -> Self {
        DefaultNormalizer
    }

    fn is_separator(c: char) -> bool {
        c.is_whitespace() || c == '-' || c == '_'
    }

    fn is_sentence_punctuation(c: char) -> bool {
        matches!(c, '.' | ',' | ';' | ':' | '!' | '?' | '¡' | '¿' | '…')
    }

    fn trim_punctuation(output: String) -> String {
        let trimmed = output.trim_matches(Self::is_sentence_punctuation);
        if trimmed.len() == output.len() {
            output
        } else {
            trimmed.to_string()
        }
    }
}

impl Normalizer for DefaultNormalizer {
    fn normalize(&self, input: &str) -> String {
        let mut output = String::with_capacity(input.len());

        // Fast path: nothing to decompose.
        if input.is_ascii() {
            for c in input.chars() {
                if !Self::is_separator(c) {
                    output.push(c.to_ascii_lowercase());
                }
            }
            return Self::trim_punctuation(output);
        }

        for c in input.nfd() {
            if is_combining_mark(c) || Self::is_separator(c) {
                continue;
            }
            output.extend(c.to_lowercase());
        }

        // Recompose whatever survived (e.g. Hangul syllables) so keys stay in NFC.
        Self::trim_punctuation(output.nfc().collect())
    }

    fn name(&self) -> &'static str {
        "default"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_folding() {
        let normalizer = DefaultNormalizer::new();
        assert_eq!(normalizer.normalize("ADULT"), "adult");
        assert_eq!(normalizer.normalize("Straße"), "straße");
    }

    #[test]
    fn test_diacritics_stripped() {
        let normalizer = DefaultNormalizer::new();
        assert_eq!(normalizer.normalize("Adulto jóven"), "adultojoven");
        // Decomposed input folds to the same key as composed input.
        assert_eq!(
            normalizer.normalize("Am\u{0065}\u{0301}lie"),
            normalizer.normalize("Am\u{00e9}lie")
        );
    }

    #[test]
    fn test_separators_removed() {
        let normalizer = DefaultNormalizer::new();
        assert_eq!(normalizer.normalize(" natural  dispersal\t"), "naturaldispersal");
        assert_eq!(normalizer.normalize("natural-dispersal"), "naturaldispersal");
        assert_eq!(normalizer.normalize("natural_dispersal"), "naturaldispersal");
        assert_eq!(normalizer.normalize("naturalDispersal"), "naturaldispersal");
    }

    #[test]
    fn test_sentence_punctuation_trimmed() {
        let normalizer = DefaultNormalizer::new();
        assert_eq!(normalizer.normalize("adult."), "adult");
        assert_eq!(normalizer.normalize("Adult,"), "adult");
        assert_eq!(normalizer.normalize(" adult ?! "), "adult");
        assert_eq!(normalizer.normalize("¡Adulto!"), "adulto");
        assert_eq!(normalizer.normalize("larva…"), "larva");
        assert_eq!(normalizer.normalize("..."), "");
    }

    #[test]
    fn test_inner_punctuation_kept() {
        let normalizer = DefaultNormalizer::new();
        assert_eq!(normalizer.normalize("1 adult(s)"), "1adult(s)");
        assert_eq!(normalizer.normalize("C.elegans."), "c.elegans");
    }

    #[test]
    fn test_empty_and_blank() {
        let normalizer = DefaultNormalizer::new();
        assert_eq!(normalizer.normalize(""), "");
        assert_eq!(normalizer.normalize("  - _ "), "");
    }

    #[test]
    fn test_normalizer_name() {
        assert_eq!(DefaultNormalizer::new().name(), "default");
    }
}
