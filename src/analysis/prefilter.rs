//! Prefilters that rewrite raw values before normalization.
//!
//! A prefilter is a pure `&str -> String` rewrite. The lookup engine holds at
//! most one effective prefilter and applies it to every label it indexes and
//! to every value it is asked to resolve, so both sides of a match see the
//! same rewrite. Several prefilters compose left to right with
//! [`Prefilter::and_then`] or [`PrefilterChain`].
//!
//! # Available Prefilters
//!
//! - [`remove_non_alphanumeric`] - drops every character that is not a letter or digit
//! - [`remove_numeric`] - drops every digit
//! - [`remove_non_letter`] - drops every character that is not a letter
//! - [`remove_numeric_prefix`] - drops a leading integer (`"1 adult"` → `"adult"`)
//! - [`remove_decimal_prefix`] - drops a leading signed decimal (`"-2.5 m"` → `"m"`)
//! - [`remove_parenthesis_suffix`] - drops a trailing parenthetical (`"adult(s)"` → `"adult"`)
//!
//! # Examples
//!
//! ```
//! use vocab_lookup::analysis::prefilter::{self, Prefilter};
//!
//! let prefilter = prefilter::remove_parenthesis_suffix()
//!     .and_then(prefilter::remove_numeric_prefix());
//!
//! assert_eq!(prefilter.apply("1 adult(s)"), "adult");
//! assert_eq!(prefilter.apply("Adult (estimate)"), "Adult");
//! ```

use std::borrow::Cow;
use std::fmt;
use std::sync::{Arc, LazyLock};

use clap::ValueEnum;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub mod pattern_replace;

use pattern_replace::PatternReplacePrefilter;

/// Trait for prefilters that rewrite a raw value before normalization.
///
/// Implementations must be total and side-effect free. Returning
/// [`Cow::Borrowed`] signals that the input was left untouched.
pub trait Prefilter: Send + Sync + fmt::Debug {
    /// Apply this prefilter to the input value.
    fn apply<'a>(&self, input: &'a str) -> Cow<'a, str>;

    /// Get the name of this prefilter.
    fn name(&self) -> &'static str;

    /// Compose this prefilter with `next`: apply `self`, then `next`.
    fn and_then<P>(self, next: P) -> PrefilterChain
    where
        Self: Sized + 'static,
        P: Prefilter + 'static,
    {
        PrefilterChain::new()
            .add_prefilter(Arc::new(self))
            .add_prefilter(Arc::new(next))
    }
}

impl<P: Prefilter + ?Sized> Prefilter for Arc<P> {
    fn apply<'a>(&self, input: &'a str) -> Cow<'a, str> {
        (**self).apply(input)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// An ordered composition of prefilters applied left to right.
#[derive(Clone, Debug, Default)]
pub struct PrefilterChain {
    prefilters: Vec<Arc<dyn Prefilter>>,
}

impl PrefilterChain {
    /// Create an empty chain. An empty chain leaves every value unchanged.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a prefilter; it runs after every prefilter already in the chain.
    pub fn add_prefilter(mut self, prefilter: Arc<dyn Prefilter>) -> Self {
        self.prefilters.push(prefilter);
        self
    }

    /// Get the prefilters of this chain in application order.
    pub fn prefilters(&self) -> &[Arc<dyn Prefilter>] {
        &self.prefilters
    }

    pub fn is_empty(&self) -> bool {
        self.prefilters.is_empty()
    }

    pub fn len(&self) -> usize {
        self.prefilters.len()
    }
}

impl Prefilter for PrefilterChain {
    fn apply<'a>(&self, input: &'a str) -> Cow<'a, str> {
        let mut current = Cow::Borrowed(input);
        for prefilter in &self.prefilters {
            current = match current {
                Cow::Borrowed(text) => prefilter.apply(text),
                Cow::Owned(text) => {
                    let rewritten = match prefilter.apply(&text) {
                        Cow::Borrowed(_) => None,
                        Cow::Owned(rewritten) => Some(rewritten),
                    };
                    Cow::Owned(rewritten.unwrap_or(text))
                }
            };
        }
        current
    }

    fn name(&self) -> &'static str {
        "chain"
    }
}

/// A prefilter backed by a closure.
///
/// # Examples
///
/// ```
/// use vocab_lookup::analysis::prefilter::{FnPrefilter, Prefilter};
///
/// let prefilter = FnPrefilter::new("strip_question_marks", |value: &str| value.replace('?', ""));
/// assert_eq!(prefilter.apply("adult?"), "adult");
/// ```
pub struct FnPrefilter<F> {
    name: &'static str,
    rewrite: F,
}

impl<F> FnPrefilter<F>
where
    F: Fn(&str) -> String + Send + Sync,
{
    pub fn new(name: &'static str, rewrite: F) -> Self {
        Self { name, rewrite }
    }
}

impl<F> fmt::Debug for FnPrefilter<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnPrefilter").field("name", &self.name).finish()
    }
}

impl<F> Prefilter for FnPrefilter<F>
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn apply<'a>(&self, input: &'a str) -> Cow<'a, str> {
        Cow::Owned((self.rewrite)(input))
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

static NON_ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\p{L}\p{N}]+").expect("valid regex"));
static NUMERIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\p{N}+").expect("valid regex"));
static NON_LETTER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\P{L}+").expect("valid regex"));
static NUMERIC_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\d+\s*").expect("valid regex"));
static DECIMAL_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[+-]?\d+(?:[.,]\d+)?\s*").expect("valid regex"));
static PARENTHESIS_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\([^()]*\)\s*$").expect("valid regex"));

/// Drops every character that is neither a letter nor a digit.
pub fn remove_non_alphanumeric() -> PatternReplacePrefilter {
    PatternReplacePrefilter::from_regex(NON_ALPHANUMERIC.clone(), "", "remove_non_alphanumeric")
}

/// Drops every digit.
pub fn remove_numeric() -> PatternReplacePrefilter {
    PatternReplacePrefilter::from_regex(NUMERIC.clone(), "", "remove_numeric")
}

/// Drops every character that is not a letter.
pub fn remove_non_letter() -> PatternReplacePrefilter {
    PatternReplacePrefilter::from_regex(NON_LETTER.clone(), "", "remove_non_letter")
}

/// Drops a leading unsigned integer and the whitespace around it.
pub fn remove_numeric_prefix() -> PatternReplacePrefilter {
    PatternReplacePrefilter::from_regex(NUMERIC_PREFIX.clone(), "", "remove_numeric_prefix")
}

/// Drops a leading signed integer or decimal (`.` or `,` separator).
pub fn remove_decimal_prefix() -> PatternReplacePrefilter {
    PatternReplacePrefilter::from_regex(DECIMAL_PREFIX.clone(), "", "remove_decimal_prefix")
}

/// Drops a trailing parenthetical group and the whitespace before it.
pub fn remove_parenthesis_suffix() -> PatternReplacePrefilter {
    PatternReplacePrefilter::from_regex(
        PARENTHESIS_SUFFIX.clone(),
        "",
        "remove_parenthesis_suffix",
    )
}

/// The predefined prefilters, selectable from configuration files and the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum PrefilterKind {
    RemoveNonAlphanumeric,
    RemoveNumeric,
    RemoveNonLetter,
    RemoveNumericPrefix,
    RemoveDecimalPrefix,
    RemoveParenthesisSuffix,
}

impl PrefilterKind {
    /// Instantiate the prefilter this kind names.
    pub fn build(self) -> Arc<dyn Prefilter> {
        Arc::new(match self {
            PrefilterKind::RemoveNonAlphanumeric => remove_non_alphanumeric(),
            PrefilterKind::RemoveNumeric => remove_numeric(),
            PrefilterKind::RemoveNonLetter => remove_non_letter(),
            PrefilterKind::RemoveNumericPrefix => remove_numeric_prefix(),
            PrefilterKind::RemoveDecimalPrefix => remove_decimal_prefix(),
            PrefilterKind::RemoveParenthesisSuffix => remove_parenthesis_suffix(),
        })
    }

    /// Compose `kinds` left to right into one prefilter.
    ///
    /// Returns `None` for an empty slice and the bare prefilter for a single kind.
    pub fn compose(kinds: &[PrefilterKind]) -> Option<Arc<dyn Prefilter>> {
        match kinds {
            [] => None,
            [kind] => Some(kind.build()),
            _ => Some(Arc::new(
                kinds
                    .iter()
                    .fold(PrefilterChain::new(), |chain, kind| {
                        chain.add_prefilter(kind.build())
                    }),
            )),
        }
    }
}
