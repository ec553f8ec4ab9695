//! Text analysis for vocabulary lookups.
//!
//! This module turns raw values into index keys: an optional, configurable
//! prefilter rewrites the value, then a normalizer canonicalizes it. The same
//! analysis runs when the index is built and when it is queried.

pub mod analyzer;
pub mod normalizer;
pub mod prefilter;
