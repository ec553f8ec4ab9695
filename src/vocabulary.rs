//! Vocabulary data model and export loading.
//!
//! A vocabulary export is parsed once into an immutable
//! [`VocabularySnapshot`](snapshot::VocabularySnapshot): one header plus the
//! concepts with their labels, hidden labels, parent keys and tags.

pub mod concept;
pub mod language;
pub mod loader;
#[cfg(feature = "remote")]
pub mod remote;
pub mod snapshot;
