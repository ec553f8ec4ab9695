//! # vocab-lookup
//!
//! Resolves free-text values such as `"1 adult(s)"` or `"subimago"` to the
//! concepts of a controlled vocabulary.
//!
//! ## Features
//!
//! - Loads a vocabulary export (JSON) into an immutable in-memory snapshot
//! - Indexes concept names, labels, alternative and misapplied labels, and
//!   hidden labels after case, accent and separator folding
//! - Composable prefilters applied alike to indexed labels and queries
//! - Language-aware disambiguation of labels shared by several concepts
//! - Ancestor chains and tags on every match
//! - Optional download of the latest released export (`remote` feature)

pub mod analysis;
pub mod cli;
pub mod error;
pub mod lookup;
pub mod vocabulary;

pub mod prelude {
    pub use crate::analysis::prefilter::{Prefilter, PrefilterKind};
    pub use crate::error::{Result, VocabError};
    pub use crate::lookup::config::LookupConfig;
    pub use crate::lookup::engine::{SnapshotSource, VocabularyLookup, VocabularyLookupBuilder};
    pub use crate::lookup::resolver::MatchKind;
    pub use crate::lookup::result::LookupResult;
    pub use crate::vocabulary::concept::{Concept, ConceptKey};
    pub use crate::vocabulary::language::Language;
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
