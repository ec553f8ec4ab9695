//! Vocabulary lookup engine.
//!
//! The engine loads a vocabulary snapshot, builds its lookup indices once and
//! then resolves free-text values to concepts:
//!
//! - [`index`] - the by-name, by-label, by-hidden-label and by-key indices
//! - [`resolver`] - priority order and label disambiguation
//! - [`result`] - ancestor-chain assembly
//! - [`engine`] - the [`VocabularyLookup`](engine::VocabularyLookup) handle and its builder
//! - [`config`] - serializable engine settings

pub mod config;
pub mod engine;
pub mod index;
pub mod resolver;
pub mod result;
