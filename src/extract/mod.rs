//! Extraction of identity records from raw registry documents.

pub mod affiliations;
pub mod diagnostics;
pub mod document;
pub mod extractor;
pub mod roles;
pub mod works;
pub mod xrefs;

pub use diagnostics::{ranked, Diagnostics, KeyedCount};
pub use document::RawDocument;
pub use extractor::Extractor;
pub use roles::{RoleStandardizer, RoleVocabulary};
