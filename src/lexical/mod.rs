//! Lexical index: searchable terms derived from identity records.

pub mod builder;
pub mod grounder;
pub mod org;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use builder::record_to_terms;
pub use grounder::{Grounder, Match};
pub use org::{OrgGrounder, OrgMatch, OrganizationIndex};

/// How a term relates to the identity it names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TermKind {
    /// The record's primary name, as written.
    Name,
    /// An alias or a generated variant of a name.
    Synonym,
}

impl TermKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TermKind::Name => "name",
            TermKind::Synonym => "synonym",
        }
    }
}

impl fmt::Display for TermKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One searchable term pointing back at an identity record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Term {
    /// Normalized lookup key.
    pub norm_text: String,
    /// The term as written.
    pub text: String,
    /// Identifier of the record this term points at.
    pub record_id: String,
    /// Primary name of the record, for display.
    pub entry_name: String,
    pub kind: TermKind,
    /// Registry the record came from.
    pub source: String,
}

/// Which slice of the index a query runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Partition {
    /// Every indexed record.
    #[default]
    Complete,
    /// Only records carrying external evidence.
    HighQuality,
}
