//! Derivation of index terms from identity records.

use std::collections::BTreeSet;

use crate::lexical::{Term, TermKind};
use crate::names::{name_to_synonyms, normalize_for_matching};
use crate::records::IdentityRecord;

/// Expand one record into its index terms: the primary name first, then
/// every alias and generated variant. Records whose name normalizes to
/// nothing produce no terms at all.
pub fn record_to_terms(record: &IdentityRecord, source: &str) -> Vec<Term> {
    let name = record.name.as_str();
    if name.is_empty() {
        return Vec::new();
    }
    let norm_name = normalize_for_matching(name);
    if norm_name.is_empty() {
        return Vec::new();
    }

    let mut terms = vec![Term {
        norm_text: norm_name,
        text: name.to_string(),
        record_id: record.id.clone(),
        entry_name: name.to_string(),
        kind: TermKind::Name,
        source: source.to_string(),
    }];

    let mut synonyms: BTreeSet<String> = BTreeSet::new();
    synonyms.extend(name_to_synonyms(name));
    for alias in &record.aliases {
        synonyms.insert(alias.clone());
        synonyms.extend(name_to_synonyms(alias));
    }
    synonyms.remove(name);

    for synonym in synonyms {
        let norm = normalize_for_matching(&synonym);
        if norm.is_empty() {
            continue;
        }
        terms.push(Term {
            norm_text: norm,
            text: synonym,
            record_id: record.id.clone(),
            entry_name: name.to_string(),
            kind: TermKind::Synonym,
            source: source.to_string(),
        });
    }
    terms
}
