//! Extraction of PubMed work identifiers.
//!
//! Work claims arrive in wildly inconsistent shapes: bare numbers,
//! PubMed URLs through assorted mirrors and proxies, and prefixed
//! strings like "PMID: 12345". Everything that can be reduced to a
//! bare numeric identifier is kept; the rest is logged and dropped.

use std::collections::BTreeSet;

use tracing::debug;

use crate::extract::document::RawDocument;
use crate::TARGET_EXTRACT;

/// Known decorations in front of a PubMed identifier, checked in order.
const PUBMED_PREFIXES: &[&str] = &[
    "http://www.ncbi.nlm.nih.gov/pubmed/",
    "https://www.ncbi.nlm.nih.gov/pubmed/",
    "https://www-ncbi-nlm-nih-gov.proxy.bib.ucl.ac.be:2443/pubmed/",
    "http://europepmc.org/abstract/med/",
    "https://pubmed.ncbi.nlm.nih.gov/",
    "www.ncbi.nlm.nih.gov/pubmed/",
    "PMID: ",
    "PMID:",
    "PubMed PMID: ",
    "MEDLINE:",
    "[PMID: ",
    "PubMed:",
    "PubMed ID: ",
    "ncbi.nlm.nih.gov/pubmed/",
    "PMid:",
    "PubMed ",
    "PMID",
    "PMID ",
];

/// Reduce a PubMed work claim to its bare numeric identifier, if the
/// shape is one we recognize.
pub fn standardize_pubmed(value: &str) -> Option<String> {
    let value = value.trim().trim_matches('.').trim_end_matches('/').trim();
    if value.is_empty() {
        return None;
    }
    if value.chars().all(|c| c.is_ascii_digit()) {
        return Some(value.to_string());
    }
    for prefix in PUBMED_PREFIXES {
        if let Some(rest) = value.strip_prefix(prefix) {
            let rest = rest.trim();
            let identifier = rest.split_whitespace().next().unwrap_or(rest);
            return Some(identifier.to_string());
        }
    }
    None
}

/// Collect the document's PubMed work identifiers, deduplicated and in
/// numeric order.
pub fn extract_works(doc: &RawDocument) -> Vec<String> {
    let mut works = BTreeSet::new();
    for work in &doc.works {
        if work.id_type != "pmid" {
            continue;
        }
        match standardize_pubmed(&work.value) {
            Some(identifier) if identifier.chars().all(|c| c.is_ascii_digit()) => {
                works.insert(identifier);
            }
            _ => {
                debug!(
                    target: TARGET_EXTRACT,
                    document = %doc.id,
                    value = %work.value,
                    "unstandardized PubMed identifier"
                );
            }
        }
    }
    let mut works: Vec<String> = works.into_iter().collect();
    works.sort_by_key(|w| (w.len(), w.clone()));
    works
}
