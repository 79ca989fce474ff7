//! Extraction diagnostics: counters carried by each worker and merged
//! into one view after the run.
//!
//! Nothing here is global. A worker owns its `Diagnostics` while
//! extracting and the pipeline folds them together afterwards, so
//! the counts are deterministic regardless of worker scheduling.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Count plus the first-seen display form and one example occurrence.
#[derive(Debug, Clone, Default)]
pub struct KeyedCount {
    pub count: u64,
    /// Key as written in the source, before normalization.
    pub display: String,
    /// One example value or document id for context.
    pub example: String,
}

#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    /// External identifier types with no allow-list mapping.
    pub unmapped_id_types: HashMap<String, KeyedCount>,
    /// Labels of researcher URLs no pattern recognized.
    pub unknown_url_names: HashMap<String, KeyedCount>,
    /// Organization registry sources outside the known set.
    pub unknown_org_sources: HashMap<String, KeyedCount>,
    /// Organization names the grounder could not resolve.
    pub unresolved_orgs: HashMap<String, KeyedCount>,
    /// Role texts that survived standardization as raw text.
    pub raw_roles: HashMap<String, KeyedCount>,
    /// How many identifiers were stored, per registry prefix.
    pub typed_refs: HashMap<String, u64>,
    pub nameless_documents: u64,
    pub missing_id_documents: u64,
    pub malformed_documents: u64,
}

impl Diagnostics {
    pub fn record_unmapped_id_type(&mut self, key: String, display: &str, example: &str) {
        bump(&mut self.unmapped_id_types, key, display, example);
    }

    pub fn record_unknown_url_name(&mut self, key: String, display: &str, example: &str) {
        bump(&mut self.unknown_url_names, key, display, example);
    }

    pub fn record_unknown_org_source(&mut self, key: String, display: &str, example: &str) {
        bump(&mut self.unknown_org_sources, key, display, example);
    }

    pub fn record_unresolved_org(&mut self, key: String, example: &str) {
        let display = key.clone();
        bump(&mut self.unresolved_orgs, key, &display, example);
    }

    pub fn record_raw_role(&mut self, key: String, example: &str) {
        let display = key.clone();
        bump(&mut self.raw_roles, key, &display, example);
    }

    pub fn record_typed_ref(&mut self, prefix: &str) {
        *self.typed_refs.entry(prefix.to_string()).or_insert(0) += 1;
    }

    /// Fold another worker's diagnostics into this one. Counts add;
    /// display and example keep the first-merged occurrence.
    pub fn merge(&mut self, other: Diagnostics) {
        merge_keyed(&mut self.unmapped_id_types, other.unmapped_id_types);
        merge_keyed(&mut self.unknown_url_names, other.unknown_url_names);
        merge_keyed(&mut self.unknown_org_sources, other.unknown_org_sources);
        merge_keyed(&mut self.unresolved_orgs, other.unresolved_orgs);
        merge_keyed(&mut self.raw_roles, other.raw_roles);
        for (prefix, count) in other.typed_refs {
            *self.typed_refs.entry(prefix).or_insert(0) += count;
        }
        self.nameless_documents += other.nameless_documents;
        self.missing_id_documents += other.missing_id_documents;
        self.malformed_documents += other.malformed_documents;
    }
}

fn bump(map: &mut HashMap<String, KeyedCount>, key: String, display: &str, example: &str) {
    let entry = map.entry(key).or_insert_with(|| KeyedCount {
        count: 0,
        display: display.to_string(),
        example: example.to_string(),
    });
    entry.count += 1;
}

fn merge_keyed(into: &mut HashMap<String, KeyedCount>, from: HashMap<String, KeyedCount>) {
    for (key, value) in from {
        match into.entry(key) {
            Entry::Occupied(mut occupied) => occupied.get_mut().count += value.count,
            Entry::Vacant(vacant) => {
                vacant.insert(value);
            }
        }
    }
}

/// Rank a keyed counter by descending count, ties broken by key, for
/// deterministic reporting.
pub fn ranked(map: &HashMap<String, KeyedCount>) -> Vec<(&String, &KeyedCount)> {
    let mut rows: Vec<_> = map.iter().collect();
    rows.sort_by(|a, b| b.1.count.cmp(&a.1.count).then_with(|| a.0.cmp(b.0)));
    rows
}
