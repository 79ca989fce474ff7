//! Assembly of identity records from raw registry documents.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::debug;

use crate::extract::affiliations::extract_affiliations;
use crate::extract::diagnostics::Diagnostics;
use crate::extract::document::RawDocument;
use crate::extract::roles::{RoleStandardizer, RoleVocabulary};
use crate::extract::works::extract_works;
use crate::extract::xrefs::extract_external_refs;
use crate::lexical::org::{OrgGrounder, OrganizationIndex};
use crate::names::clean_name;
use crate::records::IdentityRecord;
use crate::TARGET_EXTRACT;

/// Alternate names this long or longer are bibliography fragments, not
/// names.
const MAX_ALIAS_LENGTH: usize = 60;

/// Turns raw registry documents into identity records.
///
/// One extractor is shared across worker tasks. Each call gets its own
/// [`Diagnostics`], merged by the caller afterwards.
pub struct Extractor {
    orgs: OrgGrounder,
    roles: RoleStandardizer,
}

impl Extractor {
    pub fn new() -> Self {
        Extractor {
            orgs: OrgGrounder::disabled(),
            roles: RoleStandardizer::new(),
        }
    }

    /// Resolve organization names against `index` when an affiliation
    /// carries no canonical registry identifier.
    pub fn with_org_index(mut self, index: Arc<dyn OrganizationIndex>) -> Self {
        self.orgs = OrgGrounder::new(index);
        self
    }

    /// Consult `vocabulary` for role labels before the built-in table.
    pub fn with_role_vocabulary(mut self, vocabulary: Arc<dyn RoleVocabulary>) -> Self {
        self.roles = RoleStandardizer::with_vocabulary(vocabulary);
        self
    }

    /// Parse one JSONL line and extract its record. Malformed lines are
    /// counted and skipped.
    pub fn extract_line(&self, line: &str, diag: &mut Diagnostics) -> Option<IdentityRecord> {
        let doc: RawDocument = match serde_json::from_str(line) {
            Ok(doc) => doc,
            Err(error) => {
                debug!(target: TARGET_EXTRACT, %error, "malformed document line");
                diag.malformed_documents += 1;
                return None;
            }
        };
        self.extract(&doc, diag)
    }

    /// Extract an identity record from a parsed document. Returns `None`
    /// when the document has no identifier or no usable name.
    pub fn extract(&self, doc: &RawDocument, diag: &mut Diagnostics) -> Option<IdentityRecord> {
        let id = doc.id.trim();
        if id.is_empty() {
            diag.missing_id_documents += 1;
            return None;
        }

        let given = non_empty(doc.given_names.as_deref());
        let family = non_empty(doc.family_name.as_deref());
        let label_name = match (given, family) {
            (Some(given), Some(family)) => Some(format!("{given} {family}")),
            _ => None,
        };
        let credit_name = non_empty(doc.credit_name.as_deref());

        if credit_name.is_none() && label_name.is_none() {
            diag.nameless_documents += 1;
            return None;
        }

        let mut aliases: BTreeSet<String> = BTreeSet::new();
        let name = match credit_name {
            Some(credit) => {
                // The constructed name stays an alias of the chosen one.
                if let Some(label) = label_name {
                    aliases.insert(label);
                }
                Some(credit.to_string())
            }
            None => label_name,
        };
        let name = name.as_deref().map(clean_name);

        for raw in &doc.other_names {
            for part in raw.split(';') {
                let part = part.trim();
                if part.contains(' ') && part.chars().count() < MAX_ALIAS_LENGTH {
                    aliases.insert(clean_name(part));
                }
            }
        }
        if let Some(name) = &name {
            aliases.remove(name);
        }

        let (name, aliases) = reconcile_aliases(name, aliases);
        let Some(name) = name else {
            diag.nameless_documents += 1;
            return None;
        };

        let mut record = IdentityRecord::new(id.to_string(), name);
        record.aliases = aliases.into_iter().collect();

        let (xrefs, homepage) = extract_external_refs(doc, diag);
        record.xrefs = xrefs;
        record.homepage = homepage;
        record.affiliations = extract_affiliations(doc, &self.orgs, &self.roles, diag);
        record.works = extract_works(doc);
        record.emails = doc
            .emails
            .iter()
            .filter_map(|e| non_empty(Some(e)))
            .map(str::to_string)
            .collect();
        let mut keywords: Vec<String> = doc
            .keywords
            .iter()
            .filter_map(|k| non_empty(Some(k)))
            .map(str::to_string)
            .collect();
        keywords.sort();
        record.keywords = keywords;
        record.countries = extract_countries(doc);
        record.locale = non_empty(doc.locale.as_deref()).map(str::to_string);
        Some(record)
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Extractor::new()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Drop single-character names, then promote the longest alias when no
/// usable primary name survived.
fn reconcile_aliases(
    name: Option<String>,
    mut aliases: BTreeSet<String>,
) -> (Option<String>, BTreeSet<String>) {
    aliases.retain(|a| a.chars().count() > 1);
    let name = name.filter(|n| n.chars().count() > 1);
    if name.is_some() {
        return (name, aliases);
    }
    match aliases.iter().max_by_key(|a| a.chars().count()).cloned() {
        Some(longest) => {
            aliases.remove(&longest);
            (Some(longest), aliases)
        }
        None => (None, aliases),
    }
}

fn extract_countries(doc: &RawDocument) -> Vec<String> {
    let mut countries = Vec::new();
    for raw in &doc.countries {
        let value = raw.trim().to_uppercase();
        if value.is_empty() {
            continue;
        }
        // XK is a proposed code for Kosovo, not a valid alpha-2 code.
        if value == "XK" {
            continue;
        }
        let two_letter = regex::Regex::new(r"^[A-Z]{2}$")
            .ok()
            .map_or(false, |re| re.is_match(&value));
        if !two_letter {
            debug!(
                target: TARGET_EXTRACT,
                document = %doc.id,
                code = %value,
                "invalid 2 letter country code"
            );
            continue;
        }
        countries.push(value);
    }
    countries
}
