//! Extraction of organizational affiliations.
//!
//! Each raw affiliation carries an organization name, zero or more
//! registry identifiers, an optional role, and optional start and end
//! dates. Organizations without an explicit canonical registry
//! identifier are offered to the organization grounder by name.

use std::collections::BTreeMap;

use tracing::debug;

use crate::extract::diagnostics::Diagnostics;
use crate::extract::document::{RawAffiliation, RawDocument};
use crate::extract::roles::RoleStandardizer;
use crate::lexical::org::OrgGrounder;
use crate::records::{Affiliation, AffiliationKind, PartialDate};
use crate::TARGET_EXTRACT;

/// Canonical registry identifiers sometimes arrive as full URLs.
const ROR_URL_PREFIX: &str = "https://ror.org/";
const FUNDREF_URL_PREFIX: &str = "http://dx.doi.org/10.13039/";

/// Collect the document's affiliations of all kinds, in source order
/// within each kind.
pub fn extract_affiliations(
    doc: &RawDocument,
    orgs: &OrgGrounder,
    roles: &RoleStandardizer,
    diag: &mut Diagnostics,
) -> Vec<Affiliation> {
    let mut affiliations = Vec::new();
    for (kind, entries) in [
        (AffiliationKind::Employment, &doc.employments),
        (AffiliationKind::Education, &doc.educations),
        (AffiliationKind::Membership, &doc.memberships),
    ] {
        for entry in entries {
            if let Some(affiliation) = build_affiliation(kind, entry, doc, orgs, roles, diag) {
                affiliations.push(affiliation);
            }
        }
    }
    affiliations
}

fn build_affiliation(
    kind: AffiliationKind,
    entry: &RawAffiliation,
    doc: &RawDocument,
    orgs: &OrgGrounder,
    roles: &RoleStandardizer,
    diag: &mut Diagnostics,
) -> Option<Affiliation> {
    let organization = entry.organization.as_deref()?.trim();
    if organization.is_empty() {
        return None;
    }

    let mut org_ref = None;
    let mut org_xrefs = BTreeMap::new();
    for org_id in &entry.org_ids {
        let value = org_id.value.trim();
        if value.is_empty() {
            continue;
        }
        match org_id.source.as_str() {
            "ROR" => {
                org_ref =
                    Some(value.strip_prefix(ROR_URL_PREFIX).unwrap_or(value).to_string());
            }
            "RINGGOLD" | "GRID" | "LEI" => {
                org_xrefs.insert(org_id.source.to_lowercase(), value.to_string());
            }
            "FUNDREF" => {
                org_xrefs.insert(
                    "funderregistry".to_string(),
                    value
                        .strip_prefix(FUNDREF_URL_PREFIX)
                        .unwrap_or(value)
                        .to_string(),
                );
            }
            source => {
                debug!(
                    target: TARGET_EXTRACT,
                    document = %doc.id,
                    source,
                    value,
                    "unknown organization registry"
                );
                diag.record_unknown_org_source(source.to_lowercase(), source, value);
            }
        }
    }

    if org_ref.is_none() {
        match orgs.resolve(organization) {
            Some(matched) => org_ref = Some(matched.id),
            None => diag.record_unresolved_org(organization.to_string(), &doc.id),
        }
    }

    let role = entry.role.as_deref().and_then(|text| {
        let role = roles.standardize(text)?;
        if !role.is_standardized() {
            diag.record_raw_role(role.label().to_string(), &doc.id);
        }
        Some(role)
    });

    Some(Affiliation {
        kind,
        organization: organization.to_string(),
        org_ref,
        org_xrefs,
        role,
        start: entry
            .start
            .and_then(|d| PartialDate::from_parts(d.year, d.month, d.day)),
        end: entry
            .end
            .and_then(|d| PartialDate::from_parts(d.year, d.month, d.day)),
    })
}
