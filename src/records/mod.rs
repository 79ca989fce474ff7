//! Identity records: the unit of extraction, sinking, and indexing.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// What kind of organizational relationship an affiliation describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AffiliationKind {
    Employment,
    Education,
    Membership,
}

impl fmt::Display for AffiliationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AffiliationKind::Employment => write!(f, "employment"),
            AffiliationKind::Education => write!(f, "education"),
            AffiliationKind::Membership => write!(f, "membership"),
        }
    }
}

/// A date with a mandatory year and optional month and day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialDate {
    pub year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<u32>,
}

impl PartialDate {
    /// Build a date from raw parts. A missing year drops the whole date.
    /// Out-of-range months and days are dropped, and a day without a
    /// month is dropped.
    pub fn from_parts(year: Option<i32>, month: Option<u32>, day: Option<u32>) -> Option<Self> {
        let year = year?;
        let month = month.filter(|m| (1..=12).contains(m));
        let day = match month {
            Some(_) => day.filter(|d| (1..=31).contains(d)),
            None => None,
        };
        Some(PartialDate { year, month, day })
    }
}

/// A held position, either standardized against the role tables or
/// carried through as raw text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "label", rename_all = "lowercase")]
pub enum Role {
    Standardized(String),
    Raw(String),
}

impl Role {
    pub fn label(&self) -> &str {
        match self {
            Role::Standardized(label) | Role::Raw(label) => label,
        }
    }

    pub fn is_standardized(&self) -> bool {
        matches!(self, Role::Standardized(_))
    }
}

/// One organizational affiliation of an identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Affiliation {
    pub kind: AffiliationKind,
    /// Organization name as written in the source document.
    pub organization: String,
    /// Resolved identifier in the canonical organization registry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_ref: Option<String>,
    /// Identifiers in other organization registries, keyed by registry.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub org_xrefs: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<PartialDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<PartialDate>,
}

/// One extracted identity.
///
/// Quality is never stored on the record; it is recomputed from the
/// evidence fields whenever a partition decision is needed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityRecord {
    /// Stable opaque identifier from the source registry.
    pub id: String,
    /// Cleaned canonical name. Extraction never emits a record without one.
    pub name: String,
    /// Alternative names, disjoint from `name`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub affiliations: Vec<Affiliation>,
    /// Typed external identifiers, keyed by registry prefix.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub xrefs: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    /// PubMed identifiers of authored works.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub works: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub emails: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    /// Two-letter uppercase country codes, in document order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub countries: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

impl IdentityRecord {
    pub fn new(id: String, name: String) -> Self {
        IdentityRecord {
            id,
            name,
            aliases: Vec::new(),
            affiliations: Vec::new(),
            xrefs: BTreeMap::new(),
            homepage: None,
            works: Vec::new(),
            emails: Vec::new(),
            keywords: Vec::new(),
            countries: Vec::new(),
            locale: None,
        }
    }

    /// Whether the record carries enough evidence for the high-quality
    /// partition: at least one external identifier, one resolved
    /// affiliation, or one work.
    pub fn is_high_quality(&self) -> bool {
        !self.xrefs.is_empty()
            || self.affiliations.iter().any(|a| a.org_ref.is_some())
            || !self.works.is_empty()
    }

    /// Resolved organization of the best guess at the current
    /// affiliation: the first employment with no end date, then the
    /// first education with no end date.
    pub fn current_org_ref(&self) -> Option<&str> {
        for kind in [AffiliationKind::Employment, AffiliationKind::Education] {
            let hit = self
                .affiliations
                .iter()
                .filter(|a| a.kind == kind && a.end.is_none())
                .find_map(|a| a.org_ref.as_deref());
            if hit.is_some() {
                return hit;
            }
        }
        None
    }

    pub fn xref(&self, prefix: &str) -> Option<&str> {
        self.xrefs.get(prefix).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn affiliation(kind: AffiliationKind, org_ref: Option<&str>, end: Option<i32>) -> Affiliation {
        Affiliation {
            kind,
            organization: "Example University".to_string(),
            org_ref: org_ref.map(str::to_string),
            org_xrefs: BTreeMap::new(),
            role: None,
            start: None,
            end: end.and_then(|year| PartialDate::from_parts(Some(year), None, None)),
        }
    }

    #[test]
    fn test_partial_date_requires_year() {
        assert_eq!(PartialDate::from_parts(None, Some(5), Some(12)), None);
        let date = PartialDate::from_parts(Some(2020), Some(5), Some(12)).unwrap();
        assert_eq!((date.year, date.month, date.day), (2020, Some(5), Some(12)));
    }

    #[test]
    fn test_partial_date_drops_day_without_month() {
        let date = PartialDate::from_parts(Some(2020), None, Some(12)).unwrap();
        assert_eq!(date.month, None);
        assert_eq!(date.day, None);
    }

    #[test]
    fn test_partial_date_drops_out_of_range_parts() {
        let date = PartialDate::from_parts(Some(2020), Some(13), Some(40)).unwrap();
        assert_eq!(date.month, None);
        assert_eq!(date.day, None);
    }

    #[test]
    fn test_quality_needs_evidence() {
        let mut record = IdentityRecord::new("0001".to_string(), "Jane Doe".to_string());
        assert!(!record.is_high_quality());

        record.works.push("36151740".to_string());
        assert!(record.is_high_quality());

        record.works.clear();
        record
            .xrefs
            .insert("github".to_string(), "janedoe".to_string());
        assert!(record.is_high_quality());

        record.xrefs.clear();
        record
            .affiliations
            .push(affiliation(AffiliationKind::Membership, None, None));
        assert!(!record.is_high_quality());

        record
            .affiliations
            .push(affiliation(AffiliationKind::Education, Some("03yrm5c26"), None));
        assert!(record.is_high_quality());
    }

    #[test]
    fn test_current_org_prefers_open_employment() {
        let mut record = IdentityRecord::new("0001".to_string(), "Jane Doe".to_string());
        record.affiliations = vec![
            affiliation(AffiliationKind::Education, Some("education-org"), None),
            affiliation(AffiliationKind::Employment, Some("closed-org"), Some(2018)),
            affiliation(AffiliationKind::Employment, Some("open-org"), None),
        ];
        assert_eq!(record.current_org_ref(), Some("open-org"));

        record.affiliations.retain(|a| a.kind != AffiliationKind::Employment);
        assert_eq!(record.current_org_ref(), Some("education-org"));

        record.affiliations.clear();
        assert_eq!(record.current_org_ref(), None);
    }

    #[test]
    fn test_record_round_trips_through_json() {
        let mut record = IdentityRecord::new("0001".to_string(), "Jane Q. Public".to_string());
        record.aliases.push("Jane Public".to_string());
        record
            .xrefs
            .insert("wikidata".to_string(), "Q12345".to_string());
        record.affiliations.push(Affiliation {
            kind: AffiliationKind::Employment,
            organization: "Example University".to_string(),
            org_ref: Some("03yrm5c26".to_string()),
            org_xrefs: BTreeMap::from([("ringgold".to_string(), "1234".to_string())]),
            role: Some(Role::Standardized("Professor".to_string())),
            start: PartialDate::from_parts(Some(2019), Some(9), None),
            end: None,
        });
        record.countries.push("DE".to_string());

        let json = serde_json::to_string(&record).unwrap();
        let back: IdentityRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_sparse_record_serializes_sparsely() {
        let record = IdentityRecord::new("0001".to_string(), "Jane Doe".to_string());
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"id":"0001","name":"Jane Doe"}"#);
    }
}
