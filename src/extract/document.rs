//! Raw document shapes, as deserialized from the source dump.
//!
//! One line of the dump is one JSON document. Every field except `id` is
//! optional; extraction decides what is usable.

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDocument {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub given_names: Option<String>,
    #[serde(default)]
    pub family_name: Option<String>,
    /// Preferred display name, taking precedence over given + family.
    #[serde(default)]
    pub credit_name: Option<String>,
    /// Free-text alternative names; entries may pack several names
    /// separated by semicolons.
    #[serde(default)]
    pub other_names: Vec<String>,
    #[serde(default)]
    pub external_ids: Vec<RawExternalId>,
    #[serde(default)]
    pub urls: Vec<RawUrl>,
    #[serde(default)]
    pub employments: Vec<RawAffiliation>,
    #[serde(default)]
    pub educations: Vec<RawAffiliation>,
    #[serde(default)]
    pub memberships: Vec<RawAffiliation>,
    #[serde(default)]
    pub works: Vec<RawWorkId>,
    #[serde(default)]
    pub emails: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub countries: Vec<String>,
    #[serde(default)]
    pub locale: Option<String>,
}

/// A typed identifier claim, keyed by the source's own type vocabulary.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawExternalId {
    #[serde(rename = "type", default)]
    pub id_type: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// A self-reported link with an optional free-text label.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawUrl {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAffiliation {
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default)]
    pub org_ids: Vec<RawOrgId>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub start: Option<RawDate>,
    #[serde(default)]
    pub end: Option<RawDate>,
}

/// A disambiguated organization identifier from a named registry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawOrgId {
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct RawDate {
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub month: Option<u32>,
    #[serde(default)]
    pub day: Option<u32>,
}

/// A bibliographic identifier attached to a work.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawWorkId {
    #[serde(rename = "type", default)]
    pub id_type: String,
    #[serde(default)]
    pub value: String,
}
