//! Typed external identifiers: allow-listed claim types and recognized
//! profile URLs.
//!
//! Identifier claims go through an allow list keyed by normalized type
//! name; unknown types are counted, never stored. Profile URLs go
//! through an ordered rule table; the first matching rule wins, so the
//! table order is part of the semantics.

use std::collections::{BTreeMap, HashMap, HashSet};

use lazy_static::lazy_static;
use percent_encoding::percent_decode_str;
use tracing::debug;
use url::Url;

use super::diagnostics::Diagnostics;
use super::document::RawDocument;
use crate::TARGET_EXTRACT;

/// Identifier types never stored: self-references, local profile
/// systems, dead services, and schemes that are not specific registries.
const SKIPPED_ID_TYPES_RAW: &[&str] = &[
    "iAuthor",
    "中国科学家在线",
    "JRIN",
    "ORCID",
    "ORCID id",
    "eScientist",
    "UNE Researcher ID",
    "UOW Scholars",
    "US EPA VIVO",
    "Chalmers ID",
    "HKUST Profile",
    "Custom",
    "Profile system identifier",
    "CTI Vitae",
    "Pitt ID",
    "VIVO Cornell",
    "Technical University of Denmark CWIS",
    "HKU ResearcherPage",
    "Digital Author ID",
    "Digital Author ID (DAI)",
    "dai",
];

/// Identifier types mapped to registry prefixes. Keys are compared after
/// [`norm_key`], so source spellings may differ in case, spacing, and
/// trailing colons.
const ID_TYPE_PREFIXES_RAW: &[(&str, &str)] = &[
    ("ResearcherID", "wos.researcher"),
    ("RID", "wos.researcher"),
    ("Web of Science Researcher ID", "wos.researcher"),
    ("other-id - Web of Science", "wos.researcher"),
    ("Scopus Author ID", "scopus"),
    ("Scopus ID", "scopus"),
    ("ID de autor de Scopus", "scopus"),
    ("???person.personsources.scopusauthor???", "scopus"),
    ("Loop profile", "loop"),
    ("github", "github"),
    ("ISNI", "isni"),
    ("Google Scholar", "google.scholar"),
    ("gnd", "gnd"),
    ("Authenticus", "authenticus"),
    ("AuthenticusID", "authenticus"),
    ("AuthID", "authenticus"),
    ("ID Dialnet", "dialnet.author"),
    ("Dialnet ID", "dialnet.author"),
    ("SciProfiles", "sciprofiles"),
    ("Sciprofile", "sciprofiles"),
    ("Ciência ID", "cienciavitae"),
    ("KAKEN", "kaken"),
    ("Researcher Name Resolver ID", "kaken"),
    ("SSRN", "ssrn.author"),
    ("socialscienceresearchnetwork", "ssrn.author"),
    ("ssrnauthorpage", "ssrn.author"),
    ("ssrnpage", "ssrn.author"),
];

/// URL labels that mark a personal homepage, already in normalized form.
const PERSONAL_URL_NAMES_RAW: &[&str] = &[
    "website",
    "homepage",
    "blog",
    "personalpage",
    "personalhomepage",
    "personalwebsite",
    "personalwebsites",
    "personalweb-page",
    "personalwebpage",
    "webpage",
    "personal",
    "professionalwebsite",
    "personalsite",
    "personalblog",
    "mywebsite",
    "mysite",
    "officialweb-page",
    "sitiowebpersonal",
    "paginaweb",
    "personelwebsite",
    "blogpessoal",
    "mypersonalsite",
    "mypersonalblog",
    "personalweb-site",
    "web-site",
    "professionalblog",
    "personalwebsiteandblog",
    "myweb",
    "homewebsite",
    "personalweb",
    "mypersonalwebsite",
    "blogpersonal",
];

lazy_static! {
    static ref SKIPPED_ID_TYPES: HashSet<String> =
        SKIPPED_ID_TYPES_RAW.iter().map(|k| norm_key(k)).collect();
    static ref ID_TYPE_PREFIXES: HashMap<String, &'static str> = ID_TYPE_PREFIXES_RAW
        .iter()
        .map(|(k, prefix)| (norm_key(k), *prefix))
        .collect();
    static ref PERSONAL_URL_NAMES: HashSet<&'static str> =
        PERSONAL_URL_NAMES_RAW.iter().copied().collect();
}

/// Normalize an identifier type or URL label for table lookup:
/// lowercase, spaces removed, trailing colons dropped.
pub(crate) fn norm_key(key: &str) -> String {
    key.to_lowercase()
        .replace(' ', "")
        .trim_end_matches(':')
        .to_string()
}

/// One URL recognition rule. Rules are evaluated in table order against
/// the scheme-stripped URL.
struct UrlRule {
    pattern: &'static str,
    /// Prefix match when true, substring match when false.
    anchored: bool,
    /// Registry prefix the identifier is stored under; `None` discards
    /// the whole URL.
    key: Option<&'static str>,
    /// Drop a trailing query string from the identifier.
    strip_query: bool,
    /// Discard identifiers still containing a path separator.
    reject_paths: bool,
    /// Keep only the first path segment of the identifier.
    first_segment: bool,
    /// Percent-decode the identifier.
    decode: bool,
    /// Take the identifier from this query parameter instead of the
    /// remainder of the URL.
    query_param: Option<&'static str>,
    /// Trailing fragments removed from the identifier, in order.
    strip_suffixes: &'static [&'static str],
}

impl UrlRule {
    const fn prefix(pattern: &'static str, key: &'static str) -> Self {
        UrlRule {
            pattern,
            anchored: true,
            key: Some(key),
            strip_query: false,
            reject_paths: false,
            first_segment: false,
            decode: false,
            query_param: None,
            strip_suffixes: &[],
        }
    }

    const fn contains(pattern: &'static str, key: &'static str) -> Self {
        let mut rule = Self::prefix(pattern, key);
        rule.anchored = false;
        rule
    }

    const fn skip_prefix(pattern: &'static str) -> Self {
        let mut rule = Self::prefix(pattern, "");
        rule.key = None;
        rule
    }

    const fn skip_contains(pattern: &'static str) -> Self {
        let mut rule = Self::skip_prefix(pattern);
        rule.anchored = false;
        rule
    }

    const fn strip_query(mut self) -> Self {
        self.strip_query = true;
        self
    }

    const fn reject_paths(mut self) -> Self {
        self.reject_paths = true;
        self
    }

    const fn first_segment(mut self) -> Self {
        self.first_segment = true;
        self
    }

    const fn decoded(mut self) -> Self {
        self.decode = true;
        self
    }

    const fn from_query_param(mut self, param: &'static str) -> Self {
        self.query_param = Some(param);
        self
    }

    const fn strip_suffixes(mut self, suffixes: &'static [&'static str]) -> Self {
        self.strip_suffixes = suffixes;
        self
    }
}

/// Profile URL rules, in priority order. Skip rules deliberately discard
/// platforms that are either not identifier-bearing or not worth keeping.
const URL_RULES: &[UrlRule] = &[
    UrlRule::prefix("github.com/", "github").strip_query().reject_paths(),
    UrlRule::prefix("www.github.com/", "github").reject_paths(),
    UrlRule::skip_prefix("twitter.com/"),
    UrlRule::skip_prefix("x.com/"),
    UrlRule::skip_contains("facebook"),
    UrlRule::skip_contains("instagram"),
    UrlRule::prefix("www.wikidata.org/wiki/", "wikidata"),
    UrlRule::prefix("tools.wmflabs.org/scholia/author/", "wikidata"),
    // Language subdomains are common for LinkedIn, so this is unanchored.
    UrlRule::contains("linkedin.com/in/", "linkedin").decoded(),
    UrlRule::contains("scholar.google", "google.scholar").from_query_param("user"),
    UrlRule::prefix("publons.com/author/", "publons.researcher").first_segment(),
    UrlRule::prefix("www.researchgate.net/profile/", "researchgate.profile"),
    UrlRule::prefix("www.scopus.com/authid/detail.uri?authorId=", "scopus"),
    UrlRule::prefix("www.webofscience.com/wos/author/record/", "wos.researcher"),
    UrlRule::prefix("lattes.cnpq.br/", "lattes"),
    UrlRule::prefix("dialnet.unirioja.es/servlet/autor?codigo=", "dialnet.author"),
    UrlRule::prefix("papers.ssrn.com/sol3/cf_dev/AbsByAuth.cfm?per_id=", "ssrn.author"),
    UrlRule::prefix("osf.io/", "osf"),
    UrlRule::prefix("viaf.org/viaf/", "viaf"),
    UrlRule::prefix("ieeexplore.ieee.org/author/", "ieee.author"),
    UrlRule::prefix("loop.frontiersin.org/people/", "loop").strip_suffixes(&["/overview", "/bio"]),
    UrlRule::prefix("dblp.org/pid/", "dblp.author").strip_suffixes(&[".html"]),
    UrlRule::prefix("dblp.uni-trier.de/pid/", "dblp.author").strip_suffixes(&[".html"]),
    UrlRule::prefix("hub.docker.com/u/", "dockerhub.user"),
];

enum UrlOutcome {
    /// Recognized: store the identifier under the registry prefix.
    Keep(&'static str, String),
    /// Recognized and deliberately discarded.
    Skip,
    /// No rule matched.
    Unrecognized,
}

fn classify_url(url: &str) -> UrlOutcome {
    for rule in URL_RULES {
        let start = if rule.anchored {
            if url.starts_with(rule.pattern) {
                Some(rule.pattern.len())
            } else {
                None
            }
        } else {
            url.find(rule.pattern).map(|pos| pos + rule.pattern.len())
        };
        let Some(start) = start else {
            continue;
        };
        let Some(key) = rule.key else {
            return UrlOutcome::Skip;
        };

        if let Some(param) = rule.query_param {
            return match query_param(url, param) {
                Some(value) if !value.is_empty() => UrlOutcome::Keep(key, value),
                _ => UrlOutcome::Skip,
            };
        }

        let mut identifier = url[start..].to_string();
        if rule.strip_query {
            identifier = identifier.split('?').next().unwrap_or("").to_string();
        }
        if rule.first_segment {
            identifier = identifier.split('/').next().unwrap_or("").to_string();
        }
        for suffix in rule.strip_suffixes {
            if let Some(stripped) = identifier.strip_suffix(suffix) {
                identifier = stripped.to_string();
            }
        }
        if rule.reject_paths && identifier.contains('/') {
            return UrlOutcome::Skip;
        }
        if rule.decode {
            identifier = percent_decode_str(&identifier)
                .decode_utf8_lossy()
                .into_owned();
        }
        if identifier.is_empty() {
            return UrlOutcome::Skip;
        }
        return UrlOutcome::Keep(key, identifier);
    }
    UrlOutcome::Unrecognized
}

/// Value of one query parameter of a scheme-stripped URL.
fn query_param(url: &str, param: &str) -> Option<String> {
    let parsed = Url::parse(&format!("https://{url}")).ok()?;
    parsed
        .query_pairs()
        .find(|(name, _)| name == param)
        .map(|(_, value)| value.into_owned())
}

fn strip_scheme(url: &str) -> &str {
    let url = url.strip_prefix("https://").unwrap_or(url);
    let url = url.strip_prefix("Https://").unwrap_or(url);
    url.strip_prefix("http://").unwrap_or(url)
}

/// A fediverse profile URL, turned into `user@host` form.
fn mastodon_handle(url: &str) -> Option<String> {
    let (host, user) = url.trim_end_matches('/').rsplit_once('/')?;
    let host = host.strip_suffix("/web").unwrap_or(host);
    let host = host.strip_suffix("/media").unwrap_or(host);
    if host.is_empty() || user.is_empty() {
        return None;
    }
    Some(format!("{user}@{host}"))
}

/// Extract typed external identifiers and the personal homepage from a
/// document. The first URL labeled as personal becomes the homepage;
/// everything else runs through the recognition rules.
pub(crate) fn extract_external_refs(
    doc: &RawDocument,
    diag: &mut Diagnostics,
) -> (BTreeMap<String, String>, Option<String>) {
    let mut refs: BTreeMap<String, String> = BTreeMap::new();
    let mut homepage: Option<String> = None;

    for claim in &doc.external_ids {
        let value = claim.value.trim();
        if value.is_empty() {
            continue;
        }
        let id_type = claim.id_type.trim();
        if id_type.is_empty() {
            continue;
        }
        let norm = norm_key(id_type);
        if SKIPPED_ID_TYPES.contains(&norm) {
            continue;
        }
        let Some(prefix) = ID_TYPE_PREFIXES.get(&norm) else {
            debug!(
                target: TARGET_EXTRACT,
                "[{}] unknown identifier type '{}' with value '{}'", doc.id, id_type, value
            );
            let example = claim.url.as_deref().unwrap_or(value);
            diag.record_unmapped_id_type(norm, id_type, example);
            continue;
        };
        if *prefix == "wikidata" && !value.starts_with('Q') {
            continue;
        }
        refs.insert((*prefix).to_string(), value.to_string());
    }

    for link in &doc.urls {
        let url = link.url.trim().trim_end_matches('/');
        if url.is_empty() {
            continue;
        }
        let name = link
            .name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty());

        if let Some(name) = name {
            if homepage.is_none() && PERSONAL_URL_NAMES.contains(norm_key(name).as_str()) {
                homepage = Some(url.to_string());
                continue;
            }
        }

        let stripped = strip_scheme(url);
        match classify_url(stripped) {
            UrlOutcome::Keep(key, value) => {
                refs.insert(key.to_string(), value);
            }
            UrlOutcome::Skip => {}
            UrlOutcome::Unrecognized => match name {
                Some(name) if name.eq_ignore_ascii_case("mastodon") => {
                    match mastodon_handle(stripped) {
                        Some(handle) => {
                            refs.insert("mastodon".to_string(), handle);
                        }
                        None => {
                            debug!(
                                target: TARGET_EXTRACT,
                                "[{}] malformed fediverse URL: {}", doc.id, url
                            );
                        }
                    }
                }
                Some(name) => {
                    diag.record_unknown_url_name(norm_key(name), name, url);
                }
                None => {}
            },
        }
    }

    for prefix in refs.keys() {
        diag.record_typed_ref(prefix);
    }

    (refs, homepage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::document::{RawExternalId, RawUrl};

    fn doc_with_urls(urls: Vec<RawUrl>) -> RawDocument {
        RawDocument {
            id: "0001".to_string(),
            urls,
            ..Default::default()
        }
    }

    fn url(name: Option<&str>, url: &str) -> RawUrl {
        RawUrl {
            name: name.map(str::to_string),
            url: url.to_string(),
        }
    }

    fn refs_for(urls: Vec<RawUrl>) -> BTreeMap<String, String> {
        let mut diag = Diagnostics::default();
        extract_external_refs(&doc_with_urls(urls), &mut diag).0
    }

    #[test]
    fn test_norm_key() {
        assert_eq!(norm_key("Scopus Author ID"), "scopusauthorid");
        assert_eq!(norm_key("ORCID:"), "orcid");
        assert_eq!(norm_key("Personal Website"), "personalwebsite");
    }

    #[test]
    fn test_typed_claims_use_the_allow_list() {
        let mut diag = Diagnostics::default();
        let doc = RawDocument {
            id: "0001".to_string(),
            external_ids: vec![
                RawExternalId {
                    id_type: "ResearcherID".to_string(),
                    value: "A-1234-2008".to_string(),
                    url: None,
                },
                RawExternalId {
                    id_type: "Scopus ID".to_string(),
                    value: "7004321".to_string(),
                    url: None,
                },
            ],
            ..Default::default()
        };
        let (refs, _) = extract_external_refs(&doc, &mut diag);
        assert_eq!(refs["wos.researcher"], "A-1234-2008");
        assert_eq!(refs["scopus"], "7004321");
        assert_eq!(diag.typed_refs["scopus"], 1);
    }

    #[test]
    fn test_self_referential_claims_are_never_stored() {
        let mut diag = Diagnostics::default();
        let doc = RawDocument {
            id: "0001".to_string(),
            external_ids: vec![RawExternalId {
                id_type: "ORCID id".to_string(),
                value: "0000-0001-2345-6789".to_string(),
                url: None,
            }],
            ..Default::default()
        };
        let (refs, _) = extract_external_refs(&doc, &mut diag);
        assert!(refs.is_empty());
        assert!(diag.unmapped_id_types.is_empty());
    }

    #[test]
    fn test_unknown_claim_types_are_counted_not_stored() {
        let mut diag = Diagnostics::default();
        let doc = RawDocument {
            id: "0001".to_string(),
            external_ids: vec![RawExternalId {
                id_type: "My University Profile".to_string(),
                value: "12345".to_string(),
                url: Some("https://example.edu/12345".to_string()),
            }],
            ..Default::default()
        };
        let (refs, _) = extract_external_refs(&doc, &mut diag);
        assert!(refs.is_empty());
        let entry = &diag.unmapped_id_types["myuniversityprofile"];
        assert_eq!(entry.count, 1);
        assert_eq!(entry.display, "My University Profile");
        assert_eq!(entry.example, "https://example.edu/12345");
    }

    #[test]
    fn test_github_urls() {
        let refs = refs_for(vec![url(None, "https://github.com/cthoyt?tab=repositories")]);
        assert_eq!(refs["github"], "cthoyt");
        // A specific repository is not a profile.
        assert!(refs_for(vec![url(None, "https://github.com/cthoyt/project")]).is_empty());
        let refs = refs_for(vec![url(None, "http://www.github.com/janedoe/")]);
        assert_eq!(refs["github"], "janedoe");
    }

    #[test]
    fn test_social_platforms_are_skipped() {
        assert!(refs_for(vec![
            url(Some("Twitter"), "https://twitter.com/someone"),
            url(Some("X"), "https://x.com/someone"),
            url(None, "https://www.facebook.com/someone"),
            url(None, "https://instagram.com/someone"),
        ])
        .is_empty());
    }

    #[test]
    fn test_linkedin_decodes_percent_escapes() {
        let refs = refs_for(vec![url(
            Some("LinkedIn"),
            "https://de.linkedin.com/in/jos%C3%A9-garc%C3%ADa",
        )]);
        assert_eq!(refs["linkedin"], "josé-garcía");
    }

    #[test]
    fn test_scholar_user_parameter() {
        let refs = refs_for(vec![url(
            None,
            "https://scholar.google.com/citations?hl=en&user=PjrpzUIAAAAJ",
        )]);
        assert_eq!(refs["google.scholar"], "PjrpzUIAAAAJ");
        // No user parameter: recognized but nothing to keep.
        assert!(refs_for(vec![url(None, "https://scholar.google.com/citations?hl=en")]).is_empty());
    }

    #[test]
    fn test_suffix_stripping_rules() {
        let refs = refs_for(vec![url(None, "https://loop.frontiersin.org/people/12345/overview")]);
        assert_eq!(refs["loop"], "12345");
        let refs = refs_for(vec![url(None, "https://dblp.org/pid/152/4358.html")]);
        assert_eq!(refs["dblp.author"], "152/4358");
        let refs = refs_for(vec![url(None, "https://publons.com/author/4567/some-name")]);
        assert_eq!(refs["publons.researcher"], "4567");
    }

    #[test]
    fn test_wikidata_from_urls() {
        let refs = refs_for(vec![url(None, "https://www.wikidata.org/wiki/Q47475003")]);
        assert_eq!(refs["wikidata"], "Q47475003");
        let refs = refs_for(vec![url(None, "https://tools.wmflabs.org/scholia/author/Q47475003")]);
        assert_eq!(refs["wikidata"], "Q47475003");
    }

    #[test]
    fn test_mastodon_handle_from_labeled_url() {
        let refs = refs_for(vec![url(Some("Mastodon"), "https://genomic.social/@cthoyt")]);
        assert_eq!(refs["mastodon"], "@cthoyt@genomic.social");
        // Web-client paths resolve to the same handle.
        let refs = refs_for(vec![url(Some("mastodon"), "https://fosstodon.org/web/@someone")]);
        assert_eq!(refs["mastodon"], "@someone@fosstodon.org");
    }

    #[test]
    fn test_personal_homepage_takes_first_labeled_url() {
        let mut diag = Diagnostics::default();
        let doc = doc_with_urls(vec![
            url(Some("Personal Website"), "https://example.org/~jane/"),
            url(Some("Homepage"), "https://example.com/other"),
        ]);
        let (_, homepage) = extract_external_refs(&doc, &mut diag);
        assert_eq!(homepage.as_deref(), Some("https://example.org/~jane"));
    }

    #[test]
    fn test_unrecognized_named_urls_are_counted() {
        let mut diag = Diagnostics::default();
        let doc = doc_with_urls(vec![url(
            Some("Departmental Page"),
            "https://dept.example.edu/people/jane",
        )]);
        let (refs, _) = extract_external_refs(&doc, &mut diag);
        assert!(refs.is_empty());
        let entry = &diag.unknown_url_names["departmentalpage"];
        assert_eq!(entry.count, 1);
        assert_eq!(entry.display, "Departmental Page");
        // Unnamed unrecognized URLs stay silent.
        let mut diag = Diagnostics::default();
        let doc = doc_with_urls(vec![url(None, "https://dept.example.edu/people/jane")]);
        extract_external_refs(&doc, &mut diag);
        assert!(diag.unknown_url_names.is_empty());
    }

    #[test]
    fn test_more_platform_rules() {
        let refs = refs_for(vec![
            url(None, "https://lattes.cnpq.br/1234567890123456"),
            url(None, "https://osf.io/ab12c"),
            url(None, "https://viaf.org/viaf/123456789"),
            url(None, "https://hub.docker.com/u/someuser"),
            url(None, "https://www.scopus.com/authid/detail.uri?authorId=7004321"),
        ]);
        assert_eq!(refs["lattes"], "1234567890123456");
        assert_eq!(refs["osf"], "ab12c");
        assert_eq!(refs["viaf"], "123456789");
        assert_eq!(refs["dockerhub.user"], "someuser");
        assert_eq!(refs["scopus"], "7004321");
    }
}
