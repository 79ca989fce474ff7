//! Grounding of organization names against a canonical registry.

use std::sync::Arc;

use tracing::debug;

use crate::TARGET_EXTRACT;

/// A resolved organization.
#[derive(Debug, Clone, PartialEq)]
pub struct OrgMatch {
    /// Identifier in the canonical organization registry.
    pub id: String,
    /// Match confidence, between 0 and 1.
    pub score: f64,
}

/// Lookup of organization names in a canonical registry.
pub trait OrganizationIndex: Send + Sync {
    /// Best match for `text`, if any.
    fn best_match(&self, text: &str) -> Option<OrgMatch>;
}

/// Resolves organization names, retrying once with boilerplate stripped.
#[derive(Clone, Default)]
pub struct OrgGrounder {
    index: Option<Arc<dyn OrganizationIndex>>,
}

impl OrgGrounder {
    pub fn new(index: Arc<dyn OrganizationIndex>) -> Self {
        OrgGrounder { index: Some(index) }
    }

    /// A grounder that resolves nothing, for runs without a registry.
    pub fn disabled() -> Self {
        OrgGrounder { index: None }
    }

    /// Resolve `name` to a registry identifier.
    pub fn resolve(&self, name: &str) -> Option<OrgMatch> {
        let index = self.index.as_ref()?;
        if let Some(matched) = index.best_match(name) {
            return Some(matched);
        }
        // Leading articles and commas often hide an otherwise known name.
        let retry = name.trim_start_matches("The ").replace(',', "");
        if retry != name {
            if let Some(matched) = index.best_match(&retry) {
                debug!(
                    target: TARGET_EXTRACT,
                    organization = %name,
                    retried = %retry,
                    "organization resolved after simplification"
                );
                return Some(matched);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ExactIndex(&'static str, &'static str);

    impl OrganizationIndex for ExactIndex {
        fn best_match(&self, text: &str) -> Option<OrgMatch> {
            (text == self.0).then(|| OrgMatch {
                id: self.1.to_string(),
                score: 1.0,
            })
        }
    }

    #[test]
    fn test_direct_resolution() {
        let grounder = OrgGrounder::new(Arc::new(ExactIndex("Example University", "02jbv0t02")));
        let matched = grounder.resolve("Example University").unwrap();
        assert_eq!(matched.id, "02jbv0t02");
    }

    #[test]
    fn test_retry_strips_article_and_commas() {
        let grounder = OrgGrounder::new(Arc::new(ExactIndex("Example University", "02jbv0t02")));
        assert!(grounder.resolve("The Example University").is_some());

        let grounder = OrgGrounder::new(Arc::new(ExactIndex(
            "Example University Boston",
            "02jbv0t02",
        )));
        assert!(grounder.resolve("Example University, Boston").is_some());
    }

    #[test]
    fn test_no_retry_when_nothing_to_strip() {
        struct CountingIndex(std::sync::Mutex<u32>);
        impl OrganizationIndex for CountingIndex {
            fn best_match(&self, _text: &str) -> Option<OrgMatch> {
                *self.0.lock().unwrap() += 1;
                None
            }
        }
        let index = Arc::new(CountingIndex(std::sync::Mutex::new(0)));
        let grounder = OrgGrounder::new(index.clone());
        assert!(grounder.resolve("Example University").is_none());
        assert_eq!(*index.0.lock().unwrap(), 1);
    }

    #[test]
    fn test_disabled_grounder_resolves_nothing() {
        assert!(OrgGrounder::disabled().resolve("Example University").is_none());
    }
}
