//! Grounding of free-text names against the term index.

use anyhow::{Context, Result};
use tracing::debug;

use crate::db::Database;
use crate::lexical::{Partition, Term};
use crate::names::{name_to_synonyms, normalize_for_matching};
use crate::TARGET_GROUND;

/// One index hit for a queried name.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub record_id: String,
    pub term: Term,
}

impl From<Term> for Match {
    fn from(term: Term) -> Self {
        Match {
            record_id: term.record_id.clone(),
            term,
        }
    }
}

/// Looks up names in the index, falling back to generated variants of
/// the query when the written form is unknown.
#[derive(Clone)]
pub struct Grounder {
    db: Database,
    partition: Partition,
}

impl Grounder {
    pub fn new(db: Database) -> Self {
        Grounder {
            db,
            partition: Partition::Complete,
        }
    }

    /// Restrict lookups to `partition`.
    pub fn with_partition(mut self, partition: Partition) -> Self {
        self.partition = partition;
        self
    }

    /// All matches for `name`. The normalized form is tried first; when
    /// it misses, generated variants of the query are tried in
    /// generation order and the first form with any hits wins.
    pub async fn ground(&self, name: &str) -> Result<Vec<Match>> {
        let norm = normalize_for_matching(name);
        if norm.is_empty() {
            return Ok(Vec::new());
        }

        let hits = self
            .db
            .lookup_terms(&norm, self.partition)
            .await
            .context("term lookup failed")?;
        if !hits.is_empty() {
            debug!(target: TARGET_GROUND, name, hits = hits.len(), "exact form matched");
            return Ok(hits.into_iter().map(Match::from).collect());
        }

        for variant in name_to_synonyms(name) {
            let norm = normalize_for_matching(&variant);
            if norm.is_empty() {
                continue;
            }
            let hits = self
                .db
                .lookup_terms(&norm, self.partition)
                .await
                .context("term lookup failed")?;
            if !hits.is_empty() {
                debug!(
                    target: TARGET_GROUND,
                    name,
                    variant = %variant,
                    hits = hits.len(),
                    "variant form matched"
                );
                return Ok(hits.into_iter().map(Match::from).collect());
            }
        }

        Ok(Vec::new())
    }

    /// The single identity `name` grounds to, or `None` when the name
    /// is unknown or shared by several identities.
    pub async fn ground_unambiguous(&self, name: &str) -> Result<Option<Match>> {
        let matches = self.ground(name).await?;
        let mut iter = matches.into_iter();
        let Some(first) = iter.next() else {
            return Ok(None);
        };
        if iter.any(|m| m.record_id != first.record_id) {
            debug!(target: TARGET_GROUND, name, "name is ambiguous");
            return Ok(None);
        }
        Ok(Some(first))
    }
}
