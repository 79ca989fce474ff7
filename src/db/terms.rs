use sqlx::Row;
use tracing::instrument;

use super::core::Database;
use crate::lexical::{Partition, Term, TermKind};

impl Database {
    /// Insert a batch of terms inside one transaction. Returns the
    /// number of rows written.
    #[instrument(target = "db_query", level = "info", skip(self, terms))]
    pub async fn insert_terms(&self, terms: &[(Term, bool)]) -> Result<u64, sqlx::Error> {
        let mut transaction = self.pool().begin().await?;
        for (term, hq) in terms {
            sqlx::query(
                r#"
                INSERT INTO terms (norm_text, text, record_id, entry_name, kind, source, hq)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
            )
            .bind(&term.norm_text)
            .bind(&term.text)
            .bind(&term.record_id)
            .bind(&term.entry_name)
            .bind(term.kind.as_str())
            .bind(&term.source)
            .bind(*hq)
            .execute(&mut *transaction)
            .await?;
        }
        transaction.commit().await?;
        Ok(terms.len() as u64)
    }

    /// All terms stored under a normalized key, restricted to `partition`.
    pub async fn lookup_terms(
        &self,
        norm_text: &str,
        partition: Partition,
    ) -> Result<Vec<Term>, sqlx::Error> {
        let query = match partition {
            Partition::Complete => {
                r#"
                SELECT norm_text, text, record_id, entry_name, kind, source
                FROM terms WHERE norm_text = ?1
                "#
            }
            Partition::HighQuality => {
                r#"
                SELECT norm_text, text, record_id, entry_name, kind, source
                FROM terms WHERE hq = 1 AND norm_text = ?1
                "#
            }
        };
        let rows = sqlx::query(query)
            .bind(norm_text)
            .fetch_all(self.pool())
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let kind: String = row.get("kind");
                Term {
                    norm_text: row.get("norm_text"),
                    text: row.get("text"),
                    record_id: row.get("record_id"),
                    entry_name: row.get("entry_name"),
                    kind: match kind.as_str() {
                        "name" => TermKind::Name,
                        _ => TermKind::Synonym,
                    },
                    source: row.get("source"),
                }
            })
            .collect())
    }

    /// Total term rows, and how many sit in the high quality partition.
    pub async fn count_terms(&self) -> Result<(i64, i64), sqlx::Error> {
        let row = sqlx::query("SELECT COUNT(*) AS total, COALESCE(SUM(hq), 0) AS hq FROM terms")
            .fetch_one(self.pool())
            .await?;
        Ok((row.get("total"), row.get("hq")))
    }

    /// Number of distinct normalized keys in the index.
    pub async fn count_keys(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(DISTINCT norm_text) FROM terms")
            .fetch_one(self.pool())
            .await
    }
}
