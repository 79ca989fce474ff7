use tracing::info;

use super::core::Database;
use crate::TARGET_DB;

impl Database {
    pub(crate) async fn initialize_schema(&self) -> Result<(), sqlx::Error> {
        let mut conn = self.pool().acquire().await?;
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS terms (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                norm_text TEXT NOT NULL,
                text TEXT NOT NULL,
                record_id TEXT NOT NULL,
                entry_name TEXT NOT NULL,
                kind TEXT NOT NULL,
                source TEXT NOT NULL,
                hq BOOLEAN NOT NULL DEFAULT 0
            );
            CREATE INDEX IF NOT EXISTS idx_terms_norm_text ON terms (norm_text);
            CREATE INDEX IF NOT EXISTS idx_terms_hq_norm_text ON terms (hq, norm_text);
            CREATE INDEX IF NOT EXISTS idx_terms_record_id ON terms (record_id);

            -- Compact per-identity metadata for direct lookup
            CREATE TABLE IF NOT EXISTS person (
                id TEXT NOT NULL PRIMARY KEY,
                name TEXT NOT NULL,
                country CHAR(2),
                locale TEXT,
                org_ref TEXT,
                email TEXT,
                homepage TEXT,
                github TEXT,
                wos TEXT,
                dblp TEXT,
                scopus TEXT,
                google_scholar TEXT,
                linkedin TEXT,
                wikidata TEXT,
                mastodon TEXT,
                works INTEGER NOT NULL DEFAULT 0,
                hq BOOLEAN NOT NULL DEFAULT 0
            );
            CREATE INDEX IF NOT EXISTS idx_person_name ON person (name);
            CREATE INDEX IF NOT EXISTS idx_person_org_ref ON person (org_ref);
            "#,
        )
        .execute(&mut *conn)
        .await?;
        info!(target: TARGET_DB, "Tables ensured to exist");

        Ok(())
    }

    /// Remove all indexed data, keeping the schema in place.
    pub async fn clear(&self) -> Result<(), sqlx::Error> {
        let mut conn = self.pool().acquire().await?;
        sqlx::query(
            r#"
            DELETE FROM terms;
            DELETE FROM person;
            "#,
        )
        .execute(&mut *conn)
        .await?;
        info!(target: TARGET_DB, "Existing index data cleared");

        Ok(())
    }
}
