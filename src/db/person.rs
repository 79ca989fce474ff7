use serde::Serialize;
use sqlx::Row;

use super::core::Database;
use crate::records::IdentityRecord;

/// Flattened per-identity metadata, one row per record.
#[derive(Debug, Clone, Serialize)]
pub struct PersonRow {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wos: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dblp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scopus: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_scholar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wikidata: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mastodon: Option<String>,
    pub works: i64,
    pub hq: bool,
}

impl PersonRow {
    /// Flatten a record: the first country and email win, and the
    /// organization reference comes from the current affiliation.
    pub fn from_record(record: &IdentityRecord) -> Self {
        PersonRow {
            id: record.id.clone(),
            name: record.name.clone(),
            country: record.countries.first().cloned(),
            locale: record.locale.clone(),
            org_ref: record.current_org_ref().map(str::to_string),
            email: record.emails.first().cloned(),
            homepage: record.homepage.clone(),
            github: record.xref("github").map(str::to_string),
            wos: record.xref("wos.researcher").map(str::to_string),
            dblp: record.xref("dblp.author").map(str::to_string),
            scopus: record.xref("scopus").map(str::to_string),
            google_scholar: record.xref("google.scholar").map(str::to_string),
            linkedin: record.xref("linkedin").map(str::to_string),
            wikidata: record.xref("wikidata").map(str::to_string),
            mastodon: record.xref("mastodon").map(str::to_string),
            works: record.works.len() as i64,
            hq: record.is_high_quality(),
        }
    }
}

fn row_to_person(row: sqlx::sqlite::SqliteRow) -> PersonRow {
    PersonRow {
        id: row.get("id"),
        name: row.get("name"),
        country: row.get("country"),
        locale: row.get("locale"),
        org_ref: row.get("org_ref"),
        email: row.get("email"),
        homepage: row.get("homepage"),
        github: row.get("github"),
        wos: row.get("wos"),
        dblp: row.get("dblp"),
        scopus: row.get("scopus"),
        google_scholar: row.get("google_scholar"),
        linkedin: row.get("linkedin"),
        wikidata: row.get("wikidata"),
        mastodon: row.get("mastodon"),
        works: row.get("works"),
        hq: row.get("hq"),
    }
}

impl Database {
    /// Insert or replace one person row.
    pub async fn upsert_person(&self, person: &PersonRow) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO person (
                id, name, country, locale, org_ref, email, homepage, github,
                wos, dblp, scopus, google_scholar, linkedin, wikidata,
                mastodon, works, hq
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                country = excluded.country,
                locale = excluded.locale,
                org_ref = excluded.org_ref,
                email = excluded.email,
                homepage = excluded.homepage,
                github = excluded.github,
                wos = excluded.wos,
                dblp = excluded.dblp,
                scopus = excluded.scopus,
                google_scholar = excluded.google_scholar,
                linkedin = excluded.linkedin,
                wikidata = excluded.wikidata,
                mastodon = excluded.mastodon,
                works = excluded.works,
                hq = excluded.hq
            "#,
        )
        .bind(&person.id)
        .bind(&person.name)
        .bind(&person.country)
        .bind(&person.locale)
        .bind(&person.org_ref)
        .bind(&person.email)
        .bind(&person.homepage)
        .bind(&person.github)
        .bind(&person.wos)
        .bind(&person.dblp)
        .bind(&person.scopus)
        .bind(&person.google_scholar)
        .bind(&person.linkedin)
        .bind(&person.wikidata)
        .bind(&person.mastodon)
        .bind(person.works)
        .bind(person.hq)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    /// Look up one person by record identifier.
    pub async fn get_person(&self, id: &str) -> Result<Option<PersonRow>, sqlx::Error> {
        let row = sqlx::query("SELECT * FROM person WHERE id = ?1")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(row.map(row_to_person))
    }

    /// Total person rows, and how many sit in the high quality partition.
    pub async fn count_persons(&self) -> Result<(i64, i64), sqlx::Error> {
        let row = sqlx::query("SELECT COUNT(*) AS total, COALESCE(SUM(hq), 0) AS hq FROM person")
            .fetch_one(self.pool())
            .await?;
        Ok((row.get("total"), row.get("hq")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{Affiliation, AffiliationKind};
    use std::collections::BTreeMap;

    fn sample_record() -> IdentityRecord {
        let mut record =
            IdentityRecord::new("0000-0003-4423-4370".to_string(), "Charles Tapley Hoyt".to_string());
        record.countries = vec!["US".to_string(), "DE".to_string()];
        record.locale = Some("en".to_string());
        record.emails = vec!["cthoyt@gmail.com".to_string()];
        record.homepage = Some("https://cthoyt.com".to_string());
        record.xrefs = BTreeMap::from([
            ("github".to_string(), "cthoyt".to_string()),
            ("dblp.author".to_string(), "152/4358".to_string()),
            ("wos.researcher".to_string(), "O-4269-2019".to_string()),
            ("google.scholar".to_string(), "PjrpzUIAAAAJ".to_string()),
        ]);
        record.works = vec!["36151740".to_string()];
        record.affiliations = vec![Affiliation {
            kind: AffiliationKind::Employment,
            organization: "Northeastern University".to_string(),
            org_ref: Some("04t5xt781".to_string()),
            org_xrefs: BTreeMap::new(),
            role: None,
            start: None,
            end: None,
        }];
        record
    }

    #[test]
    fn test_from_record_flattens_metadata() {
        let person = PersonRow::from_record(&sample_record());
        assert_eq!(person.country.as_deref(), Some("US"));
        assert_eq!(person.org_ref.as_deref(), Some("04t5xt781"));
        assert_eq!(person.github.as_deref(), Some("cthoyt"));
        assert_eq!(person.dblp.as_deref(), Some("152/4358"));
        assert_eq!(person.wos.as_deref(), Some("O-4269-2019"));
        assert_eq!(person.google_scholar.as_deref(), Some("PjrpzUIAAAAJ"));
        assert_eq!(person.works, 1);
        assert!(person.hq);
    }

    #[tokio::test]
    async fn test_upsert_and_get() {
        let db = Database::in_memory().await.unwrap();
        let person = PersonRow::from_record(&sample_record());
        db.upsert_person(&person).await.unwrap();

        let fetched = db.get_person("0000-0003-4423-4370").await.unwrap().unwrap();
        assert_eq!(fetched.name, "Charles Tapley Hoyt");
        assert_eq!(fetched.github.as_deref(), Some("cthoyt"));
        assert_eq!(fetched.works, 1);
        assert!(fetched.hq);

        assert!(db.get_person("0000-0000-0000-0000").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upsert_replaces_existing_row() {
        let db = Database::in_memory().await.unwrap();
        let mut person = PersonRow::from_record(&sample_record());
        db.upsert_person(&person).await.unwrap();

        person.name = "C. T. Hoyt".to_string();
        person.works = 2;
        db.upsert_person(&person).await.unwrap();

        let fetched = db.get_person(&person.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "C. T. Hoyt");
        assert_eq!(fetched.works, 2);
        assert_eq!(db.count_persons().await.unwrap(), (1, 1));
    }
}
