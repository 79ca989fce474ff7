//! Diagnostic report files written alongside each ingest run.
//!
//! Every counter that tracked something unrecognized becomes a ranked
//! TSV so the mapping tables can be grown from real data. Empty
//! counters produce no file.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde_json::json;

use crate::extract::{ranked, KeyedCount};
use crate::pipeline::IngestSummary;

/// Write all diagnostic reports and the run summary into `dir`.
pub fn write_reports(dir: &Path, summary: &IngestSummary) -> Result<()> {
    let diag = &summary.diagnostics;
    write_keyed_counter(&dir.join("unmapped_id_types.tsv"), "id_type", &diag.unmapped_id_types)?;
    write_keyed_counter(&dir.join("unknown_url_names.tsv"), "name", &diag.unknown_url_names)?;
    write_keyed_counter(
        &dir.join("unknown_org_sources.tsv"),
        "source",
        &diag.unknown_org_sources,
    )?;
    write_keyed_counter(
        &dir.join("unresolved_orgs.tsv"),
        "organization",
        &diag.unresolved_orgs,
    )?;
    write_keyed_counter(&dir.join("raw_roles.tsv"), "role", &diag.raw_roles)?;
    write_plain_counter(&dir.join("typed_refs.tsv"), "prefix", &diag.typed_refs)?;
    write_run_summary(&dir.join("run_summary.json"), summary)?;
    Ok(())
}

fn write_keyed_counter(
    path: &Path,
    key_header: &str,
    map: &HashMap<String, KeyedCount>,
) -> Result<()> {
    if map.is_empty() {
        return Ok(());
    }
    let mut file = BufWriter::new(
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?,
    );
    writeln!(file, "{key_header}\tcount\texample")?;
    for (_, entry) in ranked(map) {
        writeln!(file, "{}\t{}\t{}", entry.display, entry.count, entry.example)?;
    }
    file.flush()?;
    Ok(())
}

fn write_plain_counter(
    path: &Path,
    key_header: &str,
    map: &HashMap<String, u64>,
) -> Result<()> {
    if map.is_empty() {
        return Ok(());
    }
    let mut rows: Vec<(&String, &u64)> = map.iter().collect();
    rows.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

    let mut file = BufWriter::new(
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?,
    );
    writeln!(file, "{key_header}\tcount")?;
    for (key, count) in rows {
        writeln!(file, "{key}\t{count}")?;
    }
    file.flush()?;
    Ok(())
}

fn write_run_summary(path: &Path, summary: &IngestSummary) -> Result<()> {
    let body = json!({
        "finished_at": Utc::now().to_rfc3339(),
        "documents": summary.documents,
        "records": summary.records,
        "high_quality": summary.high_quality,
        "terms": summary.terms,
        "nameless_documents": summary.diagnostics.nameless_documents,
        "missing_id_documents": summary.diagnostics.missing_id_documents,
        "malformed_documents": summary.diagnostics.malformed_documents,
    });
    let mut file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    writeln!(file, "{}", serde_json::to_string_pretty(&body)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::Diagnostics;
    use std::fs;
    use std::path::PathBuf;

    fn test_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("onoma-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn sample_summary() -> IngestSummary {
        let mut diag = Diagnostics::default();
        diag.record_unmapped_id_type("researcherid".to_string(), "ResearcherID", "A-1000-2008");
        diag.record_raw_role("Wizard".to_string(), "0000-0001-0000-0001");
        diag.record_raw_role("Wizard".to_string(), "0000-0001-0000-0002");
        diag.record_raw_role("Bard".to_string(), "0000-0001-0000-0003");
        diag.record_typed_ref("github");
        diag.record_typed_ref("github");
        diag.record_typed_ref("scopus");
        diag.nameless_documents = 4;

        IngestSummary {
            documents: 10,
            records: 6,
            high_quality: 2,
            terms: 48,
            diagnostics: diag,
        }
    }

    #[test]
    fn test_reports_are_written_and_ranked() {
        let dir = test_dir("reports");
        write_reports(&dir, &sample_summary()).unwrap();

        let roles = fs::read_to_string(dir.join("raw_roles.tsv")).unwrap();
        let lines: Vec<&str> = roles.lines().collect();
        assert_eq!(lines[0], "role\tcount\texample");
        assert_eq!(lines[1], "Wizard\t2\t0000-0001-0000-0001");
        assert_eq!(lines[2], "Bard\t1\t0000-0001-0000-0003");

        let refs = fs::read_to_string(dir.join("typed_refs.tsv")).unwrap();
        assert_eq!(refs, "prefix\tcount\ngithub\t2\nscopus\t1\n");

        let body: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.join("run_summary.json")).unwrap())
                .unwrap();
        assert_eq!(body["documents"], 10);
        assert_eq!(body["nameless_documents"], 4);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_empty_counters_produce_no_files() {
        let dir = test_dir("reports-empty");
        write_reports(&dir, &IngestSummary::default()).unwrap();

        assert!(!dir.join("raw_roles.tsv").exists());
        assert!(!dir.join("unmapped_id_types.tsv").exists());
        assert!(dir.join("run_summary.json").exists());

        fs::remove_dir_all(&dir).unwrap();
    }
}
