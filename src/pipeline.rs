//! End-to-end ingest: stream a registry dump, extract identity records,
//! and materialize the term index, person table, record files, and
//! diagnostic reports.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use futures::stream::{self, StreamExt};
use tracing::info;

use crate::db::{Database, PersonRow};
use crate::extract::{Diagnostics, Extractor};
use crate::lexical::{record_to_terms, Term};
use crate::records::IdentityRecord;
use crate::reports;
use crate::TARGET_INDEX;

/// Default number of terms buffered before a batch insert.
pub const TERM_BATCH_SIZE: usize = 5000;

/// Progress is logged every this many documents.
const PROGRESS_INTERVAL: u64 = 100_000;

#[derive(Debug, Clone)]
pub struct IngestOptions {
    /// JSONL dump to ingest, gzip-compressed when the extension is gz.
    pub dump_path: PathBuf,
    /// Directory for record files and reports.
    pub output_dir: PathBuf,
    /// Registry name stamped on every term.
    pub source: String,
    /// Concurrent extraction tasks.
    pub workers: usize,
    /// Terms buffered per insert transaction.
    pub batch_size: usize,
    /// Stop after this many documents, for sampled runs.
    pub head: Option<usize>,
}

/// What one ingest run produced.
#[derive(Debug, Clone, Default)]
pub struct IngestSummary {
    /// Dump lines consumed, including skipped ones.
    pub documents: u64,
    /// Records extracted.
    pub records: u64,
    /// Records in the high quality partition.
    pub high_quality: u64,
    /// Term rows written.
    pub terms: u64,
    pub diagnostics: Diagnostics,
}

/// Run a full ingest. Any previously indexed data is cleared first.
pub async fn ingest(
    db: &Database,
    extractor: Arc<Extractor>,
    options: &IngestOptions,
) -> Result<IngestSummary> {
    info!(
        target: TARGET_INDEX,
        dump = %options.dump_path.display(),
        workers = options.workers,
        "Starting ingest"
    );

    db.clear().await.context("failed to clear existing index")?;
    fs::create_dir_all(&options.output_dir).with_context(|| {
        format!(
            "failed to create output directory {}",
            options.output_dir.display()
        )
    })?;

    let mut records_sink = RecordSink::create(options.output_dir.join("records.jsonl.gz"))?;
    let mut hq_sink = RecordSink::create(options.output_dir.join("records_hq.jsonl.gz"))?;

    let reader = open_dump(&options.dump_path)?;
    let lines = reader
        .lines()
        .filter(|line| line.as_ref().map_or(true, |l| !l.trim().is_empty()))
        .take(options.head.unwrap_or(usize::MAX));

    let mut results = stream::iter(lines)
        .map(|line| {
            let extractor = Arc::clone(&extractor);
            tokio::spawn(async move {
                let line = line?;
                let mut diag = Diagnostics::default();
                let record = extractor.extract_line(&line, &mut diag);
                Ok::<_, std::io::Error>((record, diag))
            })
        })
        .buffered(options.workers.max(1));

    let mut summary = IngestSummary::default();
    let mut batch: Vec<(Term, bool)> = Vec::with_capacity(options.batch_size);
    while let Some(joined) = results.next().await {
        let (record, diag) = joined
            .context("extraction worker panicked")?
            .context("failed to read dump")?;
        summary.documents += 1;
        summary.diagnostics.merge(diag);

        if let Some(record) = record {
            summary.records += 1;
            let high_quality = record.is_high_quality();
            records_sink.write(&record)?;
            if high_quality {
                summary.high_quality += 1;
                hq_sink.write(&record)?;
            }

            db.upsert_person(&PersonRow::from_record(&record))
                .await
                .context("failed to write person row")?;

            for term in record_to_terms(&record, &options.source) {
                batch.push((term, high_quality));
            }
            if batch.len() >= options.batch_size {
                summary.terms += db
                    .insert_terms(&batch)
                    .await
                    .context("failed to write term batch")?;
                batch.clear();
            }
        }

        if summary.documents % PROGRESS_INTERVAL == 0 {
            info!(
                target: TARGET_INDEX,
                documents = summary.documents,
                records = summary.records,
                terms = summary.terms,
                "Ingest progress"
            );
        }
    }

    if !batch.is_empty() {
        summary.terms += db
            .insert_terms(&batch)
            .await
            .context("failed to write term batch")?;
    }

    let written = records_sink.finish()?;
    let hq_written = hq_sink.finish()?;
    reports::write_reports(&options.output_dir, &summary)?;

    info!(
        target: TARGET_INDEX,
        documents = summary.documents,
        records = written,
        high_quality = hq_written,
        terms = summary.terms,
        "Ingest complete"
    );
    Ok(summary)
}

/// Open a dump for line-by-line reading, decompressing when the file
/// extension says gz.
fn open_dump(path: &Path) -> Result<Box<dyn BufRead + Send>> {
    let file =
        File::open(path).with_context(|| format!("failed to open dump {}", path.display()))?;
    if path.extension().map_or(false, |e| e == "gz") {
        Ok(Box::new(BufReader::new(GzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Read an extracted record file back into memory.
pub fn read_records(path: &Path) -> Result<Vec<IdentityRecord>> {
    let reader = open_dump(path)?;
    let mut records = Vec::new();
    for line in reader.lines() {
        let line = line.with_context(|| format!("failed to read {}", path.display()))?;
        if line.trim().is_empty() {
            continue;
        }
        records.push(
            serde_json::from_str(&line)
                .with_context(|| format!("malformed record in {}", path.display()))?,
        );
    }
    Ok(records)
}

/// Streaming gzip JSONL writer for extracted records.
struct RecordSink {
    writer: BufWriter<GzEncoder<File>>,
    path: PathBuf,
    written: u64,
}

impl RecordSink {
    fn create(path: PathBuf) -> Result<Self> {
        let file =
            File::create(&path).with_context(|| format!("failed to create {}", path.display()))?;
        let encoder = GzEncoder::new(file, Compression::default());
        Ok(RecordSink {
            writer: BufWriter::new(encoder),
            path,
            written: 0,
        })
    }

    fn write(&mut self, record: &IdentityRecord) -> Result<()> {
        serde_json::to_writer(&mut self.writer, record)
            .with_context(|| format!("failed to write record to {}", self.path.display()))?;
        self.writer.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    fn finish(self) -> Result<u64> {
        let encoder = self.writer.into_inner().map_err(|e| e.into_error())?;
        encoder
            .finish()
            .with_context(|| format!("failed to finish {}", self.path.display()))?;
        Ok(self.written)
    }
}
