use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use onoma::db::Database;
use onoma::extract::Extractor;
use onoma::lexical::{Grounder, Partition};
use onoma::pipeline::{self, IngestOptions};
use onoma::{environment, logging};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::main;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index from a registry dump
    Build {
        /// JSONL dump to ingest (decompressed when the extension is .gz)
        #[arg(short, long)]
        dump: PathBuf,

        /// Directory for record files and reports
        #[arg(short, long, default_value = "output")]
        output: PathBuf,

        /// Registry name stamped on every term
        #[arg(short, long, default_value = "registry")]
        source: String,

        /// Concurrent extraction tasks
        #[arg(short, long)]
        workers: Option<usize>,

        /// Terms buffered per insert transaction
        #[arg(short, long)]
        batch_size: Option<usize>,

        /// Stop after this many documents
        #[arg(long)]
        head: Option<usize>,
    },

    /// Ground a name against the index
    Ground {
        /// Name to look up
        name: String,

        /// Only consider records with external evidence
        #[arg(long)]
        hq: bool,

        /// Print a match only when the name maps to a single identity
        #[arg(long)]
        unambiguous: bool,
    },

    /// Show the stored metadata for one record
    Metadata {
        /// Record identifier
        id: String,
    },

    /// Display index statistics
    Stats,
}

#[main]
async fn main() -> Result<()> {
    logging::configure_logging();

    let cli = Cli::parse();
    let database_path = environment::database_path();

    match cli.command {
        Commands::Build {
            dump,
            output,
            source,
            workers,
            batch_size,
            head,
        } => {
            let db = Database::new(&database_path)
                .await
                .context("Failed to open database")?;
            let options = IngestOptions {
                dump_path: dump,
                output_dir: output,
                source,
                workers: workers.unwrap_or_else(environment::worker_count),
                batch_size: batch_size.unwrap_or_else(environment::term_batch_size),
                head,
            };
            let summary = pipeline::ingest(&db, Arc::new(Extractor::new()), &options).await?;
            println!(
                "Indexed {} records ({} high quality) from {} documents: {} terms",
                summary.records, summary.high_quality, summary.documents, summary.terms
            );
        }

        Commands::Ground {
            name,
            hq,
            unambiguous,
        } => {
            let db = Database::open(&database_path)
                .await
                .context("Failed to open database; build the index first")?;
            let partition = if hq {
                Partition::HighQuality
            } else {
                Partition::Complete
            };
            let grounder = Grounder::new(db).with_partition(partition);

            if unambiguous {
                match grounder.ground_unambiguous(&name).await? {
                    Some(matched) => {
                        println!("{}\t{}", matched.record_id, matched.term.entry_name)
                    }
                    None => println!("no unambiguous match"),
                }
            } else {
                let matches = grounder.ground(&name).await?;
                if matches.is_empty() {
                    println!("no matches");
                }
                for matched in matches {
                    println!(
                        "{}\t{}\t{}",
                        matched.record_id, matched.term.entry_name, matched.term.text
                    );
                }
            }
        }

        Commands::Metadata { id } => {
            let db = Database::open(&database_path)
                .await
                .context("Failed to open database; build the index first")?;
            match db.get_person(&id).await? {
                Some(person) => println!("{}", serde_json::to_string_pretty(&person)?),
                None => println!("no record with id {}", id),
            }
        }

        Commands::Stats => {
            let db = Database::open(&database_path)
                .await
                .context("Failed to open database; build the index first")?;
            let (persons, hq_persons) = db.count_persons().await?;
            let (terms, hq_terms) = db.count_terms().await?;
            let keys = db.count_keys().await?;
            println!("persons: {} ({} high quality)", persons, hq_persons);
            println!("terms: {} ({} high quality)", terms, hq_terms);
            println!("distinct keys: {}", keys);
        }
    }

    Ok(())
}
