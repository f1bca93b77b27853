//! Loads the Arabic verse text into `quran_ayahs`.
//!
//! Input is a Tanzil `surah|ayah|text` export. Rows are upserted in batches
//! keyed by `(surah, ayah)`, so the import can be re-run safely.

use anyhow::{bail, Context, Result};
use clap::Parser;
use domain::services::{ensure_rows, parse_quran_text};
use persistence::db::{create_pool, DatabaseConfig};
use persistence::repositories::QuranAyahRepository;
use selka_api::middleware::logging::init_console_logging;
use tracing::info;

/// Import the Quran verse text.
#[derive(Parser)]
#[command(name = "import-quran-text")]
#[command(author, version, about)]
struct Args {
    /// Pipe-delimited text file
    #[arg(default_value = "data/tanzil-uthmani-min.txt")]
    file: String,

    /// PostgreSQL URL with write access to the reference tables
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: Option<String>,

    /// Rows per upsert statement
    #[arg(long, default_value_t = 500, value_parser = clap::value_parser!(u64).range(1..))]
    batch_size: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    init_console_logging("info");

    let Some(database_url) = args.database_url else {
        bail!("Missing database URL: pass --database-url or set DATABASE_URL");
    };

    let content = std::fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file))?;
    let parsed = parse_quran_text(&content);

    info!(
        lines = parsed.lines,
        rows = parsed.rows.len(),
        skipped = parsed.skipped(),
        "Parsed verse text"
    );
    ensure_rows(&parsed.rows, "verse")
        .with_context(|| format!("Nothing to import from {}", args.file))?;

    let pool = create_pool(&DatabaseConfig::for_job(database_url)).await?;
    let repo = QuranAyahRepository::new(pool);

    let total = parsed.rows.len();
    let mut done = 0;
    for (index, batch) in parsed.rows.chunks(args.batch_size as usize).enumerate() {
        repo.upsert_batch(batch)
            .await
            .with_context(|| format!("Upsert failed on batch {}", index))?;
        done += batch.len();
        info!("Upserted {} / {}", done, total);
    }

    info!("Import finished");
    Ok(())
}
