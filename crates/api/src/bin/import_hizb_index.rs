//! Loads hizb boundaries into `hizb_index`.
//!
//! The table is cleared and refilled in a single transaction.

use anyhow::{bail, Context, Result};
use clap::Parser;
use domain::services::{ensure_rows, parse_hizb_index};
use persistence::db::{create_pool, DatabaseConfig};
use persistence::repositories::HizbIndexRepository;
use selka_api::middleware::logging::init_console_logging;
use tracing::info;

/// Import the hizb boundary index.
#[derive(Parser)]
#[command(name = "import-hizb-index")]
#[command(author, version, about)]
struct Args {
    /// JSON file mapping keys to {hizb_number, first_verse_key, last_verse_key}
    #[arg(default_value = "data/hizb.json")]
    file: String,

    /// PostgreSQL URL with write access to the reference tables
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: Option<String>,
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
    let rows = parse_hizb_index(&content)?;
    info!(rows = rows.len(), "Parsed hizb index");

    ensure_rows(&rows, "hizb entry")
        .with_context(|| format!("Nothing to import from {}", args.file))?;

    let (Some(first), Some(last)) = (rows.first(), rows.last()) else {
        bail!("No hizb entry in {}", args.file);
    };
    info!(
        first_hizb = first.hizb,
        first_verse = %first.start(),
        last_hizb = last.hizb,
        last_verse = %last.end(),
        "Index bounds"
    );

    let pool = create_pool(&DatabaseConfig::for_job(database_url)).await?;
    let written = HizbIndexRepository::new(pool)
        .replace_all(&rows)
        .await
        .context("Failed to replace hizb_index")?;

    info!(written, "hizb_index imported");
    Ok(())
}
