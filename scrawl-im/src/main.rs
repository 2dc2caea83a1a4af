//! scrawl-im - Legacy Store Import
//!
//! One-time migration of a Scrawl Classic library into the active Scrawl
//! store. Run at first launch (the application calls the same service), or
//! manually with `--force` to re-check a library; already-imported projects
//! are skipped by name.

use anyhow::Result;
use clap::Parser;
use scrawl_im::ImportService;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "scrawl-im", about = "Import a Scrawl Classic library into the Scrawl store")]
struct Args {
    /// Root folder holding the Scrawl database
    #[arg(long)]
    root_folder: Option<String>,

    /// Path to the Scrawl Classic store (defaults to the platform location)
    #[arg(long)]
    legacy_store: Option<String>,

    /// Run even if an import was already performed
    #[arg(long)]
    force: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();
    info!("Starting scrawl-im (Legacy Store Import)");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let root_folder = scrawl_common::config::resolve_root_folder(args.root_folder.as_deref());
    let db_path = scrawl_common::config::database_path(&root_folder);
    info!("Database: {}", db_path.display());

    let pool = scrawl_common::db::init_database(&db_path).await?;

    let legacy_path = args
        .legacy_store
        .map(PathBuf::from)
        .or_else(|| {
            scrawl_common::config::load_toml_config()
                .ok()
                .and_then(|c| c.legacy_store_path.map(PathBuf::from))
        })
        .unwrap_or_else(scrawl_im::legacy::default_store_path);
    info!("Legacy store: {}", legacy_path.display());

    let service = ImportService::new(pool.clone(), legacy_path);

    if !args.force && !service.should_import().await {
        info!("Nothing to import (already performed, or no legacy store present)");
        return Ok(());
    }

    let succeeded = service.execute_import().await;

    if let Some(raw) = scrawl_common::db::settings::get_last_import_report(&pool).await? {
        match serde_json::from_str::<scrawl_im::import::ImportReport>(&raw) {
            Ok(report) => println!("{}", report.render()),
            Err(_) => println!("{}", raw),
        }
    }

    if !succeeded {
        anyhow::bail!("import failed; the library can be retried on the next run");
    }
    Ok(())
}
