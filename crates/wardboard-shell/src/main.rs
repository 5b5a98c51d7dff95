//! Interactive shell for wardboard.
//!
//! Presentation glue only: renders the core's screen models, maps line
//! commands to their actions, and owns every confirmation prompt and alert.

mod repl;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use wardboard_core::Database;

/// Hospital ward tracker: room occupancy, admissions and research forms.
#[derive(Parser, Debug)]
#[command(name = "wardboard", version, about)]
struct Args {
    /// Path to the ward database (created on first run)
    #[arg(long, default_value = "wardboard.db")]
    db: std::path::PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let db = Database::open(&args.db)
        .with_context(|| format!("failed to open ward database at {}", args.db.display()))?;

    repl::run(db)
}
