use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

mod commands;
mod error;

use commands::import::DuplicatePolicy;
use error::CliResult;

#[derive(Parser)]
#[command(name = "challenge-catalog")]
#[command(about = "Challenge catalog CLI - Import, export and inspect challenge definitions")]
#[command(version)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a challenge CSV file into a catalog
    Import {
        /// Challenge CSV file
        csv: PathBuf,

        /// Catalog database file (created if missing)
        #[arg(long, required_unless_present = "dry_run")]
        db: Option<PathBuf>,

        /// Successful rows between catalog flushes
        #[arg(long, default_value = "100")]
        checkpoint_interval: usize,

        /// How to resolve identifiers already in the catalog
        #[arg(long, value_enum, default_value = "prompt")]
        on_duplicate: DuplicatePolicy,

        /// Validate against an in-memory catalog without writing the database
        #[arg(long)]
        dry_run: bool,
    },

    /// Export a catalog back to CSV in master index order
    Export {
        /// Catalog database file
        #[arg(long)]
        db: PathBuf,

        /// Output CSV file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Show catalog statistics by difficulty and category
    Stats {
        /// Catalog database file
        #[arg(long)]
        db: PathBuf,
    },
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Import {
            csv,
            db,
            checkpoint_interval,
            on_duplicate,
            dry_run,
        } => commands::import::execute(csv, db, checkpoint_interval, on_duplicate, dry_run),

        Commands::Export { db, output } => commands::export::execute(db, output),

        Commands::Stats { db } => commands::stats::execute(db),
    }
}
