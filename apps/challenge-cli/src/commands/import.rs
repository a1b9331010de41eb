use crate::error::{CliError, CliResult};
use challenge_csvs::ChallengeRecord;
use challenge_db::ChallengeDatabase;
use challenge_import::{
    ChallengeImporter, DuplicateDecision, ImportConfig, ImportOutcome, ImportState,
};
use clap::ValueEnum;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{debug, info};

/// How to resolve rows whose identifier is already in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DuplicatePolicy {
    /// Ask on the terminal for each duplicate
    Prompt,
    /// Replace existing challenges
    Overwrite,
    /// Stop at the first duplicate
    Abort,
}

pub fn execute(
    csv_in: PathBuf,
    db_path: Option<PathBuf>,
    checkpoint_interval: usize,
    on_duplicate: DuplicatePolicy,
    dry_run: bool,
) -> CliResult<()> {
    println!("Importing challenges from {}", csv_in.display());

    let importer = ChallengeImporter::with_config(ImportConfig {
        checkpoint_interval,
    })?;
    let text = std::fs::read_to_string(&csv_in)?;

    let mut catalog = match (dry_run, &db_path) {
        (true, _) => {
            println!("Dry run: validating against an empty in-memory catalog");
            ChallengeDatabase::create_in_memory()?
        }
        (false, Some(path)) => {
            println!("Catalog: {}", path.display());
            ChallengeDatabase::open_or_create(path)?
        }
        (false, None) => {
            return Err(CliError::InvalidConfig(
                "--db is required unless --dry-run is given".to_string(),
            ))
        }
    };

    // first SIGINT requests cancellation, a second one terminates
    let cancel = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register_conditional_shutdown(
        signal_hook::consts::SIGINT,
        1,
        Arc::clone(&cancel),
    )?;
    signal_hook::flag::register(signal_hook::consts::SIGINT, Arc::clone(&cancel))?;
    debug!("SIGINT requests cancellation after the current row");

    let stdin = io::stdin();
    let outcome = importer.run(
        &text,
        &mut catalog,
        |record| match on_duplicate {
            DuplicatePolicy::Overwrite => DuplicateDecision::Overwrite,
            DuplicatePolicy::Abort => DuplicateDecision::Abort,
            DuplicatePolicy::Prompt => {
                prompt_decision(&mut stdin.lock(), &mut io::stdout(), record)
            }
        },
        |ordinal, total, identifier: &str| println!("[{}/{}] {}", ordinal, total, identifier),
        &cancel,
    );

    report(&outcome);

    match outcome.state {
        ImportState::Aborted(e) => Err(CliError::ImportAborted(e.to_string())),
        _ => {
            if !dry_run {
                info!("Catalog now holds {} challenges", catalog.challenge_count()?);
            }
            Ok(())
        }
    }
}

fn report(outcome: &ImportOutcome) {
    println!();
    println!("{}", outcome);
    println!(
        "Rows: {} total, {} seen, {} imported, {} checkpointed",
        outcome.total, outcome.seen, outcome.succeeded, outcome.checkpointed
    );
    if outcome.skipped_by_cancellation > 0 {
        println!("Skipped by cancellation: {}", outcome.skipped_by_cancellation);
    }

    if let Some(error) = outcome.error() {
        match (error.ordinal(), error.line()) {
            (Some(ordinal), _) => println!("Failed at row {}:", ordinal),
            (None, Some(line)) => println!("Failed at line {}:", line),
            (None, None) => println!("Failed:"),
        }
        for message in error.messages() {
            println!("  - {}", message);
        }
    }
}

/// Ask whether to overwrite `record`'s existing catalog entry.
///
/// End of input counts as abort.
fn prompt_decision<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    record: &ChallengeRecord,
) -> DuplicateDecision {
    loop {
        // prompt write failures fall through to reading the answer
        let _ = write!(
            output,
            "Challenge '{}' ({}) already exists. Overwrite? [y]es / [n]o, abort / [c]ancel: ",
            record.identifier, record.name
        );
        let _ = output.flush();

        let mut answer = String::new();
        match input.read_line(&mut answer) {
            Ok(0) | Err(_) => return DuplicateDecision::Abort,
            Ok(_) => {}
        }

        if let Some(decision) = parse_decision(&answer) {
            return decision;
        }
    }
}

fn parse_decision(answer: &str) -> Option<DuplicateDecision> {
    match answer.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(DuplicateDecision::Overwrite),
        "n" | "no" => Some(DuplicateDecision::Abort),
        "c" | "cancel" => Some(DuplicateDecision::Cancel),
        _ => None,
    }
}
