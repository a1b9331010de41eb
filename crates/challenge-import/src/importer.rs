use crate::{CancellationToken, Catalog, ImportConfig, ImportConfigError, ImportError};
use challenge_csvs::{decode_row, parse_table, ChallengeRecord};
use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Caller's answer when a row's identifier already exists in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateDecision {
    /// Replace the existing entry with the new row
    Overwrite,
    /// Stop the run as `Aborted`, leaving the existing entry untouched
    Abort,
    /// Stop the run as `Cancelled` without persisting the row
    Cancel,
}

/// Terminal state of an import run
#[derive(Debug)]
pub enum ImportState {
    Completed,
    Cancelled,
    Aborted(ImportError),
}

impl ImportState {
    pub fn is_completed(&self) -> bool {
        matches!(self, ImportState::Completed)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ImportState::Cancelled)
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, ImportState::Aborted(_))
    }
}

/// Report produced by [`ChallengeImporter::run`]
#[derive(Debug)]
pub struct ImportOutcome {
    /// Data rows in the file (0 when the text could not be parsed)
    pub total: usize,
    /// Rows the run started processing
    pub seen: usize,
    /// Rows persisted and registered in the master index
    pub succeeded: usize,
    /// Successful rows covered by a catalog flush
    pub checkpointed: usize,
    /// Rows not reached because the run was cancelled
    pub skipped_by_cancellation: usize,
    pub elapsed: Duration,
    pub state: ImportState,
}

impl ImportOutcome {
    /// Error that aborted the run, if any
    pub fn error(&self) -> Option<&ImportError> {
        match &self.state {
            ImportState::Aborted(e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for ImportOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.state {
            ImportState::Completed => write!(
                f,
                "Import completed: {} of {} rows imported in {:.2?}",
                self.succeeded, self.total, self.elapsed
            ),
            ImportState::Cancelled => write!(
                f,
                "Import cancelled: {} of {} rows imported, {} skipped",
                self.succeeded, self.total, self.skipped_by_cancellation
            ),
            ImportState::Aborted(e) => write!(
                f,
                "Import aborted: {} ({} of {} rows imported before the failure)",
                e, self.succeeded, self.total
            ),
        }
    }
}

#[derive(Debug, Default)]
struct RunCounts {
    total: usize,
    seen: usize,
    succeeded: usize,
    checkpointed: usize,
    skipped_by_cancellation: usize,
    /// Set when the catalog holds a half-written row or a flush already failed
    flush_blocked: bool,
}

enum RowsEnd {
    Finished,
    Cancelled,
}

/// Drives tokenizing, decoding and persistence of one challenge file
#[derive(Debug, Clone, Default)]
pub struct ChallengeImporter {
    config: ImportConfig,
}

impl ChallengeImporter {
    /// Create a new importer with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new importer with custom configuration
    pub fn with_config(config: ImportConfig) -> Result<Self, ImportConfigError> {
        if config.checkpoint_interval == 0 {
            return Err(ImportConfigError::ZeroCheckpointInterval);
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// Import every data row of `text` into `catalog`.
    ///
    /// Rows are processed in file order and the first failing row ends the run.
    /// `on_duplicate` is asked about each row whose identifier the catalog already
    /// holds, `on_progress(ordinal, total, identifier)` is called after each
    /// persisted row, and `cancellation` is polled before each row.
    pub fn run<C, D, P, T>(
        &self,
        text: &str,
        catalog: &mut C,
        mut on_duplicate: D,
        mut on_progress: P,
        cancellation: &T,
    ) -> ImportOutcome
    where
        C: Catalog,
        D: FnMut(&ChallengeRecord) -> DuplicateDecision,
        P: FnMut(usize, usize, &str),
        T: CancellationToken + ?Sized,
    {
        let started = Instant::now();
        let mut counts = RunCounts::default();
        info!(
            "Starting challenge import (checkpoint interval {})",
            self.config.checkpoint_interval
        );

        let state = match self.import_rows(
            text,
            catalog,
            &mut on_duplicate,
            &mut on_progress,
            cancellation,
            &mut counts,
        ) {
            Ok(RowsEnd::Finished) => ImportState::Completed,
            Ok(RowsEnd::Cancelled) => ImportState::Cancelled,
            Err(e) => ImportState::Aborted(e),
        };
        let state = self.final_flush(catalog, state, &mut counts);

        let outcome = ImportOutcome {
            total: counts.total,
            seen: counts.seen,
            succeeded: counts.succeeded,
            checkpointed: counts.checkpointed,
            skipped_by_cancellation: counts.skipped_by_cancellation,
            elapsed: started.elapsed(),
            state,
        };

        match &outcome.state {
            ImportState::Aborted(e) => warn!("Import aborted: {}", e),
            _ => info!("{}", outcome),
        }
        outcome
    }

    fn import_rows<C, D, P, T>(
        &self,
        text: &str,
        catalog: &mut C,
        on_duplicate: &mut D,
        on_progress: &mut P,
        cancellation: &T,
        counts: &mut RunCounts,
    ) -> Result<RowsEnd, ImportError>
    where
        C: Catalog,
        D: FnMut(&ChallengeRecord) -> DuplicateDecision,
        P: FnMut(usize, usize, &str),
        T: CancellationToken + ?Sized,
    {
        let table = parse_table(text)?;
        if table.is_empty() {
            return Err(ImportError::NoDataRows);
        }
        counts.total = table.len();

        let unknown = table.unknown_columns();
        if !unknown.is_empty() {
            warn!("Ignoring unknown columns: {}", unknown.join(", "));
        }
        info!("Parsed {} data rows, importing", counts.total);

        let mut imported: HashMap<String, usize> = HashMap::new();

        for (index, raw) in table.rows().iter().enumerate() {
            let ordinal = index + 1;

            if cancellation.is_cancelled() {
                info!("Import cancelled before row {}", ordinal);
                counts.skipped_by_cancellation = counts.total - counts.seen;
                return Ok(RowsEnd::Cancelled);
            }
            counts.seen += 1;

            let record = decode_row(&table.row_map(raw), ordinal)?;

            if let Some(&first_ordinal) = imported.get(&record.identifier) {
                return Err(ImportError::DuplicateInFile {
                    ordinal,
                    identifier: record.identifier,
                    first_ordinal,
                });
            }

            if catalog
                .exists(&record.identifier)
                .map_err(|e| catalog_failure(ordinal, e))?
            {
                match on_duplicate(&record) {
                    DuplicateDecision::Overwrite => {
                        debug!("Row {}: overwriting '{}'", ordinal, record.identifier);
                    }
                    DuplicateDecision::Abort => {
                        return Err(ImportError::DuplicateRejected {
                            ordinal,
                            identifier: record.identifier,
                        });
                    }
                    DuplicateDecision::Cancel => {
                        info!("Import cancelled at duplicate '{}'", record.identifier);
                        counts.skipped_by_cancellation = counts.total - counts.seen;
                        return Ok(RowsEnd::Cancelled);
                    }
                }
            }

            let handle = catalog
                .create(&record)
                .map_err(|e| catalog_failure(ordinal, e))?;
            if let Err(e) = catalog.add_to_index(&handle) {
                // the record is stored but unregistered; flushing would persist it
                counts.flush_blocked = true;
                return Err(catalog_failure(ordinal, e));
            }

            counts.succeeded += 1;
            on_progress(ordinal, counts.total, &record.identifier);
            imported.insert(record.identifier, ordinal);

            if counts.succeeded - counts.checkpointed >= self.config.checkpoint_interval {
                if let Err(e) = catalog.flush() {
                    counts.flush_blocked = true;
                    return Err(catalog_failure(ordinal, e));
                }
                counts.checkpointed = counts.succeeded;
                info!(
                    "Checkpoint: {} of {} rows flushed",
                    counts.checkpointed, counts.total
                );
            }
        }

        Ok(RowsEnd::Finished)
    }

    /// Flush successes not yet covered by a checkpoint.
    ///
    /// Also runs after `exists` or `create` failures, since nothing of the failing
    /// row was written. Skipped after a failed `add_to_index` or flush. A failing
    /// flush turns a completed or cancelled run into `Aborted`; an earlier abort
    /// reason is kept.
    fn final_flush<C: Catalog>(
        &self,
        catalog: &mut C,
        state: ImportState,
        counts: &mut RunCounts,
    ) -> ImportState {
        if counts.succeeded == counts.checkpointed {
            return state;
        }
        if counts.flush_blocked {
            warn!(
                "Skipping final flush; {} rows since the last checkpoint are not durable",
                counts.succeeded - counts.checkpointed
            );
            return state;
        }

        match catalog.flush() {
            Ok(()) => {
                counts.checkpointed = counts.succeeded;
                debug!("Final flush: {} rows durable", counts.checkpointed);
                state
            }
            Err(e) => match state {
                ImportState::Aborted(reason) => {
                    warn!("Final flush failed after abort: {}", e);
                    ImportState::Aborted(reason)
                }
                _ => ImportState::Aborted(catalog_failure(counts.seen, e)),
            },
        }
    }
}

fn catalog_failure<E>(ordinal: usize, error: E) -> ImportError
where
    E: std::error::Error + Send + Sync + 'static,
{
    ImportError::Catalog {
        ordinal,
        source: Box::new(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NeverCancel;
    use challenge_db::ChallengeDatabase;

    const HEADER: &str = "identifier,name,difficulty,category,question,answerKind,answers,rewards";

    fn never_duplicate(_: &ChallengeRecord) -> DuplicateDecision {
        panic!("no duplicate expected")
    }

    #[test]
    fn test_zero_checkpoint_interval_rejected() {
        let result = ChallengeImporter::with_config(ImportConfig {
            checkpoint_interval: 0,
        });
        assert_eq!(result.unwrap_err(), ImportConfigError::ZeroCheckpointInterval);
        assert_eq!(ChallengeImporter::new().config().checkpoint_interval, 100);
    }

    #[test]
    fn test_imports_into_database() {
        let text = format!(
            "{HEADER}\n\
             q1,Add,Easy,Math,1+1=?,Number,2,\n\
             q2,Greet,,Quiz,\"Say \"\"hi\"\"\",Text,hi|Hi,\"[{{\"\"itemId\"\":\"\"wood\"\"}}]\"\n"
        );
        let mut db = ChallengeDatabase::create_in_memory().unwrap();
        let mut progress = Vec::new();

        let outcome = ChallengeImporter::new().run(
            &text,
            &mut db,
            never_duplicate,
            |ordinal, total, id: &str| progress.push((ordinal, total, id.to_string())),
            &NeverCancel,
        );

        assert!(outcome.state.is_completed(), "{}", outcome);
        assert_eq!((outcome.total, outcome.seen, outcome.succeeded), (2, 2, 2));
        assert_eq!(outcome.checkpointed, 2);
        assert_eq!(
            progress,
            vec![(1, 2, "q1".to_string()), (2, 2, "q2".to_string())]
        );
        assert!(!db.has_pending_writes());

        let q2 = db.read_challenge("q2").unwrap().unwrap();
        assert_eq!(q2.question, "Say \"hi\"");
        assert_eq!(q2.rewards.len(), 1);
        assert_eq!(q2.rewards[0].drop_rate, 0.5);
        assert_eq!(db.challenge_count().unwrap(), 2);
    }

    #[test]
    fn test_header_only_is_no_data_rows() {
        let mut db = ChallengeDatabase::create_in_memory().unwrap();
        let outcome = ChallengeImporter::new().run(
            &format!("{HEADER}\n"),
            &mut db,
            never_duplicate,
            |_, _, _: &str| {},
            &NeverCancel,
        );

        assert!(matches!(outcome.error(), Some(ImportError::NoDataRows)));
        assert_eq!(outcome.total, 0);
        assert_eq!(db.challenge_count().unwrap(), 0);
    }

    #[test]
    fn test_outcome_display() {
        let mut db = ChallengeDatabase::create_in_memory().unwrap();
        let outcome = ChallengeImporter::new().run(
            "identifier,name,question,answers\nq1,Add,1+1=?,|\n",
            &mut db,
            never_duplicate,
            |_, _, _: &str| {},
            &NeverCancel,
        );

        assert_eq!(
            outcome.to_string(),
            "Import aborted: row 1: answers has no non-empty entries \
             (0 of 1 rows imported before the failure)"
        );
    }
}
