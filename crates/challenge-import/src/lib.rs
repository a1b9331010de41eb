/*!
# Challenge Batch Importer

Fail-fast batch import of challenge definition files into a catalog, with
duplicate resolution, cooperative cancellation and checkpointed flushes.

## Quick Start

```rust
use challenge_db::ChallengeDatabase;
use challenge_import::{ChallengeImporter, DuplicateDecision, NeverCancel};

# fn example() -> Result<(), Box<dyn std::error::Error>> {
let text = "identifier,name,question,answers\nq1,Add,1+1=?,2\n";
let mut catalog = ChallengeDatabase::create_in_memory()?;

let outcome = ChallengeImporter::new().run(
    text,
    &mut catalog,
    |_record| DuplicateDecision::Overwrite,
    |ordinal, total, identifier: &str| println!("[{}/{}] {}", ordinal, total, identifier),
    &NeverCancel,
);

assert!(outcome.state.is_completed());
assert_eq!(outcome.succeeded, 1);
# Ok(())
# }
# example().unwrap();
```

## Custom Configuration

```rust
# use challenge_import::{ChallengeImporter, ImportConfig};
let config = ImportConfig {
    checkpoint_interval: 500,
};
let importer = ChallengeImporter::with_config(config)?;
# Ok::<(), challenge_import::ImportConfigError>(())
```

## Cancellation

Any [`CancellationToken`] works; a shared `Arc<AtomicBool>` is the usual choice
when another thread or a signal handler requests the stop. Rows already
flushed stay in the catalog and un-checkpointed successes are flushed before
`run` returns.
*/

mod cancel;
mod catalog;
mod config;
mod error;
mod importer;

pub use cancel::{CancellationToken, NeverCancel};
pub use catalog::Catalog;
pub use config::ImportConfig;
pub use error::{CatalogFailure, ImportConfigError, ImportError};
pub use importer::{ChallengeImporter, DuplicateDecision, ImportOutcome, ImportState};

// Re-export record types for convenience
pub use challenge_csvs::{ChallengeRecord, RowError, SyntaxError};
