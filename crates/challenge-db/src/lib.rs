/*!
# Challenge Catalog Database

SQLite-backed catalog for imported challenges.

## Purpose

Holds the persisted challenge records and the master index that registers them,
so the importer has a concrete store to write into and operators can export or
inspect what was imported.

## Features

- **Record store**: one row per challenge identifier; re-importing an identifier replaces it
- **Master index**: registration order, unaffected by later overwrites
- **Checkpointed writes**: writes stay in one pending transaction until `flush()`
- **Statistics**: counts per difficulty tier and category
*/

pub mod database;
pub mod errors;
pub mod schema;

// Re-export main types for convenience
pub use database::{CatalogStatistics, ChallengeDatabase, ChallengeHandle};
pub use errors::{DbError, DbResult};
