use challenge_csvs::ChallengeRecord;
use challenge_db::{ChallengeDatabase, ChallengeHandle, DbError};

/// Record store plus master index that an import run writes into.
///
/// Writes may be buffered by the implementation; `flush` makes everything
/// written so far durable.
pub trait Catalog {
    /// Reference to a stored record, passed back to `add_to_index`
    type Handle;
    type Error: std::error::Error + Send + Sync + 'static;

    fn exists(&mut self, identifier: &str) -> Result<bool, Self::Error>;

    /// Store `record`, replacing any entry with the same identifier
    fn create(&mut self, record: &ChallengeRecord) -> Result<Self::Handle, Self::Error>;

    fn add_to_index(&mut self, handle: &Self::Handle) -> Result<(), Self::Error>;

    fn flush(&mut self) -> Result<(), Self::Error>;
}

impl Catalog for ChallengeDatabase {
    type Handle = ChallengeHandle;
    type Error = DbError;

    fn exists(&mut self, identifier: &str) -> Result<bool, DbError> {
        self.challenge_exists(identifier)
    }

    fn create(&mut self, record: &ChallengeRecord) -> Result<ChallengeHandle, DbError> {
        self.upsert_challenge(record)
    }

    fn add_to_index(&mut self, handle: &ChallengeHandle) -> Result<(), DbError> {
        ChallengeDatabase::add_to_index(self, handle).map(|_| ())
    }

    fn flush(&mut self) -> Result<(), DbError> {
        ChallengeDatabase::flush(self)
    }
}
