use challenge_csvs::CsvError;
use challenge_db::DbError;
use challenge_import::ImportConfigError;
use thiserror::Error;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Invalid import configuration: {0}")]
    ImportConfig(#[from] ImportConfigError),

    #[error("Logging setup failed: {0}")]
    Logging(#[from] tracing::subscriber::SetGlobalDefaultError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Import aborted: {0}")]
    ImportAborted(String),
}
