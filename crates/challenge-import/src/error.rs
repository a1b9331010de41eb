use challenge_csvs::{RowError, SyntaxError};
use thiserror::Error;

/// Boxed error returned by a catalog implementation, kept unmodified
pub type CatalogFailure = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Reasons an import run ends in the `Aborted` state
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("{0}")]
    Syntax(#[from] SyntaxError),

    #[error("no data rows")]
    NoDataRows,

    #[error("{0}")]
    Row(#[from] RowError),

    #[error("row {ordinal}: identifier '{identifier}' already appears on row {first_ordinal}")]
    DuplicateInFile {
        ordinal: usize,
        identifier: String,
        first_ordinal: usize,
    },

    #[error("row {ordinal}: identifier '{identifier}' already exists in the catalog")]
    DuplicateRejected { ordinal: usize, identifier: String },

    #[error("row {ordinal}: catalog error: {source}")]
    Catalog {
        ordinal: usize,
        #[source]
        source: CatalogFailure,
    },
}

impl ImportError {
    /// 1-based data row ordinal the error refers to, if any
    pub fn ordinal(&self) -> Option<usize> {
        match self {
            ImportError::Syntax(_) | ImportError::NoDataRows => None,
            ImportError::Row(e) => Some(e.ordinal),
            ImportError::DuplicateInFile { ordinal, .. }
            | ImportError::DuplicateRejected { ordinal, .. }
            | ImportError::Catalog { ordinal, .. } => Some(*ordinal),
        }
    }

    /// Logical source line for syntax errors
    pub fn line(&self) -> Option<usize> {
        match self {
            ImportError::Syntax(e) => Some(e.line),
            _ => None,
        }
    }

    /// Messages for presentation, without the row or line prefix
    pub fn messages(&self) -> Vec<String> {
        match self {
            ImportError::Syntax(e) => vec![e.message.clone()],
            ImportError::NoDataRows => vec!["no data rows".to_string()],
            ImportError::Row(e) => e.messages.clone(),
            ImportError::DuplicateInFile {
                identifier,
                first_ordinal,
                ..
            } => vec![format!(
                "identifier '{}' already appears on row {}",
                identifier, first_ordinal
            )],
            ImportError::DuplicateRejected { identifier, .. } => vec![format!(
                "identifier '{}' already exists in the catalog",
                identifier
            )],
            ImportError::Catalog { source, .. } => vec![format!("catalog error: {}", source)],
        }
    }
}

/// Rejected [`ImportConfig`](crate::ImportConfig) values
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportConfigError {
    #[error("checkpoint interval must be at least 1")]
    ZeroCheckpointInterval,
}
