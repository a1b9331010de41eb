use thiserror::Error;

pub type CsvResult<T> = Result<T, CsvError>;

/// Malformed CSV text: bad quoting, a ragged row, or an unusable header.
///
/// `line` is the 1-based logical line (a multi-line quoted field counts once).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: {message}")]
pub struct SyntaxError {
    pub line: usize,
    pub message: String,
}

impl SyntaxError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

/// Every validation failure found on one data row.
///
/// `ordinal` is the 1-based data row number (the header is not counted).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("row {ordinal}: {}", messages.join("; "))]
pub struct RowError {
    pub ordinal: usize,
    pub messages: Vec<String>,
}

#[derive(Error, Debug)]
pub enum CsvError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Syntax error: {0}")]
    Syntax(#[from] SyntaxError),

    #[error("Validation error: {0}")]
    Row(#[from] RowError),
}
