/*!
# CSV Tokenizer

RFC 4180 style tokenizer: text in, rows of raw string fields out. It knows nothing
about column meaning; [`parse_table`] adds the header row and the field-count check.

Rules:
- a leading byte-order mark is dropped and `\r\n` / `\r` are normalised to `\n`
- a field is quoted only when its *first* character is `"`; inside quotes `""` is a
  literal quote and line breaks are kept
- a blank line produces no row
- end of input inside quotes, or anything other than `,` / line break after a
  closing quote, is a [`SyntaxError`]
*/

use crate::errors::SyntaxError;
use crate::schemas::CHALLENGE_CSV_HEADERS;
use std::collections::HashSet;

const BYTE_ORDER_MARK: char = '\u{feff}';
const QUOTE: char = '"';
const DELIMITER: char = ',';
const TERMINATOR: char = '\n';

/// One logical row of untyped fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    /// 1-based logical line the row was read from
    pub line: usize,
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Unquoted,
    Quoted,
}

/// Split `text` into rows of fields.
pub fn tokenize(text: &str) -> Result<Vec<RawRow>, SyntaxError> {
    let text = text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text);
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");

    let mut rows = Vec::new();
    let mut fields: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut state = State::Unquoted;
    let mut line = 1;
    // true until the current field has consumed a character
    let mut at_field_start = true;
    // true right after a quoted field was closed
    let mut after_closing_quote = false;

    let mut chars = normalized.chars().peekable();
    while let Some(ch) = chars.next() {
        match state {
            State::Quoted => {
                if ch != QUOTE {
                    field.push(ch);
                } else if chars.peek() == Some(&QUOTE) {
                    chars.next();
                    field.push(QUOTE);
                } else {
                    state = State::Unquoted;
                    after_closing_quote = true;
                }
            }
            State::Unquoted => match ch {
                DELIMITER => {
                    fields.push(std::mem::take(&mut field));
                    at_field_start = true;
                    after_closing_quote = false;
                }
                TERMINATOR => {
                    fields.push(std::mem::take(&mut field));
                    push_row(&mut rows, line, std::mem::take(&mut fields));
                    line += 1;
                    at_field_start = true;
                    after_closing_quote = false;
                }
                _ if after_closing_quote => {
                    return Err(SyntaxError::new(
                        line,
                        format!("unexpected character '{}' after closing quote", ch),
                    ));
                }
                QUOTE if at_field_start => {
                    state = State::Quoted;
                    at_field_start = false;
                }
                _ => {
                    field.push(ch);
                    at_field_start = false;
                }
            },
        }
    }

    if state == State::Quoted {
        return Err(SyntaxError::new(line, "unterminated quoted field"));
    }

    // last row without a trailing line break
    if !fields.is_empty() || !field.is_empty() {
        fields.push(field);
        push_row(&mut rows, line, fields);
    }

    Ok(rows)
}

fn push_row(rows: &mut Vec<RawRow>, line: usize, fields: Vec<String>) {
    let blank = fields.len() == 1 && fields[0].is_empty();
    if !blank {
        rows.push(RawRow { line, fields });
    }
}

// ================================================================================================
// Header-aware Table
// ================================================================================================

/// Tokenized file split into its header row and data rows
///
/// Every data row is guaranteed to have exactly `header().len()` fields.
#[derive(Debug, Clone)]
pub struct Table {
    header: Vec<String>,
    rows: Vec<RawRow>,
}

/// One data row viewed as column name → raw value, in header order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowMap<'a> {
    entries: Vec<(&'a str, &'a str)>,
}

impl<'a> RowMap<'a> {
    /// Raw value of `column`, or `None` when the file has no such column
    pub fn get(&self, column: &str) -> Option<&'a str> {
        self.entries
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, value)| *value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a str)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for RowMap<'a> {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl Table {
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Data rows, header excluded
    pub fn rows(&self) -> &[RawRow] {
        &self.rows
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row_map<'a>(&'a self, row: &'a RawRow) -> RowMap<'a> {
        self.header
            .iter()
            .map(String::as_str)
            .zip(row.fields.iter().map(String::as_str))
            .collect()
    }

    /// Header names that are not part of the challenge column contract
    pub fn unknown_columns(&self) -> Vec<&str> {
        self.header
            .iter()
            .map(String::as_str)
            .filter(|name| !CHALLENGE_CSV_HEADERS.contains(name))
            .collect()
    }
}

/// Tokenize `text`, capture the header and check every data row against it.
pub fn parse_table(text: &str) -> Result<Table, SyntaxError> {
    let mut rows = tokenize(text)?.into_iter();

    let header_row = rows
        .next()
        .ok_or_else(|| SyntaxError::new(1, "no header row"))?;
    let header: Vec<String> = header_row
        .fields
        .iter()
        .map(|name| name.trim().to_string())
        .collect();

    let mut seen = HashSet::new();
    for name in &header {
        if !seen.insert(name.as_str()) {
            return Err(SyntaxError::new(
                header_row.line,
                format!("duplicate column name '{}' in header", name),
            ));
        }
    }

    let rows: Vec<RawRow> = rows.collect();
    for row in &rows {
        if row.fields.len() != header.len() {
            return Err(SyntaxError::new(
                row.line,
                format!(
                    "column count mismatch: expected {}, got {}",
                    header.len(),
                    row.fields.len()
                ),
            ));
        }
    }

    Ok(Table { header, rows })
}

// ================================================================================================
// Tests
// ================================================================================================
