/*!
# Challenge CSV Grammar & Schema

This crate turns challenge definition files into validated [`ChallengeRecord`]s.

## Layers

- **Tokenizer** ([`tokenize`], [`parse_table`]): RFC 4180 style grammar with quoting,
  escaped quotes and multi-line fields. Ragged rows are a [`SyntaxError`].
- **Decoder** ([`decode_row`]): maps one [`RowMap`] onto a typed record, including the
  pipe-delimited `answers` list and the JSON `rewards` sub-document. All problems on a
  row are reported together in one [`RowError`].
- **Export** ([`write_challenges_csv`]): writes records back in the column contract
  order so they can be re-imported.

## Usage

```rust
use challenge_csvs::{decode_row, parse_table};

let text = "identifier,name,question,answers\nq1,Add,1+1=?,2\n";
let table = parse_table(text)?;
for (i, row) in table.rows().iter().enumerate() {
    let record = decode_row(&table.row_map(row), i + 1)?;
    assert_eq!(record.answers, vec!["2"]);
}
# Ok::<(), challenge_csvs::CsvError>(())
```
*/

pub mod decoder;
pub mod errors;
pub mod export;
pub mod schemas;
pub mod tokenizer;

// Re-export main types for convenience
pub use decoder::{decode_row, parse_answers, parse_rewards, validate_record};
pub use errors::{CsvError, CsvResult, RowError, SyntaxError};
pub use export::{
    encode_record, read_challenge_table, write_challenges_csv, write_challenges_csv_file,
};
pub use schemas::{
    AnswerKind, Category, ChallengeRecord, Difficulty, NamedVariant, RewardEntry,
    CHALLENGE_CSV_HEADERS, REQUIRED_HEADERS,
};
pub use tokenizer::{parse_table, tokenize, RawRow, RowMap, Table};
