/*!
# CSV I/O

Reading challenge files into a [`Table`] and writing records back out in the
column contract order, so an exported catalog can be edited and re-imported.
*/

use crate::{
    errors::CsvResult,
    schemas::{ChallengeRecord, NamedVariant, ANSWER_SEPARATOR, CHALLENGE_CSV_HEADERS},
    tokenizer::{parse_table, Table},
};
use csv::Writer;
use std::fs::File;
use std::io::Write;
use std::path::Path;

// ================================================================================================
// CSV Reading
// ================================================================================================

/// Read a challenge CSV file and check its grammar
pub fn read_challenge_table<P: AsRef<Path>>(path: P) -> CsvResult<Table> {
    let text = std::fs::read_to_string(path)?;
    Ok(parse_table(&text)?)
}

// ================================================================================================
// CSV Writing
// ================================================================================================

/// Encode one record as the ten contract columns
pub fn encode_record(record: &ChallengeRecord) -> CsvResult<Vec<String>> {
    let separator = ANSWER_SEPARATOR.to_string();
    Ok(vec![
        record.identifier.clone(),
        record.name.clone(),
        record.description.clone().unwrap_or_default(),
        record.difficulty.as_str().to_string(),
        record.category.as_str().to_string(),
        record.question.clone(),
        record.answer_kind.as_str().to_string(),
        record.answers.join(&separator),
        record.hint.clone().unwrap_or_default(),
        serde_json::to_string(&record.rewards)?,
    ])
}

/// Write records with a header row to any writer
pub fn write_challenges_csv<W: Write>(writer: W, records: &[ChallengeRecord]) -> CsvResult<()> {
    let mut wtr = Writer::from_writer(writer);

    wtr.write_record(CHALLENGE_CSV_HEADERS)?;
    for record in records {
        wtr.write_record(encode_record(record)?)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write records to a new file at `path`
pub fn write_challenges_csv_file<P: AsRef<Path>>(
    path: P,
    records: &[ChallengeRecord],
) -> CsvResult<()> {
    let file = File::create(path)?;
    write_challenges_csv(file, records)
}

// ================================================================================================
// Tests
// ================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        decoder::decode_row,
        schemas::{AnswerKind, Category, Difficulty, RewardEntry},
    };
    use tempfile::NamedTempFile;

    fn sample_records() -> Vec<ChallengeRecord> {
        vec![
            ChallengeRecord {
                identifier: "challenge_math_001".to_string(),
                name: "Addition".to_string(),
                description: Some("Warm-up, with \"quotes\"".to_string()),
                difficulty: Difficulty::VeryEasy,
                category: Category::Math,
                question: "What is 1+1?\nAnswer with digits.".to_string(),
                answer_kind: AnswerKind::Number,
                answers: vec!["2".to_string(), "2.0".to_string()],
                hint: None,
                rewards: vec![RewardEntry {
                    item_id: "wood".to_string(),
                    min_quantity: 1,
                    max_quantity: 3,
                    drop_rate: 0.25,
                }],
            },
            ChallengeRecord {
                identifier: "challenge_quiz_002".to_string(),
                name: "Capital".to_string(),
                description: None,
                difficulty: Difficulty::Hard,
                category: Category::Quiz,
                question: "Capital of France?".to_string(),
                answer_kind: AnswerKind::Text,
                answers: vec!["Paris".to_string()],
                hint: Some("City of light".to_string()),
                rewards: vec![],
            },
        ]
    }

    fn decode_all(table: &Table) -> Vec<ChallengeRecord> {
        table
            .rows()
            .iter()
            .enumerate()
            .map(|(i, row)| decode_row(&table.row_map(row), i + 1).unwrap())
            .collect()
    }

    #[test]
    fn test_write_and_read_challenges_csv() {
        let records = sample_records();

        let temp_file = NamedTempFile::new().unwrap();
        write_challenges_csv_file(temp_file.path(), &records).unwrap();
        let table = read_challenge_table(temp_file.path()).unwrap();

        assert_eq!(table.header(), CHALLENGE_CSV_HEADERS);
        assert_eq!(decode_all(&table), records);
    }

    #[test]
    fn test_empty_schedule_is_written_as_empty_array() {
        let records = sample_records();
        let fields = encode_record(&records[1]).unwrap();
        assert_eq!(fields[9], "[]");
        assert_eq!(fields[2], "");
        assert_eq!(fields[7], "Paris");
    }

    #[test]
    fn test_read_missing_file_is_io_error() {
        let result = read_challenge_table("/definitely/not/here.csv");
        assert!(matches!(result, Err(crate::CsvError::Io(_))));
    }
}
