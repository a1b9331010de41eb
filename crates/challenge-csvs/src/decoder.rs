/*!
# Row Decoding & Validation

Turns one [`RowMap`] into a [`ChallengeRecord`]. Every field is checked independently
and all problems are merged into a single [`RowError`], so one pass over a bad row
reports every defect in it.
*/

use crate::{
    errors::RowError,
    schemas::{
        AnswerKind, Category, ChallengeRecord, Difficulty, NamedVariant, RewardEntry,
        ANSWER_SEPARATOR, COL_ANSWERS, COL_ANSWER_KIND, COL_CATEGORY, COL_DESCRIPTION,
        COL_DIFFICULTY, COL_HINT, COL_IDENTIFIER, COL_NAME, COL_QUESTION, COL_REWARDS,
        EMPTY_REWARDS_TOKEN,
    },
    tokenizer::RowMap,
};

/// Decode and validate one data row. `ordinal` is the 1-based data row number.
pub fn decode_row(row: &RowMap<'_>, ordinal: usize) -> Result<ChallengeRecord, RowError> {
    let mut errors = Vec::new();

    let identifier = required(row, COL_IDENTIFIER, &mut errors).map(|s| s.trim().to_string());
    let name = required(row, COL_NAME, &mut errors).map(|s| s.trim().to_string());
    let question = required(row, COL_QUESTION, &mut errors).map(str::to_string);

    let difficulty: Difficulty = optional_variant(row, COL_DIFFICULTY, &mut errors);
    let category: Category = optional_variant(row, COL_CATEGORY, &mut errors);
    let answer_kind: AnswerKind = optional_variant(row, COL_ANSWER_KIND, &mut errors);

    let answers = match required(row, COL_ANSWERS, &mut errors) {
        Some(raw) => {
            let answers = parse_answers(raw);
            if answers.is_empty() {
                errors.push(format!("{} has no non-empty entries", COL_ANSWERS));
            }
            answers
        }
        None => Vec::new(),
    };

    let rewards = match row.get(COL_REWARDS) {
        Some(raw) => parse_rewards(raw).unwrap_or_else(|e| {
            errors.push(format!("{} sub-document parse error: {}", COL_REWARDS, e));
            Vec::new()
        }),
        None => Vec::new(),
    };

    let record = ChallengeRecord {
        identifier: identifier.unwrap_or_default(),
        name: name.unwrap_or_default(),
        description: optional_text(row, COL_DESCRIPTION),
        difficulty,
        category,
        question: question.unwrap_or_default(),
        answer_kind,
        answers,
        hint: optional_text(row, COL_HINT),
        rewards,
    };

    // Whole-record checks only add what the field checks above did not already report
    if errors.is_empty() {
        errors.extend(validate_record(&record));
    } else {
        errors.extend(validate_rewards(&record.rewards));
    }

    if errors.is_empty() {
        Ok(record)
    } else {
        Err(RowError {
            ordinal,
            messages: errors,
        })
    }
}

/// Record-level invariants of a decoded challenge
pub fn validate_record(record: &ChallengeRecord) -> Vec<String> {
    let mut problems = Vec::new();
    if record.identifier.trim().is_empty() {
        problems.push(format!("{} is empty", COL_IDENTIFIER));
    }
    if record.name.trim().is_empty() {
        problems.push(format!("{} is empty", COL_NAME));
    }
    if record.question.trim().is_empty() {
        problems.push(format!("{} is empty", COL_QUESTION));
    }
    if record.answers.is_empty() {
        problems.push(format!("{} has no non-empty entries", COL_ANSWERS));
    }
    if record.answers.iter().any(|a| a.trim().is_empty()) {
        problems.push(format!("{} contains an empty entry", COL_ANSWERS));
    }
    problems.extend(validate_rewards(&record.rewards));
    problems
}

fn validate_rewards(rewards: &[RewardEntry]) -> Vec<String> {
    rewards
        .iter()
        .enumerate()
        .flat_map(|(index, entry)| entry.violations(index))
        .collect()
}

/// Split a pipe-delimited answer list, trimming entries and dropping empty ones.
pub fn parse_answers(raw: &str) -> Vec<String> {
    raw.split(ANSWER_SEPARATOR)
        .map(str::trim)
        .filter(|answer| !answer.is_empty())
        .map(str::to_string)
        .collect()
}

/// Decode the `rewards` JSON array. Blank input and `[]` both mean no rewards.
pub fn parse_rewards(raw: &str) -> Result<Vec<RewardEntry>, serde_json::Error> {
    let raw = raw.trim();
    if raw.is_empty() || raw == EMPTY_REWARDS_TOKEN {
        return Ok(Vec::new());
    }
    serde_json::from_str(raw)
}

fn required<'a>(row: &RowMap<'a>, column: &str, errors: &mut Vec<String>) -> Option<&'a str> {
    match row.get(column) {
        None => {
            errors.push(format!("{} is missing", column));
            None
        }
        Some(value) if value.trim().is_empty() => {
            errors.push(format!("{} is empty", column));
            None
        }
        Some(value) => Some(value),
    }
}

fn optional_variant<T: NamedVariant + Default>(
    row: &RowMap<'_>,
    column: &str,
    errors: &mut Vec<String>,
) -> T {
    match row.get(column).map(str::trim) {
        None | Some("") => T::default(),
        Some(token) => T::from_name(token).unwrap_or_else(|| {
            let expected: Vec<&str> = T::ALL.iter().map(NamedVariant::as_str).collect();
            errors.push(format!(
                "invalid {} value '{}' (expected one of: {})",
                column,
                token,
                expected.join(", ")
            ));
            T::default()
        }),
    }
}

fn optional_text(row: &RowMap<'_>, column: &str) -> Option<String> {
    row.get(column)
        .filter(|value| !value.trim().is_empty())
        .map(str::to_string)
}

// ================================================================================================
// Tests
// ================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn row<'a>(pairs: &[(&'a str, &'a str)]) -> RowMap<'a> {
        pairs.iter().copied().collect()
    }

    fn minimal<'a>(answers: &'a str) -> RowMap<'a> {
        row(&[
            ("identifier", "q1"),
            ("name", "Add"),
            ("question", "1+1=?"),
            ("answers", answers),
        ])
    }

    #[test]
    fn test_missing_required_columns_all_reported() {
        let err = decode_row(&row(&[("hint", "none")]), 4).unwrap_err();
        assert_eq!(err.ordinal, 4);

        let expected: Vec<String> = crate::schemas::REQUIRED_HEADERS
            .iter()
            .map(|column| format!("{} is missing", column))
            .collect();
        assert_eq!(err.messages, expected);
    }

    #[test]
    fn test_misspelled_reward_key_is_reported() {
        let map: RowMap = minimal("2")
            .iter()
            .chain([("rewards", r#"[{"itemId":"wood","droprate":0.9}]"#)])
            .collect();

        let err = decode_row(&map, 2).unwrap_err();
        assert_eq!(err.messages.len(), 1);
        assert!(err.messages[0].starts_with("rewards sub-document parse error"));
        assert!(err.messages[0].contains("droprate"), "{}", err.messages[0]);
    }

    #[test]
    fn test_minimal_row_uses_defaults() {
        let record = decode_row(&minimal("2"), 1).unwrap();
        assert_eq!(record.identifier, "q1");
        assert_eq!(record.answers, vec!["2"]);
        assert_eq!(record.difficulty, Difficulty::Normal);
        assert_eq!(record.category, Category::Math);
        assert_eq!(record.answer_kind, AnswerKind::Text);
        assert_eq!(record.description, None);
        assert_eq!(record.hint, None);
        assert!(record.rewards.is_empty());
    }

    #[test]
    fn test_full_row() {
        let map = row(&[
            ("identifier", "  challenge_logic_007 "),
            ("name", " Knights "),
            ("description", "Who lies?"),
            ("difficulty", "veryhard"),
            ("category", "LOGIC"),
            ("question", "  Exactly as written  "),
            ("answerKind", "number"),
            ("answers", "42|42.0"),
            ("hint", "Think twice"),
            (
                "rewards",
                r#"[{"itemId":"wood","minQuantity":1,"maxQuantity":3,"dropRate":0.5}]"#,
            ),
        ]);
        let record = decode_row(&map, 7).unwrap();
        assert_eq!(record.identifier, "challenge_logic_007");
        assert_eq!(record.name, "Knights");
        assert_eq!(record.question, "  Exactly as written  ");
        assert_eq!(record.difficulty, Difficulty::VeryHard);
        assert_eq!(record.category, Category::Logic);
        assert_eq!(record.answer_kind, AnswerKind::Number);
        assert_eq!(record.answers, vec!["42", "42.0"]);
        assert_eq!(record.hint.as_deref(), Some("Think twice"));
        assert_eq!(
            record.rewards,
            vec![RewardEntry {
                item_id: "wood".to_string(),
                min_quantity: 1,
                max_quantity: 3,
                drop_rate: 0.5,
            }]
        );
    }

    #[test]
    fn test_pipe_list_edge_cases() {
        assert_eq!(parse_answers(" a | b "), vec!["a", "b"]);
        assert_eq!(parse_answers("a||b|"), vec!["a", "b"]);
        assert!(parse_answers("|").is_empty());

        let err = decode_row(&minimal("|"), 4).unwrap_err();
        assert_eq!(err.ordinal, 4);
        assert_eq!(err.messages, vec!["answers has no non-empty entries"]);
    }

    #[test]
    fn test_all_field_errors_are_collected() {
        let map = row(&[
            ("identifier", " "),
            ("name", ""),
            ("difficulty", "impossible"),
            ("category", "Sports"),
            ("answerKind", "Emoji"),
            ("answers", "ok"),
            ("rewards", "{not json"),
        ]);
        let err = decode_row(&map, 3).unwrap_err();
        assert_eq!(err.ordinal, 3);
        let messages = err.messages.join("\n");
        assert!(messages.contains("identifier is empty"));
        assert!(messages.contains("name is empty"));
        assert!(messages.contains("question is missing"));
        assert!(messages.contains("invalid difficulty value 'impossible'"));
        assert!(messages.contains("invalid category value 'Sports'"));
        assert!(messages.contains("invalid answerKind value 'Emoji'"));
        assert!(messages.contains("rewards sub-document parse error"));
        assert_eq!(err.messages.len(), 7);
    }

    #[test]
    fn test_enum_error_lists_members() {
        let map: RowMap = minimal("2").iter().chain([("difficulty", "medium")]).collect();
        let err = decode_row(&map, 1).unwrap_err();
        assert_eq!(
            err.messages,
            vec![
                "invalid difficulty value 'medium' (expected one of: VeryEasy, Easy, Normal, Hard, VeryHard)"
            ]
        );
    }

    #[test]
    fn test_blank_enum_falls_back_to_default() {
        let map: RowMap = minimal("2").iter().chain([("category", "  ")]).collect();
        assert_eq!(decode_row(&map, 1).unwrap().category, Category::Math);
    }

    #[test]
    fn test_reward_constraints_are_reported_with_field_errors() {
        let map = row(&[
            ("identifier", "q9"),
            ("name", ""),
            ("question", "?"),
            ("answers", "x"),
            ("rewards", r#"[{"itemId":"gem","minQuantity":4,"maxQuantity":2}]"#),
        ]);
        let err = decode_row(&map, 9).unwrap_err();
        assert_eq!(
            err.messages,
            vec![
                "name is empty".to_string(),
                "rewards[0]: maxQuantity 2 is less than minQuantity 4".to_string(),
            ]
        );
    }

    #[test]
    fn test_empty_reward_tokens() {
        assert!(parse_rewards("").unwrap().is_empty());
        assert!(parse_rewards(" [] ").unwrap().is_empty());
        assert!(parse_rewards("[ ]").unwrap().is_empty());
        assert!(parse_rewards(r#"{"itemId":"wood"}"#).is_err());
    }

    #[test]
    fn test_blank_optional_text_is_none() {
        let map: RowMap = minimal("2")
            .iter()
            .chain([("description", "   "), ("hint", "use a pencil")])
            .collect();
        let record = decode_row(&map, 1).unwrap();
        assert_eq!(record.description, None);
        assert_eq!(record.hint.as_deref(), Some("use a pencil"));
    }
}
