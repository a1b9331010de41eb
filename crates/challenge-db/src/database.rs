/*!
# Database Operations

Unified catalog interface: the challenge record store plus its master index.

Writes are grouped into one open SQLite transaction that stays pending until
[`ChallengeDatabase::flush`] commits it. Dropping the database with pending
writes rolls them back, so a crashed import loses only what came after its
last checkpoint.
*/

use crate::{
    schema::{check_schema, initialize_database},
    DbError, DbResult,
};
use challenge_csvs::{
    AnswerKind, Category, ChallengeRecord, Difficulty, NamedVariant, RewardEntry,
};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::fmt;
use std::path::Path;
use tracing::debug;

/// Reference to a stored challenge, returned by [`ChallengeDatabase::upsert_challenge`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeHandle {
    pub identifier: String,
    /// `true` when an existing challenge with this identifier was replaced
    pub replaced: bool,
}

/// Per-tier and per-category counts of indexed challenges
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogStatistics {
    pub total: usize,
    pub by_difficulty: Vec<(Difficulty, usize)>,
    pub by_category: Vec<(Category, usize)>,
}

impl fmt::Display for CatalogStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.total == 0 {
            return writeln!(f, "Catalog is empty");
        }
        writeln!(f, "=== Challenge catalog ===")?;
        writeln!(f, "Total challenges: {}", self.total)?;
        writeln!(f)?;
        writeln!(f, "By difficulty:")?;
        for (difficulty, count) in &self.by_difficulty {
            writeln!(f, "  {}: {}", difficulty, count)?;
        }
        writeln!(f)?;
        writeln!(f, "By category:")?;
        for (category, count) in &self.by_category {
            writeln!(f, "  {}: {}", category, count)?;
        }
        Ok(())
    }
}

const SELECT_CHALLENGE_COLUMNS: &str = "c.identifier, c.name, c.description, c.difficulty, \
     c.category, c.question, c.answer_kind, c.answers, c.hint, c.rewards";

/// Unified database interface for catalog operations
pub struct ChallengeDatabase {
    conn: Connection,
}

impl ChallengeDatabase {
    /// Open an existing catalog file
    pub fn open(path: &Path) -> DbResult<Self> {
        if !path.exists() {
            return Err(DbError::InvalidConfig(format!(
                "Database file does not exist: {}",
                path.display()
            )));
        }

        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        let db = Self { conn };
        if !db.verify_schema()? {
            return Err(DbError::InvalidConfig(format!(
                "Database file has invalid schema: {}",
                path.display()
            )));
        }

        Ok(db)
    }

    /// Open a catalog file, creating it and its schema when missing
    pub fn open_or_create(path: &Path) -> DbResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        if !check_schema(&conn)? {
            debug!("Initializing catalog schema at {}", path.display());
            initialize_database(&conn)?;
        }

        Ok(Self { conn })
    }

    /// Create a new in-memory catalog with initialized schema
    pub fn create_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_database(&conn)?;

        Ok(Self { conn })
    }

    /// Check if database has proper schema
    pub fn verify_schema(&self) -> DbResult<bool> {
        check_schema(&self.conn)
    }

    /// Whether writes are waiting for the next [`flush`](Self::flush)
    pub fn has_pending_writes(&self) -> bool {
        !self.conn.is_autocommit()
    }

    fn begin_pending(&self) -> DbResult<()> {
        if self.conn.is_autocommit() {
            self.conn.execute_batch("BEGIN")?;
        }
        Ok(())
    }

    /// Commit every pending write
    pub fn flush(&mut self) -> DbResult<()> {
        if self.has_pending_writes() {
            self.conn.execute_batch("COMMIT")?;
            debug!("Catalog flushed");
        }
        Ok(())
    }

    pub fn challenge_exists(&self, identifier: &str) -> DbResult<bool> {
        let found: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM challenges WHERE identifier = ?1",
                params![identifier],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Store `record`, replacing any challenge with the same identifier
    pub fn upsert_challenge(&mut self, record: &ChallengeRecord) -> DbResult<ChallengeHandle> {
        let replaced = self.challenge_exists(&record.identifier)?;
        let answers = serde_json::to_string(&record.answers)?;
        let rewards = serde_json::to_string(&record.rewards)?;
        let now = Utc::now().timestamp();

        self.begin_pending()?;
        self.conn.execute(
            "INSERT INTO challenges (identifier, name, description, difficulty, category, \
             question, answer_kind, answers, hint, rewards, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11) \
             ON CONFLICT(identifier) DO UPDATE SET \
             name = excluded.name, description = excluded.description, \
             difficulty = excluded.difficulty, category = excluded.category, \
             question = excluded.question, answer_kind = excluded.answer_kind, \
             answers = excluded.answers, hint = excluded.hint, rewards = excluded.rewards, \
             updated_at = excluded.updated_at",
            params![
                record.identifier,
                record.name,
                record.description,
                record.difficulty.as_str(),
                record.category.as_str(),
                record.question,
                record.answer_kind.as_str(),
                answers,
                record.hint,
                rewards,
                now,
            ],
        )?;

        Ok(ChallengeHandle {
            identifier: record.identifier.clone(),
            replaced,
        })
    }

    /// Register a stored challenge in the master index.
    ///
    /// Returns `false` when it was already registered; its original position is kept.
    pub fn add_to_index(&mut self, handle: &ChallengeHandle) -> DbResult<bool> {
        self.begin_pending()?;
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO master_index (identifier, added_at) VALUES (?1, ?2)",
            params![handle.identifier, Utc::now().timestamp()],
        )?;

        if inserted == 0 {
            debug!("Challenge '{}' is already in the master index", handle.identifier);
        }
        Ok(inserted == 1)
    }

    /// Read one challenge by identifier
    pub fn read_challenge(&self, identifier: &str) -> DbResult<Option<ChallengeRecord>> {
        let sql = format!(
            "SELECT {} FROM challenges c WHERE c.identifier = ?1",
            SELECT_CHALLENGE_COLUMNS
        );
        let raw = self
            .conn
            .query_row(&sql, params![identifier], StoredChallenge::from_row)
            .optional()?;

        raw.map(StoredChallenge::into_record).transpose()
    }

    /// Read every indexed challenge in master index order
    pub fn read_challenges(&self) -> DbResult<Vec<ChallengeRecord>> {
        let sql = format!(
            "SELECT {} FROM challenges c \
             JOIN master_index m ON m.identifier = c.identifier \
             ORDER BY m.position",
            SELECT_CHALLENGE_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], StoredChallenge::from_row)?;

        let mut challenges = Vec::new();
        for row in rows {
            challenges.push(row?.into_record()?);
        }
        Ok(challenges)
    }

    /// Number of challenges registered in the master index
    pub fn challenge_count(&self) -> DbResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM master_index", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Counts per difficulty tier and per category, every member listed
    pub fn statistics(&self) -> DbResult<CatalogStatistics> {
        let difficulty_counts = self.count_indexed_by("difficulty")?;
        let category_counts = self.count_indexed_by("category")?;

        let lookup = |counts: &[(String, usize)], name: &str| {
            counts
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, count)| *count)
                .unwrap_or(0)
        };

        Ok(CatalogStatistics {
            total: self.challenge_count()?,
            by_difficulty: Difficulty::ALL
                .iter()
                .map(|d| (*d, lookup(&difficulty_counts, d.as_str())))
                .collect(),
            by_category: Category::ALL
                .iter()
                .map(|c| (*c, lookup(&category_counts, c.as_str())))
                .collect(),
        })
    }

    fn count_indexed_by(&self, column: &str) -> DbResult<Vec<(String, usize)>> {
        let sql = format!(
            "SELECT c.{column}, COUNT(*) FROM challenges c \
             JOIN master_index m ON m.identifier = c.identifier \
             GROUP BY c.{column}"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| {
            let key: String = row.get(0)?;
            let count: i64 = row.get(1)?;
            Ok((key, count as usize))
        })?;

        let mut counts = Vec::new();
        for row in rows {
            counts.push(row?);
        }
        Ok(counts)
    }
}

/// Column values of one `challenges` row before JSON and enum decoding
struct StoredChallenge {
    identifier: String,
    name: String,
    description: Option<String>,
    difficulty: String,
    category: String,
    question: String,
    answer_kind: String,
    answers: String,
    hint: Option<String>,
    rewards: String,
}

impl StoredChallenge {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            identifier: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            difficulty: row.get(3)?,
            category: row.get(4)?,
            question: row.get(5)?,
            answer_kind: row.get(6)?,
            answers: row.get(7)?,
            hint: row.get(8)?,
            rewards: row.get(9)?,
        })
    }

    fn into_record(self) -> DbResult<ChallengeRecord> {
        let answers: Vec<String> = serde_json::from_str(&self.answers)?;
        let rewards: Vec<RewardEntry> = serde_json::from_str(&self.rewards)?;

        Ok(ChallengeRecord {
            difficulty: stored_variant::<Difficulty>(&self.identifier, &self.difficulty)?,
            category: stored_variant::<Category>(&self.identifier, &self.category)?,
            answer_kind: stored_variant::<AnswerKind>(&self.identifier, &self.answer_kind)?,
            identifier: self.identifier,
            name: self.name,
            description: self.description,
            question: self.question,
            answers,
            hint: self.hint,
            rewards,
        })
    }
}

fn stored_variant<T: NamedVariant>(identifier: &str, value: &str) -> DbResult<T> {
    T::from_name(value).ok_or_else(|| {
        DbError::Serialization(format!(
            "Challenge '{}' has unknown stored value '{}'",
            identifier, value
        ))
    })
}

// ================================================================================================
// Tests
// ================================================================================================
