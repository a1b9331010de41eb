use crate::error::CliResult;
use challenge_db::ChallengeDatabase;
use std::path::PathBuf;

pub fn execute(db_path: PathBuf) -> CliResult<()> {
    let db = ChallengeDatabase::open(&db_path)?;
    print!("{}", db.statistics()?);
    Ok(())
}
