use crate::error::CliResult;
use challenge_csvs::write_challenges_csv_file;
use challenge_db::ChallengeDatabase;
use std::path::PathBuf;
use tracing::debug;

pub fn execute(db_path: PathBuf, output: PathBuf) -> CliResult<()> {
    println!("Exporting catalog {}", db_path.display());

    let db = ChallengeDatabase::open(&db_path)?;
    let records = db.read_challenges()?;
    debug!("Read {} challenges in master index order", records.len());

    write_challenges_csv_file(&output, &records)?;
    println!(
        "Wrote {} challenges to {}",
        records.len(),
        output.display()
    );
    Ok(())
}
