use std::path::PathBuf;

use crate::error::Result;
use crate::importer::Importer;
use crate::store::SqliteStore;

use super::open_db;

pub fn run(file: &str) -> Result<()> {
    let file_path = PathBuf::from(file);
    let conn = open_db()?;
    let store = SqliteStore::new(&conn);

    let report = Importer::new(&store).run(&file_path)?;

    println!(
        "{} imported, {} new categories, {} rows skipped",
        report.transactions.len(),
        report.new_categories.len(),
        report.skipped
    );
    Ok(())
}
