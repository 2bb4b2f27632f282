//! Delimited-text export
//!
//! Writes each summary table to its own CSV file in a target directory.

use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::table::{SummaryTables, Table};

/// Write one table as a CSV file, header first.
pub fn write_table(path: &Path, table: &Table) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    log::info!("wrote {} rows to {}", table.rows.len(), path.display());
    Ok(())
}

/// Write `all.csv`, `daily.csv` and `weekly.csv` into `dir`, creating it if
/// needed.
pub fn export_summary_csvs(dir: &Path, tables: &SummaryTables) -> Result<()> {
    fs::create_dir_all(dir)?;
    write_table(&dir.join("all.csv"), &tables.all)?;
    write_table(&dir.join("daily.csv"), &tables.daily)?;
    write_table(&dir.join("weekly.csv"), &tables.weekly)?;
    Ok(())
}
