//! File export sinks
//!
//! Writes the three summary tables to local files: one Excel workbook with a
//! sheet per summary, or one delimited-text file per summary.

pub mod csv;
pub mod xlsx;

pub use csv::export_summary_csvs;
pub use xlsx::SummaryWorkbook;
