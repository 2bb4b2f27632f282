//! Output helpers
//!
//! Progress and status messages for CLI commands.

use worklog_core::RunReport;

/// Print a success message (respects quiet mode)
pub fn print_success(message: &str, quiet: bool) {
    if !quiet {
        println!("{}", colored::Colorize::green(message));
    }
}

/// Print an info message (respects quiet mode)
pub fn print_info(message: &str, quiet: bool) {
    if !quiet {
        println!("{}", message);
    }
}

/// Print what one collection pass did
pub fn print_report(report: &RunReport, quiet: bool) {
    print_info(&format!("cache: {} rows", report.cached_rows), quiet);
    for (source, count) in &report.source_rows {
        print_info(&format!("{}: {} rows", source, count), quiet);
    }
    if report.dropped_duplicates > 0 {
        print_info(
            &format!("removed {} duplicate rows", report.dropped_duplicates),
            quiet,
        );
    }
    print_info(&format!("total: {} rows", report.total_rows), quiet);
}
