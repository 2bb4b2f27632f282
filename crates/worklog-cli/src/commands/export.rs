//! Recompute summaries from the cache and write file exports only

use anyhow::Result;
use chrono::NaiveDate;
use worklog_core::export::{export_summary_csvs, SummaryWorkbook};
use worklog_core::{pipeline, to_tables, CacheStore};

use crate::commands::Context;
use crate::output::{print_info, print_success};

pub async fn execute(ctx: &Context, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<()> {
    let range = ctx.config.resolve_range(start, end, ctx.today);
    print_info(
        &format!("exporting cached entries from {} to {}", range.start, range.end),
        ctx.quiet,
    );

    let cache = CacheStore::new(&ctx.config.cache_dir);
    let mut rows = cache.read_range_all(&range);
    rows.sort_by(|a, b| b.date.cmp(&a.date));
    print_info(&format!("cache: {} rows", rows.len()), ctx.quiet);

    let summaries = pipeline::summarize(&rows);

    if let Some(path) = &ctx.config.exports.xlsx_path {
        let mut workbook = SummaryWorkbook::new();
        workbook.create_report(&summaries)?;
        workbook.save(path)?;
    }
    if let Some(dir) = &ctx.config.exports.csv_dir {
        export_summary_csvs(dir, &to_tables(&summaries))?;
    }

    print_success("export complete", ctx.quiet);
    Ok(())
}
