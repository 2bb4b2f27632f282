//! Fetch and cache without publishing

use anyhow::Result;
use chrono::NaiveDate;
use worklog_core::{build_sources, pipeline, CacheStore};

use crate::commands::Context;
use crate::output::{print_info, print_report, print_success};

pub async fn execute(ctx: &Context, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<()> {
    let range = ctx.config.resolve_range(start, end, ctx.today);
    print_info(
        &format!("fetching entries from {} to {}", range.start, range.end),
        ctx.quiet,
    );

    let cache = CacheStore::new(&ctx.config.cache_dir);
    let sources = build_sources(&ctx.config, &cache).await?;
    let (_rows, report) = pipeline::collect(&ctx.config, &cache, &sources, &range).await?;
    print_report(&report, ctx.quiet);

    print_success("fetch complete", ctx.quiet);
    Ok(())
}
