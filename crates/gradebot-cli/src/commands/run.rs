use anyhow::Context;
use gradebot_pipeline::CompletionCache;

use crate::cli::{GlobalFlags, RunArgs};
use crate::context::AppContext;
use crate::output::output;

pub async fn handle(args: &RunArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let org = resolve_org(args.org.as_deref(), &ctx.config.github.organization)?;

    let mut cache = CompletionCache::load(&ctx.config.grading.cache_file)
        .context("failed to load completion cache")?;
    tracing::info!(
        org,
        cache = %cache.path().display(),
        cached = cache.len(),
        force = args.force,
        "starting batch run"
    );

    let summary = ctx.pipeline.run_batch(org, &mut cache, args.force).await?;

    cache.save().context("failed to save completion cache")?;
    output(&summary, flags.format)
}

fn resolve_org<'a>(flag: Option<&'a str>, configured: &'a str) -> anyhow::Result<&'a str> {
    flag.filter(|org| !org.is_empty())
        .or_else(|| (!configured.is_empty()).then_some(configured))
        .context("no organization to grade: pass --org or set github.organization")
}
