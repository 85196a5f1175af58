use crate::cli::{GlobalFlags, GradeArgs};
use crate::context::AppContext;
use crate::output::output;

pub async fn handle(args: &GradeArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let repo = &args.repository;
    let outcome = ctx.pipeline.grade_repository(&repo.owner, &repo.name).await?;
    tracing::info!(%repo, grade = outcome.report.grade, "graded");
    output(&outcome, flags.format)
}
