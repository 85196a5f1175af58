use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct WhoamiResponse {
    login: String,
    api_url: String,
    organization: Option<String>,
}

pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let login = ctx.pipeline.hosting().authenticated_login().await?;
    let github = &ctx.config.github;
    output(
        &WhoamiResponse {
            login,
            api_url: github.api_url.clone(),
            organization: (!github.organization.is_empty()).then(|| github.organization.clone()),
        },
        flags.format,
    )
}
