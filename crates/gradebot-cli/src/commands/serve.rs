use anyhow::Context;

use crate::cli::ServeArgs;
use crate::context::AppContext;
use crate::webhook;

pub async fn handle(args: &ServeArgs, ctx: AppContext) -> anyhow::Result<()> {
    let bind = args
        .bind
        .clone()
        .unwrap_or_else(|| ctx.config.server.bind.clone());

    match ctx.pipeline.hosting().authenticated_login().await {
        Ok(login) => tracing::info!(%login, "authenticated to GitHub"),
        Err(error) => tracing::warn!(%error, "could not resolve GitHub user"),
    }

    let server = tiny_http::Server::http(&bind)
        .map_err(|error| anyhow::anyhow!("failed to bind {bind}: {error}"))?;
    tracing::info!(%bind, "webhook server listening");

    // tiny_http::recv() blocks, so the accept loop runs in spawn_blocking and
    // drives each grading future through the runtime handle.
    let runtime = tokio::runtime::Handle::current();
    tokio::task::spawn_blocking(move || webhook::serve(&server, &ctx.pipeline, &runtime))
        .await
        .context("webhook server thread failed")?;
    Ok(())
}
