//! AppState construction shared by `serve` and the one-shot `reply` command.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio_util::sync::CancellationToken;

use rd_domain::config::{Config, ConfigSeverity};
use rd_providers::{resolve_api_key, HttpDocumentFetcher, OpenAiAssistantsClient};

use crate::reply::ReplyGenerator;
use crate::state::AppState;

/// Validate config, build the platform client and document fetcher, and
/// return a fully-wired [`AppState`].
///
/// `shutdown` is the root token; cancelling it aborts in-flight polls.
pub fn build_app_state(config: Arc<Config>, shutdown: CancellationToken) -> anyhow::Result<AppState> {
    // ── Config validation ────────────────────────────────────────────
    let issues = config.validate();
    for issue in &issues {
        match issue.severity {
            ConfigSeverity::Warning => tracing::warn!("config: {issue}"),
            ConfigSeverity::Error => tracing::error!("config: {issue}"),
        }
    }
    if config.has_errors() {
        let error_count = issues
            .iter()
            .filter(|i| i.severity == ConfigSeverity::Error)
            .count();
        anyhow::bail!("config validation failed with {error_count} error(s)");
    }

    // ── Platform client ──────────────────────────────────────────────
    let api_key = resolve_api_key(&config.platform.auth)
        .with_context(|| format!("resolving API key for platform '{}'", config.platform.id))?;
    let platform = OpenAiAssistantsClient::from_config(&config.platform, &api_key)
        .context("building platform client")?;
    tracing::info!(
        platform = %config.platform.id,
        base_url = %config.platform.base_url,
        "platform client ready"
    );

    // ── Knowledge source ─────────────────────────────────────────────
    let fetcher = HttpDocumentFetcher::new(Duration::from_millis(config.platform.timeout_ms))
        .context("building document fetcher")?;

    let replies = ReplyGenerator::new(Arc::new(platform), Arc::new(fetcher), &config, shutdown);
    Ok(AppState::new(config, Arc::new(replies)))
}

/// Provision the knowledge resource and assistant ahead of the first
/// request when `reply.prewarm` is set. Failures are logged; the next
/// request retries.
pub fn spawn_background_tasks(state: &AppState) {
    if !state.config.reply.prewarm {
        return;
    }
    let replies = state.replies.clone();
    tokio::spawn(async move {
        if let Err(e) = replies.knowledge().ensure_vector_store().await {
            tracing::warn!(kind = e.kind(), error = %e, "knowledge prewarm failed");
            return;
        }
        if let Err(e) = replies.assistants().ensure_assistant().await {
            tracing::warn!(kind = e.kind(), error = %e, "assistant prewarm failed");
            return;
        }
        tracing::info!("reply pipeline prewarmed");
    });
}
