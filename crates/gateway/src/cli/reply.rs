//! `replydesk reply <email>`: run the pipeline once without HTTP.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use rd_domain::config::Config;

use crate::bootstrap;

pub async fn run(config: Arc<Config>, email: String) -> anyhow::Result<()> {
    if email.trim().is_empty() {
        anyhow::bail!("email body must not be empty");
    }

    let shutdown = CancellationToken::new();
    let state = bootstrap::build_app_state(config, shutdown.clone())?;

    // Ctrl-C abandons the poll instead of killing mid-request.
    let ctrl_c = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    match state.replies.generate_reply(&email).await {
        Ok(reply) => {
            println!("{reply}");
            Ok(())
        }
        Err(e) => {
            let cause = std::error::Error::source(&e)
                .map(|s| s.to_string())
                .unwrap_or_default();
            anyhow::bail!("{e} ({}): {cause}", e.kind())
        }
    }
}
