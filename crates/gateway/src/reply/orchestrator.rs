//! Reply generation: thread, message, run, poll, extract.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use rd_domain::assistant::{first_assistant_message, Role, Run, RunStatus};
use rd_domain::config::{Config, ReplyConfig};
use rd_domain::error::{Error, GenerationError, Result};
use rd_providers::{AssistantPlatform, DocumentFetcher};

use super::{AssistantRegistrar, KnowledgeProvisioner};

pub struct ReplyGenerator {
    platform: Arc<dyn AssistantPlatform>,
    knowledge: KnowledgeProvisioner,
    assistants: AssistantRegistrar,
    config: ReplyConfig,
    /// Cancelled on shutdown; aborts every in-flight poll loop.
    shutdown: CancellationToken,
}

impl ReplyGenerator {
    pub fn new(
        platform: Arc<dyn AssistantPlatform>,
        fetcher: Arc<dyn DocumentFetcher>,
        config: &Config,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            knowledge: KnowledgeProvisioner::new(
                platform.clone(),
                fetcher,
                config.knowledge.clone(),
            ),
            assistants: AssistantRegistrar::new(platform.clone(), config.assistant.clone()),
            platform,
            config: config.reply.clone(),
            shutdown,
        }
    }

    pub fn knowledge(&self) -> &KnowledgeProvisioner {
        &self.knowledge
    }

    pub fn assistants(&self) -> &AssistantRegistrar {
        &self.assistants
    }

    /// Generate a reply to `email_body`.
    ///
    /// Every failure is logged with its cause and collapsed into a
    /// [`GenerationError`].
    pub async fn generate_reply(&self, email_body: &str) -> std::result::Result<String, GenerationError> {
        match self.try_generate(email_body).await {
            Ok(reply) => Ok(reply),
            Err(e) => {
                tracing::error!(
                    platform = self.platform.provider_id(),
                    kind = e.kind(),
                    error = %e,
                    "reply generation failed"
                );
                Err(GenerationError::new(e))
            }
        }
    }

    async fn try_generate(&self, email_body: &str) -> Result<String> {
        let vector_store_id = self.knowledge.ensure_vector_store().await?;
        let assistant_id = self.assistants.ensure_assistant().await?;

        let thread_id = self.platform.create_thread().await?;
        self.platform
            .create_message(&thread_id, Role::User, &self.config.render_prompt(email_body))
            .await?;

        let run = self
            .platform
            .create_run(&thread_id, &assistant_id, &vector_store_id)
            .await?;
        tracing::debug!(thread_id = %thread_id, run_id = %run.id, "run started");

        self.wait_for_completion(run).await?;

        let messages = self.platform.list_messages(&thread_id).await?;
        let reply = first_assistant_message(&messages).ok_or_else(|| Error::NoResponse {
            thread_id: thread_id.clone(),
        })?;
        Ok(reply.content.to_text())
    }

    /// Poll `run` until it completes, fails, times out or is cancelled.
    async fn wait_for_completion(&self, mut run: Run) -> Result<()> {
        let interval = Duration::from_millis(self.config.poll_interval_ms);
        let budget = Duration::from_secs(self.config.max_wait_secs);
        let started = tokio::time::Instant::now();
        let mut polls = 0u32;

        loop {
            if run.status.is_terminal() {
                if run.status == RunStatus::Completed {
                    tracing::debug!(run_id = %run.id, polls, "run completed");
                    return Ok(());
                }
                return Err(Error::RunFailed {
                    run_id: run.id,
                    status: run.status.to_string(),
                    message: run.last_error,
                });
            }

            let remaining = budget.saturating_sub(started.elapsed());
            if remaining.is_zero() {
                return Err(Error::RunTimedOut {
                    run_id: run.id,
                    waited_secs: started.elapsed().as_secs(),
                });
            }

            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    return Err(Error::Cancelled(format!("run {} abandoned on shutdown", run.id)));
                }
                _ = tokio::time::sleep(interval.min(remaining)) => {}
            }

            run = self.platform.retrieve_run(&run.thread_id, &run.id).await?;
            polls += 1;
            tracing::trace!(run_id = %run.id, status = %run.status, polls, "run polled");
        }
    }
}
