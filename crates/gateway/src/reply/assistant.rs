//! Get-or-create of the named assistant entity.

use std::sync::Arc;

use rd_domain::assistant::{AssistantSpec, AssistantTool};
use rd_domain::config::AssistantConfig;
use rd_domain::error::Result;
use rd_providers::AssistantPlatform;

use super::cell::LazyId;

pub struct AssistantRegistrar {
    platform: Arc<dyn AssistantPlatform>,
    config: AssistantConfig,
    assistant: LazyId,
}

impl AssistantRegistrar {
    pub fn new(platform: Arc<dyn AssistantPlatform>, config: AssistantConfig) -> Self {
        Self {
            platform,
            config,
            assistant: LazyId::new(),
        }
    }

    /// Id of the assistant named `assistant.name`, creating it if the
    /// platform has none. The id is memoized until [`Self::invalidate`].
    pub async fn ensure_assistant(&self) -> Result<String> {
        self.assistant.get_or_try_init(|| self.resolve()).await
    }

    pub fn cached(&self) -> Option<String> {
        self.assistant.peek()
    }

    pub async fn invalidate(&self) {
        self.assistant.invalidate().await;
    }

    async fn resolve(&self) -> Result<String> {
        let name = self.config.name.as_str();
        let existing = self.platform.list_assistants().await?;

        if let Some(found) = existing.iter().find(|a| a.name.as_deref() == Some(name)) {
            // Reused as-is: remote instructions/model win over config.
            if found.model != self.config.model
                || found.instructions.as_deref() != Some(self.config.instructions.as_str())
            {
                tracing::debug!(
                    assistant_id = %found.id,
                    remote_model = %found.model,
                    configured_model = %self.config.model,
                    "existing assistant differs from configuration"
                );
            }
            tracing::info!(assistant_id = %found.id, name, "reusing existing assistant");
            return Ok(found.id.clone());
        }

        let created = self.platform.create_assistant(&self.spec()).await?;
        tracing::info!(assistant_id = %created.id, name, model = %created.model, "assistant created");
        Ok(created.id)
    }

    fn spec(&self) -> AssistantSpec {
        AssistantSpec {
            name: self.config.name.clone(),
            instructions: self.config.instructions.clone(),
            model: self.config.model.clone(),
            tools: vec![AssistantTool::FileSearch],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reply::testing::StubPlatform;

    fn registrar(platform: Arc<StubPlatform>) -> AssistantRegistrar {
        AssistantRegistrar::new(platform, AssistantConfig::default())
    }

    #[tokio::test]
    async fn existing_assistant_is_reused_without_create() {
        let platform = Arc::new(
            StubPlatform::new()
                .with_assistant("asst_other", "Sales Bot")
                .with_assistant("asst_existing", "Email Reply Assistant"),
        );
        let registrar = registrar(platform.clone());

        for _ in 0..3 {
            assert_eq!(registrar.ensure_assistant().await.unwrap(), "asst_existing");
        }
        assert_eq!(platform.calls_to("create_assistant"), 0);
        assert_eq!(platform.calls_to("list_assistants"), 1);
    }

    #[tokio::test]
    async fn first_match_in_platform_order_wins() {
        let platform = Arc::new(
            StubPlatform::new()
                .with_assistant("asst_a", "Email Reply Assistant")
                .with_assistant("asst_b", "Email Reply Assistant"),
        );
        assert_eq!(registrar(platform).ensure_assistant().await.unwrap(), "asst_a");
    }

    #[tokio::test]
    async fn missing_assistant_is_created_once() {
        let platform = Arc::new(StubPlatform::new().with_assistant("asst_other", "Sales Bot"));
        let registrar = registrar(platform.clone());

        assert_eq!(registrar.ensure_assistant().await.unwrap(), "asst_new_1");
        assert_eq!(registrar.ensure_assistant().await.unwrap(), "asst_new_1");
        assert_eq!(platform.calls_to("create_assistant"), 1);
        assert_eq!(registrar.cached().as_deref(), Some("asst_new_1"));
    }

    #[tokio::test]
    async fn invalidate_re_resolves_by_name() {
        let platform = Arc::new(StubPlatform::new());
        let registrar = registrar(platform.clone());

        assert_eq!(registrar.ensure_assistant().await.unwrap(), "asst_new_1");
        registrar.invalidate().await;
        // The created assistant is now listed, so it is found rather than recreated.
        assert_eq!(registrar.ensure_assistant().await.unwrap(), "asst_new_1");
        assert_eq!(platform.calls_to("create_assistant"), 1);
        assert_eq!(platform.calls_to("list_assistants"), 2);
    }

    #[tokio::test]
    async fn list_failure_propagates_without_create() {
        let platform = Arc::new(StubPlatform::new().failing("list_assistants"));
        let err = registrar(platform.clone()).ensure_assistant().await.unwrap_err();
        assert_eq!(err.kind(), "platform");
        assert_eq!(platform.calls_to("create_assistant"), 0);
    }

    #[test]
    fn spec_declares_file_search() {
        let registrar = registrar(Arc::new(StubPlatform::new()));
        let spec = registrar.spec();
        assert_eq!(spec.name, "Email Reply Assistant");
        assert_eq!(spec.tools, vec![AssistantTool::FileSearch]);
    }
}
