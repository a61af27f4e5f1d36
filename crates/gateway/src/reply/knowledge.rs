//! Knowledge resource provisioning.
//!
//! Download the company document, upload it to the platform and index it
//! into a vector store, once per process. The resulting vector store id is
//! cached; see [`LazyId`] for the concurrency contract.

use std::sync::Arc;

use tempfile::NamedTempFile;

use rd_domain::config::KnowledgeConfig;
use rd_domain::error::Result;
use rd_providers::{AssistantPlatform, DocumentFetcher};

use super::cell::LazyId;

pub struct KnowledgeProvisioner {
    platform: Arc<dyn AssistantPlatform>,
    fetcher: Arc<dyn DocumentFetcher>,
    config: KnowledgeConfig,
    vector_store: LazyId,
}

impl KnowledgeProvisioner {
    pub fn new(
        platform: Arc<dyn AssistantPlatform>,
        fetcher: Arc<dyn DocumentFetcher>,
        config: KnowledgeConfig,
    ) -> Self {
        Self {
            platform,
            fetcher,
            config,
            vector_store: LazyId::new(),
        }
    }

    /// Id of the vector store holding the knowledge document, provisioning
    /// it on first use.
    pub async fn ensure_vector_store(&self) -> Result<String> {
        self.vector_store.get_or_try_init(|| self.provision()).await
    }

    /// The cached vector store id, without triggering provisioning.
    pub fn cached(&self) -> Option<String> {
        self.vector_store.peek()
    }

    pub async fn invalidate(&self) {
        if let Some(id) = self.vector_store.invalidate().await {
            tracing::info!(vector_store_id = %id, "knowledge cache cleared");
        }
    }

    async fn provision(&self) -> Result<String> {
        let url = self.config.source_url.as_str();
        tracing::info!(url = %url, "provisioning knowledge resource");

        // Removed on drop, whichever step fails.
        let relay = self.relay_file()?;
        let doc = self.fetcher.fetch_to(url, relay.path()).await?;
        let file_id = self
            .platform
            .upload_file(relay.path(), &self.config.file_purpose)
            .await?;
        drop(relay);

        let vector_store_id = self
            .platform
            .create_vector_store(
                &self.config.vector_store_name,
                std::slice::from_ref(&file_id),
            )
            .await?;

        tracing::info!(
            bytes = doc.bytes,
            content_type = doc.content_type.as_deref().unwrap_or("unknown"),
            file_id = %file_id,
            vector_store_id = %vector_store_id,
            "knowledge resource ready"
        );
        Ok(vector_store_id)
    }

    fn relay_file(&self) -> Result<NamedTempFile> {
        let suffix = source_suffix(&self.config.source_url);
        let mut builder = tempfile::Builder::new();
        builder.prefix("knowledge-").suffix(&suffix);
        let file = match &self.config.temp_dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        Ok(file)
    }
}

/// File extension of the URL's last path segment (`.txt` when absent).
///
/// The platform infers the document type from the uploaded file name.
fn source_suffix(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or("");
    let after_scheme = path.split_once("://").map(|(_, rest)| rest).unwrap_or(path);
    let last_segment = match after_scheme.split_once('/') {
        Some((_, p)) => p.rsplit('/').next().unwrap_or(""),
        None => "",
    };
    match last_segment.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty()
                && !ext.is_empty()
                && ext.len() <= 8
                && ext.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            format!(".{}", ext.to_ascii_lowercase())
        }
        _ => ".txt".into(),
    }
}
