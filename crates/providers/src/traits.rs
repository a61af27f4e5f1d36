use std::path::Path;

use rd_domain::assistant::{Assistant, AssistantSpec, Role, Run, ThreadMessage};
use rd_domain::error::Result;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Hosted assistant platform
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The remote capabilities the reply pipeline relies on.
///
/// Every method is one remote call. Implementations convert wire payloads
/// into the domain types and report any non-success response as
/// [`rd_domain::error::Error::Provider`]. Nothing is retried.
#[async_trait::async_trait]
pub trait AssistantPlatform: Send + Sync {
    /// Upload a local file to platform storage; returns the file id.
    async fn upload_file(&self, path: &Path, purpose: &str) -> Result<String>;

    /// Create a vector store indexing the given files; returns its id.
    async fn create_vector_store(&self, name: &str, file_ids: &[String]) -> Result<String>;

    /// Every assistant registered on the account, in platform order.
    async fn list_assistants(&self) -> Result<Vec<Assistant>>;

    async fn create_assistant(&self, spec: &AssistantSpec) -> Result<Assistant>;

    /// Create an empty conversation thread; returns its id.
    async fn create_thread(&self) -> Result<String>;

    /// Append a message to a thread; returns the message id.
    async fn create_message(&self, thread_id: &str, role: Role, content: &str) -> Result<String>;

    /// Start a run whose file search is scoped to `vector_store_id`.
    async fn create_run(
        &self,
        thread_id: &str,
        assistant_id: &str,
        vector_store_id: &str,
    ) -> Result<Run>;

    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run>;

    /// Messages of a thread, newest first.
    async fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>>;

    /// A unique identifier for this platform instance.
    fn provider_id(&self) -> &str;
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Knowledge document source
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Summary of a completed download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedDocument {
    pub bytes: u64,
    pub content_type: Option<String>,
}

/// Fetches a remote document into a local file.
#[async_trait::async_trait]
pub trait DocumentFetcher: Send + Sync {
    /// Write the document at `url` to `dest`, replacing its contents.
    ///
    /// A non-success HTTP status is [`rd_domain::error::Error::Download`].
    async fn fetch_to(&self, url: &str, dest: &Path) -> Result<FetchedDocument>;
}
