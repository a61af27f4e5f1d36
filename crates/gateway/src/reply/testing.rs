//! In-memory stand-ins for the platform and the document source.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use rd_domain::assistant::{
    Assistant, AssistantSpec, MessageContent, Role, Run, RunStatus, ThreadMessage,
};
use rd_domain::config::Config;
use rd_domain::error::{Error, Result};
use rd_providers::{AssistantPlatform, DocumentFetcher, FetchedDocument};

use super::ReplyGenerator;

/// Records every call by operation name and answers from canned state.
pub(crate) struct StubPlatform {
    calls: Mutex<Vec<String>>,
    /// Content of every `create_message` call, in order.
    sent_messages: Mutex<Vec<String>>,
    /// `(assistant_id, vector_store_id)` of every `create_run` call.
    run_bindings: Mutex<Vec<(String, String)>>,
    assistants: Mutex<Vec<Assistant>>,
    /// Statuses handed out by successive `retrieve_run` calls; the last one
    /// repeats once the queue is drained.
    run_statuses: Mutex<VecDeque<RunStatus>>,
    last_run_error: Option<String>,
    messages: Vec<ThreadMessage>,
    fail_op: Option<&'static str>,
    upload_delay: Option<Duration>,
}

impl StubPlatform {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            sent_messages: Mutex::new(Vec::new()),
            run_bindings: Mutex::new(Vec::new()),
            assistants: Mutex::new(Vec::new()),
            run_statuses: Mutex::new(VecDeque::from([RunStatus::Completed])),
            last_run_error: None,
            messages: Vec::new(),
            fail_op: None,
            upload_delay: None,
        }
    }

    pub fn with_assistant(self, id: &str, name: &str) -> Self {
        self.assistants.lock().push(Assistant {
            id: id.into(),
            name: Some(name.into()),
            instructions: Some("old instructions".into()),
            model: "gpt-4o".into(),
        });
        self
    }

    pub fn with_run_statuses(self, statuses: Vec<RunStatus>) -> Self {
        *self.run_statuses.lock() = statuses.into();
        self
    }

    pub fn with_run_error(mut self, message: &str) -> Self {
        self.last_run_error = Some(message.into());
        self
    }

    pub fn with_assistant_reply(mut self, content: MessageContent) -> Self {
        self.messages.push(ThreadMessage {
            id: format!("msg_{}", self.messages.len() + 1),
            role: Role::Assistant,
            content,
        });
        self
    }

    pub fn with_user_message(mut self, text: &str) -> Self {
        self.messages.push(ThreadMessage {
            id: format!("msg_{}", self.messages.len() + 1),
            role: Role::User,
            content: MessageContent::PlainText(text.into()),
        });
        self
    }

    pub fn failing(mut self, op: &'static str) -> Self {
        self.fail_op = Some(op);
        self
    }

    pub fn with_upload_delay(mut self, delay: Duration) -> Self {
        self.upload_delay = Some(delay);
        self
    }

    pub fn calls_to(&self, op: &str) -> usize {
        self.calls.lock().iter().filter(|c| c.as_str() == op).count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn sent_messages(&self) -> Vec<String> {
        self.sent_messages.lock().clone()
    }

    pub fn run_bindings(&self) -> Vec<(String, String)> {
        self.run_bindings.lock().clone()
    }

    fn record(&self, op: &'static str) -> Result<()> {
        self.calls.lock().push(op.to_owned());
        if self.fail_op == Some(op) {
            return Err(Error::Provider {
                provider: "stub".into(),
                message: format!("{op}: HTTP 503 - unavailable"),
            });
        }
        Ok(())
    }

    fn run(&self, status: RunStatus) -> Run {
        let last_error = if status.is_failure() {
            self.last_run_error.clone()
        } else {
            None
        };
        Run {
            id: "run_1".into(),
            thread_id: "thread_1".into(),
            status,
            last_error,
        }
    }
}

#[async_trait::async_trait]
impl AssistantPlatform for StubPlatform {
    async fn upload_file(&self, path: &Path, _purpose: &str) -> Result<String> {
        self.record("upload_file")?;
        assert!(path.exists(), "relay file must exist during upload");
        if let Some(delay) = self.upload_delay {
            tokio::time::sleep(delay).await;
        }
        Ok(format!("file_{}", self.calls_to("upload_file")))
    }

    async fn create_vector_store(&self, _name: &str, file_ids: &[String]) -> Result<String> {
        self.record("create_vector_store")?;
        assert_eq!(file_ids.len(), 1);
        Ok(format!("vs_{}", self.calls_to("create_vector_store")))
    }

    async fn list_assistants(&self) -> Result<Vec<Assistant>> {
        self.record("list_assistants")?;
        Ok(self.assistants.lock().clone())
    }

    async fn create_assistant(&self, spec: &AssistantSpec) -> Result<Assistant> {
        self.record("create_assistant")?;
        let assistant = Assistant {
            id: format!("asst_new_{}", self.calls_to("create_assistant")),
            name: Some(spec.name.clone()),
            instructions: Some(spec.instructions.clone()),
            model: spec.model.clone(),
        };
        self.assistants.lock().push(assistant.clone());
        Ok(assistant)
    }

    async fn create_thread(&self) -> Result<String> {
        self.record("create_thread")?;
        Ok("thread_1".into())
    }

    async fn create_message(&self, _thread_id: &str, role: Role, content: &str) -> Result<String> {
        self.record("create_message")?;
        assert_eq!(role, Role::User);
        self.sent_messages.lock().push(content.to_owned());
        Ok("msg_user".into())
    }

    async fn create_run(
        &self,
        _thread_id: &str,
        assistant_id: &str,
        vector_store_id: &str,
    ) -> Result<Run> {
        self.record("create_run")?;
        self.run_bindings
            .lock()
            .push((assistant_id.to_owned(), vector_store_id.to_owned()));
        Ok(self.run(RunStatus::Queued))
    }

    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run> {
        self.record("retrieve_run")?;
        assert_eq!((thread_id, run_id), ("thread_1", "run_1"));
        let status = {
            let mut queue = self.run_statuses.lock();
            if queue.len() > 1 {
                queue.pop_front()
            } else {
                queue.front().cloned()
            }
        };
        Ok(self.run(status.unwrap_or(RunStatus::InProgress)))
    }

    async fn list_messages(&self, _thread_id: &str) -> Result<Vec<ThreadMessage>> {
        self.record("list_messages")?;
        Ok(self.messages.clone())
    }

    fn provider_id(&self) -> &str {
        "stub"
    }
}

/// Writes a fixed document, or fails with the configured HTTP status.
pub(crate) struct StubFetcher {
    fetches: Mutex<usize>,
    fail_status: Option<u16>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self {
            fetches: Mutex::new(0),
            fail_status: None,
        }
    }

    pub fn failing_with(status: u16) -> Self {
        Self {
            fetches: Mutex::new(0),
            fail_status: Some(status),
        }
    }

    pub fn fetches(&self) -> usize {
        *self.fetches.lock()
    }
}

#[async_trait::async_trait]
impl DocumentFetcher for StubFetcher {
    async fn fetch_to(&self, url: &str, dest: &Path) -> Result<FetchedDocument> {
        *self.fetches.lock() += 1;
        if let Some(status) = self.fail_status {
            return Err(Error::Download {
                url: url.to_owned(),
                status,
            });
        }
        let body = "Orders ship within one business day.";
        std::fs::write(dest, body)?;
        Ok(FetchedDocument {
            bytes: body.len() as u64,
            content_type: Some("text/plain".into()),
        })
    }
}

pub(crate) fn test_config() -> Config {
    let mut config = Config::default();
    config.knowledge.source_url = "https://kb.example.com/company.txt".into();
    config
}

pub(crate) fn generator(platform: Arc<StubPlatform>, fetcher: Arc<StubFetcher>) -> ReplyGenerator {
    ReplyGenerator::new(platform, fetcher, &test_config(), CancellationToken::new())
}
