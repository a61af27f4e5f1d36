//! OpenAI Assistants (v2) adapter.
//!
//! Covers the subset of the Assistants API the reply pipeline uses: file
//! upload, vector stores, assistants, threads, messages and runs. Any
//! endpoint following the same contract (e.g. a self-hosted proxy) works
//! by pointing `platform.base_url` at it.

use std::path::Path;
use std::time::Duration;

use rd_domain::assistant::{
    Assistant, AssistantSpec, MessageContent, Role, Run, RunStatus, ThreadMessage,
};
use rd_domain::config::PlatformConfig;
use rd_domain::error::{Error, Result};
use serde_json::Value;

use crate::traits::AssistantPlatform;
use crate::util::from_reqwest;

/// Page size used when listing assistants.
const LIST_PAGE_SIZE: usize = 100;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Adapter struct
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub struct OpenAiAssistantsClient {
    id: String,
    base_url: String,
    auth_header: String,
    auth_value: String,
    beta_header: Option<String>,
    client: reqwest::Client,
}

impl OpenAiAssistantsClient {
    /// Build a client from config and an already-resolved API key.
    pub fn from_config(cfg: &PlatformConfig, api_key: &str) -> Result<Self> {
        let auth_header = cfg
            .auth
            .header
            .clone()
            .unwrap_or_else(|| "Authorization".into());
        let auth_prefix = cfg.auth.prefix.clone().unwrap_or_else(|| "Bearer ".into());

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()
            .map_err(from_reqwest)?;

        Ok(Self {
            id: cfg.id.clone(),
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            auth_header,
            auth_value: format!("{auth_prefix}{api_key}"),
            beta_header: cfg.beta_header.clone(),
            client,
        })
    }

    // ── Internal: request plumbing ────────────────────────────────

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authed(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let builder = builder.header(&self.auth_header, &self.auth_value);
        match &self.beta_header {
            Some(beta) => builder.header("OpenAI-Beta", beta),
            None => builder,
        }
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.authed(self.client.get(self.url(path)))
    }

    fn post_json(&self, path: &str, body: &Value) -> reqwest::RequestBuilder {
        self.authed(self.client.post(self.url(path))).json(body)
    }

    fn provider_err(&self, message: impl Into<String>) -> Error {
        Error::Provider {
            provider: self.id.clone(),
            message: message.into(),
        }
    }

    /// Send a request and decode the JSON body of a successful response.
    async fn send(&self, op: &str, req: reqwest::RequestBuilder) -> Result<Value> {
        tracing::debug!(provider = %self.id, op, "platform request");

        let resp = req.send().await.map_err(from_reqwest)?;
        let status = resp.status();
        let resp_text = resp.text().await.map_err(from_reqwest)?;

        if !status.is_success() {
            return Err(self.provider_err(format!(
                "{op}: HTTP {} - {}",
                status.as_u16(),
                resp_text
            )));
        }

        Ok(serde_json::from_str(&resp_text)?)
    }

    fn require_id(&self, op: &str, body: &Value) -> Result<String> {
        str_field(body, "id").ok_or_else(|| self.provider_err(format!("{op}: response has no id")))
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Response deserialization helpers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn str_field(v: &Value, key: &str) -> Option<String> {
    v.get(key).and_then(|v| v.as_str()).map(String::from)
}

fn parse_assistant(v: &Value) -> Option<Assistant> {
    Some(Assistant {
        id: str_field(v, "id")?,
        name: str_field(v, "name"),
        instructions: str_field(v, "instructions"),
        model: str_field(v, "model").unwrap_or_default(),
    })
}

/// One page of `GET /assistants`: the assistants plus the cursor for the
/// next page, if any.
fn parse_assistant_page(body: &Value) -> (Vec<Assistant>, Option<String>) {
    let assistants: Vec<Assistant> = body
        .get("data")
        .and_then(|d| d.as_array())
        .map(|arr| arr.iter().filter_map(parse_assistant).collect())
        .unwrap_or_default();

    let has_more = body
        .get("has_more")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);
    let next = if has_more {
        str_field(body, "last_id").or_else(|| assistants.last().map(|a| a.id.clone()))
    } else {
        None
    };
    (assistants, next)
}

fn parse_run(v: &Value, thread_id: &str) -> Option<Run> {
    let last_error = v
        .get("last_error")
        .filter(|e| !e.is_null())
        .and_then(|e| str_field(e, "message").or_else(|| str_field(e, "code")));
    Some(Run {
        id: str_field(v, "id")?,
        thread_id: str_field(v, "thread_id").unwrap_or_else(|| thread_id.to_owned()),
        status: RunStatus::parse(v.get("status")?.as_str()?),
        last_error,
    })
}

/// Resolve either content representation into [`MessageContent`].
///
/// Structured parts carry text as `{"type":"text","text":{"value":..}}`
/// (or a bare string under `text`); non-text parts are dropped.
fn parse_content(v: &Value) -> MessageContent {
    match v {
        Value::String(s) => MessageContent::PlainText(s.clone()),
        Value::Array(parts) => MessageContent::Segments(
            parts
                .iter()
                .filter(|p| p.get("type").and_then(|t| t.as_str()).unwrap_or("text") == "text")
                .filter_map(|p| match p.get("text")? {
                    Value::String(s) => Some(s.clone()),
                    obj => str_field(obj, "value"),
                })
                .collect(),
        ),
        _ => MessageContent::Segments(Vec::new()),
    }
}

fn parse_message(v: &Value) -> Option<ThreadMessage> {
    let role = match v.get("role")?.as_str()? {
        "assistant" => Role::Assistant,
        "user" => Role::User,
        _ => return None,
    };
    Some(ThreadMessage {
        id: str_field(v, "id").unwrap_or_default(),
        role,
        content: parse_content(v.get("content").unwrap_or(&Value::Null)),
    })
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Trait implementation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[async_trait::async_trait]
impl AssistantPlatform for OpenAiAssistantsClient {
    async fn upload_file(&self, path: &Path, purpose: &str) -> Result<String> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("knowledge.txt")
            .to_owned();

        let form = reqwest::multipart::Form::new()
            .text("purpose", purpose.to_owned())
            .part(
                "file",
                reqwest::multipart::Part::bytes(bytes).file_name(file_name),
            );
        let req = self
            .authed(self.client.post(self.url("/files")))
            .multipart(form);

        let body = self.send("upload_file", req).await?;
        self.require_id("upload_file", &body)
    }

    async fn create_vector_store(&self, name: &str, file_ids: &[String]) -> Result<String> {
        let body = serde_json::json!({ "name": name, "file_ids": file_ids });
        let resp = self
            .send("create_vector_store", self.post_json("/vector_stores", &body))
            .await?;
        self.require_id("create_vector_store", &resp)
    }

    async fn list_assistants(&self) -> Result<Vec<Assistant>> {
        let mut all = Vec::new();
        let mut after: Option<String> = None;
        loop {
            let path = match &after {
                Some(cursor) => format!("/assistants?limit={LIST_PAGE_SIZE}&after={cursor}"),
                None => format!("/assistants?limit={LIST_PAGE_SIZE}"),
            };
            let body = self.send("list_assistants", self.get(&path)).await?;
            let (page, next) = parse_assistant_page(&body);
            all.extend(page);
            match next {
                Some(cursor) if after.as_deref() != Some(cursor.as_str()) => after = Some(cursor),
                _ => break,
            }
        }
        Ok(all)
    }

    async fn create_assistant(&self, spec: &AssistantSpec) -> Result<Assistant> {
        let tools: Vec<Value> = spec
            .tools
            .iter()
            .map(|t| serde_json::json!({ "type": t.as_str() }))
            .collect();
        let body = serde_json::json!({
            "name": spec.name,
            "instructions": spec.instructions,
            "model": spec.model,
            "tools": tools,
        });
        let resp = self
            .send("create_assistant", self.post_json("/assistants", &body))
            .await?;
        parse_assistant(&resp)
            .ok_or_else(|| self.provider_err("create_assistant: response has no id"))
    }

    async fn create_thread(&self) -> Result<String> {
        let resp = self
            .send("create_thread", self.post_json("/threads", &serde_json::json!({})))
            .await?;
        self.require_id("create_thread", &resp)
    }

    async fn create_message(&self, thread_id: &str, role: Role, content: &str) -> Result<String> {
        let body = serde_json::json!({ "role": role.as_str(), "content": content });
        let resp = self
            .send(
                "create_message",
                self.post_json(&format!("/threads/{thread_id}/messages"), &body),
            )
            .await?;
        self.require_id("create_message", &resp)
    }

    async fn create_run(
        &self,
        thread_id: &str,
        assistant_id: &str,
        vector_store_id: &str,
    ) -> Result<Run> {
        let body = serde_json::json!({
            "assistant_id": assistant_id,
            "tool_resources": {
                "file_search": { "vector_store_ids": [vector_store_id] }
            },
        });
        let resp = self
            .send(
                "create_run",
                self.post_json(&format!("/threads/{thread_id}/runs"), &body),
            )
            .await?;
        parse_run(&resp, thread_id)
            .ok_or_else(|| self.provider_err("create_run: malformed run object"))
    }

    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run> {
        let resp = self
            .send(
                "retrieve_run",
                self.get(&format!("/threads/{thread_id}/runs/{run_id}")),
            )
            .await?;
        parse_run(&resp, thread_id)
            .ok_or_else(|| self.provider_err("retrieve_run: malformed run object"))
    }

    async fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>> {
        let resp = self
            .send(
                "list_messages",
                self.get(&format!("/threads/{thread_id}/messages")),
            )
            .await?;
        let data = resp
            .get("data")
            .and_then(|d| d.as_array())
            .ok_or_else(|| self.provider_err("list_messages: missing 'data' array"))?;
        Ok(data.iter().filter_map(parse_message).collect())
    }

    fn provider_id(&self) -> &str {
        &self.id
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
