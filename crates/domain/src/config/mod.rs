mod assistant;
mod knowledge;
mod observability;
mod platform;
mod reply;
mod server;

pub use assistant::*;
pub use knowledge::*;
pub use observability::*;
pub use platform::*;
pub use reply::*;
pub use server::*;

use serde::{Deserialize, Serialize};
use std::fmt;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Top-level config
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub platform: PlatformConfig,
    #[serde(default)]
    pub knowledge: KnowledgeConfig,
    #[serde(default)]
    pub assistant: AssistantConfig,
    #[serde(default)]
    pub reply: ReplyConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Config validation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Severity level for a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSeverity {
    Error,
    Warning,
}

/// A single configuration validation issue.
#[derive(Debug, Clone)]
pub struct ConfigError {
    pub severity: ConfigSeverity,
    pub field: String,
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            ConfigSeverity::Error => "ERROR",
            ConfigSeverity::Warning => "WARN",
        };
        write!(f, "[{tag}] {}: {}", self.field, self.message)
    }
}

impl Config {
    /// Validate the configuration and return a list of issues.
    ///
    /// Returns an empty vec when everything looks good.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut issues = Vec::new();
        let mut error = |field: &str, message: &str| {
            issues.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: field.into(),
                message: message.into(),
            })
        };

        if self.server.port == 0 {
            error("server.port", "port must be greater than 0");
        }
        if self.server.host.is_empty() {
            error("server.host", "host must not be empty");
        }
        if self.platform.base_url.is_empty() {
            error("platform.base_url", "base_url must not be empty");
        }

        let url = self.knowledge.source_url.trim();
        if url.is_empty() {
            error("knowledge.source_url", "source_url must be set");
        } else if !(url.starts_with("http://") || url.starts_with("https://")) {
            error("knowledge.source_url", "source_url must be an http(s) URL");
        }

        if self.assistant.name.trim().is_empty() {
            error("assistant.name", "assistant name must not be empty");
        }
        if self.assistant.model.trim().is_empty() {
            error("assistant.model", "assistant model must not be empty");
        }

        if self.reply.poll_interval_ms == 0 {
            error("reply.poll_interval_ms", "poll interval must be greater than 0");
        }
        if self.reply.max_wait_secs.saturating_mul(1000) < self.reply.poll_interval_ms {
            error(
                "reply.max_wait_secs",
                "max wait must be at least one poll interval",
            );
        }

        if !self.reply.prompt_template.contains(EMAIL_PLACEHOLDER) {
            issues.push(ConfigError {
                severity: ConfigSeverity::Warning,
                field: "reply.prompt_template".into(),
                message: format!(
                    "template has no {EMAIL_PLACEHOLDER} placeholder; the email body will not be sent"
                ),
            });
        }

        if self.server.cors.allowed_origins.len() == 1
            && self.server.cors.allowed_origins[0] == "*"
        {
            issues.push(ConfigError {
                severity: ConfigSeverity::Warning,
                field: "server.cors.allowed_origins".into(),
                message: "wildcard \"*\" allows all origins (not recommended for production)".into(),
            });
        }

        issues
    }

    pub fn has_errors(&self) -> bool {
        self.validate()
            .iter()
            .any(|i| i.severity == ConfigSeverity::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> Config {
        let mut cfg = Config::default();
        cfg.knowledge.source_url = "https://example.com/company.txt".into();
        cfg
    }

    fn fields(cfg: &Config) -> Vec<String> {
        cfg.validate().into_iter().map(|i| i.field).collect()
    }

    #[test]
    fn configured_source_url_is_valid() {
        assert!(valid().validate().is_empty());
    }

    #[test]
    fn missing_source_url_is_an_error() {
        let cfg = Config::default();
        assert!(cfg.has_errors());
        assert_eq!(fields(&cfg), vec!["knowledge.source_url"]);
    }

    #[test]
    fn non_http_source_url_is_an_error() {
        let mut cfg = valid();
        cfg.knowledge.source_url = "file:///etc/passwd".into();
        assert_eq!(fields(&cfg), vec!["knowledge.source_url"]);
    }

    #[test]
    fn zero_poll_interval_is_an_error() {
        let mut cfg = valid();
        cfg.reply.poll_interval_ms = 0;
        assert!(fields(&cfg).contains(&"reply.poll_interval_ms".to_string()));
    }

    #[test]
    fn wait_shorter_than_interval_is_an_error() {
        let mut cfg = valid();
        cfg.reply.poll_interval_ms = 5_000;
        cfg.reply.max_wait_secs = 2;
        assert_eq!(fields(&cfg), vec!["reply.max_wait_secs"]);
    }

    #[test]
    fn template_without_placeholder_is_only_a_warning() {
        let mut cfg = valid();
        cfg.reply.prompt_template = "Reply politely.".into();
        let issues = cfg.validate();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, ConfigSeverity::Warning);
        assert!(!cfg.has_errors());
    }

    #[test]
    fn display_tags_severity() {
        let issue = ConfigError {
            severity: ConfigSeverity::Warning,
            field: "server.cors.allowed_origins".into(),
            message: "wildcard".into(),
        };
        assert_eq!(issue.to_string(), "[WARN] server.cors.allowed_origins: wildcard");
    }
}
