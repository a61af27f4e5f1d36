use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Reply generation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Placeholder substituted with the email body in `prompt_template`.
pub const EMAIL_PLACEHOLDER: &str = "{email}";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyConfig {
    /// Delay between run status checks.
    #[serde(default = "d_2000u")]
    pub poll_interval_ms: u64,
    /// Upper bound on how long a single run is polled.
    #[serde(default = "d_300u")]
    pub max_wait_secs: u64,
    /// User message wrapped around the email body.
    #[serde(default = "d_template")]
    pub prompt_template: String,
    /// Provision the knowledge resource and assistant at startup instead of
    /// on the first request.
    #[serde(default)]
    pub prewarm: bool,
}

impl Default for ReplyConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: d_2000u(),
            max_wait_secs: d_300u(),
            prompt_template: d_template(),
            prewarm: false,
        }
    }
}

impl ReplyConfig {
    /// Render the user message for an email body.
    pub fn render_prompt(&self, email_body: &str) -> String {
        self.prompt_template.replace(EMAIL_PLACEHOLDER, email_body)
    }
}

fn d_2000u() -> u64 {
    2_000
}
fn d_300u() -> u64 {
    300
}
fn d_template() -> String {
    "Please write a professional and accurate reply to the following customer email. \
     Where relevant, use company-specific details from the knowledge base.\n\n\
     Email:\n{email}"
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_prompt_embeds_email_body() {
        let cfg = ReplyConfig::default();
        let prompt = cfg.render_prompt("Where is my order?");
        assert!(prompt.starts_with("Please write a professional"));
        assert!(prompt.ends_with("Email:\nWhere is my order?"));
    }

    #[test]
    fn custom_template_replaces_every_placeholder() {
        let cfg = ReplyConfig {
            prompt_template: "[{email}] / [{email}]".into(),
            ..Default::default()
        };
        assert_eq!(cfg.render_prompt("hi"), "[hi] / [hi]");
    }

    #[test]
    fn defaults_poll_every_two_seconds() {
        let cfg: ReplyConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.poll_interval_ms, 2_000);
        assert_eq!(cfg.max_wait_secs, 300);
        assert!(!cfg.prewarm);
    }
}
