use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Assistant entity
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The named assistant resolved (or created) on the platform.
///
/// An existing assistant with the same `name` is reused as-is; changing
/// `instructions` or `model` here does not update it remotely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    #[serde(default = "d_name")]
    pub name: String,
    #[serde(default = "d_instructions")]
    pub instructions: String,
    #[serde(default = "d_model")]
    pub model: String,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            name: d_name(),
            instructions: d_instructions(),
            model: d_model(),
        }
    }
}

fn d_name() -> String {
    "Email Reply Assistant".into()
}
fn d_instructions() -> String {
    "You are a customer support assistant that answers emails on behalf of the company. \
     Write professional, accurate replies and use the attached company knowledge for \
     company-specific details such as policies, products and contact information."
        .into()
}
fn d_model() -> String {
    "gpt-4o".into()
}
