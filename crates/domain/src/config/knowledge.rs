use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Knowledge resource
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Where the company knowledge document comes from and how it is indexed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    /// URL of the knowledge document. Must be set.
    #[serde(default)]
    pub source_url: String,
    /// Purpose tag sent with the file upload.
    #[serde(default = "d_purpose")]
    pub file_purpose: String,
    #[serde(default = "d_store_name")]
    pub vector_store_name: String,
    /// Directory for the download relay file. Defaults to the OS temp dir.
    #[serde(default)]
    pub temp_dir: Option<PathBuf>,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            source_url: String::new(),
            file_purpose: d_purpose(),
            vector_store_name: d_store_name(),
            temp_dir: None,
        }
    }
}

fn d_purpose() -> String {
    "assistants".into()
}
fn d_store_name() -> String {
    "Company Knowledge".into()
}
