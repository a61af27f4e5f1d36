pub mod fetch;
pub mod openai;
pub mod traits;
pub(crate) mod util;

// Re-exports for convenience.
pub use fetch::HttpDocumentFetcher;
pub use openai::OpenAiAssistantsClient;
pub use traits::{AssistantPlatform, DocumentFetcher, FetchedDocument};
pub use util::resolve_api_key;
