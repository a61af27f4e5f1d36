//! The reply pipeline: knowledge provisioning, assistant resolution and
//! run orchestration.

pub mod assistant;
pub mod cell;
pub mod knowledge;
pub mod orchestrator;

#[cfg(test)]
pub(crate) mod testing;

pub use assistant::AssistantRegistrar;
pub use knowledge::KnowledgeProvisioner;
pub use orchestrator::ReplyGenerator;
