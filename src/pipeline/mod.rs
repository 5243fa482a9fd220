//! The training pipeline: combinations → submission → polling → results.

pub mod combinations;
pub mod orchestrator;
pub mod poller;
pub mod submitter;

pub use orchestrator::{FailurePolicy, Orchestrator, OrchestratorConfig};
pub use poller::{CompletionPoller, PollState};
pub use submitter::JobSubmitter;
