//! Mimir - batch trainer for remote image classifiers
//!
//! Mimir scans a directory of tagged sample archives, builds every
//! fixed-size combination of tags per category, and trains one remote
//! classifier per combination through the Visual Recognition API. Jobs are
//! submitted under a concurrency limit, polled until they are ready or
//! failed, and the results are cached as JSON.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use mimir::{ClassifierManager, FailurePolicy};
//!
//! #[tokio::main]
//! async fn main() -> mimir::Result<()> {
//!     let manager = ClassifierManager::builder()
//!         .api_key("your-api-key")
//!         .base_dir("public/images/bundles")
//!         .poll_interval(Duration::from_secs(2))
//!         .failure_policy(FailurePolicy::Record)
//!         .cache_path("classifiers.json")
//!         .build()?;
//!
//!     for result in manager.get_classifiers().await? {
//!         println!("{} -> {}", result.classifier.name, result.classifier.status);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Pipeline
//!
//! The pieces can be used on their own:
//!
//! - [`pipeline::combinations::generate`]: pure n-choose-k enumeration
//! - [`JobSubmitter`]: request building and submission
//! - [`CompletionPoller`]: status polling state machine
//! - [`Orchestrator`]: bounded-concurrency driver
//! - [`ClassifierCache`]: load-or-create result cache

pub mod cache;
pub mod config;
pub mod error;
pub mod manager;
pub mod pipeline;
pub mod service;
pub mod telemetry;
pub mod types;
mod version;

// Re-export main types at crate root
pub use cache::ClassifierCache;
pub use config::{Config, Secrets};
pub use error::{MimirError, Result};
pub use manager::{ClassifierManager, ClassifierManagerBuilder};
pub use pipeline::{
    CompletionPoller, FailurePolicy, JobSubmitter, Orchestrator, OrchestratorConfig, PollState,
};
pub use service::{RetryConfig, RetryingTrainingService, TrainingService, VisualRecognitionClient};
pub use version::{PKG_VERSION, version_string};

pub use types::{
    Classifier, ClassifierClass, ClassifierStatus, Combination, ExampleSlot, JobOutcome,
    ResultSet, SampleCategory, SlotKind, TrainingRequest, TrainingResult,
};
