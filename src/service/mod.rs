//! Clients for the remote training service.

pub mod retry;
pub mod traits;
pub mod visual_recognition;

pub use retry::{RetryConfig, RetryingTrainingService};
pub use traits::TrainingService;
pub use visual_recognition::VisualRecognitionClient;
