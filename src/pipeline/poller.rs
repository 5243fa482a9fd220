//! Completion polling for submitted classifiers.
//!
//! Each job is driven through a small state machine:
//!
//! ```text
//! Submitted ──► Pending ◄──► TransientError
//!                  │
//!                  ├──► Ready   (terminal)
//!                  └──► Failed  (terminal)
//! ```
//!
//! Every non-terminal state waits one poll interval before the next status
//! query. A `404` on the status query is the service's post-creation
//! visibility race and moves to `TransientError`, which polls again like
//! `Pending`. Any other error ends polling and is returned to the caller.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::service::TrainingService;
use crate::telemetry;
use crate::types::{Classifier, ClassifierStatus, JobOutcome};
use crate::Result;

/// Default delay between status queries.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);

/// Where a job stands from the poller's point of view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollState {
    /// Created; not yet queried.
    Submitted,
    /// Service reported a non-terminal status.
    Pending(ClassifierStatus),
    /// Status query hit the not-found race; treated as pending.
    TransientError,
    Ready(Classifier),
    Failed(Classifier),
}

impl PollState {
    /// Apply one status query result.
    ///
    /// `Ready` and `Failed` absorb every further response. From any other
    /// state, an error that is not the visibility race is returned
    /// unchanged.
    pub fn advance(self, response: Result<Classifier>) -> Result<PollState> {
        match (self, response) {
            (done @ (PollState::Ready(_) | PollState::Failed(_)), _) => Ok(done),
            (_, Ok(classifier)) => Ok(match classifier.status {
                ClassifierStatus::Ready => PollState::Ready(classifier),
                ClassifierStatus::Failed => PollState::Failed(classifier),
                status => PollState::Pending(status),
            }),
            (_, Err(e)) if e.is_visibility_race() => Ok(PollState::TransientError),
            (_, Err(e)) => Err(e),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PollState::Ready(_) | PollState::Failed(_))
    }
}

/// Polls a classifier at a fixed interval until it is ready or failed.
#[derive(Clone)]
pub struct CompletionPoller {
    service: Arc<dyn TrainingService>,
    interval: Duration,
}

impl CompletionPoller {
    pub fn new(service: Arc<dyn TrainingService>, interval: Duration) -> Self {
        Self { service, interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait for `classifier` to reach a terminal state.
    ///
    /// The first query is issued immediately. There is no overall timeout:
    /// the loop ends on `ready`, `failed`, or a non-race error.
    pub async fn wait(&self, classifier: &Classifier) -> Result<JobOutcome> {
        let id = classifier.classifier_id.as_str();
        let mut state = PollState::Submitted;
        let mut attempt: u64 = 0;

        loop {
            attempt += 1;
            metrics::counter!(telemetry::STATUS_POLLS_TOTAL).increment(1);
            let response = self.service.get_classifier(id).await;

            state = match state.advance(response)? {
                PollState::Ready(c) => return Ok(JobOutcome::Ready(c)),
                PollState::Failed(c) => return Ok(JobOutcome::Failed(c)),
                PollState::TransientError => {
                    metrics::counter!(telemetry::VISIBILITY_RACES_TOTAL).increment(1);
                    warn!(
                        classifier_id = id,
                        attempt,
                        delay_ms = self.interval.as_millis() as u64,
                        "classifier not visible yet, retrying"
                    );
                    PollState::TransientError
                }
                next => {
                    debug!(classifier_id = id, attempt, state = ?next, "classifier still training");
                    next
                }
            };

            tokio::time::sleep(self.interval).await;
        }
    }
}
