//! Bounded-concurrency driver: submit, poll, cool down, collect.

use std::time::Duration;

use futures_util::{StreamExt, TryStreamExt, stream};
use serde::Deserialize;
use tokio::time::Instant;
use tracing::{info, warn};

use super::poller::CompletionPoller;
use super::submitter::JobSubmitter;
use crate::telemetry;
use crate::types::{Combination, JobOutcome, ResultSet, TrainingResult};
use crate::{MimirError, Result};

/// Default number of combinations in flight at once.
///
/// Creating many classifiers in parallel produced unreliable models, so
/// the default serialises the run.
pub const DEFAULT_CONCURRENCY: usize = 1;

/// Default pause after a job finishes before its slot takes the next one.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(5);

/// Logged and reported when a failed job carries no explanation.
const MISSING_EXPLANATION: &str = "no explanation given";

/// What to do when a job ends in the `failed` state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Keep the failed classifier in the result set and carry on.
    #[default]
    Record,
    /// Abort the run with [`MimirError::TrainingFailed`].
    Abort,
}

/// Orchestrator tuning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestratorConfig {
    /// Maximum in-flight submit+poll pipelines (0 is treated as 1).
    pub concurrency: usize,
    /// Pause after each job reaches a terminal state.
    pub cooldown: Duration,
    pub failure_policy: FailurePolicy,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            cooldown: DEFAULT_COOLDOWN,
            failure_policy: FailurePolicy::default(),
        }
    }
}

/// Runs every combination through submit → poll → cooldown.
#[derive(Clone)]
pub struct Orchestrator {
    submitter: JobSubmitter,
    poller: CompletionPoller,
    config: OrchestratorConfig,
}

impl Orchestrator {
    pub fn new(
        submitter: JobSubmitter,
        poller: CompletionPoller,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            submitter,
            poller,
            config,
        }
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Train every combination, returning results in input order.
    ///
    /// Up to `concurrency` pipelines run at once. Fails fast: the first
    /// fatal error stops scheduling, drops any other in-flight pipelines and
    /// is returned. Failed jobs are fatal only under
    /// [`FailurePolicy::Abort`].
    pub async fn run(&self, combinations: Vec<Combination>) -> Result<ResultSet> {
        let total = combinations.len();
        let concurrency = self.config.concurrency.max(1);
        info!(total, concurrency, "starting training run");

        // Slots free up as soon as a job finishes; order is restored below.
        let mut indexed: Vec<(usize, TrainingResult)> =
            stream::iter(combinations.into_iter().enumerate())
                .map(|(index, combination)| async move {
                    let result = self.train(index, total, combination).await?;
                    Ok::<_, MimirError>((index, result))
                })
                .buffer_unordered(concurrency)
                .try_collect()
                .await?;
        indexed.sort_by_key(|(index, _)| *index);
        let results: ResultSet = indexed.into_iter().map(|(_, result)| result).collect();

        let failed = results.iter().filter(|r| r.is_failed()).count();
        info!(total, failed, "training run finished");
        Ok(results)
    }

    async fn train(
        &self,
        index: usize,
        total: usize,
        combination: Combination,
    ) -> Result<TrainingResult> {
        let started = Instant::now();
        info!(job = index + 1, total, name = %combination, "training classifier");

        let classifier = self.submitter.submit(&combination).await?;
        let outcome = self.poller.wait(&classifier).await?;

        let label = outcome.label();
        metrics::counter!(telemetry::JOBS_COMPLETED_TOTAL, "outcome" => label).increment(1);
        metrics::histogram!(telemetry::JOB_DURATION_SECONDS, "outcome" => label)
            .record(started.elapsed().as_secs_f64());

        match &outcome {
            JobOutcome::Ready(c) => {
                info!(classifier_id = %c.classifier_id, name = %c.name, "classifier ready");
            }
            JobOutcome::Failed(c) => {
                let explanation = outcome.explanation().unwrap_or(MISSING_EXPLANATION);
                warn!(
                    classifier_id = %c.classifier_id,
                    name = %c.name,
                    explanation,
                    "classifier training failed"
                );
                if self.config.failure_policy == FailurePolicy::Abort {
                    return Err(MimirError::TrainingFailed {
                        classifier_id: c.classifier_id.clone(),
                        name: c.name.clone(),
                        explanation: explanation.to_string(),
                    });
                }
            }
        }

        tokio::time::sleep(self.config.cooldown).await;
        Ok(TrainingResult::new(combination, outcome))
    }
}
