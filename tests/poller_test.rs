//! Tests for [`CompletionPoller`]: status polling on virtual time.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use mimir::{
    Classifier, ClassifierStatus, CompletionPoller, JobOutcome, MimirError, Result,
    TrainingRequest, TrainingService,
};

const INTERVAL: Duration = Duration::from_millis(2000);

/// One scripted answer to a status query.
#[derive(Clone, Copy)]
enum Reply {
    Status(ClassifierStatus),
    NotFound,
    Fatal,
}

/// Service that answers status queries from a script and records when
/// each query happened.
struct ScriptedService {
    replies: Mutex<VecDeque<Reply>>,
    queries: Mutex<Vec<Instant>>,
}

impl ScriptedService {
    fn new(replies: impl IntoIterator<Item = Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into_iter().collect()),
            queries: Mutex::new(Vec::new()),
        })
    }

    fn query_times(&self) -> Vec<Instant> {
        self.queries.lock().unwrap().clone()
    }

    fn remaining(&self) -> usize {
        self.replies.lock().unwrap().len()
    }
}

#[async_trait]
impl TrainingService for ScriptedService {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn create_classifier(&self, _request: &TrainingRequest) -> Result<Classifier> {
        Err(MimirError::InvalidInput("not scripted".into()))
    }

    async fn get_classifier(&self, classifier_id: &str) -> Result<Classifier> {
        self.queries.lock().unwrap().push(Instant::now());
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("script exhausted");
        match reply {
            Reply::Status(status) => {
                let c = Classifier::new(classifier_id, "fruit_apple_banana_pear", status);
                Ok(if status == ClassifierStatus::Failed {
                    c.with_explanation("corrupt archive")
                } else {
                    c
                })
            }
            Reply::NotFound => Err(MimirError::ClassifierNotFound(classifier_id.to_string())),
            Reply::Fatal => Err(MimirError::AuthenticationFailed),
        }
    }

    async fn list_classifiers(&self) -> Result<Vec<Classifier>> {
        Ok(Vec::new())
    }

    async fn delete_classifier(&self, _classifier_id: &str) -> Result<()> {
        Ok(())
    }
}

fn handle() -> Classifier {
    Classifier::new("c-1", "fruit_apple_banana_pear", ClassifierStatus::Training)
}

fn assert_spaced_by_interval(times: &[Instant]) {
    for pair in times.windows(2) {
        let gap = pair[1] - pair[0];
        assert!(
            gap >= INTERVAL && gap < INTERVAL + Duration::from_millis(10),
            "queries should be one interval apart, got {gap:?}"
        );
    }
}

#[tokio::test(start_paused = true)]
async fn ready_after_two_pending_polls() {
    let service = ScriptedService::new([
        Reply::Status(ClassifierStatus::Training),
        Reply::Status(ClassifierStatus::Training),
        Reply::Status(ClassifierStatus::Ready),
    ]);
    let poller = CompletionPoller::new(service.clone(), INTERVAL);

    let start = Instant::now();
    let outcome = poller.wait(&handle()).await.unwrap();

    assert!(outcome.is_ready());
    assert_eq!(outcome.classifier().classifier_id, "c-1");

    let times = service.query_times();
    assert_eq!(times.len(), 3);
    assert_eq!(times[0], start, "first query is immediate");
    assert_spaced_by_interval(&times);
}

#[tokio::test(start_paused = true)]
async fn not_found_race_is_retried_until_ready() {
    let mut script = vec![Reply::NotFound; 25];
    script.push(Reply::Status(ClassifierStatus::Training));
    script.push(Reply::NotFound);
    script.push(Reply::Status(ClassifierStatus::Ready));
    let service = ScriptedService::new(script);
    let poller = CompletionPoller::new(service.clone(), INTERVAL);

    let outcome = poller.wait(&handle()).await.unwrap();

    assert!(outcome.is_ready());
    let times = service.query_times();
    assert_eq!(times.len(), 28);
    assert_spaced_by_interval(&times);
}

#[tokio::test(start_paused = true)]
async fn failed_job_is_an_outcome_with_details() {
    let service = ScriptedService::new([
        Reply::Status(ClassifierStatus::Training),
        Reply::Status(ClassifierStatus::Failed),
    ]);
    let poller = CompletionPoller::new(service.clone(), INTERVAL);

    let outcome = poller.wait(&handle()).await.unwrap();

    match &outcome {
        JobOutcome::Failed(c) => assert_eq!(c.status, ClassifierStatus::Failed),
        other => panic!("expected failed outcome, got {other:?}"),
    }
    assert_eq!(outcome.explanation(), Some("corrupt archive"));
}

#[tokio::test(start_paused = true)]
async fn other_errors_stop_polling_immediately() {
    let service = ScriptedService::new([
        Reply::NotFound,
        Reply::Status(ClassifierStatus::Training),
        Reply::Fatal,
        Reply::Status(ClassifierStatus::Ready),
    ]);
    let poller = CompletionPoller::new(service.clone(), INTERVAL);

    let err = poller.wait(&handle()).await.unwrap_err();

    assert!(matches!(err, MimirError::AuthenticationFailed));
    assert_eq!(service.query_times().len(), 3);
    assert_eq!(service.remaining(), 1, "no query after the fatal error");
}

#[tokio::test(start_paused = true)]
async fn unknown_and_retraining_statuses_keep_polling() {
    let service = ScriptedService::new([
        Reply::Status(ClassifierStatus::Unknown),
        Reply::Status(ClassifierStatus::Retraining),
        Reply::Status(ClassifierStatus::Ready),
    ]);
    let poller = CompletionPoller::new(service.clone(), Duration::from_millis(250));

    let start = Instant::now();
    let outcome = poller.wait(&handle()).await.unwrap();

    assert!(outcome.is_ready());
    assert!(start.elapsed() >= Duration::from_millis(500));
}
