//! Tests for [`JobSubmitter`]: request building and slot routing.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use mimir::{
    Classifier, ClassifierStatus, Combination, JobSubmitter, MimirError, Result, SlotKind,
    TrainingRequest, TrainingService,
};

/// Records every creation request; optionally fails them.
#[derive(Default)]
struct RecordingService {
    requests: Mutex<Vec<TrainingRequest>>,
    fail: bool,
}

#[async_trait]
impl TrainingService for RecordingService {
    fn name(&self) -> &str {
        "recording"
    }

    async fn create_classifier(&self, request: &TrainingRequest) -> Result<Classifier> {
        self.requests.lock().unwrap().push(request.clone());
        if self.fail {
            return Err(MimirError::Api {
                status: 413,
                message: "archive too large".into(),
            });
        }
        Ok(Classifier::new(
            format!("{}_1", request.name),
            request.name.clone(),
            ClassifierStatus::Training,
        ))
    }

    async fn get_classifier(&self, classifier_id: &str) -> Result<Classifier> {
        Err(MimirError::ClassifierNotFound(classifier_id.to_string()))
    }

    async fn list_classifiers(&self) -> Result<Vec<Classifier>> {
        Ok(Vec::new())
    }

    async fn delete_classifier(&self, _classifier_id: &str) -> Result<()> {
        Ok(())
    }
}

fn tokens() -> Vec<String> {
    vec!["negative".to_string(), "non-fruit".to_string()]
}

#[tokio::test]
async fn one_negative_label_gets_the_negative_slot() {
    let service = Arc::new(RecordingService::default());
    let submitter = JobSubmitter::new(service.clone(), "/bundles", tokens());
    let combination = Combination::new("fruit", ["apple", "banana", "non-fruit"]);

    let classifier = submitter.submit(&combination).await.unwrap();
    assert_eq!(classifier.name, "fruit_apple_banana_non-fruit");
    assert_eq!(classifier.status, ClassifierStatus::Training);

    let requests = service.requests.lock().unwrap();
    let request = &requests[0];
    assert_eq!(request.name, "fruit_apple_banana_non-fruit");

    let negative = request.negative_slot().expect("negative slot");
    assert_eq!(negative.label, "non-fruit");
    assert_eq!(negative.archive, PathBuf::from("/bundles/fruit/non-fruit.zip"));
    assert_eq!(negative.field_name(), "negative_examples");

    let positives: Vec<_> = request.positive_slots().map(|s| s.field_name()).collect();
    assert_eq!(
        positives,
        vec!["apple_positive_examples", "banana_positive_examples"]
    );
    assert_eq!(
        request.slots.iter().filter(|s| s.kind == SlotKind::Negative).count(),
        1
    );
}

#[tokio::test]
async fn all_positive_without_negative_token() {
    let service = Arc::new(RecordingService::default());
    let submitter = JobSubmitter::new(service.clone(), "/bundles", tokens());

    submitter
        .submit(&Combination::new("fruit", ["apple", "banana", "pear"]))
        .await
        .unwrap();

    let requests = service.requests.lock().unwrap();
    assert!(requests[0].negative_slot().is_none());
    assert_eq!(requests[0].positive_slots().count(), 3);
}

#[tokio::test]
async fn two_negative_labels_rejected_before_upload() {
    let service = Arc::new(RecordingService::default());
    let submitter = JobSubmitter::new(service.clone(), "/bundles", tokens());

    let err = submitter
        .submit(&Combination::new("fruit", ["apple", "negative", "non-fruit"]))
        .await
        .unwrap_err();

    assert!(matches!(err, MimirError::InvalidInput(_)));
    assert!(service.requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn submission_errors_are_not_retried() {
    let service = Arc::new(RecordingService {
        fail: true,
        ..Default::default()
    });
    let submitter = JobSubmitter::new(service.clone(), "/bundles", tokens());

    let err = submitter
        .submit(&Combination::new("fruit", ["apple", "banana", "pear"]))
        .await
        .unwrap_err();

    assert!(matches!(err, MimirError::Api { status: 413, .. }));
    assert_eq!(service.requests.lock().unwrap().len(), 1);
}
