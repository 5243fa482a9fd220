//! Visual Recognition v3 API client for custom classifiers.
//!
//! Authenticates with an `api_key` query parameter and pins the API
//! behaviour with a `version` date, as the v3 endpoints require.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client, RequestBuilder};
use serde::Deserialize;
use tokio_util::io::ReaderStream;
use tracing::debug;

use super::traits::TrainingService;
use crate::types::{Classifier, TrainingRequest};
use crate::{MimirError, Result};

/// Default base URL for the Visual Recognition API.
pub const DEFAULT_BASE_URL: &str = "https://gateway-a.watsonplatform.net/visual-recognition/api";

/// Default API version date.
pub const DEFAULT_VERSION_DATE: &str = "2015-05-19";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Client for the Visual Recognition classifier endpoints.
#[derive(Clone)]
pub struct VisualRecognitionClient {
    api_key: String,
    http: Client,
    base_url: String,
    version_date: String,
}

impl VisualRecognitionClient {
    /// Create a client for the public endpoint.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a client with a custom base URL (for testing with wiremock).
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        Self::with_options(api_key, base_url, DEFAULT_VERSION_DATE, DEFAULT_TIMEOUT)
    }

    /// Create a client with every knob explicit.
    ///
    /// `timeout` bounds each request, including archive uploads.
    pub fn with_options(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        version_date: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MimirError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_key: api_key.into(),
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            version_date: version_date.into(),
        })
    }

    fn classifiers_url(&self) -> String {
        format!("{}/v3/classifiers", self.base_url)
    }

    fn classifier_url(&self, classifier_id: &str) -> String {
        format!("{}/v3/classifiers/{}", self.base_url, classifier_id)
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.query(&[
            ("api_key", self.api_key.as_str()),
            ("version", self.version_date.as_str()),
        ])
    }

    /// Open every archive and stream it into the multipart form.
    async fn build_form(request: &TrainingRequest) -> Result<Form> {
        let mut form = Form::new().text("name", request.name.clone());
        for slot in &request.slots {
            let file = tokio::fs::File::open(&slot.archive)
                .await
                .map_err(|e| MimirError::io(&slot.archive, e))?;
            let len = file
                .metadata()
                .await
                .map_err(|e| MimirError::io(&slot.archive, e))?
                .len();
            let body = Body::wrap_stream(ReaderStream::new(file));
            let part = Part::stream_with_length(body, len)
                .file_name(slot.file_name())
                .mime_str("application/zip")
                .map_err(|e| MimirError::Http(e.to_string()))?;
            form = form.part(slot.field_name(), part);
        }
        Ok(form)
    }

    /// Map non-success responses to errors, consuming the body for details.
    async fn check(
        response: reqwest::Response,
        classifier_id: Option<&str>,
    ) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        match status.as_u16() {
            401 | 403 => Err(MimirError::AuthenticationFailed),
            404 => Err(MimirError::ClassifierNotFound(
                classifier_id.unwrap_or("<none>").to_string(),
            )),
            429 => {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
                    .map(Duration::from_secs);
                Err(MimirError::RateLimited { retry_after })
            }
            code => {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ErrorBody>(&body)
                    .ok()
                    .and_then(ErrorBody::message)
                    .unwrap_or_else(|| format!("Visual Recognition API error: {status}"));
                Err(MimirError::Api {
                    status: code,
                    message,
                })
            }
        }
    }
}

/// Error payloads come in a few shapes depending on the failing layer.
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<ErrorField>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorField {
    Text(String),
    Detailed { description: String },
}

impl ErrorBody {
    fn message(self) -> Option<String> {
        match self.error {
            Some(ErrorField::Text(text)) => Some(text),
            Some(ErrorField::Detailed { description }) => Some(description),
            None => self.description,
        }
    }
}

#[derive(Deserialize)]
struct ClassifierList {
    classifiers: Vec<Classifier>,
}

#[async_trait]
impl TrainingService for VisualRecognitionClient {
    fn name(&self) -> &str {
        "visual-recognition"
    }

    async fn create_classifier(&self, request: &TrainingRequest) -> Result<Classifier> {
        let form = Self::build_form(request).await?;
        debug!(name = %request.name, slots = request.slots.len(), "uploading training archives");

        let response = self
            .authed(self.http.post(self.classifiers_url()))
            .multipart(form)
            .send()
            .await
            .map_err(|e| MimirError::Http(e.to_string()))?;

        Self::check(response, None)
            .await?
            .json()
            .await
            .map_err(|e| MimirError::Http(e.to_string()))
    }

    async fn get_classifier(&self, classifier_id: &str) -> Result<Classifier> {
        let response = self
            .authed(self.http.get(self.classifier_url(classifier_id)))
            .send()
            .await
            .map_err(|e| MimirError::Http(e.to_string()))?;

        Self::check(response, Some(classifier_id))
            .await?
            .json()
            .await
            .map_err(|e| MimirError::Http(e.to_string()))
    }

    async fn list_classifiers(&self) -> Result<Vec<Classifier>> {
        let response = self
            .authed(self.http.get(self.classifiers_url()))
            .query(&[("verbose", "true")])
            .send()
            .await
            .map_err(|e| MimirError::Http(e.to_string()))?;

        let list: ClassifierList = Self::check(response, None)
            .await?
            .json()
            .await
            .map_err(|e| MimirError::Http(e.to_string()))?;
        Ok(list.classifiers)
    }

    async fn delete_classifier(&self, classifier_id: &str) -> Result<()> {
        let response = self
            .authed(self.http.delete(self.classifier_url(classifier_id)))
            .send()
            .await
            .map_err(|e| MimirError::Http(e.to_string()))?;

        Self::check(response, Some(classifier_id)).await?;
        Ok(())
    }
}
