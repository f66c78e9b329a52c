//! reqwest-backed implementation of [`PromotionApi`]. One client, bearer
//! auth on every call, a bounded per-request timeout, and a single place
//! where transport and HTTP failures become [`WorkflowError`] kinds.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use promotrack_core::config::ApiConfig;
use promotrack_core::domain::document::{DocumentId, DocumentRef};
use promotrack_core::domain::notification::Notification;
use promotrack_core::domain::request::{PromotionRequest, RequestDraft, RequestId};
use promotrack_core::domain::user::{User, UserId};
use promotrack_core::errors::WorkflowError;
use promotrack_core::lifecycle::Status;

use crate::api::{DocumentUpload, PromotionApi, RequestQuery, ReviewOutcome, ReviewSubmission};

pub struct HttpPromotionApi {
    client: Client,
    base_url: String,
    token: Option<SecretString>,
}

/// Error body the API returns alongside non-2xx statuses.
#[derive(Debug, Default, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    field: Option<String>,
    #[serde(default)]
    from_status: Option<String>,
}

impl HttpPromotionApi {
    pub fn new(config: &ApiConfig) -> Result<Self, WorkflowError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|error| WorkflowError::remote(error.to_string(), false))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{path}", self.base_url);
        let mut builder = self.client.request(method, url);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token.expose_secret());
        }
        builder
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, WorkflowError> {
        let response = self.send(builder).await?;
        response.json::<T>().await.map_err(|error| {
            WorkflowError::remote(format!("malformed response body: {error}"), false)
        })
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, WorkflowError> {
        let response = builder.send().await.map_err(map_transport_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.json::<ApiErrorBody>().await.unwrap_or_default();
        debug!(
            event_name = "api.request.failed",
            http_status = status.as_u16(),
            error_kind = body.kind.as_deref().unwrap_or("unknown"),
            "remote api call failed"
        );
        Err(map_error_response(status, body))
    }
}

fn map_transport_error(error: reqwest::Error) -> WorkflowError {
    let retryable = error.is_timeout() || error.is_connect();
    WorkflowError::remote(error.to_string(), retryable)
}

/// Maps an HTTP failure to the workflow taxonomy. The structured body wins
/// when present; otherwise the HTTP status decides. A 5xx is retryable, a
/// 4xx the client cannot interpret is not.
fn map_error_response(status: StatusCode, body: ApiErrorBody) -> WorkflowError {
    let message = body.message.clone().unwrap_or_else(|| format!("http status {status}"));

    match body.kind.as_deref() {
        Some("UNAUTHORIZED") => return WorkflowError::Unauthorized { detail: message },
        Some("INVALID_TRANSITION") => {
            if let Some(from) = body.from_status.as_deref().and_then(|raw| Status::parse(raw).ok())
            {
                return WorkflowError::InvalidTransition { from };
            }
            return WorkflowError::remote(message, false);
        }
        Some("VALIDATION_FAILED") => {
            return WorkflowError::ValidationFailed {
                field: body.field.unwrap_or_else(|| message.clone()),
            };
        }
        Some("NOT_FOUND") => {
            return WorkflowError::NotFound { id: body.field.unwrap_or_default() };
        }
        _ => {}
    }

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            WorkflowError::Unauthorized { detail: message }
        }
        StatusCode::NOT_FOUND => WorkflowError::NotFound { id: body.field.unwrap_or_default() },
        StatusCode::UNPROCESSABLE_ENTITY => WorkflowError::ValidationFailed {
            field: body.field.unwrap_or_else(|| message.clone()),
        },
        _ => WorkflowError::remote(message, status.is_server_error()),
    }
}

#[derive(Debug, Serialize)]
struct CreateRequestBody<'a> {
    applicant_id: &'a str,
    #[serde(flatten)]
    draft: &'a RequestDraft,
}

#[async_trait::async_trait]
impl PromotionApi for HttpPromotionApi {
    async fn fetch_requests(
        &self,
        query: &RequestQuery,
    ) -> Result<Vec<PromotionRequest>, WorkflowError> {
        let builder = match query {
            RequestQuery::All => self.request(Method::GET, "/requests"),
            RequestQuery::ByApplicant(applicant_id) => self
                .request(Method::GET, "/requests")
                .query(&[("applicantId", applicant_id.0.as_str())]),
            RequestQuery::ByDepartment(department_id) => self
                .request(Method::GET, "/requests")
                .query(&[("departmentId", department_id.0.as_str())]),
            RequestQuery::BySchool(school_id) => self
                .request(Method::GET, "/requests")
                .query(&[("schoolId", school_id.0.as_str())]),
            RequestQuery::ByStatus(status) => {
                self.request(Method::GET, "/requests").query(&[("status", status.as_str())])
            }
        };
        self.send_json(builder).await
    }

    async fn fetch_request(&self, id: &RequestId) -> Result<PromotionRequest, WorkflowError> {
        self.send_json(self.request(Method::GET, &format!("/requests/{}", id.0))).await
    }

    async fn fetch_user(&self, id: &UserId) -> Result<User, WorkflowError> {
        self.send_json(self.request(Method::GET, &format!("/users/{}", id.0))).await
    }

    async fn create_request(
        &self,
        applicant_id: &UserId,
        draft: RequestDraft,
    ) -> Result<PromotionRequest, WorkflowError> {
        draft.validate()?;
        let body = CreateRequestBody { applicant_id: &applicant_id.0, draft: &draft };
        self.send_json(self.request(Method::POST, "/requests").json(&body)).await
    }

    async fn update_draft(
        &self,
        id: &RequestId,
        draft: RequestDraft,
    ) -> Result<PromotionRequest, WorkflowError> {
        draft.validate()?;
        self.send_json(self.request(Method::PUT, &format!("/requests/{}", id.0)).json(&draft))
            .await
    }

    async fn delete_draft(&self, id: &RequestId) -> Result<(), WorkflowError> {
        self.send(self.request(Method::DELETE, &format!("/requests/{}", id.0))).await?;
        Ok(())
    }

    async fn submit_request(&self, id: &RequestId) -> Result<PromotionRequest, WorkflowError> {
        self.send_json(self.request(Method::POST, &format!("/requests/{}/submit", id.0))).await
    }

    async fn record_review(
        &self,
        submission: ReviewSubmission,
    ) -> Result<ReviewOutcome, WorkflowError> {
        self.send_json(self.request(Method::POST, "/reviews").json(&submission)).await
    }

    async fn upload_document(
        &self,
        upload: DocumentUpload,
    ) -> Result<DocumentRef, WorkflowError> {
        let mut builder = self
            .request(Method::POST, &format!("/requests/{}/documents", upload.request_id.0))
            .query(&[
                ("uploadedBy", upload.uploader_id.0.as_str()),
                ("originalName", upload.original_name.as_str()),
            ]);
        if let Some(document_type) = &upload.document_type {
            builder = builder.query(&[("documentType", document_type.as_str())]);
        }
        if let Some(description) = &upload.description {
            builder = builder.query(&[("description", description.as_str())]);
        }
        if let Some(content_type) = &upload.content_type {
            builder = builder.header(reqwest::header::CONTENT_TYPE, content_type);
        }
        self.send_json(builder.body(upload.content)).await
    }

    async fn download_document(&self, id: &DocumentId) -> Result<Vec<u8>, WorkflowError> {
        let response =
            self.send(self.request(Method::GET, &format!("/documents/{}", id.0))).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|error| WorkflowError::remote(error.to_string(), true))?;
        Ok(bytes.to_vec())
    }

    async fn notify(&self, notification: Notification) -> Result<(), WorkflowError> {
        self.send(self.request(Method::POST, "/notifications").json(&notification)).await?;
        Ok(())
    }

    async fn mark_hr_processed(&self, id: &RequestId) -> Result<PromotionRequest, WorkflowError> {
        self.send_json(self.request(Method::POST, &format!("/requests/{}/hr-processed", id.0)))
            .await
    }
}
