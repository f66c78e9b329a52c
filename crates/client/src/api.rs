//! The contract this client requires from the remote promotion API. The
//! server is the authority for status: every transition call returns the
//! updated request, and callers take that as truth rather than deriving the
//! new status locally.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use promotrack_core::domain::document::{DocumentId, DocumentRef};
use promotrack_core::domain::notification::Notification;
use promotrack_core::domain::org::{DepartmentId, SchoolId};
use promotrack_core::domain::request::{PromotionRequest, RequestDraft, RequestId};
use promotrack_core::domain::review::{Decision, Review};
use promotrack_core::domain::user::{User, UserId};
use promotrack_core::errors::WorkflowError;
use promotrack_core::lifecycle::Status;

/// One listing query. Doubles as the response-cache key, so it is `Hash`
/// and carries exactly the parameters the fetch was issued with.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestQuery {
    All,
    ByApplicant(UserId),
    ByDepartment(DepartmentId),
    BySchool(SchoolId),
    ByStatus(Status),
}

/// Payload for `record_review`. The reviewer's role travels with the
/// submission so the server can enforce the transition table server-side.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewSubmission {
    pub request_id: RequestId,
    pub reviewer_id: UserId,
    pub decision: Decision,
    pub comments: String,
}

/// Upload payload. The bytes travel as the request body, not as JSON, so
/// this deliberately carries no serde derives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentUpload {
    pub request_id: RequestId,
    pub uploader_id: UserId,
    pub original_name: String,
    pub content_type: Option<String>,
    pub document_type: Option<String>,
    pub description: Option<String>,
    pub content: Vec<u8>,
}

/// The updated request plus the review the server recorded for it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewOutcome {
    pub request: PromotionRequest,
    pub review: Review,
}

#[async_trait]
pub trait PromotionApi: Send + Sync {
    async fn fetch_requests(
        &self,
        query: &RequestQuery,
    ) -> Result<Vec<PromotionRequest>, WorkflowError>;

    async fn fetch_request(&self, id: &RequestId) -> Result<PromotionRequest, WorkflowError>;

    /// Resolves a user by id, including role and unit membership.
    async fn fetch_user(&self, id: &UserId) -> Result<User, WorkflowError>;

    /// Creates a request; the store assigns the id and forces status `DRAFT`.
    async fn create_request(
        &self,
        applicant_id: &UserId,
        draft: RequestDraft,
    ) -> Result<PromotionRequest, WorkflowError>;

    /// Edits a request still in `DRAFT`.
    async fn update_draft(
        &self,
        id: &RequestId,
        draft: RequestDraft,
    ) -> Result<PromotionRequest, WorkflowError>;

    async fn delete_draft(&self, id: &RequestId) -> Result<(), WorkflowError>;

    /// `DRAFT -> SUBMITTED`; fails on empty justification or zero documents.
    async fn submit_request(&self, id: &RequestId) -> Result<PromotionRequest, WorkflowError>;

    /// Records a review; the server also advances the status and returns
    /// the updated request.
    async fn record_review(
        &self,
        submission: ReviewSubmission,
    ) -> Result<ReviewOutcome, WorkflowError>;

    async fn upload_document(
        &self,
        upload: DocumentUpload,
    ) -> Result<DocumentRef, WorkflowError>;

    async fn download_document(&self, id: &DocumentId) -> Result<Vec<u8>, WorkflowError>;

    /// Fire-and-forget; callers log failures and move on.
    async fn notify(&self, notification: Notification) -> Result<(), WorkflowError>;

    /// HR bookkeeping flag; legal only on `DVC_APPROVED` requests.
    async fn mark_hr_processed(&self, id: &RequestId) -> Result<PromotionRequest, WorkflowError>;
}
