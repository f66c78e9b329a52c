//! In-memory implementation of [`PromotionApi`] for tests and offline use.
//! It plays the server's part faithfully: it enforces the transition table,
//! stamps review dates exactly once, appends review records, and refuses
//! invalid submissions, so code exercised against it sees the same
//! behaviour the remote API provides.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use promotrack_core::domain::document::{DocumentId, DocumentRef};
use promotrack_core::domain::notification::Notification;
use promotrack_core::domain::request::{PromotionRequest, RequestDraft, RequestId};
use promotrack_core::domain::review::Decision;
use promotrack_core::domain::user::{Role, User, UserId};
use promotrack_core::errors::WorkflowError;
use promotrack_core::lifecycle::{apply_transition, Action, Status};

use crate::api::{DocumentUpload, PromotionApi, RequestQuery, ReviewOutcome, ReviewSubmission};

#[derive(Default)]
struct Inner {
    requests: Vec<PromotionRequest>,
    users: HashMap<UserId, User>,
    blobs: HashMap<DocumentId, Vec<u8>>,
    notifications: Vec<Notification>,
    next_id: u64,
}

#[derive(Default)]
pub struct InMemoryPromotionApi {
    inner: Mutex<Inner>,
}

impl InMemoryPromotionApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user the simulated server knows about. Reviews and
    /// request creation resolve actors through this registry.
    pub fn register_user(&self, user: User) {
        let mut inner = self.inner.lock().expect("state lock");
        inner.users.insert(user.id.clone(), user);
    }

    /// Seeds a request directly, bypassing the creation flow. Test setup
    /// only.
    pub fn seed_request(&self, request: PromotionRequest) {
        let mut inner = self.inner.lock().expect("state lock");
        inner.requests.push(request);
    }

    /// Notifications sent so far, in send order.
    pub fn sent_notifications(&self) -> Vec<Notification> {
        self.inner.lock().expect("state lock").notifications.clone()
    }

    fn find_user(inner: &Inner, id: &UserId) -> Result<User, WorkflowError> {
        inner
            .users
            .get(id)
            .cloned()
            .ok_or_else(|| WorkflowError::NotFound { id: id.0.clone() })
    }

    fn find_request_mut<'a>(
        inner: &'a mut Inner,
        id: &RequestId,
    ) -> Result<&'a mut PromotionRequest, WorkflowError> {
        inner
            .requests
            .iter_mut()
            .find(|request| &request.id == id)
            .ok_or_else(|| WorkflowError::NotFound { id: id.0.clone() })
    }
}

#[async_trait]
impl PromotionApi for InMemoryPromotionApi {
    async fn fetch_requests(
        &self,
        query: &RequestQuery,
    ) -> Result<Vec<PromotionRequest>, WorkflowError> {
        let inner = self.inner.lock().expect("state lock");
        let matches = |request: &PromotionRequest| match query {
            RequestQuery::All => true,
            RequestQuery::ByApplicant(applicant_id) => &request.applicant_id == applicant_id,
            RequestQuery::ByDepartment(department_id) => &request.department_id == department_id,
            RequestQuery::BySchool(school_id) => &request.school_id == school_id,
            RequestQuery::ByStatus(status) => &request.status == status,
        };
        Ok(inner.requests.iter().filter(|request| matches(request)).cloned().collect())
    }

    async fn fetch_request(&self, id: &RequestId) -> Result<PromotionRequest, WorkflowError> {
        let inner = self.inner.lock().expect("state lock");
        inner
            .requests
            .iter()
            .find(|request| &request.id == id)
            .cloned()
            .ok_or_else(|| WorkflowError::NotFound { id: id.0.clone() })
    }

    async fn fetch_user(&self, id: &UserId) -> Result<User, WorkflowError> {
        let inner = self.inner.lock().expect("state lock");
        Self::find_user(&inner, id)
    }

    async fn create_request(
        &self,
        applicant_id: &UserId,
        draft: RequestDraft,
    ) -> Result<PromotionRequest, WorkflowError> {
        draft.validate()?;
        let mut inner = self.inner.lock().expect("state lock");
        let applicant = Self::find_user(&inner, applicant_id)?;

        inner.next_id += 1;
        let now = Utc::now();
        let request = PromotionRequest {
            id: RequestId(format!("REQ-{:04}", inner.next_id)),
            applicant_id: applicant.id.clone(),
            applicant_name: applicant.full_name.clone(),
            department_id: draft.department_id,
            school_id: draft.school_id,
            current_rank: draft.current_rank,
            applied_rank: draft.applied_rank,
            status: Status::Draft,
            justification: draft.justification,
            documents: Vec::new(),
            reviews: Vec::new(),
            submission_date: None,
            hod_review_date: None,
            dean_review_date: None,
            dvc_review_date: None,
            hr_processed: false,
            created_at: now,
            updated_at: now,
        };
        inner.requests.push(request.clone());
        Ok(request)
    }

    async fn update_draft(
        &self,
        id: &RequestId,
        draft: RequestDraft,
    ) -> Result<PromotionRequest, WorkflowError> {
        draft.validate()?;
        let mut inner = self.inner.lock().expect("state lock");
        let request = Self::find_request_mut(&mut inner, id)?;
        if request.status != Status::Draft {
            return Err(WorkflowError::InvalidTransition { from: request.status });
        }
        request.department_id = draft.department_id;
        request.school_id = draft.school_id;
        request.current_rank = draft.current_rank;
        request.applied_rank = draft.applied_rank;
        request.justification = draft.justification;
        request.updated_at = Utc::now();
        Ok(request.clone())
    }

    async fn delete_draft(&self, id: &RequestId) -> Result<(), WorkflowError> {
        let mut inner = self.inner.lock().expect("state lock");
        let request = Self::find_request_mut(&mut inner, id)?;
        if request.status != Status::Draft {
            return Err(WorkflowError::InvalidTransition { from: request.status });
        }
        inner.requests.retain(|request| &request.id != id);
        Ok(())
    }

    async fn submit_request(&self, id: &RequestId) -> Result<PromotionRequest, WorkflowError> {
        let mut inner = self.inner.lock().expect("state lock");
        let applicant_id = Self::find_request_mut(&mut inner, id)?.applicant_id.clone();
        let applicant = Self::find_user(&inner, &applicant_id).unwrap_or(User {
            id: applicant_id,
            role: Role::Academic,
            full_name: String::new(),
            department_id: None,
            school_id: None,
        });

        let request = Self::find_request_mut(&mut inner, id)?;
        request.validate_for_submission()?;
        apply_transition(request, &applicant, Action::Submit, None, Utc::now())?;
        Ok(request.clone())
    }

    async fn record_review(
        &self,
        submission: ReviewSubmission,
    ) -> Result<ReviewOutcome, WorkflowError> {
        let mut inner = self.inner.lock().expect("state lock");
        let reviewer = Self::find_user(&inner, &submission.reviewer_id)?;

        let request = Self::find_request_mut(&mut inner, &submission.request_id)?;
        if request.status.is_terminal() {
            return Err(WorkflowError::InvalidTransition { from: request.status });
        }
        if !promotrack_core::can_review(&reviewer, request) {
            return Err(WorkflowError::Unauthorized {
                detail: format!(
                    "user `{}` may not review request `{}` in status {}",
                    reviewer.id.0, request.id.0, request.status
                ),
            });
        }

        let action = match submission.decision {
            Decision::Approved => Action::Approve,
            Decision::Rejected => Action::Reject,
        };
        apply_transition(request, &reviewer, action, Some(&submission.comments), Utc::now())?;

        let review = request.reviews.last().cloned().ok_or_else(|| {
            WorkflowError::remote("transition completed without a review record", false)
        })?;
        Ok(ReviewOutcome { request: request.clone(), review })
    }

    async fn upload_document(
        &self,
        upload: DocumentUpload,
    ) -> Result<DocumentRef, WorkflowError> {
        let mut inner = self.inner.lock().expect("state lock");
        let document = DocumentRef {
            id: DocumentId(Uuid::new_v4().to_string()),
            request_id: upload.request_id.clone(),
            original_name: upload.original_name,
            content_type: upload.content_type,
            size_bytes: Some(upload.content.len() as u64),
            document_type: upload.document_type,
            description: upload.description,
            uploaded_by: upload.uploader_id,
            uploaded_at: Utc::now(),
        };

        // Resolve the request before storing the blob; a failed upload must
        // leave no orphan behind.
        let request = Self::find_request_mut(&mut inner, &upload.request_id)?;
        request.documents.push(document.clone());
        inner.blobs.insert(document.id.clone(), upload.content);
        Ok(document)
    }

    async fn download_document(&self, id: &DocumentId) -> Result<Vec<u8>, WorkflowError> {
        let inner = self.inner.lock().expect("state lock");
        inner
            .blobs
            .get(id)
            .cloned()
            .ok_or_else(|| WorkflowError::NotFound { id: id.0.clone() })
    }

    async fn notify(&self, notification: Notification) -> Result<(), WorkflowError> {
        let mut inner = self.inner.lock().expect("state lock");
        inner.notifications.push(notification);
        Ok(())
    }

    async fn mark_hr_processed(&self, id: &RequestId) -> Result<PromotionRequest, WorkflowError> {
        let mut inner = self.inner.lock().expect("state lock");
        let request = Self::find_request_mut(&mut inner, id)?;
        if request.status != Status::DvcApproved {
            return Err(WorkflowError::InvalidTransition { from: request.status });
        }
        request.hr_processed = true;
        request.updated_at = Utc::now();
        Ok(request.clone())
    }
}
