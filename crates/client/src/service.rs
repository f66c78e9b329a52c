//! Coordinates the remote API, the query cache and the current session.
//!
//! Two rules hold throughout: the server is the sole authority for status
//! (the cache is only ever updated from a server-returned request, never
//! from a locally derived one), and at most one transition per request may
//! be in flight from this client at a time.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use promotrack_core::authz::{can_review, is_applicant};
use promotrack_core::domain::notification::Notification;
use promotrack_core::domain::request::{PromotionRequest, RequestDraft, RequestId};
use promotrack_core::domain::review::Decision;
use promotrack_core::domain::user::User;
use promotrack_core::errors::WorkflowError;
use promotrack_core::presentation::presentation;

use crate::api::{PromotionApi, RequestQuery, ReviewOutcome, ReviewSubmission};
use crate::cache::QueryCache;

pub struct WorkflowService<A> {
    api: A,
    cache: QueryCache,
    user: User,
    in_flight: Arc<Mutex<HashSet<RequestId>>>,
}

/// Releases its request id from the in-flight set when dropped, so the
/// guard holds across `.await` points and failure paths alike.
struct InFlightGuard {
    id: RequestId,
    set: Arc<Mutex<HashSet<RequestId>>>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.set.lock().expect("in-flight lock").remove(&self.id);
    }
}

impl<A: PromotionApi> WorkflowService<A> {
    pub fn new(api: A, user: User) -> Self {
        Self { api, cache: QueryCache::new(), user, in_flight: Arc::new(Mutex::new(HashSet::new())) }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Gives the backing API up, dropping the cache and in-flight state.
    pub fn into_api(self) -> A {
        self.api
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Fetches a listing and caches it under its query. A failed fetch
    /// leaves any previously cached listing for that query untouched.
    pub async fn list(&self, query: RequestQuery) -> Result<Vec<PromotionRequest>, WorkflowError> {
        let requests = self.api.fetch_requests(&query).await?;
        self.cache.store(query, requests.clone());
        Ok(requests)
    }

    /// The cached listing for a query, or a fresh fetch if none exists.
    pub async fn list_cached(
        &self,
        query: RequestQuery,
    ) -> Result<Vec<PromotionRequest>, WorkflowError> {
        if let Some(listing) = self.cache.get(&query) {
            return Ok(listing.requests);
        }
        self.list(query).await
    }

    pub async fn get(&self, id: &RequestId) -> Result<PromotionRequest, WorkflowError> {
        let request = self.api.fetch_request(id).await?;
        self.cache.upsert_request(&request);
        Ok(request)
    }

    pub async fn create_draft(
        &self,
        draft: RequestDraft,
    ) -> Result<PromotionRequest, WorkflowError> {
        draft.validate()?;
        self.api.create_request(&self.user.id, draft).await
    }

    /// Edits a request still in draft. The server refuses edits past
    /// submission.
    pub async fn update_draft(
        &self,
        id: &RequestId,
        draft: RequestDraft,
    ) -> Result<PromotionRequest, WorkflowError> {
        draft.validate()?;
        let updated = self.api.update_draft(id, draft).await?;
        self.cache.upsert_request(&updated);
        Ok(updated)
    }

    pub async fn delete_draft(&self, id: &RequestId) -> Result<(), WorkflowError> {
        self.api.delete_draft(id).await?;
        self.cache.remove_request(id);
        Ok(())
    }

    /// Submits a draft. Pre-flight checks run locally so the applicant gets
    /// a specific error without a round trip, but the server re-validates
    /// and owns the actual transition.
    pub async fn submit(&self, id: &RequestId) -> Result<PromotionRequest, WorkflowError> {
        let _guard = self.begin_transition(id)?;

        let current = self.api.fetch_request(id).await?;
        if !is_applicant(&self.user, &current) {
            return Err(WorkflowError::Unauthorized {
                detail: format!("user `{}` is not the applicant of `{}`", self.user.id.0, id.0),
            });
        }
        current.validate_for_submission()?;

        let updated = self.api.submit_request(id).await?;
        self.cache.upsert_request(&updated);
        info!(
            event_name = "workflow.request.submitted",
            request_id = %updated.id.0,
            status = %updated.status,
            "promotion request submitted"
        );
        self.notify_applicant(&updated).await;
        Ok(updated)
    }

    /// Records a review. The returned request comes from the server; this
    /// client never computes the next status itself.
    pub async fn review(
        &self,
        id: &RequestId,
        decision: Decision,
        comments: &str,
    ) -> Result<ReviewOutcome, WorkflowError> {
        let _guard = self.begin_transition(id)?;

        let current = self.api.fetch_request(id).await?;
        // Terminal states are undefined transitions for everyone; classify
        // them before the authorization check so the caller sees the same
        // error the transition table reports.
        if current.status.is_terminal() {
            return Err(WorkflowError::InvalidTransition { from: current.status });
        }
        if !can_review(&self.user, &current) {
            return Err(WorkflowError::Unauthorized {
                detail: format!(
                    "user `{}` may not review request `{}` in status {}",
                    self.user.id.0, id.0, current.status
                ),
            });
        }
        if comments.trim().is_empty() {
            return Err(WorkflowError::validation("comments"));
        }

        let outcome = self
            .api
            .record_review(ReviewSubmission {
                request_id: id.clone(),
                reviewer_id: self.user.id.clone(),
                decision,
                comments: comments.trim().to_string(),
            })
            .await?;

        self.cache.upsert_request(&outcome.request);
        info!(
            event_name = "workflow.review.recorded",
            request_id = %outcome.request.id.0,
            reviewer_role = ?self.user.role,
            decision = ?decision,
            status = %outcome.request.status,
            "review recorded"
        );
        self.notify_applicant(&outcome.request).await;
        Ok(outcome)
    }

    pub async fn mark_hr_processed(
        &self,
        id: &RequestId,
    ) -> Result<PromotionRequest, WorkflowError> {
        let updated = self.api.mark_hr_processed(id).await?;
        self.cache.upsert_request(&updated);
        Ok(updated)
    }

    fn begin_transition(&self, id: &RequestId) -> Result<InFlightGuard, WorkflowError> {
        let mut set = self.in_flight.lock().expect("in-flight lock");
        if !set.insert(id.clone()) {
            return Err(WorkflowError::remote(
                format!("a transition for request `{}` is already in flight", id.0),
                true,
            ));
        }
        Ok(InFlightGuard { id: id.clone(), set: Arc::clone(&self.in_flight) })
    }

    async fn notify_applicant(&self, request: &PromotionRequest) {
        let label = presentation(request.status).label;
        let notification = Notification::status_change(
            request.applicant_id.clone(),
            request.id.clone(),
            format!("Promotion request {label}"),
            format!("Your promotion request `{}` is now: {label}", request.id.0),
        );
        if let Err(error) = self.api.notify(notification).await {
            warn!(
                event_name = "workflow.notify.failed",
                request_id = %request.id.0,
                error = %error,
                "applicant notification failed; transition already committed"
            );
        }
    }
}
