use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::document::DocumentRef;
use crate::domain::org::{DepartmentId, SchoolId};
use crate::domain::rank::Rank;
use crate::domain::review::Review;
use crate::domain::user::UserId;
use crate::errors::WorkflowError;
use crate::lifecycle::Status;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub String);

/// A promotion request as the remote store reports it. The store assigns
/// `id` on creation; `applicant_id`, `department_id` and `school_id` are
/// immutable after creation except that org scope may be edited while the
/// request is still a draft.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromotionRequest {
    pub id: RequestId,
    pub applicant_id: UserId,
    pub applicant_name: String,
    pub department_id: DepartmentId,
    pub school_id: SchoolId,
    pub current_rank: Rank,
    pub applied_rank: Rank,
    pub status: Status,
    pub justification: String,
    pub documents: Vec<DocumentRef>,
    pub reviews: Vec<Review>,
    pub submission_date: Option<DateTime<Utc>>,
    pub hod_review_date: Option<DateTime<Utc>>,
    pub dean_review_date: Option<DateTime<Utc>>,
    pub dvc_review_date: Option<DateTime<Utc>>,
    /// Administrative bookkeeping set by HR after approval; not a status.
    pub hr_processed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The applicant-editable portion of a request, used at creation and while
/// the request remains in `Draft`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestDraft {
    pub department_id: DepartmentId,
    pub school_id: SchoolId,
    pub current_rank: Rank,
    pub applied_rank: Rank,
    pub justification: String,
}

impl RequestDraft {
    /// Creation-time invariant: the applied rank must be strictly senior to
    /// the current one.
    pub fn validate(&self) -> Result<(), WorkflowError> {
        if self.applied_rank <= self.current_rank {
            return Err(WorkflowError::validation(format!(
                "applied rank `{}` is not senior to current rank `{}`",
                self.applied_rank, self.current_rank
            )));
        }
        Ok(())
    }
}

impl PromotionRequest {
    /// Checks everything a submission requires: non-empty justification, at
    /// least one document, and the rank ordering. Reports the first missing
    /// field so the applicant knows what to fix.
    pub fn validate_for_submission(&self) -> Result<(), WorkflowError> {
        if self.status != Status::Draft {
            return Err(WorkflowError::InvalidTransition { from: self.status });
        }
        if self.justification.trim().is_empty() {
            return Err(WorkflowError::validation("justification"));
        }
        if self.documents.is_empty() {
            return Err(WorkflowError::validation("documents"));
        }
        if self.applied_rank <= self.current_rank {
            return Err(WorkflowError::validation(format!(
                "applied rank `{}` is not senior to current rank `{}`",
                self.applied_rank, self.current_rank
            )));
        }
        Ok(())
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}


#[cfg(test)]
mod tests {
    use crate::domain::org::{DepartmentId, SchoolId};
    use crate::domain::rank::Rank;
    use crate::errors::WorkflowError;
    use crate::lifecycle::Status;

    use super::fixtures::request;
    use super::RequestDraft;

    fn draft(current: Rank, applied: Rank) -> RequestDraft {
        RequestDraft {
            department_id: DepartmentId("d-3".to_string()),
            school_id: SchoolId("s-1".to_string()),
            current_rank: current,
            applied_rank: applied,
            justification: "Ready for promotion".to_string(),
        }
    }

    #[test]
    fn draft_requires_strictly_senior_applied_rank() {
        assert!(draft(Rank::Lecturer, Rank::SeniorLecturer).validate().is_ok());

        let downgrade = draft(Rank::SeniorLecturer, Rank::Lecturer).validate();
        assert!(matches!(downgrade, Err(WorkflowError::ValidationFailed { .. })));

        let sideways = draft(Rank::Lecturer, Rank::Lecturer).validate();
        assert!(matches!(sideways, Err(WorkflowError::ValidationFailed { .. })));
    }

    #[test]
    fn submission_requires_justification() {
        let mut request = request("r-1", Status::Draft);
        request.justification = "   ".to_string();

        let error = request.validate_for_submission().expect_err("empty justification");
        assert_eq!(error, WorkflowError::validation("justification"));
    }

    #[test]
    fn submission_requires_at_least_one_document() {
        let mut request = request("r-1", Status::Draft);
        request.documents.clear();

        let error = request.validate_for_submission().expect_err("no documents");
        assert_eq!(error, WorkflowError::validation("documents"));
    }

    #[test]
    fn submission_is_only_legal_from_draft() {
        let request = request("r-1", Status::Submitted);
        let error = request.validate_for_submission().expect_err("already submitted");
        assert_eq!(error, WorkflowError::InvalidTransition { from: Status::Submitted });
    }

    #[test]
    fn complete_draft_passes_submission_validation() {
        assert!(request("r-1", Status::Draft).validate_for_submission().is_ok());
    }
}
