//! The promotion request lifecycle: one canonical status vocabulary, one
//! transition table, and the stamping rules every consumer shares.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::request::PromotionRequest;
use crate::domain::review::{Decision, Review, ReviewId};
use crate::domain::user::{Role, User};
use crate::errors::WorkflowError;

/// Canonical request statuses, declaration order = workflow order.
///
/// `UnderDeanReview` and `UnderDvcReview` are queue-claim states the server
/// may report while a reviewer holds a request; the client parses, groups
/// and presents them but never produces them, and defines no transition out
/// of them.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Draft,
    Submitted,
    HodReviewed,
    UnderDeanReview,
    DeanReviewed,
    UnderDvcReview,
    DvcApproved,
    DvcRejected,
}

/// The role a request is currently waiting on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    Applicant,
    Hod,
    Dean,
    Dvc,
    Closed,
}

/// What an actor is asking the workflow to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Submit,
    Approve,
    Reject,
}

impl Status {
    pub const ALL: [Status; 8] = [
        Status::Draft,
        Status::Submitted,
        Status::HodReviewed,
        Status::UnderDeanReview,
        Status::DeanReviewed,
        Status::UnderDvcReview,
        Status::DvcApproved,
        Status::DvcRejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Submitted => "SUBMITTED",
            Self::HodReviewed => "HOD_REVIEWED",
            Self::UnderDeanReview => "UNDER_DEAN_REVIEW",
            Self::DeanReviewed => "DEAN_REVIEWED",
            Self::UnderDvcReview => "UNDER_DVC_REVIEW",
            Self::DvcApproved => "DVC_APPROVED",
            Self::DvcRejected => "DVC_REJECTED",
        }
    }

    /// Parses a status string. The legacy store holds mixed-case rows, so
    /// matching is case-insensitive; anything outside the eight canonical
    /// values is rejected.
    pub fn parse(raw: &str) -> Result<Self, WorkflowError> {
        let key = raw.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == key)
            .ok_or_else(|| WorkflowError::validation(format!("unknown status `{raw}`")))
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::DvcApproved | Self::DvcRejected)
    }

    pub fn stage(&self) -> Stage {
        match self {
            Self::Draft => Stage::Applicant,
            Self::Submitted => Stage::Hod,
            Self::HodReviewed | Self::UnderDeanReview => Stage::Dean,
            Self::DeanReviewed | Self::UnderDvcReview => Stage::Dvc,
            Self::DvcApproved | Self::DvcRejected => Stage::Closed,
        }
    }

    /// True for requests sitting in the DVC work queue.
    pub fn awaiting_dvc(&self) -> bool {
        self.stage() == Stage::Dvc
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The transition table. Pure: the same `(current, role, action)` always
/// yields the same status or the same error kind.
///
/// A terminal current state fails `InvalidTransition` regardless of actor.
/// A `(current, action)` pair with no row fails `InvalidTransition`; a
/// defined row attempted by the wrong role fails `Unauthorized`. Rejection
/// by HOD or Dean is deliberately undefined: only the DVC stage rejects.
pub fn next_status(current: Status, role: Role, action: Action) -> Result<Status, WorkflowError> {
    if current.is_terminal() {
        return Err(WorkflowError::InvalidTransition { from: current });
    }

    let (required_role, next) = match (current, action) {
        (Status::Draft, Action::Submit) => (Role::Academic, Status::Submitted),
        (Status::Submitted, Action::Approve) => (Role::Hod, Status::HodReviewed),
        (Status::HodReviewed, Action::Approve) => (Role::Dean, Status::DeanReviewed),
        (Status::DeanReviewed, Action::Approve) => (Role::Dvc, Status::DvcApproved),
        (Status::DeanReviewed, Action::Reject) => (Role::Dvc, Status::DvcRejected),
        _ => return Err(WorkflowError::InvalidTransition { from: current }),
    };

    if role != required_role {
        return Err(WorkflowError::unauthorized_role(role, current));
    }

    Ok(next)
}

/// Applies one transition to a request the way the server does: advances the
/// status, stamps the matching date field exactly once, and for review
/// transitions appends exactly one review record. Used by test doubles and
/// by server-simulation code; the production client never applies a
/// transition locally — it takes the server's returned request as truth.
pub fn apply_transition(
    request: &mut PromotionRequest,
    actor: &User,
    action: Action,
    comments: Option<&str>,
    now: DateTime<Utc>,
) -> Result<Status, WorkflowError> {
    let next = next_status(request.status, actor.role, action)?;

    if action != Action::Submit {
        let comments = comments.map(str::trim).unwrap_or_default();
        if comments.is_empty() {
            return Err(WorkflowError::validation("comments"));
        }
        let decision =
            if action == Action::Approve { Decision::Approved } else { Decision::Rejected };
        request.reviews.push(Review {
            id: ReviewId(Uuid::new_v4().to_string()),
            request_id: request.id.clone(),
            reviewer_id: actor.id.clone(),
            reviewer_role: actor.role,
            decision,
            comments: comments.to_string(),
            review_date: now,
        });
    }

    let date_slot = match next {
        Status::Submitted => &mut request.submission_date,
        Status::HodReviewed => &mut request.hod_review_date,
        Status::DeanReviewed => &mut request.dean_review_date,
        Status::DvcApproved | Status::DvcRejected => &mut request.dvc_review_date,
        _ => unreachable!("transition table only produces stamped states"),
    };
    if date_slot.is_none() {
        *date_slot = Some(now);
    }

    request.status = next;
    request.updated_at = now;
    Ok(next)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use crate::domain::request::fixtures::request;
    use crate::domain::user::{Role, User, UserId};
    use crate::errors::WorkflowError;

    use super::{apply_transition, next_status, Action, Stage, Status};

    fn actor(id: &str, role: Role) -> User {
        User {
            id: UserId(id.to_string()),
            role,
            full_name: "Reviewer".to_string(),
            department_id: None,
            school_id: None,
        }
    }

    #[test]
    fn only_canonical_statuses_parse() {
        assert_eq!(Status::parse("DVC_APPROVED").expect("parse"), Status::DvcApproved);
        assert_eq!(Status::parse("submitted").expect("parse"), Status::Submitted);
        assert_eq!(Status::parse("  hod_reviewed ").expect("parse"), Status::HodReviewed);
        assert!(Status::parse("PENDING").is_err());
        assert!(Status::parse("").is_err());
    }

    #[test]
    fn round_trips_through_canonical_strings() {
        for status in Status::ALL {
            assert_eq!(Status::parse(status.as_str()).expect("round trip"), status);
        }
    }

    #[test]
    fn wire_form_matches_the_canonical_strings() {
        let json = serde_json::to_string(&Status::DvcApproved).expect("serialize");
        assert_eq!(json, "\"DVC_APPROVED\"");
        let parsed: Status = serde_json::from_str("\"UNDER_DEAN_REVIEW\"").expect("deserialize");
        assert_eq!(parsed, Status::UnderDeanReview);
    }

    #[test]
    fn happy_path_walks_the_full_chain() {
        assert_eq!(
            next_status(Status::Draft, Role::Academic, Action::Submit).expect("submit"),
            Status::Submitted
        );
        assert_eq!(
            next_status(Status::Submitted, Role::Hod, Action::Approve).expect("hod"),
            Status::HodReviewed
        );
        assert_eq!(
            next_status(Status::HodReviewed, Role::Dean, Action::Approve).expect("dean"),
            Status::DeanReviewed
        );
        assert_eq!(
            next_status(Status::DeanReviewed, Role::Dvc, Action::Approve).expect("approve"),
            Status::DvcApproved
        );
        assert_eq!(
            next_status(Status::DeanReviewed, Role::Dvc, Action::Reject).expect("reject"),
            Status::DvcRejected
        );
    }

    #[test]
    fn terminal_states_never_transition() {
        for status in [Status::DvcApproved, Status::DvcRejected] {
            for role in [Role::Academic, Role::Hod, Role::Dean, Role::Dvc, Role::Hr, Role::Admin] {
                for action in [Action::Submit, Action::Approve, Action::Reject] {
                    assert_eq!(
                        next_status(status, role, action),
                        Err(WorkflowError::InvalidTransition { from: status }),
                        "{status:?} must be terminal for {role:?}/{action:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn wrong_role_on_a_defined_row_is_unauthorized() {
        assert!(matches!(
            next_status(Status::Submitted, Role::Dean, Action::Approve),
            Err(WorkflowError::Unauthorized { .. })
        ));
        assert!(matches!(
            next_status(Status::Draft, Role::Hod, Action::Submit),
            Err(WorkflowError::Unauthorized { .. })
        ));
    }

    #[test]
    fn rejection_before_the_dvc_stage_is_undefined() {
        assert_eq!(
            next_status(Status::Submitted, Role::Hod, Action::Reject),
            Err(WorkflowError::InvalidTransition { from: Status::Submitted })
        );
        assert_eq!(
            next_status(Status::HodReviewed, Role::Dean, Action::Reject),
            Err(WorkflowError::InvalidTransition { from: Status::HodReviewed })
        );
    }

    #[test]
    fn queue_claim_states_have_no_client_transition() {
        for status in [Status::UnderDeanReview, Status::UnderDvcReview] {
            for role in [Role::Dean, Role::Dvc] {
                assert_eq!(
                    next_status(status, role, Action::Approve),
                    Err(WorkflowError::InvalidTransition { from: status })
                );
            }
        }
    }

    #[test]
    fn stage_mapping_covers_queue_claim_states() {
        assert_eq!(Status::Submitted.stage(), Stage::Hod);
        assert_eq!(Status::HodReviewed.stage(), Stage::Dean);
        assert_eq!(Status::UnderDeanReview.stage(), Stage::Dean);
        assert_eq!(Status::DeanReviewed.stage(), Stage::Dvc);
        assert_eq!(Status::UnderDvcReview.stage(), Stage::Dvc);
        assert_eq!(Status::DvcRejected.stage(), Stage::Closed);
    }

    #[test]
    fn apply_stamps_submission_date_once() {
        let mut req = request("r-1", Status::Draft);
        let applicant = actor("u-7", Role::Academic);
        let now = Utc::now();

        apply_transition(&mut req, &applicant, Action::Submit, None, now).expect("submit");
        assert_eq!(req.status, Status::Submitted);
        assert_eq!(req.submission_date, Some(now));
        assert!(req.reviews.is_empty(), "submission is not a review");

        let second = apply_transition(&mut req, &applicant, Action::Submit, None, Utc::now());
        assert_eq!(second, Err(WorkflowError::InvalidTransition { from: Status::Submitted }));
        assert_eq!(req.submission_date, Some(now), "failed attempt must not restamp");
    }

    #[test]
    fn apply_appends_exactly_one_review_per_approval() {
        let mut req = request("r-1", Status::Submitted);
        let hod = actor("u-hod", Role::Hod);
        let now = Utc::now();

        apply_transition(&mut req, &hod, Action::Approve, Some("Strong case"), now)
            .expect("hod approve");

        assert_eq!(req.status, Status::HodReviewed);
        assert_eq!(req.hod_review_date, Some(now));
        assert_eq!(req.reviews.len(), 1);
        assert_eq!(req.reviews[0].reviewer_role, Role::Hod);
        assert_eq!(req.reviews[0].comments, "Strong case");
    }

    #[test]
    fn apply_requires_review_comments() {
        let mut req = request("r-1", Status::Submitted);
        let hod = actor("u-hod", Role::Hod);

        let error = apply_transition(&mut req, &hod, Action::Approve, Some("  "), Utc::now())
            .expect_err("blank comments");
        assert_eq!(error, WorkflowError::validation("comments"));
        assert_eq!(req.status, Status::Submitted, "failed transition must not mutate");
        assert!(req.reviews.is_empty());
    }

    #[test]
    fn dvc_rejection_is_final() {
        let mut req = request("r-1", Status::DeanReviewed);
        let dvc = actor("u-dvc", Role::Dvc);
        let now = Utc::now();

        apply_transition(&mut req, &dvc, Action::Reject, Some("Insufficient tenure"), now)
            .expect("dvc reject");
        assert_eq!(req.status, Status::DvcRejected);
        assert_eq!(req.dvc_review_date, Some(now));

        let after = apply_transition(&mut req, &dvc, Action::Approve, Some("oops"), Utc::now());
        assert_eq!(after, Err(WorkflowError::InvalidTransition { from: Status::DvcRejected }));
    }
}
