//! The review authorization predicate. One pure function, default-deny;
//! every view consults this instead of carrying its own inline role check.

use crate::domain::request::PromotionRequest;
use crate::domain::user::{Role, User};
use crate::lifecycle::Status;

/// Whether `user` may act on `request` right now.
///
/// - HOD: request is `SUBMITTED` and sits in the HOD's own department.
/// - Dean: request is `HOD_REVIEWED` and sits in the dean's own school.
/// - DVC: request is `DEAN_REVIEWED`; university-wide, no org filter.
///
/// Every other role/status pair is denied, including the queue-claim
/// statuses (`UNDER_DEAN_REVIEW`, `UNDER_DVC_REVIEW`) which the server owns.
pub fn can_review(user: &User, request: &PromotionRequest) -> bool {
    match user.role {
        Role::Hod => {
            request.status == Status::Submitted && user.is_in_department(&request.department_id)
        }
        Role::Dean => {
            request.status == Status::HodReviewed && user.is_in_school(&request.school_id)
        }
        Role::Dvc => request.status == Status::DeanReviewed,
        Role::Academic | Role::Hr | Role::Admin => false,
    }
}

/// Whether `user` owns `request` as its applicant. Submission requires this
/// in addition to the `ACADEMIC` role.
pub fn is_applicant(user: &User, request: &PromotionRequest) -> bool {
    user.role == Role::Academic && user.id == request.applicant_id
}

#[cfg(test)]
mod tests {
    use crate::domain::org::{DepartmentId, SchoolId};
    use crate::domain::request::fixtures::request;
    use crate::domain::user::{Role, User, UserId};
    use crate::lifecycle::Status;

    use super::{can_review, is_applicant};

    fn user(id: &str, role: Role, department: Option<&str>, school: Option<&str>) -> User {
        User {
            id: UserId(id.to_string()),
            role,
            full_name: "Test User".to_string(),
            department_id: department.map(|d| DepartmentId(d.to_string())),
            school_id: school.map(|s| SchoolId(s.to_string())),
        }
    }

    #[test]
    fn hod_reviews_submitted_requests_in_own_department() {
        let req = request("r-1", Status::Submitted);
        assert!(can_review(&user("u-hod", Role::Hod, Some("d-3"), Some("s-1")), &req));
        assert!(!can_review(&user("u-hod", Role::Hod, Some("d-5"), Some("s-1")), &req));
        assert!(!can_review(&user("u-hod", Role::Hod, None, None), &req));
    }

    #[test]
    fn dean_reviews_hod_reviewed_requests_in_own_school() {
        let req = request("r-1", Status::HodReviewed);
        assert!(can_review(&user("u-dean", Role::Dean, None, Some("s-1")), &req));
        assert!(!can_review(&user("u-dean", Role::Dean, None, Some("s-9")), &req));
    }

    #[test]
    fn dvc_reviews_dean_reviewed_requests_university_wide() {
        let req = request("r-1", Status::DeanReviewed);
        assert!(can_review(&user("u-dvc", Role::Dvc, None, None), &req));
    }

    #[test]
    fn default_deny_over_every_unlisted_pair() {
        let roles =
            [Role::Academic, Role::Hod, Role::Dean, Role::Dvc, Role::Hr, Role::Admin];
        let allowed = |role: Role, status: Status| {
            matches!(
                (role, status),
                (Role::Hod, Status::Submitted)
                    | (Role::Dean, Status::HodReviewed)
                    | (Role::Dvc, Status::DeanReviewed)
            )
        };

        for status in Status::ALL {
            let req = request("r-1", status);
            for role in roles {
                let reviewer = user("u-x", role, Some("d-3"), Some("s-1"));
                assert_eq!(
                    can_review(&reviewer, &req),
                    allowed(role, status),
                    "unexpected verdict for {role:?} on {status:?}"
                );
            }
        }
    }

    #[test]
    fn queue_claim_states_are_denied_even_for_the_matching_stage_role() {
        let dean = user("u-dean", Role::Dean, None, Some("s-1"));
        let dvc = user("u-dvc", Role::Dvc, None, None);
        assert!(!can_review(&dean, &request("r-1", Status::UnderDeanReview)));
        assert!(!can_review(&dvc, &request("r-1", Status::UnderDvcReview)));
    }

    #[test]
    fn only_the_owning_academic_is_the_applicant() {
        let req = request("r-1", Status::Draft);
        assert!(is_applicant(&user("u-7", Role::Academic, Some("d-3"), None), &req));
        assert!(!is_applicant(&user("u-8", Role::Academic, Some("d-3"), None), &req));
        assert!(!is_applicant(&user("u-7", Role::Hod, Some("d-3"), None), &req));
    }
}
