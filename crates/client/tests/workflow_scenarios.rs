//! Full-lifecycle scenarios driven through the in-memory API, one session
//! per actor, the way the real client composes things.

use promotrack_client::{
    DocumentUpload, InMemoryPromotionApi, PromotionApi, RequestQuery, WorkflowService,
};
use promotrack_core::domain::org::{DepartmentId, SchoolId};
use promotrack_core::domain::rank::Rank;
use promotrack_core::domain::request::{RequestDraft, RequestId};
use promotrack_core::domain::review::Decision;
use promotrack_core::domain::user::{Role, User, UserId};
use promotrack_core::errors::WorkflowError;
use promotrack_core::lifecycle::Status;
use promotrack_core::queries::group_by_status;

fn user(id: &str, role: Role, department: Option<&str>, school: Option<&str>) -> User {
    User {
        id: UserId(id.to_string()),
        role,
        full_name: format!("User {id}"),
        department_id: department.map(|d| DepartmentId(d.to_string())),
        school_id: school.map(|s| SchoolId(s.to_string())),
    }
}

fn seeded_api() -> InMemoryPromotionApi {
    let api = InMemoryPromotionApi::new();
    api.register_user(user("u-7", Role::Academic, Some("d-3"), Some("s-1")));
    api.register_user(user("u-hod3", Role::Hod, Some("d-3"), Some("s-1")));
    api.register_user(user("u-hod5", Role::Hod, Some("d-5"), Some("s-1")));
    api.register_user(user("u-dean1", Role::Dean, None, Some("s-1")));
    api.register_user(user("u-dvc", Role::Dvc, None, None));
    api
}

fn draft() -> RequestDraft {
    RequestDraft {
        department_id: DepartmentId("d-3".to_string()),
        school_id: SchoolId("s-1".to_string()),
        current_rank: Rank::Lecturer,
        applied_rank: Rank::SeniorLecturer,
        justification: "Sustained research output and curriculum leadership".to_string(),
    }
}

/// Creates a draft with one supporting document and returns its id.
async fn prepared_draft(api: &InMemoryPromotionApi) -> RequestId {
    let created = api.create_request(&UserId("u-7".to_string()), draft()).await.expect("create");
    api.upload_document(DocumentUpload {
        request_id: created.id.clone(),
        uploader_id: UserId("u-7".to_string()),
        original_name: "publications.pdf".to_string(),
        content_type: Some("application/pdf".to_string()),
        document_type: Some("PUBLICATION_LIST".to_string()),
        description: Some("Publications since last promotion".to_string()),
        content: b"%PDF-1.7".to_vec(),
    })
    .await
    .expect("upload");
    created.id
}

#[tokio::test]
async fn approval_chain_runs_draft_to_dvc_approved() {
    let api = seeded_api();
    let id = prepared_draft(&api).await;

    let applicant = WorkflowService::new(api, user("u-7", Role::Academic, Some("d-3"), Some("s-1")));
    let submitted = applicant.submit(&id).await.expect("submit");
    assert_eq!(submitted.status, Status::Submitted);

    let hod = WorkflowService::new(
        applicant.into_api(),
        user("u-hod3", Role::Hod, Some("d-3"), Some("s-1")),
    );
    let after_hod = hod.review(&id, Decision::Approved, "Strong case").await.expect("hod review");
    assert_eq!(after_hod.request.status, Status::HodReviewed);

    let dean =
        WorkflowService::new(hod.into_api(), user("u-dean1", Role::Dean, None, Some("s-1")));
    let after_dean =
        dean.review(&id, Decision::Approved, "Endorsed by school board").await.expect("dean review");
    assert_eq!(after_dean.request.status, Status::DeanReviewed);

    let dvc = WorkflowService::new(dean.into_api(), user("u-dvc", Role::Dvc, None, None));
    let after_dvc =
        dvc.review(&id, Decision::Approved, "Approved by senate delegation").await.expect("dvc");
    assert_eq!(after_dvc.request.status, Status::DvcApproved);
    assert!(after_dvc.request.dvc_review_date.is_some());

    // Each stage stamped its own date and left earlier stamps alone.
    let final_request = dvc.get(&id).await.expect("refetch");
    assert!(final_request.submission_date.is_some());
    assert!(final_request.hod_review_date.is_some());
    assert!(final_request.dean_review_date.is_some());
    assert_eq!(final_request.reviews.len(), 3);

    // One notification to the applicant per transition.
    let notifications = dvc.api().sent_notifications();
    assert_eq!(notifications.len(), 4);
    assert!(notifications.iter().all(|n| n.user_id.0 == "u-7"));
}

#[tokio::test]
async fn dvc_rejection_is_terminal() {
    let api = seeded_api();
    let id = prepared_draft(&api).await;

    let applicant = WorkflowService::new(api, user("u-7", Role::Academic, Some("d-3"), Some("s-1")));
    applicant.submit(&id).await.expect("submit");

    let hod = WorkflowService::new(
        applicant.into_api(),
        user("u-hod3", Role::Hod, Some("d-3"), Some("s-1")),
    );
    hod.review(&id, Decision::Approved, "Forwarded").await.expect("hod review");

    let dean =
        WorkflowService::new(hod.into_api(), user("u-dean1", Role::Dean, None, Some("s-1")));
    dean.review(&id, Decision::Approved, "Forwarded").await.expect("dean review");

    let dvc = WorkflowService::new(dean.into_api(), user("u-dvc", Role::Dvc, None, None));
    let rejected =
        dvc.review(&id, Decision::Rejected, "Insufficient teaching record").await.expect("reject");
    assert_eq!(rejected.request.status, Status::DvcRejected);

    let retry = dvc.review(&id, Decision::Approved, "Reconsidered").await;
    assert_eq!(retry, Err(WorkflowError::InvalidTransition { from: Status::DvcRejected }));
}

#[tokio::test]
async fn hod_of_another_department_cannot_advance_the_request() {
    let api = seeded_api();
    let id = prepared_draft(&api).await;

    let applicant = WorkflowService::new(api, user("u-7", Role::Academic, Some("d-3"), Some("s-1")));
    applicant.submit(&id).await.expect("submit");

    let wrong_hod = WorkflowService::new(
        applicant.into_api(),
        user("u-hod5", Role::Hod, Some("d-5"), Some("s-1")),
    );
    let result = wrong_hod.review(&id, Decision::Approved, "Not my department").await;
    assert!(matches!(result, Err(WorkflowError::Unauthorized { .. })));

    let unchanged = wrong_hod.get(&id).await.expect("refetch");
    assert_eq!(unchanged.status, Status::Submitted);
    assert!(unchanged.reviews.is_empty());
}

#[tokio::test]
async fn submission_requires_a_document_and_a_higher_rank() {
    let api = seeded_api();
    let applicant_id = UserId("u-7".to_string());

    // No document attached yet.
    let bare = api.create_request(&applicant_id, draft()).await.expect("create");
    let applicant = WorkflowService::new(api, user("u-7", Role::Academic, Some("d-3"), Some("s-1")));
    let result = applicant.submit(&bare.id).await;
    assert_eq!(result, Err(WorkflowError::validation("documents")));

    // Applied rank must outrank the current one.
    let mut sideways = draft();
    sideways.applied_rank = Rank::Lecturer;
    let result = applicant.create_draft(sideways).await;
    assert!(matches!(result, Err(WorkflowError::ValidationFailed { .. })));
}

#[tokio::test]
async fn drafts_are_editable_and_deletable_until_submission() {
    let api = seeded_api();
    let id = prepared_draft(&api).await;

    let applicant = WorkflowService::new(api, user("u-7", Role::Academic, Some("d-3"), Some("s-1")));

    let mut revised = draft();
    revised.justification = "Revised case with two additional publications".to_string();
    let updated = applicant.update_draft(&id, revised).await.expect("update draft");
    assert!(updated.justification.starts_with("Revised case"));
    assert_eq!(updated.status, Status::Draft);

    applicant.submit(&id).await.expect("submit");

    // Past submission the draft surface is closed.
    let late_edit = applicant.update_draft(&id, draft()).await;
    assert_eq!(late_edit, Err(WorkflowError::InvalidTransition { from: Status::Submitted }));
    let late_delete = applicant.delete_draft(&id).await;
    assert_eq!(late_delete, Err(WorkflowError::InvalidTransition { from: Status::Submitted }));

    let disposable = applicant.api().create_request(&UserId("u-7".to_string()), draft()).await
        .expect("create");
    applicant.delete_draft(&disposable.id).await.expect("delete draft");
    let gone = applicant.get(&disposable.id).await;
    assert!(matches!(gone, Err(WorkflowError::NotFound { .. })));
}

#[tokio::test]
async fn uploaded_documents_round_trip_through_the_store() {
    let api = seeded_api();
    let id = prepared_draft(&api).await;

    let request = api.fetch_request(&id).await.expect("fetch");
    let document = request.documents.first().expect("document attached");
    assert_eq!(document.size_bytes, Some(8));

    let bytes = api.download_document(&document.id).await.expect("download");
    assert_eq!(bytes, b"%PDF-1.7");
}

#[tokio::test]
async fn dashboard_counts_follow_the_lifecycle() {
    let api = seeded_api();
    let first = prepared_draft(&api).await;
    let _second = prepared_draft(&api).await;

    let applicant = WorkflowService::new(api, user("u-7", Role::Academic, Some("d-3"), Some("s-1")));
    applicant.submit(&first).await.expect("submit");

    let listing = applicant.list(RequestQuery::All).await.expect("list");
    let counts = group_by_status(&listing);

    assert_eq!(counts[&Status::Draft], 1);
    assert_eq!(counts[&Status::Submitted], 1);
    assert_eq!(counts[&Status::DvcApproved], 0);
    assert_eq!(counts.len(), Status::ALL.len());
}
