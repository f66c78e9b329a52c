pub mod authz;
pub mod config;
pub mod domain;
pub mod errors;
pub mod lifecycle;
pub mod presentation;
pub mod queries;

pub use authz::{can_review, is_applicant};
pub use domain::document::{DocumentId, DocumentRef};
pub use domain::notification::Notification;
pub use domain::org::{Department, DepartmentId, School, SchoolId};
pub use domain::rank::Rank;
pub use domain::request::{PromotionRequest, RequestDraft, RequestId};
pub use domain::review::{Decision, Review, ReviewId};
pub use domain::user::{Role, User, UserId};
pub use errors::WorkflowError;
pub use lifecycle::{apply_transition, next_status, Action, Stage, Status};
pub use presentation::{presentation, Severity, StatusPresentation};
pub use queries::{
    filter, group_by_status, sort_by, visible_requests, RequestFilter, SortDirection, SortField,
};
