//! Derived views over request collections: per-role visibility, status
//! grouping, filtering and sorting. All pure and order-preserving unless a
//! sort is explicitly requested.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::org::{DepartmentId, SchoolId};
use crate::domain::request::PromotionRequest;
use crate::domain::user::{Role, User};
use crate::errors::WorkflowError;
use crate::lifecycle::Status;

/// The slice of `requests` a user is allowed to see, in input order.
///
/// Academics see only their own requests; HODs their department; deans their
/// school; the DVC sees the DVC work queue plus DVC-decided history; HR and
/// admin see everything.
pub fn visible_requests(user: &User, requests: &[PromotionRequest]) -> Vec<PromotionRequest> {
    requests
        .iter()
        .filter(|request| match user.role {
            Role::Academic => request.applicant_id == user.id,
            Role::Hod => user.is_in_department(&request.department_id),
            Role::Dean => user.is_in_school(&request.school_id),
            Role::Dvc => request.status.awaiting_dvc() || request.status.is_terminal(),
            Role::Hr | Role::Admin => true,
        })
        .cloned()
        .collect()
}

/// Counts per status. Every one of the eight statuses is present, zero
/// filled, and iteration order follows the workflow order (`Status` derives
/// `Ord` by declaration order).
pub fn group_by_status(requests: &[PromotionRequest]) -> BTreeMap<Status, usize> {
    let mut counts: BTreeMap<Status, usize> =
        Status::ALL.into_iter().map(|status| (status, 0)).collect();
    for request in requests {
        *counts.entry(request.status).or_default() += 1;
    }
    counts
}

/// AND-composed narrowing filter. Absent fields impose no constraint, so
/// the default filter is the identity.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestFilter {
    pub search: Option<String>,
    pub status: Option<Status>,
    pub school_id: Option<SchoolId>,
    pub department_id: Option<DepartmentId>,
}

impl RequestFilter {
    /// Parses a status selector as views supply it, where `ALL` (any case)
    /// means unconstrained.
    pub fn parse_status(raw: &str) -> Result<Option<Status>, WorkflowError> {
        if raw.trim().eq_ignore_ascii_case("all") {
            return Ok(None);
        }
        Status::parse(raw).map(Some)
    }

    fn matches(&self, request: &PromotionRequest) -> bool {
        if let Some(status) = self.status {
            if request.status != status {
                return false;
            }
        }
        if let Some(school_id) = &self.school_id {
            if &request.school_id != school_id {
                return false;
            }
        }
        if let Some(department_id) = &self.department_id {
            if &request.department_id != department_id {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.trim().to_ascii_lowercase();
            if !needle.is_empty() {
                let haystacks = [
                    request.applicant_name.to_ascii_lowercase(),
                    request.current_rank.label().to_ascii_lowercase(),
                    request.applied_rank.label().to_ascii_lowercase(),
                ];
                if !haystacks.iter().any(|hay| hay.contains(&needle)) {
                    return false;
                }
            }
        }
        true
    }
}

pub fn filter(requests: &[PromotionRequest], filter: &RequestFilter) -> Vec<PromotionRequest> {
    requests.iter().filter(|request| filter.matches(request)).cloned().collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortField {
    SubmissionDate,
    ApplicantName,
    Status,
    AppliedRank,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Stable sort; equal keys keep their original relative order. Unsubmitted
/// requests sort before any submitted one on `SubmissionDate` ascending.
pub fn sort_by(
    requests: &[PromotionRequest],
    field: SortField,
    direction: SortDirection,
) -> Vec<PromotionRequest> {
    let mut sorted: Vec<PromotionRequest> = requests.to_vec();
    sorted.sort_by(|left, right| {
        let ordering = match field {
            SortField::SubmissionDate => left.submission_date.cmp(&right.submission_date),
            SortField::ApplicantName => {
                left.applicant_name.to_ascii_lowercase().cmp(&right.applicant_name.to_ascii_lowercase())
            }
            SortField::Status => left.status.cmp(&right.status),
            SortField::AppliedRank => left.applied_rank.cmp(&right.applied_rank),
        };
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
    sorted
}
