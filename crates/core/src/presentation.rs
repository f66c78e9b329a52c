//! Status presentation: the single table every view consults for the
//! human-readable label, severity class and icon of a status. Views look
//! up; they never branch on status themselves.

use serde::{Deserialize, Serialize};

use crate::lifecycle::Status;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Neutral,
    Info,
    Success,
    Danger,
    Warning,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusPresentation {
    pub label: &'static str,
    pub severity: Severity,
    pub icon: &'static str,
}

pub fn presentation(status: Status) -> StatusPresentation {
    match status {
        Status::Draft => StatusPresentation {
            label: "Draft",
            severity: Severity::Neutral,
            icon: "pencil",
        },
        Status::Submitted => StatusPresentation {
            label: "Submitted",
            severity: Severity::Info,
            icon: "inbox",
        },
        Status::HodReviewed => StatusPresentation {
            label: "HOD Reviewed",
            severity: Severity::Info,
            icon: "check",
        },
        Status::UnderDeanReview => StatusPresentation {
            label: "Under Dean Review",
            severity: Severity::Warning,
            icon: "hourglass",
        },
        Status::DeanReviewed => StatusPresentation {
            label: "Dean Reviewed",
            severity: Severity::Info,
            icon: "check",
        },
        Status::UnderDvcReview => StatusPresentation {
            label: "Under DVC Review",
            severity: Severity::Warning,
            icon: "hourglass",
        },
        Status::DvcApproved => StatusPresentation {
            label: "Approved",
            severity: Severity::Success,
            icon: "award",
        },
        Status::DvcRejected => StatusPresentation {
            label: "Rejected",
            severity: Severity::Danger,
            icon: "x-circle",
        },
    }
}
