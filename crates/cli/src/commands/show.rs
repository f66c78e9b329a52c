use promotrack_client::PromotionApi;
use promotrack_core::domain::request::RequestId;
use promotrack_core::presentation::presentation;

use crate::commands::{map_workflow_failure, CommandContext, CommandResult};

pub fn run(id: String) -> CommandResult {
    let context = match CommandContext::build("show") {
        Ok(context) => context,
        Err(failure) => return failure,
    };

    let request = match context.runtime.block_on(context.api.fetch_request(&RequestId(id))) {
        Ok(request) => request,
        Err(error) => return map_workflow_failure("show", &error),
    };

    let look = presentation(request.status);
    let mut lines = vec![
        format!("request {}", request.id.0),
        format!("  applicant:     {} ({})", request.applicant_name, request.applicant_id.0),
        format!("  department:    {}", request.department_id.0),
        format!("  school:        {}", request.school_id.0),
        format!("  promotion:     {} -> {}", request.current_rank.label(), request.applied_rank.label()),
        format!("  status:        {} [{}]", look.label, request.status),
        format!("  hr processed:  {}", if request.hr_processed { "yes" } else { "no" }),
        format!("  justification: {}", request.justification),
    ];

    for (name, date) in [
        ("submitted", request.submission_date),
        ("hod review", request.hod_review_date),
        ("dean review", request.dean_review_date),
        ("dvc review", request.dvc_review_date),
    ] {
        if let Some(date) = date {
            lines.push(format!("  {name}: {}", date.format("%Y-%m-%d %H:%M UTC")));
        }
    }

    if !request.documents.is_empty() {
        lines.push(format!("  documents ({}):", request.documents.len()));
        for document in &request.documents {
            let size = document
                .size_bytes
                .map(|bytes| format!("{bytes} bytes"))
                .unwrap_or_else(|| "size unknown".to_string());
            lines.push(format!("    - {} ({size})", document.original_name));
        }
    }

    if !request.reviews.is_empty() {
        lines.push(format!("  reviews ({}):", request.reviews.len()));
        for review in &request.reviews {
            lines.push(format!(
                "    - {:?} by {:?} {}: {}",
                review.decision,
                review.reviewer_role,
                review.review_date.format("%Y-%m-%d"),
                review.comments,
            ));
        }
    }

    CommandResult::plain(lines.join("\n"))
}
