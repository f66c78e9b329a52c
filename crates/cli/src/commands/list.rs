use promotrack_client::{PromotionApi, RequestQuery};
use promotrack_core::domain::org::{DepartmentId, SchoolId};
use promotrack_core::domain::request::PromotionRequest;
use promotrack_core::domain::user::{User, UserId};
use promotrack_core::presentation::presentation;
use promotrack_core::queries::{filter, visible_requests, RequestFilter};

use crate::commands::{map_workflow_failure, CommandContext, CommandResult};

pub struct ListArgs {
    pub status: Option<String>,
    pub department: Option<String>,
    pub school: Option<String>,
    pub search: Option<String>,
    pub actor: Option<String>,
}

pub fn run(args: ListArgs) -> CommandResult {
    let context = match CommandContext::build("list") {
        Ok(context) => context,
        Err(failure) => return failure,
    };

    let status = match args.status.as_deref().map(RequestFilter::parse_status).transpose() {
        Ok(status) => status.flatten(),
        Err(error) => return map_workflow_failure("list", &error),
    };
    let narrowing = RequestFilter {
        search: args.search,
        status,
        school_id: args.school.map(SchoolId),
        department_id: args.department.map(DepartmentId),
    };

    let viewer = match args.actor {
        Some(actor_id) => {
            match context.runtime.block_on(context.api.fetch_user(&UserId(actor_id))) {
                Ok(user) => Some(user),
                Err(error) => return map_workflow_failure("list", &error),
            }
        }
        None => None,
    };

    let requests = match context.runtime.block_on(context.api.fetch_requests(&RequestQuery::All)) {
        Ok(requests) => requests,
        Err(error) => return map_workflow_failure("list", &error),
    };
    let requests = filter(&scope(viewer.as_ref(), requests), &narrowing);

    if requests.is_empty() {
        return CommandResult::plain("no promotion requests match");
    }

    let mut lines =
        vec![format!("{:<10} {:<24} {:<34} {:<18} SUBMITTED", "ID", "APPLICANT", "RANKS", "STATUS")];
    for request in &requests {
        let submitted = request
            .submission_date
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        lines.push(format!(
            "{:<10} {:<24} {:<34} {:<18} {submitted}",
            request.id.0,
            request.applicant_name,
            format!("{} -> {}", request.current_rank.label(), request.applied_rank.label()),
            presentation(request.status).label,
        ));
    }
    lines.push(format!("{} request(s)", requests.len()));
    CommandResult::plain(lines.join("\n"))
}

/// Narrows a listing to what the viewer may see; no viewer, no narrowing.
fn scope(viewer: Option<&User>, requests: Vec<PromotionRequest>) -> Vec<PromotionRequest> {
    match viewer {
        Some(user) => visible_requests(user, &requests),
        None => requests,
    }
}
