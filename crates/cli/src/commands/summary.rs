use promotrack_client::{PromotionApi, RequestQuery};
use promotrack_core::presentation::presentation;
use promotrack_core::queries::group_by_status;

use crate::commands::{map_workflow_failure, CommandContext, CommandResult};

/// Dashboard counts, one row per status in workflow order.
pub fn run() -> CommandResult {
    let context = match CommandContext::build("summary") {
        Ok(context) => context,
        Err(failure) => return failure,
    };

    let requests = match context.runtime.block_on(context.api.fetch_requests(&RequestQuery::All)) {
        Ok(requests) => requests,
        Err(error) => return map_workflow_failure("summary", &error),
    };

    let counts = group_by_status(&requests);
    let mut lines = vec!["promotion requests by status:".to_string()];
    for (status, count) in &counts {
        let look = presentation(*status);
        lines.push(format!("  {:<18} {:>4}  ({})", look.label, count, look.icon));
    }
    lines.push(format!("  {:<18} {:>4}", "total", requests.len()));
    CommandResult::plain(lines.join("\n"))
}
