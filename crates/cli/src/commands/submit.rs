use promotrack_core::domain::request::RequestId;

use crate::commands::{map_workflow_failure, CommandContext, CommandResult};

pub fn run(id: String, actor: Option<String>) -> CommandResult {
    let context = match CommandContext::build("submit") {
        Ok(context) => context,
        Err(failure) => return failure,
    };
    let (runtime, service) = match context.into_service("submit", actor) {
        Ok(parts) => parts,
        Err(failure) => return failure,
    };

    match runtime.block_on(service.submit(&RequestId(id))) {
        Ok(request) => CommandResult::success(
            "submit",
            format!("request {} is now {}", request.id.0, request.status),
        ),
        Err(error) => map_workflow_failure("submit", &error),
    }
}
