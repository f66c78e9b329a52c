use clap::ValueEnum;

use promotrack_core::domain::request::RequestId;
use promotrack_core::domain::review::Decision;

use crate::commands::{map_workflow_failure, CommandContext, CommandResult};

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum DecisionArg {
    Approve,
    Reject,
}

impl From<DecisionArg> for Decision {
    fn from(arg: DecisionArg) -> Self {
        match arg {
            DecisionArg::Approve => Decision::Approved,
            DecisionArg::Reject => Decision::Rejected,
        }
    }
}

pub fn run(
    id: String,
    decision: DecisionArg,
    comments: String,
    actor: Option<String>,
) -> CommandResult {
    let context = match CommandContext::build("review") {
        Ok(context) => context,
        Err(failure) => return failure,
    };
    let (runtime, service) = match context.into_service("review", actor) {
        Ok(parts) => parts,
        Err(failure) => return failure,
    };

    match runtime.block_on(service.review(&RequestId(id), decision.into(), &comments)) {
        Ok(outcome) => CommandResult::success(
            "review",
            format!(
                "recorded {:?} review; request {} is now {}",
                outcome.review.decision, outcome.request.id.0, outcome.request.status
            ),
        ),
        Err(error) => map_workflow_failure("review", &error),
    }
}
