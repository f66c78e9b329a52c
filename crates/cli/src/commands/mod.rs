pub mod config;
pub mod list;
pub mod review;
pub mod show;
pub mod submit;
pub mod summary;

use std::env;

use serde::Serialize;
use tokio::runtime::Runtime;

use promotrack_client::{HttpPromotionApi, PromotionApi, WorkflowService};
use promotrack_core::config::{AppConfig, LoadOptions};
use promotrack_core::domain::user::{User, UserId};

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    pub fn plain(output: impl Into<String>) -> Self {
        Self { exit_code: 0, output: output.into() }
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

/// Everything a command needs before it can talk to the API.
pub(crate) struct CommandContext {
    pub runtime: Runtime,
    pub api: HttpPromotionApi,
}

impl CommandContext {
    pub(crate) fn build(command: &str) -> Result<Self, CommandResult> {
        let config = AppConfig::load(LoadOptions::default()).map_err(|error| {
            CommandResult::failure(
                command,
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            )
        })?;

        let runtime =
            tokio::runtime::Builder::new_current_thread().enable_all().build().map_err(|error| {
                CommandResult::failure(
                    command,
                    "runtime_init",
                    format!("failed to initialize async runtime: {error}"),
                    3,
                )
            })?;

        let api = HttpPromotionApi::new(&config.api).map_err(|error| {
            CommandResult::failure(command, "api_client", error.to_string(), 3)
        })?;

        Ok(Self { runtime, api })
    }

    /// Resolves the acting user from `--actor` or `PROMOTRACK_USER_ID` and
    /// wraps the API in a session-bound service.
    pub(crate) fn into_service(
        self,
        command: &str,
        actor: Option<String>,
    ) -> Result<(Runtime, WorkflowService<HttpPromotionApi>), CommandResult> {
        let actor_id = actor.or_else(|| env::var("PROMOTRACK_USER_ID").ok()).ok_or_else(|| {
            CommandResult::failure(
                command,
                "missing_actor",
                "no acting user; pass --actor or set PROMOTRACK_USER_ID",
                2,
            )
        })?;

        let user: User = self
            .runtime
            .block_on(self.api.fetch_user(&UserId(actor_id)))
            .map_err(|error| map_workflow_failure(command, &error))?;

        let service = WorkflowService::new(self.api, user);
        Ok((self.runtime, service))
    }
}

pub(crate) fn map_workflow_failure(
    command: &str,
    error: &promotrack_core::errors::WorkflowError,
) -> CommandResult {
    use promotrack_core::errors::WorkflowError::*;

    let (error_class, exit_code) = match error {
        Unauthorized { .. } => ("unauthorized", 5),
        InvalidTransition { .. } => ("invalid_transition", 6),
        ValidationFailed { .. } => ("validation", 2),
        NotFound { .. } => ("not_found", 4),
        RemoteFailure { .. } => ("remote_failure", 7),
    };
    CommandResult::failure(command, error_class, error.to_string(), exit_code)
}
