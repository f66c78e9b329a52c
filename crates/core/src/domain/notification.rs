use serde::{Deserialize, Serialize};

use crate::domain::request::RequestId;
use crate::domain::user::UserId;

/// Fire-and-forget message sent to the applicant whenever their request
/// moves. Delivery is the remote notifier's concern; a failed send never
/// fails the transition that triggered it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub user_id: UserId,
    pub title: String,
    pub message: String,
    pub related_request_id: Option<RequestId>,
}

impl Notification {
    pub fn status_change(
        user_id: UserId,
        request_id: RequestId,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            user_id,
            title: title.into(),
            message: message.into(),
            related_request_id: Some(request_id),
        }
    }
}
