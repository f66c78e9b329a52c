use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::request::RequestId;
use crate::domain::user::{Role, UserId};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReviewId(pub String);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    Approved,
    Rejected,
}

/// One reviewer's record on a request. Append-only from the client's
/// perspective; a reviewer may revise their own review only while the
/// request still sits at the stage that role owns, and the server owns
/// that upsert.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub request_id: RequestId,
    pub reviewer_id: UserId,
    pub reviewer_role: Role,
    pub decision: Decision,
    pub comments: String,
    pub review_date: DateTime<Utc>,
}
