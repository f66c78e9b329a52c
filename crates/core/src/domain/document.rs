use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::request::RequestId;
use crate::domain::user::UserId;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(pub String);

/// Reference to an uploaded supporting document. The blob itself lives in
/// the remote file store; only the metadata travels with the request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    pub id: DocumentId,
    pub request_id: RequestId,
    pub original_name: String,
    pub content_type: Option<String>,
    pub size_bytes: Option<u64>,
    pub document_type: Option<String>,
    pub description: Option<String>,
    pub uploaded_by: UserId,
    pub uploaded_at: DateTime<Utc>,
}
