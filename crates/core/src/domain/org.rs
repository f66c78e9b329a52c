use serde::{Deserialize, Serialize};

use crate::domain::user::UserId;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DepartmentId(pub String);

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchoolId(pub String);

/// Reference entity owned by the org-management subsystem; read-only here.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: DepartmentId,
    pub name: String,
    pub code: Option<String>,
    pub school_id: SchoolId,
    pub head_of_department: Option<UserId>,
    pub is_active: bool,
}

/// Reference entity owned by the org-management subsystem; read-only here.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct School {
    pub id: SchoolId,
    pub name: String,
    pub code: Option<String>,
    pub dean: Option<UserId>,
    pub is_active: bool,
}
