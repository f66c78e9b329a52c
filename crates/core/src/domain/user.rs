use serde::{Deserialize, Serialize};

use crate::domain::org::{DepartmentId, SchoolId};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

/// Workflow roles. The lifecycle model consumes the current user's identity
/// as an opaque input and never mutates it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Academic,
    Hod,
    Dean,
    Dvc,
    Hr,
    Admin,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub role: Role,
    pub full_name: String,
    pub department_id: Option<DepartmentId>,
    pub school_id: Option<SchoolId>,
}

impl User {
    pub fn is_in_department(&self, department_id: &DepartmentId) -> bool {
        self.department_id.as_ref() == Some(department_id)
    }

    pub fn is_in_school(&self, school_id: &SchoolId) -> bool {
        self.school_id.as_ref() == Some(school_id)
    }
}
