use serde::{Deserialize, Serialize};

use crate::errors::WorkflowError;

/// Academic ranks in promotion order. Derived `Ord` follows declaration
/// order, so `applied_rank > current_rank` is the seniority check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    AssistantLecturer,
    Lecturer,
    SeniorLecturer,
    AssociateProfessor,
    Professor,
}

impl Rank {
    pub const ALL: [Rank; 5] = [
        Rank::AssistantLecturer,
        Rank::Lecturer,
        Rank::SeniorLecturer,
        Rank::AssociateProfessor,
        Rank::Professor,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::AssistantLecturer => "Assistant Lecturer",
            Self::Lecturer => "Lecturer",
            Self::SeniorLecturer => "Senior Lecturer",
            Self::AssociateProfessor => "Associate Professor",
            Self::Professor => "Professor",
        }
    }

    /// Parses a rank label. Matching ignores case and surrounding
    /// whitespace; the store contains hand-entered labels.
    pub fn parse(raw: &str) -> Result<Self, WorkflowError> {
        let key = raw.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|rank| rank.label().to_ascii_lowercase() == key)
            .ok_or_else(|| WorkflowError::validation(format!("unknown rank `{raw}`")))
    }

    /// The rank one step up, if any.
    pub fn next(&self) -> Option<Rank> {
        let position = Self::ALL.iter().position(|rank| rank == self)?;
        Self::ALL.get(position + 1).copied()
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
