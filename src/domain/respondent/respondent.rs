//! Respondent entity.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{RespondentId, SectionId};

/// Maximum length for a respondent's display name.
pub const MAX_DISPLAY_NAME_LENGTH: usize = 100;

/// Flat kind of a respondent, as stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RespondentKind {
    Student,
    Teacher,
}

impl RespondentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RespondentKind::Student => "student",
            RespondentKind::Teacher => "teacher",
        }
    }
}

impl fmt::Display for RespondentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role of a respondent. A student always carries its section; a teacher
/// never has one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RespondentRole {
    Student { section_id: SectionId },
    Teacher,
}

/// A user acting as student or teacher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Respondent {
    id: RespondentId,
    display_name: String,
    role: RespondentRole,
}

impl Respondent {
    /// Creates a student belonging to `section_id`.
    pub fn student(id: RespondentId, display_name: impl Into<String>, section_id: SectionId) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            role: RespondentRole::Student { section_id },
        }
    }

    /// Creates a teacher.
    pub fn teacher(id: RespondentId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            role: RespondentRole::Teacher,
        }
    }

    pub fn id(&self) -> &RespondentId {
        &self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn role(&self) -> &RespondentRole {
        &self.role
    }

    pub fn kind(&self) -> RespondentKind {
        match self.role {
            RespondentRole::Student { .. } => RespondentKind::Student,
            RespondentRole::Teacher => RespondentKind::Teacher,
        }
    }

    /// Returns the section of a student, `None` for teachers.
    pub fn section_id(&self) -> Option<&SectionId> {
        match &self.role {
            RespondentRole::Student { section_id } => Some(section_id),
            RespondentRole::Teacher => None,
        }
    }

    pub fn is_teacher(&self) -> bool {
        matches!(self.role, RespondentRole::Teacher)
    }
}
