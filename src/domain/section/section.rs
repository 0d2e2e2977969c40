//! Section entity.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{SectionId, Timestamp, ValidationError};

/// Maximum length for a section name.
pub const MAX_NAME_LENGTH: usize = 100;

/// Maximum length for a section code.
pub const MAX_CODE_LENGTH: usize = 20;

/// A class section that surveys can be assigned to.
///
/// # Invariants
///
/// - `name` is 1-100 characters
/// - `code` is 1-20 characters, trimmed, and unique across sections
///   (uniqueness is enforced by the store)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    id: SectionId,
    name: String,
    code: String,
    description: String,
    created_at: Timestamp,
}

impl Section {
    /// Creates a new section.
    ///
    /// # Errors
    ///
    /// - `EmptyField` / `TooLong` if name or code violate their limits
    pub fn new(
        id: SectionId,
        name: impl Into<String>,
        code: impl Into<String>,
        description: impl Into<String>,
        created_at: Timestamp,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        let code = code.into().trim().to_string();
        ValidationError::check_text("name", &name, MAX_NAME_LENGTH)?;
        ValidationError::check_text("code", &code, MAX_CODE_LENGTH)?;

        Ok(Self {
            id,
            name,
            code,
            description: description.into(),
            created_at,
        })
    }

    /// Reconstitute a section from persistence (no validation).
    pub fn reconstitute(
        id: SectionId,
        name: String,
        code: String,
        description: String,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            name,
            code,
            description,
            created_at,
        }
    }

    pub fn id(&self) -> &SectionId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_section_trims_code() {
        let section =
            Section::new(SectionId::new(), "Grade 10", "  G10-A ", "", Timestamp::now()).unwrap();
        assert_eq!(section.code(), "G10-A");
        assert_eq!(section.name(), "Grade 10");
    }

    #[test]
    fn rejects_empty_name() {
        let result = Section::new(SectionId::new(), "", "G10", "", Timestamp::now());
        assert!(matches!(result, Err(ValidationError::EmptyField { .. })));
    }

    #[test]
    fn rejects_overlong_code() {
        let code = "X".repeat(MAX_CODE_LENGTH + 1);
        let result = Section::new(SectionId::new(), "Grade 10", code, "", Timestamp::now());
        assert!(matches!(result, Err(ValidationError::TooLong { .. })));
    }
}
