use serde::{Deserialize, Serialize};

/// Complete field set persisted for a student (create and full update).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentInput {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub language: String,
}

/// Wire-level field set for the write operations. Every field is optional so
/// that a missing key surfaces as a field validation error rather than a
/// body-level deserialization rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudentPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub language: Option<String>,
}

impl StudentPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.language.is_none()
    }

    /// All-fields view. Yields `None` whenever a field is missing, which
    /// required-mode validation has already reported by the time this is
    /// consulted.
    pub fn into_complete(self) -> Option<StudentInput> {
        Some(StudentInput {
            name: self.name?,
            email: self.email?,
            phone: self.phone?,
            language: self.language?,
        })
    }
}
