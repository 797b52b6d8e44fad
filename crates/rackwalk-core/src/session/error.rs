//! Walkthrough session error types.

use thiserror::Error;

use super::RackId;

/// Errors that can occur while mutating a walkthrough session.
///
/// These cover writes the engine refuses outright. Validation findings about
/// an incomplete form live in [`super::ValidationError`] instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The targeted rack is not part of this walkthrough.
    #[error("rack {rack} is not part of this walkthrough")]
    RackNotFound {
        /// The rack id that was targeted.
        rack: RackId,
    },

    /// The section id does not exist in the catalog.
    #[error("unknown section: {section_id}")]
    UnknownSection {
        /// The section id that was requested.
        section_id: String,
    },

    /// The field id does not exist in the catalog or as the rack-location
    /// field.
    #[error("unknown field: {field_id}")]
    UnknownField {
        /// The field id that was written to.
        field_id: String,
    },

    /// The value's kind is not admissible for the field's type.
    #[error("field {field_id} expects a {expected} value, got {got}")]
    TypeMismatch {
        /// The field that rejected the write.
        field_id: String,
        /// The field's declared type name.
        expected: &'static str,
        /// The offered value's kind name.
        got: &'static str,
    },

    /// A choice value is not in the field's option list.
    #[error("field {field_id} has no option {value:?}")]
    UnknownChoice {
        /// The choice field that rejected the write.
        field_id: String,
        /// The value that is not an admissible option.
        value: String,
    },
}
