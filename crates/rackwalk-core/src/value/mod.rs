//! Typed field values.
//!
//! Every value stored by the engine is a [`FieldValue`], a tagged union that
//! keeps the value's kind next to its payload. Writes are checked against the
//! field's [`crate::schema::FieldType`] when they happen, so a flag can never
//! end up stored under a text field and validation never needs to guess what a
//! string means.

use serde::{Deserialize, Serialize};

use crate::schema::FieldType;

/// A value recorded for one (field, rack) slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    /// Free-form text, including barcodes typed or scanned in.
    Text(String),
    /// A selection out of a choice field's option list.
    Choice(String),
    /// A checkbox state.
    Flag(bool),
    /// Reference to an uploaded artifact.
    Blob(String),
    /// A physical location string.
    Location(String),
}

impl FieldValue {
    /// Returns the wire name of this value's kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Choice(_) => "choice",
            Self::Flag(_) => "flag",
            Self::Blob(_) => "blob",
            Self::Location(_) => "location",
        }
    }

    /// Returns `true` when this value satisfies a required field.
    ///
    /// Strings answer when non-empty. A flag answers only when set; an
    /// unticked required checkbox is treated the same as no value at all.
    #[must_use]
    pub fn is_answered(&self) -> bool {
        match self {
            Self::Text(s) | Self::Choice(s) | Self::Blob(s) | Self::Location(s) => !s.is_empty(),
            Self::Flag(b) => *b,
        }
    }

    /// Returns `true` when this value's kind is admissible for `field_type`.
    #[must_use]
    pub const fn matches(&self, field_type: FieldType) -> bool {
        match self {
            Self::Text(_) => field_type.is_text_like(),
            Self::Choice(_) => field_type.is_choice(),
            Self::Flag(_) => matches!(field_type, FieldType::Checkbox),
            Self::Blob(_) => matches!(field_type, FieldType::File),
            Self::Location(_) => matches!(field_type, FieldType::Location),
        }
    }

    /// Returns the payload as a string slice for string-backed kinds.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) | Self::Choice(s) | Self::Blob(s) | Self::Location(s) => Some(s),
            Self::Flag(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_tagged_pair() {
        let json = serde_json::to_value(FieldValue::Choice("ok".to_string())).unwrap();
        assert_eq!(json["kind"], "choice");
        assert_eq!(json["value"], "ok");

        let back: FieldValue =
            serde_json::from_str(r#"{"kind":"flag","value":true}"#).unwrap();
        assert_eq!(back, FieldValue::Flag(true));
    }

    #[test]
    fn answered_requires_substance() {
        assert!(FieldValue::Text("PDU-0042".to_string()).is_answered());
        assert!(!FieldValue::Text(String::new()).is_answered());
        assert!(!FieldValue::Choice(String::new()).is_answered());
        assert!(FieldValue::Flag(true).is_answered());
        assert!(!FieldValue::Flag(false).is_answered());
        assert!(FieldValue::Blob("scan-01.jpg".to_string()).is_answered());
    }

    #[test]
    fn kind_gates_by_field_type() {
        let text = FieldValue::Text("x".to_string());
        assert!(text.matches(FieldType::Text));
        assert!(text.matches(FieldType::Textarea));
        assert!(text.matches(FieldType::Barcode));
        assert!(!text.matches(FieldType::Select));

        let choice = FieldValue::Choice("x".to_string());
        assert!(choice.matches(FieldType::Select));
        assert!(choice.matches(FieldType::Radio));
        assert!(!choice.matches(FieldType::Checkbox));

        assert!(FieldValue::Flag(false).matches(FieldType::Checkbox));
        assert!(FieldValue::Blob("f".to_string()).matches(FieldType::File));
        assert!(FieldValue::Location("row 4".to_string()).matches(FieldType::Location));
        assert!(!FieldValue::Location("row 4".to_string()).matches(FieldType::Text));
    }

    #[test]
    fn as_text_exposes_string_payloads() {
        assert_eq!(
            FieldValue::Location("aisle 2".to_string()).as_text(),
            Some("aisle 2")
        );
        assert_eq!(FieldValue::Flag(true).as_text(), None);
    }
}
