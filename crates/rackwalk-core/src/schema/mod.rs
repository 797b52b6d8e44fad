//! Form schema types shared by the walkthrough engine.
//!
//! A walkthrough form is described by a [`SectionCatalog`]: an ordered list of
//! [`FormSection`]s, one per device class (PDU, switch, server, ...), each
//! holding ordered [`FormField`]s. The engine never renders anything; it only
//! consults the schema to decide which fields exist, which are required, and
//! which values a choice field admits.
//!
//! Schemas reach the engine through the [`SchemaProvider`] trait so that the
//! built-in catalog, a TOML-configured catalog, and test fixtures are
//! interchangeable.

use serde::{Deserialize, Serialize};

/// Field id of the synthetic rack-location selector.
///
/// The rack-location field is not part of any catalog section. It is attached
/// to every rack card and offers the facility's known rack names. Values
/// written under this id are stored like any other field value.
pub const RACK_LOCATION_FIELD: &str = "rack-location";

/// Input widget kind for a form field.
///
/// The kind determines which [`crate::value::FieldValue`] variants a field
/// accepts at write time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Single-line free text.
    Text,
    /// Multi-line free text.
    Textarea,
    /// One value out of a fixed option list.
    Select,
    /// Boolean toggle.
    Checkbox,
    /// One value out of a fixed option list, rendered as radio buttons.
    Radio,
    /// Scanned or hand-typed asset barcode.
    Barcode,
    /// Reference to an uploaded artifact (photo, thermal scan).
    File,
    /// Physical position within the facility.
    Location,
}

impl FieldType {
    /// Returns the wire name of this field type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Textarea => "textarea",
            Self::Select => "select",
            Self::Checkbox => "checkbox",
            Self::Radio => "radio",
            Self::Barcode => "barcode",
            Self::File => "file",
            Self::Location => "location",
        }
    }

    /// Returns `true` for fields that store free-form text.
    #[must_use]
    pub const fn is_text_like(&self) -> bool {
        matches!(self, Self::Text | Self::Textarea | Self::Barcode)
    }

    /// Returns `true` for fields whose value must come from an option list.
    #[must_use]
    pub const fn is_choice(&self) -> bool {
        matches!(self, Self::Select | Self::Radio)
    }
}

/// One admissible value of a choice field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    /// Stored value.
    pub value: String,

    /// Human-readable label shown to the operator.
    pub label: String,
}

impl FieldOption {
    /// Creates an option whose value and label coincide.
    #[must_use]
    pub fn plain(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            label: value.clone(),
            value,
        }
    }
}

/// A single form field within a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormField {
    /// Stable field id, unique across the whole catalog.
    pub id: String,

    /// Label used in validation messages and rendering.
    pub label: String,

    /// Widget kind.
    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Placeholder hint for text-like fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,

    /// Whether validation demands an answered value for this field.
    #[serde(default)]
    pub required: bool,

    /// Admissible values for choice fields. Empty for other kinds.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FieldOption>,
}

impl FormField {
    /// Returns `true` when `value` appears in this field's option list.
    #[must_use]
    pub fn has_option(&self, value: &str) -> bool {
        self.options.iter().any(|opt| opt.value == value)
    }
}

/// An ordered group of fields for one device class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSection {
    /// Stable section id referenced by rack selections.
    pub id: String,

    /// Display title.
    pub title: String,

    /// Fields in render and validation order.
    pub fields: Vec<FormField>,
}

impl FormSection {
    /// Returns the field with the given id, if this section defines it.
    #[must_use]
    pub fn field(&self, field_id: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.id == field_id)
    }
}

/// Ordered collection of form sections.
///
/// Section order is authoritative: validation walks sections in catalog order,
/// not in the order an operator selected them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionCatalog {
    sections: Vec<FormSection>,
}

impl SectionCatalog {
    /// Builds a catalog from sections in their validation order.
    #[must_use]
    pub fn new(sections: Vec<FormSection>) -> Self {
        Self { sections }
    }

    /// Returns all sections in order.
    #[must_use]
    pub fn sections(&self) -> &[FormSection] {
        &self.sections
    }

    /// Returns the section with the given id.
    #[must_use]
    pub fn section(&self, section_id: &str) -> Option<&FormSection> {
        self.sections.iter().find(|s| s.id == section_id)
    }

    /// Returns `true` when a section with the given id exists.
    #[must_use]
    pub fn contains(&self, section_id: &str) -> bool {
        self.section(section_id).is_some()
    }

    /// Looks a field up by id across all sections.
    ///
    /// Field ids are unique across the catalog, so the first hit is the only
    /// hit.
    #[must_use]
    pub fn find_field(&self, field_id: &str) -> Option<&FormField> {
        self.sections.iter().find_map(|s| s.field(field_id))
    }

    /// Number of sections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Returns `true` when the catalog has no sections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// Source of form schemas and facility data.
///
/// The engine takes a provider at construction instead of reaching for a
/// global registry, so callers decide where schemas come from.
pub trait SchemaProvider {
    /// Returns the section catalog all racks share.
    fn catalog(&self) -> &SectionCatalog;

    /// Returns the known rack names for a facility, in display order.
    ///
    /// Unknown facilities yield an empty list, not an error. A walkthrough of
    /// an unprovisioned facility proceeds with no rack-location options.
    fn racks_for(&self, facility_id: &str) -> Vec<String>;

    /// Returns the display name for a facility id, if known.
    fn facility_name(&self, facility_id: &str) -> Option<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_catalog() -> SectionCatalog {
        SectionCatalog::new(vec![
            FormSection {
                id: "pdu".to_string(),
                title: "Power Distribution".to_string(),
                fields: vec![
                    FormField {
                        id: "pdu-serial".to_string(),
                        label: "Serial Number".to_string(),
                        field_type: FieldType::Barcode,
                        placeholder: None,
                        required: true,
                        options: Vec::new(),
                    },
                    FormField {
                        id: "pdu-load".to_string(),
                        label: "Load Status".to_string(),
                        field_type: FieldType::Select,
                        placeholder: None,
                        required: false,
                        options: vec![
                            FieldOption::plain("balanced"),
                            FieldOption::plain("unbalanced"),
                        ],
                    },
                ],
            },
            FormSection {
                id: "switch".to_string(),
                title: "Network Switch".to_string(),
                fields: vec![FormField {
                    id: "switch-notes".to_string(),
                    label: "Notes".to_string(),
                    field_type: FieldType::Textarea,
                    placeholder: Some("Observations".to_string()),
                    required: false,
                    options: Vec::new(),
                }],
            },
        ])
    }

    #[test]
    fn field_type_serializes_lowercase() {
        let json = serde_json::to_string(&FieldType::Textarea).unwrap();
        assert_eq!(json, "\"textarea\"");
        let back: FieldType = serde_json::from_str("\"barcode\"").unwrap();
        assert_eq!(back, FieldType::Barcode);
    }

    #[test]
    fn field_type_predicates() {
        assert!(FieldType::Barcode.is_text_like());
        assert!(!FieldType::Select.is_text_like());
        assert!(FieldType::Radio.is_choice());
        assert!(!FieldType::Checkbox.is_choice());
    }

    #[test]
    fn form_field_uses_type_key_on_the_wire() {
        let field = FormField {
            id: "f1".to_string(),
            label: "F1".to_string(),
            field_type: FieldType::Text,
            placeholder: None,
            required: true,
            options: Vec::new(),
        };
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(json["type"], "text");
        assert!(json.get("placeholder").is_none());
        assert!(json.get("options").is_none());
    }

    #[test]
    fn form_field_defaults_apply_on_deserialize() {
        let field: FormField =
            serde_json::from_str(r#"{"id":"f","label":"F","type":"checkbox"}"#).unwrap();
        assert!(!field.required);
        assert!(field.options.is_empty());
        assert!(field.placeholder.is_none());
    }

    #[test]
    fn catalog_lookups() {
        let catalog = sample_catalog();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.contains("pdu"));
        assert!(!catalog.contains("cooling"));
        assert_eq!(catalog.section("switch").unwrap().title, "Network Switch");
        let field = catalog.find_field("pdu-load").unwrap();
        assert!(field.has_option("balanced"));
        assert!(!field.has_option("overloaded"));
        assert!(catalog.find_field("missing").is_none());
    }

    #[test]
    fn section_order_is_preserved() {
        let catalog = sample_catalog();
        let ids: Vec<&str> = catalog.sections().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["pdu", "switch"]);
    }
}
