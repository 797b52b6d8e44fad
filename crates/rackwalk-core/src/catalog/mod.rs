//! Built-in schema catalog and facility directory.
//!
//! Ships the default device sections and facilities so the CLI works out of
//! the box. A configuration file can replace either half; see
//! [`crate::config`].

use serde::{Deserialize, Serialize};

use crate::schema::{
    FieldOption, FieldType, FormField, FormSection, SchemaProvider, SectionCatalog,
};

/// A facility that can be walked through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facility {
    /// Stable facility id, used on the CLI and in flow entry.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Physical location description.
    pub location: String,

    /// Known rack names in display order.
    #[serde(default)]
    pub racks: Vec<String>,
}

/// Ordered facility list with id lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacilityDirectory {
    facilities: Vec<Facility>,
}

impl FacilityDirectory {
    /// Builds a directory from facilities in display order.
    #[must_use]
    pub fn new(facilities: Vec<Facility>) -> Self {
        Self { facilities }
    }

    /// All facilities in order.
    #[must_use]
    pub fn facilities(&self) -> &[Facility] {
        &self.facilities
    }

    /// Returns the facility with the given id.
    #[must_use]
    pub fn facility(&self, facility_id: &str) -> Option<&Facility> {
        self.facilities.iter().find(|f| f.id == facility_id)
    }

    /// Rack names for a facility. Unknown ids yield an empty list.
    #[must_use]
    pub fn racks_for(&self, facility_id: &str) -> Vec<String> {
        self.facility(facility_id)
            .map(|f| f.racks.clone())
            .unwrap_or_default()
    }
}

/// Provider over an owned catalog and facility directory.
#[derive(Debug, Clone)]
pub struct StaticProvider {
    catalog: SectionCatalog,
    directory: FacilityDirectory,
}

impl StaticProvider {
    /// Builds a provider from a catalog and directory.
    #[must_use]
    pub fn new(catalog: SectionCatalog, directory: FacilityDirectory) -> Self {
        Self { catalog, directory }
    }

    /// The facility directory behind this provider.
    #[must_use]
    pub fn directory(&self) -> &FacilityDirectory {
        &self.directory
    }
}

impl SchemaProvider for StaticProvider {
    fn catalog(&self) -> &SectionCatalog {
        &self.catalog
    }

    fn racks_for(&self, facility_id: &str) -> Vec<String> {
        self.directory.racks_for(facility_id)
    }

    fn facility_name(&self, facility_id: &str) -> Option<String> {
        self.directory.facility(facility_id).map(|f| f.name.clone())
    }
}

/// Provider over the built-in catalog and facilities.
#[must_use]
pub fn default_provider() -> StaticProvider {
    StaticProvider::new(
        SectionCatalog::new(builtin_sections()),
        FacilityDirectory::new(builtin_facilities()),
    )
}

fn field(id: &str, label: &str, field_type: FieldType) -> FormField {
    FormField {
        id: id.to_string(),
        label: label.to_string(),
        field_type,
        placeholder: None,
        required: false,
        options: Vec::new(),
    }
}

fn req(mut field: FormField) -> FormField {
    field.required = true;
    field
}

fn hint(mut field: FormField, placeholder: &str) -> FormField {
    field.placeholder = Some(placeholder.to_string());
    field
}

fn opts(mut field: FormField, options: &[(&str, &str)]) -> FormField {
    field.options = options
        .iter()
        .map(|(value, label)| FieldOption {
            value: (*value).to_string(),
            label: (*label).to_string(),
        })
        .collect();
    field
}

/// The built-in device sections, in catalog (and validation) order.
#[must_use]
pub fn builtin_sections() -> Vec<FormSection> {
    vec![
        FormSection {
            id: "pdu".to_string(),
            title: "Power Distribution Unit".to_string(),
            fields: vec![
                req(hint(
                    field("pdu-serial", "Serial Number", FieldType::Barcode),
                    "Scan or type the PDU serial",
                )),
                opts(
                    field("pdu-load", "Load Status", FieldType::Select),
                    &[
                        ("balanced", "Balanced"),
                        ("unbalanced", "Unbalanced"),
                        ("overloaded", "Overloaded"),
                    ],
                ),
                field("pdu-breaker-tripped", "Breaker Tripped", FieldType::Checkbox),
                hint(
                    field("pdu-notes", "Notes", FieldType::Textarea),
                    "Anything unusual about power delivery",
                ),
            ],
        },
        FormSection {
            id: "switch".to_string(),
            title: "Network Switch".to_string(),
            fields: vec![
                req(hint(
                    field("switch-serial", "Serial Number", FieldType::Barcode),
                    "Scan or type the switch serial",
                )),
                opts(
                    field("switch-port-status", "Port Status", FieldType::Select),
                    &[
                        ("all-up", "All ports up"),
                        ("degraded", "Some ports down"),
                        ("down", "Switch unreachable"),
                    ],
                ),
                field("switch-uplinks-seated", "Uplinks Seated", FieldType::Checkbox),
                field("switch-notes", "Notes", FieldType::Textarea),
            ],
        },
        FormSection {
            id: "server".to_string(),
            title: "Server".to_string(),
            fields: vec![
                req(hint(
                    field("server-asset", "Asset Tag", FieldType::Barcode),
                    "Scan the asset tag",
                )),
                opts(
                    field("server-leds", "Front LED State", FieldType::Radio),
                    &[
                        ("green", "Green"),
                        ("amber", "Amber"),
                        ("off", "Off"),
                    ],
                ),
                field("server-position", "U Position", FieldType::Location),
                field("server-notes", "Notes", FieldType::Textarea),
            ],
        },
        FormSection {
            id: "cooling".to_string(),
            title: "Cooling".to_string(),
            fields: vec![
                req(opts(
                    field("cooling-airflow", "Airflow", FieldType::Select),
                    &[
                        ("clear", "Clear"),
                        ("restricted", "Restricted"),
                        ("blocked", "Blocked"),
                    ],
                )),
                hint(
                    field("cooling-intake-temp", "Intake Temperature", FieldType::Text),
                    "Degrees C at the front door",
                ),
                field("cooling-photo", "Thermal Photo", FieldType::File),
                field("cooling-notes", "Notes", FieldType::Textarea),
            ],
        },
        FormSection {
            id: "cabling".to_string(),
            title: "Cabling".to_string(),
            fields: vec![
                req(opts(
                    field("cabling-damage", "Visible Damage", FieldType::Radio),
                    &[
                        ("none", "None"),
                        ("minor", "Minor"),
                        ("severe", "Severe"),
                    ],
                )),
                field("cabling-dressed", "Cables Dressed", FieldType::Checkbox),
                field("cabling-photo", "Photo", FieldType::File),
                field("cabling-notes", "Notes", FieldType::Textarea),
            ],
        },
    ]
}

/// The built-in facility directory, in display order.
#[must_use]
pub fn builtin_facilities() -> Vec<Facility> {
    vec![
        Facility {
            id: "island-east".to_string(),
            name: "Island East".to_string(),
            location: "Building A, Floor 2".to_string(),
            racks: ["A01", "A02", "A03", "A04", "B01", "B02"]
                .map(String::from)
                .to_vec(),
        },
        Facility {
            id: "island-west".to_string(),
            name: "Island West".to_string(),
            location: "Building A, Floor 3".to_string(),
            racks: ["C01", "C02", "C03", "C04"].map(String::from).to_vec(),
        },
        Facility {
            id: "harbor-north".to_string(),
            name: "Harbor North".to_string(),
            location: "Building C, Floor 1".to_string(),
            racks: ["N01", "N02", "N03", "N04", "N05"].map(String::from).to_vec(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::schema::RACK_LOCATION_FIELD;

    #[test]
    fn builtin_sections_keep_their_order() {
        let provider = default_provider();
        let ids: Vec<&str> = provider
            .catalog()
            .sections()
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(ids, ["pdu", "switch", "server", "cooling", "cabling"]);
    }

    #[test]
    fn builtin_field_ids_are_globally_unique() {
        let mut seen = HashSet::new();
        for section in builtin_sections() {
            for field in &section.fields {
                assert!(seen.insert(field.id.clone()), "duplicate id {}", field.id);
                assert_ne!(field.id, RACK_LOCATION_FIELD);
            }
        }
    }

    #[test]
    fn builtin_choice_fields_carry_options() {
        for section in builtin_sections() {
            for field in &section.fields {
                if field.field_type.is_choice() {
                    assert!(!field.options.is_empty(), "{} has no options", field.id);
                } else {
                    assert!(field.options.is_empty(), "{} has stray options", field.id);
                }
            }
        }
    }

    #[test]
    fn every_builtin_section_has_one_required_field() {
        for section in builtin_sections() {
            let required = section.fields.iter().filter(|f| f.required).count();
            assert_eq!(required, 1, "section {}", section.id);
        }
    }

    #[test]
    fn directory_lookup_and_unknown_facility() {
        let provider = default_provider();
        assert_eq!(
            provider.facility_name("island-east").as_deref(),
            Some("Island East")
        );
        assert_eq!(provider.racks_for("island-west").len(), 4);
        assert!(provider.facility_name("ridge-south").is_none());
        assert!(provider.racks_for("ridge-south").is_empty());
    }
}
