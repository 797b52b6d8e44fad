//! Configuration parsing and validation.
//!
//! `rackwalk.toml` configures the operator profile, the submission output
//! directory, and optional catalog overrides. Overrides replace the matching
//! built-in wholesale: a non-empty `[[sections]]` list becomes the whole
//! catalog, a non-empty `[[facilities]]` list becomes the whole directory.
//! Validation is fail-closed; a config that parses but contradicts itself is
//! rejected before anything runs against it.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::catalog::{self, Facility, FacilityDirectory, StaticProvider};
use crate::identity::UserProfile;
use crate::schema::{FormSection, SectionCatalog, RACK_LOCATION_FIELD};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RackwalkConfig {
    /// Operator to sign in for CLI walkthroughs.
    #[serde(default)]
    pub operator: Option<OperatorConfig>,

    /// Submission output settings.
    #[serde(default)]
    pub submission: SubmissionConfig,

    /// Facility overrides. Empty keeps the built-in directory.
    #[serde(default)]
    pub facilities: Vec<Facility>,

    /// Section catalog overrides. Empty keeps the built-in catalog.
    #[serde(default)]
    pub sections: Vec<FormSection>,
}

/// Operator profile as configured.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperatorConfig {
    /// Full display name.
    pub name: String,

    /// Sign-in email, also used as the operator id.
    pub email: String,

    /// Role label.
    #[serde(default = "default_role")]
    pub role: String,
}

/// Submission output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionConfig {
    /// Directory submission files are written to.
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            out_dir: default_out_dir(),
        }
    }
}

fn default_out_dir() -> PathBuf {
    PathBuf::from("submissions")
}

fn default_role() -> String {
    "Technician".to_string()
}

impl RackwalkConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or validation rejects it:
    /// duplicate facility ids, duplicate section or field ids, a field id
    /// colliding with the reserved rack-location id, or a choice field with
    /// no options.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut facility_ids = HashSet::new();
        for facility in &self.facilities {
            if !facility_ids.insert(facility.id.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate facility id: {}",
                    facility.id
                )));
            }
        }

        let mut section_ids = HashSet::new();
        let mut field_ids = HashSet::new();
        for section in &self.sections {
            if !section_ids.insert(section.id.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate section id: {}",
                    section.id
                )));
            }
            for field in &section.fields {
                if field.id == RACK_LOCATION_FIELD {
                    return Err(ConfigError::Validation(format!(
                        "field id '{RACK_LOCATION_FIELD}' is reserved for the rack selector"
                    )));
                }
                if !field_ids.insert(field.id.as_str()) {
                    return Err(ConfigError::Validation(format!(
                        "duplicate field id: {}",
                        field.id
                    )));
                }
                if field.field_type.is_choice() && field.options.is_empty() {
                    return Err(ConfigError::Validation(format!(
                        "choice field '{}' has no options",
                        field.id
                    )));
                }
            }
        }
        Ok(())
    }

    /// Builds the schema provider this configuration describes.
    #[must_use]
    pub fn provider(&self) -> StaticProvider {
        let sections = if self.sections.is_empty() {
            catalog::builtin_sections()
        } else {
            self.sections.clone()
        };
        let facilities = if self.facilities.is_empty() {
            catalog::builtin_facilities()
        } else {
            self.facilities.clone()
        };
        StaticProvider::new(
            SectionCatalog::new(sections),
            FacilityDirectory::new(facilities),
        )
    }

    /// The configured operator as a profile, if one is configured.
    #[must_use]
    pub fn operator_profile(&self) -> Option<UserProfile> {
        self.operator.as_ref().map(|op| UserProfile {
            id: op.email.clone(),
            name: op.name.clone(),
            email: op.email.clone(),
            role: op.role.clone(),
            avatar_url: None,
            last_inspection_date: None,
        })
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading the configuration file.
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Validation error.
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaProvider;

    #[test]
    fn empty_config_uses_builtins() {
        let config = RackwalkConfig::from_toml("").unwrap();
        assert!(config.operator.is_none());
        assert_eq!(config.submission.out_dir, PathBuf::from("submissions"));
        let provider = config.provider();
        assert_eq!(provider.catalog().len(), 5);
        assert!(!provider.racks_for("island-east").is_empty());
    }

    #[test]
    fn full_config_parses() {
        let config = RackwalkConfig::from_toml(
            r#"
            [operator]
            name = "Sarah Chen"
            email = "sarah.chen@example.com"

            [submission]
            out_dir = "/tmp/rackwalk-out"

            [[facilities]]
            id = "lab-1"
            name = "Lab One"
            location = "Basement"
            racks = ["L01", "L02"]

            [[sections]]
            id = "ups"
            title = "UPS"

            [[sections.fields]]
            id = "ups-serial"
            label = "Serial Number"
            type = "barcode"
            required = true

            [[sections.fields]]
            id = "ups-state"
            label = "State"
            type = "select"
            options = [
                { value = "online", label = "Online" },
                { value = "bypass", label = "Bypass" },
            ]
            "#,
        )
        .unwrap();

        let operator = config.operator_profile().unwrap();
        assert_eq!(operator.name, "Sarah Chen");
        assert_eq!(operator.role, "Technician");

        let provider = config.provider();
        assert_eq!(provider.catalog().len(), 1);
        assert!(provider.catalog().find_field("ups-serial").unwrap().required);
        assert_eq!(provider.racks_for("lab-1"), ["L01", "L02"]);
        assert_eq!(provider.facility_name("lab-1").as_deref(), Some("Lab One"));
        // Built-in facilities are replaced, not merged.
        assert!(provider.facility_name("island-east").is_none());
    }

    #[test]
    fn rejects_duplicate_facility_ids() {
        let err = RackwalkConfig::from_toml(
            r#"
            [[facilities]]
            id = "lab-1"
            name = "Lab One"
            location = "Basement"

            [[facilities]]
            id = "lab-1"
            name = "Lab One Again"
            location = "Roof"
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate facility id"));
    }

    #[test]
    fn rejects_duplicate_section_ids() {
        let err = RackwalkConfig::from_toml(
            r#"
            [[sections]]
            id = "ups"
            title = "UPS"
            fields = []

            [[sections]]
            id = "ups"
            title = "UPS again"
            fields = []
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("duplicate section id"));
    }

    #[test]
    fn rejects_duplicate_field_ids_across_sections() {
        let err = RackwalkConfig::from_toml(
            r#"
            [[sections]]
            id = "a"
            title = "A"

            [[sections.fields]]
            id = "serial"
            label = "Serial"
            type = "text"

            [[sections]]
            id = "b"
            title = "B"

            [[sections.fields]]
            id = "serial"
            label = "Serial"
            type = "text"
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate field id"));
    }

    #[test]
    fn rejects_reserved_rack_location_id() {
        let err = RackwalkConfig::from_toml(
            r#"
            [[sections]]
            id = "a"
            title = "A"

            [[sections.fields]]
            id = "rack-location"
            label = "Location"
            type = "select"
            options = [{ value = "x", label = "X" }]
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("reserved"));
    }

    #[test]
    fn rejects_choice_field_without_options() {
        let err = RackwalkConfig::from_toml(
            r#"
            [[sections]]
            id = "a"
            title = "A"

            [[sections.fields]]
            id = "pick"
            label = "Pick"
            type = "radio"
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("has no options"));
    }

    #[test]
    fn from_file_reads_and_validates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rackwalk.toml");
        std::fs::write(&path, "[submission]\nout_dir = \"out\"\n").unwrap();
        let config = RackwalkConfig::from_file(&path).unwrap();
        assert_eq!(config.submission.out_dir, PathBuf::from("out"));

        let missing = RackwalkConfig::from_file(&dir.path().join("absent.toml"));
        assert!(matches!(missing, Err(ConfigError::Io(_))));
    }
}
