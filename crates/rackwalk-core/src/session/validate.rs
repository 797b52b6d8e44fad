//! Validation sweep over a walkthrough session.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{RackId, WalkthroughSession};
use crate::value::FieldValue;

/// One finding from a validation sweep.
///
/// The `Display` text is the exact wording shown to operators; callers that
/// need structure instead of prose match on the variant.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum ValidationError {
    /// The found-issues question has not been answered either way.
    #[error("Please indicate whether you found issues")]
    MissingIssueAnswer,

    /// A rack reporting issues has no device sections selected.
    #[error("Please select at least one device for Rack {}", .rack.display_number())]
    NoDeviceSelected {
        /// The rack with an empty selection.
        rack: RackId,
    },

    /// A required field of a selected section is unanswered.
    #[error("{field_label} for {section_id} in Rack {} is required", .rack.display_number())]
    MissingRequiredField {
        /// Label of the unanswered field.
        field_label: String,
        /// Section the field belongs to.
        section_id: String,
        /// The rack whose card is incomplete.
        rack: RackId,
    },
}

impl WalkthroughSession {
    /// Runs a full validation sweep and returns the findings in order.
    ///
    /// The sweep is deterministic: the found-issues gate comes first, then
    /// racks in the order they were added; within a rack, sections in catalog
    /// order and fields in section order. An unanswered gate short-circuits
    /// the whole sweep; a "no issues" answer passes with no findings
    /// regardless of rack state.
    ///
    /// The findings are also stored and stay readable through
    /// [`Self::last_errors`] until the next sweep.
    pub fn validate(&mut self) -> Vec<ValidationError> {
        let errors = self.collect_findings();
        self.last_errors.clone_from(&errors);
        errors
    }

    fn collect_findings(&self) -> Vec<ValidationError> {
        let found = match self.found_issues {
            None => return vec![ValidationError::MissingIssueAnswer],
            Some(found) => found,
        };
        if !found {
            return Vec::new();
        }

        let mut errors = Vec::new();
        for &rack in &self.racks {
            let selected = self.selected_sections(rack);
            if selected.is_empty() {
                errors.push(ValidationError::NoDeviceSelected { rack });
                continue;
            }
            // Sections sweep in catalog order, not selection order. The
            // rack-location selector sits outside the catalog and outside
            // this sweep.
            for section in self.catalog.sections() {
                if !selected.iter().any(|id| id == &section.id) {
                    continue;
                }
                for field in &section.fields {
                    if !field.required {
                        continue;
                    }
                    let answered = self
                        .field_value(&field.id, rack)
                        .is_some_and(FieldValue::is_answered);
                    if !answered {
                        errors.push(ValidationError::MissingRequiredField {
                            field_label: field.label.clone(),
                            section_id: section.id.clone(),
                            rack,
                        });
                    }
                }
            }
        }
        errors
    }
}
