//! Walkthrough session state engine.
//!
//! A [`WalkthroughSession`] is the single mutable container behind one rack
//! walkthrough: the racks the operator added, the device sections selected per
//! rack, the typed values recorded per (field, rack) slot, and the tri-state
//! found-issues answer that gates submission.
//!
//! The container holds ids and values only. Rendering, clocks, and persistence
//! stay outside; callers pass timestamps in and receive snapshots out.

mod actions;
mod error;
mod validate;


use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

pub use actions::{ActionReplayError, WalkthroughAction};
pub use error::SessionError;
pub use validate::ValidationError;

use crate::identity::UserProfile;
use crate::schema::{
    FieldOption, FieldType, FormField, SchemaProvider, SectionCatalog, RACK_LOCATION_FIELD,
};
use crate::submit::{SubmissionReceipt, SubmissionSink, SubmitError, WalkthroughSnapshot};
use crate::value::FieldValue;

/// Stable identity of one rack card within a walkthrough.
///
/// Ids are assigned from a monotonic counter and never reused, so removing a
/// rack in the middle of the list cannot make a later rack inherit its
/// selections or values.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RackId(u32);

impl RackId {
    /// Wraps a raw rack id.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw id value.
    #[must_use]
    pub const fn raw(&self) -> u32 {
        self.0
    }

    /// One-based number used in operator-facing messages.
    ///
    /// Display numbers follow the id, not the list position. A walkthrough
    /// that added three racks and removed the second keeps showing "Rack 1"
    /// and "Rack 3".
    #[must_use]
    pub const fn display_number(&self) -> u32 {
        self.0 + 1
    }
}

impl fmt::Display for RackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Mutable state of one rack walkthrough.
#[derive(Debug, Clone)]
pub struct WalkthroughSession {
    facility_id: String,
    facility_name: String,
    catalog: SectionCatalog,
    /// Synthetic required selector offering the facility's rack names.
    rack_location_field: FormField,
    /// Racks in the order they were added. Ids, not positions.
    racks: Vec<RackId>,
    next_rack: u32,
    open_racks: HashSet<RackId>,
    /// Selected section ids per rack, in toggle order.
    selections: HashMap<RackId, Vec<String>>,
    /// Recorded values, keyed rack first, then field id.
    values: HashMap<RackId, HashMap<String, FieldValue>>,
    found_issues: Option<bool>,
    last_errors: Vec<ValidationError>,
    started_at_ms: u64,
    last_saved_ms: Option<u64>,
}

impl WalkthroughSession {
    /// Starts an empty walkthrough for a facility.
    ///
    /// The facility's display name and rack-location options come from the
    /// provider. An unknown facility yields a name derived from its id and an
    /// empty rack-location option list; the walkthrough still proceeds.
    #[must_use]
    pub fn new(provider: &dyn SchemaProvider, facility_id: &str, started_at_ms: u64) -> Self {
        let facility_name = provider
            .facility_name(facility_id)
            .unwrap_or_else(|| prettify_facility_id(facility_id));
        let rack_location_field = FormField {
            id: RACK_LOCATION_FIELD.to_string(),
            label: "Rack Location".to_string(),
            field_type: FieldType::Select,
            placeholder: None,
            required: true,
            options: provider
                .racks_for(facility_id)
                .into_iter()
                .map(FieldOption::plain)
                .collect(),
        };
        Self {
            facility_id: facility_id.to_string(),
            facility_name,
            catalog: provider.catalog().clone(),
            rack_location_field,
            racks: Vec::new(),
            next_rack: 0,
            open_racks: HashSet::new(),
            selections: HashMap::new(),
            values: HashMap::new(),
            found_issues: None,
            last_errors: Vec::new(),
            started_at_ms,
            last_saved_ms: None,
        }
    }

    /// Facility id this walkthrough inspects.
    #[must_use]
    pub fn facility_id(&self) -> &str {
        &self.facility_id
    }

    /// Display name of the facility.
    #[must_use]
    pub fn facility_name(&self) -> &str {
        &self.facility_name
    }

    /// The section catalog this walkthrough validates against.
    #[must_use]
    pub fn catalog(&self) -> &SectionCatalog {
        &self.catalog
    }

    /// The synthetic rack-location field attached to every rack card.
    #[must_use]
    pub fn rack_location_field(&self) -> &FormField {
        &self.rack_location_field
    }

    /// Racks in the order they were added.
    #[must_use]
    pub fn racks(&self) -> &[RackId] {
        &self.racks
    }

    /// Number of racks currently in the walkthrough.
    #[must_use]
    pub fn rack_count(&self) -> usize {
        self.racks.len()
    }

    /// Returns `true` when `rack` is part of this walkthrough.
    #[must_use]
    pub fn contains_rack(&self, rack: RackId) -> bool {
        self.racks.contains(&rack)
    }

    /// Returns `true` when the rack card is expanded.
    #[must_use]
    pub fn is_rack_open(&self, rack: RackId) -> bool {
        self.open_racks.contains(&rack)
    }

    /// Section ids selected for a rack, in the order they were toggled on.
    #[must_use]
    pub fn selected_sections(&self, rack: RackId) -> &[String] {
        self.selections.get(&rack).map_or(&[], Vec::as_slice)
    }

    /// The value recorded for a (field, rack) slot, if any.
    #[must_use]
    pub fn field_value(&self, field_id: &str, rack: RackId) -> Option<&FieldValue> {
        self.values.get(&rack).and_then(|slots| slots.get(field_id))
    }

    /// All values recorded for a rack, in no particular order.
    pub fn rack_values(&self, rack: RackId) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values
            .get(&rack)
            .into_iter()
            .flat_map(|slots| slots.iter().map(|(id, value)| (id.as_str(), value)))
    }

    /// The tri-state found-issues answer. `None` until the operator answers.
    #[must_use]
    pub fn found_issues(&self) -> Option<bool> {
        self.found_issues
    }

    /// Findings from the most recent [`Self::validate`] call.
    #[must_use]
    pub fn last_errors(&self) -> &[ValidationError] {
        &self.last_errors
    }

    /// Wall-clock milliseconds when the walkthrough started.
    #[must_use]
    pub fn started_at_ms(&self) -> u64 {
        self.started_at_ms
    }

    /// Wall-clock milliseconds of the last progress save, if any.
    #[must_use]
    pub fn last_saved_ms(&self) -> Option<u64> {
        self.last_saved_ms
    }

    /// Records the found-issues answer.
    ///
    /// Flipping the answer keeps all racks, selections, and values intact.
    /// An operator who answers "no", then spots a fault on the way out, loses
    /// nothing by flipping to "yes".
    pub fn set_found_issues(&mut self, found: bool) {
        self.found_issues = Some(found);
    }

    /// Appends a new rack card and returns its id.
    ///
    /// New racks start expanded with no selections and no values.
    pub fn add_rack(&mut self) -> RackId {
        let rack = RackId::new(self.next_rack);
        self.next_rack += 1;
        self.racks.push(rack);
        self.open_racks.insert(rack);
        tracing::debug!(rack = rack.raw(), "rack added");
        rack
    }

    /// Removes a rack card together with its selections and values.
    ///
    /// Returns `false` when the rack is not part of this walkthrough. Other
    /// racks keep their ids, selections, and values.
    pub fn remove_rack(&mut self, rack: RackId) -> bool {
        let Some(pos) = self.racks.iter().position(|r| *r == rack) else {
            return false;
        };
        self.racks.remove(pos);
        self.open_racks.remove(&rack);
        self.selections.remove(&rack);
        self.values.remove(&rack);
        tracing::debug!(rack = rack.raw(), "rack removed");
        true
    }

    /// Flips a rack card between expanded and collapsed.
    ///
    /// Returns the new state. Open state is presentational only; validation
    /// ignores it.
    pub fn toggle_rack_open(&mut self, rack: RackId) -> bool {
        if self.open_racks.remove(&rack) {
            false
        } else {
            self.open_racks.insert(rack);
            true
        }
    }

    /// Toggles a device section in or out of a rack's selection.
    ///
    /// Returns the new membership state. Deselecting keeps the section's
    /// recorded values; reselecting brings them back into validation scope.
    pub fn toggle_device_section(
        &mut self,
        rack: RackId,
        section_id: &str,
    ) -> Result<bool, SessionError> {
        if !self.contains_rack(rack) {
            return Err(SessionError::RackNotFound { rack });
        }
        if !self.catalog.contains(section_id) {
            return Err(SessionError::UnknownSection {
                section_id: section_id.to_string(),
            });
        }
        let selected = self.selections.entry(rack).or_default();
        if let Some(pos) = selected.iter().position(|s| s == section_id) {
            selected.remove(pos);
            Ok(false)
        } else {
            selected.push(section_id.to_string());
            Ok(true)
        }
    }

    /// Records a value for a (field, rack) slot.
    ///
    /// The field must exist (in the catalog or as the rack-location field),
    /// the value's kind must match the field's type, and a non-empty choice
    /// must be one of the field's options. An empty choice string clears a
    /// selector back to unanswered.
    ///
    /// Writes are not gated on the field's section being selected; values may
    /// arrive while a section is toggled off and surface when it returns.
    pub fn set_field_value(
        &mut self,
        rack: RackId,
        field_id: &str,
        value: FieldValue,
    ) -> Result<(), SessionError> {
        if !self.contains_rack(rack) {
            return Err(SessionError::RackNotFound { rack });
        }
        let field = self
            .resolve_field(field_id)
            .ok_or_else(|| SessionError::UnknownField {
                field_id: field_id.to_string(),
            })?;
        if !value.matches(field.field_type) {
            return Err(SessionError::TypeMismatch {
                field_id: field_id.to_string(),
                expected: field.field_type.as_str(),
                got: value.kind(),
            });
        }
        if field.field_type.is_choice() {
            if let FieldValue::Choice(choice) = &value {
                if !choice.is_empty() && !field.has_option(choice) {
                    return Err(SessionError::UnknownChoice {
                        field_id: field_id.to_string(),
                        value: choice.clone(),
                    });
                }
            }
        }
        self.values
            .entry(rack)
            .or_default()
            .insert(field_id.to_string(), value);
        Ok(())
    }

    /// Records a progress save at the given wall-clock time.
    pub fn save_progress(&mut self, now_ms: u64) {
        self.last_saved_ms = Some(now_ms);
        tracing::debug!(facility = %self.facility_id, saved_at_ms = now_ms, "progress saved");
    }

    /// Validates and, when clean, captures a snapshot and hands it to `sink`.
    ///
    /// A rejected submission leaves the session untouched apart from
    /// [`Self::last_errors`], so the operator can fix the findings and retry.
    pub fn submit(
        &mut self,
        sink: &mut dyn SubmissionSink,
        operator: Option<&UserProfile>,
        submitted_at_ms: u64,
    ) -> Result<SubmissionReceipt, SubmitError> {
        let errors = self.validate();
        if !errors.is_empty() {
            tracing::warn!(
                facility = %self.facility_id,
                findings = errors.len(),
                "submission rejected by validation"
            );
            return Err(SubmitError::Rejected { errors });
        }
        let snapshot = WalkthroughSnapshot::capture(self, operator, submitted_at_ms);
        let receipt = sink.submit(&snapshot)?;
        tracing::info!(
            facility = %self.facility_id,
            submission = %receipt.submission_id,
            racks = self.racks.len(),
            "walkthrough submitted"
        );
        Ok(receipt)
    }

    /// Resolves a field id against the rack-location field and the catalog.
    fn resolve_field(&self, field_id: &str) -> Option<&FormField> {
        if field_id == self.rack_location_field.id {
            Some(&self.rack_location_field)
        } else {
            self.catalog.find_field(field_id)
        }
    }
}

/// Derives a display name from a facility id when the directory has none.
///
/// `"island-east"` becomes `"Island East"`.
fn prettify_facility_id(id: &str) -> String {
    id.split(['-', '_'])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
