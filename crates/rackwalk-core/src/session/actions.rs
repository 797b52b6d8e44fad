//! Replayable walkthrough actions.
//!
//! Every mutation of a [`WalkthroughSession`] has an action form, so a whole
//! walkthrough can be recorded as JSON and replayed against a fresh session.
//! The CLI runs scenario files this way; tests use it to build sessions
//! declaratively.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{RackId, SessionError, WalkthroughSession};
use crate::value::FieldValue;

/// One operator interaction, in replayable form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WalkthroughAction {
    /// Answer the found-issues question.
    SetFoundIssues {
        /// `true` for "found issues", `false` for a clean walkthrough.
        found: bool,
    },

    /// Append a new rack card.
    AddRack,

    /// Remove a rack card together with its selections and values.
    RemoveRack {
        /// The rack to remove.
        rack: RackId,
    },

    /// Expand or collapse a rack card.
    ToggleRackOpen {
        /// The rack to flip.
        rack: RackId,
    },

    /// Toggle a device section in or out of a rack's selection.
    ToggleSection {
        /// The rack whose selection changes.
        rack: RackId,
        /// The section id to toggle.
        section: String,
    },

    /// Record a field value for a rack.
    SetField {
        /// The rack the value belongs to.
        rack: RackId,
        /// The field id to write.
        field: String,
        /// The typed value to store.
        value: FieldValue,
    },

    /// Record a progress save.
    SaveProgress {
        /// Wall-clock milliseconds of the save.
        at_ms: u64,
    },
}

/// An action sequence failed partway through.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("action {index} failed: {source}")]
pub struct ActionReplayError {
    /// Zero-based position of the failing action in the sequence.
    pub index: usize,
    /// The session error the action hit.
    #[source]
    pub source: SessionError,
}

impl WalkthroughSession {
    /// Applies one action to the session.
    ///
    /// Replay is strict where the session is strict, plus one case on top:
    /// removing a rack that is not present fails here even though the
    /// interactive [`Self::remove_rack`] reports it as a plain `false`. A
    /// recorded sequence that names a missing rack is broken, not idle.
    pub fn apply_action(&mut self, action: &WalkthroughAction) -> Result<(), SessionError> {
        match action {
            WalkthroughAction::SetFoundIssues { found } => {
                self.set_found_issues(*found);
                Ok(())
            },
            WalkthroughAction::AddRack => {
                self.add_rack();
                Ok(())
            },
            WalkthroughAction::RemoveRack { rack } => {
                if self.remove_rack(*rack) {
                    Ok(())
                } else {
                    Err(SessionError::RackNotFound { rack: *rack })
                }
            },
            WalkthroughAction::ToggleRackOpen { rack } => {
                self.toggle_rack_open(*rack);
                Ok(())
            },
            WalkthroughAction::ToggleSection { rack, section } => self
                .toggle_device_section(*rack, section)
                .map(|_selected| ()),
            WalkthroughAction::SetField { rack, field, value } => {
                self.set_field_value(*rack, field, value.clone())
            },
            WalkthroughAction::SaveProgress { at_ms } => {
                self.save_progress(*at_ms);
                Ok(())
            },
        }
    }

    /// Applies a recorded action sequence in order.
    ///
    /// Stops at the first failing action and reports its position together
    /// with the underlying error. Earlier actions stay applied.
    pub fn apply_actions(
        &mut self,
        actions: &[WalkthroughAction],
    ) -> Result<(), ActionReplayError> {
        for (index, action) in actions.iter().enumerate() {
            self.apply_action(action)
                .map_err(|source| ActionReplayError { index, source })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    fn fresh_session() -> WalkthroughSession {
        WalkthroughSession::new(&catalog::default_provider(), "island-east", 0)
    }

    #[test]
    fn actions_serialize_with_type_tag() {
        let action = WalkthroughAction::SetField {
            rack: RackId::new(0),
            field: "pdu-serial".to_string(),
            value: FieldValue::Text("PDU-17".to_string()),
        };
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["type"], "set_field");
        assert_eq!(json["rack"], 0);
        assert_eq!(json["field"], "pdu-serial");
        assert_eq!(json["value"]["kind"], "text");

        let back: WalkthroughAction =
            serde_json::from_str(r#"{"type":"add_rack"}"#).unwrap();
        assert_eq!(back, WalkthroughAction::AddRack);
    }

    #[test]
    fn replay_builds_the_same_state_as_direct_calls() {
        let actions = vec![
            WalkthroughAction::AddRack,
            WalkthroughAction::SetFoundIssues { found: true },
            WalkthroughAction::ToggleSection {
                rack: RackId::new(0),
                section: "pdu".to_string(),
            },
            WalkthroughAction::SetField {
                rack: RackId::new(0),
                field: "pdu-serial".to_string(),
                value: FieldValue::Text("PDU-17".to_string()),
            },
            WalkthroughAction::SaveProgress { at_ms: 42 },
        ];

        let mut replayed = fresh_session();
        replayed.apply_actions(&actions).unwrap();

        let mut direct = fresh_session();
        let rack = direct.add_rack();
        direct.set_found_issues(true);
        direct.toggle_device_section(rack, "pdu").unwrap();
        direct
            .set_field_value(rack, "pdu-serial", FieldValue::Text("PDU-17".to_string()))
            .unwrap();
        direct.save_progress(42);

        assert_eq!(replayed.racks(), direct.racks());
        assert_eq!(replayed.found_issues(), direct.found_issues());
        assert_eq!(
            replayed.selected_sections(rack),
            direct.selected_sections(rack)
        );
        assert_eq!(
            replayed.field_value("pdu-serial", rack),
            direct.field_value("pdu-serial", rack)
        );
        assert_eq!(replayed.last_saved_ms(), Some(42));
    }

    #[test]
    fn replay_reports_the_failing_index() {
        let actions = vec![
            WalkthroughAction::AddRack,
            WalkthroughAction::RemoveRack {
                rack: RackId::new(7),
            },
        ];
        let mut session = fresh_session();
        let err = session.apply_actions(&actions).unwrap_err();
        assert_eq!(err.index, 1);
        assert_eq!(
            err.source,
            SessionError::RackNotFound {
                rack: RackId::new(7)
            }
        );
        // The first action stays applied.
        assert_eq!(session.rack_count(), 1);
    }

    #[test]
    fn removing_a_missing_rack_fails_replay() {
        let mut session = fresh_session();
        let err = session
            .apply_action(&WalkthroughAction::RemoveRack {
                rack: RackId::new(0),
            })
            .unwrap_err();
        assert!(matches!(err, SessionError::RackNotFound { .. }));
    }
}
