//! Submission contract and snapshot capture.
//!
//! Submission is the only exit from a walkthrough. The engine validates,
//! captures an immutable [`WalkthroughSnapshot`], and hands it to a
//! [`SubmissionSink`]. The sink either returns a [`SubmissionReceipt`] or a
//! [`SinkError`]; there is no fire-and-forget path and no sink that silently
//! swallows a snapshot.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::identity::UserProfile;
use crate::session::{RackId, ValidationError, WalkthroughSession};
use crate::value::FieldValue;

/// Immutable record of a walkthrough at submission time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkthroughSnapshot {
    /// Facility the walkthrough inspected.
    pub facility_id: String,

    /// Display name of the facility.
    pub facility_name: String,

    /// The found-issues answer. Always `Some` for gated submissions.
    pub found_issues: Option<bool>,

    /// Per-rack data in the order racks were added.
    pub racks: Vec<RackSnapshot>,

    /// Operator who submitted, when one was signed in.
    pub completed_by: Option<UserProfile>,

    /// Wall-clock milliseconds when the walkthrough started.
    pub started_at_ms: u64,

    /// Wall-clock milliseconds when the walkthrough was submitted.
    pub submitted_at_ms: u64,
}

/// Per-rack slice of a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RackSnapshot {
    /// Stable rack id from the session.
    pub rack: RackId,

    /// Selected section ids, in the order they were toggled on.
    pub sections: Vec<String>,

    /// Recorded values keyed by field id, ordered for stable output.
    pub values: BTreeMap<String, FieldValue>,
}

impl WalkthroughSnapshot {
    /// Captures the current state of a session.
    ///
    /// Capture never fails and never mutates; a mid-walkthrough capture is a
    /// valid (if incomplete) record. Gating on validation is the session's
    /// job, in [`WalkthroughSession::submit`].
    #[must_use]
    pub fn capture(
        session: &WalkthroughSession,
        operator: Option<&UserProfile>,
        submitted_at_ms: u64,
    ) -> Self {
        let racks = session
            .racks()
            .iter()
            .map(|&rack| RackSnapshot {
                rack,
                sections: session.selected_sections(rack).to_vec(),
                values: session
                    .rack_values(rack)
                    .map(|(id, value)| (id.to_string(), value.clone()))
                    .collect(),
            })
            .collect();
        Self {
            facility_id: session.facility_id().to_string(),
            facility_name: session.facility_name().to_string(),
            found_issues: session.found_issues(),
            racks,
            completed_by: operator.cloned(),
            started_at_ms: session.started_at_ms(),
            submitted_at_ms,
        }
    }
}

/// Proof that a sink recorded a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    /// Sink-assigned id for this submission.
    pub submission_id: String,

    /// Wall-clock milliseconds the sink recorded for the submission.
    pub recorded_at_ms: u64,
}

/// Errors a sink can raise while recording a snapshot.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Writing the submission failed.
    #[error("submission write failed: {0}")]
    Io(#[from] io::Error),

    /// Encoding the snapshot failed.
    #[error("submission encode failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Errors from [`WalkthroughSession::submit`].
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Validation findings blocked the submission.
    #[error("walkthrough failed validation with {} finding(s)", .errors.len())]
    Rejected {
        /// The findings, in validation order.
        errors: Vec<ValidationError>,
    },

    /// The sink failed to record the snapshot.
    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// Destination for validated walkthrough snapshots.
pub trait SubmissionSink {
    /// Records a snapshot and returns a receipt for it.
    fn submit(&mut self, snapshot: &WalkthroughSnapshot) -> Result<SubmissionReceipt, SinkError>;
}

/// Sink that keeps submissions in memory.
///
/// Used by tests and by callers that post-process submissions themselves.
#[derive(Debug, Default)]
pub struct MemorySink {
    submissions: Vec<WalkthroughSnapshot>,
}

impl MemorySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All snapshots recorded so far, in submission order.
    #[must_use]
    pub fn submissions(&self) -> &[WalkthroughSnapshot] {
        &self.submissions
    }
}

impl SubmissionSink for MemorySink {
    fn submit(&mut self, snapshot: &WalkthroughSnapshot) -> Result<SubmissionReceipt, SinkError> {
        self.submissions.push(snapshot.clone());
        Ok(SubmissionReceipt {
            submission_id: format!("mem-{:04}", self.submissions.len()),
            recorded_at_ms: snapshot.submitted_at_ms,
        })
    }
}

/// Sink that writes each submission as one pretty-printed JSON file.
///
/// File names embed the submission time and a per-sink sequence number, so
/// repeated submissions within the same millisecond stay distinct.
#[derive(Debug)]
pub struct JsonFileSink {
    dir: PathBuf,
    sequence: u32,
}

impl JsonFileSink {
    /// Creates the sink, creating the output directory if missing.
    pub fn new(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir, sequence: 0 })
    }

    /// Directory submissions are written to.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl SubmissionSink for JsonFileSink {
    fn submit(&mut self, snapshot: &WalkthroughSnapshot) -> Result<SubmissionReceipt, SinkError> {
        self.sequence += 1;
        let submission_id = format!(
            "walkthrough-{}-{:04}",
            snapshot.submitted_at_ms, self.sequence
        );
        let path = self.dir.join(format!("{submission_id}.json"));
        let body = serde_json::to_vec_pretty(snapshot)?;
        fs::write(&path, body)?;
        tracing::info!(path = %path.display(), "submission recorded");
        Ok(SubmissionReceipt {
            submission_id,
            recorded_at_ms: snapshot.submitted_at_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    fn submitted_session() -> WalkthroughSession {
        let mut session = WalkthroughSession::new(&catalog::default_provider(), "island-east", 100);
        session.set_found_issues(true);
        let rack = session.add_rack();
        session.toggle_device_section(rack, "pdu").unwrap();
        session
            .set_field_value(rack, "pdu-serial", FieldValue::Text("PDU-9".to_string()))
            .unwrap();
        session
    }

    #[test]
    fn capture_groups_values_per_rack() {
        let mut session = submitted_session();
        let second = session.add_rack();
        session.toggle_device_section(second, "cooling").unwrap();
        session
            .set_field_value(
                second,
                "cooling-airflow",
                FieldValue::Choice("restricted".to_string()),
            )
            .unwrap();

        let snapshot = WalkthroughSnapshot::capture(&session, None, 500);
        assert_eq!(snapshot.facility_id, "island-east");
        assert_eq!(snapshot.found_issues, Some(true));
        assert_eq!(snapshot.racks.len(), 2);
        assert_eq!(snapshot.started_at_ms, 100);
        assert_eq!(snapshot.submitted_at_ms, 500);

        let first = &snapshot.racks[0];
        assert_eq!(first.sections, ["pdu"]);
        assert!(first.values.contains_key("pdu-serial"));
        assert!(!first.values.contains_key("cooling-airflow"));

        let second = &snapshot.racks[1];
        assert_eq!(second.sections, ["cooling"]);
        assert!(second.values.contains_key("cooling-airflow"));
    }

    #[test]
    fn memory_sink_records_in_order() {
        let session = submitted_session();
        let mut sink = MemorySink::new();
        let snapshot = WalkthroughSnapshot::capture(&session, None, 500);
        let receipt = sink.submit(&snapshot).unwrap();
        assert_eq!(receipt.submission_id, "mem-0001");
        assert_eq!(receipt.recorded_at_ms, 500);
        assert_eq!(sink.submissions().len(), 1);
        assert_eq!(sink.submissions()[0], snapshot);
    }

    #[test]
    fn json_file_sink_writes_one_file_per_submission() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = JsonFileSink::new(dir.path().join("out")).unwrap();
        let session = submitted_session();
        let snapshot = WalkthroughSnapshot::capture(&session, None, 777);

        let receipt = sink.submit(&snapshot).unwrap();
        assert_eq!(receipt.submission_id, "walkthrough-777-0001");

        let path = sink.dir().join("walkthrough-777-0001.json");
        let body = fs::read_to_string(path).unwrap();
        let back: WalkthroughSnapshot = serde_json::from_str(&body).unwrap();
        assert_eq!(back, snapshot);

        let second = sink.submit(&snapshot).unwrap();
        assert_eq!(second.submission_id, "walkthrough-777-0002");
    }

    #[test]
    fn rejected_error_counts_findings() {
        let err = SubmitError::Rejected {
            errors: vec![ValidationError::MissingIssueAnswer],
        };
        assert_eq!(
            err.to_string(),
            "walkthrough failed validation with 1 finding(s)"
        );
    }
}
