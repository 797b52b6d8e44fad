//! Walkthrough lifecycle: entry guard, live session, submission, confirmation.
//!
//! A [`WalkthroughFlow`] is the shell around one [`WalkthroughSession`]. It
//! enforces the facility-id precondition at entry, carries the signed-in
//! operator, and turns a successful submission into a [`Confirmation`]
//! summary. All collaborators arrive as arguments; the flow holds no global
//! state.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::identity::AuthSession;
use crate::schema::SchemaProvider;
use crate::session::WalkthroughSession;
use crate::submit::{SubmissionSink, SubmitError};

/// Flow entry failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    /// A walkthrough was started without naming a facility.
    #[error("a facility id is required to start a walkthrough")]
    MissingFacility,
}

/// Summary of a successfully submitted walkthrough.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmation {
    /// Display name of the inspected facility.
    pub facility_name: String,

    /// Receipt id assigned by the sink.
    pub submission_id: String,

    /// Wall-clock milliseconds the sink recorded.
    pub submitted_at_ms: u64,

    /// Number of racks in the submitted walkthrough.
    pub racks_reported: usize,

    /// The operator's found-issues answer.
    pub issues_found: bool,

    /// Name of the submitting operator, when one was signed in.
    pub inspector: Option<String>,
}

/// One walkthrough from facility entry to submission or cancellation.
#[derive(Debug)]
pub struct WalkthroughFlow {
    session: WalkthroughSession,
    operator: Option<AuthSession>,
}

impl WalkthroughFlow {
    /// Enters a walkthrough for a facility.
    ///
    /// A missing or blank facility id aborts entry. An unknown facility does
    /// not: the session starts with a derived display name and no
    /// rack-location options, and the walkthrough proceeds.
    pub fn enter(
        provider: &dyn SchemaProvider,
        facility_id: Option<&str>,
        operator: Option<AuthSession>,
        now_ms: u64,
    ) -> Result<Self, FlowError> {
        let facility_id = facility_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or(FlowError::MissingFacility)?;
        let session = WalkthroughSession::new(provider, facility_id, now_ms);
        tracing::info!(
            facility = facility_id,
            operator = operator.as_ref().map(|s| s.user.id.as_str()),
            "walkthrough started"
        );
        Ok(Self { session, operator })
    }

    /// The live session.
    #[must_use]
    pub fn session(&self) -> &WalkthroughSession {
        &self.session
    }

    /// Mutable access to the live session.
    pub fn session_mut(&mut self) -> &mut WalkthroughSession {
        &mut self.session
    }

    /// The signed-in operator, if any.
    #[must_use]
    pub fn operator(&self) -> Option<&AuthSession> {
        self.operator.as_ref()
    }

    /// Validates and submits the walkthrough through `sink`.
    ///
    /// On rejection the flow stays usable: the findings are readable through
    /// the session and a corrected walkthrough can be resubmitted.
    pub fn submit(
        &mut self,
        sink: &mut dyn SubmissionSink,
        submitted_at_ms: u64,
    ) -> Result<Confirmation, SubmitError> {
        let profile = self.operator.as_ref().map(|s| s.user.clone());
        let receipt = self
            .session
            .submit(sink, profile.as_ref(), submitted_at_ms)?;
        Ok(Confirmation {
            facility_name: self.session.facility_name().to_string(),
            submission_id: receipt.submission_id,
            submitted_at_ms: receipt.recorded_at_ms,
            racks_reported: self.session.rack_count(),
            issues_found: self.session.found_issues().unwrap_or(false),
            inspector: profile.map(|p| p.name),
        })
    }

    /// Abandons the walkthrough, dropping all recorded state.
    pub fn cancel(self) {
        tracing::info!(facility = %self.session.facility_id(), "walkthrough cancelled");
    }
}
