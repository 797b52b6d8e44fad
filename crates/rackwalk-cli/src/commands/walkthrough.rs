//! Walkthrough scenario commands.
//!
//! Scenarios are JSON arrays of session actions. `run` replays one against a
//! fresh session and submits the result to a file sink; `validate` replays
//! and prints the validation report without submitting.

use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{bail, Context, Result};
use rackwalk_core::config::RackwalkConfig;
use rackwalk_core::flow::WalkthroughFlow;
use rackwalk_core::identity::AuthSession;
use rackwalk_core::session::WalkthroughAction;
use rackwalk_core::submit::{JsonFileSink, SubmitError};

use crate::output;

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}

fn load_scenario(path: &Path) -> Result<Vec<WalkthroughAction>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading scenario {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parsing scenario {}", path.display()))
}

fn enter_flow(
    config: &RackwalkConfig,
    facility: &str,
    started_at_ms: u64,
) -> Result<WalkthroughFlow> {
    let provider = config.provider();
    let operator = config.operator_profile().map(|user| AuthSession {
        user,
        signed_in_at_ms: started_at_ms,
    });
    WalkthroughFlow::enter(&provider, Some(facility), operator, started_at_ms)
        .context("entering walkthrough")
}

/// Replays a scenario and submits the walkthrough.
pub fn run(
    config: &RackwalkConfig,
    facility: &str,
    scenario: &Path,
    out: Option<&Path>,
    json: bool,
) -> Result<()> {
    let actions = load_scenario(scenario)?;
    let mut flow = enter_flow(config, facility, now_ms())?;
    flow.session_mut()
        .apply_actions(&actions)
        .with_context(|| format!("replaying {}", scenario.display()))?;

    let out_dir = out.unwrap_or(&config.submission.out_dir);
    let mut sink = JsonFileSink::new(out_dir)
        .with_context(|| format!("opening submission directory {}", out_dir.display()))?;

    match flow.submit(&mut sink, now_ms()) {
        Ok(confirmation) => output::print_one(json, confirmation, |c| {
            format!(
                "submitted {} for {}: {} rack(s), issues found: {}",
                c.submission_id,
                c.facility_name,
                c.racks_reported,
                if c.issues_found { "yes" } else { "no" }
            )
        }),
        Err(SubmitError::Rejected { errors }) => {
            for error in &errors {
                eprintln!("{error}");
            }
            bail!(
                "walkthrough failed validation with {} finding(s)",
                errors.len()
            );
        },
        Err(err) => Err(err).context("recording submission"),
    }
}

/// Replays a scenario and prints the validation report without submitting.
///
/// Findings are output, not failure: the exit code stays zero either way.
pub fn validate(
    config: &RackwalkConfig,
    facility: &str,
    scenario: &Path,
    json: bool,
) -> Result<()> {
    let actions = load_scenario(scenario)?;
    let mut flow = enter_flow(config, facility, now_ms())?;
    flow.session_mut()
        .apply_actions(&actions)
        .with_context(|| format!("replaying {}", scenario.display()))?;

    let report = flow.session_mut().validate();
    if report.is_empty() {
        output::print_one(json, report, |_| "walkthrough is ready to submit".to_string())
    } else {
        output::print_out(json, &report, ToString::to_string)
    }
}
