//! Dashboard summary over an exported data bundle.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rackwalk_core::report::{DashboardCounts, ReportData};

use crate::output;

/// Tallies dashboard counts from a JSON data bundle.
pub fn summary(data: &Path, json: bool) -> Result<()> {
    let content =
        fs::read_to_string(data).with_context(|| format!("reading data file {}", data.display()))?;
    let bundle =
        ReportData::from_json(&content).with_context(|| format!("parsing data file {}", data.display()))?;

    let counts = DashboardCounts::tally(&bundle.inspections, &bundle.issues);
    output::print_one(json, counts, |c| {
        format!(
            "completed walkthroughs: {}\nactive issues: {}\nresolved issues: {}",
            c.completed_walkthroughs, c.active_issues, c.resolved_issues
        )
    })
}
