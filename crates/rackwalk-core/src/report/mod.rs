//! Read-side records: inspections, issues, reports, dashboard counts.
//!
//! These types mirror the dashboard wire format: camel-case field names and
//! kebab-case status values. The engine never produces them; they arrive from
//! exported data files and feed the summary views.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a tracked issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueStatus {
    /// Reported and not yet picked up.
    Open,
    /// Being worked.
    InProgress,
    /// Fixed and verified.
    Resolved,
}

impl IssueStatus {
    /// Returns the wire name of this status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in-progress",
            Self::Resolved => "resolved",
        }
    }

    /// Returns `true` for issues still needing attention.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Open | Self::InProgress)
    }
}

/// Severity ladder for issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Returns the wire name of this severity.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

/// Status of a recorded inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InspectionStatus {
    /// Walkthrough started but not submitted.
    InProgress,
    /// Walkthrough submitted.
    Completed,
}

impl InspectionStatus {
    /// Returns the wire name of this status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
        }
    }
}

/// A tracked issue raised by a walkthrough.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    /// Stable issue id.
    pub id: String,

    /// What was found.
    pub description: String,

    /// Current lifecycle status.
    pub status: IssueStatus,

    /// How bad it is.
    pub severity: Severity,

    /// Where it was found.
    pub location: String,

    /// ISO date the issue was raised.
    pub created_at: String,

    /// ISO date of the last status change.
    pub updated_at: String,

    /// Operator the issue is assigned to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
}

/// A recorded inspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inspection {
    /// Stable inspection id.
    pub id: String,

    /// Current status.
    pub status: InspectionStatus,

    /// Facility or area inspected.
    pub location: String,

    /// ISO date of the inspection.
    pub date: String,

    /// Number of issues the inspection raised.
    pub issue_count: u32,

    /// Name of the operator who completed it, once completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_by: Option<String>,
}

/// A published walkthrough report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Stable report id.
    pub id: String,

    /// Report title.
    pub title: String,

    /// Facility or area covered.
    pub location: String,

    /// ISO date of publication.
    pub date: String,

    /// Cover image URL, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,

    /// Issues the report covers.
    #[serde(default)]
    pub issues: Vec<Issue>,

    /// Prose summary, if written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// Follow-up recommendations, if written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<String>,
}

impl Report {
    /// Returns `true` when any covered issue is critical.
    #[must_use]
    pub fn has_critical_issues(&self) -> bool {
        self.issues.iter().any(|i| i.severity == Severity::Critical)
    }
}

/// Dashboard tallies over inspections and issues.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardCounts {
    /// Inspections with status completed.
    pub completed_walkthroughs: usize,

    /// Issues that are open or in progress.
    pub active_issues: usize,

    /// Issues that are resolved.
    pub resolved_issues: usize,
}

impl DashboardCounts {
    /// Tallies with the same filters the dashboard applies.
    #[must_use]
    pub fn tally(inspections: &[Inspection], issues: &[Issue]) -> Self {
        Self {
            completed_walkthroughs: inspections
                .iter()
                .filter(|i| i.status == InspectionStatus::Completed)
                .count(),
            active_issues: issues.iter().filter(|i| i.status.is_active()).count(),
            resolved_issues: issues
                .iter()
                .filter(|i| i.status == IssueStatus::Resolved)
                .count(),
        }
    }
}

/// Data bundle the report commands load from JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportData {
    /// Recorded inspections.
    #[serde(default)]
    pub inspections: Vec<Inspection>,

    /// Tracked issues.
    #[serde(default)]
    pub issues: Vec<Issue>,

    /// Published reports.
    #[serde(default)]
    pub reports: Vec<Report>,
}

impl ReportData {
    /// Parses a JSON data bundle. Absent arrays default to empty.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
