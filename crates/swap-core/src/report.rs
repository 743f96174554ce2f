//! Bulk exports for reporting.
//!
//! Three reports are available: the full member list, the full swap request
//! list, and an activity summary. All are pretty-printed JSON.

use crate::types::{Member, SwapRequest, SwapStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Report selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    Members,
    Swaps,
    Activity,
}

impl ReportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Members => "members",
            Self::Swaps => "swaps",
            Self::Activity => "activity",
        }
    }

    /// Suggested download file name.
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Members => "users-report.json",
            Self::Swaps => "swaps-report.json",
            Self::Activity => "activity-report.json",
        }
    }
}

impl std::str::FromStr for ReportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "members" | "users" => Ok(Self::Members),
            "swaps" | "requests" => Ok(Self::Swaps),
            "activity" => Ok(Self::Activity),
            _ => Err(format!(
                "invalid report '{s}', expected: members, swaps, activity"
            )),
        }
    }
}

/// Platform activity counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityReport {
    pub total_users: usize,
    pub total_swaps: usize,
    pub pending_swaps: usize,
    pub completed_swaps: usize,
    pub public_users: usize,
    pub generated_at: DateTime<Utc>,
}

impl ActivityReport {
    pub fn from_snapshot(
        members: &[Member],
        requests: &[SwapRequest],
        generated_at: DateTime<Utc>,
    ) -> Self {
        let count = |status: SwapStatus| requests.iter().filter(|r| r.status == status).count();
        Self {
            total_users: members.len(),
            total_swaps: requests.len(),
            pending_swaps: count(SwapStatus::Pending),
            completed_swaps: count(SwapStatus::Completed),
            public_users: members.iter().filter(|m| m.is_public).count(),
            generated_at,
        }
    }
}

/// Render a report as pretty JSON.
pub fn render_report(
    kind: ReportKind,
    members: &[Member],
    requests: &[SwapRequest],
) -> serde_json::Result<String> {
    match kind {
        ReportKind::Members => serde_json::to_string_pretty(members),
        ReportKind::Swaps => serde_json::to_string_pretty(requests),
        ReportKind::Activity => serde_json::to_string_pretty(&ActivityReport::from_snapshot(
            members,
            requests,
            Utc::now(),
        )),
    }
}

/// Write rendered report content to a file, replacing it.
pub fn write_report(path: &Path, content: &str) -> std::io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    writeln!(writer, "{content}")?;
    writer.flush()
}
