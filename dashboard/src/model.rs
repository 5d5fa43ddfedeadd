use crate::error::DashboardError;
use reliability_run_model::{RunRecord, RunStatus, SlaResult};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

/// One aggregated row per pipeline in the overview table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SummaryRow {
    pub pipeline: String,
    /// Status of the latest run
    pub status: RunStatus,
    /// Start of the latest run, as a Unix timestamp in seconds
    pub started_at: i64,
    /// SLA result of the latest run
    pub sla: SlaResult,
    /// Mean duration across all of the pipeline's runs, in seconds
    pub avg_duration_s: f64,
    pub owner: String,
    pub pipeline_type: String,
    pub connection: String,
}

/// The columns of the overview table, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SummaryColumn {
    Pipeline,
    Status,
    Start,
    Sla,
    AvgDuration,
    Owner,
    Type,
    Connection,
}

impl SummaryColumn {
    pub const ALL: [SummaryColumn; 8] = [
        SummaryColumn::Pipeline,
        SummaryColumn::Status,
        SummaryColumn::Start,
        SummaryColumn::Sla,
        SummaryColumn::AvgDuration,
        SummaryColumn::Owner,
        SummaryColumn::Type,
        SummaryColumn::Connection,
    ];

    /// Header text
    pub fn label(&self) -> &'static str {
        match self {
            SummaryColumn::Pipeline => "Pipeline",
            SummaryColumn::Status => "Status",
            SummaryColumn::Start => "Start",
            SummaryColumn::Sla => "SLA",
            SummaryColumn::AvgDuration => "Avg Duration (s)",
            SummaryColumn::Owner => "Owner",
            SummaryColumn::Type => "Type",
            SummaryColumn::Connection => "Connection",
        }
    }

    /// Name used for the column in query strings
    pub fn key(&self) -> &'static str {
        match self {
            SummaryColumn::Pipeline => "pipeline",
            SummaryColumn::Status => "status",
            SummaryColumn::Start => "start",
            SummaryColumn::Sla => "sla",
            SummaryColumn::AvgDuration => "avg_duration",
            SummaryColumn::Owner => "owner",
            SummaryColumn::Type => "type",
            SummaryColumn::Connection => "connection",
        }
    }

    /// Compare two rows by this column, ascending
    pub fn compare(&self, a: &SummaryRow, b: &SummaryRow) -> Ordering {
        match self {
            SummaryColumn::Pipeline => a.pipeline.cmp(&b.pipeline),
            SummaryColumn::Status => a.status.as_str().cmp(b.status.as_str()),
            SummaryColumn::Start => a.started_at.cmp(&b.started_at),
            SummaryColumn::Sla => a.sla.as_str().cmp(b.sla.as_str()),
            SummaryColumn::AvgDuration => a.avg_duration_s.total_cmp(&b.avg_duration_s),
            SummaryColumn::Owner => a.owner.cmp(&b.owner),
            SummaryColumn::Type => a.pipeline_type.cmp(&b.pipeline_type),
            SummaryColumn::Connection => a.connection.cmp(&b.connection),
        }
    }
}

impl FromStr for SummaryColumn {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SummaryColumn::ALL
            .into_iter()
            .find(|column| column.key() == s)
            .ok_or_else(|| DashboardError::UnknownColumn {
                name: s.to_string(),
            })
    }
}

/// How the overview table is ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummarySort {
    pub column: SummaryColumn,
    pub descending: bool,
}

impl Default for SummarySort {
    fn default() -> Self {
        Self {
            column: SummaryColumn::Pipeline,
            descending: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PipelineMetadata {
    pub pipeline_id: String,
    pub pipeline_type: String,
    pub connection: String,
    pub owner: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventLevel {
    Info,
    Error,
}

impl EventLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventLevel::Info => "Info",
            EventLevel::Error => "Error",
        }
    }
}

/// Message logged for runs that did not fail
pub const STEP_COMPLETED_MESSAGE: &str = "Pipeline step completed";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventLogEntry {
    /// Unix timestamp in seconds
    pub time: i64,
    pub level: EventLevel,
    pub message: String,
}

impl From<&RunRecord> for EventLogEntry {
    fn from(run: &RunRecord) -> Self {
        Self {
            time: run.started_at,
            level: match run.status {
                RunStatus::Failed => EventLevel::Error,
                RunStatus::Success => EventLevel::Info,
            },
            message: run
                .error
                .clone()
                .unwrap_or_else(|| STEP_COMPLETED_MESSAGE.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryStatus {
    Completed,
    Failed,
}

impl QueryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryStatus::Completed => "Completed",
            QueryStatus::Failed => "Failed",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryHistoryRow {
    pub query: String,
    pub execution_time_ms: u32,
    pub status: QueryStatus,
}

/// Everything shown below the pipeline selector
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DetailPanels {
    pub pipeline: String,
    pub metadata: PipelineMetadata,
    /// Most recent runs first
    pub runs: Vec<RunRecord>,
    pub event_log: Vec<EventLogEntry>,
    pub query_history: Vec<QueryHistoryRow>,
}

/// Acknowledgment shown after the re-run button is pressed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReRunOutcome {
    Succeeded { message: String },
    Failed { message: String },
}

impl ReRunOutcome {
    pub fn message(&self) -> &str {
        match self {
            ReRunOutcome::Succeeded { message } | ReRunOutcome::Failed { message } => message,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ReRunOutcome::Succeeded { .. })
    }
}

/// A fully rendered dashboard, ready to be presented
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardView {
    pub title: String,
    pub caption: String,
    /// The selectable pipelines, in dropdown order
    pub pipelines: Vec<String>,
    pub selected: String,
    pub sort: SummarySort,
    pub summary: Vec<SummaryRow>,
    pub detail: DetailPanels,
    pub rerun: Option<ReRunOutcome>,
}
