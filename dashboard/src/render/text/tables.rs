use crate::render::{float2, format_timestamp};
use crate::model::{EventLogEntry, QueryHistoryRow, SummaryRow};
use reliability_run_model::RunRecord;
use tabled::Tabled;

#[derive(Tabled)]
pub struct SummaryTableRow {
    #[tabled(rename = "Pipeline")]
    pub pipeline: String,
    #[tabled(rename = "Status")]
    pub status: String,
    #[tabled(rename = "Start")]
    pub start: String,
    #[tabled(rename = "SLA")]
    pub sla: String,
    #[tabled(rename = "Avg Duration (s)", display = "float2")]
    pub avg_duration_s: f64,
    #[tabled(rename = "Owner")]
    pub owner: String,
    #[tabled(rename = "Type")]
    pub pipeline_type: String,
    #[tabled(rename = "Connection")]
    pub connection: String,
}

impl From<&SummaryRow> for SummaryTableRow {
    fn from(row: &SummaryRow) -> Self {
        Self {
            pipeline: row.pipeline.clone(),
            status: row.status.to_string(),
            start: format_timestamp(row.started_at),
            sla: row.sla.to_string(),
            avg_duration_s: row.avg_duration_s,
            owner: row.owner.clone(),
            pipeline_type: row.pipeline_type.clone(),
            connection: row.connection.clone(),
        }
    }
}

#[derive(Tabled)]
pub struct MetadataTableRow {
    #[tabled(rename = "Field")]
    pub field: &'static str,
    #[tabled(rename = "Value")]
    pub value: String,
}

#[derive(Tabled)]
pub struct RunTableRow {
    #[tabled(rename = "Start")]
    pub start: String,
    #[tabled(rename = "End")]
    pub end: String,
    #[tabled(rename = "Duration (s)")]
    pub duration_s: i64,
    #[tabled(rename = "Status")]
    pub status: String,
    #[tabled(rename = "SLA")]
    pub sla: String,
}

impl From<&RunRecord> for RunTableRow {
    fn from(run: &RunRecord) -> Self {
        Self {
            start: format_timestamp(run.started_at),
            end: format_timestamp(run.ended_at),
            duration_s: run.duration_s,
            status: run.status.to_string(),
            sla: run.sla.to_string(),
        }
    }
}

#[derive(Tabled)]
pub struct EventTableRow {
    #[tabled(rename = "Time")]
    pub time: String,
    #[tabled(rename = "Level")]
    pub level: &'static str,
    #[tabled(rename = "Message")]
    pub message: String,
}

impl From<&EventLogEntry> for EventTableRow {
    fn from(event: &EventLogEntry) -> Self {
        Self {
            time: format_timestamp(event.time),
            level: event.level.as_str(),
            message: event.message.clone(),
        }
    }
}

#[derive(Tabled)]
pub struct QueryTableRow {
    #[tabled(rename = "Query")]
    pub query: String,
    #[tabled(rename = "Execution Time (ms)")]
    pub execution_time_ms: u32,
    #[tabled(rename = "Status")]
    pub status: &'static str,
}

impl From<&QueryHistoryRow> for QueryTableRow {
    fn from(row: &QueryHistoryRow) -> Self {
        Self {
            query: row.query.clone(),
            execution_time_ms: row.execution_time_ms,
            status: row.status.as_str(),
        }
    }
}
