use crate::error::DashboardError;
use polars::prelude::*;
use reliability_run_model::RunRecord;

pub(crate) const COL_PIPELINE: &str = "pipeline";
pub(crate) const COL_STARTED_AT: &str = "started_at";
pub(crate) const COL_ENDED_AT: &str = "ended_at";
pub(crate) const COL_DURATION: &str = "duration_s";
pub(crate) const COL_STATUS: &str = "status";
pub(crate) const COL_SLA: &str = "sla";
pub(crate) const COL_ERROR: &str = "error";
pub(crate) const COL_AVG_DURATION: &str = "avg_duration_s";

/// Load run records into a [DataFrame] with one row per run.
pub fn history_frame(records: &[RunRecord]) -> anyhow::Result<DataFrame> {
    let frame = df![
        COL_PIPELINE => records.iter().map(|r| r.pipeline.as_str()).collect::<Vec<_>>(),
        COL_STARTED_AT => records.iter().map(|r| r.started_at).collect::<Vec<_>>(),
        COL_ENDED_AT => records.iter().map(|r| r.ended_at).collect::<Vec<_>>(),
        COL_DURATION => records.iter().map(|r| r.duration_s).collect::<Vec<_>>(),
        COL_STATUS => records.iter().map(|r| r.status.as_str()).collect::<Vec<_>>(),
        COL_SLA => records.iter().map(|r| r.sla.as_str()).collect::<Vec<_>>(),
        COL_ERROR => records.iter().map(|r| r.error.as_deref()).collect::<Vec<Option<&str>>>(),
    ]?;

    Ok(frame)
}

/// Read run records back out of a frame produced by [history_frame], or any filtered or sorted
/// selection of one.
pub(crate) fn records_from_frame(frame: &DataFrame) -> anyhow::Result<Vec<RunRecord>> {
    let pipeline = frame.column(COL_PIPELINE)?.str()?;
    let started_at = frame.column(COL_STARTED_AT)?.i64()?;
    let duration = frame.column(COL_DURATION)?.i64()?;
    let status = frame.column(COL_STATUS)?.str()?;
    let error = frame.column(COL_ERROR)?.str()?;

    let mut records = Vec::with_capacity(frame.height());
    for row in 0..frame.height() {
        let pipeline = pipeline.get(row).ok_or(DashboardError::MissingValue {
            column: COL_PIPELINE,
            row,
        })?;
        let started_at = started_at.get(row).ok_or(DashboardError::MissingValue {
            column: COL_STARTED_AT,
            row,
        })?;
        let duration_s = duration.get(row).ok_or(DashboardError::MissingValue {
            column: COL_DURATION,
            row,
        })?;
        let status = status
            .get(row)
            .ok_or(DashboardError::MissingValue {
                column: COL_STATUS,
                row,
            })?
            .parse()?;

        records.push(RunRecord::new(
            pipeline.to_string(),
            started_at,
            duration_s,
            status,
            error.get(row).map(str::to_string),
        ));
    }

    Ok(records)
}
