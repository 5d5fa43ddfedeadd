use crate::error::DashboardError;
use crate::frame::{
    COL_AVG_DURATION, COL_DURATION, COL_PIPELINE, COL_SLA, COL_STARTED_AT, COL_STATUS,
};
use crate::model::{SummaryRow, SummarySort};
use anyhow::Context;
use polars::prelude::*;
use rand::Rng;
use reliability_run_model::{connection_name, OWNERS, PIPELINE_TYPE};

/// Aggregate the run history into one [SummaryRow] per pipeline.
///
/// The latest run of each pipeline (the one with the greatest start time, or the last of those
/// in history order if several share it) supplies the status, start and SLA columns. The average
/// duration is taken over all of the pipeline's runs. Owners are drawn from `rng`.
///
/// Rows are sorted by pipeline name, ascending.
pub fn build_summary<R: Rng + ?Sized>(
    history: &DataFrame,
    rng: &mut R,
) -> anyhow::Result<Vec<SummaryRow>> {
    let frame = summary_frame(history).context("Summary frame")?;

    let pipeline = frame.column(COL_PIPELINE)?.str()?;
    let status = frame.column(COL_STATUS)?.str()?;
    let started_at = frame.column(COL_STARTED_AT)?.i64()?;
    let sla = frame.column(COL_SLA)?.str()?;
    let avg_duration = frame.column(COL_AVG_DURATION)?.f64()?;

    let mut rows = Vec::with_capacity(frame.height());
    for row in 0..frame.height() {
        let pipeline = pipeline.get(row).ok_or(DashboardError::MissingValue {
            column: COL_PIPELINE,
            row,
        })?;

        rows.push(SummaryRow {
            pipeline: pipeline.to_string(),
            status: status
                .get(row)
                .ok_or(DashboardError::MissingValue {
                    column: COL_STATUS,
                    row,
                })?
                .parse()?,
            started_at: started_at.get(row).ok_or(DashboardError::MissingValue {
                column: COL_STARTED_AT,
                row,
            })?,
            sla: sla
                .get(row)
                .ok_or(DashboardError::MissingValue { column: COL_SLA, row })?
                .parse()?,
            avg_duration_s: avg_duration.get(row).ok_or(DashboardError::MissingValue {
                column: COL_AVG_DURATION,
                row,
            })?,
            owner: pick_owner(rng).to_string(),
            pipeline_type: PIPELINE_TYPE.to_string(),
            connection: connection_name(pipeline),
        });
    }

    log::debug!("Built summary with {} rows", rows.len());

    Ok(rows)
}

/// Latest run columns joined with the mean duration, one row per pipeline.
fn summary_frame(history: &DataFrame) -> anyhow::Result<DataFrame> {
    let latest = history
        .clone()
        .lazy()
        .sort(
            [COL_STARTED_AT],
            SortMultipleOptions::default().with_maintain_order(true),
        )
        .group_by_stable([col(COL_PIPELINE)])
        .agg([
            col(COL_STATUS).last(),
            col(COL_STARTED_AT).last(),
            col(COL_SLA).last(),
        ]);

    let mean_duration = history
        .clone()
        .lazy()
        .group_by_stable([col(COL_PIPELINE)])
        .agg([col(COL_DURATION)
            .cast(DataType::Float64)
            .mean()
            .alias(COL_AVG_DURATION)]);

    let frame = latest
        .left_join(mean_duration, col(COL_PIPELINE), col(COL_PIPELINE))
        .sort([COL_PIPELINE], SortMultipleOptions::default())
        .collect()?;

    Ok(frame)
}

/// Reorder summary rows for display.
///
/// The sort is stable, so rows that compare equal keep their current relative order.
pub fn sort_summary(rows: &mut [SummaryRow], sort: SummarySort) {
    rows.sort_by(|a, b| {
        let ordering = sort.column.compare(a, b);
        if sort.descending {
            ordering.reverse()
        } else {
            ordering
        }
    });
}

pub(crate) fn pick_owner<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    OWNERS[rng.gen_range(0..OWNERS.len())]
}
