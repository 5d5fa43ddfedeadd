use crate::error::DashboardError;
use crate::frame::{records_from_frame, COL_PIPELINE, COL_STARTED_AT};
use crate::model::{
    DetailPanels, EventLogEntry, PipelineMetadata, QueryHistoryRow, QueryStatus, SummaryRow,
};
use crate::summary::pick_owner;
use anyhow::Context;
use polars::prelude::*;
use rand::Rng;
use reliability_run_model::{
    connection_name, is_known_pipeline, pipeline_id, staging_table, RunRecord, PIPELINE_TAGS,
    PIPELINE_TYPE, RUNS_PER_PIPELINE,
};

/// Number of sample queries shown in the query history panel
const QUERY_HISTORY_ROWS: usize = 3;

/// Probability that a sample query completed
const QUERY_COMPLETED_PROBABILITY: f64 = 0.8;

/// The most recent `limit` runs of a pipeline, newest first.
pub fn recent_runs(
    history: &DataFrame,
    pipeline: &str,
    limit: usize,
) -> anyhow::Result<Vec<RunRecord>> {
    let frame = history
        .clone()
        .lazy()
        .filter(col(COL_PIPELINE).eq(lit(pipeline)))
        .sort(
            [COL_STARTED_AT],
            SortMultipleOptions::default()
                .with_order_descending(true)
                .with_maintain_order(true),
        )
        .limit(limit as IdxSize)
        .collect()?;

    records_from_frame(&frame)
}

/// Build the panels shown for the selected pipeline.
///
/// The owner in the metadata panel is the one assigned in `summary`. Only if the pipeline has
/// no summary row is one drawn from `rng`, which also drives the query history.
pub fn render_detail<R: Rng + ?Sized>(
    pipeline: &str,
    history: &DataFrame,
    summary: &[SummaryRow],
    rng: &mut R,
) -> anyhow::Result<DetailPanels> {
    if !is_known_pipeline(pipeline) {
        return Err(DashboardError::UnknownPipeline {
            name: pipeline.to_string(),
        }
        .into());
    }

    let runs = recent_runs(history, pipeline, RUNS_PER_PIPELINE)
        .with_context(|| format!("Recent runs for {pipeline}"))?;
    log::debug!("Selected {} runs for {pipeline}", runs.len());

    let owner = summary
        .iter()
        .find(|row| row.pipeline == pipeline)
        .map(|row| row.owner.clone())
        .unwrap_or_else(|| pick_owner(rng).to_string());

    let metadata = PipelineMetadata {
        pipeline_id: pipeline_id(pipeline).to_string(),
        pipeline_type: PIPELINE_TYPE.to_string(),
        connection: connection_name(pipeline),
        owner,
        tags: PIPELINE_TAGS.iter().map(|tag| tag.to_string()).collect(),
    };

    let event_log = runs.iter().map(EventLogEntry::from).collect();

    Ok(DetailPanels {
        pipeline: pipeline.to_string(),
        metadata,
        runs,
        event_log,
        query_history: query_history(pipeline, rng),
    })
}

/// Illustrative queries against the pipeline's staging table.
fn query_history<R: Rng + ?Sized>(pipeline: &str, rng: &mut R) -> Vec<QueryHistoryRow> {
    let query = format!("SELECT * FROM {} LIMIT 10", staging_table(pipeline));

    (0..QUERY_HISTORY_ROWS)
        .map(|_| QueryHistoryRow {
            query: query.clone(),
            execution_time_ms: rng.gen_range(50..500),
            status: if rng.gen_bool(QUERY_COMPLETED_PROBABILITY) {
                QueryStatus::Completed
            } else {
                QueryStatus::Failed
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::history_frame;
    use crate::generate::generate_history;
    use crate::model::EventLevel;
    use crate::summary::build_summary;
    use chrono::{TimeZone, Utc};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use reliability_run_model::{RunStatus, PIPELINES};

    fn history() -> DataFrame {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        history_frame(&generate_history(&PIPELINES, 42, now)).unwrap()
    }

    #[test]
    fn recent_runs_newest_first() -> anyhow::Result<()> {
        let runs = recent_runs(&history(), "Orders_ETL", 10)?;
        assert_eq!(10, runs.len());
        assert!(runs.iter().all(|r| r.pipeline == "Orders_ETL"));
        assert!(runs.windows(2).all(|w| w[0].started_at >= w[1].started_at));
        Ok(())
    }

    #[test]
    fn recent_runs_respects_limit() -> anyhow::Result<()> {
        let all = recent_runs(&history(), "IoT_Load", 10)?;
        let top = recent_runs(&history(), "IoT_Load", 3)?;
        assert_eq!(3, top.len());
        assert_eq!(&all[..3], &top[..]);
        Ok(())
    }

    #[test]
    fn detail_panels_for_selected_pipeline() -> anyhow::Result<()> {
        let history = history();
        let summary = build_summary(&history, &mut StdRng::seed_from_u64(1))?;
        let detail = render_detail("Orders_ETL", &history, &summary, &mut StdRng::seed_from_u64(2))?;

        assert_eq!("Orders_ETL", detail.pipeline);
        assert_eq!(10, detail.runs.len());

        let summary_owner = &summary
            .iter()
            .find(|row| row.pipeline == "Orders_ETL")
            .unwrap()
            .owner;
        assert_eq!(summary_owner, &detail.metadata.owner);
        assert_eq!("orders_connection", detail.metadata.connection);
        assert_eq!(PIPELINE_TYPE, detail.metadata.pipeline_type);
        assert_eq!(vec!["prod", "daily"], detail.metadata.tags);
        assert_eq!(pipeline_id("Orders_ETL").to_string(), detail.metadata.pipeline_id);

        Ok(())
    }

    #[test]
    fn event_log_mirrors_runs() -> anyhow::Result<()> {
        let history = history();
        let detail = render_detail("Claims_Enrichment", &history, &[], &mut StdRng::seed_from_u64(2))?;

        assert_eq!(detail.runs.len(), detail.event_log.len());
        for (run, entry) in detail.runs.iter().zip(&detail.event_log) {
            assert_eq!(run.started_at, entry.time);
            match run.status {
                RunStatus::Failed => {
                    assert_eq!(EventLevel::Error, entry.level);
                    assert_eq!(run.error.as_deref(), Some(entry.message.as_str()));
                }
                RunStatus::Success => {
                    assert_eq!(EventLevel::Info, entry.level);
                    assert_eq!("Pipeline step completed", entry.message);
                }
            }
        }
        Ok(())
    }

    #[test]
    fn query_history_shape() -> anyhow::Result<()> {
        let detail = render_detail("IoT_Load", &history(), &[], &mut StdRng::seed_from_u64(3))?;
        assert_eq!(3, detail.query_history.len());
        for row in &detail.query_history {
            assert_eq!("SELECT * FROM iot_load_staging LIMIT 10", row.query);
            assert!((50..500).contains(&row.execution_time_ms));
        }
        Ok(())
    }

    #[test]
    fn unknown_pipeline_is_rejected() {
        let err = render_detail("Nope", &history(), &[], &mut StdRng::seed_from_u64(3)).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DashboardError>(),
            Some(DashboardError::UnknownPipeline { name }) if name == "Nope"
        ));
    }
}
