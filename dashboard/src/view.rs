use crate::detail::render_detail;
use crate::error::DashboardError;
use crate::frame::history_frame;
use crate::generate::generate_history;
use crate::model::{DashboardView, SummarySort};
use crate::rerun::re_run;
use crate::rng::{rerun_rng, view_rng};
use crate::summary::{build_summary, sort_summary};
use anyhow::Context;
use chrono::{DateTime, Utc};
use reliability_run_model::{is_known_pipeline, PIPELINES};

pub const DASHBOARD_TITLE: &str = "Pipeline Reliability Dashboard";
pub const DASHBOARD_CAPTION: &str = "Code Force 360";

pub const DEFAULT_SEED: u64 = 42;

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Seed for every random draw made while rendering
    pub seed: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self { seed: DEFAULT_SEED }
    }
}

/// The user's input for one render
#[derive(Debug, Clone, Default)]
pub struct Selection {
    /// Defaults to the first pipeline
    pub pipeline: Option<String>,
    pub sort: SummarySort,
    /// Set when the re-run button was pressed. Each click should use a fresh nonce.
    pub rerun_nonce: Option<u64>,
}

/// Render the whole dashboard from scratch.
///
/// This is called for every interaction. The history, summary and panels are all recomputed
/// from the configured seed and `now`; nothing is carried over from a previous render.
pub fn render(
    config: &DashboardConfig,
    selection: &Selection,
    now: DateTime<Utc>,
) -> anyhow::Result<DashboardView> {
    let pipeline = selection.pipeline.as_deref().unwrap_or(PIPELINES[0]);
    if !is_known_pipeline(pipeline) {
        return Err(DashboardError::UnknownPipeline {
            name: pipeline.to_string(),
        }
        .into());
    }

    let records = generate_history(&PIPELINES, config.seed, now);
    let history = history_frame(&records).context("History frame")?;

    let mut summary = build_summary(&history, &mut view_rng(config.seed, "summary"))
        .context("Pipeline summary")?;

    let detail = render_detail(
        pipeline,
        &history,
        &summary,
        &mut view_rng(config.seed, pipeline),
    )
    .context("Pipeline detail")?;

    sort_summary(&mut summary, selection.sort);

    let rerun = selection
        .rerun_nonce
        .map(|nonce| re_run(pipeline, &mut rerun_rng(config.seed, pipeline, nonce)));

    Ok(DashboardView {
        title: DASHBOARD_TITLE.to_string(),
        caption: DASHBOARD_CAPTION.to_string(),
        pipelines: PIPELINES.iter().map(|p| p.to_string()).collect(),
        selected: pipeline.to_string(),
        sort: selection.sort,
        summary,
        detail,
        rerun,
    })
}
