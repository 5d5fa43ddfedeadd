use chrono::{DateTime, TimeZone, Utc};
use reliability_dashboard::model::{EventLevel, ReRunOutcome};
use reliability_dashboard::render::{render_page, render_text};
use reliability_dashboard::view::{render, DashboardConfig, Selection};
use reliability_dashboard::{generate_history, RERUN_FAILURE_REASON};
use reliability_run_model::{
    connection_name, load_run_records, store_run_records, RunStatus, SlaResult, PIPELINES,
};
use std::collections::HashMap;
use std::io::{Seek, SeekFrom, Write};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 15, 8, 30, 0).unwrap()
}

fn select(pipeline: &str) -> Selection {
    Selection {
        pipeline: Some(pipeline.to_string()),
        ..Default::default()
    }
}

#[test]
fn history_invariants_hold_for_default_seed() {
    let history = generate_history(&PIPELINES, 42, now());
    assert_eq!(70, history.len());

    let mut per_pipeline = HashMap::new();
    for run in &history {
        *per_pipeline.entry(run.pipeline.as_str()).or_insert(0) += 1;

        assert_eq!(run.started_at + run.duration_s, run.ended_at);
        let expected_sla = if run.status == RunStatus::Success && run.duration_s < 300 {
            SlaResult::Met
        } else {
            SlaResult::Violated
        };
        assert_eq!(expected_sla, run.sla);
        assert_eq!(run.status == RunStatus::Failed, run.error.is_some());
    }

    assert_eq!(7, per_pipeline.len());
    assert!(per_pipeline.values().all(|count| *count == 10));
}

#[test]
fn summary_matches_history() -> anyhow::Result<()> {
    let config = DashboardConfig::default();
    let view = render(&config, &Selection::default(), now())?;
    let history = generate_history(&PIPELINES, config.seed, now());

    let names: Vec<&str> = view.summary.iter().map(|r| r.pipeline.as_str()).collect();
    let mut sorted = PIPELINES.to_vec();
    sorted.sort();
    assert_eq!(sorted, names);

    for row in &view.summary {
        let runs: Vec<_> = history.iter().filter(|r| r.pipeline == row.pipeline).collect();
        let mean = runs.iter().map(|r| r.duration_s as f64).sum::<f64>() / runs.len() as f64;
        assert!((row.avg_duration_s - mean).abs() < 1e-9, "{row:?}");

        let latest = runs.iter().map(|r| r.started_at).max().unwrap();
        assert_eq!(latest, row.started_at);

        assert_eq!(connection_name(&row.pipeline), row.connection);
        assert_eq!("Ingestion Pipeline", row.pipeline_type);
    }

    Ok(())
}

#[test]
fn orders_etl_run_details() -> anyhow::Result<()> {
    let view = render(&DashboardConfig::default(), &select("Orders_ETL"), now())?;
    let detail = &view.detail;

    assert_eq!(10, detail.runs.len());
    assert!(detail.runs.iter().all(|r| r.pipeline == "Orders_ETL"));
    assert!(detail
        .runs
        .windows(2)
        .all(|w| w[0].started_at >= w[1].started_at));

    assert_eq!("orders_connection", detail.metadata.connection);
    assert_eq!(10, detail.event_log.len());
    let errors = detail
        .event_log
        .iter()
        .filter(|e| e.level == EventLevel::Error)
        .count();
    let failures = detail
        .runs
        .iter()
        .filter(|r| r.status == RunStatus::Failed)
        .count();
    assert_eq!(failures, errors);

    Ok(())
}

#[test]
fn metadata_owner_agrees_with_summary() -> anyhow::Result<()> {
    for pipeline in PIPELINES {
        let view = render(&DashboardConfig::default(), &select(pipeline), now())?;
        let row = view
            .summary
            .iter()
            .find(|row| row.pipeline == pipeline)
            .unwrap();
        assert_eq!(row.owner, view.detail.metadata.owner);
        assert_eq!(row.connection, view.detail.metadata.connection);
    }
    Ok(())
}

#[test]
fn rerun_produces_one_of_two_messages() -> anyhow::Result<()> {
    let mut seen_success = false;
    let mut seen_failure = false;
    for nonce in 0..50 {
        let selection = Selection {
            rerun_nonce: Some(nonce),
            ..select("Customer_DQ")
        };
        let view = render(&DashboardConfig::default(), &selection, now())?;
        match view.rerun.expect("re-run outcome") {
            ReRunOutcome::Succeeded { message } => {
                assert_eq!("Customer_DQ re-run executed successfully.", message);
                seen_success = true;
            }
            ReRunOutcome::Failed { message } => {
                assert!(message.contains(RERUN_FAILURE_REASON));
                seen_failure = true;
            }
        }
    }
    assert!(seen_success && seen_failure);
    Ok(())
}

#[test]
fn page_and_text_render_for_every_pipeline() -> anyhow::Result<()> {
    for pipeline in PIPELINES {
        let view = render(&DashboardConfig::default(), &select(pipeline), now())?;

        let page = render_page(&view);
        assert!(page.contains(&format!("Re-Run {pipeline}")));
        assert!(page.contains(&format!(r#"<option value="{pipeline}" selected>"#)));

        let text = render_text(&view);
        assert!(text.contains(&format!("Selected pipeline: {pipeline}")));
    }
    Ok(())
}

#[test]
fn exported_history_loads_back() -> anyhow::Result<()> {
    let history = generate_history(&PIPELINES, 42, now());

    let mut file = tempfile::tempfile()?;
    store_run_records(&history, &mut file)?;
    file.flush()?;
    file.seek(SeekFrom::Start(0))?;

    pretty_assertions::assert_eq!(history, load_run_records(file)?);
    Ok(())
}
