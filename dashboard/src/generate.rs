use crate::rng::history_rng;
use chrono::{DateTime, Utc};
use rand::Rng;
use reliability_run_model::{RunRecord, RunStatus, ERROR_REASONS, RUNS_PER_PIPELINE};

const SECONDS_PER_HOUR: i64 = 3600;

/// Probability that a generated run succeeds
const SUCCESS_PROBABILITY: f64 = 0.8;

/// Generate the run history for the given pipelines.
///
/// Produces [RUNS_PER_PIPELINE] records per pipeline, grouped by pipeline in the order given.
/// The output only depends on `seed` and `now`.
pub fn generate_history(pipelines: &[&str], seed: u64, now: DateTime<Utc>) -> Vec<RunRecord> {
    let mut rng = history_rng(seed);
    let now = now.timestamp();

    let mut records = Vec::with_capacity(pipelines.len() * RUNS_PER_PIPELINE);
    for pipeline in pipelines {
        for _ in 0..RUNS_PER_PIPELINE {
            records.push(generate_run(&mut rng, pipeline, now));
        }
    }

    log::debug!(
        "Generated {} runs for {} pipelines",
        records.len(),
        pipelines.len()
    );

    records
}

fn generate_run<R: Rng + ?Sized>(rng: &mut R, pipeline: &str, now: i64) -> RunRecord {
    let hours_ago: i64 = rng.gen_range(1..200);
    let duration_s: i64 = rng.gen_range(60..500);
    let status = if rng.gen_bool(SUCCESS_PROBABILITY) {
        RunStatus::Success
    } else {
        RunStatus::Failed
    };
    let error = match status {
        RunStatus::Success => None,
        RunStatus::Failed => {
            Some(ERROR_REASONS[rng.gen_range(0..ERROR_REASONS.len())].to_string())
        }
    };

    RunRecord::new(
        pipeline.to_string(),
        now - hours_ago * SECONDS_PER_HOUR,
        duration_s,
        status,
        error,
    )
}
