use crate::model::ReRunOutcome;
use rand::Rng;

/// Reason reported by a failed re-run
pub const RERUN_FAILURE_REASON: &str = "Mocked connection error";

/// Draws at or below this fail
const FAILURE_THRESHOLD: f64 = 0.2;

/// Pretend to re-run a pipeline.
///
/// Nothing is executed. A single draw from `rng` decides whether the acknowledgment reports
/// success or failure.
pub fn re_run<R: Rng + ?Sized>(pipeline: &str, rng: &mut R) -> ReRunOutcome {
    let draw: f64 = rng.gen();
    if draw > FAILURE_THRESHOLD {
        log::info!("Mock re-run of {pipeline} succeeded");
        ReRunOutcome::Succeeded {
            message: format!("{pipeline} re-run executed successfully."),
        }
    } else {
        log::info!("Mock re-run of {pipeline} failed");
        ReRunOutcome::Failed {
            message: format!("{pipeline} re-run failed. Reason: {RERUN_FAILURE_REASON}."),
        }
    }
}
