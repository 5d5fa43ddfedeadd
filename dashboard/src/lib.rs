//! A mock pipeline reliability dashboard.
//!
//! The run history is synthesized from a seed on every render, aggregated into a per-pipeline
//! summary and presented with detail panels for one selected pipeline. See [view::render].

mod detail;
pub mod error;
mod frame;
mod generate;
pub mod model;
pub mod render;
mod rerun;
pub mod rng;
pub mod server;
mod summary;
pub mod view;

pub use detail::{recent_runs, render_detail};
pub use frame::history_frame;
pub use generate::generate_history;
pub use rerun::{re_run, RERUN_FAILURE_REASON};
pub use summary::{build_summary, sort_summary};
