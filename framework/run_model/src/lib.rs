use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha3::Digest;
use std::fmt::{Display, Formatter};
use std::io::{BufRead, Read, Write};
use std::str::FromStr;

/// The pipelines shown on the dashboard, in dropdown order.
pub const PIPELINES: [&str; 7] = [
    "Orders_ETL",
    "Customer_DQ",
    "Sales_Transform",
    "Inventory_Pipeline",
    "Claims_Enrichment",
    "IoT_Load",
    "Employee_HR",
];

/// Owners that runs can be attributed to.
pub const OWNERS: [&str; 4] = ["deepika", "raj", "mike", "jeff"];

/// Reasons a failed run can report.
pub const ERROR_REASONS: [&str; 4] = [
    "Network Timeout",
    "Source API Error",
    "Transformation Failure",
    "Warehouse Credit Limit Reached",
];

pub const PIPELINE_TYPE: &str = "Ingestion Pipeline";

pub const PIPELINE_TAGS: [&str; 2] = ["prod", "daily"];

/// Number of runs generated for each pipeline
pub const RUNS_PER_PIPELINE: usize = 10;

/// Runs at or above this duration violate the SLA, even when they succeed.
pub const SLA_DURATION_LIMIT_S: i64 = 300;

/// Pipeline IDs are reduced into this range.
const PIPELINE_ID_MODULUS: u64 = 100_000;

/// Outcome of a single run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RunStatus {
    Success,
    Failed,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Success => "Success",
            RunStatus::Failed => "Failed",
        }
    }
}

impl Display for RunStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RunStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Success" => Ok(RunStatus::Success),
            "Failed" => Ok(RunStatus::Failed),
            _ => Err(anyhow::anyhow!("Unknown run status: {s}")),
        }
    }
}

/// Whether a run met its service level agreement
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SlaResult {
    Met,
    Violated,
}

impl SlaResult {
    /// The SLA is met only by a successful run that finished in under [SLA_DURATION_LIMIT_S].
    pub fn evaluate(status: RunStatus, duration_s: i64) -> Self {
        if status == RunStatus::Success && duration_s < SLA_DURATION_LIMIT_S {
            SlaResult::Met
        } else {
            SlaResult::Violated
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SlaResult::Met => "Met",
            SlaResult::Violated => "Violated",
        }
    }
}

impl Display for SlaResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SlaResult {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Met" => Ok(SlaResult::Met),
            "Violated" => Ok(SlaResult::Violated),
            _ => Err(anyhow::anyhow!("Unknown SLA result: {s}")),
        }
    }
}

/// A single (simulated) execution of a pipeline
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunRecord {
    /// The name of the pipeline that was run
    pub pipeline: String,
    /// The time the run started
    ///
    /// This is a Unix timestamp in seconds.
    pub started_at: i64,
    /// The time the run ended
    ///
    /// Always `started_at + duration_s`.
    pub ended_at: i64,
    /// How long the run took, in seconds
    pub duration_s: i64,
    pub status: RunStatus,
    pub sla: SlaResult,
    /// The reason the run failed
    ///
    /// Only set when [RunRecord::status] is [RunStatus::Failed].
    pub error: Option<String>,
}

impl RunRecord {
    /// Create a new run record
    ///
    /// The end time and SLA result are derived from the other fields. An error reason is only
    /// kept for failed runs.
    pub fn new(
        pipeline: String,
        started_at: i64,
        duration_s: i64,
        status: RunStatus,
        error: Option<String>,
    ) -> Self {
        Self {
            pipeline,
            started_at,
            ended_at: started_at + duration_s,
            duration_s,
            status,
            sla: SlaResult::evaluate(status, duration_s),
            error: match status {
                RunStatus::Success => None,
                RunStatus::Failed => error,
            },
        }
    }

    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.started_at, 0)
    }

    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.ended_at, 0)
    }
}

/// Check whether the name is one of the [PIPELINES]
pub fn is_known_pipeline(name: &str) -> bool {
    PIPELINES.contains(&name)
}

/// The connection a pipeline reads from
///
/// Derived from the first `_` separated segment of the pipeline name, lowercased. For example
/// `Orders_ETL` uses `orders_connection`.
pub fn connection_name(pipeline: &str) -> String {
    let prefix = pipeline.split('_').next().unwrap_or(pipeline);
    format!("{}_connection", prefix.to_lowercase())
}

/// The staging table a pipeline's tasks query
pub fn staging_table(pipeline: &str) -> String {
    format!("{}_staging", pipeline.to_lowercase())
}

/// Compute the display ID of a pipeline
///
/// The ID is taken from the first 8 bytes of the [sha3::Sha3_256] digest of the name, so it is
/// the same across processes and platforms.
pub fn pipeline_id(pipeline: &str) -> u64 {
    let mut hasher = sha3::Sha3_256::new();
    Digest::update(&mut hasher, pipeline.as_bytes());
    let digest = hasher.finalize();

    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(prefix) % PIPELINE_ID_MODULUS
}

/// Write run records to a writer
///
/// Each record is serialized to JSON and output as a single line followed by a newline. The
/// recommended file extension is `.jsonl`.
pub fn store_run_records<W: Write>(records: &[RunRecord], writer: &mut W) -> anyhow::Result<()> {
    for record in records {
        serde_json::to_writer(&mut *writer, record)?;
        writer.write_all(b"\n")?;
    }
    Ok(())
}

/// Load run records from a reader
///
/// The input should contain one JSON object per line. This is the format produced by
/// [store_run_records]. Blank lines are skipped.
pub fn load_run_records<R: Read>(reader: R) -> anyhow::Result<Vec<RunRecord>> {
    let reader = std::io::BufReader::new(reader);
    let mut records = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: RunRecord = serde_json::from_str(&line)?;
        records.push(record);
    }
    Ok(records)
}
