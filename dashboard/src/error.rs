use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Unknown pipeline: {name}")]
    UnknownPipeline { name: String },
    #[error("Unknown summary column: {name}")]
    UnknownColumn { name: String },
    #[error("Missing value in column `{column}` at row {row}")]
    MissingValue { column: &'static str, row: usize },
}
