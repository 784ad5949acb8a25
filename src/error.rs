//! Pipeline error types
//!
//! Every error here is fatal at the pipeline-run granularity: a run either
//! completes and writes its output files, or aborts and writes nothing for
//! the failing year.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScheduleError {
    /// Invalid grid parameters (non-positive max dependents, unsupported year)
    #[error("invalid grid parameters: {0}")]
    Generation(String),

    /// The external calculator did not process the full submitted batch
    #[error("calculator returned {received} rows for {submitted} submitted")]
    AdapterMismatch { submitted: usize, received: usize },

    /// The external calculator did not respond before the deadline
    #[error("calculator did not respond within {0:?}")]
    AdapterTimeout(std::time::Duration),

    /// Duplicate (year, earnings, dependent_count) key makes the pivot ambiguous
    #[error("duplicate schedule key: year {year}, earnings {earnings}, {dependent_count} qualifying children")]
    ReshapeConflict {
        year: u16,
        earnings: u32,
        dependent_count: u8,
    },

    #[error("calculator output malformed: {0}")]
    AdapterOutput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
