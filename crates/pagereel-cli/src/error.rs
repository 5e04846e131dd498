#![forbid(unsafe_code)]

use std::path::PathBuf;
use std::time::Duration;

use pagereel_core::ReelError;
use pagereel_runtime::PageConfigError;
use pagereel_widgets::TableError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] PageConfigError),

    #[error("invalid page: {0}")]
    Page(#[from] ReelError),

    #[error("cannot load table {path}: {source}")]
    Table {
        path: PathBuf,
        #[source]
        source: TableError,
    },

    #[error("no table data: pass --data or set `data` in the page config")]
    NoTableData,

    #[error("headline timer produced no tick within {0:?}")]
    TimerStalled(Duration),

    #[error("output error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON output error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Process exit code: 2 for bad input, 1 for runtime failures.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Page(_) | Self::Table { .. } | Self::NoTableData => 2,
            Self::TimerStalled(_) | Self::Io(_) | Self::Json(_) => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_input_exits_with_two() {
        assert_eq!(CliError::NoTableData.exit_code(), 2);
        assert_eq!(CliError::Page(ReelError::EmptyRotation).exit_code(), 2);
    }

    #[test]
    fn runtime_failures_exit_with_one() {
        let err = CliError::TimerStalled(Duration::from_secs(1));
        assert_eq!(err.exit_code(), 1);
        assert_eq!(err.to_string(), "headline timer produced no tick within 1s");
    }
}
