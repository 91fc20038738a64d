use crate::datasource::DataSourceError;
use thiserror::Error;

/// Failures that abort a whole report. Per-position problems never surface here;
/// they end up in the report's skipped list.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Transport error: {0}")]
    Transport(#[from] DataSourceError),
    #[error("{endpoint} returned status {code}: {message}")]
    ApiStatus {
        endpoint: &'static str,
        code: i64,
        message: String,
    },
    #[error("{endpoint} returned success without data")]
    MissingPayload { endpoint: &'static str },
    #[error("No curve quote service configured")]
    MissingCurve,
}
