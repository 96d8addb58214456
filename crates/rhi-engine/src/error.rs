use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// No observation exists at or before the requested date.
    #[error("no observation for '{indicator_id}' at or before {date}")]
    NoData {
        indicator_id: String,
        date: NaiveDate,
    },

    /// Too few observations in a month bucket to trust its median/MAD.
    #[error(
        "insufficient baseline for '{indicator_id}' in month {month}: found {found}, need {required}"
    )]
    InsufficientBaseline {
        indicator_id: String,
        month: u32,
        found: usize,
        required: usize,
    },

    #[error("invalid calendar month {0}; must be 1-12")]
    InvalidMonth(u32),

    #[error("duplicate observation for '{indicator_id}' on {date}")]
    DuplicateObservation {
        indicator_id: String,
        date: NaiveDate,
    },

    #[error("non-finite value for '{indicator_id}' on {date}")]
    NonFiniteValue {
        indicator_id: String,
        date: NaiveDate,
    },

    #[error("failed to read observations file {path}: {source}")]
    ObservationsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse observations file: {0}")]
    ObservationsFileParse(#[from] serde_json::Error),
}
