//! Errors raised by dataset loading and caching.

use mrio_core::tables::TableBuildError;
use mrio_core::types::DataIntegrityError;
use thiserror::Error;

/// Errors from dataset sources and the matrix store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// No dataset directory exists for the requested period.
    #[error("no dataset found for period {period}")]
    PeriodNotFound {
        /// The requested period (year).
        period: i32,
    },

    /// Filesystem failure while reading a dataset.
    #[error("dataset i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A CSV table could not be parsed.
    #[error("csv parse error: {0}")]
    Csv(#[from] csv::Error),

    /// A JSON catalog could not be parsed.
    #[error("json parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A loaded table has inconsistent shape or content.
    #[error(transparent)]
    Integrity(#[from] DataIntegrityError),

    /// Table assembly failed (shape or singular inverse).
    #[error(transparent)]
    Table(#[from] TableBuildError),
}
