//! CLI error type and result alias.

use thiserror::Error;

/// Errors surfaced to the command line.
#[derive(Error, Debug)]
pub enum CliError {
    /// A required file does not exist.
    #[error("file not found: {0}")]
    FileNotFound(String),

    /// An argument failed validation.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Filesystem failure.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Dataset loading failed.
    #[error(transparent)]
    Store(#[from] mrio_store::StoreError),

    /// Shock-set expansion failed.
    #[error(transparent)]
    Shock(#[from] mrio_engine::ShockError),

    /// The solve failed.
    #[error(transparent)]
    Solve(#[from] mrio_engine::SolveError),

    /// Scenario parsing failed.
    #[error(transparent)]
    Scenario(#[from] mrio_engine::ScenarioError),

    /// Portfolio validation or aggregation failed.
    #[error(transparent)]
    Portfolio(#[from] mrio_engine::PortfolioError),

    /// JSON output could not be produced.
    #[error("json output error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias used across the CLI.
pub type Result<T> = std::result::Result<T, CliError>;
