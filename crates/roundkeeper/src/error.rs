//! Unified error type for Roundkeeper.

use roundkeeper_engine::EngineError;
use roundkeeper_table::TableError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant generates the `From` impls, so
/// `?` converts layer errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum RoundkeeperError {
    /// The session rejected an operation (unknown figure, missing edition).
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// A table could not be reached or was busy.
    #[error(transparent)]
    Table(#[from] TableError),

    /// Content definitions failed to parse.
    #[error("invalid content: {0}")]
    Content(#[from] serde_json::Error),
}
