//! Error types for the table layer.

use roundkeeper_engine::EngineError;
use roundkeeper_model::TableId;

/// Errors that can occur during table operations.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// The table does not exist.
    #[error("table {0} not found")]
    NotFound(TableId),

    /// A phase transition is still settling; the trigger was dropped.
    #[error("table {0} is busy")]
    Busy(TableId),

    /// The table's command channel is closed.
    #[error("table {0} is unavailable")]
    Unavailable(TableId),

    /// The session rejected the command.
    #[error(transparent)]
    Engine(#[from] EngineError),
}
