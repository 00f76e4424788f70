//! Error types for the engine.

use roundkeeper_model::FigureId;

/// Errors returned by session operations.
///
/// Content lookups never fail this way: unknown characters, monsters, and
/// decks are replaced by placeholder definitions (see
/// [`Catalog`](crate::Catalog)). These errors are for operations that
/// cannot proceed at all and leave the session untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// The figure is not (or no longer) in the roster.
    #[error("figure {0} is not in the roster")]
    FigureNotInRoster(FigureId),

    /// No edition data is loaded for the scenario or section's edition.
    #[error("no edition data loaded for '{0}'")]
    UnknownEdition(String),
}
