//! Turn-order and round-phase engine for Roundkeeper.
//!
//! A [`Session`] owns one game's state and exposes every mutating
//! operation as a synchronous method. The engine decides *when* things
//! happen and calls out through collaborator traits for *what* happens.
//!
//! # Key types
//!
//! - [`Session`]: the aggregate root (phase, round, roster, elements)
//! - [`Phase`] / [`PhaseTransition`]: the two-state round machine
//! - [`ElementPool`]: the phase-synchronized element tokens
//! - [`ConditionLifecycle`] / [`RosterCollaborator`]: the seams content
//!   plugs into
//! - [`Catalog`]: loaded content with placeholder fallbacks
//! - [`EngineConfig`]: rule switches

mod catalog;
mod collaborator;
mod config;
mod elements;
mod error;
pub mod ordering;
mod phase;
mod session;
mod turn;

pub use catalog::Catalog;
pub use collaborator::{ConditionLifecycle, Labels, NoConditions, RawLabels, RosterCollaborator};
pub use config::{EngineConfig, Phase};
pub use elements::{ElementPool, ElementState};
pub use error::EngineError;
pub use phase::PhaseTransition;
pub use session::Session;
