//! The seams the engine calls out through.
//!
//! The engine decides *when* things happen; these traits decide *what*
//! happens. Content-specific behavior (which status effects exist, how a
//! monster deck is drawn) lives behind them, so the phase machine and the
//! turn pointer stay independent of any loaded game.

use roundkeeper_model::{Afflicted, Figure};

/// Applies and retires status effects on a single entity at turn
/// boundaries.
///
/// The engine invokes these for a figure's afflicted entities (the
/// character and its summons, the objective, or every standee of a
/// monster group), one entity per call, in a fixed order:
///
/// - turn start: `apply_turn_scoped`
/// - turn end: `expire`, then `apply_turn_scoped`, then `apply_post_turn`
/// - reopening a turn: `restore_suppressed`, `unapply_turn_scoped`,
///   then `unapply_post_turn`
pub trait ConditionLifecycle {
    /// Brings back effects that expired at the end of a turn being undone.
    fn restore_suppressed(&mut self, target: &mut dyn Afflicted);

    /// Reverts effects applied at turn start.
    fn unapply_turn_scoped(&mut self, target: &mut dyn Afflicted);

    /// Reverts effects applied at turn end.
    fn unapply_post_turn(&mut self, target: &mut dyn Afflicted);

    /// Applies effects that trigger when a turn starts (e.g. wound damage).
    fn apply_turn_scoped(&mut self, target: &mut dyn Afflicted);

    /// Applies effects that trigger when a turn ends.
    fn apply_post_turn(&mut self, target: &mut dyn Afflicted);

    /// Expires effects whose duration ended with this turn.
    fn expire(&mut self, target: &mut dyn Afflicted);
}

/// A condition collaborator that does nothing, for tables that track
/// status effects by hand.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoConditions;

impl ConditionLifecycle for NoConditions {
    fn restore_suppressed(&mut self, _target: &mut dyn Afflicted) {}
    fn unapply_turn_scoped(&mut self, _target: &mut dyn Afflicted) {}
    fn unapply_post_turn(&mut self, _target: &mut dyn Afflicted) {}
    fn apply_turn_scoped(&mut self, _target: &mut dyn Afflicted) {}
    fn apply_post_turn(&mut self, _target: &mut dyn Afflicted) {}
    fn expire(&mut self, _target: &mut dyn Afflicted) {}
}

/// A per-kind roster service (characters, monsters, modifier decks).
///
/// Called once per phase transition, before the roster is re-sorted, so
/// anything that changes a figure's priority must happen here.
pub trait RosterCollaborator {
    /// Short name for logging.
    fn name(&self) -> &str;

    /// Deals phase-local state when the round enters Execution
    /// (e.g. reveal a monster ability card and set its initiative).
    fn draw(&mut self, roster: &mut [Figure]);

    /// Retires phase-local state when the round returns to Preparation
    /// (e.g. discard revealed cards, clear chosen initiatives).
    fn advance(&mut self, roster: &mut [Figure]);
}

/// Resolves localization keys to display names.
///
/// Only used for the alphabetical Preparation ordering. Keys have the
/// shape `data.character.<name>`, `data.monster.<name>`,
/// `data.objective.<name>`, or the bare fallbacks `escort` / `objective`.
pub trait Labels: Send + Sync {
    fn label(&self, key: &str) -> String;
}

/// Labels without a translation table: the last dotted segment of the key.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawLabels;

impl Labels for RawLabels {
    fn label(&self, key: &str) -> String {
        key.rsplit('.').next().unwrap_or(key).to_string()
    }
}
