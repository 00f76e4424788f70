//! The turn pointer: what happens when a user clicks a figure.
//!
//! A click moves the pointer to the clicked figure and then walks the
//! whole roster so everyone before it has finished and everyone after it
//! is waiting again. Each figure moves through three lifecycle steps:
//!
//! - **start**: becomes active; turn-start effects apply.
//! - **end**: becomes resolved; effects expire and turn-end effects apply.
//! - **prepare**: a finished turn is reopened; everything `end` applied is
//!   reverted.
//!
//! The cascade never fails once it starts: lookup is the only fallible
//! step and happens before any flag changes.

use roundkeeper_model::{Figure, FigureId, TurnState};
use tracing::debug;

use crate::{ConditionLifecycle, EngineConfig, EngineError};

/// Drives one toggle against a roster.
pub(crate) struct TurnPointer<'a> {
    config: &'a EngineConfig,
    conditions: &'a mut dyn ConditionLifecycle,
}

impl<'a> TurnPointer<'a> {
    pub(crate) fn new(
        config: &'a EngineConfig,
        conditions: &'a mut dyn ConditionLifecycle,
    ) -> Self {
        Self { config, conditions }
    }

    /// Moves the pointer to figure `id` and normalizes the roster.
    pub(crate) fn toggle(
        &mut self,
        roster: &mut [Figure],
        id: FigureId,
    ) -> Result<(), EngineError> {
        let index = roster
            .iter()
            .position(|f| f.id() == id)
            .ok_or(EngineError::FigureNotInRoster(id))?;

        match roster[index].turn_state() {
            TurnState::Waiting => self.start_turn(&mut roster[index]),
            TurnState::Acting => self.end_turn(&mut roster[index]),
            TurnState::Done => {
                if roster[..index].iter().any(Figure::is_active) {
                    self.prepare_turn(&mut roster[index]);
                } else {
                    // Undo of the latest completion: reactivate in place and
                    // let the pass below reopen it.
                    debug!(figure = %id, "reactivating finished figure");
                    roster[index].set_active(true);
                }
            }
        }

        self.normalize(roster, index);
        Ok(())
    }

    /// Brings every other figure in line with the toggled one.
    ///
    /// Both checks read the toggled figure's flags as they are at each
    /// step, since the pass itself may reopen it.
    fn normalize(&mut self, roster: &mut [Figure], index: usize) {
        for i in 0..roster.len() {
            if roster[index].is_active() {
                if i != index {
                    roster[i].set_active(false);
                }
                if i < index {
                    self.end_turn(&mut roster[i]);
                } else if !roster[i].is_inert() {
                    self.prepare_turn(&mut roster[i]);
                }
            }

            if roster[index].is_resolved() {
                if i < index && !roster[i].is_resolved() {
                    // The first skipped earlier figure gets its turn now;
                    // any others wait behind it.
                    let pointer_free = !roster[..i].iter().any(Figure::is_active);
                    if pointer_free {
                        self.start_turn(&mut roster[i]);
                    } else {
                        roster[i].set_active(false);
                    }
                } else if i > index && !roster[i].is_inert() {
                    let pointer_free = !roster[..i].iter().any(Figure::is_active);
                    if !roster[i].is_resolved() && pointer_free {
                        self.start_turn(&mut roster[i]);
                    } else {
                        roster[i].set_active(false);
                    }
                }
            }
        }
    }

    fn start_turn(&mut self, figure: &mut Figure) {
        debug!(figure = %figure.id(), "turn start");
        figure.set_active(true);
        if self.config.apply_conditions {
            figure.for_each_afflicted(|t| self.conditions.apply_turn_scoped(t));
        }
    }

    fn end_turn(&mut self, figure: &mut Figure) {
        if figure.is_resolved() {
            return;
        }
        debug!(figure = %figure.id(), "turn end");
        figure.set_resolved(true);
        figure.set_active(false);
        if self.config.expire_conditions {
            figure.for_each_afflicted(|t| self.conditions.expire(t));
        }
        if self.config.apply_conditions {
            figure.for_each_afflicted(|t| self.conditions.apply_turn_scoped(t));
            figure.for_each_afflicted(|t| self.conditions.apply_post_turn(t));
        }
        figure.confirm_summons();
    }

    fn prepare_turn(&mut self, figure: &mut Figure) {
        if !figure.is_permanently_removed() {
            if figure.is_resolved() {
                debug!(figure = %figure.id(), "turn reopened");
                figure.set_resolved(false);
                if self.config.expire_conditions {
                    figure.for_each_afflicted(|t| self.conditions.restore_suppressed(t));
                }
            }
            if self.config.apply_conditions && !figure.is_active() {
                figure.for_each_afflicted(|t| self.conditions.unapply_turn_scoped(t));
            }
        }
        if self.config.apply_conditions {
            figure.for_each_afflicted(|t| self.conditions.unapply_post_turn(t));
        }
    }
}
