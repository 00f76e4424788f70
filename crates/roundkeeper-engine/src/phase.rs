//! Round phase transitions.

use roundkeeper_model::Figure;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{Phase, RosterCollaborator, Session, ordering};

/// What a call to [`Session::advance_phase`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhaseTransition {
    /// Preparation → Execution; the round counter now reads `round`.
    EnteredExecution { round: u32 },
    /// Execution → Preparation; every figure is Waiting again.
    EnteredPreparation,
    /// Still in Preparation: some character has not chosen an initiative.
    NotReady,
}

impl Session {
    /// Whether Execution may start: the roster is non-empty and every
    /// character has a priority, is exhausted, or has already finished.
    pub fn ready_to_advance(&self) -> bool {
        !self.roster.is_empty()
            && self.roster.iter().all(|f| match f {
                Figure::Character(c) => c.priority() > 0 || c.exhausted || c.resolved,
                Figure::Monster(_) | Figure::Objective(_) => true,
            })
    }

    /// Re-sorts the roster for the current phase. Safe to call any time.
    pub fn sort_roster(&mut self) {
        ordering::sort_roster(&mut self.roster, self.phase, self.labels.as_ref());
    }

    /// Moves the round to its other phase, if allowed.
    ///
    /// Marks the session busy whether or not a transition happens; the
    /// caller releases it with [`release_busy`](Self::release_busy) once
    /// dependent triggers should be accepted again. Entering Execution
    /// requires [`ready_to_advance`](Self::ready_to_advance); otherwise the
    /// call leaves phase, round, roster, and elements untouched.
    pub fn advance_phase(
        &mut self,
        rosters: &mut [&mut dyn RosterCollaborator],
    ) -> PhaseTransition {
        self.busy = true;
        self.sample_clock();

        match self.phase {
            Phase::Execution => {
                self.phase = self.phase.next();
                for collaborator in rosters.iter_mut() {
                    debug!(collaborator = collaborator.name(), "advance");
                    collaborator.advance(&mut self.roster);
                }
                if self.config.move_elements {
                    self.elements.promote_into_preparation();
                }
                self.sort_roster();
                for figure in &mut self.roster {
                    figure.set_active(false);
                    figure.set_resolved(false);
                }
                info!(round = self.round, "entered preparation");
                PhaseTransition::EnteredPreparation
            }
            Phase::Preparation if self.ready_to_advance() => {
                self.phase = self.phase.next();
                self.round += 1;
                for collaborator in rosters.iter_mut() {
                    debug!(collaborator = collaborator.name(), "draw");
                    collaborator.draw(&mut self.roster);
                }
                if self.config.move_elements {
                    self.elements.promote_into_execution();
                }
                self.sort_roster();
                if let Some(first) = self.roster.first_mut() {
                    first.set_active(true);
                }
                info!(round = self.round, "entered execution");
                PhaseTransition::EnteredExecution { round: self.round }
            }
            Phase::Preparation => {
                debug!("not every character has an initiative; staying in preparation");
                PhaseTransition::NotReady
            }
        }
    }
}
