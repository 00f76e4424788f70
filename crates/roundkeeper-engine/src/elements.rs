//! The shared element pool.
//!
//! Each [`Element`] token is always in exactly one lifecycle position.
//! Storing one [`ElementState`] per type (instead of three sets) makes
//! that invariant hold by construction; the set views are derived.
//!
//! ```text
//!  Preparation:  inert ─toggle→ pending ─(into Execution)→ waning
//!  Execution:    inert ─toggle→ waning
//!                waning ─(into Preparation)→ active ─(next into Preparation)→ inert
//! ```

use roundkeeper_model::Element;
use serde::{Deserialize, Serialize};

use crate::Phase;

/// Lifecycle position of one element token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementState {
    /// In none of the sets.
    #[default]
    Inert,
    /// Infused during Preparation; becomes waning when Execution starts.
    Pending,
    /// Infused during Execution; becomes active at the next Preparation.
    Waning,
    /// Available to consume; cleared at the next Preparation.
    Active,
}

/// Positions of all six element tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementPool {
    states: [ElementState; 6],
}

impl ElementPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, element: Element) -> ElementState {
        self.states[element.index()]
    }

    /// Puts a token directly into a position.
    pub fn set(&mut self, element: Element, state: ElementState) {
        self.states[element.index()] = state;
    }

    /// The user clicked an element. Returns the token's new position.
    ///
    /// During Preparation the click cycles `inert → pending → active →
    /// inert`; during Execution `inert → waning → active → inert`. A
    /// token sitting in the other phase's infusion slot is treated as
    /// inert.
    pub fn toggle(&mut self, element: Element, phase: Phase) -> ElementState {
        let infused = match phase {
            Phase::Preparation => ElementState::Pending,
            Phase::Execution => ElementState::Waning,
        };
        let next = match self.state(element) {
            s if s == infused => ElementState::Active,
            ElementState::Active => ElementState::Inert,
            _ => infused,
        };
        self.set(element, next);
        next
    }

    /// Transition into Execution: pending tokens start waning.
    pub fn promote_into_execution(&mut self) {
        for state in &mut self.states {
            if *state == ElementState::Pending {
                *state = ElementState::Waning;
            }
        }
    }

    /// Transition into Preparation: active tokens are spent, waning
    /// tokens become active.
    pub fn promote_into_preparation(&mut self) {
        for state in &mut self.states {
            *state = match *state {
                ElementState::Active => ElementState::Inert,
                ElementState::Waning => ElementState::Active,
                other => other,
            };
        }
    }

    pub fn pending(&self) -> impl Iterator<Item = Element> + '_ {
        self.in_state(ElementState::Pending)
    }

    pub fn waning(&self) -> impl Iterator<Item = Element> + '_ {
        self.in_state(ElementState::Waning)
    }

    pub fn active(&self) -> impl Iterator<Item = Element> + '_ {
        self.in_state(ElementState::Active)
    }

    fn in_state(&self, state: ElementState) -> impl Iterator<Item = Element> + '_ {
        Element::ALL
            .into_iter()
            .filter(move |e| self.states[e.index()] == state)
    }
}
