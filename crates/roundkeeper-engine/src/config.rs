//! Engine configuration and the round phase state machine.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// EngineConfig
// ---------------------------------------------------------------------------

/// Rule switches that change how turn boundaries and phase transitions
/// behave.
///
/// These are the table-wide settings a group agrees on before play; they
/// are read on every transition, so changing them mid-round takes effect
/// at the next turn boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Call the condition collaborator's apply/unapply hooks at turn
    /// start and turn end.
    pub apply_conditions: bool,

    /// Call the condition collaborator's expire/restore hooks at turn end
    /// and when a finished turn is reopened.
    pub expire_conditions: bool,

    /// Move element tokens along their lifecycle on phase transitions.
    /// When off, tokens only change when toggled by hand.
    pub move_elements: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            apply_conditions: true,
            expire_conditions: true,
            move_elements: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// The two phases of a round.
///
/// ```text
///   Preparation ──(all priorities chosen; round += 1)──→ Execution
///        ↑                                                  │
///        └──────────────────────────────────────────────────┘
/// ```
///
/// - **Preparation**: players pick cards and announce their initiative.
///   The roster is grouped alphabetically.
/// - **Execution**: figures act in initiative order; the turn pointer
///   walks down the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    Preparation,
    Execution,
}

impl Phase {
    /// The phase a transition leads to. The machine only ever alternates.
    pub fn next(self) -> Self {
        match self {
            Self::Preparation => Self::Execution,
            Self::Execution => Self::Preparation,
        }
    }

    pub fn is_execution(self) -> bool {
        matches!(self, Self::Execution)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Preparation => write!(f, "Preparation"),
            Self::Execution => write!(f, "Execution"),
        }
    }
}
