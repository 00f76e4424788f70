//! Status effects and the trait condition collaborators operate on.
//!
//! The engine never interprets a condition. It stores them on figures and
//! sub-entities, and at turn boundaries hands each affected entity to the
//! condition lifecycle collaborator as a `&mut dyn Afflicted`.

use serde::{Deserialize, Serialize};

/// Where a status effect is in its own lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionState {
    /// Applied this turn; not yet in effect.
    #[default]
    New,
    /// In effect.
    Normal,
    /// Will be removed at the end of the bearer's next turn.
    Expire,
    /// Applied by a turn-scoped rule and pending its turn-end handling.
    Turn,
    /// Removed, kept only so it can be restored by an undo.
    Removed,
}

/// A single status effect on an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityCondition {
    /// Content name (e.g. `"poison"`), owned by the loaded game data.
    pub name: String,
    /// Magnitude for valued effects; 0 for plain flags.
    #[serde(default)]
    pub value: u32,
    #[serde(default)]
    pub state: ConditionState,
    /// Set when the effect expired at a turn end. Restoring clears it.
    #[serde(default)]
    pub expired: bool,
}

impl EntityCondition {
    /// Creates a fresh condition in the [`ConditionState::New`] state.
    pub fn new(name: impl Into<String>, value: u32) -> Self {
        Self {
            name: name.into(),
            value,
            state: ConditionState::New,
            expired: false,
        }
    }
}

/// Anything that can carry status effects: characters, objectives,
/// summons, and monster entities.
///
/// Monster groups are not `Afflicted` themselves: their effects live on
/// the individual entities.
pub trait Afflicted {
    /// A human-readable label for logging.
    fn label(&self) -> String;

    /// Current health.
    fn health(&self) -> i32;

    /// The entity's status effects.
    fn conditions(&self) -> &[EntityCondition];

    /// Mutable access for the condition collaborator.
    fn conditions_mut(&mut self) -> &mut Vec<EntityCondition>;
}
