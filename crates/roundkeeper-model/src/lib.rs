//! Data model for Roundkeeper.
//!
//! This crate defines the things a session tracks, independent of how
//! they are scheduled:
//!
//! - **Identity** ([`FigureId`]) and the [`Element`] token types.
//! - **Figures** ([`Figure`], [`Character`], [`Monster`], [`Objective`])
//!   and the sub-entities they own ([`Summon`], [`MonsterEntity`]).
//! - **Status effects** ([`EntityCondition`]) and the [`Afflicted`] trait
//!   that condition collaborators operate on.
//! - **Content definitions** ([`CharacterData`], [`MonsterData`],
//!   [`ScenarioData`], ...): the loaded game data figures are built from.
//!
//! # Architecture
//!
//! The model knows nothing about phases or turn order. The engine crate
//! sits on top of it:
//!
//! ```text
//! Table (actor) → Engine (Session, phase machine, turn pointer) → Model (figures)
//! ```

mod condition;
mod content;
mod figure;
mod types;

pub use condition::{Afflicted, ConditionState, EntityCondition};
pub use content::{
    Ability, CharacterData, CharacterStat, DeckData, EditionData, FigureError,
    MonsterData, ObjectiveData, ScenarioData, SectionData,
};
pub use figure::{
    Character, Figure, Monster, MonsterEntity, MonsterType, Objective,
    Summon, SummonState, TurnState,
};
pub use types::{Element, FigureId, TableId};
