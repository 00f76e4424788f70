//! # Roundkeeper
//!
//! Turn-order and round-phase engine for cooperative tabletop companion
//! apps.
//!
//! Roundkeeper tracks who acts when: it sorts the figures at the table,
//! moves the round between its Preparation and Execution phases, walks a
//! turn pointer through the roster, and ages the shared element tokens.
//! Game content (which status effects exist, how monster decks draw)
//! plugs in through the collaborator traits.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use roundkeeper::prelude::*;
//!
//! let catalog = roundkeeper::content::catalog_from_json(EDITIONS_JSON)?;
//! let mut tables = TableManager::new(Arc::new(catalog), TableConfig::default());
//! let table = tables.get(tables.create_table(Collaborators::default()))?;
//!
//! let brute = table.add_character("brute", "gh", 1).await?;
//! table.set_initiative(brute, 17).await?;
//! table.advance_phase().await?;
//! ```

pub mod content;
mod error;
pub mod logging;

pub use error::RoundkeeperError;

pub mod prelude {
    pub use std::sync::Arc;

    pub use roundkeeper_engine::{
        Catalog, ConditionLifecycle, ElementPool, ElementState, EngineConfig, EngineError,
        Labels, NoConditions, Phase, PhaseTransition, RawLabels, RosterCollaborator, Session,
    };
    pub use roundkeeper_model::{
        Afflicted, Character, CharacterData, ConditionState, EditionData, Element,
        EntityCondition, Figure, FigureId, Monster, MonsterData, MonsterEntity, MonsterType,
        Objective, ObjectiveData, ScenarioData, SectionData, Summon, TableId, TurnState,
    };
    pub use roundkeeper_table::{
        Collaborators, SnapshotSender, TableConfig, TableError, TableHandle, TableManager,
        TableSnapshot,
    };

    pub use crate::RoundkeeperError;
}
