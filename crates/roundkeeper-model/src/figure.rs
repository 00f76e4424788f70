//! Figures: the participants that occupy a turn slot.
//!
//! A [`Figure`] is a closed sum over the three participant kinds. The
//! engine's ordering and turn-pointer logic only use the shared surface
//! on [`Figure`] (`priority`, `is_active`, `is_resolved`, the afflicted
//! sub-entities) plus the variant tag for the few rules that genuinely
//! differ per kind.

use serde::{Deserialize, Serialize};

use crate::{Afflicted, CharacterData, EntityCondition, FigureId, MonsterData, ObjectiveData};

/// Priority reported by exhausted characters and plain objectives, so
/// they act after every card-driven figure.
const LAST_PRIORITY: u32 = 100;

/// Priority of an escort objective without its own initiative.
const ESCORT_PRIORITY: u32 = 99;

// ---------------------------------------------------------------------------
// TurnState: derived, never stored
// ---------------------------------------------------------------------------

/// Where a figure stands in the current round.
///
/// Derived from the `active` / `resolved` flags:
///
/// ```text
/// Waiting  (!active && !resolved) ──start──→ Acting (active && !resolved)
///                                               │
///                                             end
///                                               ↓
///                                           Done (resolved)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnState {
    Waiting,
    Acting,
    Done,
}

// ---------------------------------------------------------------------------
// Summons
// ---------------------------------------------------------------------------

/// Whether a summon (or summoned monster) has survived its first turn end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummonState {
    /// Placed this round; acts from the next round on.
    #[default]
    JustSummoned,
    /// Has been through its owner's turn end.
    Confirmed,
}

/// A summon owned by a character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summon {
    pub name: String,
    pub number: u32,
    pub health: i32,
    pub max_health: i32,
    pub dead: bool,
    pub state: SummonState,
    pub conditions: Vec<EntityCondition>,
}

impl Summon {
    pub fn new(name: impl Into<String>, number: u32, max_health: i32) -> Self {
        Self {
            name: name.into(),
            number,
            health: max_health,
            max_health,
            dead: false,
            state: SummonState::JustSummoned,
            conditions: Vec::new(),
        }
    }
}

impl Afflicted for Summon {
    fn label(&self) -> String {
        format!("summon {} #{}", self.name, self.number)
    }

    fn health(&self) -> i32 {
        self.health
    }

    fn conditions(&self) -> &[EntityCondition] {
        &self.conditions
    }

    fn conditions_mut(&mut self) -> &mut Vec<EntityCondition> {
        &mut self.conditions
    }
}

// ---------------------------------------------------------------------------
// Character
// ---------------------------------------------------------------------------

/// A player character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: FigureId,
    pub name: String,
    pub edition: String,
    /// Player-given display name; empty when unset.
    pub title: String,
    pub level: u32,
    /// The initiative the player chose for this round. 0 = not chosen yet.
    pub initiative: u32,
    pub exhausted: bool,
    pub health: i32,
    pub max_health: i32,
    pub loot: u32,
    pub experience: u32,
    pub conditions: Vec<EntityCondition>,
    pub summons: Vec<Summon>,
    pub active: bool,
    pub resolved: bool,
}

impl Character {
    /// Builds a character at `level` from its loaded definition.
    pub fn new(id: FigureId, data: &CharacterData, level: u32) -> Self {
        let max_health = data.max_health(level);
        Self {
            id,
            name: data.name.clone(),
            edition: data.edition.clone(),
            title: String::new(),
            level,
            initiative: 0,
            exhausted: false,
            health: max_health,
            max_health,
            loot: 0,
            experience: 0,
            conditions: Vec::new(),
            summons: Vec::new(),
            active: false,
            resolved: false,
        }
    }

    /// Execution-phase ordering key.
    pub fn priority(&self) -> u32 {
        if self.exhausted {
            LAST_PRIORITY
        } else {
            self.initiative
        }
    }

    /// Restores the character for a fresh scenario: full health, no
    /// status effects, no summons, nothing earned, no turn state.
    pub fn reset(&mut self) {
        self.health = self.max_health;
        self.loot = 0;
        self.experience = 0;
        self.conditions.clear();
        self.summons.clear();
        self.initiative = 0;
        self.active = false;
        self.resolved = false;
        self.exhausted = false;
    }
}

impl Afflicted for Character {
    fn label(&self) -> String {
        format!("character {}", self.name)
    }

    fn health(&self) -> i32 {
        self.health
    }

    fn conditions(&self) -> &[EntityCondition] {
        &self.conditions
    }

    fn conditions_mut(&mut self) -> &mut Vec<EntityCondition> {
        &mut self.conditions
    }
}

// ---------------------------------------------------------------------------
// Monster group and entities
// ---------------------------------------------------------------------------

/// Rank of an individual monster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonsterType {
    #[default]
    Normal,
    Elite,
    Boss,
}

/// One standee of a monster group on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonsterEntity {
    pub number: u32,
    #[serde(rename = "type")]
    pub kind: MonsterType,
    pub health: i32,
    pub max_health: i32,
    pub dead: bool,
    pub level: u32,
    /// `Some` when the entity was summoned by another monster.
    pub summon: Option<SummonState>,
    pub conditions: Vec<EntityCondition>,
}

impl MonsterEntity {
    pub fn new(number: u32, kind: MonsterType, max_health: i32, level: u32) -> Self {
        Self {
            number,
            kind,
            health: max_health,
            max_health,
            dead: false,
            level,
            summon: None,
            conditions: Vec::new(),
        }
    }
}

impl Afflicted for MonsterEntity {
    fn label(&self) -> String {
        format!("monster #{} ({:?})", self.number, self.kind)
    }

    fn health(&self) -> i32 {
        self.health
    }

    fn conditions(&self) -> &[EntityCondition] {
        &self.conditions
    }

    fn conditions_mut(&mut self) -> &mut Vec<EntityCondition> {
        &mut self.conditions
    }
}

/// A monster type in play: the group shares one ability deck and one
/// turn slot, and owns the individual standees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Monster {
    pub id: FigureId,
    pub name: String,
    pub edition: String,
    pub level: u32,
    pub boss: bool,
    /// Initiative of the ability card drawn for this round. 0 = none drawn.
    pub initiative: u32,
    pub entities: Vec<MonsterEntity>,
    pub active: bool,
    pub resolved: bool,
}

impl Monster {
    /// Builds an empty group (no standees placed yet) from its definition.
    pub fn new(id: FigureId, data: &MonsterData, level: u32) -> Self {
        Self {
            id,
            name: data.name.clone(),
            edition: data.edition.clone(),
            level,
            boss: data.boss,
            initiative: 0,
            entities: Vec::new(),
            active: false,
            resolved: false,
        }
    }

    /// Execution-phase ordering key.
    pub fn priority(&self) -> u32 {
        self.initiative
    }

    /// Sets the group's level and that of every standee.
    pub fn set_level(&mut self, level: u32) {
        self.level = level;
        for entity in &mut self.entities {
            entity.level = level;
        }
    }
}

// ---------------------------------------------------------------------------
// Objective
// ---------------------------------------------------------------------------

/// A scenario objective (or escort) with its own health and turn slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    pub id: FigureId,
    /// Content name; empty for ad-hoc objectives.
    pub name: String,
    /// Display title; empty when unset.
    pub title: String,
    pub escort: bool,
    /// Explicit initiative; 0 = use the escort/objective default.
    pub initiative: u32,
    pub health: i32,
    pub max_health: i32,
    pub exhausted: bool,
    pub conditions: Vec<EntityCondition>,
    pub active: bool,
    pub resolved: bool,
}

impl Objective {
    pub fn new(id: FigureId, data: &ObjectiveData) -> Self {
        Self {
            id,
            name: data.name.clone(),
            title: String::new(),
            escort: data.escort,
            initiative: data.initiative,
            health: data.health,
            max_health: data.health,
            exhausted: false,
            conditions: Vec::new(),
            active: false,
            resolved: false,
        }
    }

    /// Execution-phase ordering key.
    pub fn priority(&self) -> u32 {
        match self.initiative {
            0 if self.escort => ESCORT_PRIORITY,
            0 => LAST_PRIORITY,
            initiative => initiative,
        }
    }
}

impl Afflicted for Objective {
    fn label(&self) -> String {
        if self.escort {
            format!("escort {}", self.name)
        } else {
            format!("objective {}", self.name)
        }
    }

    fn health(&self) -> i32 {
        self.health
    }

    fn conditions(&self) -> &[EntityCondition] {
        &self.conditions
    }

    fn conditions_mut(&mut self) -> &mut Vec<EntityCondition> {
        &mut self.conditions
    }
}

// ---------------------------------------------------------------------------
// Figure: the closed sum
// ---------------------------------------------------------------------------

/// Any participant that takes a turn slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Figure {
    Character(Character),
    Monster(Monster),
    Objective(Objective),
}

impl Figure {
    pub fn id(&self) -> FigureId {
        match self {
            Self::Character(c) => c.id,
            Self::Monster(m) => m.id,
            Self::Objective(o) => o.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Character(c) => &c.name,
            Self::Monster(m) => &m.name,
            Self::Objective(o) => &o.name,
        }
    }

    /// The player-given title, if any. Monster groups never have one.
    pub fn title(&self) -> Option<&str> {
        let title = match self {
            Self::Character(c) => c.title.as_str(),
            Self::Objective(o) => o.title.as_str(),
            Self::Monster(_) => "",
        };
        (!title.is_empty()).then_some(title)
    }

    /// Execution-phase ordering key (lower acts first).
    pub fn priority(&self) -> u32 {
        match self {
            Self::Character(c) => c.priority(),
            Self::Monster(m) => m.priority(),
            Self::Objective(o) => o.priority(),
        }
    }

    pub fn is_active(&self) -> bool {
        match self {
            Self::Character(c) => c.active,
            Self::Monster(m) => m.active,
            Self::Objective(o) => o.active,
        }
    }

    pub fn set_active(&mut self, active: bool) {
        match self {
            Self::Character(c) => c.active = active,
            Self::Monster(m) => m.active = active,
            Self::Objective(o) => o.active = active,
        }
    }

    /// Whether the figure has completed its turn this round ("off").
    pub fn is_resolved(&self) -> bool {
        match self {
            Self::Character(c) => c.resolved,
            Self::Monster(m) => m.resolved,
            Self::Objective(o) => o.resolved,
        }
    }

    pub fn set_resolved(&mut self, resolved: bool) {
        match self {
            Self::Character(c) => c.resolved = resolved,
            Self::Monster(m) => m.resolved = resolved,
            Self::Objective(o) => o.resolved = resolved,
        }
    }

    pub fn turn_state(&self) -> TurnState {
        match (self.is_active(), self.is_resolved()) {
            (_, true) => TurnState::Done,
            (true, false) => TurnState::Acting,
            (false, false) => TurnState::Waiting,
        }
    }

    pub fn is_character(&self) -> bool {
        matches!(self, Self::Character(_))
    }

    pub fn is_monster(&self) -> bool {
        matches!(self, Self::Monster(_))
    }

    pub fn is_objective(&self) -> bool {
        matches!(self, Self::Objective(_))
    }

    pub fn as_character(&self) -> Option<&Character> {
        match self {
            Self::Character(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_character_mut(&mut self) -> Option<&mut Character> {
        match self {
            Self::Character(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_monster(&self) -> Option<&Monster> {
        match self {
            Self::Monster(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_monster_mut(&mut self) -> Option<&mut Monster> {
        match self {
            Self::Monster(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_objective(&self) -> Option<&Objective> {
        match self {
            Self::Objective(o) => Some(o),
            _ => None,
        }
    }

    /// A monster group with no standees. It is listed and ordered, but
    /// never receives turn lifecycle calls during normalization.
    pub fn is_inert(&self) -> bool {
        matches!(self, Self::Monster(m) if m.entities.is_empty())
    }

    /// Whether the figure is out of play for good this scenario.
    ///
    /// Characters and objectives are out when exhausted or at zero
    /// health; a monster group is out when every standee is dead or at
    /// zero health (so an empty group counts as out).
    pub fn is_permanently_removed(&self) -> bool {
        match self {
            Self::Character(c) => c.exhausted || c.health == 0,
            Self::Objective(o) => o.exhausted || o.health == 0,
            Self::Monster(m) => m
                .entities
                .iter()
                .all(|e| e.dead || e.health == 0),
        }
    }

    /// Visits every entity that carries this figure's status effects:
    /// the character then its summons, the objective, or each standee
    /// of a monster group.
    pub fn for_each_afflicted(&mut self, mut f: impl FnMut(&mut dyn Afflicted)) {
        match self {
            Self::Character(c) => {
                f(&mut *c);
                for summon in &mut c.summons {
                    f(summon);
                }
            }
            Self::Objective(o) => f(o),
            Self::Monster(m) => {
                for entity in &mut m.entities {
                    f(entity);
                }
            }
        }
    }

    /// Promotes summons placed this round to confirmed.
    pub fn confirm_summons(&mut self) {
        match self {
            Self::Character(c) => {
                for summon in &mut c.summons {
                    if summon.state == SummonState::JustSummoned {
                        summon.state = SummonState::Confirmed;
                    }
                }
            }
            Self::Monster(m) => {
                for entity in &mut m.entities {
                    if entity.summon == Some(SummonState::JustSummoned) {
                        entity.summon = Some(SummonState::Confirmed);
                    }
                }
            }
            Self::Objective(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn character(initiative: u32) -> Character {
        let data = CharacterData::new("brute", "gh", 10);
        let mut c = Character::new(FigureId(1), &data, 1);
        c.initiative = initiative;
        c
    }

    fn monster(entities: usize) -> Monster {
        let data = MonsterData::new("bandit-guard", "gh");
        let mut m = Monster::new(FigureId(2), &data, 1);
        for n in 0..entities {
            m.entities.push(MonsterEntity::new(n as u32 + 1, MonsterType::Normal, 5, 1));
        }
        m
    }

    #[test]
    fn test_turn_state_derived_from_flags() {
        let mut f = Figure::Character(character(10));
        assert_eq!(f.turn_state(), TurnState::Waiting);
        f.set_active(true);
        assert_eq!(f.turn_state(), TurnState::Acting);
        f.set_resolved(true);
        assert_eq!(f.turn_state(), TurnState::Done);
        f.set_active(false);
        assert_eq!(f.turn_state(), TurnState::Done);
    }

    #[test]
    fn test_character_priority_exhausted_sorts_last() {
        let mut c = character(12);
        assert_eq!(c.priority(), 12);
        c.exhausted = true;
        assert_eq!(c.priority(), LAST_PRIORITY);
    }

    #[test]
    fn test_objective_priority_defaults_by_escort_flag() {
        let mut data = ObjectiveData::new("", 8);
        let plain = Objective::new(FigureId(3), &data);
        assert_eq!(plain.priority(), LAST_PRIORITY);

        data.escort = true;
        let escort = Objective::new(FigureId(4), &data);
        assert_eq!(escort.priority(), ESCORT_PRIORITY);

        data.initiative = 40;
        let timed = Objective::new(FigureId(5), &data);
        assert_eq!(timed.priority(), 40);
    }

    #[test]
    fn test_is_inert_only_for_empty_monster_groups() {
        assert!(Figure::Monster(monster(0)).is_inert());
        assert!(!Figure::Monster(monster(2)).is_inert());
        assert!(!Figure::Character(character(0)).is_inert());
    }

    #[test]
    fn test_is_permanently_removed_monster_requires_all_dead() {
        let mut m = monster(2);
        assert!(!Figure::Monster(m.clone()).is_permanently_removed());
        m.entities[0].dead = true;
        assert!(!Figure::Monster(m.clone()).is_permanently_removed());
        m.entities[1].health = 0;
        assert!(Figure::Monster(m).is_permanently_removed());
        assert!(Figure::Monster(monster(0)).is_permanently_removed());
    }

    #[test]
    fn test_is_permanently_removed_character_exhausted_or_zero_health() {
        let mut c = character(5);
        assert!(!Figure::Character(c.clone()).is_permanently_removed());
        c.health = 0;
        assert!(Figure::Character(c.clone()).is_permanently_removed());
        c.health = 3;
        c.exhausted = true;
        assert!(Figure::Character(c).is_permanently_removed());
    }

    #[test]
    fn test_for_each_afflicted_visits_character_then_summons() {
        let mut c = character(5);
        c.summons.push(Summon::new("wolf", 1, 4));
        c.summons.push(Summon::new("bear", 2, 6));
        let mut f = Figure::Character(c);

        let mut seen = Vec::new();
        f.for_each_afflicted(|a| seen.push(a.label()));
        assert_eq!(seen, vec!["character brute", "summon wolf #1", "summon bear #2"]);
    }

    #[test]
    fn test_for_each_afflicted_skips_monster_group_itself() {
        let mut f = Figure::Monster(monster(2));
        let mut count = 0;
        f.for_each_afflicted(|_| count += 1);
        assert_eq!(count, 2);
    }

    #[test]
    fn test_confirm_summons_promotes_only_new() {
        let mut c = character(5);
        c.summons.push(Summon::new("wolf", 1, 4));
        let mut f = Figure::Character(c);
        f.confirm_summons();
        let c = f.as_character().unwrap();
        assert_eq!(c.summons[0].state, SummonState::Confirmed);

        let mut m = monster(2);
        m.entities[1].summon = Some(SummonState::JustSummoned);
        let mut f = Figure::Monster(m);
        f.confirm_summons();
        let m = f.as_monster().unwrap();
        assert_eq!(m.entities[0].summon, None);
        assert_eq!(m.entities[1].summon, Some(SummonState::Confirmed));
    }

    #[test]
    fn test_character_reset_restores_defaults() {
        let mut c = character(30);
        c.health = 2;
        c.loot = 4;
        c.experience = 9;
        c.exhausted = true;
        c.resolved = true;
        c.conditions.push(EntityCondition::new("poison", 0));
        c.summons.push(Summon::new("wolf", 1, 4));
        c.reset();
        assert_eq!(c.health, c.max_health);
        assert_eq!((c.loot, c.experience, c.initiative), (0, 0, 0));
        assert!(c.conditions.is_empty());
        assert!(c.summons.is_empty());
        assert!(!c.exhausted && !c.resolved && !c.active);
    }

    #[test]
    fn test_figure_serializes_with_kind_tag() {
        let f = Figure::Monster(monster(0));
        let json = serde_json::to_value(&f).unwrap();
        assert_eq!(json["kind"], "monster");
        assert_eq!(json["name"], "bandit-guard");
    }
}
