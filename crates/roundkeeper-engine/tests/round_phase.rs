//! Integration tests for round phase transitions and the element pool.

use std::sync::Arc;

use roundkeeper_engine::{
    Catalog, ElementState, EngineConfig, NoConditions, Phase, PhaseTransition,
    RosterCollaborator, Session,
};
use roundkeeper_model::{
    CharacterData, EditionData, Element, Figure, MonsterData, MonsterEntity, MonsterType,
    TurnState,
};

// =========================================================================
// Helpers
// =========================================================================

/// Draws a fixed initiative for every monster group and counts calls.
struct FixedDraw {
    initiative: u32,
    draws: usize,
    advances: usize,
}

impl FixedDraw {
    fn new(initiative: u32) -> Self {
        Self {
            initiative,
            draws: 0,
            advances: 0,
        }
    }
}

impl RosterCollaborator for FixedDraw {
    fn name(&self) -> &str {
        "fixed-draw"
    }

    fn draw(&mut self, roster: &mut [Figure]) {
        self.draws += 1;
        for monster in roster.iter_mut().filter_map(Figure::as_monster_mut) {
            monster.initiative = self.initiative;
        }
    }

    fn advance(&mut self, roster: &mut [Figure]) {
        self.advances += 1;
        for monster in roster.iter_mut().filter_map(Figure::as_monster_mut) {
            monster.initiative = 0;
        }
    }
}

/// Clears character initiatives at the end of each round.
struct ClearInitiatives;

impl RosterCollaborator for ClearInitiatives {
    fn name(&self) -> &str {
        "clear-initiatives"
    }

    fn draw(&mut self, _roster: &mut [Figure]) {}

    fn advance(&mut self, roster: &mut [Figure]) {
        for character in roster.iter_mut().filter_map(Figure::as_character_mut) {
            character.initiative = 0;
        }
    }
}

fn catalog() -> Arc<Catalog> {
    let gh = EditionData {
        edition: "gh".into(),
        characters: vec![
            CharacterData::new("brute", "gh", 10),
            CharacterData::new("tinkerer", "gh", 8),
        ],
        monsters: vec![MonsterData::new("bandit-guard", "gh")],
        ..EditionData::default()
    };
    Arc::new(Catalog::new(vec![gh]))
}

fn session() -> Session {
    Session::new(EngineConfig::default(), catalog())
}

fn add_guard(session: &mut Session) -> roundkeeper_model::FigureId {
    let id = session.add_monster(&MonsterData::new("bandit-guard", "gh"));
    if let Figure::Monster(m) = session.figure_mut(id).unwrap() {
        m.entities.push(MonsterEntity::new(1, MonsterType::Normal, 5, 1));
    }
    id
}

// =========================================================================
// Readiness
// =========================================================================

#[test]
fn test_advance_phase_blocked_until_every_character_has_initiative() {
    let mut s = session();
    let brute = s.add_character("brute", "gh", 1);
    let guard = add_guard(&mut s);
    let mut draw = FixedDraw::new(70);

    let before = s.roster().to_vec();
    let elements = s.elements().clone();
    let outcome = s.advance_phase(&mut [&mut draw]);

    assert_eq!(outcome, PhaseTransition::NotReady);
    assert_eq!(s.phase(), Phase::Preparation);
    assert_eq!(s.round(), 0);
    assert_eq!(s.roster(), before.as_slice());
    assert_eq!(s.elements(), &elements);
    assert_eq!(draw.draws, 0);

    s.set_initiative(brute, 42).unwrap();
    let outcome = s.advance_phase(&mut [&mut draw]);

    assert_eq!(outcome, PhaseTransition::EnteredExecution { round: 1 });
    assert_eq!(s.phase(), Phase::Execution);
    assert_eq!(s.active_figure().unwrap().id(), brute);
    let ids: Vec<_> = s.roster().iter().map(Figure::id).collect();
    assert_eq!(ids, vec![brute, guard]);
}

#[test]
fn test_not_ready_is_idempotent() {
    let mut s = session();
    s.add_character("brute", "gh", 1);
    s.toggle_element(Element::Fire);

    let roster = s.roster().to_vec();
    let elements = s.elements().clone();
    for _ in 0..3 {
        assert_eq!(s.advance_phase(&mut []), PhaseTransition::NotReady);
    }

    assert_eq!(s.phase(), Phase::Preparation);
    assert_eq!(s.round(), 0);
    assert_eq!(s.roster(), roster.as_slice());
    assert_eq!(s.elements(), &elements);
}

#[test]
fn test_empty_roster_is_not_ready() {
    let mut s = session();

    assert!(!s.ready_to_advance());
    assert_eq!(s.advance_phase(&mut []), PhaseTransition::NotReady);
}

#[test]
fn test_exhausted_character_does_not_block() {
    let mut s = session();
    let brute = s.add_character("brute", "gh", 1);
    let tinkerer = s.add_character("tinkerer", "gh", 1);
    s.set_initiative(brute, 15).unwrap();
    if let Figure::Character(c) = s.figure_mut(tinkerer).unwrap() {
        c.exhausted = true;
    }

    assert!(s.ready_to_advance());
    s.advance_phase(&mut []);

    // Exhausted characters sort last.
    assert_eq!(s.roster().last().unwrap().id(), tinkerer);
}

// =========================================================================
// Round cycle
// =========================================================================

#[test]
fn test_round_counts_only_entries_into_execution() {
    let mut s = session();
    let brute = s.add_character("brute", "gh", 1);
    let mut clear = ClearInitiatives;

    for expected_round in 1..=3 {
        s.set_initiative(brute, 20).unwrap();
        assert_eq!(
            s.advance_phase(&mut [&mut clear]),
            PhaseTransition::EnteredExecution {
                round: expected_round
            }
        );
        assert_eq!(
            s.advance_phase(&mut [&mut clear]),
            PhaseTransition::EnteredPreparation
        );
        assert_eq!(s.round(), expected_round);
    }

    // Initiatives were cleared by the collaborator, so the next round waits.
    assert_eq!(s.advance_phase(&mut [&mut clear]), PhaseTransition::NotReady);
}

#[test]
fn test_second_round_starts_with_everyone_waiting() {
    let mut s = session();
    let brute = s.add_character("brute", "gh", 1);
    let tinkerer = s.add_character("tinkerer", "gh", 1);
    let mut clear = ClearInitiatives;
    let mut conditions = NoConditions;

    s.set_initiative(brute, 10).unwrap();
    s.set_initiative(tinkerer, 20).unwrap();
    s.advance_phase(&mut [&mut clear]);
    s.toggle_figure(brute, &mut conditions).unwrap();
    s.toggle_figure(tinkerer, &mut conditions).unwrap();
    assert!(s.roster().iter().all(|f| f.turn_state() == TurnState::Done));
    s.advance_phase(&mut [&mut clear]);

    assert!(s.roster().iter().all(|f| f.turn_state() == TurnState::Waiting));
    // Finishing round 1 does not count as having chosen an initiative.
    assert!(!s.ready_to_advance());
    assert_eq!(s.advance_phase(&mut [&mut clear]), PhaseTransition::NotReady);

    s.set_initiative(brute, 40).unwrap();
    s.set_initiative(tinkerer, 30).unwrap();
    assert_eq!(
        s.advance_phase(&mut [&mut clear]),
        PhaseTransition::EnteredExecution { round: 2 }
    );
    let states: Vec<_> = s.roster().iter().map(Figure::turn_state).collect();
    assert_eq!(states, vec![TurnState::Acting, TurnState::Waiting]);
    assert_eq!(s.active_figure().unwrap().id(), tinkerer);

    // Clicking the acting figure ends its turn rather than undoing one.
    s.toggle_figure(tinkerer, &mut conditions).unwrap();
    let states: Vec<_> = s.roster().iter().map(Figure::turn_state).collect();
    assert_eq!(states, vec![TurnState::Done, TurnState::Acting]);
}

#[test]
fn test_collaborators_run_once_per_transition_in_order() {
    let mut s = session();
    let brute = s.add_character("brute", "gh", 1);
    let guard = add_guard(&mut s);
    s.set_initiative(brute, 80).unwrap();
    let mut draw = FixedDraw::new(35);

    s.advance_phase(&mut [&mut draw]);

    assert_eq!((draw.draws, draw.advances), (1, 0));
    // The drawn initiative is in place before the roster is sorted.
    assert_eq!(s.roster()[0].id(), guard);
    assert!(s.roster()[0].is_active());

    s.advance_phase(&mut [&mut draw]);

    assert_eq!((draw.draws, draw.advances), (1, 1));
    assert_eq!(s.figure(guard).unwrap().priority(), 0);
}

#[test]
fn test_entering_preparation_clears_turns_and_sorts_by_kind() {
    let mut s = session();
    let guard = add_guard(&mut s);
    let brute = s.add_character("brute", "gh", 1);
    s.set_initiative(brute, 60).unwrap();
    let mut draw = FixedDraw::new(10);
    let mut conditions = NoConditions;

    s.advance_phase(&mut [&mut draw]);
    s.toggle_figure(guard, &mut conditions).unwrap();
    s.advance_phase(&mut [&mut draw]);

    assert_eq!(s.phase(), Phase::Preparation);
    assert!(s.roster().iter().all(|f| !f.is_active()));
    assert!(s.active_figure().is_none());
    // Characters come before monsters in preparation.
    let ids: Vec<_> = s.roster().iter().map(Figure::id).collect();
    assert_eq!(ids, vec![brute, guard]);
}

#[test]
fn test_advance_phase_marks_session_busy() {
    let mut s = session();
    assert!(!s.is_busy());

    s.advance_phase(&mut []);
    assert!(s.is_busy());

    s.release_busy();
    assert!(!s.is_busy());
}

// =========================================================================
// Elements
// =========================================================================

#[test]
fn test_element_infused_in_preparation_follows_full_lifecycle() {
    let mut s = session();
    let brute = s.add_character("brute", "gh", 1);
    s.set_initiative(brute, 30).unwrap();

    assert_eq!(s.toggle_element(Element::Fire), ElementState::Pending);

    s.advance_phase(&mut []);
    assert_eq!(s.elements().state(Element::Fire), ElementState::Waning);

    s.advance_phase(&mut []);
    assert_eq!(s.elements().state(Element::Fire), ElementState::Active);

    s.advance_phase(&mut []);
    assert_eq!(s.elements().state(Element::Fire), ElementState::Active);

    s.advance_phase(&mut []);
    assert_eq!(s.elements().state(Element::Fire), ElementState::Inert);
}

#[test]
fn test_element_infused_in_execution_becomes_active_next_round() {
    let mut s = session();
    let brute = s.add_character("brute", "gh", 1);
    s.set_initiative(brute, 30).unwrap();
    s.advance_phase(&mut []);

    assert_eq!(s.toggle_element(Element::Ice), ElementState::Waning);
    s.advance_phase(&mut []);

    assert_eq!(s.elements().state(Element::Ice), ElementState::Active);
    assert_eq!(s.elements().active().collect::<Vec<_>>(), vec![Element::Ice]);
    assert_eq!(s.elements().waning().count(), 0);
}

#[test]
fn test_move_elements_disabled_freezes_pool() {
    let config = EngineConfig {
        move_elements: false,
        ..EngineConfig::default()
    };
    let mut s = Session::new(config, catalog());
    let brute = s.add_character("brute", "gh", 1);
    s.set_initiative(brute, 30).unwrap();
    s.toggle_element(Element::Air);

    s.advance_phase(&mut []);
    s.advance_phase(&mut []);

    assert_eq!(s.elements().state(Element::Air), ElementState::Pending);
}
