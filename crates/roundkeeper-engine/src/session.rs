//! The session aggregate: everything one table's game tracks.

use std::sync::Arc;
use std::time::Duration;

use roundkeeper_model::{
    Character, Element, Figure, FigureId, Monster, MonsterData, Objective, ObjectiveData,
    ScenarioData, SectionData,
};
use tokio::time::Instant;
use tracing::{debug, error, info};

use crate::turn::TurnPointer;
use crate::{
    Catalog, ConditionLifecycle, ElementPool, ElementState, EngineConfig, EngineError, Labels,
    Phase, RawLabels,
};

/// One running game: phase, round, roster, elements, and play time.
///
/// All operations are synchronous and run to completion. The session
/// assumes a single writer; the table actor provides that guarantee when
/// sessions are shared.
pub struct Session {
    pub(crate) config: EngineConfig,
    pub(crate) catalog: Arc<Catalog>,
    pub(crate) labels: Box<dyn Labels>,
    pub(crate) phase: Phase,
    pub(crate) round: u32,
    pub(crate) level: u32,
    pub(crate) edition: Option<String>,
    pub(crate) roster: Vec<Figure>,
    pub(crate) elements: ElementPool,
    pub(crate) scenario: Option<ScenarioData>,
    pub(crate) sections: Vec<SectionData>,
    pub(crate) busy: bool,
    next_figure_id: u64,
    /// Start of the running (not yet folded) play time.
    clock_start: Instant,
    play_time: Duration,
    total_time: Duration,
}

impl Session {
    /// Creates an empty session in Preparation, round 0.
    pub fn new(config: EngineConfig, catalog: Arc<Catalog>) -> Self {
        Self {
            config,
            catalog,
            labels: Box::new(RawLabels),
            phase: Phase::Preparation,
            round: 0,
            level: 1,
            edition: None,
            roster: Vec::new(),
            elements: ElementPool::new(),
            scenario: None,
            sections: Vec::new(),
            busy: false,
            next_figure_id: 1,
            clock_start: Instant::now(),
            play_time: Duration::ZERO,
            total_time: Duration::ZERO,
        }
    }

    /// Replaces the label source used for alphabetical ordering.
    pub fn with_labels(mut self, labels: impl Labels + 'static) -> Self {
        self.labels = Box::new(labels);
        self
    }

    // -- Queries ----------------------------------------------------------

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: EngineConfig) {
        self.config = config;
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// The selected game edition, if any.
    pub fn edition(&self) -> Option<&str> {
        self.edition.as_deref()
    }

    pub fn set_edition(&mut self, edition: Option<String>) {
        self.edition = edition;
    }

    /// The roster in display order.
    pub fn roster(&self) -> &[Figure] {
        &self.roster
    }

    pub fn figure(&self, id: FigureId) -> Option<&Figure> {
        self.roster.iter().find(|f| f.id() == id)
    }

    /// Mutable access for edits outside the turn machinery (health,
    /// standees, summons, titles).
    pub fn figure_mut(&mut self, id: FigureId) -> Result<&mut Figure, EngineError> {
        self.roster
            .iter_mut()
            .find(|f| f.id() == id)
            .ok_or(EngineError::FigureNotInRoster(id))
    }

    /// The figure currently taking its turn.
    pub fn active_figure(&self) -> Option<&Figure> {
        self.roster.iter().find(|f| f.is_active())
    }

    pub fn elements(&self) -> &ElementPool {
        &self.elements
    }

    pub fn scenario(&self) -> Option<&ScenarioData> {
        self.scenario.as_ref()
    }

    pub fn sections(&self) -> &[SectionData] {
        &self.sections
    }

    /// Whether a phase transition was performed and not yet released.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Clears the busy flag set by [`advance_phase`](Self::advance_phase).
    pub fn release_busy(&mut self) {
        self.busy = false;
    }

    /// Play time since the last sample (session start or phase change).
    pub fn session_elapsed(&self) -> Duration {
        self.play_time + self.clock_start.elapsed()
    }

    /// Play time folded in at phase changes.
    pub fn total_elapsed(&self) -> Duration {
        self.total_time
    }

    /// Recommended scenario level: half the average character level,
    /// rounded up. 0 without characters.
    pub fn scenario_level(&self) -> u32 {
        let levels: Vec<u32> = self
            .roster
            .iter()
            .filter_map(Figure::as_character)
            .map(|c| c.level)
            .collect();
        if levels.is_empty() {
            return 0;
        }
        let sum: u32 = levels.iter().sum();
        let count = levels.len() as u32;
        sum.div_ceil(count * 2)
    }

    // -- Roster -----------------------------------------------------------

    /// Adds a character resolved through the catalog. Unknown names still
    /// get a (placeholder-backed) figure.
    pub fn add_character(&mut self, name: &str, edition: &str, level: u32) -> FigureId {
        let data = self.catalog.character_data(name, edition);
        let id = self.allocate_id();
        self.roster.push(Figure::Character(Character::new(id, &data, level)));
        info!(figure = %id, name, level, "character added");
        id
    }

    /// Adds a monster group at the session level. A group of the same
    /// monster already in play is reused.
    pub fn add_monster(&mut self, data: &MonsterData) -> FigureId {
        let existing = self.roster.iter().find_map(|f| {
            f.as_monster()
                .filter(|m| m.name == data.name && m.edition == data.edition)
                .map(|m| m.id)
        });
        if let Some(id) = existing {
            return id;
        }
        let id = self.allocate_id();
        self.roster.push(Figure::Monster(Monster::new(id, data, self.level)));
        info!(figure = %id, name = %data.name, "monster added");
        id
    }

    pub fn add_objective(&mut self, data: &ObjectiveData) -> FigureId {
        let id = self.allocate_id();
        self.roster.push(Figure::Objective(Objective::new(id, data)));
        info!(figure = %id, name = %data.name, escort = data.escort, "objective added");
        id
    }

    /// Sets a figure's initiative: the chosen card for characters, a
    /// manual override for monsters and objectives.
    pub fn set_initiative(&mut self, id: FigureId, initiative: u32) -> Result<(), EngineError> {
        match self.figure_mut(id)? {
            Figure::Character(c) => c.initiative = initiative,
            Figure::Monster(m) => m.initiative = initiative,
            Figure::Objective(o) => o.initiative = initiative,
        }
        debug!(figure = %id, initiative, "initiative set");
        Ok(())
    }

    /// Sets the difficulty level and applies it to every monster group.
    pub fn set_level(&mut self, level: u32) {
        self.level = level;
        for monster in self.roster.iter_mut().filter_map(Figure::as_monster_mut) {
            monster.set_level(level);
        }
        info!(level, "level set");
    }

    // -- Turns and elements -----------------------------------------------

    /// The user clicked figure `id`: advance or rewind the turn pointer.
    ///
    /// Fails without touching anything if the figure is not in the roster.
    pub fn toggle_figure(
        &mut self,
        id: FigureId,
        conditions: &mut dyn ConditionLifecycle,
    ) -> Result<(), EngineError> {
        TurnPointer::new(&self.config, conditions).toggle(&mut self.roster, id)
    }

    /// The user clicked an element token.
    pub fn toggle_element(&mut self, element: Element) -> ElementState {
        let state = self.elements.toggle(element, self.phase);
        debug!(%element, ?state, "element toggled");
        state
    }

    // -- Scenario lifecycle -------------------------------------------------

    /// Starts over for a new scenario: scenario-scoped figures leave,
    /// characters are restored, round and phase reset.
    pub fn reset_round(&mut self) {
        self.clock_start = Instant::now();
        self.play_time = Duration::ZERO;
        self.sections.clear();
        self.round = 0;
        self.phase = Phase::Preparation;
        self.roster.retain(Figure::is_character);
        for character in self.roster.iter_mut().filter_map(Figure::as_character_mut) {
            character.reset();
        }
        info!(characters = self.roster.len(), "round reset");
    }

    /// Selects a scenario. A non-custom scenario resets the round and
    /// places its monsters and objectives; `None` or a custom scenario
    /// only records the selection.
    pub fn set_scenario(&mut self, scenario: Option<ScenarioData>) -> Result<(), EngineError> {
        let Some(scenario) = scenario else {
            self.scenario = None;
            return Ok(());
        };
        if scenario.custom {
            self.scenario = Some(scenario);
            return Ok(());
        }
        let catalog = Arc::clone(&self.catalog);
        let Some(edition) = catalog.edition(&scenario.edition) else {
            error!(edition = %scenario.edition, "no edition data for scenario");
            return Err(EngineError::UnknownEdition(scenario.edition));
        };
        self.reset_round();
        self.apply_content(&catalog, edition, &scenario.monsters, &scenario.objectives);
        info!(scenario = %scenario.index, edition = %scenario.edition, "scenario set");
        self.scenario = Some(scenario);
        Ok(())
    }

    /// Opens a section. Returns `Ok(false)` if it was already open.
    pub fn add_section(&mut self, section: SectionData) -> Result<bool, EngineError> {
        let catalog = Arc::clone(&self.catalog);
        let Some(edition) = catalog.edition(&section.edition) else {
            error!(edition = %section.edition, "no edition data for section");
            return Err(EngineError::UnknownEdition(section.edition));
        };
        if self
            .sections
            .iter()
            .any(|s| s.edition == section.edition && s.index == section.index)
        {
            return Ok(false);
        }
        self.apply_content(&catalog, edition, &section.monsters, &section.objectives);
        info!(section = %section.index, "section added");
        self.sections.push(section);
        Ok(true)
    }

    fn apply_content(
        &mut self,
        catalog: &Catalog,
        edition: &roundkeeper_model::EditionData,
        monsters: &[String],
        objectives: &[ObjectiveData],
    ) {
        for name in monsters {
            match catalog.scenario_monster(name, edition) {
                Some(data) => {
                    self.add_monster(data);
                }
                None => debug!(monster = %name, "scenario monster not in catalog, skipped"),
            }
        }
        for objective in objectives {
            self.add_objective(objective);
        }
    }

    // -- Internals ----------------------------------------------------------

    fn allocate_id(&mut self) -> FigureId {
        let id = FigureId(self.next_figure_id);
        self.next_figure_id += 1;
        id
    }

    /// Folds the running play time into the total and restarts it.
    pub(crate) fn sample_clock(&mut self) {
        let now = Instant::now();
        self.play_time += now.saturating_duration_since(self.clock_start);
        self.total_time += self.play_time;
        self.play_time = Duration::ZERO;
        self.clock_start = now;
    }
}

#[cfg(test)]
mod tests {
    use roundkeeper_model::{CharacterData, EditionData};

    use super::*;

    fn session() -> Session {
        let gh = EditionData {
            edition: "gh".into(),
            characters: vec![
                CharacterData::new("brute", "gh", 10),
                CharacterData::new("tinkerer", "gh", 8),
            ],
            monsters: vec![MonsterData::new("bandit-guard", "gh")],
            ..EditionData::default()
        };
        Session::new(EngineConfig::default(), Arc::new(Catalog::new(vec![gh])))
    }

    #[test]
    fn test_new_session_starts_in_preparation_round_zero() {
        let s = session();
        assert_eq!(s.phase(), Phase::Preparation);
        assert_eq!(s.round(), 0);
        assert!(s.roster().is_empty());
        assert!(!s.is_busy());
    }

    #[test]
    fn test_add_character_assigns_unique_ids() {
        let mut s = session();
        let a = s.add_character("brute", "gh", 1);
        let b = s.add_character("tinkerer", "gh", 1);
        assert_ne!(a, b);
        assert_eq!(s.figure(a).unwrap().name(), "brute");
    }

    #[test]
    fn test_add_monster_reuses_existing_group() {
        let mut s = session();
        let data = MonsterData::new("bandit-guard", "gh");
        let first = s.add_monster(&data);
        let second = s.add_monster(&data);
        assert_eq!(first, second);
        assert_eq!(s.roster().len(), 1);
    }

    #[test]
    fn test_scenario_level_rounds_up_half_average() {
        let mut s = session();
        assert_eq!(s.scenario_level(), 0);
        s.add_character("brute", "gh", 3);
        s.add_character("tinkerer", "gh", 2);
        // avg 2.5 / 2 = 1.25 → 2
        assert_eq!(s.scenario_level(), 2);
    }

    #[test]
    fn test_set_level_propagates_to_monsters_and_entities() {
        let mut s = session();
        let id = s.add_monster(&MonsterData::new("bandit-guard", "gh"));
        if let Figure::Monster(m) = s.figure_mut(id).unwrap() {
            m.entities.push(roundkeeper_model::MonsterEntity::new(
                1,
                roundkeeper_model::MonsterType::Elite,
                9,
                1,
            ));
        }
        s.set_level(4);
        let m = s.figure(id).unwrap().as_monster().unwrap();
        assert_eq!(m.level, 4);
        assert_eq!(m.entities[0].level, 4);
    }

    #[test]
    fn test_set_initiative_unknown_figure_errors() {
        let mut s = session();
        let err = s.set_initiative(FigureId(99), 10).unwrap_err();
        assert_eq!(err, EngineError::FigureNotInRoster(FigureId(99)));
    }

    #[test]
    fn test_toggle_element_uses_current_phase() {
        let mut s = session();
        assert_eq!(s.toggle_element(Element::Fire), ElementState::Pending);
        s.phase = Phase::Execution;
        assert_eq!(s.toggle_element(Element::Ice), ElementState::Waning);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sample_clock_folds_running_time_into_total() {
        let mut s = session();
        tokio::time::advance(Duration::from_secs(90)).await;
        assert_eq!(s.session_elapsed(), Duration::from_secs(90));
        s.sample_clock();
        assert_eq!(s.total_elapsed(), Duration::from_secs(90));
        assert_eq!(s.session_elapsed(), Duration::ZERO);

        tokio::time::advance(Duration::from_secs(30)).await;
        s.sample_clock();
        assert_eq!(s.total_elapsed(), Duration::from_secs(120));
    }
}
