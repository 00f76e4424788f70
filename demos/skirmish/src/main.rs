use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use roundkeeper::prelude::*;

const EDITIONS: &str = include_str!("../content/editions.json");

// ---------------------------------------------------------------------------
// Collaborators
// ---------------------------------------------------------------------------

/// Places standees in monster groups that have none when a round starts.
struct SpawnStandees {
    per_group: u32,
}

impl RosterCollaborator for SpawnStandees {
    fn name(&self) -> &str {
        "standees"
    }

    fn draw(&mut self, roster: &mut [Figure]) {
        for monster in roster.iter_mut().filter_map(Figure::as_monster_mut) {
            if !monster.entities.is_empty() {
                continue;
            }
            for number in 1..=self.per_group {
                // The last standee of each group is an elite.
                let kind = if number == self.per_group {
                    MonsterType::Elite
                } else {
                    MonsterType::Normal
                };
                let mut entity = MonsterEntity::new(number, kind, 5, monster.level);
                if kind == MonsterType::Elite {
                    let mut strengthen = EntityCondition::new("strengthen", 0);
                    strengthen.state = ConditionState::Expire;
                    entity.conditions.push(strengthen);
                }
                monster.entities.push(entity);
            }
            tracing::debug!(monster = %monster.name, standees = self.per_group, "standees placed");
        }
    }

    fn advance(&mut self, _roster: &mut [Figure]) {}
}

/// Draws one ability card per monster group; its initiative orders the group.
struct MonsterDecks {
    catalog: Arc<Catalog>,
    rng: StdRng,
}

impl RosterCollaborator for MonsterDecks {
    fn name(&self) -> &str {
        "monster-decks"
    }

    fn draw(&mut self, roster: &mut [Figure]) {
        for monster in roster.iter_mut().filter_map(Figure::as_monster_mut) {
            let mut data = self.catalog.monster_data(&monster.name, &monster.edition);
            let deck = self.catalog.monster_deck(&mut data);
            if deck.abilities.is_empty() {
                continue;
            }
            let card = &deck.abilities[self.rng.random_range(0..deck.abilities.len())];
            monster.initiative = card.initiative;
            tracing::debug!(monster = %monster.name, initiative = card.initiative, "ability drawn");
        }
    }

    fn advance(&mut self, roster: &mut [Figure]) {
        for monster in roster.iter_mut().filter_map(Figure::as_monster_mut) {
            monster.initiative = 0;
        }
    }
}

/// Characters pick a new card every round.
struct CharacterCards;

impl RosterCollaborator for CharacterCards {
    fn name(&self) -> &str {
        "character-cards"
    }

    fn draw(&mut self, _roster: &mut [Figure]) {}

    fn advance(&mut self, roster: &mut [Figure]) {
        for character in roster.iter_mut().filter_map(Figure::as_character_mut) {
            character.initiative = 0;
        }
    }
}

/// Only handles expiry: effects marked to expire are removed at turn end
/// and brought back when that turn is undone.
struct ExpiringConditions;

impl ConditionLifecycle for ExpiringConditions {
    fn restore_suppressed(&mut self, target: &mut dyn Afflicted) {
        for condition in target.conditions_mut().iter_mut().filter(|c| c.expired) {
            condition.state = ConditionState::Expire;
            condition.expired = false;
        }
    }

    fn unapply_turn_scoped(&mut self, _target: &mut dyn Afflicted) {}

    fn unapply_post_turn(&mut self, _target: &mut dyn Afflicted) {}

    fn apply_turn_scoped(&mut self, _target: &mut dyn Afflicted) {}

    fn apply_post_turn(&mut self, _target: &mut dyn Afflicted) {}

    fn expire(&mut self, target: &mut dyn Afflicted) {
        let label = target.label();
        for condition in target
            .conditions_mut()
            .iter_mut()
            .filter(|c| c.state == ConditionState::Expire)
        {
            condition.state = ConditionState::Removed;
            condition.expired = true;
            tracing::debug!(entity = %label, condition = %condition.name, "condition expired");
        }
    }
}

// ---------------------------------------------------------------------------
// Skirmish script
// ---------------------------------------------------------------------------

/// Plays `rounds` full rounds of the first scenario and returns the final
/// table state.
async fn run_skirmish(
    catalog: Arc<Catalog>,
    rounds: u32,
    seed: u64,
) -> Result<TableSnapshot, RoundkeeperError> {
    let mut tables = TableManager::new(Arc::clone(&catalog), TableConfig::default());
    let id = tables.create_table(Collaborators {
        rosters: vec![
            Box::new(SpawnStandees { per_group: 2 }),
            Box::new(MonsterDecks {
                catalog: Arc::clone(&catalog),
                rng: StdRng::seed_from_u64(seed),
            }),
            Box::new(CharacterCards),
        ],
        conditions: Box::new(ExpiringConditions),
    });
    let table = tables.get(id)?;

    let heroes = [
        table.add_character("brute", "gh", 2).await?,
        table.add_character("spellweaver", "gh", 2).await?,
    ];
    let scenario = catalog.scenarios(Some("gh")).next().cloned();
    table.set_scenario(scenario).await?;
    if let Some(section) = catalog.sections(Some("gh")).next().cloned() {
        table.add_section(section).await?;
    }
    let level = table.snapshot().await?.scenario_level;
    table.set_level(level).await?;

    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(1));
    for _ in 0..rounds {
        for hero in heroes {
            table.set_initiative(hero, rng.random_range(1..=99)).await?;
        }

        let transition = table.advance_phase().await?;
        tracing::info!(?transition, "round started");

        // Someone infuses fire whenever the token is free.
        if table.snapshot().await?.elements.state(Element::Fire) == ElementState::Inert {
            table.toggle_element(Element::Fire).await?;
        }

        while let Some(active) = table.snapshot().await?.active {
            table.toggle_figure(active).await?;
        }

        table.advance_phase().await?;
    }

    let summary = table.snapshot().await?;
    tables.destroy_table(id).await?;
    Ok(summary)
}

#[tokio::main]
async fn main() -> Result<(), RoundkeeperError> {
    roundkeeper::logging::init();

    let catalog = Arc::new(roundkeeper::content::catalog_from_json(EDITIONS)?);
    let summary = run_skirmish(catalog, 3, 7).await?;

    tracing::info!(
        round = summary.round,
        figures = summary.roster.len(),
        "skirmish finished"
    );
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
