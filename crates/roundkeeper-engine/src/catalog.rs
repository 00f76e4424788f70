//! Loaded content and lookups against it.
//!
//! Lookups never fail. A name that does not resolve is logged and
//! replaced by a placeholder definition tagged with a [`FigureError`], so
//! a session built from incomplete data stays playable and the gap shows
//! up on the figure instead of as a crash.

use roundkeeper_model::{
    CharacterData, DeckData, EditionData, FigureError, MonsterData, ScenarioData, SectionData,
};
use tracing::error;

/// All loaded editions.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    editions: Vec<EditionData>,
}

impl Catalog {
    pub fn new(editions: Vec<EditionData>) -> Self {
        Self { editions }
    }

    /// Names of every loaded edition.
    pub fn editions(&self) -> Vec<&str> {
        self.editions.iter().map(|e| e.edition.as_str()).collect()
    }

    pub fn edition(&self, edition: &str) -> Option<&EditionData> {
        self.editions.iter().find(|e| e.edition == edition)
    }

    /// Editions declared as usable alongside `edition`.
    pub fn extensions(&self, edition: &str) -> &[String] {
        self.edition(edition)
            .map_or(&[][..], |e| e.extensions.as_slice())
    }

    /// The editions in play: everything when no edition is selected,
    /// otherwise the selected edition followed by its extensions.
    pub fn current_editions(&self, selected: Option<&str>) -> Vec<String> {
        match selected {
            None => self.editions().into_iter().map(String::from).collect(),
            Some(edition) => std::iter::once(edition.to_string())
                .chain(self.extensions(edition).iter().cloned())
                .collect(),
        }
    }

    /// Characters available with `selected` as the game edition: those of
    /// the edition itself or of any edition that extends it.
    pub fn characters<'a>(
        &'a self,
        selected: Option<&'a str>,
    ) -> impl Iterator<Item = &'a CharacterData> {
        self.in_scope(selected).flat_map(|e| e.characters.iter())
    }

    pub fn monsters<'a>(
        &'a self,
        selected: Option<&'a str>,
    ) -> impl Iterator<Item = &'a MonsterData> {
        self.in_scope(selected).flat_map(|e| e.monsters.iter())
    }

    pub fn scenarios<'a>(
        &'a self,
        selected: Option<&'a str>,
    ) -> impl Iterator<Item = &'a ScenarioData> {
        self.in_scope(selected).flat_map(|e| e.scenarios.iter())
    }

    pub fn sections<'a>(
        &'a self,
        selected: Option<&'a str>,
    ) -> impl Iterator<Item = &'a SectionData> {
        self.in_scope(selected).flat_map(|e| e.sections.iter())
    }

    /// Resolves a character definition.
    ///
    /// Prefers an exact edition match, then the same name in any edition,
    /// then a placeholder tagged [`FigureError::Unknown`].
    pub fn character_data(&self, name: &str, edition: &str) -> CharacterData {
        let all = || self.editions.iter().flat_map(|e| e.characters.iter());
        if let Some(data) = all().find(|c| c.name == name && c.edition == edition) {
            return data.clone();
        }
        error!(name, edition, "unknown character");
        match all().find(|c| c.name == name) {
            Some(data) => data.clone(),
            None => CharacterData {
                stats: Vec::new(),
                errors: vec![FigureError::Unknown],
                ..CharacterData::new(name, edition, 0)
            },
        }
    }

    /// Resolves a monster definition, with the same fallbacks as
    /// [`character_data`](Self::character_data).
    pub fn monster_data(&self, name: &str, edition: &str) -> MonsterData {
        let all = || self.editions.iter().flat_map(|e| e.monsters.iter());
        if let Some(data) = all().find(|m| m.name == name && m.edition == edition) {
            return data.clone();
        }
        error!(name, edition, "unknown monster");
        match all().find(|m| m.name == name) {
            Some(data) => data.clone(),
            None => MonsterData {
                errors: vec![FigureError::Unknown],
                ..MonsterData::new(name, edition)
            },
        }
    }

    /// The monster named `name` usable in `edition` (the edition itself or
    /// one of its extensions). Unlike the lookups above this does not fall
    /// back: scenario content only places monsters it can find.
    pub fn scenario_monster(&self, name: &str, edition: &EditionData) -> Option<&MonsterData> {
        self.editions
            .iter()
            .flat_map(|e| e.monsters.iter())
            .find(|m| {
                m.name == name
                    && (m.edition == edition.edition || edition.extensions.contains(&m.edition))
            })
    }

    /// The ability deck for a character, tagging the definition with
    /// [`FigureError::Deck`] and returning an empty deck when missing.
    pub fn character_deck(&self, data: &mut CharacterData) -> DeckData {
        let found = self.find_deck(&data.name, &data.deck, &data.edition).cloned();
        found.unwrap_or_else(|| Self::missing_deck(&data.name, &data.deck, &data.edition, &mut data.errors))
    }

    /// The ability deck for a monster; see [`character_deck`](Self::character_deck).
    pub fn monster_deck(&self, data: &mut MonsterData) -> DeckData {
        let found = self.find_deck(&data.name, &data.deck, &data.edition).cloned();
        found.unwrap_or_else(|| Self::missing_deck(&data.name, &data.deck, &data.edition, &mut data.errors))
    }

    /// A deck matches by its own name (or the figure's name) in the
    /// figure's edition, falling back to that edition's extensions.
    fn find_deck(&self, name: &str, deck: &str, edition: &str) -> Option<&DeckData> {
        let named = |d: &&DeckData| d.name == deck || d.name == name;
        let all = || self.editions.iter().flat_map(|e| e.decks.iter());
        all()
            .filter(named)
            .find(|d| d.edition == edition)
            .or_else(|| {
                let extensions = self.extensions(edition);
                all().filter(named).find(|d| extensions.contains(&d.edition))
            })
    }

    fn missing_deck(name: &str, deck: &str, edition: &str, errors: &mut Vec<FigureError>) -> DeckData {
        error!(name, deck, edition, "unknown deck");
        if !errors.contains(&FigureError::Deck) {
            errors.push(FigureError::Deck);
        }
        DeckData {
            name: String::new(),
            edition: String::new(),
            abilities: Vec::new(),
        }
    }

    fn in_scope<'a>(&'a self, selected: Option<&'a str>) -> impl Iterator<Item = &'a EditionData> {
        self.editions.iter().filter(move |e| match selected {
            None => true,
            Some(edition) => {
                e.edition == edition || e.extensions.iter().any(|x| x == edition)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use roundkeeper_model::Ability;

    use super::*;

    fn catalog() -> Catalog {
        let gh = EditionData {
            edition: "gh".into(),
            characters: vec![CharacterData::new("brute", "gh", 10)],
            monsters: vec![MonsterData::new("bandit-guard", "gh")],
            decks: vec![DeckData {
                name: "brute".into(),
                edition: "gh".into(),
                abilities: vec![Ability { initiative: 61, shuffle: false }],
            }],
            ..EditionData::default()
        };
        let fc = EditionData {
            edition: "fc".into(),
            extensions: vec!["gh".into()],
            characters: vec![CharacterData::new("diviner", "fc", 6)],
            monsters: vec![MonsterData::new("lurker-mindsnipper", "fc")],
            ..EditionData::default()
        };
        Catalog::new(vec![gh, fc])
    }

    #[test]
    fn test_character_data_exact_match() {
        let data = catalog().character_data("brute", "gh");
        assert_eq!(data.edition, "gh");
        assert!(data.errors.is_empty());
    }

    #[test]
    fn test_character_data_falls_back_to_any_edition() {
        let data = catalog().character_data("brute", "jotl");
        assert_eq!(data.edition, "gh");
        assert!(data.errors.is_empty());
    }

    #[test]
    fn test_character_data_unknown_returns_placeholder() {
        let data = catalog().character_data("nobody", "gh");
        assert_eq!(data.name, "nobody");
        assert_eq!(data.errors, vec![FigureError::Unknown]);
        assert_eq!(data.max_health(1), 0);
    }

    #[test]
    fn test_monster_data_unknown_returns_placeholder() {
        let data = catalog().monster_data("dragon", "gh");
        assert_eq!(data.errors, vec![FigureError::Unknown]);
    }

    #[test]
    fn test_scenario_monster_respects_extensions() {
        let catalog = catalog();
        let fc = catalog.edition("fc").unwrap();
        assert!(catalog.scenario_monster("bandit-guard", fc).is_some());
        let gh = catalog.edition("gh").unwrap();
        assert!(catalog.scenario_monster("lurker-mindsnipper", gh).is_none());
    }

    #[test]
    fn test_current_editions() {
        let catalog = catalog();
        assert_eq!(catalog.current_editions(None), vec!["gh", "fc"]);
        assert_eq!(catalog.current_editions(Some("fc")), vec!["fc", "gh"]);
    }

    #[test]
    fn test_characters_filtered_by_selected_edition() {
        let catalog = catalog();
        let names: Vec<_> = catalog.characters(Some("gh")).map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["brute", "diviner"]);
        let names: Vec<_> = catalog.characters(Some("fc")).map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["diviner"]);
    }

    #[test]
    fn test_character_deck_found_by_name() {
        let mut data = catalog().character_data("brute", "gh");
        let deck = catalog().character_deck(&mut data);
        assert_eq!(deck.abilities.len(), 1);
        assert!(data.errors.is_empty());
    }

    #[test]
    fn test_monster_deck_missing_tags_error_once() {
        let catalog = catalog();
        let mut data = catalog.monster_data("bandit-guard", "gh");
        let deck = catalog.monster_deck(&mut data);
        assert!(deck.abilities.is_empty());
        catalog.monster_deck(&mut data);
        assert_eq!(data.errors, vec![FigureError::Deck]);
    }
}
