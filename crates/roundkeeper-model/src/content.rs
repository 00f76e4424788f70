//! Loaded content definitions.
//!
//! These are the shapes game data arrives in. Reading them from disk is
//! somebody else's job; the session only consumes already-deserialized
//! values. Every type derives `Deserialize` with defaults for optional
//! fields, so partial data files deserialize cleanly.

use serde::{Deserialize, Serialize};

/// Problems found while resolving a definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FigureError {
    /// The named character or monster does not exist in any edition.
    /// A placeholder definition was substituted.
    Unknown,
    /// The figure's ability deck could not be found.
    Deck,
}

/// Maximum health of a character at one level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterStat {
    pub level: u32,
    pub health: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterData {
    pub name: String,
    #[serde(default)]
    pub edition: String,
    #[serde(default)]
    pub stats: Vec<CharacterStat>,
    /// Ability deck name; empty means the deck shares the character's name.
    #[serde(default)]
    pub deck: String,
    #[serde(default)]
    pub errors: Vec<FigureError>,
}

impl CharacterData {
    /// A definition with the same maximum health at every level.
    pub fn new(name: impl Into<String>, edition: impl Into<String>, health: i32) -> Self {
        Self {
            name: name.into(),
            edition: edition.into(),
            stats: vec![CharacterStat { level: 1, health }],
            deck: String::new(),
            errors: Vec::new(),
        }
    }

    /// Maximum health at `level`: the stat for the highest defined level
    /// not above it, falling back to the first stat, or 0 without stats.
    pub fn max_health(&self, level: u32) -> i32 {
        self.stats
            .iter()
            .filter(|s| s.level <= level)
            .max_by_key(|s| s.level)
            .or_else(|| self.stats.first())
            .map_or(0, |s| s.health)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonsterData {
    pub name: String,
    #[serde(default)]
    pub edition: String,
    #[serde(default)]
    pub deck: String,
    #[serde(default)]
    pub boss: bool,
    #[serde(default)]
    pub errors: Vec<FigureError>,
}

impl MonsterData {
    pub fn new(name: impl Into<String>, edition: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            edition: edition.into(),
            deck: String::new(),
            boss: false,
            errors: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectiveData {
    #[serde(default)]
    pub name: String,
    pub health: i32,
    #[serde(default)]
    pub escort: bool,
    #[serde(default)]
    pub initiative: u32,
}

impl ObjectiveData {
    pub fn new(name: impl Into<String>, health: i32) -> Self {
        Self {
            name: name.into(),
            health,
            escort: false,
            initiative: 0,
        }
    }
}

/// One ability card. Only the initiative matters for turn order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ability {
    pub initiative: u32,
    #[serde(default)]
    pub shuffle: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckData {
    pub name: String,
    #[serde(default)]
    pub edition: String,
    #[serde(default)]
    pub abilities: Vec<Ability>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioData {
    pub index: String,
    #[serde(default)]
    pub name: String,
    pub edition: String,
    /// Names of the monster types that appear.
    #[serde(default)]
    pub monsters: Vec<String>,
    #[serde(default)]
    pub objectives: Vec<ObjectiveData>,
    /// A user-defined scenario with no backing edition content.
    #[serde(default)]
    pub custom: bool,
}

/// A section unlocked mid-scenario; adds more monsters and objectives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionData {
    pub index: String,
    #[serde(default)]
    pub name: String,
    pub edition: String,
    #[serde(default)]
    pub monsters: Vec<String>,
    #[serde(default)]
    pub objectives: Vec<ObjectiveData>,
}

/// All content of one edition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditionData {
    pub edition: String,
    /// Editions whose content may be used alongside this one.
    #[serde(default)]
    pub extensions: Vec<String>,
    #[serde(default)]
    pub characters: Vec<CharacterData>,
    #[serde(default)]
    pub monsters: Vec<MonsterData>,
    #[serde(default)]
    pub decks: Vec<DeckData>,
    #[serde(default)]
    pub scenarios: Vec<ScenarioData>,
    #[serde(default)]
    pub sections: Vec<SectionData>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_health_picks_highest_level_not_above() {
        let data = CharacterData {
            stats: vec![
                CharacterStat { level: 1, health: 10 },
                CharacterStat { level: 2, health: 12 },
                CharacterStat { level: 3, health: 14 },
            ],
            ..CharacterData::new("brute", "gh", 0)
        };
        assert_eq!(data.max_health(2), 12);
        assert_eq!(data.max_health(9), 14);
        assert_eq!(data.max_health(0), 10);
    }

    #[test]
    fn test_max_health_without_stats_is_zero() {
        let data = CharacterData {
            stats: Vec::new(),
            ..CharacterData::new("ghost", "gh", 0)
        };
        assert_eq!(data.max_health(4), 0);
    }

    #[test]
    fn test_edition_deserializes_with_defaults() {
        let json = r#"{
            "edition": "gh",
            "monsters": [{ "name": "bandit-guard" }],
            "scenarios": [{ "index": "1", "edition": "gh", "monsters": ["bandit-guard"] }]
        }"#;
        let edition: EditionData = serde_json::from_str(json).unwrap();
        assert_eq!(edition.edition, "gh");
        assert!(edition.extensions.is_empty());
        assert_eq!(edition.monsters[0].name, "bandit-guard");
        assert!(!edition.scenarios[0].custom);
        assert!(edition.scenarios[0].objectives.is_empty());
    }
}
