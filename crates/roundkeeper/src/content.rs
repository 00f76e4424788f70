//! Loading content definitions from JSON.
//!
//! Content is a list of editions, each carrying its characters, monsters,
//! decks, scenarios, and sections. Optional fields may be omitted.

use roundkeeper_engine::Catalog;
use roundkeeper_model::EditionData;

use crate::RoundkeeperError;

/// Parses one edition.
pub fn edition_from_json(json: &str) -> Result<EditionData, RoundkeeperError> {
    Ok(serde_json::from_str(json)?)
}

/// Parses a JSON array of editions into a catalog.
pub fn catalog_from_json(json: &str) -> Result<Catalog, RoundkeeperError> {
    let editions: Vec<EditionData> = serde_json::from_str(json)?;
    tracing::info!(
        editions = editions.len(),
        characters = editions.iter().map(|e| e.characters.len()).sum::<usize>(),
        monsters = editions.iter().map(|e| e.monsters.len()).sum::<usize>(),
        "content loaded"
    );
    Ok(Catalog::new(editions))
}
