//! Phase-dependent roster ordering.
//!
//! - **Preparation**: characters first, then monster groups (larger groups
//!   first), then objectives; ties by case-insensitive display name.
//! - **Execution**: ascending priority, stable for equal priorities.
//!
//! Both orders are total, so sorting an already sorted roster is a no-op.

use std::cmp::Reverse;

use roundkeeper_model::Figure;

use crate::{Labels, Phase};

/// Sorts the roster in place for `phase`.
pub fn sort_roster(roster: &mut [Figure], phase: Phase, labels: &dyn Labels) {
    match phase {
        Phase::Preparation => roster.sort_by_cached_key(|f| {
            let group_size = f.as_monster().map_or(0, |m| m.entities.len());
            (kind_rank(f), Reverse(group_size), display_name(f, labels))
        }),
        Phase::Execution => roster.sort_by_key(Figure::priority),
    }
}

/// Lower-cased name used for alphabetical ordering.
///
/// The player-given title wins; otherwise the localized content name.
/// Unnamed objectives fall back to the generic `escort` / `objective`
/// labels.
pub fn display_name(figure: &Figure, labels: &dyn Labels) -> String {
    if let Some(title) = figure.title() {
        return title.to_lowercase();
    }
    let name = match figure {
        Figure::Character(c) => labels.label(&format!("data.character.{}", c.name)),
        Figure::Monster(m) => labels.label(&format!("data.monster.{}", m.name)),
        Figure::Objective(o) if !o.name.is_empty() => {
            labels.label(&format!("data.objective.{}", o.name))
        }
        Figure::Objective(o) if o.escort => labels.label("escort"),
        Figure::Objective(_) => labels.label("objective"),
    };
    name.to_lowercase()
}

/// Objectives rank as their own kind instead of interleaving with
/// characters and monsters by name, so the preparation order stays total.
fn kind_rank(figure: &Figure) -> u8 {
    match figure {
        Figure::Character(_) => 0,
        Figure::Monster(_) => 1,
        Figure::Objective(_) => 2,
    }
}
