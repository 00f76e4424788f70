//! Identity and token types shared by every layer.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a figure in a session's roster.
///
/// Assigned by the session when the figure is added and never reused
/// within that session. Turn-pointer operations address figures by id
/// rather than by position, because positions change on every re-sort.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct FigureId(pub u64);

impl fmt::Display for FigureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "F-{}", self.0)
    }
}

/// Identifies one running table (a session plus its actor) on a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableId(pub u64);

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Element: the shared token types
// ---------------------------------------------------------------------------

/// One of the six infusable element types.
///
/// Elements have no identity beyond their type: there is exactly one
/// token per variant, and the pool tracks which lifecycle position each
/// token is in.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Fire,
    Ice,
    Air,
    Earth,
    Light,
    Dark,
}

impl Element {
    /// Every element, in board order.
    pub const ALL: [Element; 6] = [
        Element::Fire,
        Element::Ice,
        Element::Air,
        Element::Earth,
        Element::Light,
        Element::Dark,
    ];

    /// Position of this element in [`Element::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Fire => "fire",
            Self::Ice => "ice",
            Self::Air => "air",
            Self::Earth => "earth",
            Self::Light => "light",
            Self::Dark => "dark",
        };
        f.write_str(name)
    }
}
