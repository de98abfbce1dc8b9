//! Potion ingredients.

use serde::{Deserialize, Serialize};

/// An ingredient kind. `Wild` substitutes for any other kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Ingredient {
    Hellebore,
    Moonstone,
    Bezoar,
    Wolfsbane,
    Lacewing,
    Wild,
}

impl Ingredient {
    /// Every kind except `Wild`.
    pub const SPECIFIC: [Ingredient; 5] = [
        Ingredient::Hellebore,
        Ingredient::Moonstone,
        Ingredient::Bezoar,
        Ingredient::Wolfsbane,
        Ingredient::Lacewing,
    ];

    #[must_use]
    pub const fn is_wild(self) -> bool {
        matches!(self, Ingredient::Wild)
    }
}

impl std::fmt::Display for Ingredient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Ingredient::Hellebore => "hellebore",
            Ingredient::Moonstone => "moonstone",
            Ingredient::Bezoar => "bezoar",
            Ingredient::Wolfsbane => "wolfsbane",
            Ingredient::Lacewing => "lacewing",
            Ingredient::Wild => "wild",
        };
        f.write_str(name)
    }
}
