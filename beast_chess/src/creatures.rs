use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the two competing sides.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Starts on the high rows and moves first by default.
    South,
    /// Starts on the low rows.
    North,
}

impl Side {
    /// Both sides, in the fixed order used whenever the engine iterates over sides.
    pub const ALL: [Side; 2] = [Side::South, Side::North];

    pub fn opponent(self) -> Side {
        match self {
            Side::South => Side::North,
            Side::North => Side::South,
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::South => write!(f, "south"),
            Side::North => write!(f, "north"),
        }
    }
}

/// The kind of beast a piece is. Its movement comes from [`CreatureType::move_rule()`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreatureType {
    Lion,
    Eagle,
    Wolf,
    Bear,
    Snake,
    Fox,
    Frog,
}

impl CreatureType {
    pub const ALL: [CreatureType; 7] = [
        CreatureType::Lion,
        CreatureType::Eagle,
        CreatureType::Wolf,
        CreatureType::Bear,
        CreatureType::Snake,
        CreatureType::Fox,
        CreatureType::Frog,
    ];

    /// Losing this creature loses the match.
    pub fn is_leader(self) -> bool {
        self == CreatureType::Lion
    }

    /// A single letter for text output, upper case for [`Side::South`].
    pub fn glyph(self, side: Side) -> char {
        let c = match self {
            CreatureType::Lion => 'L',
            CreatureType::Eagle => 'E',
            CreatureType::Wolf => 'W',
            CreatureType::Bear => 'B',
            CreatureType::Snake => 'S',
            CreatureType::Fox => 'F',
            CreatureType::Frog => 'G',
        };
        match side {
            Side::South => c,
            Side::North => c.to_ascii_lowercase(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CreatureType::Lion => "lion",
            CreatureType::Eagle => "eagle",
            CreatureType::Wolf => "wolf",
            CreatureType::Bear => "bear",
            CreatureType::Snake => "snake",
            CreatureType::Fox => "fox",
            CreatureType::Frog => "frog",
        }
    }
}

impl std::fmt::Display for CreatureType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The error type for the [`FromStr`] instance of [`CreatureType`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownCreature(pub String);

impl std::error::Error for UnknownCreature {}

impl std::fmt::Display for UnknownCreature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "'{}' is not a creature type", self.0)
    }
}

impl FromStr for CreatureType {
    type Err = UnknownCreature;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CreatureType::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownCreature(String::from(s)))
    }
}

/// Starting stats for one creature type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatureStats {
    pub health: u16,
    #[serde(default)]
    pub armor: u16,
}

/// Per-creature starting stats. Creatures missing from the map use the built-in values.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatsTable(pub BTreeMap<CreatureType, CreatureStats>);

impl StatsTable {
    pub fn stats_for(&self, creature: CreatureType) -> CreatureStats {
        self.0
            .get(&creature)
            .copied()
            .unwrap_or_else(|| default_stats(creature))
    }
}

fn default_stats(creature: CreatureType) -> CreatureStats {
    let health = match creature {
        CreatureType::Lion => 20,
        CreatureType::Eagle => 12,
        CreatureType::Wolf => 15,
        CreatureType::Bear => 25,
        CreatureType::Snake => 10,
        CreatureType::Fox => 8,
        CreatureType::Frog => 10,
    };
    CreatureStats { health, armor: 0 }
}
