use std::collections::BTreeSet;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::{
    default_deck, default_max_shrink_level, Card, CreatureType, Placement, SetupError,
    ShrinkPattern, Side, Square, StatsTable, MAX_BOARD_SIZE, MIN_BOARD_SIZE,
};

/// Everything that can be tuned about a match.
///
/// Every field has a default, so a config file only needs to mention what it changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub width: i8,
    pub height: i8,
    pub shrink_pattern: ShrinkPattern,
    /// Accepted moves between two shrink ticks.
    pub shrink_interval: u16,
    /// Defaults to [`default_max_shrink_level()`] for the board size.
    pub max_shrink_level: Option<u8>,
    /// Damage taken by a piece whose cell is deactivated under it.
    pub collapse_damage: u16,
    /// Damage taken every turn by a piece standing outside the playable area.
    pub out_of_bounds_damage: u16,
    /// Sample size for [`ShrinkPattern::Random`].
    pub random_shrink_cells: usize,
    pub stats: StatsTable,
    /// Explicit starting positions. The built-in layout is used if omitted.
    pub layout: Option<Vec<Placement>>,
    pub first_side: Side,
    /// Seeds every random decision of the match.
    pub seed: u64,
    pub hand_size: usize,
    pub deck: Vec<Card>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            width: 8,
            height: 8,
            shrink_pattern: ShrinkPattern::OuterRing,
            shrink_interval: 3,
            max_shrink_level: None,
            collapse_damage: 15,
            out_of_bounds_damage: 5,
            random_shrink_cells: 6,
            stats: StatsTable::default(),
            layout: None,
            first_side: Side::South,
            seed: 0,
            hand_size: 3,
            deck: default_deck(),
        }
    }
}

impl MatchConfig {
    /// Reads a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read match config '{}'", path.display()))?;
        let config: MatchConfig = serde_json::from_str(&contents)
            .with_context(|| format!("Could not parse match config '{}'", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SetupError> {
        let valid_size = MIN_BOARD_SIZE..=MAX_BOARD_SIZE;
        if !valid_size.contains(&self.width) || !valid_size.contains(&self.height) {
            return Err(SetupError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.shrink_interval == 0 {
            return Err(SetupError::ZeroShrinkInterval);
        }
        if self.out_of_bounds_damage == 0 {
            return Err(SetupError::ZeroOutOfBoundsDamage);
        }
        if let Some(creature) = CreatureType::ALL
            .into_iter()
            .find(|&c| self.stats.stats_for(c).health == 0)
        {
            return Err(SetupError::ZeroHealth { creature });
        }
        if self.hand_size > 0 && self.deck.is_empty() {
            return Err(SetupError::EmptyDeck);
        }
        let mut seen = BTreeSet::new();
        for placement in self.placements()? {
            let square = placement.at;
            if !(0..self.width).contains(&square.x) || !(0..self.height).contains(&square.y) {
                return Err(SetupError::SquareOutsideGrid { square });
            }
            if !seen.insert(square) {
                return Err(SetupError::SquareOccupied { square });
            }
        }
        Ok(())
    }

    pub fn max_shrink_level(&self) -> u8 {
        self.max_shrink_level
            .unwrap_or_else(|| default_max_shrink_level(self.width, self.height))
    }

    /// The starting positions, either the configured ones or the built-in layout.
    pub fn placements(&self) -> Result<Vec<Placement>, SetupError> {
        match &self.layout {
            Some(layout) => Ok(layout.clone()),
            None => default_layout(self.width, self.height),
        }
    }
}

const BACK_ROW_SOUTH: [CreatureType; 8] = [
    CreatureType::Wolf,
    CreatureType::Snake,
    CreatureType::Bear,
    CreatureType::Lion,
    CreatureType::Fox,
    CreatureType::Bear,
    CreatureType::Snake,
    CreatureType::Wolf,
];
const BACK_ROW_NORTH: [CreatureType; 8] = [
    CreatureType::Wolf,
    CreatureType::Snake,
    CreatureType::Bear,
    CreatureType::Fox,
    CreatureType::Lion,
    CreatureType::Bear,
    CreatureType::Snake,
    CreatureType::Wolf,
];
const FRONT_ROW: [CreatureType; 8] = [
    CreatureType::Fox,
    CreatureType::Fox,
    CreatureType::Fox,
    CreatureType::Eagle,
    CreatureType::Eagle,
    CreatureType::Fox,
    CreatureType::Fox,
    CreatureType::Fox,
];

/// Two rows of pieces per side, North at the top and South at the bottom.
///
/// Only fits boards with 8 columns and at least 4 rows.
pub fn default_layout(width: i8, height: i8) -> Result<Vec<Placement>, SetupError> {
    if width != 8 || height < 4 {
        return Err(SetupError::DefaultLayoutDoesNotFit { width, height });
    }
    let rows = [
        (0, Side::North, &BACK_ROW_NORTH),
        (1, Side::North, &FRONT_ROW),
        (height - 2, Side::South, &FRONT_ROW),
        (height - 1, Side::South, &BACK_ROW_SOUTH),
    ];
    let mut placements = Vec::with_capacity(32);
    for (y, side, row) in rows {
        for (x, &creature) in (0..).zip(row.iter()) {
            placements.push(Placement {
                at: Square::new(x, y),
                creature,
                side,
            });
        }
    }
    Ok(placements)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = MatchConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.max_shrink_level(), 3);
        assert_eq!(config.placements().unwrap().len(), 32);
    }

    #[test]
    fn partial_config_from_json() {
        let config: MatchConfig = serde_json::from_str(
            r#"{ "shrink_pattern": "spiral", "shrink_interval": 5, "stats": { "lion": { "health": 30 } } }"#,
        )
        .unwrap();
        assert_eq!(config.shrink_pattern, ShrinkPattern::Spiral);
        assert_eq!(config.shrink_interval, 5);
        assert_eq!(config.width, 8);
        assert_eq!(config.stats.stats_for(CreatureType::Lion).health, 30);
        assert_eq!(config.deck, default_deck());
    }

    #[test]
    fn invalid_configs() {
        let check = |config: MatchConfig, expected: SetupError| {
            assert_eq!(config.validate(), Err(expected));
        };
        check(
            MatchConfig {
                width: 40,
                ..Default::default()
            },
            SetupError::InvalidDimensions {
                width: 40,
                height: 8,
            },
        );
        check(
            MatchConfig {
                shrink_interval: 0,
                ..Default::default()
            },
            SetupError::ZeroShrinkInterval,
        );
        check(
            MatchConfig {
                out_of_bounds_damage: 0,
                ..Default::default()
            },
            SetupError::ZeroOutOfBoundsDamage,
        );
        check(
            MatchConfig {
                width: 6,
                ..Default::default()
            },
            SetupError::DefaultLayoutDoesNotFit {
                width: 6,
                height: 8,
            },
        );
        check(
            MatchConfig {
                deck: Vec::new(),
                ..Default::default()
            },
            SetupError::EmptyDeck,
        );
        let lion = |x, y| Placement {
            at: Square::new(x, y),
            creature: CreatureType::Lion,
            side: Side::South,
        };
        check(
            MatchConfig {
                layout: Some(vec![lion(1, 1), lion(1, 1)]),
                ..Default::default()
            },
            SetupError::SquareOccupied {
                square: Square::new(1, 1),
            },
        );
        check(
            MatchConfig {
                layout: Some(vec![lion(8, 1)]),
                ..Default::default()
            },
            SetupError::SquareOutsideGrid {
                square: Square::new(8, 1),
            },
        );
    }

    #[test]
    fn default_layout_is_mirrored() {
        let placements = default_layout(8, 8).unwrap();
        let at = |x, y| {
            placements
                .iter()
                .find(|p| p.at == Square::new(x, y))
                .map(|p| (p.creature, p.side))
        };
        assert_eq!(at(3, 7), Some((CreatureType::Lion, Side::South)));
        assert_eq!(at(4, 0), Some((CreatureType::Lion, Side::North)));
        assert_eq!(at(3, 6), Some((CreatureType::Eagle, Side::South)));
        assert_eq!(at(0, 1), Some((CreatureType::Fox, Side::North)));
        assert_eq!(at(3, 3), None);
    }
}
