use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{apply_true_damage, Area, Board, DamageReport, Square};

/// Which cells a shrink tick takes away.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShrinkPattern {
    /// The border of the active area.
    #[default]
    OuterRing,
    /// The four corners of the ring at the current level.
    Corners,
    /// The ring at the current level, counted inwards from the grid's border.
    Spiral,
    /// A handful of active cells drawn at random.
    Random,
}

impl std::fmt::Display for ShrinkPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShrinkPattern::OuterRing => write!(f, "outer ring"),
            ShrinkPattern::Corners => write!(f, "corners"),
            ShrinkPattern::Spiral => write!(f, "spiral"),
            ShrinkPattern::Random => write!(f, "random"),
        }
    }
}

/// Progress of the shrinking playable area.
///
/// `level` only ever goes up, and stops at `max_level`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShrinkState {
    level: u8,
    max_level: u8,
    pattern: ShrinkPattern,
    turns_until_next_shrink: u16,
    interval: u16,
}

/// The level at which the default config stops shrinking a board.
///
/// On an 8x8 board this leaves the central 2x2 squares.
pub fn default_max_shrink_level(width: i8, height: i8) -> u8 {
    let shorter = width.min(height).max(0) as u8;
    (shorter / 2).saturating_sub(1)
}

impl ShrinkState {
    /// Panics if `interval` is zero.
    pub fn new(pattern: ShrinkPattern, interval: u16, max_level: u8) -> Self {
        assert!(interval > 0);
        Self {
            level: 0,
            max_level,
            pattern,
            turns_until_next_shrink: interval,
            interval,
        }
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn max_level(&self) -> u8 {
        self.max_level
    }

    pub fn pattern(&self) -> ShrinkPattern {
        self.pattern
    }

    pub fn turns_until_next_shrink(&self) -> u16 {
        self.turns_until_next_shrink
    }

    pub fn interval(&self) -> u16 {
        self.interval
    }

    pub fn is_exhausted(&self) -> bool {
        self.level >= self.max_level
    }

    /// Goes up one level. Does nothing once the maximum is reached.
    pub fn advance(&mut self) -> bool {
        if self.is_exhausted() {
            return false;
        }
        self.level += 1;
        true
    }

    /// Counts one turn down and reports whether a shrink is due.
    ///
    /// The counter starts over at the interval once it runs out.
    pub(crate) fn count_down(&mut self) -> bool {
        self.turns_until_next_shrink = self.turns_until_next_shrink.saturating_sub(1);
        if self.turns_until_next_shrink == 0 {
            self.turns_until_next_shrink = self.interval;
            true
        } else {
            false
        }
    }
}

/// The active cells the next shrink tick takes away, in order.
///
/// `random_cells` is the sample size for [`ShrinkPattern::Random`].
pub fn cells_to_deactivate(
    pattern: ShrinkPattern,
    level: u8,
    board: &Board,
    random_cells: usize,
    rng: &mut impl Rng,
) -> Vec<Square> {
    let ring = |area: Option<Area>, corners_only: bool| -> Vec<Square> {
        let Some(area) = area else {
            return Vec::new();
        };
        let squares = if corners_only {
            area.corners()
        } else {
            area.perimeter()
        };
        squares
            .into_iter()
            .filter(|&sq| board.is_in_bounds(sq))
            .collect()
    };
    let level_ring = i8::try_from(level)
        .ok()
        .and_then(|level| board.grid_area().inset(level));

    match pattern {
        ShrinkPattern::OuterRing => ring(board.active_area(), false),
        ShrinkPattern::Corners => ring(level_ring, true),
        ShrinkPattern::Spiral => ring(level_ring, false),
        ShrinkPattern::Random => {
            let active: Vec<Square> = board
                .squares()
                .filter(|&sq| board.is_in_bounds(sq))
                .collect();
            let amount = random_cells.min(active.len());
            active.choose_multiple(rng, amount).copied().collect()
        }
    }
}

/// What one shrink tick did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShrinkReport {
    /// The level after the tick.
    pub level: u8,
    pub pattern: ShrinkPattern,
    pub cells: Vec<Square>,
    /// One report per piece caught on a deactivated cell, in the order of `cells`.
    pub caught: Vec<DamageReport>,
}

/// Deactivates the next batch of cells and hits everyone standing on them.
///
/// The cells are computed up front, before any of them is touched. Returns
/// `None` without changing anything once the maximum level is reached.
pub fn apply_shrink(
    state: &mut ShrinkState,
    board: &mut Board,
    collapse_damage: u16,
    random_cells: usize,
    rng: &mut impl Rng,
) -> Option<ShrinkReport> {
    if state.is_exhausted() {
        return None;
    }
    let cells = cells_to_deactivate(state.pattern, state.level, board, random_cells, rng);
    let occupied: Vec<Square> = cells
        .iter()
        .copied()
        .filter(|&sq| board.deactivate_cell(sq).is_some())
        .collect();
    let caught = occupied
        .into_iter()
        .filter_map(|sq| apply_true_damage(board, sq, collapse_damage))
        .collect();
    state.advance();
    debug!(level = state.level, pattern = %state.pattern, cells = cells.len(), "board shrank");
    Some(ShrinkReport {
        level: state.level,
        pattern: state.pattern,
        cells,
        caught,
    })
}

#[cfg(test)]
mod tests {
    use quickcheck::quickcheck;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::arbitrary::ArbitraryBoard;
    use crate::{CreatureStats, CreatureType, Piece, PieceId, Side};

    fn active_count(board: &Board) -> usize {
        board.squares().filter(|&sq| board.is_in_bounds(sq)).count()
    }

    quickcheck! {
        fn level_never_decreases_and_is_capped(input: ArbitraryBoard, pattern_idx: u8, ticks: u8) -> bool {
            let mut board = input.0;
            let pattern = [
                ShrinkPattern::OuterRing,
                ShrinkPattern::Corners,
                ShrinkPattern::Spiral,
                ShrinkPattern::Random,
            ][pattern_idx as usize % 4];
            let max_level = default_max_shrink_level(board.width(), board.height());
            let mut state = ShrinkState::new(pattern, 1, max_level);
            let mut rng = StdRng::seed_from_u64(u64::from(ticks));
            let mut previous = state.level();
            for _ in 0..(ticks % 8) {
                apply_shrink(&mut state, &mut board, 15, 6, &mut rng);
                if state.level() < previous || state.level() > max_level {
                    return false;
                }
                previous = state.level();
            }
            true
        }

        fn shrinking_only_touches_active_cells(input: ArbitraryBoard, seed: u64) -> bool {
            let board = input.0;
            let mut rng = StdRng::seed_from_u64(seed);
            [ShrinkPattern::OuterRing, ShrinkPattern::Corners, ShrinkPattern::Spiral, ShrinkPattern::Random]
                .into_iter()
                .all(|pattern| {
                    cells_to_deactivate(pattern, 0, &board, 6, &mut rng)
                        .into_iter()
                        .all(|sq| board.is_in_bounds(sq))
                })
        }
    }

    #[test]
    fn outer_ring_follows_the_active_area() {
        let mut board = Board::new(8, 8);
        let mut state = ShrinkState::new(ShrinkPattern::OuterRing, 3, 3);
        let mut rng = StdRng::seed_from_u64(0);
        let report = apply_shrink(&mut state, &mut board, 15, 6, &mut rng).unwrap();
        assert_eq!(report.level, 1);
        assert_eq!(report.cells.len(), 28);
        assert_eq!(active_count(&board), 36);
        let report = apply_shrink(&mut state, &mut board, 15, 6, &mut rng).unwrap();
        assert_eq!(report.cells.len(), 20);
        let report = apply_shrink(&mut state, &mut board, 15, 6, &mut rng).unwrap();
        assert_eq!(report.cells.len(), 12);
        assert_eq!(active_count(&board), 4);
        assert_eq!(apply_shrink(&mut state, &mut board, 15, 6, &mut rng), None);
        assert_eq!(active_count(&board), 4);
        assert_eq!(state.level(), 3);
    }

    #[test]
    fn corners_move_inwards() {
        let mut board = Board::new(8, 8);
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            cells_to_deactivate(ShrinkPattern::Corners, 0, &board, 6, &mut rng),
            vec![
                Square::new(0, 0),
                Square::new(0, 7),
                Square::new(7, 0),
                Square::new(7, 7)
            ]
        );
        board.deactivate_cell(Square::new(1, 1));
        assert_eq!(
            cells_to_deactivate(ShrinkPattern::Corners, 1, &board, 6, &mut rng),
            vec![Square::new(1, 6), Square::new(6, 1), Square::new(6, 6)]
        );
    }

    #[test]
    fn random_sample_is_reproducible_and_bounded() {
        let board = Board::new(8, 8);
        let draw = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            cells_to_deactivate(ShrinkPattern::Random, 0, &board, 6, &mut rng)
        };
        assert_eq!(draw(42), draw(42));
        assert_eq!(draw(42).len(), 6);

        let mut tiny = Board::new(2, 2);
        tiny.deactivate_cell(Square::new(0, 0));
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            cells_to_deactivate(ShrinkPattern::Random, 0, &tiny, 6, &mut rng).len(),
            3
        );
    }

    #[test]
    fn caught_pieces_take_the_collapse_hit() {
        let mut board = Board::new(8, 8);
        let lion = Piece::new(
            PieceId(0),
            CreatureType::Lion,
            Side::South,
            CreatureStats { health: 20, armor: 3 },
        );
        let fox = Piece::new(
            PieceId(1),
            CreatureType::Fox,
            Side::North,
            CreatureStats { health: 8, armor: 0 },
        );
        board.place_piece(Square::new(3, 7), lion).unwrap();
        board.place_piece(Square::new(0, 4), fox).unwrap();
        let mut state = ShrinkState::new(ShrinkPattern::Spiral, 3, 3);
        let mut rng = StdRng::seed_from_u64(0);
        let report = apply_shrink(&mut state, &mut board, 15, 6, &mut rng).unwrap();
        assert_eq!(report.caught.len(), 2);
        assert_eq!(report.caught[0].final_health, 5);
        assert!(report.caught[1].died());
        assert_eq!(board.piece_at(Square::new(3, 7)).unwrap().health(), 5);
        assert!(board.piece_at(Square::new(0, 4)).is_none());
    }

    #[test]
    fn countdown_restarts() {
        let mut state = ShrinkState::new(ShrinkPattern::OuterRing, 3, 3);
        assert!(!state.count_down());
        assert!(!state.count_down());
        assert!(state.count_down());
        assert_eq!(state.turns_until_next_shrink(), 3);
    }

    #[test]
    fn default_levels() {
        assert_eq!(default_max_shrink_level(8, 8), 3);
        assert_eq!(default_max_shrink_level(8, 5), 1);
        assert_eq!(default_max_shrink_level(2, 2), 0);
    }
}
