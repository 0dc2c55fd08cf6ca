use std::collections::BTreeSet;

use crate::{Board, CreatureType, Side, Square};

const ORTHOGONAL: [(i8, i8); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];
const DIAGONAL: [(i8, i8); 4] = [(1, -1), (1, 1), (-1, 1), (-1, -1)];
const ALL_DIRECTIONS: [(i8, i8); 8] = [
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];
const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (1, -2),
    (2, -1),
    (2, 1),
    (1, 2),
    (-1, 2),
    (-2, 1),
    (-2, -1),
    (-1, -2),
];
const FROG_JUMPS: [(i8, i8); 8] = [
    (0, -2),
    (2, -2),
    (2, 0),
    (2, 2),
    (0, 2),
    (-2, 2),
    (-2, 0),
    (-2, -2),
];

/// How a creature moves.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveRule {
    /// Exactly one square in any of the 8 directions.
    Step,
    /// Any distance along the directions, up to `max_range` squares if given.
    ///
    /// The path ends at the first occupied or inactive cell. An enemy on
    /// that cell may be captured.
    Slide {
        directions: &'static [(i8, i8)],
        max_range: Option<u8>,
    },
    /// Exactly one of the offsets, ignoring everything in between.
    Jump { offsets: &'static [(i8, i8)] },
}

impl CreatureType {
    pub fn move_rule(self) -> MoveRule {
        match self {
            CreatureType::Lion | CreatureType::Bear => MoveRule::Step,
            CreatureType::Eagle => MoveRule::Slide {
                directions: &DIAGONAL,
                max_range: None,
            },
            CreatureType::Wolf => MoveRule::Slide {
                directions: &ORTHOGONAL,
                max_range: None,
            },
            CreatureType::Fox => MoveRule::Slide {
                directions: &ALL_DIRECTIONS,
                max_range: Some(3),
            },
            CreatureType::Snake => MoveRule::Jump {
                offsets: &KNIGHT_JUMPS,
            },
            CreatureType::Frog => MoveRule::Jump {
                offsets: &FROG_JUMPS,
            },
        }
    }
}

/// All squares a `creature` of `side` standing on `from` could move to.
///
/// Only the occupancy and the active cells of `board` are considered, the
/// piece on `from` (if any) is not. Destinations are always active, never
/// hold a piece of `side` and never equal `from`.
pub fn legal_destinations(
    creature: CreatureType,
    side: Side,
    from: Square,
    board: &Board,
) -> BTreeSet<Square> {
    let mut destinations = BTreeSet::new();
    match creature.move_rule() {
        MoveRule::Step => slide(&ALL_DIRECTIONS, Some(1), side, from, board, &mut destinations),
        MoveRule::Slide {
            directions,
            max_range,
        } => slide(directions, max_range, side, from, board, &mut destinations),
        MoveRule::Jump { offsets } => {
            for &(dx, dy) in offsets {
                let Some(to) = from.offset(dx, dy) else {
                    continue;
                };
                if can_land_on(to, side, board) {
                    destinations.insert(to);
                }
            }
        }
    }
    destinations
}

/// Whether the move is allowed for the creature's rule. See [`legal_destinations()`].
pub fn is_legal_move(
    creature: CreatureType,
    side: Side,
    from: Square,
    to: Square,
    board: &Board,
) -> bool {
    legal_destinations(creature, side, from, board).contains(&to)
}

fn can_land_on(to: Square, side: Side, board: &Board) -> bool {
    board.is_in_bounds(to) && board.piece_at(to).map_or(true, |p| p.side != side)
}

fn slide(
    directions: &[(i8, i8)],
    max_range: Option<u8>,
    side: Side,
    from: Square,
    board: &Board,
    destinations: &mut BTreeSet<Square>,
) {
    for &(dx, dy) in directions {
        let mut current = from;
        let mut steps = 0u8;
        while max_range.map_or(true, |max| steps < max) {
            let Some(next) = current.offset(dx, dy) else {
                break;
            };
            if !board.is_in_bounds(next) {
                break;
            }
            steps += 1;
            current = next;
            match board.piece_at(next) {
                None => {
                    destinations.insert(next);
                }
                Some(blocker) => {
                    if blocker.side != side {
                        destinations.insert(next);
                    }
                    break;
                }
            }
        }
    }
}
