use quickcheck::{Arbitrary, Gen};

use crate::{Board, CreatureStats, CreatureType, Piece, PieceId, Side, Square};

/// A small board with some inactive cells and pieces of both sides.
///
/// Pieces may stand on inactive cells, as they do after a shrink.
#[derive(Clone, Debug)]
pub struct ArbitraryBoard(pub Board);

/// A board plus a creature that is asked where it could go from `from`.
///
/// `from` is always empty, so the creature does not block itself.
#[derive(Clone, Debug)]
pub struct MoveProbe {
    pub board: Board,
    pub creature: CreatureType,
    pub side: Side,
    pub from: Square,
}

impl Arbitrary for Side {
    fn arbitrary(g: &mut Gen) -> Self {
        *g.choose(&Side::ALL).unwrap()
    }
}

impl Arbitrary for CreatureType {
    fn arbitrary(g: &mut Gen) -> Self {
        *g.choose(&CreatureType::ALL).unwrap()
    }
}

fn coordinate(g: &mut Gen, len: i8) -> i8 {
    (u8::arbitrary(g) % len as u8) as i8
}

impl Arbitrary for ArbitraryBoard {
    fn arbitrary(g: &mut Gen) -> Self {
        let width = 2 + coordinate(g, 9);
        let height = 2 + coordinate(g, 9);
        let mut board = Board::new(width, height);
        let squares: Vec<Square> = board.squares().collect();
        let mut next_id = 0;
        for sq in squares {
            // Roughly a third of the cells hold a piece, one in six is inactive
            if u8::arbitrary(g) % 3 == 0 {
                let stats = CreatureStats {
                    health: 1 + u16::from(u8::arbitrary(g) % 30),
                    armor: u16::from(u8::arbitrary(g) % 3),
                };
                let piece = Piece::new(
                    PieceId(next_id),
                    CreatureType::arbitrary(g),
                    Side::arbitrary(g),
                    stats,
                );
                next_id += 1;
                board.place_piece(sq, piece).unwrap();
            }
            if u8::arbitrary(g) % 6 == 0 {
                board.deactivate_cell(sq);
            }
        }
        ArbitraryBoard(board)
    }
}

impl Arbitrary for MoveProbe {
    fn arbitrary(g: &mut Gen) -> Self {
        let ArbitraryBoard(mut board) = ArbitraryBoard::arbitrary(g);
        let from = Square::new(
            coordinate(g, board.width()),
            coordinate(g, board.height()),
        );
        board.remove_piece(from);
        MoveProbe {
            board,
            creature: CreatureType::arbitrary(g),
            side: Side::arbitrary(g),
            from,
        }
    }
}
