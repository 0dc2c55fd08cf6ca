mod area;
mod cell;

pub use area::*;
pub use cell::*;

use crate::{is_legal_move, IllegalMove, Piece, PieceId, SetupError, Side, Square};

/// Smallest and largest supported board side length.
pub const MIN_BOARD_SIZE: i8 = 2;
pub const MAX_BOARD_SIZE: i8 = 32;

/// A fixed-size rectangular grid of cells.
///
/// The grid is never resized. Shrinking the playable area only marks cells
/// as inactive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    width: i8,
    height: i8,
    /// Row-major.
    cells: Vec<Cell>,
}

impl Board {
    /// Creates a board where every cell is active and empty.
    ///
    /// Panics if a dimension is outside of
    /// [`MIN_BOARD_SIZE`]`..=`[`MAX_BOARD_SIZE`]. Configs are validated before
    /// they reach this point.
    pub fn new(width: i8, height: i8) -> Self {
        assert!((MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&width));
        assert!((MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&height));
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            cells: vec![Cell::new(); len],
        }
    }

    pub fn width(&self) -> i8 {
        self.width
    }

    pub fn height(&self) -> i8 {
        self.height
    }

    fn index(&self, sq: Square) -> Option<usize> {
        self.contains(sq)
            .then(|| sq.y as usize * self.width as usize + sq.x as usize)
    }

    /// Whether the square lies within the grid, active or not.
    pub fn contains(&self, sq: Square) -> bool {
        (0..self.width).contains(&sq.x) && (0..self.height).contains(&sq.y)
    }

    /// Whether the square lies within the grid and is still active.
    pub fn is_in_bounds(&self, sq: Square) -> bool {
        self.cell(sq).is_some_and(Cell::is_active)
    }

    pub fn cell(&self, sq: Square) -> Option<&Cell> {
        self.index(sq).map(|idx| &self.cells[idx])
    }

    fn cell_mut(&mut self, sq: Square) -> Option<&mut Cell> {
        self.index(sq).map(|idx| &mut self.cells[idx])
    }

    pub fn piece_at(&self, sq: Square) -> Option<&Piece> {
        self.cell(sq).and_then(Cell::occupant)
    }

    pub(crate) fn piece_at_mut(&mut self, sq: Square) -> Option<&mut Piece> {
        self.cell_mut(sq).and_then(Cell::occupant_mut)
    }

    /// Checks that a piece could be put on `at`, i.e. the cell is active and empty.
    pub fn check_placement(&self, at: Square) -> Result<(), SetupError> {
        let cell = self
            .cell(at)
            .ok_or(SetupError::SquareOutsideGrid { square: at })?;
        if !cell.is_active() {
            return Err(SetupError::SquareInactive { square: at });
        }
        if !cell.is_empty() {
            return Err(SetupError::SquareOccupied { square: at });
        }
        Ok(())
    }

    /// Puts a piece on an empty, active cell.
    pub fn place_piece(&mut self, at: Square, piece: Piece) -> Result<(), SetupError> {
        self.check_placement(at)?;
        if let Some(cell) = self.cell_mut(at) {
            cell.put(piece);
        }
        Ok(())
    }

    /// Moves the piece on `from` to `to` and returns the captured piece, if any.
    ///
    /// The move must be legal for the creature on `from`. Nothing is changed
    /// if an error is returned. This does not check whose turn it is.
    pub fn move_piece(&mut self, from: Square, to: Square) -> Result<Option<Piece>, IllegalMove> {
        for square in [from, to] {
            if !self.contains(square) {
                return Err(IllegalMove::OutOfBounds { square });
            }
        }
        let piece = self.piece_at(from).ok_or(IllegalMove::NoPieceAtOrigin)?;
        if from == to {
            return Err(IllegalMove::ZeroDisplacement);
        }
        if !self.is_in_bounds(to) {
            return Err(IllegalMove::DestinationInactive);
        }
        if self.piece_at(to).is_some_and(|p| p.side == piece.side) {
            return Err(IllegalMove::OwnPieceAtDestination);
        }
        if !is_legal_move(piece.creature, piece.side, from, to, self) {
            return Err(IllegalMove::UnreachableForCreature {
                creature: piece.creature,
            });
        }

        let Some(mut piece) = self.remove_piece(from) else {
            return Err(IllegalMove::NoPieceAtOrigin);
        };
        piece.has_moved = true;
        Ok(self.cell_mut(to).and_then(|cell| cell.put(piece)))
    }

    /// Marks a cell inactive and reports who is standing on it.
    ///
    /// The occupant stays where it is, deciding its fate is up to the caller.
    pub fn deactivate_cell(&mut self, at: Square) -> Option<PieceId> {
        let cell = self.cell_mut(at)?;
        cell.deactivate();
        cell.occupant().map(|p| p.id)
    }

    /// Takes the piece off the board.
    pub fn remove_piece(&mut self, at: Square) -> Option<Piece> {
        self.cell_mut(at).and_then(Cell::take)
    }

    /// The smallest area containing all active cells, if any are left.
    pub fn active_area(&self) -> Option<Area> {
        Area::from_squares(self.squares().filter(|&sq| self.is_in_bounds(sq)))
    }

    /// The full grid as an area.
    pub fn grid_area(&self) -> Area {
        Area {
            x_min: 0,
            y_min: 0,
            x_max: self.width - 1,
            y_max: self.height - 1,
        }
    }

    /// All squares of the grid in row-major order.
    pub fn squares(&self) -> impl Iterator<Item = Square> {
        let (width, height) = (self.width, self.height);
        (0..height).flat_map(move |y| (0..width).map(move |x| Square::new(x, y)))
    }

    /// All squares with their cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Square, &Cell)> {
        self.squares().zip(self.cells.iter())
    }

    /// All pieces in row-major order.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, &Piece)> {
        self.iter()
            .filter_map(|(sq, cell)| cell.occupant().map(|p| (sq, p)))
    }

    /// The pieces of one side in row-major order.
    pub fn pieces_of(&self, side: Side) -> impl Iterator<Item = (Square, &Piece)> {
        self.pieces().filter(move |(_, p)| p.side == side)
    }

    pub fn find_piece(&self, id: PieceId) -> Option<Square> {
        self.pieces().find(|(_, p)| p.id == id).map(|(sq, _)| sq)
    }

    pub fn has_leader(&self, side: Side) -> bool {
        self.pieces_of(side).any(|(_, p)| p.is_leader())
    }

    /// Active cells without an occupant, in row-major order.
    pub fn empty_active_squares(&self) -> Vec<Square> {
        self.iter()
            .filter(|(_, cell)| cell.is_active() && cell.is_empty())
            .map(|(sq, _)| sq)
            .collect()
    }
}
