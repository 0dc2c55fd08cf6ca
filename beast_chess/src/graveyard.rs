use crate::{Piece, PieceId, Side};

/// Keeps the pieces that died during a match, per side.
pub trait Graveyard {
    fn bury(&mut self, piece: Piece);

    /// The piece that has been in the graveyard the longest.
    fn peek(&self, side: Side) -> Option<&Piece>;

    /// Takes a piece back out of the graveyard.
    fn exhume(&mut self, side: Side, id: PieceId) -> Option<Piece>;

    fn count(&self, side: Side) -> usize;
}

/// The default [`Graveyard`], keeping pieces in the order they died.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Crypt {
    graves: [Vec<Piece>; 2],
}

impl Crypt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pieces(&self, side: Side) -> &[Piece] {
        &self.graves[side.index()]
    }
}

impl Graveyard for Crypt {
    fn bury(&mut self, piece: Piece) {
        self.graves[piece.side.index()].push(piece);
    }

    fn peek(&self, side: Side) -> Option<&Piece> {
        self.graves[side.index()].first()
    }

    fn exhume(&mut self, side: Side, id: PieceId) -> Option<Piece> {
        let graves = &mut self.graves[side.index()];
        let idx = graves.iter().position(|p| p.id == id)?;
        Some(graves.remove(idx))
    }

    fn count(&self, side: Side) -> usize {
        self.graves[side.index()].len()
    }
}
