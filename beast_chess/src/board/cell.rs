use serde::{Deserialize, Serialize};

use crate::Piece;

/// A single square of the grid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    active: bool,
    occupant: Option<Piece>,
}

impl Cell {
    pub(crate) fn new() -> Self {
        Self {
            active: true,
            occupant: None,
        }
    }

    /// Whether the cell is still part of the playable area.
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn occupant(&self) -> Option<&Piece> {
        self.occupant.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.occupant.is_none()
    }

    pub(crate) fn occupant_mut(&mut self) -> Option<&mut Piece> {
        self.occupant.as_mut()
    }

    pub(crate) fn deactivate(&mut self) {
        self.active = false;
    }

    pub(crate) fn take(&mut self) -> Option<Piece> {
        self.occupant.take()
    }

    /// Puts `piece` here and returns whatever was here before.
    pub(crate) fn put(&mut self, piece: Piece) -> Option<Piece> {
        self.occupant.replace(piece)
    }
}
