use serde::{Deserialize, Serialize};

use crate::{CreatureType, Side};

/// A position on the board.
///
/// `(0, 0)` is the north-west corner, `x` grows eastwards and `y` southwards.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Square {
    pub x: i8,
    pub y: i8,
}

impl Square {
    pub const fn new(x: i8, y: i8) -> Self {
        Self { x, y }
    }

    /// The square displaced by `(dx, dy)`, or `None` on coordinate overflow.
    pub fn offset(self, dx: i8, dy: i8) -> Option<Square> {
        Some(Square {
            x: self.x.checked_add(dx)?,
            y: self.y.checked_add(dy)?,
        })
    }
}

impl std::fmt::Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i8, i8)> for Square {
    fn from((x, y): (i8, i8)) -> Self {
        Square { x, y }
    }
}

/// A request to move the piece on `from` to `to`, on behalf of `side`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveRequest {
    pub from: Square,
    pub to: Square,
    pub side: Side,
}

/// A piece to put on the board before the match starts.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub at: Square,
    pub creature: CreatureType,
    pub side: Side,
}

/// A request to play a card from `side`'s hand.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardPlay {
    pub side: Side,
    /// Position of the card in the hand.
    pub card_index: usize,
    /// Cards that need a target pick one at random when this is omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub target: Option<Square>,
}
