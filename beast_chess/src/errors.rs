use crate::{CreatureType, Side, Square};

/// The error type for [`Board::move_piece()`](crate::Board::move_piece), i.e. for the
/// board-level checks of a single move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IllegalMove {
    /// One of the squares lies outside the grid itself.
    OutOfBounds { square: Square },
    NoPieceAtOrigin,
    PieceNotOwned { owner: Side },
    ZeroDisplacement,
    DestinationInactive,
    OwnPieceAtDestination,
    UnreachableForCreature { creature: CreatureType },
}

impl std::error::Error for IllegalMove {}

impl std::fmt::Display for IllegalMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IllegalMove::OutOfBounds { square } => {
                write!(f, "Square {} lies outside of the board", square)
            }
            IllegalMove::NoPieceAtOrigin => write!(f, "There is no piece on the origin square"),
            IllegalMove::PieceNotOwned { owner } => {
                write!(f, "The piece on the origin square belongs to {}", owner)
            }
            IllegalMove::ZeroDisplacement => write!(f, "The piece has to leave its square"),
            IllegalMove::DestinationInactive => {
                write!(f, "The destination is no longer part of the playable area")
            }
            IllegalMove::OwnPieceAtDestination => {
                write!(f, "The destination is occupied by a piece of the same side")
            }
            IllegalMove::UnreachableForCreature { creature } => {
                write!(f, "A {} cannot reach the destination from there", creature)
            }
        }
    }
}

/// The error type for submitting a move to a match.
///
/// A rejected move leaves the match untouched and may be resubmitted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TurnError {
    OutOfBounds {
        square: Square,
    },
    IllegalMove {
        from: Square,
        to: Square,
        err: IllegalMove,
    },
    NotYourTurn {
        side: Side,
    },
    GameNotInProgress,
    /// The side has no legal move left. Drivers treat this as a forfeit.
    NoLegalMoveAvailable {
        side: Side,
    },
}

impl TurnError {
    pub(crate) fn from_illegal_move(from: Square, to: Square, err: IllegalMove) -> Self {
        match err {
            IllegalMove::OutOfBounds { square } => TurnError::OutOfBounds { square },
            err => TurnError::IllegalMove { from, to, err },
        }
    }
}

impl std::error::Error for TurnError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TurnError::IllegalMove { err, .. } => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for TurnError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TurnError::OutOfBounds { square } => {
                write!(f, "Square {} lies outside of the board", square)
            }
            TurnError::IllegalMove { from, to, err: _ } => {
                write!(f, "Moving from {} to {} is not allowed", from, to)
            }
            TurnError::NotYourTurn { side } => write!(f, "It is not {}'s turn", side),
            TurnError::GameNotInProgress => write!(f, "The match is not in progress"),
            TurnError::NoLegalMoveAvailable { side } => {
                write!(f, "{} has no legal move left", side)
            }
        }
    }
}

/// The error type for playing a card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CardError {
    NotYourTurn { side: Side },
    GameNotInProgress,
    NoSuchCard { card_index: usize },
    AlreadyPlayedThisTurn,
    InvalidTarget { target: Square },
    /// The card would have no effect, e.g. reviving with an empty graveyard.
    NothingToAffect,
}

impl std::error::Error for CardError {}

impl std::fmt::Display for CardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CardError::NotYourTurn { side } => write!(f, "It is not {}'s turn", side),
            CardError::GameNotInProgress => write!(f, "The match is not in progress"),
            CardError::NoSuchCard { card_index } => {
                write!(f, "There is no card at position {} of the hand", card_index)
            }
            CardError::AlreadyPlayedThisTurn => write!(f, "A card was already played this turn"),
            CardError::InvalidTarget { target } => {
                write!(f, "{} is not a valid target for this card", target)
            }
            CardError::NothingToAffect => write!(f, "The card would have no effect"),
        }
    }
}

/// The error type for building a match from a config and placing its pieces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SetupError {
    InvalidDimensions { width: i8, height: i8 },
    ZeroShrinkInterval,
    /// Pieces on collapsed cells must keep taking damage, or they would stay there forever.
    ZeroOutOfBoundsDamage,
    ZeroHealth { creature: CreatureType },
    /// The built-in layout is made for boards with 8 columns and at least 4 rows.
    DefaultLayoutDoesNotFit { width: i8, height: i8 },
    EmptyDeck,
    SquareOutsideGrid { square: Square },
    SquareInactive { square: Square },
    SquareOccupied { square: Square },
    MissingLeader { side: Side },
    NotInSetup,
}

impl std::error::Error for SetupError {}

impl std::fmt::Display for SetupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SetupError::InvalidDimensions { width, height } => write!(
                f,
                "A {}x{} board is not supported, both sides must be between 2 and 32",
                width, height
            ),
            SetupError::ZeroShrinkInterval => write!(f, "The shrink interval must be positive"),
            SetupError::ZeroOutOfBoundsDamage => {
                write!(f, "The damage to pieces outside the playable area must be positive")
            }
            SetupError::ZeroHealth { creature } => {
                write!(f, "The starting health of a {} must be positive", creature)
            }
            SetupError::DefaultLayoutDoesNotFit { width, height } => write!(
                f,
                "The default layout does not fit on a {}x{} board, specify a layout",
                width, height
            ),
            SetupError::EmptyDeck => write!(f, "Cards are dealt, but the deck is empty"),
            SetupError::SquareOutsideGrid { square } => {
                write!(f, "Square {} lies outside of the board", square)
            }
            SetupError::SquareInactive { square } => {
                write!(f, "Square {} is not part of the playable area", square)
            }
            SetupError::SquareOccupied { square } => {
                write!(f, "Square {} is already occupied", square)
            }
            SetupError::MissingLeader { side } => {
                write!(f, "{} has no leader on the board", side)
            }
            SetupError::NotInSetup => write!(f, "The match has already started"),
        }
    }
}
