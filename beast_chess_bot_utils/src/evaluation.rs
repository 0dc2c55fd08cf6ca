use beast_chess::{Board, MatchResult, MatchState, Side};

/// Score of a won match. Larger than any material balance.
pub const WIN_SCORE: i32 = 1_000_000;

/// How much more a leader's health counts than anyone else's.
pub const LEADER_WEIGHT: i32 = 4;

/// Summed health of the pieces of `side`, leaders weighted by [`LEADER_WEIGHT`].
///
/// Pieces standing on collapsed cells count half, they are taking damage
/// every turn.
pub fn material(board: &Board, side: Side) -> i32 {
    board
        .pieces_of(side)
        .map(|(sq, piece)| {
            let mut value = i32::from(piece.health());
            if piece.is_leader() {
                value *= LEADER_WEIGHT;
            }
            if !board.is_in_bounds(sq) {
                value /= 2;
            }
            value
        })
        .sum()
}

/// How good the position is for `side`: the material balance, or
/// [`WIN_SCORE`] once the match is decided.
pub fn evaluate(state: &MatchState, side: Side) -> i32 {
    match state.result() {
        Some(MatchResult::Won(winner)) if winner == side => WIN_SCORE,
        Some(MatchResult::Won(_)) => -WIN_SCORE,
        Some(MatchResult::Draw) => 0,
        None => material(state.board(), side) - material(state.board(), side.opponent()),
    }
}
