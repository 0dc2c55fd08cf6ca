mod evaluation;
pub use evaluation::*;

use beast_chess::{execute_turn, MatchState, MoveRequest, Side, TurnError, TurnOutcome};
use tracing::trace;

/// A trait to simplify writing AI players.
///
/// Implementations only ever see a shared reference to the match, so they
/// cannot change it. Whatever they return still goes through the referee,
/// which rejects illegal moves.
pub trait Policy {
    fn name(&self) -> &str;

    /// Picks a move for `side`.
    ///
    /// Returns [`TurnError::NoLegalMoveAvailable`] if `side` cannot move at
    /// all, which the caller should treat as a forfeit.
    fn choose_move(&mut self, state: &MatchState, side: Side) -> Result<MoveRequest, TurnError>;
}

/// All moves `side` could make, or the forfeit signal if there are none.
pub fn candidate_moves(state: &MatchState, side: Side) -> Result<Vec<MoveRequest>, TurnError> {
    let moves = state.all_legal_moves(side);
    if moves.is_empty() {
        return Err(TurnError::NoLegalMoveAvailable { side });
    }
    Ok(moves)
}

/// Plays `request` on a copy of the match.
///
/// The copy goes through the full turn cycle, so shrinking and status
/// effects are included. `None` if the engine rejects the move.
pub fn simulate(state: &MatchState, request: MoveRequest) -> Option<(MatchState, TurnOutcome)> {
    let mut next = state.clone();
    let mut events = Vec::new();
    match execute_turn(&mut next, request, &mut events) {
        Ok(outcome) => Some((next, outcome)),
        Err(err) => {
            trace!(%err, "Simulated move was rejected");
            None
        }
    }
}
