use beast_chess::{MatchState, MoveRequest, Side, TurnError, TurnOutcome};
use beast_chess_bot_utils::{candidate_moves, evaluate, simulate, Policy};
use tracing::debug;

/// Two-ply minimax over the material balance.
///
/// Every own move is answered by the opponent's best reply, and the move
/// whose worst case is best wins. The first of several equal moves is taken.
pub struct MaxPolicy;

impl Policy for MaxPolicy {
    fn name(&self) -> &str {
        "max"
    }

    fn choose_move(&mut self, state: &MatchState, side: Side) -> Result<MoveRequest, TurnError> {
        let mut best_score = i32::MIN;
        let mut best_move = None;
        for request in candidate_moves(state, side)? {
            let Some((state1, outcome)) = simulate(state, request) else {
                continue;
            };
            let score = match outcome {
                TurnOutcome::GameOver(_) => evaluate(&state1, side),
                TurnOutcome::Applied => worst_reply(&state1, side),
            };
            if score > best_score {
                best_score = score;
                best_move = Some(request);
                debug!(score, from = %request.from, to = %request.to, "New best score");
            }
        }
        best_move.ok_or(TurnError::NoLegalMoveAvailable { side })
    }
}

/// The score for `side` after the opponent's strongest answer.
fn worst_reply(state: &MatchState, side: Side) -> i32 {
    let opponent = side.opponent();
    state
        .all_legal_moves(opponent)
        .into_iter()
        .filter_map(|reply| simulate(state, reply))
        .map(|(state2, _)| evaluate(&state2, side))
        .min()
        .unwrap_or_else(|| evaluate(state, side))
}
