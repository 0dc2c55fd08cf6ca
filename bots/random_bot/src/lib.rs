use beast_chess::{MatchState, MoveRequest, Side, TurnError};
use beast_chess_bot_utils::{candidate_moves, Policy};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Plays a uniformly random legal move.
pub struct RandomPolicy {
    rng: StdRng,
}

impl RandomPolicy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Policy for RandomPolicy {
    fn name(&self) -> &str {
        "random"
    }

    fn choose_move(&mut self, state: &MatchState, side: Side) -> Result<MoveRequest, TurnError> {
        candidate_moves(state, side)?
            .choose(&mut self.rng)
            .copied()
            .ok_or(TurnError::NoLegalMoveAvailable { side })
    }
}
