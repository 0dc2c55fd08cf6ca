use std::cmp::Ordering;

use beast_chess::{MatchState, MoveRequest, Side, TurnError};
use beast_chess_bot_utils::{candidate_moves, evaluate, simulate, Policy};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Looks one move ahead and takes whatever leaves the best material
/// balance, picking randomly among equally good moves.
pub struct GreedyPolicy {
    rng: StdRng,
}

impl GreedyPolicy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Policy for GreedyPolicy {
    fn name(&self) -> &str {
        "greedy"
    }

    fn choose_move(&mut self, state: &MatchState, side: Side) -> Result<MoveRequest, TurnError> {
        let mut top_choices: Vec<MoveRequest> = Vec::new();
        let mut top_score = i32::MIN;
        for request in candidate_moves(state, side)? {
            let Some((next, _)) = simulate(state, request) else {
                continue;
            };
            let score = evaluate(&next, side);
            match score.cmp(&top_score) {
                Ordering::Less => {}
                Ordering::Equal => {
                    top_choices.push(request);
                }
                Ordering::Greater => {
                    top_choices = vec![request];
                    top_score = score;
                }
            }
        }
        top_choices
            .choose(&mut self.rng)
            .copied()
            .ok_or(TurnError::NoLegalMoveAvailable { side })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beast_chess::{
        create_match, CreatureType, MatchConfig, Placement, Square, TurnOutcome,
    };

    /// South cannot move at all on this 2x3 board.
    fn boxed_in_south() -> MatchConfig {
        MatchConfig {
            width: 2,
            height: 3,
            layout: Some(vec![
                placement(0, 0, CreatureType::Lion, Side::South),
                placement(1, 0, CreatureType::Bear, Side::South),
                placement(0, 1, CreatureType::Frog, Side::South),
                placement(1, 1, CreatureType::Frog, Side::South),
                placement(0, 2, CreatureType::Lion, Side::North),
            ]),
            ..Default::default()
        }
    }

    fn placement(x: i8, y: i8, creature: CreatureType, side: Side) -> Placement {
        Placement {
            at: Square::new(x, y),
            creature,
            side,
        }
    }

    #[test]
    fn takes_the_lion_when_it_can() {
        let config = MatchConfig {
            first_side: Side::North,
            layout: Some(vec![
                placement(3, 3, CreatureType::Lion, Side::South),
                placement(4, 5, CreatureType::Snake, Side::North),
                placement(7, 0, CreatureType::Lion, Side::North),
            ]),
            ..Default::default()
        };
        let game = create_match(config).unwrap();
        let request = GreedyPolicy::new(0)
            .choose_move(game.state(), Side::North)
            .unwrap();
        assert_eq!(request.from, Square::new(4, 5));
        assert_eq!(request.to, Square::new(3, 3));
    }

    #[test]
    fn every_move_is_accepted() {
        let mut game = create_match(MatchConfig::default()).unwrap();
        let mut policies = [GreedyPolicy::new(1), GreedyPolicy::new(2)];
        for _ in 0..60 {
            let side = game.state().current_side();
            let policy = &mut policies[side as usize];
            let request = match policy.choose_move(game.state(), side) {
                Ok(request) => request,
                Err(TurnError::NoLegalMoveAvailable { .. }) => break,
                Err(err) => panic!("{}", err),
            };
            let outcome = game
                .submit_move(request.from, request.to, request.side)
                .unwrap();
            if let TurnOutcome::GameOver(_) = outcome {
                break;
            }
        }
    }

    #[test]
    fn boxed_in_side_forfeits() {
        let game = create_match(boxed_in_south()).unwrap();
        assert_eq!(
            GreedyPolicy::new(0).choose_move(game.state(), Side::South),
            Err(TurnError::NoLegalMoveAvailable { side: Side::South })
        );
    }
}
