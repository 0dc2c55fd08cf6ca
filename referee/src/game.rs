use beast_chess::{Match, MatchConfig, MatchResult, Side, TurnError, TurnOutcome};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, trace};

use crate::player::Player;
use crate::recording::Recorder;

pub enum GameResult {
    WonByPlayer { player_idx: usize },
    /// The player had no legal move left and conceded.
    Forfeit { player_idx: usize },
    Tie,
    /// Nobody won within the turn limit.
    TurnLimit,
    IllegalMoveByPlayer { player_idx: usize, err: TurnError },
}

/// What every game of a matchup shares.
#[derive(Clone, Debug)]
pub struct GameSettings {
    /// The rules. Its seed is replaced by a fresh one for each game.
    pub match_config: MatchConfig,
    /// The game is a tie once this many moves have been played.
    pub max_turns: u32,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            match_config: MatchConfig::default(),
            max_turns: 500,
        }
    }
}

/// Returns an error only if the match cannot be set up or recorded, not
/// when an illegal move is played.
///
/// Every game that gets started is recorded, including those ending in an
/// illegal move.
pub fn play_game(
    rng: &mut StdRng,
    player_1: &mut Player,
    player_2: &mut Player,
    settings: &GameSettings,
    recorder: &mut Option<Recorder>,
) -> anyhow::Result<GameResult> {
    // Randomly assign the sides, and with that who moves first
    let sides = {
        let mut arr = Side::ALL;
        arr.shuffle(rng);
        arr
    };
    let seed = rng.gen();
    let config = MatchConfig {
        seed,
        ..settings.match_config.clone()
    };

    let mut game = Match::new(config)?;
    if let Some(rec) = recorder {
        game.subscribe(rec.new_game());
    }
    game.start()?;

    let players = [player_1, player_2];
    let player_idx_of = |side: Side| if sides[0] == side { 0 } else { 1 };

    let game_result = loop {
        let state = game.state();
        if state.turn_number() > settings.max_turns {
            debug!(turns = settings.max_turns, "Turn limit reached");
            game.declare_draw()?;
            break GameResult::TurnLimit;
        }
        let side = state.current_side();
        let player_idx = player_idx_of(side);
        let request = match players[player_idx].choose_move(state, side) {
            Ok(request) => request,
            Err(TurnError::NoLegalMoveAvailable { .. }) => {
                debug!(player = players[player_idx].name, "No legal move, conceding");
                game.concede(side)?;
                break GameResult::Forfeit { player_idx };
            }
            Err(err) => break GameResult::IllegalMoveByPlayer { player_idx, err },
        };
        if request.side != side {
            let err = TurnError::NotYourTurn { side: request.side };
            break GameResult::IllegalMoveByPlayer { player_idx, err };
        }
        match game.submit_move(request.from, request.to, request.side) {
            Ok(TurnOutcome::Applied) => {
                trace!("\n{}", game.state().board());
            }
            Ok(TurnOutcome::GameOver(MatchResult::Won(side))) => {
                break GameResult::WonByPlayer {
                    player_idx: player_idx_of(side),
                }
            }
            Ok(TurnOutcome::GameOver(MatchResult::Draw)) => break GameResult::Tie,
            Err(err) => break GameResult::IllegalMoveByPlayer { player_idx, err },
        }
    };

    if let Some(rec) = recorder {
        let names = [
            (sides[0], players[0].name.as_str()),
            (sides[1], players[1].name.as_str()),
        ];
        let path = rec.write_game_recording(names, seed)?;
        trace!(path = %path.display(), "Recorded game");
    }

    Ok(game_result)
}
