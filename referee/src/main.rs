use std::path::PathBuf;

use beast_chess::MatchConfig;
use clap::Parser;
use itertools::Itertools;
use rand::rngs::StdRng;
use rand::SeedableRng;
use referee::{play_game, GameResult, GameSettings, Player, PlayerConfig, Recorder};
use tracing::{debug, info};
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
struct Args {
    /// Path to the config JSON files of players
    #[clap(num_args(2..), value_delimiter = ' ')]
    player_configs: Vec<PathBuf>,

    /// How many games to play per matchup
    #[arg(short, long, default_value_t = 100)]
    num_games: usize,

    /// RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Match rules as a JSON file. Missing fields take their defaults.
    #[arg(short, long)]
    match_config: Option<PathBuf>,

    /// A game that lasts longer than this many moves is a tie
    #[arg(long, default_value_t = 500)]
    max_turns: u32,

    /// Stop the tournament as soon as one player makes an illegal move
    #[arg(short, long, default_value_t = false)]
    stop_on_illegal_move: bool,

    /// Record the games' events as JSON files into this directory
    #[arg(short, long)]
    record_games_to_directory: Option<PathBuf>,

    /// A log level among "off", "error", "warn", "info", "debug", "trace"
    #[arg(short, long, default_value = "info")]
    log_level: LevelFilter,
}

#[derive(Default)]
struct MatchScore {
    wins: [usize; 2],
    /// Wins of each player because the other one had no legal move left
    forfeits: [usize; 2],
    illegal_moves: [usize; 2],
    ties: usize,
    turn_limits: usize,
}

impl MatchScore {
    fn num_games(&self) -> usize {
        self.wins[0] + self.wins[1] + self.ties + self.turn_limits
    }

    fn record(&mut self, result: &GameResult) {
        match *result {
            GameResult::WonByPlayer { player_idx } => self.wins[player_idx] += 1,
            GameResult::Forfeit { player_idx } => {
                self.wins[1 - player_idx] += 1;
                self.forfeits[1 - player_idx] += 1;
            }
            GameResult::Tie => self.ties += 1,
            GameResult::TurnLimit => self.turn_limits += 1,
            GameResult::IllegalMoveByPlayer { player_idx, .. } => {
                self.wins[1 - player_idx] += 1;
                self.illegal_moves[player_idx] += 1;
            }
        }
    }

    /// How player `idx` won some of its games, if not by taking the lion.
    fn win_notes(&self, idx: usize) -> String {
        let mut notes = Vec::new();
        if self.forfeits[idx] > 0 {
            notes.push(format!("{} by forfeit", self.forfeits[idx]));
        }
        if self.illegal_moves[1 - idx] > 0 {
            notes.push(format!("{} through illegal moves", self.illegal_moves[1 - idx]));
        }
        if notes.is_empty() {
            String::new()
        } else {
            format!(" ({})", notes.join(", "))
        }
    }
}

fn play_matchup(
    player_1: &mut Player,
    player_2: &mut Player,
    num_games: usize,
    rng: &mut StdRng,
    settings: &GameSettings,
    stop_on_illegal_move: bool,
    recorder: &mut Option<Recorder>,
) -> anyhow::Result<MatchScore> {
    let player_names = [player_1.name.clone(), player_2.name.clone()];
    let mut match_score = MatchScore::default();

    for game_idx in 0..num_games {
        let result = play_game(rng, player_1, player_2, settings, recorder)?;
        match &result {
            GameResult::WonByPlayer { player_idx } => {
                debug!(winner = player_names[*player_idx], game_idx);
            }
            GameResult::Forfeit { player_idx } => {
                debug!(loser = player_names[*player_idx], game_idx, "Forfeit");
            }
            GameResult::Tie => debug!(game_idx, "Tie"),
            GameResult::TurnLimit => debug!(game_idx, "Turn limit"),
            GameResult::IllegalMoveByPlayer { player_idx, err } => {
                info!(
                    player = player_names[*player_idx],
                    game_idx, "Illegal move by player"
                );
                let mut err_dyn = err as &dyn std::error::Error;
                while let Some(src_err) = err_dyn.source() {
                    info!("{}", err_dyn);
                    err_dyn = src_err;
                }
                info!("{}", err_dyn);
                if stop_on_illegal_move {
                    break;
                }
            }
        }
        match_score.record(&result);
    }

    eprintln!(
        "End result:\n- {} wins by {}{}\n- {} wins by {}{}\n- {} ties, {} at the turn limit",
        match_score.wins[0],
        player_names[0],
        match_score.win_notes(0),
        match_score.wins[1],
        player_names[1],
        match_score.win_notes(1),
        match_score.ties + match_score.turn_limits,
        match_score.turn_limits
    );

    Ok(match_score)
}

/// One line per matchup, in the order they were played.
fn print_tournament_results(
    player_configs: &[PlayerConfig],
    match_results: &[((usize, usize), MatchScore)],
) {
    println!("\nTournament results:\n");
    println!(
        " {:>16} vs {:<16} | {:>6} {:>6} {:>6} | {:>8} {:>10}",
        "p1", "p2", "p1 %", "p2 %", "draw %", "forfeits", "turn limit"
    );
    println!("{}", "-".repeat(87));
    for ((i, j), score) in match_results {
        let num_games = score.num_games().max(1);
        let percentage = |n: usize| n as f32 / num_games as f32 * 100.0;
        println!(
            " {:>16} vs {:<16} | {:>6.1} {:>6.1} {:>6.1} | {:>8} {:>10}",
            player_configs[*i].nick,
            player_configs[*j].nick,
            percentage(score.wins[0]),
            percentage(score.wins[1]),
            percentage(score.ties + score.turn_limits),
            score.forfeits[0] + score.forfeits[1],
            score.turn_limits
        );
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    initialize_logging(args.log_level);

    // Get a random seed
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed);
    let mut rng = StdRng::seed_from_u64(seed);

    let mut recorder = if let Some(dir_path) = args.record_games_to_directory {
        Some(Recorder::new(dir_path)?)
    } else {
        None
    };

    let match_config = match &args.match_config {
        Some(path) => MatchConfig::load(path)?,
        None => MatchConfig::default(),
    };
    let settings = GameSettings {
        match_config,
        max_turns: args.max_turns,
    };

    let player_configs = args
        .player_configs
        .iter()
        .map(|path| PlayerConfig::load(path))
        .collect::<Result<Vec<PlayerConfig>, anyhow::Error>>()?;

    let matchups: Vec<(usize, usize)> = (0..player_configs.len()).tuple_combinations().collect();

    let mut match_results: Vec<((usize, usize), MatchScore)> = Vec::new();
    for (i1, i2) in matchups {
        let mut player_1 = Player::from_config(&player_configs[i1], &mut rng);
        let mut player_2 = Player::from_config(&player_configs[i2], &mut rng);

        let match_score = play_matchup(
            &mut player_1,
            &mut player_2,
            args.num_games,
            &mut rng,
            &settings,
            args.stop_on_illegal_move,
            &mut recorder,
        )?;

        match_results.push(((i1, i2), match_score));
    }

    if player_configs.len() > 2 {
        print_tournament_results(&player_configs, &match_results);
    }

    Ok(())
}

fn initialize_logging(level: LevelFilter) {
    let format = tracing_subscriber::fmt::format()
        .with_target(false)
        .compact();

    let filter = Targets::new().with_default(level);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(format)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}
