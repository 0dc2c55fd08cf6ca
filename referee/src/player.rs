use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context;
use beast_chess::{MatchState, MoveRequest, Side, TurnError};
use beast_chess_bot_utils::Policy;
use greedy_bot::GreedyPolicy;
use max_bot::MaxPolicy;
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Which built-in AI a player uses.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    Random,
    Greedy,
    Max,
}

/// A player as described in its JSON config file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerConfig {
    pub nick: String,
    pub policy: PolicyKind,
    /// Seeds the policy's RNG. Drawn from the referee's RNG if missing.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl PlayerConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Could not open player config '{}'", path.display()))?;
        let config = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Invalid player config '{}'", path.display()))?;
        Ok(config)
    }
}

pub struct Player {
    pub name: String,
    policy: Box<dyn Policy>,
}

impl Player {
    pub fn new(name: &str, policy: Box<dyn Policy>) -> Self {
        Self {
            name: String::from(name),
            policy,
        }
    }

    pub fn from_config(config: &PlayerConfig, rng: &mut StdRng) -> Self {
        let seed = config.seed.unwrap_or_else(|| rng.gen());
        let policy: Box<dyn Policy> = match config.policy {
            PolicyKind::Random => Box::new(random_bot::RandomPolicy::new(seed)),
            PolicyKind::Greedy => Box::new(GreedyPolicy::new(seed)),
            PolicyKind::Max => Box::new(MaxPolicy),
        };
        Self::new(&config.nick, policy)
    }

    pub fn choose_move(&mut self, state: &MatchState, side: Side) -> Result<MoveRequest, TurnError> {
        let request = self.policy.choose_move(state, side);
        trace!(
            name: "Chose move",
            player = &self.name,
            policy = self.policy.name(),
            request = ?request
        );
        request
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn parse_config() {
        let config: PlayerConfig =
            serde_json::from_str(r#"{ "nick": "hugo", "policy": "greedy", "seed": 4 }"#).unwrap();
        assert_eq!(
            config,
            PlayerConfig {
                nick: String::from("hugo"),
                policy: PolicyKind::Greedy,
                seed: Some(4),
            }
        );
        let config: PlayerConfig =
            serde_json::from_str(r#"{ "nick": "max", "policy": "max" }"#).unwrap();
        assert_eq!(config.seed, None);
        assert!(serde_json::from_str::<PlayerConfig>(r#"{ "nick": "x", "policy": "smart" }"#)
            .is_err());
    }

    #[test]
    fn player_from_config() {
        let mut rng = StdRng::seed_from_u64(0);
        let config = PlayerConfig {
            nick: String::from("r"),
            policy: PolicyKind::Random,
            seed: None,
        };
        let player = Player::from_config(&config, &mut rng);
        assert_eq!(player.name, "r");
        assert_eq!(player.policy.name(), "random");
    }
}
