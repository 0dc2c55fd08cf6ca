use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use beast_chess::{Event, EventLog, Side};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Writes the event stream of each game into its own JSON file.
pub struct Recorder {
    num: usize,
    directory: PathBuf,
    log: EventLog,
}

impl Recorder {
    pub fn new(directory: PathBuf) -> anyhow::Result<Self> {
        if !directory.is_dir() {
            anyhow::bail!("Directory '{}' does not exist", directory.display());
        }
        Ok(Self {
            num: 1,
            directory,
            log: EventLog::new(),
        })
    }

    /// The buffer to subscribe to the next game.
    ///
    /// Anything left over from a game that was never written is dropped.
    pub fn new_game(&self) -> EventLog {
        let leftover = self.log.take();
        if !leftover.is_empty() {
            debug!(events = leftover.len(), "Dropping unrecorded events");
        }
        self.log.clone()
    }

    /// Writes `game_000001.json`, `game_000002.json` and so on.
    pub fn write_game_recording(
        &mut self,
        players: [(Side, &str); 2],
        seed: u64,
    ) -> anyhow::Result<PathBuf> {
        let recording = GameRecording {
            players: players
                .iter()
                .map(|&(side, name)| PlayerEntry {
                    name: String::from(name),
                    side,
                })
                .collect(),
            seed,
            events: self.log.take(),
        };
        let filepath = self.directory.join(format!("game_{:0>6}.json", self.num));
        let mut writer = BufWriter::new(File::create(&filepath)?);
        serde_json::to_writer_pretty(&mut writer, &recording)?;
        writeln!(writer)?;
        writer.flush()?;
        self.num += 1;
        Ok(filepath)
    }
}

#[derive(Serialize, Deserialize)]
pub struct GameRecording {
    pub players: Vec<PlayerEntry>,
    /// The match seed, enough to replay random shrinks and card effects.
    pub seed: u64,
    pub events: Vec<Event>,
}

#[derive(Serialize, Deserialize)]
pub struct PlayerEntry {
    pub name: String,
    pub side: Side,
}
