pub use board::*;
pub use cards::*;
pub use combat::*;
pub use config::*;
pub use creatures::*;
pub use errors::*;
pub use events::*;
pub use game::*;
pub use graveyard::*;
pub use moves::*;
pub use piece::*;
pub use protocol_types::*;
pub use shrink::*;
pub use turn::*;
pub use visualization::*;

#[cfg(test)]
mod arbitrary;
mod board;
mod cards;
mod combat;
mod config;
mod creatures;
mod errors;
mod events;
mod game;
mod graveyard;
mod moves;
mod piece;
mod protocol_types;
mod shrink;
mod turn;
mod visualization;
