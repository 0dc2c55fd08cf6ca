use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::{
    Card, DamageReport, MatchResult, Piece, PieceId, ShrinkPattern, Side, Square, StatusEffect,
    StatusKind, StatusTick,
};

/// Why a piece lost health.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageCause {
    Capture,
    Attack,
    Poison,
    /// The cell under the piece was deactivated.
    Collapse,
    /// The piece ended a turn outside the playable area.
    OutOfBounds,
}

/// A notification about something that happened in a match.
///
/// Events are emitted in the order the engine applies the changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    MatchStarted {
        first_side: Side,
        width: i8,
        height: i8,
    },
    CardPlayed {
        side: Side,
        card: Card,
    },
    PieceMoved {
        piece: PieceId,
        from: Square,
        to: Square,
    },
    PieceCaptured {
        piece: PieceId,
        by: PieceId,
        at: Square,
    },
    PieceDamaged {
        piece: PieceId,
        at: Square,
        amount: u16,
        health: u16,
        cause: DamageCause,
    },
    PieceHealed {
        piece: PieceId,
        at: Square,
        amount: u16,
        health: u16,
    },
    StatusApplied {
        piece: PieceId,
        at: Square,
        effect: StatusEffect,
    },
    /// The piece is no longer on the board.
    PieceDied {
        piece: Piece,
        at: Square,
        cause: DamageCause,
    },
    PieceRevived {
        piece: PieceId,
        at: Square,
    },
    PieceTeleported {
        piece: PieceId,
        from: Square,
        to: Square,
    },
    ShrinkApplied {
        level: u8,
        pattern: ShrinkPattern,
        cells: Vec<Square>,
    },
    CellCollapsed {
        at: Square,
    },
    StatusTicked {
        piece: PieceId,
        at: Square,
        poison_damage: u16,
        healed: u16,
        expired: Vec<StatusKind>,
        health: u16,
    },
    /// The last event of every accepted move that did not end the match.
    TurnEnded {
        turn: u32,
        next_side: Side,
    },
    GameEnded {
        result: MatchResult,
    },
}

impl Event {
    /// Turns a hit into a `PieceDamaged` event, followed by `PieceDied` if it was lethal.
    pub(crate) fn push_damage(events: &mut Vec<Event>, report: DamageReport, cause: DamageCause) {
        events.push(Event::PieceDamaged {
            piece: report.piece,
            at: report.at,
            amount: report.dealt,
            health: report.final_health,
            cause,
        });
        if let Some(piece) = report.corpse {
            events.push(Event::PieceDied {
                piece,
                at: report.at,
                cause,
            });
        }
    }

    pub(crate) fn push_status_tick(events: &mut Vec<Event>, tick: StatusTick) {
        events.push(Event::StatusTicked {
            piece: tick.piece,
            at: tick.at,
            poison_damage: tick.poison_damage,
            healed: tick.healed,
            expired: tick.expired,
            health: tick.final_health,
        });
        if let Some(piece) = tick.corpse {
            events.push(Event::PieceDied {
                piece,
                at: tick.at,
                cause: DamageCause::Poison,
            });
        }
    }
}

/// Receives the events of a match.
pub trait EventSink {
    fn notify(&mut self, event: &Event);
}

impl<F: FnMut(&Event)> EventSink for F {
    fn notify(&mut self, event: &Event) {
        self(event)
    }
}

/// A sink that collects events in a buffer shared by all its clones.
///
/// Subscribe one clone and keep another to read the events.
#[derive(Clone, Debug, Default)]
pub struct EventLog(Rc<RefCell<Vec<Event>>>);

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empties the buffer and returns what was in it.
    pub fn take(&self) -> Vec<Event> {
        self.0.take()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }
}

impl EventSink for EventLog {
    fn notify(&mut self, event: &Event) {
        self.0.borrow_mut().push(event.clone());
    }
}
