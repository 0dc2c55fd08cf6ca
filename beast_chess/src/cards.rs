use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    apply_damage, apply_status, apply_true_damage, check_win_condition, Board, CardError,
    CardPlay, CreatureType, DamageCause, Event, Graveyard, MatchState, Phase, PieceId, Side,
    Square, StatusEffect, StatusKind, TurnOutcome,
};

/// A one-shot ability a side can use before its move.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "card", rename_all = "snake_case")]
pub enum Card {
    /// Hits one enemy piece. Armor and shields apply.
    Strike { damage: u16 },
    /// Every own piece regenerates `amount` on the next status tick.
    Mend { amount: u16 },
    /// Every own piece, or only those of `creature`, gains a status effect.
    Bolster {
        kind: StatusKind,
        magnitude: u16,
        duration: u16,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        creature: Option<CreatureType>,
    },
    /// The longest-dead own piece returns at full health.
    Revive,
    /// One own piece jumps to a random empty cell.
    Teleport,
    /// One cell leaves the playable area, hurting whoever stands on it.
    Collapse,
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Card::Strike { damage } => write!(f, "strike ({})", damage),
            Card::Mend { amount } => write!(f, "mend ({})", amount),
            Card::Bolster {
                kind,
                magnitude,
                duration,
                creature,
            } => {
                write!(f, "bolster ({:?} {} for {} turns", kind, magnitude, duration)?;
                if let Some(creature) = creature {
                    write!(f, ", {} only", creature)?;
                }
                write!(f, ")")
            }
            Card::Revive => write!(f, "revive"),
            Card::Teleport => write!(f, "teleport"),
            Card::Collapse => write!(f, "collapse"),
        }
    }
}

/// One of each card.
pub fn default_deck() -> Vec<Card> {
    vec![
        Card::Strike { damage: 2 },
        Card::Mend { amount: 2 },
        Card::Bolster {
            kind: StatusKind::Shield,
            magnitude: 2,
            duration: 2,
            creature: None,
        },
        Card::Revive,
        Card::Teleport,
        Card::Collapse,
    ]
}

/// A card with its targets resolved.
enum Effect {
    Strike { at: Square, damage: u16 },
    Status {
        squares: Vec<Square>,
        effect: StatusEffect,
    },
    Revive { id: PieceId, at: Square },
    Teleport { from: Square, to: Square },
    Collapse { at: Square },
}

/// Plays a card from the hand of the side to move.
///
/// The turn does not end, the side still has to move afterwards. Nothing is
/// changed if an error is returned.
pub fn play_card<G: Graveyard + ?Sized>(
    state: &mut MatchState,
    graveyard: &mut G,
    play: CardPlay,
    events: &mut Vec<Event>,
) -> Result<TurnOutcome, CardError> {
    let CardPlay {
        side,
        card_index,
        target,
    } = play;
    if state.phase != Phase::InProgress {
        return Err(CardError::GameNotInProgress);
    }
    if side != state.current_side {
        return Err(CardError::NotYourTurn { side });
    }
    if state.card_played_this_turn {
        return Err(CardError::AlreadyPlayedThisTurn);
    }
    let card = *state.hands[side.index()]
        .get(card_index)
        .ok_or(CardError::NoSuchCard { card_index })?;

    let effect = resolve(&state.board, &mut state.rng, &*graveyard, side, card, target)?;
    let mut effect_events = Vec::new();
    apply(state, graveyard, side, effect, &mut effect_events)?;

    state.hands[side.index()].remove(card_index);
    state.card_played_this_turn = true;
    debug!(%side, %card, "card played");
    events.push(Event::CardPlayed { side, card });
    events.append(&mut effect_events);

    match check_win_condition(&state.board) {
        Some(result) => Ok(state.finish(result, events)),
        None => Ok(TurnOutcome::Applied),
    }
}

fn pick(squares: &[Square], rng: &mut StdRng) -> Result<Square, CardError> {
    squares.choose(rng).copied().ok_or(CardError::NothingToAffect)
}

/// Validates the targets and makes the random choices.
///
/// Randomness is only consumed once nothing can fail anymore.
fn resolve<G: Graveyard + ?Sized>(
    board: &Board,
    rng: &mut StdRng,
    graveyard: &G,
    side: Side,
    card: Card,
    target: Option<Square>,
) -> Result<Effect, CardError> {
    let own_squares = |creature: Option<CreatureType>| -> Vec<Square> {
        board
            .pieces_of(side)
            .filter(|(_, p)| creature.map_or(true, |c| p.creature == c))
            .map(|(sq, _)| sq)
            .collect()
    };
    let empty_target = |target: Option<Square>| -> Result<Option<Square>, CardError> {
        match target {
            Some(sq) if board.check_placement(sq).is_err() => {
                Err(CardError::InvalidTarget { target: sq })
            }
            other => Ok(other),
        }
    };

    match card {
        Card::Strike { damage } => {
            let at = match target {
                Some(sq) if board.piece_at(sq).is_some_and(|p| p.side != side) => sq,
                Some(sq) => return Err(CardError::InvalidTarget { target: sq }),
                None => {
                    let enemies: Vec<Square> = board
                        .pieces_of(side.opponent())
                        .map(|(sq, _)| sq)
                        .collect();
                    pick(&enemies, rng)?
                }
            };
            Ok(Effect::Strike { at, damage })
        }
        Card::Mend { amount } => status_effect(
            own_squares(None),
            StatusEffect {
                kind: StatusKind::Regen,
                magnitude: amount,
                remaining_turns: 1,
            },
        ),
        Card::Bolster {
            kind,
            magnitude,
            duration,
            creature,
        } => status_effect(
            own_squares(creature),
            StatusEffect {
                kind,
                magnitude,
                remaining_turns: duration,
            },
        ),
        Card::Revive => {
            let target = empty_target(target)?;
            let id = graveyard.peek(side).ok_or(CardError::NothingToAffect)?.id;
            let at = match target {
                Some(sq) => sq,
                None => pick(&board.empty_active_squares(), rng)?,
            };
            Ok(Effect::Revive { id, at })
        }
        Card::Teleport => {
            let from = match target {
                Some(sq) if board.piece_at(sq).is_some_and(|p| p.side == side) => Some(sq),
                Some(sq) => return Err(CardError::InvalidTarget { target: sq }),
                None => None,
            };
            let own = own_squares(None);
            let free = board.empty_active_squares();
            if own.is_empty() || free.is_empty() {
                return Err(CardError::NothingToAffect);
            }
            let from = match from {
                Some(sq) => sq,
                None => pick(&own, rng)?,
            };
            let to = pick(&free, rng)?;
            Ok(Effect::Teleport { from, to })
        }
        Card::Collapse => {
            let at = match target {
                Some(sq) if board.is_in_bounds(sq) => sq,
                Some(sq) => return Err(CardError::InvalidTarget { target: sq }),
                None => {
                    let active: Vec<Square> =
                        board.squares().filter(|&sq| board.is_in_bounds(sq)).collect();
                    pick(&active, rng)?
                }
            };
            Ok(Effect::Collapse { at })
        }
    }
}

fn status_effect(squares: Vec<Square>, effect: StatusEffect) -> Result<Effect, CardError> {
    if squares.is_empty() {
        return Err(CardError::NothingToAffect);
    }
    Ok(Effect::Status { squares, effect })
}

fn apply<G: Graveyard + ?Sized>(
    state: &mut MatchState,
    graveyard: &mut G,
    side: Side,
    effect: Effect,
    events: &mut Vec<Event>,
) -> Result<(), CardError> {
    let board = &mut state.board;
    match effect {
        Effect::Strike { at, damage } => {
            if let Some(report) = apply_damage(board, at, damage) {
                Event::push_damage(events, report, DamageCause::Attack);
            }
        }
        Effect::Status { squares, effect } => {
            for at in squares {
                if apply_status(board, at, effect) {
                    if let Some(piece) = board.piece_at(at) {
                        events.push(Event::StatusApplied {
                            piece: piece.id,
                            at,
                            effect,
                        });
                    }
                }
            }
        }
        Effect::Revive { id, at } => {
            let mut piece = graveyard
                .peek(side)
                .filter(|p| p.id == id)
                .cloned()
                .ok_or(CardError::NothingToAffect)?;
            piece.restore();
            board
                .place_piece(at, piece)
                .map_err(|_| CardError::InvalidTarget { target: at })?;
            graveyard.exhume(side, id);
            events.push(Event::PieceRevived { piece: id, at });
        }
        Effect::Teleport { from, to } => {
            board
                .check_placement(to)
                .map_err(|_| CardError::InvalidTarget { target: to })?;
            if let Some(piece) = board.remove_piece(from) {
                let id = piece.id;
                board
                    .place_piece(to, piece)
                    .map_err(|_| CardError::InvalidTarget { target: to })?;
                events.push(Event::PieceTeleported { piece: id, from, to });
            }
        }
        Effect::Collapse { at } => {
            let occupied = board.deactivate_cell(at).is_some();
            events.push(Event::CellCollapsed { at });
            if occupied {
                if let Some(report) = apply_true_damage(board, at, state.config.collapse_damage) {
                    Event::push_damage(events, report, DamageCause::Collapse);
                }
            }
        }
    }
    Ok(())
}
