use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    apply_shrink, apply_true_damage, tick_statuses, Board, DamageCause, Event, IllegalMove,
    MatchResult, MatchState, MoveRequest, Phase, Side, Square, TurnError,
};

/// Summarizes the outcome of an accepted move or card.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnOutcome {
    Applied,
    GameOver(MatchResult),
}

/// Decides the match if a leader is missing from the board.
///
/// Both leaders missing at once is a draw.
pub fn check_win_condition(board: &Board) -> Option<MatchResult> {
    match (board.has_leader(Side::South), board.has_leader(Side::North)) {
        (true, true) => None,
        (true, false) => Some(MatchResult::Won(Side::South)),
        (false, true) => Some(MatchResult::Won(Side::North)),
        (false, false) => Some(MatchResult::Draw),
    }
}

/// Plays one move and everything that follows from it.
///
/// In order: the move and its capture, damage to pieces outside the
/// playable area, the shrink countdown, status effects (South first, each
/// side in row-major order) and finally the hand-over to the other side.
/// The match is checked for a winner after every step that can kill, and the
/// first decisive step ends the turn early.
///
/// Nothing is changed if an error is returned.
pub fn execute_turn(
    state: &mut MatchState,
    request: MoveRequest,
    events: &mut Vec<Event>,
) -> Result<TurnOutcome, TurnError> {
    let MoveRequest { from, to, side } = request;
    if state.phase != Phase::InProgress {
        return Err(TurnError::GameNotInProgress);
    }
    if side != state.current_side {
        return Err(TurnError::NotYourTurn { side });
    }
    let mover = match state.board.piece_at(from) {
        Some(piece) if piece.side != side => {
            let err = IllegalMove::PieceNotOwned { owner: piece.side };
            return Err(TurnError::from_illegal_move(from, to, err));
        }
        Some(piece) => piece.id,
        None if state.board.contains(from) => {
            return Err(TurnError::from_illegal_move(from, to, IllegalMove::NoPieceAtOrigin));
        }
        None => return Err(TurnError::OutOfBounds { square: from }),
    };

    // Move and capture
    let captured = state
        .board
        .move_piece(from, to)
        .map_err(|err| TurnError::from_illegal_move(from, to, err))?;
    debug!(turn = state.turn_number, %side, %from, %to, "move");
    events.push(Event::PieceMoved {
        piece: mover,
        from,
        to,
    });
    if let Some(victim) = captured {
        let leader = victim.is_leader();
        events.push(Event::PieceCaptured {
            piece: victim.id,
            by: mover,
            at: to,
        });
        events.push(Event::PieceDied {
            piece: victim,
            at: to,
            cause: DamageCause::Capture,
        });
        if leader {
            return Ok(state.finish(MatchResult::Won(side), events));
        }
    }

    // Pieces that were already outside before this turn's shrink
    let damage = state.config.out_of_bounds_damage;
    if damage > 0 {
        let stragglers: Vec<Square> = state
            .board
            .pieces()
            .map(|(sq, _)| sq)
            .filter(|&sq| !state.board.is_in_bounds(sq))
            .collect();
        for sq in stragglers {
            if let Some(report) = apply_true_damage(&mut state.board, sq, damage) {
                Event::push_damage(events, report, DamageCause::OutOfBounds);
            }
        }
        if let Some(outcome) = state.check_end(events) {
            return Ok(outcome);
        }
    }

    if state.shrink.count_down() {
        let report = apply_shrink(
            &mut state.shrink,
            &mut state.board,
            state.config.collapse_damage,
            state.config.random_shrink_cells,
            &mut state.rng,
        );
        if let Some(report) = report {
            events.push(Event::ShrinkApplied {
                level: report.level,
                pattern: report.pattern,
                cells: report.cells,
            });
            for hit in report.caught {
                Event::push_damage(events, hit, DamageCause::Collapse);
            }
            if let Some(outcome) = state.check_end(events) {
                return Ok(outcome);
            }
        }
    }

    for side in Side::ALL {
        let affected: Vec<Square> = state
            .board
            .pieces_of(side)
            .filter(|(_, p)| !p.statuses().is_empty())
            .map(|(sq, _)| sq)
            .collect();
        for sq in affected {
            if let Some(tick) = tick_statuses(&mut state.board, sq) {
                Event::push_status_tick(events, tick);
            }
        }
    }

    if let Some(outcome) = state.check_end(events) {
        return Ok(outcome);
    }
    state.current_side = side.opponent();
    state.turn_number += 1;
    state.card_played_this_turn = false;
    events.push(Event::TurnEnded {
        turn: state.turn_number,
        next_side: state.current_side,
    });
    Ok(TurnOutcome::Applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        apply_status, CreatureType, MatchConfig, Placement, ShrinkPattern, StatusEffect,
        StatusKind,
    };

    fn placement(x: i8, y: i8, creature: CreatureType, side: Side) -> Placement {
        Placement {
            at: Square::new(x, y),
            creature,
            side,
        }
    }

    fn started(layout: Vec<Placement>, config: MatchConfig) -> MatchState {
        let mut state = MatchState::new(MatchConfig {
            layout: Some(layout),
            ..config
        })
        .unwrap();
        state.start(&mut Vec::new()).unwrap();
        state
    }

    fn request(from: (i8, i8), to: (i8, i8), side: Side) -> MoveRequest {
        MoveRequest {
            from: from.into(),
            to: to.into(),
            side,
        }
    }

    #[test]
    fn win_condition_is_symmetric() {
        let mut board = Board::new(4, 4);
        assert_eq!(check_win_condition(&board), Some(MatchResult::Draw));
        let lion = |side: Side| {
            crate::Piece::new(
                crate::PieceId(side as u16),
                CreatureType::Lion,
                side,
                crate::CreatureStats { health: 1, armor: 0 },
            )
        };
        board.place_piece(Square::new(0, 0), lion(Side::South)).unwrap();
        assert_eq!(check_win_condition(&board), Some(MatchResult::Won(Side::South)));
        board.place_piece(Square::new(3, 3), lion(Side::North)).unwrap();
        assert_eq!(check_win_condition(&board), None);
        board.remove_piece(Square::new(0, 0));
        assert_eq!(check_win_condition(&board), Some(MatchResult::Won(Side::North)));
    }

    #[test]
    fn rejected_moves_leave_the_state_alone() {
        let mut state = started(
            vec![
                placement(0, 0, CreatureType::Lion, Side::South),
                placement(7, 7, CreatureType::Lion, Side::North),
            ],
            MatchConfig::default(),
        );
        let before = state.clone();
        let mut events = Vec::new();
        assert_eq!(
            execute_turn(&mut state, request((7, 7), (7, 6), Side::North), &mut events),
            Err(TurnError::NotYourTurn { side: Side::North })
        );
        assert_eq!(
            execute_turn(&mut state, request((7, 7), (7, 6), Side::South), &mut events),
            Err(TurnError::IllegalMove {
                from: Square::new(7, 7),
                to: Square::new(7, 6),
                err: IllegalMove::PieceNotOwned { owner: Side::North },
            })
        );
        assert_eq!(
            execute_turn(&mut state, request((0, 0), (-1, 0), Side::South), &mut events),
            Err(TurnError::OutOfBounds {
                square: Square::new(-1, 0)
            })
        );
        assert!(events.is_empty());
        assert_eq!(state.board, before.board);
        assert_eq!(state.turn_number, before.turn_number);
        assert_eq!(state.current_side, before.current_side);
    }

    #[test]
    fn turns_alternate() {
        let mut state = started(
            vec![
                placement(0, 0, CreatureType::Lion, Side::South),
                placement(7, 7, CreatureType::Lion, Side::North),
            ],
            MatchConfig::default(),
        );
        let mut events = Vec::new();
        execute_turn(&mut state, request((0, 0), (1, 1), Side::South), &mut events).unwrap();
        assert_eq!(state.current_side, Side::North);
        assert_eq!(state.turn_number, 2);
        assert_eq!(
            events.last(),
            Some(&Event::TurnEnded {
                turn: 2,
                next_side: Side::North
            })
        );
    }

    #[test]
    fn poisoned_leader_loses_the_match() {
        let mut state = started(
            vec![
                placement(0, 0, CreatureType::Lion, Side::South),
                placement(7, 7, CreatureType::Lion, Side::North),
            ],
            MatchConfig::default(),
        );
        apply_status(
            &mut state.board,
            Square::new(7, 7),
            StatusEffect {
                kind: StatusKind::Poison,
                magnitude: 30,
                remaining_turns: 1,
            },
        );
        let mut events = Vec::new();
        let outcome = execute_turn(&mut state, request((0, 0), (0, 1), Side::South), &mut events);
        assert_eq!(outcome, Ok(TurnOutcome::GameOver(MatchResult::Won(Side::South))));
        assert_eq!(state.phase, Phase::Ended);
        assert!(events.iter().any(|e| matches!(
            e,
            Event::PieceDied {
                cause: crate::DamageCause::Poison,
                ..
            }
        )));
        assert_eq!(
            execute_turn(&mut state, request((7, 7), (7, 6), Side::North), &mut events),
            Err(TurnError::GameNotInProgress)
        );
    }

    #[test]
    fn pieces_outside_take_periodic_damage() {
        let config = MatchConfig {
            shrink_interval: 1,
            shrink_pattern: ShrinkPattern::OuterRing,
            ..Default::default()
        };
        let mut state = started(
            vec![
                placement(3, 3, CreatureType::Lion, Side::South),
                placement(4, 4, CreatureType::Lion, Side::North),
                placement(0, 7, CreatureType::Bear, Side::North),
            ],
            config,
        );
        let bear = Square::new(0, 7);
        let mut events = Vec::new();
        // First shrink takes the border: the bear takes the collapse hit only
        execute_turn(&mut state, request((3, 3), (3, 2), Side::South), &mut events).unwrap();
        assert_eq!(state.board.piece_at(bear).unwrap().health(), 10);
        // Next turn the bear is already outside and takes periodic damage
        execute_turn(&mut state, request((4, 4), (4, 5), Side::North), &mut events).unwrap();
        assert_eq!(state.board.piece_at(bear).unwrap().health(), 5);
        assert!(events.iter().any(|e| matches!(
            e,
            Event::PieceDamaged {
                cause: crate::DamageCause::OutOfBounds,
                amount: 5,
                ..
            }
        )));
    }
}
