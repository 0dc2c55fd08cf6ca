use tracing::{debug, trace};

use crate::{Board, Piece, PieceId, Square, StatusEffect, StatusKind};

/// What a single hit did to a piece.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DamageReport {
    pub piece: PieceId,
    pub at: Square,
    /// Damage after mitigation.
    pub dealt: u16,
    pub final_health: u16,
    /// The piece, already taken off the board, if the hit killed it.
    pub corpse: Option<Piece>,
}

impl DamageReport {
    pub fn died(&self) -> bool {
        self.corpse.is_some()
    }
}

/// What one status tick did to a piece.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusTick {
    pub piece: PieceId,
    pub at: Square,
    pub poison_damage: u16,
    pub healed: u16,
    pub expired: Vec<StatusKind>,
    pub final_health: u16,
    /// Set if poison killed the piece. No healing or expiry happens then.
    pub corpse: Option<Piece>,
}

/// Hits the piece on `at` with `raw` damage, reduced by its armor and shields.
///
/// A piece that drops to zero health is removed from the board before this
/// returns. Returns `None` if there is no piece on `at`.
pub fn apply_damage(board: &mut Board, at: Square, raw: u16) -> Option<DamageReport> {
    let mitigation = board.piece_at(at)?.mitigation();
    hurt(board, at, raw.saturating_sub(mitigation))
}

/// Like [`apply_damage()`], but ignores armor and shields.
///
/// Used for poison and the collapsing board.
pub fn apply_true_damage(board: &mut Board, at: Square, amount: u16) -> Option<DamageReport> {
    hurt(board, at, amount)
}

fn hurt(board: &mut Board, at: Square, amount: u16) -> Option<DamageReport> {
    let piece = board.piece_at_mut(at)?;
    let dealt = piece.lose_health(amount);
    let (id, final_health) = (piece.id, piece.health());
    let corpse = if piece.is_dead() {
        let corpse = board.remove_piece(at);
        debug!(piece = %id, square = %at, "piece died");
        corpse
    } else {
        None
    };
    Some(DamageReport {
        piece: id,
        at,
        dealt,
        final_health,
        corpse,
    })
}

/// Heals the piece on `at`, up to its maximum health.
///
/// Returns the amount actually healed, or `None` if there is no piece on `at`.
pub fn apply_heal(board: &mut Board, at: Square, amount: u16) -> Option<u16> {
    Some(board.piece_at_mut(at)?.gain_health(amount))
}

/// Adds a status effect to the piece on `at`.
///
/// Effects of the same kind are not merged, their magnitudes add up.
/// Returns `false` if there is no piece on `at`.
pub fn apply_status(board: &mut Board, at: Square, effect: StatusEffect) -> bool {
    match board.piece_at_mut(at) {
        Some(piece) => {
            piece.add_status(effect);
            true
        }
        None => false,
    }
}

/// Runs the recurring effects of the piece on `at` once.
///
/// Poison is dealt first, then regeneration heals, and finally every effect
/// counts down and the expired ones are dropped.
pub fn tick_statuses(board: &mut Board, at: Square) -> Option<StatusTick> {
    let piece = board.piece_at(at)?;
    let (id, poison, regen) = (
        piece.id,
        piece.status_total(StatusKind::Poison),
        piece.status_total(StatusKind::Regen),
    );

    let mut poison_damage = 0;
    if poison > 0 {
        let report = hurt(board, at, poison)?;
        poison_damage = report.dealt;
        if report.died() {
            return Some(StatusTick {
                piece: id,
                at,
                poison_damage,
                healed: 0,
                expired: Vec::new(),
                final_health: 0,
                corpse: report.corpse,
            });
        }
    }

    let piece = board.piece_at_mut(at)?;
    let healed = piece.gain_health(regen);
    let expired = piece.expire_statuses();
    trace!(piece = %id, poison_damage, healed, health = piece.health(), "status tick");
    Some(StatusTick {
        piece: id,
        at,
        poison_damage,
        healed,
        expired,
        final_health: piece.health(),
        corpse: None,
    })
}
