use serde::{Deserialize, Serialize};

use crate::{CreatureStats, CreatureType, Side};

/// Identifies a piece for the whole match, including after it was revived.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PieceId(pub u16);

impl std::fmt::Display for PieceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a [`StatusEffect`] does.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    /// Reduces incoming attack damage by its magnitude.
    Shield,
    /// Deals its magnitude as damage on every status tick.
    Poison,
    /// Heals its magnitude on every status tick.
    Regen,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEffect {
    pub kind: StatusKind,
    pub magnitude: u16,
    pub remaining_turns: u16,
}

/// A creature on the board.
///
/// Health is kept within `0..=max_health` by only changing it through
/// the combat functions in this crate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub id: PieceId,
    pub creature: CreatureType,
    pub side: Side,
    health: u16,
    max_health: u16,
    armor: u16,
    pub has_moved: bool,
    /// In the order they were applied.
    statuses: Vec<StatusEffect>,
}

impl Piece {
    pub fn new(id: PieceId, creature: CreatureType, side: Side, stats: CreatureStats) -> Self {
        Self {
            id,
            creature,
            side,
            health: stats.health,
            max_health: stats.health,
            armor: stats.armor,
            has_moved: false,
            statuses: Vec::new(),
        }
    }

    pub fn health(&self) -> u16 {
        self.health
    }

    pub fn max_health(&self) -> u16 {
        self.max_health
    }

    pub fn armor(&self) -> u16 {
        self.armor
    }

    pub fn statuses(&self) -> &[StatusEffect] {
        &self.statuses
    }

    pub fn is_leader(&self) -> bool {
        self.creature.is_leader()
    }

    pub fn is_dead(&self) -> bool {
        self.health == 0
    }

    /// Sum of the magnitudes of all active effects of this kind.
    pub fn status_total(&self, kind: StatusKind) -> u16 {
        self.statuses
            .iter()
            .filter(|s| s.kind == kind)
            .fold(0u16, |acc, s| acc.saturating_add(s.magnitude))
    }

    /// How much of every attack this piece ignores.
    pub fn mitigation(&self) -> u16 {
        self.armor
            .saturating_add(self.status_total(StatusKind::Shield))
    }

    /// Returns the health actually lost.
    pub(crate) fn lose_health(&mut self, amount: u16) -> u16 {
        let lost = amount.min(self.health);
        self.health -= lost;
        lost
    }

    /// Returns the health actually gained.
    pub(crate) fn gain_health(&mut self, amount: u16) -> u16 {
        let gained = amount.min(self.max_health - self.health);
        self.health += gained;
        gained
    }

    pub(crate) fn add_status(&mut self, effect: StatusEffect) {
        self.statuses.push(effect);
    }

    /// Counts every effect down by one turn and drops the ones that ran out.
    ///
    /// Returns the kinds of the dropped effects, in application order.
    pub(crate) fn expire_statuses(&mut self) -> Vec<StatusKind> {
        let mut expired = Vec::new();
        self.statuses.retain_mut(|effect| {
            effect.remaining_turns = effect.remaining_turns.saturating_sub(1);
            if effect.remaining_turns == 0 {
                expired.push(effect.kind);
                false
            } else {
                true
            }
        });
        expired
    }

    /// Brings a dead piece back: full health, no effects.
    pub(crate) fn restore(&mut self) {
        self.health = self.max_health;
        self.statuses.clear();
    }
}
