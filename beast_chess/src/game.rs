use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    check_win_condition, execute_turn, legal_destinations, play_card, Board, Card, CardError,
    CardPlay, Crypt, Event, EventSink, Graveyard, MatchConfig, MoveRequest, Piece, PieceId,
    Placement, SetupError, ShrinkState, Side, Square, TurnError, TurnOutcome,
};

/// The lifecycle of a match. Moves are only accepted while it is in progress.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Setup,
    InProgress,
    Ended,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchResult {
    Won(Side),
    Draw,
}

impl std::fmt::Display for MatchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchResult::Won(side) => write!(f, "{} won", side),
            MatchResult::Draw => write!(f, "draw"),
        }
    }
}

/// Everything the rules need to know about a match.
///
/// Cloning it is how AI players look ahead without touching the real match.
#[derive(Clone, Debug)]
pub struct MatchState {
    pub(crate) board: Board,
    pub(crate) shrink: ShrinkState,
    pub(crate) current_side: Side,
    pub(crate) turn_number: u32,
    pub(crate) phase: Phase,
    pub(crate) result: Option<MatchResult>,
    pub(crate) hands: [Vec<Card>; 2],
    pub(crate) card_played_this_turn: bool,
    pub(crate) config: MatchConfig,
    pub(crate) rng: StdRng,
    next_piece_id: u16,
}

impl MatchState {
    /// Validates the config and sets up the board. The match starts in [`Phase::Setup`].
    pub fn new(config: MatchConfig) -> Result<Self, SetupError> {
        config.validate()?;
        let shrink = ShrinkState::new(
            config.shrink_pattern,
            config.shrink_interval,
            config.max_shrink_level(),
        );
        let mut state = Self {
            board: Board::new(config.width, config.height),
            shrink,
            current_side: config.first_side,
            turn_number: 1,
            phase: Phase::Setup,
            result: None,
            hands: [Vec::new(), Vec::new()],
            card_played_this_turn: false,
            rng: StdRng::seed_from_u64(config.seed),
            next_piece_id: 0,
            config,
        };
        for placement in state.config.placements()? {
            state.place(placement)?;
        }
        Ok(state)
    }

    pub(crate) fn place(&mut self, placement: Placement) -> Result<PieceId, SetupError> {
        if self.phase != Phase::Setup {
            return Err(SetupError::NotInSetup);
        }
        let Placement {
            at,
            creature,
            side,
        } = placement;
        let id = PieceId(self.next_piece_id);
        let piece = Piece::new(id, creature, side, self.config.stats.stats_for(creature));
        self.board.place_piece(at, piece)?;
        self.next_piece_id += 1;
        Ok(id)
    }

    /// Deals the hands and opens the match for moves.
    pub(crate) fn start(&mut self, events: &mut Vec<Event>) -> Result<(), SetupError> {
        if self.phase != Phase::Setup {
            return Err(SetupError::NotInSetup);
        }
        if let Some(side) = Side::ALL
            .into_iter()
            .find(|&side| !self.board.has_leader(side))
        {
            return Err(SetupError::MissingLeader { side });
        }
        for side in Side::ALL {
            let hand: Vec<Card> = (0..self.config.hand_size)
                .filter_map(|_| self.config.deck.choose(&mut self.rng).copied())
                .collect();
            self.hands[side.index()] = hand;
        }
        self.phase = Phase::InProgress;
        info!(
            first_side = %self.current_side,
            width = self.board.width(),
            height = self.board.height(),
            pieces = self.board.pieces().count(),
            "match started"
        );
        events.push(Event::MatchStarted {
            first_side: self.current_side,
            width: self.board.width(),
            height: self.board.height(),
        });
        Ok(())
    }

    /// Ends the match for good.
    pub(crate) fn finish(&mut self, result: MatchResult, events: &mut Vec<Event>) -> TurnOutcome {
        self.phase = Phase::Ended;
        self.result = Some(result);
        info!(turn = self.turn_number, %result, "match ended");
        events.push(Event::GameEnded { result });
        TurnOutcome::GameOver(result)
    }

    /// Ends the match if a leader is gone.
    pub(crate) fn check_end(&mut self, events: &mut Vec<Event>) -> Option<TurnOutcome> {
        let result = check_win_condition(&self.board)?;
        Some(self.finish(result, events))
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn shrink_state(&self) -> &ShrinkState {
        &self.shrink
    }

    pub fn current_side(&self) -> Side {
        self.current_side
    }

    /// Starts at 1 and goes up with every accepted move.
    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// `None` until the match has ended.
    pub fn result(&self) -> Option<MatchResult> {
        self.result
    }

    pub fn hand(&self, side: Side) -> &[Card] {
        &self.hands[side.index()]
    }

    pub fn card_played_this_turn(&self) -> bool {
        self.card_played_this_turn
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Where the piece on `from` may move. Empty if there is no piece.
    pub fn legal_moves(&self, from: Square) -> BTreeSet<Square> {
        match self.board.piece_at(from) {
            Some(piece) => legal_destinations(piece.creature, piece.side, from, &self.board),
            None => BTreeSet::new(),
        }
    }

    /// Every move `side` could make, ordered by origin in row-major order.
    pub fn all_legal_moves(&self, side: Side) -> Vec<MoveRequest> {
        self.board
            .pieces_of(side)
            .flat_map(|(from, _)| {
                self.legal_moves(from)
                    .into_iter()
                    .map(move |to| MoveRequest { from, to, side })
            })
            .collect()
    }
}

/// A match with its collaborators: a graveyard and the event subscribers.
pub struct Match<G: Graveyard = Crypt> {
    state: MatchState,
    graveyard: G,
    sinks: Vec<Box<dyn EventSink>>,
}

/// Creates a match from the config and starts it right away.
pub fn create_match(config: MatchConfig) -> Result<Match, SetupError> {
    let mut game = Match::new(config)?;
    game.start()?;
    Ok(game)
}

impl Match {
    /// Creates a match in [`Phase::Setup`] with an empty [`Crypt`].
    pub fn new(config: MatchConfig) -> Result<Self, SetupError> {
        Self::with_graveyard(config, Crypt::new())
    }
}

impl<G: Graveyard> Match<G> {
    pub fn with_graveyard(config: MatchConfig, graveyard: G) -> Result<Self, SetupError> {
        Ok(Self {
            state: MatchState::new(config)?,
            graveyard,
            sinks: Vec::new(),
        })
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn graveyard(&self) -> &G {
        &self.graveyard
    }

    /// Registers a sink for all future events.
    pub fn subscribe(&mut self, sink: impl EventSink + 'static) {
        self.sinks.push(Box::new(sink));
    }

    /// Adds a piece before the match starts.
    pub fn place_piece(&mut self, placement: Placement) -> Result<PieceId, SetupError> {
        self.state.place(placement)
    }

    /// Requires both leaders on the board.
    pub fn start(&mut self) -> Result<(), SetupError> {
        let mut events = Vec::new();
        self.state.start(&mut events)?;
        self.dispatch(events);
        Ok(())
    }

    pub fn submit_move(
        &mut self,
        from: Square,
        to: Square,
        side: Side,
    ) -> Result<TurnOutcome, TurnError> {
        let mut events = Vec::new();
        let outcome = execute_turn(&mut self.state, MoveRequest { from, to, side }, &mut events)?;
        self.dispatch(events);
        Ok(outcome)
    }

    /// Plays a card before the move. See [`play_card()`].
    pub fn play_card(&mut self, play: CardPlay) -> Result<TurnOutcome, CardError> {
        let mut events = Vec::new();
        let outcome = play_card(&mut self.state, &mut self.graveyard, play, &mut events)?;
        self.dispatch(events);
        Ok(outcome)
    }

    /// Gives the match to the opponent, e.g. when `side` has no legal move left.
    pub fn concede(&mut self, side: Side) -> Result<MatchResult, TurnError> {
        self.end_early(MatchResult::Won(side.opponent()))
    }

    /// Ends the match without a winner, e.g. when a turn limit is reached.
    pub fn declare_draw(&mut self) -> Result<MatchResult, TurnError> {
        self.end_early(MatchResult::Draw)
    }

    fn end_early(&mut self, result: MatchResult) -> Result<MatchResult, TurnError> {
        if self.state.phase != Phase::InProgress {
            return Err(TurnError::GameNotInProgress);
        }
        let mut events = Vec::new();
        self.state.finish(result, &mut events);
        self.dispatch(events);
        Ok(result)
    }

    pub fn legal_moves(&self, from: Square) -> BTreeSet<Square> {
        self.state.legal_moves(from)
    }

    pub fn all_legal_moves(&self, side: Side) -> Vec<MoveRequest> {
        self.state.all_legal_moves(side)
    }

    /// Buries the dead and forwards every event to the subscribers.
    fn dispatch(&mut self, events: Vec<Event>) {
        for event in events {
            if let Event::PieceDied { piece, .. } = &event {
                self.graveyard.bury(piece.clone());
            }
            for sink in &mut self.sinks {
                sink.notify(&event);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CreatureType, EventLog};

    fn placement(x: i8, y: i8, creature: CreatureType, side: Side) -> Placement {
        Placement {
            at: Square::new(x, y),
            creature,
            side,
        }
    }

    #[test]
    fn default_match_starts_with_south() {
        let game = create_match(MatchConfig::default()).unwrap();
        let state = game.state();
        assert_eq!(state.phase(), Phase::InProgress);
        assert_eq!(state.current_side(), Side::South);
        assert_eq!(state.turn_number(), 1);
        assert_eq!(state.hand(Side::South).len(), 3);
        assert_eq!(state.board().pieces().count(), 32);
        // The lion is boxed in by its own pieces
        assert!(!state.all_legal_moves(Side::South).is_empty());
        assert!(state.legal_moves(Square::new(3, 7)).is_empty());
    }

    #[test]
    fn setup_rules() {
        let config = MatchConfig {
            layout: Some(vec![placement(0, 0, CreatureType::Lion, Side::South)]),
            ..Default::default()
        };
        let mut game = Match::new(config).unwrap();
        assert_eq!(
            game.submit_move(Square::new(0, 0), Square::new(0, 1), Side::South),
            Err(TurnError::GameNotInProgress)
        );
        assert_eq!(
            game.start(),
            Err(SetupError::MissingLeader { side: Side::North })
        );
        game.place_piece(placement(7, 7, CreatureType::Lion, Side::North))
            .unwrap();
        game.start().unwrap();
        assert_eq!(
            game.place_piece(placement(4, 4, CreatureType::Fox, Side::North)),
            Err(SetupError::NotInSetup)
        );
        assert_eq!(game.start(), Err(SetupError::NotInSetup));
    }

    #[test]
    fn dead_pieces_are_buried_and_subscribers_notified() {
        let config = MatchConfig {
            layout: Some(vec![
                placement(0, 0, CreatureType::Lion, Side::South),
                placement(0, 7, CreatureType::Wolf, Side::South),
                placement(7, 7, CreatureType::Lion, Side::North),
                placement(0, 3, CreatureType::Fox, Side::North),
            ]),
            ..Default::default()
        };
        let mut game = create_match(config).unwrap();
        let log = EventLog::new();
        game.subscribe(log.clone());
        let outcome = game
            .submit_move(Square::new(0, 7), Square::new(0, 3), Side::South)
            .unwrap();
        assert_eq!(outcome, TurnOutcome::Applied);
        assert_eq!(game.graveyard().count(Side::North), 1);
        let events = log.take();
        assert!(matches!(events[0], Event::PieceMoved { .. }));
        assert!(matches!(events[1], Event::PieceCaptured { .. }));
        assert!(matches!(events[2], Event::PieceDied { .. }));
        assert!(matches!(events.last(), Some(Event::TurnEnded { .. })));
    }

    #[test]
    fn conceding_ends_the_match() {
        let mut game = create_match(MatchConfig::default()).unwrap();
        assert_eq!(game.concede(Side::South), Ok(MatchResult::Won(Side::North)));
        assert_eq!(game.state().result(), Some(MatchResult::Won(Side::North)));
        assert_eq!(game.concede(Side::North), Err(TurnError::GameNotInProgress));
    }

    #[test]
    fn declared_draw_is_announced() {
        let mut game = create_match(MatchConfig::default()).unwrap();
        let log = EventLog::new();
        game.subscribe(log.clone());
        assert_eq!(game.declare_draw(), Ok(MatchResult::Draw));
        assert_eq!(game.state().phase(), Phase::Ended);
        assert_eq!(
            log.take(),
            vec![Event::GameEnded {
                result: MatchResult::Draw
            }]
        );
        assert_eq!(game.declare_draw(), Err(TurnError::GameNotInProgress));
    }

    #[test]
    fn same_seed_same_hands() {
        let config = MatchConfig {
            seed: 99,
            ..Default::default()
        };
        let a = create_match(config.clone()).unwrap();
        let b = create_match(config).unwrap();
        assert_eq!(a.state().hand(Side::North), b.state().hand(Side::North));
    }
}
