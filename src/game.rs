//! A single game: players, turn order and lifecycle.
//!
//! `Waiting → Playing → Finished`. A game starts playing when its second slot
//! is filled (at once against the computer) and finishes exactly once, by a
//! win condition, a resolved full board, or a forfeit. A finished game no
//! longer accepts moves.

use std::fmt;
use std::time::Instant;

use log::info;

use crate::board::{AreaResult, Board, Color, Point};
use crate::error::GameError;
use crate::rules::{apply_move, WinCondition, WinOutcome, Winner};
use crate::search::{Opponent, Tier};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GameId(pub u64);

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticipantId(pub u64);

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who occupies a color.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Slot {
    Open,
    Human(ParticipantId),
    Computer,
}

impl Slot {
    pub fn is_open(&self) -> bool {
        matches!(self, Slot::Open)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Status {
    Waiting,
    Playing,
    Finished,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Waiting => f.write_str("waiting"),
            Status::Playing => f.write_str("playing"),
            Status::Finished => f.write_str("finished"),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    Multiplayer,
    SingleOpponent(Tier),
}

/// Read-only copy of a game's public state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameSnapshot {
    pub id: GameId,
    pub board: Board,
    pub current: Color,
    pub status: Status,
    pub white: Slot,
    pub black: Slot,
    pub winner: Option<Winner>,
    pub win_condition: Option<WinCondition>,
    pub mode: Mode,
}

/// Outcome of a successful move.
#[derive(Clone, Debug, PartialEq)]
pub struct MoveResult {
    pub game: GameSnapshot,
    pub point: Point,
    pub color: Color,
    pub by_computer: bool,
    pub finished: bool,
    pub winner: Option<Winner>,
    pub win_condition: Option<WinCondition>,
    /// Winning region size, only for the largest-area condition.
    pub largest_area_size: Option<usize>,
    /// Largest regions of both colors, only for the largest-area condition.
    pub area: Option<AreaResult>,
}

#[derive(Clone, Debug)]
pub struct Game {
    id: GameId,
    board: Board,
    white: Slot,
    black: Slot,
    current: Color,
    status: Status,
    winner: Option<Winner>,
    win_condition: Option<WinCondition>,
    created_at: Instant,
    opponent: Option<Opponent>,
}

impl Game {
    /// A fresh, empty game waiting for players. White always moves first.
    pub fn new(id: GameId, created_at: Instant) -> Self {
        Self {
            id,
            board: Board::new(),
            white: Slot::Open,
            black: Slot::Open,
            current: Color::White,
            status: Status::Waiting,
            winner: None,
            win_condition: None,
            created_at,
            opponent: None,
        }
    }

    pub fn id(&self) -> GameId {
        self.id
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current(&self) -> Color {
        self.current
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn winner(&self) -> Option<Winner> {
        self.winner
    }

    pub fn win_condition(&self) -> Option<WinCondition> {
        self.win_condition
    }

    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    pub fn opponent(&self) -> Option<&Opponent> {
        self.opponent.as_ref()
    }

    pub fn mode(&self) -> Mode {
        match &self.opponent {
            Some(opp) => Mode::SingleOpponent(opp.tier()),
            None => Mode::Multiplayer,
        }
    }

    pub fn slot(&self, color: Color) -> Slot {
        match color {
            Color::White => self.white,
            Color::Black => self.black,
        }
    }

    fn slot_mut(&mut self, color: Color) -> &mut Slot {
        match color {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        }
    }

    pub fn color_of(&self, participant: ParticipantId) -> Option<Color> {
        [Color::White, Color::Black]
            .into_iter()
            .find(|&c| self.slot(c) == Slot::Human(participant))
    }

    pub fn has_participant(&self, participant: ParticipantId) -> bool {
        self.color_of(participant).is_some()
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            id: self.id,
            board: self.board,
            current: self.current,
            status: self.status,
            white: self.white,
            black: self.black,
            winner: self.winner,
            win_condition: self.win_condition,
            mode: self.mode(),
        }
    }

    /// Seat a human as White, or as Black once White is taken.
    pub fn join_as_human(&mut self, participant: ParticipantId) -> Result<Color, GameError> {
        if self.status == Status::Finished {
            return Err(GameError::GameNotActive);
        }
        if self.has_participant(participant) {
            return Err(GameError::AlreadyJoined);
        }
        let color = if self.white.is_open() {
            Color::White
        } else if self.black.is_open() {
            Color::Black
        } else {
            return Err(GameError::SlotFull);
        };
        *self.slot_mut(color) = Slot::Human(participant);
        if !self.white.is_open() && !self.black.is_open() {
            self.status = Status::Playing;
            info!("game {} started: {:?} vs {:?}", self.id, self.white, self.black);
        }
        Ok(color)
    }

    /// Seat a human as White against a computer of the given tier.
    pub fn start_single_opponent(
        &mut self,
        participant: ParticipantId,
        tier: Tier,
    ) -> Result<Color, GameError> {
        self.start_against(participant, Opponent::new(tier))
    }

    /// Seat a human as White against `opponent` as Black and start at once.
    pub fn start_against(
        &mut self,
        participant: ParticipantId,
        opponent: Opponent,
    ) -> Result<Color, GameError> {
        if self.status != Status::Waiting {
            return Err(GameError::GameNotActive);
        }
        if !self.white.is_open() || !self.black.is_open() {
            return Err(GameError::SlotFull);
        }
        self.white = Slot::Human(participant);
        self.black = Slot::Computer;
        self.status = Status::Playing;
        info!(
            "game {} started: player {participant} (white) vs {} (black)",
            self.id,
            opponent.name()
        );
        self.opponent = Some(opponent);
        Ok(Color::White)
    }

    pub fn apply_human_move(
        &mut self,
        participant: ParticipantId,
        row: usize,
        col: usize,
    ) -> Result<MoveResult, GameError> {
        if self.status != Status::Playing {
            return Err(GameError::GameNotActive);
        }
        let color = self.color_of(participant).ok_or(GameError::NotInGame)?;
        self.play(color, row, col, false)
    }

    /// Let the computer choose and play a move for the side to move.
    pub fn apply_opponent_move(&mut self) -> Result<MoveResult, GameError> {
        if self.status != Status::Playing {
            return Err(GameError::GameNotActive);
        }
        if self.slot(self.current) != Slot::Computer {
            return Err(if self.opponent.is_some() {
                GameError::NotYourTurn
            } else {
                GameError::NoComputerOpponent
            });
        }
        let opponent = self.opponent.as_mut().ok_or(GameError::NoComputerOpponent)?;
        let (row, col) = opponent.select_move(&self.board, self.current)?;
        self.play(self.current, row, col, true)
    }

    fn play(
        &mut self,
        color: Color,
        row: usize,
        col: usize,
        by_computer: bool,
    ) -> Result<MoveResult, GameError> {
        if self.status != Status::Playing {
            return Err(GameError::GameNotActive);
        }
        if color != self.current {
            return Err(GameError::NotYourTurn);
        }
        let outcome = apply_move(&mut self.board, color, row, col)?;

        let mut area = None;
        match outcome {
            Some(WinOutcome {
                winner,
                condition,
                area: a,
            }) => {
                area = a;
                self.finish(winner, condition);
            }
            None => self.current = color.opponent(),
        }

        let largest_area_size = match self.win_condition {
            Some(WinCondition::LargestArea { size }) => Some(size),
            _ => None,
        };
        Ok(MoveResult {
            game: self.snapshot(),
            point: (row, col),
            color,
            by_computer,
            finished: self.status == Status::Finished,
            winner: self.winner,
            win_condition: self.win_condition,
            largest_area_size,
            area,
        })
    }

    fn finish(&mut self, winner: Winner, condition: WinCondition) {
        self.status = Status::Finished;
        self.winner = Some(winner);
        self.win_condition = Some(condition);
        info!("game {} finished: winner {winner}, condition {condition}", self.id);
    }

    /// Remove `participant` from the game.
    ///
    /// A running game ends with the other color as winner and the
    /// `player_left` condition. Leaving a waiting game just frees the slot.
    /// A finished game is left as it is.
    pub fn forfeit(&mut self, participant: ParticipantId) -> Result<(), GameError> {
        let color = self.color_of(participant).ok_or(GameError::NotInGame)?;
        if self.status == Status::Finished {
            return Ok(());
        }
        *self.slot_mut(color) = Slot::Open;
        if self.status == Status::Playing {
            info!("game {}: player {participant} ({color}) left", self.id);
            self.finish(color.opponent().into(), WinCondition::PlayerLeft);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game() -> Game {
        Game::new(GameId(1), Instant::now())
    }

    #[test]
    fn test_join_order_and_start() {
        let mut g = game();
        assert_eq!(g.join_as_human(ParticipantId(1)), Ok(Color::White));
        assert_eq!(g.status(), Status::Waiting);
        assert_eq!(g.join_as_human(ParticipantId(2)), Ok(Color::Black));
        assert_eq!(g.status(), Status::Playing);
        assert_eq!(g.join_as_human(ParticipantId(3)), Err(GameError::SlotFull));
    }

    #[test]
    fn test_move_before_start() {
        let mut g = game();
        g.join_as_human(ParticipantId(1)).unwrap();
        assert_eq!(
            g.apply_human_move(ParticipantId(1), 0, 0),
            Err(GameError::GameNotActive)
        );
    }

    #[test]
    fn test_turn_order() {
        let mut g = game();
        g.join_as_human(ParticipantId(1)).unwrap();
        g.join_as_human(ParticipantId(2)).unwrap();
        assert_eq!(
            g.apply_human_move(ParticipantId(2), 0, 0),
            Err(GameError::NotYourTurn)
        );
        let result = g.apply_human_move(ParticipantId(1), 0, 0).unwrap();
        assert!(!result.finished);
        assert_eq!(result.game.current, Color::Black);
        assert_eq!(
            g.apply_human_move(ParticipantId(2), 0, 0),
            Err(GameError::Occupied { row: 0, col: 0 })
        );
        assert_eq!(g.current(), Color::Black);
        assert_eq!(
            g.apply_human_move(ParticipantId(9), 1, 1),
            Err(GameError::NotInGame)
        );
    }

    #[test]
    fn test_single_opponent_starts_immediately() {
        let mut g = game();
        let color = g
            .start_against(ParticipantId(1), Opponent::with_seed(Tier::Balanced, 3))
            .unwrap();
        assert_eq!(color, Color::White);
        assert_eq!(g.status(), Status::Playing);
        assert_eq!(g.slot(Color::Black), Slot::Computer);
        assert_eq!(g.mode(), Mode::SingleOpponent(Tier::Balanced));

        // It is the human's turn first.
        assert_eq!(g.apply_opponent_move(), Err(GameError::NotYourTurn));
        g.apply_human_move(ParticipantId(1), 0, 0).unwrap();
        let reply = g.apply_opponent_move().unwrap();
        assert!(reply.by_computer);
        assert_eq!(reply.color, Color::Black);
        assert_eq!(reply.point, (2, 2));
        assert_eq!(g.current(), Color::White);
    }

    #[test]
    fn test_opponent_move_without_computer() {
        let mut g = game();
        g.join_as_human(ParticipantId(1)).unwrap();
        g.join_as_human(ParticipantId(2)).unwrap();
        assert_eq!(g.apply_opponent_move(), Err(GameError::NoComputerOpponent));
    }

    #[test]
    fn test_forfeit() {
        let mut g = game();
        g.join_as_human(ParticipantId(1)).unwrap();
        g.join_as_human(ParticipantId(2)).unwrap();
        g.forfeit(ParticipantId(1)).unwrap();
        assert_eq!(g.status(), Status::Finished);
        assert_eq!(g.winner(), Some(Winner::Black));
        assert_eq!(g.win_condition(), Some(WinCondition::PlayerLeft));
        assert_eq!(
            g.apply_human_move(ParticipantId(2), 0, 0),
            Err(GameError::GameNotActive)
        );
    }

    #[test]
    fn test_forfeit_after_finish_keeps_result() {
        let mut g = game();
        g.join_as_human(ParticipantId(1)).unwrap();
        g.join_as_human(ParticipantId(2)).unwrap();
        g.forfeit(ParticipantId(2)).unwrap();
        let before = g.snapshot();
        assert_eq!(before.winner, Some(Winner::White));

        g.forfeit(ParticipantId(1)).unwrap();
        assert_eq!(g.snapshot(), before);
        assert_eq!(g.slot(Color::White), Slot::Human(ParticipantId(1)));
    }

    #[test]
    fn test_join_twice_rejected() {
        let mut g = game();
        assert_eq!(g.join_as_human(ParticipantId(1)), Ok(Color::White));
        assert_eq!(g.join_as_human(ParticipantId(1)), Err(GameError::AlreadyJoined));
        assert_eq!(g.status(), Status::Waiting);
        assert!(g.slot(Color::Black).is_open());
        assert_eq!(g.join_as_human(ParticipantId(2)), Ok(Color::Black));
        assert_eq!(g.status(), Status::Playing);
    }

    #[test]
    fn test_leave_waiting_game_frees_slot() {
        let mut g = game();
        g.join_as_human(ParticipantId(1)).unwrap();
        g.forfeit(ParticipantId(1)).unwrap();
        assert_eq!(g.status(), Status::Waiting);
        assert_eq!(g.join_as_human(ParticipantId(2)), Ok(Color::White));
    }

    #[test]
    fn test_win_finishes_game() {
        let mut g = game();
        g.join_as_human(ParticipantId(1)).unwrap();
        g.join_as_human(ParticipantId(2)).unwrap();
        // White builds a 2x3 on rows 0-1, Black plays row 5.
        let white = [(0, 0), (0, 1), (0, 2), (1, 0), (1, 1)];
        let black = [(5, 0), (5, 2), (5, 4), (4, 1), (4, 3)];
        for (w, b) in white.iter().zip(black.iter()) {
            g.apply_human_move(ParticipantId(1), w.0, w.1).unwrap();
            g.apply_human_move(ParticipantId(2), b.0, b.1).unwrap();
        }
        let result = g.apply_human_move(ParticipantId(1), 1, 2).unwrap();
        assert!(result.finished);
        assert_eq!(result.winner, Some(Winner::White));
        assert_eq!(result.win_condition, Some(WinCondition::Rectangle { rows: 2, cols: 3 }));
        assert_eq!(result.largest_area_size, None);
        assert_eq!(g.status(), Status::Finished);
    }
}
