use crate::game::{GameId, ParticipantId};
use crate::rules::MoveError;

/// Errors returned by game operations. All are recoverable by the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("coordinates ({row}, {col}) are outside the board")]
    OutOfBounds { row: usize, col: usize },

    #[error("cell ({row}, {col}) is already occupied")]
    Occupied { row: usize, col: usize },

    #[error("not your turn")]
    NotYourTurn,

    #[error("game is not active")]
    GameNotActive,

    #[error("game is already full")]
    SlotFull,

    #[error("participant is already seated in this game")]
    AlreadyJoined,

    #[error("participant is not in this game")]
    NotInGame,

    #[error("game has no computer opponent")]
    NoComputerOpponent,

    #[error("search precondition violated: {0}")]
    SearchPrecondition(&'static str),
}

impl From<MoveError> for GameError {
    fn from(err: MoveError) -> Self {
        match err {
            MoveError::OutOfBounds { row, col } => GameError::OutOfBounds { row, col },
            MoveError::Occupied { row, col } => GameError::Occupied { row, col },
        }
    }
}

/// Errors returned by the session registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("game {0} not found")]
    GameNotFound(GameId),

    #[error("player {0} not found")]
    PlayerNotFound(ParticipantId),

    #[error("player is not in this game")]
    NotInGame,

    #[error("message must not be empty")]
    EmptyMessage,

    #[error("message too long ({len} > {max} characters)")]
    MessageTooLong { len: usize, max: usize },

    #[error(transparent)]
    Game(#[from] GameError),
}
