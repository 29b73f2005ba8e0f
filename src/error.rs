//! Error types for board, search and game operations.

use crate::types::{Move, Side};

/// Errors surfaced by the game core. All of them are recoverable by the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// Coordinate outside the 8x8 board.
    #[error("invalid move {0}: out of bounds")]
    OutOfBounds(Move),

    /// Target square already holds a disc.
    #[error("invalid move {0}: square is occupied")]
    Occupied(Move),

    /// Placing a disc there would not flip anything.
    #[error("invalid move {0}: flips no discs")]
    NoFlips(Move),

    /// The chosen move is not among the side's legal moves.
    #[error("invalid move {0}: not a legal move")]
    NotLegal(Move),

    /// The side to move is not controlled by the caller that tried to act.
    #[error("{0} is to move and is not played by this seat")]
    NotThisSeat(Side),

    #[error("game is already over")]
    GameOver,

    #[error("cannot pass while a legal move exists")]
    MustPlay,

    #[error("move source closed before a valid move was given")]
    InputClosed,

    #[error("invalid evaluation config: {0}")]
    Config(String),
}

impl GameError {
    /// True for every rejection of a concrete move coordinate.
    pub fn is_invalid_move(&self) -> bool {
        matches!(
            self,
            Self::OutOfBounds(_) | Self::Occupied(_) | Self::NoFlips(_) | Self::NotLegal(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, GameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_move_kinds_are_classified() {
        let mv = Move::new(0, 0);
        assert!(GameError::OutOfBounds(mv).is_invalid_move());
        assert!(GameError::Occupied(mv).is_invalid_move());
        assert!(GameError::NoFlips(mv).is_invalid_move());
        assert!(GameError::NotLegal(mv).is_invalid_move());
        assert!(!GameError::GameOver.is_invalid_move());
        assert!(!GameError::InputClosed.is_invalid_move());
    }

    #[test]
    fn messages_name_the_coordinate() {
        let err = GameError::NoFlips(Move::new(0, 7));
        assert_eq!(err.to_string(), "invalid move (0,7): flips no discs");
    }
}
