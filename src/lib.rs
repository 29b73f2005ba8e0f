//! Othello (Reversi) on an 8x8 board: rules, a fixed-depth alpha-beta AI and
//! a small driving loop, usable natively or from WASM.

pub mod ai;
pub mod api;
pub mod board;
pub mod error;
pub mod game;
pub mod player;
pub mod types;

pub use ai::{EvalWeights, SearchResult, Searcher};
pub use board::Board;
pub use error::{GameError, Result};
pub use game::{Game, Mode, Status, Turn};
pub use player::{ExternalPlayer, MoveSource, Player, ScriptedMoves, SearchPlayer};
pub use types::{Cell, GameResult, GameState, Move, Side, Winner};
