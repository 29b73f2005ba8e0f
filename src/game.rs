use tracing::{debug, info};

use crate::board::{Board, mask_to_indices};
use crate::error::{GameError, Result};
use crate::player::Player;
use crate::types::{GameResult, GameState, Move, Side, Winner};

/// How the two seats are filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Human plays black and moves first, the AI plays white.
    HumanVsAi { depth: u8 },
    /// Both sides are searched at the same depth.
    AiVsAi { depth: u8 },
}

impl Mode {
    pub fn depth(self) -> u8 {
        match self {
            Mode::HumanVsAi { depth } | Mode::AiVsAi { depth } => depth,
        }
    }

    /// The side played from outside the engine, if any.
    pub fn human_side(self) -> Option<Side> {
        match self {
            Mode::HumanVsAi { .. } => Some(Side::Black),
            Mode::AiVsAi { .. } => None,
        }
    }
}

/// What the side to move has to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    ToMove(Side),
    MustPass(Side),
    Over(GameResult),
}

/// One step of the driving loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Turn {
    Moved { side: Side, mv: Move, flipped: Vec<u8> },
    Passed(Side),
    Over(GameResult),
}

/// A game in progress: the board, whose turn it is and what happened last.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    to_move: Side,
    is_pass: bool,
    flipped: Vec<u8>,
}

impl Game {
    pub fn new() -> Self {
        Self::from_position(Board::new(), Side::Black)
    }

    /// Starts from an arbitrary position, e.g. a replayed or constructed one.
    pub fn from_position(board: Board, to_move: Side) -> Self {
        Self {
            board,
            to_move,
            is_pass: false,
            flipped: Vec::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn to_move(&self) -> Side {
        self.to_move
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        self.board.legal_moves(self.to_move)
    }

    pub fn is_over(&self) -> bool {
        self.board.is_terminal()
    }

    pub fn status(&self) -> Status {
        if let Some(result) = self.result() {
            Status::Over(result)
        } else if self.board.has_legal_move(self.to_move) {
            Status::ToMove(self.to_move)
        } else {
            Status::MustPass(self.to_move)
        }
    }

    /// Plays `mv` for the side to move and hands the turn over.
    pub fn play(&mut self, mv: Move) -> Result<u64> {
        if self.is_over() {
            return Err(GameError::GameOver);
        }

        let side = self.to_move;
        let flips = self.board.apply_move(side, mv)?;
        self.is_pass = false;
        self.flipped = mask_to_indices(flips).map(|idx| idx as u8).collect();
        self.to_move = side.opponent();
        debug!(%side, %mv, flipped = self.flipped.len(), "move applied");

        if self.is_over() {
            info!(score = self.board.score(), "game over");
        }
        Ok(flips)
    }

    /// Skips the turn of a side that has no legal move.
    pub fn pass(&mut self) -> Result<()> {
        if self.is_over() {
            return Err(GameError::GameOver);
        }
        if self.board.has_legal_move(self.to_move) {
            return Err(GameError::MustPlay);
        }

        info!(side = %self.to_move, "no moves, skipping turn");
        self.is_pass = true;
        self.flipped.clear();
        self.to_move = self.to_move.opponent();
        Ok(())
    }

    /// Advances the game by one action: a forced pass, or a move from the
    /// player whose turn it is.
    pub fn step(&mut self, black: &mut dyn Player, white: &mut dyn Player) -> Result<Turn> {
        let side = match self.status() {
            Status::Over(result) => return Ok(Turn::Over(result)),
            Status::MustPass(side) => {
                self.pass()?;
                return Ok(Turn::Passed(side));
            }
            Status::ToMove(side) => side,
        };

        let player: &mut dyn Player = match side {
            Side::Black => black,
            Side::White => white,
        };
        match player.choose_move(&self.board, side)? {
            Some(mv) => {
                self.play(mv)?;
                Ok(Turn::Moved {
                    side,
                    mv,
                    flipped: self.flipped.clone(),
                })
            }
            None => {
                // A player declining to move while moves exist forfeits the turn.
                info!(%side, player = player.name(), "no move chosen, skipping");
                self.is_pass = true;
                self.flipped.clear();
                self.to_move = side.opponent();
                Ok(Turn::Passed(side))
            }
        }
    }

    /// Plays until neither side can move.
    pub fn run(&mut self, black: &mut dyn Player, white: &mut dyn Player) -> Result<GameResult> {
        loop {
            if let Turn::Over(result) = self.step(black, white)? {
                return Ok(result);
            }
        }
    }

    pub fn result(&self) -> Option<GameResult> {
        if !self.is_over() {
            return None;
        }
        let (black_count, white_count) = self.board.count();
        let score = self.board.score();
        Some(GameResult {
            winner: Winner::from_score(score),
            black_count,
            white_count,
            score,
        })
    }

    pub fn state(&self) -> GameState {
        let (black_count, white_count) = self.board.count();
        GameState {
            board: self.board.to_array().to_vec(),
            current_player: self.to_move.code(),
            black_count,
            white_count,
            score: self.board.score(),
            is_game_over: self.is_over(),
            is_pass: self.is_pass,
            flipped: self.flipped.clone(),
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
