use std::collections::VecDeque;

use tracing::{debug, warn};

use crate::ai::{EvalWeights, SearchResult, Searcher};
use crate::board::Board;
use crate::error::{GameError, Result};
use crate::types::{Move, Side};

/// Something that can pick a move for a side.
///
/// `Ok(None)` means the side has no legal move and must pass.
pub trait Player {
    fn name(&self) -> &str;

    fn choose_move(&mut self, board: &Board, side: Side) -> Result<Option<Move>>;
}

/// Player backed by the alpha-beta searcher at a fixed depth.
#[derive(Debug, Clone)]
pub struct SearchPlayer {
    name: String,
    searcher: Searcher,
    last: Option<SearchResult>,
}

impl SearchPlayer {
    pub fn new(depth: u8) -> Self {
        Self::with_weights(depth, EvalWeights::default())
    }

    pub fn with_weights(depth: u8, weights: EvalWeights) -> Self {
        Self {
            name: format!("AI (depth {depth})"),
            searcher: Searcher::with_weights(depth, weights),
            last: None,
        }
    }

    pub fn depth(&self) -> u8 {
        self.searcher.max_depth()
    }

    /// Result of the most recent search, kept for display.
    pub fn last_result(&self) -> Option<&SearchResult> {
        self.last.as_ref()
    }
}

impl Player for SearchPlayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose_move(&mut self, board: &Board, side: Side) -> Result<Option<Move>> {
        self.last = self.searcher.best_move(board, side);
        if let Some(result) = &self.last {
            debug!(%side, mv = %result.mv, eval = result.value, "AI chooses");
        }
        Ok(self.last.map(|result| result.mv))
    }
}

/// Supplies candidate moves from outside the engine, e.g. a console prompt.
pub trait MoveSource {
    /// Next candidate, or `None` once the source is exhausted.
    fn next_move(&mut self, side: Side, legal: &[Move]) -> Option<Move>;

    /// Called when a candidate was refused; the source will be asked again.
    fn rejected(&mut self, _mv: Move, _err: &GameError) {}
}

/// Player driven by a [`MoveSource`]. Every candidate is checked against the
/// legal moves before it is returned.
#[derive(Debug, Clone)]
pub struct ExternalPlayer<S> {
    name: String,
    source: S,
}

impl<S: MoveSource> ExternalPlayer<S> {
    pub fn new(name: impl Into<String>, source: S) -> Self {
        Self {
            name: name.into(),
            source,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

impl<S: MoveSource> Player for ExternalPlayer<S> {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose_move(&mut self, board: &Board, side: Side) -> Result<Option<Move>> {
        let legal = board.legal_moves(side);
        if legal.is_empty() {
            return Ok(None);
        }

        loop {
            let mv = self
                .source
                .next_move(side, &legal)
                .ok_or(GameError::InputClosed)?;
            if legal.contains(&mv) {
                return Ok(Some(mv));
            }

            // Report the most specific reason the board gives.
            let err = board.validate(side, mv).err().unwrap_or(GameError::NotLegal(mv));
            warn!(%side, %mv, %err, "rejected move");
            self.source.rejected(mv, &err);
        }
    }
}

/// A [`MoveSource`] replaying a fixed list of moves.
#[derive(Debug, Clone, Default)]
pub struct ScriptedMoves {
    moves: VecDeque<Move>,
    rejected: Vec<Move>,
}

impl ScriptedMoves {
    pub fn new(moves: impl IntoIterator<Item = Move>) -> Self {
        Self {
            moves: moves.into_iter().collect(),
            rejected: Vec::new(),
        }
    }

    /// Moves that were refused so far, oldest first.
    pub fn rejected_moves(&self) -> &[Move] {
        &self.rejected
    }
}

impl MoveSource for ScriptedMoves {
    fn next_move(&mut self, _side: Side, _legal: &[Move]) -> Option<Move> {
        self.moves.pop_front()
    }

    fn rejected(&mut self, mv: Move, _err: &GameError) {
        self.rejected.push(mv);
    }
}
