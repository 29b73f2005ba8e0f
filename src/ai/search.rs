use serde::Serialize;
use tracing::{debug, trace};
use web_time::Instant;

use crate::ai::eval::EvalWeights;
use crate::board::{Board, mask_to_indices};
use crate::types::{Move, Side};

const MIN_SCORE: i32 = i32::MIN;
const MAX_SCORE: i32 = i32::MAX;

/// Counters collected during one [`Searcher::best_move`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    pub nodes: u64,
    pub cutoffs: u64,
    pub elapsed_ms: u64,
}

/// The chosen root move and its backed-up value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub mv: Move,
    pub value: i32,
    pub stats: SearchStats,
}

/// Fixed-depth minimax with alpha-beta pruning.
///
/// Values are always expressed from the perspective of the side that started
/// the search. The searcher keeps no state between calls apart from the
/// statistics of the last one.
#[derive(Debug, Clone)]
pub struct Searcher {
    weights: EvalWeights,
    max_depth: u8,
    stats: SearchStats,
}

impl Searcher {
    pub fn new(max_depth: u8) -> Self {
        Self::with_weights(max_depth, EvalWeights::default())
    }

    pub fn with_weights(max_depth: u8, weights: EvalWeights) -> Self {
        Self {
            weights,
            max_depth,
            stats: SearchStats::default(),
        }
    }

    pub fn max_depth(&self) -> u8 {
        self.max_depth
    }

    pub fn weights(&self) -> &EvalWeights {
        &self.weights
    }

    /// Searches the best move for `side`.
    ///
    /// Returns `None` when `side` has no legal move; the caller decides whether
    /// that is a pass or the end of the game. Among equally valued moves the
    /// first one in row-major order wins. Depth 0 and depth 1 both score the
    /// positions right after each candidate move.
    pub fn best_move(&mut self, board: &Board, side: Side) -> Option<SearchResult> {
        let start = Instant::now();
        self.stats = SearchStats::default();

        let legal = board.legal_mask(side);
        if legal == 0 {
            debug!(%side, "search skipped: no legal move");
            return None;
        }

        let child_depth = self.max_depth.saturating_sub(1);
        let mut best: Option<(usize, i32)> = None;

        for pos in mask_to_indices(legal) {
            let next = board.child(side, pos);
            let value =
                self.minimax(&next, child_depth, side.opponent(), side, MIN_SCORE, MAX_SCORE);
            trace!(mv = %Move::from_index(pos), value, "root move scored");

            if best.is_none_or(|(_, best_value)| value > best_value) {
                best = Some((pos, value));
            }
        }

        let (pos, value) = best?;
        self.stats.elapsed_ms = start.elapsed().as_millis() as u64;
        let result = SearchResult {
            mv: Move::from_index(pos),
            value,
            stats: self.stats,
        };
        debug!(
            %side,
            depth = self.max_depth,
            mv = %result.mv,
            value,
            nodes = self.stats.nodes,
            cutoffs = self.stats.cutoffs,
            elapsed_ms = self.stats.elapsed_ms,
            "search complete"
        );
        Some(result)
    }

    /// Statistics of the most recent [`Searcher::best_move`].
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Minimax value of `board` with `to_move` to play, seen from `root`.
    ///
    /// A side without moves passes, which costs one depth level. Terminal
    /// positions score the exact disc differential regardless of depth.
    pub fn minimax(
        &mut self,
        board: &Board,
        depth: u8,
        to_move: Side,
        root: Side,
        mut alpha: i32,
        mut beta: i32,
    ) -> i32 {
        self.stats.nodes += 1;

        let legal = board.legal_mask(to_move);
        if legal == 0 && !board.has_legal_move(to_move.opponent()) {
            return terminal_value(board, root);
        }
        if depth == 0 {
            return self.weights.evaluate(board, root);
        }
        if legal == 0 {
            return self.minimax(board, depth - 1, to_move.opponent(), root, alpha, beta);
        }

        let opp = to_move.opponent();
        if to_move == root {
            let mut value = MIN_SCORE;
            for pos in mask_to_indices(legal) {
                let next = board.child(to_move, pos);
                value = value.max(self.minimax(&next, depth - 1, opp, root, alpha, beta));
                alpha = alpha.max(value);
                if alpha >= beta {
                    self.stats.cutoffs += 1;
                    break;
                }
            }
            value
        } else {
            let mut value = MAX_SCORE;
            for pos in mask_to_indices(legal) {
                let next = board.child(to_move, pos);
                value = value.min(self.minimax(&next, depth - 1, opp, root, alpha, beta));
                beta = beta.min(value);
                if alpha >= beta {
                    self.stats.cutoffs += 1;
                    break;
                }
            }
            value
        }
    }
}

fn terminal_value(board: &Board, root: Side) -> i32 {
    match root {
        Side::Black => board.score(),
        Side::White => -board.score(),
    }
}
