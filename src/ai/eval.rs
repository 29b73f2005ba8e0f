use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::error::{GameError, Result};
use crate::types::{NUM_SQUARES, Side};

const MAX_PIECE_DIFF: i64 = NUM_SQUARES as i64;
const MAX_MOBILITY_DIFF: i64 = NUM_SQUARES as i64;
const MAX_CORNER_DIFF: i64 = 4;

/// Weights of the static evaluator. Missing fields fall back to the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalWeights {
    pub piece_diff: i32,
    pub mobility_diff: i32,
    pub corner_diff: i32,
}

impl EvalWeights {
    pub const DEFAULT: Self = Self {
        piece_diff: 1,
        mobility_diff: 5,
        corner_diff: 25,
    };

    /// Parses a JSON object such as `{"corner_diff": 40}`.
    pub fn from_json(text: &str) -> Result<Self> {
        let weights: Self =
            serde_json::from_str(text).map_err(|err| GameError::Config(err.to_string()))?;
        weights.validate()
    }

    /// Rejects weights whose largest possible evaluation does not fit in `i32`.
    pub fn validate(self) -> Result<Self> {
        let worst = i64::from(self.piece_diff.unsigned_abs()) * MAX_PIECE_DIFF
            + i64::from(self.mobility_diff.unsigned_abs()) * MAX_MOBILITY_DIFF
            + i64::from(self.corner_diff.unsigned_abs()) * MAX_CORNER_DIFF;
        if worst > i64::from(i32::MAX) {
            return Err(GameError::Config(format!(
                "weights {self:?} can reach {worst}, beyond the i32 score range"
            )));
        }
        Ok(self)
    }

    /// Weighted sum of the three differentials from `side`'s perspective.
    pub fn evaluate(&self, board: &Board, side: Side) -> i32 {
        let opp = side.opponent();
        let piece_diff = board.piece_count(side) - board.piece_count(opp);
        let mobility_diff = board.mobility(side) - board.mobility(opp);
        let corner_diff = board.corner_control(side) - board.corner_control(opp);

        // Unvalidated weights clamp instead of overflowing.
        let sum = i64::from(self.piece_diff) * i64::from(piece_diff)
            + i64::from(self.mobility_diff) * i64::from(mobility_diff)
            + i64::from(self.corner_diff) * i64::from(corner_diff);
        sum.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
    }
}

impl Default for EvalWeights {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Evaluates `board` for `side` with the default weights.
pub fn evaluate(board: &Board, side: Side) -> i32 {
    EvalWeights::DEFAULT.evaluate(board, side)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::bit;
    use crate::types::Move;

    #[test]
    fn start_position_is_balanced() {
        let board = Board::new();
        assert_eq!(evaluate(&board, Side::Black), 0);
        assert_eq!(evaluate(&board, Side::White), 0);
    }

    #[test]
    fn combines_piece_mobility_and_corner_terms() {
        let board = Board::new()
            .with_move(Side::Black, Move::new(2, 3))
            .unwrap();
        // Black 4 vs 1 discs, no corners.
        let pieces = 3;
        let mobility = board.mobility(Side::Black) - board.mobility(Side::White);

        assert_eq!(evaluate(&board, Side::Black), pieces + 5 * mobility);
        assert_eq!(evaluate(&board, Side::White), -(pieces + 5 * mobility));
    }

    #[test]
    fn corners_dominate() {
        let board = Board::from_bitboards(bit(0), bit(9) | bit(10));
        let weights = EvalWeights::default();

        let black = weights.evaluate(&board, Side::Black);
        let mobility = board.mobility(Side::Black) - board.mobility(Side::White);
        let by_hand = (1 - 2) + 5 * mobility + 25;
        assert_eq!(black, by_hand);
    }

    #[test]
    fn partial_json_config_keeps_defaults() {
        let weights = EvalWeights::from_json(r#"{"corner_diff": 40}"#).unwrap();

        assert_eq!(
            weights,
            EvalWeights {
                piece_diff: 1,
                mobility_diff: 5,
                corner_diff: 40
            }
        );
    }

    #[test]
    fn malformed_json_config_is_a_config_error() {
        let err = EvalWeights::from_json("{\"piece_diff\": \"lots\"}").unwrap_err();
        assert!(matches!(err, GameError::Config(_)));
    }

    #[test]
    fn overflowing_weights_are_a_config_error() {
        let text = r#"{"corner_diff": 2000000000, "piece_diff": 2000000000}"#;
        let err = EvalWeights::from_json(text).unwrap_err();
        assert!(matches!(err, GameError::Config(_)));

        let edge = EvalWeights {
            piece_diff: 0,
            mobility_diff: 0,
            corner_diff: i32::MAX / 4,
        };
        assert_eq!(edge.validate(), Ok(edge));
        let over = EvalWeights {
            corner_diff: i32::MAX / 4 + 1,
            ..edge
        };
        assert!(over.validate().is_err());
    }

    #[test]
    fn huge_unvalidated_weights_clamp_instead_of_overflowing() {
        let weights = EvalWeights {
            piece_diff: i32::MAX,
            mobility_diff: i32::MAX,
            corner_diff: i32::MAX,
        };
        let board = Board::new()
            .with_move(Side::Black, Move::new(2, 3))
            .unwrap();

        assert_eq!(weights.evaluate(&board, Side::Black), i32::MAX);
        assert_eq!(weights.evaluate(&board, Side::White), i32::MIN);

        let mut searcher = crate::ai::Searcher::with_weights(1, weights);
        assert!(searcher.best_move(&Board::new(), Side::Black).is_some());
    }
}
