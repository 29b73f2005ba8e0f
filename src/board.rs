use std::fmt;

use crate::error::{GameError, Result};
use crate::types::{BOARD_SIZE, Cell, Move, NUM_SQUARES, Side};

const DIRECTIONS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];
const CORNERS: u64 = bit(0) | bit(7) | bit(56) | bit(63);

/// Reversi board state represented by two bitboards.
///
/// Bit `row * 8 + col` is set when the square holds a disc of that colour, so
/// iterating set bits from least significant upward is a row-major scan.
/// The type is `Copy`: every copy is an independent snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    black: u64,
    white: u64,
}

impl Board {
    /// Creates the initial board:
    /// (3,3)=white, (3,4)=black, (4,3)=black, (4,4)=white.
    pub fn new() -> Self {
        Self {
            black: bit(28) | bit(35),
            white: bit(27) | bit(36),
        }
    }

    /// Builds a board from raw masks. Squares claimed by both go to black.
    pub fn from_bitboards(black: u64, white: u64) -> Self {
        Self {
            black,
            white: white & !black,
        }
    }

    pub fn cell(&self, row: usize, col: usize) -> Cell {
        if row >= BOARD_SIZE || col >= BOARD_SIZE {
            return Cell::Empty;
        }
        let square = bit(row * BOARD_SIZE + col);
        if self.black & square != 0 {
            Cell::Black
        } else if self.white & square != 0 {
            Cell::White
        } else {
            Cell::Empty
        }
    }

    /// Legal move mask for the given side.
    pub fn legal_mask(&self, side: Side) -> u64 {
        let (me, opp) = self.split(side);
        let occupied = me | opp;
        let mut legal = 0u64;

        for pos in 0..NUM_SQUARES {
            let move_bit = bit(pos);
            if occupied & move_bit != 0 {
                continue;
            }
            if Self::collect_flips(pos, me, opp) != 0 {
                legal |= move_bit;
            }
        }

        legal
    }

    /// Legal moves for `side` in row-major order.
    pub fn legal_moves(&self, side: Side) -> Vec<Move> {
        mask_to_indices(self.legal_mask(side))
            .map(Move::from_index)
            .collect()
    }

    pub fn has_legal_move(&self, side: Side) -> bool {
        self.legal_mask(side) != 0
    }

    /// Number of legal moves available to `side`.
    pub fn mobility(&self, side: Side) -> i32 {
        self.legal_mask(side).count_ones() as i32
    }

    /// Neither side can move.
    pub fn is_terminal(&self) -> bool {
        !self.has_legal_move(Side::Black) && !self.has_legal_move(Side::White)
    }

    /// Discs that `side` would flip by playing `mv`; 0 when the move is not legal.
    pub fn flips(&self, side: Side, mv: Move) -> u64 {
        if !mv.in_bounds() {
            return 0;
        }
        let (me, opp) = self.split(side);
        Self::collect_flips(mv.index(), me, opp)
    }

    /// Checks that `side` may play `mv` and returns the discs it would flip.
    pub fn validate(&self, side: Side, mv: Move) -> Result<u64> {
        if !mv.in_bounds() {
            return Err(GameError::OutOfBounds(mv));
        }
        if (self.black | self.white) & bit(mv.index()) != 0 {
            return Err(GameError::Occupied(mv));
        }

        let (me, opp) = self.split(side);
        match Self::collect_flips(mv.index(), me, opp) {
            0 => Err(GameError::NoFlips(mv)),
            flips => Ok(flips),
        }
    }

    /// Places one disc and flips captured discs.
    /// Returns the flipped mask. An illegal move leaves the board untouched.
    pub fn apply_move(&mut self, side: Side, mv: Move) -> Result<u64> {
        let flips = self.validate(side, mv)?;
        let move_bit = bit(mv.index());
        let (me, opp) = self.split(side);
        let next_me = me | move_bit | flips;
        let next_opp = opp & !flips;
        match side {
            Side::Black => {
                self.black = next_me;
                self.white = next_opp;
            }
            Side::White => {
                self.white = next_me;
                self.black = next_opp;
            }
        }

        Ok(flips)
    }

    /// Value-returning form of [`Board::apply_move`]; `self` is not modified.
    pub fn with_move(&self, side: Side, mv: Move) -> Result<Board> {
        let mut next = *self;
        next.apply_move(side, mv)?;
        Ok(next)
    }

    /// Applies a move taken from [`Board::legal_mask`] without re-validating it.
    pub(crate) fn child(&self, side: Side, pos: usize) -> Board {
        let (me, opp) = self.split(side);
        let flips = Self::collect_flips(pos, me, opp);
        debug_assert_ne!(flips, 0, "child() requires a legal move");

        let next_me = me | bit(pos) | flips;
        let next_opp = opp & !flips;
        match side {
            Side::Black => Self::from_bitboards(next_me, next_opp),
            Side::White => Self::from_bitboards(next_opp, next_me),
        }
    }

    /// Returns `(black_count, white_count)`.
    pub fn count(&self) -> (u8, u8) {
        (self.black.count_ones() as u8, self.white.count_ones() as u8)
    }

    pub fn piece_count(&self, side: Side) -> i32 {
        self.split(side).0.count_ones() as i32
    }

    /// Black discs minus white discs.
    pub fn score(&self) -> i32 {
        self.piece_count(Side::Black) - self.piece_count(Side::White)
    }

    /// How many of the four corners `side` occupies.
    pub fn corner_control(&self, side: Side) -> i32 {
        (self.split(side).0 & CORNERS).count_ones() as i32
    }

    /// Returns the number of empty squares.
    pub fn empty_count(&self) -> u8 {
        let (black_count, white_count) = self.count();
        NUM_SQUARES as u8 - black_count - white_count
    }

    /// Converts board to `[u8; 64]` where 0=empty, 1=black, 2=white.
    pub fn to_array(&self) -> [u8; NUM_SQUARES] {
        let mut board = [0u8; NUM_SQUARES];
        for (pos, cell) in board.iter_mut().enumerate() {
            *cell = self.cell(pos / BOARD_SIZE, pos % BOARD_SIZE).code();
        }
        board
    }

    fn split(&self, side: Side) -> (u64, u64) {
        match side {
            Side::Black => (self.black, self.white),
            Side::White => (self.white, self.black),
        }
    }

    fn collect_flips(pos: usize, me: u64, opp: u64) -> u64 {
        if pos >= NUM_SQUARES {
            return 0;
        }

        let move_bit = bit(pos);
        if (me | opp) & move_bit != 0 {
            return 0;
        }

        let (row, col) = pos_to_row_col(pos);
        let mut flips = 0u64;

        for (dr, dc) in DIRECTIONS {
            let mut r = row + dr;
            let mut c = col + dc;
            let mut line = 0u64;

            while in_bounds(r, c) {
                let square = bit(r as usize * BOARD_SIZE + c as usize);
                if opp & square != 0 {
                    line |= square;
                } else {
                    // Only a run closed by our own disc is captured.
                    if me & square != 0 {
                        flips |= line;
                    }
                    break;
                }

                r += dr;
                c += dc;
            }
        }

        flips
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, " ")?;
        for col in 0..BOARD_SIZE {
            write!(f, " {col}")?;
        }
        writeln!(f)?;
        for row in 0..BOARD_SIZE {
            write!(f, "{row}")?;
            for col in 0..BOARD_SIZE {
                let ch = match self.cell(row, col) {
                    Cell::Black => 'X',
                    Cell::White => 'O',
                    Cell::Empty => '.',
                };
                write!(f, " {ch}")?;
            }
            writeln!(f)?;
        }
        write!(f, "Score (Black - White): {}", self.score())
    }
}

pub(crate) const fn bit(pos: usize) -> u64 {
    if pos < NUM_SQUARES { 1u64 << pos } else { 0 }
}

/// Set bit positions from least significant upward.
pub(crate) fn mask_to_indices(mask: u64) -> impl Iterator<Item = usize> {
    let mut bits = mask;
    std::iter::from_fn(move || {
        if bits == 0 {
            return None;
        }
        let idx = bits.trailing_zeros() as usize;
        bits &= bits - 1;
        Some(idx)
    })
}

fn pos_to_row_col(pos: usize) -> (i32, i32) {
    ((pos / BOARD_SIZE) as i32, (pos % BOARD_SIZE) as i32)
}

fn in_bounds(row: i32, col: i32) -> bool {
    (0..BOARD_SIZE as i32).contains(&row) && (0..BOARD_SIZE as i32).contains(&col)
}
