//! Bitboard chess position representation, move generation, and
//! FEN/EPD/SAN/UCI notation.

pub mod board;

pub use board::{
    Bitboard, Board, Color, EmptyStackError, EpSquarePolicy, EpdError, EpdOperand, FenError, Move,
    MoveList, Outcome, Piece, PieceType, SanError, Square, SquareError, SquareSet, Status,
    Termination, UciError, STARTING_FEN,
};
