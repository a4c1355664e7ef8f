//! Chess board representation and game logic.
//!
//! Bitboard-backed position representation, a complete pseudo-legal and
//! legal move generator (orthodox chess plus Chess960 castling), and a
//! stateful [`Board`] supporting push/pop, FEN/EPD serialization, SAN/UCI/
//! XBoard parsing and formatting, position validation, and repetition and
//! draw-rule detection.
//!
//! # Example
//! ```
//! use chess_core::board::Board;
//!
//! let mut board = Board::new();
//! let mv = board.parse_san("e4").unwrap();
//! assert_eq!(board.san(mv), "e4");
//! board.push(mv);
//! assert_eq!(board.turn(), chess_core::board::Color::Black);
//! ```

pub(crate) mod attack_tables;
pub(crate) mod baseboard;
mod epd;
mod error;
mod fen;
mod movegen;
mod notation;
mod push_pop;
mod repetition;
mod san;
mod state;
mod status;
mod types;

// Public API - types users need
pub use epd::EpdOperand;
pub use error::{EmptyStackError, EpdError, FenError, SanError, SquareError, UciError};
pub use fen::{EpSquarePolicy, STARTING_FEN};
pub use state::Board;
pub use status::{Outcome, Status, Termination};
pub use types::{Bitboard, Color, Move, MoveList, MoveListIntoIter, Piece, PieceType, Square, SquareSet};
