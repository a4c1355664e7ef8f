//! UCI and XBoard move formatting/parsing at the `Board` level.
//!
//! [`Move::uci`]/[`Move::from_uci`] handle the token grammar in isolation;
//! these methods add the position-dependent part — normalizing between
//! Chess960's king-to-rook castling encoding and standard king-two-squares,
//! and validating legality.

use crate::board::error::UciError;
use crate::board::movegen::legal::is_legal;
use crate::board::state::Board;
use crate::board::types::{Move, Square};

impl Board {
    /// `mv`'s UCI text, re-encoding castling as king-to-rook when
    /// `chess960` is true and king-two-squares otherwise, regardless of
    /// the board's own `is_chess960()` flag.
    #[must_use]
    pub fn uci(&self, mv: Move, chess960: bool) -> String {
        if !self.is_castling(mv) {
            return mv.uci();
        }
        let rank = mv.from.rank();
        let a_side = self.castling_side_is_a(mv);
        let to = if chess960 {
            mv.to
        } else if a_side {
            Square::new(rank, 2)
        } else {
            Square::new(rank, 6)
        };
        Move::new(mv.from, to).uci()
    }

    /// `mv`'s XBoard text: identical to UCI except the null move is
    /// `@@@@`, and castling is always shown as `O-O`/`O-O-O`.
    #[must_use]
    pub fn xboard(&self, mv: Move) -> String {
        if mv.is_null() {
            return "@@@@".to_string();
        }
        if self.is_castling(mv) {
            return if self.castling_side_is_a(mv) { "O-O-O" } else { "O-O" }.to_string();
        }
        mv.uci()
    }

    /// Parse and validate a UCI token against the currently-legal moves,
    /// normalizing castling notation as needed.
    pub fn parse_uci(&self, text: &str) -> Result<Move, UciError> {
        let raw = Move::from_uci(text).map_err(|_| UciError::InvalidMove {
            uci: text.to_string(),
        })?;
        let normalized = self.normalize_castling(raw);
        if is_legal(self, normalized) {
            Ok(normalized)
        } else {
            Err(UciError::IllegalMove {
                uci: text.to_string(),
            })
        }
    }

    /// Parse and validate an XBoard token (`@@@@` null, `O-O`/`O-O-O`
    /// castling, otherwise identical to UCI).
    pub fn parse_xboard(&self, text: &str) -> Result<Move, UciError> {
        if text == "@@@@" {
            return Ok(Move::null());
        }
        if matches!(text, "O-O" | "0-0" | "O-O-O" | "0-0-0") {
            let queenside = matches!(text, "O-O-O" | "0-0-0");
            let king = self.king(self.turn()).ok_or(UciError::IllegalMove {
                uci: text.to_string(),
            })?;
            let candidates = crate::board::movegen::legal::generate_legal_moves(
                self,
                crate::board::types::Bitboard::from_square(king),
                crate::board::types::Bitboard::ALL,
            );
            for mv in candidates.iter() {
                if self.is_castling(*mv) && self.castling_side_is_a(*mv) == queenside {
                    return Ok(*mv);
                }
            }
            return Err(UciError::IllegalMove {
                uci: text.to_string(),
            });
        }
        self.parse_uci(text)
    }

    fn castling_side_is_a(&self, mv: Move) -> bool {
        mv.to.file() < mv.from.file()
    }
}
