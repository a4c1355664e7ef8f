//! FEN parsing and serialization.
//!
//! The six standard fields: board placement, side to move, castling
//! availability (XFEN `KQkq` or Shredder file-letter notation), en passant
//! target, half-move clock, full-move number. Full-move `0` is accepted and
//! normalized to `1` for compatibility with non-conforming producers.

use std::str::FromStr;

use crate::board::error::FenError;
use crate::board::state::Board;
use crate::board::types::{Bitboard, Color, PieceType, Square};

/// The standard starting-position FEN.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// When to disclose a stored en passant square in a serialized position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EpSquarePolicy {
    /// Report the stored square unconditionally (plain FEN behavior).
    Always,
    /// Report it only if some pseudo-legal en passant capture exists.
    PseudoLegal,
    /// Report it only if some legal en passant capture exists.
    Legal,
}

impl Board {
    /// Construct a `Board` from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let mut board = Board::empty();
        board.set_fen(fen)?;
        Ok(board)
    }

    /// Alias for [`Board::from_fen`].
    pub fn try_from_fen(fen: &str) -> Result<Self, FenError> {
        Board::from_fen(fen)
    }

    /// Replace the entire position with the one described by `fen`.
    pub fn set_fen(&mut self, fen: &str) -> Result<(), FenError> {
        let parts: Vec<&str> = fen.split_ascii_whitespace().collect();
        if parts.len() < 4 {
            return Err(FenError::TooFewParts { found: parts.len() });
        }

        let mut new_board = crate::board::baseboard::BaseBoard::empty();
        new_board.set_board_fen(parts[0])?;

        let turn = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(FenError::InvalidSideToMove {
                    found: other.to_string(),
                })
            }
        };

        self.clear_move_history();
        self.board = new_board;
        self.turn = turn;
        self.castling_rights = Bitboard::EMPTY;
        self.chess960 = false;
        self.set_castling_fen(parts[2])?;

        self.ep_square = match parts[3] {
            "-" => None,
            sq => Some(sq.parse::<Square>().map_err(|_| FenError::InvalidEnPassant {
                found: sq.to_string(),
            })?),
        };

        self.halfmove_clock = match parts.get(4) {
            None => 0,
            Some(s) => s.parse().map_err(|_| FenError::InvalidHalfmoveClock {
                found: s.to_string(),
            })?,
        };

        self.fullmove_number = match parts.get(5) {
            None => 1,
            Some(s) => {
                let n: u32 = s.parse().map_err(|_| FenError::InvalidFullmoveNumber {
                    found: s.to_string(),
                })?;
                if n == 0 {
                    1
                } else {
                    n
                }
            }
        };

        Ok(())
    }

    fn set_castling_fen(&mut self, field: &str) -> Result<(), FenError> {
        if field == "-" {
            return Ok(());
        }
        for ch in field.chars() {
            match ch {
                'K' | 'Q' | 'k' | 'q' => self.add_xfen_castling_right(ch)?,
                'A'..='H' | 'a'..='h' => {
                    self.chess960 = true;
                    self.add_shredder_castling_right(ch)?;
                }
                other => return Err(FenError::InvalidCastling { char: other }),
            }
        }
        Ok(())
    }

    fn add_xfen_castling_right(&mut self, ch: char) -> Result<(), FenError> {
        let color = if ch.is_ascii_uppercase() { Color::White } else { Color::Black };
        let backrank = if color == Color::White { Bitboard::RANK_1 } else { Bitboard::RANK_8 };
        let Some(king) = self.board.king(color) else {
            return Err(FenError::InvalidCastling { char: ch });
        };
        let rooks = self.board.pieces_mask(PieceType::Rook, color) & backrank;
        let rook = match ch.to_ascii_lowercase() {
            'k' => rooks.iter().filter(|r| r.file() > king.file()).max_by_key(|r| r.file()),
            'q' => rooks.iter().filter(|r| r.file() < king.file()).min_by_key(|r| r.file()),
            _ => unreachable!(),
        };
        match rook {
            Some(rook) => {
                self.castling_rights |= Bitboard::from_square(rook);
                Ok(())
            }
            None => Err(FenError::InvalidCastling { char: ch }),
        }
    }

    fn add_shredder_castling_right(&mut self, ch: char) -> Result<(), FenError> {
        let color = if ch.is_ascii_uppercase() { Color::White } else { Color::Black };
        let backrank_rank = if color == Color::White { 0 } else { 7 };
        let file = (ch.to_ascii_lowercase() as u8 - b'a') as usize;
        let sq = Square::new(backrank_rank, file);
        if self.board.piece_type_at(sq) != Some(PieceType::Rook) || self.board.color_at(sq) != Some(color) {
            return Err(FenError::InvalidCastling { char: ch });
        }
        self.castling_rights |= Bitboard::from_square(sq);
        Ok(())
    }

    /// Serialize the current position as a FEN string.
    #[must_use]
    pub fn fen(&self) -> String {
        format!(
            "{} {} {} {} {} {}",
            self.board.board_fen(false),
            if self.turn == Color::White { "w" } else { "b" },
            self.castling_fen(),
            self.ep_field(EpSquarePolicy::Always),
            self.halfmove_clock,
            self.fullmove_number,
        )
    }

    /// The en-passant field under a given disclosure policy: `Always`
    /// reports the stored square unconditionally (FEN's behavior); the
    /// other two only report it when a capture actually exists.
    #[must_use]
    pub(crate) fn ep_field(&self, policy: EpSquarePolicy) -> String {
        match self.ep_square {
            None => "-".to_string(),
            Some(sq) => {
                let disclose = match policy {
                    EpSquarePolicy::Always => true,
                    EpSquarePolicy::PseudoLegal => self.has_pseudo_legal_en_passant(),
                    EpSquarePolicy::Legal => self.has_legal_en_passant(),
                };
                if disclose {
                    sq.to_string()
                } else {
                    "-".to_string()
                }
            }
        }
    }

    /// The castling-availability field: XFEN `KQkq` style in standard mode,
    /// Shredder file-letter style in Chess960 mode. `-` if no rights remain.
    #[must_use]
    pub fn castling_fen(&self) -> String {
        let rights = self.clean_castling_rights();
        if rights.is_empty() {
            return "-".to_string();
        }

        let mut out = String::new();
        if self.chess960 {
            for (color, backrank) in [(Color::White, Bitboard::RANK_1), (Color::Black, Bitboard::RANK_8)] {
                let mut files: Vec<usize> = (rights & backrank).iter().map(|sq| sq.file()).collect();
                files.sort_unstable();
                for file in files.drain(..) {
                    let ch = (b'a' + file as u8) as char;
                    out.push(if color == Color::White { ch.to_ascii_uppercase() } else { ch });
                }
            }
        } else {
            for (h_square, q_square, k_char, q_char) in [
                (Square::H1, Square::A1, 'K', 'Q'),
                (Square::H8, Square::A8, 'k', 'q'),
            ] {
                if rights.contains(h_square) {
                    out.push(k_char);
                }
                if rights.contains(q_square) {
                    out.push(q_char);
                }
            }
        }
        out
    }
}

impl FromStr for Board {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Board::from_fen(s)
    }
}
