//! Standard Algebraic Notation: formatting and parsing against the set of
//! currently-legal moves.

use crate::board::error::SanError;
use crate::board::movegen::legal::generate_legal_moves;
use crate::board::state::Board;
use crate::board::types::{Bitboard, Move, PieceType, Square};

impl Board {
    /// Format `mv` (assumed legal in the current position) as SAN.
    #[must_use]
    pub fn san(&self, mv: Move) -> String {
        if mv.is_null() {
            return "--".to_string();
        }

        let mut out = String::new();

        if mv.is_drop() {
            let piece = mv.drop.expect("drop move has a drop piece");
            if piece != PieceType::Pawn {
                out.push(piece.to_char().to_ascii_uppercase());
            }
            out.push('@');
            out.push_str(&mv.to.to_string());
            return self.append_check_suffix(mv, out);
        }

        if self.is_castling(mv) {
            out.push_str(if mv.to.file() < mv.from.file() { "O-O-O" } else { "O-O" });
            return self.append_check_suffix(mv, out);
        }

        let piece_type = self.piece_type_at(mv.from).expect("legal move has a moving piece");
        let is_capture = self.piece_at(mv.to).is_some() || crate::board::movegen::is_en_passant(self, mv);

        if piece_type == PieceType::Pawn {
            if is_capture {
                out.push((b'a' + mv.from.file() as u8) as char);
                out.push('x');
            }
        } else {
            out.push(piece_type.to_char().to_ascii_uppercase());
            let (file, rank) = self.disambiguation(mv, piece_type);
            if file {
                out.push((b'a' + mv.from.file() as u8) as char);
            }
            if rank {
                out.push((b'1' + mv.from.rank() as u8) as char);
            }
            if is_capture {
                out.push('x');
            }
        }

        out.push_str(&mv.to.to_string());
        if let Some(promotion) = mv.promotion {
            out.push('=');
            out.push(promotion.to_char().to_ascii_uppercase());
        }

        self.append_check_suffix(mv, out)
    }

    fn append_check_suffix(&self, mv: Move, mut out: String) -> String {
        let mut after = self.clone();
        after.push(mv);
        if after.is_checkmate() {
            out.push('#');
        } else if after.is_check() {
            out.push('+');
        }
        out
    }

    /// (needs_file, needs_rank) for disambiguating `mv` among other legal
    /// moves of the same piece type to the same destination.
    fn disambiguation(&self, mv: Move, piece_type: PieceType) -> (bool, bool) {
        let others = generate_legal_moves(self, Bitboard::ALL, Bitboard::from_square(mv.to));
        let mut same_file = false;
        let mut same_rank = false;
        let mut ambiguous = false;
        for other in others.iter() {
            if other.from == mv.from || other.to != mv.to {
                continue;
            }
            if self.piece_type_at(other.from) != Some(piece_type) {
                continue;
            }
            ambiguous = true;
            if other.from.file() == mv.from.file() {
                same_file = true;
            }
            if other.from.rank() == mv.from.rank() {
                same_rank = true;
            }
        }
        if !ambiguous {
            (false, false)
        } else if !same_file {
            (true, false)
        } else if !same_rank {
            (false, true)
        } else {
            (true, true)
        }
    }

    /// Parse a SAN token against the currently-legal moves.
    pub fn parse_san(&self, san: &str) -> Result<Move, SanError> {
        let trimmed = san.trim_end_matches(['+', '#']);
        if trimmed.is_empty() {
            return Err(SanError::Empty);
        }

        if matches!(trimmed, "--" | "Z0" | "0000" | "@@@@") {
            return Ok(Move::null());
        }

        if matches!(trimmed, "O-O" | "0-0") {
            return self.find_castling(false);
        }
        if matches!(trimmed, "O-O-O" | "0-0-0") {
            return self.find_castling(true);
        }

        if let Some((piece_ch, rest)) = trimmed.split_once('@') {
            let mut chars = piece_ch.chars();
            let pc = chars.next().ok_or(SanError::Empty)?;
            let piece = PieceType::from_char(pc).ok_or(SanError::InvalidPiece { char: pc })?;
            let to: Square = rest.parse().map_err(|_| SanError::InvalidSquare {
                notation: rest.to_string(),
            })?;
            let mv = Move::drop_move(piece, to);
            return self.match_legal(mv, san);
        }

        self.parse_ordinary_san(trimmed, san)
    }

    fn find_castling(&self, queenside: bool) -> Result<Move, SanError> {
        let king = self.king(self.turn()).ok_or(SanError::InvalidCastling {
            notation: "no king".to_string(),
        })?;
        let moves = generate_legal_moves(self, Bitboard::from_square(king), Bitboard::ALL);
        for mv in moves.iter() {
            if self.is_castling(*mv) && (mv.to.file() < mv.from.file()) == queenside {
                return Ok(*mv);
            }
        }
        Err(SanError::InvalidCastling {
            notation: if queenside { "O-O-O" } else { "O-O" }.to_string(),
        })
    }

    fn parse_ordinary_san(&self, trimmed: &str, original: &str) -> Result<Move, SanError> {
        let bytes: Vec<char> = trimmed.chars().collect();
        let mut idx = 0;

        let piece_type = if bytes[idx].is_ascii_uppercase() && bytes[idx] != 'O' {
            let pt = PieceType::from_char(bytes[idx]).ok_or(SanError::InvalidPiece { char: bytes[idx] })?;
            idx += 1;
            pt
        } else {
            PieceType::Pawn
        };

        let mut promotion = None;
        let mut end = bytes.len();
        if end >= 2 && matches!(bytes[end - 1].to_ascii_uppercase(), 'N' | 'B' | 'R' | 'Q') {
            let promo_start = if bytes[end - 2] == '=' { end - 2 } else { end - 1 };
            promotion = PieceType::from_char(bytes[end - 1]);
            end = promo_start;
        }

        if end < idx + 2 {
            return Err(SanError::InvalidSquare {
                notation: original.to_string(),
            });
        }
        let dest_str: String = bytes[end - 2..end].iter().collect();
        let to: Square = dest_str.parse().map_err(|_| SanError::InvalidSquare {
            notation: dest_str.clone(),
        })?;

        let mut disambig: Vec<char> = bytes[idx..end - 2].iter().copied().filter(|&c| c != 'x').collect();
        disambig.retain(|c| *c != '-');

        let mut from_file = None;
        let mut from_rank = None;
        for c in &disambig {
            match c {
                'a'..='h' => from_file = Some(*c as usize - 'a' as usize),
                '1'..='8' => from_rank = Some(*c as usize - '1' as usize),
                _ => {
                    return Err(SanError::InvalidSquare {
                        notation: original.to_string(),
                    })
                }
            }
        }

        if (to.rank() == 0 || to.rank() == 7) && piece_type == PieceType::Pawn && promotion.is_none() {
            let reaches_backrank = (self.turn() == crate::board::types::Color::White && to.rank() == 7)
                || (self.turn() == crate::board::types::Color::Black && to.rank() == 0);
            if reaches_backrank {
                return Err(SanError::UnderspecifiedPromotion {
                    san: original.to_string(),
                });
            }
        }

        let candidates = generate_legal_moves(self, Bitboard::ALL, Bitboard::from_square(to));
        let mut matches: Vec<Move> = Vec::new();
        for mv in candidates.iter() {
            if self.piece_type_at(mv.from) != Some(piece_type) {
                continue;
            }
            if let Some(f) = from_file {
                if mv.from.file() != f {
                    continue;
                }
            }
            if let Some(r) = from_rank {
                if mv.from.rank() != r {
                    continue;
                }
            }
            if mv.promotion != promotion {
                continue;
            }
            matches.push(*mv);
        }

        match matches.len() {
            0 => Err(SanError::NoMatchingMove {
                san: original.to_string(),
            }),
            1 => Ok(matches[0]),
            _ => Err(SanError::AmbiguousMove {
                san: original.to_string(),
            }),
        }
    }

    fn match_legal(&self, mv: Move, original: &str) -> Result<Move, SanError> {
        let legal = generate_legal_moves(self, Bitboard::from_square(mv.from), Bitboard::from_square(mv.to));
        if legal.iter().any(|m| *m == mv) {
            Ok(mv)
        } else {
            Err(SanError::NoMatchingMove {
                san: original.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opening_pawn_push_san() {
        let board = Board::new();
        let mv = Move::new(Square::new(1, 4), Square::new(3, 4));
        assert_eq!(board.san(mv), "e4");
    }

    #[test]
    fn knight_development_san() {
        let board = Board::new();
        let mv = Move::new(Square::new(0, 6), Square::new(2, 5));
        assert_eq!(board.san(mv), "Nf3");
    }

    #[test]
    fn parse_san_round_trips_opening_move() {
        let board = Board::new();
        let mv = board.parse_san("Nf3").unwrap();
        assert_eq!(mv, Move::new(Square::new(0, 6), Square::new(2, 5)));
    }

    #[test]
    fn parse_san_rejects_ambiguous_move() {
        let board = Board::from_fen("4k3/8/8/8/8/8/4K3/R6R w - - 0 1").unwrap();
        assert!(board.parse_san("Rd1").is_err());
    }

    #[test]
    fn underspecified_promotion_is_rejected() {
        let board = Board::from_fen("8/4P3/8/4k3/8/8/8/4K3 w - - 0 1").unwrap();
        assert!(matches!(
            board.parse_san("e8"),
            Err(SanError::UnderspecifiedPromotion { .. })
        ));
    }

    #[test]
    fn parse_san_accepts_lowercase_promotion_letter() {
        let board = Board::from_fen("8/4P3/8/4k3/8/8/8/4K3 w - - 0 1").unwrap();
        let mv = board.parse_san("e8=q").unwrap();
        assert_eq!(mv.promotion, Some(PieceType::Queen));
        let mv = board.parse_san("e8n").unwrap();
        assert_eq!(mv.promotion, Some(PieceType::Knight));
    }

    #[test]
    fn castling_san_both_sides() {
        let board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let kingside = board.parse_san("O-O").unwrap();
        assert!(board.is_castling(kingside));
        let queenside = board.parse_san("O-O-O").unwrap();
        assert!(board.is_castling(queenside));
    }

    #[test]
    fn fools_mate_san_has_mate_suffix() {
        let mut board = Board::new();
        for uci in ["f2f3", "e7e5", "g2g4"] {
            board.push(Move::from_uci(uci).unwrap());
        }
        let mv = Move::from_uci("d8h4").unwrap();
        assert_eq!(board.san(mv), "Qh4#");
    }
}
