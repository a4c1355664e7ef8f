//! Piece placement: the six piece-type bitboards, per-color occupancy, and
//! the geometric queries (attacks, attackers, pins) built on top of them.
//!
//! `BaseBoard` carries no move history and no game state beyond placement;
//! `Board` embeds one and layers turn, castling rights, en passant, and the
//! move stack on top.

use std::collections::HashMap;
use std::fmt;

use crate::board::attack_tables;
use crate::board::error::FenError;
use crate::board::types::{Bitboard, Color, ColorIndex, Piece, PieceIndex, PieceType, Square};

#[derive(Clone)]
pub struct BaseBoard {
    piece_bb: [Bitboard; 6],
    occupied_co: [Bitboard; 2],
    occupied: Bitboard,
    promoted: Bitboard,
}

impl BaseBoard {
    #[must_use]
    pub fn empty() -> Self {
        BaseBoard {
            piece_bb: [Bitboard::EMPTY; 6],
            occupied_co: [Bitboard::EMPTY; 2],
            occupied: Bitboard::EMPTY,
            promoted: Bitboard::EMPTY,
        }
    }

    #[must_use]
    pub fn starting_position() -> Self {
        let mut board = BaseBoard::empty();
        board.reset_board();
        board
    }

    #[inline]
    #[must_use]
    pub fn occupied(&self) -> Bitboard {
        self.occupied
    }

    #[inline]
    #[must_use]
    pub fn occupied_by(&self, color: Color) -> Bitboard {
        self.occupied_co[ColorIndex::from_color(color).as_usize()]
    }

    #[inline]
    #[must_use]
    pub fn promoted(&self) -> Bitboard {
        self.promoted
    }

    #[inline]
    #[must_use]
    pub fn pieces_mask(&self, piece_type: PieceType, color: Color) -> Bitboard {
        self.piece_bb[PieceIndex::from_piece(piece_type).as_usize()] & self.occupied_by(color)
    }

    #[inline]
    #[must_use]
    pub fn piece_type_bb(&self, piece_type: PieceType) -> Bitboard {
        self.piece_bb[PieceIndex::from_piece(piece_type).as_usize()]
    }

    #[must_use]
    pub fn piece_type_at(&self, sq: Square) -> Option<PieceType> {
        if !self.occupied.contains(sq) {
            return None;
        }
        PieceType::ALL
            .into_iter()
            .find(|&pt| self.piece_type_bb(pt).contains(sq))
    }

    #[must_use]
    pub fn color_at(&self, sq: Square) -> Option<Color> {
        if self.occupied_by(Color::White).contains(sq) {
            Some(Color::White)
        } else if self.occupied_by(Color::Black).contains(sq) {
            Some(Color::Black)
        } else {
            None
        }
    }

    #[must_use]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        let piece_type = self.piece_type_at(sq)?;
        let color = self.color_at(sq)?;
        Some(Piece::new(piece_type, color))
    }

    #[must_use]
    pub fn is_promoted(&self, sq: Square) -> bool {
        self.promoted.contains(sq)
    }

    #[must_use]
    pub fn king(&self, color: Color) -> Option<Square> {
        self.pieces_mask(PieceType::King, color).lsb()
    }

    pub fn set_piece_at(&mut self, sq: Square, piece: Piece, promoted: bool) {
        self.remove_piece_at(sq);
        let bit = Bitboard::from_square(sq);
        self.piece_bb[PieceIndex::from_piece(piece.piece_type).as_usize()] |= bit;
        self.occupied_co[ColorIndex::from_color(piece.color).as_usize()] |= bit;
        self.occupied |= bit;
        if promoted {
            self.promoted |= bit;
        }
    }

    pub fn remove_piece_at(&mut self, sq: Square) -> Option<Piece> {
        let piece = self.piece_at(sq)?;
        let not_bit = !Bitboard::from_square(sq);
        self.piece_bb[PieceIndex::from_piece(piece.piece_type).as_usize()] &= not_bit;
        self.occupied_co[ColorIndex::from_color(piece.color).as_usize()] &= not_bit;
        self.occupied &= not_bit;
        self.promoted &= not_bit;
        Some(piece)
    }

    pub fn clear_board(&mut self) {
        *self = BaseBoard::empty();
    }

    pub fn reset_board(&mut self) {
        self.clear_board();
        for file in 0..8 {
            self.set_piece_at(
                Square::new(1, file),
                Piece::new(PieceType::Pawn, Color::White),
                false,
            );
            self.set_piece_at(
                Square::new(6, file),
                Piece::new(PieceType::Pawn, Color::Black),
                false,
            );
        }
        const BACK_RANK: [PieceType; 8] = [
            PieceType::Rook,
            PieceType::Knight,
            PieceType::Bishop,
            PieceType::Queen,
            PieceType::King,
            PieceType::Bishop,
            PieceType::Knight,
            PieceType::Rook,
        ];
        for (file, piece_type) in BACK_RANK.into_iter().enumerate() {
            self.set_piece_at(
                Square::new(0, file),
                Piece::new(piece_type, Color::White),
                false,
            );
            self.set_piece_at(
                Square::new(7, file),
                Piece::new(piece_type, Color::Black),
                false,
            );
        }
    }

    /// Attacks of whatever piece (if any) stands on `sq`, given the current
    /// occupancy.
    #[must_use]
    pub fn attacks_mask(&self, sq: Square) -> Bitboard {
        match self.piece_type_at(sq) {
            None => Bitboard::EMPTY,
            Some(PieceType::Pawn) => {
                attack_tables::pawn_attacks(self.color_at(sq).expect("occupied square has a color"), sq)
            }
            Some(pt) => attack_tables::attacks_for(pt, sq, self.occupied),
        }
    }

    /// Squares holding a `color` piece that attacks `sq`, using `occupied`
    /// as the hypothetical board occupancy (callers probing castling safety
    /// pass an occupancy with the king and/or rook removed).
    #[must_use]
    pub fn attackers_mask(&self, color: Color, sq: Square, occupied: Bitboard) -> Bitboard {
        let rooks_and_queens = self.pieces_mask(PieceType::Rook, color) | self.pieces_mask(PieceType::Queen, color);
        let bishops_and_queens =
            self.pieces_mask(PieceType::Bishop, color) | self.pieces_mask(PieceType::Queen, color);

        (attack_tables::king_attacks(sq) & self.pieces_mask(PieceType::King, color))
            | (attack_tables::knight_attacks(sq) & self.pieces_mask(PieceType::Knight, color))
            | (attack_tables::rook_attacks(sq, occupied) & rooks_and_queens)
            | (attack_tables::bishop_attacks(sq, occupied) & bishops_and_queens)
            | (attack_tables::pawn_attacks(color.opponent(), sq) & self.pieces_mask(PieceType::Pawn, color))
    }

    #[must_use]
    pub fn is_attacked_by(&self, color: Color, sq: Square) -> bool {
        !self.attackers_mask(color, sq, self.occupied).is_empty()
    }

    /// The ray of squares pinning a `color` piece standing on `sq` to its
    /// king, or `Bitboard::ALL` if the piece on `sq` is not pinned (every
    /// square is "legal" to move to with respect to the pin).
    #[must_use]
    pub fn pin_mask(&self, color: Color, sq: Square) -> Bitboard {
        let Some(king) = self.king(color) else {
            return Bitboard::ALL;
        };
        let square_bb = Bitboard::from_square(sq);
        let opponent = color.opponent();

        let orthogonal_rays = attack_tables::rook_attacks(king, Bitboard::EMPTY);
        if orthogonal_rays.intersects(square_bb) {
            let sliders =
                self.pieces_mask(PieceType::Rook, opponent) | self.pieces_mask(PieceType::Queen, opponent);
            let snipers = orthogonal_rays & sliders;
            for sniper in snipers.iter() {
                if attack_tables::between(sniper, king) & (self.occupied | square_bb) == square_bb {
                    return attack_tables::ray(king, sniper);
                }
            }
            return Bitboard::ALL;
        }

        let diagonal_rays = attack_tables::bishop_attacks(king, Bitboard::EMPTY);
        if diagonal_rays.intersects(square_bb) {
            let sliders = self.pieces_mask(PieceType::Bishop, opponent)
                | self.pieces_mask(PieceType::Queen, opponent);
            let snipers = diagonal_rays & sliders;
            for sniper in snipers.iter() {
                if attack_tables::between(sniper, king) & (self.occupied | square_bb) == square_bb {
                    return attack_tables::ray(king, sniper);
                }
            }
        }

        Bitboard::ALL
    }

    #[must_use]
    pub fn piece_map(&self) -> HashMap<Square, Piece> {
        self.occupied
            .iter()
            .map(|sq| (sq, self.piece_at(sq).expect("occupied square has a piece")))
            .collect()
    }

    pub fn set_piece_map(&mut self, pieces: &HashMap<Square, Piece>) {
        self.clear_board();
        for (&sq, &piece) in pieces {
            self.set_piece_at(sq, piece, false);
        }
    }

    /// Board FEN piece-placement field (ranks 8 down to 1, `/`-separated).
    /// When `promoted` is set, each promoted piece is suffixed with `~`
    /// (the XFEN convention used by variants that track promoted pieces).
    #[must_use]
    pub fn board_fen(&self, promoted: bool) -> String {
        let mut out = String::new();
        for rank in (0..8).rev() {
            let mut empty_run = 0;
            for file in 0..8 {
                let sq = Square::new(rank, file);
                match self.piece_at(sq) {
                    None => empty_run += 1,
                    Some(piece) => {
                        if empty_run > 0 {
                            out.push_str(&empty_run.to_string());
                            empty_run = 0;
                        }
                        out.push(piece.symbol());
                        if promoted && self.is_promoted(sq) {
                            out.push('~');
                        }
                    }
                }
            }
            if empty_run > 0 {
                out.push_str(&empty_run.to_string());
            }
            if rank > 0 {
                out.push('/');
            }
        }
        out
    }

    pub fn set_board_fen(&mut self, fen: &str) -> Result<(), FenError> {
        let ranks: Vec<&str> = fen.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::InvalidRank { rank: ranks.len() });
        }
        self.clear_board();
        for (display_rank, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - display_rank;
            let mut file = 0usize;
            let mut chars = rank_str.chars().peekable();
            while let Some(c) = chars.next() {
                if let Some(digit) = c.to_digit(10) {
                    file += digit as usize;
                } else {
                    if file >= 8 {
                        return Err(FenError::TooManyFiles { rank, files: file + 1 });
                    }
                    let promoted = chars.peek() == Some(&'~');
                    if promoted {
                        chars.next();
                    }
                    let piece = Piece::from_symbol(c).ok_or(FenError::InvalidPiece { char: c })?;
                    self.set_piece_at(Square::new(rank, file), piece, promoted);
                    file += 1;
                }
            }
            if file != 8 {
                return Err(FenError::TooManyFiles { rank, files: file });
            }
        }
        Ok(())
    }

    /// Set up one of the 960 Chess960 (Fischer Random) starting positions
    /// by its Scharnagl index (0..=959).
    ///
    /// See <https://en.wikipedia.org/wiki/Fischer_random_chess_numbering_scheme>.
    pub fn set_chess960_pos(&mut self, scharnagl: u32) {
        let mut n = scharnagl % 960;
        let bw = n % 4;
        n /= 4;
        let bb = n % 4;
        n /= 4;
        let q = n % 6;
        n /= 6;

        let bishop_light_file = (2 * bw + 1) as usize;
        let bishop_dark_file = (2 * bb) as usize;

        let mut slots: Vec<usize> = (0..8)
            .filter(|&f| f != bishop_light_file && f != bishop_dark_file)
            .collect();
        let queen_file = slots.remove(q as usize);

        let (k1, k2) = nth_combination_5_choose_2(n);
        let knight_file_a = slots[k1];
        let knight_file_b = slots[k2];

        let mut remaining = slots;
        for idx in [k2, k1] {
            remaining.remove(idx);
        }
        let (rook1_file, king_file, rook2_file) = (remaining[0], remaining[1], remaining[2]);

        self.clear_board();
        let placements = [
            (bishop_light_file, PieceType::Bishop),
            (bishop_dark_file, PieceType::Bishop),
            (queen_file, PieceType::Queen),
            (knight_file_a, PieceType::Knight),
            (knight_file_b, PieceType::Knight),
            (rook1_file, PieceType::Rook),
            (king_file, PieceType::King),
            (rook2_file, PieceType::Rook),
        ];
        for (file, piece_type) in placements {
            self.set_piece_at(Square::new(0, file), Piece::new(piece_type, Color::White), false);
            self.set_piece_at(Square::new(7, file), Piece::new(piece_type, Color::Black), false);
        }
        for file in 0..8 {
            self.set_piece_at(
                Square::new(1, file),
                Piece::new(PieceType::Pawn, Color::White),
                false,
            );
            self.set_piece_at(
                Square::new(6, file),
                Piece::new(PieceType::Pawn, Color::Black),
                false,
            );
        }
    }

    /// Recover the Scharnagl index of the current position, if it is a
    /// valid, symmetric Chess960 starting position.
    #[must_use]
    pub fn chess960_pos(&self) -> Option<u32> {
        if !self.promoted.is_empty() {
            return None;
        }
        if self.pieces_mask(PieceType::Pawn, Color::White) != Bitboard::RANK_2
            || self.pieces_mask(PieceType::Pawn, Color::Black) != Bitboard::RANK_7
        {
            return None;
        }
        if (self.occupied_by(Color::White) & Bitboard::RANK_1).popcount() != 8
            || (self.occupied_by(Color::Black) & Bitboard::RANK_8).popcount() != 8
        {
            return None;
        }
        for file in 0..8 {
            if self.piece_type_at(Square::new(0, file)) != self.piece_type_at(Square::new(7, file)) {
                return None;
            }
        }

        let bishops: Vec<usize> = (0..8)
            .filter(|&f| self.piece_type_at(Square::new(0, f)) == Some(PieceType::Bishop))
            .collect();
        let [b1, b2]: [usize; 2] = bishops.try_into().ok()?;
        let (bishop_light_file, bishop_dark_file) = if b1 % 2 == 1 { (b1, b2) } else { (b2, b1) };
        if bishop_light_file % 2 == 0 || bishop_dark_file % 2 == 1 {
            return None;
        }
        let bw = ((bishop_light_file - 1) / 2) as u32;
        let bb = (bishop_dark_file / 2) as u32;

        let mut slots: Vec<usize> = (0..8)
            .filter(|&f| f != bishop_light_file && f != bishop_dark_file)
            .collect();
        let queen_file = (0..8).find(|&f| self.piece_type_at(Square::new(0, f)) == Some(PieceType::Queen))?;
        let q = slots.iter().position(|&f| f == queen_file)? as u32;
        slots.retain(|&f| f != queen_file);

        let knight_files: Vec<usize> = (0..8)
            .filter(|&f| self.piece_type_at(Square::new(0, f)) == Some(PieceType::Knight))
            .collect();
        let [kf1, kf2]: [usize; 2] = knight_files.clone().try_into().ok()?;
        let mut knight_slots = [
            slots.iter().position(|&f| f == kf1)?,
            slots.iter().position(|&f| f == kf2)?,
        ];
        knight_slots.sort_unstable();
        let n_knight = combination_index_5_choose_2(knight_slots[0], knight_slots[1]);

        let remaining: Vec<usize> = slots
            .into_iter()
            .filter(|f| !knight_files.contains(f))
            .collect();
        if remaining.len() != 3 {
            return None;
        }
        let kinds: Vec<Option<PieceType>> = remaining
            .iter()
            .map(|&f| self.piece_type_at(Square::new(0, f)))
            .collect();
        if kinds
            != [
                Some(PieceType::Rook),
                Some(PieceType::King),
                Some(PieceType::Rook),
            ]
        {
            return None;
        }

        Some(((n_knight * 6 + q) * 4 + bb) * 4 + bw)
    }

    /// Flip the board vertically and swap colors, producing the mirror
    /// image of the current position from the other side's perspective.
    #[must_use]
    pub fn mirror(&self) -> Self {
        let mut out = BaseBoard::empty();
        for sq in self.occupied.iter() {
            let piece = self.piece_at(sq).expect("occupied square has a piece");
            let mirrored = Piece::new(piece.piece_type, piece.color.opponent());
            out.set_piece_at(sq.flip_vertical(), mirrored, self.is_promoted(sq));
        }
        out
    }
}

impl PartialEq for BaseBoard {
    /// Positions compare equal when every piece-type bitboard matches and
    /// the White occupancy matches (from which Black occupancy follows,
    /// since both are partitions of the same `occupied` set).
    fn eq(&self, other: &Self) -> bool {
        self.piece_bb == other.piece_bb && self.occupied_by(Color::White) == other.occupied_by(Color::White)
    }
}

impl Eq for BaseBoard {}

impl fmt::Debug for BaseBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BaseBoard({})", self.board_fen(false))
    }
}

impl Default for BaseBoard {
    fn default() -> Self {
        BaseBoard::starting_position()
    }
}

fn nth_combination_5_choose_2(n: u32) -> (usize, usize) {
    let mut count = 0;
    for i in 0..5 {
        for j in (i + 1)..5 {
            if count == n {
                return (i, j);
            }
            count += 1;
        }
    }
    unreachable!("n must be in 0..10")
}

fn combination_index_5_choose_2(i: usize, j: usize) -> u32 {
    let mut count = 0;
    for a in 0..5 {
        for b in (a + 1)..5 {
            if (a, b) == (i, j) {
                return count;
            }
            count += 1;
        }
    }
    unreachable!("i, j must be a valid pair from 0..5")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_position_piece_counts() {
        let board = BaseBoard::starting_position();
        assert_eq!(board.occupied().popcount(), 32);
        assert_eq!(board.pieces_mask(PieceType::Pawn, Color::White).popcount(), 8);
        assert_eq!(board.king(Color::White), Some(Square::E1));
        assert_eq!(board.king(Color::Black), Some(Square::E8));
    }

    #[test]
    fn set_and_remove_piece() {
        let mut board = BaseBoard::empty();
        board.set_piece_at(Square::E4, Piece::new(PieceType::Queen, Color::White), false);
        assert_eq!(board.piece_type_at(Square::E4), Some(PieceType::Queen));
        let removed = board.remove_piece_at(Square::E4);
        assert_eq!(removed, Some(Piece::new(PieceType::Queen, Color::White)));
        assert!(board.piece_at(Square::E4).is_none());
    }

    #[test]
    fn board_fen_round_trip() {
        let board = BaseBoard::starting_position();
        let fen = board.board_fen(false);
        assert_eq!(fen, "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR");
        let mut parsed = BaseBoard::empty();
        parsed.set_board_fen(&fen).unwrap();
        assert_eq!(parsed, board);
    }

    #[test]
    fn attackers_mask_starting_position() {
        let board = BaseBoard::starting_position();
        // e2 pawn is attacked by nothing of Black's from the start.
        assert!(board.attackers_mask(Color::Black, Square::new(1, 4), board.occupied()).is_empty());
        // f3 is attacked by White's g1 knight.
        assert!(!board
            .attackers_mask(Color::White, Square::new(2, 5), board.occupied())
            .is_empty());
    }

    #[test]
    fn pin_mask_detects_pin() {
        // White king e1, White rook e2, Black rook e8: the White rook is pinned.
        let mut board = BaseBoard::empty();
        board.set_piece_at(Square::E1, Piece::new(PieceType::King, Color::White), false);
        board.set_piece_at(Square::new(1, 4), Piece::new(PieceType::Rook, Color::White), false);
        board.set_piece_at(Square::E8, Piece::new(PieceType::Rook, Color::Black), false);
        let mask = board.pin_mask(Color::White, Square::new(1, 4));
        assert_ne!(mask, Bitboard::ALL);
        assert!(mask.contains(Square::new(1, 4)));
        assert!(mask.contains(Square::E8));
    }

    #[test]
    fn pin_mask_unpinned_piece_is_all() {
        let board = BaseBoard::starting_position();
        assert_eq!(board.pin_mask(Color::White, Square::new(1, 4)), Bitboard::ALL);
    }

    #[test]
    fn chess960_scharnagl_round_trip() {
        for scharnagl in [0u32, 1, 518, 959, 300, 42] {
            let mut board = BaseBoard::empty();
            board.set_chess960_pos(scharnagl);
            assert_eq!(board.chess960_pos(), Some(scharnagl));
        }
    }

    #[test]
    fn chess960_standard_position_is_518() {
        let mut board = BaseBoard::empty();
        board.set_chess960_pos(518);
        assert_eq!(board, BaseBoard::starting_position());
    }

    #[test]
    fn mirror_swaps_colors_and_flips() {
        let board = BaseBoard::starting_position();
        let mirrored = board.mirror();
        assert_eq!(mirrored.king(Color::White), Some(Square::E8));
        assert_eq!(mirrored.king(Color::Black), Some(Square::E1));
    }
}
