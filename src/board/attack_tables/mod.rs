//! Process-wide immutable attack tables.
//!
//! Every table here is built once behind a [`once_cell::sync::Lazy`] and
//! never mutated afterward; callers only ever read through the accessor
//! functions below.

mod rays;
mod tables;

use crate::board::types::{Bitboard, Color, Square};

/// Knight attacks from `sq` on an otherwise empty board.
#[inline]
#[must_use]
pub(crate) fn knight_attacks(sq: Square) -> Bitboard {
    tables::KNIGHT_ATTACKS[sq.as_index()]
}

/// King attacks (one step in any direction) from `sq`.
#[inline]
#[must_use]
pub(crate) fn king_attacks(sq: Square) -> Bitboard {
    tables::KING_ATTACKS[sq.as_index()]
}

/// Pawn capture targets from `sq` for the given color.
#[inline]
#[must_use]
pub(crate) fn pawn_attacks(color: Color, sq: Square) -> Bitboard {
    tables::PAWN_ATTACKS[color.index()][sq.as_index()]
}

/// Rook attacks from `sq` given the current board occupancy.
#[must_use]
pub(crate) fn rook_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    let (masks, table) = &*tables::ROOK_TABLES;
    let key = (occupied & masks[sq.as_index()]).0;
    table[sq.as_index()][&key]
}

/// Bishop attacks from `sq` given the current board occupancy.
#[must_use]
pub(crate) fn bishop_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    let (masks, table) = &*tables::BISHOP_TABLES;
    let key = (occupied & masks[sq.as_index()]).0;
    table[sq.as_index()][&key]
}

/// Queen attacks from `sq` given the current board occupancy: the union of
/// the rook and bishop rays.
#[inline]
#[must_use]
pub(crate) fn queen_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    rook_attacks(sq, occupied) | bishop_attacks(sq, occupied)
}

/// Attacks for `piece_type` from `sq` given `occupied`; non-sliders ignore
/// `occupied`. Panics if called with a pawn, since pawn attacks need a color.
#[must_use]
pub(crate) fn attacks_for(
    piece_type: crate::board::types::PieceType,
    sq: Square,
    occupied: Bitboard,
) -> Bitboard {
    use crate::board::types::PieceType;
    match piece_type {
        PieceType::Knight => knight_attacks(sq),
        PieceType::King => king_attacks(sq),
        PieceType::Bishop => bishop_attacks(sq, occupied),
        PieceType::Rook => rook_attacks(sq, occupied),
        PieceType::Queen => queen_attacks(sq, occupied),
        PieceType::Pawn => unreachable!("pawn attacks require a color; use pawn_attacks"),
    }
}

/// The full line (rank, file, or diagonal) through `a` and `b`, extended
/// across the whole board. Empty if the two squares are not aligned.
#[inline]
#[must_use]
pub(crate) fn ray(a: Square, b: Square) -> Bitboard {
    rays::RAY[a.as_index()][b.as_index()]
}

/// The squares strictly between `a` and `b` along their shared ray,
/// excluding both endpoints. Empty if the two squares are not aligned.
#[inline]
#[must_use]
pub(crate) fn between(a: Square, b: Square) -> Bitboard {
    rays::BETWEEN[a.as_index()][b.as_index()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queen_attacks_is_rook_union_bishop() {
        let sq = Square::new(3, 3);
        let occ = Bitboard::EMPTY;
        assert_eq!(
            queen_attacks(sq, occ),
            rook_attacks(sq, occ) | bishop_attacks(sq, occ)
        );
    }

    #[test]
    fn pawn_attacks_differ_by_color() {
        let sq = Square::new(3, 3);
        assert_ne!(
            pawn_attacks(Color::White, sq),
            pawn_attacks(Color::Black, sq)
        );
    }

    #[test]
    fn attacks_for_dispatches_by_piece_type() {
        use crate::board::types::PieceType;
        let sq = Square::new(4, 4);
        assert_eq!(
            attacks_for(PieceType::Knight, sq, Bitboard::EMPTY),
            knight_attacks(sq)
        );
    }
}
