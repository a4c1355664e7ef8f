//! Leaper (knight/king/pawn) and slider attack tables.
//!
//! Slider tables are built by enumerating every subset of each square's
//! relevant occupancy mask via the carry-rippler trick and recording the
//! resulting ray attacks in a per-square hash map, keyed by the masked
//! occupancy bits. This avoids the `PEXT`/magic-multiplier index compression
//! a production engine would use, trading a hash lookup for simplicity; the
//! query contract (`attacks[sq][occupied & mask[sq]]`) is unaffected.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::board::types::{Bitboard, Square};

const KNIGHT_DELTAS: [(i32, i32); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const KING_DELTAS: [(i32, i32); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

const PAWN_DELTAS_WHITE: [(i32, i32); 2] = [(1, -1), (1, 1)];
const PAWN_DELTAS_BLACK: [(i32, i32); 2] = [(-1, -1), (-1, 1)];

const ROOK_DIRS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const BISHOP_DIRS: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

fn leaper_attacks(sq: Square, deltas: &[(i32, i32)]) -> Bitboard {
    let rank = sq.rank() as i32;
    let file = sq.file() as i32;
    let mut bb = Bitboard::EMPTY;
    for (dr, df) in deltas {
        let r = rank + dr;
        let f = file + df;
        if (0..8).contains(&r) && (0..8).contains(&f) {
            bb |= Bitboard::from_square(Square::new(r as usize, f as usize));
        }
    }
    bb
}

/// Ray attacks from `sq` along `directions`, stopping at (and including) the
/// first occupied square in each direction.
fn sliding_attacks(sq: Square, directions: &[(i32, i32)], occupied: Bitboard) -> Bitboard {
    let rank = sq.rank() as i32;
    let file = sq.file() as i32;
    let mut attacks = Bitboard::EMPTY;
    for (dr, df) in directions {
        let mut r = rank + dr;
        let mut f = file + df;
        while (0..8).contains(&r) && (0..8).contains(&f) {
            let s = Square::new(r as usize, f as usize);
            attacks |= Bitboard::from_square(s);
            if occupied.contains(s) {
                break;
            }
            r += dr;
            f += df;
        }
    }
    attacks
}

/// Relevant occupancy mask for a rook on `sq`: the rank and file through
/// `sq`, excluding the board edges (whose occupancy can never change the
/// result, since nothing lies beyond them).
fn rook_mask(sq: Square) -> Bitboard {
    let rank = sq.rank();
    let file = sq.file();
    let mut m = Bitboard::EMPTY;
    for f in 1..7 {
        if f != file {
            m |= Bitboard::from_square(Square::new(rank, f));
        }
    }
    for r in 1..7 {
        if r != rank {
            m |= Bitboard::from_square(Square::new(r, file));
        }
    }
    m
}

/// Relevant occupancy mask for a bishop on `sq`: the four diagonals through
/// `sq`, restricted to the interior of the board.
fn bishop_mask(sq: Square) -> Bitboard {
    let rank = sq.rank() as i32;
    let file = sq.file() as i32;
    let mut m = Bitboard::EMPTY;
    for (dr, df) in BISHOP_DIRS {
        let mut r = rank + dr;
        let mut f = file + df;
        while (1..7).contains(&r) && (1..7).contains(&f) {
            m |= Bitboard::from_square(Square::new(r as usize, f as usize));
            r += dr;
            f += df;
        }
    }
    m
}

fn build_slider_tables(
    mask_fn: impl Fn(Square) -> Bitboard,
    dirs: &'static [(i32, i32)],
) -> (Box<[Bitboard; 64]>, Vec<HashMap<u64, Bitboard>>) {
    let mut masks = Box::new([Bitboard::EMPTY; 64]);
    let mut tables = Vec::with_capacity(64);
    for idx in 0..64 {
        let sq = Square::from_index(idx);
        let mask = mask_fn(sq);
        masks[idx] = mask;
        let mut table = HashMap::with_capacity(1 << mask.popcount().min(16));
        for subset in mask.subsets() {
            table.insert(subset.0, sliding_attacks(sq, dirs, subset));
        }
        tables.push(table);
    }
    (masks, tables)
}

pub(crate) static KNIGHT_ATTACKS: Lazy<[Bitboard; 64]> = Lazy::new(|| {
    let mut table = [Bitboard::EMPTY; 64];
    for (idx, slot) in table.iter_mut().enumerate() {
        *slot = leaper_attacks(Square::from_index(idx), &KNIGHT_DELTAS);
    }
    table
});

pub(crate) static KING_ATTACKS: Lazy<[Bitboard; 64]> = Lazy::new(|| {
    let mut table = [Bitboard::EMPTY; 64];
    for (idx, slot) in table.iter_mut().enumerate() {
        *slot = leaper_attacks(Square::from_index(idx), &KING_DELTAS);
    }
    table
});

/// Indexed `[color][square]`; color index 0 = White, 1 = Black.
pub(crate) static PAWN_ATTACKS: Lazy<[[Bitboard; 64]; 2]> = Lazy::new(|| {
    let mut table = [[Bitboard::EMPTY; 64]; 2];
    for idx in 0..64 {
        let sq = Square::from_index(idx);
        table[0][idx] = leaper_attacks(sq, &PAWN_DELTAS_WHITE);
        table[1][idx] = leaper_attacks(sq, &PAWN_DELTAS_BLACK);
    }
    table
});

pub(crate) static ROOK_TABLES: Lazy<(Box<[Bitboard; 64]>, Vec<HashMap<u64, Bitboard>>)> =
    Lazy::new(|| build_slider_tables(rook_mask, &ROOK_DIRS));

pub(crate) static BISHOP_TABLES: Lazy<(Box<[Bitboard; 64]>, Vec<HashMap<u64, Bitboard>>)> =
    Lazy::new(|| build_slider_tables(bishop_mask, &BISHOP_DIRS));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knight_attacks_corner() {
        assert_eq!(KNIGHT_ATTACKS[Square::A1.as_index()].popcount(), 2);
        assert_eq!(KNIGHT_ATTACKS[Square::new(3, 3).as_index()].popcount(), 8);
    }

    #[test]
    fn king_attacks_corner_and_center() {
        assert_eq!(KING_ATTACKS[Square::A1.as_index()].popcount(), 3);
        assert_eq!(KING_ATTACKS[Square::new(3, 3).as_index()].popcount(), 8);
    }

    #[test]
    fn pawn_attacks_mirror_between_colors() {
        let e4 = Square::new(3, 4);
        assert_eq!(
            PAWN_ATTACKS[0][e4.as_index()].popcount(),
            PAWN_ATTACKS[1][e4.as_index()].popcount()
        );
    }

    #[test]
    fn rook_mask_excludes_edges() {
        let mask = rook_mask(Square::A1);
        assert!(!mask.contains(Square::H1));
        assert!(!mask.contains(Square::A8));
        assert_eq!(mask.popcount(), 12);
    }

    #[test]
    fn rook_attacks_on_empty_board() {
        let (masks, tables) = &*ROOK_TABLES;
        let sq = Square::A1;
        let occ = Bitboard::EMPTY & masks[sq.as_index()];
        let attacks = tables[sq.as_index()][&occ.0];
        // full rank 1 + file a minus a1 itself = 14 squares
        assert_eq!(attacks.popcount(), 14);
    }

    #[test]
    fn rook_attacks_blocked() {
        let (masks, tables) = &*ROOK_TABLES;
        let sq = Square::A1;
        let blocker = Bitboard::from_square(Square::new(0, 3)); // d1
        let occ = blocker & masks[sq.as_index()];
        let attacks = tables[sq.as_index()][&occ.0];
        assert!(attacks.contains(Square::new(0, 3)));
        assert!(!attacks.contains(Square::new(0, 4)));
    }

    #[test]
    fn bishop_attacks_on_empty_board() {
        let (masks, tables) = &*BISHOP_TABLES;
        let sq = Square::new(3, 3); // d4
        let occ = Bitboard::EMPTY & masks[sq.as_index()];
        let attacks = tables[sq.as_index()][&occ.0];
        assert_eq!(attacks.popcount(), 13);
    }
}
