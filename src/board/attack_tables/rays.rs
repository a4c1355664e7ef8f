//! Full-line ray tables and the squares strictly between two aligned squares.

use once_cell::sync::Lazy;

use crate::board::types::{Bitboard, Square};

fn line_through(sq: Square, dr: i32, df: i32) -> Bitboard {
    let mut bb = Bitboard::from_square(sq);
    let rank = sq.rank() as i32;
    let file = sq.file() as i32;

    let mut r = rank + dr;
    let mut f = file + df;
    while (0..8).contains(&r) && (0..8).contains(&f) {
        bb |= Bitboard::from_square(Square::new(r as usize, f as usize));
        r += dr;
        f += df;
    }

    let mut r = rank - dr;
    let mut f = file - df;
    while (0..8).contains(&r) && (0..8).contains(&f) {
        bb |= Bitboard::from_square(Square::new(r as usize, f as usize));
        r -= dr;
        f -= df;
    }

    bb
}

/// The full line (rank, file or diagonal) through both `a` and `b`,
/// extended across the whole board, or `Bitboard::EMPTY` if the two squares
/// are not aligned.
fn compute_ray(a: Square, b: Square) -> Bitboard {
    if a == b {
        return Bitboard::EMPTY;
    }
    let dr = b.rank() as i32 - a.rank() as i32;
    let df = b.file() as i32 - a.file() as i32;

    let dir = if dr == 0 {
        Some((0, 1))
    } else if df == 0 {
        Some((1, 0))
    } else if dr == df {
        Some((1, 1))
    } else if dr == -df {
        Some((1, -1))
    } else {
        None
    };

    match dir {
        Some((sdr, sdf)) => line_through(a, sdr, sdf),
        None => Bitboard::EMPTY,
    }
}

/// `RAY[a][b]`: the full line through `a` and `b` if aligned, else empty.
pub(crate) static RAY: Lazy<Box<[[Bitboard; 64]; 64]>> = Lazy::new(|| {
    let mut table = Box::new([[Bitboard::EMPTY; 64]; 64]);
    for a in 0..64 {
        for b in 0..64 {
            table[a][b] = compute_ray(Square::from_index(a), Square::from_index(b));
        }
    }
    table
});

/// `BETWEEN[a][b]`: the squares strictly between `a` and `b` along their
/// shared ray, excluding both endpoints. Built from the recipe
/// `(ray & ((ALL << a) ^ (ALL << b))) & !lsb`, which is order-independent:
/// the suffix-mask XOR isolates the squares strictly inside `[min, max)`,
/// and clearing the lowest remaining bit drops the near endpoint.
fn compute_between(a: Square, b: Square) -> Bitboard {
    let ray = RAY[a.as_index()][b.as_index()];
    if ray.is_empty() {
        return Bitboard::EMPTY;
    }
    let ai = a.as_index() as u32;
    let bi = b.as_index() as u32;
    let suffix_xor = Bitboard(u64::MAX << ai) ^ Bitboard(u64::MAX << bi);
    let r = ray & suffix_xor;
    Bitboard(r.0 & r.0.wrapping_sub(1))
}

pub(crate) static BETWEEN: Lazy<Box<[[Bitboard; 64]; 64]>> = Lazy::new(|| {
    let mut table = Box::new([[Bitboard::EMPTY; 64]; 64]);
    for a in 0..64 {
        for b in 0..64 {
            table[a][b] = compute_between(Square::from_index(a), Square::from_index(b));
        }
    }
    table
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ray_unaligned_is_empty() {
        assert!(RAY[Square::A1.as_index()][Square::new(1, 2).as_index()].is_empty());
    }

    #[test]
    fn ray_same_square_is_empty() {
        assert!(RAY[Square::A1.as_index()][Square::A1.as_index()].is_empty());
    }

    #[test]
    fn ray_rank_is_the_full_rank() {
        let ray = RAY[Square::A1.as_index()][Square::new(0, 5).as_index()];
        assert_eq!(ray, Bitboard::RANK_1);
    }

    #[test]
    fn ray_diagonal() {
        let a1 = Square::A1;
        let h8 = Square::H8;
        let ray = RAY[a1.as_index()][h8.as_index()];
        assert!(ray.contains(a1));
        assert!(ray.contains(h8));
        assert!(ray.contains(Square::new(3, 3)));
        assert_eq!(ray.popcount(), 8);
    }

    #[test]
    fn between_excludes_endpoints() {
        let a1 = Square::A1;
        let a8 = Square::A8;
        let between = BETWEEN[a1.as_index()][a8.as_index()];
        assert!(!between.contains(a1));
        assert!(!between.contains(a8));
        assert!(between.contains(Square::new(3, 0)));
        assert_eq!(between.popcount(), 6);
    }

    #[test]
    fn between_is_order_independent() {
        let a = Square::new(2, 2);
        let b = Square::new(5, 5);
        assert_eq!(
            BETWEEN[a.as_index()][b.as_index()],
            BETWEEN[b.as_index()][a.as_index()]
        );
    }

    #[test]
    fn between_adjacent_squares_is_empty() {
        let a = Square::new(3, 3);
        let b = Square::new(3, 4);
        assert!(BETWEEN[a.as_index()][b.as_index()].is_empty());
    }

    #[test]
    fn between_unaligned_is_empty() {
        let a = Square::A1;
        let b = Square::new(1, 2);
        assert!(BETWEEN[a.as_index()][b.as_index()].is_empty());
    }
}
