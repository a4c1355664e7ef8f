//! Castling move generation, covering both orthodox and Chess960 rights.
//!
//! Candidates come from `castling_rights` (a bitmask of rook squares, not
//! the usual four-bit flag set) intersected with the turn's backrank. Each
//! candidate is checked against the three legality conditions from the
//! standard castling rule: the king's path must be unattacked, the king's
//! destination must be unattacked once the rook has moved, and no other
//! piece may block either the king's or the rook's path.

use crate::board::attack_tables;
use crate::board::state::Board;
use crate::board::types::{Bitboard, Color, Move, MoveList, Square};

pub(crate) fn generate(board: &Board, from_mask: Bitboard, to_mask: Bitboard, moves: &mut MoveList) {
    let turn = board.turn();
    let backrank = if turn == Color::White {
        Bitboard::RANK_1
    } else {
        Bitboard::RANK_8
    };

    let Some(king) = board.king(turn) else {
        return;
    };
    if !backrank.contains(king) || !from_mask.contains(king) {
        return;
    }

    let rank = king.rank();
    let opponent = turn.opponent();

    for rook in (board.castling_rights() & backrank & to_mask).iter() {
        let a_side = rook.file() < king.file();
        let king_to = Square::new(rank, if a_side { 2 } else { 6 });
        let rook_to = Square::new(rank, if a_side { 3 } else { 5 });

        let king_bb = Bitboard::from_square(king);
        let rook_bb = Bitboard::from_square(rook);
        let king_to_bb = Bitboard::from_square(king_to);
        let rook_to_bb = Bitboard::from_square(rook_to);

        let king_path = attack_tables::between(king, king_to) | king_bb | king_to_bb;
        let rook_path = attack_tables::between(rook, rook_to) | rook_bb | rook_to_bb;

        let occupied_excl = board.occupied() & !king_bb & !rook_bb;
        if occupied_excl.intersects(king_path | rook_path) {
            continue;
        }

        let king_removed = board.occupied() & !king_bb;
        let king_path_unattacked = (attack_tables::between(king, king_to) | king_bb | king_to_bb)
            .iter()
            .all(|sq| board.base_board().attackers_mask(opponent, sq, king_removed).is_empty());
        if !king_path_unattacked {
            continue;
        }

        let final_occ = (board.occupied() & !king_bb & !rook_bb) | rook_to_bb;
        if !board
            .base_board()
            .attackers_mask(opponent, king_to, final_occ)
            .is_empty()
        {
            continue;
        }

        let mv = if board.is_chess960() {
            Move::new(king, rook)
        } else {
            Move::new(king, king_to)
        };
        moves.push(mv);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_position_has_no_castling_available() {
        let board = Board::new();
        let mut moves = MoveList::new();
        generate(&board, Bitboard::ALL, Bitboard::ALL, &mut moves);
        assert!(moves.is_empty());
    }

    #[test]
    fn clear_path_allows_both_sides() {
        let board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let mut moves = MoveList::new();
        generate(&board, Bitboard::ALL, Bitboard::ALL, &mut moves);
        assert_eq!(moves.len(), 2);
    }

    #[test]
    fn attacked_path_blocks_castling() {
        // Black rook on e-file would attack e1 (the king never actually
        // leaves check here, this just proves the path-attacked check).
        let board = Board::from_fen("4k3/8/8/8/8/8/4r3/R3K2R w KQ - 0 1").unwrap();
        let mut moves = MoveList::new();
        generate(&board, Bitboard::ALL, Bitboard::ALL, &mut moves);
        assert!(moves.is_empty());
    }
}
