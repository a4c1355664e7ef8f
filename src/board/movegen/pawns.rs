//! Pseudo-legal pawn move generation: captures (with promotions) before
//! pushes (with promotions), en passant last.

use crate::board::attack_tables;
use crate::board::state::Board;
use crate::board::types::{Bitboard, Color, Move, MoveList, PieceType, Square, PROMOTION_PIECES};

const RANK_2: usize = 1;
const RANK_7: usize = 6;
const RANK_4: usize = 3;
const RANK_5: usize = 4;

fn push_with_promotions(moves: &mut MoveList, from: Square, to: Square, is_promotion: bool) {
    if is_promotion {
        for promo in PROMOTION_PIECES {
            moves.push(Move::with_promotion(from, to, promo));
        }
    } else {
        moves.push(Move::new(from, to));
    }
}

pub(crate) fn generate(board: &Board, from_mask: Bitboard, to_mask: Bitboard, moves: &mut MoveList) {
    let us = board.turn();
    let them = us.opponent();
    let pawns = board.base_board().pieces_mask(PieceType::Pawn, us) & from_mask;
    if pawns.is_empty() {
        return;
    }

    let backrank = if us == Color::White { 7 } else { 0 };
    let their_occ = board.occupied_by(them);

    // Captures (including en passant's "normal" diagonal geometry, but the
    // actual en passant move is emitted separately below since its target
    // square is empty).
    for from in pawns.iter() {
        let capture_targets = attack_tables::pawn_attacks(us, from) & their_occ & to_mask;
        for to in capture_targets.iter() {
            push_with_promotions(moves, from, to, to.rank() == backrank);
        }
    }

    // Single and double pushes.
    let empty = !board.occupied();
    let start_rank = if us == Color::White { RANK_2 } else { RANK_7 };
    let double_push_rank = if us == Color::White { RANK_4 } else { RANK_5 };
    for from in pawns.iter() {
        let Some(one) = from.forward(us == Color::White) else {
            continue;
        };
        if !empty.contains(one) {
            continue;
        }
        if to_mask.contains(one) {
            push_with_promotions(moves, from, one, one.rank() == backrank);
        }
        if from.rank() == start_rank {
            if let Some(two) = one.forward(us == Color::White) {
                if empty.contains(two) && to_mask.contains(two) {
                    debug_assert_eq!(two.rank(), double_push_rank);
                    moves.push(Move::new(from, two));
                }
            }
        }
    }

    // En passant.
    if let Some(ep) = board.ep_square() {
        if to_mask.contains(ep) {
            let capturers = attack_tables::pawn_attacks(them, ep) & pawns;
            for from in capturers.iter() {
                moves.push(Move::new(from, ep));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::movegen::generate_pseudo_legal_moves;

    #[test]
    fn starting_position_pawn_moves() {
        let board = Board::new();
        let moves = generate_pseudo_legal_moves(&board, Bitboard::ALL, Bitboard::ALL);
        let pawn_moves = moves
            .iter()
            .filter(|m| board.piece_type_at(m.from) == Some(PieceType::Pawn))
            .count();
        assert_eq!(pawn_moves, 16); // 8 pawns, single + double push each
    }

    #[test]
    fn promotion_generates_four_moves() {
        let mut board = Board::empty();
        board.set_piece_at(
            Square::new(6, 0),
            crate::board::types::Piece::new(PieceType::Pawn, Color::White),
            false,
        );
        let mut moves = MoveList::new();
        generate(&board, Bitboard::ALL, Bitboard::ALL, &mut moves);
        assert_eq!(moves.len(), 4);
    }
}
