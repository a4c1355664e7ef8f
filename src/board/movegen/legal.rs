//! Legal-move filtering: pin detection, check evasions, and the safety
//! predicate applied to every pseudo-legal move before it is offered to
//! callers.

use crate::board::attack_tables;
use crate::board::state::Board;
use crate::board::types::{Bitboard, Color, Move, MoveList, PieceType, Square};

use super::{generate_pseudo_legal_moves, is_castling, is_en_passant};

/// Our own pieces that, if moved off their square, would expose the king
/// to a sliding attack — pieces lying exactly one-deep between the king
/// and an aligned enemy slider.
#[must_use]
pub(crate) fn slider_blockers(board: &Board, king: Square) -> Bitboard {
    let us = board.turn();
    let them = us.opponent();
    let base = board.base_board();

    let rooks_and_queens = base.pieces_mask(PieceType::Rook, them) | base.pieces_mask(PieceType::Queen, them);
    let bishops_and_queens =
        base.pieces_mask(PieceType::Bishop, them) | base.pieces_mask(PieceType::Queen, them);

    let snipers = (attack_tables::rook_attacks(king, Bitboard::EMPTY) & rooks_and_queens)
        | (attack_tables::bishop_attacks(king, Bitboard::EMPTY) & bishops_and_queens);

    let our_occ = board.occupied_by(us);
    let mut blockers = Bitboard::EMPTY;
    for sniper in snipers.iter() {
        let between = attack_tables::between(king, sniper) & board.occupied();
        if between.popcount() == 1 && (between & our_occ) == between {
            blockers |= between;
        }
    }
    blockers
}

/// Whether `mv`, already known to be pseudo-legal, leaves the king safe.
#[must_use]
pub(crate) fn is_safe(board: &Board, king: Square, blockers: Bitboard, mv: Move) -> bool {
    let us = board.turn();
    let them = us.opponent();

    if mv.from == king {
        if is_castling(board, mv) {
            return true;
        }
        return !board.base_board().is_attacked_by(them, mv.to);
    }

    if is_en_passant(board, mv) {
        let captured_pawn = Square::new(mv.from.rank(), mv.to.file());
        let occ_after = (board.occupied() & !Bitboard::from_square(mv.from) & !Bitboard::from_square(captured_pawn))
            | Bitboard::from_square(mv.to);
        return board.base_board().attackers_mask(them, king, occ_after).is_empty();
    }

    !blockers.contains(mv.from) || attack_tables::ray(mv.from, mv.to).contains(king)
}

fn generate_evasions(board: &Board, king: Square, checkers: Bitboard, from_mask: Bitboard, to_mask: Bitboard) -> MoveList {
    let mut moves = MoveList::new();
    let us = board.turn();
    let base = board.base_board();

    let sliders = checkers
        & (base.piece_type_bb(PieceType::Bishop)
            | base.piece_type_bb(PieceType::Rook)
            | base.piece_type_bb(PieceType::Queen));

    let mut attacked_behind_king = Bitboard::EMPTY;
    for checker in sliders.iter() {
        attacked_behind_king |= attack_tables::ray(king, checker) & !Bitboard::from_square(checker);
    }

    if from_mask.contains(king) {
        let targets =
            attack_tables::king_attacks(king) & !board.occupied_by(us) & !attacked_behind_king & to_mask;
        for to in targets.iter() {
            moves.push(Move::new(king, to));
        }
    }

    if let Some(checker) = single_checker(checkers) {
        let target = attack_tables::between(king, checker) | Bitboard::from_square(checker);
        let not_king = !Bitboard::from_square(king) & from_mask;
        let blocking_or_capturing = generate_pseudo_legal_moves(board, not_king, target & to_mask);
        for mv in blocking_or_capturing.iter() {
            moves.push(*mv);
        }

        if let Some(ep) = board.ep_square() {
            if !target.contains(ep) {
                let last_double_push_origin = if us == Color::White {
                    Square::new(ep.rank() - 1, ep.file())
                } else {
                    Square::new(ep.rank() + 1, ep.file())
                };
                if last_double_push_origin == checker {
                    let ep_moves = generate_pseudo_legal_moves(board, not_king, to_mask);
                    for mv in ep_moves.iter() {
                        if mv.to == ep && is_en_passant(board, *mv) {
                            moves.push(*mv);
                        }
                    }
                }
            }
        }
    }

    moves
}

fn single_checker(checkers: Bitboard) -> Option<Square> {
    if checkers.is_single() {
        checkers.lsb()
    } else {
        None
    }
}

/// All legal moves from squares in `from_mask` to squares in `to_mask`.
#[must_use]
pub(crate) fn generate_legal_moves(board: &Board, from_mask: Bitboard, to_mask: Bitboard) -> MoveList {
    let mut result = MoveList::new();
    let Some(king) = board.king(board.turn()) else {
        return generate_pseudo_legal_moves(board, from_mask, to_mask);
    };

    let checkers = board.checkers_mask();
    let blockers = slider_blockers(board, king);

    let candidates = if checkers.is_empty() {
        generate_pseudo_legal_moves(board, from_mask, to_mask)
    } else {
        generate_evasions(board, king, checkers, from_mask, to_mask)
    };

    for mv in candidates.iter() {
        if is_safe(board, king, blockers, *mv) {
            result.push(*mv);
        }
    }
    result
}

/// Whether `mv` is a legal move in the current position.
#[must_use]
pub(crate) fn is_legal(board: &Board, mv: Move) -> bool {
    generate_legal_moves(board, Bitboard::from_square(mv.from), Bitboard::from_square(mv.to))
        .iter()
        .any(|candidate| *candidate == mv)
}
