//! Transposition-key equality and repetition/draw-claim detection.

use crate::board::state::{Board, Snapshot};
use crate::board::types::{Bitboard, Color, PieceType, Square};

/// Everything that matters for "is this the same position" in the
/// threefold/fivefold sense: piece placement, whose turn it is, the
/// castling rights that actually still apply, and the en passant square
/// only when a capture of it is legal right now.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
struct TranspositionKey {
    pieces: [Bitboard; 6],
    white: Bitboard,
    black: Bitboard,
    turn: Color,
    castling_rights: Bitboard,
    ep_square: Option<Square>,
}

fn key_of(board: &Board) -> TranspositionKey {
    let base = board.base_board();
    TranspositionKey {
        pieces: PieceType::ALL.map(|pt| base.piece_type_bb(pt)),
        white: base.occupied_by(Color::White),
        black: base.occupied_by(Color::Black),
        turn: board.turn,
        castling_rights: board.clean_castling_rights(),
        ep_square: if board.has_legal_en_passant() {
            board.ep_square
        } else {
            None
        },
    }
}

fn board_from_snapshot(chess960: bool, snapshot: &Snapshot) -> Board {
    Board {
        board: snapshot.board.clone(),
        turn: snapshot.turn,
        castling_rights: snapshot.castling_rights,
        ep_square: snapshot.ep_square,
        halfmove_clock: snapshot.halfmove_clock,
        fullmove_number: snapshot.fullmove_number,
        chess960,
        move_stack: Vec::new(),
        state_stack: Vec::new(),
    }
}

impl Board {
    /// Whether the current position has occurred at least `count` times
    /// (including now), counting only positions reachable by undoing moves
    /// without crossing an irreversible one (any such position cannot
    /// repeat the current one).
    #[must_use]
    pub fn is_repetition(&self, count: u32) -> bool {
        if count == 0 {
            return true;
        }

        let target = key_of(self);
        let mut occurrences = 1u32;
        if occurrences >= count {
            return true;
        }

        // Fast upper bound: positions whose bare occupancy doesn't match
        // the target can't match the fuller key either.
        let candidates = self
            .state_stack
            .iter()
            .rev()
            .filter(|snap| snap.board.occupied() == self.occupied())
            .count() as u32
            + 1;
        if candidates < count {
            return false;
        }

        for snapshot in self.state_stack.iter().rev() {
            let candidate = board_from_snapshot(self.chess960, snapshot);
            if key_of(&candidate) == target {
                occurrences += 1;
                if occurrences >= count {
                    return true;
                }
            }
            if snapshot.halfmove_clock == 0 {
                break;
            }
        }
        false
    }

    /// Whether some legal move from the current position would reach a
    /// position that has already occurred (including the move just made)
    /// at least twice before, i.e. playing it would create a threefold
    /// repetition a claimant could invoke.
    #[must_use]
    pub fn can_claim_threefold_repetition(&self) -> bool {
        if self.is_repetition(3) {
            return true;
        }
        let moves = crate::board::movegen::legal::generate_legal_moves(self, Bitboard::ALL, Bitboard::ALL);
        let mut scratch = self.clone();
        for mv in moves.iter() {
            scratch.push(*mv);
            let repeats = scratch.is_repetition(3);
            scratch.pop().expect("just pushed");
            if repeats {
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::types::Move;

    #[test]
    fn fresh_position_is_a_first_repetition() {
        assert!(Board::new().is_repetition(1));
    }

    #[test]
    fn knight_shuffle_threefold_repeats() {
        let mut board = Board::new();
        let moves = [
            "g1f3", "g8f6", "f3g1", "f6g8", "g1f3", "g8f6", "f3g1", "f6g8",
        ];
        for uci in moves {
            board.push(Move::from_uci(uci).unwrap());
        }
        assert!(board.is_repetition(3));
    }

    #[test]
    fn pawn_push_breaks_repetition_chain() {
        let mut board = Board::new();
        board.push(Move::from_uci("e2e4").unwrap());
        board.push(Move::from_uci("g8f6").unwrap());
        board.push(Move::from_uci("g1f3").unwrap());
        board.push(Move::from_uci("f6g8").unwrap());
        board.push(Move::from_uci("f3g1").unwrap());
        assert!(!board.is_repetition(2));
    }
}
