//! Concrete end-to-end scenarios spanning SAN, FEN, en passant, promotion,
//! Chess960 castling, and repetition.

use chess_core::board::{Board, Color, SanError};

#[test]
fn italian_opening_fen() {
    let mut board = Board::new();
    for san in ["e4", "e5", "Nf3", "Nc6", "Bb5"] {
        let mv = board.parse_san(san).unwrap();
        board.push(mv);
    }
    assert_eq!(
        board.fen(),
        "r1bqkbnr/pppp1ppp/2n5/1B2p3/4P3/5N2/PPPP1PPP/RNBQK2R b KQkq - 3 3"
    );
}

#[test]
fn en_passant_capture_leaves_correct_squares() {
    let mut board =
        Board::from_fen("rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3").unwrap();
    let mv = board.parse_san("exd6").unwrap();
    board.push(mv);
    assert!(board.piece_at("d5".parse().unwrap()).is_none());
    assert_eq!(
        board.piece_type_at("d6".parse().unwrap()),
        Some(chess_core::board::PieceType::Pawn)
    );
    assert_eq!(board.turn(), Color::White);
}

#[test]
fn underpromotion_with_check_suffix() {
    let board = Board::from_fen("4k3/8/8/8/8/8/4p3/4K3 b - - 0 1").unwrap();
    let mv = board.parse_san("e1=Q+").unwrap();
    assert_eq!(mv.promotion, Some(chess_core::board::PieceType::Queen));
    let mut after = board.clone();
    after.push(mv);
    assert!(after.is_check());
}

#[test]
fn standard_start_knight_move_and_later_ambiguity() {
    let mut board = Board::new();
    let mv = board.parse_san("Nf3").unwrap();
    assert_eq!(board.uci(mv, false), "g1f3");

    for san in ["Nf3", "Nf6", "Nc3"] {
        let mv = board.parse_san(san).unwrap();
        board.push(mv);
    }
    assert!(matches!(
        board.parse_san("Nbd2"),
        Err(SanError::AmbiguousMove { .. })
    ));
}

#[test]
fn chess960_castling_reaches_the_same_position_either_notation() {
    let mut standard = Board::from_chess960_pos(518);
    let mut chess960 = Board::from_chess960_pos(518);
    chess960.set_chess960(true);

    let mv_std = standard.parse_san("O-O").unwrap();
    let mv_960 = chess960.parse_san("O-O").unwrap();
    assert_eq!(standard.uci(mv_std, false), "e1g1");
    assert_eq!(chess960.uci(mv_960, true), "e1h1");

    standard.push(mv_std);
    chess960.push(mv_960);
    let placement = |b: &Board| b.fen().split(' ').next().unwrap().to_string();
    assert_eq!(placement(&standard), placement(&chess960));
}

#[test]
fn repeated_knight_shuffle_is_threefold_and_claimed() {
    let mut board = Board::new();
    for san in [
        "Nf3", "Nf6", "Ng1", "Ng8", "Nf3", "Nf6", "Ng1", "Ng8",
    ] {
        let mv = board.parse_san(san).unwrap();
        board.push(mv);
    }
    assert!(board.is_repetition(3));
    assert!(board.can_claim_threefold_repetition());
    let outcome = board.outcome(true).unwrap();
    assert_eq!(outcome.termination, chess_core::board::Termination::ThreeFoldRepetition);
}
