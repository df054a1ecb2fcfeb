use connect_four::{Board, BoardError, Symbol, DEFAULT_COLS, DEFAULT_ROWS};

#[test]
fn test_new_board_is_empty() {
    let board = Board::new(Symbol::X);
    assert_eq!(board.rows(), DEFAULT_ROWS);
    assert_eq!(board.cols(), DEFAULT_COLS);
    assert_eq!(board.turn(), 1);
    assert_eq!(board.local_symbol(), Symbol::X);
    assert_eq!(board.remote_symbol(), Symbol::O);
    assert!(board.occupied().is_empty());
    assert!(!board.has_local_win());
    assert!(!board.has_remote_win());
    assert!(!board.is_full());
}

#[test]
fn test_pieces_fall_to_the_bottom() {
    let mut board = Board::new(Symbol::X);
    assert_eq!(board.play_local(3).unwrap(), DEFAULT_ROWS - 1);
    assert_eq!(board.play_remote(3).unwrap(), DEFAULT_ROWS - 2);
    assert_eq!(board.cell(DEFAULT_ROWS - 1, 3), Some(Symbol::X));
    assert_eq!(board.cell(DEFAULT_ROWS - 2, 3), Some(Symbol::O));
    assert_eq!(board.cell(0, 3), None);
    assert_eq!(board.column_height(3), 2);
    // Only local moves advance the turn counter
    assert_eq!(board.turn(), 2);
}

#[test]
fn test_column_out_of_range() {
    let mut board = Board::new(Symbol::O);
    assert_eq!(
        board.play_local(DEFAULT_COLS).unwrap_err(),
        BoardError::ColumnOutOfRange {
            column: DEFAULT_COLS,
            cols: DEFAULT_COLS
        }
    );
    assert!(!board.apply_remote_move(usize::MAX));
    assert!(board.occupied().is_empty());
    assert_eq!(board.turn(), 1);
}

#[test]
fn test_full_column_rejected_without_change() {
    let mut board = Board::new(Symbol::X);
    for i in 0..DEFAULT_ROWS {
        if i % 2 == 0 {
            board.play_local(0).unwrap();
        } else {
            board.play_remote(0).unwrap();
        }
    }
    assert!(!board.is_playable(0));
    let before = board;
    assert_eq!(
        board.play_local(0).unwrap_err(),
        BoardError::ColumnFull { column: 0 }
    );
    assert!(!board.apply_remote_move(0));
    assert_eq!(board, before);
}

#[test]
fn test_vertical_win_on_fourth_piece() {
    let mut board = Board::with_size(6, 7, Symbol::X).unwrap();
    for _ in 0..3 {
        board.play_local(3).unwrap();
    }
    assert!(!board.has_local_win());
    board.play_local(3).unwrap();
    assert!(board.has_local_win());
    assert!(!board.has_remote_win());
}

#[test]
fn test_horizontal_win() {
    let mut board = Board::new(Symbol::X);
    for c in 2..5 {
        board.play_remote(c).unwrap();
    }
    assert!(!board.has_remote_win());
    board.play_remote(5).unwrap();
    assert!(board.has_remote_win());
    assert!(!board.has_local_win());
}

#[test]
fn test_diagonal_wins() {
    // Rising to the right: heights 1,2,3,4 in columns 0..4
    let mut board = Board::new(Symbol::X);
    for c in 0..4 {
        for _ in 0..c {
            board.play_remote(c).unwrap();
        }
        board.play_local(c).unwrap();
    }
    assert!(board.has_local_win());
    assert!(!board.has_remote_win());

    // Falling to the right: heights 4,3,2,1 in columns 6..10
    let mut board = Board::new(Symbol::O);
    for (i, c) in (6..10).enumerate() {
        for _ in 0..(3 - i) {
            board.play_local(c).unwrap();
        }
        board.play_remote(c).unwrap();
    }
    assert!(board.has_remote_win());
    assert!(!board.has_local_win());
}

#[test]
fn test_line_does_not_wrap_across_rows() {
    // (5,8) (5,9) (6,0) (6,1) are consecutive in row-major order but not a line
    let mut board = Board::new(Symbol::X);
    board.play_local(0).unwrap();
    board.play_local(1).unwrap();
    board.play_remote(8).unwrap();
    board.play_remote(9).unwrap();
    board.play_local(8).unwrap();
    board.play_local(9).unwrap();
    assert_eq!(board.cell(5, 9), Some(Symbol::X));
    assert_eq!(board.cell(6, 0), Some(Symbol::X));
    assert!(!board.has_local_win());
}

#[test]
fn test_full_board_detection() {
    let mut board = Board::with_size(2, 2, Symbol::X).unwrap();
    board.play_local(0).unwrap();
    board.play_remote(1).unwrap();
    board.play_local(1).unwrap();
    assert!(!board.is_full());
    board.play_remote(0).unwrap();
    assert!(board.is_full());
    assert_eq!(board.playable_columns().count(), 0);
}

#[test]
fn test_with_size_rejects_bad_dimensions() {
    assert!(matches!(
        Board::with_size(0, 7, Symbol::X),
        Err(BoardError::BitBoard(_))
    ));
    assert!(matches!(
        Board::with_size(12, 12, Symbol::X),
        Err(BoardError::BitBoard(_))
    ));
}

#[test]
fn test_restart_clears_board() {
    let mut board = Board::new(Symbol::X);
    board.play_local(1).unwrap();
    board.play_remote(2).unwrap();
    board.restart();
    assert_eq!(board, Board::new(Symbol::X));
}

#[test]
fn test_display_shows_symbols() {
    let mut board = Board::with_size(2, 3, Symbol::X).unwrap();
    board.play_local(0).unwrap();
    board.play_remote(2).unwrap();
    let text = board.to_string();
    assert!(text.contains('X'));
    assert!(text.contains('O'));
    assert_eq!(text.lines().count(), 4);
}
