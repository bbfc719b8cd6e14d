// Tetris rules exercised natively.

use granny_arcade::tetris::{COLS, ROWS, TetrisGame, drop_interval};

#[test]
fn idle_before_start() {
    let mut game = TetrisGame::with_seed(1);
    assert!(!game.is_active());
    assert!(!game.shift(1));
    game.update(10_000.0);
    assert_eq!(game.board().rows().iter().flatten().filter(|&&c| c != 0).count(), 0);
}

#[test]
fn gravity_follows_the_level_interval() {
    let mut game = TetrisGame::with_seed(2);
    game.start();
    let (_, y0) = game.position();
    game.update(drop_interval(1) + 1.0);
    assert_eq!(game.position().1, y0 + 1);
}

#[test]
fn stacking_in_the_middle_ends_the_game_without_score() {
    let mut game = TetrisGame::with_seed(3);
    game.start();
    let mut drops = 0;
    while game.is_active() {
        game.hard_drop();
        drops += 1;
        assert!(drops < 200, "game never ended");
    }
    assert!(game.is_game_over());
    assert_eq!(game.score(), 0);
    assert_eq!(game.lines(), 0);
    // Outer columns were never touched.
    for row in game.board().rows() {
        assert_eq!(row[0], 0);
        assert_eq!(row[COLS - 1], 0);
    }
    assert!(game.board().rows()[ROWS - 1].iter().any(|&c| c != 0));
}

#[test]
fn restart_clears_the_board() {
    let mut game = TetrisGame::with_seed(4);
    game.start();
    while game.is_active() {
        game.hard_drop();
    }
    game.start();
    assert!(game.is_active());
    assert_eq!(game.score(), 0);
    assert_eq!(game.level(), 1);
    assert_eq!(game.board().rows().iter().flatten().filter(|&&c| c != 0).count(), 0);
}
