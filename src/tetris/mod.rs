//! Classic falling-block puzzle on a 10×20 board.

pub mod board;
pub mod game;
pub mod piece;
mod web;

pub use board::{Board, COLS, ROWS};
pub use game::{LINE_SCORES, TetrisGame, drop_interval};
pub use piece::{Piece, Rotation, Tetromino};
pub(crate) use web::start_tetris_mode;
