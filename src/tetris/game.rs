//! Falling-piece rules: spawning, player moves, gravity, scoring and levels.

use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::board::{Board, COLS, Pos};
use super::piece::{Piece, Rotation, Tetromino};

/// Points for clearing 0..=4 lines at once, multiplied by the level.
pub const LINE_SCORES: [u32; 5] = [0, 40, 100, 300, 1200];
const LINES_PER_LEVEL: u32 = 10;

/// Gravity interval in ms for a level.
pub fn drop_interval(level: u32) -> f64 {
    (1000.0 - (level.saturating_sub(1)) as f64 * 100.0).max(100.0)
}

pub struct TetrisGame {
    board: Board,
    current: Piece,
    next: Piece,
    pos: Pos,
    score: u32,
    level: u32,
    lines: u32,
    drop_counter: f64,
    active: bool,
    game_over: bool,
    rng: StdRng,
}

impl TetrisGame {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(mut rng: StdRng) -> Self {
        let current = Piece::new(Tetromino::random(&mut rng));
        let next = Piece::new(Tetromino::random(&mut rng));
        Self {
            board: Board::default(),
            current,
            next,
            pos: (0, 0),
            score: 0,
            level: 1,
            lines: 0,
            drop_counter: 0.0,
            active: false,
            game_over: false,
            rng,
        }
    }

    /// Fresh board and counters; the preview piece becomes the first piece.
    pub fn start(&mut self) {
        self.board.clear();
        self.score = 0;
        self.level = 1;
        self.lines = 0;
        self.drop_counter = 0.0;
        self.active = true;
        self.game_over = false;
        self.spawn();
    }

    fn spawn(&mut self) {
        let incoming = Piece::new(Tetromino::random(&mut self.rng));
        self.current = std::mem::replace(&mut self.next, incoming);
        self.pos = (((COLS - self.current.width()) / 2) as i32, 0);
        if self.board.collides(&self.current, self.pos) {
            self.active = false;
            self.game_over = true;
            info!("tetris over: score {}, level {}, lines {}", self.score, self.level, self.lines);
        }
    }

    /// Gravity. `dt_ms` is the frame delta in milliseconds.
    pub fn update(&mut self, dt_ms: f64) {
        if !self.active {
            return;
        }
        self.drop_counter += dt_ms;
        if self.drop_counter > drop_interval(self.level) {
            self.soft_drop();
        }
    }

    /// Shift by `dx` columns; blocked moves are undone.
    pub fn shift(&mut self, dx: i32) -> bool {
        if !self.active {
            return false;
        }
        let moved = (self.pos.0 + dx, self.pos.1);
        if self.board.collides(&self.current, moved) {
            return false;
        }
        self.pos = moved;
        true
    }

    /// Rotate with wall kicks: try shifting 1, -2, 3, -4 ... columns from the
    /// previous attempt until the offset exceeds the piece width, then give up
    /// and restore the piece.
    pub fn rotate(&mut self, rotation: Rotation) -> bool {
        if !self.active {
            return false;
        }
        let start_x = self.pos.0;
        let mut offset: i32 = 1;
        self.current.rotate(rotation);
        while self.board.collides(&self.current, self.pos) {
            self.pos.0 += offset;
            offset = -(offset + offset.signum());
            if offset > self.current.width() as i32 {
                self.current.rotate(rotation.inverse());
                self.pos.0 = start_x;
                return false;
            }
        }
        true
    }

    /// One row down; locks the piece when it cannot move.
    pub fn soft_drop(&mut self) {
        if !self.active {
            return;
        }
        let below = (self.pos.0, self.pos.1 + 1);
        if self.board.collides(&self.current, below) {
            self.lock();
        } else {
            self.pos = below;
        }
        self.drop_counter = 0.0;
    }

    /// Straight to the floor and lock. Returns rows fallen.
    pub fn hard_drop(&mut self) -> u32 {
        if !self.active {
            return 0;
        }
        let mut fallen = 0;
        while !self.board.collides(&self.current, (self.pos.0, self.pos.1 + 1)) {
            self.pos.1 += 1;
            fallen += 1;
        }
        self.lock();
        self.drop_counter = 0.0;
        fallen
    }

    /// Full rows are cleared before the next piece spawns, so a clear can
    /// make room for it.
    fn lock(&mut self) {
        self.board.merge(&self.current, self.pos);
        let cleared = self.board.clear_lines();
        if cleared > 0 {
            self.score += LINE_SCORES[cleared.min(4)] * self.level;
            self.lines += cleared as u32;
            let level = self.lines / LINES_PER_LEVEL + 1;
            if level > self.level {
                self.level = level;
                info!("tetris level {level}");
            }
        }
        self.spawn();
    }

    /// Row the current piece would land on (for the drop shadow).
    pub fn ghost_y(&self) -> i32 {
        let mut y = self.pos.1;
        while !self.board.collides(&self.current, (self.pos.0, y + 1)) {
            y += 1;
        }
        y
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current(&self) -> &Piece {
        &self.current
    }

    pub fn next(&self) -> &Piece {
        &self.next
    }

    pub fn position(&self) -> Pos {
        self.pos
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    #[cfg(test)]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    #[cfg(test)]
    pub(crate) fn set_current(&mut self, kind: Tetromino, pos: Pos) {
        self.current = Piece::new(kind);
        self.pos = pos;
    }

    #[cfg(test)]
    pub(crate) fn set_position(&mut self, pos: Pos) {
        self.pos = pos;
    }
}

impl Default for TetrisGame {
    fn default() -> Self {
        Self::new()
    }
}
