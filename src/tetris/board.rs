//! Playfield grid: collision, merging and line clearing.

use super::piece::Piece;

pub const COLS: usize = 10;
pub const ROWS: usize = 20;

/// Top-left of a piece's matrix in board cells. May be negative while kicking.
pub type Pos = (i32, i32);

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Board {
    cells: [[u8; COLS]; ROWS],
}

impl Board {
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.cells[y][x]
    }

    pub fn rows(&self) -> &[[u8; COLS]; ROWS] {
        &self.cells
    }

    pub fn clear(&mut self) {
        self.cells = [[0; COLS]; ROWS];
    }

    /// Any occupied piece cell outside the grid or on a filled cell.
    pub fn collides(&self, piece: &Piece, pos: Pos) -> bool {
        piece.filled().any(|(x, y, _)| {
            let bx = pos.0 + x as i32;
            let by = pos.1 + y as i32;
            if bx < 0 || by < 0 || bx >= COLS as i32 || by >= ROWS as i32 {
                return true;
            }
            self.cells[by as usize][bx as usize] != 0
        })
    }

    /// Caller guarantees `!collides(piece, pos)`.
    pub fn merge(&mut self, piece: &Piece, pos: Pos) {
        for (x, y, c) in piece.filled() {
            let bx = pos.0 + x as i32;
            let by = pos.1 + y as i32;
            if (0..COLS as i32).contains(&bx) && (0..ROWS as i32).contains(&by) {
                self.cells[by as usize][bx as usize] = c;
            }
        }
    }

    /// Remove full rows, shifting everything above down. Returns the count.
    pub fn clear_lines(&mut self) -> usize {
        let kept: Vec<[u8; COLS]> = self
            .cells
            .iter()
            .filter(|row| row.iter().any(|&c| c == 0))
            .copied()
            .collect();
        let cleared = ROWS - kept.len();
        if cleared > 0 {
            let mut next = [[0; COLS]; ROWS];
            next[cleared..].copy_from_slice(&kept);
            self.cells = next;
        }
        cleared
    }

    #[cfg(test)]
    pub(crate) fn fill_row(&mut self, y: usize, except: Option<usize>) {
        for x in 0..COLS {
            self.cells[y][x] = if Some(x) == except { 0 } else { 9 };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tetris::piece::Tetromino;

    #[test]
    fn walls_and_floor_collide() {
        let board = Board::default();
        let o = Piece::new(Tetromino::O);
        assert!(!board.collides(&o, (0, 0)));
        assert!(board.collides(&o, (-1, 0)));
        assert!(board.collides(&o, (9, 0)));
        assert!(board.collides(&o, (0, 19)));
        assert!(!board.collides(&o, (8, 18)));
    }

    #[test]
    fn empty_matrix_rows_may_hang_off_the_board() {
        // I piece occupies only its second row.
        let board = Board::default();
        let i = Piece::new(Tetromino::I);
        assert!(!board.collides(&i, (0, -1)));
        assert!(!board.collides(&i, (6, 18)));
    }

    #[test]
    fn merged_cells_block() {
        let mut board = Board::default();
        let o = Piece::new(Tetromino::O);
        board.merge(&o, (4, 18));
        assert_eq!(board.get(4, 19), 4);
        assert!(board.collides(&o, (4, 17)));
        assert!(!board.collides(&o, (4, 16)));
    }

    #[test]
    fn full_rows_clear_and_shift_down() {
        let mut board = Board::default();
        board.fill_row(19, None);
        board.fill_row(18, Some(3));
        board.fill_row(17, None);
        assert_eq!(board.clear_lines(), 2);
        // The partial row dropped to the bottom.
        assert_eq!(board.get(3, 19), 0);
        assert_eq!(board.get(0, 19), 9);
        assert!(board.rows()[..19].iter().all(|r| r.iter().all(|&c| c == 0)));
    }
}
