//! The seven tetrominoes as square cell matrices. A cell holds the piece's
//! colour id (1..=7) or 0 for empty.

use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tetromino {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

/// Indexed by colour id; slot 0 is the empty cell.
pub const COLORS: [&str; 8] = [
    "#000000", "#ff6d00", "#2979ff", "#ffeb3b", "#00c853", "#d500f9", "#ff1744", "#00e5ff",
];

impl Tetromino {
    pub const ALL: [Tetromino; 7] = [
        Tetromino::I,
        Tetromino::J,
        Tetromino::L,
        Tetromino::O,
        Tetromino::S,
        Tetromino::T,
        Tetromino::Z,
    ];

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    pub fn color_id(self) -> u8 {
        match self {
            Tetromino::I => 1,
            Tetromino::J => 2,
            Tetromino::L => 3,
            Tetromino::O => 4,
            Tetromino::S => 5,
            Tetromino::T => 6,
            Tetromino::Z => 7,
        }
    }

    fn shape(self) -> &'static [&'static [u8]] {
        match self {
            Tetromino::I => &[&[0, 0, 0, 0], &[1, 1, 1, 1], &[0, 0, 0, 0], &[0, 0, 0, 0]],
            Tetromino::J => &[&[1, 0, 0], &[1, 1, 1], &[0, 0, 0]],
            Tetromino::L => &[&[0, 0, 1], &[1, 1, 1], &[0, 0, 0]],
            Tetromino::O => &[&[1, 1], &[1, 1]],
            Tetromino::S => &[&[0, 1, 1], &[1, 1, 0], &[0, 0, 0]],
            Tetromino::T => &[&[0, 1, 0], &[1, 1, 1], &[0, 0, 0]],
            Tetromino::Z => &[&[1, 1, 0], &[0, 1, 1], &[0, 0, 0]],
        }
    }
}

pub fn color(id: u8) -> &'static str {
    COLORS.get(id as usize).copied().unwrap_or(COLORS[0])
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rotation {
    Clockwise,
    CounterClockwise,
}

impl Rotation {
    pub fn inverse(self) -> Self {
        match self {
            Rotation::Clockwise => Rotation::CounterClockwise,
            Rotation::CounterClockwise => Rotation::Clockwise,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Piece {
    kind: Tetromino,
    cells: Vec<Vec<u8>>,
}

impl Piece {
    pub fn new(kind: Tetromino) -> Self {
        let id = kind.color_id();
        let cells = kind
            .shape()
            .iter()
            .map(|row| row.iter().map(|&c| c * id).collect())
            .collect();
        Self { kind, cells }
    }

    pub fn kind(&self) -> Tetromino {
        self.kind
    }

    pub fn width(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }

    pub fn height(&self) -> usize {
        self.cells.len()
    }

    pub fn cells(&self) -> &[Vec<u8>] {
        &self.cells
    }

    /// Occupied cells as `(x, y, colour id)` relative to the matrix origin.
    pub fn filled(&self) -> impl Iterator<Item = (usize, usize, u8)> + '_ {
        self.cells.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter(|&(_, &c)| c != 0)
                .map(move |(x, &c)| (x, y, c))
        })
    }

    /// Transpose, then mirror rows (clockwise) or row order (counter-clockwise).
    pub fn rotate(&mut self, rotation: Rotation) {
        let n = self.cells.len();
        for y in 0..n {
            for x in 0..y {
                let tmp = self.cells[y][x];
                self.cells[y][x] = self.cells[x][y];
                self.cells[x][y] = tmp;
            }
        }
        match rotation {
            Rotation::Clockwise => self.cells.iter_mut().for_each(|row| row.reverse()),
            Rotation::CounterClockwise => self.cells.reverse(),
        }
    }
}
