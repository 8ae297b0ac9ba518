mod algorithms;
pub mod cell;
pub mod maze;

pub use cell::{Boundary, Cell, Side, Step};
pub use maze::{Maze, MazeBuilder, Move, Stage};

/// Random number generator used for anything, where determinism is required.
pub type Random = rand_xoshiro::Xoshiro256StarStar;

/// Position of a cell in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    /// The entrance of every maze.
    pub const ORIGIN: Coord = Coord { row: 0, col: 0 };

    pub fn new(row: usize, col: usize) -> Self {
        Coord { row, col }
    }

    /// Neighbor on the given side, if it fits into a `rows` x `cols` grid.
    pub fn step(&self, side: Side, rows: usize, cols: usize) -> Option<Coord> {
        let (dr, dc) = side.offset();
        let row = self.row.checked_add_signed(dr)?;
        let col = self.col.checked_add_signed(dc)?;

        (row < rows && col < cols).then_some(Coord { row, col })
    }
}

impl From<(usize, usize)> for Coord {
    fn from((row, col): (usize, usize)) -> Self {
        Coord { row, col }
    }
}
