use std::fmt;

use rand::{thread_rng, Rng as _, SeedableRng as _};

use super::{algorithms, Cell, Coord, Random, Side, Step};
use crate::{
    error::MazeError,
    geometry::{Color, Line, Point},
};

/// Height of the drawing area per pair of columns, when the column count is
/// derived from the size.
const UNITS_PER_COLUMN_PAIR: f64 = 27.0;

/// Where the maze is in its life: built, then generated, then solved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Built,
    Generated,
    Solved,
    /// A traversal failed midway, the grid is in an unusable state.
    Aborted,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Built => "not generated yet",
            Stage::Generated => "already generated",
            Stage::Solved => "already solved",
            Stage::Aborted => "aborted",
        })
    }
}

/// Single step of the solver, between two neighboring cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Coord,
    pub to: Coord,
    pub step: Step,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExitSpec {
    Coord(Coord),
    Index(usize),
}

/// Collects the construction parameters of a [`Maze`].
#[derive(Debug, Clone)]
pub struct MazeBuilder {
    width: f64,
    height: f64,
    rows: Option<i32>,
    cols: Option<i32>,
    origin: Point,
    exit: Option<ExitSpec>,
    seed: Option<u64>,
    depth_limit: Option<usize>,
}

impl MazeBuilder {
    /// `width` and `height` include the margins given by [`MazeBuilder::origin`].
    pub fn new(width: f64, height: f64) -> Self {
        MazeBuilder {
            width,
            height,
            rows: None,
            cols: None,
            origin: Point::ZERO,
            exit: None,
            seed: None,
            depth_limit: None,
        }
    }

    pub fn rows(mut self, value: i32) -> Self {
        self.rows = Some(value);
        self
    }

    pub fn cols(mut self, value: i32) -> Self {
        self.cols = Some(value);
        self
    }

    /// Offset of the top left corner, also used as the margin on the opposite sides.
    pub fn origin(mut self, x: f64, y: f64) -> Self {
        self.origin = Point::new(x, y);
        self
    }

    /// Without an exit the maze picks one uniformly over all of its cells,
    /// the numbered mapping is only used through [`MazeBuilder::exit_index`].
    pub fn exit(mut self, value: Coord) -> Self {
        self.exit = Some(ExitSpec::Coord(value));
        self
    }

    /// Exit given as a single number, mapped to `(n / rows, n % cols)`.
    pub fn exit_index(mut self, value: usize) -> Self {
        self.exit = Some(ExitSpec::Index(value));
        self
    }

    pub fn seed(mut self, value: u64) -> Self {
        self.seed = Some(value);
        self
    }

    /// Maximum number of cells a traversal may have open at once.
    pub fn depth_limit(mut self, value: usize) -> Self {
        self.depth_limit = Some(value);
        self
    }

    pub fn build(self) -> Result<Maze, MazeError> {
        let Point { x, y } = self.origin;
        if ![self.width, self.height, x, y].iter().all(|v| v.is_finite()) {
            return Err(MazeError::InvalidArea {
                width: self.width,
                height: self.height,
                x,
                y,
            });
        }

        let cols = match self.cols {
            Some(cols) => i64::from(cols),
            None => {
                let pairs = (self.height / UNITS_PER_COLUMN_PAIR).floor();
                if pairs * 2.0 > f64::from(i32::MAX) {
                    return Err(MazeError::InvalidSize {
                        rows: pairs as i64,
                        cols: (pairs * 2.0) as i64,
                    });
                }
                pairs as i64 * 2
            }
        };
        let rows = self.rows.map(i64::from).unwrap_or(cols / 2);

        if rows < 1 || cols < 1 {
            return Err(MazeError::InvalidSize { rows, cols });
        }
        let (rows, cols) = (rows as usize, cols as usize);

        let area_width = self.width - x * 2.0;
        let area_height = self.height - y * 2.0;
        if !(area_width > 0.0 && area_height > 0.0) {
            return Err(MazeError::InvalidArea {
                width: self.width,
                height: self.height,
                x,
                y,
            });
        }

        let seed = self.seed.unwrap_or_else(|| thread_rng().gen());
        let mut rng = Random::seed_from_u64(seed);

        let exit = match self.exit {
            Some(ExitSpec::Coord(coord)) => coord,
            Some(ExitSpec::Index(index)) => Coord::new(index / rows, index % cols),
            None => Coord::new(rng.gen_range(0..rows), rng.gen_range(0..cols)),
        };
        if exit.row >= rows || exit.col >= cols {
            return Err(MazeError::ExitOutOfBounds {
                row: exit.row,
                col: exit.col,
                rows,
                cols,
            });
        }

        let cell_width = area_width / cols as f64;
        let cell_height = area_height / rows as f64;

        let grid = (0..rows)
            .map(|row| {
                (0..cols)
                    .map(|col| {
                        let p1 = Point::new(
                            cell_width * col as f64 + x,
                            cell_height * row as f64 + y,
                        );
                        let p2 = Point::new(
                            cell_width * (col + 1) as f64 + x,
                            cell_height * (row + 1) as f64 + y,
                        );
                        Cell::new(p1, p2, Coord::new(row, col))
                    })
                    .collect()
            })
            .collect();

        Ok(Maze {
            grid,
            rows,
            cols,
            start: self.origin,
            end: Point::new(x + cell_width * cols as f64, y + cell_height * rows as f64),
            exit,
            seed,
            rng,
            path_way: Vec::with_capacity(rows * cols),
            moves: Vec::new(),
            stage: Stage::Built,
            depth_limit: self.depth_limit,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Maze {
    pub(crate) grid: Vec<Vec<Cell>>,
    pub(crate) rows: usize,
    pub(crate) cols: usize,
    start: Point,
    end: Point,
    exit: Coord,
    seed: u64,
    pub(crate) rng: Random,
    pub(crate) path_way: Vec<Coord>,
    pub(crate) moves: Vec<Move>,
    stage: Stage,
    pub(crate) depth_limit: Option<usize>,
}

impl Maze {
    pub fn builder(width: f64, height: f64) -> MazeBuilder {
        MazeBuilder::new(width, height)
    }

    /// Opens the entrance and the exit, then carves the passages.
    ///
    /// Afterwards no cell is marked as visited.
    pub fn generate(&mut self) -> Result<(), MazeError> {
        self.expect_stage(Stage::Built, "generate")?;

        self.open_entrance_and_exit();
        if let Err(err) = algorithms::carve(self, Coord::ORIGIN) {
            self.stage = Stage::Aborted;
            return Err(err);
        }
        self.reset_visited();
        self.stage = Stage::Generated;

        log::debug!(
            "Generated {}x{} maze with seed {}, exit at {:?}",
            self.rows,
            self.cols,
            self.seed,
            self.exit
        );
        Ok(())
    }

    /// Searches for the exit and records the trace. Returns whether the exit
    /// was reached.
    pub fn solve(&mut self) -> Result<bool, MazeError> {
        self.expect_stage(Stage::Generated, "solve")?;

        let reached = match algorithms::solve(self, Coord::ORIGIN) {
            Ok(reached) => reached,
            Err(err) => {
                self.stage = Stage::Aborted;
                return Err(err);
            }
        };
        self.stage = Stage::Solved;

        log::debug!(
            "Solved maze with {} moves, exit reached: {}",
            self.moves.len(),
            reached
        );
        Ok(reached)
    }

    fn expect_stage(&self, expected: Stage, action: &'static str) -> Result<(), MazeError> {
        if self.stage == expected {
            Ok(())
        } else {
            Err(MazeError::WrongStage {
                action,
                stage: self.stage,
            })
        }
    }

    fn open_entrance_and_exit(&mut self) {
        self.grid[0][0].set_wall(Side::Left, false);

        let exit = &mut self.grid[self.exit.row][self.exit.col];
        exit.set_wall(Side::Right, false);
        exit.exit = true;
    }

    fn reset_visited(&mut self) {
        for cell in self.grid.iter_mut().flatten() {
            cell.visited = false;
        }
    }

    fn at(&self, pos: Coord) -> &Cell {
        &self.grid[pos.row][pos.col]
    }

    pub fn is_in_bounds(&self, pos: Coord) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    pub fn grid(&self) -> &[Vec<Cell>] {
        &self.grid
    }

    pub fn cell(&self, pos: Coord) -> Option<&Cell> {
        self.grid.get(pos.row).and_then(|row| row.get(pos.col))
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.grid.iter().flatten()
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }

    pub fn exit(&self) -> Coord {
        self.exit
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn depth_limit(&self) -> Option<usize> {
        self.depth_limit
    }

    /// Coordinates of the cells in the order generation first reached them.
    pub fn path_way(&self) -> &[Coord] {
        &self.path_way
    }

    pub fn path_way_cells(&self) -> impl Iterator<Item = &Cell> {
        self.path_way.iter().map(|pos| self.at(*pos))
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// The solver's moves as lines. `color` replaces the default color of
    /// forward moves.
    pub fn solve_trace(&self, color: Option<Color>) -> Vec<Line> {
        self.moves
            .iter()
            .map(|mv| self.at(mv.from).link_to(self.at(mv.to), mv.step, color))
            .collect()
    }

    /// Outline of the whole maze area from `start` to `end`, for drawing a
    /// frame around it.
    pub fn overlay(&self) -> [Line; 4] {
        let (tl, br) = (self.start, self.end);
        let (tr, bl) = (Point::new(br.x, tl.y), Point::new(tl.x, br.y));

        [
            Line::new(tl, bl),
            Line::new(tl, tr),
            Line::new(br, tr),
            Line::new(br, bl),
        ]
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashSet, VecDeque};

    use super::*;

    fn maze(rows: i32, cols: i32, seed: u64) -> Maze {
        MazeBuilder::new(cols as f64 * 10.0, rows as f64 * 10.0)
            .rows(rows)
            .cols(cols)
            .seed(seed)
            .build()
            .unwrap()
    }

    fn solved(rows: i32, cols: i32, seed: u64, exit: Coord) -> Maze {
        let mut maze = MazeBuilder::new(cols as f64 * 10.0, rows as f64 * 10.0)
            .rows(rows)
            .cols(cols)
            .seed(seed)
            .exit(exit)
            .build()
            .unwrap();
        maze.generate().unwrap();
        assert!(maze.solve().unwrap());
        maze
    }

    /// Cells reachable from the entrance through sides with a set flag.
    fn reachable(maze: &Maze) -> HashSet<Coord> {
        let mut seen = HashSet::from([Coord::ORIGIN]);
        let mut queue = VecDeque::from([Coord::ORIGIN]);

        while let Some(pos) = queue.pop_front() {
            let cell = maze.cell(pos).unwrap();
            for side in cell.walls() {
                if let Some(next) = pos.step(side, maze.rows(), maze.cols()) {
                    if seen.insert(next) {
                        queue.push_back(next);
                    }
                }
            }
        }

        seen
    }

    #[test]
    fn default_dimensions() {
        let maze = MazeBuilder::new(1920.0, 1080.0).seed(1).build().unwrap();
        assert_eq!(maze.cols(), 80);
        assert_eq!(maze.rows(), 40);

        let maze = MazeBuilder::new(100.0, 270.0).cols(7).seed(1).build().unwrap();
        assert_eq!((maze.rows(), maze.cols()), (3, 7));
    }

    #[test]
    fn invalid_parameters() {
        assert_eq!(
            MazeBuilder::new(100.0, 100.0).rows(0).cols(3).build().unwrap_err(),
            MazeError::InvalidSize { rows: 0, cols: 3 }
        );
        assert_eq!(
            MazeBuilder::new(100.0, 100.0).rows(2).cols(-4).build().unwrap_err(),
            MazeError::InvalidSize { rows: 2, cols: -4 }
        );
        // too small to get a single pair of columns
        assert!(matches!(
            MazeBuilder::new(100.0, 20.0).build(),
            Err(MazeError::InvalidSize { rows: 0, cols: 0 })
        ));
        assert!(matches!(
            MazeBuilder::new(100.0, 100.0).rows(2).cols(2).origin(50.0, 0.0).build(),
            Err(MazeError::InvalidArea { .. })
        ));
        assert!(matches!(
            MazeBuilder::new(100.0, f64::INFINITY).build(),
            Err(MazeError::InvalidArea { .. })
        ));
        assert!(matches!(
            MazeBuilder::new(f64::NAN, 100.0).rows(2).cols(2).build(),
            Err(MazeError::InvalidArea { .. })
        ));
        assert!(matches!(
            MazeBuilder::new(100.0, 1e300).build(),
            Err(MazeError::InvalidSize { .. })
        ));
        assert_eq!(
            MazeBuilder::new(100.0, 100.0)
                .rows(2)
                .cols(3)
                .exit(Coord::new(2, 0))
                .build()
                .unwrap_err(),
            MazeError::ExitOutOfBounds {
                row: 2,
                col: 0,
                rows: 2,
                cols: 3
            }
        );
    }

    #[test]
    fn exit_index_mapping() {
        let build = |index| {
            MazeBuilder::new(40.0, 20.0)
                .rows(2)
                .cols(4)
                .exit_index(index)
                .build()
        };

        assert_eq!(build(3).unwrap().exit(), Coord::new(1, 3));
        assert_eq!(build(1).unwrap().exit(), Coord::new(0, 1));
        assert!(matches!(build(5), Err(MazeError::ExitOutOfBounds { row: 2, col: 1, .. })));
        assert!(matches!(build(8), Err(MazeError::ExitOutOfBounds { row: 4, col: 0, .. })));
    }

    #[test]
    fn default_exit_is_inside() {
        for seed in 0..50 {
            let maze = maze(3, 5, seed);
            assert!(maze.is_in_bounds(maze.exit()));
        }
    }

    #[test]
    fn geometry_of_the_grid() {
        let maze = MazeBuilder::new(120.0, 70.0)
            .rows(2)
            .cols(4)
            .origin(10.0, 5.0)
            .seed(3)
            .build()
            .unwrap();

        assert_eq!(maze.start(), Point::new(10.0, 5.0));
        assert_eq!(maze.end(), Point::new(110.0, 65.0));

        let cell = maze.cell(Coord::new(1, 2)).unwrap();
        assert_eq!(cell.top_left(), Point::new(60.0, 35.0));
        assert_eq!(cell.bottom_right(), Point::new(85.0, 65.0));
        assert_eq!(cell.center(), Point::new(72.0, 50.0));
        assert_eq!(cell.coord(), Coord::new(1, 2));

        let overlay = maze.overlay();
        let p = Point::new;
        assert_eq!(overlay[0], Line::new(p(10.0, 5.0), p(10.0, 65.0)));
        assert_eq!(overlay[1], Line::new(p(10.0, 5.0), p(110.0, 5.0)));
        assert_eq!(overlay[2], Line::new(p(110.0, 65.0), p(110.0, 5.0)));
        assert_eq!(overlay[3], Line::new(p(110.0, 65.0), p(10.0, 65.0)));

        // the outline spans the grid, not just its first cell
        let first: Vec<Line> = maze
            .cell(Coord::ORIGIN)
            .unwrap()
            .boundary_lines()
            .iter()
            .map(|b| b.line)
            .collect();
        assert_ne!(overlay.to_vec(), first);
    }

    #[test]
    fn generation_visits_every_cell_once() {
        for (rows, cols) in [(1, 1), (1, 7), (6, 1), (5, 9), (20, 30)] {
            let mut maze = maze(rows, cols, 42);
            maze.generate().unwrap();

            let unique: HashSet<_> = maze.path_way().iter().collect();
            assert_eq!(maze.path_way().len(), (rows * cols) as usize);
            assert_eq!(unique.len(), maze.path_way().len());
            assert_eq!(maze.path_way()[0], Coord::ORIGIN);
            assert!(maze.cells().all(|cell| !cell.is_visited()));
            assert_eq!(maze.path_way_cells().count(), maze.path_way().len());
        }
    }

    #[test]
    fn generated_maze_is_connected() {
        for seed in 0..20 {
            let mut maze = maze(8, 13, seed);
            maze.generate().unwrap();
            assert_eq!(reachable(&maze).len(), 8 * 13);
        }
    }

    #[test]
    fn entrance_and_exit_flags() {
        let mut maze = MazeBuilder::new(50.0, 50.0)
            .rows(5)
            .cols(5)
            .exit(Coord::new(4, 4))
            .seed(9)
            .build()
            .unwrap();
        maze.generate().unwrap();

        // cleared before the first visit flips them
        assert!(maze.cell(Coord::ORIGIN).unwrap().has_wall(Side::Left));
        let exit = maze.cell(Coord::new(4, 4)).unwrap();
        assert!(exit.is_exit());
        assert!(exit.has_wall(Side::Right));
        assert_eq!(maze.cells().filter(|cell| cell.is_exit()).count(), 1);
    }

    #[test]
    fn solving_reaches_the_exit() {
        for seed in 1..30 {
            let exit = Coord::new(seed as usize % 7, (seed as usize * 5) % 11);
            let maze = solved(7, 11, seed, exit);
            let moves = maze.moves();

            let last = moves.last().unwrap();
            assert_eq!(last.step, Step::Forward);
            assert_eq!(last.to, exit);
            assert!(maze.cell(exit).unwrap().is_visited());
            assert_eq!(maze.stage(), Stage::Solved);

            // every move goes between neighbors, every undo walks a forward move back
            let mut open = vec![Coord::ORIGIN];
            for mv in moves {
                let (dr, dc) = (
                    mv.from.row.abs_diff(mv.to.row),
                    mv.from.col.abs_diff(mv.to.col),
                );
                assert_eq!(dr + dc, 1);
                match mv.step {
                    Step::Forward => {
                        assert_eq!(open.last(), Some(&mv.from));
                        open.push(mv.to);
                    }
                    Step::Undo => {
                        assert_eq!(open.pop(), Some(mv.from));
                        assert_eq!(open.last(), Some(&mv.to));
                    }
                }
            }
        }
    }

    #[test]
    fn single_cell() {
        let mut maze = maze(1, 1, 5);
        assert_eq!(maze.exit(), Coord::ORIGIN);

        maze.generate().unwrap();
        assert_eq!(maze.path_way(), &[Coord::ORIGIN]);
        assert!(maze.solve().unwrap());
        assert!(maze.moves().is_empty());
        assert!(maze.solve_trace(None).is_empty());
    }

    #[test]
    fn two_by_two_goes_straight_to_the_corner() {
        // the carved tree of a 2x2 grid is always a simple path through all four cells
        for seed in 0..64 {
            let maze = solved(2, 2, seed, Coord::new(1, 1));
            assert_eq!(maze.path_way().len(), 4);
            assert_eq!(maze.moves().len(), 2);
            assert!(maze.moves().iter().all(|mv| mv.step == Step::Forward));
        }
    }

    #[test]
    fn dead_ends_are_retracted() {
        let has_undo = |seed| {
            solved(3, 3, seed, Coord::new(2, 2))
                .moves()
                .iter()
                .any(|mv| mv.step == Step::Undo)
        };

        let with_undo = (0..500).find(|seed| has_undo(*seed));
        let without_undo = (0..500).find(|seed| !has_undo(*seed));
        assert!(with_undo.is_some());
        assert!(without_undo.is_some());

        let seed = with_undo.unwrap();
        let maze = solved(3, 3, seed, Coord::new(2, 2));
        let trace = maze.solve_trace(Some(Color::WHITE));
        assert_eq!(trace.len(), maze.moves().len());
        for (line, mv) in trace.iter().zip(maze.moves()) {
            match mv.step {
                Step::Forward => assert_eq!(line.color(), Color::WHITE),
                Step::Undo => assert_eq!(line.color(), Color::GRAY),
            }
        }
    }

    #[test]
    fn same_seed_same_maze() {
        let run = |seed| {
            let mut maze = maze(12, 17, seed);
            maze.generate().unwrap();
            maze.solve().unwrap();
            (maze.exit(), maze.path_way().to_vec(), maze.solve_trace(None))
        };

        assert_eq!(run(1234), run(1234));
        assert_ne!(run(1234).1, run(4321).1);
    }

    #[test]
    fn stages_are_enforced() {
        let mut maze = maze(3, 3, 0);
        assert_eq!(
            maze.solve().unwrap_err(),
            MazeError::WrongStage {
                action: "solve",
                stage: Stage::Built
            }
        );

        maze.generate().unwrap();
        assert!(matches!(
            maze.generate(),
            Err(MazeError::WrongStage { stage: Stage::Generated, .. })
        ));

        maze.solve().unwrap();
        assert!(matches!(
            maze.solve(),
            Err(MazeError::WrongStage { stage: Stage::Solved, .. })
        ));
    }

    #[test]
    fn depth_limit() {
        // a single row can only be carved as one long corridor
        let mut maze = MazeBuilder::new(500.0, 10.0)
            .rows(1)
            .cols(50)
            .seed(0)
            .depth_limit(10)
            .build()
            .unwrap();

        let err = maze.generate().unwrap_err();
        assert_eq!(err, MazeError::DepthExhausted { limit: 10 });
        assert!(err.is_resource());
        assert_eq!(maze.stage(), Stage::Aborted);
        assert_eq!(maze.path_way().len(), 10);

        let mut maze = MazeBuilder::new(500.0, 10.0)
            .rows(1)
            .cols(50)
            .seed(0)
            .depth_limit(50)
            .build()
            .unwrap();
        maze.generate().unwrap();
        assert!(maze.solve().unwrap());
    }
}
