use rand::seq::SliceRandom;

use crate::{
    geometry::{Color, Line, Point},
    surface::{Stroke, Surface},
};

use super::{Coord, Random};

/// Color of a forward move when the caller doesn't pick one.
pub const FORWARD_COLOR: Color = Color::RED;
/// Color of a retracted move, can't be overridden.
pub const UNDO_COLOR: Color = Color::GRAY;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Top,
    Right,
    Bottom,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Left, Side::Top, Side::Right, Side::Bottom];

    /// Offset to the neighbor on this side as `(rows, cols)`.
    pub fn offset(&self) -> (isize, isize) {
        match self {
            Side::Left => (0, -1),
            Side::Top => (-1, 0),
            Side::Right => (0, 1),
            Side::Bottom => (1, 0),
        }
    }

    /// Fresh uniform permutation of all four sides.
    pub fn shuffled(rng: &mut Random) -> [Side; 4] {
        let mut sides = Self::ALL;
        sides.shuffle(rng);
        sides
    }
}

/// Direction of a move in the solve trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Forward,
    Undo,
}

/// One side of a cell together with the state of its flag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boundary {
    pub side: Side,
    pub line: Line,
    pub walled: bool,
}

#[derive(Debug, Clone)]
pub struct Cell {
    left: bool,
    top: bool,
    right: bool,
    bottom: bool,
    pub(crate) visited: bool,
    pub(crate) exit: bool,
    top_left: Point,
    bottom_right: Point,
    center: Point,
    coord: Coord,
}

impl Cell {
    /// Cell spanning the box between two opposite corners, in any order.
    pub fn new(p1: Point, p2: Point, coord: Coord) -> Cell {
        let top_left = Point::new(p1.x.min(p2.x), p1.y.min(p2.y));
        let bottom_right = Point::new(p1.x.max(p2.x), p1.y.max(p2.y));

        Cell {
            left: true,
            top: true,
            right: true,
            bottom: true,
            visited: false,
            exit: false,
            top_left,
            bottom_right,
            center: top_left.midpoint(&bottom_right),
            coord,
        }
    }

    pub fn has_wall(&self, side: Side) -> bool {
        match side {
            Side::Left => self.left,
            Side::Top => self.top,
            Side::Right => self.right,
            Side::Bottom => self.bottom,
        }
    }

    pub fn set_wall(&mut self, side: Side, value: bool) {
        match side {
            Side::Left => self.left = value,
            Side::Top => self.top = value,
            Side::Right => self.right = value,
            Side::Bottom => self.bottom = value,
        }
    }

    pub fn walls(&self) -> Vec<Side> {
        Side::ALL
            .into_iter()
            .filter(|side| self.has_wall(*side))
            .collect()
    }

    pub fn toggle_all_walls(&mut self) {
        self.left = !self.left;
        self.top = !self.top;
        self.right = !self.right;
        self.bottom = !self.bottom;
    }

    pub fn boundary_lines(&self) -> [Boundary; 4] {
        let tl = self.top_left;
        let br = self.bottom_right;
        let tr = Point::new(br.x, tl.y);
        let bl = Point::new(tl.x, br.y);

        Side::ALL.map(|side| {
            let line = match side {
                Side::Left => Line::new(tl, bl),
                Side::Top => Line::new(tl, tr),
                Side::Right => Line::new(br, tr),
                Side::Bottom => Line::new(br, bl),
            };

            Boundary {
                side,
                line,
                walled: self.has_wall(side),
            }
        })
    }

    /// Center-to-center segment towards `other`.
    ///
    /// `color` only applies to forward moves, undo moves are always [`UNDO_COLOR`].
    pub fn link_to(&self, other: &Cell, step: Step, color: Option<Color>) -> Line {
        let color = match step {
            Step::Forward => color.unwrap_or(FORWARD_COLOR),
            Step::Undo => UNDO_COLOR,
        };

        Line::new(self.center, other.center).colored(color)
    }

    /// Draws every side that has its flag set.
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S, stroke: &Stroke) -> Result<(), S::Error> {
        for boundary in self.boundary_lines() {
            if boundary.walled {
                boundary.line.draw(surface, stroke)?;
            }
        }

        Ok(())
    }

    pub fn is_visited(&self) -> bool {
        self.visited
    }

    pub fn is_exit(&self) -> bool {
        self.exit
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn top_left(&self) -> Point {
        self.top_left
    }

    pub fn bottom_right(&self) -> Point {
        self.bottom_right
    }

    pub fn coord(&self) -> Coord {
        self.coord
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.coord == other.coord
    }
}

impl Eq for Cell {}
