//! Rectangular mazes that are carved and solved by randomized depth-first
//! traversal, with the results exposed as line segments ready for drawing.

pub mod error;
pub mod geometry;
pub mod grid;
pub mod surface;

pub use error::MazeError;
pub use geometry::{Color, Inset, Line, Point};
pub use grid::{Cell, Coord, Maze, MazeBuilder, Move, Random, Side, Stage, Step};
pub use surface::{Stroke, Surface};
