//! Both traversals are depth-first recursions run on an explicit stack, so
//! big grids don't depend on the size of the call stack.

mod carve;
mod solve;

pub(crate) use carve::carve;
pub(crate) use solve::solve;

use crate::{error::MazeError, grid::Random};

use super::{Coord, Side};

/// One level of the recursion: the cell, the order in which its sides are
/// tried and how many of them were tried already.
#[derive(Debug, Clone, Copy)]
struct Frame {
    pos: Coord,
    from: Option<Coord>,
    ways: [Side; 4],
    next: usize,
}

impl Frame {
    fn new(pos: Coord, from: Option<Coord>, rng: &mut Random) -> Self {
        Frame {
            pos,
            from,
            ways: Side::shuffled(rng),
            next: 0,
        }
    }

    fn next_way(&mut self) -> Option<Side> {
        let way = self.ways.get(self.next).copied()?;
        self.next += 1;
        Some(way)
    }
}

fn check_depth(stack: &[Frame], limit: Option<usize>) -> Result<(), MazeError> {
    match limit {
        Some(limit) if stack.len() >= limit => {
            log::trace!("Depth limit of {} reached", limit);
            Err(MazeError::DepthExhausted { limit })
        }
        _ => Ok(()),
    }
}
