use super::{check_depth, Frame};
use crate::{
    error::MazeError,
    grid::{Coord, Maze, Move, Step},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Entered {
    /// Cell was visited before, nothing happened.
    Blocked,
    Open,
    Exit,
}

/// Searches for the exit from `start`, moving only through sides whose flag
/// is set. Every move and every retraction ends up in `maze.moves`.
///
/// Returns whether the exit was reached; the search stops right there.
pub(crate) fn solve(maze: &mut Maze, start: Coord) -> Result<bool, MazeError> {
    let mut stack = Vec::with_capacity(maze.rows * maze.cols);
    match enter(maze, &mut stack, start, None)? {
        Entered::Exit => return Ok(true),
        Entered::Blocked => return Ok(false),
        Entered::Open => {}
    }

    while let Some(frame) = stack.last_mut() {
        let pos = frame.pos;
        let Some(way) = frame.next_way() else {
            let from = frame.from;
            stack.pop();

            if let Some(prev) = from {
                maze.moves.push(Move {
                    from: pos,
                    to: prev,
                    step: Step::Undo,
                });
            }
            continue;
        };

        if !maze.grid[pos.row][pos.col].has_wall(way) {
            continue;
        }
        let Some(next) = pos.step(way, maze.rows, maze.cols) else {
            continue;
        };
        if maze.grid[next.row][next.col].visited {
            continue;
        }

        if enter(maze, &mut stack, next, Some(pos))? == Entered::Exit {
            return Ok(true);
        }
    }

    Ok(false)
}

fn enter(
    maze: &mut Maze,
    stack: &mut Vec<Frame>,
    pos: Coord,
    from: Option<Coord>,
) -> Result<Entered, MazeError> {
    let cell = &mut maze.grid[pos.row][pos.col];
    if cell.visited {
        return Ok(Entered::Blocked);
    }
    check_depth(stack, maze.depth_limit)?;

    if let Some(prev) = from {
        maze.moves.push(Move {
            from: prev,
            to: pos,
            step: Step::Forward,
        });
    }
    cell.visited = true;

    if cell.exit {
        return Ok(Entered::Exit);
    }

    stack.push(Frame::new(pos, from, &mut maze.rng));
    Ok(Entered::Open)
}
