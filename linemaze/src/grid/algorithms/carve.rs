use super::{check_depth, Frame};
use crate::{
    error::MazeError,
    grid::{Coord, Maze},
};

/// Carves passages from `start`, recording cells in first-visit order.
///
/// On the first visit all four flags of a cell are flipped, then every side
/// leading to a cell that is still unvisited gets its flag set right before
/// descending into that cell.
pub(crate) fn carve(maze: &mut Maze, start: Coord) -> Result<(), MazeError> {
    let mut stack = Vec::with_capacity(maze.rows * maze.cols);
    enter(maze, &mut stack, start)?;

    while let Some(frame) = stack.last_mut() {
        let Some(way) = frame.next_way() else {
            stack.pop();
            continue;
        };
        let pos = frame.pos;

        let Some(next) = pos.step(way, maze.rows, maze.cols) else {
            continue;
        };
        if maze.grid[next.row][next.col].visited {
            continue;
        }

        maze.grid[pos.row][pos.col].set_wall(way, true);
        enter(maze, &mut stack, next)?;
    }

    Ok(())
}

fn enter(maze: &mut Maze, stack: &mut Vec<Frame>, pos: Coord) -> Result<(), MazeError> {
    let cell = &mut maze.grid[pos.row][pos.col];
    if cell.visited {
        return Ok(());
    }
    check_depth(stack, maze.depth_limit)?;

    maze.path_way.push(pos);
    cell.visited = true;
    cell.toggle_all_walls();

    stack.push(Frame::new(pos, None, &mut maze.rng));
    Ok(())
}
