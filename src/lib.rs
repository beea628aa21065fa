//! # maze_pathfinding
//!
//! Solves character-grid mazes with two interchangeable search strategies: an
//! uninformed [depth-first traversal](https://en.wikipedia.org/wiki/Depth-first_search)
//! and [A*](https://en.wikipedia.org/wiki/A*_search_algorithm) guided by the
//! [Manhattan distance](https://en.wikipedia.org/wiki/Taxicab_geometry).
//! A [Maze] is populated once (from text or programmatically) and is read-only
//! during search; both solvers implement [MazeSolver](solver::MazeSolver) and
//! return an ordered [ForwardPath](solver::ForwardPath) from start to finish.
//! Pre-computes [connected components](https://en.wikipedia.org/wiki/Component_(graph_theory))
//! to answer unsolvable queries without flood-filling.
pub mod maze;
pub mod solver;

pub use crate::maze::{Maze, MazeError};
pub use crate::solver::{ForwardPath, MazeSolver, ParentMap, SolveError};

use core::fmt;

/// A position on the maze grid, identified by its coordinates alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub fn new(row: usize, col: usize) -> Cell {
        Cell { row, col }
    }

    /// Manhattan distance to another cell, the A* heuristic for unit-cost
    /// 4-directional movement.
    pub fn manhattan_distance(&self, other: &Cell) -> u32 {
        (self.row.abs_diff(other.row) + self.col.abs_diff(other.col)) as u32
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// One of the four compass moves on the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    East,
    West,
    North,
    South,
}

impl Direction {
    /// Fixed expansion order shared by both solvers. Keeps the found path
    /// deterministic for a given maze.
    pub const ORDER: [Direction; 4] = [
        Direction::East,
        Direction::South,
        Direction::North,
        Direction::West,
    ];

    /// The (row, col) delta of a single step in this direction.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::East => (0, 1),
            Direction::West => (0, -1),
            Direction::North => (-1, 0),
            Direction::South => (1, 0),
        }
    }
}

/// Holds the maze being worked on together with the last computed route, ready
/// to hand to a display layer. Mutating the maze invalidates the stored path.
#[derive(Clone, Debug)]
pub struct SolveSession {
    maze: Maze,
    last_path: Option<ForwardPath>,
}

impl SolveSession {
    pub fn new(maze: Maze) -> SolveSession {
        SolveSession {
            maze,
            last_path: None,
        }
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn maze_mut(&mut self) -> &mut Maze {
        self.last_path = None;
        &mut self.maze
    }

    /// Runs the given solver on the current maze and stores the result.
    pub fn solve(&mut self, solver: &dyn MazeSolver) -> Result<&ForwardPath, SolveError> {
        let path = solver.solve(&self.maze)?;
        Ok(self.last_path.insert(path))
    }

    pub fn last_path(&self) -> Option<&ForwardPath> {
        self.last_path.as_ref()
    }

    pub fn clear_path(&mut self) {
        self.last_path = None;
    }
}
