//! Search strategies over a [Maze] and the shared path reconstruction they
//! both feed into.

use crate::maze::Maze;
use crate::Cell;
use core::fmt;
use fxhash::FxBuildHasher;
use indexmap::IndexMap;
use log::info;
use std::error::Error;

pub mod astar;
pub mod dfs;

pub type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// Records, for each visited cell, the cell it was first reached from.
/// A* overwrites an entry when it finds a strictly better route.
pub type ParentMap = FxIndexMap<Cell, Cell>;

/// Raised when a search cannot produce a route.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SolveError {
    /// The maze has no start or no finish set.
    EndpointsUnset,
    NoPathFound,
    /// The expansion budget ran out before the finish was reached.
    BudgetExhausted { expansions: usize },
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SolveError::EndpointsUnset => write!(f, "maze has no start or finish set"),
            SolveError::NoPathFound => write!(f, "no path from start to finish"),
            SolveError::BudgetExhausted { expansions } => {
                write!(f, "search budget of {} expansions exhausted", expansions)
            }
        }
    }
}

impl Error for SolveError {}

/// The route from start to finish as an ordered mapping from each cell on it
/// to its successor. Iteration order is start-to-finish.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ForwardPath {
    steps: FxIndexMap<Cell, Cell>,
}

impl ForwardPath {
    /// Number of unit-cost steps on the route.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The cell the route moves to from `cell`, if `cell` lies on it.
    pub fn successor(&self, cell: &Cell) -> Option<Cell> {
        self.steps.get(cell).copied()
    }

    /// The (from, to) steps in start-to-finish order.
    pub fn steps(&self) -> impl Iterator<Item = (Cell, Cell)> + '_ {
        self.steps.iter().map(|(from, to)| (*from, *to))
    }

    /// The route cells in order, exclusive of the start and inclusive of the
    /// finish.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.steps.values().copied()
    }
}

/// A search strategy over a populated [Maze]. Implementors explore the grid
/// and hand back their parent map; turning it into a [ForwardPath] is shared.
pub trait MazeSolver {
    /// Explores the maze, returning the parent map built during search.
    fn search(&self, maze: &Maze) -> Result<ParentMap, SolveError>;

    /// Runs [search](Self::search) and reconstructs the start-to-finish route.
    fn solve(&self, maze: &Maze) -> Result<ForwardPath, SolveError> {
        let (start, finish) = maze.endpoints().ok_or(SolveError::EndpointsUnset)?;
        if maze.unreachable(&start, &finish) {
            info!("{} and {} are on different components", start, finish);
            return Err(SolveError::NoPathFound);
        }
        let parents = self.search(maze)?;
        reconstruct(start, finish, &parents)
    }
}

/// Walks the parent map backward from `finish` until `start` and re-expresses
/// the route as a start-to-finish step sequence. Search-agnostic: any parent
/// map in which `finish` chains back to `start` reconstructs the same way.
pub fn reconstruct(
    start: Cell,
    finish: Cell,
    parents: &ParentMap,
) -> Result<ForwardPath, SolveError> {
    let backward: Vec<(Cell, Cell)> = itertools::unfold(finish, |cell| {
        if *cell == start {
            return None;
        }
        let parent = *parents.get(cell)?;
        let pair = (parent, *cell);
        *cell = parent;
        Some(pair)
    })
    .collect();
    // An empty walk is only complete when the route is trivial.
    match backward.last() {
        Some(&(parent, _)) if parent == start => {}
        None if finish == start => {}
        _ => return Err(SolveError::NoPathFound),
    }
    let mut steps = FxIndexMap::default();
    for (parent, child) in backward.into_iter().rev() {
        steps.insert(parent, child);
    }
    Ok(ForwardPath { steps })
}
