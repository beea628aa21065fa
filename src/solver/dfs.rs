use crate::maze::Maze;
use crate::solver::{MazeSolver, ParentMap, SolveError};
use crate::{Cell, Direction};
use fxhash::FxHashSet;
use log::warn;

/// Stack-based exhaustive exploration. Finds some path, not necessarily the
/// shortest one; the fixed [Direction::ORDER] makes the result deterministic
/// for a given maze.
#[derive(Clone, Debug, Default)]
pub struct DfsSolver {
    /// Abort with [SolveError::BudgetExhausted] after this many cell
    /// expansions. Unlimited when [None].
    pub max_expansions: Option<usize>,
}

impl DfsSolver {
    pub fn new() -> DfsSolver {
        DfsSolver {
            max_expansions: None,
        }
    }
}

impl MazeSolver for DfsSolver {
    fn search(&self, maze: &Maze) -> Result<ParentMap, SolveError> {
        let (start, finish) = maze.endpoints().ok_or(SolveError::EndpointsUnset)?;
        let mut frontier = vec![start];
        let mut explored: FxHashSet<Cell> = FxHashSet::default();
        explored.insert(start);
        let mut parents = ParentMap::default();
        let mut expansions = 0;
        while let Some(current) = frontier.pop() {
            if current == finish {
                return Ok(parents);
            }
            expansions += 1;
            if self.max_expansions.is_some_and(|limit| expansions > limit) {
                return Err(SolveError::BudgetExhausted { expansions });
            }
            for direction in Direction::ORDER {
                if !maze.is_valid_move(current, direction) {
                    continue;
                }
                let child = maze.neighbor(current, direction);
                if !explored.insert(child) {
                    continue;
                }
                frontier.push(child);
                parents.insert(child, current);
            }
        }
        warn!("depth-first frontier exhausted without reaching {}", finish);
        Err(SolveError::NoPathFound)
    }
}
