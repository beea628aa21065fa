use crate::maze::Maze;
use crate::solver::{MazeSolver, ParentMap, SolveError};
use crate::{Cell, Direction};
use fxhash::FxHashMap;
use log::warn;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

struct SmallestCostHolder {
    estimated_cost: u32,
    cost: u32,
    cell: Cell,
}

impl Eq for SmallestCostHolder {}

impl PartialEq for SmallestCostHolder {
    fn eq(&self, other: &Self) -> bool {
        self.estimated_cost.eq(&other.estimated_cost) && self.cost.eq(&other.cost)
    }
}

impl PartialOrd for SmallestCostHolder {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SmallestCostHolder {
    fn cmp(&self, other: &Self) -> Ordering {
        // First orders per estimated cost, then creates subordering
        // based on cost, favoring exploration of deepest nodes first
        match other.estimated_cost.cmp(&self.estimated_cost) {
            Ordering::Equal => self.cost.cmp(&other.cost),
            s => s,
        }
    }
}

/// Best-first exploration ordered by running cost plus the Manhattan
/// estimate. With the default factor of 1.0 the heuristic is admissible and
/// the first route found is a shortest one.
#[derive(Clone, Debug)]
pub struct AstarSolver {
    /// Multiplier applied to the Manhattan heuristic. Values above 1.0 give
    /// up optimality in exchange for fewer expansions.
    pub heuristic_factor: f32,
    /// Abort with [SolveError::BudgetExhausted] after this many cell
    /// expansions. Unlimited when [None].
    pub max_expansions: Option<usize>,
}

impl AstarSolver {
    pub fn new() -> AstarSolver {
        AstarSolver {
            heuristic_factor: 1.0,
            max_expansions: None,
        }
    }

    fn heuristic(&self, cell: &Cell, finish: &Cell) -> u32 {
        (cell.manhattan_distance(finish) as f32 * self.heuristic_factor) as u32
    }
}

impl Default for AstarSolver {
    fn default() -> AstarSolver {
        AstarSolver::new()
    }
}

impl MazeSolver for AstarSolver {
    fn search(&self, maze: &Maze) -> Result<ParentMap, SolveError> {
        let (start, finish) = maze.endpoints().ok_or(SolveError::EndpointsUnset)?;
        // Absent entries stand in for an infinite score.
        let mut g_score: FxHashMap<Cell, u32> = FxHashMap::default();
        let mut f_score: FxHashMap<Cell, u32> = FxHashMap::default();
        g_score.insert(start, 0);
        f_score.insert(start, self.heuristic(&start, &finish));
        let mut open_set = BinaryHeap::new();
        open_set.push(SmallestCostHolder {
            estimated_cost: f_score[&start],
            cost: 0,
            cell: start,
        });
        let mut parents = ParentMap::default();
        let mut expansions = 0;
        while let Some(SmallestCostHolder { cost, cell: current, .. }) = open_set.pop() {
            if current == finish {
                return Ok(parents);
            }
            // The open set may hold stale entries for a cell whose score
            // later improved; only the best-known one gets expanded.
            if cost > g_score.get(&current).copied().unwrap_or(u32::MAX) {
                continue;
            }
            expansions += 1;
            if self.max_expansions.is_some_and(|limit| expansions > limit) {
                return Err(SolveError::BudgetExhausted { expansions });
            }
            for direction in Direction::ORDER {
                if !maze.is_valid_move(current, direction) {
                    continue;
                }
                let neighbor = maze.neighbor(current, direction);
                let tentative_g = cost + 1;
                let tentative_f = tentative_g + self.heuristic(&neighbor, &finish);
                if tentative_f < f_score.get(&neighbor).copied().unwrap_or(u32::MAX) {
                    g_score.insert(neighbor, tentative_g);
                    f_score.insert(neighbor, tentative_f);
                    parents.insert(neighbor, current);
                    open_set.push(SmallestCostHolder {
                        estimated_cost: tentative_f,
                        cost: tentative_g,
                        cell: neighbor,
                    });
                }
            }
        }
        warn!("open set exhausted without reaching {}", finish);
        Err(SolveError::NoPathFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Asserts that the case in which start and finish coincide is handled.
    #[test]
    fn equal_start_finish() {
        let mut maze = Maze::new(1, 2);
        maze.set_start(Cell::new(0, 0)).unwrap();
        maze.set_finish(Cell::new(0, 0)).unwrap();
        maze.generate_components();
        let path = AstarSolver::new().solve(&maze).unwrap();
        assert!(path.is_empty());
    }

    /// Asserts that the optimal 4 step solution around a centre wall is found.
    #[test]
    fn solve_simple_problem() {
        let maze: Maze = "O..\n.#.\n..B".parse().unwrap();
        let path = AstarSolver::new().solve(&maze).unwrap();
        assert_eq!(path.len(), 4);
        assert_eq!(path.cells().last(), Some(Cell::new(2, 2)));
    }

    /// A long detour exists; A* must still return the shortest route even
    /// though the detour cells enter the open set first in stack order.
    #[test]
    fn optimal_despite_detours() {
        let maze: Maze = "O...\n###.\n....\n.###\nB...".parse().unwrap();
        let path = AstarSolver::new().solve(&maze).unwrap();
        assert_eq!(path.len(), 10);
    }

    #[test]
    fn enclosed_start_reports_no_path() {
        let maze: Maze = "O#.\n##.\n..B".parse().unwrap();
        assert_eq!(
            AstarSolver::new().solve(&maze),
            Err(SolveError::NoPathFound)
        );
    }

    #[test]
    fn budget_exhaustion_is_reported() {
        let maze: Maze = "O....\n.....\n....B".parse().unwrap();
        let solver = AstarSolver {
            max_expansions: Some(1),
            ..AstarSolver::new()
        };
        assert!(matches!(
            solver.solve(&maze),
            Err(SolveError::BudgetExhausted { .. })
        ));
    }

    /// An inflated heuristic may lengthen the path but must still reach the
    /// finish over open cells.
    #[test]
    fn weighted_heuristic_still_reaches_finish() {
        let maze: Maze = "O....\n.##..\n.#...\n.#.#.\n....B".parse().unwrap();
        let solver = AstarSolver {
            heuristic_factor: 2.0,
            ..AstarSolver::new()
        };
        let path = solver.solve(&maze).unwrap();
        assert_eq!(path.cells().last(), Some(Cell::new(4, 4)));
        for (from, to) in path.steps() {
            assert_eq!(from.manhattan_distance(&to), 1);
            assert!(maze.is_open(to));
        }
    }
}
