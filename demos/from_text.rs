use maze_pathfinding::solver::astar::AstarSolver;
use maze_pathfinding::solver::dfs::DfsSolver;
use maze_pathfinding::{Maze, MazeSolver, SolveSession};

const MAZE: &str = "\
O..#...
.#.#.#.
.#...#.
.#####.
......B";

// Loads a maze from its text form and solves it with both strategies,
// keeping the A* route in a session as a display layer would receive it.
fn main() {
    let maze: Maze = MAZE.parse().unwrap();
    println!("{}", maze);

    let dfs_path = DfsSolver::new().solve(&maze).unwrap();
    println!("DFS found {} steps", dfs_path.len());

    let mut session = SolveSession::new(maze);
    let astar_path = session.solve(&AstarSolver::new()).unwrap();
    println!("A* found {} steps:", astar_path.len());
    for cell in astar_path.cells() {
        println!("  {}", cell);
    }
}
