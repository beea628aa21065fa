use maze_pathfinding::solver::astar::AstarSolver;
use maze_pathfinding::{Cell, Maze, MazeSolver};

// In this example a path is found on a 3x3 maze with shape
//  ___
// |O  |
// | # |
// |  B|
//  ___
// where
// - # marks a wall
// - O marks the start
// - B marks the finish

fn main() {
    let mut maze = Maze::new(3, 3);
    maze.set_wall(Cell::new(1, 1), true).unwrap();
    maze.set_start(Cell::new(0, 0)).unwrap();
    maze.set_finish(Cell::new(2, 2)).unwrap();
    maze.generate_components();
    println!("{}", maze);
    let path = AstarSolver::new().solve(&maze).unwrap();
    println!("Path:");
    for (from, to) in path.steps() {
        println!("{} -> {}", from, to);
    }
}
