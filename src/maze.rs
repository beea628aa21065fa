//! The maze grid model: wall layout, endpoints, movement validity and
//! connected components.

use crate::{Cell, Direction};
use core::fmt;
use grid_util::grid::{BoolGrid, Grid};
use log::info;
use petgraph::unionfind::UnionFind;
use std::error::Error;
use std::fs;
use std::path::Path;
use std::str::FromStr;

pub const WALL_SYMBOL: char = '#';
pub const OPEN_SYMBOL: char = '.';
pub const START_SYMBOL: char = 'O';
pub const FINISH_SYMBOL: char = 'B';

/// Raised when a maze description or mutation violates the grid invariants.
#[derive(Debug)]
pub enum MazeError {
    Empty,
    RaggedLine {
        line: usize,
        expected: usize,
        found: usize,
    },
    UnknownSymbol {
        symbol: char,
        line: usize,
        column: usize,
    },
    DuplicateStart(Cell),
    DuplicateFinish(Cell),
    MissingStart,
    MissingFinish,
    OutOfBounds(Cell),
    /// A wall and an endpoint would occupy the same cell.
    EndpointConflict(Cell),
    Io(std::io::Error),
}

impl fmt::Display for MazeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MazeError::Empty => write!(f, "maze description is empty"),
            MazeError::RaggedLine {
                line,
                expected,
                found,
            } => write!(
                f,
                "line {} has {} columns, expected {}",
                line, found, expected
            ),
            MazeError::UnknownSymbol {
                symbol,
                line,
                column,
            } => write!(
                f,
                "unrecognized symbol '{}' at line {}, column {}",
                symbol, line, column
            ),
            MazeError::DuplicateStart(cell) => write!(f, "second start marker at {}", cell),
            MazeError::DuplicateFinish(cell) => write!(f, "second finish marker at {}", cell),
            MazeError::MissingStart => write!(f, "no start marker ('{}') found", START_SYMBOL),
            MazeError::MissingFinish => write!(f, "no finish marker ('{}') found", FINISH_SYMBOL),
            MazeError::OutOfBounds(cell) => write!(f, "{} is outside the grid", cell),
            MazeError::EndpointConflict(cell) => {
                write!(f, "wall and endpoint overlap at {}", cell)
            }
            MazeError::Io(e) => write!(f, "could not read maze: {}", e),
        }
    }
}

impl Error for MazeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            MazeError::Io(e) => Some(e),
            _ => None,
        }
    }
}

/// [Maze] stores the wall/open state per cell in a [BoolGrid] ([true] is a
/// wall) together with the start and finish coordinates, and maintains
/// connected components in a [UnionFind] structure so that unsolvable queries
/// can be answered without search. Constructed all-open with endpoints unset,
/// populated once, then treated as read-only while a search runs.
#[derive(Clone, Debug)]
pub struct Maze {
    grid: BoolGrid,
    start: Option<Cell>,
    finish: Option<Cell>,
    components: UnionFind<usize>,
    components_dirty: bool,
}

impl Maze {
    /// An all-open maze with unset endpoints and stale components.
    pub fn new(rows: usize, cols: usize) -> Maze {
        Maze {
            grid: BoolGrid::new(cols, rows, false),
            start: None,
            finish: None,
            components: UnionFind::new(rows * cols),
            components_dirty: true,
        }
    }

    /// Reads a maze description from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Maze, MazeError> {
        fs::read_to_string(path).map_err(MazeError::Io)?.parse()
    }

    pub fn rows(&self) -> usize {
        self.grid.height
    }

    pub fn cols(&self) -> usize {
        self.grid.width
    }

    pub fn start(&self) -> Option<Cell> {
        self.start
    }

    pub fn finish(&self) -> Option<Cell> {
        self.finish
    }

    /// Both endpoints, once the maze has been populated with them.
    pub fn endpoints(&self) -> Option<(Cell, Cell)> {
        self.start.zip(self.finish)
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.row < self.rows() && cell.col < self.cols()
    }

    /// Whether the cell holds a wall. Out-of-bounds cells count as walls.
    pub fn is_wall(&self, cell: Cell) -> bool {
        !self.in_bounds(cell) || self.grid.get(cell.col, cell.row)
    }

    pub fn is_open(&self, cell: Cell) -> bool {
        self.in_bounds(cell) && !self.grid.get(cell.col, cell.row)
    }

    /// True iff one step from `cell` in `direction` stays on the grid and
    /// lands on an open cell. No side effects.
    pub fn is_valid_move(&self, cell: Cell, direction: Direction) -> bool {
        let (dr, dc) = direction.delta();
        let row = cell.row as i64 + dr as i64;
        let col = cell.col as i64 + dc as i64;
        row >= 0
            && col >= 0
            && self.is_open(Cell::new(row as usize, col as usize))
    }

    /// The coordinate one step from `cell` in `direction`, without bounds
    /// checking: callers must have confirmed the move via
    /// [is_valid_move](Self::is_valid_move) first.
    pub fn neighbor(&self, cell: Cell, direction: Direction) -> Cell {
        debug_assert!(self.is_valid_move(cell, direction));
        let (dr, dc) = direction.delta();
        Cell::new(
            (cell.row as i64 + dr as i64) as usize,
            (cell.col as i64 + dc as i64) as usize,
        )
    }

    /// Places or clears a wall. Marks the components as stale.
    pub fn set_wall(&mut self, cell: Cell, wall: bool) -> Result<(), MazeError> {
        if !self.in_bounds(cell) {
            return Err(MazeError::OutOfBounds(cell));
        }
        if wall && (self.start == Some(cell) || self.finish == Some(cell)) {
            return Err(MazeError::EndpointConflict(cell));
        }
        self.grid.set(cell.col, cell.row, wall);
        self.components_dirty = true;
        Ok(())
    }

    pub fn set_start(&mut self, cell: Cell) -> Result<(), MazeError> {
        if !self.in_bounds(cell) {
            return Err(MazeError::OutOfBounds(cell));
        }
        if self.is_wall(cell) {
            return Err(MazeError::EndpointConflict(cell));
        }
        self.start = Some(cell);
        Ok(())
    }

    pub fn set_finish(&mut self, cell: Cell) -> Result<(), MazeError> {
        if !self.in_bounds(cell) {
            return Err(MazeError::OutOfBounds(cell));
        }
        if self.is_wall(cell) {
            return Err(MazeError::EndpointConflict(cell));
        }
        self.finish = Some(cell);
        Ok(())
    }

    fn cell_ix(&self, cell: Cell) -> usize {
        self.grid.get_ix(cell.col, cell.row)
    }

    /// Generates a new [UnionFind] structure and links up open grid
    /// neighbours to the same components.
    pub fn generate_components(&mut self) {
        self.components = UnionFind::new(self.rows() * self.cols());
        self.components_dirty = false;
        for row in 0..self.rows() {
            for col in 0..self.cols() {
                let cell = Cell::new(row, col);
                if self.is_wall(cell) {
                    continue;
                }
                // East and south spans are enough to connect the 4-neighborhood.
                for direction in [Direction::East, Direction::South] {
                    if self.is_valid_move(cell, direction) {
                        let neighbor = self.neighbor(cell, direction);
                        self.components
                            .union(self.cell_ix(cell), self.cell_ix(neighbor));
                    }
                }
            }
        }
    }

    /// Regenerates the components if they are marked as stale.
    pub fn update(&mut self) {
        if self.components_dirty {
            self.generate_components();
        }
    }

    /// Whether two cells are known to lie on different components. Answers
    /// [false] while the component data is stale, leaving the decision to the
    /// search itself.
    pub fn unreachable(&self, a: &Cell, b: &Cell) -> bool {
        if self.components_dirty {
            return false;
        }
        if !self.in_bounds(*a) || !self.in_bounds(*b) {
            return true;
        }
        !self.components.equiv(self.cell_ix(*a), self.cell_ix(*b))
    }
}

impl FromStr for Maze {
    type Err = MazeError;

    /// Parses the plain-text grid format: one row per line, `#` wall, `.`
    /// open, `O` start, `B` finish. Lines must be of equal length, both
    /// markers must occur exactly once, and unrecognized symbols are
    /// rejected.
    fn from_str(s: &str) -> Result<Maze, MazeError> {
        let lines: Vec<&str> = s.lines().map(|l| l.trim_end_matches('\r')).collect();
        let cols = lines.first().map_or(0, |l| l.chars().count());
        if lines.is_empty() || cols == 0 {
            return Err(MazeError::Empty);
        }
        let mut maze = Maze::new(lines.len(), cols);
        for (row, line) in lines.iter().enumerate() {
            let found = line.chars().count();
            if found != cols {
                return Err(MazeError::RaggedLine {
                    line: row + 1,
                    expected: cols,
                    found,
                });
            }
            for (col, symbol) in line.chars().enumerate() {
                let cell = Cell::new(row, col);
                match symbol {
                    WALL_SYMBOL => maze.grid.set(col, row, true),
                    OPEN_SYMBOL => {}
                    START_SYMBOL => {
                        if maze.start.is_some() {
                            return Err(MazeError::DuplicateStart(cell));
                        }
                        maze.start = Some(cell);
                    }
                    FINISH_SYMBOL => {
                        if maze.finish.is_some() {
                            return Err(MazeError::DuplicateFinish(cell));
                        }
                        maze.finish = Some(cell);
                    }
                    _ => {
                        return Err(MazeError::UnknownSymbol {
                            symbol,
                            line: row + 1,
                            column: col + 1,
                        })
                    }
                }
            }
        }
        if maze.start.is_none() {
            return Err(MazeError::MissingStart);
        }
        if maze.finish.is_none() {
            return Err(MazeError::MissingFinish);
        }
        maze.generate_components();
        info!("loaded {}x{} maze", maze.rows(), maze.cols());
        Ok(maze)
    }
}

impl fmt::Display for Maze {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in 0..self.rows() {
            for col in 0..self.cols() {
                let cell = Cell::new(row, col);
                let symbol = if self.start == Some(cell) {
                    START_SYMBOL
                } else if self.finish == Some(cell) {
                    FINISH_SYMBOL
                } else if self.is_wall(cell) {
                    WALL_SYMBOL
                } else {
                    OPEN_SYMBOL
                };
                write!(f, "{}", symbol)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_populates_grid_and_endpoints() {
        let maze: Maze = "O.#\n.#.\n..B".parse().unwrap();
        assert_eq!((maze.rows(), maze.cols()), (3, 3));
        assert_eq!(maze.start(), Some(Cell::new(0, 0)));
        assert_eq!(maze.finish(), Some(Cell::new(2, 2)));
        assert!(maze.is_wall(Cell::new(0, 2)));
        assert!(maze.is_wall(Cell::new(1, 1)));
        assert!(maze.is_open(Cell::new(1, 0)));
        // Endpoint cells are open.
        assert!(maze.is_open(Cell::new(0, 0)));
        assert!(maze.is_open(Cell::new(2, 2)));
    }

    #[test]
    fn display_round_trips() {
        let text = "O.#\n.#.\n..B\n";
        let maze: Maze = text.parse().unwrap();
        assert_eq!(maze.to_string(), text);
    }

    #[test]
    fn parse_rejects_malformed_input() {
        assert!(matches!("".parse::<Maze>(), Err(MazeError::Empty)));
        assert!(matches!(
            "O..\n..\n..B".parse::<Maze>(),
            Err(MazeError::RaggedLine {
                line: 2,
                expected: 3,
                found: 2
            })
        ));
        assert!(matches!(
            "O.x\n..B".parse::<Maze>(),
            Err(MazeError::UnknownSymbol {
                symbol: 'x',
                line: 1,
                column: 3
            })
        ));
        assert!(matches!(
            "OO\n.B".parse::<Maze>(),
            Err(MazeError::DuplicateStart(_))
        ));
        assert!(matches!(
            "OB\n.B".parse::<Maze>(),
            Err(MazeError::DuplicateFinish(_))
        ));
        assert!(matches!(
            "..\n.B".parse::<Maze>(),
            Err(MazeError::MissingStart)
        ));
        assert!(matches!(
            "O.\n..".parse::<Maze>(),
            Err(MazeError::MissingFinish)
        ));
    }

    #[test]
    fn valid_moves_respect_bounds_and_walls() {
        let maze: Maze = "O.\n#B".parse().unwrap();
        let origin = Cell::new(0, 0);
        assert!(maze.is_valid_move(origin, Direction::East));
        // South is walled, west and north leave the grid.
        assert!(!maze.is_valid_move(origin, Direction::South));
        assert!(!maze.is_valid_move(origin, Direction::West));
        assert!(!maze.is_valid_move(origin, Direction::North));
        let corner = Cell::new(1, 1);
        assert!(maze.is_valid_move(corner, Direction::North));
        assert!(!maze.is_valid_move(corner, Direction::East));
        assert!(!maze.is_valid_move(corner, Direction::South));
        assert!(!maze.is_valid_move(corner, Direction::West));
    }

    #[test]
    fn neighbor_steps_one_cell() {
        let maze: Maze = "O.\n.B".parse().unwrap();
        let origin = Cell::new(0, 0);
        assert_eq!(maze.neighbor(origin, Direction::East), Cell::new(0, 1));
        assert_eq!(maze.neighbor(origin, Direction::South), Cell::new(1, 0));
    }

    #[test]
    fn endpoint_invariants_enforced() {
        let mut maze = Maze::new(2, 2);
        maze.set_wall(Cell::new(1, 0), true).unwrap();
        assert!(matches!(
            maze.set_start(Cell::new(1, 0)),
            Err(MazeError::EndpointConflict(_))
        ));
        assert!(matches!(
            maze.set_start(Cell::new(5, 0)),
            Err(MazeError::OutOfBounds(_))
        ));
        maze.set_start(Cell::new(0, 0)).unwrap();
        assert!(matches!(
            maze.set_wall(Cell::new(0, 0), true),
            Err(MazeError::EndpointConflict(_))
        ));
    }

    #[test]
    fn components_separate_walled_regions() {
        let maze: Maze = "O.#.\n..#B".parse().unwrap();
        let left = Cell::new(1, 1);
        let right = Cell::new(0, 3);
        assert!(!maze.unreachable(&Cell::new(0, 0), &left));
        assert!(maze.unreachable(&Cell::new(0, 0), &right));
    }

    #[test]
    fn stale_components_answer_conservatively() {
        let mut maze = Maze::new(2, 2);
        maze.set_wall(Cell::new(0, 1), true).unwrap();
        maze.set_wall(Cell::new(1, 0), true).unwrap();
        // Not regenerated yet, so nothing is known to be unreachable.
        assert!(!maze.unreachable(&Cell::new(0, 0), &Cell::new(1, 1)));
        maze.update();
        assert!(maze.unreachable(&Cell::new(0, 0), &Cell::new(1, 1)));
    }
}
