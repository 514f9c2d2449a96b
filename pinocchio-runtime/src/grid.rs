//  GRID.rs
//    The discrete grid a normative agent moves through, and the plain
//    text map format it is loaded from.
//

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};


/***** CELL TYPES *****/
/// The type of terrain at a grid cell. Movement semantics and per-action
/// speed penalties key off this.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellType {
    Wall,
    Road,
    /// Unpaved terrain — slower, and the origin of the "pavement" flag in
    /// the speeding scenario.
    Pavement,
}

impl CellType {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '#' => Some(CellType::Wall),
            ' ' => Some(CellType::Road),
            '-' => Some(CellType::Pavement),
            _ => None,
        }
    }

    fn symbol(self) -> char {
        match self {
            CellType::Wall => '#',
            CellType::Road => ' ',
            CellType::Pavement => '-',
        }
    }
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.symbol()) }
}


/***** GRID *****/
/// A rectangular grid of [`CellType`]s, row-major (`cell(x, y)` indexes
/// row `y`, column `x`).
#[derive(Clone, Debug)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<CellType>,
    /// Cached at load time so the driver never rehashes the layout on
    /// every step.
    layout_hash: u64,
}

/// Errors raised while parsing a grid map file.
#[derive(Debug)]
pub enum GridError {
    Empty,
    RaggedRow { row: usize, expected: usize, got: usize },
    UnknownSymbol { row: usize, col: usize, symbol: char },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::Empty => write!(f, "grid map file has no rows"),
            GridError::RaggedRow { row, expected, got } => write!(f, "row {row} has width {got}, expected {expected} (from the first row)"),
            GridError::UnknownSymbol { row, col, symbol } => write!(f, "unknown symbol '{symbol}' at ({col}, {row})"),
        }
    }
}
impl std::error::Error for GridError {}

impl Grid {
    /// Parses a grid from plain text: one row per line, `#` wall, ` `
    /// road, `-` pavement. Width is the length of the first line
    /// (trailing whitespace stripped); height is the number of lines.
    pub fn parse(text: &str) -> Result<Self, GridError> {
        let lines: Vec<&str> = text.lines().map(str::trim_end).collect();
        let Some(first) = lines.first() else { return Err(GridError::Empty) };
        let width = first.chars().count();
        let height = lines.len();

        let mut cells = Vec::with_capacity(width * height);
        for (row, line) in lines.iter().enumerate() {
            let got = line.chars().count();
            if got != width {
                return Err(GridError::RaggedRow { row, expected: width, got });
            }
            for (col, c) in line.chars().enumerate() {
                let cell = CellType::from_char(c).ok_or(GridError::UnknownSymbol { row, col, symbol: c })?;
                cells.push(cell);
            }
        }

        let mut hasher = DefaultHasher::new();
        for c in &cells {
            c.hash(&mut hasher);
        }
        width.hash(&mut hasher);
        height.hash(&mut hasher);

        Ok(Self { width, height, cells, layout_hash: hasher.finish() })
    }

    pub fn width(&self) -> usize { self.width }
    pub fn height(&self) -> usize { self.height }
    pub fn layout_hash(&self) -> u64 { self.layout_hash }

    pub fn cell(&self, x: i64, y: i64) -> Option<CellType> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        self.cells.get(y as usize * self.width + x as usize).copied()
    }

    pub fn in_bounds(&self, x: i64, y: i64) -> bool { x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height }

    pub fn is_walkable(&self, x: i64, y: i64) -> bool { matches!(self.cell(x, y), Some(c) if c != CellType::Wall) }
}


/***** TESTS *****/
