use std::fmt;
use std::ops::{Index, IndexMut};

/// State of a single module while a symbol is assembled.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Debug)]
pub enum Cell {
    Unset,              // not assigned yet, only seen during construction
    Data(bool),         // data or error correction bit, subject to masking
    Function(bool),     // structural module (finder, timing, format...), never masked
}

impl Cell {
    /// Resolved colour of the module. Unset modules count as light.
    pub fn is_dark(self) -> bool {
        match self {
            Cell::Data(v) | Cell::Function(v) => v,
            Cell::Unset => false
        }
    }

    pub fn is_function(self) -> bool {
        matches!(self, Cell::Function(_))
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::Unset
    }
}

/// Square module matrix of a QR symbol, indexed by (x, y) i.e. (column, row).
#[derive(Clone, Eq, PartialEq)]
pub struct QrMatrix {
    version: u8,
    size: usize,
    cells: Vec<Cell>,
}

impl QrMatrix {
    /// Create an all-unset matrix for the given version.
    pub fn new(version: u8) -> QrMatrix {
        let size = 17 + 4 * version as usize;
        QrMatrix { version, size, cells: vec![Cell::Unset; size * size] }
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    /// Number of modules per side
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `None` outside of the symbol.
    pub fn get(&self, x: usize, y: usize) -> Option<Cell> {
        if x < self.size && y < self.size {
            Some(self.cells[y * self.size + x])
        } else {
            None
        }
    }

    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        self.get(x, y).map_or(false, Cell::is_dark)
    }

    /// Iterate over all cells in row-major order together with their coordinates.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, Cell)> + '_ {
        let size = self.size;
        self.cells.iter().enumerate().map(move |(i, &c)| (i % size, i / size, c))
    }

    pub fn cells_mut(&mut self) -> impl Iterator<Item = (usize, usize, &mut Cell)> + '_ {
        let size = self.size;
        self.cells.iter_mut().enumerate().map(move |(i, c)| (i % size, i / size, c))
    }

    pub fn count(&self, pred: impl Fn(Cell) -> bool) -> usize {
        self.cells.iter().filter(|&&c| pred(c)).count()
    }

    /// Resolved colours, one `Vec` per row
    pub fn to_rows(&self) -> Vec<Vec<bool>> {
        self.cells.chunks(self.size)
            .map(|row| row.iter().map(|c| c.is_dark()).collect())
            .collect()
    }
}

impl Index<(usize, usize)> for QrMatrix {
    type Output = Cell;

    fn index(&self, (x, y): (usize, usize)) -> &Cell {
        assert!(x < self.size && y < self.size, "module ({}, {}) outside of symbol", x, y);
        &self.cells[y * self.size + x]
    }
}

impl IndexMut<(usize, usize)> for QrMatrix {
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut Cell {
        assert!(x < self.size && y < self.size, "module ({}, {}) outside of symbol", x, y);
        &mut self.cells[y * self.size + x]
    }
}

impl fmt::Debug for QrMatrix {
    /// One line per row; '#' dark, '.' light, '?' unset.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "QrMatrix(version {}, {}x{})", self.version, self.size, self.size)?;
        for row in self.cells.chunks(self.size) {
            for cell in row {
                let ch = match cell {
                    Cell::Unset => '?',
                    c if c.is_dark() => '#',
                    _ => '.',
                };
                write!(f, "{}", ch)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
