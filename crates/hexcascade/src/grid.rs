//! Cell representation and raw board storage.
//!
//! Storage is a flat column-major `Vec` (`idx(col,row) = col*rows + row`),
//! the same layout the teacher's `Grid` uses for its tile storage — cells
//! are plain values, not a pointer graph; selections reference them by
//! `(col, row)`, never by back-pointer.

use serde::{Deserialize, Serialize};

/// Sentinel colors used outside the regular `0..palette_size` range.
pub const STARFLOWER_COLOR: i8 = -1;
pub const BLACK_PEARL_COLOR: i8 = -2;

/// A closed tagged union for what makes a cell special, replacing a
/// duck-typed "special" string. A bomb's timer lives inside its own
/// variant rather than as a separate optional field on `Cell`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Special {
    None,
    Starflower,
    BlackPearl,
    Bomb { timer: u32 },
    Multiplier,
}

impl Special {
    pub fn is_bomb(&self) -> bool {
        matches!(self, Special::Bomb { .. })
    }

    pub fn is_blocker(&self) -> bool {
        matches!(self, Special::Starflower | Special::BlackPearl)
    }
}

/// An occupied grid square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub color: i8,
    pub special: Special,
}

impl Cell {
    pub fn regular(color: u8) -> Self {
        Cell {
            color: color as i8,
            special: Special::None,
        }
    }

    pub fn starflower() -> Self {
        Cell {
            color: STARFLOWER_COLOR,
            special: Special::Starflower,
        }
    }

    pub fn black_pearl() -> Self {
        Cell {
            color: BLACK_PEARL_COLOR,
            special: Special::BlackPearl,
        }
    }

    pub fn is_starflower(&self) -> bool {
        matches!(self.special, Special::Starflower)
    }

    pub fn is_black_pearl(&self) -> bool {
        matches!(self.special, Special::BlackPearl)
    }

    /// Starflowers and black pearls never take part in line/triangle
    /// matches or color nukes.
    pub fn is_blocker(&self) -> bool {
        self.special.is_blocker()
    }

    pub fn bomb_timer(&self) -> Option<u32> {
        match self.special {
            Special::Bomb { timer } => Some(timer),
            _ => None,
        }
    }
}

/// The board grid: a mapping from `(col,row)` to `Option<Cell>`. `None`
/// means an empty slot — only transient, during a cascade.
#[derive(Debug, Clone)]
pub struct Board {
    pub cols: usize,
    pub rows: usize,
    cells: Vec<Option<Cell>>,
}

impl Board {
    pub fn empty(cols: usize, rows: usize) -> Self {
        Board {
            cols,
            rows,
            cells: vec![None; cols * rows],
        }
    }

    #[inline]
    fn idx(&self, col: usize, row: usize) -> usize {
        col * self.rows + row
    }

    pub fn in_bounds(&self, col: i32, row: i32) -> bool {
        col >= 0 && row >= 0 && (col as usize) < self.cols && (row as usize) < self.rows
    }

    pub fn get(&self, col: usize, row: usize) -> Option<Cell> {
        self.cells[self.idx(col, row)]
    }

    pub fn get_signed(&self, col: i32, row: i32) -> Option<Cell> {
        if self.in_bounds(col, row) {
            self.get(col as usize, row as usize)
        } else {
            None
        }
    }

    pub fn set(&mut self, col: usize, row: usize, cell: Option<Cell>) {
        let i = self.idx(col, row);
        self.cells[i] = cell;
    }

    pub fn is_empty_at(&self, col: usize, row: usize) -> bool {
        self.get(col, row).is_none()
    }

    /// Iterate every occupied `(col, row, cell)`.
    pub fn iter_occupied(&self) -> impl Iterator<Item = (usize, usize, Cell)> + '_ {
        (0..self.cols).flat_map(move |col| {
            (0..self.rows).filter_map(move |row| self.get(col, row).map(|c| (col, row, c)))
        })
    }

    /// Copy a cell from one position to another (used by gravity).
    pub fn move_cell(&mut self, from: (usize, usize), to: (usize, usize)) {
        let cell = self.get(from.0, from.1);
        self.set(from.0, from.1, None);
        self.set(to.0, to.1, cell);
    }
}
