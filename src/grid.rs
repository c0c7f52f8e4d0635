//! Board geometry for the lucky-tile games.
//!
//! Cells are numbered row-major: `index = row * cols + col`, which matches the
//! order tiles are laid out on the page.

use crate::error::GridError;
use serde::{Deserialize, Serialize};

/// Distance metric used to grade a cell against a zone centre.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Sum of row and column deltas (diamond rings).
    #[serde(alias = "manhattan")]
    Grid,
    /// Max of row and column deltas (square rings).
    Chebyshev,
}

impl Metric {
    /// Parse the name used by the page scripts.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "grid" | "manhattan" => Some(Metric::Grid),
            "chebyshev" => Some(Metric::Chebyshev),
            _ => None,
        }
    }

    #[inline(always)]
    pub fn between(self, a: Position, b: Position) -> usize {
        let dr = a.row.abs_diff(b.row);
        let dc = a.col.abs_diff(b.col);
        match self {
            Metric::Grid => dr + dc,
            Metric::Chebyshev => dr.max(dc),
        }
    }
}

/// A cell's place on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

/// Validated `cols x rows` board with at least one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridDims {
    pub cols: usize,
    pub rows: usize,
}

impl GridDims {
    pub fn new(cols: usize, rows: usize) -> Result<Self, GridError> {
        if cols == 0 || rows == 0 {
            return Err(GridError::EmptyGrid { cols, rows });
        }
        Ok(Self { cols, rows })
    }

    #[inline(always)]
    pub fn count(&self) -> usize {
        self.cols * self.rows
    }

    pub fn check(&self, cell: usize) -> Result<usize, GridError> {
        if cell < self.count() {
            Ok(cell)
        } else {
            Err(GridError::CellOutOfRange { cell, count: self.count() })
        }
    }

    #[inline(always)]
    pub fn position(&self, cell: usize) -> Position {
        Position { row: cell / self.cols, col: cell % self.cols }
    }

    #[inline(always)]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    /// Distance between two cells. Both must be in range.
    #[inline(always)]
    pub fn distance(&self, metric: Metric, a: usize, b: usize) -> usize {
        metric.between(self.position(a), self.position(b))
    }

    /// Distance from `centre` to every cell, indexed by cell.
    pub fn distances_from(&self, metric: Metric, centre: usize) -> Vec<usize> {
        let origin = self.position(centre);
        (0..self.count())
            .map(|cell| metric.between(self.position(cell), origin))
            .collect()
    }
}
