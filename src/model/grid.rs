// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Streamwall and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use super::stream_ref::StreamRef;

/// Upper bound on `rows * columns`; dimensions come from untrusted URLs.
pub const MAX_CELLS: usize = 1024;

/// Rectangular wall of cells in row-major order.
///
/// `cells.len() == rows * columns` holds at all times; the revision counter is bumped once per
/// applied batch of operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    columns: usize,
    cells: Vec<StreamRef>,
    rev: u64,
}

impl Grid {
    pub fn new(rows: usize, columns: usize) -> Result<Self, GridError> {
        let capacity = checked_capacity(rows, columns)?;
        Ok(Self { rows, columns, cells: vec![StreamRef::blank(); capacity], rev: 0 })
    }

    /// Builds a grid from a cell list, padding with blanks. Surplus cells are dropped.
    pub fn with_cells(
        rows: usize,
        columns: usize,
        cells: impl IntoIterator<Item = StreamRef>,
    ) -> Result<Self, GridError> {
        let capacity = checked_capacity(rows, columns)?;
        let mut cells = cells.into_iter().take(capacity).collect::<Vec<_>>();
        cells.resize(capacity, StreamRef::blank());
        Ok(Self { rows, columns, cells, rev: 0 })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    pub fn rev(&self) -> u64 {
        self.rev
    }

    pub fn cells(&self) -> &[StreamRef] {
        &self.cells
    }

    pub fn cell(&self, index: usize) -> Option<&StreamRef> {
        self.cells.get(index)
    }

    pub fn filled(&self) -> impl Iterator<Item = (usize, &StreamRef)> {
        self.cells.iter().enumerate().filter(|(_, cell)| !cell.is_blank())
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(StreamRef::is_blank)
    }

    /// Same content with the revision reset, for comparing states across round trips.
    pub fn content_eq(&self, other: &Self) -> bool {
        self.rows == other.rows && self.columns == other.columns && self.cells == other.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut Vec<StreamRef> {
        &mut self.cells
    }

    pub(crate) fn set_dimensions(&mut self, rows: usize, columns: usize) {
        self.rows = rows;
        self.columns = columns;
    }

    pub(crate) fn bump_rev(&mut self) {
        self.rev = self.rev.saturating_add(1);
    }
}

pub fn checked_capacity(rows: usize, columns: usize) -> Result<usize, GridError> {
    if rows == 0 || columns == 0 {
        return Err(GridError::ZeroDimension { rows, columns });
    }
    match rows.checked_mul(columns) {
        Some(capacity) if capacity <= MAX_CELLS => Ok(capacity),
        _ => Err(GridError::TooLarge { rows, columns }),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    ZeroDimension { rows: usize, columns: usize },
    TooLarge { rows: usize, columns: usize },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroDimension { rows, columns } => {
                write!(f, "grid dimensions must be positive (rows={rows}, columns={columns})")
            }
            Self::TooLarge { rows, columns } => {
                write!(f, "grid of {rows}x{columns} exceeds {MAX_CELLS} cells")
            }
        }
    }
}

impl std::error::Error for GridError {}
