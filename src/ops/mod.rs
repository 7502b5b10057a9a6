// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Streamwall and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Mutation operations for the wall grid, plus its URL query encoding.
//!
//! Operations are applied with optimistic concurrency (revision checks) and produce a delta the
//! UI uses to reload only the cells whose content changed.

use std::fmt;

use crate::model::{checked_capacity, Grid, GridError, StreamRef};

pub mod query;

pub use query::{deserialize, serialize, QueryError, UrlState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridOp {
    /// Setting a blank ref clears the cell.
    Set { index: usize, stream: StreamRef },
    Clear { index: usize },
    Swap { a: usize, b: usize },
    Copy { from: usize, to: usize },
    Resize { rows: usize, columns: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyResult {
    pub new_rev: u64,
    pub applied: usize,
    pub delta: CellDelta,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CellMove {
    pub from: usize,
    pub to: usize,
}

/// Cell-level changes between the grid before and after a batch.
///
/// Moved embeds keep playing; only `set` cells need a fresh player.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CellDelta {
    pub set: Vec<usize>,
    pub cleared: Vec<usize>,
    pub moved: Vec<CellMove>,
    /// Content that no longer fits after a shrinking resize.
    pub dropped: Vec<StreamRef>,
}

impl CellDelta {
    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
            && self.cleared.is_empty()
            && self.moved.is_empty()
            && self.dropped.is_empty()
    }
}

/// Working copy of the cells, each tagged with the pre-batch index its content came from.
#[derive(Debug)]
struct Staged {
    rows: usize,
    columns: usize,
    cells: Vec<StreamRef>,
    origin: Vec<Option<usize>>,
    dropped: Vec<StreamRef>,
}

impl Staged {
    fn new(grid: &Grid) -> Self {
        Self {
            rows: grid.rows(),
            columns: grid.columns(),
            cells: grid.cells().to_vec(),
            origin: (0..grid.capacity()).map(Some).collect(),
            dropped: Vec::new(),
        }
    }

    fn check(&self, index: usize) -> Result<(), ApplyError> {
        if index < self.cells.len() {
            Ok(())
        } else {
            Err(ApplyError::OutOfBounds { index, capacity: self.cells.len() })
        }
    }

    fn finish(self, before: &[StreamRef]) -> (Vec<StreamRef>, CellDelta) {
        let mut delta = CellDelta { dropped: self.dropped, ..CellDelta::default() };

        for (index, cell) in self.cells.iter().enumerate() {
            let previous = before.get(index);
            if cell.is_blank() {
                if previous.is_some_and(|previous| !previous.is_blank()) {
                    delta.cleared.push(index);
                }
                continue;
            }
            match self.origin[index] {
                Some(from) if from == index => {}
                Some(from) => delta.moved.push(CellMove { from, to: index }),
                None if previous == Some(cell) => {}
                None => delta.set.push(index),
            }
        }

        (self.cells, delta)
    }
}

pub fn apply_ops(
    grid: &mut Grid,
    base_rev: u64,
    ops: &[GridOp],
) -> Result<ApplyResult, ApplyError> {
    let current_rev = grid.rev();
    if base_rev != current_rev {
        return Err(ApplyError::Conflict { base_rev, current_rev });
    }

    if ops.is_empty() {
        return Ok(ApplyResult { new_rev: current_rev, applied: 0, delta: CellDelta::default() });
    }

    let mut staged = Staged::new(grid);
    for op in ops {
        apply_op(&mut staged, op)?;
    }

    let (rows, columns) = (staged.rows, staged.columns);
    let (cells, delta) = staged.finish(grid.cells());
    grid.set_dimensions(rows, columns);
    *grid.cells_mut() = cells;
    grid.bump_rev();

    Ok(ApplyResult { new_rev: grid.rev(), applied: ops.len(), delta })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyError {
    Conflict { base_rev: u64, current_rev: u64 },
    OutOfBounds { index: usize, capacity: usize },
    InvalidDimensions(GridError),
}

impl fmt::Display for ApplyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conflict { base_rev, current_rev } => {
                write!(f, "stale base_rev (base_rev={base_rev}, current_rev={current_rev})")
            }
            Self::OutOfBounds { index, capacity } => {
                write!(f, "cell index {index} out of bounds (capacity={capacity})")
            }
            Self::InvalidDimensions(err) => write!(f, "invalid dimensions: {err}"),
        }
    }
}

impl std::error::Error for ApplyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidDimensions(err) => Some(err),
            _ => None,
        }
    }
}

// Extracted per-op implementation used by `apply_ops`.
include!("ops_impl.rs");

#[cfg(test)]
mod tests;
