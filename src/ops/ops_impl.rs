// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Streamwall and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Per-op application on the staged copy used by `apply_ops`.
/// Keeps `ops::mod` focused on public op types and orchestration.
fn apply_op(staged: &mut Staged, op: &GridOp) -> Result<(), ApplyError> {
    match op {
        GridOp::Set { index, stream } => {
            staged.check(*index)?;
            staged.cells[*index] = stream.clone();
            staged.origin[*index] = None;
            Ok(())
        }
        GridOp::Clear { index } => {
            staged.check(*index)?;
            staged.cells[*index] = StreamRef::blank();
            staged.origin[*index] = None;
            Ok(())
        }
        GridOp::Swap { a, b } => {
            staged.check(*a)?;
            staged.check(*b)?;
            if a != b {
                staged.cells.swap(*a, *b);
                staged.origin.swap(*a, *b);
            }
            Ok(())
        }
        GridOp::Copy { from, to } => {
            staged.check(*from)?;
            staged.check(*to)?;
            if from != to {
                staged.cells[*to] = staged.cells[*from].clone();
                staged.origin[*to] = None;
            }
            Ok(())
        }
        GridOp::Resize { rows, columns } => resize(staged, *rows, *columns),
    }
}

/// Shrinking moves each overflowing non-blank cell into the first blank slot that survives;
/// whatever does not fit is reported as dropped.
fn resize(staged: &mut Staged, rows: usize, columns: usize) -> Result<(), ApplyError> {
    let capacity = checked_capacity(rows, columns).map_err(ApplyError::InvalidDimensions)?;

    for index in capacity..staged.cells.len() {
        if staged.cells[index].is_blank() {
            continue;
        }
        match staged.cells[..capacity].iter().position(StreamRef::is_blank) {
            Some(slot) => {
                staged.cells.swap(index, slot);
                staged.origin.swap(index, slot);
            }
            None => staged.dropped.push(staged.cells[index].clone()),
        }
    }

    staged.cells.resize(capacity, StreamRef::blank());
    staged.origin.resize(capacity, None);
    staged.rows = rows;
    staged.columns = columns;
    Ok(())
}
