// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Streamwall and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Grid state as a URL query string.
//!
//! `rows=<r>&columns=<c>[&backend=<loc>]` followed by one `&<keyword>=<value><extras>` per cell.
//! Interior blank cells are written as a bare `&blank` so later cells keep their position;
//! trailing blanks are omitted.

use std::borrow::Cow;
use std::fmt;

use url::form_urlencoded;

use crate::directory::Directory;
use crate::model::{checked_capacity, Grid, GridError, StreamRef, StreamType};
use crate::resolve::{explicit_ref, resolve, ResolveError};

const ROWS: &str = "rows";
const COLUMNS: &str = "columns";
const BACKEND: &str = "backend";
const BLANK: &str = "blank";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlState {
    pub grid: Grid,
    /// Backend location override carried in the URL.
    pub backend: Option<String>,
}

impl UrlState {
    pub fn new(grid: Grid) -> Self {
        Self { grid, backend: None }
    }

    /// Equality that ignores the grid revision.
    pub fn content_eq(&self, other: &Self) -> bool {
        self.grid.content_eq(&other.grid) && self.backend == other.backend
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// `rows` or `columns` is absent; the UI prompts for a layout.
    MissingDimensions,
    InvalidDimensions { rows: String, columns: String },
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingDimensions => f.write_str("query has no rows/columns"),
            Self::InvalidDimensions { rows, columns } => {
                write!(f, "invalid grid dimensions (rows={rows:?}, columns={columns:?})")
            }
        }
    }
}

impl std::error::Error for QueryError {}

impl QueryError {
    fn invalid(rows: &str, columns: &str) -> Self {
        Self::InvalidDimensions { rows: rows.to_owned(), columns: columns.to_owned() }
    }
}

pub fn serialize(state: &UrlState) -> String {
    let grid = &state.grid;
    let mut numbers = itoa::Buffer::new();
    let mut out = String::with_capacity(32 + grid.capacity() * 24);

    out.push_str(ROWS);
    out.push('=');
    out.push_str(numbers.format(grid.rows()));
    out.push('&');
    out.push_str(COLUMNS);
    out.push('=');
    out.push_str(numbers.format(grid.columns()));

    if let Some(backend) = &state.backend {
        out.push('&');
        out.push_str(BACKEND);
        out.push('=');
        out.extend(form_urlencoded::byte_serialize(backend.as_bytes()));
    }

    let used = grid.cells().iter().rposition(|cell| !cell.is_blank()).map_or(0, |last| last + 1);
    for cell in &grid.cells()[..used] {
        out.push('&');
        match cell.value() {
            None => out.push_str(BLANK),
            Some(value) => {
                out.push_str(cell.kind().keyword());
                out.push('=');
                out.extend(form_urlencoded::byte_serialize(value.as_bytes()));
                out.push_str(cell.extras());
            }
        }
    }

    out
}

struct Param<'a> {
    raw: &'a str,
    key: Cow<'a, str>,
    value: Cow<'a, str>,
    has_value: bool,
}

fn params(query: &str) -> impl Iterator<Item = Param<'_>> {
    let query = query.strip_prefix('?').unwrap_or(query);
    query.split('&').filter(|raw| !raw.is_empty()).filter_map(|raw| {
        let (key, value) = form_urlencoded::parse(raw.as_bytes()).next()?;
        let has_value = memchr::memchr(b'=', raw.as_bytes()).is_some();
        Some(Param { raw, key, value, has_value })
    })
}

/// Parses a query into grid state. Parameters that are neither dimensions nor references become
/// extras on the most recently filled cell.
pub fn deserialize(query: &str, directory: &Directory) -> Result<UrlState, QueryError> {
    let mut rows = None;
    let mut columns = None;
    for param in params(query) {
        match param.key.as_ref() {
            ROWS if rows.is_none() => rows = Some(param.value),
            COLUMNS if columns.is_none() => columns = Some(param.value),
            _ => {}
        }
    }
    let (Some(rows_text), Some(columns_text)) = (rows, columns) else {
        return Err(QueryError::MissingDimensions);
    };
    let parse = |text: &str| text.trim().parse::<usize>().ok();
    let (Some(row_count), Some(column_count)) = (parse(&rows_text), parse(&columns_text)) else {
        return Err(QueryError::invalid(&rows_text, &columns_text));
    };
    let invalid = |_: GridError| QueryError::invalid(&rows_text, &columns_text);
    let capacity = checked_capacity(row_count, column_count).map_err(invalid)?;

    let mut backend = None;
    let mut cells: Vec<StreamRef> = Vec::with_capacity(capacity);
    // Index of the cell that receives trailing extras; cleared once a reference is dropped.
    let mut extras_target: Option<usize> = None;

    let place = |cells: &mut Vec<StreamRef>, stream: StreamRef| -> Option<usize> {
        if cells.len() >= capacity {
            return None;
        }
        cells.push(stream);
        Some(cells.len() - 1)
    };

    for param in params(query) {
        match param.key.as_ref() {
            ROWS | COLUMNS => {}
            BACKEND => backend = Some(param.value.into_owned()),
            BLANK => {
                if place(&mut cells, StreamRef::blank()).is_none() {
                    extras_target = None;
                }
            }
            _ => {
                // Decoded values may contain `&`; only the raw text splits into extras.
                let resolved = match StreamType::from_keyword(&param.key) {
                    Some(kind) if param.has_value => explicit_ref(kind, &param.value),
                    _ if param.has_value => {
                        resolve(&format!("{}={}", param.key, param.value), directory)
                    }
                    _ => resolve(&param.key, directory),
                };
                match resolved {
                    Ok(stream) if stream.is_blank() => {
                        if place(&mut cells, stream).is_none() {
                            extras_target = None;
                        }
                    }
                    Ok(stream) => extras_target = place(&mut cells, stream),
                    Err(ResolveError::Unrecognized(_)) => {
                        if let Some(cell) = extras_target.and_then(|index| cells.get_mut(index)) {
                            cell.push_extras("&");
                            cell.push_extras(param.raw);
                        }
                    }
                    Err(ResolveError::Empty | ResolveError::MissingValue(_)) => {}
                }
            }
        }
    }

    let grid = Grid::with_cells(row_count, column_count, cells).map_err(invalid)?;
    Ok(UrlState { grid, backend })
}
