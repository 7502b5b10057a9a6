// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Streamwall and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{read_json, write_atomic, StoreError, WriteDurability};

/// Settings that outlive a session.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalState {
    /// Link of the last cut or deleted cell.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clipboard: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend_location: Option<String>,
    pub backend_enabled: bool,
}

/// Key-value store backed by one JSON file, rewritten atomically on every change.
///
/// A store without a path keeps its state in memory only.
#[derive(Debug, Clone, Default)]
pub struct LocalStore {
    path: Option<PathBuf>,
    durability: WriteDurability,
    state: LocalState,
}

impl LocalStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let state = read_json(&path)?.unwrap_or_default();
        Ok(Self { path: Some(path), durability: WriteDurability::default(), state })
    }

    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn with_durability(mut self, durability: WriteDurability) -> Self {
        self.durability = durability;
        self
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn state(&self) -> &LocalState {
        &self.state
    }

    pub fn clipboard(&self) -> Option<&str> {
        self.state.clipboard.as_deref()
    }

    /// `None` clears the clipboard.
    pub fn set_clipboard(&mut self, link: Option<String>) -> Result<(), StoreError> {
        self.update(|state| state.clipboard = link)
    }

    /// Pasting consumes the clipboard.
    pub fn take_clipboard(&mut self) -> Result<Option<String>, StoreError> {
        let link = self.state.clipboard.clone();
        if link.is_some() {
            self.update(|state| state.clipboard = None)?;
        }
        Ok(link)
    }

    pub fn backend_location(&self) -> Option<&str> {
        self.state.backend_location.as_deref()
    }

    pub fn set_backend_location(&mut self, location: Option<String>) -> Result<(), StoreError> {
        self.update(|state| state.backend_location = location)
    }

    pub fn backend_enabled(&self) -> bool {
        self.state.backend_enabled
    }

    pub fn set_backend_enabled(&mut self, enabled: bool) -> Result<(), StoreError> {
        self.update(|state| state.backend_enabled = enabled)
    }

    /// Applies `change` and persists the result. On a write failure the in-memory state keeps the
    /// change so the session goes on; the error is still reported.
    fn update(&mut self, change: impl FnOnce(&mut LocalState)) -> Result<(), StoreError> {
        let before = self.state.clone();
        change(&mut self.state);
        if self.state == before {
            return Ok(());
        }
        let Some(path) = &self.path else {
            return Ok(());
        };
        let bytes = serde_json::to_vec_pretty(&self.state)
            .map_err(|source| StoreError::Json { path: path.clone(), source })?;
        write_atomic(path, &bytes, self.durability)
    }
}
