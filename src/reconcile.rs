// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Streamwall and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Keeps each cell's player in step with directory status.
//!
//! A cell showing an alias follows its streamer: when the streamer goes live or schedules a
//! stream the player switches to it. Only cells whose compiled embed changed are reported, so a
//! tick with nothing new is a no-op.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::directory::Directory;
use crate::embed::{compile, EmbedOptions, EmbedUrl};
use crate::model::{Grid, StreamRef, StreamType};
use crate::ops::CellDelta;

/// What an alias cell shows while its streamer is offline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum OfflinePolicy {
    /// Fall back to the streamer's primary channel.
    #[default]
    Fallback,
    /// Show nothing until the streamer is back.
    Clear,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellUpdate {
    pub index: usize,
    /// `None` removes the player.
    pub embed: Option<EmbedUrl>,
}

#[derive(Debug, Clone, Default)]
pub struct Reconciler {
    policy: OfflinePolicy,
    embeds: Vec<Option<EmbedUrl>>,
}

impl Reconciler {
    pub fn new(policy: OfflinePolicy) -> Self {
        Self { policy, embeds: Vec::new() }
    }

    pub fn policy(&self) -> OfflinePolicy {
        self.policy
    }

    /// Embeds as of the last tick, by cell index.
    pub fn embeds(&self) -> &[Option<EmbedUrl>] {
        &self.embeds
    }

    pub fn embed_for(
        &self,
        cell: &StreamRef,
        directory: &Directory,
        options: &EmbedOptions,
    ) -> Option<EmbedUrl> {
        if self.policy == OfflinePolicy::Clear {
            let offline = cell
                .value()
                .filter(|_| cell.kind() == StreamType::Alias)
                .and_then(|name| directory.find_by_identity(StreamType::Alias, name))
                .is_some_and(|streamer| streamer.is_confirmed_offline());
            if offline {
                return None;
            }
        }
        compile(cell, directory, options).ok()
    }

    /// Carries existing players along with cells that moved, so a tick after a swap or a
    /// compacting resize does not restart them. Vacated cells keep their old entry until the next
    /// tick reports them.
    pub fn follow(&mut self, delta: &CellDelta, capacity: usize) {
        let before = self.embeds.clone();
        for movement in &delta.moved {
            let carried = before.get(movement.from).cloned().flatten();
            if let Some(slot) = self.embeds.get_mut(movement.to) {
                *slot = carried;
            }
        }
        self.embeds.resize(capacity, None);
    }

    pub fn tick(
        &mut self,
        grid: &Grid,
        directory: &Directory,
        options: &EmbedOptions,
    ) -> Vec<CellUpdate> {
        self.embeds.resize(grid.capacity(), None);

        let mut updates = Vec::new();
        for (index, cell) in grid.cells().iter().enumerate() {
            let embed = self.embed_for(cell, directory, options);
            if self.embeds[index] != embed {
                self.embeds[index] = embed.clone();
                updates.push(CellUpdate { index, embed });
            }
        }
        updates
    }

    /// Recompiles one cell and reports it whether or not it changed.
    pub fn reload(
        &mut self,
        index: usize,
        grid: &Grid,
        directory: &Directory,
        options: &EmbedOptions,
    ) -> Option<CellUpdate> {
        let cell = grid.cell(index)?;
        let embed = self.embed_for(cell, directory, options);
        self.embeds.resize(grid.capacity(), None);
        self.embeds[index] = embed.clone();
        Some(CellUpdate { index, embed })
    }
}
