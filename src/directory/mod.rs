// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Streamwall and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Streamer directory.
//!
//! Records from the catalogue and the backend are merged into long-lived `Streamer`s. Every
//! identity key (name, alias, channel id, handle, video id) maps to at most one streamer; the
//! first claim wins and later claims are recorded as conflicts.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;

use smol_str::SmolStr;
use tracing::{debug, warn};

use crate::model::{GroupPath, IdError, StreamRef, StreamType, Streamer, StreamerName};

pub mod record;
mod search;
pub mod tree;

pub use record::{ListOrDelimited, RecordStatus, RecordStream, StreamerRecord};
pub use search::{Ranked, SearchOptions};
pub use tree::{GroupNode, GroupTree};

/// Namespace of an identity key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IdentityKind {
    /// Streamer names and aliases share one namespace.
    Alias,
    YoutubeChannel,
    YoutubeHandle,
    YoutubeCustom,
    TwitchChannel,
    YoutubeVideo,
    TwitchVideo,
}

impl IdentityKind {
    pub const fn for_stream_type(kind: StreamType) -> Option<Self> {
        match kind {
            StreamType::Blank => None,
            StreamType::Alias => Some(Self::Alias),
            StreamType::YoutubeVideo => Some(Self::YoutubeVideo),
            StreamType::YoutubeChannel => Some(Self::YoutubeChannel),
            StreamType::YoutubeHandle => Some(Self::YoutubeHandle),
            StreamType::YoutubeCustom => Some(Self::YoutubeCustom),
            StreamType::TwitchVideo => Some(Self::TwitchVideo),
            StreamType::TwitchChannel => Some(Self::TwitchChannel),
        }
    }

    const fn is_video(self) -> bool {
        matches!(self, Self::YoutubeVideo | Self::TwitchVideo)
    }

    /// Channel and video ids are case-sensitive; names and handles are not.
    pub fn normalize(self, raw: &str) -> String {
        let raw = raw.trim();
        match self {
            Self::YoutubeChannel | Self::YoutubeVideo | Self::TwitchVideo => raw.to_owned(),
            Self::YoutubeHandle => raw.trim_start_matches('@').to_lowercase(),
            Self::Alias | Self::YoutubeCustom | Self::TwitchChannel => raw.to_lowercase(),
        }
    }
}

impl fmt::Display for IdentityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Alias => "alias",
            Self::YoutubeChannel => "youtube channel",
            Self::YoutubeHandle => "youtube handle",
            Self::YoutubeCustom => "youtube custom name",
            Self::TwitchChannel => "twitch handle",
            Self::YoutubeVideo => "youtube video",
            Self::TwitchVideo => "twitch video",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct IdentityKey {
    kind: IdentityKind,
    key: String,
}

/// A second streamer tried to claim a key that already belongs to someone else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityConflict {
    pub kind: IdentityKind,
    pub key: String,
    pub owner: StreamerName,
    pub claimant: StreamerName,
}

impl fmt::Display for IdentityConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} '{}' belongs to {} (claimed by {})",
            self.kind, self.key, self.owner, self.claimant
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    Created(StreamerName),
    Merged(StreamerName),
    Skipped(SkipReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Nameless record whose handles match nobody.
    Unmatched,
    InvalidName(IdError),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unmatched => f.write_str("record has no name and matches no known identity"),
            Self::InvalidName(err) => write!(f, "invalid streamer name: {err}"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestSummary {
    pub created: usize,
    pub merged: usize,
    pub skipped: usize,
}

/// Which streamers next/previous navigation cycles through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NeighborScope {
    /// Streamers at or below the current streamer's own group.
    Group,
    Global,
}

#[derive(Debug, Clone, Default)]
pub struct Directory {
    streamers: Vec<Streamer>,
    by_name: HashMap<StreamerName, usize>,
    identities: HashMap<IdentityKey, usize>,
    tree: GroupTree,
    conflicts: Vec<IdentityConflict>,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: impl IntoIterator<Item = StreamerRecord>) -> Self {
        let mut directory = Self::new();
        directory.ingest(records);
        directory
    }

    pub fn len(&self) -> usize {
        self.streamers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.streamers.is_empty()
    }

    /// Streamers in creation order.
    pub fn streamers(&self) -> impl Iterator<Item = &Streamer> {
        self.streamers.iter()
    }

    /// Streamers in group-tree listing order.
    pub fn listing(&self) -> Vec<&Streamer> {
        self.names_to_streamers(self.tree.listing())
    }

    pub fn streamer(&self, name: &str) -> Option<&Streamer> {
        self.by_name.get(name).and_then(|&index| self.streamers.get(index))
    }

    pub fn group_tree(&self) -> &GroupTree {
        &self.tree
    }

    pub fn identity_conflicts(&self) -> &[IdentityConflict] {
        &self.conflicts
    }

    /// Streamer owning `(kind, value)`. `Alias` matches names and aliases case-insensitively.
    pub fn find_by_identity(&self, kind: StreamType, value: &str) -> Option<&Streamer> {
        let kind = IdentityKind::for_stream_type(kind)?;
        self.index_of(kind, value).and_then(|index| self.streamers.get(index))
    }

    /// Streamer a grid cell currently shows, if the directory knows it.
    pub fn streamer_for_ref(&self, stream: &StreamRef) -> Option<&Streamer> {
        let (kind, value) = stream.pair()?;
        self.find_by_identity(kind, value).or_else(|| {
            self.streamers.iter().find(|streamer| {
                streamer.streams().iter().any(|(k, v)| *k == kind && v == value)
                    || streamer
                        .status()
                        .and_then(|status| status.target.as_ref())
                        .and_then(StreamRef::pair)
                        .is_some_and(|pair| pair == (kind, value))
            })
        })
    }

    pub fn ingest(&mut self, records: impl IntoIterator<Item = StreamerRecord>) -> IngestSummary {
        let mut summary = IngestSummary::default();
        for record in records {
            match self.ingest_record(record) {
                IngestOutcome::Created(_) => summary.created += 1,
                IngestOutcome::Merged(_) => summary.merged += 1,
                IngestOutcome::Skipped(_) => summary.skipped += 1,
            }
        }
        summary
    }

    /// Merges one record. The record is applied in full before the call returns.
    pub fn ingest_record(&mut self, record: StreamerRecord) -> IngestOutcome {
        let (index, created) = match self.locate(&record) {
            Ok(found) => found,
            Err(reason) => {
                warn!(name = ?record.name, %reason, "skipping streamer record");
                return IngestOutcome::Skipped(reason);
            }
        };

        self.merge_into(index, &record);

        let name = self.streamers[index].name().clone();
        if created {
            IngestOutcome::Created(name)
        } else {
            IngestOutcome::Merged(name)
        }
    }

    /// Replaces the whole directory, as loading a streamer list from JSON does.
    pub fn replace_all(
        &mut self,
        records: impl IntoIterator<Item = StreamerRecord>,
    ) -> IngestSummary {
        *self = Self::new();
        self.ingest(records)
    }

    /// Dump of every streamer in creation order. Re-ingesting it rebuilds an equivalent directory.
    pub fn records(&self) -> Vec<StreamerRecord> {
        self.streamers.iter().map(to_record).collect()
    }

    /// Streamer `offset` steps away from the one `current` shows, skipping confirmed-offline
    /// streamers and wrapping at both ends. Unknown current streams start at the first listing
    /// entry.
    pub fn neighbor(
        &self,
        current: &StreamRef,
        offset: isize,
        scope: NeighborScope,
    ) -> Option<&Streamer> {
        let Some(current) = self.streamer_for_ref(current) else {
            return self.listing().into_iter().next();
        };

        let candidates = match scope {
            NeighborScope::Global => self.tree.listing(),
            NeighborScope::Group => self.tree.listing_under(current.group_path()),
        };
        let candidates = self
            .names_to_streamers(candidates)
            .into_iter()
            .filter(|streamer| {
                streamer.name() == current.name() || !streamer.is_confirmed_offline()
            })
            .collect::<Vec<_>>();

        let position = candidates.iter().position(|streamer| streamer.name() == current.name())?;
        let len = candidates.len() as isize;
        let target = (position as isize + offset).rem_euclid(len) as usize;
        candidates.get(target).copied()
    }

    fn names_to_streamers<'a>(&'a self, names: Vec<&StreamerName>) -> Vec<&'a Streamer> {
        names.into_iter().filter_map(|name| self.streamer(name.as_str())).collect()
    }

    fn index_of(&self, kind: IdentityKind, value: &str) -> Option<usize> {
        let key = IdentityKey { kind, key: kind.normalize(value) };
        self.identities.get(&key).copied()
    }

    /// Exact name first, then the same name in another case. An alias that merely equals the
    /// record's name does not count.
    fn index_of_name(&self, name: &StreamerName) -> Option<usize> {
        if let Some(&index) = self.by_name.get(name) {
            return Some(index);
        }
        let folded = IdentityKind::Alias.normalize(name.as_str());
        self.index_of(IdentityKind::Alias, name.as_str()).filter(|&index| {
            self.streamers
                .get(index)
                .is_some_and(|owner| IdentityKind::Alias.normalize(owner.name().as_str()) == folded)
        })
    }

    fn locate(&mut self, record: &StreamerRecord) -> Result<(usize, bool), SkipReason> {
        let name = record.name.as_deref().map(str::trim).filter(|name| !name.is_empty());
        match name {
            Some(raw) => {
                let name = StreamerName::new(raw).map_err(SkipReason::InvalidName)?;
                if let Some(index) = self.index_of_name(&name) {
                    return Ok((index, false));
                }
                Ok((self.create(name, record.group_path()), true))
            }
            None => record
                .handles()
                .into_iter()
                .find_map(|(kind, value)| {
                    IdentityKind::for_stream_type(kind).and_then(|kind| self.index_of(kind, value))
                })
                .map(|index| (index, false))
                .ok_or(SkipReason::Unmatched),
        }
    }

    fn create(&mut self, name: StreamerName, group_path: GroupPath) -> usize {
        let index = self.streamers.len();
        self.tree.insert(&group_path, &name);
        self.by_name.insert(name.clone(), index);
        self.streamers.push(Streamer::new(name.clone(), group_path));
        self.claim(IdentityKind::Alias, name.as_str(), index);
        debug!(%name, "created streamer");
        index
    }

    fn merge_into(&mut self, index: usize, record: &StreamerRecord) {
        for alias in record.alias_list() {
            if self.claim(IdentityKind::Alias, &alias, index) {
                self.streamers[index].add_alias(alias);
            }
        }

        for (kind, value) in record.handles() {
            let value = if kind == StreamType::YoutubeHandle {
                value.trim_start_matches('@')
            } else {
                value
            };
            if let Some(existing) = self.streamers[index].handles().get(kind) {
                if existing != value {
                    debug!(name = %self.streamers[index].name(), %kind, existing, ignored = value,
                        "handle already set");
                }
                continue;
            }
            let Some(identity) = IdentityKind::for_stream_type(kind) else {
                continue;
            };
            if self.claim(identity, value, index) {
                self.streamers[index].handles_mut().set_if_unset(kind, value);
            }
        }

        let status = record.live_status();
        if let Some(status) = &status {
            self.streamers[index].replace_status(status.clone());
        }

        let mut discovered: Vec<(StreamType, String)> = Vec::new();
        let handles = self.streamers[index].handles();
        if let Some(id) = handles.youtube_id() {
            discovered.push((StreamType::YoutubeChannel, id.to_owned()));
        }
        if let Some(handle) = handles.twitch_handle() {
            discovered.push((StreamType::TwitchChannel, handle.to_owned()));
        }
        for stream in &record.streams {
            if matches!(stream.kind, StreamType::Blank | StreamType::Alias) {
                continue;
            }
            discovered.push((stream.kind, stream.value.trim().to_owned()));
        }
        if let Some((kind, value)) =
            status.as_ref().and_then(|status| status.target.as_ref()).and_then(StreamRef::pair)
        {
            discovered.push((kind, value.to_owned()));
        }

        for (kind, value) in discovered {
            let claimed = IdentityKind::for_stream_type(kind)
                .is_some_and(|identity| self.claim(identity, &value, index));
            if claimed {
                self.streamers[index].push_stream(kind, &value);
            }
        }

        self.streamers[index].refresh_tokens();
    }

    /// Returns `true` when `index` owns the key afterwards.
    fn claim(&mut self, kind: IdentityKind, raw: &str, index: usize) -> bool {
        let key = kind.normalize(raw);
        if key.is_empty() {
            return false;
        }

        let owner = match self.identities.entry(IdentityKey { kind, key: key.clone() }) {
            Entry::Vacant(entry) => {
                entry.insert(index);
                return true;
            }
            Entry::Occupied(entry) => *entry.get(),
        };
        if owner == index {
            return true;
        }
        if kind.is_video() {
            return false;
        }

        let conflict = IdentityConflict {
            kind,
            key,
            owner: self.streamers[owner].name().clone(),
            claimant: self.streamers[index].name().clone(),
        };
        if !self.conflicts.contains(&conflict) {
            warn!(
                kind = %conflict.kind,
                key = %conflict.key,
                owner = %conflict.owner,
                claimant = %conflict.claimant,
                "identity already claimed; ignoring"
            );
            self.conflicts.push(conflict);
        }
        false
    }
}

fn to_record(streamer: &Streamer) -> StreamerRecord {
    let list = |items: Vec<String>| (!items.is_empty()).then_some(ListOrDelimited::List(items));
    let handles = streamer.handles();
    let handle = |kind| handles.get(kind).map(str::to_owned);

    StreamerRecord {
        name: Some(streamer.name().to_string()),
        grouping: list(streamer.group_path().iter().map(SmolStr::to_string).collect()),
        aliases: list(streamer.aliases().iter().map(SmolStr::to_string).collect()),
        yt_id: handle(StreamType::YoutubeChannel),
        yt_handle: handle(StreamType::YoutubeHandle),
        yt_custom: handle(StreamType::YoutubeCustom),
        ttv_handle: handle(StreamType::TwitchChannel),
        streams: streamer
            .streams()
            .iter()
            .map(|(kind, value)| RecordStream { kind: *kind, value: value.clone() })
            .collect(),
        status: streamer.status().map(|status| RecordStatus {
            state: status.state,
            target: status.target.as_ref().and_then(StreamRef::pair).map(|(kind, value)| {
                RecordStream { kind, value: value.to_owned() }
            }),
            start_time: status.start_time,
            title: status.title.clone(),
        }),
        ..StreamerRecord::default()
    }
}
