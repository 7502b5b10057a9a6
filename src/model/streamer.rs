// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Streamwall and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use smol_str::SmolStr;

use super::ids::StreamerName;
use super::stream_ref::{StreamRef, StreamType};

/// Region → agency → unit style path; rarely deeper than three segments.
pub type GroupPath = SmallVec<[SmolStr; 4]>;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum StreamState {
    Live,
    Upcoming,
    #[default]
    Offline,
}

impl StreamState {
    pub const fn is_watchable(self) -> bool {
        matches!(self, Self::Live | Self::Upcoming)
    }
}

/// Latest known status; replaced wholesale on every update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveStatus {
    pub target: Option<StreamRef>,
    pub state: StreamState,
    pub start_time: Option<i64>,
    pub title: Option<String>,
}

impl LiveStatus {
    /// The stream a viewer should be pointed at, if any.
    pub fn watch_target(&self) -> Option<&StreamRef> {
        if self.state.is_watchable() {
            self.target.as_ref()
        } else {
            None
        }
    }
}

/// Per-platform channel handles. Each slot is write-once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelHandles {
    youtube_id: Option<String>,
    youtube_handle: Option<String>,
    youtube_custom: Option<String>,
    twitch_handle: Option<String>,
}

impl ChannelHandles {
    pub const KINDS: [StreamType; 4] = [
        StreamType::YoutubeChannel,
        StreamType::YoutubeHandle,
        StreamType::YoutubeCustom,
        StreamType::TwitchChannel,
    ];

    pub fn get(&self, kind: StreamType) -> Option<&str> {
        match kind {
            StreamType::YoutubeChannel => self.youtube_id.as_deref(),
            StreamType::YoutubeHandle => self.youtube_handle.as_deref(),
            StreamType::YoutubeCustom => self.youtube_custom.as_deref(),
            StreamType::TwitchChannel => self.twitch_handle.as_deref(),
            _ => None,
        }
    }

    pub fn youtube_id(&self) -> Option<&str> {
        self.youtube_id.as_deref()
    }

    pub fn twitch_handle(&self) -> Option<&str> {
        self.twitch_handle.as_deref()
    }

    /// Returns `true` when the value was written. An established handle is never replaced.
    pub(crate) fn set_if_unset(&mut self, kind: StreamType, value: &str) -> bool {
        let slot = match kind {
            StreamType::YoutubeChannel => &mut self.youtube_id,
            StreamType::YoutubeHandle => &mut self.youtube_handle,
            StreamType::YoutubeCustom => &mut self.youtube_custom,
            StreamType::TwitchChannel => &mut self.twitch_handle,
            _ => return false,
        };
        if slot.is_some() || value.is_empty() {
            return false;
        }
        *slot = Some(value.to_owned());
        true
    }
}

/// One content creator in the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Streamer {
    name: StreamerName,
    group_path: GroupPath,
    aliases: BTreeSet<SmolStr>,
    handles: ChannelHandles,
    status: Option<LiveStatus>,
    streams: Vec<(StreamType, String)>,
    tokens: BTreeSet<SmolStr>,
}

impl Streamer {
    pub fn new(name: StreamerName, group_path: GroupPath) -> Self {
        Self {
            name,
            group_path,
            aliases: BTreeSet::new(),
            handles: ChannelHandles::default(),
            status: None,
            streams: Vec::new(),
            tokens: BTreeSet::new(),
        }
    }

    pub fn name(&self) -> &StreamerName {
        &self.name
    }

    pub fn group_path(&self) -> &[SmolStr] {
        &self.group_path
    }

    pub fn aliases(&self) -> &BTreeSet<SmolStr> {
        &self.aliases
    }

    pub fn handles(&self) -> &ChannelHandles {
        &self.handles
    }

    pub fn status(&self) -> Option<&LiveStatus> {
        self.status.as_ref()
    }

    /// Every distinct `(type, value)` ever observed, in discovery order. Index 0 is the primary
    /// channel once set.
    pub fn streams(&self) -> &[(StreamType, String)] {
        &self.streams
    }

    pub fn tokens(&self) -> &BTreeSet<SmolStr> {
        &self.tokens
    }

    /// Offline only when a status has been received and says so; unknown counts as not offline.
    pub fn is_confirmed_offline(&self) -> bool {
        self.status.as_ref().is_some_and(|status| status.state == StreamState::Offline)
    }

    pub fn primary_stream(&self) -> Option<StreamRef> {
        let (kind, value) = self.streams.first()?;
        StreamRef::new(*kind, value.clone()).ok()
    }

    pub(crate) fn add_alias(&mut self, alias: SmolStr) -> bool {
        self.aliases.insert(alias)
    }

    pub(crate) fn handles_mut(&mut self) -> &mut ChannelHandles {
        &mut self.handles
    }

    pub(crate) fn replace_status(&mut self, status: LiveStatus) {
        self.status = Some(status);
    }

    pub(crate) fn push_stream(&mut self, kind: StreamType, value: &str) -> bool {
        if kind.is_blank() || value.is_empty() {
            return false;
        }
        if self.streams.iter().any(|(k, v)| *k == kind && v == value) {
            return false;
        }
        self.streams.push((kind, value.to_owned()));
        true
    }

    /// Recomputes search tokens from name words, group segments and aliases. Tokens only grow.
    pub(crate) fn refresh_tokens(&mut self) {
        let name_words = self.name.as_str().split_whitespace().map(str::to_lowercase);
        let groups = self.group_path.iter().map(|group| group.to_lowercase());
        let aliases = self.aliases.iter().map(|alias| alias.to_lowercase());

        let fresh = name_words.chain(groups).chain(aliases).filter(|token| !token.is_empty());
        for token in fresh.collect::<Vec<_>>() {
            self.tokens.insert(SmolStr::new(token));
        }
    }
}
