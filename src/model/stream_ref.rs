// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Streamwall and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Closed set of things a grid cell can point at.
///
/// `YoutubeHandle` and `YoutubeCustom` are deferred forms: they name a channel indirectly and
/// need the directory (or the backend) before they can be embedded.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub enum StreamType {
    #[serde(rename = "blank")]
    Blank,
    #[serde(rename = "alias")]
    Alias,
    #[serde(rename = "yt-video")]
    YoutubeVideo,
    #[serde(rename = "yt-channel")]
    YoutubeChannel,
    #[serde(rename = "yt-handle")]
    YoutubeHandle,
    #[serde(rename = "yt-custom")]
    YoutubeCustom,
    #[serde(rename = "ttv-video")]
    TwitchVideo,
    #[serde(rename = "ttv-channel")]
    TwitchChannel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Youtube,
    Twitch,
}

impl StreamType {
    pub const ALL: [StreamType; 8] = [
        Self::Blank,
        Self::Alias,
        Self::YoutubeVideo,
        Self::YoutubeChannel,
        Self::YoutubeHandle,
        Self::YoutubeCustom,
        Self::TwitchVideo,
        Self::TwitchChannel,
    ];

    /// Explicit-form keyword, shared by the URL serializer and the resolver fast-path.
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Blank => "blank",
            Self::Alias => "alias",
            Self::YoutubeVideo => "yt-video",
            Self::YoutubeChannel => "yt-channel",
            Self::YoutubeHandle => "yt-handle",
            Self::YoutubeCustom => "yt-custom",
            Self::TwitchVideo => "ttv-video",
            Self::TwitchChannel => "ttv-channel",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.keyword() == keyword)
    }

    pub const fn is_blank(self) -> bool {
        matches!(self, Self::Blank)
    }

    pub const fn platform(self) -> Option<Platform> {
        match self {
            Self::Blank | Self::Alias => None,
            Self::YoutubeVideo
            | Self::YoutubeChannel
            | Self::YoutubeHandle
            | Self::YoutubeCustom => Some(Platform::Youtube),
            Self::TwitchVideo | Self::TwitchChannel => Some(Platform::Twitch),
        }
    }

    /// Whether embedding this type goes through the directory rather than a fixed template.
    pub const fn is_indirect(self) -> bool {
        matches!(self, Self::Alias | Self::YoutubeHandle | Self::YoutubeCustom)
    }

    /// Whether the value names a single video rather than a channel or person.
    pub const fn is_video(self) -> bool {
        matches!(self, Self::YoutubeVideo | Self::TwitchVideo)
    }
}

impl fmt::Display for StreamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for StreamType {
    type Err = StreamRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_keyword(s).ok_or_else(|| StreamRefError::UnknownType(s.to_owned()))
    }
}

/// Canonical `(type, value, extras)` triple identifying what a grid cell shows.
///
/// Invariant: a blank ref has no value and no extras; every other ref has a non-empty value.
/// Fields are private so the invariant cannot be broken after construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawStreamRef", into = "RawStreamRef")]
pub struct StreamRef {
    kind: StreamType,
    value: Option<String>,
    extras: String,
}

impl StreamRef {
    pub const fn blank() -> Self {
        Self { kind: StreamType::Blank, value: None, extras: String::new() }
    }

    pub fn new(kind: StreamType, value: impl Into<String>) -> Result<Self, StreamRefError> {
        let value = value.into();
        if kind.is_blank() {
            return Err(StreamRefError::BlankWithValue);
        }
        if value.is_empty() {
            return Err(StreamRefError::MissingValue(kind));
        }
        Ok(Self { kind, value: Some(value), extras: String::new() })
    }

    /// Attaches an opaque query fragment (e.g. `&start=30`). Ignored for blank refs.
    pub fn with_extras(mut self, extras: impl Into<String>) -> Self {
        if !self.kind.is_blank() {
            self.extras = extras.into();
        }
        self
    }

    pub(crate) fn push_extras(&mut self, fragment: &str) {
        if !self.kind.is_blank() {
            self.extras.push_str(fragment);
        }
    }

    pub fn kind(&self) -> StreamType {
        self.kind
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn extras(&self) -> &str {
        &self.extras
    }

    pub fn is_blank(&self) -> bool {
        self.kind.is_blank()
    }

    /// `(type, value)` identity of a non-blank ref, ignoring extras.
    pub fn pair(&self) -> Option<(StreamType, &str)> {
        self.value.as_deref().map(|value| (self.kind, value))
    }

    /// Same ref without extras.
    pub fn without_extras(&self) -> Self {
        Self { kind: self.kind, value: self.value.clone(), extras: String::new() }
    }
}

impl Default for StreamRef {
    fn default() -> Self {
        Self::blank()
    }
}

/// Explicit form: `keyword=value` followed by extras, or just `blank`.
impl fmt::Display for StreamRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind.keyword())?;
        if let Some(value) = &self.value {
            write!(f, "={value}")?;
        }
        f.write_str(&self.extras)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamRefError {
    UnknownType(String),
    MissingValue(StreamType),
    BlankWithValue,
}

impl fmt::Display for StreamRefError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownType(kind) => write!(f, "unknown stream type '{kind}'"),
            Self::MissingValue(kind) => write!(f, "stream type '{kind}' requires a value"),
            Self::BlankWithValue => f.write_str("blank stream must not carry a value"),
        }
    }
}

impl std::error::Error for StreamRefError {}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawStreamRef {
    #[serde(rename = "type")]
    kind: StreamType,
    #[serde(default)]
    value: Option<String>,
    #[serde(default)]
    extras: String,
}

impl TryFrom<RawStreamRef> for StreamRef {
    type Error = StreamRefError;

    fn try_from(raw: RawStreamRef) -> Result<Self, Self::Error> {
        match (raw.kind, raw.value) {
            (StreamType::Blank, None) => Ok(Self::blank()),
            (StreamType::Blank, Some(_)) => Err(StreamRefError::BlankWithValue),
            (kind, value) => {
                Ok(Self::new(kind, value.unwrap_or_default())?.with_extras(raw.extras))
            }
        }
    }
}

impl From<StreamRef> for RawStreamRef {
    fn from(stream: StreamRef) -> Self {
        Self { kind: stream.kind, value: stream.value, extras: stream.extras }
    }
}
