// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Streamwall and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Reference resolution.
//!
//! Turns whatever a user typed or pasted (explicit `type=value` form, a known name, a YouTube or
//! Twitch URL, `ttv-` shorthand) into a canonical `StreamRef`.

use std::fmt;

use url::Url;

use crate::directory::Directory;
use crate::model::{StreamRef, StreamType};

mod twitch;
mod youtube;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    Empty,
    MissingValue(StreamType),
    Unrecognized(String),
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("nothing to resolve"),
            Self::MissingValue(kind) => write!(f, "'{kind}' needs a value"),
            Self::Unrecognized(input) => write!(f, "unrecognized stream reference '{input}'"),
        }
    }
}

impl std::error::Error for ResolveError {}

/// Heuristic detectors, tried in declaration order after the explicit form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detector {
    Alias,
    Youtube,
    Twitch,
}

impl Detector {
    pub const CHAIN: [Detector; 3] = [Self::Alias, Self::Youtube, Self::Twitch];

    pub fn detect(self, input: &str, directory: &Directory) -> Option<StreamRef> {
        match self {
            Self::Alias => detect_alias(input, directory),
            Self::Youtube => youtube::detect(input, directory),
            Self::Twitch => twitch::detect(input),
        }
    }
}

pub fn resolve(input: &str, directory: &Directory) -> Result<StreamRef, ResolveError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ResolveError::Empty);
    }

    if let Some(explicit) = parse_explicit(input) {
        return explicit;
    }

    Detector::CHAIN
        .into_iter()
        .find_map(|detector| detector.detect(input, directory))
        .ok_or_else(|| ResolveError::Unrecognized(input.to_owned()))
}

/// `keyword=value[&extras]` (or bare `blank`). Everything from the first `&` after the value is
/// kept verbatim as extras. Returns `None` when the input does not start with a known keyword,
/// so heuristics get a chance.
pub fn parse_explicit(input: &str) -> Option<Result<StreamRef, ResolveError>> {
    let (keyword, rest) = match memchr::memchr(b'=', input.as_bytes()) {
        Some(at) => (&input[..at], &input[at + 1..]),
        None => (input, ""),
    };
    let kind = StreamType::from_keyword(keyword)?;
    let (value, extras) = match memchr::memchr(b'&', rest.as_bytes()) {
        Some(at) => rest.split_at(at),
        None => (rest, ""),
    };
    Some(explicit_ref(kind, value).map(|stream| stream.with_extras(extras.trim_end())))
}

/// Ref for an already separated keyword and value. The value is taken whole, `&` included.
pub(crate) fn explicit_ref(kind: StreamType, value: &str) -> Result<StreamRef, ResolveError> {
    if kind.is_blank() {
        return Ok(StreamRef::blank());
    }
    StreamRef::new(kind, value.trim()).map_err(|_| ResolveError::MissingValue(kind))
}

fn detect_alias(input: &str, directory: &Directory) -> Option<StreamRef> {
    let streamer = directory.find_by_identity(StreamType::Alias, input)?;
    StreamRef::new(StreamType::Alias, streamer.name().as_str()).ok()
}

/// Prepends `https://` when no scheme is present; `None` when the result is not a URL.
pub(crate) fn to_url(input: &str) -> Option<Url> {
    if input.contains("://") {
        Url::parse(input).ok()
    } else {
        Url::parse(&format!("https://{input}")).ok()
    }
}

pub(crate) fn query_value(url: &Url, key: &str) -> Option<String> {
    url.query_pairs()
        .find(|(name, value)| name == key && !value.is_empty())
        .map(|(_, value)| value.into_owned())
}

/// First non-empty path segments of `url`.
pub(crate) fn path_segments(url: &Url) -> Vec<&str> {
    url.path_segments()
        .map(|segments| segments.filter(|segment| !segment.is_empty()).collect())
        .unwrap_or_default()
}

/// Shareable link for a ref, as put on the clipboard by cut/copy. Extras are not carried.
pub fn to_link(stream: &StreamRef) -> Option<String> {
    let (kind, value) = stream.pair()?;
    let link = match kind {
        StreamType::Blank => return None,
        StreamType::Alias => value.to_owned(),
        StreamType::YoutubeVideo => format!("http://www.youtube.com/watch?v={value}"),
        StreamType::YoutubeChannel => format!("http://www.youtube.com/channel/{value}"),
        StreamType::YoutubeHandle => format!("http://www.youtube.com/@{value}"),
        StreamType::YoutubeCustom => format!("http://www.youtube.com/c/{value}"),
        StreamType::TwitchVideo => format!("http://www.twitch.tv/videos/{value}"),
        StreamType::TwitchChannel => format!("http://www.twitch.tv/{value}"),
    };
    Some(link)
}

#[cfg(test)]
mod tests;
