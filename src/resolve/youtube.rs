// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Streamwall and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::{path_segments, query_value, to_url};
use crate::directory::Directory;
use crate::model::{StreamRef, StreamType};

const HOSTS: [&str; 3] = ["youtube.com", "www.youtube.com", "m.youtube.com"];
const SHORT_HOST: &str = "youtu.be";

pub(super) fn detect(input: &str, directory: &Directory) -> Option<StreamRef> {
    let url = to_url(input)?;
    let host = url.host_str()?.to_ascii_lowercase();
    let segments = path_segments(&url);

    if host == SHORT_HOST {
        let id = segments.first()?;
        return video(id, &url);
    }
    if !HOSTS.contains(&host.as_str()) {
        return None;
    }

    match segments.as_slice() {
        ["watch", ..] => video(&query_value(&url, "v")?, &url),
        ["channel", id, ..] => StreamRef::new(StreamType::YoutubeChannel, *id).ok(),
        ["live" | "shorts" | "embed", id, ..] => video(id, &url),
        ["c", name, ..] => indirect(StreamType::YoutubeCustom, name, directory),
        [first, ..] if first.len() > 1 && first.starts_with('@') => {
            indirect(StreamType::YoutubeHandle, &first[1..], directory)
        }
        _ => None,
    }
}

fn video(id: &str, url: &url::Url) -> Option<StreamRef> {
    let stream = StreamRef::new(StreamType::YoutubeVideo, id).ok()?;
    Some(match query_value(url, "t") {
        Some(start) => stream.with_extras(format!("&start={start}")),
        None => stream,
    })
}

/// Handles and custom names become a channel id when the directory already knows them.
fn indirect(kind: StreamType, value: &str, directory: &Directory) -> Option<StreamRef> {
    let known = directory
        .find_by_identity(kind, value)
        .and_then(|streamer| streamer.handles().youtube_id());
    match known {
        Some(id) => StreamRef::new(StreamType::YoutubeChannel, id).ok(),
        None => StreamRef::new(kind, value).ok(),
    }
}
