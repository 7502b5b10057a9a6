// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Streamwall and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::{path_segments, query_value, to_url};
use crate::model::{StreamRef, StreamType};

const HOSTS: [&str; 3] = ["twitch.tv", "www.twitch.tv", "m.twitch.tv"];
const SHORTHAND: &str = "ttv-";

pub(super) fn detect(input: &str) -> Option<StreamRef> {
    if let Some(channel) = input.strip_prefix(SHORTHAND) {
        if !channel.is_empty() && !channel.contains(['/', ' ']) {
            return StreamRef::new(StreamType::TwitchChannel, channel).ok();
        }
    }

    let url = to_url(input)?;
    let host = url.host_str()?.to_ascii_lowercase();
    if !HOSTS.contains(&host.as_str()) {
        return None;
    }

    match path_segments(&url).as_slice() {
        ["videos", id, ..] => {
            let stream = StreamRef::new(StreamType::TwitchVideo, *id).ok()?;
            Some(match query_value(&url, "t") {
                Some(time) => stream.with_extras(format!("&time={time}")),
                None => stream,
            })
        }
        ["videos"] | [] => None,
        [channel, ..] => StreamRef::new(StreamType::TwitchChannel, *channel).ok(),
    }
}
