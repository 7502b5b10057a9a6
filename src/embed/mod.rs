// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Streamwall and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Embed URL compilation.
//!
//! Direct refs map onto fixed player templates. Aliases, handles and custom names go through the
//! directory first; when that yields nothing the compiler reports it instead of guessing.

use std::fmt;

use crate::directory::Directory;
use crate::model::{StreamRef, StreamType, Streamer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedOptions {
    /// Domain the wall is served from; Twitch refuses to play without it.
    pub host_domain: String,
}

impl Default for EmbedOptions {
    fn default() -> Self {
        Self { host_domain: "localhost".to_owned() }
    }
}

/// A compiled player URL together with the direct ref it was compiled from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedUrl {
    pub url: String,
    pub source: StreamRef,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbedError {
    Blank,
    UnknownStreamer(String),
    Unresolvable(StreamRef),
}

impl fmt::Display for EmbedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blank => f.write_str("blank cell has nothing to embed"),
            Self::UnknownStreamer(name) => write!(f, "unknown streamer '{name}'"),
            Self::Unresolvable(stream) => write!(f, "no embeddable stream for '{stream}'"),
        }
    }
}

impl std::error::Error for EmbedError {}

pub fn compile(
    stream: &StreamRef,
    directory: &Directory,
    options: &EmbedOptions,
) -> Result<EmbedUrl, EmbedError> {
    let direct = to_direct(stream, directory)?;
    let (kind, value) = direct.pair().ok_or(EmbedError::Blank)?;
    let host = &options.host_domain;
    let extras = direct.extras();

    let url = match kind {
        StreamType::YoutubeVideo => {
            format!("https://www.youtube.com/embed/{value}?autoplay=1&mute=1{extras}")
        }
        StreamType::YoutubeChannel => format!(
            "https://www.youtube.com/embed/live_stream?channel={value}&autoplay=1&mute=1{extras}"
        ),
        StreamType::TwitchChannel => format!(
            "https://player.twitch.tv/?channel={value}&parent={host}&autoplay=true&muted=true&height=100%&width=100%{extras}"
        ),
        StreamType::TwitchVideo => format!(
            "https://player.twitch.tv/?video={value}&parent={host}&autoplay=true&muted=true&height=100%&width=100%{extras}"
        ),
        StreamType::Blank
        | StreamType::Alias
        | StreamType::YoutubeHandle
        | StreamType::YoutubeCustom => return Err(EmbedError::Unresolvable(stream.clone())),
    };

    Ok(EmbedUrl { url, source: direct })
}

/// Chat panel URL. Only live videos and Twitch channels have one.
pub fn compile_chat(
    stream: &StreamRef,
    directory: &Directory,
    options: &EmbedOptions,
) -> Option<String> {
    let direct = to_direct(stream, directory).ok()?;
    let host = &options.host_domain;
    match direct.pair()? {
        (StreamType::YoutubeVideo, id) => {
            Some(format!("https://www.youtube.com/live_chat?v={id}&embed_domain={host}"))
        }
        (StreamType::TwitchChannel, handle) => {
            Some(format!("https://www.twitch.tv/embed/{handle}/chat?darkpopout&parent={host}"))
        }
        _ => None,
    }
}

/// Follows directory indirection until a ref with a fixed template is reached.
///
/// Extras on the original ref survive indirection; a status target's own extras come first.
pub fn to_direct(stream: &StreamRef, directory: &Directory) -> Result<StreamRef, EmbedError> {
    let Some((kind, value)) = stream.pair() else {
        return Err(EmbedError::Blank);
    };

    let resolved = match kind {
        StreamType::Alias => {
            let streamer = directory
                .find_by_identity(StreamType::Alias, value)
                .ok_or_else(|| EmbedError::UnknownStreamer(value.to_owned()))?;
            streamer_target(streamer).ok_or_else(|| EmbedError::Unresolvable(stream.clone()))?
        }
        StreamType::YoutubeHandle | StreamType::YoutubeCustom => directory
            .find_by_identity(kind, value)
            .and_then(|streamer| streamer.handles().youtube_id())
            .and_then(|id| StreamRef::new(StreamType::YoutubeChannel, id).ok())
            .ok_or_else(|| EmbedError::Unresolvable(stream.clone()))?,
        _ => return Ok(stream.clone()),
    };

    let mut direct = resolved;
    direct.push_extras(stream.extras());
    Ok(direct)
}

/// What an alias should show right now: live/upcoming target, else the primary channel.
pub fn streamer_target(streamer: &Streamer) -> Option<StreamRef> {
    streamer
        .status()
        .and_then(|status| status.watch_target())
        .filter(|target| !target.kind().is_indirect())
        .cloned()
        .or_else(|| {
            streamer
                .streams()
                .iter()
                .find(|(kind, _)| !kind.is_indirect())
                .and_then(|(kind, value)| StreamRef::new(*kind, value.clone()).ok())
        })
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::{compile, compile_chat, EmbedError, EmbedOptions};
    use crate::directory::{Directory, RecordStatus, RecordStream, StreamerRecord};
    use crate::model::{StreamRef, StreamState, StreamType};

    #[fixture]
    fn directory() -> Directory {
        Directory::from_records([
            StreamerRecord {
                yt_id: Some("UCgura".to_owned()),
                yt_handle: Some("GawrGura".to_owned()),
                ..StreamerRecord::named("Gawr Gura")
            },
            StreamerRecord {
                yt_id: Some("UCame".to_owned()),
                status: Some(RecordStatus {
                    state: StreamState::Live,
                    target: Some(RecordStream {
                        kind: StreamType::YoutubeVideo,
                        value: "liveAme".to_owned(),
                    }),
                    start_time: None,
                    title: None,
                }),
                ..StreamerRecord::named("Watson Amelia")
            },
            StreamerRecord::named("Nobody Home"),
        ])
    }

    #[fixture]
    fn options() -> EmbedOptions {
        EmbedOptions { host_domain: "wall.example".to_owned() }
    }

    fn stream(kind: StreamType, value: &str) -> StreamRef {
        StreamRef::new(kind, value).expect("stream ref")
    }

    #[rstest]
    #[case(
        stream(StreamType::YoutubeVideo, "abc").with_extras("&start=30"),
        "https://www.youtube.com/embed/abc?autoplay=1&mute=1&start=30"
    )]
    #[case(
        stream(StreamType::YoutubeChannel, "UC1"),
        "https://www.youtube.com/embed/live_stream?channel=UC1&autoplay=1&mute=1"
    )]
    #[case(
        stream(StreamType::TwitchChannel, "xyz"),
        "https://player.twitch.tv/?channel=xyz&parent=wall.example&autoplay=true&muted=true&height=100%&width=100%"
    )]
    #[case(
        stream(StreamType::TwitchVideo, "42").with_extras("&time=1h2m3s"),
        "https://player.twitch.tv/?video=42&parent=wall.example&autoplay=true&muted=true&height=100%&width=100%&time=1h2m3s"
    )]
    fn direct_refs_use_fixed_templates(
        directory: Directory,
        options: EmbedOptions,
        #[case] input: StreamRef,
        #[case] expected: &str,
    ) {
        let embed = compile(&input, &directory, &options).expect("compile");
        assert_eq!(embed.url, expected);
        assert_eq!(embed.source, input);
    }

    #[rstest]
    fn alias_prefers_live_target(directory: Directory, options: EmbedOptions) {
        let embed =
            compile(&stream(StreamType::Alias, "Watson Amelia"), &directory, &options).expect("ok");
        assert_eq!(embed.source, stream(StreamType::YoutubeVideo, "liveAme"));
    }

    #[rstest]
    fn alias_falls_back_to_primary_channel(directory: Directory, options: EmbedOptions) {
        let embed = compile(&stream(StreamType::Alias, "gawr gura"), &directory, &options)
            .expect("compile");
        assert_eq!(
            embed.url,
            "https://www.youtube.com/embed/live_stream?channel=UCgura&autoplay=1&mute=1"
        );
    }

    #[rstest]
    fn handle_goes_through_directory(directory: Directory, options: EmbedOptions) {
        let known = compile(&stream(StreamType::YoutubeHandle, "gawrgura"), &directory, &options);
        assert_eq!(
            known.map(|embed| embed.source),
            Ok(stream(StreamType::YoutubeChannel, "UCgura"))
        );

        let unknown = stream(StreamType::YoutubeCustom, "someone");
        assert_eq!(
            compile(&unknown, &directory, &options),
            Err(EmbedError::Unresolvable(unknown.clone()))
        );
    }

    #[rstest]
    fn failures_never_guess(directory: Directory, options: EmbedOptions) {
        assert_eq!(compile(&StreamRef::blank(), &directory, &options), Err(EmbedError::Blank));
        assert_eq!(
            compile(&stream(StreamType::Alias, "Stranger"), &directory, &options),
            Err(EmbedError::UnknownStreamer("Stranger".to_owned()))
        );
        let empty = stream(StreamType::Alias, "Nobody Home");
        assert_eq!(compile(&empty, &directory, &options), Err(EmbedError::Unresolvable(empty)));
    }

    #[rstest]
    fn chat_urls(directory: Directory, options: EmbedOptions) {
        assert_eq!(
            compile_chat(&stream(StreamType::Alias, "Watson Amelia"), &directory, &options),
            Some("https://www.youtube.com/live_chat?v=liveAme&embed_domain=wall.example".to_owned())
        );
        assert_eq!(
            compile_chat(&stream(StreamType::TwitchChannel, "xyz"), &directory, &options),
            Some("https://www.twitch.tv/embed/xyz/chat?darkpopout&parent=wall.example".to_owned())
        );
        assert_eq!(
            compile_chat(&stream(StreamType::YoutubeChannel, "UC1"), &directory, &options),
            None
        );
    }
}
