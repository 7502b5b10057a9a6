// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Streamwall and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use rstest::{fixture, rstest};

use super::{parse_explicit, resolve, to_link, Detector, ResolveError};
use crate::directory::{Directory, ListOrDelimited, StreamerRecord};
use crate::model::{StreamRef, StreamType};

#[fixture]
fn directory() -> Directory {
    Directory::from_records([
        StreamerRecord {
            aliases: Some(ListOrDelimited::Delimited("goob,twitch.tv/goob".to_owned())),
            yt_id: Some("UCoSrY_IQQVpmIRZ9Xf-y93g".to_owned()),
            yt_handle: Some("GawrGura".to_owned()),
            ..StreamerRecord::named("Gawr Gura")
        },
        StreamerRecord {
            yt_id: Some("UCyl1z3jo3XHR1riLFKG5UAg".to_owned()),
            yt_custom: Some("WatsonAmelia".to_owned()),
            ..StreamerRecord::named("Watson Amelia")
        },
    ])
}

fn stream(kind: StreamType, value: &str) -> StreamRef {
    StreamRef::new(kind, value).expect("stream ref")
}

#[rstest]
#[case("yt-video=abc123", StreamType::YoutubeVideo, "abc123")]
#[case("yt-channel=UC123", StreamType::YoutubeChannel, "UC123")]
#[case("ttv-channel=xyz", StreamType::TwitchChannel, "xyz")]
#[case("ttv-video=987", StreamType::TwitchVideo, "987")]
#[case("alias=Somebody New", StreamType::Alias, "Somebody New")]
#[case("yt-handle=www.youtube.com", StreamType::YoutubeHandle, "www.youtube.com")]
fn explicit_form_bypasses_detectors(
    directory: Directory,
    #[case] input: &str,
    #[case] kind: StreamType,
    #[case] value: &str,
) {
    let resolved = resolve(input, &directory).expect("resolve");
    assert_eq!(resolved, stream(kind, value));
    assert_eq!(resolved.extras(), "");
}

#[rstest]
#[case("blank")]
#[case("blank=whatever")]
#[case("  blank ")]
fn blank_keyword_resolves_to_blank(directory: Directory, #[case] input: &str) {
    assert_eq!(resolve(input, &directory), Ok(StreamRef::blank()));
}

#[rstest]
#[case("yt-video=abc&start=5", StreamType::YoutubeVideo, "abc", "&start=5")]
#[case("ttv-video=987&time=1h2m3s&x=y", StreamType::TwitchVideo, "987", "&time=1h2m3s&x=y")]
#[case("ttv-channel= xyz &parent=a", StreamType::TwitchChannel, "xyz", "&parent=a")]
fn explicit_form_splits_extras_at_the_first_ampersand(
    directory: Directory,
    #[case] input: &str,
    #[case] kind: StreamType,
    #[case] value: &str,
    #[case] extras: &str,
) {
    let resolved = resolve(input, &directory).expect("resolve");
    assert_eq!(resolved, stream(kind, value).with_extras(extras));
    assert_eq!(resolved.to_string(), input.replace(' ', ""));
}

#[rstest]
fn explicit_keyword_without_value_is_an_error(directory: Directory) {
    assert_eq!(
        resolve("yt-video=", &directory),
        Err(ResolveError::MissingValue(StreamType::YoutubeVideo))
    );
    assert_eq!(
        resolve("yt-video=&start=5", &directory),
        Err(ResolveError::MissingValue(StreamType::YoutubeVideo))
    );
    assert_eq!(parse_explicit("not-a-keyword=x"), None);
}

#[rstest]
#[case("", ResolveError::Empty)]
#[case("   ", ResolveError::Empty)]
#[case("definitely not a stream", ResolveError::Unrecognized("definitely not a stream".to_owned()))]
#[case(
    "https://example.com/watch?v=abc",
    ResolveError::Unrecognized("https://example.com/watch?v=abc".to_owned())
)]
fn unresolvable_inputs(directory: Directory, #[case] input: &str, #[case] expected: ResolveError) {
    assert_eq!(resolve(input, &directory), Err(expected));
}

#[rstest]
#[case("https://www.youtube.com/watch?v=abc123", "abc123", "")]
#[case("www.youtube.com/watch?v=abc123&t=42", "abc123", "&start=42")]
#[case("m.youtube.com/watch?v=abc123", "abc123", "")]
#[case("youtube.com/live/live999", "live999", "")]
#[case("https://www.youtube.com/shorts/short1", "short1", "")]
#[case("youtu.be/abc123?t=90", "abc123", "&start=90")]
fn youtube_video_links(
    directory: Directory,
    #[case] input: &str,
    #[case] id: &str,
    #[case] extras: &str,
) {
    let resolved = resolve(input, &directory).expect("resolve");
    assert_eq!(resolved, stream(StreamType::YoutubeVideo, id).with_extras(extras));
}

#[rstest]
#[case("https://www.youtube.com/channel/UC999", StreamType::YoutubeChannel, "UC999")]
#[case("www.youtube.com/@GawrGura", StreamType::YoutubeChannel, "UCoSrY_IQQVpmIRZ9Xf-y93g")]
#[case("www.youtube.com/@gawrgura/streams", StreamType::YoutubeChannel, "UCoSrY_IQQVpmIRZ9Xf-y93g")]
#[case("www.youtube.com/@Unknown", StreamType::YoutubeHandle, "Unknown")]
#[case("youtube.com/c/WatsonAmelia", StreamType::YoutubeChannel, "UCyl1z3jo3XHR1riLFKG5UAg")]
#[case("youtube.com/c/Someone", StreamType::YoutubeCustom, "Someone")]
fn youtube_channel_links(
    directory: Directory,
    #[case] input: &str,
    #[case] kind: StreamType,
    #[case] value: &str,
) {
    assert_eq!(resolve(input, &directory), Ok(stream(kind, value)));
}

#[rstest]
#[case("ttv-xyz", StreamType::TwitchChannel, "xyz", "")]
#[case("twitch.tv/xyz", StreamType::TwitchChannel, "xyz", "")]
#[case("https://m.twitch.tv/xyz", StreamType::TwitchChannel, "xyz", "")]
#[case(
    "https://www.twitch.tv/videos/123456?t=1h2m3s",
    StreamType::TwitchVideo,
    "123456",
    "&time=1h2m3s"
)]
fn twitch_links(
    directory: Directory,
    #[case] input: &str,
    #[case] kind: StreamType,
    #[case] value: &str,
    #[case] extras: &str,
) {
    assert_eq!(resolve(input, &directory), Ok(stream(kind, value).with_extras(extras)));
}

#[rstest]
fn known_names_resolve_to_aliases(directory: Directory) {
    assert_eq!(resolve("GOOB", &directory), Ok(stream(StreamType::Alias, "Gawr Gura")));
    assert_eq!(resolve("gawr gura", &directory), Ok(stream(StreamType::Alias, "Gawr Gura")));
}

#[rstest]
fn alias_wins_over_a_valid_url(directory: Directory) {
    // "twitch.tv/goob" is both a registered alias and a valid Twitch channel link.
    assert_eq!(
        Detector::Twitch.detect("twitch.tv/goob", &directory),
        Some(stream(StreamType::TwitchChannel, "goob"))
    );
    assert_eq!(resolve("twitch.tv/goob", &directory), Ok(stream(StreamType::Alias, "Gawr Gura")));
}

#[rstest]
#[case(StreamType::YoutubeVideo, "abc123")]
#[case(StreamType::YoutubeChannel, "UC999")]
#[case(StreamType::YoutubeHandle, "Unknown")]
#[case(StreamType::YoutubeCustom, "Someone")]
#[case(StreamType::TwitchVideo, "123")]
#[case(StreamType::TwitchChannel, "xyz")]
#[case(StreamType::Alias, "Gawr Gura")]
fn links_resolve_back_to_the_same_ref(
    directory: Directory,
    #[case] kind: StreamType,
    #[case] value: &str,
) {
    let original = stream(kind, value).with_extras("&start=5");
    let link = to_link(&original).expect("link");
    assert_eq!(resolve(&link, &directory), Ok(original.without_extras()));
}

#[test]
fn blank_has_no_link() {
    assert_eq!(to_link(&StreamRef::blank()), None);
}
