// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Streamwall and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::path::{Path, PathBuf};

use streamwall::action::{classify, ActionKind};
use streamwall::directory::{Directory, NeighborScope};
use streamwall::model::{StreamRef, StreamType, Streamer};
use streamwall::ops::{deserialize, serialize};
use streamwall::store::{load_catalogues, LocalStore};
use streamwall::wall::{Effect, Wall, WallOptions};

fn catalogue(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("catalogues")
        .join(name)
}

fn loaded() -> Directory {
    let mut directory = Directory::new();
    load_catalogues(&[catalogue("hololive.json"), catalogue("indie.json")], &mut directory)
        .unwrap_or_else(|err| panic!("failed to load catalogues: {err}"));
    directory
}

fn groups(streamer: &Streamer) -> Vec<&str> {
    streamer.group_path().iter().map(|segment| segment.as_str()).collect()
}

fn stream(kind: StreamType, value: &str) -> StreamRef {
    StreamRef::new(kind, value).expect("stream ref")
}

#[test]
fn query_loads_and_serializes_back() {
    let directory = loaded();
    let state = deserialize("?rows=2&columns=2&yt-video=abc123&ttv-channel=xyz", &directory)
        .expect("deserialize");

    assert_eq!(
        state.grid.cells(),
        &[
            stream(StreamType::YoutubeVideo, "abc123"),
            stream(StreamType::TwitchChannel, "xyz"),
            StreamRef::blank(),
            StreamRef::blank(),
        ]
    );
    assert_eq!(serialize(&state), "rows=2&columns=2&yt-video=abc123&ttv-channel=xyz");
}

#[test]
fn earlier_catalogue_entries_win_handles() {
    let directory = loaded();
    let gura = directory.streamer("Gawr Gura").expect("gura");

    assert_eq!(gura.handles().youtube_id(), Some("UCoSrY_IQQVpmIRZ9Xf-y93g"));
    assert_eq!(groups(gura), ["Hololive", "English", "Myth"]);
    let goob = directory.find_by_identity(StreamType::Alias, "goob").expect("alias");
    assert_eq!(goob.name().as_str(), "Gawr Gura");

    let filian = directory.streamer("filian").expect("filian");
    assert_eq!(groups(filian), ["indie"]);
}

#[test]
fn resize_compacts_instead_of_dropping() {
    let directory = loaded();
    let state = deserialize("rows=2&columns=2&blank&goob&blank&ttv-channel=filian", &directory)
        .expect("deserialize");
    let mut wall = Wall::new(directory, state, LocalStore::in_memory(), WallOptions::default());

    // The surplus stream takes the first free slot; nothing is lost.
    wall.resize(1, 2).expect("resize");
    assert_eq!(
        wall.grid().cells(),
        &[stream(StreamType::TwitchChannel, "filian"), stream(StreamType::Alias, "Gawr Gura")]
    );
    assert_eq!(wall.query(), "rows=1&columns=2&ttv-channel=filian&alias=Gawr+Gura");
}

#[test]
fn a_session_at_the_wall() {
    let directory = loaded();
    let state = deserialize("rows=1&columns=3&goob", &directory).expect("deserialize");
    let mut wall = Wall::new(directory, state, LocalStore::in_memory(), WallOptions::default());
    let first = wall.reconcile();
    assert!(matches!(first.as_slice(), [Effect::Render(updates)] if updates.len() == 1));

    // Paste a link into the second cell, then walk the first to the next Myth member.
    wall.set_from_string(1, "https://www.twitch.tv/shylily").expect("switch");
    wall.key_down("n", false, Some(0));
    wall.key_up("n", Some(0)).expect("next");
    assert_eq!(wall.grid().cell(0), Some(&stream(StreamType::Alias, "Watson Amelia")));

    // Move it to the third cell with a held key and a different hovered cell on release.
    wall.key_down("m", false, Some(0));
    wall.key_up("m", Some(2)).expect("move");
    assert_eq!(wall.query(), "rows=1&columns=3&blank&ttv-channel=shylily&alias=Watson+Amelia");
    assert!(wall.embeds()[2].is_some());
}

#[test]
fn neighbours_cycle_within_the_group() {
    let directory = loaded();
    let gura = stream(StreamType::Alias, "Gawr Gura");
    let next = directory.neighbor(&gura, 1, NeighborScope::Group).expect("next");
    let wrapped = directory.neighbor(&gura, 2, NeighborScope::Group).expect("wrapped");
    assert_eq!(next.name().as_str(), "Watson Amelia");
    assert_eq!(wrapped.name().as_str(), "Gawr Gura");
}

#[test]
fn gestures_classify_independent_of_cell_contents() {
    assert_eq!(classify(0.0, 0.0, 200, true), Some(ActionKind::Switch));
    assert_eq!(classify(100.0, 0.0, 200, true), Some(ActionKind::PreviousGlobal));
    assert_eq!(classify(100.0, 0.0, 200, false), Some(ActionKind::PreviousGlobal));
}
