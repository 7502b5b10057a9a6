// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Streamwall and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use rstest::{fixture, rstest};

use super::{apply_ops, deserialize, serialize, ApplyError, CellMove, GridOp, QueryError, UrlState};
use crate::directory::{Directory, ListOrDelimited, StreamerRecord};
use crate::model::{Grid, GridError, StreamRef, StreamType};

fn stream(kind: StreamType, value: &str) -> StreamRef {
    StreamRef::new(kind, value).expect("stream ref")
}

fn a() -> StreamRef {
    stream(StreamType::YoutubeVideo, "aaa")
}

fn b() -> StreamRef {
    stream(StreamType::TwitchChannel, "bbb")
}

fn blank() -> StreamRef {
    StreamRef::blank()
}

#[fixture]
fn directory() -> Directory {
    Directory::from_records([StreamerRecord {
        aliases: Some(ListOrDelimited::Delimited("goob".to_owned())),
        yt_id: Some("UCgura".to_owned()),
        ..StreamerRecord::named("Gawr Gura")
    }])
}

#[test]
fn set_bumps_rev_and_reports_set_cells() {
    let mut grid = Grid::new(2, 2).expect("grid");
    let result = apply_ops(&mut grid, 0, &[GridOp::Set { index: 1, stream: a() }]).expect("apply");

    assert_eq!(result.new_rev, 1);
    assert_eq!(result.applied, 1);
    assert_eq!(grid.rev(), 1);
    assert_eq!(grid.cell(1), Some(&a()));
    assert_eq!(result.delta.set, vec![1]);
    assert!(result.delta.cleared.is_empty());
}

#[test]
fn stale_base_rev_is_a_conflict() {
    let mut grid = Grid::new(1, 1).expect("grid");
    apply_ops(&mut grid, 0, &[GridOp::Set { index: 0, stream: a() }]).expect("apply");

    let err = apply_ops(&mut grid, 0, &[GridOp::Clear { index: 0 }]).unwrap_err();
    assert_eq!(err, ApplyError::Conflict { base_rev: 0, current_rev: 1 });
    assert_eq!(grid.cell(0), Some(&a()));
}

#[test]
fn batches_are_atomic() {
    let mut grid = Grid::with_cells(1, 2, [a()]).expect("grid");
    let ops = [GridOp::Clear { index: 0 }, GridOp::Set { index: 9, stream: b() }];

    let err = apply_ops(&mut grid, 0, &ops).unwrap_err();
    assert_eq!(err, ApplyError::OutOfBounds { index: 9, capacity: 2 });
    assert_eq!(grid.cells(), &[a(), blank()]);
    assert_eq!(grid.rev(), 0);
}

#[test]
fn empty_batch_keeps_rev() {
    let mut grid = Grid::new(1, 1).expect("grid");
    let result = apply_ops(&mut grid, 0, &[]).expect("apply");
    assert_eq!(result.new_rev, 0);
    assert!(result.delta.is_empty());
}

#[test]
fn swap_reports_moves_and_keeps_embeds() {
    let mut grid = Grid::with_cells(1, 3, [a(), b()]).expect("grid");
    let result = apply_ops(&mut grid, 0, &[GridOp::Swap { a: 0, b: 2 }]).expect("apply");

    assert_eq!(grid.cells(), &[blank(), b(), a()]);
    assert_eq!(result.delta.moved, vec![CellMove { from: 0, to: 2 }]);
    assert_eq!(result.delta.cleared, vec![0]);
    assert!(result.delta.set.is_empty());

    let result = apply_ops(&mut grid, 1, &[GridOp::Swap { a: 1, b: 1 }]).expect("apply");
    assert!(result.delta.is_empty());
}

#[test]
fn copy_creates_a_new_embed() {
    let mut grid = Grid::with_cells(1, 2, [a()]).expect("grid");
    let result = apply_ops(&mut grid, 0, &[GridOp::Copy { from: 0, to: 1 }]).expect("apply");
    assert_eq!(grid.cells(), &[a(), a()]);
    assert_eq!(result.delta.set, vec![1]);
}

#[test]
fn setting_identical_content_is_not_a_change() {
    let mut grid = Grid::with_cells(1, 1, [a()]).expect("grid");
    let result = apply_ops(&mut grid, 0, &[GridOp::Set { index: 0, stream: a() }]).expect("apply");
    assert!(result.delta.is_empty());
    assert_eq!(result.new_rev, 1);
}

#[test]
fn resize_preserves_content() {
    let mut grid = Grid::with_cells(2, 2, [a(), b()]).expect("grid");
    let result =
        apply_ops(&mut grid, 0, &[GridOp::Resize { rows: 1, columns: 2 }]).expect("apply");

    assert_eq!((grid.rows(), grid.columns()), (1, 2));
    assert_eq!(grid.cells(), &[a(), b()]);
    assert!(result.delta.dropped.is_empty());
}

#[test]
fn resize_compacts_into_first_free_slots() {
    let mut grid = Grid::with_cells(2, 2, [a(), blank(), blank(), b()]).expect("grid");
    let result =
        apply_ops(&mut grid, 0, &[GridOp::Resize { rows: 1, columns: 2 }]).expect("apply");

    assert_eq!(grid.cells(), &[a(), b()]);
    assert_eq!(result.delta.moved, vec![CellMove { from: 3, to: 1 }]);
}

#[test]
fn resize_reports_what_does_not_fit() {
    let c = stream(StreamType::Alias, "Gawr Gura");
    let mut grid = Grid::with_cells(2, 2, [a(), b(), c.clone(), blank()]).expect("grid");
    let result =
        apply_ops(&mut grid, 0, &[GridOp::Resize { rows: 1, columns: 1 }]).expect("apply");

    assert_eq!(grid.cells(), &[a()]);
    assert_eq!(result.delta.dropped, vec![b(), c]);
}

#[test]
fn resize_rejects_invalid_dimensions() {
    let mut grid = Grid::new(1, 1).expect("grid");
    let err = apply_ops(&mut grid, 0, &[GridOp::Resize { rows: 0, columns: 2 }]).unwrap_err();
    assert_eq!(
        err,
        ApplyError::InvalidDimensions(GridError::ZeroDimension { rows: 0, columns: 2 })
    );
}

#[test]
fn serialize_writes_dimensions_then_cells() {
    let grid = Grid::with_cells(
        2,
        2,
        [a().with_extras("&start=30"), blank(), stream(StreamType::Alias, "Gawr Gura")],
    )
    .expect("grid");
    let state = UrlState { grid, backend: Some("ws://127.0.0.1:8080".to_owned()) };

    assert_eq!(
        serialize(&state),
        "rows=2&columns=2&backend=ws%3A%2F%2F127.0.0.1%3A8080\
         &yt-video=aaa&start=30&blank&alias=Gawr+Gura"
    );
}

#[test]
fn serialize_omits_trailing_blanks() {
    let state = UrlState::new(Grid::with_cells(1, 3, [a()]).expect("grid"));
    assert_eq!(serialize(&state), "rows=1&columns=3&yt-video=aaa");

    let empty = UrlState::new(Grid::new(3, 3).expect("grid"));
    assert_eq!(serialize(&empty), "rows=3&columns=3");
}

#[rstest]
fn end_to_end_query_round_trip(directory: Directory) {
    let state =
        deserialize("?rows=2&columns=2&yt-video=abc123&ttv-channel=xyz", &directory).expect("ok");

    assert_eq!(
        state.grid.cells(),
        &[
            stream(StreamType::YoutubeVideo, "abc123"),
            stream(StreamType::TwitchChannel, "xyz"),
            blank(),
            blank(),
        ]
    );
    assert_eq!(serialize(&state), "rows=2&columns=2&yt-video=abc123&ttv-channel=xyz");
}

#[rstest]
#[case("rows=2&columns=2")]
#[case("rows=1&columns=4&blank&yt-video=a&blank&ttv-channel=b")]
#[case("rows=1&columns=2&yt-video=a&start=30&ttv-video=9&time=1h")]
#[case("rows=2&columns=1&backend=ws%3A%2F%2Fhost%3A1&alias=Gawr+Gura&yt-handle=Some+One")]
#[case("rows=1&columns=1&yt-channel=UC%26x%3Dy")]
fn canonical_queries_round_trip(directory: Directory, #[case] query: &str) {
    let state = deserialize(query, &directory).expect("deserialize");
    assert_eq!(serialize(&state), query);
    let again = deserialize(&serialize(&state), &directory).expect("deserialize");
    assert!(again.content_eq(&state));
}

#[rstest]
fn encoded_ampersands_stay_in_the_value(directory: Directory) {
    let state = deserialize("rows=1&columns=1&alias=Tom+%26+Jerry&t=5", &directory)
        .expect("deserialize");
    assert_eq!(
        state.grid.cells(),
        &[stream(StreamType::Alias, "Tom & Jerry").with_extras("&t=5")]
    );
}

#[rstest]
fn heuristic_parameters_fill_cells(directory: Directory) {
    let state = deserialize("rows=1&columns=3&goob&ttv-abc&youtu.be%2Fxyz", &directory)
        .expect("deserialize");
    assert_eq!(
        state.grid.cells(),
        &[
            stream(StreamType::Alias, "Gawr Gura"),
            stream(StreamType::TwitchChannel, "abc"),
            stream(StreamType::YoutubeVideo, "xyz"),
        ]
    );
}

#[rstest]
fn extras_attach_to_the_last_filled_cell(directory: Directory) {
    let state = deserialize("rows=1&columns=3&start=5&yt-video=a&blank&unknown=1&t", &directory)
        .expect("deserialize");
    assert_eq!(state.grid.cells(), &[a_with("a", "&unknown=1&t"), blank(), blank()]);
}

fn a_with(id: &str, extras: &str) -> StreamRef {
    stream(StreamType::YoutubeVideo, id).with_extras(extras)
}

#[rstest]
fn surplus_references_and_their_extras_are_dropped(directory: Directory) {
    let state = deserialize(
        "rows=1&columns=1&yt-video=a&start=1&yt-video=b&start=2&ttv-channel=c",
        &directory,
    )
    .expect("deserialize");
    assert_eq!(state.grid.cells(), &[a_with("a", "&start=1")]);
}

#[rstest]
#[case("", QueryError::MissingDimensions)]
#[case("rows=2&yt-video=a", QueryError::MissingDimensions)]
#[case("rows=0&columns=2", QueryError::InvalidDimensions { rows: "0".into(), columns: "2".into() })]
#[case(
    "rows=-1&columns=2",
    QueryError::InvalidDimensions { rows: "-1".into(), columns: "2".into() }
)]
#[case(
    "rows=x&columns=2",
    QueryError::InvalidDimensions { rows: "x".into(), columns: "2".into() }
)]
#[case(
    "rows=100&columns=100",
    QueryError::InvalidDimensions { rows: "100".into(), columns: "100".into() }
)]
fn dimension_errors(directory: Directory, #[case] query: &str, #[case] expected: QueryError) {
    assert_eq!(deserialize(query, &directory), Err(expected));
}
