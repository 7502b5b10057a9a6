// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Streamwall and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Deterministic benchmark fixtures (no RNG).

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use streamwall::directory::{Directory, ListOrDelimited, StreamerRecord};

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

const AGENCIES: [&str; 4] = ["Hololive", "Nijisanji", "VShojo", "Phase Connect"];
const UNITS: [&str; 5] = ["Gen 1", "Gen 2", "Myth", "Council", "Advent"];

pub struct TempDir {
    path: PathBuf,
}

impl TempDir {
    pub fn new(prefix: &str) -> Self {
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
        let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        let mut path = std::env::temp_dir();
        path.push(format!("streamwall_bench_{prefix}_{}_{nanos}_{counter}", std::process::id()));
        std::fs::create_dir_all(&path).expect("create temp dir");
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

pub fn streamer_name(index: usize) -> String {
    format!("Streamer {index:05}")
}

/// `count` streamers spread over agencies and units, each with a YouTube id, a Twitch handle
/// and one alias. Every seventh record repeats an earlier name to exercise merging.
pub fn records(count: usize) -> Vec<StreamerRecord> {
    (0..count)
        .map(|index| {
            let name = if index % 7 == 6 { streamer_name(index - 3) } else { streamer_name(index) };
            let grouping = format!(
                "{}, {}",
                AGENCIES[index % AGENCIES.len()],
                UNITS[(index / AGENCIES.len()) % UNITS.len()]
            );
            StreamerRecord {
                grouping: Some(ListOrDelimited::Delimited(grouping)),
                aliases: Some(ListOrDelimited::List(vec![format!("nick{index}")])),
                yt_id: Some(format!("UC{index:022}")),
                ttv_handle: Some(format!("ttv_{index}")),
                ..StreamerRecord::named(name)
            }
        })
        .collect()
}

pub fn directory(count: usize) -> Directory {
    Directory::from_records(records(count))
}

/// Writes `files` catalogues of `per_file` records each and returns their paths in order.
pub fn catalogue_files(dir: &Path, files: usize, per_file: usize) -> Vec<PathBuf> {
    let all = records(files * per_file);
    all.chunks(per_file.max(1))
        .enumerate()
        .map(|(index, chunk)| {
            let path = dir.join(format!("catalogue_{index:03}.json"));
            let text = serde_json::to_string(chunk).expect("encode catalogue");
            std::fs::write(&path, text).expect("write catalogue");
            path
        })
        .collect()
}

/// Mixed free-text inputs in the proportions a wall sees them: links, names, explicit forms.
pub fn inputs(count: usize) -> Vec<String> {
    (0..count)
        .map(|index| match index % 6 {
            0 => format!("https://www.youtube.com/watch?v=vid{index:08}&t=30"),
            1 => format!("https://www.twitch.tv/ttv_{index}"),
            2 => format!("youtu.be/vid{index:08}"),
            3 => format!("nick{}", index % 64),
            4 => format!("yt-channel=UC{index:022}"),
            _ => format!("@handle{index}"),
        })
        .collect()
}

/// A `rows`×`columns` query with every cell filled, mixing explicit and heuristic parameters.
pub fn wall_query(rows: usize, columns: usize) -> String {
    let mut query = format!("rows={rows}&columns={columns}");
    for index in 0..rows * columns {
        let param = match index % 4 {
            0 => format!("yt-video=vid{index:08}&t=1m"),
            1 => format!("ttv-channel=ttv_{index}"),
            2 => format!("nick{}", index % 64),
            _ => "blank".to_owned(),
        };
        query.push('&');
        query.push_str(&param);
    }
    query
}
