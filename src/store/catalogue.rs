// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Streamwall and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Static streamer catalogues: JSON arrays of streamer records, one file per list.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::info;

use super::StoreError;
use crate::directory::{Directory, IngestSummary, ListOrDelimited, StreamerRecord};

#[derive(Debug, Clone, PartialEq)]
pub struct Catalogue {
    pub path: PathBuf,
    pub records: Vec<StreamerRecord>,
}

/// Reads one catalogue. Records without a grouping are filed under the file stem.
pub fn read_catalogue(path: &Path) -> Result<Catalogue, StoreError> {
    let text = fs::read_to_string(path)
        .map_err(|source| StoreError::Io { path: path.to_path_buf(), source })?;
    let mut records: Vec<StreamerRecord> = serde_json::from_str(&text)
        .map_err(|source| StoreError::Json { path: path.to_path_buf(), source })?;

    if let Some(stem) = path.file_stem().map(|stem| stem.to_string_lossy().into_owned()) {
        for record in &mut records {
            if record.group_path().is_empty() {
                record.grouping = Some(ListOrDelimited::Delimited(stem.clone()));
            }
        }
    }

    Ok(Catalogue { path: path.to_path_buf(), records })
}

/// Parses every catalogue in parallel, then ingests them strictly in the order given; earlier
/// files win identity claims. Nothing is ingested when any file fails.
pub fn load_catalogues<P: AsRef<Path> + Sync>(
    paths: &[P],
    directory: &mut Directory,
) -> Result<IngestSummary, StoreError> {
    let catalogues = paths
        .par_iter()
        .map(|path| read_catalogue(path.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;

    let mut summary = IngestSummary::default();
    for catalogue in catalogues {
        let count = catalogue.records.len();
        let loaded = directory.ingest(catalogue.records);
        info!(
            path = %catalogue.path.display(),
            records = count,
            created = loaded.created,
            "catalogue loaded"
        );
        summary.created += loaded.created;
        summary.merged += loaded.merged;
        summary.skipped += loaded.skipped;
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::{load_catalogues, read_catalogue};
    use crate::directory::Directory;
    use crate::model::StreamType;
    use crate::store::test_support::TempDir;
    use crate::store::StoreError;

    const HOLOLIVE: &str = r#"[
        {"name": "Gawr Gura", "grouping": "Hololive, Myth", "yt_id": "UCgura", "aliases": "goob"},
        {"name": "Tokino Sora", "yt_id": "UCsora"}
    ]"#;

    const INDIE: &str = r#"[
        {"name": "Filian", "ttv_handle": "filian"},
        {"name": "Impostor", "yt_id": "UCgura", "aliases": ["goob", "fake"]}
    ]"#;

    #[test]
    fn missing_grouping_falls_back_to_file_stem() {
        let tmp = TempDir::new("catalogue-stem");
        let path = tmp.path().join("hololive.json");
        fs::write(&path, HOLOLIVE).expect("write");

        let catalogue = read_catalogue(&path).expect("read");
        let groups: Vec<_> =
            catalogue.records.iter().map(|record| record.group_path().to_vec()).collect();
        assert_eq!(groups, vec![vec!["Hololive", "Myth"], vec!["hololive"]]);
    }

    #[test]
    fn earlier_catalogues_win_identity_claims() {
        let tmp = TempDir::new("catalogue-order");
        let holo = tmp.path().join("hololive.json");
        let indie = tmp.path().join("indie.json");
        fs::write(&holo, HOLOLIVE).expect("write");
        fs::write(&indie, INDIE).expect("write");

        let mut forward = Directory::new();
        let summary = load_catalogues(&[&holo, &indie], &mut forward).expect("load");
        assert_eq!(summary.created, 4);
        let owner = forward.find_by_identity(StreamType::Alias, "goob").expect("goob");
        assert_eq!(owner.name().as_str(), "Gawr Gura");
        let owner = forward.find_by_identity(StreamType::YoutubeChannel, "UCgura").expect("id");
        assert_eq!(owner.name().as_str(), "Gawr Gura");

        let mut backward = Directory::new();
        load_catalogues(&[&indie, &holo], &mut backward).expect("load");
        let owner = backward.find_by_identity(StreamType::Alias, "goob").expect("goob");
        assert_eq!(owner.name().as_str(), "Impostor");
    }

    #[test]
    fn a_broken_file_loads_nothing() {
        let tmp = TempDir::new("catalogue-broken");
        let good = tmp.path().join("good.json");
        let bad = tmp.path().join("bad.json");
        fs::write(&good, HOLOLIVE).expect("write");
        fs::write(&bad, "[{").expect("write");

        let mut directory = Directory::new();
        let err = load_catalogues(&[&good, &bad], &mut directory).unwrap_err();
        assert!(matches!(err, StoreError::Json { .. }));
        assert!(directory.is_empty());

        let missing = tmp.path().join("missing.json");
        assert!(matches!(read_catalogue(&missing), Err(StoreError::Io { .. })));
    }
}
