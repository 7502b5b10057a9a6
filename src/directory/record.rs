// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Streamwall and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Wire/catalogue shape of a streamer record.
//!
//! Catalogue files and backend frames use the same record. Grouping and aliases arrive either as
//! a comma-delimited string or as a list; both are accepted.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::model::{GroupPath, LiveStatus, StreamRef, StreamState, StreamType};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum ListOrDelimited {
    List(Vec<String>),
    Delimited(String),
}

impl ListOrDelimited {
    /// Trimmed, non-empty entries.
    pub fn entries(&self) -> Vec<&str> {
        let raw: Vec<&str> = match self {
            Self::List(items) => items.iter().map(String::as_str).collect(),
            Self::Delimited(text) => text.split(',').collect(),
        };
        raw.into_iter().map(str::trim).filter(|entry| !entry.is_empty()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RecordStream {
    #[serde(rename = "type")]
    pub kind: StreamType,
    pub value: String,
}

impl RecordStream {
    pub fn to_stream_ref(&self) -> Option<StreamRef> {
        StreamRef::new(self.kind, self.value.clone()).ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RecordStatus {
    pub state: StreamState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<RecordStream>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// One streamer as delivered by a catalogue file or a backend frame.
///
/// Every field is optional. The flat `live`/`video_id`/`video_name` fields are the older backend
/// status shape and are only consulted when `status` is absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StreamerRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grouping: Option<ListOrDelimited>,
    #[serde(default, alias = "alias", skip_serializing_if = "Option::is_none")]
    pub aliases: Option<ListOrDelimited>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yt_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yt_handle: Option<String>,
    #[serde(default, alias = "yt_old_handle", skip_serializing_if = "Option::is_none")]
    pub yt_custom: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttv_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub streams: Vec<RecordStream>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<RecordStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<i64>,
}

impl StreamerRecord {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: Some(name.into()), ..Self::default() }
    }

    pub fn group_path(&self) -> GroupPath {
        self.grouping
            .as_ref()
            .map(|grouping| grouping.entries().into_iter().map(SmolStr::new).collect())
            .unwrap_or_default()
    }

    pub fn alias_list(&self) -> Vec<SmolStr> {
        self.aliases
            .as_ref()
            .map(|aliases| {
                aliases
                    .entries()
                    .into_iter()
                    .map(|alias| SmolStr::new(alias.to_lowercase()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// `(kind, value)` for each handle present on the record, in identity-match order.
    pub fn handles(&self) -> Vec<(StreamType, &str)> {
        [
            (StreamType::YoutubeChannel, self.yt_id.as_deref()),
            (StreamType::TwitchChannel, self.ttv_handle.as_deref()),
            (StreamType::YoutubeHandle, self.yt_handle.as_deref()),
            (StreamType::YoutubeCustom, self.yt_custom.as_deref()),
        ]
        .into_iter()
        .filter_map(|(kind, value)| {
            let value = value?.trim();
            (!value.is_empty()).then_some((kind, value))
        })
        .collect()
    }

    /// Status carried by this record, if any.
    pub fn live_status(&self) -> Option<LiveStatus> {
        if let Some(status) = &self.status {
            return Some(LiveStatus {
                target: status.target.as_ref().and_then(RecordStream::to_stream_ref),
                state: status.state,
                start_time: status.start_time,
                title: status.title.clone(),
            });
        }

        let live = self.live?;
        let target = self
            .video_id
            .as_deref()
            .and_then(|id| StreamRef::new(StreamType::YoutubeVideo, id).ok());
        let state = match (live, &target) {
            (true, _) => StreamState::Live,
            (false, Some(_)) => StreamState::Upcoming,
            (false, None) => StreamState::Offline,
        };
        Some(LiveStatus {
            target,
            state,
            start_time: self.start_time,
            title: self.video_name.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{ListOrDelimited, StreamerRecord};
    use crate::model::{StreamState, StreamType};

    #[test]
    fn delimited_and_list_forms_agree() {
        let delimited = ListOrDelimited::Delimited("Hololive, Myth ,".to_owned());
        let list = ListOrDelimited::List(vec!["Hololive".to_owned(), " Myth".to_owned()]);
        assert_eq!(delimited.entries(), vec!["Hololive", "Myth"]);
        assert_eq!(list.entries(), delimited.entries());
    }

    #[test]
    fn parses_catalogue_shape() {
        let record: StreamerRecord = serde_json::from_str(
            r#"{"name":"Watson Amelia","grouping":"Hololive, Myth","aliases":"Ame,Amelia",
                "yt_id":"UCyl1z3jo3XHR1riLFKG5UAg","yt_old_handle":"WatsonAmelia"}"#,
        )
        .expect("record");

        assert_eq!(record.group_path().as_slice(), ["Hololive", "Myth"]);
        assert_eq!(record.alias_list(), vec!["ame", "amelia"]);
        assert_eq!(
            record.handles(),
            vec![
                (StreamType::YoutubeChannel, "UCyl1z3jo3XHR1riLFKG5UAg"),
                (StreamType::YoutubeCustom, "WatsonAmelia"),
            ]
        );
        assert_eq!(record.live_status(), None);
    }

    #[test]
    fn flat_status_fields_map_to_live_status() {
        let record: StreamerRecord =
            serde_json::from_str(r#"{"yt_id":"UC1","live":false,"video_id":"abc","start_time":5}"#)
                .expect("record");
        let status = record.live_status().expect("status");
        assert_eq!(status.state, StreamState::Upcoming);
        assert_eq!(status.start_time, Some(5));
        assert_eq!(
            status.target.as_ref().and_then(|target| target.pair()),
            Some((StreamType::YoutubeVideo, "abc"))
        );
    }

    #[test]
    fn structured_status_wins_over_flat_fields() {
        let record: StreamerRecord = serde_json::from_str(
            r#"{"live":true,"status":{"state":"offline"}}"#,
        )
        .expect("record");
        let status = record.live_status().expect("status");
        assert_eq!(status.state, StreamState::Offline);
        assert_eq!(status.target, None);
    }
}
