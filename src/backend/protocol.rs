// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Streamwall and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Backend wire format: JSON text frames tagged by `type`, camelCase fields.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::directory::{RecordStream, StreamerRecord};

/// `[major, minor, patch]` sent with every `init`.
pub const PROTOCOL_VERSION: [u32; 3] = [1, 0, 0];

pub type RequestId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    /// Sent on connect and as a keep-alive.
    #[serde(rename_all = "camelCase")]
    Init { version: [u32; 3], init_data: Vec<StreamerRecord> },
    /// Free text the resolver could not place.
    #[serde(rename_all = "camelCase")]
    Refer { response_id: RequestId, value: String },
    /// Channel search for `yt-<query>` input. Answered with `refer`, like a refer request.
    #[serde(rename_all = "camelCase")]
    Search { response_id: RequestId, query: String },
    /// Asks which streamer owns a stream and whether it is live. Answered with `update`.
    Live { data: RecordStream },
    Restart,
    AutoUpdate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    #[serde(rename_all = "camelCase")]
    Init {
        version: [u32; 3],
        #[serde(default)]
        init_data: Vec<StreamerRecord>,
    },
    Update { data: StreamerRecord },
    #[serde(rename_all = "camelCase")]
    Refer {
        response_id: RequestId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<RecordStream>,
        /// Record for the streamer the answer belongs to, merged before the cell is set.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        streamer: Option<StreamerRecord>,
    },
}

pub fn encode(message: &ClientMessage) -> Result<String, serde_json::Error> {
    serde_json::to_string(message)
}

pub fn decode(frame: &str) -> Result<ServerMessage, serde_json::Error> {
    serde_json::from_str(frame)
}

/// JSON schema covering both directions, as printed by `streamwall schema`.
pub fn schema() -> serde_json::Value {
    serde_json::json!({
        "client": schemars::schema_for!(ClientMessage),
        "server": schemars::schema_for!(ServerMessage),
    })
}
