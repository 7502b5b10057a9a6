// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Streamwall and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Live-status backend: wire protocol, session state and the websocket client loop.

use std::fmt;
use std::time::Duration;

mod client;
pub mod protocol;
mod session;
mod transport;

pub use client::{BackendClient, ClientEvent, ConnectionEnd, UiCommand};
pub use protocol::{ClientMessage, ServerMessage, PROTOCOL_VERSION};
pub use session::{BackendSession, PendingRefer, SessionEvent};
pub use transport::{ChannelTransport, Transport, WebSocketTransport};

#[derive(Debug)]
pub enum BackendError {
    Timeout { url: String, after: Duration },
    Connect { url: String, source: tokio_tungstenite::tungstenite::Error },
    Closed,
    Codec(serde_json::Error),
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout { url, after } => {
                write!(f, "backend at {url} did not answer within {}ms", after.as_millis())
            }
            Self::Connect { url, source } => write!(f, "cannot reach backend at {url}: {source}"),
            Self::Closed => f.write_str("backend connection closed"),
            Self::Codec(err) => write!(f, "cannot encode backend message: {err}"),
        }
    }
}

impl std::error::Error for BackendError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Connect { source, .. } => Some(source),
            Self::Codec(err) => Some(err),
            Self::Timeout { .. } | Self::Closed => None,
        }
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        Self::Codec(err)
    }
}
