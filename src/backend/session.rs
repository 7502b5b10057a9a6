// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Streamwall and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Protocol state for one backend: version checks and refer correlation.
//!
//! The session does no I/O. The client loop feeds it decoded frames together with the wall they
//! apply to and sends whatever messages it hands back.

use std::collections::HashMap;

use tracing::{debug, warn};

use super::protocol::{ClientMessage, RequestId, ServerMessage, PROTOCOL_VERSION};
use crate::action::CellIndex;
use crate::directory::{IngestOutcome, IngestSummary, RecordStream, StreamerRecord};
use crate::model::{StreamRef, StreamType};
use crate::ops::GridOp;
use crate::wall::{Effect, Wall, WallError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRefer {
    pub cell: CellIndex,
    pub input: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Server `init` merged into the directory.
    Synced(IngestSummary),
    Updated(IngestOutcome),
    /// Server speaks another version. `applied` is false when the major version differs and the
    /// frame was dropped.
    VersionMismatch { ours: [u32; 3], theirs: [u32; 3], applied: bool },
    /// A refer answer landed in its cell.
    Referred { cell: CellIndex, effects: Vec<Effect> },
    /// The backend had no answer either.
    Unresolved(PendingRefer),
}

#[derive(Debug)]
pub struct BackendSession {
    version: [u32; 3],
    next_id: RequestId,
    pending: HashMap<RequestId, PendingRefer>,
}

impl Default for BackendSession {
    fn default() -> Self {
        Self::new()
    }
}

impl BackendSession {
    pub fn new() -> Self {
        Self::with_version(PROTOCOL_VERSION)
    }

    pub fn with_version(version: [u32; 3]) -> Self {
        Self { version, next_id: 1, pending: HashMap::new() }
    }

    pub fn version(&self) -> [u32; 3] {
        self.version
    }

    /// Refer requests still waiting for an answer.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Hello/keep-alive carrying every record the wall knows.
    pub fn init_message(&self, wall: &Wall) -> ClientMessage {
        ClientMessage::Init { version: self.version, init_data: wall.directory().records() }
    }

    pub fn refer(&mut self, cell: CellIndex, input: impl Into<String>) -> ClientMessage {
        let input = input.into();
        let response_id = self.track(cell, input.clone());
        ClientMessage::Refer { response_id, value: input }
    }

    /// Channel search; the answer lands in `cell` the same way a refer answer does.
    pub fn search(&mut self, cell: CellIndex, query: impl Into<String>) -> ClientMessage {
        let query = query.into();
        let response_id = self.track(cell, query.clone());
        ClientMessage::Search { response_id, query }
    }

    /// Status lookup for a stream nobody claims yet. Blank and alias refs have nothing to ask.
    pub fn live(&self, stream: &StreamRef) -> Option<ClientMessage> {
        let (kind, value) = stream.pair().filter(|(kind, _)| *kind != StreamType::Alias)?;
        Some(ClientMessage::Live { data: RecordStream { kind, value: value.to_owned() } })
    }

    fn track(&mut self, cell: CellIndex, input: String) -> RequestId {
        let response_id = self.next_id;
        self.next_id += 1;
        self.pending.insert(response_id, PendingRefer { cell, input });
        response_id
    }

    /// Answers outstanding after a reconnect are never coming.
    pub fn forget_pending(&mut self) -> Vec<PendingRefer> {
        let mut pending: Vec<(RequestId, PendingRefer)> = self.pending.drain().collect();
        pending.sort_by_key(|(id, _)| *id);
        pending.into_iter().map(|(_, refer)| refer).collect()
    }

    pub fn handle(
        &mut self,
        message: ServerMessage,
        wall: &mut Wall,
    ) -> Result<Vec<SessionEvent>, WallError> {
        match message {
            ServerMessage::Init { version, init_data } => Ok(self.sync(version, init_data, wall)),
            ServerMessage::Update { data } => {
                Ok(vec![SessionEvent::Updated(wall.directory_mut().ingest_record(data))])
            }
            ServerMessage::Refer { response_id, data, streamer } => {
                let Some(pending) = self.pending.remove(&response_id) else {
                    debug!(response_id, "ignoring refer answer nobody asked for");
                    return Ok(Vec::new());
                };
                if let Some(record) = streamer {
                    wall.directory_mut().ingest_record(record);
                }
                let stream = data
                    .and_then(|data| data.to_stream_ref())
                    .filter(|stream| stream.kind() != StreamType::Blank);
                let Some(stream) = stream else {
                    return Ok(vec![SessionEvent::Unresolved(pending)]);
                };
                let effects = wall.apply(&[GridOp::Set { index: pending.cell, stream }])?;
                Ok(vec![SessionEvent::Referred { cell: pending.cell, effects }])
            }
        }
    }

    fn sync(
        &self,
        theirs: [u32; 3],
        records: Vec<StreamerRecord>,
        wall: &mut Wall,
    ) -> Vec<SessionEvent> {
        let ours = self.version;
        if theirs[0] != ours[0] {
            warn!(?ours, ?theirs, "backend major version differs; ignoring its data");
            return vec![SessionEvent::VersionMismatch { ours, theirs, applied: false }];
        }

        let summary = wall.directory_mut().ingest(records);
        let mut events = vec![SessionEvent::Synced(summary)];
        if theirs != ours {
            warn!(?ours, ?theirs, "backend version differs");
            events.push(SessionEvent::VersionMismatch { ours, theirs, applied: true });
        }
        events
    }
}
