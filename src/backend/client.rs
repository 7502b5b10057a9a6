// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Streamwall and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The backend client loop.
//!
//! One `select!` loop owns the [`Wall`] for the lifetime of a connection: backend frames,
//! keep-alive, reconcile ticks and UI commands are handled one at a time, so a merge is never
//! observed half-done.

use tokio::sync::mpsc;
use tokio::time::{interval, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::protocol::{decode, encode, ClientMessage};
use super::session::{BackendSession, PendingRefer, SessionEvent};
use super::transport::{Transport, WebSocketTransport};
use super::BackendError;
use crate::action::CellIndex;
use crate::config::BackendConfig;
use crate::model::StreamRef;
use crate::wall::{Effect, Wall};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiCommand {
    /// Text typed or pasted into a cell. Whatever the wall cannot settle locally goes to the
    /// backend.
    Input { cell: CellIndex, input: String },
    /// Ask the backend about input the resolver could not place.
    Refer { cell: CellIndex, input: String },
    /// Channel search whose answer lands in `cell`.
    Search { cell: CellIndex, query: String },
    /// Ask who owns a stream and whether it is live.
    Learn(StreamRef),
    Restart,
    AutoUpdate,
    Shutdown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    Connected { url: String },
    Disconnected,
    /// Something the user should see: repeated connect failures, version drift.
    Alert(String),
    Session(SessionEvent),
    /// Output of a reconcile tick.
    Effects(Vec<Effect>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionEnd {
    /// The backend went away; the client will try again.
    Closed,
    /// The UI asked to stop, or dropped its command sender.
    Shutdown,
}

#[derive(Debug)]
pub struct BackendClient {
    config: BackendConfig,
    session: BackendSession,
    failures: u32,
}

impl BackendClient {
    pub fn new(config: BackendConfig) -> Self {
        Self { config, session: BackendSession::new(), failures: 0 }
    }

    pub fn session(&self) -> &BackendSession {
        &self.session
    }

    /// Connects, serves and reconnects until the UI shuts the client down.
    ///
    /// The backend location comes from the wall (URL override, then local store) and falls back
    /// to the configured URL.
    pub async fn run(
        &mut self,
        wall: &mut Wall,
        commands: &mut mpsc::Receiver<UiCommand>,
        events: &mpsc::UnboundedSender<ClientEvent>,
    ) {
        loop {
            let url = wall.backend_location().unwrap_or(self.config.url.as_str()).to_owned();
            match WebSocketTransport::connect(&url, self.config.connect_timeout()).await {
                Ok(mut transport) => {
                    self.failures = 0;
                    info!(%url, "connected to backend");
                    emit(events, ClientEvent::Connected { url: url.clone() });

                    let end = self.run_connection(&mut transport, wall, commands, events).await;
                    if let Err(err) = transport.close().await {
                        debug!(%err, "backend close handshake failed");
                    }
                    for refer in self.session.forget_pending() {
                        emit(events, ClientEvent::Session(SessionEvent::Unresolved(refer)));
                    }
                    match end {
                        Ok(ConnectionEnd::Shutdown) => return,
                        Ok(ConnectionEnd::Closed) => info!(%url, "backend closed the connection"),
                        Err(err) => warn!(%url, %err, "backend connection lost"),
                    }
                    emit(events, ClientEvent::Disconnected);
                }
                Err(err) => self.connect_failed(&err, events),
            }

            if self.wait_for_retry(wall, commands, events).await == ConnectionEnd::Shutdown {
                return;
            }
        }
    }

    /// Serves one open connection. Sends `init` straight away and again on every keep-alive
    /// tick.
    pub async fn run_connection<T: Transport>(
        &mut self,
        transport: &mut T,
        wall: &mut Wall,
        commands: &mut mpsc::Receiver<UiCommand>,
        events: &mpsc::UnboundedSender<ClientEvent>,
    ) -> Result<ConnectionEnd, BackendError> {
        let mut keepalive = ticker(self.config.keepalive());
        let mut reconcile = ticker(self.config.reconcile_interval());

        loop {
            tokio::select! {
                frame = transport.recv() => {
                    let Some(frame) = frame? else {
                        return Ok(ConnectionEnd::Closed);
                    };
                    self.receive(&frame, wall, events);
                }
                _ = keepalive.tick() => {
                    let init = self.session.init_message(wall);
                    transport.send(encode(&init)?).await?;
                }
                _ = reconcile.tick() => emit_effects(events, wall.reconcile()),
                command = commands.recv() => {
                    let Some(command) = command.filter(|command| *command != UiCommand::Shutdown)
                    else {
                        return Ok(ConnectionEnd::Shutdown);
                    };
                    for message in self.requests(command, wall, events) {
                        transport.send(encode(&message)?).await?;
                    }
                }
            }
        }
    }

    /// Frames to send for one UI command. Local results of `Input` are emitted as effects.
    fn requests(
        &mut self,
        command: UiCommand,
        wall: &mut Wall,
        events: &mpsc::UnboundedSender<ClientEvent>,
    ) -> Vec<ClientMessage> {
        match command {
            UiCommand::Input { cell, input } => {
                let mut messages = Vec::new();
                let mut local = Vec::new();
                for effect in set_input(wall, cell, &input, events) {
                    match effect {
                        Effect::Refer { cell, input } => {
                            messages.push(self.session.refer(cell, input));
                        }
                        Effect::Search { cell, query } => {
                            messages.push(self.session.search(cell, query));
                        }
                        Effect::Learn { stream } => messages.extend(self.session.live(&stream)),
                        effect => local.push(effect),
                    }
                }
                emit_effects(events, local);
                messages
            }
            UiCommand::Refer { cell, input } => vec![self.session.refer(cell, input)],
            UiCommand::Search { cell, query } => vec![self.session.search(cell, query)],
            UiCommand::Learn(stream) => self.session.live(&stream).into_iter().collect(),
            UiCommand::Restart => vec![ClientMessage::Restart],
            UiCommand::AutoUpdate => vec![ClientMessage::AutoUpdate],
            UiCommand::Shutdown => Vec::new(),
        }
    }

    fn receive(
        &mut self,
        frame: &str,
        wall: &mut Wall,
        events: &mpsc::UnboundedSender<ClientEvent>,
    ) {
        let message = match decode(frame) {
            Ok(message) => message,
            Err(err) => {
                warn!(%err, "dropping malformed backend frame");
                return;
            }
        };

        match self.session.handle(message, wall) {
            Ok(handled) => {
                for event in handled {
                    if let SessionEvent::VersionMismatch { ours, theirs, applied } = &event {
                        let note = if *applied { "" } else { "; its data was ignored" };
                        emit(
                            events,
                            ClientEvent::Alert(format!(
                                "backend version {} differs from ours ({}){note}",
                                dotted(theirs),
                                dotted(ours)
                            )),
                        );
                    }
                    emit(events, ClientEvent::Session(event));
                }
            }
            Err(err) => {
                warn!(%err, "backend answer could not be applied");
                emit(events, ClientEvent::Alert(err.to_string()));
            }
        }
    }

    fn connect_failed(
        &mut self,
        err: &BackendError,
        events: &mpsc::UnboundedSender<ClientEvent>,
    ) {
        self.failures = self.failures.saturating_add(1);
        if self.failures == 1 {
            debug!(%err, "backend unavailable");
        } else {
            emit(events, ClientEvent::Alert(err.to_string()));
        }
    }

    /// Keeps reconciling while disconnected; refer requests are answered as unresolved.
    async fn wait_for_retry(
        &mut self,
        wall: &mut Wall,
        commands: &mut mpsc::Receiver<UiCommand>,
        events: &mpsc::UnboundedSender<ClientEvent>,
    ) -> ConnectionEnd {
        let retry = tokio::time::sleep(self.config.retry_interval());
        tokio::pin!(retry);
        let mut reconcile = ticker(self.config.reconcile_interval());

        loop {
            tokio::select! {
                () = &mut retry => return ConnectionEnd::Closed,
                _ = reconcile.tick() => emit_effects(events, wall.reconcile()),
                command = commands.recv() => match command {
                    None | Some(UiCommand::Shutdown) => return ConnectionEnd::Shutdown,
                    Some(UiCommand::Input { cell, input }) => {
                        let mut local = Vec::new();
                        for effect in set_input(wall, cell, &input, events) {
                            match effect {
                                Effect::Refer { cell, input } => unresolved(events, cell, input),
                                Effect::Search { cell, query } => unresolved(events, cell, query),
                                Effect::Learn { stream } => {
                                    debug!(%stream, "backend offline; not looking up stream");
                                }
                                effect => local.push(effect),
                            }
                        }
                        emit_effects(events, local);
                    }
                    Some(UiCommand::Refer { cell, input }) => unresolved(events, cell, input),
                    Some(UiCommand::Search { cell, query }) => unresolved(events, cell, query),
                    Some(command) => debug!(?command, "backend offline; dropping command"),
                },
            }
        }
    }
}

/// Runs the wall's own resolution; a failure is reported to the user and yields no effects.
fn set_input(
    wall: &mut Wall,
    cell: CellIndex,
    input: &str,
    events: &mpsc::UnboundedSender<ClientEvent>,
) -> Vec<Effect> {
    wall.set_from_string(cell, input).unwrap_or_else(|err| {
        debug!(cell, %err, "input rejected");
        emit(events, ClientEvent::Alert(err.to_string()));
        Vec::new()
    })
}

fn unresolved(events: &mpsc::UnboundedSender<ClientEvent>, cell: CellIndex, input: String) {
    let refer = PendingRefer { cell, input };
    emit(events, ClientEvent::Session(SessionEvent::Unresolved(refer)));
}

fn ticker(period: std::time::Duration) -> Interval {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

fn emit(events: &mpsc::UnboundedSender<ClientEvent>, event: ClientEvent) {
    // The UI may already be gone during shutdown.
    let _ = events.send(event);
}

fn emit_effects(events: &mpsc::UnboundedSender<ClientEvent>, effects: Vec<Effect>) {
    if !effects.is_empty() {
        emit(events, ClientEvent::Effects(effects));
    }
}

fn dotted(version: &[u32; 3]) -> String {
    format!("{}.{}.{}", version[0], version[1], version[2])
}
