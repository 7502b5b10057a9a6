// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Streamwall and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Text-frame transports the client loop runs over.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::debug;

use super::BackendError;

const CHANNEL_CAPACITY: usize = 64;

/// A bidirectional stream of JSON text frames.
///
/// `recv` returning `Ok(None)` means the peer closed the connection cleanly. Both methods must be
/// cancel safe: the client loop races `recv` against its timers.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn send(&mut self, frame: String) -> Result<(), BackendError>;

    async fn recv(&mut self) -> Result<Option<String>, BackendError>;

    async fn close(&mut self) -> Result<(), BackendError> {
        Ok(())
    }
}

/// In-process transport over tokio channels; the other end of the pair plays the server.
#[derive(Debug)]
pub struct ChannelTransport {
    tx: Option<mpsc::Sender<String>>,
    rx: mpsc::Receiver<String>,
}

impl ChannelTransport {
    #[must_use]
    pub fn pair() -> (Self, Self) {
        let (left_tx, right_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (right_tx, left_rx) = mpsc::channel(CHANNEL_CAPACITY);
        (Self { tx: Some(left_tx), rx: left_rx }, Self { tx: Some(right_tx), rx: right_rx })
    }
}

impl Transport for ChannelTransport {
    async fn send(&mut self, frame: String) -> Result<(), BackendError> {
        let tx = self.tx.as_ref().ok_or(BackendError::Closed)?;
        tx.send(frame).await.map_err(|_| BackendError::Closed)
    }

    async fn recv(&mut self) -> Result<Option<String>, BackendError> {
        Ok(self.rx.recv().await)
    }

    async fn close(&mut self) -> Result<(), BackendError> {
        self.tx = None;
        Ok(())
    }
}

pub struct WebSocketTransport {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl std::fmt::Debug for WebSocketTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebSocketTransport").finish_non_exhaustive()
    }
}

impl WebSocketTransport {
    /// Opens `url`, giving up after `timeout`.
    pub async fn connect(url: &str, timeout: Duration) -> Result<Self, BackendError> {
        let attempt = tokio_tungstenite::connect_async(url);
        let (stream, _response) = tokio::time::timeout(timeout, attempt)
            .await
            .map_err(|_| BackendError::Timeout { url: url.to_owned(), after: timeout })?
            .map_err(|source| BackendError::Connect { url: url.to_owned(), source })?;
        Ok(Self { stream })
    }
}

impl Transport for WebSocketTransport {
    async fn send(&mut self, frame: String) -> Result<(), BackendError> {
        self.stream.send(Message::Text(frame)).await.map_err(|err| {
            debug!(%err, "websocket write failed");
            BackendError::Closed
        })
    }

    async fn recv(&mut self) -> Result<Option<String>, BackendError> {
        loop {
            match self.stream.next().await {
                None | Some(Ok(Message::Close(_))) => return Ok(None),
                Some(Ok(Message::Text(text))) => return Ok(Some(text)),
                // Pings are answered by tungstenite on the next read or write.
                Some(Ok(_)) => continue,
                Some(Err(err)) => {
                    debug!(%err, "websocket read failed");
                    return Err(BackendError::Closed);
                }
            }
        }
    }

    async fn close(&mut self) -> Result<(), BackendError> {
        self.stream.close(None).await.map_err(|_| BackendError::Closed)
    }
}
