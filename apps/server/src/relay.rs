//! Per-client relay between the dashboard websocket and the upstream
//! market-data stream.
//!
//! Each client lazily opens one upstream socket on its first subscribe.
//! Subscribe frames sent while the upstream is still connecting are queued
//! on the command channel and flushed right after the auth frame. Upstream
//! frames are relayed verbatim; once the client disconnects an `is_alive`
//! guard suppresses any late relays.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message as UpstreamMessage;
use tracing::{debug, warn};

use crate::config::Config;
use crate::protocol::{parse_client_message, ClientRequest, ServerMessage, UpstreamCommand};

pub async fn stream_handler(
    ws: WebSocketUpgrade,
    State(config): State<Arc<Config>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_client(socket, config))
}

/// Sender half of the client connection, shared with the upstream task.
type ClientSender = mpsc::UnboundedSender<String>;

struct UpstreamHandle {
    commands: mpsc::UnboundedSender<String>,
    closed: Arc<AtomicBool>,
}

impl UpstreamHandle {
    fn is_open(&self) -> bool {
        !self.closed.load(Ordering::Acquire)
    }
}

async fn handle_client(socket: WebSocket, config: Arc<Config>) {
    let (mut sink, mut stream) = socket.split();
    let (client_tx, mut client_rx) = mpsc::unbounded_channel::<String>();

    let writer = tokio::spawn(async move {
        while let Some(text) = client_rx.recv().await {
            if sink.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    let is_alive = Arc::new(AtomicBool::new(true));
    let mut upstream: Option<UpstreamHandle> = None;

    while let Some(Ok(message)) = stream.next().await {
        let Message::Text(text) = message else {
            continue;
        };
        match parse_client_message(&text) {
            Ok(ClientRequest::Subscribe { tickers }) => {
                let Some((key, secret)) = config.credentials() else {
                    let _ = client_tx.send(ServerMessage::error(
                        "Server missing Alpaca API credentials.",
                    ));
                    continue;
                };
                let handle = match upstream.take().filter(UpstreamHandle::is_open) {
                    Some(handle) => handle,
                    None => spawn_upstream(
                        config.upstream_url(),
                        key.to_string(),
                        secret.to_string(),
                        client_tx.clone(),
                        is_alive.clone(),
                    ),
                };
                let frame = UpstreamCommand::subscribe(&tickers).to_json();
                if handle.commands.send(frame).is_err() {
                    debug!("Upstream command channel closed before subscribe");
                }
                upstream = Some(handle);
            }
            Ok(ClientRequest::Other) => {}
            Err(err) => {
                let _ = client_tx.send(ServerMessage::error(err.to_string()));
            }
        }
    }

    is_alive.store(false, Ordering::Release);
    drop(upstream);
    writer.abort();
}

/// Connects, authenticates, then pumps queued commands out and upstream
/// frames back until either side closes.
fn spawn_upstream(
    url: String,
    key: String,
    secret: String,
    client: ClientSender,
    is_alive: Arc<AtomicBool>,
) -> UpstreamHandle {
    let (command_tx, mut command_rx) = mpsc::unbounded_channel::<String>();
    let closed = Arc::new(AtomicBool::new(false));
    let closed_flag = closed.clone();

    tokio::spawn(async move {
        let (ws, _) = match connect_async(&url).await {
            Ok(connected) => connected,
            Err(err) => {
                warn!("Upstream connect failed: {err}");
                closed_flag.store(true, Ordering::Release);
                if is_alive.load(Ordering::Acquire) {
                    let _ = client.send(ServerMessage::error(err.to_string()));
                }
                return;
            }
        };
        let (mut write, mut read) = ws.split();

        let auth = UpstreamCommand::Auth { key, secret }.to_json();
        if write.send(UpstreamMessage::text(auth)).await.is_err() {
            closed_flag.store(true, Ordering::Release);
            if is_alive.load(Ordering::Acquire) {
                let _ = client.send(ServerMessage::error("Alpaca stream closed."));
            }
            return;
        }

        loop {
            tokio::select! {
                command = command_rx.recv() => match command {
                    Some(frame) => {
                        if write.send(UpstreamMessage::text(frame)).await.is_err() {
                            break;
                        }
                    }
                    // Client went away; close our side.
                    None => {
                        let _ = write.close().await;
                        break;
                    }
                },
                frame = read.next() => match frame {
                    Some(Ok(UpstreamMessage::Text(raw))) => {
                        if is_alive.load(Ordering::Acquire) {
                            let _ = client.send(raw.to_string());
                        }
                    }
                    Some(Ok(UpstreamMessage::Close(_))) | None => {
                        if is_alive.load(Ordering::Acquire) {
                            let _ = client.send(ServerMessage::error("Alpaca stream closed."));
                        }
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(err)) => {
                        if is_alive.load(Ordering::Acquire) {
                            let _ = client.send(ServerMessage::error(err.to_string()));
                        }
                        break;
                    }
                },
            }
        }
        closed_flag.store(true, Ordering::Release);
    });

    UpstreamHandle {
        commands: command_tx,
        closed,
    }
}
