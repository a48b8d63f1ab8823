//! Wire types for the client websocket and the upstream data stream.

use serde::Serialize;
use serde_json::Value;

/// Parsed client request. Anything that is valid JSON but not a subscribe
/// request is silently ignored.
#[derive(Debug, PartialEq)]
pub enum ClientRequest {
    Subscribe { tickers: Vec<String> },
    Other,
}

#[derive(Debug, thiserror::Error)]
#[error("Invalid message from client.")]
pub struct InvalidClientMessage;

pub fn parse_client_message(raw: &str) -> Result<ClientRequest, InvalidClientMessage> {
    let value: Value = serde_json::from_str(raw).map_err(|_| InvalidClientMessage)?;
    let is_subscribe = value.get("type").and_then(Value::as_str) == Some("subscribe");
    let Some(tickers) = value.get("tickers").and_then(Value::as_array) else {
        return Ok(ClientRequest::Other);
    };
    if !is_subscribe {
        return Ok(ClientRequest::Other);
    }
    let tickers = tickers
        .iter()
        .filter_map(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    Ok(ClientRequest::Subscribe { tickers })
}

/// Frames the server originates; upstream frames are relayed verbatim.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerMessage {
    Error { message: String },
}

impl ServerMessage {
    pub fn error(message: impl Into<String>) -> String {
        let frame = ServerMessage::Error {
            message: message.into(),
        };
        // A static two-field enum always serializes.
        serde_json::to_string(&frame).unwrap_or_default()
    }
}

/// Commands sent to the upstream stream after connecting.
#[derive(Debug, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum UpstreamCommand {
    Auth {
        key: String,
        secret: String,
    },
    Subscribe {
        quotes: Vec<String>,
        trades: Vec<String>,
    },
}

impl UpstreamCommand {
    pub fn subscribe(tickers: &[String]) -> Self {
        UpstreamCommand::Subscribe {
            quotes: tickers.to_vec(),
            trades: tickers.to_vec(),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
