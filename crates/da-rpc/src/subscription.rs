//! WebSocket header subscription.
//!
//! `header.Subscribe` returns a channel id; the node then streams headers as
//! `xrpc.ch.val` notifications on that id until it sends `xrpc.ch.close` or
//! the socket drops. A reader task decodes headers into a bounded channel, so
//! a slow consumer stalls socket reads instead of growing a buffer.

use std::time::Duration;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::{header::AUTHORIZATION, HeaderValue};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use da_types::ExtendedHeader;

use crate::jsonrpc::{JsonRpcRequest, SocketMessage};
use crate::RpcError;

const SUBSCRIBE_METHOD: &str = "header.Subscribe";

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsWrite = SplitSink<WsStream, Message>;
type WsRead = SplitStream<WsStream>;

/// Receiving end of a header subscription.
///
/// Yields headers in delivery order; `None` once the node closed the
/// subscription, sent a header that could not be decoded, the socket failed,
/// or the subscription was cancelled.
#[derive(Debug)]
pub struct RpcHeaderSubscription {
    receiver: mpsc::Receiver<ExtendedHeader>,
}

impl RpcHeaderSubscription {
    pub fn into_receiver(self) -> mpsc::Receiver<ExtendedHeader> {
        self.receiver
    }
}

/// Open the socket, subscribe, and wait for the node to confirm.
///
/// Returns only after the node accepted the subscription, so setup errors are
/// reported to the caller rather than to the reader task. Setup fails with
/// [`RpcError::Timeout`] after `setup_timeout` and with
/// [`RpcError::Cancelled`] as soon as `cancel` fires.
pub(crate) async fn subscribe_headers(
    ws_url: &str,
    token: Option<&str>,
    request_id: u64,
    capacity: usize,
    setup_timeout: Duration,
    cancel: CancellationToken,
) -> Result<RpcHeaderSubscription, RpcError> {
    let setup = open_channel(ws_url, token, request_id);
    let (write, read, channel_id) = tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            return Err(RpcError::Cancelled { method: SUBSCRIBE_METHOD });
        }
        result = tokio::time::timeout(setup_timeout, setup) => {
            result.map_err(|_| RpcError::Timeout {
                method: SUBSCRIBE_METHOD,
                after: setup_timeout,
            })??
        }
    };
    info!(channel = %channel_id, "Header subscription confirmed");

    let (tx, rx) = mpsc::channel(capacity.max(1));
    tokio::spawn(read_loop(write, read, channel_id, tx, cancel));

    Ok(RpcHeaderSubscription { receiver: rx })
}

async fn open_channel(
    ws_url: &str,
    token: Option<&str>,
    request_id: u64,
) -> Result<(WsWrite, WsRead, Value), RpcError> {
    let mut request = ws_url.into_client_request()?;
    if let Some(token) = token {
        let value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| RpcError::InvalidToken(e.to_string()))?;
        request.headers_mut().insert(AUTHORIZATION, value);
    }

    let (ws_stream, _) = connect_async(request).await?;
    let (mut write, mut read) = ws_stream.split();

    let subscribe = JsonRpcRequest::new(SUBSCRIBE_METHOD, Vec::<()>::new(), request_id);
    let text = serde_json::to_string(&subscribe).map_err(|source| RpcError::Encode {
        method: SUBSCRIBE_METHOD,
        source,
    })?;
    write.send(Message::Text(text.into())).await?;

    let channel_id = await_confirmation(&mut write, &mut read, request_id).await?;
    Ok((write, read, channel_id))
}

async fn await_confirmation(
    write: &mut WsWrite,
    read: &mut WsRead,
    request_id: u64,
) -> Result<Value, RpcError> {
    while let Some(msg) = read.next().await {
        match msg? {
            Message::Text(text) => {
                let Ok(response) = serde_json::from_str::<SocketMessage>(&text) else {
                    continue;
                };
                if response.id != Some(request_id) {
                    continue;
                }
                if let Some(error) = response.error {
                    return Err(RpcError::Rpc {
                        method: SUBSCRIBE_METHOD,
                        code: error.code,
                        message: error.message,
                    });
                }
                return response.result.ok_or(RpcError::MissingResult {
                    method: SUBSCRIBE_METHOD,
                });
            }
            Message::Ping(data) => write.send(Message::Pong(data)).await?,
            Message::Close(_) => break,
            _ => {}
        }
    }
    Err(RpcError::SubscriptionNotConfirmed)
}

async fn read_loop(
    mut write: WsWrite,
    mut read: WsRead,
    channel_id: Value,
    tx: mpsc::Sender<ExtendedHeader>,
    cancel: CancellationToken,
) {
    loop {
        let msg = tokio::select! {
            _ = cancel.cancelled() => {
                debug!("Header subscription cancelled");
                let _ = write.send(Message::Close(None)).await;
                break;
            }
            msg = read.next() => msg,
        };

        match msg {
            Some(Ok(Message::Text(text))) => match handle_text(&text, &channel_id) {
                Notification::Header(header) => {
                    // Suspends while the consumer is busy.
                    tokio::select! {
                        _ = cancel.cancelled() => {
                            debug!("Header subscription cancelled while delivering");
                            let _ = write.send(Message::Close(None)).await;
                            break;
                        }
                        sent = tx.send(*header) => {
                            if sent.is_err() {
                                debug!("Header consumer dropped, closing subscription");
                                break;
                            }
                        }
                    }
                }
                Notification::Closed => {
                    warn!("Node closed the header subscription");
                    break;
                }
                Notification::Undecodable(reason) => {
                    error!("Failed to decode subscribed header, closing subscription: {}", reason);
                    let _ = write.send(Message::Close(None)).await;
                    break;
                }
                Notification::Ignored => {}
            },
            Some(Ok(Message::Ping(data))) => {
                let _ = write.send(Message::Pong(data)).await;
            }
            Some(Ok(Message::Close(_))) | None => {
                warn!("Header subscription socket closed");
                break;
            }
            Some(Ok(_)) => {}
            Some(Err(e)) => {
                error!("Header subscription socket error: {}", e);
                break;
            }
        }
    }
}

#[derive(Debug)]
enum Notification {
    Header(Box<ExtendedHeader>),
    Closed,
    /// A value on our channel that is not a header ends the subscription.
    Undecodable(String),
    Ignored,
}

fn handle_text(text: &str, channel_id: &Value) -> Notification {
    let Ok(message) = serde_json::from_str::<SocketMessage>(text) else {
        return Notification::Ignored;
    };

    if message.closed_channel() == Some(channel_id) {
        return Notification::Closed;
    }

    match message.channel_value() {
        Some((chan, value)) if &chan == channel_id => {
            match serde_json::from_value::<ExtendedHeader>(value) {
                Ok(header) => Notification::Header(Box::new(header)),
                Err(e) => Notification::Undecodable(e.to_string()),
            }
        }
        _ => Notification::Ignored,
    }
}
