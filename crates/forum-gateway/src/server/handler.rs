//! WebSocket handler
//!
//! Authenticates the handshake, admits the connection, and runs the
//! receive / send / heartbeat tasks until one of them ends.

use crate::connection::Connection;
use crate::protocol::{ClientMessage, CloseCode, ServerMessage};
use crate::server::GatewayState;
use axum::extract::ws::{CloseFrame, Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::http::{header, HeaderMap};
use axum::response::IntoResponse;
use forum_core::{Snowflake, Topic};
use forum_service::NotificationService;
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::interval;

/// Default heartbeat interval in milliseconds
const HEARTBEAT_INTERVAL_MS: u64 = 45_000;

/// Timeout for no heartbeat before considering connection dead
const HEARTBEAT_TIMEOUT_MS: u64 = 90_000;

/// Channel buffer size for outgoing messages
const MESSAGE_BUFFER_SIZE: usize = 100;

/// Handshake query parameters
#[derive(Debug, Deserialize)]
pub struct ConnectParams {
    /// Bearer token; browsers cannot set headers on WebSocket upgrades
    token: Option<String>,
}

/// WebSocket gateway handler
///
/// The bearer token is verified before the upgrade completes; a rejected
/// handshake is answered with an immediate close frame.
pub async fn gateway_handler(
    State(state): State<GatewayState>,
    Query(params): Query<ConnectParams>,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    let auth = authenticate(&state, &params, &headers);
    ws.on_upgrade(move |socket| handle_socket(state, socket, auth))
}

/// Resolve the actor behind the handshake token
fn authenticate(
    state: &GatewayState,
    params: &ConnectParams,
    headers: &HeaderMap,
) -> Result<Snowflake, CloseCode> {
    let token = match bearer_token(params, headers) {
        Some(token) => token,
        None => return Err(CloseCode::NotAuthenticated),
    };

    state.verifier().verify_actor(&token).map_err(|e| {
        tracing::debug!(error = %e, "Handshake token rejected");
        CloseCode::AuthenticationFailed
    })
}

/// Extract the bearer token from the query string or Authorization header
fn bearer_token(params: &ConnectParams, headers: &HeaderMap) -> Option<String> {
    if let Some(token) = &params.token {
        return Some(token.clone());
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string)
}

/// Handle an upgraded WebSocket connection
async fn handle_socket(
    state: GatewayState,
    mut socket: WebSocket,
    auth: Result<Snowflake, CloseCode>,
) {
    let actor_id = match auth {
        Ok(actor_id) => actor_id,
        Err(code) => {
            tracing::debug!(close_code = %code, "Handshake rejected");
            let frame = CloseFrame {
                code: code.as_u16(),
                reason: code.description().into(),
            };
            socket.send(Message::Close(Some(frame))).await.ok();
            return;
        }
    };

    // Admission: register the connection under a fresh ID
    let connection_id = Connection::generate_id();
    let (tx, mut rx) = mpsc::channel::<ServerMessage>(MESSAGE_BUFFER_SIZE);
    let connection = state
        .registry()
        .add_connection(connection_id.clone(), actor_id, tx);

    tracing::info!(
        connection_id = %connection_id,
        actor_id = %actor_id,
        "WebSocket connection established"
    );

    // Split the WebSocket
    let (mut ws_sink, mut ws_stream) = socket.split();

    // Hello first: announces the heartbeat contract
    let hello = ServerMessage::hello(HEARTBEAT_INTERVAL_MS);
    if send_frame(&mut ws_sink, &hello).await.is_err() {
        tracing::warn!(connection_id = %connection_id, "Failed to send hello frame");
        cleanup_connection(&state, &connection_id).await;
        return;
    }

    // Every connection follows its actor's personal topic
    state
        .registry()
        .subscribe(&connection_id, Topic::user(actor_id))
        .await;

    // Ready carries the unread badge bootstrap; a failed count is not fatal
    let unread = match NotificationService::new(state.service_context())
        .unread_count(actor_id)
        .await
    {
        Ok(count) => count,
        Err(e) => {
            tracing::warn!(
                connection_id = %connection_id,
                error = %e,
                "Failed to load unread count for ready frame"
            );
            0
        }
    };
    let ready = ServerMessage::ready(actor_id.to_string(), connection_id.clone(), unread);
    if send_frame(&mut ws_sink, &ready).await.is_err() {
        tracing::warn!(connection_id = %connection_id, "Failed to send ready frame");
        cleanup_connection(&state, &connection_id).await;
        return;
    }

    // Clone state for tasks
    let state_recv = state.clone();
    let connection_id_recv = connection_id.clone();
    let connection_recv = connection.clone();

    // Spawn task to receive messages from WebSocket
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = ws_stream.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    if let Err(close_code) =
                        handle_text_message(&state_recv, &connection_recv, &text).await
                    {
                        tracing::debug!(
                            connection_id = %connection_id_recv,
                            close_code = ?close_code,
                            "Closing connection due to error"
                        );
                        return Some(close_code);
                    }
                }
                Ok(Message::Binary(_)) => {
                    tracing::debug!(
                        connection_id = %connection_id_recv,
                        "Binary messages not supported"
                    );
                    return Some(CloseCode::DecodeError);
                }
                Ok(Message::Ping(_)) => {
                    tracing::trace!(connection_id = %connection_id_recv, "Ping received");
                    // Pong is handled automatically by axum
                }
                Ok(Message::Pong(_)) => {
                    tracing::trace!(connection_id = %connection_id_recv, "Pong received");
                }
                Ok(Message::Close(_)) => {
                    tracing::info!(connection_id = %connection_id_recv, "Client closed connection");
                    return None;
                }
                Err(e) => {
                    tracing::warn!(
                        connection_id = %connection_id_recv,
                        error = %e,
                        "WebSocket error"
                    );
                    return Some(CloseCode::UnknownError);
                }
            }
        }
        None
    });

    // Clone for send task
    let connection_id_send = connection_id.clone();

    // Spawn task to send messages to WebSocket
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            match msg.to_json() {
                Ok(json) => {
                    if ws_sink.send(Message::Text(json)).await.is_err() {
                        tracing::warn!(
                            connection_id = %connection_id_send,
                            "Failed to send message to WebSocket"
                        );
                        break;
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        connection_id = %connection_id_send,
                        error = %e,
                        "Failed to encode frame"
                    );
                }
            }
        }

        // Close the WebSocket when channel is closed
        let _ = ws_sink.close().await;
    });

    // Clone for heartbeat task
    let connection_id_hb = connection_id.clone();
    let connection_hb = connection.clone();

    // Spawn heartbeat monitoring task
    let mut heartbeat_task = tokio::spawn(async move {
        let mut check_interval = interval(Duration::from_millis(HEARTBEAT_INTERVAL_MS / 2));

        loop {
            check_interval.tick().await;

            let time_since = connection_hb.time_since_heartbeat().await;
            if time_since > Duration::from_millis(HEARTBEAT_TIMEOUT_MS) {
                tracing::warn!(
                    connection_id = %connection_id_hb,
                    time_since_ms = time_since.as_millis(),
                    close_code = %CloseCode::HeartbeatTimeout,
                    "Connection timed out (no heartbeat)"
                );
                break;
            }
        }
    });

    // Wait for any task to complete, or for shutdown
    let mut shutdown = state.shutdown_rx();
    tokio::select! {
        result = &mut recv_task => {
            if let Ok(Some(close_code)) = result {
                tracing::debug!(
                    connection_id = %connection_id,
                    close_code = ?close_code,
                    "Receive task ended with close code"
                );
            }
        }
        _ = &mut send_task => {
            tracing::debug!(connection_id = %connection_id, "Send task ended");
        }
        _ = &mut heartbeat_task => {
            tracing::debug!(connection_id = %connection_id, "Heartbeat task ended");
        }
        _ = shutdown.changed() => {
            tracing::info!(connection_id = %connection_id, "Connection closing for shutdown");
        }
    }

    // Stop whichever tasks are still running
    recv_task.abort();
    send_task.abort();
    heartbeat_task.abort();

    // Clean up
    cleanup_connection(&state, &connection_id).await;
}

/// Encode and send one frame on the sink
async fn send_frame(
    ws_sink: &mut SplitSink<WebSocket, Message>,
    message: &ServerMessage,
) -> Result<(), axum::Error> {
    let json = message.to_json().map_err(axum::Error::new)?;
    ws_sink.send(Message::Text(json)).await
}

/// Handle a text frame from the client
async fn handle_text_message(
    state: &GatewayState,
    connection: &Arc<Connection>,
    text: &str,
) -> Result<(), CloseCode> {
    let message = match ClientMessage::from_json(text) {
        Ok(m) => m,
        Err(e) => {
            tracing::debug!(
                connection_id = %connection.connection_id(),
                error = %e,
                "Failed to parse frame"
            );
            return Err(CloseCode::DecodeError);
        }
    };

    match message {
        ClientMessage::Heartbeat => {
            connection.record_heartbeat().await;
            connection.send(ServerMessage::HeartbeatAck).await.ok();
        }
        ClientMessage::Subscribe { topic } => match Topic::parse(&topic) {
            Some(parsed) => {
                state
                    .registry()
                    .subscribe(connection.connection_id(), parsed)
                    .await;
            }
            None => {
                connection
                    .send(ServerMessage::error(
                        "UNKNOWN_TOPIC",
                        format!("Unknown topic '{topic}'"),
                    ))
                    .await
                    .ok();
            }
        },
        ClientMessage::Unsubscribe { topic } => match Topic::parse(&topic) {
            Some(parsed) => {
                state
                    .registry()
                    .unsubscribe(connection.connection_id(), parsed)
                    .await;
            }
            None => {
                connection
                    .send(ServerMessage::error(
                        "UNKNOWN_TOPIC",
                        format!("Unknown topic '{topic}'"),
                    ))
                    .await
                    .ok();
            }
        },
    }

    Ok(())
}

/// Clean up a connection on disconnect
async fn cleanup_connection(state: &GatewayState, connection_id: &str) {
    tracing::info!(connection_id = %connection_id, "Cleaning up connection");

    // One step: drops the actor link and every topic subscription
    state.registry().remove_connection(connection_id).await;
}
