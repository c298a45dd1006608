use crate::api::AppState;
use crate::api::schemas::gateway::{RelayFrame, WsParams};
use crate::domain::event::RelayEvent;
use axum::{
    extract::{
        Query, State,
        ws::{CloseFrame, Message as WsMessage, WebSocket, WebSocketUpgrade, close_code},
    },
    http::{Extensions, StatusCode},
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use opentelemetry::{
    KeyValue, global,
    metrics::{Counter, UpDownCounter},
};
use tokio::sync::{broadcast, mpsc};
use tower_http::request_id::RequestId;
use tracing::{Instrument, warn};

#[derive(Clone, Debug)]
struct Metrics {
    active_connections: UpDownCounter<i64>,
    frames_dropped_total: Counter<u64>,
}

impl Metrics {
    fn new() -> Self {
        let meter = global::meter("dignity-server");
        Self {
            active_connections: meter
                .i64_up_down_counter("websocket_active_connections")
                .with_description("Number of active WebSocket connections")
                .build(),
            frames_dropped_total: meter
                .u64_counter("websocket_frames_dropped_total")
                .with_description("Relay frames a socket never received, labelled by reason")
                .build(),
        }
    }
}

/// Upgrades to a push-only socket. The access token travels in `?token=`
/// because browsers cannot set headers on a WebSocket handshake.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<WsParams>,
    extensions: Extensions,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let request_id = extensions
        .get::<RequestId>()
        .map(|id| id.header_value().to_str().unwrap_or_default().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    match state.auth_service.verify_token(&params.token) {
        Ok(claims) => ws.on_upgrade(move |socket| handle_socket(socket, state, claims.sub, request_id)),
        Err(e) => {
            warn!(error = %e, "WebSocket handshake failed: invalid token");
            StatusCode::UNAUTHORIZED.into_response()
        }
    }
}

async fn handle_socket(socket: WebSocket, state: AppState, user_id: i64, request_id: String) {
    let span = tracing::info_span!(
        "websocket_session",
        request_id = %request_id,
        user_id = user_id,
        otel.kind = "server",
    );

    async move {
        let metrics = Metrics::new();
        metrics.active_connections.add(1, &[]);
        tracing::info!("WebSocket connected");

        let mut events = state.relay_hub.subscribe(user_id);
        let (mut ws_sink, mut ws_stream) = socket.split();
        let (outbound_tx, mut outbound_rx) = mpsc::channel::<WsMessage>(state.config.relay.outbound_buffer_size.max(1));
        let mut shutdown_rx = state.shutdown_rx.clone();

        loop {
            if *shutdown_rx.borrow() {
                tracing::info!("Shutdown signal received, closing WebSocket");
                let _ = ws_sink
                    .send(WsMessage::Close(Some(CloseFrame {
                        code: close_code::AWAY,
                        reason: "Server shutting down".into(),
                    })))
                    .await;
                break;
            }

            tokio::select! {
                biased;

                _ = shutdown_rx.changed() => {}

                msg = ws_stream.next() => {
                    match msg {
                        Some(Ok(WsMessage::Close(_))) | None => break,
                        Some(Err(e)) => {
                            warn!(error = %e, "WebSocket error");
                            break;
                        }
                        // Clients have nothing to send; pings are answered by axum.
                        Some(Ok(_)) => {}
                    }
                }

                res = outbound_rx.recv() => {
                    match res {
                        Some(frame) => {
                            if ws_sink.send(frame).await.is_err() {
                                break;
                            }
                        }
                        None => break,
                    }
                }

                result = events.recv() => {
                    match result {
                        Ok(event) => enqueue(&outbound_tx, event, &metrics),
                        Err(broadcast::error::RecvError::Lagged(missed)) => {
                            warn!(missed, "WebSocket session lagged behind the relay");
                            metrics.frames_dropped_total.add(missed, &[KeyValue::new("reason", "lagged")]);
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    }
                }
            }
        }

        let _ = ws_sink.close().await;
        metrics.active_connections.add(-1, &[]);
        tracing::info!("WebSocket disconnected");
    }
    .instrument(span)
    .await;
}

fn enqueue(outbound_tx: &mpsc::Sender<WsMessage>, event: RelayEvent, metrics: &Metrics) {
    let frame = RelayFrame::from(event);
    let text = match serde_json::to_string(&frame) {
        Ok(text) => text,
        Err(e) => {
            warn!(error = %e, "Failed to encode relay frame");
            return;
        }
    };

    if outbound_tx.try_send(WsMessage::Text(text.into())).is_err() {
        warn!(kind = %frame.kind, message_id = frame.message.id, "Dropped relay frame due to full buffer");
        metrics.frames_dropped_total.add(1, &[KeyValue::new("reason", "buffer_full")]);
    }
}
