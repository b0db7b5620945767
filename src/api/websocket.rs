use crate::event::OfficeEvent;
use crate::service::OfficeService;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
    routing::get,
    Router,
};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{error, info, warn};

/// Shared state for the event stream
#[derive(Clone)]
pub struct WsAppState {
    pub office: Arc<OfficeService>,
}

/// GET /api/ws - WebSocket upgrade handler
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<WsAppState>>) -> Response {
    info!("WebSocket upgrade request received");
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// Create WebSocket router
pub fn create_ws_router(state: WsAppState) -> Router {
    Router::new()
        .route("/api/ws", get(ws_handler))
        .with_state(Arc::new(state))
}

/// Forward every office event to the client until either side goes away
async fn handle_socket(mut socket: WebSocket, state: Arc<WsAppState>) {
    let mut event_rx = state.office.subscribe();

    info!(
        subscribers = state.office.subscriber_count(),
        "WebSocket connection established"
    );

    loop {
        tokio::select! {
            Some(msg) = socket.recv() => {
                match msg {
                    Ok(Message::Close(_)) => {
                        info!("WebSocket client disconnected");
                        break;
                    }
                    Ok(Message::Ping(data)) => {
                        if let Err(e) = socket.send(Message::Pong(data)).await {
                            error!(error = %e, "Failed to send pong");
                            break;
                        }
                    }
                    Ok(_) => {
                        // Stream is push-only; ignore client text/binary
                    }
                    Err(e) => {
                        warn!(error = %e, "WebSocket error");
                        break;
                    }
                }
            }

            result = event_rx.recv() => {
                match result {
                    Ok(event) => {
                        if let Err(e) = send_event(&mut socket, &event).await {
                            error!(error = %e, "Failed to send office event");
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped = skipped, "WebSocket lagged, skipped events");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        error!("Office event channel closed");
                        break;
                    }
                }
            }

            else => {
                break;
            }
        }
    }

    info!("WebSocket connection closed");
}

async fn send_event(socket: &mut WebSocket, event: &OfficeEvent) -> anyhow::Result<()> {
    let json = serde_json::to_string(event)?;
    socket.send(Message::Text(json)).await?;
    Ok(())
}
