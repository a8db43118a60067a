//! WebSocket streaming endpoint for real-time flight updates

use axum::extract::ws::{Message, WebSocket};
use axum::{
    extract::{Path, State, WebSocketUpgrade},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::models::{normalize_airport_code, RealTimeSnapshot};
use crate::state::AppState;

/// GET /api/v1/airports/:code/ws
///
/// Upgrades connection to WebSocket for real-time flight streaming.
/// Only snapshots for the requested airport are forwarded.
pub async fn ws_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
    ws: WebSocketUpgrade,
) -> Response {
    let airport_code = match normalize_airport_code(&code) {
        Ok(code) => code,
        Err(e) => return e.into_response(),
    };
    ws.on_upgrade(move |socket| handle_socket(socket, state, airport_code))
}

/// Wait for the next snapshot published for `airport_code`.
///
/// Snapshots for other airports are skipped. Returns `None` once the
/// channel is closed.
pub async fn next_snapshot_for(
    rx: &mut broadcast::Receiver<Arc<RealTimeSnapshot>>,
    airport_code: &str,
) -> Option<Arc<RealTimeSnapshot>> {
    loop {
        match rx.recv().await {
            Ok(snapshot) if snapshot.airport_code == airport_code => return Some(snapshot),
            Ok(_) => continue,
            Err(broadcast::error::RecvError::Lagged(count)) => {
                warn!(lagged = count, "Broadcast receiver lagged, snapshots dropped");
            }
            Err(broadcast::error::RecvError::Closed) => return None,
        }
    }
}

/// Opening frame for a new subscriber, in the same shape as later updates
async fn current_snapshot(state: &AppState, airport_code: &str) -> Option<RealTimeSnapshot> {
    match state.engine.get_flight_log(airport_code).await {
        Ok(flights) => Some(RealTimeSnapshot {
            airport_code: airport_code.to_string(),
            generated_at: Utc::now(),
            flights: flights.as_ref().clone(),
        }),
        Err(e) => {
            warn!(airport = %airport_code, error = %e, "No initial flight log for subscriber");
            None
        }
    }
}

/// Handle WebSocket connection
async fn handle_socket(socket: WebSocket, state: AppState, airport_code: String) {
    info!(airport = %airport_code, "WebSocket client connected");
    state.metrics.inc_ws_connections();

    let (mut sender, mut receiver) = socket.split();
    let mut broadcast_rx = state.broadcast_tx.subscribe();

    // Send the current log first so the client does not wait a full tick
    if let Some(snapshot) = current_snapshot(&state, &airport_code).await {
        if let Ok(json) = serde_json::to_string(&snapshot) {
            let _ = sender.send(Message::Text(json.into())).await;
        }
    }

    let room = airport_code.clone();
    let mut send_task = tokio::spawn(async move {
        while let Some(snapshot) = next_snapshot_for(&mut broadcast_rx, &room).await {
            let json = match serde_json::to_string(snapshot.as_ref()) {
                Ok(j) => j,
                Err(e) => {
                    warn!(error = %e, "Failed to serialize snapshot");
                    continue;
                }
            };

            if sender.send(Message::Text(json.into())).await.is_err() {
                // Client disconnected
                break;
            }
        }
    });

    // Drain client frames until close (pongs are handled by axum)
    let mut recv_task = tokio::spawn(async move {
        while let Some(result) = receiver.next().await {
            match result {
                Ok(Message::Close(_)) => break,
                Ok(_) => {}
                Err(_) => break,
            }
        }
    });

    // Whichever side finishes first ends the session; abort the other so
    // its receiver and sink are released
    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    state.metrics.dec_ws_connections();
    info!(airport = %airport_code, "WebSocket client disconnected");
}
