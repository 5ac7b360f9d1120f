//! Bidirectional `/ws` endpoint. Grounded on the split-sender/receiver,
//! `tokio::select!`-joined idiom in
//! `other_examples/.../relayer-src-server.rs.rs`'s `handle_ws`, since the
//! teacher itself only implements SSE subscriptions.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use super::AppState;

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[derive(Debug, Deserialize)]
struct InboundFrame {
    #[serde(rename = "type")]
    frame_type: String,
    #[serde(default)]
    payload: Value,
}

#[derive(Debug, Deserialize, Default)]
struct HumanDecisionPayload {
    item_type: String,
    item_id: String,
    decision: String,
    #[serde(default = "default_operator")]
    decided_by: String,
}

fn default_operator() -> String {
    "operator".to_string()
}

async fn handle_ws(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();
    let mut events = state.coordinator.broadcaster().subscribe();

    // Send the catch-up snapshot a freshly connected dashboard needs:
    // the full graph plus current simulation status.
    let snapshot = state.coordinator.snapshot().await;
    let sim_status = state.coordinator.simulation_status().await;
    if send_frame(&mut sender, "initial_state", serde_json::to_value(&snapshot).unwrap_or(json!({}))).await.is_err() {
        return;
    }
    if send_frame(&mut sender, "sim_status", serde_json::to_value(&sim_status).unwrap_or(json!({}))).await.is_err() {
        return;
    }

    let forward_task = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => {
                    let frame = json!({
                        "type": event.event_type,
                        "payload": event.payload,
                        "timestamp": event.timestamp,
                    });
                    let Ok(text) = serde_json::to_string(&frame) else { continue };
                    if sender.send(Message::Text(text.into())).await.is_err() {
                        break;
                    }
                }
                Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => continue,
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    let receive_state = state.clone();
    let receive_task = tokio::spawn(async move {
        while let Some(message) = receiver.next().await {
            match message {
                Ok(Message::Text(text)) => handle_inbound(&receive_state, &text).await,
                Ok(Message::Close(_)) => break,
                Ok(_) => {}
                Err(err) => {
                    warn!(error = %err, "websocket receive error, closing connection");
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = forward_task => {},
        _ = receive_task => {},
    }
}

async fn send_frame(
    sender: &mut futures::stream::SplitSink<WebSocket, Message>,
    frame_type: &str,
    payload: Value,
) -> Result<(), axum::Error> {
    let frame = json!({ "type": frame_type, "payload": payload, "timestamp": chrono::Utc::now() });
    let text = serde_json::to_string(&frame).unwrap_or_else(|_| "{}".to_string());
    sender.send(Message::Text(text.into())).await
}

/// Dispatches one inbound client frame. A malformed frame or an unknown
/// `type` is logged and the connection stays open rather than closed.
async fn handle_inbound(state: &AppState, text: &str) {
    let frame: InboundFrame = match serde_json::from_str(text) {
        Ok(frame) => frame,
        Err(err) => {
            warn!(error = %err, "malformed websocket frame, ignoring");
            return;
        }
    };

    match frame.frame_type.as_str() {
        "human_decision" => {
            let Ok(decision) = serde_json::from_value::<HumanDecisionPayload>(frame.payload) else {
                warn!("malformed human_decision payload, ignoring");
                return;
            };
            let result = if decision.item_type == "contradiction" {
                state.coordinator.resolve_contradiction(&decision.item_id, &decision.decision, &decision.decided_by).await
            } else if decision.decision == "reject" {
                state.coordinator.reject_action(&decision.item_id, &decision.decided_by).await
            } else {
                state.coordinator.approve_action(&decision.item_id, &decision.decided_by).await
            };
            if let Err(err) = result {
                warn!(error = %err, item_id = %decision.item_id, "human_decision frame failed to apply");
            }
        }
        "request_refresh" => {
            let snapshot = state.coordinator.snapshot().await;
            state.coordinator.broadcaster().broadcast("graph_update", serde_json::to_value(&snapshot).unwrap_or(json!({})));
        }
        "start_simulation" => {
            let scenario_id = frame.payload.get("scenario_id").and_then(Value::as_str).unwrap_or("earthquake_001");
            let speed = frame.payload.get("speed").and_then(Value::as_f64).unwrap_or(state.settings.simulation_speed);
            state.driver.start(scenario_id, speed).await;
        }
        "pause_simulation" => state.driver.pause().await,
        "resume_simulation" => state.driver.resume().await,
        "reset_simulation" => state.driver.reset().await,
        other => warn!(frame_type = other, "unrecognized websocket frame type, ignoring"),
    }
}
