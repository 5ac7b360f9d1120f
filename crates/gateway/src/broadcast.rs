//! The process-wide fan-out registry that pushes typed messages to every
//! connected dashboard sink.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::broadcast;

/// One `{type, payload, timestamp}` frame, matching the wire shape of
/// every server-to-client WebSocket message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BroadcastEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub payload: Value,
    pub timestamp: DateTime<Utc>,
}

/// Default channel depth. Slow subscribers that fall this far behind see
/// a `Lagged` error on their next receive rather than blocking the
/// coordinator: delivery is best-effort and unordered across sinks, but
/// FIFO within a given sink.
const DEFAULT_CAPACITY: usize = 256;

/// Fans a single stream of [`BroadcastEvent`]s out to every subscriber.
/// Cloning a `Broadcaster` shares the same underlying channel.
#[derive(Clone)]
pub struct Broadcaster {
    sender: broadcast::Sender<BroadcastEvent>,
}

impl Broadcaster {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Registers a new sink. The returned receiver only sees events sent
    /// after this call; callers that need an initial snapshot must send
    /// one explicitly (the HTTP layer does this with `initial_state` and
    /// `sim_status` on `/ws` connect).
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<BroadcastEvent> {
        self.sender.subscribe()
    }

    /// Sends one event to every current subscriber. A send with zero
    /// subscribers is not an error: dashboards may simply not be
    /// connected yet.
    pub fn broadcast(&self, event_type: &str, payload: Value) {
        let event = BroadcastEvent {
            event_type: event_type.to_string(),
            payload,
            timestamp: Utc::now(),
        };
        let _ = self.sender.send(event);
    }
}

impl Default for Broadcaster {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn subscribers_receive_broadcast_events() {
        let fabric = Broadcaster::new();
        let mut sink = fabric.subscribe();

        fabric.broadcast("graph_update", json!({"incidents": 1}));

        let event = sink.recv().await.unwrap();
        assert_eq!(event.event_type, "graph_update");
        assert_eq!(event.payload["incidents"], 1);
    }

    #[tokio::test]
    async fn broadcast_with_no_subscribers_does_not_panic() {
        let fabric = Broadcaster::new();
        fabric.broadcast("signal_processed", json!({}));
    }

    #[test]
    fn event_serializes_type_field_under_type_key() {
        let event = BroadcastEvent {
            event_type: "decision_made".to_string(),
            payload: json!({"decision_id": "rec_1"}),
            timestamp: Utc::now(),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "decision_made");
    }
}
