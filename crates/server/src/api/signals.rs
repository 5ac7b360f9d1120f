//! Signal ingestion. Image and audio signals arrive as `multipart/form-data`
//! (a description/transcript text field plus an optional JSON `metadata`
//! field); text signals arrive as a plain JSON body.

use aegis_coordinator::{ProcessedSignal, SignalContent, SignalMetadata};
use aegis_core::Location;
use axum::extract::{Multipart, State};
use axum::Json;
use serde_json::{Map, Value};
use tracing::warn;

use super::schemas::SignalInput;
use super::AppState;

/// `POST /api/signals/image` -- multipart body with a `description` field.
pub async fn ingest_image(State(state): State<AppState>, multipart: Multipart) -> Json<ProcessedSignal> {
    let (description, metadata) = read_multipart_signal(multipart, "description").await;
    let processed = state
        .coordinator
        .process_signal(SignalContent::Image { description }, SignalMetadata { location: location_from_metadata(&metadata, true) })
        .await;
    Json(processed)
}

/// `POST /api/signals/audio` -- multipart body with a `transcript` field.
pub async fn ingest_audio(State(state): State<AppState>, multipart: Multipart) -> Json<ProcessedSignal> {
    let (transcript, metadata) = read_multipart_signal(multipart, "transcript").await;
    let processed = state
        .coordinator
        .process_signal(SignalContent::Audio { context_hint: transcript }, SignalMetadata { location: location_from_metadata(&metadata, true) })
        .await;
    Json(processed)
}

/// `POST /api/signals/text` -- JSON body, matching `graph/schemas.py::SignalInput`.
pub async fn ingest_text(State(state): State<AppState>, Json(input): Json<SignalInput>) -> Json<ProcessedSignal> {
    let source_type = input.metadata.get("source_type").and_then(Value::as_str).unwrap_or("unverified").to_string();
    let processed = state
        .coordinator
        .process_signal(
            SignalContent::Text { content: input.content, source_type },
            SignalMetadata { location: location_from_metadata(&input.metadata, false) },
        )
        .await;
    Json(processed)
}

async fn read_multipart_signal(mut multipart: Multipart, content_field: &str) -> (String, Map<String, Value>) {
    let mut content = String::new();
    let mut metadata = Map::new();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(err) => {
                warn!(error = %err, "malformed multipart field, stopping read");
                break;
            }
        };
        let Some(name) = field.name().map(str::to_string) else { continue };
        let Ok(text) = field.text().await else { continue };

        if name == content_field {
            content = text;
        } else if name == "metadata" {
            if let Ok(Value::Object(map)) = serde_json::from_str(&text) {
                metadata = map;
            }
        }
    }

    (content, metadata)
}

/// Pulls `lat`/`lng`/`sector`/`name` out of a signal's free-form metadata
/// map, if present. `requires_coords` mirrors the simulation driver's
/// distinction: image/audio signals only get a `Location` when both
/// coordinates are present (otherwise the coordinator's jittered fallback
/// applies); text signals keep a name-only `Location` so claims can
/// accumulate against an entity without coordinates.
pub fn location_from_metadata(metadata: &Map<String, Value>, requires_coords: bool) -> Option<Location> {
    let lat = metadata.get("lat").and_then(Value::as_f64);
    let lng = metadata.get("lng").and_then(Value::as_f64);
    let sector = metadata.get("sector").and_then(Value::as_str).map(str::to_string);
    let name = metadata.get("name").and_then(Value::as_str).map(str::to_string);

    if requires_coords {
        return Some(Location { lat: lat?, lng: lng?, sector, name, address: None });
    }
    if lat.is_none() && lng.is_none() && sector.is_none() && name.is_none() {
        return None;
    }
    Some(Location { lat: lat.unwrap_or(0.0), lng: lng.unwrap_or(0.0), sector, name, address: None })
}
