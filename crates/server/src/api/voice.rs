use axum::extract::State;
use axum::Json;

use aegis_core::VoiceReport;

use super::schemas::{SynthesizeInput, SynthesizeResponse, TranscribeInput, VoiceReportResponse};
use super::AppState;

/// `GET /api/voice/report` -- the most recently filed voice report, if any.
pub async fn latest_report(State(state): State<AppState>) -> Json<VoiceReportResponse> {
    let snapshot = state.coordinator.snapshot().await;
    let report = snapshot.voice_reports.into_values().max_by_key(|r| r.created_at);
    Json(VoiceReportResponse { report })
}

/// `GET /api/voice/reports` -- every filed voice report.
pub async fn reports(State(state): State<AppState>) -> Json<Vec<VoiceReport>> {
    let snapshot = state.coordinator.snapshot().await;
    Json(snapshot.voice_reports.into_values().collect())
}

/// `POST /api/voice/transcribe` -- routes the transcript through the
/// text signal path and stores the resulting `VoiceReport`.
pub async fn transcribe(State(state): State<AppState>, Json(input): Json<TranscribeInput>) -> Json<VoiceReport> {
    let report = state
        .coordinator
        .file_voice_report(&input.transcript, input.camp_name, input.caller_location)
        .await;
    Json(report)
}

/// `POST /api/voice/synthesize` -- the TTS provider is out of scope as an
/// external collaborator, so this returns a deterministic placeholder
/// documenting that synthesis is modeled abstractly, the way analyzer
/// oracles carry fallbacks.
pub async fn synthesize(Json(_input): Json<SynthesizeInput>) -> Json<SynthesizeResponse> {
    Json(SynthesizeResponse {
        synthesized: false,
        note: "TTS provider is modeled abstractly; no audio bytes are produced.".to_string(),
    })
}
