//! Request/response bodies for the HTTP surface, concretely shaped per
//! `backend/api/*.py`'s request models.

use aegis_core::{ActionRecommendation, ContradictionAlert, VoiceReport};
use serde::{Deserialize, Serialize};
use serde_json::Map;

#[derive(Debug, Deserialize)]
pub struct SignalInput {
    pub content: String,
    #[serde(default)]
    pub metadata: Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct HumanDecision {
    pub item_type: String,
    pub item_id: String,
    pub decision: String,
    pub decided_by: String,
}

#[derive(Debug, Serialize)]
pub struct PendingDecisions {
    pub contradictions: Vec<ContradictionAlert>,
    pub actions: Vec<ActionRecommendation>,
}

#[derive(Debug, Deserialize)]
pub struct AssignResourceInput {
    pub resource_id: String,
    pub incident_id: String,
}

#[derive(Debug, Deserialize)]
pub struct UnassignResourceInput {
    pub incident_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ApproveInput {
    #[serde(default = "default_decided_by")]
    pub decided_by: String,
}

fn default_decided_by() -> String {
    "operator".to_string()
}

#[derive(Debug, Deserialize)]
pub struct StartSimulationInput {
    #[serde(default = "default_scenario_id")]
    pub scenario_id: String,
    pub speed: Option<f64>,
}

fn default_scenario_id() -> String {
    "earthquake_001".to_string()
}

#[derive(Debug, Deserialize)]
pub struct CopilotQuestion {
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct CopilotAnswer {
    pub answer: String,
}

#[derive(Debug, Deserialize)]
pub struct TranscribeInput {
    pub transcript: String,
    #[serde(default)]
    pub camp_name: Option<String>,
    #[serde(default)]
    pub caller_location: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct SynthesizeInput {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SynthesizeResponse {
    pub synthesized: bool,
    pub note: String,
}

#[derive(Debug, Serialize)]
pub struct GraphStats {
    pub incidents: usize,
    pub active_incidents: usize,
    pub resources: usize,
    pub available_resources: usize,
    pub locations: usize,
    pub contradictions: usize,
    pub open_contradictions: usize,
    pub pending_actions: usize,
    pub camps: usize,
    pub voice_reports: usize,
}

#[derive(Debug, Serialize)]
pub struct VoiceReportResponse {
    pub report: Option<VoiceReport>,
}
