//! The orchestrator: signal ingestion, graph mutation, contradiction
//! detection, planning triggers, operator decisions, and the simulation
//! and debate entry points the rest of the workspace drives. Grounded on
//! `original_source`'s `coordinator.py`.

use std::collections::VecDeque;
use std::sync::Arc;

use aegis_analyzer::{
    AllocationAnalyzer, AllocationInput, AudioAnalyzer, AudioInput, DebateAnalyzer, DebateInput,
    Oracle, PlanningAnalyzer, PlanningInput, TemporalAnalyzer, TemporalInput, TextAnalyzer,
    TextInput, VerificationAnalyzer, VerificationInput, VisionAnalyzer, VisionInput,
};
use aegis_audit::{AuditRecord, AuditStore};
use aegis_core::{
    AllocationPlan, CampRecommendation, Claim, ContradictionAlert, DamageLevel, DebateTurn,
    GraphError, IncidentNode, IncidentStatus, Location, LocationNode, RecommendedActionType,
    ResourceAssignment, ResourceNode, ResourceStatus, Severity, SituationGraph, SourceReference,
    SourceType, Urgency, Verdict, VoiceReport,
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::{Mutex, RwLock};
use tokio::time::sleep;
use tracing::warn;
use uuid::Uuid;

use crate::broadcast::Broadcaster;
use crate::contradiction_detector::ContradictionDetector;
use crate::error::CoordinatorError;
use crate::planning_trigger::{PlanningTrigger, MAX_PENDING_ACTIONS};

/// Confidence loss per minute stamped on every freshly created incident.
/// The upstream analyzers never supply a decay rate of their own.
const DEFAULT_DECAY_RATE: f64 = 0.01;

/// Pacing gap between consecutive debate turn broadcasts.
const DEBATE_TURN_PACING: std::time::Duration = std::time::Duration::from_millis(500);

/// Cap on the in-memory recent-events ring.
const RECENT_EVENTS_CAPACITY: usize = 50;

/// One modality's worth of signal content. The text variant also carries
/// the source classification the text analyzer needs for its
/// credibility bucket.
#[derive(Debug, Clone)]
pub enum SignalContent {
    Image { description: String },
    Audio { context_hint: String },
    Text { content: String, source_type: String },
}

impl SignalContent {
    fn kind(&self) -> &'static str {
        match self {
            SignalContent::Image { .. } => "image",
            SignalContent::Audio { .. } => "audio",
            SignalContent::Text { .. } => "text",
        }
    }
}

/// Side-channel context accompanying a signal: where it happened, if
/// known.
#[derive(Debug, Clone, Default)]
pub struct SignalMetadata {
    pub location: Option<Location>,
}

/// The uniform result handed back from one `process_signal` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedSignal {
    pub signal_id: String,
    pub analyzer: String,
    pub output_type: String,
    pub confidence: f64,
    pub data: Value,
}

/// One entry in the recent-events ring, broadcast as `timeline_event`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub id: String,
    pub event_type: String,
    pub timestamp: DateTime<Utc>,
    pub data: Value,
}

/// Current simulation lifecycle state, as returned to operators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationStatus {
    pub running: bool,
    pub paused: bool,
    pub scenario_id: Option<String>,
    pub scenario_name: Option<String>,
    pub current_sim_time: DateTime<Utc>,
}

/// The result of a batch allocation pass: the plan itself, plus the camp
/// recommendations computed alongside it. `generate_allocation_plan`
/// returns both without registering the camps in the graph;
/// `generate_camp_recommendations` additionally registers them.
#[derive(Debug, Clone)]
pub struct AllocationOutcome {
    pub plan: AllocationPlan,
    pub camps: Vec<CampRecommendation>,
}

/// Coordinator-internal bookkeeping that sits alongside the graph rather
/// than inside it: claim accumulation, the planning clock, the
/// recent-events ring, and simulation lifecycle flags.
struct CoordinatorState {
    contradiction_detector: ContradictionDetector,
    planning_trigger: PlanningTrigger,
    recent_events: VecDeque<TimelineEvent>,
    simulation_running: bool,
    simulation_paused: bool,
    scenario_id: Option<String>,
    scenario_name: Option<String>,
}

impl CoordinatorState {
    fn new() -> Self {
        Self {
            contradiction_detector: ContradictionDetector::new(),
            planning_trigger: PlanningTrigger::new(),
            recent_events: VecDeque::new(),
            simulation_running: false,
            simulation_paused: false,
            scenario_id: None,
            scenario_name: None,
        }
    }
}

/// Owns the situation graph, the eight analyzer oracles, the broadcast
/// fabric, and the coordinator-internal bookkeeping above. All
/// mutations go through its methods; concurrent `process_signal` calls
/// serialize on the single graph-wide lock.
pub struct Coordinator {
    graph: RwLock<SituationGraph>,
    state: Mutex<CoordinatorState>,
    audit_store: Arc<dyn AuditStore>,
    broadcaster: Broadcaster,
    oracle: Arc<dyn Oracle>,
    vision: VisionAnalyzer,
    audio: AudioAnalyzer,
    text: TextAnalyzer,
    verification: VerificationAnalyzer,
    planning: PlanningAnalyzer,
    temporal: TemporalAnalyzer,
    allocation: AllocationAnalyzer,
    debate: DebateAnalyzer,
}

impl Coordinator {
    pub(crate) fn new(oracle: Arc<dyn Oracle>, audit_store: Arc<dyn AuditStore>, broadcaster: Broadcaster) -> Self {
        Self {
            graph: RwLock::new(SituationGraph::new(Utc::now())),
            state: Mutex::new(CoordinatorState::new()),
            audit_store,
            broadcaster,
            vision: VisionAnalyzer::new(oracle.clone()),
            audio: AudioAnalyzer::new(oracle.clone()),
            text: TextAnalyzer::new(oracle.clone()),
            verification: VerificationAnalyzer::new(oracle.clone()),
            planning: PlanningAnalyzer::new(oracle.clone()),
            temporal: TemporalAnalyzer::new(oracle.clone()),
            allocation: AllocationAnalyzer::new(oracle.clone()),
            debate: DebateAnalyzer::new(oracle.clone()),
            oracle,
        }
    }

    #[must_use]
    pub fn broadcaster(&self) -> &Broadcaster {
        &self.broadcaster
    }

    /// A clone of the current graph, for read-only HTTP views.
    pub async fn snapshot(&self) -> SituationGraph {
        self.graph.read().await.clone()
    }

    /// The most recent events in the bounded timeline ring, oldest first.
    pub async fn timeline(&self) -> Vec<TimelineEvent> {
        self.state.lock().await.recent_events.iter().cloned().collect()
    }

    // ---- signal ingestion ------------------------------------------------

    /// The end-to-end pipeline: dispatch to the matching analyzer, merge
    /// the result into the graph, run the contradiction detector
    /// (outside simulation mode) and the planning trigger, and broadcast
    /// the resulting deltas.
    pub async fn process_signal(&self, content: SignalContent, metadata: SignalMetadata) -> ProcessedSignal {
        let signal_id = short_id();
        let now = Utc::now();

        self.push_event(
            &format!("signal_{}", content.kind()),
            json!({ "signal_id": signal_id }),
        )
        .await;

        let output = match &content {
            SignalContent::Image { description } => {
                self.vision
                    .analyze(&VisionInput {
                        signal_id: signal_id.clone(),
                        source_id: signal_id.clone(),
                        image_description: description.clone(),
                    })
                    .await
            }
            SignalContent::Audio { context_hint } => {
                self.audio
                    .analyze(&AudioInput {
                        signal_id: signal_id.clone(),
                        source_id: signal_id.clone(),
                        context_hint: context_hint.clone(),
                    })
                    .await
            }
            SignalContent::Text { content, source_type } => {
                self.text
                    .analyze(&TextInput {
                        signal_id: signal_id.clone(),
                        source_id: signal_id.clone(),
                        content: content.clone(),
                        source_type: source_type.clone(),
                    })
                    .await
            }
        };

        self.broadcaster.broadcast(
            "signal_processed",
            json!({
                "signal_id": signal_id,
                "analyzer": output.analyzer_name,
                "output_type": output.output_type,
                "confidence": output.confidence,
            }),
        );

        self.merge_signal_output(&signal_id, &content, &metadata, &output.data, output.confidence, now)
            .await;

        self.record_audit(
            "signal_processed",
            json!({ "signal_id": signal_id, "analyzer": output.analyzer_name }),
            None,
            None,
        )
        .await;

        self.broadcast_graph_update().await;

        let simulation_running = self.state.lock().await.simulation_running;
        if !simulation_running {
            self.check_contradictions(now).await;
        }

        self.maybe_generate_recommendations(now).await;

        ProcessedSignal {
            signal_id,
            analyzer: output.analyzer_name,
            output_type: output.output_type,
            confidence: output.confidence,
            data: output.data,
        }
    }

    async fn merge_signal_output(
        &self,
        signal_id: &str,
        content: &SignalContent,
        metadata: &SignalMetadata,
        data: &Value,
        confidence: f64,
        now: DateTime<Utc>,
    ) {
        match content {
            SignalContent::Image { .. } => {
                let damage_level = parse_damage_level(field_str(data, "damage_level"));
                let urgency = damage_to_urgency(damage_level);
                let incident = IncidentNode {
                    id: format!("inc_{signal_id}"),
                    incident_type: "structural_damage".to_string(),
                    location: metadata.location.clone().unwrap_or_else(|| crate::jittered(signal_id)),
                    damage_level,
                    urgency,
                    trapped_min: field_u32(data, "trapped_min"),
                    trapped_max: field_u32(data, "trapped_max"),
                    injured_min: field_u32(data, "injured_min"),
                    injured_max: field_u32(data, "injured_max"),
                    confidence,
                    sources: vec![source_reference(signal_id, SourceType::Image, confidence, now)],
                    created_at: now,
                    updated_at: now,
                    contradiction_ids: Vec::new(),
                    decay_rate: DEFAULT_DECAY_RATE,
                    status: IncidentStatus::Active,
                    assigned_resources: Vec::new(),
                };
                self.add_incident(incident, now).await;
            }
            SignalContent::Audio { .. } => {
                let urgency = aegis_core::parse_urgency(field_str(data, "urgency"));
                let damage_level = if urgency == Urgency::Critical {
                    DamageLevel::Severe
                } else {
                    DamageLevel::Moderate
                };
                let (trapped_min, trapped_max) = trapped_range(data);
                let incident = IncidentNode {
                    id: format!("inc_{signal_id}"),
                    incident_type: "reported_incident".to_string(),
                    location: metadata.location.clone().unwrap_or_else(|| crate::jittered(signal_id)),
                    damage_level,
                    urgency,
                    trapped_min,
                    trapped_max,
                    injured_min: None,
                    injured_max: None,
                    confidence,
                    sources: vec![source_reference(signal_id, SourceType::Audio, confidence, now)],
                    created_at: now,
                    updated_at: now,
                    contradiction_ids: Vec::new(),
                    decay_rate: DEFAULT_DECAY_RATE,
                    status: IncidentStatus::Active,
                    assigned_resources: Vec::new(),
                };
                self.add_incident(incident, now).await;
            }
            SignalContent::Text { .. } => {
                let simulation_running = self.state.lock().await.simulation_running;
                if simulation_running {
                    return;
                }
                let Some(location) = &metadata.location else {
                    return;
                };
                let Some(name) = &location.name else {
                    return;
                };
                let claim = Claim {
                    source_id: signal_id.to_string(),
                    claim_text: field_str(data, "claim").to_string(),
                    timestamp: now,
                    credibility_score: confidence,
                };
                let mut state = self.state.lock().await;
                state
                    .contradiction_detector
                    .record_claim(&slugify(name), "location", name, claim);
            }
        }
    }

    async fn add_incident(&self, incident: IncidentNode, now: DateTime<Utc>) {
        let incident_id = incident.id.clone();
        let payload = serde_json::to_value(&incident).unwrap_or_else(|_| json!({}));
        {
            let mut graph = self.graph.write().await;
            graph.add_incident(now, incident);
        }
        self.broadcaster.broadcast("new_incident", payload);
        self.push_event("incident_created", json!({ "incident_id": incident_id })).await;
    }

    // ---- contradiction detection ------------------------------------------

    async fn check_contradictions(&self, now: DateTime<Utc>) {
        let candidates = self.state.lock().await.contradiction_detector.candidates();

        for candidate in candidates {
            let output = self
                .verification
                .analyze(&VerificationInput {
                    entity_id: candidate.entity_id.clone(),
                    entity_type: candidate.entity_type.clone(),
                    entity_name: candidate.entity_name.clone(),
                    claims: candidate.claims.clone(),
                })
                .await;

            let verdict = parse_verdict(field_str(&output.data, "verdict"));
            if !matches!(verdict, Verdict::Contradiction | Verdict::TemporalGap) {
                continue;
            }

            let alert = ContradictionAlert {
                id: format!("alert_{}", short_id()),
                entity_id: candidate.entity_id.clone(),
                entity_type: candidate.entity_type.clone(),
                entity_name: candidate.entity_name.clone(),
                claims: candidate.claims.clone(),
                verdict,
                severity: parse_severity(field_str(&output.data, "severity")),
                temporal_analysis: data_str(&output.data, "temporal_analysis"),
                recommended_action: parse_recommended_action(field_str(&output.data, "recommended_action")),
                recommended_action_details: field_str(&output.data, "recommended_action_details").to_string(),
                urgency: Urgency::High,
                created_at: now,
                resolved: false,
                resolution: None,
                resolved_by: None,
                resolved_at: None,
            };

            let payload = serde_json::to_value(&alert).unwrap_or_else(|_| json!({}));
            {
                let mut graph = self.graph.write().await;
                graph.add_contradiction(now, alert);
            }
            self.broadcaster.broadcast("contradiction_alert", payload);
            self.push_event(
                "contradiction_detected",
                json!({ "entity_name": candidate.entity_name }),
            )
            .await;
            self.record_audit(
                "contradiction_detected",
                json!({ "entity_name": candidate.entity_name }),
                None,
                None,
            )
            .await;

            self.state.lock().await.contradiction_detector.mark_handled(&candidate.entity_name);
            break;
        }
    }

    // ---- planning trigger --------------------------------------------------

    async fn maybe_generate_recommendations(&self, now: DateTime<Utc>) {
        let ready = {
            let mut state = self.state.lock().await;
            if !state.planning_trigger.ready(now) {
                return;
            }
            // Stamp the clock before the analyzer call so two concurrent
            // signals cannot both pass the cooldown gate.
            state.planning_trigger.record_call(now);
            true
        };
        if !ready {
            return;
        }

        let (critical_incidents, pending_count, available) = {
            let graph = self.graph.read().await;
            let critical: Vec<_> = graph
                .active_incidents()
                .into_iter()
                .filter(|incident| {
                    matches!(incident.urgency, Urgency::Critical | Urgency::High)
                        && incident.assigned_resources.is_empty()
                })
                .map(|incident| (incident.id.clone(), incident.location.clone(), summarize_incident(incident)))
                .collect();
            let pending = graph.actions.values().filter(|a| a.status == aegis_core::ActionStatus::Pending).count();
            let available: Vec<String> = graph.available_resources().into_iter().take(6).map(|r| r.id.clone()).collect();
            (critical, pending, available)
        };

        if critical_incidents.is_empty() || pending_count >= MAX_PENDING_ACTIONS || available.is_empty() {
            return;
        }

        let (target_incident_id, target_location, situation_summary) = critical_incidents[0].clone();
        let full_summary = critical_incidents
            .iter()
            .map(|(_, _, summary)| summary.clone())
            .collect::<Vec<_>>()
            .join("; ");
        let _ = situation_summary;

        let output = self
            .planning
            .analyze(&PlanningInput {
                target_incident_id: target_incident_id.clone(),
                situation_summary: full_summary,
                available_resource_ids: available.clone(),
            })
            .await;

        let resources_to_allocate = data_str_array(&output.data, "resources_to_allocate").unwrap_or_else(|| vec![available[0].clone()]);

        let recommendation = aegis_core::ActionRecommendation {
            id: format!("rec_{}", short_id()),
            action_type: field_str(&output.data, "action_type").to_string(),
            target_incident_id: data_str(&output.data, "target_incident_id").or(Some(target_incident_id)),
            target_location: Some(target_location),
            target_sector: None,
            resources_to_allocate,
            rationale: field_str(&output.data, "rationale").to_string(),
            supporting_factors: data_str_array(&output.data, "supporting_factors").unwrap_or_default(),
            confidence: output.confidence,
            tradeoffs: data_str_array(&output.data, "tradeoffs").unwrap_or_default(),
            uncertainty_factors: data_str_array(&output.data, "uncertainty_factors").unwrap_or_default(),
            requires_human_approval: true,
            decision_deadline: now + Duration::minutes(aegis_core::ActionRecommendation::DECISION_WINDOW_MINUTES),
            time_sensitivity: field_str(&output.data, "time_sensitivity").to_string(),
            status: aegis_core::ActionStatus::Pending,
            created_at: now,
            decided_at: None,
            decided_by: None,
        };

        let payload = serde_json::to_value(&recommendation).unwrap_or_else(|_| json!({}));
        let decision_id = recommendation.id.clone();
        {
            let mut graph = self.graph.write().await;
            graph.add_action(now, recommendation);
        }
        self.broadcaster.broadcast("action_recommendation", payload);
        self.push_event("action_recommended", json!({ "decision_id": decision_id.clone() })).await;
        self.record_audit("action_recommended", json!({ "decision_id": decision_id }), None, None).await;
    }

    // ---- operator decisions ------------------------------------------------

    pub async fn resolve_contradiction(&self, alert_id: &str, resolution: &str, decided_by: &str) -> Result<(), CoordinatorError> {
        let now = Utc::now();
        {
            let mut graph = self.graph.write().await;
            graph.resolve_contradiction(now, alert_id, resolution.to_string(), decided_by.to_string())?;
        }
        self.broadcaster.broadcast("decision_made", json!({ "decision_id": alert_id, "resolution": resolution }));
        self.broadcast_graph_update().await;
        self.push_event("contradiction_resolved", json!({ "decision_id": alert_id })).await;
        self.record_audit("contradiction_resolved", json!({ "decision_id": alert_id }), None, Some(alert_id.to_string())).await;
        Ok(())
    }

    pub async fn approve_action(&self, action_id: &str, decided_by: &str) -> Result<(), CoordinatorError> {
        let now = Utc::now();
        {
            let mut graph = self.graph.write().await;
            graph.approve_action(now, action_id, decided_by)?;
        }
        self.broadcaster.broadcast("decision_made", json!({ "decision_id": action_id, "decision": "approved" }));
        self.broadcast_graph_update().await;
        self.push_event("action_approved", json!({ "decision_id": action_id })).await;
        self.record_audit("action_approved", json!({ "decision_id": action_id }), None, Some(action_id.to_string())).await;
        Ok(())
    }

    pub async fn reject_action(&self, action_id: &str, decided_by: &str) -> Result<(), CoordinatorError> {
        let now = Utc::now();
        {
            let mut graph = self.graph.write().await;
            graph.reject_action(now, action_id, decided_by)?;
        }
        self.broadcaster.broadcast("decision_made", json!({ "decision_id": action_id, "decision": "rejected" }));
        self.broadcast_graph_update().await;
        self.record_audit("action_rejected", json!({ "decision_id": action_id }), None, Some(action_id.to_string())).await;
        Ok(())
    }

    pub async fn assign_resource_manual(&self, resource_id: &str, incident_id: &str) -> Result<(), CoordinatorError> {
        let now = Utc::now();
        {
            let mut graph = self.graph.write().await;
            graph.assign_resource_manual(now, resource_id, incident_id)?;
        }
        self.broadcaster.broadcast("resource_update", json!({ "resource_id": resource_id, "incident_id": incident_id }));
        self.broadcast_graph_update().await;
        self.record_audit(
            "resource_assigned_manual",
            json!({ "resource_id": resource_id, "incident_id": incident_id }),
            Some(incident_id.to_string()),
            None,
        )
        .await;
        Ok(())
    }

    pub async fn unassign_resource(&self, resource_id: &str, incident_id: &str) -> Result<(), CoordinatorError> {
        let now = Utc::now();
        {
            let mut graph = self.graph.write().await;
            graph.unassign_resource(now, resource_id, incident_id)?;
        }
        self.broadcaster.broadcast("resource_update", json!({ "resource_id": resource_id, "incident_id": incident_id }));
        self.broadcast_graph_update().await;
        self.record_audit(
            "resource_unassigned",
            json!({ "resource_id": resource_id, "incident_id": incident_id }),
            Some(incident_id.to_string()),
            None,
        )
        .await;
        Ok(())
    }

    pub async fn approve_allocation_plan(&self, plan_id: &str, decided_by: &str) -> Result<(), CoordinatorError> {
        let now = Utc::now();
        {
            let mut graph = self.graph.write().await;
            graph.approve_allocation_plan(now, plan_id, decided_by)?;
        }
        self.broadcaster.broadcast("decision_made", json!({ "decision_id": plan_id, "decision": "approved" }));
        self.broadcast_graph_update().await;
        self.record_audit("allocation_plan_approved", json!({ "decision_id": plan_id }), None, None).await;
        Ok(())
    }

    pub async fn approve_camp(&self, camp_id: &str, decided_by: &str) -> Result<(), CoordinatorError> {
        let now = Utc::now();
        {
            let mut graph = self.graph.write().await;
            graph.approve_camp(now, camp_id, decided_by)?;
        }
        self.broadcaster.broadcast("decision_made", json!({ "decision_id": camp_id, "decision": "approved" }));
        self.broadcast_graph_update().await;
        self.record_audit("camp_approved", json!({ "decision_id": camp_id }), None, Some(camp_id.to_string())).await;
        Ok(())
    }

    pub async fn reject_camp(&self, camp_id: &str, decided_by: &str) -> Result<(), CoordinatorError> {
        let now = Utc::now();
        {
            let mut graph = self.graph.write().await;
            graph.reject_camp(now, camp_id, decided_by)?;
        }
        self.broadcaster.broadcast("decision_made", json!({ "decision_id": camp_id, "decision": "rejected" }));
        self.broadcast_graph_update().await;
        self.record_audit("camp_rejected", json!({ "decision_id": camp_id }), None, Some(camp_id.to_string())).await;
        Ok(())
    }

    // ---- debate -------------------------------------------------------------

    /// Runs a staged four-turn debate over a contradiction alert,
    /// broadcasting each turn as it completes with a pacing gap.
    pub async fn start_debate(&self, alert_id: &str) -> Result<Vec<DebateTurn>, CoordinatorError> {
        let alert = {
            let graph = self.graph.read().await;
            graph
                .contradictions
                .get(alert_id)
                .cloned()
                .ok_or_else(|| CoordinatorError::Graph(GraphError::AlertNotFound(alert_id.to_string())))?
        };

        self.push_event("debate_started", json!({ "decision_id": alert_id })).await;

        let turns = self.debate.run(&DebateInput { alert: &alert }).await;

        for (index, turn) in turns.iter().enumerate() {
            self.broadcaster.broadcast("debate_turn", serde_json::to_value(turn).unwrap_or_else(|_| json!({})));
            if index + 1 < turns.len() {
                sleep(DEBATE_TURN_PACING).await;
            }
        }

        self.push_event("debate_completed", json!({ "decision_id": alert_id })).await;
        self.record_audit("debate_completed", json!({ "decision_id": alert_id }), None, Some(alert_id.to_string())).await;

        Ok(turns)
    }

    // ---- allocation -----------------------------------------------------------

    pub async fn generate_allocation_plan(&self) -> AllocationOutcome {
        let now = Utc::now();
        let (incident_ids, available_resource_ids, location_ids) = {
            let graph = self.graph.read().await;
            (
                graph.incidents.keys().cloned().collect::<Vec<_>>(),
                graph.available_resources().into_iter().map(|r| r.id.clone()).collect::<Vec<_>>(),
                graph.locations.keys().cloned().collect::<Vec<_>>(),
            )
        };

        let output = self
            .allocation
            .analyze(&AllocationInput {
                situation_summary: format!("{} active incidents, {} available resources", incident_ids.len(), available_resource_ids.len()),
                incident_ids,
                available_resource_ids,
                location_ids,
            })
            .await;

        let assignments = output
            .data
            .get("assignments")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .map(|item| ResourceAssignment {
                        resource_id: field_str(item, "resource_id").to_string(),
                        incident_id: field_str(item, "incident_id").to_string(),
                        rationale: field_str(item, "rationale").to_string(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let camps = output
            .data
            .get("camps")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .map(|item| CampRecommendation {
                        id: format!("camp_{}", short_id()),
                        name: field_str(item, "name").to_string(),
                        location_id: field_str(item, "location_id").to_string(),
                        suggested_capacity: item.get("suggested_capacity").and_then(Value::as_u64).unwrap_or(0) as u32,
                        rationale: field_str(item, "rationale").to_string(),
                        status: aegis_core::ActionStatus::Pending,
                        created_at: now,
                        decided_at: None,
                        decided_by: None,
                    })
                    .collect()
            })
            .unwrap_or_default();

        let plan = AllocationPlan {
            id: format!("plan_{}", short_id()),
            assignments,
            rationale: field_str(&output.data, "rationale").to_string(),
            confidence: output.confidence,
            status: aegis_core::ActionStatus::Pending,
            created_at: now,
            decided_at: None,
            decided_by: None,
        };

        let payload = serde_json::to_value(&plan).unwrap_or_else(|_| json!({}));
        let plan_id = plan.id.clone();
        {
            let mut graph = self.graph.write().await;
            graph.add_allocation_plan(now, plan.clone());
        }
        self.broadcaster.broadcast("allocation_update", payload);
        self.push_event("allocation_plan_generated", json!({ "decision_id": plan_id.clone() })).await;
        self.record_audit("allocation_plan_generated", json!({ "decision_id": plan_id }), None, None).await;

        AllocationOutcome { plan, camps }
    }

    /// Calls [`Self::generate_allocation_plan`] and additionally
    /// registers each recommended camp in the graph, broadcasting one
    /// `camp_recommendation` event per camp.
    pub async fn generate_camp_recommendations(&self) -> Vec<CampRecommendation> {
        let now = Utc::now();
        let outcome = self.generate_allocation_plan().await;

        let mut graph = self.graph.write().await;
        for camp in &outcome.camps {
            graph.add_camp(now, camp.clone());
        }
        drop(graph);

        for camp in &outcome.camps {
            self.broadcaster.broadcast("camp_recommendation", serde_json::to_value(camp).unwrap_or_else(|_| json!({})));
        }

        outcome.camps
    }

    // ---- voice --------------------------------------------------------------

    /// Records a transcribed voice report and routes its transcript
    /// through the text signal path. A caller location present on the
    /// report is carried along so the resulting incident lands at that
    /// location rather than a jittered fallback.
    pub async fn file_voice_report(&self, transcript: &str, camp_name: Option<String>, caller_location: Option<String>) -> VoiceReport {
        let now = Utc::now();
        let processed = self
            .process_signal(
                SignalContent::Text { content: transcript.to_string(), source_type: "911_transcript".to_string() },
                SignalMetadata { location: caller_location.as_ref().map(|name| Location { lat: 0.0, lng: 0.0, sector: None, name: Some(name.clone()), address: None }) },
            )
            .await;

        let report = VoiceReport {
            id: format!("voice_{}", short_id()),
            transcript: transcript.to_string(),
            camp_name,
            caller_location,
            derived_signal_id: Some(processed.signal_id),
            status: aegis_core::ActionStatus::Pending,
            created_at: now,
        };

        {
            let mut graph = self.graph.write().await;
            graph.add_voice_report(now, report.clone());
        }
        self.broadcaster.broadcast("voice_report", serde_json::to_value(&report).unwrap_or_else(|_| json!({})));
        self.push_event("voice_report_filed", json!({ "voice_report_id": report.id })).await;

        report
    }

    // ---- audit --------------------------------------------------------------

    pub async fn get_decision_audit(&self, decision_id: &str) -> Vec<aegis_core::AuditEvent> {
        self.graph.read().await.audit_for_decision(decision_id).into_iter().cloned().collect()
    }

    pub async fn get_incident_audit(&self, incident_id: &str) -> Vec<aegis_core::AuditEvent> {
        self.graph.read().await.audit_for_incident(incident_id).into_iter().cloned().collect()
    }

    // ---- copilot --------------------------------------------------------------

    /// A conversational query over a compact summary of the current
    /// graph. Unlike the eight structured analyzers, this is a direct,
    /// schema-free oracle call: there is no `data` map to extract, just
    /// free text.
    pub async fn copilot_ask(&self, question: &str) -> String {
        let summary = {
            let graph = self.graph.read().await;
            format!(
                "{} active incidents, {} pending actions, {} available resources, {} unresolved contradictions.",
                graph.active_incidents().len(),
                graph.actions.values().filter(|a| a.status == aegis_core::ActionStatus::Pending).count(),
                graph.available_resources().len(),
                graph.contradictions.values().filter(|c| c.is_open()).count(),
            )
        };

        let system_prompt = "You are a disaster-response copilot. Answer the operator's question \
             using only the situation summary provided. Respond in plain text.";
        let user_prompt = format!("Situation summary: {summary}\nQuestion: {question}");

        match self.oracle.complete(system_prompt, &user_prompt).await {
            Ok(answer) => answer,
            Err(err) => {
                warn!(error = %err, "copilot oracle call failed, returning summary-only answer");
                format!("No live reasoning oracle is configured. Current situation: {summary}")
            }
        }
    }

    // ---- scenario loading --------------------------------------------------

    /// Registers a resource present from the start of a scenario, bypassing
    /// the signal pipeline. Broadcasts a `graph_update`.
    pub async fn seed_resource(&self, resource: ResourceNode) {
        let now = Utc::now();
        {
            let mut graph = self.graph.write().await;
            graph.add_resource(now, resource);
        }
        self.broadcast_graph_update().await;
    }

    /// Registers a location present from the start of a scenario, bypassing
    /// the signal pipeline. Broadcasts a `graph_update`.
    pub async fn seed_location(&self, location: LocationNode) {
        let now = Utc::now();
        {
            let mut graph = self.graph.write().await;
            graph.add_location(now, location);
        }
        self.broadcast_graph_update().await;
    }

    /// Applies a scenario-scripted status change to an existing resource,
    /// used by `resource_change` simulation events.
    pub async fn update_resource_status(&self, resource_id: &str, status: ResourceStatus) -> Result<(), CoordinatorError> {
        let now = Utc::now();
        {
            let mut graph = self.graph.write().await;
            graph.update_resource(now, resource_id, |resource| resource.status = status)?;
        }
        self.broadcaster.broadcast(
            "resource_update",
            json!({ "resource_id": resource_id, "updates": { "status": format!("{status:?}").to_lowercase() } }),
        );
        self.broadcast_graph_update().await;
        Ok(())
    }

    // ---- simulation lifecycle --------------------------------------------------

    pub async fn is_simulation_running(&self) -> bool {
        self.state.lock().await.simulation_running
    }

    pub async fn begin_simulation(&self, scenario_id: &str, scenario_name: &str, now: DateTime<Utc>) {
        {
            let mut state = self.state.lock().await;
            state.simulation_running = true;
            state.simulation_paused = false;
            state.scenario_id = Some(scenario_id.to_string());
            state.scenario_name = Some(scenario_name.to_string());
        }
        {
            let mut graph = self.graph.write().await;
            graph.scenario_id = Some(scenario_id.to_string());
            graph.scenario_name = Some(scenario_name.to_string());
            graph.scenario_start_time = Some(now);
            graph.current_sim_time = now;
            graph.last_updated = now;
        }
        self.broadcast_sim_status().await;
    }

    pub async fn pause_simulation(&self) {
        self.state.lock().await.simulation_paused = true;
        self.broadcast_sim_status().await;
    }

    pub async fn resume_simulation(&self) {
        self.state.lock().await.simulation_paused = false;
        self.broadcast_sim_status().await;
    }

    pub async fn is_simulation_paused(&self) -> bool {
        self.state.lock().await.simulation_paused
    }

    /// Cancels the running scenario (the driver task itself is owned and
    /// cancelled by `aegis-simulation`), clears detector state and the
    /// recent-events ring, and replaces the graph with a fresh one.
    pub async fn reset_simulation(&self) {
        let now = Utc::now();
        {
            let mut state = self.state.lock().await;
            state.simulation_running = false;
            state.simulation_paused = false;
            state.scenario_id = None;
            state.scenario_name = None;
            state.recent_events.clear();
            state.contradiction_detector.reset();
        }
        {
            let mut graph = self.graph.write().await;
            *graph = SituationGraph::new(now);
        }
        self.broadcast_graph_update().await;
    }

    pub async fn simulation_status(&self) -> SimulationStatus {
        let state = self.state.lock().await;
        let current_sim_time = self.graph.read().await.current_sim_time;
        SimulationStatus {
            running: state.simulation_running,
            paused: state.simulation_paused,
            scenario_id: state.scenario_id.clone(),
            scenario_name: state.scenario_name.clone(),
            current_sim_time,
        }
    }

    /// Advances the simulation clock without mutating anything else,
    /// used by the driver's `time_marker` events.
    pub async fn advance_sim_time(&self, now: DateTime<Utc>) {
        let mut graph = self.graph.write().await;
        graph.current_sim_time = now;
        graph.last_updated = now;
    }

    pub async fn decay_confidences(&self, elapsed_minutes: f64, now: DateTime<Utc>) {
        let mut graph = self.graph.write().await;
        graph.decay_confidences(now, elapsed_minutes);
    }

    /// Decays every active incident's confidence by 5 simulated minutes and
    /// records a `timeline_event` carrying the aftershock magnitude, per
    /// the simulation driver's `aftershock` event handling.
    pub async fn trigger_aftershock(&self, magnitude: f64, now: DateTime<Utc>) {
        const AFTERSHOCK_DECAY_MINUTES: f64 = 5.0;
        self.decay_confidences(AFTERSHOCK_DECAY_MINUTES, now).await;
        self.push_event("aftershock", json!({ "magnitude": magnitude })).await;
        self.broadcast_graph_update().await;
    }

    /// Records a `time_marker` timeline event, used by the simulation
    /// driver's narration-only events.
    pub async fn note_time_marker(&self, label: &str) {
        self.push_event("time_marker", json!({ "label": label })).await;
    }

    /// Ends a completed simulation run without clearing the graph, unlike
    /// [`Self::reset_simulation`]: the driver calls this when the event
    /// timeline is exhausted rather than when the operator asks for reset.
    pub async fn finish_simulation(&self) {
        self.state.lock().await.simulation_running = false;
        self.broadcast_sim_status().await;
    }

    /// The simulation driver's only path to creating an unconditional
    /// alert outside the signal pipeline: pushes claims directly and
    /// creates the alert regardless of verdict strength, using a forced
    /// verdict when supplied.
    pub async fn inject_contradiction(
        &self,
        entity_name: &str,
        claims: Vec<Claim>,
        forced_verdict: Option<Verdict>,
        temporal_analysis: Option<String>,
    ) -> ContradictionAlert {
        let now = Utc::now();
        let entity_id = slugify(entity_name);

        let output = self
            .verification
            .analyze(&VerificationInput {
                entity_id: entity_id.clone(),
                entity_type: "location".to_string(),
                entity_name: entity_name.to_string(),
                claims: claims.clone(),
            })
            .await;

        let verdict = forced_verdict.unwrap_or_else(|| parse_verdict(field_str(&output.data, "verdict")));
        let alert = ContradictionAlert {
            id: format!("alert_{}", short_id()),
            entity_id: entity_id.clone(),
            entity_type: "location".to_string(),
            entity_name: entity_name.to_string(),
            claims,
            verdict,
            severity: parse_severity(field_str(&output.data, "severity")),
            temporal_analysis: temporal_analysis.or_else(|| data_str(&output.data, "temporal_analysis")),
            recommended_action: parse_recommended_action(field_str(&output.data, "recommended_action")),
            recommended_action_details: field_str(&output.data, "recommended_action_details").to_string(),
            urgency: Urgency::High,
            created_at: now,
            resolved: false,
            resolution: None,
            resolved_by: None,
            resolved_at: None,
        };

        let payload = serde_json::to_value(&alert).unwrap_or_else(|_| json!({}));
        {
            let mut graph = self.graph.write().await;
            graph.add_contradiction(now, alert.clone());
        }
        self.broadcaster.broadcast("contradiction_alert", payload);
        self.push_event("contradiction_detected", json!({ "entity_name": entity_name })).await;
        self.state.lock().await.contradiction_detector.mark_handled(entity_name);

        alert
    }

    // ---- internal helpers -----------------------------------------------------

    async fn broadcast_graph_update(&self) {
        let graph = self.graph.read().await;
        let payload = serde_json::to_value(&*graph).unwrap_or_else(|_| json!({}));
        drop(graph);
        self.broadcaster.broadcast("graph_update", payload);
    }

    async fn broadcast_sim_status(&self) {
        let status = self.simulation_status().await;
        self.broadcaster.broadcast("sim_status", serde_json::to_value(&status).unwrap_or_else(|_| json!({})));
    }

    async fn push_event(&self, event_type: &str, data: Value) {
        let event = TimelineEvent {
            id: format!("evt_{}", short_id()),
            event_type: event_type.to_string(),
            timestamp: Utc::now(),
            data,
        };
        let payload = serde_json::to_value(&event).unwrap_or_else(|_| json!({}));
        {
            let mut state = self.state.lock().await;
            state.recent_events.push_back(event);
            while state.recent_events.len() > RECENT_EVENTS_CAPACITY {
                state.recent_events.pop_front();
            }
        }
        self.broadcaster.broadcast("timeline_event", payload);
    }

    async fn record_audit(&self, event_type: &str, payload: Value, incident_id: Option<String>, decision_id: Option<String>) {
        let record = AuditRecord {
            id: Uuid::new_v4().to_string(),
            event_type: event_type.to_string(),
            payload,
            incident_id,
            decision_id,
            timestamp: Utc::now(),
        };
        if let Err(err) = self.audit_store.record(record).await {
            warn!(error = %err, "failed to write audit record");
        }
    }
}

fn short_id() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

/// Lowercases and replaces every non-alphanumeric character with an
/// underscore, so `"Main Street Bridge"` becomes `"main_street_bridge"`.
fn slugify(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

fn source_reference(signal_id: &str, source_type: SourceType, credibility_score: f64, now: DateTime<Utc>) -> SourceReference {
    SourceReference {
        source_id: signal_id.to_string(),
        source_type,
        timestamp: now,
        raw_content_ref: signal_id.to_string(),
        credibility_score,
    }
}

fn summarize_incident(incident: &IncidentNode) -> String {
    format!(
        "{} ({:?}, {:?}, confidence {:.2}, trapped {:?}-{:?})",
        incident.id, incident.incident_type, incident.urgency, incident.confidence, incident.trapped_min, incident.trapped_max
    )
}

fn field_str<'a>(data: &'a Value, key: &str) -> &'a str {
    data.get(key).and_then(Value::as_str).unwrap_or("")
}

fn data_str(data: &Value, key: &str) -> Option<String> {
    data.get(key).and_then(Value::as_str).map(str::to_string)
}

fn data_str_array(data: &Value, key: &str) -> Option<Vec<String>> {
    data.get(key)?.as_array().map(|items| {
        items.iter().filter_map(|v| v.as_str().map(str::to_string)).collect()
    })
}

fn field_u32(data: &Value, key: &str) -> Option<u32> {
    data.get(key).and_then(Value::as_u64).map(|v| v as u32)
}

/// Reads `persons_involved.trapped.{min,max}` when present as a range
/// record, per the audio merging rule.
fn trapped_range(data: &Value) -> (Option<u32>, Option<u32>) {
    let Some(trapped) = data.get("persons_involved").and_then(|p| p.get("trapped")) else {
        return (None, None);
    };
    (field_u32(trapped, "min"), field_u32(trapped, "max"))
}

/// Fixed damage-level classifier matching substrings in descending
/// severity order, mirroring [`aegis_core::parse_urgency`]'s contract.
fn parse_damage_level(raw: &str) -> DamageLevel {
    let lowered = raw.to_lowercase();
    if lowered.contains("catastrophic") {
        DamageLevel::Catastrophic
    } else if lowered.contains("severe") {
        DamageLevel::Severe
    } else if lowered.contains("moderate") {
        DamageLevel::Moderate
    } else if lowered.contains("minor") {
        DamageLevel::Minor
    } else if lowered.contains("none") {
        DamageLevel::None
    } else {
        DamageLevel::Moderate
    }
}

/// Fixed map from damage level to urgency, per the signal-merging rules.
fn damage_to_urgency(damage: DamageLevel) -> Urgency {
    match damage {
        DamageLevel::Catastrophic | DamageLevel::Severe => Urgency::Critical,
        DamageLevel::Moderate => Urgency::High,
        DamageLevel::Minor => Urgency::Medium,
        DamageLevel::None => Urgency::Low,
    }
}

fn parse_verdict(raw: &str) -> Verdict {
    match raw.to_lowercase().as_str() {
        "contradiction" => Verdict::Contradiction,
        "temporal_gap" => Verdict::TemporalGap,
        "uncertain" => Verdict::Uncertain,
        _ => Verdict::Consistent,
    }
}

fn parse_severity(raw: &str) -> Severity {
    match raw.to_lowercase().as_str() {
        "high" => Severity::High,
        "medium" => Severity::Medium,
        _ => Severity::Low,
    }
}

fn parse_recommended_action(raw: &str) -> RecommendedActionType {
    match raw.to_lowercase().as_str() {
        "accept" => RecommendedActionType::Accept,
        "wait" => RecommendedActionType::Wait,
        "request_verification" => RecommendedActionType::RequestVerification,
        _ => RecommendedActionType::FlagForHuman,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::CoordinatorBuilder;
    use aegis_analyzer::NullOracle;
    use aegis_audit_memory::InMemoryAuditStore;

    fn build() -> Coordinator {
        CoordinatorBuilder::new()
            .oracle(Arc::new(NullOracle))
            .audit_store(Arc::new(InMemoryAuditStore::new()))
            .build()
    }

    #[tokio::test]
    async fn image_signal_creates_critical_incident_with_casualty_range() {
        let coordinator = build();
        let result = coordinator
            .process_signal(
                SignalContent::Image { description: "collapsed structure".to_string() },
                SignalMetadata::default(),
            )
            .await;

        assert_eq!(result.analyzer, "vision");
        let snapshot = coordinator.snapshot().await;
        assert_eq!(snapshot.incidents.len(), 1);
        let incident = snapshot.incidents.values().next().unwrap();
        assert!(incident.casualty_range_valid());
        assert!(
            matches!((incident.trapped_min, incident.trapped_max), (Some(3), Some(8)) | (Some(0), Some(3)) | (Some(5), Some(20))),
            "unexpected fallback trapped range {:?}-{:?}",
            incident.trapped_min,
            incident.trapped_max
        );
        assert_eq!(incident.injured_min, None);
        assert_eq!(incident.injured_max, None);
    }

    #[tokio::test]
    async fn audio_signal_carries_trapped_range_when_present() {
        let coordinator = build();
        coordinator
            .process_signal(
                SignalContent::Audio { context_hint: "distress call from collapsed structure".to_string() },
                SignalMetadata::default(),
            )
            .await;

        let snapshot = coordinator.snapshot().await;
        assert_eq!(snapshot.incidents.len(), 1);
        let incident = snapshot.incidents.values().next().unwrap();
        assert!(incident.casualty_range_valid());
        assert!(
            matches!((incident.trapped_min, incident.trapped_max), (None, None) | (Some(4), Some(7)) | (Some(4), Some(4))),
            "unexpected fallback trapped range {:?}-{:?}",
            incident.trapped_min,
            incident.trapped_max
        );
    }

    #[tokio::test]
    async fn text_signals_with_same_location_accumulate_claims_and_raise_alert() {
        let coordinator = build();
        let location = Location::new(37.78, -122.41).with_name("Main Street Bridge");

        for _ in 0..2 {
            coordinator
                .process_signal(
                    SignalContent::Text {
                        content: "conflicting report".to_string(),
                        source_type: "social_media".to_string(),
                    },
                    SignalMetadata { location: Some(location.clone()) },
                )
                .await;
        }

        let snapshot = coordinator.snapshot().await;
        assert_eq!(snapshot.contradictions.len(), 1);
        let alert = snapshot.contradictions.values().next().unwrap();
        assert_eq!(alert.entity_id, "main_street_bridge");
    }

    #[tokio::test]
    async fn approve_action_dispatches_resources() {
        let coordinator = build();
        {
            let mut graph = coordinator.graph.write().await;
            graph.add_incident(
                Utc::now(),
                IncidentNode {
                    id: "inc_1".to_string(),
                    incident_type: "structural_damage".to_string(),
                    location: Location::new(37.78, -122.41),
                    damage_level: DamageLevel::Severe,
                    urgency: Urgency::Critical,
                    trapped_min: Some(2),
                    trapped_max: Some(5),
                    injured_min: None,
                    injured_max: None,
                    confidence: 0.7,
                    sources: vec![],
                    created_at: Utc::now(),
                    updated_at: Utc::now(),
                    contradiction_ids: vec![],
                    decay_rate: 0.01,
                    status: IncidentStatus::Active,
                    assigned_resources: vec![],
                },
            );
            graph.add_resource(
                Utc::now(),
                aegis_core::ResourceNode {
                    id: "AMB-1".to_string(),
                    resource_type: "ambulance".to_string(),
                    unit_id: "AMB-1".to_string(),
                    current_location: Location::new(37.78, -122.41),
                    destination: None,
                    status: aegis_core::ResourceStatus::Available,
                    assigned_incident: None,
                    personnel: 2,
                    capacity_remaining: 1,
                    eta_minutes: None,
                    updated_at: Utc::now(),
                },
            );
            graph.add_action(
                Utc::now(),
                aegis_core::ActionRecommendation {
                    id: "rec_1".to_string(),
                    action_type: "dispatch_ambulance".to_string(),
                    target_incident_id: Some("inc_1".to_string()),
                    target_location: Some(Location::new(37.78, -122.41)),
                    target_sector: None,
                    resources_to_allocate: vec!["AMB-1".to_string()],
                    rationale: "test".to_string(),
                    supporting_factors: vec![],
                    confidence: 0.8,
                    tradeoffs: vec![],
                    uncertainty_factors: vec![],
                    requires_human_approval: true,
                    decision_deadline: Utc::now(),
                    time_sensitivity: "high".to_string(),
                    status: aegis_core::ActionStatus::Pending,
                    created_at: Utc::now(),
                    decided_at: None,
                    decided_by: None,
                },
            );
        }

        coordinator.approve_action("rec_1", "operator_1").await.unwrap();

        let snapshot = coordinator.snapshot().await;
        assert_eq!(snapshot.incidents["inc_1"].status, IncidentStatus::Responding);
        assert_eq!(snapshot.resources["AMB-1"].status, aegis_core::ResourceStatus::Dispatched);
        assert_eq!(snapshot.resources["AMB-1"].destination, Some(Location::new(37.78, -122.41)));
    }

    #[tokio::test]
    async fn start_debate_emits_four_turns_in_order() {
        let coordinator = build();
        let alert = coordinator
            .inject_contradiction(
                "Main Street Bridge",
                vec![Claim {
                    source_id: "sig_1".to_string(),
                    claim_text: "collapsed".to_string(),
                    timestamp: Utc::now(),
                    credibility_score: 0.72,
                }],
                Some(Verdict::Contradiction),
                None,
            )
            .await;

        let turns = coordinator.start_debate(&alert.id).await.unwrap();
        assert_eq!(turns.len(), 4);
        assert_eq!(turns[0].turn_number, 1);
        assert_eq!(turns[3].turn_number, 4);
        assert!(turns[3].confidence.unwrap() >= 0.0 && turns[3].confidence.unwrap() <= 1.0);
    }

    #[tokio::test]
    async fn approve_allocation_plan_stamps_decision() {
        let coordinator = build();
        {
            let mut graph = coordinator.graph.write().await;
            graph.add_allocation_plan(
                Utc::now(),
                AllocationPlan {
                    id: "plan_1".to_string(),
                    assignments: vec![],
                    rationale: "test".to_string(),
                    confidence: 0.7,
                    status: aegis_core::ActionStatus::Pending,
                    created_at: Utc::now(),
                    decided_at: None,
                    decided_by: None,
                },
            );
        }

        coordinator.approve_allocation_plan("plan_1", "operator_1").await.unwrap();

        let snapshot = coordinator.snapshot().await;
        assert_eq!(snapshot.allocation_plans["plan_1"].status, aegis_core::ActionStatus::Approved);
    }

    #[tokio::test]
    async fn reset_simulation_clears_graph_and_state() {
        let coordinator = build();
        coordinator
            .process_signal(
                SignalContent::Image { description: "collapse".to_string() },
                SignalMetadata::default(),
            )
            .await;
        coordinator.begin_simulation("scn_1", "Test Scenario", Utc::now()).await;

        coordinator.reset_simulation().await;

        let snapshot = coordinator.snapshot().await;
        assert!(snapshot.incidents.is_empty());
        assert!(!coordinator.is_simulation_running().await);
    }
}
