use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::allocation::{AllocationPlan, CampRecommendation};
use crate::contradiction::ContradictionAlert;
use crate::domain::{IncidentNode, IncidentStatus, LocationNode, ResourceNode, ResourceStatus};
use crate::error::GraphError;
use crate::recommendation::{ActionRecommendation, ActionStatus};
use crate::voice::VoiceReport;

/// Placeholder travel time stamped on every freshly dispatched resource.
/// The planning analyzer does not currently model real transit time; see
/// the open question this constant resolves in the design notes.
pub const PLACEHOLDER_ETA_MINUTES: u32 = 8;

/// One entry in the append-only audit trail kept alongside the graph.
/// Deliberately simpler than a compliance-grade hash-chained record: a
/// timestamp, an event kind, and whatever payload the mutation produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AuditEvent {
    pub timestamp: DateTime<Utc>,
    pub event_type: String,
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub payload: Value,
}

/// The top-level mutable aggregate: every incident, resource, location,
/// alert, recommendation, plan, camp and voice report currently known to
/// the coordinator, plus scenario bookkeeping.
///
/// All mutation goes through the named methods below; each validates its
/// referenced ids, applies the change (bumping the touched entity's
/// `updated_at` and the graph's `last_updated`), and appends one audit
/// event. Callers needing concurrent access wrap this in a lock; see
/// the coordinator crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct SituationGraph {
    pub incidents: HashMap<String, IncidentNode>,
    pub resources: HashMap<String, ResourceNode>,
    pub locations: HashMap<String, LocationNode>,
    pub contradictions: HashMap<String, ContradictionAlert>,
    pub actions: HashMap<String, ActionRecommendation>,
    pub allocation_plans: HashMap<String, AllocationPlan>,
    pub camps: HashMap<String, CampRecommendation>,
    pub voice_reports: HashMap<String, VoiceReport>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenario_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenario_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenario_start_time: Option<DateTime<Utc>>,
    pub current_sim_time: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,

    #[serde(skip)]
    audit_log: Vec<AuditEvent>,
}

impl SituationGraph {
    #[must_use]
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            incidents: HashMap::new(),
            resources: HashMap::new(),
            locations: HashMap::new(),
            contradictions: HashMap::new(),
            actions: HashMap::new(),
            allocation_plans: HashMap::new(),
            camps: HashMap::new(),
            voice_reports: HashMap::new(),
            scenario_id: None,
            scenario_name: None,
            scenario_start_time: None,
            current_sim_time: now,
            last_updated: now,
            audit_log: Vec::new(),
        }
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.last_updated = now;
    }

    fn audit(&mut self, now: DateTime<Utc>, event_type: &str, payload: Value) {
        self.audit_log.push(AuditEvent {
            timestamp: now,
            event_type: event_type.to_string(),
            payload,
        });
    }

    /// Every audit event recorded so far, oldest first.
    #[must_use]
    pub fn audit_log(&self) -> &[AuditEvent] {
        &self.audit_log
    }

    /// Audit events touching a given incident id, preserving order.
    #[must_use]
    pub fn audit_for_incident<'a>(&'a self, incident_id: &'a str) -> Vec<&'a AuditEvent> {
        self.audit_log
            .iter()
            .filter(|event| {
                event
                    .payload
                    .get("incident_id")
                    .and_then(Value::as_str)
                    .is_some_and(|id| id == incident_id)
            })
            .collect()
    }

    /// Audit events recording a particular decision (action/plan/camp) id.
    #[must_use]
    pub fn audit_for_decision<'a>(&'a self, decision_id: &'a str) -> Vec<&'a AuditEvent> {
        self.audit_log
            .iter()
            .filter(|event| {
                event
                    .payload
                    .get("decision_id")
                    .and_then(Value::as_str)
                    .is_some_and(|id| id == decision_id)
            })
            .collect()
    }

    pub fn add_incident(&mut self, now: DateTime<Utc>, incident: IncidentNode) {
        let id = incident.id.clone();
        self.incidents.insert(id.clone(), incident);
        self.touch(now);
        self.audit(now, "incident_added", serde_json::json!({ "incident_id": id }));
    }

    pub fn update_incident(
        &mut self,
        now: DateTime<Utc>,
        incident_id: &str,
        update: impl FnOnce(&mut IncidentNode),
    ) -> Result<(), GraphError> {
        let incident = self
            .incidents
            .get_mut(incident_id)
            .ok_or_else(|| GraphError::IncidentNotFound(incident_id.to_string()))?;
        update(incident);
        incident.updated_at = now;
        self.touch(now);
        self.audit(
            now,
            "incident_updated",
            serde_json::json!({ "incident_id": incident_id }),
        );
        Ok(())
    }

    pub fn add_resource(&mut self, now: DateTime<Utc>, resource: ResourceNode) {
        let id = resource.id.clone();
        self.resources.insert(id.clone(), resource);
        self.touch(now);
        self.audit(now, "resource_added", serde_json::json!({ "resource_id": id }));
    }

    pub fn update_resource(
        &mut self,
        now: DateTime<Utc>,
        resource_id: &str,
        update: impl FnOnce(&mut ResourceNode),
    ) -> Result<(), GraphError> {
        let resource = self
            .resources
            .get_mut(resource_id)
            .ok_or_else(|| GraphError::ResourceNotFound(resource_id.to_string()))?;
        update(resource);
        resource.updated_at = now;
        self.touch(now);
        self.audit(
            now,
            "resource_updated",
            serde_json::json!({ "resource_id": resource_id }),
        );
        Ok(())
    }

    pub fn add_location(&mut self, now: DateTime<Utc>, location: LocationNode) {
        let id = location.id.clone();
        self.locations.insert(id.clone(), location);
        self.touch(now);
        self.audit(now, "location_added", serde_json::json!({ "location_id": id }));
    }

    pub fn add_contradiction(&mut self, now: DateTime<Utc>, alert: ContradictionAlert) {
        let id = alert.id.clone();
        self.contradictions.insert(id.clone(), alert);
        self.touch(now);
        self.audit(now, "contradiction_added", serde_json::json!({ "alert_id": id }));
    }

    pub fn resolve_contradiction(
        &mut self,
        now: DateTime<Utc>,
        alert_id: &str,
        resolution: String,
        resolved_by: String,
    ) -> Result<(), GraphError> {
        let alert = self
            .contradictions
            .get_mut(alert_id)
            .ok_or_else(|| GraphError::AlertNotFound(alert_id.to_string()))?;
        alert.resolved = true;
        alert.resolution = Some(resolution);
        alert.resolved_by = Some(resolved_by);
        alert.resolved_at = Some(now);
        self.touch(now);
        self.audit(
            now,
            "contradiction_resolved",
            serde_json::json!({ "alert_id": alert_id }),
        );
        Ok(())
    }

    pub fn add_action(&mut self, now: DateTime<Utc>, action: ActionRecommendation) {
        let id = action.id.clone();
        self.actions.insert(id.clone(), action);
        self.touch(now);
        self.audit(now, "action_added", serde_json::json!({ "decision_id": id }));
    }

    /// Approves an action atomically: marks it decided, dispatches every
    /// listed resource toward the target incident, and folds the
    /// resource ids into the incident's assignment list without
    /// duplicating an id already present.
    pub fn approve_action(
        &mut self,
        now: DateTime<Utc>,
        action_id: &str,
        decided_by: &str,
    ) -> Result<(), GraphError> {
        let action = self
            .actions
            .get_mut(action_id)
            .ok_or_else(|| GraphError::ActionNotFound(action_id.to_string()))?;
        action.status = ActionStatus::Approved;
        action.decided_at = Some(now);
        action.decided_by = Some(decided_by.to_string());
        let resource_ids = action.resources_to_allocate.clone();
        let target_incident_id = action.target_incident_id.clone();
        let target_location = action.target_location.clone();

        for resource_id in &resource_ids {
            if let Some(resource) = self.resources.get_mut(resource_id) {
                resource.status = ResourceStatus::Dispatched;
                resource.assigned_incident = target_incident_id.clone();
                resource.destination = target_location.clone();
                resource.eta_minutes = Some(PLACEHOLDER_ETA_MINUTES);
                resource.updated_at = now;
            }
        }

        if let Some(incident_id) = &target_incident_id {
            if let Some(incident) = self.incidents.get_mut(incident_id) {
                incident.status = IncidentStatus::Responding;
                for resource_id in &resource_ids {
                    if !incident.assigned_resources.contains(resource_id) {
                        incident.assigned_resources.push(resource_id.clone());
                    }
                }
                incident.updated_at = now;
            }
        }

        self.touch(now);
        self.audit(
            now,
            "action_approved",
            serde_json::json!({ "decision_id": action_id }),
        );
        Ok(())
    }

    pub fn reject_action(
        &mut self,
        now: DateTime<Utc>,
        action_id: &str,
        decided_by: &str,
    ) -> Result<(), GraphError> {
        let action = self
            .actions
            .get_mut(action_id)
            .ok_or_else(|| GraphError::ActionNotFound(action_id.to_string()))?;
        action.status = ActionStatus::Rejected;
        action.decided_at = Some(now);
        action.decided_by = Some(decided_by.to_string());
        self.touch(now);
        self.audit(
            now,
            "action_rejected",
            serde_json::json!({ "decision_id": action_id }),
        );
        Ok(())
    }

    /// Assigns a single resource to a single incident outside of an
    /// approved recommendation (an operator dragging a unit on the map).
    /// Dedups on append like `approve_action`.
    pub fn assign_resource_manual(
        &mut self,
        now: DateTime<Utc>,
        resource_id: &str,
        incident_id: &str,
    ) -> Result<(), GraphError> {
        if !self.resources.contains_key(resource_id) {
            return Err(GraphError::ResourceNotFound(resource_id.to_string()));
        }
        let target_location = self
            .incidents
            .get(incident_id)
            .map(|incident| incident.location.clone())
            .ok_or_else(|| GraphError::IncidentNotFound(incident_id.to_string()))?;

        if let Some(resource) = self.resources.get_mut(resource_id) {
            resource.status = ResourceStatus::Dispatched;
            resource.assigned_incident = Some(incident_id.to_string());
            resource.destination = Some(target_location);
            resource.eta_minutes = Some(PLACEHOLDER_ETA_MINUTES);
            resource.updated_at = now;
        }
        if let Some(incident) = self.incidents.get_mut(incident_id) {
            if !incident.assigned_resources.contains(&resource_id.to_string()) {
                incident.assigned_resources.push(resource_id.to_string());
            }
            incident.status = IncidentStatus::Responding;
            incident.updated_at = now;
        }
        self.touch(now);
        self.audit(
            now,
            "resource_assigned_manual",
            serde_json::json!({ "resource_id": resource_id, "incident_id": incident_id }),
        );
        Ok(())
    }

    /// Reverses a manual or recommendation-driven assignment: the
    /// resource returns to `available` and is dropped from the
    /// incident's assignment list.
    pub fn unassign_resource(
        &mut self,
        now: DateTime<Utc>,
        resource_id: &str,
        incident_id: &str,
    ) -> Result<(), GraphError> {
        let resource = self
            .resources
            .get_mut(resource_id)
            .ok_or_else(|| GraphError::ResourceNotFound(resource_id.to_string()))?;
        resource.status = ResourceStatus::Available;
        resource.assigned_incident = None;
        resource.destination = None;
        resource.eta_minutes = None;
        resource.updated_at = now;

        if let Some(incident) = self.incidents.get_mut(incident_id) {
            incident.assigned_resources.retain(|id| id != resource_id);
            incident.updated_at = now;
        } else {
            return Err(GraphError::IncidentNotFound(incident_id.to_string()));
        }

        self.touch(now);
        self.audit(
            now,
            "resource_unassigned",
            serde_json::json!({ "resource_id": resource_id, "incident_id": incident_id }),
        );
        Ok(())
    }

    pub fn add_allocation_plan(&mut self, now: DateTime<Utc>, plan: AllocationPlan) {
        let id = plan.id.clone();
        self.allocation_plans.insert(id.clone(), plan);
        self.touch(now);
        self.audit(now, "allocation_plan_added", serde_json::json!({ "decision_id": id }));
    }

    pub fn approve_allocation_plan(
        &mut self,
        now: DateTime<Utc>,
        plan_id: &str,
        decided_by: &str,
    ) -> Result<(), GraphError> {
        let plan = self
            .allocation_plans
            .get_mut(plan_id)
            .ok_or_else(|| GraphError::PlanNotFound(plan_id.to_string()))?;
        plan.status = ActionStatus::Approved;
        plan.decided_at = Some(now);
        plan.decided_by = Some(decided_by.to_string());
        self.touch(now);
        self.audit(now, "allocation_plan_approved", serde_json::json!({ "decision_id": plan_id }));
        Ok(())
    }

    pub fn add_camp(&mut self, now: DateTime<Utc>, camp: CampRecommendation) {
        let id = camp.id.clone();
        self.camps.insert(id.clone(), camp);
        self.touch(now);
        self.audit(now, "camp_added", serde_json::json!({ "decision_id": id }));
    }

    pub fn approve_camp(
        &mut self,
        now: DateTime<Utc>,
        camp_id: &str,
        decided_by: &str,
    ) -> Result<(), GraphError> {
        let camp = self
            .camps
            .get_mut(camp_id)
            .ok_or_else(|| GraphError::CampNotFound(camp_id.to_string()))?;
        camp.status = ActionStatus::Approved;
        camp.decided_at = Some(now);
        camp.decided_by = Some(decided_by.to_string());

        if let Some(location) = self.locations.get_mut(&camp.location_id) {
            let used = location.capacity_used.unwrap_or(0);
            location.capacity_used = Some(used + camp.suggested_capacity);
            location.updated_at = now;
        }

        self.touch(now);
        self.audit(now, "camp_approved", serde_json::json!({ "decision_id": camp_id }));
        Ok(())
    }

    pub fn reject_camp(
        &mut self,
        now: DateTime<Utc>,
        camp_id: &str,
        decided_by: &str,
    ) -> Result<(), GraphError> {
        let camp = self
            .camps
            .get_mut(camp_id)
            .ok_or_else(|| GraphError::CampNotFound(camp_id.to_string()))?;
        camp.status = ActionStatus::Rejected;
        camp.decided_at = Some(now);
        camp.decided_by = Some(decided_by.to_string());
        self.touch(now);
        self.audit(now, "camp_rejected", serde_json::json!({ "decision_id": camp_id }));
        Ok(())
    }

    pub fn add_voice_report(&mut self, now: DateTime<Utc>, report: VoiceReport) {
        let id = report.id.clone();
        self.voice_reports.insert(id.clone(), report);
        self.touch(now);
        self.audit(now, "voice_report_added", serde_json::json!({ "report_id": id }));
    }

    /// Decays confidence on every `active` incident by
    /// `decay_rate * elapsed_minutes`, floored at 0.1. Incidents already
    /// being responded to, contained, or resolved are untouched.
    pub fn decay_confidences(&mut self, now: DateTime<Utc>, elapsed_minutes: f64) {
        let mut touched = false;
        for incident in self.incidents.values_mut() {
            if incident.status == IncidentStatus::Active {
                incident.apply_decay(elapsed_minutes);
                incident.updated_at = now;
                touched = true;
            }
        }
        if touched {
            self.touch(now);
            self.audit(
                now,
                "confidences_decayed",
                serde_json::json!({ "elapsed_minutes": elapsed_minutes }),
            );
        }
    }

    #[must_use]
    pub fn active_incidents(&self) -> Vec<&IncidentNode> {
        self.incidents
            .values()
            .filter(|incident| incident.status == IncidentStatus::Active)
            .collect()
    }

    #[must_use]
    pub fn available_resources(&self) -> Vec<&ResourceNode> {
        self.resources.values().filter(|r| r.is_available()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DamageLevel, IncidentStatus, ResourceStatus, SourceType};
    use crate::geo::Location;
    use crate::urgency::Urgency;
    use crate::recommendation::ActionStatus;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    fn incident(id: &str) -> IncidentNode {
        IncidentNode {
            id: id.to_string(),
            incident_type: "building_collapse".into(),
            location: Location::new(37.78, -122.41),
            damage_level: DamageLevel::Severe,
            urgency: Urgency::Critical,
            trapped_min: Some(3),
            trapped_max: Some(8),
            injured_min: None,
            injured_max: None,
            confidence: 0.72,
            sources: vec![],
            created_at: now(),
            updated_at: now(),
            contradiction_ids: vec![],
            decay_rate: 0.01,
            status: IncidentStatus::Active,
            assigned_resources: vec![],
        }
    }

    fn resource(id: &str) -> ResourceNode {
        ResourceNode {
            id: id.to_string(),
            resource_type: "ambulance".into(),
            unit_id: id.to_string(),
            current_location: Location::new(37.78, -122.41),
            destination: None,
            status: ResourceStatus::Available,
            assigned_incident: None,
            personnel: 2,
            capacity_remaining: 1,
            eta_minutes: None,
            updated_at: now(),
        }
    }

    fn action(id: &str, incident_id: &str, resources: Vec<String>) -> ActionRecommendation {
        ActionRecommendation {
            id: id.to_string(),
            action_type: "dispatch_ambulance".into(),
            target_incident_id: Some(incident_id.to_string()),
            target_location: Some(Location::new(37.78, -122.41)),
            target_sector: None,
            resources_to_allocate: resources,
            rationale: "Nearest unit".into(),
            supporting_factors: vec![],
            confidence: 0.8,
            tradeoffs: vec![],
            uncertainty_factors: vec![],
            requires_human_approval: true,
            decision_deadline: now(),
            time_sensitivity: "high".into(),
            status: ActionStatus::Pending,
            created_at: now(),
            decided_at: None,
            decided_by: None,
        }
    }

    #[test]
    fn approve_action_dispatches_resources_and_dedups() {
        let mut graph = SituationGraph::new(now());
        graph.add_incident(now(), incident("inc_1"));
        graph.add_resource(now(), resource("AMB-1"));
        graph.add_action(now(), action("rec_1", "inc_1", vec!["AMB-1".into()]));

        graph.approve_action(now(), "rec_1", "operator_1").unwrap();
        graph.approve_action(now(), "rec_1", "operator_1").unwrap();

        let incident = &graph.incidents["inc_1"];
        assert_eq!(incident.assigned_resources, vec!["AMB-1".to_string()]);
        assert_eq!(incident.status, IncidentStatus::Responding);

        let resource = &graph.resources["AMB-1"];
        assert_eq!(resource.status, ResourceStatus::Dispatched);
        assert_eq!(resource.eta_minutes, Some(PLACEHOLDER_ETA_MINUTES));
        assert_eq!(resource.destination, Some(Location::new(37.78, -122.41)));
    }

    #[test]
    fn unassign_reverses_manual_assignment() {
        let mut graph = SituationGraph::new(now());
        graph.add_incident(now(), incident("inc_1"));
        graph.add_resource(now(), resource("AMB-1"));

        graph.assign_resource_manual(now(), "AMB-1", "inc_1").unwrap();
        assert_eq!(graph.incidents["inc_1"].assigned_resources, vec!["AMB-1".to_string()]);

        graph.unassign_resource(now(), "AMB-1", "inc_1").unwrap();
        assert!(graph.incidents["inc_1"].assigned_resources.is_empty());
        assert_eq!(graph.resources["AMB-1"].status, ResourceStatus::Available);
    }

    #[test]
    fn decay_only_touches_active_incidents() {
        let mut graph = SituationGraph::new(now());
        let mut responding = incident("inc_1");
        responding.status = IncidentStatus::Responding;
        responding.confidence = 0.9;
        graph.add_incident(now(), responding);

        let mut active = incident("inc_2");
        active.confidence = 0.9;
        active.decay_rate = 0.05;
        graph.add_incident(now(), active);

        graph.decay_confidences(now(), 2.0);

        assert_eq!(graph.incidents["inc_1"].confidence, 0.9);
        assert!((graph.incidents["inc_2"].confidence - 0.8).abs() < 1e-9);
    }

    #[test]
    fn missing_incident_rejects_with_graph_error() {
        let mut graph = SituationGraph::new(now());
        let err = graph.update_incident(now(), "missing", |_| {}).unwrap_err();
        assert!(matches!(err, GraphError::IncidentNotFound(_)));
    }

    #[test]
    fn audit_log_filters_by_decision_id() {
        let mut graph = SituationGraph::new(now());
        graph.add_incident(now(), incident("inc_1"));
        graph.add_resource(now(), resource("AMB-1"));
        graph.add_action(now(), action("rec_1", "inc_1", vec!["AMB-1".into()]));
        graph.approve_action(now(), "rec_1", "operator_1").unwrap();

        let events = graph.audit_for_decision("rec_1");
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_type, "action_added");
        assert_eq!(events[1].event_type, "action_approved");
    }

    #[test]
    fn source_type_round_trips_through_serde() {
        let value = serde_json::to_value(SourceType::Satellite).unwrap();
        assert_eq!(value, serde_json::json!("satellite"));
    }

    #[test]
    fn approve_allocation_plan_stamps_decision() {
        let mut graph = SituationGraph::new(now());
        graph.add_allocation_plan(
            now(),
            AllocationPlan {
                id: "plan_1".to_string(),
                assignments: vec![],
                rationale: "test".to_string(),
                confidence: 0.7,
                status: ActionStatus::Pending,
                created_at: now(),
                decided_at: None,
                decided_by: None,
            },
        );

        graph.approve_allocation_plan(now(), "plan_1", "operator_1").unwrap();

        let plan = &graph.allocation_plans["plan_1"];
        assert_eq!(plan.status, ActionStatus::Approved);
        assert_eq!(plan.decided_by.as_deref(), Some("operator_1"));

        let err = graph.approve_allocation_plan(now(), "missing", "operator_1").unwrap_err();
        assert!(matches!(err, GraphError::PlanNotFound(_)));
    }
}
