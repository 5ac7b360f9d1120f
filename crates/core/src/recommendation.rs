use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::geo::Location;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum ActionStatus {
    Pending,
    Approved,
    Rejected,
    Executed,
    Expired,
}

/// A recommendation produced by the planning trigger, awaiting (or past)
/// human approval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ActionRecommendation {
    pub id: String,
    pub action_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_incident_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_location: Option<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_sector: Option<String>,
    pub resources_to_allocate: Vec<String>,
    pub rationale: String,
    pub supporting_factors: Vec<String>,
    pub confidence: f64,
    pub tradeoffs: Vec<String>,
    pub uncertainty_factors: Vec<String>,
    pub requires_human_approval: bool,
    pub decision_deadline: DateTime<Utc>,
    pub time_sensitivity: String,
    pub status: ActionStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decided_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decided_by: Option<String>,
}

impl ActionRecommendation {
    /// Fixed lookahead window given to every freshly created recommendation.
    pub const DECISION_WINDOW_MINUTES: i64 = 5;

    #[must_use]
    pub fn is_decided(&self) -> bool {
        !matches!(self.status, ActionStatus::Pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn pending_recommendation_is_not_decided() {
        let now = Utc.timestamp_opt(0, 0).unwrap();
        let rec = ActionRecommendation {
            id: "rec_1".into(),
            action_type: "dispatch_ambulance".into(),
            target_incident_id: Some("inc_1".into()),
            target_location: Some(Location::new(37.78, -122.41)),
            target_sector: None,
            resources_to_allocate: vec!["AMB-1".into()],
            rationale: "Nearest available unit".into(),
            supporting_factors: vec![],
            confidence: 0.8,
            tradeoffs: vec![],
            uncertainty_factors: vec![],
            requires_human_approval: true,
            decision_deadline: now + Duration::minutes(ActionRecommendation::DECISION_WINDOW_MINUTES),
            time_sensitivity: "high".into(),
            status: ActionStatus::Pending,
            created_at: now,
            decided_at: None,
            decided_by: None,
        };
        assert!(!rec.is_decided());
    }
}
