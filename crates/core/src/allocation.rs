use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::recommendation::ActionStatus;

/// One resource-to-incident binding inside a broader [`AllocationPlan`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ResourceAssignment {
    pub resource_id: String,
    pub incident_id: String,
    pub rationale: String,
}

/// A batch allocation across several incidents and resources, produced by
/// the allocation analyzer and subject to the same approve/reject lifecycle
/// as a single [`crate::recommendation::ActionRecommendation`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AllocationPlan {
    pub id: String,
    pub assignments: Vec<ResourceAssignment>,
    pub rationale: String,
    pub confidence: f64,
    pub status: ActionStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decided_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decided_by: Option<String>,
}

/// A suggested evacuation or overflow camp site, produced alongside an
/// [`AllocationPlan`] when shelter capacity is tight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CampRecommendation {
    pub id: String,
    pub name: String,
    pub location_id: String,
    pub suggested_capacity: u32,
    pub rationale: String,
    pub status: ActionStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decided_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decided_by: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn allocation_plan_carries_multiple_assignments() {
        let now = Utc.timestamp_opt(0, 0).unwrap();
        let plan = AllocationPlan {
            id: "plan_1".into(),
            assignments: vec![
                ResourceAssignment {
                    resource_id: "AMB-1".into(),
                    incident_id: "inc_1".into(),
                    rationale: "Closest unit".into(),
                },
                ResourceAssignment {
                    resource_id: "AMB-2".into(),
                    incident_id: "inc_2".into(),
                    rationale: "Backup coverage".into(),
                },
            ],
            rationale: "Balance load across sectors".into(),
            confidence: 0.7,
            status: ActionStatus::Pending,
            created_at: now,
            decided_at: None,
            decided_by: None,
        };
        assert_eq!(plan.assignments.len(), 2);
    }
}
