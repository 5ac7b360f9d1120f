use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::urgency::Urgency;

/// A single assertion about an entity, gathered from one signal, as fed
/// into the verification analyzer alongside its siblings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Claim {
    pub source_id: String,
    pub claim_text: String,
    pub timestamp: DateTime<Utc>,
    pub credibility_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Consistent,
    Contradiction,
    Uncertain,
    TemporalGap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum RecommendedActionType {
    Accept,
    FlagForHuman,
    RequestVerification,
    Wait,
}

/// Raised when two or more claims about the same entity disagree, as
/// determined by the verification analyzer. One alert exists per entity
/// at a time; a resolved alert clears the entity for fresh accumulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ContradictionAlert {
    pub id: String,
    pub entity_id: String,
    pub entity_type: String,
    pub entity_name: String,
    pub claims: Vec<Claim>,
    pub verdict: Verdict,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temporal_analysis: Option<String>,
    pub recommended_action: RecommendedActionType,
    pub recommended_action_details: String,
    pub urgency: Urgency,
    pub created_at: DateTime<Utc>,
    pub resolved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
}

impl ContradictionAlert {
    #[must_use]
    pub fn is_open(&self) -> bool {
        !self.resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn open_alert_has_no_resolution_fields() {
        let alert = ContradictionAlert {
            id: "alert_1".into(),
            entity_id: "inc_1".into(),
            entity_type: "incident".into(),
            entity_name: "Main Street Bridge".into(),
            claims: vec![],
            verdict: Verdict::Contradiction,
            severity: Severity::High,
            temporal_analysis: Some("21 minute gap between reports".into()),
            recommended_action: RecommendedActionType::FlagForHuman,
            recommended_action_details: "Dispatch verification team".into(),
            urgency: Urgency::High,
            created_at: Utc.timestamp_opt(0, 0).unwrap(),
            resolved: false,
            resolution: None,
            resolved_by: None,
            resolved_at: None,
        };
        assert!(alert.is_open());
    }
}
