use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::geo::Location;
use crate::urgency::Urgency;

/// Where a claim about the world came from, and how much to trust it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct SourceReference {
    pub source_id: String,
    pub source_type: SourceType,
    pub timestamp: DateTime<Utc>,
    pub raw_content_ref: String,
    pub credibility_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Image,
    Audio,
    Text,
    Document,
    Satellite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum DamageLevel {
    None,
    Minor,
    Moderate,
    Severe,
    Catastrophic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum IncidentStatus {
    Active,
    Responding,
    Contained,
    Resolved,
}

/// A confirmed-or-suspected incident reported through one or more signals.
///
/// Invariants enforced by the owning `SituationGraph`, not by this struct
/// alone: `trapped_min <= trapped_max`; `confidence` never drops below 0.1
/// via decay; `assigned_resources` entries resolve to live `ResourceNode`
/// ids; `status == Responding` implies `assigned_resources` is non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct IncidentNode {
    pub id: String,
    pub incident_type: String,
    pub location: Location,
    pub damage_level: DamageLevel,
    pub urgency: Urgency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trapped_min: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trapped_max: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub injured_min: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub injured_max: Option<u32>,
    pub confidence: f64,
    pub sources: Vec<SourceReference>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub contradiction_ids: Vec<String>,
    pub decay_rate: f64,
    pub status: IncidentStatus,
    pub assigned_resources: Vec<String>,
}

impl IncidentNode {
    /// Floor applied after confidence decay; an incident's credibility
    /// never fully bottoms out while it remains active.
    pub const MIN_CONFIDENCE: f64 = 0.1;

    #[must_use]
    pub fn casualty_range_valid(&self) -> bool {
        match (self.trapped_min, self.trapped_max) {
            (Some(min), Some(max)) => min <= max,
            _ => true,
        }
    }

    /// Applies linear confidence decay for `elapsed_minutes`, floored at
    /// [`Self::MIN_CONFIDENCE`]. Callers only decay active incidents.
    pub fn apply_decay(&mut self, elapsed_minutes: f64) {
        let decayed = self.confidence - self.decay_rate * elapsed_minutes;
        self.confidence = decayed.max(Self::MIN_CONFIDENCE);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum ResourceStatus {
    Available,
    Dispatched,
    OnScene,
    Returning,
    Offline,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ResourceNode {
    pub id: String,
    pub resource_type: String,
    pub unit_id: String,
    pub current_location: Location,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<Location>,
    pub status: ResourceStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_incident: Option<String>,
    pub personnel: u32,
    pub capacity_remaining: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eta_minutes: Option<u32>,
    pub updated_at: DateTime<Utc>,
}

impl ResourceNode {
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.status == ResourceStatus::Available
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum LocationNodeStatus {
    Operational,
    Damaged,
    Destroyed,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum Accessibility {
    Accessible,
    PartiallyBlocked,
    Blocked,
    Hazardous,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct LocationNode {
    pub id: String,
    pub location: Location,
    pub location_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity_total: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity_used: Option<u32>,
    pub status: LocationNodeStatus,
    pub accessibility: Accessibility,
    pub confidence: f64,
    pub sources: Vec<SourceReference>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum EdgeType {
    LocatedAt,
    AssignedTo,
    BlocksAccessTo,
    CausedBy,
    RequiresResource,
    EvacuateTo,
}

/// Informational relation between two node ids. Edges describe structure
/// for display and querying; the authoritative assignment state always
/// lives on the node itself (`IncidentNode::assigned_resources`,
/// `ResourceNode::assigned_incident`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct GraphEdge {
    pub from_id: String,
    pub to_id: String,
    pub edge_type: EdgeType,
    pub confidence: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_incident() -> IncidentNode {
        IncidentNode {
            id: "inc_1".into(),
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
            created_at: Utc.timestamp_opt(0, 0).unwrap(),
            updated_at: Utc.timestamp_opt(0, 0).unwrap(),
            contradiction_ids: vec![],
            decay_rate: 0.01,
            status: IncidentStatus::Active,
            assigned_resources: vec![],
        }
    }

    #[test]
    fn casualty_range_validates() {
        let mut incident = sample_incident();
        assert!(incident.casualty_range_valid());
        incident.trapped_min = Some(9);
        assert!(!incident.casualty_range_valid());
    }

    #[test]
    fn decay_floors_at_min_confidence() {
        let mut incident = sample_incident();
        incident.confidence = 0.15;
        incident.decay_rate = 0.05;
        incident.apply_decay(10.0);
        assert_eq!(incident.confidence, IncidentNode::MIN_CONFIDENCE);
    }

    #[test]
    fn decay_is_linear_before_floor() {
        let mut incident = sample_incident();
        incident.confidence = 0.9;
        incident.decay_rate = 0.02;
        incident.apply_decay(5.0);
        assert!((incident.confidence - 0.8).abs() < 1e-9);
    }
}
