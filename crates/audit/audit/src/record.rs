use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// A single append-only audit record: one state-changing step taken by
/// the coordinator, queryable later by the incident or decision it
/// concerns. Mirrors `aegis_core::graph::AuditEvent`, plus the id and
/// cross-reference fields needed to query it from outside the graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AuditRecord {
    pub id: String,
    pub event_type: String,
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub payload: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incident_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision_id: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Filters for searching audit records. An absent field matches anything.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AuditQuery {
    pub incident_id: Option<String>,
    pub decision_id: Option<String>,
    pub event_type: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl AuditQuery {
    /// Effective result limit, clamped to 1..=1000, defaulting to 100.
    #[must_use]
    pub fn effective_limit(&self) -> u32 {
        self.limit.unwrap_or(100).clamp(1, 1000)
    }

    /// Effective pagination offset, defaulting to 0.
    #[must_use]
    pub fn effective_offset(&self) -> u32 {
        self.offset.unwrap_or(0)
    }
}

/// A page of query results, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AuditPage {
    pub records: Vec<AuditRecord>,
    pub total: u64,
    pub limit: u32,
    pub offset: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_limit_is_one_hundred() {
        let query = AuditQuery::default();
        assert_eq!(query.effective_limit(), 100);
        assert_eq!(query.effective_offset(), 0);
    }

    #[test]
    fn limit_is_clamped() {
        let query = AuditQuery {
            limit: Some(5000),
            ..Default::default()
        };
        assert_eq!(query.effective_limit(), 1000);
    }
}
