//! In-memory [`AuditStore`] backend, the only backend this deployment
//! needs, since the audit trail lives for the lifetime of the process
//! (the coordinator itself is in-memory; see `aegis-coordinator`).

use std::sync::atomic::{AtomicU64, Ordering};

use aegis_audit::{AuditError, AuditPage, AuditQuery, AuditRecord, AuditStore};
use async_trait::async_trait;
use dashmap::DashMap;

/// Stores every record in a `DashMap` keyed by id, insertion-ordered via
/// a monotonic sequence counter so queries can return newest-first
/// without re-sorting by timestamp (which may collide at millisecond
/// resolution under fast replay).
pub struct InMemoryAuditStore {
    records: DashMap<String, (u64, AuditRecord)>,
    sequence: AtomicU64,
}

impl InMemoryAuditStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
            sequence: AtomicU64::new(0),
        }
    }
}

impl Default for InMemoryAuditStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuditStore for InMemoryAuditStore {
    async fn record(&self, entry: AuditRecord) -> Result<(), AuditError> {
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst);
        self.records.insert(entry.id.clone(), (sequence, entry));
        Ok(())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<AuditRecord>, AuditError> {
        Ok(self.records.get(id).map(|entry| entry.value().1.clone()))
    }

    async fn query(&self, query: &AuditQuery) -> Result<AuditPage, AuditError> {
        let mut matched: Vec<(u64, AuditRecord)> = self
            .records
            .iter()
            .map(|entry| entry.value().clone())
            .filter(|(_, record)| matches(record, query))
            .collect();

        matched.sort_by(|a, b| b.0.cmp(&a.0));

        let total = matched.len() as u64;
        let limit = query.effective_limit();
        let offset = query.effective_offset();

        let records = matched
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .map(|(_, record)| record)
            .collect();

        Ok(AuditPage {
            records,
            total,
            limit,
            offset,
        })
    }
}

fn matches(record: &AuditRecord, query: &AuditQuery) -> bool {
    if let Some(incident_id) = &query.incident_id {
        if record.incident_id.as_deref() != Some(incident_id.as_str()) {
            return false;
        }
    }
    if let Some(decision_id) = &query.decision_id {
        if record.decision_id.as_deref() != Some(decision_id.as_str()) {
            return false;
        }
    }
    if let Some(event_type) = &query.event_type {
        if &record.event_type != event_type {
            return false;
        }
    }
    if let Some(from) = query.from {
        if record.timestamp < from {
            return false;
        }
    }
    if let Some(to) = query.to {
        if record.timestamp > to {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use serde_json::json;

    fn record(id: &str, incident_id: &str, offset_minutes: i64) -> AuditRecord {
        AuditRecord {
            id: id.to_string(),
            event_type: "incident_added".to_string(),
            payload: json!({"id": incident_id}),
            incident_id: Some(incident_id.to_string()),
            decision_id: None,
            timestamp: Utc::now() + Duration::minutes(offset_minutes),
        }
    }

    #[tokio::test]
    async fn get_by_id_round_trips() {
        let store = InMemoryAuditStore::new();
        store.record(record("rec_1", "inc_1", 0)).await.unwrap();

        let found = store.get_by_id("rec_1").await.unwrap();
        assert_eq!(found.unwrap().incident_id.as_deref(), Some("inc_1"));
        assert!(store.get_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn query_filters_by_incident_and_returns_newest_first() {
        let store = InMemoryAuditStore::new();
        store.record(record("rec_1", "inc_1", 0)).await.unwrap();
        store.record(record("rec_2", "inc_2", 1)).await.unwrap();
        store.record(record("rec_3", "inc_1", 2)).await.unwrap();

        let page = store
            .query(&AuditQuery {
                incident_id: Some("inc_1".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(page.total, 2);
        assert_eq!(page.records[0].id, "rec_3");
        assert_eq!(page.records[1].id, "rec_1");
    }

    #[tokio::test]
    async fn query_respects_pagination() {
        let store = InMemoryAuditStore::new();
        for i in 0..5 {
            store.record(record(&format!("rec_{i}"), "inc_1", i)).await.unwrap();
        }

        let page = store
            .query(&AuditQuery {
                limit: Some(2),
                offset: Some(1),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(page.total, 5);
        assert_eq!(page.records.len(), 2);
        assert_eq!(page.records[0].id, "rec_3");
    }
}
