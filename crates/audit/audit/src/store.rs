use async_trait::async_trait;

use crate::error::AuditError;
use crate::record::{AuditPage, AuditQuery, AuditRecord};

/// Trait for audit record storage backends.
///
/// Implementations must be `Send + Sync` to be shared across async tasks.
/// The coordinator appends one record per state-changing operation; the
/// `/api/audit/*` and `/api/timeline` routes read through this trait.
#[async_trait]
pub trait AuditStore: Send + Sync {
    /// Persist an audit record.
    async fn record(&self, entry: AuditRecord) -> Result<(), AuditError>;

    /// Retrieve an audit record by its unique id.
    async fn get_by_id(&self, id: &str) -> Result<Option<AuditRecord>, AuditError>;

    /// Query audit records with filters and pagination, newest first.
    async fn query(&self, query: &AuditQuery) -> Result<AuditPage, AuditError>;
}
