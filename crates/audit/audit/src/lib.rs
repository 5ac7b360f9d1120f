//! Audit trail for the Aegis disaster-response coordination server: an
//! append-only record type and the `AuditStore` trait its backends
//! implement. Queryable by incident id or decision id.

pub mod error;
pub mod record;
pub mod store;

pub use error::AuditError;
pub use record::{AuditPage, AuditQuery, AuditRecord};
pub use store::AuditStore;
