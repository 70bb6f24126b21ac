//! Org-scoped persistence for the automation cluster.
//!
//! In-memory, backed by DashMap. Production: replace with PostgreSQL
//! (sqlx) or similar ACID store; the API surface stays the same. Every
//! accessor takes the org id explicitly; row-level org isolation is the
//! multi-tenancy boundary, and a cross-org lookup always reads as
//! not-found.

pub mod audit;
pub mod store;

pub use audit::{AllocationRecord, AuditLog, AuditLogEntry, LifecycleEvent, LifecycleStats};
pub use store::OrgStore;
