//! Append-only logs: the audit trail of automated mutations, the budget
//! allocation history, and the campaign lifecycle event log. Entries are
//! never mutated or deleted.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::info;
use uuid::Uuid;

/// One automated mutation: who (rule or system), what campaign, what
/// changed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub id: Uuid,
    pub sequence: u64,
    pub org_id: Uuid,
    /// The rule that triggered the action, if any; `None` for lifecycle
    /// and allocator writes.
    pub actor_rule: Option<Uuid>,
    pub campaign_id: Uuid,
    pub action: String,
    pub old_value: serde_json::Value,
    pub new_value: serde_json::Value,
    pub reason: String,
    pub timestamp: DateTime<Utc>,
}

/// One persisted budget reallocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationRecord {
    pub id: Uuid,
    pub org_id: Uuid,
    pub campaign_id: Uuid,
    pub campaign_name: String,
    pub old_budget: f64,
    pub new_budget: f64,
    pub change_amount: f64,
    pub change_percentage: f64,
    pub reason: String,
    pub allocated_at: DateTime<Utc>,
}

/// One lifecycle transition (activated, paused, completed, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifecycleEvent {
    pub id: Uuid,
    pub org_id: Uuid,
    pub campaign_id: Uuid,
    pub event: String,
    pub details: serde_json::Value,
    pub occurred_at: DateTime<Utc>,
}

/// Per-event counts over a lookback window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifecycleStats {
    pub period_days: i64,
    pub events: HashMap<String, u64>,
    pub total_events: u64,
}

/// Append-only log store with a monotonic sequence over audit entries.
pub struct AuditLog {
    entries: DashMap<Uuid, AuditLogEntry>,
    allocations: DashMap<Uuid, AllocationRecord>,
    lifecycle_events: DashMap<Uuid, LifecycleEvent>,
    sequence: parking_lot::Mutex<u64>,
}

impl AuditLog {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            allocations: DashMap::new(),
            lifecycle_events: DashMap::new(),
            sequence: parking_lot::Mutex::new(0),
        }
    }

    /// Append an audit entry and return it with its assigned sequence.
    #[allow(clippy::too_many_arguments)]
    pub fn record(
        &self,
        org_id: Uuid,
        actor_rule: Option<Uuid>,
        campaign_id: Uuid,
        action: &str,
        old_value: serde_json::Value,
        new_value: serde_json::Value,
        reason: &str,
    ) -> AuditLogEntry {
        let sequence = {
            let mut seq = self.sequence.lock();
            *seq += 1;
            *seq
        };
        let entry = AuditLogEntry {
            id: Uuid::new_v4(),
            sequence,
            org_id,
            actor_rule,
            campaign_id,
            action: action.to_string(),
            old_value,
            new_value,
            reason: reason.to_string(),
            timestamp: Utc::now(),
        };
        info!(
            sequence,
            org_id = %org_id,
            campaign_id = %campaign_id,
            action,
            "Audit entry recorded"
        );
        self.entries.insert(entry.id, entry.clone());
        entry
    }

    /// Audit entries for an org, newest first, optionally filtered by
    /// action.
    pub fn query(&self, org_id: Uuid, action: Option<&str>, limit: usize) -> Vec<AuditLogEntry> {
        let mut results: Vec<AuditLogEntry> = self
            .entries
            .iter()
            .filter(|e| e.org_id == org_id && action.map_or(true, |a| e.action == a))
            .map(|e| e.clone())
            .collect();
        results.sort_by(|a, b| b.sequence.cmp(&a.sequence));
        results.truncate(limit);
        results
    }

    /// Audit entries touching one campaign, newest first.
    pub fn entries_for_campaign(&self, org_id: Uuid, campaign_id: Uuid) -> Vec<AuditLogEntry> {
        let mut results: Vec<AuditLogEntry> = self
            .entries
            .iter()
            .filter(|e| e.org_id == org_id && e.campaign_id == campaign_id)
            .map(|e| e.clone())
            .collect();
        results.sort_by(|a, b| b.sequence.cmp(&a.sequence));
        results
    }

    // ─── Allocation history ────────────────────────────────────────────

    #[allow(clippy::too_many_arguments)]
    pub fn record_allocation(
        &self,
        org_id: Uuid,
        campaign_id: Uuid,
        campaign_name: &str,
        old_budget: f64,
        new_budget: f64,
        reason: &str,
    ) -> AllocationRecord {
        let change_amount = new_budget - old_budget;
        let change_percentage = if old_budget > 0.0 {
            change_amount / old_budget * 100.0
        } else {
            0.0
        };
        let record = AllocationRecord {
            id: Uuid::new_v4(),
            org_id,
            campaign_id,
            campaign_name: campaign_name.to_string(),
            old_budget,
            new_budget,
            change_amount,
            change_percentage,
            reason: reason.to_string(),
            allocated_at: Utc::now(),
        };
        self.allocations.insert(record.id, record.clone());
        record
    }

    /// Allocation history for an org, newest first.
    pub fn allocation_history(&self, org_id: Uuid, limit: usize) -> Vec<AllocationRecord> {
        let mut results: Vec<AllocationRecord> = self
            .allocations
            .iter()
            .filter(|r| r.org_id == org_id)
            .map(|r| r.clone())
            .collect();
        results.sort_by(|a, b| b.allocated_at.cmp(&a.allocated_at));
        results.truncate(limit);
        results
    }

    // ─── Lifecycle event log ───────────────────────────────────────────

    pub fn record_lifecycle(
        &self,
        org_id: Uuid,
        campaign_id: Uuid,
        event: &str,
        details: serde_json::Value,
    ) -> LifecycleEvent {
        let entry = LifecycleEvent {
            id: Uuid::new_v4(),
            org_id,
            campaign_id,
            event: event.to_string(),
            details,
            occurred_at: Utc::now(),
        };
        self.lifecycle_events.insert(entry.id, entry.clone());
        entry
    }

    /// Per-event counts for the last `days` days.
    pub fn lifecycle_statistics(&self, org_id: Uuid, days: i64) -> LifecycleStats {
        let since = Utc::now() - Duration::days(days);
        let mut events: HashMap<String, u64> = HashMap::new();

        for entry in self.lifecycle_events.iter() {
            if entry.org_id != org_id || entry.occurred_at < since {
                continue;
            }
            *events.entry(entry.event.clone()).or_default() += 1;
        }

        let total_events = events.values().sum();
        LifecycleStats {
            period_days: days,
            events,
            total_events,
        }
    }
}

impl Default for AuditLog {
    fn default() -> Self {
        Self::new()
    }
}
