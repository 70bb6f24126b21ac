use autopilot_core::types::AllocationStrategy;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What a schedule runs when due.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScheduleKind {
    /// Evaluate automation rules for the org.
    Rules,
    /// Run the lifecycle passes for the org.
    Lifecycle,
    /// Reallocate the org's total budget.
    Reallocation {
        total_budget: f64,
        strategy: AllocationStrategy,
    },
}

impl ScheduleKind {
    pub fn label(&self) -> &'static str {
        match self {
            ScheduleKind::Rules => "rules",
            ScheduleKind::Lifecycle => "lifecycle",
            ScheduleKind::Reallocation { .. } => "reallocation",
        }
    }
}

/// A recurring per-org automation job. New schedules are due
/// immediately; each run advances `next_run_at` by the interval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutomationSchedule {
    pub id: Uuid,
    pub org_id: Uuid,
    pub kind: ScheduleKind,
    pub every_minutes: i64,
    pub last_run_at: Option<DateTime<Utc>>,
    pub next_run_at: DateTime<Utc>,
    pub enabled: bool,
    pub run_count: u64,
}

impl AutomationSchedule {
    pub fn new(org_id: Uuid, kind: ScheduleKind, every_minutes: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            org_id,
            kind,
            every_minutes,
            last_run_at: None,
            next_run_at: Utc::now(),
            enabled: true,
            run_count: 0,
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.enabled && self.next_run_at <= now
    }

    pub(crate) fn mark_ran(&mut self, now: DateTime<Utc>) {
        self.last_run_at = Some(now);
        self.next_run_at = now + Duration::minutes(self.every_minutes);
        self.run_count += 1;
    }
}
