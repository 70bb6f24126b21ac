use std::sync::Arc;

use autopilot_allocator::BudgetAllocator;
use autopilot_core::analysis::{CampaignAnalyzer, Forecaster};
use autopilot_core::AutomationConfig;
use autopilot_lifecycle::LifecycleManager;
use autopilot_rules::RulesEngine;
use autopilot_store::{AuditLog, OrgStore};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::schedule::{AutomationSchedule, ScheduleKind};

/// Result of dispatching one due schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRun {
    pub schedule_id: Uuid,
    pub org_id: Uuid,
    pub kind: String,
    pub success: bool,
    /// Engine summary, serialized for callers and logs.
    pub outcome: serde_json::Value,
    pub error: Option<String>,
}

/// Owns the engines and the schedule table; one `process_due_schedules`
/// call per tick drives all registered automation.
pub struct ExecutionService {
    rules: RulesEngine,
    lifecycle: LifecycleManager,
    allocator: BudgetAllocator,
    schedules: DashMap<Uuid, AutomationSchedule>,
}

impl ExecutionService {
    pub fn new(
        store: Arc<OrgStore>,
        audit: Arc<AuditLog>,
        analyzer: Arc<dyn CampaignAnalyzer>,
        forecaster: Arc<dyn Forecaster>,
        config: AutomationConfig,
    ) -> Self {
        let rules = RulesEngine::new(Arc::clone(&store), Arc::clone(&audit), config.clone());
        let lifecycle = LifecycleManager::new(
            Arc::clone(&store),
            Arc::clone(&audit),
            Arc::clone(&analyzer),
            config.clone(),
        );
        let allocator = BudgetAllocator::new(store, audit, analyzer, forecaster, config);
        Self {
            rules,
            lifecycle,
            allocator,
            schedules: DashMap::new(),
        }
    }

    /// Direct access for simulation and history queries.
    pub fn allocator(&self) -> &BudgetAllocator {
        &self.allocator
    }

    pub fn add_schedule(&self, schedule: AutomationSchedule) -> Uuid {
        let id = schedule.id;
        info!(
            schedule_id = %id,
            org_id = %schedule.org_id,
            kind = schedule.kind.label(),
            every_minutes = schedule.every_minutes,
            "Schedule registered"
        );
        self.schedules.insert(id, schedule);
        id
    }

    pub fn get_schedule(&self, id: Uuid) -> Option<AutomationSchedule> {
        self.schedules.get(&id).map(|s| s.clone())
    }

    pub fn set_enabled(&self, id: Uuid, enabled: bool) -> bool {
        match self.schedules.get_mut(&id) {
            Some(mut s) => {
                s.enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// Run every enabled schedule whose `next_run_at` has passed. Each
    /// schedule advances by its interval whether its run succeeded or
    /// not, so a persistently failing job cannot wedge the tick loop.
    pub fn process_due_schedules(&self, now: DateTime<Utc>) -> Vec<ScheduleRun> {
        let due: Vec<Uuid> = self
            .schedules
            .iter()
            .filter(|s| s.is_due(now))
            .map(|s| s.id)
            .collect();

        let mut runs = Vec::with_capacity(due.len());
        for id in due {
            let (org_id, kind) = match self.schedules.get(&id) {
                Some(s) => (s.org_id, s.kind.clone()),
                None => continue,
            };

            let run = self.dispatch(id, org_id, &kind);
            if let Some(e) = &run.error {
                warn!(schedule_id = %id, kind = kind.label(), error = %e, "Schedule run failed");
            } else {
                info!(schedule_id = %id, kind = kind.label(), "Schedule run complete");
            }
            if let Some(mut s) = self.schedules.get_mut(&id) {
                s.mark_ran(now);
            }
            runs.push(run);
        }
        runs
    }

    fn dispatch(&self, schedule_id: Uuid, org_id: Uuid, kind: &ScheduleKind) -> ScheduleRun {
        let (success, outcome, error) = match kind {
            ScheduleKind::Rules => {
                let summary = self.rules.run_for_organization(org_id);
                let ok = summary.errors == 0;
                (ok, json_or_null(&summary), None)
            }
            ScheduleKind::Lifecycle => {
                let summary = self.lifecycle.process_lifecycle_events(org_id);
                let ok = summary.errors.is_empty();
                (ok, json_or_null(&summary), None)
            }
            ScheduleKind::Reallocation {
                total_budget,
                strategy,
            } => match self.allocator.reallocate(org_id, *total_budget, *strategy) {
                Ok(report) => {
                    let ok = report.errors.is_empty();
                    (ok, json_or_null(&report), None)
                }
                Err(e) => (false, serde_json::Value::Null, Some(e.to_string())),
            },
        };
        ScheduleRun {
            schedule_id,
            org_id,
            kind: kind.label().to_string(),
            success,
            outcome,
            error,
        }
    }
}

fn json_or_null<T: Serialize>(value: &T) -> serde_json::Value {
    serde_json::to_value(value).unwrap_or(serde_json::Value::Null)
}
