use std::sync::Arc;

use autopilot_core::analysis::{CampaignAnalyzer, KpiStatus, Recommendation};
use autopilot_core::types::{Campaign, CampaignStatus, PausedReason};
use autopilot_core::AutomationConfig;
use autopilot_store::{AuditLog, LifecycleStats, OrgStore};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::transitions::can_transition;

/// Tally of one lifecycle pass over an organization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LifecycleSummary {
    pub activated: usize,
    pub paused: usize,
    pub completed: usize,
    pub budget_adjusted: usize,
    pub analyzed: usize,
    pub errors: Vec<String>,
}

/// Drives automated status transitions for an organization's campaigns.
///
/// Passes run in a fixed order: activation, budget exhaustion, end-date
/// completion, performance pause/resume, post-campaign analysis. The
/// order matters: an over-budget campaign that is also underperforming
/// is paused for budget exhaustion, not poor performance.
pub struct LifecycleManager {
    store: Arc<OrgStore>,
    audit: Arc<AuditLog>,
    analyzer: Arc<dyn CampaignAnalyzer>,
    config: AutomationConfig,
}

impl LifecycleManager {
    pub fn new(
        store: Arc<OrgStore>,
        audit: Arc<AuditLog>,
        analyzer: Arc<dyn CampaignAnalyzer>,
        config: AutomationConfig,
    ) -> Self {
        Self {
            store,
            audit,
            analyzer,
            config,
        }
    }

    /// Run all lifecycle passes for one organization. A failure on one
    /// campaign is recorded and the batch continues.
    pub fn process_lifecycle_events(&self, org_id: Uuid) -> LifecycleSummary {
        let mut summary = LifecycleSummary::default();
        self.activate_scheduled(org_id, &mut summary);
        self.handle_budget_exhaustion(org_id, &mut summary);
        self.complete_ended(org_id, &mut summary);
        self.apply_performance_rules(org_id, &mut summary);
        self.generate_post_campaign_analyses(org_id, &mut summary);

        info!(
            org_id = %org_id,
            activated = summary.activated,
            paused = summary.paused,
            completed = summary.completed,
            budget_adjusted = summary.budget_adjusted,
            analyzed = summary.analyzed,
            errors = summary.errors.len(),
            "Lifecycle pass complete"
        );
        summary
    }

    /// Lifecycle event counts per event type over the trailing window.
    pub fn lifecycle_statistics(&self, org_id: Uuid, days: i64) -> LifecycleStats {
        self.audit.lifecycle_statistics(org_id, days)
    }

    // ─── Pass 1: activation ────────────────────────────────────────────

    fn activate_scheduled(&self, org_id: Uuid, summary: &mut LifecycleSummary) {
        let now = Utc::now();
        for campaign in self
            .store
            .list_by_status(org_id, &[CampaignStatus::Scheduled])
        {
            if campaign.start_date > now {
                continue;
            }
            let result = self.store.update_campaign(org_id, campaign.id, |c| {
                c.status = CampaignStatus::Active;
                c.activated_at = Some(now);
            });
            match result {
                Ok(_) => {
                    self.audit.record_lifecycle(
                        org_id,
                        campaign.id,
                        "activated",
                        serde_json::json!({ "start_date": campaign.start_date }),
                    );
                    self.audit.record(
                        org_id,
                        None,
                        campaign.id,
                        "campaign_activated",
                        serde_json::json!("scheduled"),
                        serde_json::json!("active"),
                        "Scheduled start date reached",
                    );
                    summary.activated += 1;
                }
                Err(e) => {
                    warn!(campaign_id = %campaign.id, error = %e, "Activation failed");
                    summary.errors.push(format!("{}: {e}", campaign.id));
                }
            }
        }
    }

    // ─── Pass 2: budget exhaustion ─────────────────────────────────────

    fn handle_budget_exhaustion(&self, org_id: Uuid, summary: &mut LifecycleSummary) {
        for campaign in self.store.list_by_status(org_id, &[CampaignStatus::Active]) {
            if campaign.budget <= 0.0 {
                continue;
            }
            let spend = self.store.spend(org_id, campaign.id);
            let utilization = spend / campaign.budget * 100.0;

            if utilization >= self.config.exhaustion_pct {
                self.pause(
                    org_id,
                    &campaign,
                    PausedReason::BudgetExhausted,
                    &format!("Budget {utilization:.1}% utilized"),
                    summary,
                );
            } else if utilization >= self.config.warning_pct {
                // Strong performers approaching exhaustion get more
                // budget instead of a warning pause.
                let score = self.score(&campaign);
                if score >= self.config.budget_increase_score {
                    self.increase_budget(org_id, &campaign, utilization, summary);
                }
            }
        }
    }

    fn increase_budget(
        &self,
        org_id: Uuid,
        campaign: &Campaign,
        utilization: f64,
        summary: &mut LifecycleSummary,
    ) {
        let old_budget = campaign.budget;
        let new_budget = round2(old_budget * self.config.budget_increase_factor);
        let result = self
            .store
            .update_campaign(org_id, campaign.id, |c| c.budget = new_budget);
        match result {
            Ok(_) => {
                self.audit.record_lifecycle(
                    org_id,
                    campaign.id,
                    "budget_increased",
                    serde_json::json!({
                        "old_budget": old_budget,
                        "new_budget": new_budget,
                        "utilization_pct": utilization,
                    }),
                );
                self.audit.record(
                    org_id,
                    None,
                    campaign.id,
                    "budget_increased",
                    serde_json::json!(old_budget),
                    serde_json::json!(new_budget),
                    "High performer near budget exhaustion",
                );
                summary.budget_adjusted += 1;
            }
            Err(e) => {
                warn!(campaign_id = %campaign.id, error = %e, "Budget increase failed");
                summary.errors.push(format!("{}: {e}", campaign.id));
            }
        }
    }

    // ─── Pass 3: end-date completion ───────────────────────────────────

    fn complete_ended(&self, org_id: Uuid, summary: &mut LifecycleSummary) {
        let now = Utc::now();
        for campaign in self
            .store
            .list_by_status(org_id, &[CampaignStatus::Active, CampaignStatus::Paused])
        {
            let ended = matches!(campaign.end_date, Some(end) if end <= now);
            if !ended || !can_transition(campaign.status, CampaignStatus::Completed) {
                continue;
            }
            let result = self.store.update_campaign(org_id, campaign.id, |c| {
                c.status = CampaignStatus::Completed;
                c.completed_at = Some(now);
            });
            match result {
                Ok(_) => {
                    self.audit.record_lifecycle(
                        org_id,
                        campaign.id,
                        "completed",
                        serde_json::json!({ "end_date": campaign.end_date }),
                    );
                    self.audit.record(
                        org_id,
                        None,
                        campaign.id,
                        "campaign_completed",
                        serde_json::json!(campaign.status),
                        serde_json::json!("completed"),
                        "End date reached",
                    );
                    info!(campaign_id = %campaign.id, "Post-campaign analysis queued");
                    summary.completed += 1;
                }
                Err(e) => {
                    warn!(campaign_id = %campaign.id, error = %e, "Completion failed");
                    summary.errors.push(format!("{}: {e}", campaign.id));
                }
            }
        }
    }

    // ─── Pass 4: performance pause/resume ──────────────────────────────

    fn apply_performance_rules(&self, org_id: Uuid, summary: &mut LifecycleSummary) {
        for campaign in self.store.list_by_status(org_id, &[CampaignStatus::Active]) {
            let score = self.score(&campaign);
            if score < self.config.auto_pause_score {
                self.pause(
                    org_id,
                    &campaign,
                    PausedReason::PoorPerformance,
                    &format!("Performance score {score:.1}"),
                    summary,
                );
            }
        }

        // Only performance pauses auto-resume. Budget-exhausted and
        // rule-triggered pauses need their own causes to clear.
        for campaign in self.store.list_by_status(org_id, &[CampaignStatus::Paused]) {
            if campaign.paused_reason != Some(PausedReason::PoorPerformance) {
                continue;
            }
            let score = self.score(&campaign);
            if score < self.config.auto_resume_score {
                continue;
            }
            let result = self.store.update_campaign(org_id, campaign.id, |c| {
                c.status = CampaignStatus::Active;
                c.paused_reason = None;
            });
            match result {
                Ok(_) => {
                    self.audit.record_lifecycle(
                        org_id,
                        campaign.id,
                        "resumed",
                        serde_json::json!({ "performance_score": score }),
                    );
                    self.audit.record(
                        org_id,
                        None,
                        campaign.id,
                        "campaign_resumed",
                        serde_json::json!("paused"),
                        serde_json::json!("active"),
                        "Performance recovered",
                    );
                    summary.activated += 1;
                }
                Err(e) => {
                    warn!(campaign_id = %campaign.id, error = %e, "Resume failed");
                    summary.errors.push(format!("{}: {e}", campaign.id));
                }
            }
        }
    }

    fn pause(
        &self,
        org_id: Uuid,
        campaign: &Campaign,
        reason: PausedReason,
        detail: &str,
        summary: &mut LifecycleSummary,
    ) {
        if !can_transition(campaign.status, CampaignStatus::Paused) {
            return;
        }
        let result = self.store.update_campaign(org_id, campaign.id, |c| {
            c.status = CampaignStatus::Paused;
            c.paused_reason = Some(reason);
        });
        match result {
            Ok(_) => {
                self.audit.record_lifecycle(
                    org_id,
                    campaign.id,
                    "paused",
                    serde_json::json!({ "reason": reason, "detail": detail }),
                );
                self.audit.record(
                    org_id,
                    None,
                    campaign.id,
                    "campaign_paused",
                    serde_json::json!("active"),
                    serde_json::json!("paused"),
                    detail,
                );
                summary.paused += 1;
            }
            Err(e) => {
                warn!(campaign_id = %campaign.id, error = %e, "Pause failed");
                summary.errors.push(format!("{}: {e}", campaign.id));
            }
        }
    }

    // ─── Pass 5: post-campaign analysis ────────────────────────────────

    /// Fill in `post_campaign_analysis` for campaigns completed within
    /// the trailing analysis window that don't have one yet.
    fn generate_post_campaign_analyses(&self, org_id: Uuid, summary: &mut LifecycleSummary) {
        let cutoff = Utc::now() - chrono::Duration::days(self.config.analysis_window_days);
        for campaign in self
            .store
            .list_by_status(org_id, &[CampaignStatus::Completed])
        {
            let recent = matches!(campaign.completed_at, Some(at) if at >= cutoff);
            if !recent || campaign.post_campaign_analysis.is_some() {
                continue;
            }
            let report = self.build_analysis_report(org_id, &campaign);
            let result = self.store.update_campaign(org_id, campaign.id, |c| {
                c.post_campaign_analysis = Some(report.clone());
            });
            match result {
                Ok(_) => {
                    self.audit.record_lifecycle(
                        org_id,
                        campaign.id,
                        "post_analysis",
                        serde_json::json!({ "campaign_name": campaign.name }),
                    );
                    self.audit.record(
                        org_id,
                        None,
                        campaign.id,
                        "post_analysis_generated",
                        serde_json::Value::Null,
                        report,
                        "Post-campaign analysis",
                    );
                    summary.analyzed += 1;
                }
                Err(e) => {
                    warn!(campaign_id = %campaign.id, error = %e, "Post-analysis write failed");
                    summary.errors.push(format!("{}: {e}", campaign.id));
                }
            }
        }
    }

    fn build_analysis_report(&self, org_id: Uuid, campaign: &Campaign) -> serde_json::Value {
        let snapshot = self
            .store
            .snapshot(org_id, campaign.id)
            .unwrap_or_default();
        let analysis = match self.analyzer.analyze(campaign, &snapshot) {
            Ok(a) => a,
            Err(e) => {
                warn!(campaign_id = %campaign.id, error = %e, "Analyzer failed, neutral report");
                autopilot_core::analysis::CampaignAnalysis::neutral(
                    self.config.neutral_score,
                    &snapshot,
                )
            }
        };

        let kpi_names = [
            ("roi", &analysis.kpis.roi),
            ("ctr", &analysis.kpis.ctr),
            ("conversion_rate", &analysis.kpis.conversion_rate),
        ];
        let top_performers: Vec<&str> = kpi_names
            .iter()
            .filter(|(_, k)| matches!(k.status, KpiStatus::Excellent | KpiStatus::Good))
            .map(|(name, _)| *name)
            .collect();
        let improvement_areas: Vec<&str> = kpi_names
            .iter()
            .filter(|(_, k)| k.status == KpiStatus::Poor)
            .map(|(name, _)| *name)
            .collect();
        let future_recommendations: Vec<&Recommendation> =
            analysis.recommendations.iter().take(5).collect();

        serde_json::json!({
            "performance_score": analysis.performance_score,
            "performance_level": performance_level(analysis.performance_score),
            "kpis": analysis.kpis,
            "top_performers": top_performers,
            "improvement_areas": improvement_areas,
            "future_recommendations": future_recommendations,
            "analyzed_at": Utc::now(),
        })
    }

    fn score(&self, campaign: &Campaign) -> f64 {
        let snapshot = self
            .store
            .snapshot(campaign.org_id, campaign.id)
            .unwrap_or_default();
        match self.analyzer.analyze(campaign, &snapshot) {
            Ok(analysis) => analysis.performance_score,
            Err(e) => {
                warn!(
                    campaign_id = %campaign.id,
                    error = %e,
                    "Analyzer failed, using neutral score"
                );
                self.config.neutral_score
            }
        }
    }
}

fn performance_level(score: f64) -> &'static str {
    if score >= 80.0 {
        "excellent"
    } else if score >= 60.0 {
        "good"
    } else if score >= 40.0 {
        "fair"
    } else {
        "poor"
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use autopilot_core::analysis::{FailingAnalyzer, FixedAnalyzer};
    use autopilot_core::types::CampaignMetrics;
    use chrono::Duration;

    fn manager_with(
        store: &Arc<OrgStore>,
        audit: &Arc<AuditLog>,
        analyzer: Arc<dyn CampaignAnalyzer>,
    ) -> LifecycleManager {
        LifecycleManager::new(
            Arc::clone(store),
            Arc::clone(audit),
            analyzer,
            AutomationConfig::default(),
        )
    }

    fn campaign(org_id: Uuid, status: CampaignStatus, budget: f64) -> Campaign {
        let mut c = Campaign::new(org_id, "c", budget);
        c.status = status;
        c
    }

    fn set_spend(store: &OrgStore, id: Uuid, spend: f64) {
        store.set_metrics(
            id,
            CampaignMetrics {
                spend,
                impressions: 1000,
                clicks: 100,
                conversions: 10,
                revenue: 500.0,
            },
        );
    }

    #[test]
    fn test_scheduled_campaign_activates_at_start_date() {
        let store = Arc::new(OrgStore::new());
        let audit = Arc::new(AuditLog::new());
        let org_id = Uuid::new_v4();
        let mut c = campaign(org_id, CampaignStatus::Scheduled, 100.0);
        c.start_date = Utc::now() - Duration::hours(1);
        let id = store.insert_campaign(c);

        let manager = manager_with(&store, &audit, Arc::new(FixedAnalyzer::new(50.0)));
        let summary = manager.process_lifecycle_events(org_id);

        assert_eq!(summary.activated, 1);
        let stored = store.get_campaign(org_id, id).unwrap();
        assert_eq!(stored.status, CampaignStatus::Active);
        assert!(stored.activated_at.is_some());
        assert_eq!(audit.query(org_id, Some("campaign_activated"), 10).len(), 1);
    }

    #[test]
    fn test_future_start_date_stays_scheduled() {
        let store = Arc::new(OrgStore::new());
        let audit = Arc::new(AuditLog::new());
        let org_id = Uuid::new_v4();
        let mut c = campaign(org_id, CampaignStatus::Scheduled, 100.0);
        c.start_date = Utc::now() + Duration::days(3);
        let id = store.insert_campaign(c);

        let summary = manager_with(&store, &audit, Arc::new(FixedAnalyzer::new(50.0)))
            .process_lifecycle_events(org_id);

        assert_eq!(summary.activated, 0);
        assert_eq!(
            store.get_campaign(org_id, id).unwrap().status,
            CampaignStatus::Scheduled
        );
    }

    #[test]
    fn test_exhausted_budget_pauses_campaign() {
        let store = Arc::new(OrgStore::new());
        let audit = Arc::new(AuditLog::new());
        let org_id = Uuid::new_v4();
        let id = store.insert_campaign(campaign(org_id, CampaignStatus::Active, 100.0));
        set_spend(&store, id, 100.0);

        let summary = manager_with(&store, &audit, Arc::new(FixedAnalyzer::new(50.0)))
            .process_lifecycle_events(org_id);

        assert_eq!(summary.paused, 1);
        let stored = store.get_campaign(org_id, id).unwrap();
        assert_eq!(stored.status, CampaignStatus::Paused);
        assert_eq!(stored.paused_reason, Some(PausedReason::BudgetExhausted));
    }

    #[test]
    fn test_exhaustion_takes_precedence_over_poor_performance() {
        // Spend 100% of budget with score < 30: the budget pass runs
        // first, so the recorded reason is BudgetExhausted.
        let store = Arc::new(OrgStore::new());
        let audit = Arc::new(AuditLog::new());
        let org_id = Uuid::new_v4();
        let id = store.insert_campaign(campaign(org_id, CampaignStatus::Active, 100.0));
        set_spend(&store, id, 100.0);

        let analyzer = FixedAnalyzer::new(10.0);
        let summary =
            manager_with(&store, &audit, Arc::new(analyzer)).process_lifecycle_events(org_id);

        assert_eq!(summary.paused, 1);
        assert_eq!(
            store.get_campaign(org_id, id).unwrap().paused_reason,
            Some(PausedReason::BudgetExhausted)
        );
    }

    #[test]
    fn test_high_performer_near_exhaustion_gets_more_budget() {
        let store = Arc::new(OrgStore::new());
        let audit = Arc::new(AuditLog::new());
        let org_id = Uuid::new_v4();
        let id = store.insert_campaign(campaign(org_id, CampaignStatus::Active, 100.0));
        set_spend(&store, id, 85.0);

        let summary = manager_with(&store, &audit, Arc::new(FixedAnalyzer::new(85.0)))
            .process_lifecycle_events(org_id);

        assert_eq!(summary.budget_adjusted, 1);
        let stored = store.get_campaign(org_id, id).unwrap();
        assert_eq!(stored.status, CampaignStatus::Active);
        assert!((stored.budget - 120.0).abs() < 1e-9);
        assert_eq!(audit.query(org_id, Some("budget_increased"), 10).len(), 1);
    }

    #[test]
    fn test_average_performer_near_exhaustion_is_unchanged() {
        let store = Arc::new(OrgStore::new());
        let audit = Arc::new(AuditLog::new());
        let org_id = Uuid::new_v4();
        let id = store.insert_campaign(campaign(org_id, CampaignStatus::Active, 100.0));
        set_spend(&store, id, 85.0);

        let summary = manager_with(&store, &audit, Arc::new(FixedAnalyzer::new(50.0)))
            .process_lifecycle_events(org_id);

        assert_eq!(summary.budget_adjusted, 0);
        assert!((store.get_campaign(org_id, id).unwrap().budget - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_ended_campaign_completes_and_gets_analysis() {
        let store = Arc::new(OrgStore::new());
        let audit = Arc::new(AuditLog::new());
        let org_id = Uuid::new_v4();
        let mut c = campaign(org_id, CampaignStatus::Active, 100.0);
        c.end_date = Some(Utc::now() - Duration::hours(1));
        let id = store.insert_campaign(c);

        let summary = manager_with(&store, &audit, Arc::new(FixedAnalyzer::new(85.0)))
            .process_lifecycle_events(org_id);

        assert_eq!(summary.completed, 1);
        assert_eq!(summary.analyzed, 1);
        let stored = store.get_campaign(org_id, id).unwrap();
        assert_eq!(stored.status, CampaignStatus::Completed);
        assert!(stored.completed_at.is_some());
        let report = stored.post_campaign_analysis.unwrap();
        assert_eq!(report["performance_level"], "excellent");
        assert!((report["performance_score"].as_f64().unwrap() - 85.0).abs() < 1e-9);
    }

    #[test]
    fn test_analysis_not_regenerated() {
        let store = Arc::new(OrgStore::new());
        let audit = Arc::new(AuditLog::new());
        let org_id = Uuid::new_v4();
        let mut c = campaign(org_id, CampaignStatus::Completed, 100.0);
        c.completed_at = Some(Utc::now() - Duration::days(1));
        c.post_campaign_analysis = Some(serde_json::json!({ "performance_level": "fair" }));
        let id = store.insert_campaign(c);

        let summary = manager_with(&store, &audit, Arc::new(FixedAnalyzer::new(85.0)))
            .process_lifecycle_events(org_id);

        assert_eq!(summary.analyzed, 0);
        let stored = store.get_campaign(org_id, id).unwrap();
        assert_eq!(
            stored.post_campaign_analysis.unwrap()["performance_level"],
            "fair"
        );
    }

    #[test]
    fn test_poor_performer_is_paused() {
        let store = Arc::new(OrgStore::new());
        let audit = Arc::new(AuditLog::new());
        let org_id = Uuid::new_v4();
        let id = store.insert_campaign(campaign(org_id, CampaignStatus::Active, 100.0));

        let summary = manager_with(&store, &audit, Arc::new(FixedAnalyzer::new(20.0)))
            .process_lifecycle_events(org_id);

        assert_eq!(summary.paused, 1);
        assert_eq!(
            store.get_campaign(org_id, id).unwrap().paused_reason,
            Some(PausedReason::PoorPerformance)
        );
    }

    #[test]
    fn test_recovered_performance_pause_resumes() {
        let store = Arc::new(OrgStore::new());
        let audit = Arc::new(AuditLog::new());
        let org_id = Uuid::new_v4();
        let mut c = campaign(org_id, CampaignStatus::Paused, 100.0);
        c.paused_reason = Some(PausedReason::PoorPerformance);
        let id = store.insert_campaign(c);

        let summary = manager_with(&store, &audit, Arc::new(FixedAnalyzer::new(70.0)))
            .process_lifecycle_events(org_id);

        assert_eq!(summary.activated, 1);
        let stored = store.get_campaign(org_id, id).unwrap();
        assert_eq!(stored.status, CampaignStatus::Active);
        assert_eq!(stored.paused_reason, None);
        assert_eq!(audit.query(org_id, Some("campaign_resumed"), 10).len(), 1);
    }

    #[test]
    fn test_budget_exhausted_pause_never_auto_resumes() {
        let store = Arc::new(OrgStore::new());
        let audit = Arc::new(AuditLog::new());
        let org_id = Uuid::new_v4();
        let mut c = campaign(org_id, CampaignStatus::Paused, 100.0);
        c.paused_reason = Some(PausedReason::BudgetExhausted);
        let id = store.insert_campaign(c);

        manager_with(&store, &audit, Arc::new(FixedAnalyzer::new(95.0)))
            .process_lifecycle_events(org_id);

        assert_eq!(
            store.get_campaign(org_id, id).unwrap().status,
            CampaignStatus::Paused
        );
    }

    #[test]
    fn test_analyzer_failure_uses_neutral_score() {
        // Neutral 50 is above the pause threshold and below the resume
        // threshold, so a failing analyzer changes nothing.
        let store = Arc::new(OrgStore::new());
        let audit = Arc::new(AuditLog::new());
        let org_id = Uuid::new_v4();
        let id = store.insert_campaign(campaign(org_id, CampaignStatus::Active, 100.0));

        let summary =
            manager_with(&store, &audit, Arc::new(FailingAnalyzer)).process_lifecycle_events(org_id);

        assert_eq!(summary.paused, 0);
        assert_eq!(
            store.get_campaign(org_id, id).unwrap().status,
            CampaignStatus::Active
        );
    }

    #[test]
    fn test_one_failure_does_not_stop_the_batch() {
        let store = Arc::new(OrgStore::new());
        let audit = Arc::new(AuditLog::new());
        let org_id = Uuid::new_v4();
        let mut a = campaign(org_id, CampaignStatus::Scheduled, 100.0);
        a.start_date = Utc::now() - Duration::hours(1);
        let mut b = campaign(org_id, CampaignStatus::Scheduled, 100.0);
        b.start_date = Utc::now() - Duration::hours(1);
        let id_a = store.insert_campaign(a);
        let id_b = store.insert_campaign(b);
        store.fail_next_write(id_a);

        let summary = manager_with(&store, &audit, Arc::new(FixedAnalyzer::new(50.0)))
            .process_lifecycle_events(org_id);

        assert_eq!(summary.activated, 1);
        assert_eq!(summary.errors.len(), 1);
        assert_eq!(
            store.get_campaign(org_id, id_b).unwrap().status,
            CampaignStatus::Active
        );
    }

    #[test]
    fn test_lifecycle_statistics_counts_events() {
        let store = Arc::new(OrgStore::new());
        let audit = Arc::new(AuditLog::new());
        let org_id = Uuid::new_v4();
        let mut c = campaign(org_id, CampaignStatus::Scheduled, 100.0);
        c.start_date = Utc::now() - Duration::hours(1);
        store.insert_campaign(c);

        let manager = manager_with(&store, &audit, Arc::new(FixedAnalyzer::new(50.0)));
        manager.process_lifecycle_events(org_id);

        let stats = manager.lifecycle_statistics(org_id, 7);
        assert_eq!(stats.events.get("activated"), Some(&1));
        assert_eq!(stats.total_events, 1);
    }
}
