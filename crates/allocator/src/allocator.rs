use std::sync::Arc;

use autopilot_core::analysis::{CampaignAnalyzer, Forecaster};
use autopilot_core::types::{
    AllocationItem, AllocationStrategy, BudgetChange, Campaign, CampaignStatus, MetricsSnapshot,
};
use autopilot_core::{AutomationConfig, AutopilotError, AutopilotResult};
use autopilot_store::{AllocationRecord, AuditLog, OrgStore};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

/// Outcome of a persisted reallocation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReallocationReport {
    pub strategy: AllocationStrategy,
    pub total_budget: f64,
    pub campaigns_updated: usize,
    /// Every campaign's computed row, including sub-threshold changes
    /// that were not persisted.
    pub allocation: Vec<AllocationItem>,
    /// Only the changes that were actually written.
    pub changes: Vec<BudgetChange>,
    pub errors: Vec<String>,
}

/// Outcome of a preview run: same computation, nothing persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    pub strategy: AllocationStrategy,
    pub total_budget: f64,
    pub allocation: Vec<AllocationItem>,
}

/// Per-campaign inputs gathered once per run from the analyzer and
/// forecaster collaborators.
struct CampaignDatum {
    campaign_id: Uuid,
    name: String,
    current_budget: f64,
    performance_score: f64,
    roi: f64,
    predicted_roi: f64,
}

/// Reallocates an org's total budget across its active and scheduled
/// campaigns.
pub struct BudgetAllocator {
    store: Arc<OrgStore>,
    audit: Arc<AuditLog>,
    analyzer: Arc<dyn CampaignAnalyzer>,
    forecaster: Arc<dyn Forecaster>,
    config: AutomationConfig,
}

impl BudgetAllocator {
    pub fn new(
        store: Arc<OrgStore>,
        audit: Arc<AuditLog>,
        analyzer: Arc<dyn CampaignAnalyzer>,
        forecaster: Arc<dyn Forecaster>,
        config: AutomationConfig,
    ) -> Self {
        Self {
            store,
            audit,
            analyzer,
            forecaster,
            config,
        }
    }

    /// Compute and persist a reallocation. Sub-1% changes are computed
    /// but skipped at the persistence step.
    pub fn reallocate(
        &self,
        org_id: Uuid,
        total_budget: f64,
        strategy: AllocationStrategy,
    ) -> AutopilotResult<ReallocationReport> {
        let data = self.gather(org_id)?;
        let allocation = self.calculate(data, total_budget, strategy);
        let (changes, errors) = self.apply(org_id, &allocation);

        info!(
            org_id = %org_id,
            ?strategy,
            total_budget,
            updated = changes.len(),
            "Budget reallocation complete"
        );

        Ok(ReallocationReport {
            strategy,
            total_budget,
            campaigns_updated: changes.len(),
            allocation,
            changes,
            errors,
        })
    }

    /// Preview a reallocation without writing anything.
    pub fn simulate(
        &self,
        org_id: Uuid,
        total_budget: f64,
        strategy: AllocationStrategy,
    ) -> AutopilotResult<SimulationReport> {
        let data = self.gather(org_id)?;
        let allocation = self.calculate(data, total_budget, strategy);
        Ok(SimulationReport {
            strategy,
            total_budget,
            allocation,
        })
    }

    /// Recent allocation history for the org, newest first.
    pub fn history(&self, org_id: Uuid, limit: Option<usize>) -> Vec<AllocationRecord> {
        self.audit
            .allocation_history(org_id, limit.unwrap_or(self.config.history_limit))
    }

    // ─── Data gathering ────────────────────────────────────────────────

    /// Analyze every active/scheduled campaign. Collaborator failures
    /// degrade to the neutral score / zero predicted ROI so one flaky
    /// dependency never blocks a reallocation.
    fn gather(&self, org_id: Uuid) -> AutopilotResult<Vec<CampaignDatum>> {
        let campaigns = self
            .store
            .list_by_status(org_id, &[CampaignStatus::Active, CampaignStatus::Scheduled]);
        if campaigns.is_empty() {
            return Err(AutopilotError::NoActiveCampaigns(org_id));
        }

        let mut data = Vec::with_capacity(campaigns.len());
        for campaign in &campaigns {
            let snapshot = self
                .store
                .snapshot(org_id, campaign.id)
                .unwrap_or_default();
            let (score, roi) = self.analyze_or_neutral(campaign, &snapshot);
            let predicted_roi = self.predicted_roi(campaign);
            data.push(CampaignDatum {
                campaign_id: campaign.id,
                name: campaign.name.clone(),
                current_budget: campaign.budget,
                performance_score: score,
                roi,
                predicted_roi,
            });
        }
        Ok(data)
    }

    fn analyze_or_neutral(&self, campaign: &Campaign, snapshot: &MetricsSnapshot) -> (f64, f64) {
        match self.analyzer.analyze(campaign, snapshot) {
            Ok(analysis) => (analysis.performance_score, analysis.kpis.roi.value),
            Err(e) => {
                warn!(
                    campaign_id = %campaign.id,
                    error = %e,
                    "Analyzer failed, using neutral score"
                );
                (self.config.neutral_score, 0.0)
            }
        }
    }

    fn predicted_roi(&self, campaign: &Campaign) -> f64 {
        match self
            .forecaster
            .forecast(campaign, self.config.forecast_horizon_days)
        {
            Ok(forecast) => forecast.predictions.predicted_roi,
            Err(e) => {
                warn!(
                    campaign_id = %campaign.id,
                    error = %e,
                    "Forecaster failed, using 0.0 predicted ROI"
                );
                0.0
            }
        }
    }

    // ─── Strategy arithmetic ───────────────────────────────────────────

    fn calculate(
        &self,
        data: Vec<CampaignDatum>,
        total_budget: f64,
        strategy: AllocationStrategy,
    ) -> Vec<AllocationItem> {
        match strategy {
            AllocationStrategy::RoiMaximization => self.allocate_by_roi(data, total_budget),
            AllocationStrategy::EqualDistribution => Self::allocate_equally(data, total_budget),
            AllocationStrategy::PerformanceWeighted => {
                self.allocate_by_performance(data, total_budget)
            }
            AllocationStrategy::Predictive => self.allocate_by_prediction(data, total_budget),
        }
    }

    /// Equal split across all campaigns. Deliberately applies neither the
    /// minimum-budget floor nor the shift band; this asymmetry with the
    /// weighted strategies matches the long-standing behavior callers
    /// observe, so it stays until product says otherwise.
    fn allocate_equally(data: Vec<CampaignDatum>, total_budget: f64) -> Vec<AllocationItem> {
        let per_campaign = total_budget / data.len() as f64;
        data.into_iter()
            .map(|datum| make_item(&datum, round2(per_campaign), "Equal distribution", None))
            .collect()
    }

    /// Weight by performance score; falls back to equal distribution when
    /// there is no positive score mass.
    fn allocate_by_performance(
        &self,
        data: Vec<CampaignDatum>,
        total_budget: f64,
    ) -> Vec<AllocationItem> {
        let total_score: f64 = data.iter().map(|d| d.performance_score).sum();
        if total_score <= 0.0 {
            return Self::allocate_equally(data, total_budget);
        }

        let mut allocation: Vec<AllocationItem> = data
            .iter()
            .map(|datum| {
                let proposed = self.constrain(
                    total_budget * datum.performance_score / total_score,
                    datum.current_budget,
                );
                make_item(
                    datum,
                    proposed,
                    "Performance-weighted allocation",
                    Some(datum.performance_score),
                )
            })
            .collect();
        distribute_remaining(&mut allocation, total_budget);
        allocation
    }

    /// Weight by measured ROI, iterating highest-ROI campaigns first
    /// (the order is observable in the result rows, not the math).
    fn allocate_by_roi(&self, mut data: Vec<CampaignDatum>, total_budget: f64) -> Vec<AllocationItem> {
        let total_roi: f64 = data.iter().map(|d| d.roi).sum();
        if total_roi <= 0.0 {
            return Self::allocate_equally(data, total_budget);
        }

        data.sort_by(|a, b| {
            b.roi
                .partial_cmp(&a.roi)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut allocation: Vec<AllocationItem> = data
            .iter()
            .map(|datum| {
                let proposed =
                    self.constrain(total_budget * datum.roi / total_roi, datum.current_budget);
                make_item(datum, proposed, "ROI-based allocation", Some(datum.roi))
            })
            .collect();
        distribute_remaining(&mut allocation, total_budget);
        allocation
    }

    /// Weight by 7-day forecast ROI; falls back to performance weighting
    /// when the forecast has no positive mass.
    fn allocate_by_prediction(
        &self,
        data: Vec<CampaignDatum>,
        total_budget: f64,
    ) -> Vec<AllocationItem> {
        let total_predicted: f64 = data.iter().map(|d| d.predicted_roi).sum();
        if total_predicted <= 0.0 {
            return self.allocate_by_performance(data, total_budget);
        }

        let mut allocation: Vec<AllocationItem> = data
            .iter()
            .map(|datum| {
                let proposed = self.constrain(
                    total_budget * datum.predicted_roi / total_predicted,
                    datum.current_budget,
                );
                make_item(
                    datum,
                    proposed,
                    "Predictive analytics-based allocation",
                    Some(datum.predicted_roi),
                )
            })
            .collect();
        distribute_remaining(&mut allocation, total_budget);
        allocation
    }

    /// Minimum-budget floor, then the +/-30% band around the current
    /// budget (skipped for campaigns starting from zero).
    fn constrain(&self, proposed: f64, current_budget: f64) -> f64 {
        let mut budget = proposed.max(self.config.min_campaign_budget);
        if current_budget > 0.0 {
            let max_shift = current_budget * (1.0 + self.config.max_budget_shift_pct / 100.0);
            let min_shift = current_budget * (1.0 - self.config.max_budget_shift_pct / 100.0);
            budget = budget.clamp(min_shift, max_shift);
        }
        round2(budget)
    }

    // ─── Persistence ───────────────────────────────────────────────────

    /// Write each allocation whose change exceeds 1% of the old budget.
    /// Sub-threshold rows are skipped silently (they stay visible in the
    /// computed allocation). One campaign's write failure is logged and
    /// the loop proceeds.
    fn apply(&self, org_id: Uuid, allocation: &[AllocationItem]) -> (Vec<BudgetChange>, Vec<String>) {
        let mut changes = Vec::new();
        let mut errors = Vec::new();

        for item in allocation {
            let campaign = match self.store.get_campaign(org_id, item.campaign_id) {
                Some(c) => c,
                None => {
                    warn!(
                        campaign_id = %item.campaign_id,
                        "Campaign not found during budget allocation"
                    );
                    continue;
                }
            };

            let old_budget = campaign.budget;
            let new_budget = item.new_budget;
            if (new_budget - old_budget).abs() / old_budget.max(1.0) <= self.config.apply_threshold
            {
                continue;
            }

            match self
                .store
                .update_campaign(org_id, item.campaign_id, |c| c.budget = new_budget)
            {
                Ok(_) => {
                    self.audit.record_allocation(
                        org_id,
                        item.campaign_id,
                        &item.campaign_name,
                        old_budget,
                        new_budget,
                        &item.reason,
                    );
                    self.audit.record(
                        org_id,
                        None,
                        item.campaign_id,
                        "budget_reallocated",
                        serde_json::json!(old_budget),
                        serde_json::json!(new_budget),
                        &item.reason,
                    );
                    let change_amount = new_budget - old_budget;
                    changes.push(BudgetChange {
                        campaign_id: item.campaign_id,
                        campaign_name: item.campaign_name.clone(),
                        old_budget,
                        new_budget,
                        change_amount,
                        change_percentage: if old_budget > 0.0 {
                            round2(change_amount / old_budget * 100.0)
                        } else {
                            0.0
                        },
                    });
                }
                Err(e) => {
                    warn!(
                        campaign_id = %item.campaign_id,
                        error = %e,
                        "Failed to apply budget allocation, continuing"
                    );
                    errors.push(format!("{}: {e}", item.campaign_id));
                }
            }
        }

        (changes, errors)
    }
}

/// Redistribute leftover budget (clamps can leave some unallocated)
/// proportionally to each row's already-allocated share. This second
/// pass may push a row back outside the shift band; that is observable
/// behavior callers depend on, so it is preserved rather than
/// re-clamped.
fn distribute_remaining(allocation: &mut [AllocationItem], total_budget: f64) {
    let allocated: f64 = allocation.iter().map(|i| i.new_budget).sum();
    let remaining = total_budget - allocated;
    if remaining <= 0.0 || allocated <= 0.0 {
        return;
    }

    for item in allocation.iter_mut() {
        let proportion = item.new_budget / allocated;
        item.new_budget += remaining * proportion;
        item.change_amount = item.new_budget - item.current_budget;
        item.change_percentage = if item.current_budget > 0.0 {
            round2(item.change_amount / item.current_budget * 100.0)
        } else {
            0.0
        };
    }
}

fn make_item(
    datum: &CampaignDatum,
    new_budget: f64,
    reason: &str,
    weight_source: Option<f64>,
) -> AllocationItem {
    let change_amount = round2(new_budget - datum.current_budget);
    AllocationItem {
        campaign_id: datum.campaign_id,
        campaign_name: datum.name.clone(),
        current_budget: datum.current_budget,
        new_budget,
        change_amount,
        change_percentage: if datum.current_budget > 0.0 {
            round2(change_amount / datum.current_budget * 100.0)
        } else {
            0.0
        },
        reason: reason.to_string(),
        weight_source,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use autopilot_core::analysis::{FailingAnalyzer, FixedAnalyzer, FixedForecaster};

    struct Fixture {
        store: Arc<OrgStore>,
        audit: Arc<AuditLog>,
        org_id: Uuid,
        campaign_ids: Vec<Uuid>,
    }

    /// Three active campaigns with budgets [100, 200, 300].
    fn three_campaigns() -> Fixture {
        let store = Arc::new(OrgStore::new());
        let org_id = Uuid::new_v4();
        let campaign_ids = [100.0, 200.0, 300.0]
            .iter()
            .enumerate()
            .map(|(i, budget)| {
                let mut c = Campaign::new(org_id, format!("camp-{i}"), *budget);
                c.status = CampaignStatus::Active;
                store.insert_campaign(c)
            })
            .collect();
        Fixture {
            store,
            audit: Arc::new(AuditLog::new()),
            org_id,
            campaign_ids,
        }
    }

    fn allocator_with(
        fixture: &Fixture,
        analyzer: Arc<dyn CampaignAnalyzer>,
        forecaster: Arc<dyn Forecaster>,
    ) -> BudgetAllocator {
        BudgetAllocator::new(
            Arc::clone(&fixture.store),
            Arc::clone(&fixture.audit),
            analyzer,
            forecaster,
            AutomationConfig::default(),
        )
    }

    fn scored_analyzer(fixture: &Fixture, scores: [f64; 3]) -> Arc<dyn CampaignAnalyzer> {
        let mut analyzer = FixedAnalyzer::new(50.0);
        for (id, score) in fixture.campaign_ids.iter().zip(scores) {
            analyzer = analyzer.with_score(*id, score);
        }
        Arc::new(analyzer)
    }

    #[test]
    fn test_performance_weighted_scenario() {
        // Budgets [100,200,300], scores [50,30,20], total 600:
        // weights .5/.3/.2 -> proposed [300,180,120]
        // clamp to bands [70..130],[140..260],[210..390] -> [130,180,210]
        // leftover 80 redistributed by share -> sum back to 600.
        let fixture = three_campaigns();
        let allocator = allocator_with(
            &fixture,
            scored_analyzer(&fixture, [50.0, 30.0, 20.0]),
            Arc::new(FixedForecaster::new(0.0)),
        );

        let report = allocator
            .simulate(fixture.org_id, 600.0, AllocationStrategy::PerformanceWeighted)
            .unwrap();
        let total: f64 = report.allocation.iter().map(|i| i.new_budget).sum();
        assert!((total - 600.0).abs() < 1e-6);

        let first = report
            .allocation
            .iter()
            .find(|i| i.campaign_id == fixture.campaign_ids[0])
            .unwrap();
        // 130 + 80 * (130/520) = 150: redistribution pushed it past the
        // 130 band ceiling, which is the preserved behavior.
        assert!((first.new_budget - 150.0).abs() < 1e-6);
    }

    #[test]
    fn test_equal_distribution_applies_no_clamp() {
        let fixture = three_campaigns();
        let allocator = allocator_with(
            &fixture,
            scored_analyzer(&fixture, [50.0, 30.0, 20.0]),
            Arc::new(FixedForecaster::new(0.0)),
        );

        let report = allocator
            .simulate(fixture.org_id, 3000.0, AllocationStrategy::EqualDistribution)
            .unwrap();
        for item in &report.allocation {
            // 1000 each, far outside every band, so no clamping.
            assert!((item.new_budget - 1000.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_weighted_items_respect_band_when_no_leftover() {
        // Scores proportional to budgets -> proposals equal current
        // budgets, nothing clamped, no leftover.
        let fixture = three_campaigns();
        let allocator = allocator_with(
            &fixture,
            scored_analyzer(&fixture, [10.0, 20.0, 30.0]),
            Arc::new(FixedForecaster::new(0.0)),
        );

        let report = allocator
            .simulate(fixture.org_id, 600.0, AllocationStrategy::PerformanceWeighted)
            .unwrap();
        for item in &report.allocation {
            let low = item.current_budget * 0.7;
            let high = item.current_budget * 1.3;
            assert!(item.new_budget >= low - 1e-9 && item.new_budget <= high + 1e-9);
            assert!(item.new_budget >= 10.0);
        }
        let total: f64 = report.allocation.iter().map(|i| i.new_budget).sum();
        assert!((total - 600.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_scores_fall_back_to_equal() {
        let fixture = three_campaigns();
        let allocator = allocator_with(
            &fixture,
            scored_analyzer(&fixture, [0.0, 0.0, 0.0]),
            Arc::new(FixedForecaster::new(0.0)),
        );

        let report = allocator
            .simulate(fixture.org_id, 600.0, AllocationStrategy::PerformanceWeighted)
            .unwrap();
        for item in &report.allocation {
            assert!((item.new_budget - 200.0).abs() < 1e-9);
            assert_eq!(item.reason, "Equal distribution");
        }
    }

    #[test]
    fn test_roi_strategy_orders_results_by_roi_desc() {
        let fixture = three_campaigns();
        let mut analyzer = FixedAnalyzer::new(50.0);
        let rois = [1.0, 3.0, 2.0];
        for (id, roi) in fixture.campaign_ids.iter().zip(rois) {
            analyzer = analyzer.with_roi(*id, roi);
        }
        let allocator = allocator_with(
            &fixture,
            Arc::new(analyzer),
            Arc::new(FixedForecaster::new(0.0)),
        );

        let report = allocator
            .simulate(fixture.org_id, 600.0, AllocationStrategy::RoiMaximization)
            .unwrap();
        assert_eq!(report.allocation[0].campaign_id, fixture.campaign_ids[1]);
        assert_eq!(report.allocation[1].campaign_id, fixture.campaign_ids[2]);
        assert_eq!(report.allocation[2].campaign_id, fixture.campaign_ids[0]);
        assert_eq!(report.allocation[0].reason, "ROI-based allocation");
    }

    #[test]
    fn test_predictive_falls_back_to_performance() {
        let fixture = three_campaigns();
        let allocator = allocator_with(
            &fixture,
            scored_analyzer(&fixture, [50.0, 30.0, 20.0]),
            Arc::new(FixedForecaster::new(0.0)), // no positive forecast mass
        );

        let report = allocator
            .simulate(fixture.org_id, 600.0, AllocationStrategy::Predictive)
            .unwrap();
        assert_eq!(
            report.allocation[0].reason,
            "Performance-weighted allocation"
        );
    }

    #[test]
    fn test_predictive_uses_forecast_weights() {
        let fixture = three_campaigns();
        let forecaster = FixedForecaster::new(0.0)
            .with_prediction(fixture.campaign_ids[0], 2.0)
            .with_prediction(fixture.campaign_ids[1], 1.0)
            .with_prediction(fixture.campaign_ids[2], 1.0);
        let allocator = allocator_with(
            &fixture,
            scored_analyzer(&fixture, [50.0, 30.0, 20.0]),
            Arc::new(forecaster),
        );

        let report = allocator
            .simulate(fixture.org_id, 600.0, AllocationStrategy::Predictive)
            .unwrap();
        assert!(report
            .allocation
            .iter()
            .all(|i| i.reason == "Predictive analytics-based allocation"));
    }

    #[test]
    fn test_analyzer_failure_degrades_to_neutral() {
        let fixture = three_campaigns();
        let allocator = allocator_with(
            &fixture,
            Arc::new(FailingAnalyzer),
            Arc::new(FixedForecaster::new(0.0)),
        );

        // All campaigns get the neutral 50 -> equal weights -> proposals
        // of 200 each, clamped per campaign band.
        let report = allocator
            .simulate(fixture.org_id, 600.0, AllocationStrategy::PerformanceWeighted)
            .unwrap();
        assert_eq!(report.allocation.len(), 3);
        let total: f64 = report.allocation.iter().map(|i| i.new_budget).sum();
        assert!((total - 600.0).abs() < 1e-6);
    }

    #[test]
    fn test_reallocate_persists_and_audits() {
        let fixture = three_campaigns();
        let allocator = allocator_with(
            &fixture,
            scored_analyzer(&fixture, [50.0, 30.0, 20.0]),
            Arc::new(FixedForecaster::new(0.0)),
        );

        let report = allocator
            .reallocate(fixture.org_id, 600.0, AllocationStrategy::PerformanceWeighted)
            .unwrap();
        assert_eq!(report.campaigns_updated, report.changes.len());
        assert!(report.campaigns_updated > 0);

        // Budgets now match the computed allocation.
        for change in &report.changes {
            let campaign = fixture
                .store
                .get_campaign(fixture.org_id, change.campaign_id)
                .unwrap();
            assert!((campaign.budget - change.new_budget).abs() < 1e-9);
        }
        assert_eq!(
            allocator.history(fixture.org_id, None).len(),
            report.changes.len()
        );
    }

    #[test]
    fn test_sub_one_percent_change_not_persisted() {
        let store = Arc::new(OrgStore::new());
        let org_id = Uuid::new_v4();
        for name in ["a", "b"] {
            let mut c = Campaign::new(org_id, name, 100.0);
            c.status = CampaignStatus::Active;
            store.insert_campaign(c);
        }
        let fixture = Fixture {
            store,
            audit: Arc::new(AuditLog::new()),
            org_id,
            campaign_ids: Vec::new(),
        };
        let allocator = allocator_with(
            &fixture,
            Arc::new(FixedAnalyzer::new(50.0)),
            Arc::new(FixedForecaster::new(0.0)),
        );

        // Equal split of 201 over two campaigns of 100 -> 100.5 each,
        // a 0.5% change: computed but below the apply threshold.
        let report = allocator
            .reallocate(fixture.org_id, 201.0, AllocationStrategy::EqualDistribution)
            .unwrap();
        assert_eq!(report.allocation.len(), 2);
        assert!(report.changes.is_empty());
        assert_eq!(report.campaigns_updated, 0);
        assert!(allocator.history(fixture.org_id, None).is_empty());
        for c in fixture.store.list_campaigns(fixture.org_id) {
            assert!((c.budget - 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_simulate_does_not_persist() {
        let fixture = three_campaigns();
        let allocator = allocator_with(
            &fixture,
            scored_analyzer(&fixture, [50.0, 30.0, 20.0]),
            Arc::new(FixedForecaster::new(0.0)),
        );

        allocator
            .simulate(fixture.org_id, 600.0, AllocationStrategy::PerformanceWeighted)
            .unwrap();
        let budgets: Vec<f64> = fixture
            .store
            .list_campaigns(fixture.org_id)
            .iter()
            .map(|c| c.budget)
            .collect();
        assert_eq!(budgets, vec![100.0, 200.0, 300.0]);
        assert!(allocator.history(fixture.org_id, None).is_empty());
    }

    #[test]
    fn test_no_active_campaigns_is_an_error() {
        let fixture = Fixture {
            store: Arc::new(OrgStore::new()),
            audit: Arc::new(AuditLog::new()),
            org_id: Uuid::new_v4(),
            campaign_ids: Vec::new(),
        };
        let allocator = allocator_with(
            &fixture,
            Arc::new(FixedAnalyzer::new(50.0)),
            Arc::new(FixedForecaster::new(0.0)),
        );

        let err = allocator
            .reallocate(fixture.org_id, 600.0, AllocationStrategy::PerformanceWeighted)
            .unwrap_err();
        assert!(matches!(err, AutopilotError::NoActiveCampaigns(_)));
    }

    #[test]
    fn test_write_failure_is_collected_not_fatal() {
        let fixture = three_campaigns();
        let allocator = allocator_with(
            &fixture,
            scored_analyzer(&fixture, [50.0, 30.0, 20.0]),
            Arc::new(FixedForecaster::new(0.0)),
        );
        fixture.store.fail_next_write(fixture.campaign_ids[0]);

        let report = allocator
            .reallocate(fixture.org_id, 600.0, AllocationStrategy::PerformanceWeighted)
            .unwrap();
        assert_eq!(report.errors.len(), 1);
        // The other campaigns were still updated.
        assert!(!report.changes.is_empty());
    }
}
