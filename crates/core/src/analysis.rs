//! Collaborator seams for AI campaign analysis and predictive forecasting.
//!
//! Engines accept `Arc<dyn CampaignAnalyzer>` / `Arc<dyn Forecaster>`;
//! production wires real clients, tests wire the fixed/failing doubles
//! below. Collaborator failures never abort a batch; call sites fall
//! back to a neutral score (50) or zero predicted ROI.

use crate::types::{Campaign, MetricsSnapshot};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// How a KPI compares to its benchmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KpiStatus {
    Excellent,
    Good,
    Fair,
    Poor,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KpiReading {
    pub value: f64,
    pub status: KpiStatus,
    pub benchmark: f64,
}

impl KpiReading {
    pub fn fair(value: f64) -> Self {
        Self {
            value,
            status: KpiStatus::Fair,
            benchmark: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KpiSet {
    pub roi: KpiReading,
    pub ctr: KpiReading,
    pub conversion_rate: KpiReading,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationPriority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub action: String,
    pub priority: RecommendationPriority,
    pub reason: String,
}

/// Output of the AI campaign analysis collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignAnalysis {
    /// Composite 0..100 score.
    pub performance_score: f64,
    pub kpis: KpiSet,
    pub recommendations: Vec<Recommendation>,
    pub budget_optimization: serde_json::Value,
}

impl CampaignAnalysis {
    /// The fallback analysis used when the collaborator fails.
    pub fn neutral(score: f64, metrics: &MetricsSnapshot) -> Self {
        Self {
            performance_score: score,
            kpis: KpiSet {
                roi: KpiReading::fair(metrics.get("roas").unwrap_or(0.0)),
                ctr: KpiReading::fair(metrics.get("ctr").unwrap_or(0.0)),
                conversion_rate: KpiReading::fair(
                    metrics.get("conversion_rate").unwrap_or(0.0),
                ),
            },
            recommendations: Vec::new(),
            budget_optimization: serde_json::json!({}),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastPredictions {
    pub predicted_roi: f64,
}

/// Output of the predictive analytics collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Forecast {
    pub predictions: ForecastPredictions,
}

/// AI campaign optimization collaborator.
pub trait CampaignAnalyzer: Send + Sync {
    fn analyze(
        &self,
        campaign: &Campaign,
        metrics: &MetricsSnapshot,
    ) -> anyhow::Result<CampaignAnalysis>;
}

/// Predictive analytics collaborator.
pub trait Forecaster: Send + Sync {
    fn forecast(&self, campaign: &Campaign, horizon_days: u32) -> anyhow::Result<Forecast>;
}

/// Analyzer that always returns the neutral score.
pub struct NeutralAnalyzer {
    pub score: f64,
}

impl CampaignAnalyzer for NeutralAnalyzer {
    fn analyze(
        &self,
        _campaign: &Campaign,
        metrics: &MetricsSnapshot,
    ) -> anyhow::Result<CampaignAnalysis> {
        Ok(CampaignAnalysis::neutral(self.score, metrics))
    }
}

/// Analyzer with preset per-campaign scores and ROI readings.
#[derive(Default)]
pub struct FixedAnalyzer {
    scores: HashMap<Uuid, f64>,
    rois: HashMap<Uuid, f64>,
    pub default_score: f64,
}

impl FixedAnalyzer {
    pub fn new(default_score: f64) -> Self {
        Self {
            scores: HashMap::new(),
            rois: HashMap::new(),
            default_score,
        }
    }

    pub fn with_score(mut self, campaign_id: Uuid, score: f64) -> Self {
        self.scores.insert(campaign_id, score);
        self
    }

    pub fn with_roi(mut self, campaign_id: Uuid, roi: f64) -> Self {
        self.rois.insert(campaign_id, roi);
        self
    }
}

impl CampaignAnalyzer for FixedAnalyzer {
    fn analyze(
        &self,
        campaign: &Campaign,
        metrics: &MetricsSnapshot,
    ) -> anyhow::Result<CampaignAnalysis> {
        let score = self
            .scores
            .get(&campaign.id)
            .copied()
            .unwrap_or(self.default_score);
        let mut analysis = CampaignAnalysis::neutral(score, metrics);
        if let Some(roi) = self.rois.get(&campaign.id) {
            analysis.kpis.roi = KpiReading::fair(*roi);
        }
        Ok(analysis)
    }
}

/// Analyzer that always fails, for exercising the fallback path.
pub struct FailingAnalyzer;

impl CampaignAnalyzer for FailingAnalyzer {
    fn analyze(
        &self,
        _campaign: &Campaign,
        _metrics: &MetricsSnapshot,
    ) -> anyhow::Result<CampaignAnalysis> {
        anyhow::bail!("analysis service unavailable")
    }
}

/// Forecaster with preset per-campaign predicted ROI.
#[derive(Default)]
pub struct FixedForecaster {
    predictions: HashMap<Uuid, f64>,
    pub default_roi: f64,
}

impl FixedForecaster {
    pub fn new(default_roi: f64) -> Self {
        Self {
            predictions: HashMap::new(),
            default_roi,
        }
    }

    pub fn with_prediction(mut self, campaign_id: Uuid, roi: f64) -> Self {
        self.predictions.insert(campaign_id, roi);
        self
    }
}

impl Forecaster for FixedForecaster {
    fn forecast(&self, campaign: &Campaign, _horizon_days: u32) -> anyhow::Result<Forecast> {
        let roi = self
            .predictions
            .get(&campaign.id)
            .copied()
            .unwrap_or(self.default_roi);
        Ok(Forecast {
            predictions: ForecastPredictions { predicted_roi: roi },
        })
    }
}

/// Forecaster that always fails.
pub struct FailingForecaster;

impl Forecaster for FailingForecaster {
    fn forecast(&self, _campaign: &Campaign, _horizon_days: u32) -> anyhow::Result<Forecast> {
        anyhow::bail!("forecast service unavailable")
    }
}

/// Convenience: a neutral analyzer behind the trait object.
pub fn neutral_analyzer(score: f64) -> Arc<dyn CampaignAnalyzer> {
    Arc::new(NeutralAnalyzer { score })
}

/// Convenience: a zero forecaster behind the trait object.
pub fn zero_forecaster() -> Arc<dyn Forecaster> {
    Arc::new(FixedForecaster::new(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_analyzer_per_campaign_scores() {
        let org = Uuid::new_v4();
        let a = Campaign::new(org, "A", 100.0);
        let b = Campaign::new(org, "B", 100.0);
        let analyzer = FixedAnalyzer::new(50.0).with_score(a.id, 90.0);
        let snap = MetricsSnapshot::default();

        assert!((analyzer.analyze(&a, &snap).unwrap().performance_score - 90.0).abs() < 1e-9);
        assert!((analyzer.analyze(&b, &snap).unwrap().performance_score - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_failing_analyzer_errors() {
        let org = Uuid::new_v4();
        let c = Campaign::new(org, "C", 100.0);
        assert!(FailingAnalyzer
            .analyze(&c, &MetricsSnapshot::default())
            .is_err());
    }
}
