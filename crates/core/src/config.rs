use serde::Deserialize;

/// Automation thresholds and constraints. Loaded from environment
/// variables with the prefix `AUTOPILOT__`; every field has a default so
/// the engine runs unconfigured.
#[derive(Debug, Clone, Deserialize)]
pub struct AutomationConfig {
    /// Floor applied to every allocated or adjusted budget.
    #[serde(default = "default_min_campaign_budget")]
    pub min_campaign_budget: f64,
    /// Budget changes are clamped to within +/- this percentage of the
    /// current budget (when the current budget is non-zero).
    #[serde(default = "default_max_budget_shift_pct")]
    pub max_budget_shift_pct: f64,
    /// Allocation changes below this fraction of the old budget are
    /// computed but not persisted.
    #[serde(default = "default_apply_threshold")]
    pub apply_threshold: f64,
    /// Spend/budget percentage at which a campaign is paused.
    #[serde(default = "default_exhaustion_pct")]
    pub exhaustion_pct: f64,
    /// Spend/budget percentage at which the auto-increase check runs.
    #[serde(default = "default_warning_pct")]
    pub warning_pct: f64,
    /// Multiplier applied when a high performer nears budget exhaustion.
    #[serde(default = "default_budget_increase_factor")]
    pub budget_increase_factor: f64,
    /// Minimum performance score for the auto-increase.
    #[serde(default = "default_budget_increase_score")]
    pub budget_increase_score: f64,
    /// Performance score below which an active campaign is auto-paused.
    #[serde(default = "default_auto_pause_score")]
    pub auto_pause_score: f64,
    /// Performance score at which a poor-performance pause is reversed.
    #[serde(default = "default_auto_resume_score")]
    pub auto_resume_score: f64,
    /// Score assumed when the analyzer collaborator fails.
    #[serde(default = "default_neutral_score")]
    pub neutral_score: f64,
    /// Horizon passed to the forecaster for predicted ROI.
    #[serde(default = "default_forecast_horizon_days")]
    pub forecast_horizon_days: u32,
    /// Default limit for history queries.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    /// Completed campaigns get a post-campaign analysis for this many days.
    #[serde(default = "default_analysis_window_days")]
    pub analysis_window_days: i64,
}

impl AutomationConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder().add_source(
            config::Environment::with_prefix("AUTOPILOT")
                .separator("__")
                .try_parsing(true),
        );
        builder.build()?.try_deserialize()
    }
}

impl Default for AutomationConfig {
    fn default() -> Self {
        Self {
            min_campaign_budget: default_min_campaign_budget(),
            max_budget_shift_pct: default_max_budget_shift_pct(),
            apply_threshold: default_apply_threshold(),
            exhaustion_pct: default_exhaustion_pct(),
            warning_pct: default_warning_pct(),
            budget_increase_factor: default_budget_increase_factor(),
            budget_increase_score: default_budget_increase_score(),
            auto_pause_score: default_auto_pause_score(),
            auto_resume_score: default_auto_resume_score(),
            neutral_score: default_neutral_score(),
            forecast_horizon_days: default_forecast_horizon_days(),
            history_limit: default_history_limit(),
            analysis_window_days: default_analysis_window_days(),
        }
    }
}

fn default_min_campaign_budget() -> f64 {
    10.0
}
fn default_max_budget_shift_pct() -> f64 {
    30.0
}
fn default_apply_threshold() -> f64 {
    0.01
}
fn default_exhaustion_pct() -> f64 {
    100.0
}
fn default_warning_pct() -> f64 {
    80.0
}
fn default_budget_increase_factor() -> f64 {
    1.2
}
fn default_budget_increase_score() -> f64 {
    80.0
}
fn default_auto_pause_score() -> f64 {
    30.0
}
fn default_auto_resume_score() -> f64 {
    60.0
}
fn default_neutral_score() -> f64 {
    50.0
}
fn default_forecast_horizon_days() -> u32 {
    7
}
fn default_history_limit() -> usize {
    50
}
fn default_analysis_window_days() -> i64 {
    7
}
