//! Condition evaluation: one condition against one metrics snapshot.
//! Pure, side-effect free, and fail-closed: a missing metric, a
//! non-numeric threshold for a numeric operator, or any other malformed
//! input evaluates to `false` rather than erroring.

use autopilot_core::types::{ComparisonOp, MetricsSnapshot, RuleCondition};

#[allow(clippy::unnecessary_map_or)]
pub fn evaluate(condition: &RuleCondition, metrics: &MetricsSnapshot) -> bool {
    let actual = match metrics.get(&condition.metric) {
        Some(v) => v,
        None => return false,
    };

    match condition.operator {
        ComparisonOp::Eq => expected_number(&condition.value)
            .map_or(false, |e| (actual - e).abs() < f64::EPSILON),
        ComparisonOp::NotEq => expected_number(&condition.value)
            .map_or(false, |e| (actual - e).abs() >= f64::EPSILON),
        ComparisonOp::Gt => expected_number(&condition.value).map_or(false, |e| actual > e),
        ComparisonOp::Gte => expected_number(&condition.value).map_or(false, |e| actual >= e),
        ComparisonOp::Lt => expected_number(&condition.value).map_or(false, |e| actual < e),
        ComparisonOp::Lte => expected_number(&condition.value).map_or(false, |e| actual <= e),
        ComparisonOp::Contains => condition
            .value
            .as_str()
            .map_or(false, |e| format_number(actual).contains(e)),
        ComparisonOp::In => condition.value.as_array().map_or(false, |list| {
            list.iter()
                .filter_map(expected_number)
                .any(|e| (actual - e).abs() < f64::EPSILON)
        }),
    }
}

/// Loose numeric coercion: JSON numbers directly, numeric strings parsed.
fn expected_number(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// String-cast of a metric value for substring matching. Whole numbers
/// render without a trailing `.0` so "150" matches a spend of 150.0.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}
