//! Cross-method consistency checking.
//!
//! Compares the values produced by independent methods, scores how closely
//! they agree, and names the input factors most likely responsible for any
//! outlier. Values are never altered.

use serde::{Deserialize, Serialize};

use crate::stats;
use crate::types::{Severity, ValidationWarning, ValuationMethod};

// ============================================================================
// Configuration
// ============================================================================

/// Thresholds for the consistency check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConsistencyConfig {
    /// Relative deviation above which a method is flagged
    pub deviation_threshold: f64,
    /// Relative deviation above which the flag is high severity
    pub high_deviation_threshold: f64,
    /// Scores below this add a general warning
    pub min_score: f64,
    /// Mean magnitudes below this make relative deviation undefined
    pub zero_mean_epsilon: f64,
}

impl Default for ConsistencyConfig {
    fn default() -> Self {
        Self {
            deviation_threshold: 0.30,
            high_deviation_threshold: 0.60,
            min_score: 0.7,
            zero_mean_epsilon: 1e-9,
        }
    }
}

// ============================================================================
// Types
// ============================================================================

/// A value produced by one method.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodValue {
    pub method: ValuationMethod,
    pub value: f64,
}

impl MethodValue {
    pub fn new(method: ValuationMethod, value: f64) -> Self {
        Self { method, value }
    }
}

/// Relative deviation of one method from the cross-method mean.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deviation {
    pub method: ValuationMethod,
    pub value: f64,
    /// `|value − mean| / |mean|`
    pub deviation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsistencyReport {
    pub mean: f64,
    /// 1.0 = perfect agreement, 0.0 = no agreement
    pub consistency_score: f64,
    pub deviations: Vec<Deviation>,
    pub warnings: Vec<ValidationWarning>,
}

// ============================================================================
// Checker
// ============================================================================

/// Consistency checker with configurable thresholds.
pub struct ConsistencyChecker {
    config: ConsistencyConfig,
}

impl ConsistencyChecker {
    pub fn new() -> Self {
        Self {
            config: ConsistencyConfig::default(),
        }
    }

    pub fn with_config(config: ConsistencyConfig) -> Self {
        Self { config }
    }

    pub fn check(&self, values: &[MethodValue]) -> ConsistencyReport {
        let raw: Vec<f64> = values.iter().map(|v| v.value).collect();

        if values.len() < 2 {
            return ConsistencyReport {
                mean: raw.first().copied().unwrap_or(0.0),
                consistency_score: 1.0,
                deviations: values
                    .iter()
                    .map(|v| Deviation {
                        method: v.method,
                        value: v.value,
                        deviation: 0.0,
                    })
                    .collect(),
                warnings: Vec::new(),
            };
        }

        let mean = stats::mean(&raw);
        if !mean.is_finite() || mean.abs() < self.config.zero_mean_epsilon {
            tracing::debug!(mean, "Consistency undefined around zero mean");
            return ConsistencyReport {
                mean,
                consistency_score: 0.0,
                deviations: Vec::new(),
                warnings: vec![ValidationWarning::new(
                    "valuation",
                    "Method values average to zero; relative deviations are undefined",
                    Severity::High,
                )
                .with_suggestion("Review inputs of methods returning negative values")],
            };
        }

        let mut warnings = Vec::new();
        let mut deviations = Vec::with_capacity(values.len());
        let mut max_deviation: f64 = 0.0;

        for v in values {
            let deviation = (v.value - mean).abs() / mean.abs();
            max_deviation = max_deviation.max(deviation);
            deviations.push(Deviation {
                method: v.method,
                value: v.value,
                deviation,
            });

            if deviation > self.config.deviation_threshold {
                let severity = if deviation > self.config.high_deviation_threshold {
                    Severity::High
                } else {
                    Severity::Medium
                };
                warnings.push(
                    ValidationWarning::new(
                        "valuation",
                        format!(
                            "{} valuation deviates {:.1}% from the cross-method average",
                            v.method,
                            deviation * 100.0
                        ),
                        severity,
                    )
                    .with_suggestion(format!(
                        "Review {}",
                        v.method.sensitive_factors().join(", ")
                    )),
                );
            }
        }

        let consistency_score = (1.0 - max_deviation / 2.0).clamp(0.0, 1.0);
        if consistency_score < self.config.min_score {
            warnings.push(
                ValidationWarning::new(
                    "valuation",
                    "Significant variations detected between valuation methods",
                    Severity::Medium,
                )
                .with_suggestion("Reconcile assumptions across methods before relying on one value"),
            );
        }

        tracing::debug!(
            methods = values.len(),
            mean,
            max_deviation,
            consistency_score,
            "Consistency checked"
        );

        ConsistencyReport {
            mean,
            consistency_score,
            deviations,
            warnings,
        }
    }
}

impl Default for ConsistencyChecker {
    fn default() -> Self {
        Self::new()
    }
}

/// Check a set of method values with the default thresholds.
pub fn check_consistency(values: &[MethodValue]) -> ConsistencyReport {
    ConsistencyChecker::new().check(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mv(method: ValuationMethod, value: f64) -> MethodValue {
        MethodValue::new(method, value)
    }

    #[test]
    fn test_single_method_is_fully_consistent() {
        let report = check_consistency(&[mv(ValuationMethod::Dcf, 4_000_000.0)]);
        assert_eq!(report.consistency_score, 1.0);
        assert!(report.warnings.is_empty());
        assert_eq!(report.mean, 4_000_000.0);
    }

    #[test]
    fn test_empty_input() {
        let report = check_consistency(&[]);
        assert_eq!(report.consistency_score, 1.0);
        assert_eq!(report.mean, 0.0);
        assert!(report.deviations.is_empty());
    }

    #[test]
    fn test_agreeing_methods() {
        let report = check_consistency(&[
            mv(ValuationMethod::Dcf, 10.0),
            mv(ValuationMethod::RevenueMultiple, 11.0),
            mv(ValuationMethod::Scorecard, 9.0),
        ]);
        assert!((report.mean - 10.0).abs() < 1e-12);
        assert!((report.consistency_score - 0.95).abs() < 1e-12);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_outlier_flagged_with_factors() {
        // mean 20; DCF deviates 1.0
        let report = check_consistency(&[
            mv(ValuationMethod::Dcf, 40.0),
            mv(ValuationMethod::RevenueMultiple, 10.0),
            mv(ValuationMethod::AssetBased, 10.0),
        ]);
        assert!((report.mean - 20.0).abs() < 1e-12);
        assert!((report.consistency_score - 0.5).abs() < 1e-12);

        let dcf = report
            .warnings
            .iter()
            .find(|w| w.message.starts_with("DCF"))
            .unwrap();
        assert_eq!(dcf.severity, Severity::High);
        assert!(dcf.suggestion.as_deref().unwrap().contains("discount rate"));

        // Both 10s deviate exactly 0.5: medium
        let medium = report
            .warnings
            .iter()
            .filter(|w| w.severity == Severity::Medium)
            .count();
        assert_eq!(medium, 3);
        assert!(report
            .warnings
            .iter()
            .any(|w| w.message.contains("variations detected")));
    }

    #[test]
    fn test_score_clamped_at_zero() {
        let report = check_consistency(&[
            mv(ValuationMethod::Dcf, 100.0),
            mv(ValuationMethod::AssetBased, -90.0),
        ]);
        assert!(report.consistency_score >= 0.0);
        assert_eq!(report.consistency_score, 0.0);
    }

    #[test]
    fn test_zero_mean() {
        let report = check_consistency(&[
            mv(ValuationMethod::Dcf, 5.0),
            mv(ValuationMethod::AssetBased, -5.0),
        ]);
        assert_eq!(report.consistency_score, 0.0);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].severity, Severity::High);
    }
}
