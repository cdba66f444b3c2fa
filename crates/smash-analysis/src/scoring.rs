//! Reference comparison and the technique similarity score.

use serde::{Deserialize, Serialize};
use smash_core::{Error, FeatureName, MetricCategory, Result, ScalarFeature, Unit};

use crate::reference::{ReferenceEntry, ReferenceProfile};

/// |difference_percent| at or above this is at least medium
pub const MEDIUM_THRESHOLD_PCT: f64 = 15.0;
/// |difference_percent| at or above this is high
pub const HIGH_THRESHOLD_PCT: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn from_difference_percent(difference_percent: f64) -> Self {
        let magnitude = difference_percent.abs();
        if magnitude < MEDIUM_THRESHOLD_PCT {
            Severity::Low
        } else if magnitude < HIGH_THRESHOLD_PCT {
            Severity::Medium
        } else {
            Severity::High
        }
    }
}

/// A feature compared to its elite reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub name: FeatureName,
    pub display_name: String,
    pub category: MetricCategory,
    pub user_value: f64,
    pub reference_value: f64,
    pub unit: Unit,
    pub difference: f64,
    pub difference_percent: f64,
    pub severity: Severity,
    pub description: String,
}

impl Metric {
    /// Agreement with the reference on a 0-100 scale
    pub fn agreement(&self) -> f64 {
        (100.0 - self.difference_percent.abs()).clamp(0.0, 100.0)
    }
}

/// Output of a scoring pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub technique_similarity_score: f64,
    /// Ordered by category, then canonical feature order
    pub metrics: Vec<Metric>,
    /// Weights actually applied after renormalising over the scored metrics
    pub applied_weights: Vec<(FeatureName, f64)>,
}

#[derive(Debug, Clone, Default)]
pub struct ReferenceComparator;

impl ReferenceComparator {
    pub fn new() -> Self {
        Self
    }

    pub fn compare(&self, feature: &ScalarFeature, entry: &ReferenceEntry) -> Result<Metric> {
        if feature.unit != entry.unit {
            return Err(Error::Comparison(format!(
                "{} is in {} but its reference is in {}",
                feature.name, feature.unit, entry.unit
            )));
        }
        if entry.reference_value == 0.0 {
            return Err(Error::Comparison(format!(
                "reference value for {} is zero",
                feature.name
            )));
        }

        let difference = feature.value - entry.reference_value;
        let difference_percent = difference / entry.reference_value * 100.0;

        Ok(Metric {
            name: feature.name,
            display_name: feature.name.display_name().to_string(),
            category: feature.name.category(),
            user_value: feature.value,
            reference_value: entry.reference_value,
            unit: feature.unit,
            difference,
            difference_percent,
            severity: Severity::from_difference_percent(difference_percent),
            description: feature.name.description().to_string(),
        })
    }

    /// Weighted mean agreement over the given features, rounded to one
    /// decimal. Weights of the scored subset are renormalised to sum to 1.
    pub fn score(&self, features: &[ScalarFeature], profile: &ReferenceProfile) -> Result<ScoreReport> {
        let mut scored = Vec::with_capacity(features.len());
        for feature in features {
            let entry = profile.entry(feature.name).ok_or_else(|| {
                Error::Comparison(format!("no reference entry for {}", feature.name))
            })?;
            scored.push((self.compare(feature, entry)?, entry.weight));
        }

        let total_weight: f64 = scored.iter().map(|(_, w)| w).sum();
        if total_weight <= 0.0 {
            return Err(Error::Comparison(
                "scored metrics carry no reference weight".into(),
            ));
        }

        let weighted: f64 = scored
            .iter()
            .map(|(metric, w)| w / total_weight * metric.agreement())
            .sum();
        let technique_similarity_score = ((weighted * 10.0).round() / 10.0).clamp(0.0, 100.0);

        scored.sort_by_key(|(m, _)| (m.category, m.name));
        let applied_weights = scored
            .iter()
            .map(|(m, w)| (m.name, w / total_weight))
            .collect();
        let metrics: Vec<Metric> = scored.into_iter().map(|(m, _)| m).collect();

        tracing::debug!(
            metrics = metrics.len(),
            score = technique_similarity_score,
            "scored against reference"
        );

        Ok(ScoreReport {
            technique_similarity_score,
            metrics,
            applied_weights,
        })
    }
}
