//! Elite reference profile.
//!
//! Loaded once per process and shared read-only by every run.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use smash_core::{Error, FeatureName, MetricCategory, Result, Unit};

/// Weights must sum to 1 within this tolerance
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Elite value and scoring weight for one feature
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceEntry {
    pub name: FeatureName,
    pub reference_value: f64,
    pub unit: Unit,
    pub weight: f64,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    name: String,
    reference_value: f64,
    unit: Unit,
    weight: f64,
}

/// Read-only row of the reference catalogue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogueEntry {
    pub name: FeatureName,
    pub display_name: String,
    pub category: MetricCategory,
    pub reference_value: f64,
    pub unit: Unit,
    pub weight: f64,
    pub description: String,
}

/// Validated set of reference entries, held in canonical feature order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceProfile {
    entries: Vec<ReferenceEntry>,
}

/// (feature, elite value, relative importance)
const ELITE_PROFILE: [(FeatureName, f64, f64); 12] = [
    (FeatureName::ShoulderRotationMaxDeg, 45.0, 1.0),
    (FeatureName::ShoulderAngularVelocityPeak, 800.0, 1.2),
    (FeatureName::HipShoulderSeparationMaxDeg, 45.0, 1.0),
    (FeatureName::ElbowExtensionAtContactDeg, 165.0, 1.0),
    (FeatureName::ElbowAngularVelocityPeak, 1200.0, 1.2),
    (FeatureName::WristSnapTimingOffsetPct, 8.0, 1.5),
    (FeatureName::KneeFlexionMinDeg, 120.0, 0.8),
    (FeatureName::VerticalDisplacementPx, 80.0, 0.6),
    (FeatureName::HipToShoulderDelayMs, 25.0, 1.3),
    (FeatureName::ShoulderToElbowDelayMs, 20.0, 1.3),
    (FeatureName::ElbowToWristDelayMs, 15.0, 1.3),
    (FeatureName::SwingDurationMs, 250.0, 0.7),
];

impl ReferenceProfile {
    /// Elite badminton smash values with importances normalised to sum to 1
    pub fn elite_default() -> Self {
        let total: f64 = ELITE_PROFILE.iter().map(|(_, _, w)| w).sum();
        let entries = ELITE_PROFILE
            .iter()
            .map(|&(name, reference_value, importance)| ReferenceEntry {
                name,
                reference_value,
                unit: name.unit(),
                weight: importance / total,
            })
            .collect();
        Self { entries }
    }

    /// Validate and order a set of entries.
    ///
    /// Rejects duplicates, unit mismatches, negative or non-finite weights,
    /// weights not summing to 1, and zero or non-finite reference values.
    pub fn from_entries(mut entries: Vec<ReferenceEntry>) -> Result<Self> {
        if entries.is_empty() {
            return Err(Error::Comparison("reference profile has no entries".into()));
        }

        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.name) {
                return Err(Error::Comparison(format!(
                    "duplicate reference entry for {}",
                    entry.name
                )));
            }
            if entry.unit != entry.name.unit() {
                return Err(Error::Comparison(format!(
                    "{} must be expressed in {}, got {}",
                    entry.name,
                    entry.name.unit(),
                    entry.unit
                )));
            }
            if !entry.reference_value.is_finite() || entry.reference_value == 0.0 {
                return Err(Error::Comparison(format!(
                    "reference value for {} must be finite and non-zero, got {}",
                    entry.name, entry.reference_value
                )));
            }
            if !entry.weight.is_finite() || entry.weight < 0.0 {
                return Err(Error::Comparison(format!(
                    "weight for {} must be finite and non-negative, got {}",
                    entry.name, entry.weight
                )));
            }
        }

        let total: f64 = entries.iter().map(|e| e.weight).sum();
        if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(Error::Comparison(format!(
                "reference weights sum to {}, expected 1",
                total
            )));
        }

        entries.sort_by_key(|e| e.name);
        Ok(Self { entries })
    }

    /// Parse a JSON array of `{name, reference_value, unit, weight}` objects
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: Vec<RawEntry> = serde_json::from_str(json)
            .map_err(|e| Error::Comparison(format!("invalid reference profile: {}", e)))?;

        let entries = raw
            .into_iter()
            .map(|r| {
                let name = FeatureName::from_name(&r.name).ok_or_else(|| {
                    Error::Comparison(format!("unknown feature '{}' in reference profile", r.name))
                })?;
                Ok(ReferenceEntry {
                    name,
                    reference_value: r.reference_value,
                    unit: r.unit,
                    weight: r.weight,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Self::from_entries(entries)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.entries)?)
    }

    pub fn entries(&self) -> &[ReferenceEntry] {
        &self.entries
    }

    pub fn entry(&self, name: FeatureName) -> Option<&ReferenceEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn catalogue(&self) -> Vec<CatalogueEntry> {
        self.entries
            .iter()
            .map(|e| CatalogueEntry {
                name: e.name,
                display_name: e.name.display_name().to_string(),
                category: e.name.category(),
                reference_value: e.reference_value,
                unit: e.unit,
                weight: e.weight,
                description: e.name.description().to_string(),
            })
            .collect()
    }
}

impl Default for ReferenceProfile {
    fn default() -> Self {
        Self::elite_default()
    }
}
