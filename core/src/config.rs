use crate::{
    decision::Decision,
    error::{DashboardError, DashboardResult},
};
use serde::{Deserialize, Serialize};

/// Share of resale value recovered and share of refurbishment cost spent
/// for one decision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecoveryRate {
    pub value_factor: f64,
    pub cost_factor:  f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveryRates {
    pub refurbish: RecoveryRate,
    pub resell:    RecoveryRate,
    pub recycle:   RecoveryRate,
    pub discard:   RecoveryRate,
}

impl RecoveryRates {
    pub fn for_decision(&self, decision: Decision) -> RecoveryRate {
        match decision {
            Decision::Refurbish => self.refurbish,
            Decision::Resell    => self.resell,
            Decision::Recycle   => self.recycle,
            Decision::Discard   => self.discard,
        }
    }
}

impl Default for RecoveryRates {
    fn default() -> Self {
        Self {
            refurbish: RecoveryRate { value_factor: 1.0, cost_factor: 1.0 },
            resell:    RecoveryRate { value_factor: 0.8, cost_factor: 0.2 },
            recycle:   RecoveryRate { value_factor: 0.2, cost_factor: 0.1 },
            discard:   RecoveryRate { value_factor: 0.0, cost_factor: 0.05 },
        }
    }
}

/// Factors used when no real decision has produced any value or cost yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimationConfig {
    /// Report view: value recovered = factor × Σ resale value.
    pub report_value_factor: f64,
    /// Report view: processing costs = factor × Σ refurbishment cost.
    pub report_cost_factor: f64,
    /// Decision summary: total recovery = factor × Σ resale value.
    pub summary_recovery_factor: f64,
    /// Decision summary: net margin = factor × total recovery.
    pub summary_margin_factor: f64,
}

impl Default for EstimationConfig {
    fn default() -> Self {
        Self {
            report_value_factor:     0.7,
            report_cost_factor:      0.8,
            summary_recovery_factor: 0.7,
            summary_margin_factor:   0.4,
        }
    }
}

/// Demonstration split of historical dispositions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispositionSplit {
    pub resold:      f64,
    pub refurbished: f64,
    pub discarded:   f64,
    pub recycled:    f64,
}

impl Default for DispositionSplit {
    fn default() -> Self {
        Self { resold: 0.4, refurbished: 0.3, discarded: 0.2, recycled: 0.1 }
    }
}

/// Demonstration split of live decisions for the report chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionSplit {
    pub refurbish: f64,
    pub resell:    f64,
    pub recycle:   f64,
    pub discard:   f64,
}

impl Default for DecisionSplit {
    fn default() -> Self {
        Self { refurbish: 0.3, resell: 0.4, recycle: 0.1, discard: 0.2 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub recovery_rates: RecoveryRates,
    #[serde(default)]
    pub estimation: EstimationConfig,
    #[serde(default)]
    pub demo_split: DispositionSplit,
    #[serde(default)]
    pub report_demo_split: DecisionSplit,
    #[serde(default = "default_timeline_max_days")]
    pub timeline_max_days: u32,
    #[serde(default = "default_top_products_limit")]
    pub top_products_limit: usize,
}

fn default_timeline_max_days() -> u32 {
    30
}

fn default_top_products_limit() -> usize {
    10
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            recovery_rates:     RecoveryRates::default(),
            estimation:         EstimationConfig::default(),
            demo_split:         DispositionSplit::default(),
            report_demo_split:  DecisionSplit::default(),
            timeline_max_days:  default_timeline_max_days(),
            top_products_limit: default_top_products_limit(),
        }
    }
}

impl DashboardConfig {
    /// Load from the data/ directory.
    /// In tests, use DashboardConfig::default().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/dashboard.json");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: DashboardConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        config
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid {path}: {e}"))?;
        Ok(config)
    }

    /// Reject tables no dashboard can be built from.
    pub fn validate(&self) -> DashboardResult<()> {
        let rates = &self.recovery_rates;
        for decision in Decision::ALL {
            let rate = rates.for_decision(decision);
            if rate.value_factor < 0.0 || rate.cost_factor < 0.0 {
                return Err(invalid(format!("recovery rate for {decision} must not be negative")));
            }
        }
        if self.timeline_max_days == 0 {
            return Err(invalid("timeline_max_days must be at least 1".into()));
        }
        Ok(())
    }
}

fn invalid(reason: String) -> DashboardError {
    DashboardError::Validation { reason: format!("config: {reason}") }
}
