//! Report snapshot: every number the report, charts and PDF export show,
//! gathered into one plain serialisable value.

use crate::{
    config::DashboardConfig,
    dataset::ReturnDataset,
    metrics::{self, ConditionStats, DecisionCounts, DispositionBreakdown, Percentage, ProductValue, TimelinePoint},
    recovery::{self, DecisionSummary, RecoverySummary},
    store::Reflection,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const REPORT_TITLE: &str = "Return Value Recovery Simulation Report";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSnapshot {
    pub title:                   String,
    pub generated_at:            DateTime<Utc>,
    pub recovery:                RecoverySummary,
    pub decision_summary:        DecisionSummary,
    pub decision_counts:         DecisionCounts,
    pub disposition_breakdown:   DispositionBreakdown,
    pub disposition_percentages: Vec<Percentage>,
    pub conditions:              Vec<ConditionStats>,
    pub timeline:                Vec<TimelinePoint>,
    pub top_products:            Vec<ProductValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reflection:              Option<Reflection>,
}

impl ReportSnapshot {
    pub fn build(
        dataset: &ReturnDataset,
        config: &DashboardConfig,
        reflection: Option<Reflection>,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let records = dataset.records();
        let decisions = dataset.decisions();
        let breakdown = metrics::disposition_breakdown(records, decisions, config);
        let percentages = metrics::percentages_of(&breakdown.counts(), records.len());

        Self {
            title: REPORT_TITLE.to_string(),
            generated_at,
            recovery: recovery::summarize(records, decisions, config),
            decision_summary: recovery::decision_summary(records, decisions, config),
            decision_counts: metrics::decision_counts(records, decisions, config),
            disposition_breakdown: breakdown,
            disposition_percentages: percentages,
            conditions: metrics::condition_breakdown(records),
            timeline: metrics::timeline(records, config.timeline_max_days),
            top_products: metrics::top_products(records, config.top_products_limit),
            reflection: reflection.filter(|r| !r.is_empty()),
        }
    }
}
