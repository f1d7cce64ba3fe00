//! The dashboard: single owner of the loaded dataset.
//!
//! RULES:
//!   - All mutation goes through `apply()` (or the typed helpers it uses).
//!   - Reads are computed from the live dataset on every call; nothing is
//!     cached, so a read after a write always sees the write.
//!   - A failed command leaves every piece of state as it was.

use crate::{
    command::DashboardCommand,
    config::DashboardConfig,
    dataset::ReturnDataset,
    decision::{Decision, DecisionSlot},
    error::DashboardResult,
    event::DashboardEvent,
    filter::{self, FilterCriteria},
    metrics::{self, DispositionBreakdown, Percentage},
    record::{self, InputCoercionWarning, ReturnRecord},
    recovery::{self, DecisionSummary, RecoverySummary},
    report::ReportSnapshot,
    sample::SampleGenerator,
    store::Reflection,
    types::Row,
};
use serde::{Deserialize, Serialize};

/// Headline tiles of the overview page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardOverview {
    pub total_returns: usize,
    pub breakdown:     DispositionBreakdown,
    pub percentages:   Vec<Percentage>,
}

/// Dataset rows for re-export, with decisions kept alongside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSnapshot {
    pub rows:      Vec<Row>,
    pub decisions: Vec<DecisionSlot>,
}

pub struct Dashboard {
    config:   DashboardConfig,
    dataset:  ReturnDataset,
    criteria: FilterCriteria,
    warnings: Vec<InputCoercionWarning>,
}

impl Dashboard {
    /// Start with an empty dataset. Fails on a config `validate` rejects.
    pub fn new(config: DashboardConfig) -> DashboardResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            dataset:  ReturnDataset::new(),
            criteria: FilterCriteria::default(),
            warnings: Vec::new(),
        })
    }

    /// Apply one command and report what changed.
    pub fn apply(&mut self, command: DashboardCommand) -> DashboardResult<Vec<DashboardEvent>> {
        log::debug!("dashboard: applying {}", command.name());
        let event = match command {
            DashboardCommand::LoadDataset { rows } => self.load_rows(&rows)?,
            DashboardCommand::LoadSample { count, seed, with_dispositions } => {
                let generator = if with_dispositions {
                    SampleGenerator::new(seed).with_dispositions()
                } else {
                    SampleGenerator::new(seed)
                };
                self.load_records(generator.generate(count), Vec::new())?
            }
            DashboardCommand::SetDecision { sku, decision } => self.set_decision(&sku, decision)?,
            DashboardCommand::SetFilter { search_text, status } => {
                self.set_filter(FilterCriteria::new(search_text, status))
            }
        };
        Ok(vec![event])
    }

    /// Ingest parsed rows and replace the dataset.
    pub fn load_rows(&mut self, rows: &[Row]) -> DashboardResult<DashboardEvent> {
        let ingested = record::ingest_rows(rows)?;
        self.load_records(ingested.records, ingested.warnings)
    }

    pub fn load_records(
        &mut self,
        records: Vec<ReturnRecord>,
        warnings: Vec<InputCoercionWarning>,
    ) -> DashboardResult<DashboardEvent> {
        self.dataset.load_dataset(records)?;
        self.warnings = warnings;
        Ok(DashboardEvent::DatasetLoaded {
            items:    self.dataset.len(),
            warnings: self.warnings.clone(),
        })
    }

    /// Swap in a dataset restored elsewhere (e.g. from the session archive).
    pub fn replace_dataset(&mut self, dataset: ReturnDataset) -> DashboardEvent {
        self.dataset = dataset;
        self.warnings.clear();
        log::info!("dashboard: dataset replaced ({} items)", self.dataset.len());
        DashboardEvent::DatasetLoaded { items: self.dataset.len(), warnings: Vec::new() }
    }

    pub fn set_decision(
        &mut self,
        sku: &str,
        decision: Option<Decision>,
    ) -> DashboardResult<DashboardEvent> {
        let previous = self.dataset.set_decision(sku, decision)?;
        Ok(DashboardEvent::DecisionUpdated {
            sku: sku.to_string(),
            previous,
            current: decision,
        })
    }

    pub fn set_filter(&mut self, criteria: FilterCriteria) -> DashboardEvent {
        self.criteria = criteria;
        DashboardEvent::FilterChanged {
            criteria: self.criteria.clone(),
            visible:  self.visible_records().len(),
        }
    }

    // ── Reads ────────────────────────────────────────────────────────────────

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn dataset(&self) -> &ReturnDataset {
        &self.dataset
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Coercion warnings from the most recent load.
    pub fn warnings(&self) -> &[InputCoercionWarning] {
        &self.warnings
    }

    /// Records passing the current filter, in dataset order.
    pub fn visible_records(&self) -> Vec<&ReturnRecord> {
        filter::filter_records(self.dataset.records(), self.dataset.decisions(), &self.criteria)
    }

    pub fn summary(&self) -> RecoverySummary {
        recovery::summarize(self.dataset.records(), self.dataset.decisions(), &self.config)
    }

    pub fn decision_summary(&self) -> DecisionSummary {
        recovery::decision_summary(self.dataset.records(), self.dataset.decisions(), &self.config)
    }

    pub fn overview(&self) -> DashboardOverview {
        let records = self.dataset.records();
        let breakdown =
            metrics::disposition_breakdown(records, self.dataset.decisions(), &self.config);
        let percentages = metrics::percentages_of(&breakdown.counts(), records.len());
        DashboardOverview {
            total_returns: records.len(),
            breakdown,
            percentages,
        }
    }

    pub fn report(&self, reflection: Option<Reflection>) -> ReportSnapshot {
        ReportSnapshot::build(&self.dataset, &self.config, reflection, chrono::Utc::now())
    }

    pub fn export(&self) -> ExportSnapshot {
        ExportSnapshot {
            rows:      self.dataset.records().iter().map(ReturnRecord::to_row).collect(),
            decisions: self.dataset.decisions().to_vec(),
        }
    }
}
