//! Return records and their ingestion from parsed tabular rows.
//!
//! A record is created once when a dataset is loaded and never changes
//! afterwards. Raw numeric fields are kept as ingested; the recovery
//! calculator clamps negative amounts before using them.

use crate::{
    error::{DashboardError, DashboardResult},
    types::{Money, Row, Sku},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

// ── Column names ─────────────────────────────────────────────────────────────

pub const COL_SKU: &str = "SKU";
pub const COL_PRODUCT_NAME: &str = "Product Name";
pub const COL_CONDITION: &str = "Condition";
pub const COL_REFURBISHMENT_COST: &str = "Refurbishment Cost";
pub const COL_RESALE_VALUE: &str = "Resale Value";
pub const COL_DAYS_IN_PROCESS: &str = "Days in Process";
pub const COL_DISPOSITION: &str = "Disposition";

// ── Condition ────────────────────────────────────────────────────────────────

/// Physical condition grade of a returned item.
/// Unrecognised grades are carried through verbatim as `Unknown`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Condition {
    LikeNew,
    Good,
    Fair,
    Poor,
    Unknown(String),
}

impl Condition {
    /// The graded conditions, in display order.
    pub const GRADED: [Condition; 4] = [
        Condition::LikeNew,
        Condition::Good,
        Condition::Fair,
        Condition::Poor,
    ];

    pub fn parse(raw: &str) -> Self {
        let key: String = raw
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "likenew" => Self::LikeNew,
            "good"    => Self::Good,
            "fair"    => Self::Fair,
            "poor"    => Self::Poor,
            _         => Self::Unknown(raw.trim().to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::LikeNew    => "Like New",
            Self::Good       => "Good",
            Self::Fair       => "Fair",
            Self::Poor       => "Poor",
            Self::Unknown(s) => s,
        }
    }

    pub fn is_graded(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

impl From<String> for Condition {
    fn from(raw: String) -> Self {
        Condition::parse(&raw)
    }
}

impl From<Condition> for String {
    fn from(condition: Condition) -> Self {
        condition.label().to_string()
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ── Record ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnRecord {
    pub sku:                Sku,
    pub product_name:       String,
    pub condition:          Condition,
    pub refurbishment_cost: Money,
    pub resale_value:       Money,
    pub days_in_process:    u32,
    /// Historical outcome label. Distinct from the live decision.
    pub disposition:        Option<String>,
}

impl ReturnRecord {
    pub fn new(
        sku: impl Into<Sku>,
        product_name: impl Into<String>,
        condition: Condition,
        refurbishment_cost: Money,
        resale_value: Money,
        days_in_process: u32,
    ) -> Self {
        Self {
            sku: sku.into(),
            product_name: product_name.into(),
            condition,
            refurbishment_cost,
            resale_value,
            days_in_process,
            disposition: None,
        }
    }

    pub fn with_disposition(mut self, disposition: impl Into<String>) -> Self {
        let disposition = disposition.into();
        self.disposition = if disposition.trim().is_empty() {
            None
        } else {
            Some(disposition)
        };
        self
    }

    /// Resale value, never negative.
    pub fn clamped_resale_value(&self) -> Money {
        clamp_amount(self.resale_value)
    }

    /// Refurbishment cost, never negative.
    pub fn clamped_refurbishment_cost(&self) -> Money {
        clamp_amount(self.refurbishment_cost)
    }

    /// Resale value minus refurbishment cost, on the raw fields.
    pub fn raw_margin(&self) -> Money {
        self.resale_value - self.refurbishment_cost
    }

    pub fn has_disposition(&self) -> bool {
        self.disposition
            .as_deref()
            .is_some_and(|d| !d.trim().is_empty())
    }

    /// Build a record from one parsed row.
    ///
    /// `SKU` is required. Numeric columns accept numbers or numeric text;
    /// anything else falls back to 0 and produces a coercion warning.
    pub fn from_row(row: &Row) -> DashboardResult<(Self, Vec<InputCoercionWarning>)> {
        let sku = match row.get(COL_SKU) {
            Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
            Some(Value::Number(n)) => format_number(n),
            _ => {
                return Err(DashboardError::Validation {
                    reason: format!("row is missing required column '{COL_SKU}'"),
                })
            }
        };

        let mut warnings = Vec::new();
        let refurbishment_cost =
            coerce_amount(row, COL_REFURBISHMENT_COST, &sku, &mut warnings);
        let resale_value = coerce_amount(row, COL_RESALE_VALUE, &sku, &mut warnings);
        let days = coerce_amount(row, COL_DAYS_IN_PROCESS, &sku, &mut warnings);

        let record = Self {
            product_name: text_field(row, COL_PRODUCT_NAME).unwrap_or_default(),
            condition: Condition::parse(&text_field(row, COL_CONDITION).unwrap_or_default()),
            refurbishment_cost,
            resale_value,
            days_in_process: days.max(0.0).min(u32::MAX as f64) as u32,
            disposition: text_field(row, COL_DISPOSITION).filter(|d| !d.trim().is_empty()),
            sku,
        };
        Ok((record, warnings))
    }

    /// The row shape `from_row` accepts, for re-export.
    pub fn to_row(&self) -> Row {
        let mut row = Row::new();
        row.insert(COL_SKU.into(), Value::String(self.sku.clone()));
        row.insert(COL_PRODUCT_NAME.into(), Value::String(self.product_name.clone()));
        row.insert(COL_CONDITION.into(), Value::String(self.condition.label().to_string()));
        row.insert(COL_REFURBISHMENT_COST.into(), number_value(self.refurbishment_cost));
        row.insert(COL_RESALE_VALUE.into(), number_value(self.resale_value));
        row.insert(COL_DAYS_IN_PROCESS.into(), Value::from(self.days_in_process));
        if let Some(disposition) = &self.disposition {
            row.insert(COL_DISPOSITION.into(), Value::String(disposition.clone()));
        }
        row
    }
}

// ── Ingestion ────────────────────────────────────────────────────────────────

/// A numeric field that could not be read and was replaced by 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputCoercionWarning {
    pub sku:   Sku,
    pub field: String,
    pub raw:   String,
}

impl fmt::Display for InputCoercionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: non-numeric {} '{}' defaulted to 0",
            self.sku, self.field, self.raw
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct Ingested {
    pub records:  Vec<ReturnRecord>,
    pub warnings: Vec<InputCoercionWarning>,
}

/// Convert a batch of rows. Any invalid row rejects the whole batch.
pub fn ingest_rows(rows: &[Row]) -> DashboardResult<Ingested> {
    let mut ingested = Ingested::default();
    for (index, row) in rows.iter().enumerate() {
        let (record, warnings) = ReturnRecord::from_row(row).map_err(|e| match e {
            DashboardError::Validation { reason } => DashboardError::Validation {
                reason: format!("row {}: {reason}", index + 1),
            },
            other => other,
        })?;
        for warning in &warnings {
            log::warn!("ingest: {warning}");
        }
        ingested.records.push(record);
        ingested.warnings.extend(warnings);
    }
    Ok(ingested)
}

fn clamp_amount(amount: Money) -> Money {
    if amount.is_finite() && amount > 0.0 {
        amount
    } else {
        0.0
    }
}

fn text_field(row: &Row, column: &str) -> Option<String> {
    match row.get(column)? {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(format_number(n)),
        Value::Bool(b)   => Some(b.to_string()),
        _                => None,
    }
}

fn coerce_amount(
    row: &Row,
    column: &str,
    sku: &str,
    warnings: &mut Vec<InputCoercionWarning>,
) -> f64 {
    let parsed = match row.get(column) {
        None | Some(Value::Null) => return 0.0,
        Some(Value::String(s)) if s.trim().is_empty() => return 0.0,
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };
    match parsed {
        Some(value) if value.is_finite() => value,
        _ => {
            let raw = match row.get(column) {
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => String::new(),
            };
            warnings.push(InputCoercionWarning {
                sku: sku.to_string(),
                field: column.to_string(),
                raw,
            });
            0.0
        }
    }
}

/// Integral numbers print without a fractional part ("1001", not "1001.0").
fn format_number(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        _ => n.to_string(),
    }
}

fn number_value(amount: Money) -> Value {
    serde_json::Number::from_f64(amount)
        .map(Value::Number)
        .unwrap_or(Value::from(0))
}
