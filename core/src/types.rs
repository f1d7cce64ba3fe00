//! Shared primitive types used across the dashboard core.

/// A stock-keeping unit. Unique within one loaded dataset.
pub type Sku = String;

/// Identifier of an archived session.
pub type SessionId = String;

/// A monetary amount. No currency semantics are attached.
pub type Money = f64;

/// A flat parsed row as handed over by the tabular input layer.
pub type Row = serde_json::Map<String, serde_json::Value>;
