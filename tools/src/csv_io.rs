//! CSV reading and writing for the runner.
//!
//! Cells of the amount and day columns that parse as numbers become JSON
//! numbers. Every other column stays text, so a SKU like `007` survives.

use anyhow::{Context, Result};
use returns_core::{
    dashboard::ExportSnapshot,
    record::{
        COL_CONDITION, COL_DAYS_IN_PROCESS, COL_DISPOSITION, COL_PRODUCT_NAME,
        COL_REFURBISHMENT_COST, COL_RESALE_VALUE, COL_SKU,
    },
    types::Row,
};
use serde_json::Value;
use std::io::{Read, Write};

const COL_DECISION: &str = "Decision";

const NUMERIC_COLUMNS: [&str; 3] = [COL_REFURBISHMENT_COST, COL_RESALE_VALUE, COL_DAYS_IN_PROCESS];

/// Load rows from a CSV reader with a header line.
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<Row>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let mut rows = Vec::new();
    for (line_num, result) in csv_reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV parse error at line {}", line_num + 2))?;
        let row: Row = headers
            .iter()
            .zip(record.iter())
            .map(|(header, cell)| {
                let value = if NUMERIC_COLUMNS.contains(&header) {
                    numeric_cell(cell)
                } else {
                    Value::String(cell.to_string())
                };
                (header.to_string(), value)
            })
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

/// Load rows from a CSV file path.
pub fn read_rows_file(path: &str) -> Result<Vec<Row>> {
    let file = std::fs::File::open(path).with_context(|| format!("Failed to open '{path}'"))?;
    read_rows(file)
}

/// Write the export snapshot, one line per record plus a Decision column.
pub fn write_rows<W: Write>(writer: W, export: &ExportSnapshot) -> Result<()> {
    let with_disposition = export.rows.iter().any(|r| r.contains_key(COL_DISPOSITION));
    let mut columns = vec![
        COL_SKU,
        COL_PRODUCT_NAME,
        COL_CONDITION,
        COL_REFURBISHMENT_COST,
        COL_RESALE_VALUE,
        COL_DAYS_IN_PROCESS,
    ];
    if with_disposition {
        columns.push(COL_DISPOSITION);
    }
    columns.push(COL_DECISION);

    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(&columns)?;
    for (row, slot) in export.rows.iter().zip(export.decisions.iter()) {
        let line: Vec<String> = columns
            .iter()
            .map(|column| match *column {
                COL_DECISION => slot.decision.map(|d| d.to_string()).unwrap_or_default(),
                other => row.get(other).map(cell_text).unwrap_or_default(),
            })
            .collect();
        csv_writer.write_record(&line)?;
    }
    csv_writer.flush()?;
    Ok(())
}

fn numeric_cell(cell: &str) -> Value {
    if cell.is_empty() {
        return Value::String(String::new());
    }
    match cell.parse::<f64>() {
        Ok(n) if n.is_finite() => serde_json::Number::from_f64(n)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(cell.to_string())),
        _ => Value::String(cell.to_string()),
    }
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
