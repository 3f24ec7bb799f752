// src/order.rs

use crate::error::OrderError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{fs, path::Path};
use tracing::{debug, info};

/// A single order line as supplied to the estimator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    /// Missing quantities count as zero.
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub measurement: Option<String>,
    /// Carried along for the reviewer; never used in the calculation.
    #[serde(default)]
    pub color: Option<String>,
}

/// One evaluated order line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultLine {
    pub quantity: f64,
    pub description: String,
    pub measurement: Option<String>,
    pub detected_type: String,
    pub method_label: String,
    /// kg, rounded to 3 decimals.
    pub total_weight: f64,
}

impl OrderLine {
    /// Build an order line from an extracted table row laid out as
    /// quantity, description, color, measurement.
    ///
    /// Returns `None` for header, subtotal and continuation rows: a row is only
    /// an item when it has more than 3 cells and its first cell is a number
    /// (digits, optionally with `.` separators).
    pub fn from_row(cells: &[Option<String>]) -> Option<Self> {
        if cells.len() <= 3 {
            return None;
        }

        let first = cells[0].as_deref()?.trim();
        let digits = first.replace('.', "");
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }

        Some(Self {
            quantity: first.parse::<f64>().ok(),
            description: cells[1].as_deref().unwrap_or_default().replace('\n', " "),
            measurement: cells[3].clone(),
            color: cells[2].clone(),
        })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OrderFile {
    Rows(Vec<Vec<Value>>),
    Lines(Vec<OrderLine>),
}

fn cell_text(cell: &Value) -> Option<String> {
    match cell {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Read an order file.
///
/// Accepts either the raw rows of an extracted table (`[["2", "Tubo ...", "Preto", "1000mm"], ...]`),
/// which are filtered through [`OrderLine::from_row`], or a list of already
/// reviewed order line objects.
pub fn read_order(path: impl AsRef<Path>) -> Result<Vec<OrderLine>, OrderError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| OrderError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let parsed: OrderFile = serde_json::from_str(&content).map_err(|source| OrderError::Parse {
        path: path.display().to_string(),
        source,
    })?;

    let lines = match parsed {
        OrderFile::Rows(rows) => {
            let total = rows.len();
            let lines: Vec<OrderLine> = rows
                .iter()
                .filter_map(|row| {
                    let cells: Vec<Option<String>> = row.iter().map(cell_text).collect();
                    let line = OrderLine::from_row(&cells);
                    if line.is_none() {
                        debug!(cells = ?cells, "Skipping non-item row");
                    }
                    line
                })
                .collect();
            info!(
                path = %path.display(),
                rows = total,
                items = lines.len(),
                "Order rows filtered"
            );
            lines
        }
        OrderFile::Lines(lines) => {
            info!(path = %path.display(), items = lines.len(), "Order lines loaded");
            lines
        }
    };

    Ok(lines)
}
