// src/report.rs

use crate::order::ResultLine;
use serde::Serialize;
use std::{fs, io::Write, path::Path};
use tracing::info;

/// Batch totals shown above the result table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub items: usize,
    /// kg
    pub total_weight: f64,
    /// kg per line, zero for an empty batch.
    pub average_weight: f64,
    /// Lines for which no weight method applied.
    pub undetermined: usize,
}

impl Summary {
    pub fn of(results: &[ResultLine]) -> Self {
        let items = results.len();
        let total_weight: f64 = results.iter().map(|r| r.total_weight).sum();
        let average_weight = if items == 0 {
            0.0
        } else {
            total_weight / items as f64
        };

        Self {
            items,
            total_weight,
            average_weight,
            undetermined: results.iter().filter(|r| r.method_label == "-").count(),
        }
    }
}

#[derive(Serialize)]
struct Export<'a> {
    summary: &'a Summary,
    lines: &'a [ResultLine],
}

/// Write summary and lines as pretty JSON.
pub fn export_json(
    path: impl AsRef<Path>,
    results: &[ResultLine],
) -> Result<(), Box<dyn std::error::Error>> {
    let path = path.as_ref();
    let summary = Summary::of(results);
    let body = serde_json::to_string_pretty(&Export {
        summary: &summary,
        lines: results,
    })?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, body)?;

    info!(path = %path.display(), lines = results.len(), "Results exported");
    Ok(())
}

/// Render the result table followed by the totals.
pub fn write_table(
    out: &mut impl Write,
    results: &[ResultLine],
    decimals: usize,
) -> std::io::Result<()> {
    writeln!(
        out,
        "{:>8}  {:<48}  {:>10}  {:<16}  {:<20}  {:>10}",
        "QTY", "DESCRIPTION", "MEASURE", "TYPE", "METHOD", "KG"
    )?;
    for r in results {
        writeln!(
            out,
            "{:>8}  {:<48}  {:>10}  {:<16}  {:<20}  {:>10.3}",
            r.quantity,
            truncate(&r.description, 48),
            r.measurement.as_deref().unwrap_or("-"),
            r.detected_type,
            r.method_label,
            r.total_weight
        )?;
    }

    let summary = Summary::of(results);
    writeln!(out)?;
    writeln!(out, "Total weight: {:.*} kg", decimals, summary.total_weight)?;
    writeln!(out, "Items: {}", summary.items)?;
    writeln!(out, "Average: {:.*} kg", decimals, summary.average_weight)?;
    if summary.undetermined > 0 {
        writeln!(out, "Without method: {} (review these lines)", summary.undetermined)?;
    }
    Ok(())
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn result(description: &str, method: &str, total: f64) -> ResultLine {
        ResultLine {
            quantity: 1.0,
            description: description.to_string(),
            measurement: None,
            detected_type: "CH_PLANA".to_string(),
            method_label: method.to_string(),
            total_weight: total,
        }
    }

    #[test]
    fn test_summary() {
        let results = [
            result("a", "Area (10x10)", 1.5),
            result("b", "-", 0.0),
            result("c", "Table (assembly)", 3.0),
        ];
        let summary = Summary::of(&results);
        assert_eq!(summary.items, 3);
        assert_eq!(summary.total_weight, 4.5);
        assert_eq!(summary.average_weight, 1.5);
        assert_eq!(summary.undetermined, 1);
    }

    #[test]
    fn test_summary_of_empty_batch() {
        let summary = Summary::of(&[]);
        assert_eq!(summary.items, 0);
        assert_eq!(summary.average_weight, 0.0);
    }

    #[test]
    fn test_write_table() {
        let results = [result("Chapa 100x100", "Area (100x100)", 0.236)];
        let mut out = Vec::new();
        write_table(&mut out, &results, 2).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Chapa 100x100"));
        assert!(text.contains("Area (100x100)"));
        assert!(text.contains("Total weight: 0.24 kg"));
        assert!(!text.contains("Without method"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("abc", 5), "abc");
        assert_eq!(truncate("abcdef", 4), "abc…");
    }

    #[test]
    fn test_export_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out").join("result.json");
        export_json(&path, &[result("a", "-", 0.0)]).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["summary"]["items"], 1);
        assert_eq!(value["lines"][0]["method_label"], "-");
    }
}
