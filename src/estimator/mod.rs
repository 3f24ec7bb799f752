// src/estimator/mod.rs

mod classifier;
mod weight;

pub use classifier::{TypeMapping, classify};
pub use weight::{Estimate, WeightTables, parse_measurement_mm};

use crate::error::RuleError;
use crate::order::{OrderLine, ResultLine};
use crate::rules::RuleBase;
use tracing::{debug, info};

/// Classifier and weight tables built from one rule base.
///
/// Built once per batch, so every row of the batch sees the same rules.
#[derive(Debug, Clone)]
pub struct Estimator {
    mapping: TypeMapping,
    weights: WeightTables,
}

impl Estimator {
    pub fn new(rules: &RuleBase) -> Self {
        Self {
            mapping: TypeMapping::new(&rules.type_mapping),
            weights: WeightTables::new(rules),
        }
    }

    pub fn classify(&self, description: &str) -> &str {
        self.mapping.classify(description)
    }

    pub fn estimate(&self, type_label: &str, description: &str, measurement: Option<&str>) -> Estimate {
        self.weights.estimate(type_label, description, measurement)
    }

    /// Evaluate one order line.
    pub fn evaluate_line(&self, line: &OrderLine) -> ResultLine {
        let quantity = line.quantity.filter(|q| q.is_finite()).unwrap_or(0.0);
        let detected_type = self.classify(&line.description);
        let estimate = self.estimate(detected_type, &line.description, line.measurement.as_deref());

        let total_weight = if quantity > 0.0 {
            round3(estimate.unit_weight * quantity)
        } else {
            0.0
        };

        debug!(
            desc = %line.description,
            detected_type,
            method = %estimate.method,
            unit_weight = estimate.unit_weight,
            quantity,
            total_weight,
            "Line evaluated"
        );

        ResultLine {
            quantity,
            description: line.description.clone(),
            measurement: line.measurement.clone(),
            detected_type: detected_type.to_string(),
            method_label: estimate.method.to_string(),
            total_weight,
        }
    }
}

/// Estimate every order line against `rules`.
///
/// Returns exactly one result per input line, in input order. Bad rows come
/// back with zero weight and method `-`; only an invalid rule base is an error.
pub fn evaluate(lines: &[OrderLine], rules: &RuleBase) -> Result<Vec<ResultLine>, RuleError> {
    rules.validate()?;
    let estimator = Estimator::new(rules);

    let results: Vec<ResultLine> = lines.iter().map(|line| estimator.evaluate_line(line)).collect();

    let undetermined = results.iter().filter(|r| r.method_label == "-").count();
    info!(
        rows = results.len(),
        undetermined,
        total_weight = results.iter().map(|r| r.total_weight).sum::<f64>(),
        "Batch evaluated"
    );

    Ok(results)
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
