use crate::rules::{
    ASSEMBLY_TYPE, FLAT_SHEET_TYPE, GENERIC_SECTION, RuleBase, TUBE_MARKER,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::fmt;

/// `<length>x<length>` in millimetres, e.g. `50x50` or `1200x300`.
static DIMENSION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([0-9]+)x([0-9]+)").expect("dimension pattern is valid")
});

/// Nominal thickness assumed for every flat sheet, mm.
const SHEET_THICKNESS_MM: f64 = 3.0;

/// Which calculation produced a unit weight.
#[derive(Debug, Clone, PartialEq)]
pub enum WeightMethod {
    /// Fixed weight from the assembly catalog.
    Catalog,
    /// Length times the section's kg/m.
    Linear { section: String },
    /// Sheet area times nominal thickness and density.
    Area { length1: f64, length2: f64 },
    /// Nothing applied; the weight is zero.
    Undetermined,
}

impl fmt::Display for WeightMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeightMethod::Catalog => write!(f, "Table (assembly)"),
            WeightMethod::Linear { section } => write!(f, "Linear ({section})"),
            WeightMethod::Area { length1, length2 } => write!(f, "Area ({length1}x{length2})"),
            WeightMethod::Undetermined => write!(f, "-"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Estimate {
    /// kg per piece, unrounded.
    pub unit_weight: f64,
    pub method: WeightMethod,
}

impl Estimate {
    fn none() -> Self {
        Self {
            unit_weight: 0.0,
            method: WeightMethod::Undetermined,
        }
    }
}

/// Weight tables and density captured from a rule base.
///
/// Sections and assembly names behave like maps: when a key is repeated the
/// last value wins. Assemblies are still scanned in the order their names
/// first appeared.
#[derive(Debug, Clone)]
pub struct WeightTables {
    linear: HashMap<String, f64>,
    assemblies: Vec<(String, f64)>,
    density: f64,
}

impl WeightTables {
    pub fn new(rules: &RuleBase) -> Self {
        let linear = rules
            .linear_weight
            .iter()
            .map(|e| (e.section.clone(), e.weight_per_meter))
            .collect();

        let mut assemblies: Vec<(String, f64)> = Vec::with_capacity(rules.assembly_weight.len());
        let mut position: HashMap<&str, usize> = HashMap::new();
        for entry in &rules.assembly_weight {
            match position.get(entry.assembly_name.as_str()) {
                Some(&idx) => assemblies[idx].1 = entry.unit_weight,
                None => {
                    position.insert(&entry.assembly_name, assemblies.len());
                    assemblies.push((entry.assembly_name.to_uppercase(), entry.unit_weight));
                }
            }
        }

        Self {
            linear,
            assemblies,
            density: rules.parameters.density,
        }
    }

    /// Unit weight for one classified item. Never fails: anything that cannot
    /// be resolved yields zero with [`WeightMethod::Undetermined`].
    pub fn estimate(&self, type_label: &str, description: &str, measurement: Option<&str>) -> Estimate {
        if type_label == ASSEMBLY_TYPE {
            self.catalog(description)
        } else if type_label.to_lowercase().contains(TUBE_MARKER) {
            self.linear(type_label, description, parse_measurement_mm(measurement))
        } else if type_label == FLAT_SHEET_TYPE {
            self.area(description)
        } else {
            Estimate::none()
        }
    }

    fn catalog(&self, description: &str) -> Estimate {
        let upper = description.to_uppercase();
        self.assemblies
            .iter()
            .find(|(name, _)| upper.contains(name.as_str()))
            .map(|(_, weight)| Estimate {
                unit_weight: *weight,
                method: WeightMethod::Catalog,
            })
            .unwrap_or_else(Estimate::none)
    }

    fn linear(&self, type_label: &str, description: &str, measurement_mm: f64) -> Estimate {
        let mut section = type_label
            .to_lowercase()
            .replace(&format!("{TUBE_MARKER} "), "")
            .trim()
            .to_string();

        // Generic tubes take the first dimension written in the description.
        if section == GENERIC_SECTION {
            if let Some(found) = DIMENSION.find(description) {
                section = found.as_str().to_string();
            }
        }

        let kg_per_m = self.linear.get(&section).copied().unwrap_or(0.0);
        if kg_per_m > 0.0 && measurement_mm > 0.0 {
            Estimate {
                unit_weight: (measurement_mm / 1000.0) * kg_per_m,
                method: WeightMethod::Linear { section },
            }
        } else {
            Estimate::none()
        }
    }

    fn area(&self, description: &str) -> Estimate {
        // Sheets take the last dimension written in the description.
        let Some(caps) = DIMENSION.captures_iter(description).last() else {
            return Estimate::none();
        };
        let (Ok(length1), Ok(length2)) = (caps[1].parse::<f64>(), caps[2].parse::<f64>()) else {
            return Estimate::none();
        };

        Estimate {
            unit_weight: (length1 * length2 * SHEET_THICKNESS_MM * self.density) / 1_000_000.0,
            method: WeightMethod::Area { length1, length2 },
        }
    }
}

/// Parse a length such as `"1000mm"`, `" 850 MM "` or `"1200"` into millimetres.
/// Anything unreadable is zero.
pub fn parse_measurement_mm(raw: Option<&str>) -> f64 {
    let Some(raw) = raw else {
        return 0.0;
    };
    let lower = raw.trim().to_lowercase();
    let text = lower.strip_suffix("mm").unwrap_or(&lower).trim();
    if text.is_empty() {
        return 0.0;
    }
    text.parse::<f64>().unwrap_or(0.0)
}
