// src/rules/mod.rs

mod loader;

pub use loader::{load_or_seed, save, set_density};

use crate::error::RuleError;
use serde::Deserialize;
use serde::Serialize;

/// Type label for items priced from the assembly catalog.
pub const ASSEMBLY_TYPE: &str = "CONJUNTO";
/// Type label for flat sheets weighed by area.
pub const FLAT_SHEET_TYPE: &str = "CH_PLANA";
/// Marker that makes a type label a linear (tube) type, e.g. `tubo 50x50`.
pub const TUBE_MARKER: &str = "tubo";
/// Tube type whose section has to be recovered from the description.
pub const GENERIC_TUBE_TYPE: &str = "tubo GENERICO";
/// Section left over after stripping the marker from [`GENERIC_TUBE_TYPE`].
pub const GENERIC_SECTION: &str = "generico";
/// Terminal classification when nothing matched.
pub const UNKNOWN_TYPE: &str = "UNKNOWN";

/// Steel, kg/dm³.
pub const STEEL_DENSITY: f64 = 7.85;

/// Description fragment mapped to a material type. Order is significant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingRule {
    pub text_fragment: String,
    pub type_label: String,
}

/// Linear weight of a tube/bar section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearWeightEntry {
    pub section: String,
    /// kg/m
    pub weight_per_meter: f64,
}

/// Fixed catalog weight of a pre-built assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssemblyWeightEntry {
    pub assembly_name: String,
    /// kg
    pub unit_weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialConstants {
    #[serde(default = "default_density")]
    pub density: f64,
}

fn default_density() -> f64 {
    STEEL_DENSITY
}

impl Default for MaterialConstants {
    fn default() -> Self {
        Self {
            density: STEEL_DENSITY,
        }
    }
}

/// The editable rule base: three lookup tables plus material constants.
///
/// Every table may be missing from a rule file; a missing table is empty and
/// all lookups against it miss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleBase {
    #[serde(default)]
    pub parameters: MaterialConstants,
    #[serde(default)]
    pub type_mapping: Vec<MappingRule>,
    #[serde(default)]
    pub linear_weight: Vec<LinearWeightEntry>,
    #[serde(default)]
    pub assembly_weight: Vec<AssemblyWeightEntry>,
}

impl RuleBase {
    /// A rule base with no rules at all and steel density.
    #[allow(dead_code)]
    pub fn empty() -> Self {
        Self {
            parameters: MaterialConstants::default(),
            type_mapping: Vec::new(),
            linear_weight: Vec::new(),
            assembly_weight: Vec::new(),
        }
    }

    /// Reject rule bases that cannot produce meaningful weights.
    ///
    /// Only the shape of the configuration is checked here. Rules that never
    /// match anything are legal.
    pub fn validate(&self) -> Result<(), RuleError> {
        let density = self.parameters.density;
        if !density.is_finite() || density <= 0.0 {
            return Err(RuleError::Invalid(format!(
                "density must be a positive number, got {density}"
            )));
        }

        if let Some(entry) = self
            .linear_weight
            .iter()
            .find(|e| !e.weight_per_meter.is_finite())
        {
            return Err(RuleError::Invalid(format!(
                "section '{}' has a non-finite weight per meter",
                entry.section
            )));
        }

        if let Some(entry) = self
            .assembly_weight
            .iter()
            .find(|e| !e.unit_weight.is_finite())
        {
            return Err(RuleError::Invalid(format!(
                "assembly '{}' has a non-finite unit weight",
                entry.assembly_name
            )));
        }

        Ok(())
    }
}

impl Default for RuleBase {
    /// The seed rule base the shop floor started from.
    fn default() -> Self {
        let mapping = [
            ("CONFIGURAÇÃO DO MÓDULO", "IGNORAR"),
            ("Capa do pé condutor 330", "IGNORAR"),
            ("Leito metálico 920 Bate Forte", ASSEMBLY_TYPE),
            ("Pé Condutor 330", ASSEMBLY_TYPE),
            ("Pé 50x50", "tubo 50x50"),
            ("Tubo Frontal Plataforma", "tubo 50x20"),
            ("Tubo Lateral Squadra", "tubo 50x50"),
            ("CHAPA", FLAT_SHEET_TYPE),
            ("Chapa 3mm", FLAT_SHEET_TYPE),
        ];
        let linear = [
            ("50x20", 1.2638),
            ("25x25", 0.887),
            ("20x20", 0.7533),
            ("100x100", 6.275),
            ("50x50", 2.2691),
        ];
        let assemblies = [
            ("Leito metálico 920 Bate Forte", 2.5),
            ("Pé Condutor 330 para mesas com estrutura metálica", 12.0),
        ];

        Self {
            parameters: MaterialConstants::default(),
            type_mapping: mapping
                .iter()
                .map(|(fragment, label)| MappingRule {
                    text_fragment: fragment.to_string(),
                    type_label: label.to_string(),
                })
                .collect(),
            linear_weight: linear
                .iter()
                .map(|(section, kg_m)| LinearWeightEntry {
                    section: section.to_string(),
                    weight_per_meter: *kg_m,
                })
                .collect(),
            assembly_weight: assemblies
                .iter()
                .map(|(name, kg)| AssemblyWeightEntry {
                    assembly_name: name.to_string(),
                    unit_weight: *kg,
                })
                .collect(),
        }
    }
}
